/// Equivalent to `f64::floor` but suitable on `no_std`.
#[inline]
pub(crate) fn floor(value: f64) -> f64 {
    libm::floor(value)
}

/// Equivalent to `f64::round` but suitable on `no_std`.
#[inline]
pub(crate) fn round(value: f64) -> f64 {
    libm::round(value)
}
