// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `imagy` developers

/// Equivalent to `f64::round` but suitable on `no_std`.
#[inline]
pub(crate) fn round(value: f64) -> f64 {
    libm::round(value)
}

