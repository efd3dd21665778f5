use bytemuck::{Pod, Zeroable};
use imagy_texel::{Accumulate, BufferError, PixelBuffer, PremultipliedRgba, Rgba};

/// A pixel type defined outside of the crate.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
struct Bgr {
    b: u8,
    g: u8,
    r: u8,
}

#[test]
fn foreign_pixel_bytes() {
    let buffer = PixelBuffer::from_fn(2, 1, |x, _| Bgr {
        b: x as u8,
        g: 10,
        r: 20,
    });

    assert_eq!(buffer.as_bytes(), [0, 10, 20, 1, 10, 20]);
}

#[test]
fn shared_between_threads() {
    let buffer = PixelBuffer::new(64, 64, Rgba::WHITE);
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = buffer.clone();
            std::thread::spawn(move || shared.as_slice().iter().all(|p| *p == Rgba::WHITE))
        })
        .collect();

    for reader in readers {
        assert!(reader.join().unwrap());
    }

    // Mutation after handing out an unshared copy never touches the original.
    let mut owned = buffer.to_unshared();
    let writer = std::thread::spawn(move || {
        owned.set(0, 0, Rgba::BLACK).unwrap();
        owned
    });
    let owned = writer.join().unwrap();
    assert_eq!(owned.get(0, 0), Ok(&Rgba::BLACK));
    assert_eq!(buffer.get(0, 0), Ok(&Rgba::WHITE));
}

#[test]
fn size_mismatch() {
    let pixels = vec![Rgba::BLACK; 5];
    let err = PixelBuffer::from_pixels(2, 3, pixels).unwrap_err();
    assert_eq!(
        err,
        BufferError::SizeMismatch {
            expected: 6,
            actual: 5
        }
    );
    assert_eq!(err.to_string(), "buffer requires 6 pixels but 5 were provided");
}

#[test]
fn weighted_blend_of_premultiplied() {
    let a = PremultipliedRgba::from(Rgba::new(255u8, 0, 0, 255));
    let b = PremultipliedRgba::TRANSPARENT;

    let acc = Accumulate::<f64>::accumulate(a) * 0.5 + Accumulate::<f64>::accumulate(b) * 0.5;
    let mixed: PremultipliedRgba<u8> = Accumulate::<f64>::from_accumulated(acc);

    assert_eq!(mixed, PremultipliedRgba::new(128, 0, 0, 128));
    assert_eq!(Rgba::from(mixed), Rgba::new(255, 0, 0, 128));
}
