use imagy::{
    Error, Extrapolation, Image, ImageView, ImageViewMut, Interpolation, Kernel,
    PremultipliedRgba, Rgba,
};

#[test]
fn blend_premultiplied() {
    let image = Image::from_pixels(
        2,
        1,
        vec![Rgba::new(255u8, 0, 0, 255), Rgba::new(0, 0, 255, 0)],
    )
    .unwrap();

    // Straight alpha bleeds the invisible blue into the result.
    let straight = image.sample(0.5, 0.0, Interpolation::Bilinear, &Extrapolation::Reject);
    assert_eq!(straight, Some(Rgba::new(128, 0, 128, 128)));

    let premultiplied = image.map(PremultipliedRgba::from);
    let blended = premultiplied
        .sample(0.5, 0.0, Interpolation::Bilinear, &Extrapolation::Reject)
        .map(Rgba::from);
    assert_eq!(blended, Some(Rgba::new(255, 0, 0, 128)));
}

#[test]
fn premultiplied_convolution_keeps_invariant() {
    let image = Image::from_fn(5, 5, |x, y| {
        let alpha = (40 * x + 10 * y) as u8;
        PremultipliedRgba::from(Rgba::new(255, 200, 30, alpha))
    });

    let blur = Kernel::<f32>::box_blur(3).unwrap();
    let blurred = image.convoluted(&blur, &Extrapolation::Reflect);
    for pixel in blurred.iter() {
        assert!(pixel.red <= pixel.alpha, "{:?}", pixel);
        assert!(pixel.green <= pixel.alpha, "{:?}", pixel);
        assert!(pixel.blue <= pixel.alpha, "{:?}", pixel);
    }
}

#[test]
fn images_cross_threads() {
    let image = Image::from_fn(32, 32, |x, y| (x ^ y) as u16);

    let handles: Vec<_> = (0..4)
        .map(|turns| {
            let image = image.clone();
            std::thread::spawn(move || image.rotated(turns).rotated(-turns))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), image);
    }

    let mut owned = image.to_unshared();
    let writer = std::thread::spawn(move || {
        owned.update(|p| *p = 0);
        owned
    });

    let written = writer.join().unwrap();
    assert!(written.iter().all(|&p| p == 0));
    assert_eq!(image.pixel(1, 0), Some(1));
}

#[test]
fn slice_of_a_slice_through_algorithms() {
    let image = Image::from_fn(8, 8, |x, y| (x + 8 * y) as i32);
    let outer = image.slice(2..7, 1..6).unwrap();
    let inner = outer.slice(1..4, 1..3).unwrap();
    assert_eq!(inner.origin(), (3, 2));
    assert_eq!(inner.pixels().collect::<Vec<_>>(), [19, 20, 21, 27, 28, 29]);

    // Extrapolation only sees the window, never the rest of the image.
    let cropped = inner
        .crop_extrapolated(-1..4, 0..1, &Extrapolation::ClampToEdge)
        .unwrap();
    assert_eq!(cropped.as_slice(), [19, 19, 20, 21, 21]);

    let kernel = Kernel::from_rows(&[[1, 1, 1]]).unwrap();
    let sums = inner.convoluted(&kernel, &Extrapolation::Reject);
    assert_eq!(sums.as_slice(), [39, 60, 41, 55, 84, 57]);

    assert_eq!(Image::from(&inner).transposed().as_slice(), [19, 27, 20, 28, 21, 29]);
}

#[test]
fn errors_describe_the_request() {
    let image = Image::new(4, 2, 0u8);

    let err = image.slice(1..6, ..).unwrap_err();
    assert_eq!(err.to_string(), "region 1..6 x 0..2 is not within the 4x2 image");

    let err = Image::from_pixels(3, 3, vec![0u8; 4]).unwrap_err();
    assert_eq!(err, Error::SizeMismatch { expected: 9, actual: 4 });

    let err = Kernel::<f32>::new(2, 1, vec![0.5, 0.5]).unwrap_err();
    assert_eq!(err, Error::InvalidKernel { width: 2, height: 1 });

    let err = image
        .slice(2..2, ..)
        .unwrap()
        .resized(3, 3, Interpolation::Bilinear)
        .unwrap_err();
    assert_eq!(err, Error::DegenerateResize { width: 0, height: 2 });
}

#[test]
fn raw_bytes_for_encoders() {
    let mut image = Image::new(2, 1, Rgba::TRANSPARENT);
    image[(1, 0)] = Rgba::new(1, 2, 3, 4);
    assert_eq!(image.as_bytes(), [0, 0, 0, 0, 1, 2, 3, 4]);
    assert_eq!(image.buffer().layout(), image.layout());
}
