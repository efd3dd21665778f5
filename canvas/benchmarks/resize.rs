//! Benchmarks resizing and convolution of RGBA images.
use brunch::Bench;

use imagy::{Extrapolation, Image, ImageView, Interpolation, Kernel, Rgba};

#[derive(Debug)]
struct Resize {
    interpolation: Interpolation,
    from: usize,
    into: usize,
}

impl Resize {
    fn name(&self) -> String {
        format!("resize({:?}, {}, {})", self.interpolation, self.from, self.into)
    }

    fn prepare(self) -> impl FnMut() -> Image<Rgba<u8>> {
        let image = Image::from_fn(self.from, self.from, |x, y| {
            Rgba::new(x as u8, y as u8, (x ^ y) as u8, 255)
        });

        move || {
            image
                .resized(self.into, self.into, self.interpolation)
                .expect("Source image is not empty")
        }
    }
}

fn main() {
    let tests = [
        Resize {
            interpolation: Interpolation::Nearest,
            from: 128,
            into: 512,
        },
        Resize {
            interpolation: Interpolation::Bilinear,
            from: 128,
            into: 512,
        },
        Resize {
            interpolation: Interpolation::Nearest,
            from: 512,
            into: 96,
        },
        Resize {
            interpolation: Interpolation::Bilinear,
            from: 512,
            into: 96,
        },
    ];

    let mut benches = brunch::Benches::default();
    benches.extend(
        tests.map(|resize| {
            Bench::new(format!("imagy::resize::{}", resize.name())).run(resize.prepare())
        }),
    );

    let image = Image::new(256, 256, Rgba::new(10u8, 20, 30, 255));
    let kernel = Kernel::<f32>::box_blur(5).expect("Box blur of odd size");
    benches.push(
        Bench::new("imagy::convolve::box_blur(5, 256)")
            .run(move || image.convoluted(&kernel, &Extrapolation::ClampToEdge)),
    );
    benches.finish();
}
