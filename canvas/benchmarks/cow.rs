//! Benchmarks the cost of writing to shared and unshared images.
use brunch::Bench;

use imagy::{Image, ImageView, ImageViewMut, Rgba};

struct Write {
    shared: bool,
    sz: usize,
}

impl Write {
    fn name(&self) -> String {
        let kind = if self.shared { "shared" } else { "unique" };
        format!("write({}, {})", kind, self.sz)
    }

    fn prepare(self) -> impl FnMut() -> Option<Rgba<u8>> {
        let original = Image::new(self.sz, self.sz, Rgba::BLACK);
        let mut owned = original.to_unshared();
        let shared = self.shared;

        move || {
            if shared {
                // A fresh alias each round, so every write has to copy first.
                let mut copy = original.clone();
                copy.set_pixel(0, 0, Rgba::WHITE);
                copy.pixel(0, 0)
            } else {
                owned.set_pixel(0, 0, Rgba::WHITE);
                owned.pixel(0, 0)
            }
        }
    }
}

fn main() {
    let tests = [
        Write {
            shared: true,
            sz: 128,
        },
        Write {
            shared: false,
            sz: 128,
        },
        Write {
            shared: true,
            sz: 1024,
        },
        Write {
            shared: false,
            sz: 1024,
        },
    ];

    let mut benches = brunch::Benches::default();
    benches.extend(
        tests.map(|write| Bench::new(format!("imagy::cow::{}", write.name())).run(write.prepare())),
    );
    benches.finish();
}
