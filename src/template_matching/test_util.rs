//! Synthetic images shared by the matching tests

use image::{GrayImage, Luma, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded uniform noise: every window is distinct, so the only strong
/// correlation peak of a cut-out patch is where it was cut from.
pub fn noise_gray(width: u32, height: u32, seed: u64) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    GrayImage::from_fn(width, height, |_, _| Luma([rng.gen_range(0..=255)]))
}

pub fn noise_rgb(width: u32, height: u32, seed: u64) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);
    RgbImage::from_fn(width, height, |_, _| {
        Rgb([
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
        ])
    })
}

pub fn cut(image: &GrayImage, x: u32, y: u32, w: u32, h: u32) -> GrayImage {
    image::imageops::crop_imm(image, x, y, w, h).to_image()
}

/// Copy `patch` into `image` with its top-left at `(x, y)`.
pub fn stamp<P: image::Pixel>(
    image: &mut image::ImageBuffer<P, Vec<P::Subpixel>>,
    patch: &image::ImageBuffer<P, Vec<P::Subpixel>>,
    x: u32,
    y: u32,
) {
    for (px, py, pixel) in patch.enumerate_pixels() {
        image.put_pixel(x + px, y + py, *pixel);
    }
}
