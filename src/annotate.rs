//! Debug output: draw match rectangles onto a copy of a screenshot

use crate::template_matching::MatchResult;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect as DrawRect;

/// Outline color for the best match
pub const BEST_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
/// Outline color for the remaining matches
pub const OTHER_COLOR: Rgb<u8> = Rgb([255, 200, 0]);

/// Copy of `image` with a hollow rectangle around every match.
///
/// `results` are expected in ranked order; the first one is drawn in
/// [`BEST_COLOR`] with a double outline.
pub fn annotate(image: &RgbImage, results: &[MatchResult]) -> RgbImage {
    let mut canvas = image.clone();
    for (i, result) in results.iter().enumerate() {
        let (x, y, w, h) = result.rect().xywh();
        if w <= 0 || h <= 0 {
            continue;
        }
        let color = if i == 0 { BEST_COLOR } else { OTHER_COLOR };
        draw_hollow_rect_mut(&mut canvas, DrawRect::at(x, y).of_size(w as u32, h as u32), color);
        if i == 0 && w > 2 && h > 2 {
            let inner = DrawRect::at(x + 1, y + 1).of_size(w as u32 - 2, h as u32 - 2);
            draw_hollow_rect_mut(&mut canvas, inner, color);
        }
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template_matching::{Point, Size};

    #[test]
    fn test_annotate_draws_outlines() {
        let image = RgbImage::new(40, 30);
        let results = vec![
            MatchResult::new(0.99, Point::new(5, 5), Size::new(10, 8)),
            MatchResult::new(0.95, Point::new(25, 10), Size::new(6, 6)),
        ];
        let out = annotate(&image, &results);

        assert_eq!(out.dimensions(), image.dimensions());
        assert_eq!(out.get_pixel(5, 5), &BEST_COLOR);
        assert_eq!(out.get_pixel(14, 12), &BEST_COLOR);
        assert_eq!(out.get_pixel(6, 6), &BEST_COLOR);
        assert_eq!(out.get_pixel(9, 9), &Rgb([0, 0, 0]));
        assert_eq!(out.get_pixel(25, 10), &OTHER_COLOR);
        // Source untouched
        assert_eq!(image.get_pixel(5, 5), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_annotate_without_results_is_a_copy() {
        let image = RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]));
        assert_eq!(annotate(&image, &[]), image);
    }
}
