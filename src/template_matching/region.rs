//! Region selection: narrows a search to a rectangle and remaps results back

use super::types::{Point, Rect, Size};
use crate::error::Result;
use image::{ImageBuffer, Pixel};

/// The part of a source image that a search runs over.
///
/// Holds a borrowed source plus the clipped bounds, so scoping never copies
/// pixels. Positions found inside the area are mapped back with [`SearchArea::to_source`].
#[derive(Clone, Copy)]
pub struct SearchArea<'a, P: Pixel> {
    source: &'a ImageBuffer<P, Vec<P::Subpixel>>,
    bounds: Option<Rect>,
}

impl<'a, P: Pixel> SearchArea<'a, P> {
    /// Whole-image search area.
    pub fn full(source: &'a ImageBuffer<P, Vec<P::Subpixel>>) -> Self {
        let bounds = Rect::full(source);
        Self {
            source,
            bounds: (!bounds.is_empty()).then_some(bounds),
        }
    }

    pub fn source(&self) -> &'a ImageBuffer<P, Vec<P::Subpixel>> {
        self.source
    }

    /// Clipped bounds in source coordinates, `None` if nothing is left to search.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    pub fn size(&self) -> Size {
        self.bounds.map(|b| b.size()).unwrap_or_default()
    }

    /// Translation from area-local to source coordinates.
    pub fn offset(&self) -> Point {
        self.bounds.map(|b| b.top_left()).unwrap_or_default()
    }

    /// Map an area-local position to the source image's coordinate space.
    pub fn to_source(&self, local: Point) -> Point {
        local + self.offset()
    }

    /// Owned copy of the searched pixels.
    pub fn to_image(&self) -> ImageBuffer<P, Vec<P::Subpixel>> {
        match self.bounds {
            Some(b) => crop(self.source, b),
            None => ImageBuffer::new(0, 0),
        }
    }
}

/// Copy the pixels of `rect` out of `image`, clipped to the image bounds.
///
/// The result never aliases `image`.
pub fn crop<P: Pixel>(
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
    rect: Rect,
) -> ImageBuffer<P, Vec<P::Subpixel>> {
    let clipped = match rect.intersection(&Rect::full(image)) {
        Some(clipped) => clipped,
        None => return ImageBuffer::new(0, 0),
    };
    let (left, top) = (clipped.x as u32, clipped.y as u32);
    ImageBuffer::from_fn(clipped.width as u32, clipped.height as u32, |x, y| {
        *image.get_pixel(left + x, top + y)
    })
}

/// Restrict a search to `rect`, or to the whole image when `rect` is `None`.
///
/// A rect reaching past the image edge is clipped; one entirely outside the
/// image yields an empty area, which the engine turns into zero matches.
/// Rects with non-positive width or height are rejected.
pub fn scope<P: Pixel>(
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
    rect: Option<Rect>,
) -> Result<SearchArea<'_, P>> {
    let rect = match rect {
        None => return Ok(SearchArea::full(image)),
        Some(rect) => rect,
    };
    rect.validate()?;

    let full = Rect::full(image);
    let bounds = rect.intersection(&full);
    match bounds {
        Some(clipped) if clipped != rect => {
            log::warn!("Search rect {} clipped to image bounds: {}", rect, clipped);
        }
        None => {
            log::warn!(
                "Search rect {} lies outside the {}x{} image",
                rect,
                image.width(),
                image.height()
            );
        }
        _ => {}
    }

    Ok(SearchArea {
        source: image,
        bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn gradient(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([((x + y * width) % 256) as u8]))
    }

    #[test]
    fn test_no_rect_is_full_image() {
        let image = gradient(40, 30);
        let area = scope(&image, None).unwrap();
        assert_eq!(area.bounds(), Some(Rect::new(0, 0, 40, 30)));
        assert_eq!(area.offset(), Point::new(0, 0));
        assert_eq!(area.to_image(), image);
    }

    #[test]
    fn test_rect_inside_image() {
        let image = gradient(40, 30);
        let area = scope(&image, Some(Rect::new(5, 7, 10, 12))).unwrap();
        assert_eq!(area.offset(), Point::new(5, 7));
        assert_eq!(area.size(), Size::new(10, 12));
        assert_eq!(area.to_source(Point::new(2, 3)), Point::new(7, 10));

        let cropped = area.to_image();
        assert_eq!(cropped.dimensions(), (10, 12));
        assert_eq!(cropped.get_pixel(0, 0), image.get_pixel(5, 7));
        assert_eq!(cropped.get_pixel(9, 11), image.get_pixel(14, 18));
    }

    #[test]
    fn test_rect_clipped_to_image() {
        // Region that exceeds the bounds should be clipped: 40-30 = 10 wide
        let image = gradient(40, 30);
        let area = scope(&image, Some(Rect::new(30, 20, 50, 50))).unwrap();
        assert_eq!(area.bounds(), Some(Rect::new(30, 20, 10, 10)));
        assert_eq!(area.offset(), Point::new(30, 20));
    }

    #[test]
    fn test_rect_with_negative_origin_is_clipped() {
        let image = gradient(40, 30);
        let area = scope(&image, Some(Rect::new(-5, -5, 15, 15))).unwrap();
        assert_eq!(area.bounds(), Some(Rect::new(0, 0, 10, 10)));
        assert_eq!(area.offset(), Point::new(0, 0));
    }

    #[test]
    fn test_rect_outside_image_is_empty() {
        let image = gradient(40, 30);
        let area = scope(&image, Some(Rect::new(100, 100, 10, 10))).unwrap();
        assert!(area.is_empty());
        assert_eq!(area.size(), Size::new(0, 0));
        assert_eq!(area.to_image().dimensions(), (0, 0));
    }

    #[test]
    fn test_rect_far_outside_image_is_empty() {
        let image = gradient(40, 30);
        let area = scope(&image, Some(Rect::new(i32::MAX - 5, 0, 10, 10))).unwrap();
        assert!(area.is_empty());

        let area = scope(&image, Some(Rect::new(0, i32::MAX - 1, 10, i32::MAX))).unwrap();
        assert!(area.is_empty());
        assert_eq!(crop(&image, Rect::new(i32::MAX - 5, 0, 10, 10)).dimensions(), (0, 0));
    }

    #[test]
    fn test_crop_clips_to_image() {
        let image = gradient(40, 30);
        let inside = crop(&image, Rect::new(2, 3, 4, 5));
        assert_eq!(inside.dimensions(), (4, 5));
        assert_eq!(inside.get_pixel(1, 1), image.get_pixel(3, 4));

        let partial = crop(&image, Rect::new(36, 28, 10, 10));
        assert_eq!(partial.dimensions(), (4, 2));
        assert_eq!(crop(&image, Rect::new(50, 50, 5, 5)).dimensions(), (0, 0));
    }

    #[test]
    fn test_zero_area_rect_is_rejected() {
        let image = gradient(40, 30);
        let err = scope(&image, Some(Rect::new(0, 0, 0, 10)))
            .err()
            .expect("zero-area rect must be rejected");
        assert!(err.is_invalid_input());
    }
}
