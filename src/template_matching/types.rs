/// Template matching data types
use crate::error::{MatchError, Result};
use image::{ImageBuffer, Pixel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A pixel coordinate (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Size of an image buffer.
    pub fn of<P: Pixel>(image: &ImageBuffer<P, Vec<P::Subpixel>>) -> Self {
        Self::new(image.width() as i32, image.height() as i32)
    }
}

/// Axis-aligned rectangle: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_point_size(position: Point, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    /// Rectangle covering the whole of an image.
    pub fn full<P: Pixel>(image: &ImageBuffer<P, Vec<P::Subpixel>>) -> Self {
        Self::from_point_size(Point::default(), Size::of(image))
    }

    /// Rectangle given as fractions of an image's size, truncated to whole pixels.
    ///
    /// `(0.0, 0.5, 1.0, 1.0)` is the bottom half of the image.
    pub fn from_fractions(image_size: Size, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let w = image_size.width as f32;
        let h = image_size.height as f32;
        let left = (w * x1) as i32;
        let top = (h * y1) as i32;
        let right = (w * x2) as i32;
        let bottom = (h * y2) as i32;
        Self::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn x1(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y1(&self) -> i32 {
        self.y
    }

    /// Exclusive right edge, saturating at `i32::MAX`.
    #[inline]
    pub fn x2(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating at `i32::MAX`.
    #[inline]
    pub fn y2(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Exact edges `(x1, y1, x2, y2)`, widened so they never overflow.
    fn edges(&self) -> (i64, i64, i64, i64) {
        let (x, y) = (self.x as i64, self.y as i64);
        (x, y, x + self.width as i64, y + self.height as i64)
    }

    pub fn xywh(&self) -> (i32, i32, i32, i32) {
        (self.x, self.y, self.width, self.height)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.x.saturating_add(self.width / 2),
            self.y.saturating_add(self.height / 2),
        )
    }

    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains_point(&self, point: Point) -> bool {
        let (x1, y1, x2, y2) = self.edges();
        let (px, py) = (point.x as i64, point.y as i64);
        px >= x1 && px < x2 && py >= y1 && py < y2
    }

    /// Whether `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        let (x1, y1, x2, y2) = self.edges();
        let (ox1, oy1, ox2, oy2) = other.edges();
        ox1 >= x1 && oy1 >= y1 && ox2 <= x2 && oy2 <= y2
    }

    /// Overlapping area of two rectangles, `None` when they do not intersect.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let (ax1, ay1, ax2, ay2) = self.edges();
        let (bx1, by1, bx2, by2) = other.edges();
        let (x1, y1) = (ax1.max(bx1), ay1.max(by1));
        let (x2, y2) = (ax2.min(bx2), ay2.min(by2));
        if x2 > x1 && y2 > y1 {
            // Bounded by the inputs' own origins and sizes, so these fit in i32
            Some(Rect::new(
                x1 as i32,
                y1 as i32,
                (x2 - x1) as i32,
                (y2 - y1) as i32,
            ))
        } else {
            None
        }
    }

    /// Intersection over union, in `[0, 1]`.
    pub fn iou(&self, other: &Rect) -> f32 {
        let inter = match self.intersection(other) {
            Some(r) => r.area(),
            None => return 0.0,
        };
        let union = self.area() + other.area() - inter;
        if union <= 0 {
            0.0
        } else {
            inter as f32 / union as f32
        }
    }

    /// Grow the rectangle outward on each side. Negative values shrink it.
    pub fn expand(&self, top: i32, right: i32, bottom: i32, left: i32) -> Rect {
        Rect::new(
            self.x.saturating_sub(left),
            self.y.saturating_sub(top),
            self.width.saturating_add(left).saturating_add(right),
            self.height.saturating_add(top).saturating_add(bottom),
        )
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(MatchError::invalid(format!(
                "rect {self} must have positive width and height"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{},{}]", self.x, self.y, self.width, self.height)
    }
}

/// Parses `"x,y,width,height"`, optionally wrapped in brackets (`"[x,y,w,h]"`).
impl FromStr for Rect {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self> {
        let inner = s.trim().trim_start_matches('[').trim_end_matches(']');
        let parts: Vec<&str> = inner.split(',').collect();
        if parts.len() != 4 {
            return Err(MatchError::invalid(format!(
                "expected 'x,y,width,height', got '{s}'"
            )));
        }
        let mut values = [0i32; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .trim()
                .parse::<i32>()
                .map_err(|_| MatchError::invalid(format!("bad rect component '{part}' in '{s}'")))?;
        }
        let rect = Rect::new(values[0], values[1], values[2], values[3]);
        rect.validate()?;
        Ok(rect)
    }
}

/// A single template occurrence, in the coordinates of the image passed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Correlation score (0.0-1.0)
    pub score: f32,
    /// Top-left corner of the match
    pub position: Point,
    /// Size of the match, always the template's size
    pub size: Size,
}

impl MatchResult {
    pub fn new(score: f32, position: Point, size: Size) -> Self {
        Self {
            score,
            position,
            size,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_point_size(self.position, self.size)
    }

    /// Exclusive bottom-right corner.
    pub fn right_bottom(&self) -> Point {
        Point::new(
            self.position.x.saturating_add(self.size.width),
            self.position.y.saturating_add(self.size.height),
        )
    }

    /// Tap point at the center of the match.
    pub fn center(&self) -> Point {
        self.rect().center()
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{}) {}x{} - {:.1}%",
            self.position.x,
            self.position.y,
            self.size.width,
            self.size.height,
            self.score * 100.0
        )
    }
}

/// A match together with an owned copy of the matched pixels.
#[derive(Debug, Clone)]
pub struct CropResult<P: Pixel<Subpixel = u8>> {
    pub result: MatchResult,
    pub image: ImageBuffer<P, Vec<u8>>,
}

impl<P: Pixel<Subpixel = u8>> CropResult<P> {
    pub fn score(&self) -> f32 {
        self.result.score
    }

    pub fn position(&self) -> Point {
        self.result.position
    }

    pub fn size(&self) -> Size {
        self.result.size
    }

    pub fn rect(&self) -> Rect {
        self.result.rect()
    }
}
