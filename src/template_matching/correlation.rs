//! Normalized cross-correlation between a template and a search area
//!
//! Scores are zero-mean normalized cross-correlation (ZNCC) over every
//! participating sample: each channel of each pixel the mask lets through.
//! Masked-out pixels contribute to neither the covariance nor the variances.
//! Negative correlation is clamped to 0.0, so scores lie in `[0, 1]`.

use super::region::SearchArea;
use crate::error::{MatchError, Result};
use image::{GrayImage, ImageBuffer, Luma, Pixel};

/// One score per top-left alignment of the template inside the search area.
pub type ResponseSurface = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Variance sums below this are treated as a flat (constant) signal.
///
/// The smallest non-zero variance sum of integer samples is 0.5, so this only
/// absorbs floating point cancellation.
const FLAT_EPSILON: f64 = 1e-3;

/// Two flat signals score 1.0 when their means differ by less than this.
const FLAT_MEAN_TOLERANCE: f64 = 0.5;

/// Template statistics computed once per call.
pub struct TemplatePlan {
    width: u32,
    height: u32,
    channels: usize,
    /// Per-pixel participation (row-major).
    weights: Vec<bool>,
    /// Mean-subtracted template samples, zero where masked out.
    t_prime: Vec<f64>,
    /// Number of participating samples.
    samples: f64,
    mean_t: f64,
    var_t: f64,
}

impl TemplatePlan {
    /// Precompute masked template statistics.
    ///
    /// Mask pixels with a non-zero value participate. The mask must have the
    /// template's width and height.
    pub fn new<P>(template: &ImageBuffer<P, Vec<u8>>, mask: Option<&GrayImage>) -> Result<Self>
    where
        P: Pixel<Subpixel = u8>,
    {
        let (width, height) = template.dimensions();
        if width == 0 || height == 0 {
            return Err(MatchError::invalid("template is empty"));
        }

        let weights: Vec<bool> = match mask {
            Some(mask) => {
                if mask.dimensions() != (width, height) {
                    return Err(MatchError::MaskShapeMismatch {
                        mask_width: mask.width(),
                        mask_height: mask.height(),
                        template_width: width,
                        template_height: height,
                    });
                }
                mask.as_raw().iter().map(|&v| v != 0).collect()
            }
            None => vec![true; (width * height) as usize],
        };

        let channels = P::CHANNEL_COUNT as usize;
        let active_pixels = weights.iter().filter(|&&w| w).count();
        if active_pixels == 0 {
            return Err(MatchError::invalid("mask excludes every template pixel"));
        }
        let samples = (active_pixels * channels) as f64;

        let raw = template.as_raw();
        let mut sum_t = 0.0f64;
        for (i, _) in weights.iter().enumerate().filter(|(_, w)| **w) {
            for c in 0..channels {
                sum_t += raw[i * channels + c] as f64;
            }
        }
        let mean_t = sum_t / samples;

        let mut t_prime = vec![0.0f64; raw.len()];
        let mut var_t = 0.0f64;
        for (i, _) in weights.iter().enumerate().filter(|(_, w)| **w) {
            for c in 0..channels {
                let idx = i * channels + c;
                let d = raw[idx] as f64 - mean_t;
                t_prime[idx] = d;
                var_t += d * d;
            }
        }

        Ok(Self {
            width,
            height,
            channels,
            weights,
            t_prime,
            samples,
            mean_t,
            var_t,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_flat(&self) -> bool {
        self.var_t <= FLAT_EPSILON
    }

    /// Score of the template placed with its top-left at `(x, y)` of `image`.
    ///
    /// The caller guarantees the placement fits inside `image`.
    fn score_at(&self, image: &[u8], image_width: u32, x: u32, y: u32) -> f32 {
        let channels = self.channels;
        let tpl_row_len = self.width as usize * channels;
        let img_row_len = image_width as usize * channels;

        let mut dot = 0.0f64;
        let mut sum_i = 0.0f64;
        let mut sum_i2 = 0.0f64;

        for ty in 0..self.height as usize {
            let img_base = (y as usize + ty) * img_row_len + x as usize * channels;
            let tpl_base = ty * tpl_row_len;
            let weight_base = ty * self.width as usize;
            for tx in 0..self.width as usize {
                if !self.weights[weight_base + tx] {
                    continue;
                }
                for c in 0..channels {
                    let value = image[img_base + tx * channels + c] as f64;
                    dot += self.t_prime[tpl_base + tx * channels + c] * value;
                    sum_i += value;
                    sum_i2 += value * value;
                }
            }
        }

        let var_i = sum_i2 - (sum_i * sum_i) / self.samples;
        let window_flat = var_i <= FLAT_EPSILON;
        if self.is_flat() || window_flat {
            let mean_i = sum_i / self.samples;
            let same_level = (self.mean_t - mean_i).abs() < FLAT_MEAN_TOLERANCE;
            return if self.is_flat() && window_flat && same_level {
                1.0
            } else {
                0.0
            };
        }

        let score = dot / (self.var_t * var_i).sqrt();
        if score.is_finite() {
            score.clamp(0.0, 1.0) as f32
        } else {
            0.0
        }
    }
}

/// Compute the response surface of `plan` over `area`.
///
/// The surface has `area - template + 1` columns and rows. It is empty when
/// the area is empty or smaller than the template.
pub fn correlate<P>(area: &SearchArea<'_, P>, plan: &TemplatePlan) -> ResponseSurface
where
    P: Pixel<Subpixel = u8>,
{
    let bounds = match area.bounds() {
        Some(b) => b,
        None => return ResponseSurface::new(0, 0),
    };
    let (area_w, area_h) = (bounds.width as u32, bounds.height as u32);
    if plan.width > area_w || plan.height > area_h {
        return ResponseSurface::new(0, 0);
    }

    let out_w = area_w - plan.width + 1;
    let out_h = area_h - plan.height + 1;
    let source = area.source();
    let raw = source.as_raw();
    let image_width = source.width();
    let (left, top) = (bounds.x as u32, bounds.y as u32);

    let score_row = |y: u32| -> Vec<f32> {
        (0..out_w)
            .map(|x| plan.score_at(raw, image_width, left + x, top + y))
            .collect()
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<f32>> = {
        use rayon::prelude::*;
        (0..out_h).into_par_iter().map(score_row).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<f32>> = (0..out_h).map(score_row).collect();

    let scores = rows.concat();
    ResponseSurface::from_fn(out_w, out_h, |x, y| Luma([scores[(y * out_w + x) as usize]]))
}
