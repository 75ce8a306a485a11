//! Template loading: pixels, optional mask and a display name

use super::types::Size;
use crate::error::{MatchError, Result};
use image::{GrayImage, ImageBuffer, Luma, Pixel, Rgb, RgbImage, RgbaImage};
use std::path::{Path, PathBuf};

/// Mask and alpha values above this participate in matching.
pub const MASK_BINARY_THRESHOLD: u8 = 127;

/// File-name suffix that marks a mask for the template of the same stem
/// (`button.png` + `button_mask.png`).
pub const MASK_SUFFIX: &str = "_mask";

/// A reference image to search for.
#[derive(Debug, Clone)]
pub struct Template<P: Pixel<Subpixel = u8>> {
    pub name: String,
    pub image: ImageBuffer<P, Vec<u8>>,
    /// Non-zero pixels participate in matching
    pub mask: Option<GrayImage>,
}

impl<P: Pixel<Subpixel = u8>> Template<P> {
    pub fn new(name: impl Into<String>, image: ImageBuffer<P, Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            image,
            mask: None,
        }
    }

    /// Attach a mask; it must have the template's width and height.
    pub fn with_mask(mut self, mask: GrayImage) -> Result<Self> {
        if mask.dimensions() != self.image.dimensions() {
            return Err(MatchError::MaskShapeMismatch {
                mask_width: mask.width(),
                mask_height: mask.height(),
                template_width: self.image.width(),
                template_height: self.image.height(),
            });
        }
        self.mask = Some(mask);
        Ok(self)
    }

    pub fn size(&self) -> Size {
        Size::of(&self.image)
    }

    /// Center tap offset relative to a match's top-left corner
    pub fn tap_offset(&self) -> (u32, u32) {
        (self.image.width() / 2, self.image.height() / 2)
    }
}

impl Template<Rgb<u8>> {
    /// Load an RGB template; the name is the file stem.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = open_image(path)?.to_rgb8();
        Ok(Self::new(template_name(path), image))
    }

    /// Load an RGB template and a separate mask image.
    pub fn open_with_mask(path: impl AsRef<Path>, mask_path: impl AsRef<Path>) -> Result<Self> {
        let template = Self::open(path)?;
        let mask = load_mask(mask_path)?;
        template.with_mask(mask)
    }

    /// Load a template whose alpha channel marks the pixels to match.
    pub fn open_transparent(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let rgba = open_image(path)?.to_rgba8();
        let mask = mask_from_alpha(&rgba);
        let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();
        Self::new(template_name(path), rgb).with_mask(mask)
    }
}

fn template_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

fn open_image(path: &Path) -> Result<image::DynamicImage> {
    image::open(path).map_err(|source| MatchError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a screenshot as RGB.
pub fn load_screenshot(path: impl AsRef<Path>) -> Result<RgbImage> {
    Ok(open_image(path.as_ref())?.to_rgb8())
}

/// Load a mask image, binarized: values above [`MASK_BINARY_THRESHOLD`] become 255, the rest 0.
pub fn load_mask(path: impl AsRef<Path>) -> Result<GrayImage> {
    let gray = open_image(path.as_ref())?.to_luma8();
    Ok(binarize(&gray))
}

pub fn binarize(mask: &GrayImage) -> GrayImage {
    GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        let v = mask.get_pixel(x, y)[0];
        Luma([if v > MASK_BINARY_THRESHOLD { 255 } else { 0 }])
    })
}

/// Mask of the pixels whose alpha is above [`MASK_BINARY_THRESHOLD`].
pub fn mask_from_alpha(image: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let alpha = image.get_pixel(x, y)[3];
        Luma([if alpha > MASK_BINARY_THRESHOLD { 255 } else { 0 }])
    })
}

/// Manager for loading and organizing templates from a directory
pub struct TemplateManager {
    templates: Vec<Template<Rgb<u8>>>,
}

impl TemplateManager {
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
        }
    }

    /// Scan a directory for PNG templates and load them.
    ///
    /// `name_mask.png` is attached as the mask of `name.png` instead of being
    /// loaded as a template. Templates are sorted by name. Files that fail to
    /// load are skipped with a warning.
    pub fn load_templates_from_directory(&mut self, directory: impl AsRef<Path>) -> Result<usize> {
        let dir_path = directory.as_ref();
        let entries = std::fs::read_dir(dir_path).map_err(|source| MatchError::Io {
            path: dir_path.to_path_buf(),
            source,
        })?;

        let mut pngs: Vec<PathBuf> = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "png") {
                pngs.push(path);
            }
        }

        let mut loaded = Vec::new();
        for path in &pngs {
            let stem = template_name(path);
            if stem.ends_with(MASK_SUFFIX) {
                continue;
            }
            let mask_path = path.with_file_name(format!("{stem}{MASK_SUFFIX}.png"));
            let result = if pngs.contains(&mask_path) {
                Template::open_with_mask(path, &mask_path)
            } else {
                Template::open(path)
            };
            match result {
                Ok(template) => loaded.push(template),
                Err(e) => log::warn!("⚠️ Failed to load template {}: {}", path.display(), e),
            }
        }

        loaded.sort_by(|a, b| a.name.cmp(&b.name));
        let count = loaded.len();
        log::debug!("Loaded {} templates from {}", count, dir_path.display());
        self.templates.extend(loaded);
        Ok(count)
    }

    pub fn get_templates(&self) -> &[Template<Rgb<u8>>] {
        &self.templates
    }

    pub fn get_template_by_name(&self, name: &str) -> Option<&Template<Rgb<u8>>> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn clear(&mut self) {
        self.templates.clear();
    }

    pub fn count(&self) -> usize {
        self.templates.len()
    }
}

impl Default for TemplateManager {
    fn default() -> Self {
        Self::new()
    }
}
