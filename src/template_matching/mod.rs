/// Template matching module for locating UI elements in screenshots
///
/// This module provides:
/// - Masked zero-mean normalized cross-correlation over any u8 pixel type
/// - Search restricted to a rectangle, with positions reported in full-image coordinates
/// - Multiple results per template with overlap suppression
/// - Cropping of matched regions and template/mask loading
pub mod config;
pub mod correlation;
pub mod dedup;
pub mod matcher;
pub mod region;
pub mod template;
pub mod types;

#[cfg(test)]
mod test_util;
#[cfg(test)]
mod tests;

pub use config::{MatchConfig, create_default_config, create_exact_config, create_stamp_config};
pub use matcher::{count, expect, find, find_any, match_and_crop, match_template};
pub use region::{SearchArea, crop, scope};
pub use template::{Template, TemplateManager, load_mask, load_screenshot};
pub use types::{CropResult, MatchResult, Point, Rect, Size};
