pub mod annotate;
pub mod error;
pub mod scheduler;
pub mod template_matching;

pub use error::{MatchError, Result};
pub use scheduler::{Ticker, expect_within, poll_until};
pub use template_matching::{
    CropResult, MatchConfig, MatchResult, Point, Rect, Size, Template, match_and_crop,
    match_template,
};
