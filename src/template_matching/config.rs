//! Configuration for template matching operations

use super::types::Rect;
use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Minimum score for a candidate to be kept (`score >= threshold`)
    pub threshold: f32,
    /// Maximum number of matches to return
    pub max_results: usize,
    /// Collapse overlapping candidates into the best one
    pub remove_duplicate: bool,
    /// IoU above which two candidates count as the same occurrence
    pub overlap_threshold: f32,
    /// Restrict the search to this region of the image
    pub rect: Option<Rect>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.9,
            max_results: 1,
            remove_duplicate: true,
            overlap_threshold: 0.0,
            rect: None,
        }
    }
}

impl MatchConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_remove_duplicate(mut self, remove_duplicate: bool) -> Self {
        self.remove_duplicate = remove_duplicate;
        self
    }

    pub fn with_overlap_threshold(mut self, overlap_threshold: f32) -> Self {
        self.overlap_threshold = overlap_threshold;
        self
    }

    pub fn with_rect(mut self, rect: Option<Rect>) -> Self {
        self.rect = rect;
        self
    }

    /// Reject parameters the engine cannot act on.
    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(MatchError::invalid("max_results must be at least 1"));
        }
        if !self.threshold.is_finite() {
            return Err(MatchError::invalid(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.overlap_threshold) {
            return Err(MatchError::invalid(format!(
                "overlap_threshold must be within [0, 1], got {}",
                self.overlap_threshold
            )));
        }
        if let Some(rect) = self.rect {
            rect.validate()?;
        }
        Ok(())
    }
}

/// Create a default configuration: single best match above 0.9
pub fn create_default_config() -> MatchConfig {
    MatchConfig::default()
}

/// Configuration preset for pixel-exact UI elements (buttons, icons)
pub fn create_exact_config() -> MatchConfig {
    MatchConfig {
        threshold: 0.999,
        ..MatchConfig::default()
    }
}

/// Configuration preset for repeated identical stamps placed close together
///
/// Overlap suppression is off so that adjacent copies are all reported.
pub fn create_stamp_config(max_results: usize) -> MatchConfig {
    MatchConfig {
        threshold: 0.999,
        max_results,
        remove_duplicate: false,
        ..MatchConfig::default()
    }
}
