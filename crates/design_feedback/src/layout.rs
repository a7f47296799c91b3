use crate::score::{ComponentLabel, ScoreComponent, SuggestionCategory, round_to};
use crate::{InvalidImageError, ZeroImageSizeSnafu};
use serde::Serialize;
use snafu::prelude::*;

pub const MIN_BALANCED_RATIO: f64 = 0.5;
pub const MAX_BALANCED_RATIO: f64 = 2.0;
pub const MIN_LAYOUT_SCORE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutAnalysis {
    /// Width over height, rounded to two decimals.
    pub ratio: f64,
    pub component: ScoreComponent,
}

pub fn aspect_ratio(width: u32, height: u32) -> Result<f64, InvalidImageError> {
    ensure!(width > 0 && height > 0, ZeroImageSizeSnafu { width, height });
    Ok(round_to(width as f64 / height as f64, 2))
}

/// Score the aspect ratio. The ratio is rounded before it is compared or
/// scored, so 2.004 counts as 2.0 and passes.
pub fn score(width: u32, height: u32) -> Result<LayoutAnalysis, InvalidImageError> {
    let ratio = aspect_ratio(width, height)?;

    let component = if ratio > MAX_BALANCED_RATIO || ratio < MIN_BALANCED_RATIO {
        let value = (10.0 - (ratio - 1.0).abs() * 2.0).max(MIN_LAYOUT_SCORE);
        ScoreComponent::flagged(ComponentLabel::Layout, value, SuggestionCategory::Layout)
    } else {
        ScoreComponent::passing(ComponentLabel::Layout)
    };

    Ok(LayoutAnalysis { ratio, component })
}
