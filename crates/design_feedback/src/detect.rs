//! The boundary to an external text detector.
//!
//! Detection itself (OCR models and the like) lives outside this crate. The
//! analysis only needs to know how many text regions were found, and treats a
//! failing detector as "no text" plus a warning.

use crate::InputImage;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::fmt;
use tracing::warn;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One block of text reported by a detector.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextRegion {
    pub bounds: BoundingBox,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub confidence: f32,
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum DetectionError {
    #[snafu(display("text detection is unavailable: {reason}"))]
    Unavailable { reason: String },

    #[snafu(display("text detection failed: {message}"))]
    Failed { message: String },
}

pub trait TextDetector {
    fn detect(&self, image: &InputImage<'_>) -> Result<Vec<TextRegion>, DetectionError>;

    /// Number of text regions in the image. Detectors that know the count
    /// without producing regions override this.
    fn count(&self, image: &InputImage<'_>) -> Result<usize, DetectionError> {
        self.detect(image).map(|regions| regions.len())
    }
}

impl<F> TextDetector for F
where
    F: Fn(&InputImage<'_>) -> Result<Vec<TextRegion>, DetectionError>,
{
    fn detect(&self, image: &InputImage<'_>) -> Result<Vec<TextRegion>, DetectionError> {
        self(image)
    }
}

/// Reports the same number of (empty) regions for every image.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedTextBlocks(pub usize);

impl TextDetector for FixedTextBlocks {
    fn detect(&self, _image: &InputImage<'_>) -> Result<Vec<TextRegion>, DetectionError> {
        Ok(vec![TextRegion::default(); self.0])
    }

    fn count(&self, _image: &InputImage<'_>) -> Result<usize, DetectionError> {
        Ok(self.0)
    }
}

/// Regions that were detected ahead of time, e.g. loaded from a file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectedRegions(pub Vec<TextRegion>);

impl TextDetector for DetectedRegions {
    fn detect(&self, _image: &InputImage<'_>) -> Result<Vec<TextRegion>, DetectionError> {
        Ok(self.0.clone())
    }

    fn count(&self, _image: &InputImage<'_>) -> Result<usize, DetectionError> {
        Ok(self.0.len())
    }
}

/// A detector that always fails, for when no detection engine is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnavailableDetector {
    reason: String,
}

impl UnavailableDetector {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl TextDetector for UnavailableDetector {
    fn detect(&self, _image: &InputImage<'_>) -> Result<Vec<TextRegion>, DetectionError> {
        UnavailableSnafu {
            reason: self.reason.clone(),
        }
        .fail()
    }
}

/// A problem that did not stop the analysis but makes the report less
/// trustworthy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
#[non_exhaustive]
pub enum AnalysisWarning {
    TextDetectionUnavailable { reason: String },
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::TextDetectionUnavailable { reason } => {
                write!(f, "{reason}; assuming no text blocks")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlockCount {
    pub count: usize,
    pub warning: Option<AnalysisWarning>,
}

pub fn count_text_blocks(detector: &dyn TextDetector, image: &InputImage<'_>) -> TextBlockCount {
    match detector.count(image) {
        Ok(count) => TextBlockCount {
            count,
            warning: None,
        },
        Err(err) => {
            warn!(error = %err, "text detection failed, continuing with zero text blocks");
            TextBlockCount {
                count: 0,
                warning: Some(AnalysisWarning::TextDetectionUnavailable {
                    reason: err.to_string(),
                }),
            }
        }
    }
}
