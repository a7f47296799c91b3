pub mod classify;
pub mod config;
pub mod detect;
#[cfg(feature = "_debug")]
pub mod kmeans;
#[cfg(not(feature = "_debug"))]
mod kmeans;
pub mod layout;
pub mod report;
#[cfg(feature = "_debug")]
pub mod rng;
#[cfg(not(feature = "_debug"))]
mod rng;
#[cfg(feature = "_debug")]
pub mod sample;
#[cfg(not(feature = "_debug"))]
mod sample;
pub mod score;
pub mod typography;

pub use classify::{Brightness, ColorAnalysis};
pub use config::{AnalysisConfig, InvalidConfigError};
pub use detect::{
    AnalysisWarning, BoundingBox, DetectedRegions, DetectionError, FixedTextBlocks, TextDetector,
    TextRegion, UnavailableDetector,
};
pub use kmeans::{ColorCluster, MAX_CLUSTERS};
pub use layout::LayoutAnalysis;
pub use report::{ExportError, FeedbackReport, RawMetrics, export_file_name};
pub use rgb::RGB8;
pub use sample::MAX_SAMPLE_SIZE;
pub use score::{
    ComponentLabel, CompositeScore, ScoreComponent, Suggestion, SuggestionCategory, Verdict,
};

use snafu::prelude::*;
#[cfg(feature = "image")]
use std::ops::Deref;
use tracing::debug;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum InvalidImageError {
    #[snafu(display("image size must be positive, got {width}x{height}"))]
    ZeroImageSize { width: u32, height: u32 },

    #[snafu(display("buffer is empty"))]
    EmptyBuffer,

    #[snafu(display("unsupported channel count {channels}, expected 1 or 3"))]
    UnsupportedChannels { channels: u8 },

    #[snafu(display(
        "image size ({width}x{height}, {channels} channels) doesn't match the buffer size ({buf_size})"
    ))]
    ImageSizeMismatch {
        width: u32,
        height: u32,
        channels: u8,
        buf_size: usize,
    },

    #[snafu(display("image dimensions {width}x{height} are too large"))]
    ImageDimensionsTooLarge { width: u32, height: u32 },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Channels {
    /// One byte per pixel, expanded to three identical channels when read.
    Gray,
    /// RGBRGBRGB…
    Rgb,
}

impl Channels {
    pub fn count(self) -> usize {
        match self {
            Channels::Gray => 1,
            Channels::Rgb => 3,
        }
    }

    pub fn from_count(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(Channels::Gray),
            3 => Some(Channels::Rgb),
            _ => None,
        }
    }
}

/// A structure used as a façade for decoded image bytes.
#[derive(Debug, Copy, Clone)]
pub struct InputImage<'a> {
    width: u32,
    height: u32,
    channels: Channels,
    buf: &'a [u8],
}

impl<'a> InputImage<'a> {
    /// Wrap a decoded, row-major, 8-bit buffer with 1 or 3 channels.
    ///
    /// ```
    /// let input = design_feedback::InputImage::from_bytes(2, 1, 3, &[255, 0, 0, 0, 0, 255]);
    /// assert!(input.is_ok());
    ///
    /// let input = design_feedback::InputImage::from_bytes(2, 0, 3, &[]);
    /// assert!(input.is_err());
    /// ```
    pub fn from_bytes(
        width: u32,
        height: u32,
        channels: u8,
        buf: &'a [u8],
    ) -> Result<InputImage<'a>, InvalidImageError> {
        ensure!(width > 0 && height > 0, ZeroImageSizeSnafu { width, height });
        ensure!(!buf.is_empty(), EmptyBufferSnafu);
        let channels_kind =
            Channels::from_count(channels).context(UnsupportedChannelsSnafu { channels })?;

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(channels_kind.count()))
            .context(ImageDimensionsTooLargeSnafu { width, height })?;
        ensure!(
            buf.len() == expected,
            ImageSizeMismatchSnafu {
                width,
                height,
                channels,
                buf_size: buf.len()
            }
        );

        Ok(InputImage {
            width,
            height,
            channels: channels_kind,
            buf,
        })
    }

    pub fn from_rgb_bytes(
        width: u32,
        height: u32,
        buf: &'a [u8],
    ) -> Result<InputImage<'a>, InvalidImageError> {
        Self::from_bytes(width, height, 3, buf)
    }

    pub fn from_gray_bytes(
        width: u32,
        height: u32,
        buf: &'a [u8],
    ) -> Result<InputImage<'a>, InvalidImageError> {
        Self::from_bytes(width, height, 1, buf)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// The pixel at (`x`, `y`) as RGB; gray values are replicated.
    #[inline(always)]
    pub fn pixel(&self, x: usize, y: usize) -> RGB8 {
        let idx = y * self.width as usize + x;
        match self.channels {
            Channels::Gray => {
                let v = self.buf[idx];
                RGB8::new(v, v, v)
            }
            Channels::Rgb => {
                let px = &self.buf[idx * 3..idx * 3 + 3];
                RGB8::new(px[0], px[1], px[2])
            }
        }
    }
}

#[cfg(feature = "image")]
impl<'a, Container> TryFrom<&'a image::ImageBuffer<image::Rgb<u8>, Container>> for InputImage<'a>
where
    Container: Deref<Target = [<image::Rgb<u8> as image::Pixel>::Subpixel]> + 'a,
{
    type Error = InvalidImageError;

    fn try_from(
        img: &'a image::ImageBuffer<image::Rgb<u8>, Container>,
    ) -> Result<Self, Self::Error> {
        Self::from_rgb_bytes(img.width(), img.height(), img.as_raw().deref())
    }
}

#[cfg(feature = "image")]
impl<'a, Container> TryFrom<&'a image::ImageBuffer<image::Luma<u8>, Container>>
    for InputImage<'a>
where
    Container: Deref<Target = [<image::Luma<u8> as image::Pixel>::Subpixel]> + 'a,
{
    type Error = InvalidImageError;

    fn try_from(
        img: &'a image::ImageBuffer<image::Luma<u8>, Container>,
    ) -> Result<Self, Self::Error> {
        Self::from_gray_bytes(img.width(), img.height(), img.as_raw().deref())
    }
}

/// Analyze a design with the default configuration.
///
/// ```
/// use design_feedback::{FixedTextBlocks, InputImage, SuggestionCategory, Verdict};
///
/// let buf = [255u8; 300 * 100 * 3];
/// let input = InputImage::from_rgb_bytes(300, 100, &buf).unwrap();
///
/// let report = design_feedback::analyze(input, &FixedTextBlocks(4)).unwrap();
///
/// assert_eq!(report.metrics.aspect_ratio, 3.0);
/// assert_eq!(report.layout.value, 6.0);
/// assert_eq!(report.suggestions[0].category, SuggestionCategory::Layout);
/// assert_eq!(report.composite, 8.7);
/// assert_eq!(report.verdict, Verdict::Good);
/// ```
pub fn analyze(
    input: InputImage,
    detector: &dyn TextDetector,
) -> Result<FeedbackReport, InvalidImageError> {
    analyze_with_config(input, detector, &AnalysisConfig::default())
}

pub fn analyze_with_config(
    input: InputImage,
    detector: &dyn TextDetector,
    config: &AnalysisConfig,
) -> Result<FeedbackReport, InvalidImageError> {
    // Fails before any work is done on a degenerate image
    let layout = layout::score(input.width(), input.height())?;

    let sample = sample::sample(&input, config.sample_size);
    let mut rng = rng::new(config.seed);
    let palette = kmeans::find_clusters(
        &mut rng,
        &sample,
        config.clusters,
        config.max_iterations,
    );
    let color = classify::classify(&palette);

    let text = detect::count_text_blocks(detector, &input);
    let typography = typography::score(text.count);

    debug!(
        width = input.width(),
        height = input.height(),
        clusters = palette.len(),
        light = color.brightness.light,
        dark = color.brightness.dark,
        ratio = layout.ratio,
        text_blocks = text.count,
        "analysis finished"
    );

    Ok(FeedbackReport::build(
        palette,
        color,
        layout,
        typography,
        text.count,
        text.warning.into_iter().collect(),
    ))
}

/// Validate a raw buffer and analyze it in one step.
pub fn analyze_bytes(
    width: u32,
    height: u32,
    channels: u8,
    buf: &[u8],
    detector: &dyn TextDetector,
    config: &AnalysisConfig,
) -> Result<FeedbackReport, InvalidImageError> {
    let input = InputImage::from_bytes(width, height, channels, buf)?;
    analyze_with_config(input, detector, config)
}
