use crate::classify::ColorAnalysis;
use crate::detect::AnalysisWarning;
use crate::kmeans::ColorCluster;
use crate::layout::LayoutAnalysis;
use crate::score::{self, ScoreComponent, Suggestion, Verdict};
use serde::Serialize;
use snafu::prelude::*;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const EXPORT_SUFFIX: &str = "_feedback.txt";
pub const NO_ISSUES: &str = "No major issues. Great job!";

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ExportError {
    #[snafu(display("{} has no file name to name the report after", path.display()))]
    MissingFileName { path: PathBuf },

    #[snafu(display("failed to write the report to {}", path.display()))]
    WriteReport { path: PathBuf, source: io::Error },
}

/// The measurements the scores were derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawMetrics {
    pub light_colors: usize,
    pub dark_colors: usize,
    pub aspect_ratio: f64,
    pub text_blocks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackReport {
    pub color: ScoreComponent,
    pub layout: ScoreComponent,
    pub typography: ScoreComponent,
    /// Mean of the three component scores, rounded to one decimal.
    pub composite: f64,
    pub verdict: Verdict,
    /// Suggestions in evaluation order: color, layout, typography.
    pub suggestions: Vec<Suggestion>,
    pub metrics: RawMetrics,
    pub palette: Vec<ColorCluster>,
    pub warnings: Vec<AnalysisWarning>,
}

impl FeedbackReport {
    pub fn build(
        palette: Vec<ColorCluster>,
        color: ColorAnalysis,
        layout: LayoutAnalysis,
        typography: ScoreComponent,
        text_blocks: usize,
        warnings: Vec<AnalysisWarning>,
    ) -> Self {
        let composite = score::composite(&color.component, &layout.component, &typography);

        let suggestions = [&color.component, &layout.component, &typography]
            .into_iter()
            .filter_map(|component| component.suggestion.clone())
            .collect();

        FeedbackReport {
            composite: composite.value,
            verdict: composite.verdict,
            suggestions,
            metrics: RawMetrics {
                light_colors: color.brightness.light,
                dark_colors: color.brightness.dark,
                aspect_ratio: layout.ratio,
                text_blocks,
            },
            color: color.component,
            layout: layout.component,
            typography,
            palette,
            warnings,
        }
    }

    /// The canonical text form of the report. Identical input always renders
    /// to identical bytes.
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the rendered report to `dir`, named after `image_path`.
    pub fn export(&self, dir: &Path, image_path: &Path) -> Result<PathBuf, ExportError> {
        let file_name = export_file_name(image_path).context(MissingFileNameSnafu {
            path: image_path,
        })?;
        let path = dir.join(file_name);
        fs::write(&path, self.render()).context(WriteReportSnafu { path: &path })?;
        Ok(path)
    }
}

impl fmt::Display for FeedbackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Design Score: {}/10", format_number(self.composite))?;
        writeln!(f, "{}", self.verdict.headline())?;
        writeln!(f)?;

        writeln!(f, "Color Analysis:")?;
        let palette = self
            .palette
            .iter()
            .map(ColorCluster::hex)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "Palette: {palette}")?;
        writeln!(f, "Light colors: {}", self.metrics.light_colors)?;
        writeln!(f, "Dark colors: {}", self.metrics.dark_colors)?;
        writeln!(f, "Color score: {}", format_number(self.color.value))?;
        writeln!(f)?;

        writeln!(
            f,
            "Layout (Aspect Ratio): {}:1",
            format_number(self.metrics.aspect_ratio)
        )?;
        writeln!(f, "Layout score: {}", format_number(self.layout.value))?;
        writeln!(f)?;

        writeln!(
            f,
            "Typography: {} text blocks detected",
            self.metrics.text_blocks
        )?;
        writeln!(
            f,
            "Typography score: {}",
            format_number(self.typography.value)
        )?;
        for warning in &self.warnings {
            writeln!(f, "Warning: {warning}")?;
        }
        writeln!(f)?;

        writeln!(f, "Suggestions:")?;
        if self.suggestions.is_empty() {
            writeln!(f, "- {NO_ISSUES}")?;
        }
        for suggestion in &self.suggestions {
            writeln!(f, "- {}", suggestion.message)?;
        }

        Ok(())
    }
}

/// `<base>_feedback.txt`, where the base is the file name up to its first dot
/// (`poster.v2.png` becomes `poster_feedback.txt`).
pub fn export_file_name(image_path: &Path) -> Option<String> {
    let name = image_path.file_name()?.to_string_lossy();
    let base = name.split('.').next().unwrap_or_default();
    Some(format!("{base}{EXPORT_SUFFIX}"))
}

/// Two decimals at most, one at least: `8.0`, `6.5`, `7.96`.
pub fn format_number(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_owned()
    }
}
