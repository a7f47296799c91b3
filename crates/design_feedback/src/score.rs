use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

pub const EXCELLENT_THRESHOLD: f64 = 9.0;
pub const GOOD_THRESHOLD: f64 = 7.0;

/// What a suggestion is about. Set when the suggestion is created, so
/// consumers never have to guess from the message text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionCategory {
    Light,
    Dark,
    Layout,
    TextHeavy,
    TextEmpty,
}

impl SuggestionCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionCategory::Light => "light",
            SuggestionCategory::Dark => "dark",
            SuggestionCategory::Layout => "layout",
            SuggestionCategory::TextHeavy => "text-heavy",
            SuggestionCategory::TextEmpty => "text-empty",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SuggestionCategory::Light => {
                "The design appears overly bright with many light tones. \
                Consider introducing deeper shades or bold accents to create stronger contrast, \
                which improves readability and gives your design a more professional finish."
            }
            SuggestionCategory::Dark => {
                "The overall tone seems very dark, which might make content harder to see. \
                Try adding lighter highlights or vibrant elements to ensure better visual hierarchy, \
                making important parts stand out more clearly."
            }
            SuggestionCategory::Layout => {
                "Your design uses an uncommon aspect ratio, which may cause issues on standard \
                devices like mobiles or laptops. \
                Consider adjusting it to a more common ratio like 16:9 or 4:3 to ensure \
                consistent appearance across various screens."
            }
            SuggestionCategory::TextHeavy => {
                "There seems to be a heavy use of text, which might overwhelm the viewer. \
                Simplify your content by highlighting key points with headings and using concise \
                messaging, which enhances clarity and improves user engagement."
            }
            SuggestionCategory::TextEmpty => {
                "No text was detected in your design. While minimalism can be beautiful, \
                consider adding brief, guiding text to provide context or instructions to users, \
                ensuring better understanding and interaction."
            }
        }
    }
}

impl fmt::Display for SuggestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub category: SuggestionCategory,
    pub message: String,
}

impl Suggestion {
    pub fn new(category: SuggestionCategory) -> Self {
        Self {
            category,
            message: category.message().to_owned(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentLabel {
    Color,
    Layout,
    Typography,
}

impl ComponentLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentLabel::Color => "color",
            ComponentLabel::Layout => "layout",
            ComponentLabel::Typography => "typography",
        }
    }
}

impl fmt::Display for ComponentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single 0–10 score with at most one suggestion attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub label: ComponentLabel,
    pub value: f64,
    pub suggestion: Option<Suggestion>,
}

impl ScoreComponent {
    /// Full marks, nothing to suggest.
    pub fn passing(label: ComponentLabel) -> Self {
        Self {
            label,
            value: MAX_SCORE,
            suggestion: None,
        }
    }

    pub fn flagged(label: ComponentLabel, value: f64, category: SuggestionCategory) -> Self {
        Self {
            label,
            value: value.clamp(MIN_SCORE, MAX_SCORE),
            suggestion: Some(Suggestion::new(category)),
        }
    }

    pub fn category(&self) -> Option<SuggestionCategory> {
        self.suggestion.as_ref().map(|s| s.category)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Excellent,
    Good,
    NeedsImprovement,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        if score >= EXCELLENT_THRESHOLD {
            Verdict::Excellent
        } else if score >= GOOD_THRESHOLD {
            Verdict::Good
        } else {
            Verdict::NeedsImprovement
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Excellent => "excellent",
            Verdict::Good => "good",
            Verdict::NeedsImprovement => "needs-improvement",
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Verdict::Excellent => "Excellent! Your design is almost perfect!",
            Verdict::Good => "Good work! A few tweaks can make it awesome.",
            Verdict::NeedsImprovement => "Needs improvement. Focus on balance and readability.",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round to `places` decimals, correctly rounded from the exact binary value
/// (`2.675` is slightly below the half and becomes `2.67`).
pub fn round_to(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct CompositeScore {
    pub value: f64,
    pub verdict: Verdict,
}

/// Mean of the three component scores, rounded to one decimal.
pub fn composite(
    color: &ScoreComponent,
    layout: &ScoreComponent,
    typography: &ScoreComponent,
) -> CompositeScore {
    let mean = (color.value + layout.value + typography.value) / 3.0;
    let value = round_to(mean, 1).clamp(MIN_SCORE, MAX_SCORE);

    CompositeScore {
        value,
        verdict: Verdict::from_score(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn component(label: ComponentLabel, value: f64) -> ScoreComponent {
        ScoreComponent {
            label,
            value,
            suggestion: None,
        }
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(25.0 / 3.0, 1), 8.3);
        assert_eq!(round_to(8.0, 1), 8.0);
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(0.25, 1), 0.2);
        assert_eq!(round_to(1.005, 2), 1.0);
        assert_eq!(round_to(1.0 / 3.0, 2), 0.33);
    }

    #[test]
    fn composite_of_scenario_scores() {
        let score = composite(
            &component(ComponentLabel::Color, 9.0),
            &component(ComponentLabel::Layout, 10.0),
            &component(ComponentLabel::Typography, 5.0),
        );
        assert_eq!(score.value, 8.0);
        assert_eq!(score.verdict, Verdict::Good);
    }

    #[test]
    fn composite_rounds_mean() {
        let score = composite(
            &component(ComponentLabel::Color, 10.0),
            &component(ComponentLabel::Layout, 7.96),
            &component(ComponentLabel::Typography, 6.5),
        );
        assert_eq!(score.value, round_to((10.0 + 7.96 + 6.5) / 3.0, 1));
        assert_eq!(score.value, 8.2);
    }

    #[test]
    fn verdict_boundaries() {
        assert_eq!(Verdict::from_score(10.0), Verdict::Excellent);
        assert_eq!(Verdict::from_score(9.0), Verdict::Excellent);
        assert_eq!(Verdict::from_score(8.9), Verdict::Good);
        assert_eq!(Verdict::from_score(7.0), Verdict::Good);
        assert_eq!(Verdict::from_score(6.9), Verdict::NeedsImprovement);
        assert_eq!(Verdict::from_score(0.0), Verdict::NeedsImprovement);
    }

    #[test]
    fn flagged_clamps_into_range() {
        let high = ScoreComponent::flagged(ComponentLabel::Color, 12.0, SuggestionCategory::Light);
        assert_eq!(high.value, MAX_SCORE);
        let low = ScoreComponent::flagged(ComponentLabel::Color, -1.0, SuggestionCategory::Dark);
        assert_eq!(low.value, MIN_SCORE);
        assert_eq!(low.category(), Some(SuggestionCategory::Dark));
    }

    #[test]
    fn suggestion_carries_its_category() {
        let suggestion = Suggestion::new(SuggestionCategory::TextEmpty);
        assert_eq!(suggestion.category, SuggestionCategory::TextEmpty);
        assert!(suggestion.message.starts_with("No text was detected"));
    }

    #[test]
    fn category_serializes_as_tag() {
        let json = serde_json::to_string(&SuggestionCategory::TextHeavy).unwrap();
        assert_eq!(json, "\"text-heavy\"");
        assert_eq!(SuggestionCategory::TextHeavy.to_string(), "text-heavy");
        assert_eq!(Verdict::NeedsImprovement.to_string(), "needs-improvement");
    }
}
