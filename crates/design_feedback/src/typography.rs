use crate::score::{ComponentLabel, ScoreComponent, SuggestionCategory};

/// More text blocks than this is considered text-heavy.
pub const MAX_TEXT_BLOCKS: usize = 15;
pub const NO_TEXT_SCORE: f64 = 5.0;

pub fn score(text_blocks: usize) -> ScoreComponent {
    if text_blocks > MAX_TEXT_BLOCKS {
        let excess = (text_blocks - MAX_TEXT_BLOCKS) as f64;
        ScoreComponent::flagged(
            ComponentLabel::Typography,
            6.0 + (excess * 0.5).min(3.0),
            SuggestionCategory::TextHeavy,
        )
    } else if text_blocks == 0 {
        ScoreComponent::flagged(
            ComponentLabel::Typography,
            NO_TEXT_SCORE,
            SuggestionCategory::TextEmpty,
        )
    } else {
        ScoreComponent::passing(ComponentLabel::Typography)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_text() {
        let component = score(0);
        assert_eq!(component.value, 5.0);
        assert_eq!(component.category(), Some(SuggestionCategory::TextEmpty));
        assert_eq!(component.label, ComponentLabel::Typography);
    }

    #[test]
    fn moderate_text() {
        for count in [1, 7, 15] {
            let component = score(count);
            assert_eq!(component.value, 10.0, "count {count}");
            assert_eq!(component.suggestion, None);
        }
    }

    #[test]
    fn heavy_text() {
        assert_eq!(score(16).value, 6.5);
        assert_eq!(score(17).value, 7.0);
        assert_eq!(score(20).value, 8.5);
        assert_eq!(score(21).value, 9.0);
        assert_eq!(score(500).value, 9.0);
        assert_eq!(score(16).category(), Some(SuggestionCategory::TextHeavy));
    }
}
