use crate::kmeans::ColorCluster;
use crate::score::{ComponentLabel, ScoreComponent, SuggestionCategory};
use serde::Serialize;

/// Clusters brighter than this (mean of R, G, B) count as light.
pub const LIGHT_THRESHOLD: f32 = 180.0;
/// Clusters darker than this count as dark.
pub const DARK_THRESHOLD: f32 = 75.0;
/// More light (or dark) clusters than this make the palette unbalanced.
pub const MAX_BALANCED_CLUSTERS: usize = 3;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Brightness {
    pub light: usize,
    pub dark: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorAnalysis {
    pub brightness: Brightness,
    pub component: ScoreComponent,
}

pub fn count_brightness(clusters: &[ColorCluster]) -> Brightness {
    clusters
        .iter()
        .fold(Brightness::default(), |mut acc, cluster| {
            let mean = cluster.mean_intensity();
            if mean > LIGHT_THRESHOLD {
                acc.light += 1;
            } else if mean < DARK_THRESHOLD {
                acc.dark += 1;
            }
            acc
        })
}

fn unbalanced_score(count: usize) -> f64 {
    6.0 + ((count - MAX_BALANCED_CLUSTERS) * 2).min(3) as f64
}

/// Score the palette. Too many light clusters wins over too many dark ones.
pub fn classify(clusters: &[ColorCluster]) -> ColorAnalysis {
    let brightness = count_brightness(clusters);

    let component = if brightness.light > MAX_BALANCED_CLUSTERS {
        ScoreComponent::flagged(
            ComponentLabel::Color,
            unbalanced_score(brightness.light),
            SuggestionCategory::Light,
        )
    } else if brightness.dark > MAX_BALANCED_CLUSTERS {
        ScoreComponent::flagged(
            ComponentLabel::Color,
            unbalanced_score(brightness.dark),
            SuggestionCategory::Dark,
        )
    } else {
        ScoreComponent::passing(ComponentLabel::Color)
    };

    ColorAnalysis {
        brightness,
        component,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rgb::RGB8;

    fn gray(levels: &[u8]) -> Vec<ColorCluster> {
        levels
            .iter()
            .map(|&v| ColorCluster {
                centroid: RGB8::new(v, v, v),
                count: 1,
            })
            .collect()
    }

    #[test]
    fn thresholds_are_strict() {
        // 181 is light, 180 is neither; 74 is dark, 75 is neither
        let brightness = count_brightness(&gray(&[181, 180, 75, 74]));
        assert_eq!(brightness, Brightness { light: 1, dark: 1 });
    }

    #[test]
    fn uses_channel_mean() {
        let clusters = [ColorCluster {
            centroid: RGB8::new(255, 255, 40),
            count: 1,
        }];
        // (255 + 255 + 40) / 3 = 183.3
        assert_eq!(count_brightness(&clusters).light, 1);
    }

    #[test]
    fn balanced_palette_scores_full() {
        let analysis = classify(&gray(&[255, 250, 240, 100, 0]));
        assert_eq!(analysis.brightness, Brightness { light: 3, dark: 1 });
        assert_eq!(analysis.component.value, 10.0);
        assert_eq!(analysis.component.suggestion, None);
    }

    #[test]
    fn four_light_clusters() {
        let analysis = classify(&gray(&[255, 240, 220, 200, 0]));
        assert_eq!(analysis.component.value, 8.0);
        assert_eq!(analysis.component.category(), Some(SuggestionCategory::Light));
    }

    #[test]
    fn five_light_clusters_capped() {
        let analysis = classify(&gray(&[255, 240, 220, 200, 190]));
        assert_eq!(analysis.brightness.light, 5);
        assert_eq!(analysis.component.value, 9.0);
    }

    #[test]
    fn four_dark_clusters() {
        let analysis = classify(&gray(&[0, 20, 40, 60, 255]));
        assert_eq!(analysis.brightness, Brightness { light: 1, dark: 4 });
        assert_eq!(analysis.component.value, 8.0);
        assert_eq!(analysis.component.category(), Some(SuggestionCategory::Dark));
        assert_eq!(analysis.component.label, ComponentLabel::Color);
    }

    #[test]
    fn single_cluster_is_balanced() {
        let analysis = classify(&gray(&[255]));
        assert_eq!(analysis.brightness.light, 1);
        assert_eq!(analysis.component.value, 10.0);
    }
}
