use crate::sample::SampledRgbSoA;
use rand::Rng;
use rgb::RGB8;
use serde::Serialize;
use tracing::debug;

pub mod lloyds;
pub mod plus_plus_init;

// References:
// - https://scikit-learn.org/stable/modules/generated/sklearn.cluster.KMeans.html
// - Noisy, Greedy and Not so Greedy k-Means++ (A. Bhattacharya et al)
//   https://drops.dagstuhl.de/storage/00lipics/lipics-vol173-esa2020/LIPIcs.ESA.2020.18/LIPIcs.ESA.2020.18.pdf

pub const MAX_CLUSTERS: usize = 5;
pub const DEFAULT_CLUSTERS: usize = MAX_CLUSTERS;
// sklearn KMeans default
pub const DEFAULT_MAX_ITERATIONS: usize = 300;

/// One palette entry: the rounded mean color of a cluster and how many sampled
/// pixels were assigned to it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct ColorCluster {
    pub centroid: RGB8,
    pub count: u32,
}

impl ColorCluster {
    /// Average of the three channels.
    pub fn mean_intensity(&self) -> f32 {
        let RGB8 { r, g, b } = self.centroid;
        (r as u16 + g as u16 + b as u16) as f32 / 3.0
    }

    pub fn hex(&self) -> String {
        let RGB8 { r, g, b } = self.centroid;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

#[inline(always)]
fn to_channel(value: f32) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Partition the sample into at most `k` color clusters.
///
/// `k` is clamped to `1..=MAX_CLUSTERS` and reduced further to the number of
/// distinct colors in the sample, so no cluster starts out empty. Clusters
/// are returned in initialization order and their counts sum to the sample
/// size.
pub fn find_clusters(
    rng: &mut impl Rng,
    sample: &SampledRgbSoA,
    k: usize,
    max_iterations: usize,
) -> Vec<ColorCluster> {
    assert!(!sample.is_empty());

    let requested = k.clamp(1, MAX_CLUSTERS);
    let distinct = sample.distinct_colors();
    let k = requested.min(distinct);
    if k < requested {
        debug!(requested, distinct, "reducing cluster count to distinct colors");
    }

    let result = lloyds::find_centroids(rng, sample, k, max_iterations);
    debug!(
        k,
        iterations = result.iterations,
        converged = result.converged,
        "lloyds loop finished"
    );

    palette(&result)
}

/// Round the centroids to colors, dropping clusters no point ended up in.
fn palette(result: &lloyds::LloydsResult) -> Vec<ColorCluster> {
    result
        .centroids
        .iter()
        .zip(result.counts.iter())
        .filter(|&(_, &count)| count > 0)
        .map(|(&[r, g, b], &count)| ColorCluster {
            centroid: RGB8::new(to_channel(r), to_channel(g), to_channel(b)),
            count,
        })
        .collect()
}
