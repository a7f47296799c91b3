use super::MAX_CLUSTERS;
use crate::kmeans::lloyds::{CentroidSoA, squared_distance};
use crate::sample::SampledRgbSoA;
use rand::Rng;
use std::array;

// Scikit uses (2+log(k)), which is 3 or 4 for k=1..5, we can settle on 3
const N_CANDIDATES: usize = 3;

/// Pick an index with probability proportional to its distance. Points that
/// coincide with an already chosen centroid (distance 0) are never picked
/// while any other point is left.
#[inline(always)]
fn sample_by_distance(rng: &mut impl Rng, nearest: &[f32], total: f32) -> usize {
    let threshold = rng.random::<f32>() * total;
    let mut cumsum = 0.0;

    if let Some(i) = nearest.iter().position(|&d| {
        cumsum += d;
        cumsum > threshold
    }) {
        return i;
    }

    // Float error can leave the threshold out of reach
    nearest
        .iter()
        .rposition(|&d| d > 0.0)
        .unwrap_or(nearest.len() - 1)
}

/// Distances to the nearest centroid once `color` joins the set, written to
/// `out`. Returns their sum (the potential of that choice).
fn with_centroid(
    sample: &SampledRgbSoA,
    color: [f32; 3],
    nearest: &[f32],
    out: &mut [f32],
) -> f32 {
    let [c_r, c_g, c_b] = color;
    let mut potential = 0.0f32;

    for (i, (slot, &current)) in out.iter_mut().zip(nearest).enumerate() {
        let [r, g, b] = sample.color(i);
        let d = squared_distance(c_r, c_g, c_b, r, g, b).min(current);
        *slot = d;
        potential += d;
    }

    potential
}

/// Greedy k-means++ seeding: each step draws a few candidates by distance and
/// keeps the one that lowers the total distance the most.
///
/// `k` is clamped to the sample size and to `MAX_CLUSTERS`. Centroids are in
/// the order they were chosen.
pub fn find_initial(rng: &mut impl Rng, sample: &SampledRgbSoA, k: usize) -> CentroidSoA {
    let n = sample.len();
    assert!(n > 0);
    assert_eq!(sample.g.len(), n);
    assert_eq!(sample.b.len(), n);

    let k = k.min(n).min(MAX_CLUSTERS);

    let mut centroids = CentroidSoA::empty();
    let first = sample.color(rng.random_range(0..n));
    centroids.push(first);

    let mut scratch: [Vec<f32>; N_CANDIDATES] = array::from_fn(|_| vec![0.0f32; n]);
    let mut nearest = vec![f32::INFINITY; n];
    let mut total = with_centroid(sample, first, &nearest, &mut scratch[0]);
    std::mem::swap(&mut nearest, &mut scratch[0]);

    while centroids.k < k {
        let candidates: [usize; N_CANDIDATES] =
            array::from_fn(|_| sample_by_distance(rng, &nearest, total));

        let mut best = 0;
        let mut best_potential = f32::INFINITY;
        for (j, (&candidate, out)) in candidates.iter().zip(scratch.iter_mut()).enumerate() {
            let potential = with_centroid(sample, sample.color(candidate), &nearest, out);
            if potential < best_potential {
                best_potential = potential;
                best = j;
            }
        }

        std::mem::swap(&mut nearest, &mut scratch[best]);
        total = best_potential;
        centroids.push(sample.color(candidates[best]));
    }

    centroids
}
