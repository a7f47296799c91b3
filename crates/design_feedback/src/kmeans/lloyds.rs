use super::MAX_CLUSTERS;
use super::plus_plus_init::find_initial;
use crate::sample::SampledRgbSoA;
use rand::Rng;

// Marks a point that has not been assigned yet, so the first pass always
// counts as a change.
const UNASSIGNED: u8 = u8::MAX;

#[derive(Debug, Copy, Clone)]
pub struct CentroidSoA {
    pub k: usize,
    pub r: [f32; MAX_CLUSTERS],
    pub g: [f32; MAX_CLUSTERS],
    pub b: [f32; MAX_CLUSTERS],
}

impl CentroidSoA {
    /// No centroids yet. Unused slots sit at `f32::MAX`, out of reach of any
    /// sample point.
    pub fn empty() -> Self {
        Self {
            k: 0,
            r: [f32::MAX; MAX_CLUSTERS],
            g: [f32::MAX; MAX_CLUSTERS],
            b: [f32::MAX; MAX_CLUSTERS],
        }
    }

    pub fn push(&mut self, [r, g, b]: [f32; 3]) {
        assert!(self.k < MAX_CLUSTERS);
        self.r[self.k] = r;
        self.g[self.k] = g;
        self.b[self.k] = b;
        self.k += 1;
    }

    #[inline(always)]
    pub fn color(&self, j: usize) -> [f32; 3] {
        [self.r[j], self.g[j], self.b[j]]
    }

    #[inline(always)]
    fn set(&mut self, j: usize, [r, g, b]: [f32; 3]) {
        self.r[j] = r;
        self.g[j] = g;
        self.b[j] = b;
    }
}

#[inline(always)]
pub fn squared_distance(c_r: f32, c_g: f32, c_b: f32, r: f32, g: f32, b: f32) -> f32 {
    let dr = c_r - r;
    let dg = c_g - g;
    let db = c_b - b;

    dr.mul_add(dr, dg.mul_add(dg, db * db))
}

/// Assign every point to its nearest centroid; ties go to the lower index.
///
/// Returns how many assignments changed.
#[inline]
pub fn assign_points(
    sample: &SampledRgbSoA,
    centroids: &CentroidSoA,
    assignments: &mut [u8],
) -> usize {
    let mut changed = 0;

    for (i, assignment) in assignments.iter_mut().enumerate() {
        let mut min = f32::MAX;
        let mut min_idx = 0;
        for j in 0..centroids.k {
            let d = squared_distance(
                centroids.r[j],
                centroids.g[j],
                centroids.b[j],
                sample.r[i],
                sample.g[i],
                sample.b[i],
            );
            if d < min {
                min = d;
                min_idx = j;
            }
        }

        let min_idx = min_idx as u8;
        if *assignment != min_idx {
            *assignment = min_idx;
            changed += 1;
        }
    }

    changed
}

#[derive(Debug)]
pub struct UpdateResult {
    pub counts: [u32; MAX_CLUSTERS],
}

/// Move each centroid to the mean of its points. Centroids of empty clusters
/// stay where they are.
#[inline]
pub fn update_centroids(
    sample: &SampledRgbSoA,
    assignments: &[u8],
    centroids: &mut CentroidSoA,
) -> UpdateResult {
    let mut counts = [0u32; MAX_CLUSTERS];
    let mut sums_r = [0f32; MAX_CLUSTERS];
    let mut sums_g = [0f32; MAX_CLUSTERS];
    let mut sums_b = [0f32; MAX_CLUSTERS];

    // Accumulation stays sequential so the rounding is the same on every run
    for (i, assigned_c) in assignments.iter().copied().enumerate() {
        assert!((assigned_c as usize) < centroids.k);

        let assigned_c = assigned_c as usize;
        counts[assigned_c] += 1;
        sums_r[assigned_c] += sample.r[i];
        sums_g[assigned_c] += sample.g[i];
        sums_b[assigned_c] += sample.b[i];
    }

    for i in 0..centroids.k {
        if counts[i] == 0 {
            continue;
        }

        centroids.r[i] = sums_r[i] / counts[i] as f32;
        centroids.g[i] = sums_g[i] / counts[i] as f32;
        centroids.b[i] = sums_b[i] / counts[i] as f32;
    }

    UpdateResult { counts }
}

#[derive(Debug)]
pub struct LloydsResult {
    /// Unrounded centroids, in initialization order.
    pub centroids: Vec<[f32; 3]>,
    pub counts: Vec<u32>,
    pub iterations: usize,
    pub converged: bool,
}

pub fn find_centroids(
    rng: &mut impl Rng,
    sample: &SampledRgbSoA,
    k: usize,
    max_iterations: usize,
) -> LloydsResult {
    assert!(k >= 1);
    assert!(k <= MAX_CLUSTERS);

    let centroids = find_initial(rng, sample, k);
    refine(rng, sample, centroids, max_iterations)
}

/// Lloyd's iterations from the given starting centroids. Stops when no
/// assignment changes or after `max_iterations` rounds (at least one).
pub fn refine(
    rng: &mut impl Rng,
    sample: &SampledRgbSoA,
    mut centroids: CentroidSoA,
    max_iterations: usize,
) -> LloydsResult {
    let n = sample.len();
    let k = centroids.k;
    assert!(n > 0);
    assert!(k >= 1);
    assert_eq!(sample.g.len(), n);
    assert_eq!(sample.b.len(), n);

    let mut assignments = vec![UNASSIGNED; n];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iterations.max(1) {
        iterations += 1;

        if assign_points(sample, &centroids, &mut assignments) == 0 {
            converged = true;
            break;
        }

        let update_result = update_centroids(sample, &assignments, &mut centroids);

        // Empty cluster reassignment
        for (j, count) in update_result.counts.iter().copied().take(k).enumerate() {
            if count == 0 {
                let random_point = rng.random_range(0..n);
                centroids.set(j, sample.color(random_point));
            }
        }
    }

    let mut counts = vec![0u32; k];
    for &assigned_c in &assignments {
        counts[assigned_c as usize] += 1;
    }

    LloydsResult {
        centroids: (0..k).map(|j| centroids.color(j)).collect(),
        counts,
        iterations,
        converged,
    }
}
