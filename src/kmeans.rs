use crate::rgb::Rgb;
use rand::Rng;
use tracing::trace;

pub const DEFAULT_ITERATIONS: usize = 10;

/// Partitions a set of color samples into `k` clusters with a fixed number of refinement passes.
///
/// Refinement never checks for convergence; it always runs the configured number of iterations, which bounds the work
/// to `iterations * samples * k` distance computations.
#[derive(Debug)]
pub struct KMeans<'a> {
    samples: &'a [Rgb],
    k: usize,
    iterations: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct ChannelSums {
    red: u64,
    green: u64,
    blue: u64,
    count: u64,
}

impl<'a> KMeans<'a> {
    /// Returns `None` when there is nothing to cluster, i.e. no samples or zero clusters.
    pub fn new(samples: &'a [Rgb], k: usize) -> Option<Self> {
        if samples.is_empty() || k == 0 {
            None
        } else {
            Some(Self {
                samples,
                k,
                iterations: DEFAULT_ITERATIONS,
            })
        }
    }

    pub fn iterations(self, iterations: usize) -> Self {
        Self { iterations, ..self }
    }

    /// Draw the initial centers, uniformly with replacement, from the samples.
    pub fn initial_centers<R>(&self, rng: &mut R) -> Vec<Rgb>
    where
        R: Rng + ?Sized,
    {
        (0..self.k)
            .map(|_| self.samples[rng.gen_range(0..self.samples.len())])
            .collect()
    }

    /// Run the refinement passes starting from the given centers. The returned centers keep the index order of the
    /// given ones.
    pub fn refine(&self, mut centers: Vec<Rgb>) -> Vec<Rgb> {
        if centers.is_empty() {
            return centers;
        }

        for iteration in 0..self.iterations {
            let mut sums = vec![ChannelSums::default(); centers.len()];

            for &sample in self.samples {
                sums[nearest_center(sample, &centers)].add(sample);
            }

            // a center nobody was assigned to collapses to black instead of keeping its previous value
            for (center, cluster) in centers.iter_mut().zip(&sums) {
                *center = cluster.mean();
            }

            trace!(
                iteration,
                empty = sums.iter().filter(|sums| sums.count == 0).count(),
                "refined cluster centers"
            );
        }

        centers
    }

    pub fn cluster<R>(&self, rng: &mut R) -> Vec<Rgb>
    where
        R: Rng + ?Sized,
    {
        self.refine(self.initial_centers(rng))
    }
}

impl ChannelSums {
    fn add(&mut self, color: Rgb) {
        self.red += color.r as u64;
        self.green += color.g as u64;
        self.blue += color.b as u64;
        self.count += 1;
    }

    fn mean(&self) -> Rgb {
        if self.count == 0 {
            return Rgb::BLACK;
        }

        // the mean of u8 values always fits in a u8
        Rgb::new(
            (self.red / self.count) as u8,
            (self.green / self.count) as u8,
            (self.blue / self.count) as u8,
        )
    }
}

/// Index of the center closest to `color`. On equal distances the lowest index wins.
///
/// `centers` must not be empty.
pub fn nearest_center(color: Rgb, centers: &[Rgb]) -> usize {
    let mut best = 0;
    let mut min_distance = u32::MAX;

    for (i, center) in centers.iter().enumerate() {
        let distance = color.distance_squared(*center);

        if distance < min_distance {
            best = i;
            min_distance = distance;
        }
    }

    best
}

/// Count how many samples are nearest to each center, by center index.
///
/// A center that repeats an earlier center's color never wins a tie against it and so always counts zero.
pub fn population_tally(samples: &[Rgb], centers: &[Rgb]) -> Vec<u32> {
    let mut tally = vec![0; centers.len()];

    if centers.is_empty() {
        return tally;
    }

    for &sample in samples {
        tally[nearest_center(sample, centers)] += 1;
    }

    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn two_tone(white: usize, black: usize) -> Vec<Rgb> {
        let mut samples = vec![Rgb::new(255, 255, 255); white];
        samples.extend(std::iter::repeat(Rgb::BLACK).take(black));
        samples
    }

    #[test]
    fn rejects_degenerate_input() {
        assert!(KMeans::new(&[], 8).is_none());
        assert!(KMeans::new(&[Rgb::BLACK], 0).is_none());
        assert!(KMeans::new(&[Rgb::BLACK], 1).is_some());
    }

    #[test]
    fn initial_centers_are_drawn_from_samples() {
        let samples = [Rgb::new(1, 2, 3), Rgb::new(4, 5, 6), Rgb::new(7, 8, 9)];
        let kmeans = KMeans::new(&samples, 16).unwrap();
        let centers = kmeans.initial_centers(&mut StdRng::seed_from_u64(7));

        assert_eq!(centers.len(), 16);
        assert!(centers.iter().all(|center| samples.contains(center)));
    }

    #[test]
    fn refinement_is_deterministic_for_fixed_centers() {
        let samples: Vec<Rgb> = (0..=255).map(|v| Rgb::new(v, 255 - v, v / 2)).collect();
        let kmeans = KMeans::new(&samples, 3).unwrap();
        let initial = vec![samples[0], samples[100], samples[200]];

        assert_eq!(kmeans.refine(initial.clone()), kmeans.refine(initial));
    }

    #[test]
    fn seeded_clustering_is_reproducible() {
        let samples: Vec<Rgb> = (0..=255).map(|v| Rgb::new(v, v / 3, 255 - v)).collect();
        let kmeans = KMeans::new(&samples, 4).unwrap();

        let first = kmeans.cluster(&mut StdRng::seed_from_u64(42));
        let second = kmeans.cluster(&mut StdRng::seed_from_u64(42));

        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
    }

    #[test]
    fn centers_are_floored_means() {
        let samples = [Rgb::new(0, 0, 0), Rgb::new(1, 3, 255)];
        let kmeans = KMeans::new(&samples, 1).unwrap().iterations(1);

        assert_eq!(kmeans.refine(vec![Rgb::new(9, 9, 9)]), vec![Rgb::new(0, 1, 127)]);
    }

    #[test]
    fn unassigned_center_becomes_black() {
        let samples = [Rgb::new(200, 200, 200), Rgb::new(210, 210, 210)];
        let kmeans = KMeans::new(&samples, 2).unwrap().iterations(1);

        // the duplicate center loses every tie to the first one
        let centers = kmeans.refine(vec![Rgb::new(205, 205, 205), Rgb::new(205, 205, 205)]);
        assert_eq!(centers, vec![Rgb::new(205, 205, 205), Rgb::BLACK]);
    }

    #[test]
    fn two_tone_settles_on_both_colors() {
        let samples = two_tone(6, 4);
        let kmeans = KMeans::new(&samples, 2).unwrap();

        let centers = kmeans.refine(vec![Rgb::new(255, 255, 255), Rgb::BLACK]);
        assert_eq!(centers, vec![Rgb::new(255, 255, 255), Rgb::BLACK]);
    }

    #[test]
    fn zero_iterations_keeps_initial_centers() {
        let samples = two_tone(1, 1);
        let kmeans = KMeans::new(&samples, 1).unwrap().iterations(0);

        assert_eq!(kmeans.refine(vec![Rgb::new(1, 2, 3)]), vec![Rgb::new(1, 2, 3)]);
    }

    #[test]
    fn more_clusters_than_samples_does_not_panic() {
        let samples = [Rgb::new(10, 20, 30)];
        let kmeans = KMeans::new(&samples, 5).unwrap();
        let centers = kmeans.cluster(&mut StdRng::seed_from_u64(1));

        assert_eq!(centers[0], Rgb::new(10, 20, 30));
        assert!(centers[1..].iter().all(|center| *center == Rgb::BLACK));
    }

    #[test]
    fn nearest_center_prefers_lowest_index_on_ties() {
        let centers = [Rgb::new(0, 0, 0), Rgb::new(20, 0, 0), Rgb::new(0, 0, 0)];

        assert_eq!(nearest_center(Rgb::new(10, 0, 0), &centers), 0);
        assert_eq!(nearest_center(Rgb::new(11, 0, 0), &centers), 1);
        assert_eq!(nearest_center(Rgb::new(0, 0, 1), &centers), 0);
    }

    #[test]
    fn tally_counts_per_center_index() {
        let centers = [Rgb::BLACK, Rgb::new(255, 255, 255)];
        let samples = [Rgb::new(250, 250, 250), Rgb::new(5, 5, 5), Rgb::new(240, 240, 240)];

        assert_eq!(population_tally(&samples, &centers), vec![1, 2]);
    }

    #[test]
    fn tally_merges_duplicate_centers_into_the_first() {
        let centers = [Rgb::new(9, 9, 9), Rgb::new(9, 9, 9)];
        let samples = [Rgb::BLACK, Rgb::new(10, 10, 10)];

        assert_eq!(population_tally(&samples, &centers), vec![2, 0]);
    }
}
