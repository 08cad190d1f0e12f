//! A library to extract a dominant color and a set of swatches from raw pixel data.
//!
//! The swatch categories follow the ones in the Palette library in Android Jetpack: vibrant and muted colors, each in a
//! light, normal and dark variant. The colors are found by clustering the opaque pixels of an image with k-means and
//! sorting each cluster center into a category by its saturation and lightness.
//!
//! ```
//! use swatches::{PaletteBuilder, Rgb};
//!
//! let pixels = [255, 0, 0].repeat(16);
//! let palette = PaletteBuilder::from_rgb(&pixels).cluster_count(1).generate();
//!
//! assert_eq!(palette.dominant_color(), Some(Rgb::new(255, 0, 0)));
//! assert_eq!(palette.vibrant_color(), Some(Rgb::new(255, 0, 0)));
//! assert_eq!(palette.muted_color(), None);
//! ```

pub mod kmeans;
mod rgb;
pub mod sampler;
mod swatch;
mod target;

pub const DEFAULT_CLUSTER_COUNT: usize = 8;

pub use crate::{
    kmeans::DEFAULT_ITERATIONS,
    rgb::{Hsl, ParseRgbError, Rgb},
    sampler::{PixelLayout, ALPHA_THRESHOLD},
    swatch::Swatch,
    target::Target,
};
pub use palette;
pub use rand;

use kmeans::KMeans;
use rand::Rng;
use std::collections::HashMap;
use tracing::debug;

/// The extracted colors of an image.
///
/// A category no cluster center fell into has no swatch. When several centers fall into the same category, the one
/// with the highest cluster index is kept.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    centers: Vec<Rgb>,
    selected_swatches: HashMap<Target, Swatch>,
    dominant_swatch: Option<Swatch>,
}

/// The fixed-shape result of an extraction: the dominant color and one color per swatch category.
///
/// Every field defaults to black. A category that no cluster center fell into, as well as every field of an
/// extraction that had no opaque pixels to work with, is left at that default. Use [`Palette`] to tell an unassigned
/// category apart from an actual black swatch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swatches {
    pub dominant: Rgb,
    pub vibrant: Rgb,
    pub light_vibrant: Rgb,
    pub dark_vibrant: Rgb,
    pub muted: Rgb,
    pub light_muted: Rgb,
    pub dark_muted: Rgb,
}

pub struct PaletteBuilder<'a> {
    data: &'a [u8],
    layout: PixelLayout,
    cluster_count: usize,
    iterations: usize,
}

/// Extract the dominant color and the swatches from a raw RGB or RGBA buffer using `k` clusters.
///
/// Cluster centers are seeded from the thread-local random generator, so repeated calls may give different results.
/// Use [`PaletteBuilder::generate_with_rng`] for reproducible output.
pub fn extract_swatches(data: &[u8], has_alpha: bool, k: usize) -> Swatches {
    PaletteBuilder::from_bytes(data, has_alpha)
        .cluster_count(k)
        .generate()
        .to_swatches()
}

impl Palette {
    /// A palette with no colors at all.
    pub fn empty() -> Palette {
        Self::default()
    }

    pub fn from_bytes<'a>(data: &'a [u8], has_alpha: bool) -> PaletteBuilder<'a> {
        PaletteBuilder::from_bytes(data, has_alpha)
    }

    /// Build a palette from already computed cluster centers and the samples they were computed from.
    pub fn from_centers(centers: Vec<Rgb>, samples: &[Rgb]) -> Palette {
        let mut selected_swatches = HashMap::new();

        for center in &centers {
            // later centers overwrite earlier ones in the same category
            selected_swatches.insert(Target::classify(center.hsl()), Swatch::new(*center, 0));
        }

        count_swatch_populations(&mut selected_swatches, samples);

        let dominant_swatch = select_dominant_swatch(&centers, samples);

        Self {
            centers,
            selected_swatches,
            dominant_swatch,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// The cluster centers in cluster index order.
    pub fn centers(&self) -> &[Rgb] {
        &self.centers
    }

    /// The selected swatches ordered by [`Target::ALL`].
    pub fn swatches(&self) -> Vec<(Target, Swatch)> {
        Target::ALL
            .iter()
            .filter_map(|target| self.swatch_for_target(*target).map(|swatch| (*target, swatch)))
            .collect()
    }

    pub fn swatch_for_target(&self, target: Target) -> Option<Swatch> {
        self.selected_swatches.get(&target).copied()
    }

    pub fn color_for_target(&self, target: Target) -> Option<Rgb> {
        self.swatch_for_target(target).map(|swatch| swatch.rgb())
    }

    /// The cluster center the most samples are nearest to. Its population is that number of samples.
    pub fn dominant_swatch(&self) -> Option<Swatch> {
        self.dominant_swatch
    }

    pub fn dominant_color(&self) -> Option<Rgb> {
        self.dominant_swatch.map(|swatch| swatch.rgb())
    }

    pub fn light_vibrant_swatch(&self) -> Option<Swatch> {
        self.swatch_for_target(Target::LightVibrant)
    }

    pub fn vibrant_swatch(&self) -> Option<Swatch> {
        self.swatch_for_target(Target::Vibrant)
    }

    pub fn dark_vibrant_swatch(&self) -> Option<Swatch> {
        self.swatch_for_target(Target::DarkVibrant)
    }

    pub fn light_muted_swatch(&self) -> Option<Swatch> {
        self.swatch_for_target(Target::LightMuted)
    }

    pub fn muted_swatch(&self) -> Option<Swatch> {
        self.swatch_for_target(Target::Muted)
    }

    pub fn dark_muted_swatch(&self) -> Option<Swatch> {
        self.swatch_for_target(Target::DarkMuted)
    }

    pub fn light_vibrant_color(&self) -> Option<Rgb> {
        self.color_for_target(Target::LightVibrant)
    }

    pub fn vibrant_color(&self) -> Option<Rgb> {
        self.color_for_target(Target::Vibrant)
    }

    pub fn dark_vibrant_color(&self) -> Option<Rgb> {
        self.color_for_target(Target::DarkVibrant)
    }

    pub fn light_muted_color(&self) -> Option<Rgb> {
        self.color_for_target(Target::LightMuted)
    }

    pub fn muted_color(&self) -> Option<Rgb> {
        self.color_for_target(Target::Muted)
    }

    pub fn dark_muted_color(&self) -> Option<Rgb> {
        self.color_for_target(Target::DarkMuted)
    }

    /// Flatten the palette into the fixed-shape record, filling missing colors with black.
    pub fn to_swatches(&self) -> Swatches {
        let color = |target| self.color_for_target(target).unwrap_or_default();

        Swatches {
            dominant: self.dominant_color().unwrap_or_default(),
            vibrant: color(Target::Vibrant),
            light_vibrant: color(Target::LightVibrant),
            dark_vibrant: color(Target::DarkVibrant),
            muted: color(Target::Muted),
            light_muted: color(Target::LightMuted),
            dark_muted: color(Target::DarkMuted),
        }
    }
}

impl From<&Palette> for Swatches {
    fn from(palette: &Palette) -> Self {
        palette.to_swatches()
    }
}

impl Swatches {
    pub fn get(&self, target: Target) -> Rgb {
        match target {
            Target::LightVibrant => self.light_vibrant,
            Target::Vibrant => self.vibrant,
            Target::DarkVibrant => self.dark_vibrant,
            Target::LightMuted => self.light_muted,
            Target::Muted => self.muted,
            Target::DarkMuted => self.dark_muted,
        }
    }
}

impl<'a> PaletteBuilder<'a> {
    pub fn from_bytes(data: &'a [u8], has_alpha: bool) -> Self {
        Self::with_layout(data, PixelLayout::from_alpha(has_alpha))
    }

    pub fn from_rgb(data: &'a [u8]) -> Self {
        Self::with_layout(data, PixelLayout::Rgb)
    }

    pub fn from_rgba(data: &'a [u8]) -> Self {
        Self::with_layout(data, PixelLayout::Rgba)
    }

    pub fn with_layout(data: &'a [u8], layout: PixelLayout) -> Self {
        Self {
            data,
            layout,
            cluster_count: DEFAULT_CLUSTER_COUNT,
            iterations: DEFAULT_ITERATIONS,
        }
    }

    pub fn cluster_count(self, cluster_count: usize) -> Self {
        Self { cluster_count, ..self }
    }

    pub fn iterations(self, iterations: usize) -> Self {
        Self { iterations, ..self }
    }

    pub fn generate(self) -> Palette {
        self.generate_with_rng(&mut rand::thread_rng())
    }

    /// Generate the palette, drawing the initial cluster centers from the given random generator.
    pub fn generate_with_rng<R>(self, rng: &mut R) -> Palette
    where
        R: Rng + ?Sized,
    {
        let samples = sampler::sample_pixels(self.data, self.layout);

        debug!(
            bytes = self.data.len(),
            samples = samples.len(),
            clusters = self.cluster_count,
            "sampled pixels"
        );

        let Some(kmeans) = KMeans::new(&samples, self.cluster_count) else {
            debug!("nothing to cluster, returning an empty palette");
            return Palette::empty();
        };

        let centers = kmeans.iterations(self.iterations).cluster(rng);
        let palette = Palette::from_centers(centers, &samples);

        debug!(dominant = ?palette.dominant_color(), swatches = palette.selected_swatches.len(), "generated palette");
        palette
    }
}

fn count_swatch_populations(selected_swatches: &mut HashMap<Target, Swatch>, samples: &[Rgb]) {
    // candidates are scanned by category name, so an equally distant sample goes to the alphabetically first one
    let mut candidates: Vec<(Target, Rgb)> = selected_swatches
        .iter()
        .map(|(target, swatch)| (*target, swatch.rgb()))
        .collect();
    candidates.sort_by_key(|(target, _)| target.name());

    if candidates.is_empty() {
        return;
    }

    let colors: Vec<Rgb> = candidates.iter().map(|(_, color)| *color).collect();
    let mut populations = vec![0; candidates.len()];

    for &sample in samples {
        populations[kmeans::nearest_center(sample, &colors)] += 1;
    }

    for ((target, color), population) in candidates.into_iter().zip(populations) {
        selected_swatches.insert(target, Swatch::new(color, population));
    }
}

fn select_dominant_swatch(centers: &[Rgb], samples: &[Rgb]) -> Option<Swatch> {
    let first = *centers.first()?;
    let mut dominant = Swatch::new(first, 0);

    // strictly greater, so ties go to the lowest center index
    for (color, count) in centers.iter().zip(kmeans::population_tally(samples, centers)) {
        if count > dominant.population() {
            dominant = Swatch::new(*color, count);
        }
    }

    Some(dominant)
}
