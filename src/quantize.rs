use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use log::debug;
use rgb::RGBA8;

use crate::error::RecolorError;
use crate::median_cut;
use crate::palette::{packed, Palette};

/// The closed set of palette reduction algorithms.
///
/// `Octree` and `KMeans` are declared extension seams: selecting either is
/// an explicit failure, never a silent fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantizeAlgorithm {
    Scalar,
    Populosity,
    MedianCut,
    Octree,
    KMeans,
}

impl QuantizeAlgorithm {
    pub fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Populosity => "populosity",
            Self::MedianCut => "mediancut",
            Self::Octree => "octree",
            Self::KMeans => "kmeans",
        }
    }
}

impl core::str::FromStr for QuantizeAlgorithm {
    type Err = RecolorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "scalar" => Ok(Self::Scalar),
            "populosity" => Ok(Self::Populosity),
            "mediancut" => Ok(Self::MedianCut),
            "octree" => Ok(Self::Octree),
            "kmeans" => Ok(Self::KMeans),
            other => Err(RecolorError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Reduces an arbitrary color population to at most `count` representative
/// colors plus a per-pixel index mapping.
pub struct Quantizer {
    count: usize,
}

impl Quantizer {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    /// Run the selected algorithm over `colors`.
    ///
    /// Returns the palette and one palette index per input pixel. Every
    /// implemented algorithm degrades to an identity pass (exact first-seen
    /// dedup) when the input's distinct colors already fit the target.
    pub fn quantize(
        &self,
        algorithm: QuantizeAlgorithm,
        colors: &[RGBA8],
    ) -> Result<(Vec<RGBA8>, Vec<usize>), RecolorError> {
        let (palette, mapping) = match algorithm {
            QuantizeAlgorithm::Scalar => self.scalar(colors),
            QuantizeAlgorithm::Populosity => self.populosity(colors),
            QuantizeAlgorithm::MedianCut => {
                if distinct_within(colors, self.count) {
                    self.identity(colors)
                } else {
                    median_cut::median_cut(colors, self.count)
                }
            }
            QuantizeAlgorithm::Octree | QuantizeAlgorithm::KMeans => {
                return Err(RecolorError::UnsupportedAlgorithm(algorithm.name()));
            }
        };

        debug!(
            "{}: {} pixels -> {} palette entries",
            algorithm.name(),
            colors.len(),
            palette.len()
        );
        Ok((palette, mapping))
    }

    /// Exact dedup in first-seen order. No size cap; callers only reach
    /// this when the distinct count already fits the target.
    fn identity(&self, colors: &[RGBA8]) -> (Vec<RGBA8>, Vec<usize>) {
        let mut palette = Palette::with_capacity(self.count);
        let mapping = colors.iter().map(|&color| palette.intern(color)).collect();
        (palette.into_entries(), mapping)
    }

    /// Bit-bucket truncation: red and green keep their top 3 bits, blue its
    /// top 2, alpha passes through. Bounded by construction, blind to
    /// frequency.
    fn scalar(&self, colors: &[RGBA8]) -> (Vec<RGBA8>, Vec<usize>) {
        if distinct_within(colors, self.count) {
            return self.identity(colors);
        }

        let mut palette = Palette::new();
        let mapping = colors
            .iter()
            .map(|&color| {
                let bucket = RGBA8::new(
                    color.r & 0b1110_0000,
                    color.g & 0b1110_0000,
                    color.b & 0b1100_0000,
                    color.a,
                );
                palette.intern(bucket)
            })
            .collect();

        (palette.into_entries(), mapping)
    }

    /// Frequency-ranked selection: keep the `count` most common exact
    /// colors, remap everything else to its nearest kept representative.
    fn populosity(&self, colors: &[RGBA8]) -> (Vec<RGBA8>, Vec<usize>) {
        if distinct_within(colors, self.count) {
            return self.identity(colors);
        }

        // Count exact frequencies, preserving first-seen order so the
        // stable sort below breaks frequency ties deterministically.
        let mut seen: HashMap<u32, usize> = HashMap::new();
        let mut tally: Vec<(RGBA8, usize)> = Vec::new();
        for &color in colors {
            match seen.entry(packed(color)) {
                Entry::Occupied(slot) => tally[*slot.get()].1 += 1,
                Entry::Vacant(slot) => {
                    slot.insert(tally.len());
                    tally.push((color, 1));
                }
            }
        }

        tally.sort_by(|a, b| b.1.cmp(&a.1));
        tally.truncate(self.count);

        let mut representatives = Palette::with_capacity(tally.len());
        for (color, _) in &tally {
            representatives.intern(*color);
        }

        // Nearest lookup once per distinct input color.
        let mut nearest_cache: HashMap<u32, usize> = HashMap::new();
        let mapping = colors
            .iter()
            .map(|&color| {
                *nearest_cache
                    .entry(packed(color))
                    .or_insert_with(|| representatives.nearest(color))
            })
            .collect();

        (representatives.into_entries(), mapping)
    }
}

/// Whether `colors` holds at most `limit` distinct values. Exits as soon as
/// the limit is exceeded.
fn distinct_within(colors: &[RGBA8], limit: usize) -> bool {
    let mut seen = HashSet::new();
    for &color in colors {
        seen.insert(packed(color));
        if seen.len() > limit {
            return false;
        }
    }
    true
}
