use std::collections::hash_map::Entry;
use std::collections::HashMap;

use rgb::RGBA8;

/// Pack the four channels into one integer for hashing and set membership.
pub(crate) fn packed(color: RGBA8) -> u32 {
    (color.r as u32) << 24 | (color.g as u32) << 16 | (color.b as u32) << 8 | color.a as u32
}

/// Squared distance between two colors across all four channels.
pub(crate) fn distance_sq(a: RGBA8, b: RGBA8) -> u32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    let da = a.a as i32 - b.a as i32;
    (dr * dr + dg * dg + db * db + da * da) as u32
}

/// An ordered set of distinct palette entries.
///
/// Entries keep first-insertion order; lookup is backed by a map keyed on
/// the packed channel quad.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    entries: Vec<RGBA8>,
    lookup: HashMap<u32, usize>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            lookup: HashMap::with_capacity(capacity),
        }
    }

    /// The index of `color`, appending it on first sight.
    pub fn intern(&mut self, color: RGBA8) -> usize {
        match self.lookup.entry(packed(color)) {
            Entry::Occupied(slot) => *slot.get(),
            Entry::Vacant(slot) => {
                let index = self.entries.len();
                self.entries.push(color);
                slot.insert(index);
                index
            }
        }
    }

    pub fn index_of(&self, color: RGBA8) -> Option<usize> {
        self.lookup.get(&packed(color)).copied()
    }

    pub fn entries(&self) -> &[RGBA8] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<RGBA8> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry with the least channel-space distance to `color`.
    /// Equidistant entries resolve to the lowest index.
    pub fn nearest(&self, color: RGBA8) -> usize {
        let mut best = 0;
        let mut best_dist = u32::MAX;
        for (index, &entry) in self.entries.iter().enumerate() {
            let dist = distance_sq(color, entry);
            if dist < best_dist {
                best_dist = dist;
                best = index;
            }
        }
        best
    }
}
