use std::collections::hash_map::Entry;
use std::collections::HashMap;

use rgb::RGBA8;

use crate::palette::packed;

/// One leaf of the cut tree: its mean color and the distinct-color ids it
/// absorbed.
struct Leaf {
    representative: RGBA8,
    members: Vec<usize>,
}

/// Recursive median-cut quantization.
///
/// Splits the distinct color population `round(log2(count))` times along the
/// channel axis with the widest range, then replaces each leaf bucket with
/// its component-wise mean. The output palette always holds exactly
/// `2^round(log2(count))` entries; leaves that happen to produce identical
/// means keep separate slots, and slots beyond the number of reachable
/// leaves are padded with transparent black.
///
/// Determinism comes from stable sorting, the fixed red-over-green-over-blue
/// axis tie-break, and first-seen distinct-color ordering.
pub fn median_cut(colors: &[RGBA8], count: usize) -> (Vec<RGBA8>, Vec<usize>) {
    // Distinct colors in first-seen order, each remembering the pixel
    // positions it came from.
    let mut seen: HashMap<u32, usize> = HashMap::new();
    let mut distinct: Vec<RGBA8> = Vec::new();
    let mut pixel_positions: Vec<Vec<usize>> = Vec::new();

    for (i, &color) in colors.iter().enumerate() {
        match seen.entry(packed(color)) {
            Entry::Occupied(slot) => pixel_positions[*slot.get()].push(i),
            Entry::Vacant(slot) => {
                slot.insert(distinct.len());
                distinct.push(color);
                pixel_positions.push(vec![i]);
            }
        }
    }

    let depth = (count as f64).log2().round() as u32;
    let target = 1usize << depth;

    let mut leaves = Vec::with_capacity(target);
    let bucket: Vec<(RGBA8, usize)> = distinct.into_iter().enumerate().map(|(id, c)| (c, id)).collect();
    split(bucket, depth, &mut leaves);

    let mut palette: Vec<RGBA8> = leaves.iter().map(|leaf| leaf.representative).collect();
    palette.resize(target, RGBA8::new(0, 0, 0, 0));

    let mut mapping = vec![0usize; colors.len()];
    for (slot, leaf) in leaves.iter().enumerate() {
        for &id in &leaf.members {
            for &pixel in &pixel_positions[id] {
                mapping[pixel] = slot;
            }
        }
    }

    (palette, mapping)
}

fn split(mut bucket: Vec<(RGBA8, usize)>, depth: u32, leaves: &mut Vec<Leaf>) {
    if bucket.is_empty() {
        return;
    }

    if depth == 0 {
        leaves.push(collapse(bucket));
        return;
    }

    let (r_range, g_range, b_range) = channel_ranges(&bucket);

    // Widest axis wins; red beats green beats blue on ties. Stable sorts
    // keep equal-valued colors in first-seen order.
    if r_range >= g_range && r_range >= b_range {
        bucket.sort_by_key(|(color, _)| color.r);
    } else if g_range >= b_range {
        bucket.sort_by_key(|(color, _)| color.g);
    } else {
        bucket.sort_by_key(|(color, _)| color.b);
    }

    let split_at = (bucket.len() / 2 + 1).min(bucket.len());
    let right = bucket.split_off(split_at);

    split(bucket, depth - 1, leaves);
    split(right, depth - 1, leaves);
}

/// Reduce a leaf bucket to its integer mean. Alpha collapses to fully
/// opaque if any member was visible at all, else fully transparent.
fn collapse(bucket: Vec<(RGBA8, usize)>) -> Leaf {
    let mut r_sum = 0usize;
    let mut g_sum = 0usize;
    let mut b_sum = 0usize;
    let mut any_visible = false;

    for (color, _) in &bucket {
        r_sum += color.r as usize;
        g_sum += color.g as usize;
        b_sum += color.b as usize;
        any_visible |= color.a != 0;
    }

    let n = bucket.len();
    let representative = RGBA8::new(
        (r_sum / n) as u8,
        (g_sum / n) as u8,
        (b_sum / n) as u8,
        if any_visible { 255 } else { 0 },
    );

    Leaf {
        representative,
        members: bucket.into_iter().map(|(_, id)| id).collect(),
    }
}

fn channel_ranges(bucket: &[(RGBA8, usize)]) -> (u8, u8, u8) {
    let mut r = (u8::MAX, u8::MIN);
    let mut g = (u8::MAX, u8::MIN);
    let mut b = (u8::MAX, u8::MIN);

    for (color, _) in bucket {
        r = (r.0.min(color.r), r.1.max(color.r));
        g = (g.0.min(color.g), g.1.max(color.g));
        b = (b.0.min(color.b), b.1.max(color.b));
    }

    (r.1 - r.0, g.1 - g.0, b.1 - b.0)
}
