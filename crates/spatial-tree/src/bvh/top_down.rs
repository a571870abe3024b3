//! Top-down BVH construction by recursive range partitioning.

use nalgebra::Point3;

use super::node::BvhNode;
use crate::{BoundingVolume, BvhConfig, SceneObject, SplitMethod};

/// Per-object working entry; partitioning reorders these in place.
struct Entry {
    object: usize,
    bounds: BoundingVolume,
    center: Point3<f32>,
}

pub(super) fn build(
    objects: &[SceneObject],
    config: &BvhConfig,
    method: SplitMethod,
) -> Option<BvhNode> {
    if objects.is_empty() {
        return None;
    }

    let mut entries: Vec<Entry> = objects
        .iter()
        .enumerate()
        .map(|(object, scene_object)| {
            let bounds = scene_object.world_bounds();
            Entry {
                object,
                bounds,
                center: bounds.center(),
            }
        })
        .collect();

    Some(build_range(&mut entries, 0, config, method))
}

fn build_range(
    entries: &mut [Entry],
    depth: usize,
    config: &BvhConfig,
    method: SplitMethod,
) -> BvhNode {
    let bounds = union_bounds(entries);

    if entries.len() <= config.leaf_threshold.max(1) || depth >= config.max_depth {
        return BvhNode::Leaf {
            bounds,
            objects: entries.iter().map(|e| e.object).collect(),
        };
    }

    // Two objects split directly, no strategy involved.
    let split = if entries.len() == 2 {
        1
    } else {
        let axis = widest_center_axis(entries);
        match method {
            SplitMethod::MedianCenter => split_median_center(entries, axis),
            SplitMethod::MedianExtent => split_median_extent(entries, axis),
            SplitMethod::EvenSplits(k) => split_even_steps(entries, axis, k),
        }
    };

    let (left_entries, right_entries) = entries.split_at_mut(split);
    BvhNode::Internal {
        bounds,
        left: Box::new(build_range(left_entries, depth + 1, config, method)),
        right: Box::new(build_range(right_entries, depth + 1, config, method)),
    }
}

fn union_bounds(entries: &[Entry]) -> BoundingVolume {
    let mut bounds = entries[0].bounds;
    for entry in &entries[1..] {
        bounds = bounds.union(&entry.bounds);
    }
    bounds
}

/// The axis along which the BV centers spread the most.
fn widest_center_axis(entries: &[Entry]) -> usize {
    let mut best_axis = 0;
    let mut best_spread = f32::NEG_INFINITY;

    for axis in 0..3 {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for entry in entries {
            min = min.min(entry.center[axis]);
            max = max.max(entry.center[axis]);
        }
        let spread = max - min;
        if spread > best_spread {
            best_spread = spread;
            best_axis = axis;
        }
    }

    best_axis
}

/// Partial sort by center coordinate, cut at the midpoint index. Yields the
/// (⌈n/2⌉, ⌊n/2⌋) split unconditionally.
fn split_median_center(entries: &mut [Entry], axis: usize) -> usize {
    let mid = entries.len().div_ceil(2);
    entries.select_nth_unstable_by(mid, |a, b| {
        a.center[axis].total_cmp(&b.center[axis])
    });
    mid
}

/// Pivot on the median of the 2n per-object min/max extents on the axis,
/// partition by center <= pivot. A pivot that degenerates to one side falls
/// back to an (n - 1, 1) split.
fn split_median_extent(entries: &mut [Entry], axis: usize) -> usize {
    let mut extents = Vec::with_capacity(entries.len() * 2);
    for entry in entries.iter() {
        let (min, max) = entry.bounds.extent_on_axis(axis);
        extents.push(min);
        extents.push(max);
    }
    extents.sort_unstable_by(f32::total_cmp);
    let pivot = extents[extents.len() / 2];

    let split = partition_by_center(entries, axis, pivot);
    if split == 0 || split == entries.len() {
        // Every center landed on one side; peel a single object off.
        entries.len() - 1
    } else {
        split
    }
}

/// Scan K evenly spaced thresholds across the center range and keep the one
/// whose partition counts come closest to an even (n/2, n/2) split. Falls
/// back to the midpoint index when every candidate is degenerate.
fn split_even_steps(entries: &mut [Entry], axis: usize, k: usize) -> usize {
    let steps = k.max(2);
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for entry in entries.iter() {
        min = min.min(entry.center[axis]);
        max = max.max(entry.center[axis]);
    }

    let ideal = entries.len() / 2;
    let mut best: Option<(usize, f32)> = None;

    for step in 1..steps {
        let threshold = min + (max - min) * (step as f32 / steps as f32);
        let left = entries
            .iter()
            .filter(|e| e.center[axis] <= threshold)
            .count();
        if left == 0 || left == entries.len() {
            continue;
        }

        let imbalance = left.abs_diff(ideal);
        if best.is_none_or(|(best_imbalance, _)| imbalance < best_imbalance) {
            best = Some((imbalance, threshold));
        }
    }

    match best {
        Some((_, threshold)) => partition_by_center(entries, axis, threshold),
        None => {
            // Degenerate clustering: accept the midpoint split instead.
            split_median_center(entries, axis)
        }
    }
}

/// In-place partition: entries with center <= pivot first. Returns the index
/// of the first right-side entry.
fn partition_by_center(entries: &mut [Entry], axis: usize, pivot: f32) -> usize {
    let mut split = 0;
    for i in 0..entries.len() {
        if entries[i].center[axis] <= pivot {
            entries.swap(i, split);
            split += 1;
        }
    }
    split
}
