//! Bottom-up BVH construction by greedy pair merging.

use super::node::BvhNode;
use crate::{MergeHeuristics, SceneObject};

/// Only this many nearest pairs receive distance ranks; everything farther
/// shares the cutoff rank.
const NEAREST_RANK_CUTOFF: usize = 10;

pub(super) fn build(objects: &[SceneObject], heuristics: MergeHeuristics) -> Option<BvhNode> {
    debug_assert!(
        heuristics.any_enabled(),
        "bottom-up build needs at least one merge heuristic"
    );

    if objects.is_empty() {
        return None;
    }

    let mut nodes: Vec<BvhNode> = objects
        .iter()
        .enumerate()
        .map(|(object, scene_object)| BvhNode::Leaf {
            bounds: scene_object.world_bounds(),
            objects: vec![object],
        })
        .collect();

    while nodes.len() > 1 {
        let (a, b) = best_pair(&nodes, heuristics);

        // Remove the higher index first so the lower one stays valid.
        let right = nodes.swap_remove(b.max(a));
        let left = nodes.swap_remove(a.min(b));
        let bounds = left.bounds().union(right.bounds());

        nodes.push(BvhNode::Internal {
            bounds,
            left: Box::new(left),
            right: Box::new(right),
        });
    }

    nodes.pop()
}

/// Scores every node pair with each enabled heuristic, sums the per-heuristic
/// ranks and returns the pair with the lowest total.
fn best_pair(nodes: &[BvhNode], heuristics: MergeHeuristics) -> (usize, usize) {
    let mut pairs = Vec::with_capacity(nodes.len() * (nodes.len() - 1) / 2);
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            pairs.push((i, j));
        }
    }

    let mut total_ranks = vec![0usize; pairs.len()];

    if heuristics.nearest_center {
        let metric = |&(i, j): &(usize, usize)| {
            (nodes[j].bounds().center() - nodes[i].bounds().center()).norm_squared()
        };
        add_ranks(&pairs, &mut total_ranks, metric, Some(NEAREST_RANK_CUTOFF));
    }

    if heuristics.min_volume {
        let metric =
            |&(i, j): &(usize, usize)| nodes[i].bounds().union(nodes[j].bounds()).volume();
        add_ranks(&pairs, &mut total_ranks, metric, None);
    }

    if heuristics.min_volume_growth {
        let metric = |&(i, j): &(usize, usize)| {
            let merged = nodes[i].bounds().union(nodes[j].bounds());
            merged.volume() - nodes[i].bounds().volume() - nodes[j].bounds().volume()
        };
        add_ranks(&pairs, &mut total_ranks, metric, None);
    }

    let best = (0..pairs.len())
        .min_by_key(|&idx| total_ranks[idx])
        .expect("at least two nodes remain");
    pairs[best]
}

/// Ranks pairs by ascending metric and adds each pair's rank to its running
/// total. With a cutoff, pairs ranked at or beyond it all receive the cutoff
/// value.
fn add_ranks(
    pairs: &[(usize, usize)],
    total_ranks: &mut [usize],
    metric: impl Fn(&(usize, usize)) -> f32,
    cutoff: Option<usize>,
) {
    let mut order: Vec<usize> = (0..pairs.len()).collect();
    order.sort_unstable_by(|&a, &b| metric(&pairs[a]).total_cmp(&metric(&pairs[b])));

    for (rank, &pair_idx) in order.iter().enumerate() {
        let clamped = match cutoff {
            Some(cap) => rank.min(cap),
            None => rank,
        };
        total_ranks[pair_idx] += clamped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::unit_cube_mesh;
    use crate::{BoundingVolume, BvKind, Transform};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn cube_at(x: f32, y: f32, z: f32) -> SceneObject {
        let (vertices, indices) = unit_cube_mesh();
        SceneObject::new(
            Transform::from_translation(Vector3::new(x, y, z)),
            vertices,
            indices,
            BvKind::Aabb,
        )
    }

    fn assert_internal_contains_children(node: &BvhNode) {
        if let BvhNode::Internal {
            bounds,
            left,
            right,
        } = node
        {
            assert!(bounds.contains(left.bounds()));
            assert!(bounds.contains(right.bounds()));
            assert_internal_contains_children(left);
            assert_internal_contains_children(right);
        }
    }

    #[test]
    fn merges_down_to_single_root() {
        let objects: Vec<SceneObject> = (0..7)
            .map(|i| cube_at(i as f32 * 2.0, (i % 3) as f32, 0.0))
            .collect();

        let root = build(&objects, MergeHeuristics::default()).unwrap();
        assert_eq!(root.leaf_count(), objects.len());
        assert_eq!(root.object_count(), objects.len());
        assert_internal_contains_children(&root);
    }

    #[test]
    fn single_heuristic_configurations_work() {
        let objects: Vec<SceneObject> =
            (0..5).map(|i| cube_at(i as f32 * 4.0, 0.0, 0.0)).collect();

        let configs = [
            MergeHeuristics::nearest_only(),
            MergeHeuristics {
                nearest_center: false,
                min_volume: true,
                min_volume_growth: false,
            },
            MergeHeuristics {
                nearest_center: false,
                min_volume: false,
                min_volume_growth: true,
            },
        ];

        for heuristics in configs {
            let root = build(&objects, heuristics).unwrap();
            assert_eq!(root.leaf_count(), 5, "{heuristics:?}");
            assert_internal_contains_children(&root);
        }
    }

    #[test]
    fn nearest_neighbours_merge_first() {
        // Two tight clusters far apart: the first merges must stay inside a
        // cluster, so the root's children each span one cluster.
        let objects = vec![
            cube_at(0.0, 0.0, 0.0),
            cube_at(2.0, 0.0, 0.0),
            cube_at(100.0, 0.0, 0.0),
            cube_at(102.0, 0.0, 0.0),
        ];

        let root = build(&objects, MergeHeuristics::nearest_only()).unwrap();
        if let BvhNode::Internal { left, right, .. } = &root {
            let (left_min, left_max) = left.bounds().extent_on_axis(0);
            let (right_min, right_max) = right.bounds().extent_on_axis(0);
            let near_cluster_width = (left_max - left_min).min(right_max - right_min);
            // Neither child spans both clusters.
            assert!(near_cluster_width < 10.0);
        } else {
            panic!("expected internal root");
        }
    }

    #[test]
    fn two_boxes_ten_apart_root_spans_union() {
        let objects = vec![cube_at(0.0, 0.0, 0.0), cube_at(10.0, 0.0, 0.0)];
        let root = build(&objects, MergeHeuristics::nearest_only()).unwrap();

        assert_eq!(root.leaf_count(), 2);
        match root.bounds() {
            BoundingVolume::Aabb(aabb) => {
                assert_relative_eq!(aabb.min().x, -0.5, epsilon = 1e-6);
                assert_relative_eq!(aabb.max().x, 10.5, epsilon = 1e-6);
                assert_relative_eq!(aabb.min().y, -0.5, epsilon = 1e-6);
                assert_relative_eq!(aabb.max().y, 0.5, epsilon = 1e-6);
            }
            _ => panic!("expected box bounds"),
        }
    }

    #[test]
    fn single_object_is_a_lone_leaf() {
        let objects = vec![cube_at(1.0, 2.0, 3.0)];
        let root = build(&objects, MergeHeuristics::default()).unwrap();
        assert!(root.is_leaf());
    }

    #[test]
    fn empty_input_builds_nothing() {
        assert!(build(&[], MergeHeuristics::default()).is_none());
    }
}
