//! BSP tree container and auto-partitioning construction.

use log::debug;
use rand::Rng;

use super::node::BspNode;
use crate::clip::split_triangle;
use crate::visit::TriangleVisitor;
use crate::{BspConfig, Classification, SceneObject, Triangle};

/// Weight of the straddling-triangle count in the splitter score.
const STRADDLE_WEIGHT: f32 = 0.8;
/// Weight of the front/back imbalance in the splitter score.
const BALANCE_WEIGHT: f32 = 0.2;

/// A binary space partition over a scene's triangles, with arbitrary
/// (auto-partitioned) splitting planes.
///
/// Construction is O(n²) per node from the splitter search, which dominates
/// build cost; [`save_to`](Self::save_to) and [`load_from`](Self::load_from)
/// amortize it across runs.
#[derive(Debug, Clone, Default)]
pub struct BspTree {
    root: Option<BspNode>,
}

impl BspTree {
    /// Builds a tree over the world triangles of an object snapshot. An
    /// empty snapshot yields an empty tree.
    pub fn build(objects: &[SceneObject], config: &BspConfig) -> Self {
        Self::build_from_triangles(crate::object::collect_world_triangles(objects), config)
    }

    /// Builds directly from a triangle list.
    pub fn build_from_triangles(triangles: Vec<Triangle>, config: &BspConfig) -> Self {
        if triangles.is_empty() {
            return Self::default();
        }

        let input_count = triangles.len();
        let mut rng = rand::rng();
        let root = build_node(triangles, 0, config, &mut rng);

        if let Some(ref root) = root {
            debug!(
                "built BSP tree: {} input triangles, {} stored, {} nodes, depth {}",
                input_count,
                root.triangle_count(),
                root.node_count(),
                root.depth()
            );
        }

        Self { root }
    }

    /// Discards the current tree and builds a fresh one.
    pub fn rebuild(&mut self, objects: &[SceneObject], config: &BspConfig) {
        *self = Self::build(objects, config);
    }

    pub(super) fn from_root(root: Option<BspNode>) -> Self {
        Self { root }
    }

    #[inline]
    pub fn root(&self) -> Option<&BspNode> {
        self.root.as_ref()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn triangle_count(&self) -> usize {
        self.root.as_ref().map_or(0, BspNode::triangle_count)
    }

    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, BspNode::node_count)
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, BspNode::depth)
    }

    /// Visits populated nodes in pre-order: node, front subtree, back
    /// subtree. Leaves carry the payload, so this visits each leaf once with
    /// its triangles and draw color.
    pub fn traverse_preorder<V: TriangleVisitor>(&self, visitor: &mut V) {
        if let Some(ref root) = self.root {
            traverse_preorder_node(root, visitor);
        }
    }

    /// All leaf payloads in pre-order; what the round-trip of the on-disk
    /// format preserves.
    pub fn collect_leaves(&self) -> Vec<(Vec<Triangle>, [f32; 4])> {
        let mut leaves = Vec::new();
        collect_leaves_node(self.root.as_ref(), &mut leaves);
        leaves
    }
}

fn traverse_preorder_node<V: TriangleVisitor>(node: &BspNode, visitor: &mut V) {
    if !node.triangles().is_empty() {
        visitor.visit_colored(node.triangles(), node.color());
    }
    if let Some(front) = node.front() {
        traverse_preorder_node(front, visitor);
    }
    if let Some(back) = node.back() {
        traverse_preorder_node(back, visitor);
    }
}

fn collect_leaves_node(node: Option<&BspNode>, out: &mut Vec<(Vec<Triangle>, [f32; 4])>) {
    if let Some(node) = node {
        if !node.triangles().is_empty() {
            out.push((node.triangles().to_vec(), node.color()));
        }
        collect_leaves_node(node.front(), out);
        collect_leaves_node(node.back(), out);
    }
}

/// Recursively builds a node from a triangle list.
fn build_node(
    triangles: Vec<Triangle>,
    depth: usize,
    config: &BspConfig,
    rng: &mut impl Rng,
) -> Option<BspNode> {
    if triangles.is_empty() {
        return None;
    }

    if triangles.len() <= config.triangle_threshold || depth >= config.max_depth {
        return Some(BspNode::leaf(triangles, random_color(rng)));
    }

    let Some(plane) = select_partition_plane(&triangles) else {
        // All candidate planes degenerate; nothing sensible to split on.
        return Some(BspNode::leaf(triangles, random_color(rng)));
    };

    let mut front_list = Vec::new();
    let mut back_list = Vec::new();
    for triangle in &triangles {
        let split = split_triangle(triangle, &plane);
        front_list.extend(split.front);
        back_list.extend(split.back);
    }

    // No progress (e.g. everything coplanar with the splitter): stop here
    // rather than recursing on the same set forever.
    if front_list.is_empty() || back_list.is_empty() {
        return Some(BspNode::leaf(triangles, random_color(rng)));
    }

    Some(BspNode::internal(
        plane,
        build_node(front_list, depth + 1, config, rng),
        build_node(back_list, depth + 1, config, rng),
    ))
}

/// Auto-partitioning: every triangle's own plane is a candidate; the one
/// producing the fewest straddlers and the most even front/back balance
/// wins. This is the O(n²) part.
fn select_partition_plane(triangles: &[Triangle]) -> Option<crate::Plane> {
    let mut best: Option<(f32, crate::Plane)> = None;

    for (candidate_idx, candidate) in triangles.iter().enumerate() {
        let Some(plane) = candidate.plane() else {
            continue;
        };

        let mut front = 0u32;
        let mut back = 0u32;
        let mut straddling = 0u32;
        for (other_idx, other) in triangles.iter().enumerate() {
            if other_idx == candidate_idx {
                continue;
            }
            match other.classify(&plane) {
                Classification::Front | Classification::Coplanar => front += 1,
                Classification::Back => back += 1,
                Classification::Straddling => straddling += 1,
            }
        }

        let score =
            STRADDLE_WEIGHT * straddling as f32 + BALANCE_WEIGHT * front.abs_diff(back) as f32;
        if best.as_ref().is_none_or(|(best_score, _)| score < *best_score) {
            best = Some((score, plane));
        }
    }

    best.map(|(_, plane)| plane)
}

fn random_color(rng: &mut impl Rng) -> [f32; 4] {
    // Keep channels bright enough to tell leaves apart on screen.
    [
        rng.random_range(0.25..1.0),
        rng.random_range(0.25..1.0),
        rng.random_range(0.25..1.0),
        1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::unit_cube_mesh;
    use crate::visit::CollectingVisitor;
    use crate::{BvKind, Plane, PlaneSide, Transform};
    use nalgebra::{Point3, Vector3};

    fn cube_scene(positions: &[[f32; 3]]) -> Vec<SceneObject> {
        positions
            .iter()
            .map(|&[x, y, z]| {
                let (vertices, indices) = unit_cube_mesh();
                SceneObject::new(
                    Transform::from_translation(Vector3::new(x, y, z)),
                    vertices,
                    indices,
                    BvKind::Aabb,
                )
            })
            .collect()
    }

    #[test]
    fn empty_scene_builds_empty_tree() {
        let tree = BspTree::build(&[], &BspConfig::default());
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
    }

    #[test]
    fn small_input_is_single_leaf() {
        let objects = cube_scene(&[[0.0, 0.0, 0.0]]);
        let config = BspConfig {
            triangle_threshold: 12,
            ..BspConfig::default()
        };
        let tree = BspTree::build(&objects, &config);

        let root = tree.root().unwrap();
        assert!(root.is_leaf());
        assert_eq!(root.triangles().len(), 12);
    }

    #[test]
    fn subdivision_respects_threshold() {
        let objects = cube_scene(&[[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]]);
        let config = BspConfig {
            triangle_threshold: 8,
            ..BspConfig::default()
        };
        let tree = BspTree::build(&objects, &config);

        let mut visitor = CollectingVisitor::new();
        tree.traverse_preorder(&mut visitor);
        for group in visitor.groups() {
            assert!(group.len() <= 8, "leaf holds {} triangles", group.len());
        }

        // Clipping may add triangles but never lose coverage.
        assert!(tree.triangle_count() >= 36);
    }

    #[test]
    fn ancestor_planes_bound_leaf_triangles() {
        fn check(node: &BspNode, halfspaces: &mut Vec<(Plane, PlaneSide)>) {
            for tri in node.triangles() {
                for (plane, side) in halfspaces.iter() {
                    for vertex in tri.vertices() {
                        let classified = plane.classify_point(*vertex);
                        assert!(
                            classified == *side || classified == PlaneSide::OnPlane,
                            "leaf triangle escapes an ancestor half-space"
                        );
                    }
                }
            }
            if let (Some(plane), Some(front)) = (node.plane(), node.front()) {
                halfspaces.push((plane.clone(), PlaneSide::Front));
                check(front, halfspaces);
                halfspaces.pop();
            }
            if let (Some(plane), Some(back)) = (node.plane(), node.back()) {
                halfspaces.push((plane.clone(), PlaneSide::Back));
                check(back, halfspaces);
                halfspaces.pop();
            }
        }

        let objects = cube_scene(&[[0.0, 0.0, 0.0], [3.0, 1.0, 0.0], [0.0, 0.0, 3.0]]);
        let config = BspConfig {
            triangle_threshold: 4,
            ..BspConfig::default()
        };
        let tree = BspTree::build(&objects, &config);
        check(tree.root().unwrap(), &mut Vec::new());
    }

    #[test]
    fn coplanar_soup_terminates() {
        // 20 triangles on the same plane: the splitter makes no progress, so
        // the builder must emit a leaf instead of recursing forever.
        let triangles: Vec<Triangle> = (0..20)
            .map(|i| {
                let x = i as f32;
                Triangle::new(
                    Point3::new(x, 0.0, 0.0),
                    Point3::new(x + 1.0, 0.0, 0.0),
                    Point3::new(x, 0.0, 1.0),
                )
            })
            .collect();

        let config = BspConfig {
            triangle_threshold: 4,
            ..BspConfig::default()
        };
        let tree = BspTree::build_from_triangles(triangles, &config);
        assert_eq!(tree.triangle_count(), 20);
    }

    #[test]
    fn degenerate_triangles_terminate() {
        let sliver = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        let tree = BspTree::build_from_triangles(
            vec![sliver; 8],
            &BspConfig {
                triangle_threshold: 2,
                ..BspConfig::default()
            },
        );
        assert_eq!(tree.triangle_count(), 8);
    }

    #[test]
    fn preorder_traversal_is_deterministic() {
        let objects = cube_scene(&[[0.0, 0.0, 0.0], [5.0, 0.0, 0.0]]);
        let config = BspConfig {
            triangle_threshold: 6,
            ..BspConfig::default()
        };
        let tree = BspTree::build(&objects, &config);

        let mut first = CollectingVisitor::new();
        tree.traverse_preorder(&mut first);
        let mut second = CollectingVisitor::new();
        tree.traverse_preorder(&mut second);

        assert_eq!(first.groups(), second.groups());
    }
}
