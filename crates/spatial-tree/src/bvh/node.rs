//! BVH node representation.

use crate::BoundingVolume;

/// A node in the bounding-volume hierarchy.
///
/// Nodes own their children exclusively; the tree is a single-rooted
/// parent-to-child graph with no sharing. An internal node's volume is the
/// union of its children's volumes. Leaves reference objects by their index
/// into the build-input slice.
///
/// A leaf normally holds exactly one object; only the depth cutoff can force
/// several objects into one leaf.
#[derive(Debug, Clone)]
pub enum BvhNode {
    Internal {
        bounds: BoundingVolume,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
    Leaf {
        bounds: BoundingVolume,
        objects: Vec<usize>,
    },
}

impl BvhNode {
    #[inline]
    pub fn bounds(&self) -> &BoundingVolume {
        match self {
            Self::Internal { bounds, .. } | Self::Leaf { bounds, .. } => bounds,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Number of object references in this subtree.
    pub fn object_count(&self) -> usize {
        match self {
            Self::Leaf { objects, .. } => objects.len(),
            Self::Internal { left, right, .. } => left.object_count() + right.object_count(),
        }
    }

    /// Depth of this subtree (1 for a leaf).
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Visits every node in pre-order: parent, left subtree, right subtree.
    pub fn visit_preorder<'a>(&'a self, f: &mut impl FnMut(&'a BvhNode)) {
        f(self);
        if let Self::Internal { left, right, .. } = self {
            left.visit_preorder(f);
            right.visit_preorder(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Aabb, BoundingVolume};
    use nalgebra::Point3;

    fn leaf(object: usize, min: f32, max: f32) -> BvhNode {
        BvhNode::Leaf {
            bounds: BoundingVolume::Aabb(Aabb::new(
                Point3::new(min, min, min),
                Point3::new(max, max, max),
            )),
            objects: vec![object],
        }
    }

    #[test]
    fn counts_and_depth() {
        let left = leaf(0, 0.0, 1.0);
        let right = leaf(1, 2.0, 3.0);
        let bounds = left.bounds().union(right.bounds());
        let root = BvhNode::Internal {
            bounds,
            left: Box::new(left),
            right: Box::new(right),
        };

        assert_eq!(root.leaf_count(), 2);
        assert_eq!(root.object_count(), 2);
        assert_eq!(root.depth(), 2);
        assert!(!root.is_leaf());
    }

    #[test]
    fn preorder_visits_parent_first() {
        let left = leaf(0, 0.0, 1.0);
        let right = leaf(1, 2.0, 3.0);
        let bounds = left.bounds().union(right.bounds());
        let root = BvhNode::Internal {
            bounds,
            left: Box::new(left),
            right: Box::new(right),
        };

        let mut order = Vec::new();
        root.visit_preorder(&mut |node| order.push(node.is_leaf()));
        assert_eq!(order, vec![false, true, true]);
    }
}
