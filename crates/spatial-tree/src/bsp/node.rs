//! BSP tree node implementation.

use crate::{Plane, Triangle};

/// A node in the BSP tree.
///
/// Internal nodes carry the splitting plane; their front child covers the
/// plane's positive half-space and their back child the negative one. Leaves
/// carry the already-clipped triangle payload and a draw color.
///
/// Trees loaded from disk have no planes (the on-disk format stores only the
/// traversal payload), so `plane` is optional even on internal nodes.
#[derive(Debug, Clone)]
pub struct BspNode {
    plane: Option<Plane>,
    triangles: Vec<Triangle>,
    color: [f32; 4],
    front: Option<Box<BspNode>>,
    back: Option<Box<BspNode>>,
}

impl BspNode {
    /// Creates a leaf holding a triangle payload.
    pub fn leaf(triangles: Vec<Triangle>, color: [f32; 4]) -> Self {
        Self {
            plane: None,
            triangles,
            color,
            front: None,
            back: None,
        }
    }

    /// Creates an internal node splitting on `plane`.
    pub fn internal(plane: Plane, front: Option<BspNode>, back: Option<BspNode>) -> Self {
        Self {
            plane: Some(plane),
            triangles: Vec::new(),
            color: [0.0; 4],
            front: front.map(Box::new),
            back: back.map(Box::new),
        }
    }

    /// Used by the loader, which has payloads and child links but no planes.
    pub(super) fn from_parts(
        triangles: Vec<Triangle>,
        color: [f32; 4],
        front: Option<BspNode>,
        back: Option<BspNode>,
    ) -> Self {
        Self {
            plane: None,
            triangles,
            color,
            front: front.map(Box::new),
            back: back.map(Box::new),
        }
    }

    #[inline]
    pub fn plane(&self) -> Option<&Plane> {
        self.plane.as_ref()
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    #[inline]
    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    #[inline]
    pub fn front(&self) -> Option<&BspNode> {
        self.front.as_deref()
    }

    #[inline]
    pub fn back(&self) -> Option<&BspNode> {
        self.back.as_deref()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }

    /// Total triangles stored in this subtree.
    pub fn triangle_count(&self) -> usize {
        let mut count = self.triangles.len();
        if let Some(ref front) = self.front {
            count += front.triangle_count();
        }
        if let Some(ref back) = self.back {
            count += back.triangle_count();
        }
        count
    }

    /// Number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.front.as_ref().map_or(0, |n| n.node_count())
            + self.back.as_ref().map_or(0, |n| n.node_count())
    }

    /// Depth of this subtree (1 for a leaf).
    pub fn depth(&self) -> usize {
        let front_depth = self.front.as_ref().map_or(0, |n| n.depth());
        let back_depth = self.back.as_ref().map_or(0, |n| n.depth());
        1 + front_depth.max(back_depth)
    }
}
