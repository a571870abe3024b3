//! Visitor pattern for traversing triangle-holding trees.
//!
//! The octree and BSP tree both expose pre-order traversal that calls a
//! visitor once per populated node; this is the hook a renderer issues its
//! per-node draw calls from, and what tests use to capture traversal order.

use crate::Triangle;

/// Visitor for populated tree nodes.
pub trait TriangleVisitor {
    /// Called once per populated node with that node's triangles.
    fn visit(&mut self, triangles: &[Triangle]);

    /// Like [`Self::visit`], with the node's draw color where the tree
    /// carries one (BSP leaves). Defaults to ignoring the color.
    fn visit_colored(&mut self, triangles: &[Triangle], _color: [f32; 4]) {
        self.visit(triangles);
    }
}

/// Collects every visited triangle group, preserving traversal order.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    groups: Vec<Vec<Triangle>>,
}

impl CollectingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The visited groups, one per populated node, in visit order.
    pub fn groups(&self) -> &[Vec<Triangle>] {
        &self.groups
    }

    /// All visited triangles flattened into one list.
    pub fn into_triangles(self) -> Vec<Triangle> {
        self.groups.into_iter().flatten().collect()
    }
}

impl TriangleVisitor for CollectingVisitor {
    fn visit(&mut self, triangles: &[Triangle]) {
        self.groups.push(triangles.to_vec());
    }
}

/// Adapts a closure into a visitor.
pub struct FnVisitor<F: FnMut(&[Triangle])>(pub F);

impl<F: FnMut(&[Triangle])> TriangleVisitor for FnVisitor<F> {
    fn visit(&mut self, triangles: &[Triangle]) {
        (self.0)(triangles);
    }
}
