//! Bounding-volume hierarchy over a set of scene objects.
//!
//! Two construction strategies build the same node shape:
//!
//! - **Top-down** recursively partitions the object range along the axis
//!   where the BV centers spread the most, with a selectable split method.
//! - **Bottom-up** starts with one leaf per object and greedily merges the
//!   pair ranked best by the enabled heuristics.
//!
//! Both guarantee that every internal volume contains the union of its
//! children and that (absent the depth cutoff) each leaf holds one object.
//! There is no incremental maintenance; any object change means a rebuild.

mod bottom_up;
mod node;
mod top_down;

pub use node::BvhNode;

use log::debug;

use crate::{BvhConfig, BvhStrategy, SceneObject};

/// The hierarchy container: an optional root over owned nodes.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    root: Option<BvhNode>,
}

impl Bvh {
    /// Builds a hierarchy over an object snapshot. An empty snapshot yields
    /// an empty tree.
    pub fn build(objects: &[SceneObject], config: &BvhConfig) -> Self {
        let root = match config.strategy {
            BvhStrategy::TopDown(method) => top_down::build(objects, config, method),
            BvhStrategy::BottomUp(heuristics) => bottom_up::build(objects, heuristics),
        };

        if let Some(ref root) = root {
            debug!(
                "built BVH: {} leaves, depth {}, strategy {:?}",
                root.leaf_count(),
                root.depth(),
                config.strategy
            );
        }

        Self { root }
    }

    /// Discards the current tree and builds a fresh one; call after objects
    /// are added, removed, or change BV kind.
    pub fn rebuild(&mut self, objects: &[SceneObject], config: &BvhConfig) {
        *self = Self::build(objects, config);
    }

    #[inline]
    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.as_ref().map_or(0, BvhNode::leaf_count)
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, BvhNode::depth)
    }

    /// Visits every node in pre-order; the hook a renderer draws node
    /// volumes from.
    pub fn visit_preorder<'a>(&'a self, mut f: impl FnMut(&'a BvhNode)) {
        if let Some(ref root) = self.root {
            root.visit_preorder(&mut f);
        }
    }
}
