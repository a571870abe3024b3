//! Binary space partitioning of a scene's triangles.
//!
//! The builder auto-partitions: every triangle's own plane is a candidate
//! splitter, scored by how few triangles it straddles and how evenly it
//! balances the rest. Straddling triangles are split exactly at the plane,
//! so every leaf's payload lies inside the half-space intersection implied
//! by all its ancestor planes.
//!
//! Construction is O(n²) per node; [`BspTree::save_to`] and
//! [`BspTree::load_from`] persist the built tree as a pre-order node
//! document so the cost is paid once.
//!
//! # Architecture
//!
//! - [`BspTree`]: the container holding the root node
//! - [`BspNode`]: split plane + front/back children, or a leaf payload
//! - [`BspIoError`]: persistence failures (the only hard errors here)

mod document;
mod node;
mod tree;

pub use document::BspIoError;
pub use node::BspNode;
pub use tree::BspTree;
