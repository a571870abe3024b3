//! On-disk representation of a BSP tree.
//!
//! The format is a pre-order node list. Each entry carries the node's
//! triangle vertices as a flat coordinate array (nine floats per triangle),
//! its draw color, and presence flags for the front (left) and back (right)
//! children. Splitting planes are not persisted; a loaded tree reproduces
//! the exact traversal order and payloads of the saved one, which is all the
//! draw path needs.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::node::BspNode;
use super::tree::BspTree;
use crate::Triangle;

/// Failure to persist or restore a BSP tree. Unlike geometry edge cases,
/// these are hard errors; a tree that cannot load is unusable.
#[derive(Debug, Error)]
pub enum BspIoError {
    #[error("bsp tree io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("bsp tree document malformed: {0}")]
    Format(#[from] serde_json::Error),
    #[error("bsp tree document truncated: {missing} node records missing")]
    Truncated { missing: usize },
    #[error("bsp tree vertex array length {len} is not a multiple of 9")]
    RaggedVertices { len: usize },
}

/// One node entry in the pre-order list.
#[derive(Debug, Serialize, Deserialize)]
struct NodeRecord {
    /// Flat x/y/z triples, nine floats per triangle.
    vertices: Vec<f32>,
    color: [f32; 4],
    has_front: bool,
    has_back: bool,
}

/// The whole document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct BspDocument {
    nodes: Vec<NodeRecord>,
}

impl BspTree {
    /// Serializes the tree to a JSON document at `path`.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), BspIoError> {
        let mut document = BspDocument::default();
        if let Some(root) = self.root() {
            flatten_preorder(root, &mut document.nodes);
        }

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &document)?;
        writer.flush()?;
        Ok(())
    }

    /// Restores a tree from a document previously written by
    /// [`save_to`](Self::save_to).
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, BspIoError> {
        let reader = BufReader::new(File::open(path)?);
        let document: BspDocument = serde_json::from_reader(reader)?;

        let mut records = document.nodes.into_iter();
        let root = if records.len() == 0 {
            None
        } else {
            Some(rebuild_node(&mut records)?)
        };

        Ok(Self::from_root(root))
    }
}

fn flatten_preorder(node: &BspNode, out: &mut Vec<NodeRecord>) {
    let mut vertices = Vec::with_capacity(node.triangles().len() * 9);
    for triangle in node.triangles() {
        for vertex in triangle.vertices() {
            vertices.extend_from_slice(&[vertex.x, vertex.y, vertex.z]);
        }
    }

    out.push(NodeRecord {
        vertices,
        color: node.color(),
        has_front: node.front().is_some(),
        has_back: node.back().is_some(),
    });

    if let Some(front) = node.front() {
        flatten_preorder(front, out);
    }
    if let Some(back) = node.back() {
        flatten_preorder(back, out);
    }
}

/// Consumes records in pre-order, mirroring [`flatten_preorder`].
fn rebuild_node(records: &mut std::vec::IntoIter<NodeRecord>) -> Result<BspNode, BspIoError> {
    let record = records.next().ok_or(BspIoError::Truncated { missing: 1 })?;

    if record.vertices.len() % 9 != 0 {
        return Err(BspIoError::RaggedVertices {
            len: record.vertices.len(),
        });
    }

    let triangles: Vec<Triangle> = record
        .vertices
        .chunks_exact(9)
        .map(|chunk| {
            Triangle::new(
                Point3::new(chunk[0], chunk[1], chunk[2]),
                Point3::new(chunk[3], chunk[4], chunk[5]),
                Point3::new(chunk[6], chunk[7], chunk[8]),
            )
        })
        .collect();

    let front = if record.has_front {
        Some(rebuild_node(records)?)
    } else {
        None
    };
    let back = if record.has_back {
        Some(rebuild_node(records)?)
    } else {
        None
    };

    Ok(BspNode::from_parts(triangles, record.color, front, back))
}
