//! Spatial acceleration trees over a snapshot of 3D scene geometry.
//!
//! Consumes read-only scene objects (transform + local bounding volume +
//! triangle mesh) and builds:
//!
//! - [`Bvh`]: a binary bounding-volume hierarchy, constructed top-down
//!   (selectable split method) or bottom-up (rank-summed merge heuristics)
//! - [`Octree`]: uniform cubic subdivision of the triangle soup, clipping
//!   straddling triangles at octant boundaries
//! - [`BspTree`]: arbitrary-plane partitioning with heuristic plane
//!   selection, persistable to disk to amortize its O(n²) build
//!
//! All builds are blocking, single-threaded and deterministic for a given
//! input snapshot and configuration; there is no incremental maintenance.
//! Degenerate geometry (zero vertices or triangles) yields degenerate
//! volumes and empty trees, never errors; only BSP persistence returns a
//! [`Result`].

mod aabb;
mod bounds;
pub mod bsp;
pub mod bvh;
mod clip;
mod config;
pub mod object;
mod octree;
mod plane;
mod sphere;
mod triangle;
pub mod visit;

pub use aabb::Aabb;
pub use bounds::BoundingVolume;
pub use bsp::{BspIoError, BspNode, BspTree};
pub use bvh::{Bvh, BvhNode};
pub use clip::{clip_polygon, clip_triangle_to_halfspaces, split_triangle, SplitTriangles};
pub use config::{
    BspConfig, BvKind, BvhConfig, BvhStrategy, EposMode, MergeHeuristics, OctreeConfig,
    SphereFit, SplitMethod,
};
pub use object::{SceneObject, Transform};
pub use octree::{OctNode, Octree};
pub use plane::{Classification, Plane, PlaneSide, PLANE_EPSILON};
pub use sphere::{fit_larsson, fit_pca, fit_ritter, Sphere};
pub use triangle::{fan_triangulate, Triangle};
pub use visit::{CollectingVisitor, FnVisitor, TriangleVisitor};
