//! Build configuration for the trees.
//!
//! Every `build` call takes its configuration explicitly; nothing here is
//! ambient or global, so the same input snapshot plus the same config always
//! reproduces the same tree.

pub use crate::sphere::EposMode;

/// Which bounding-volume kind objects and tree nodes carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BvKind {
    #[default]
    Aabb,
    Sphere(SphereFit),
}

/// Which sphere-fitting algorithm seeds bounding spheres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SphereFit {
    #[default]
    Ritter,
    Epos(EposMode),
    Pca,
}

/// How the top-down BVH builder partitions an object range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMethod {
    /// Partial sort by BV center on the split axis, cut at the midpoint
    /// index. Always balanced.
    #[default]
    MedianCenter,
    /// Pivot on the median of the 2n per-object min/max extents on the axis.
    MedianExtent,
    /// Scan K evenly spaced thresholds across the axis and keep the one whose
    /// partition counts come closest to an even split.
    EvenSplits(usize),
}

/// Heuristics the bottom-up BVH builder may combine when ranking merge
/// candidates. At least one must be enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeHeuristics {
    /// Rank pairs by BV-center distance (only the 10 nearest get ranks).
    pub nearest_center: bool,
    /// Rank pairs by the volume of the merged BV.
    pub min_volume: bool,
    /// Rank pairs by volume growth: merged volume minus the inputs' volumes.
    pub min_volume_growth: bool,
}

impl Default for MergeHeuristics {
    fn default() -> Self {
        Self {
            nearest_center: true,
            min_volume: true,
            min_volume_growth: true,
        }
    }
}

impl MergeHeuristics {
    /// Only the nearest-center heuristic.
    pub fn nearest_only() -> Self {
        Self {
            nearest_center: true,
            min_volume: false,
            min_volume_growth: false,
        }
    }

    pub fn any_enabled(&self) -> bool {
        self.nearest_center || self.min_volume || self.min_volume_growth
    }
}

/// Which construction strategy the BVH uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BvhStrategy {
    TopDown(SplitMethod),
    BottomUp(MergeHeuristics),
}

impl Default for BvhStrategy {
    fn default() -> Self {
        Self::TopDown(SplitMethod::default())
    }
}

/// Configuration for a BVH build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhConfig {
    pub strategy: BvhStrategy,
    /// Object count at or under which the top-down builder emits a leaf.
    pub leaf_threshold: usize,
    /// Depth at which the top-down builder stops subdividing.
    pub max_depth: usize,
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self {
            strategy: BvhStrategy::default(),
            leaf_threshold: 1,
            max_depth: 7,
        }
    }
}

/// Configuration for an octree build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OctreeConfig {
    /// Triangle count at or under which a cell stops subdividing.
    pub triangle_threshold: usize,
    /// Safety cutoff: at this depth a cell stores whatever it receives.
    /// Subdivision also stops on its own when an octant fails to shrink the
    /// parent's load, so this bounds cell count rather than correctness.
    pub max_depth: usize,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            triangle_threshold: 8,
            max_depth: 8,
        }
    }
}

/// Configuration for a BSP build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BspConfig {
    /// Triangle count at or under which a leaf is emitted.
    pub triangle_threshold: usize,
    /// Safety cutoff against pathological splitting cascades.
    pub max_depth: usize,
}

impl Default for BspConfig {
    fn default() -> Self {
        Self {
            triangle_threshold: 10,
            max_depth: 32,
        }
    }
}
