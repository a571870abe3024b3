//! Octree over a scene's triangle soup, with per-triangle clipping at
//! octant boundaries.

use log::{debug, warn};
use nalgebra::{Point3, Vector3};

use crate::clip::clip_triangle_to_halfspaces;
use crate::visit::TriangleVisitor;
use crate::{Aabb, OctreeConfig, Plane, PlaneSide, SceneObject, Triangle};

/// One cubic cell. A cell either stores triangles directly or has split into
/// 8 equal child octants; after a split the cell itself holds nothing.
/// Every stored triangle lies fully inside its cell's cube, because
/// straddling triangles are clipped before storage.
#[derive(Debug, Clone)]
pub struct OctNode {
    center: Point3<f32>,
    half_width: f32,
    triangles: Vec<Triangle>,
    children: Option<Box<[OctNode; 8]>>,
}

impl OctNode {
    fn new(center: Point3<f32>, half_width: f32) -> Self {
        Self {
            center,
            half_width,
            triangles: Vec::new(),
            children: None,
        }
    }

    #[inline]
    pub fn center(&self) -> Point3<f32> {
        self.center
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.half_width
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    #[inline]
    pub fn children(&self) -> Option<&[OctNode; 8]> {
        self.children.as_deref()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// The cube this cell covers.
    pub fn cube(&self) -> Aabb {
        let h = self.half_width;
        Aabb::from_center_half_extents(self.center, Vector3::new(h, h, h))
    }

    /// Total triangles stored in this subtree.
    pub fn triangle_count(&self) -> usize {
        let mut count = self.triangles.len();
        if let Some(children) = &self.children {
            count += children.iter().map(OctNode::triangle_count).sum::<usize>();
        }
        count
    }

    pub fn depth(&self) -> usize {
        match &self.children {
            None => 1,
            Some(children) => 1 + children.iter().map(OctNode::depth).max().unwrap_or(0),
        }
    }

    /// Octant center for child `index` (bit 0 = +x, bit 1 = +y, bit 2 = +z).
    fn child_center(&self, index: usize) -> Point3<f32> {
        let quarter = self.half_width / 2.0;
        let sign = |bit: usize| if index >> bit & 1 == 1 { 1.0 } else { -1.0 };
        self.center + Vector3::new(sign(0) * quarter, sign(1) * quarter, sign(2) * quarter)
    }

    /// Index of the single octant containing the triangle, or `None` when it
    /// straddles a center plane.
    fn containing_octant(&self, triangle: &Triangle) -> Option<usize> {
        let mut index = 0;
        for axis in 0..3 {
            let mut above = 0;
            let mut below = 0;
            for vertex in triangle.vertices() {
                if vertex[axis] >= self.center[axis] {
                    above += 1;
                } else {
                    below += 1;
                }
            }
            if above > 0 && below > 0 {
                return None;
            }
            if above == 3 {
                index |= 1 << axis;
            }
        }
        Some(index)
    }

    /// The half-spaces that cut the parent cube down to octant `index`: one
    /// center plane per axis, keeping the octant's side. The octant's outer
    /// faces coincide with the parent cube, which already bounds the
    /// triangle, so three planes suffice.
    fn octant_halfspaces(&self, index: usize) -> [(Plane, PlaneSide); 3] {
        core::array::from_fn(|axis| {
            let mut normal = Vector3::zeros();
            normal[axis] = 1.0;
            let plane = Plane::new(normal, self.center[axis]);
            let keep = if index >> axis & 1 == 1 {
                PlaneSide::Front
            } else {
                PlaneSide::Back
            };
            (plane, keep)
        })
    }

    fn build(
        triangles: Vec<Triangle>,
        center: Point3<f32>,
        half_width: f32,
        depth: usize,
        config: &OctreeConfig,
    ) -> Self {
        let mut node = OctNode::new(center, half_width);

        if triangles.len() <= config.triangle_threshold || depth >= config.max_depth {
            if depth >= config.max_depth && triangles.len() > config.triangle_threshold {
                warn!(
                    "octree cell at depth {depth} holds {} triangles; \
                     depth cutoff is keeping it as a leaf",
                    triangles.len()
                );
            }
            node.triangles = triangles;
            return node;
        }

        // Route every triangle: contained ones go to their single octant
        // unmodified, straddlers leave a clipped piece in every octant they
        // touch.
        let mut buckets: [Vec<Triangle>; 8] = Default::default();
        for triangle in &triangles {
            match node.containing_octant(triangle) {
                Some(index) => buckets[index].push(triangle.clone()),
                None => {
                    for (index, bucket) in buckets.iter_mut().enumerate() {
                        bucket.extend(clip_triangle_to_halfspaces(
                            triangle,
                            &node.octant_halfspaces(index),
                        ));
                    }
                }
            }
        }

        // Clipping can multiply pieces faster than octants separate them.
        // Subdivide only when every octant ends up strictly smaller than the
        // parent; counts then decrease along every path and recursion
        // terminates even on coincident or plane-filling geometry.
        if buckets.iter().any(|bucket| bucket.len() >= triangles.len()) {
            node.triangles = triangles;
            return node;
        }

        let quarter_width = half_width / 2.0;
        let mut index = 0;
        let children = buckets.map(|bucket| {
            let child =
                OctNode::build(bucket, node.child_center(index), quarter_width, depth + 1, config);
            index += 1;
            child
        });
        node.children = Some(Box::new(children));
        node
    }

    fn visit_preorder<V: TriangleVisitor>(&self, visitor: &mut V) {
        if !self.triangles.is_empty() {
            visitor.visit(&self.triangles);
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.visit_preorder(visitor);
            }
        }
    }
}

/// Uniform 8-ary cubic subdivision of a scene's triangles.
#[derive(Debug, Clone, Default)]
pub struct Octree {
    root: Option<OctNode>,
}

impl Octree {
    /// Builds an octree over the world triangles of an object snapshot.
    ///
    /// The root cube is centered on the AABB over all object world volumes,
    /// with half-width equal to that AABB's largest half-extent (forced
    /// cubic). An empty snapshot yields an empty tree.
    pub fn build(objects: &[SceneObject], config: &OctreeConfig) -> Self {
        let triangles: Vec<Triangle> = crate::object::collect_world_triangles(objects);
        if triangles.is_empty() {
            return Self::default();
        }

        let mut scene_aabb = Aabb::default();
        for object in objects {
            scene_aabb = scene_aabb.union(&object.world_bounds().enclosing_aabb());
        }

        Self::build_from_triangles(triangles, scene_aabb, config)
    }

    /// Builds directly from triangles, with the root cube derived from the
    /// given bounds.
    pub fn build_from_triangles(
        triangles: Vec<Triangle>,
        bounds: Aabb,
        config: &OctreeConfig,
    ) -> Self {
        if triangles.is_empty() {
            return Self::default();
        }

        let half = bounds.half_extents();
        let half_width = half.x.max(half.y).max(half.z);

        let input_count = triangles.len();
        let root = OctNode::build(triangles, bounds.center(), half_width, 0, config);

        debug!(
            "built octree: {} input triangles, {} stored, depth {}",
            input_count,
            root.triangle_count(),
            root.depth()
        );

        Self { root: Some(root) }
    }

    /// Discards the current tree and builds a fresh one.
    pub fn rebuild(&mut self, objects: &[SceneObject], config: &OctreeConfig) {
        *self = Self::build(objects, config);
    }

    #[inline]
    pub fn root(&self) -> Option<&OctNode> {
        self.root.as_ref()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn triangle_count(&self) -> usize {
        self.root.as_ref().map_or(0, OctNode::triangle_count)
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, OctNode::depth)
    }

    /// Visits every populated cell in pre-order.
    pub fn traverse_preorder<V: TriangleVisitor>(&self, visitor: &mut V) {
        if let Some(ref root) = self.root {
            root.visit_preorder(visitor);
        }
    }
}
