//! Scene-object snapshot consumed by the tree builders.

use nalgebra::{Point3, Vector3};

use crate::{BoundingVolume, BvKind, Triangle};

/// Translation plus per-axis scale. Bounding volumes track this cheaply
/// without refitting the underlying mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    /// Maps a local point into world space.
    #[inline]
    pub fn apply(&self, point: Point3<f32>) -> Point3<f32> {
        Point3::from(point.coords.component_mul(&self.scale) + self.translation)
    }

    /// Largest scale component; what a sphere radius scales by.
    #[inline]
    pub fn max_scale(&self) -> f32 {
        self.scale.x.abs().max(self.scale.y.abs()).max(self.scale.z.abs())
    }
}

/// A read-only snapshot of one object for a build call: its transform, a
/// cached local bounding volume, and an indexed triangle mesh.
#[derive(Debug, Clone)]
pub struct SceneObject {
    transform: Transform,
    vertices: Vec<Point3<f32>>,
    indices: Vec<[u32; 3]>,
    local_bounds: BoundingVolume,
}

impl SceneObject {
    /// Creates an object, fitting its local bounding volume immediately.
    pub fn new(
        transform: Transform,
        vertices: Vec<Point3<f32>>,
        indices: Vec<[u32; 3]>,
        kind: BvKind,
    ) -> Self {
        let local_bounds = BoundingVolume::compute(&vertices, kind);
        Self {
            transform,
            vertices,
            indices,
            local_bounds,
        }
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[inline]
    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    #[inline]
    pub fn local_bounds(&self) -> &BoundingVolume {
        &self.local_bounds
    }

    /// Refits the local bounding volume, e.g. after switching BV kind.
    pub fn refit_bounds(&mut self, kind: BvKind) {
        self.local_bounds = BoundingVolume::compute(&self.vertices, kind);
    }

    /// Moves the object; bounding volumes pick the change up through
    /// [`Self::world_bounds`] without touching vertex data.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// World-space copy of the cached local volume under the current
    /// scale and translation. Sphere radii scale by the largest scale
    /// component; box half-extents scale per axis.
    pub fn world_bounds(&self) -> BoundingVolume {
        match &self.local_bounds {
            BoundingVolume::Aabb(aabb) => {
                let center = self.transform.apply(aabb.center());
                let half = aabb
                    .half_extents()
                    .component_mul(&self.transform.scale)
                    .abs();
                BoundingVolume::Aabb(crate::Aabb::from_center_half_extents(center, half))
            }
            BoundingVolume::Sphere(sphere) => {
                let center = self.transform.apply(sphere.center());
                let radius = sphere.radius() * self.transform.max_scale();
                BoundingVolume::Sphere(crate::Sphere::new(center, radius))
            }
        }
    }

    /// The object's triangles mapped into world space.
    pub fn world_triangles(&self) -> Vec<Triangle> {
        self.indices
            .iter()
            .map(|&[a, b, c]| {
                Triangle::new(
                    self.transform.apply(self.vertices[a as usize]),
                    self.transform.apply(self.vertices[b as usize]),
                    self.transform.apply(self.vertices[c as usize]),
                )
            })
            .collect()
    }
}

/// Gathers the world-space triangles of a whole object set; the input the
/// octree and BSP builders consume.
pub fn collect_world_triangles(objects: &[SceneObject]) -> Vec<Triangle> {
    objects
        .iter()
        .flat_map(|object| object.world_triangles())
        .collect()
}

/// An axis-aligned unit-cube mesh: 8 vertices, 12 triangles. Shared by tests
/// and the demo binaries.
pub fn unit_cube_mesh() -> (Vec<Point3<f32>>, Vec<[u32; 3]>) {
    let vertices = vec![
        Point3::new(-0.5, -0.5, -0.5),
        Point3::new(0.5, -0.5, -0.5),
        Point3::new(0.5, 0.5, -0.5),
        Point3::new(-0.5, 0.5, -0.5),
        Point3::new(-0.5, -0.5, 0.5),
        Point3::new(0.5, -0.5, 0.5),
        Point3::new(0.5, 0.5, 0.5),
        Point3::new(-0.5, 0.5, 0.5),
    ];

    // Two triangles per face, counter-clockwise from outside.
    let indices = vec![
        [4, 5, 6],
        [4, 6, 7], // +Z
        [1, 0, 3],
        [1, 3, 2], // -Z
        [0, 4, 7],
        [0, 7, 3], // -X
        [5, 1, 2],
        [5, 2, 6], // +X
        [7, 6, 2],
        [7, 2, 3], // +Y
        [0, 1, 5],
        [0, 5, 4], // -Y
    ];

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SphereFit;
    use approx::assert_relative_eq;

    #[test]
    fn world_bounds_follow_translation() {
        let (vertices, indices) = unit_cube_mesh();
        let mut object = SceneObject::new(Transform::default(), vertices, indices, BvKind::Aabb);

        object.set_transform(Transform::from_translation(Vector3::new(10.0, 0.0, 0.0)));
        let world = object.world_bounds();

        assert_relative_eq!(world.center().x, 10.0, epsilon = 1e-6);
        assert!(world.contains_point(Point3::new(10.4, 0.4, -0.4)));
        assert!(!world.contains_point(Point3::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn world_bounds_scale_box_per_axis() {
        let (vertices, indices) = unit_cube_mesh();
        let mut object = SceneObject::new(Transform::default(), vertices, indices, BvKind::Aabb);

        object.set_transform(Transform {
            translation: Vector3::zeros(),
            scale: Vector3::new(2.0, 1.0, 4.0),
        });

        let (min_x, max_x) = object.world_bounds().extent_on_axis(0);
        let (min_z, max_z) = object.world_bounds().extent_on_axis(2);
        assert_relative_eq!(max_x - min_x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(max_z - min_z, 4.0, epsilon = 1e-6);
    }

    #[test]
    fn world_bounds_scale_sphere_by_max_component() {
        let (vertices, indices) = unit_cube_mesh();
        let mut object = SceneObject::new(
            Transform::default(),
            vertices,
            indices,
            BvKind::Sphere(SphereFit::Ritter),
        );
        let base_radius = match object.world_bounds() {
            BoundingVolume::Sphere(s) => s.radius(),
            _ => unreachable!(),
        };

        object.set_transform(Transform {
            translation: Vector3::zeros(),
            scale: Vector3::new(1.0, 3.0, 2.0),
        });

        match object.world_bounds() {
            BoundingVolume::Sphere(s) => {
                assert_relative_eq!(s.radius(), base_radius * 3.0, epsilon = 1e-5);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn world_triangles_are_transformed() {
        let (vertices, indices) = unit_cube_mesh();
        let object = SceneObject::new(
            Transform::from_translation(Vector3::new(5.0, 5.0, 5.0)),
            vertices,
            indices,
            BvKind::Aabb,
        );

        let triangles = object.world_triangles();
        assert_eq!(triangles.len(), 12);
        for tri in &triangles {
            for v in tri.vertices() {
                assert!(v.x >= 4.5 && v.x <= 5.5);
            }
        }
    }

    #[test]
    fn zero_vertex_object_is_degenerate() {
        let object = SceneObject::new(Transform::default(), vec![], vec![], BvKind::Aabb);
        assert_eq!(object.world_bounds().volume(), 0.0);
        assert!(object.world_triangles().is_empty());
    }
}
