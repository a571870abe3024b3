//! Tagged bounding-volume variant shared by the tree builders.

use nalgebra::Point3;

use crate::sphere::{fit_larsson, fit_pca, fit_ritter};
use crate::{Aabb, BvKind, Sphere, SphereFit};

/// Either an axis-aligned box or a sphere, behind one geometric-query
/// surface. Trees never need to know which variant they carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundingVolume {
    Aabb(Aabb),
    Sphere(Sphere),
}

impl BoundingVolume {
    /// Computes a volume of the requested kind around a vertex set.
    ///
    /// Empty input yields a degenerate zero-sized volume, never an error.
    pub fn compute(vertices: &[Point3<f32>], kind: BvKind) -> Self {
        match kind {
            BvKind::Aabb => Self::Aabb(Aabb::from_points(vertices)),
            BvKind::Sphere(fit) => Self::Sphere(match fit {
                SphereFit::Ritter => fit_ritter(vertices),
                SphereFit::Epos(mode) => fit_larsson(vertices, mode),
                SphereFit::Pca => fit_pca(vertices),
            }),
        }
    }

    #[inline]
    pub fn center(&self) -> Point3<f32> {
        match self {
            Self::Aabb(aabb) => aabb.center(),
            Self::Sphere(sphere) => sphere.center(),
        }
    }

    pub fn volume(&self) -> f32 {
        match self {
            Self::Aabb(aabb) => aabb.volume(),
            Self::Sphere(sphere) => sphere.volume(),
        }
    }

    /// Minimum and maximum reach along a coordinate axis (0 = x, 1 = y, 2 = z).
    pub fn extent_on_axis(&self, axis: usize) -> (f32, f32) {
        match self {
            Self::Aabb(aabb) => (aabb.min()[axis], aabb.max()[axis]),
            Self::Sphere(sphere) => {
                let c = sphere.center()[axis];
                (c - sphere.radius(), c + sphere.radius())
            }
        }
    }

    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        match self {
            Self::Aabb(aabb) => aabb.contains_point(point),
            Self::Sphere(sphere) => sphere.contains_point(point),
        }
    }

    /// Expands the volume minimally to contain a point.
    pub fn grow_to_include(&mut self, point: Point3<f32>) {
        match self {
            Self::Aabb(aabb) => aabb.grow_to_include(point),
            Self::Sphere(sphere) => sphere.grow_to_include(point),
        }
    }

    /// Returns `true` if `other` lies entirely inside this volume.
    ///
    /// Mixed kinds compare via the sphere's enclosing box or the box's
    /// enclosing sphere, staying conservative.
    pub fn contains(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Aabb(a), Self::Aabb(b)) => a.contains_aabb(b),
            (Self::Sphere(a), Self::Sphere(b)) => a.contains_sphere(b),
            (Self::Aabb(a), Self::Sphere(_)) => a.contains_aabb(&other.enclosing_aabb()),
            (Self::Sphere(a), Self::Aabb(_)) => a.contains_sphere(&other.enclosing_sphere()),
        }
    }

    /// The smallest volume of the same kind as `self` containing both inputs.
    pub fn union(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Aabb(a), _) => Self::Aabb(a.union(&other.enclosing_aabb())),
            (Self::Sphere(a), _) => Self::Sphere(a.union(&other.enclosing_sphere())),
        }
    }

    /// Tightest box around this volume.
    pub fn enclosing_aabb(&self) -> Aabb {
        match self {
            Self::Aabb(aabb) => *aabb,
            Self::Sphere(sphere) => {
                let r = sphere.radius();
                Aabb::from_center_half_extents(sphere.center(), nalgebra::Vector3::new(r, r, r))
            }
        }
    }

    /// Tightest sphere around this volume.
    pub fn enclosing_sphere(&self) -> Sphere {
        match self {
            Self::Aabb(aabb) => Sphere::new(aabb.center(), aabb.half_extents().norm()),
            Self::Sphere(sphere) => *sphere,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::EposMode;

    fn test_points() -> Vec<Point3<f32>> {
        vec![
            Point3::new(-1.0, 0.0, 2.0),
            Point3::new(3.0, -2.0, 0.0),
            Point3::new(0.5, 4.0, -1.0),
            Point3::new(2.0, 2.0, 2.0),
        ]
    }

    #[test]
    fn compute_contains_vertices_for_every_kind() {
        let points = test_points();
        let kinds = [
            BvKind::Aabb,
            BvKind::Sphere(SphereFit::Ritter),
            BvKind::Sphere(SphereFit::Epos(EposMode::Epos6)),
            BvKind::Sphere(SphereFit::Epos(EposMode::Epos98)),
            BvKind::Sphere(SphereFit::Pca),
        ];

        for kind in kinds {
            let bv = BoundingVolume::compute(&points, kind);
            for point in &points {
                assert!(bv.contains_point(*point), "{kind:?} lost {point}");
            }
        }
    }

    #[test]
    fn compute_empty_is_degenerate() {
        let aabb = BoundingVolume::compute(&[], BvKind::Aabb);
        assert_eq!(aabb.volume(), 0.0);

        let sphere = BoundingVolume::compute(&[], BvKind::Sphere(SphereFit::Ritter));
        assert_eq!(sphere.volume(), 0.0);
    }

    #[test]
    fn union_contains_both_inputs() {
        let a = BoundingVolume::compute(&test_points(), BvKind::Aabb);
        let far = vec![Point3::new(10.0, 10.0, 10.0), Point3::new(12.0, 11.0, 9.0)];
        let b = BoundingVolume::compute(&far, BvKind::Aabb);

        let u = a.union(&b);
        assert!(u.contains(&a));
        assert!(u.contains(&b));
    }

    #[test]
    fn grow_to_include_absorbs_outlier() {
        let mut bv = BoundingVolume::compute(&test_points(), BvKind::Aabb);
        let outlier = Point3::new(50.0, 0.0, 0.0);
        assert!(!bv.contains_point(outlier));

        bv.grow_to_include(outlier);
        assert!(bv.contains_point(outlier));
        for point in &test_points() {
            assert!(bv.contains_point(*point));
        }
    }

    #[test]
    fn sphere_extent_on_axis() {
        let bv = BoundingVolume::Sphere(Sphere::new(Point3::new(1.0, 2.0, 3.0), 0.5));
        assert_eq!(bv.extent_on_axis(1), (1.5, 2.5));
    }

    #[test]
    fn enclosing_conversions_are_conservative() {
        let sphere = BoundingVolume::Sphere(Sphere::new(Point3::origin(), 2.0));
        let aabb = sphere.enclosing_aabb();
        assert!(aabb.contains_point(Point3::new(0.0, 0.0, 2.0)));

        let boxed = BoundingVolume::Aabb(Aabb::new(
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, 1.0),
        ));
        let enclosing = boxed.enclosing_sphere();
        assert!(enclosing.contains_point(Point3::new(1.0, 1.0, 1.0)));
    }
}
