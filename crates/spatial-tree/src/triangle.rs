//! Triangle representation shared by all partitioning trees.

use nalgebra::{Point3, Vector3};

use crate::{Classification, Plane, PlaneSide};

/// A triangle in 3D space, defined by three vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    vertices: [Point3<f32>; 3],
}

impl Triangle {
    /// Creates a new triangle from three points.
    ///
    /// The winding order determines the normal direction via the right-hand rule:
    /// normal = (b - a) × (c - a)
    pub fn new(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Returns the three vertices of the triangle.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f32>; 3] {
        &self.vertices
    }

    /// Computes the (unnormalized) normal vector of the triangle.
    ///
    /// The direction follows the right-hand rule based on vertex winding.
    pub fn normal(&self) -> Vector3<f32> {
        let [a, b, c] = &self.vertices;
        let ab = b - a;
        let ac = c - a;
        ab.cross(&ac)
    }

    /// Computes the unit normal vector of the triangle.
    ///
    /// Returns `None` if the triangle is degenerate (zero area).
    pub fn unit_normal(&self) -> Option<Vector3<f32>> {
        let n = self.normal();
        let len = n.norm();
        if len > f32::EPSILON {
            Some(n / len)
        } else {
            None
        }
    }

    /// Returns the plane that this triangle lies on, or `None` for a
    /// degenerate (collinear) triangle.
    pub fn plane(&self) -> Option<Plane> {
        let normal = self.normal();
        if normal.norm() <= f32::EPSILON {
            return None;
        }
        Some(Plane::from_point_and_normal(self.vertices[0], normal))
    }

    /// Computes the centroid (center of mass) of the triangle.
    pub fn centroid(&self) -> Point3<f32> {
        let [a, b, c] = &self.vertices;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Returns the minimum and maximum vertex coordinate along one axis
    /// (0 = x, 1 = y, 2 = z).
    pub fn extent_on_axis(&self, axis: usize) -> (f32, f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for vertex in &self.vertices {
            min = min.min(vertex[axis]);
            max = max.max(vertex[axis]);
        }
        (min, max)
    }

    /// Classifies this triangle relative to a plane.
    ///
    /// Returns:
    /// - `Front` if all vertices are in front of the plane
    /// - `Back` if all vertices are behind the plane
    /// - `Coplanar` if all vertices lie on the plane
    /// - `Straddling` if vertices are on both sides
    pub fn classify(&self, plane: &Plane) -> Classification {
        let mut front = 0;
        let mut back = 0;
        let mut on_plane = 0;

        for vertex in &self.vertices {
            match plane.classify_point(*vertex) {
                PlaneSide::Front => front += 1,
                PlaneSide::Back => back += 1,
                PlaneSide::OnPlane => on_plane += 1,
            }
        }

        if on_plane == 3 {
            Classification::Coplanar
        } else if back == 0 {
            Classification::Front
        } else if front == 0 {
            Classification::Back
        } else {
            Classification::Straddling
        }
    }
}

/// Fan-triangulates a convex polygon into triangles.
///
/// Vertex 0 anchors the fan; a polygon with fewer than 3 vertices yields
/// nothing. Triangle splitting and octant clipping both produce 3-4 sided
/// convex polygons, which this turns back into triangles.
pub fn fan_triangulate(vertices: &[Point3<f32>]) -> Vec<Triangle> {
    if vertices.len() < 3 {
        return Vec::new();
    }

    (1..vertices.len() - 1)
        .map(|i| Triangle::new(vertices[0], vertices[i], vertices[i + 1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn make_triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
        Triangle::new(
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        )
    }

    #[test]
    fn normal_follows_winding() {
        let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let normal = tri.unit_normal().unwrap();
        assert!(normal.z > 0.9);
    }

    #[test]
    fn degenerate_triangle_has_no_plane() {
        let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert!(tri.plane().is_none());
        assert!(tri.unit_normal().is_none());
    }

    #[test]
    fn centroid_is_vertex_average() {
        let tri = make_triangle([0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [0.0, 3.0, 0.0]);
        let centroid = tri.centroid();
        assert!((centroid.x - 1.0).abs() < 1e-6);
        assert!((centroid.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn extent_on_axis_spans_vertices() {
        let tri = make_triangle([-2.0, 0.0, 1.0], [3.0, 0.0, 5.0], [0.0, 0.0, -1.0]);
        assert_eq!(tri.extent_on_axis(0), (-2.0, 3.0));
        assert_eq!(tri.extent_on_axis(2), (-1.0, 5.0));
    }

    #[test]
    fn classify_against_plane() {
        let plane = Plane::new(Vector3::new(0.0, 1.0, 0.0), 0.0);

        let front = make_triangle([0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 2.0, 1.0]);
        assert_eq!(front.classify(&plane), Classification::Front);

        let back = make_triangle([0.0, -1.0, 0.0], [1.0, -1.0, 0.0], [0.0, -2.0, 1.0]);
        assert_eq!(back.classify(&plane), Classification::Back);

        let coplanar = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        assert_eq!(coplanar.classify(&plane), Classification::Coplanar);

        let straddling = make_triangle([0.0, -1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 1.0]);
        assert_eq!(straddling.classify(&plane), Classification::Straddling);
    }

    #[test]
    fn fan_triangulate_quad() {
        let quad = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let triangles = fan_triangulate(&quad);
        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[0].vertices()[0], quad[0]);
        assert_eq!(triangles[1].vertices()[0], quad[0]);
    }

    #[test]
    fn fan_triangulate_too_few_vertices() {
        let edge = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        assert!(fan_triangulate(&edge).is_empty());
    }
}
