//! Triangle splitting and polygon clipping against planes.

use nalgebra::Point3;

use crate::triangle::fan_triangulate;
use crate::{Classification, Plane, PlaneSide, Triangle};

/// The two triangle lists produced by splitting geometry with a plane.
#[derive(Debug, Default)]
pub struct SplitTriangles {
    /// Pieces on the front side of the plane.
    pub front: Vec<Triangle>,
    /// Pieces on the back side of the plane.
    pub back: Vec<Triangle>,
}

/// Splits a triangle against a plane into front and back pieces.
///
/// Non-straddling triangles pass through whole: `Front` and `Coplanar`
/// triangles go to the front list, `Back` triangles to the back list.
///
/// A straddling triangle is cut by walking its three edges in order:
/// - a front vertex is emitted to the front polygon, a back vertex to the
///   back polygon;
/// - a vertex lying on the plane is always emitted to the front polygon, and
///   to the back polygon as well only if the preceding vertex was behind the
///   plane;
/// - an edge crossing the plane emits the exact intersection point to both
///   polygons.
///
/// The resulting 3-4 sided convex polygons are fan-triangulated.
pub fn split_triangle(triangle: &Triangle, plane: &Plane) -> SplitTriangles {
    let mut out = SplitTriangles::default();

    match triangle.classify(plane) {
        Classification::Front | Classification::Coplanar => {
            out.front.push(triangle.clone());
        }
        Classification::Back => {
            out.back.push(triangle.clone());
        }
        Classification::Straddling => {
            let vertices = triangle.vertices();
            let sides: [PlaneSide; 3] =
                core::array::from_fn(|i| plane.classify_point(vertices[i]));

            let mut front_verts: Vec<Point3<f32>> = Vec::with_capacity(4);
            let mut back_verts: Vec<Point3<f32>> = Vec::with_capacity(4);

            for i in 0..3 {
                let current = vertices[i];
                let prev_side = sides[(i + 2) % 3];

                match sides[i] {
                    PlaneSide::Front => front_verts.push(current),
                    PlaneSide::Back => back_verts.push(current),
                    PlaneSide::OnPlane => {
                        front_verts.push(current);
                        if prev_side == PlaneSide::Back {
                            back_verts.push(current);
                        }
                    }
                }

                let next_idx = (i + 1) % 3;
                let crosses = matches!(
                    (sides[i], sides[next_idx]),
                    (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
                );

                if crosses {
                    if let Some((_, intersection)) =
                        plane.intersect_segment(current, vertices[next_idx])
                    {
                        front_verts.push(intersection);
                        back_verts.push(intersection);
                    }
                }
            }

            out.front = fan_triangulate(&front_verts);
            out.back = fan_triangulate(&back_verts);
        }
    }

    out
}

/// Clips a convex polygon against a half-space, keeping the part on `keep`'s
/// side of the plane. On-plane vertices are always kept.
///
/// Standard Sutherland-Hodgman step; returns an empty list when nothing
/// survives.
pub fn clip_polygon(vertices: &[Point3<f32>], plane: &Plane, keep: PlaneSide) -> Vec<Point3<f32>> {
    debug_assert!(keep != PlaneSide::OnPlane, "keep side must be Front or Back");

    let n = vertices.len();
    if n < 3 {
        return Vec::new();
    }

    let sides: Vec<PlaneSide> = vertices.iter().map(|v| plane.classify_point(*v)).collect();
    let mut result = Vec::with_capacity(n + 1);

    for i in 0..n {
        let current = vertices[i];
        let next_idx = (i + 1) % n;

        if sides[i] == keep || sides[i] == PlaneSide::OnPlane {
            result.push(current);
        }

        let crosses = matches!(
            (sides[i], sides[next_idx]),
            (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
        );

        if crosses {
            if let Some((_, intersection)) = plane.intersect_segment(current, vertices[next_idx]) {
                result.push(intersection);
            }
        }
    }

    result
}

/// Clips a triangle to the intersection of several half-spaces, returning the
/// surviving pieces as triangles.
///
/// Each entry pairs a plane with the side to keep. Used by the octree to cut
/// a straddling triangle down to a candidate octant.
pub fn clip_triangle_to_halfspaces(
    triangle: &Triangle,
    halfspaces: &[(Plane, PlaneSide)],
) -> Vec<Triangle> {
    let mut polygon: Vec<Point3<f32>> = triangle.vertices().to_vec();

    for (plane, keep) in halfspaces {
        polygon = clip_polygon(&polygon, plane, *keep);
        if polygon.len() < 3 {
            return Vec::new();
        }
    }

    fan_triangulate(&polygon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PLANE_EPSILON;
    use nalgebra::Vector3;

    fn make_triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
        Triangle::new(
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        )
    }

    /// The 12 triangles of an axis-aligned cube (2 per face).
    fn cube_triangles(center: Point3<f32>, size: f32) -> Vec<Triangle> {
        let h = size / 2.0;
        let corner = |x: f32, y: f32, z: f32| {
            Point3::new(center.x + x * h, center.y + y * h, center.z + z * h)
        };

        let faces: [[Point3<f32>; 4]; 6] = [
            // +Z, -Z, -X, +X, +Y, -Y
            [
                corner(-1.0, -1.0, 1.0),
                corner(1.0, -1.0, 1.0),
                corner(1.0, 1.0, 1.0),
                corner(-1.0, 1.0, 1.0),
            ],
            [
                corner(1.0, -1.0, -1.0),
                corner(-1.0, -1.0, -1.0),
                corner(-1.0, 1.0, -1.0),
                corner(1.0, 1.0, -1.0),
            ],
            [
                corner(-1.0, -1.0, -1.0),
                corner(-1.0, -1.0, 1.0),
                corner(-1.0, 1.0, 1.0),
                corner(-1.0, 1.0, -1.0),
            ],
            [
                corner(1.0, -1.0, 1.0),
                corner(1.0, -1.0, -1.0),
                corner(1.0, 1.0, -1.0),
                corner(1.0, 1.0, 1.0),
            ],
            [
                corner(-1.0, 1.0, 1.0),
                corner(1.0, 1.0, 1.0),
                corner(1.0, 1.0, -1.0),
                corner(-1.0, 1.0, -1.0),
            ],
            [
                corner(-1.0, -1.0, -1.0),
                corner(1.0, -1.0, -1.0),
                corner(1.0, -1.0, 1.0),
                corner(-1.0, -1.0, 1.0),
            ],
        ];

        faces
            .iter()
            .flat_map(|quad| fan_triangulate(quad))
            .collect()
    }

    #[test]
    fn front_triangle_passes_through() {
        let plane = Plane::new(Vector3::new(0.0, 1.0, 0.0), 0.0);
        let tri = make_triangle([0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 2.0, 1.0]);

        let split = split_triangle(&tri, &plane);
        assert_eq!(split.front.len(), 1);
        assert!(split.back.is_empty());
        assert_eq!(split.front[0], tri);
    }

    #[test]
    fn coplanar_triangle_routes_front() {
        let plane = Plane::new(Vector3::new(0.0, 1.0, 0.0), 0.0);
        let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);

        let split = split_triangle(&tri, &plane);
        assert_eq!(split.front.len(), 1);
        assert!(split.back.is_empty());
    }

    #[test]
    fn straddling_triangle_splits_both_sides() {
        let plane = Plane::new(Vector3::new(0.0, 1.0, 0.0), 0.0);
        // One vertex above, two below: front gets the tip (one triangle),
        // back gets a quad (two triangles).
        let tri = make_triangle([0.0, 2.0, 0.0], [-1.0, -1.0, 0.0], [1.0, -1.0, 0.0]);

        let split = split_triangle(&tri, &plane);
        assert_eq!(split.front.len(), 1);
        assert_eq!(split.back.len(), 2);

        for piece in split.front.iter().chain(split.back.iter()) {
            assert_ne!(piece.classify(&plane), Classification::Straddling);
        }
    }

    #[test]
    fn on_plane_vertex_goes_front() {
        let plane = Plane::new(Vector3::new(0.0, 1.0, 0.0), 0.0);
        // One vertex exactly on the plane, one above, one below.
        let tri = make_triangle([0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [-1.0, -1.0, 1.0]);

        let split = split_triangle(&tri, &plane);
        assert_eq!(split.front.len(), 1);
        assert_eq!(split.back.len(), 1);

        // The on-plane vertex must appear in the front piece.
        let on_plane = Point3::new(0.0, 0.0, 0.0);
        assert!(split.front[0].vertices().contains(&on_plane));
    }

    #[test]
    fn cube_against_oblique_plane() {
        let triangles = cube_triangles(Point3::new(0.0, 0.0, 0.0), 2.0);
        assert_eq!(triangles.len(), 12);

        let plane = Plane::new(Vector3::new(1.0, 1.0, 1.0), 0.25);
        let mut pieces = Vec::new();
        for tri in &triangles {
            let split = split_triangle(tri, &plane);
            pieces.extend(split.front);
            pieces.extend(split.back);
        }

        assert!(pieces.len() >= 12);
        for piece in &pieces {
            assert_ne!(piece.classify(&plane), Classification::Straddling);
        }
    }

    #[test]
    fn clip_polygon_keeps_requested_side() {
        let plane = Plane::new(Vector3::new(1.0, 0.0, 0.0), 0.0);
        let quad = [
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 1.0, 0.0),
        ];

        let kept = clip_polygon(&quad, &plane, PlaneSide::Front);
        assert!(kept.len() >= 3);
        for v in &kept {
            assert!(v.x >= -PLANE_EPSILON);
        }
    }

    #[test]
    fn clip_triangle_fully_outside_halfspace() {
        let plane = Plane::new(Vector3::new(1.0, 0.0, 0.0), 0.0);
        let tri = make_triangle([-2.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 1.0, 0.0]);

        let pieces = clip_triangle_to_halfspaces(&tri, &[(plane, PlaneSide::Front)]);
        assert!(pieces.is_empty());
    }
}
