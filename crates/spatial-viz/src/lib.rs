//! Shared visualization utilities for the spatial-tree demos.

use std::hash::{Hash, Hasher};

use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::*;
use nalgebra::Vector3;
use spatial_tree::{Aabb, BoundingVolume, OctNode, Triangle, TriangleVisitor};

/// Generates a deterministic color from a triangle's vertices using hashing,
/// so clipped pieces keep consistent colors across frames.
pub fn triangle_color(triangle: &Triangle) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for v in triangle.vertices() {
        v.x.to_bits().hash(&mut hasher);
        v.y.to_bits().hash(&mut hasher);
        v.z.to_bits().hash(&mut hasher);
    }
    let hash = hasher.finish();

    let r = (((hash >> 16) & 0xFF) as u8).max(40);
    let g = (((hash >> 8) & 0xFF) as u8).max(40);
    let b = ((hash & 0xFF) as u8).max(40);

    Color::from_rgba(r, g, b, 255)
}

/// Draws one triangle as a macroquad mesh.
pub fn draw_triangle_3d(triangle: &Triangle, color: Color) {
    let vertices: Vec<Vertex> = triangle
        .vertices()
        .iter()
        .map(|p| Vertex::new2(vec3(p.x, p.y, p.z), vec2(0.0, 0.0), color))
        .collect();

    let mesh = Mesh {
        vertices,
        indices: vec![0, 1, 2],
        texture: None,
    };

    draw_mesh(&mesh);
}

/// Draws a box outline with lines.
pub fn draw_aabb_wires(aabb: &Aabb, color: Color) {
    let min = aabb.min();
    let max = aabb.max();
    let corner = |x: bool, y: bool, z: bool| {
        vec3(
            if x { max.x } else { min.x },
            if y { max.y } else { min.y },
            if z { max.z } else { min.z },
        )
    };

    let edges: [(Vec3, Vec3); 12] = [
        (corner(false, false, false), corner(true, false, false)),
        (corner(false, true, false), corner(true, true, false)),
        (corner(false, false, true), corner(true, false, true)),
        (corner(false, true, true), corner(true, true, true)),
        (corner(false, false, false), corner(false, true, false)),
        (corner(true, false, false), corner(true, true, false)),
        (corner(false, false, true), corner(false, true, true)),
        (corner(true, false, true), corner(true, true, true)),
        (corner(false, false, false), corner(false, false, true)),
        (corner(true, false, false), corner(true, false, true)),
        (corner(false, true, false), corner(false, true, true)),
        (corner(true, true, false), corner(true, true, true)),
    ];

    for (a, b) in edges {
        draw_line_3d(a, b, color);
    }
}

/// Draws a bounding volume's outline: boxes as wireframes, spheres as their
/// enclosing wireframe box (cheap and readable enough for debugging).
pub fn draw_bounds_wires(bounds: &BoundingVolume, color: Color) {
    draw_aabb_wires(&bounds.enclosing_aabb(), color);
}

/// Recursively draws octree cell outlines; populated cells get a brighter
/// color than empty interior ones.
pub fn draw_octree_cells(node: &OctNode) {
    let color = if node.triangles().is_empty() {
        Color::from_rgba(70, 70, 70, 255)
    } else {
        Color::from_rgba(200, 180, 60, 255)
    };
    draw_aabb_wires(&node.cube(), color);

    if let Some(children) = node.children() {
        for child in children {
            draw_octree_cells(child);
        }
    }
}

/// Visitor that renders every visited triangle group, hashing each
/// triangle's vertices for a stable color. Nodes that carry a draw color
/// (BSP leaves) use it for the whole group instead.
pub struct RenderVisitor;

impl TriangleVisitor for RenderVisitor {
    fn visit(&mut self, triangles: &[Triangle]) {
        for triangle in triangles {
            draw_triangle_3d(triangle, triangle_color(triangle));
        }
    }

    fn visit_colored(&mut self, triangles: &[Triangle], color: [f32; 4]) {
        let color = Color::new(color[0], color[1], color[2], color[3]);
        for triangle in triangles {
            draw_triangle_3d(triangle, color);
        }
    }
}

/// Simple orbit camera for 3D scene navigation.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
}

impl OrbitCamera {
    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target: vec3(0.0, 0.0, 0.0),
        }
    }

    /// Updates camera state from user input (mouse drag, scroll, arrow keys).
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }

        // Clamp pitch to avoid gimbal lock
        self.pitch = self.pitch.clamp(-1.5, 1.5);

        let scroll = mouse_wheel().1;
        self.distance = (self.distance - scroll * 2.0).clamp(2.0, 200.0);

        if is_key_down(KeyCode::Left) {
            self.yaw += 0.02;
        }
        if is_key_down(KeyCode::Right) {
            self.yaw -= 0.02;
        }
        if is_key_down(KeyCode::Up) {
            self.pitch += 0.02;
        }
        if is_key_down(KeyCode::Down) {
            self.pitch -= 0.02;
        }
    }

    /// Returns the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + vec3(x, y, z)
    }

    /// Converts to macroquad's Camera3D for rendering.
    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            ..Default::default()
        }
    }
}

/// A small demo scene: unit cubes at the given positions.
pub fn cube_scene(positions: &[[f32; 3]], kind: spatial_tree::BvKind) -> Vec<spatial_tree::SceneObject> {
    positions
        .iter()
        .map(|&[x, y, z]| {
            let (vertices, indices) = spatial_tree::object::unit_cube_mesh();
            spatial_tree::SceneObject::new(
                spatial_tree::Transform::from_translation(Vector3::new(x, y, z)),
                vertices,
                indices,
                kind,
            )
        })
        .collect()
}
