use macroquad::prelude::*;
use spatial_tree::{Bvh, BvhConfig, BvhNode, BvhStrategy, BvKind, SceneObject, SplitMethod};
use spatial_viz::{cube_scene, draw_bounds_wires, draw_triangle_3d, triangle_color, OrbitCamera};

fn draw_hierarchy(node: &BvhNode, level: usize) {
    let shade = 255u8.saturating_sub((level * 40) as u8).max(60);
    let color = if node.is_leaf() {
        Color::from_rgba(80, 220, 80, 255)
    } else {
        Color::from_rgba(shade, shade, 100, 255)
    };
    draw_bounds_wires(node.bounds(), color);

    if let BvhNode::Internal { left, right, .. } = node {
        draw_hierarchy(left, level + 1);
        draw_hierarchy(right, level + 1);
    }
}

fn draw_objects(objects: &[SceneObject]) {
    for object in objects {
        for triangle in object.world_triangles() {
            draw_triangle_3d(&triangle, triangle_color(&triangle));
        }
    }
}

#[macroquad::main("BVH Scene")]
async fn main() {
    env_logger::init();

    let objects = cube_scene(
        &[
            [-3.0, 0.0, 0.0],
            [-1.0, 0.0, 0.5],
            [1.0, 0.0, -0.5],
            [3.0, 0.0, 0.0],
            [0.0, 2.0, 0.0],
            [0.0, -2.0, 0.0],
        ],
        BvKind::Aabb,
    );

    let top_down = Bvh::build(
        &objects,
        &BvhConfig {
            strategy: BvhStrategy::TopDown(SplitMethod::MedianCenter),
            ..BvhConfig::default()
        },
    );
    let bottom_up = Bvh::build(
        &objects,
        &BvhConfig {
            strategy: BvhStrategy::BottomUp(Default::default()),
            ..BvhConfig::default()
        },
    );
    log::info!(
        "top-down: {} leaves, depth {} | bottom-up: {} leaves, depth {}",
        top_down.leaf_count(),
        top_down.depth(),
        bottom_up.leaf_count(),
        bottom_up.depth()
    );

    let mut camera = OrbitCamera::new(12.0, 0.5, 0.4);
    let mut show_top_down = true;

    loop {
        camera.update();

        if is_key_pressed(KeyCode::Tab) {
            show_top_down = !show_top_down;
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        draw_objects(&objects);

        let tree = if show_top_down { &top_down } else { &bottom_up };
        if let Some(root) = tree.root() {
            draw_hierarchy(root, 0);
        }

        set_default_camera();

        let label = if show_top_down { "top-down" } else { "bottom-up" };
        draw_text(
            &format!(
                "BVH Scene ({label}) - {} leaves, depth {}",
                tree.leaf_count(),
                tree.depth()
            ),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text("Tab: switch build strategy", 10.0, 45.0, 18.0, GRAY);
        draw_text("Drag mouse to rotate, scroll to zoom", 10.0, 65.0, 16.0, DARKGRAY);
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 85.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
