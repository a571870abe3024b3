use macroquad::prelude::*;
use spatial_tree::{BvKind, Octree, OctreeConfig, SphereFit};
use spatial_viz::{cube_scene, draw_octree_cells, OrbitCamera, RenderVisitor};

#[macroquad::main("Octree Scene")]
async fn main() {
    env_logger::init();

    let objects = cube_scene(
        &[
            [-2.0, 0.0, -2.0],
            [2.0, 0.0, -2.0],
            [-2.0, 0.0, 2.0],
            [2.0, 0.0, 2.0],
            [0.0, 1.5, 0.0],
        ],
        BvKind::Sphere(SphereFit::Ritter),
    );

    let config = OctreeConfig {
        triangle_threshold: 8,
        ..OctreeConfig::default()
    };
    let tree = Octree::build(&objects, &config);
    log::info!(
        "octree built: {} triangles, depth {}",
        tree.triangle_count(),
        tree.depth()
    );

    let mut camera = OrbitCamera::new(12.0, 0.5, 0.5);
    let mut show_cells = true;

    loop {
        camera.update();

        if is_key_pressed(KeyCode::C) {
            show_cells = !show_cells;
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        let mut visitor = RenderVisitor;
        tree.traverse_preorder(&mut visitor);

        if show_cells {
            if let Some(root) = tree.root() {
                draw_octree_cells(root);
            }
        }

        set_default_camera();

        draw_text(
            &format!(
                "Octree Scene - {} triangles, depth {}",
                tree.triangle_count(),
                tree.depth()
            ),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text("C: toggle cell outlines", 10.0, 45.0, 18.0, GRAY);
        draw_text("Drag mouse to rotate, scroll to zoom", 10.0, 65.0, 16.0, DARKGRAY);
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 85.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
