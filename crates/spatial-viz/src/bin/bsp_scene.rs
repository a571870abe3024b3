use macroquad::prelude::*;
use spatial_tree::{BspConfig, BspTree, BvKind};
use spatial_viz::{cube_scene, OrbitCamera, RenderVisitor};

const SAVE_PATH: &str = "bsp_scene.json";

#[macroquad::main("BSP Scene")]
async fn main() {
    env_logger::init();

    let objects = cube_scene(
        &[
            [-1.5, 0.0, 0.0],
            [1.5, 0.0, 0.0],
            [0.0, 0.0, -1.8],
            [0.0, 1.2, 0.0],
        ],
        BvKind::Aabb,
    );
    log::info!("scene: {} objects", objects.len());

    let mut tree = BspTree::build(&objects, &BspConfig::default());
    log::info!(
        "bsp built: {} triangles across {} nodes, depth {}",
        tree.triangle_count(),
        tree.node_count(),
        tree.depth()
    );

    let mut status = String::from("press S to save, L to load");

    let mut camera = OrbitCamera::new(8.0, 0.5, 0.4);

    loop {
        camera.update();

        if is_key_pressed(KeyCode::S) {
            status = match tree.save_to(SAVE_PATH) {
                Ok(()) => format!("saved to {SAVE_PATH}"),
                Err(err) => format!("save failed: {err}"),
            };
        }
        if is_key_pressed(KeyCode::L) {
            match BspTree::load_from(SAVE_PATH) {
                Ok(loaded) => {
                    tree = loaded;
                    status = format!("loaded from {SAVE_PATH}");
                }
                Err(err) => status = format!("load failed: {err}"),
            }
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        let mut visitor = RenderVisitor;
        tree.traverse_preorder(&mut visitor);

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0), BLUE);

        set_default_camera();

        draw_text(
            &format!(
                "BSP Scene - {} triangles, {} nodes, depth {}",
                tree.triangle_count(),
                tree.node_count(),
                tree.depth()
            ),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(&status, 10.0, 45.0, 18.0, GRAY);
        draw_text("Drag mouse to rotate, scroll to zoom", 10.0, 65.0, 16.0, DARKGRAY);
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 85.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
