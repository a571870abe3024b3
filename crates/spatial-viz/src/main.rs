use macroquad::prelude::*;

#[macroquad::main("Spatial Structures")]
async fn main() {
    loop {
        clear_background(BLACK);

        draw_text("Spatial Structure Visualization", 20.0, 40.0, 30.0, WHITE);
        draw_text(
            "Run one of the demo binaries: bsp_scene, octree_scene, bvh_scene",
            20.0,
            70.0,
            18.0,
            GRAY,
        );

        next_frame().await
    }
}
