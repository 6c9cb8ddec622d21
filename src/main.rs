/*
 * Boid Point-Cloud Viewer
 *
 * A minimal host for the simulation: it steps the flock once per frame and
 * draws the position buffer as dots under a slowly orbiting orthographic view.
 *
 * Usage: boid-cloud [params.json]
 * Any field missing from the JSON file keeps its default value.
 */

use nannou::prelude::*;

use boid_cloud::{Flock, FlockParams};

const POINT_SIZE: f32 = 3.0;
const ORBIT_SPEED: f32 = 0.1;

struct Model {
    flock: Flock,
}

fn main() {
    env_logger::init();
    nannou::app(model).update(update).run();
}

fn model(app: &App) -> Model {
    app.new_window()
        .title("Boid Point Cloud")
        .size(1024, 768)
        .view(view)
        .build()
        .unwrap();

    let params = match std::env::args().nth(1) {
        Some(path) => FlockParams::load(&path).unwrap_or_else(|e| {
            log::error!("Failed to load parameters from {}: {}", path, e);
            std::process::exit(1);
        }),
        None => FlockParams::default(),
    };

    let flock = Flock::new(params).unwrap_or_else(|e| {
        log::error!("Cannot start simulation: {}", e);
        std::process::exit(1);
    });

    Model { flock }
}

fn update(app: &App, model: &mut Model, _update: Update) {
    model.flock.step(app.time);
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let half = model.flock.params().world_half_extent;
    let window_rect = app.window_rect();
    // Fit the cube's diagonal cross-section into the window
    let scale = window_rect.w().min(window_rect.h()) / (2.0 * half * 1.5);

    let (sin, cos) = (app.time * ORBIT_SPEED).sin_cos();
    for p in model.flock.positions().chunks_exact(3) {
        let x = p[0] * cos + p[2] * sin;
        let depth = -p[0] * sin + p[2] * cos;
        let brightness = map_range(depth, -half * 1.5, half * 1.5, 1.0, 0.3);

        draw.ellipse()
            .x_y(x * scale, p[1] * scale)
            .w_h(POINT_SIZE, POINT_SIZE)
            .color(rgba(0.75, 0.85, 1.0, brightness));
    }

    draw.to_frame(app, &frame).unwrap();
}
