/*
 * Steering Math Module
 *
 * Small vector helpers shared by the steering rules. Every helper treats a
 * near-zero input as "no direction" and returns the zero vector instead of
 * normalizing it, so a degenerate neighbourhood can never leak NaN into the
 * simulation state.
 */

use nannou::prelude::{vec3, Vec3};

pub const EPSILON: f32 = 1.0e-6;

// Rescale a vector to the given magnitude, or zero if it has no direction
pub fn set_magnitude(v: Vec3, magnitude: f32) -> Vec3 {
    let length_squared = v.length_squared();
    if length_squared <= EPSILON {
        return Vec3::ZERO;
    }

    v * (magnitude / length_squared.sqrt())
}

// Cap a vector's magnitude, leaving shorter vectors untouched
pub fn limit(v: Vec3, max_magnitude: f32) -> Vec3 {
    if max_magnitude <= 0.0 {
        return Vec3::ZERO;
    }

    let length_squared = v.length_squared();
    if length_squared <= max_magnitude * max_magnitude {
        return v;
    }

    v * (max_magnitude / length_squared.sqrt())
}

pub fn components(v: Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

/// Reynolds steering: the force that turns `velocity` toward `desired`
/// (already scaled to the desired speed), capped at `max_force`.
pub fn steer(desired: Vec3, velocity: Vec3, max_force: f32) -> Vec3 {
    limit(desired - velocity, max_force)
}

/// Lissajous point the flock is pulled toward at `time` seconds.
pub fn lissajous(time: f32, amplitude: f32, frequency: [f32; 3]) -> Vec3 {
    vec3(
        (time * frequency[0]).sin(),
        (time * frequency[1]).cos(),
        (time * frequency[2]).sin(),
    ) * amplitude
}
