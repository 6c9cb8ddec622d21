/*
 * Boid Module
 *
 * This module defines the Boid struct and its behavior.
 * Each boid steers by four rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 * 4. Centering: Drift towards a slowly moving point near the origin
 *
 * A boid never sees the flock as a whole, only the slice of boids it is
 * handed. It recognises itself in that slice by id, never by distance.
 */

use nannou::prelude::Vec3;

use crate::math::{self, lissajous};
use crate::params::{Attractor, FlockParams};

/// Separation ignores neighbours closer than this, where the inverse-square
/// push has no usable direction.
pub const MIN_SEPARATION_DISTANCE: f32 = 1.0e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    pub id: usize,
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub max_speed: f32,
    pub max_force: f32,
}

impl Boid {
    pub fn new(id: usize, position: Vec3, velocity: Vec3) -> Self {
        Self {
            id,
            position,
            velocity,
            acceleration: Vec3::ZERO,
            max_speed: 3.5,
            max_force: 0.15,
        }
    }

    pub fn with_limits(mut self, max_speed: f32, max_force: f32) -> Self {
        self.max_speed = max_speed;
        self.max_force = max_force;
        self
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    // Apply a force to the boid
    pub fn apply_force(&mut self, force: Vec3) {
        self.acceleration += force;
    }

    // Update the boid's position based on its velocity and acceleration
    pub fn update(&mut self) {
        self.velocity = math::limit(self.velocity + self.acceleration, self.max_speed);
        self.position += self.velocity;
        self.acceleration = Vec3::ZERO;
    }

    /// Wrap the boid around the world cube `[-bound, bound]` on each axis.
    ///
    /// A coordinate that overshoots one face reappears past the opposite face
    /// by the same overshoot.
    pub fn edges(&mut self, bound: f32) {
        self.position.x = wrap_axis(self.position.x, bound);
        self.position.y = wrap_axis(self.position.y, bound);
        self.position.z = wrap_axis(self.position.z, bound);
    }

    // Steer towards the average heading of neighbors
    pub fn align(&self, boids: &[Boid], perception_radius: f32) -> Vec3 {
        let radius_squared = perception_radius * perception_radius;
        let mut sum = Vec3::ZERO;
        let mut count = 0;

        for other in self.others(boids) {
            if self.position.distance_squared(other.position) < radius_squared {
                sum += other.velocity;
                count += 1;
            }
        }

        if count == 0 {
            return Vec3::ZERO;
        }

        self.steer_along(sum / count as f32)
    }

    // Steer towards the average position of neighbors
    pub fn cohere(&self, boids: &[Boid], perception_radius: f32) -> Vec3 {
        let radius_squared = perception_radius * perception_radius;
        let mut centroid = Vec3::ZERO;
        let mut count = 0;

        for other in self.others(boids) {
            if self.position.distance_squared(other.position) < radius_squared {
                centroid += other.position;
                count += 1;
            }
        }

        if count == 0 {
            return Vec3::ZERO;
        }

        centroid /= count as f32;
        self.steer_along(centroid - self.position)
    }

    // Steer away from neighbors that are too close, harder the closer they are
    pub fn separate(&self, boids: &[Boid], perception_radius: f32) -> Vec3 {
        let radius_squared = perception_radius * perception_radius;
        let min_squared = MIN_SEPARATION_DISTANCE * MIN_SEPARATION_DISTANCE;
        let mut push = Vec3::ZERO;
        let mut count = 0;

        for other in self.others(boids) {
            let d_squared = self.position.distance_squared(other.position);
            if d_squared < min_squared || d_squared >= radius_squared {
                continue;
            }

            push += (self.position - other.position) / d_squared;
            count += 1;
        }

        if count == 0 {
            return Vec3::ZERO;
        }

        self.steer_along(push / count as f32)
    }

    /// Pull towards the flock's attractor at `time` seconds.
    ///
    /// Unlike the neighbour rules this is the raw offset to the attractor,
    /// capped at `max_force`, not a desired-minus-current velocity.
    pub fn attract_to_center(&self, time: f32, attractor: &Attractor) -> Vec3 {
        let target = lissajous(time, attractor.amplitude, attractor.frequency);
        math::limit(target - self.position, self.max_force)
    }

    /// Accumulate all four weighted steering rules into `acceleration`.
    ///
    /// `boids` may include this boid; it is skipped by id.
    pub fn flock(&mut self, boids: &[Boid], time: f32, params: &FlockParams) {
        let weights = &params.weights;
        let alignment = self.align(boids, params.alignment_radius) * weights.alignment;
        let cohesion = self.cohere(boids, params.cohesion_radius) * weights.cohesion;
        let separation = self.separate(boids, params.separation_radius) * weights.separation;
        let center = self.attract_to_center(time, &params.attractor) * weights.center;

        self.apply_force(alignment);
        self.apply_force(cohesion);
        self.apply_force(separation);
        self.apply_force(center);
    }

    fn others<'a>(&'a self, boids: &'a [Boid]) -> impl Iterator<Item = &'a Boid> + 'a {
        boids.iter().filter(move |other| other.id != self.id)
    }

    // Reynolds: steering = desired - velocity, where desired points along
    // `direction` at full speed. A near-zero direction (e.g. the centroid
    // sitting on this boid) returns zero rather than braking with -velocity.
    fn steer_along(&self, direction: Vec3) -> Vec3 {
        let desired = math::set_magnitude(direction, self.max_speed);
        if desired == Vec3::ZERO {
            return Vec3::ZERO;
        }

        math::steer(desired, self.velocity, self.max_force)
    }
}

// Points on a face stay put; anything outside goes all the way round, however
// many world widths it overshoots by
fn wrap_axis(value: f32, bound: f32) -> f32 {
    if (-bound..=bound).contains(&value) {
        return value;
    }

    let wrapped = (value + bound).rem_euclid(2.0 * bound) - bound;
    wrapped.clamp(-bound, bound)
}
