/*
 * Flock Module
 *
 * This module owns the boid population and advances it one frame at a time.
 * Each step runs in two passes:
 * 1. Every boid accumulates its steering forces against a snapshot of the
 *    previous frame, so no boid sees a neighbour that has already moved.
 * 2. Every boid integrates, wraps at the world bounds, and its position is
 *    copied into the flat buffer the renderer reads.
 *
 * The neighbour scan is a plain O(n^2) pass over the snapshot.
 */

use nannou::prelude::{vec3, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::boid::Boid;
use crate::error::ConfigError;
use crate::math::components;
use crate::params::FlockParams;

pub struct Flock {
    boids: Vec<Boid>,
    params: FlockParams,
    // Scratch copy of the population read during the steering pass
    snapshot: Vec<Boid>,
    // [x0, y0, z0, x1, y1, z1, ...] mirroring boid positions
    positions: Vec<f32>,
    frame: u64,
}

impl Flock {
    /// Build a flock with randomized positions and velocities.
    pub fn new(params: FlockParams) -> Result<Self, ConfigError> {
        params.validate()?;

        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let half = params.world_half_extent;
        let speed = params.initial_speed;
        let boids = (0..params.agent_count)
            .map(|id| {
                let position = vec3(
                    rng.gen_range(-half..half),
                    rng.gen_range(-half..half),
                    rng.gen_range(-half..half),
                );
                let velocity = vec3(
                    rng.gen_range(-speed..speed),
                    rng.gen_range(-speed..speed),
                    rng.gen_range(-speed..speed),
                );
                Boid::new(id, position, velocity)
            })
            .collect();

        Ok(Self::assemble(params, boids))
    }

    /// Build a flock from explicit initial conditions.
    ///
    /// Ids are reassigned by index, pending acceleration is discarded, the
    /// population size overrides `params.agent_count`, and every boid takes
    /// the kinematic limits from `params`.
    pub fn from_boids(mut params: FlockParams, boids: Vec<Boid>) -> Result<Self, ConfigError> {
        params.agent_count = boids.len();
        params.validate()?;

        let boids = boids
            .into_iter()
            .enumerate()
            .map(|(id, boid)| Boid {
                id,
                acceleration: Vec3::ZERO,
                ..boid
            })
            .collect();

        Ok(Self::assemble(params, boids))
    }

    fn assemble(params: FlockParams, boids: Vec<Boid>) -> Self {
        let boids: Vec<Boid> = boids
            .into_iter()
            .map(|boid| boid.with_limits(params.max_speed, params.max_force))
            .collect();

        let mut positions = Vec::with_capacity(boids.len() * 3);
        for boid in &boids {
            positions.extend_from_slice(&components(boid.position));
        }

        log::info!(
            "Flock initialized with {} boids in a cube of half-extent {}",
            boids.len(),
            params.world_half_extent
        );
        log::debug!("Flock parameters: {:?}", params);

        Self {
            snapshot: Vec::with_capacity(boids.len()),
            boids,
            params,
            positions,
            frame: 0,
        }
    }

    /// Advance every boid by one frame. `time` drives the attractor, in seconds.
    pub fn step(&mut self, time: f32) {
        self.snapshot.clear();
        self.snapshot.extend_from_slice(&self.boids);

        for boid in &mut self.boids {
            boid.flock(&self.snapshot, time, &self.params);
        }

        let bound = self.params.world_half_extent;
        for (boid, slot) in self.boids.iter_mut().zip(self.positions.chunks_exact_mut(3)) {
            boid.update();
            boid.edges(bound);
            slot.copy_from_slice(&components(boid.position));
        }

        self.frame += 1;
        log::trace!("Flock step {} at t = {}", self.frame, time);

        #[cfg(debug_assertions)]
        self.debug_validate_state();
    }

    /// Flat `[x, y, z]` position buffer, one triple per boid, valid until
    /// the next `step`.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn params(&self) -> &FlockParams {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    // Number of completed steps
    pub fn frame(&self) -> u64 {
        self.frame
    }

    // Centroid of the whole population
    pub fn center_of_mass(&self) -> Vec3 {
        let sum = self.boids.iter().fold(Vec3::ZERO, |acc, boid| acc + boid.position);
        sum / self.boids.len() as f32
    }

    #[cfg(debug_assertions)]
    fn debug_validate_state(&self) {
        if let Some(boid) = self
            .boids
            .iter()
            .find(|boid| !boid.position.is_finite() || !boid.velocity.is_finite())
        {
            log::warn!(
                "Boid {} has non-finite state at frame {}: position {:?}, velocity {:?}",
                boid.id,
                self.frame,
                boid.position,
                boid.velocity
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(count: usize, seed: u64) -> Flock {
        Flock::new(FlockParams {
            agent_count: count,
            seed: Some(seed),
            ..FlockParams::default()
        })
        .unwrap()
    }

    // A dense flock where most boids see each other, so ordering bugs show
    fn crowded(count: usize, seed: u64) -> Flock {
        Flock::new(FlockParams {
            agent_count: count,
            world_half_extent: 40.0,
            seed: Some(seed),
            ..FlockParams::default()
        })
        .unwrap()
    }

    // Same two passes as `step`, visiting boids in the given order
    fn step_in_order(flock: &mut Flock, order: &[usize], time: f32) {
        let snapshot = flock.boids.clone();
        for &i in order {
            flock.boids[i].flock(&snapshot, time, &flock.params);
        }
        let bound = flock.params.world_half_extent;
        for &i in order {
            let boid = &mut flock.boids[i];
            boid.update();
            boid.edges(bound);
            flock.positions[3 * i..3 * i + 3].copy_from_slice(&components(boid.position));
        }
    }

    // Update-as-you-go: later boids see earlier boids' new state
    fn naive_step_in_order(flock: &mut Flock, order: &[usize], time: f32) {
        let bound = flock.params.world_half_extent;
        for &i in order {
            let current = flock.boids.clone();
            let boid = &mut flock.boids[i];
            boid.flock(&current, time, &flock.params);
            boid.update();
            boid.edges(bound);
        }
    }

    #[test]
    fn rejects_invalid_params() {
        let result = Flock::new(FlockParams {
            agent_count: 0,
            ..FlockParams::default()
        });
        assert!(matches!(result, Err(ConfigError::EmptyFlock)));

        let result = Flock::from_boids(FlockParams::default(), Vec::new());
        assert!(matches!(result, Err(ConfigError::EmptyFlock)));
    }

    #[test]
    fn initial_conditions_respect_params() {
        let flock = seeded(200, 7);
        let params = flock.params().clone();

        assert_eq!(flock.len(), 200);
        assert_eq!(flock.positions().len(), 600);
        for (i, boid) in flock.boids().iter().enumerate() {
            assert_eq!(boid.id, i);
            assert_eq!(boid.acceleration, Vec3::ZERO);
            assert_eq!(boid.max_speed, params.max_speed);
            assert_eq!(boid.max_force, params.max_force);
            for c in components(boid.position) {
                assert!(c >= -params.world_half_extent && c < params.world_half_extent);
            }
            for c in components(boid.velocity) {
                assert!(c >= -params.initial_speed && c < params.initial_speed);
            }
        }
    }

    #[test]
    fn same_seed_same_flock() {
        let a = seeded(50, 99);
        let b = seeded(50, 99);
        assert_eq!(a.boids(), b.boids());
    }

    #[test]
    fn from_boids_reassigns_ids_and_limits() {
        let params = FlockParams {
            max_speed: 2.0,
            max_force: 0.05,
            ..FlockParams::default()
        };
        let mut pushed = Boid::new(42, vec3(1.0, 0.0, 0.0), Vec3::ZERO);
        pushed.apply_force(vec3(50.0, 0.0, 0.0));
        let boids = vec![Boid::new(42, Vec3::ZERO, Vec3::ZERO), pushed];
        let flock = Flock::from_boids(params, boids).unwrap();

        assert_eq!(flock.params().agent_count, 2);
        assert_eq!(flock.boids()[0].id, 0);
        assert_eq!(flock.boids()[1].id, 1);
        assert!(flock.boids().iter().all(|b| b.max_speed == 2.0 && b.max_force == 0.05));
        assert!(flock.boids().iter().all(|b| b.acceleration == Vec3::ZERO));
        assert_eq!(flock.positions(), &[0.0_f32, 0.0, 0.0, 1.0, 0.0, 0.0][..]);
    }

    #[test]
    fn tiny_world_keeps_fast_boids_inside() {
        let params = FlockParams {
            world_half_extent: 1.0,
            ..FlockParams::default()
        };
        let boids = vec![
            Boid::new(0, vec3(0.9, 0.0, 0.0), vec3(3.5, 0.0, 0.0)),
            Boid::new(1, vec3(-0.5, 0.5, -0.9), vec3(0.0, -2.0, -3.0)),
        ];
        let mut flock = Flock::from_boids(params, boids).unwrap();

        for frame in 0..50 {
            flock.step(frame as f32 / 60.0);
            for &c in flock.positions() {
                assert!(c.abs() <= 1.0, "coordinate {} escaped the world", c);
            }
        }
    }

    #[test]
    fn step_keeps_invariants() {
        let mut flock = seeded(150, 3);
        let bound = flock.params().world_half_extent;

        for frame in 0..100 {
            flock.step(frame as f32 / 60.0);

            for (i, boid) in flock.boids().iter().enumerate() {
                assert!(boid.speed() <= boid.max_speed + 1e-4);
                assert_eq!(boid.acceleration, Vec3::ZERO);
                for c in components(boid.position) {
                    assert!(c.abs() <= bound);
                }
                assert_eq!(&flock.positions()[3 * i..3 * i + 3], &components(boid.position));
            }
        }
        assert_eq!(flock.frame(), 100);
    }

    #[test]
    fn two_pass_step_is_order_independent() {
        let mut forward = crowded(60, 11);
        let mut reverse = crowded(60, 11);
        let mut reference = crowded(60, 11);
        let ascending: Vec<usize> = (0..60).collect();
        let descending: Vec<usize> = (0..60).rev().collect();

        for frame in 0..30 {
            let t = frame as f32 / 60.0;
            step_in_order(&mut forward, &ascending, t);
            step_in_order(&mut reverse, &descending, t);
            reference.step(t);
        }

        assert_eq!(forward.boids(), reverse.boids());
        assert_eq!(forward.boids(), reference.boids());
        assert_eq!(forward.positions(), reference.positions());
    }

    #[test]
    fn interleaved_update_depends_on_order() {
        let mut forward = crowded(60, 11);
        let mut reverse = crowded(60, 11);
        let ascending: Vec<usize> = (0..60).collect();
        let descending: Vec<usize> = (0..60).rev().collect();

        for frame in 0..30 {
            let t = frame as f32 / 60.0;
            naive_step_in_order(&mut forward, &ascending, t);
            naive_step_in_order(&mut reverse, &descending, t);
        }

        assert_ne!(forward.boids(), reverse.boids());
    }

    #[test]
    fn center_of_mass_of_two() {
        let boids = vec![
            Boid::new(0, vec3(-10.0, 0.0, 4.0), Vec3::ZERO),
            Boid::new(1, vec3(10.0, 2.0, 0.0), Vec3::ZERO),
        ];
        let flock = Flock::from_boids(FlockParams::default(), boids).unwrap();
        assert_eq!(flock.center_of_mass(), vec3(0.0, 1.0, 2.0));
    }
}
