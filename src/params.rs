/*
 * Flock Parameters Module
 *
 * This module defines the FlockParams struct that holds every construction-time
 * setting of the simulation: population size, world extent, kinematic limits,
 * perception radii and the relative weights of the steering rules. The
 * parameters are fixed once a flock is built; changing them means building
 * a new flock.
 */

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ParamsLoadError};

// Relative dominance of each steering rule in the summed acceleration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringWeights {
    pub alignment: f32,
    pub cohesion: f32,
    pub separation: f32,
    pub center: f32,
}

impl Default for SteeringWeights {
    fn default() -> Self {
        Self {
            alignment: 1.2,
            cohesion: 1.0,
            separation: 1.5,
            center: 0.8,
        }
    }
}

/// The moving point the whole flock drifts toward.
///
/// At time `t` (seconds) it sits at
/// `amplitude * (sin(t*f0), cos(t*f1), sin(t*f2))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attractor {
    pub amplitude: f32,
    pub frequency: [f32; 3],
}

impl Default for Attractor {
    fn default() -> Self {
        Self {
            amplitude: 100.0,
            frequency: [0.15, 0.1, 0.2],
        }
    }
}

// Parameters for a flock, fixed at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockParams {
    pub agent_count: usize,
    pub world_half_extent: f32,
    pub max_speed: f32,
    pub max_force: f32,
    pub alignment_radius: f32,
    pub cohesion_radius: f32,
    pub separation_radius: f32,
    pub weights: SteeringWeights,
    pub attractor: Attractor,
    // Initial velocity is drawn per axis from [-initial_speed, initial_speed)
    pub initial_speed: f32,
    // None seeds the initial conditions from entropy
    pub seed: Option<u64>,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            agent_count: 400,
            world_half_extent: 250.0,
            max_speed: 3.5,
            max_force: 0.15,
            alignment_radius: 60.0,
            cohesion_radius: 60.0,
            separation_radius: 40.0,
            weights: SteeringWeights::default(),
            attractor: Attractor::default(),
            initial_speed: 1.0,
            seed: None,
        }
    }
}

impl FlockParams {
    /// Reject parameters that would produce a degenerate or NaN simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent_count == 0 {
            return Err(ConfigError::EmptyFlock);
        }

        positive("world_half_extent", self.world_half_extent)?;
        positive("max_speed", self.max_speed)?;
        positive("max_force", self.max_force)?;
        positive("alignment_radius", self.alignment_radius)?;
        positive("cohesion_radius", self.cohesion_radius)?;
        positive("separation_radius", self.separation_radius)?;
        positive("initial_speed", self.initial_speed)?;

        finite("weights.alignment", self.weights.alignment)?;
        finite("weights.cohesion", self.weights.cohesion)?;
        finite("weights.separation", self.weights.separation)?;
        finite("weights.center", self.weights.center)?;

        finite("attractor.amplitude", self.attractor.amplitude)?;
        for f in self.attractor.frequency {
            finite("attractor.frequency", f)?;
        }

        Ok(())
    }

    /// Load parameters from a JSON file; missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamsLoadError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let params: FlockParams = serde_json::from_str(&text)?;
        params.validate()?;
        log::debug!("Loaded flock parameters from {:?}: {:?}", path.as_ref(), params);
        Ok(params)
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}
