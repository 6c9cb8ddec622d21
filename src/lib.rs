/*
 * Boid Point-Cloud Simulation - Module Definitions
 *
 * This file defines the module structure of the flocking simulation.
 * The library owns the simulation only; a host drives `Flock::step` once
 * per frame and uploads `Flock::positions` to whatever renders the cloud.
 */

// Re-export key components for easier access
pub use boid::Boid;
pub use error::{ConfigError, ParamsLoadError};
pub use flock::Flock;
pub use params::{Attractor, FlockParams, SteeringWeights};

// Define modules
pub mod boid;
pub mod error;
pub mod flock;
pub mod math;
pub mod params;
