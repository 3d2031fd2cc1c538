//! CPU particle simulation.
//!
//! A [`ParticleEmitter`] owns a fixed pool of [`Particle`]s, spawns them in
//! bursts according to its [`EmitterShape`], ages them and runs its
//! [`Affector`]s over the live ones every update.

mod affector;
mod emitter;
mod particle;
mod shape;

pub use affector::Affector;
pub use emitter::{EmitterSettings, ParticleEmitter};
pub use particle::Particle;
pub use shape::EmitterShape;
