//! Cosmetic particle effects.

mod field;
mod particle;

pub use field::ParticleField;
pub use particle::{CELEBRATION_PALETTE, GRAVITY, Particle, ParticleKind, hsl};
