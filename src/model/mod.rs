// 値型（粒子・レイヤ）

pub mod particle;
pub mod tile;

pub use particle::{Anti, Charge, Colour, Mass, Particle, ParticleKind};
pub use tile::{Decay, Hole, Obstacle};
