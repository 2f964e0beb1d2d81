// 粒子パズル総当たりソルバー - ライブラリモジュール

pub mod error;
pub mod levels;
pub mod model;
pub mod search;

// 主要な型を再エクスポート
pub use error::{BoardError, SearchError};
pub use model::{Anti, Charge, Colour, Decay, Hole, Mass, Obstacle, Particle, ParticleKind};
pub use search::{
    move_all, solve, Board, BoardBuilder, BoardSet, DepthStats, Direction, Message, MoveDelta,
    Outcome, RayTable, Solution, SolverConfig,
};
