// 探索サブシステム

pub mod board;
pub mod moves;
pub mod rays;
pub mod solver;

pub use board::{board_set, Board, BoardBuilder, BoardSet};
pub use moves::{move_all, move_particle};
pub use rays::{Direction, RayTable};
pub use solver::{solve, DepthStats, Message, MoveDelta, Outcome, Solution, SolverConfig};
