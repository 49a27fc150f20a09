//! Enemy navigation: the grid pathfinder and the one-step heuristics.
mod astar;
mod grid;
mod heuristic;

pub use astar::find_path;
pub use grid::{GridNode, NodeId, WalkableGrid};
pub use heuristic::{dumb_step, flee_step, step_toward};
