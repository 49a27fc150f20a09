//! Attack resolution and hit-state classification.
mod hit_state;
mod resolve;

pub use hit_state::HitState;
pub use resolve::{AttackResolution, attack, roll_damage, roll_to_hit};
