//! Single-step movement without lookahead, used on open terrain and as the
//! fallback when the pathfinder finds nothing.

use std::cmp::Reverse;

use crate::state::Position;

/// The orthogonal step from `from` that closes the larger axis gap to
/// `target` (x wins ties). `None` when already there.
pub fn step_toward(from: Position, target: Position) -> Option<Position> {
    let dx = target.x - from.x;
    let dy = target.y - from.y;
    if dx == 0 && dy == 0 {
        return None;
    }
    if dx.abs() >= dy.abs() {
        Some(Position::new(from.x + dx.signum(), from.y))
    } else {
        Some(Position::new(from.x, from.y + dy.signum()))
    }
}

/// One heuristic step toward `target`, or `None` to stay in place when the
/// destination cannot be entered.
pub fn dumb_step(
    from: Position,
    target: Position,
    can_enter: impl Fn(Position) -> bool,
) -> Option<Position> {
    step_toward(from, target).filter(|next| *next != target && can_enter(*next))
}

/// The neighbouring cell that puts the most distance between the mover and
/// `threat`. Only cells strictly farther than the current one qualify; the
/// first in neighbour order wins ties.
pub fn flee_step(
    from: Position,
    threat: Position,
    can_enter: impl Fn(Position) -> bool,
) -> Option<Position> {
    let current = from.manhattan(threat);
    from.neighbors()
        .into_iter()
        .filter(|next| can_enter(*next))
        .map(|next| (next.manhattan(threat), next))
        .filter(|(distance, _)| *distance > current)
        .min_by_key(|(distance, _)| Reverse(*distance))
        .map(|(_, next)| next)
}
