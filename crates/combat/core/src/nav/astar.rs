//! Shortest-path search over the combat grid.
//!
//! Four-neighbour A* with a Manhattan heuristic. Nodes live in a flat arena
//! indexed by [`NodeId`]; parents are arena indices, so reconstruction walks
//! indices back from the goal. Among equal `f` scores the node opened first is
//! expanded first.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::nav::{GridNode, NodeId, WalkableGrid};
use crate::state::Position;

/// Finds a path from `start` to `goal`, both ends included.
///
/// The start cell itself does not need to be walkable (the mover stands on
/// it). Returns `None` when the goal is blocked, out of bounds or
/// unreachable.
pub fn find_path(grid: &WalkableGrid, start: Position, goal: Position) -> Option<Vec<Position>> {
    let start_index = grid.index(start)?;
    let goal_index = grid.index(goal)?;
    if !grid.is_walkable(goal) {
        tracing::trace!(target: "combat::nav", %goal, "goal not walkable");
        return None;
    }

    let dimensions = grid.dimensions();
    let mut nodes: Vec<GridNode> = Vec::with_capacity(dimensions.area());
    for y in 0..dimensions.height as i32 {
        for x in 0..dimensions.width as i32 {
            let position = Position::new(x, y);
            nodes.push(GridNode::new(position, grid.weight(position)));
        }
    }

    let mut closed = vec![false; nodes.len()];
    let mut opened = vec![false; nodes.len()];
    let mut open: BinaryHeap<Reverse<(i32, u32, NodeId)>> = BinaryHeap::new();
    let mut sequence: u32 = 0;

    nodes[start_index].cost = 0;
    nodes[start_index].distance_to_target = start.manhattan(goal);
    open.push(Reverse((nodes[start_index].f(), sequence, NodeId(start_index as u32))));
    opened[start_index] = true;

    while let Some(Reverse((_, _, current))) = open.pop() {
        let current_index = current.0 as usize;
        closed[current_index] = true;
        if current_index == goal_index {
            break;
        }

        let current_node = nodes[current_index];
        for neighbor in current_node.position.neighbors() {
            let Some(index) = grid.index(neighbor) else {
                continue;
            };
            if closed[index] || opened[index] || !nodes[index].walkable {
                continue;
            }
            let node = &mut nodes[index];
            node.parent = Some(current);
            node.distance_to_target = neighbor.manhattan(goal);
            node.cost = node.weight + current_node.cost;
            sequence += 1;
            open.push(Reverse((node.f(), sequence, NodeId(index as u32))));
            opened[index] = true;
        }
    }

    if !closed[goal_index] {
        tracing::trace!(target: "combat::nav", %start, %goal, "no path");
        return None;
    }

    let mut path = Vec::new();
    let mut cursor = Some(NodeId(goal_index as u32));
    while let Some(id) = cursor {
        let node = &nodes[id.0 as usize];
        path.push(node.position);
        cursor = node.parent;
    }
    path.reverse();
    Some(path)
}
