use itertools::Itertools;
use log::trace;

use crate::connection::{ConnectionId, MAX_BRIDGES};
use crate::puzzle::Puzzle;

/// Finds bridges which are logically forced, one at a time.
///
/// Never guesses: every bridge proposed is present in every solution of the puzzle.
/// Holds no state, so one solver can serve any number of puzzles.
#[derive(Clone, Copy, Debug, Default)]
pub struct Solver;

impl Solver {
    /// A solver; equivalent to [`Solver::default`].
    pub fn new() -> Self {
        Self
    }

    /// How many more bridges `connection` could still take, given what both its ends still need.
    fn capacity(puzzle: &Puzzle, connection: ConnectionId) -> i32 {
        puzzle
            .connection(connection)
            .map(|c| {
                (i32::from(MAX_BRIDGES) - i32::from(c.bridge_count()))
                    .min(puzzle.remaining_bridge_count(c.start()))
                    .min(puzzle.remaining_bridge_count(c.end()))
            })
            .unwrap_or(0)
    }

    /// Find a connection whose bridge count can safely be raised by one.
    ///
    /// Islands are examined in order. Around each unsatisfied island, the spare capacity of every
    /// connection that can take a bridge is summed:
    /// - if the sum equals what the island still needs, every such connection is filled to
    ///   capacity, so the first one is forced;
    /// - if it is one more, only a connection able to take two can absorb the slack, and it needs
    ///   at least one.
    ///
    /// Returns [`None`] when no island forces anything. That covers solved puzzles, puzzles needing
    /// a guess, and puzzles already in error; tell them apart with [`Puzzle::state`].
    pub fn next_safe_connection(&self, puzzle: &Puzzle) -> Option<ConnectionId> {
        for island in puzzle.islands() {
            let remaining = puzzle.remaining_bridge_count(island.id());
            if remaining <= 0 {
                continue;
            }

            let capacities = puzzle
                .neighbors(island.id())
                .map(|(_, id)| id)
                .filter(|id| puzzle.has_possible_move(*id))
                .map(|id| (id, Self::capacity(puzzle, id)))
                .collect_vec();
            let total: i32 = capacities.iter().map(|(_, capacity)| capacity).sum();

            let forced = if total == remaining {
                capacities.first()
            } else if total == remaining + 1 {
                capacities.iter().find(|(_, capacity)| *capacity == i32::from(MAX_BRIDGES))
            } else {
                None
            };

            if let Some((id, _)) = forced {
                trace!(
                    "island {} forces a bridge on connection {} ({} remaining, capacity {})",
                    island.id(),
                    id,
                    remaining,
                    total
                );
                return Some(*id);
            }
        }

        None
    }

    /// Find a safe connection and add the bridge, returning the connection changed.
    pub fn step(&self, puzzle: &mut Puzzle) -> Option<ConnectionId> {
        let id = self.next_safe_connection(puzzle)?;
        puzzle.increment_bridge(id).then_some(id)
    }

    /// Keep [`stepping`](Self::step) until nothing more is forced. Returns the number of bridges
    /// added.
    pub fn solve(&self, puzzle: &mut Puzzle) -> usize {
        let mut moves = 0;
        while self.step(puzzle).is_some() {
            moves += 1;
        }

        moves
    }
}
