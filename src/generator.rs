//! Random puzzle generation.
//!
//! A puzzle is grown from a single island: an existing island is picked at random and a new island
//! is placed in line with it, joined by a random single or double bridge. Every island requires
//! exactly the bridges built around it, so the grown shape is its own solution.
//!
//! Random growth regularly paints itself into a corner, so failures are handled in tiers:
//! 1. a placement is retried a bounded number of times;
//! 2. after too many consecutive failures, the longest bridge is split by a new island;
//! 3. after too many splits, everything is thrown away and growth starts again from one island.
//!
//! Only the last tier repeats without bound.

use std::error::Error;
use std::fmt::{Display, Formatter};

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use strum::VariantArray;

use crate::direction::Direction;
use crate::island::Island;
use crate::location::{Coord, Location};
use crate::puzzle::{Puzzle, PuzzleState};
use crate::solver::Solver;
use crate::validator::{ValidatorEngine, MAX_DIMENSION, MIN_DIMENSION};

/// Fewest islands a puzzle can have; a lone island would require no bridges.
pub const MIN_ISLANDS: usize = 2;

/// Tunable limits for [`Generator`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratorConfig {
    /// Attempts to find a well-spaced spot for a new island before the step counts as failed.
    pub max_placement_attempts: usize,
    /// Consecutive failed growth steps before the longest bridge is split.
    pub max_consecutive_failures: usize,
    /// Splits tolerated before growth starts over from a single island.
    pub max_splits: usize,
    /// Shortest bridge considered for splitting. Anything below 4 is treated as 4, the least that
    /// leaves room for an island two cells away from both ends.
    pub min_split_length: usize,
    /// Only accept puzzles which [`Solver`] can solve from scratch without guessing.
    pub require_deducible: bool,
    /// Keep the bridges of the generated solution instead of handing out an empty puzzle.
    pub solved: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_placement_attempts: 20,
            max_consecutive_failures: 25,
            max_splits: 10,
            min_split_length: 4,
            require_deducible: true,
            solved: false,
        }
    }
}

/// Generation parameters which can never produce a puzzle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GeneratorError {
    /// Width or height outside of [`MIN_DIMENSION`]..=[`MAX_DIMENSION`].
    FieldSize {
        /// Requested columns.
        width: Coord,
        /// Requested rows.
        height: Coord,
    },
    /// Fewer than [`MIN_ISLANDS`] islands, or more than fit on the field.
    IslandCount {
        /// Requested islands.
        requested: usize,
        /// Most islands accepted for the requested field, see [`max_islands`].
        max: usize,
    },
}

impl Display for GeneratorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldSize { width, height } => write!(
                f,
                "cannot generate a {}x{} puzzle, edges must be within {}..={}",
                width, height, MIN_DIMENSION, MAX_DIMENSION
            ),
            Self::IslandCount { requested, max } => write!(
                f,
                "cannot place {} islands, expected {}..={}",
                requested, MIN_ISLANDS, max
            ),
        }
    }
}

impl Error for GeneratorError {}

/// Most islands accepted for a field; denser requests would rarely, if ever, finish growing.
pub fn max_islands(width: Coord, height: Coord) -> usize {
    width * height / 4
}

/// Builds random, valid puzzles. Generic over its source of randomness so runs can be reproduced.
pub struct Generator<R: Rng = StdRng> {
    rng: R,
    config: GeneratorConfig,
    engine: ValidatorEngine,
    solver: Solver,
}

impl Generator<StdRng> {
    /// A generator seeded from the thread-local RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_rng(&mut rand::rng()))
    }

    /// A generator producing the same puzzles for the same `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Generator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Generator<R> {
    /// A generator drawing from `rng`, with the default [`GeneratorConfig`].
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            config: GeneratorConfig::default(),
            engine: ValidatorEngine::generation(),
            solver: Solver::new(),
        }
    }

    /// Replace the limits.
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// The limits in use.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a puzzle of `island_count` islands on a `width` by `height` field.
    ///
    /// Unless [`GeneratorConfig::solved`] is set, all bridges are removed before the puzzle is
    /// returned. The puzzle always passes [`ValidatorEngine::generation`].
    pub fn generate(
        &mut self,
        width: Coord,
        height: Coord,
        island_count: usize,
    ) -> Result<Puzzle, GeneratorError> {
        let solved = self.config.solved;
        self.generate_inner(width, height, island_count, solved)
    }

    /// Like [`Self::generate`], but keeps the solution's bridges: a worked example.
    pub fn generate_solved(
        &mut self,
        width: Coord,
        height: Coord,
        island_count: usize,
    ) -> Result<Puzzle, GeneratorError> {
        self.generate_inner(width, height, island_count, true)
    }

    fn check_parameters(
        width: Coord,
        height: Coord,
        island_count: usize,
    ) -> Result<(), GeneratorError> {
        let dimensions = MIN_DIMENSION..=MAX_DIMENSION;
        if !dimensions.contains(&width) || !dimensions.contains(&height) {
            return Err(GeneratorError::FieldSize { width, height });
        }

        let max = max_islands(width, height);
        if !(MIN_ISLANDS..=max).contains(&island_count) {
            return Err(GeneratorError::IslandCount { requested: island_count, max });
        }

        Ok(())
    }

    fn generate_inner(
        &mut self,
        width: Coord,
        height: Coord,
        island_count: usize,
        solved: bool,
    ) -> Result<Puzzle, GeneratorError> {
        Self::check_parameters(width, height, island_count)?;

        let mut attempt: usize = 0;
        loop {
            attempt += 1;

            let Some(mut puzzle) = self.grow(width, height, island_count) else {
                debug!("attempt {}: out of splits, starting over", attempt);
                continue;
            };

            puzzle.fill_missing_connections();
            if let Err(violation) = self.engine.validate(&puzzle) {
                debug!(
                    "attempt {}: finished puzzle rejected ({}), starting over",
                    attempt, violation
                );
                continue;
            }

            if self.config.require_deducible && !self.is_deducible(&puzzle) {
                debug!("attempt {}: finished puzzle needs guessing, starting over", attempt);
                continue;
            }

            debug!(
                "generated {}x{} puzzle with {} islands after {} attempts",
                width, height, island_count, attempt
            );
            if !solved {
                puzzle.restart();
            }

            return Ok(puzzle);
        }
    }

    /// Grow a puzzle up to `island_count` islands, or give up with [`None`] once splitting no
    /// longer helps.
    ///
    /// Both counters track the current dead end only: a successful growth step clears them.
    fn grow(&mut self, width: Coord, height: Coord, island_count: usize) -> Option<Puzzle> {
        let mut puzzle = Puzzle::empty(width, height);
        let seed = Location(self.rng.random_range(0..width), self.rng.random_range(0..height));
        puzzle.add_island(seed, 0);

        let mut failures = 0;
        let mut splits = 0;
        while puzzle.islands().len() < island_count {
            if failures >= self.config.max_consecutive_failures {
                if splits >= self.config.max_splits {
                    return None;
                }
                splits += 1;
                failures = 0;

                match self.split_longest(&puzzle) {
                    Some(split) => {
                        debug!(
                            "split a bridge, now {} islands ({} splits)",
                            split.islands().len(),
                            splits
                        );
                        puzzle = split;
                    }
                    None => trace!("no bridge could be split ({} splits)", splits),
                }
                continue;
            }

            match self.try_grow(&puzzle) {
                Some(grown) => {
                    puzzle = grown;
                    failures = 0;
                    splits = 0;
                }
                None => failures += 1,
            }
        }

        Some(puzzle)
    }

    /// Free cells between `location` and the field's edge in `direction`.
    fn room(puzzle: &Puzzle, location: Location, direction: Direction) -> Coord {
        match direction {
            Direction::Up => location.1,
            Direction::Down => puzzle.height().saturating_sub(location.1 + 1),
            Direction::Left => location.0,
            Direction::Right => puzzle.width().saturating_sub(location.0 + 1),
        }
    }

    /// Whether a new island at `location` would sit on, or directly next to, an existing one.
    fn crowded(puzzle: &Puzzle, location: Location) -> bool {
        puzzle
            .islands()
            .iter()
            .any(|island| island.location().distance_to(location) <= 1)
    }

    /// Attempt one growth step, returning the grown copy if it passes validation.
    fn try_grow(&mut self, puzzle: &Puzzle) -> Option<Puzzle> {
        let origin: Island = *puzzle.islands().choose(&mut self.rng)?;

        for _ in 0..self.config.max_placement_attempts {
            let direction = *Direction::VARIANTS.choose(&mut self.rng)?;
            let room = Self::room(puzzle, origin.location(), direction);
            if room < 2 {
                continue;
            }

            let distance = self.rng.random_range(2..=room);
            let Some(location) = direction.attempt_many_from(origin.location(), distance) else {
                continue;
            };
            if Self::crowded(puzzle, location) {
                continue;
            }

            let mut candidate = puzzle.clone();
            let island = candidate.add_island(location, 0);
            candidate.add_connection(origin.id(), island, self.rng.random_range(1..=2));
            candidate.recompute_required_bridges();

            return match self.engine.validate(&candidate) {
                Ok(()) => Some(candidate),
                Err(violation) => {
                    trace!("rejected island at ({}, {}): {}", location.0, location.1, violation);
                    None
                }
            };
        }

        trace!("no room next to island {}", origin.id());
        None
    }

    /// Replace the longest bridge with two bridges meeting at a new island somewhere along it.
    fn split_longest(&mut self, puzzle: &Puzzle) -> Option<Puzzle> {
        let (id, connection, segment) = puzzle
            .built_connections()
            .filter_map(|(id, c)| puzzle.segment(c).map(|segment| (id, *c, segment)))
            .filter(|(_, _, segment)| segment.len() >= self.config.min_split_length.max(4))
            .max_by_key(|(_, _, segment)| segment.len())?;

        let direction = Direction::direction_to(segment.a, segment.b)?;
        let offset = self.rng.random_range(2..=segment.len() - 2);
        let location = direction.attempt_many_from(segment.a, offset)?;

        let mut candidate = puzzle.clone();
        candidate.remove_connection(id)?;
        let island = candidate.add_island(location, 0);
        candidate.add_connection(connection.start(), island, self.rng.random_range(1..=2));
        candidate.add_connection(island, connection.end(), self.rng.random_range(1..=2));
        candidate.recompute_required_bridges();

        self.engine.is_valid(&candidate).then_some(candidate)
    }

    /// Whether the solver alone recovers `puzzle`'s bridges starting from none.
    fn is_deducible(&self, puzzle: &Puzzle) -> bool {
        let mut attempt = puzzle.clone();
        attempt.restart();
        self.solver.solve(&mut attempt);

        attempt.state() == PuzzleState::Solved
    }
}
