//! Assembling a [`Puzzle`] from islands and connections read from elsewhere.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::connection::{Connection, MAX_BRIDGES};
use crate::island::{Island, IslandId};
use crate::location::{Coord, Location};
use crate::puzzle::Puzzle;
use crate::validator::{ValidatorEngine, Violation};

/// Reasons a builder may become invalid while building, before any puzzle exists to validate.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// A connection was declared with more than [`MAX_BRIDGES`] bridges.
    TooManyBridges {
        /// First island of the connection as declared.
        start: IslandId,
        /// Second island of the connection as declared.
        end: IslandId,
        /// The declared count.
        bridge_count: u8,
    },
}

impl Display for BuilderInvalidReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooManyBridges { start, end, bridge_count } => write!(
                f,
                "bridge between islands {} and {} has {} bridges, at most {} allowed",
                start, end, bridge_count, MAX_BRIDGES
            ),
        }
    }
}

/// Why [`PuzzleBuilder::build`] refused to produce a puzzle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BuildError {
    /// The builder itself was put into an invalid state.
    Invalid(Vec<BuilderInvalidReason>),
    /// The assembled puzzle breaks a structural rule.
    Violation(Violation),
}

impl Display for BuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(reasons) => match reasons.first() {
                Some(reason) => write!(f, "invalid puzzle: {}", reason),
                None => write!(f, "invalid puzzle"),
            },
            Self::Violation(violation) => write!(f, "invalid puzzle: {}", violation),
        }
    }
}

impl Error for BuildError {}

impl From<Violation> for BuildError {
    fn from(value: Violation) -> Self {
        Self::Violation(value)
    }
}

/// Assembles a [`Puzzle`] from loose islands and connections, as a file parser would.
///
/// Islands receive ids in the order they are added, starting at 0.
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some
/// point.
#[derive(Clone, Debug)]
pub struct PuzzleBuilder {
    // width, height
    dims: (Coord, Coord),
    islands: Vec<Island>,
    connections: Vec<Connection>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for PuzzleBuilder {
    fn default() -> Self {
        Self::with_dims((7, 7))
    }
}

impl PuzzleBuilder {
    /// Construct a new [`Self`] with the specified dimensions, in `(width, height)` order.
    pub fn with_dims(dims: (Coord, Coord)) -> Self {
        Self {
            dims,
            islands: Default::default(),
            connections: Default::default(),
            invalid_reasons: Default::default(),
        }
    }

    /// Add an island at `location` requiring `required_bridges` bridges.
    /// Its id is the number of islands added before it.
    pub fn add_island(&mut self, location: Location, required_bridges: u8) -> &mut Self {
        let id = self.islands.len();
        self.islands.push(Island::new(id, location, required_bridges));
        self
    }

    /// Declare a connection from island `start` to island `end` carrying `bridge_count` bridges.
    ///
    /// May cause the builder to enter a [`TooManyBridges`](BuilderInvalidReason::TooManyBridges)
    /// invalid state. If the builder is already in an invalid state, this function does nothing.
    pub fn add_connection(
        &mut self,
        start: IslandId,
        end: IslandId,
        bridge_count: u8,
    ) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if bridge_count > MAX_BRIDGES {
            self.invalid_reasons.push(BuilderInvalidReason::TooManyBridges {
                start,
                end,
                bridge_count,
            });
            return self;
        }

        self.connections.push(Connection::new(start, end, bridge_count));
        self
    }

    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Assemble the puzzle, check it against [`ValidatorEngine::structural`], and add the
    /// zero-count connections between every pair of visible islands.
    pub fn build(&self) -> Result<Puzzle, BuildError> {
        if !self.invalid_reasons.is_empty() {
            return Err(BuildError::Invalid(self.invalid_reasons.clone()));
        }

        let mut puzzle = Puzzle::from_parts(
            self.dims.0,
            self.dims.1,
            self.islands.clone(),
            self.connections.clone(),
        );
        ValidatorEngine::structural().validate(&puzzle)?;
        puzzle.fill_missing_connections();

        Ok(puzzle)
    }
}
