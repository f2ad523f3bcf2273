#![warn(missing_docs)]

//! # `bridges`
//!
//! Rules engine, generator and logical solver for
//! [Bridges](https://en.wikipedia.org/wiki/Hashiwokakero) puzzles, also known as Hashiwokakero.
//!
//! A puzzle is a rectangular field of islands. Each island requires a number of bridges; bridges
//! run horizontally or vertically between two islands which can see each other, at most two per
//! pair, and may not cross. A puzzle is solved when every island has exactly the bridges it
//! requires and the bridges join all islands into one network.
//!
//! Build a [`Puzzle`] with a [`PuzzleBuilder`] (for instance from a parsed file) or have a
//! [`Generator`] make one. [`Puzzle::state`] evaluates it, and a [`Solver`] proposes bridges that
//! are logically forced, one at a time.
//!
//! # Internals
//! Islands live in a list and are identified by their index, an [`IslandId`]. Connections store the
//! ids of their endpoints, never the islands themselves. Each puzzle also keeps an adjacency index
//! from island and [`Direction`] to the connection reaching the nearest island that way; the
//! generator and solver work from it, and it is rebuilt whenever connections change shape.
//!
//! Validity is checked by independent rules, each a [`Validator`](validator::Validator), run
//! together by a [`ValidatorEngine`]. The generator uses the engine to vet every intermediate
//! puzzle.

pub use builder::{BuildError, BuilderInvalidReason, PuzzleBuilder};
pub use connection::{Connection, ConnectionId, MAX_BRIDGES};
pub use direction::Direction;
pub use generator::{Generator, GeneratorConfig, GeneratorError};
pub use island::{Island, IslandId, MAX_REQUIRED, MIN_REQUIRED};
pub use location::{Coord, Location};
pub use puzzle::{Puzzle, PuzzleState};
pub use solver::Solver;
pub use validator::{ValidatorEngine, Violation};

pub mod builder;
pub(crate) mod connection;
pub(crate) mod direction;
pub mod generator;
pub(crate) mod island;
pub(crate) mod location;
pub(crate) mod puzzle;
pub(crate) mod solver;
mod tests;
pub mod validator;
