//! Structural rules a [`Puzzle`] must satisfy before it is used.
//!
//! Each rule is a [`Validator`]: a pure check reporting the first [`Violation`] it finds.
//! A [`ValidatorEngine`] runs a set of them. Rules do not rely on one another having run first;
//! where one rule's precondition is the subject of another rule (e.g. that a bridge's endpoints
//! exist), the dependent rule skips the item instead of reporting it a second time.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

use itertools::Itertools;
use log::trace;
use unordered_pair::UnorderedPair;

use crate::connection::ConnectionId;
use crate::direction::Direction;
use crate::island::{IslandId, MAX_REQUIRED, MIN_REQUIRED};
use crate::location::{Coord, Location};
use crate::puzzle::Puzzle;

/// Smallest supported field edge.
pub const MIN_DIMENSION: Coord = 4;
/// Largest supported field edge.
pub const MAX_DIMENSION: Coord = 25;

/// A broken structural rule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Violation {
    /// The field's width or height is outside of [`MIN_DIMENSION`]..=[`MAX_DIMENSION`].
    FieldSize {
        /// Columns of the offending field.
        width: Coord,
        /// Rows of the offending field.
        height: Coord,
    },
    /// An island requires fewer than 1 or more than 8 bridges.
    RequiredBridges {
        /// The offending island.
        island: IslandId,
        /// What it requires.
        required: u8,
    },
    /// An island lies outside the field.
    OffField {
        /// The offending island.
        island: IslandId,
        /// Where it claims to be.
        location: Location,
    },
    /// Two islands occupy the same location.
    SharedField {
        /// The island declared first.
        first: IslandId,
        /// The island declared later on the same location.
        second: IslandId,
        /// The shared location.
        location: Location,
    },
    /// Two islands are directly next to each other in a row or column.
    TooClose {
        /// One of the two islands.
        first: IslandId,
        /// The other one.
        second: IslandId,
    },
    /// A connection names an island that does not exist.
    MissingEndpoint {
        /// The offending connection.
        connection: ConnectionId,
        /// The id it names which has no island.
        island: IslandId,
    },
    /// A connection starts and ends at the same island.
    SelfConnection {
        /// The offending connection.
        connection: ConnectionId,
        /// The island at both of its ends.
        island: IslandId,
    },
    /// A connection's endpoints share neither a row nor a column, or share both.
    NotAxisAligned {
        /// The offending connection.
        connection: ConnectionId,
    },
    /// A connection runs through another island.
    IslandOnPath {
        /// The offending connection.
        connection: ConnectionId,
        /// The island it runs through.
        island: IslandId,
    },
    /// Two connections join the same pair of islands.
    DuplicateConnection {
        /// The connection declared first.
        first: ConnectionId,
        /// The later duplicate.
        second: ConnectionId,
    },
    /// Two built connections cross.
    CrossingBridges {
        /// The connection with the lower id.
        first: ConnectionId,
        /// The connection with the higher id.
        second: ConnectionId,
    },
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldSize { width, height } => write!(
                f,
                "field size {}x{} is outside of {}..={}",
                width, height, MIN_DIMENSION, MAX_DIMENSION
            ),
            Self::RequiredBridges { island, required } => write!(
                f,
                "island {} requires {} bridges, expected {}..={}",
                island, required, MIN_REQUIRED, MAX_REQUIRED
            ),
            Self::OffField { island, location } => {
                write!(f, "island {} at ({}, {}) is off the field", island, location.0, location.1)
            }
            Self::SharedField { first, second, location } => write!(
                f,
                "islands {} and {} share the field ({}, {})",
                first, second, location.0, location.1
            ),
            Self::TooClose { first, second } => {
                write!(f, "islands {} and {} are adjacent", first, second)
            }
            Self::MissingEndpoint { connection, island } => {
                write!(f, "bridge {} refers to missing island {}", connection, island)
            }
            Self::SelfConnection { connection, island } => {
                write!(f, "bridge {} connects island {} to itself", connection, island)
            }
            Self::NotAxisAligned { connection } => {
                write!(f, "bridge {} is neither horizontal nor vertical", connection)
            }
            Self::IslandOnPath { connection, island } => {
                write!(f, "bridge {} runs through island {}", connection, island)
            }
            Self::DuplicateConnection { first, second } => {
                write!(f, "bridges {} and {} connect the same islands", first, second)
            }
            Self::CrossingBridges { first, second } => {
                write!(f, "bridges {} and {} cross", first, second)
            }
        }
    }
}

impl Error for Violation {}

/// A single structural rule.
pub trait Validator {
    /// Short name of the rule, for logging.
    fn name(&self) -> &'static str;
    /// Check `puzzle`, returning the first violation of this rule.
    fn check(&self, puzzle: &Puzzle) -> Result<(), Violation>;
}

/// Width and height each within [`MIN_DIMENSION`]..=[`MAX_DIMENSION`].
pub struct FieldSize;

impl Validator for FieldSize {
    fn name(&self) -> &'static str {
        "field size"
    }

    fn check(&self, puzzle: &Puzzle) -> Result<(), Violation> {
        let range: RangeInclusive<Coord> = MIN_DIMENSION..=MAX_DIMENSION;
        if range.contains(&puzzle.width) && range.contains(&puzzle.height) {
            Ok(())
        } else {
            Err(Violation::FieldSize { width: puzzle.width, height: puzzle.height })
        }
    }
}

/// Every island requires between [`MIN_REQUIRED`] and [`MAX_REQUIRED`] bridges.
pub struct RequiredBridgeRange;

impl Validator for RequiredBridgeRange {
    fn name(&self) -> &'static str {
        "required bridges"
    }

    fn check(&self, puzzle: &Puzzle) -> Result<(), Violation> {
        match puzzle
            .islands
            .iter()
            .find(|island| !(MIN_REQUIRED..=MAX_REQUIRED).contains(&island.required_bridges))
        {
            None => Ok(()),
            Some(island) => Err(Violation::RequiredBridges {
                island: island.id,
                required: island.required_bridges,
            }),
        }
    }
}

/// Every island lies on the field.
pub struct OnField;

impl Validator for OnField {
    fn name(&self) -> &'static str {
        "on field"
    }

    fn check(&self, puzzle: &Puzzle) -> Result<(), Violation> {
        match puzzle
            .islands
            .iter()
            .find(|island| island.location.0 >= puzzle.width || island.location.1 >= puzzle.height)
        {
            None => Ok(()),
            Some(island) => Err(Violation::OffField {
                island: island.id,
                location: island.location,
            }),
        }
    }
}

/// No two islands share a location.
pub struct UniqueFields;

impl Validator for UniqueFields {
    fn name(&self) -> &'static str {
        "unique fields"
    }

    fn check(&self, puzzle: &Puzzle) -> Result<(), Violation> {
        let mut seen: HashMap<Location, IslandId> = HashMap::with_capacity(puzzle.islands.len());
        for island in &puzzle.islands {
            if let Some(first) = seen.insert(island.location, island.id) {
                return Err(Violation::SharedField {
                    first,
                    second: island.id,
                    location: island.location,
                });
            }
        }

        Ok(())
    }
}

/// No two islands sit directly next to each other in a row or column. Diagonal neighbours are fine.
pub struct MinimumSpacing;

impl Validator for MinimumSpacing {
    fn name(&self) -> &'static str {
        "minimum spacing"
    }

    fn check(&self, puzzle: &Puzzle) -> Result<(), Violation> {
        match puzzle
            .islands
            .iter()
            .tuple_combinations()
            .find(|(a, b)| a.location.distance_to(b.location) == 1)
        {
            None => Ok(()),
            Some((a, b)) => Err(Violation::TooClose { first: a.id, second: b.id }),
        }
    }
}

/// Both endpoints of every connection exist and differ.
pub struct BridgeEndpoints;

impl Validator for BridgeEndpoints {
    fn name(&self) -> &'static str {
        "bridge endpoints"
    }

    fn check(&self, puzzle: &Puzzle) -> Result<(), Violation> {
        for (id, c) in puzzle.connections.iter().enumerate() {
            for island in [c.start, c.end] {
                if puzzle.island(island).is_none() {
                    return Err(Violation::MissingEndpoint { connection: id, island });
                }
            }

            if c.start == c.end {
                return Err(Violation::SelfConnection { connection: id, island: c.start });
            }
        }

        Ok(())
    }
}

/// Every connection is horizontal or vertical.
pub struct AxisAligned;

impl Validator for AxisAligned {
    fn name(&self) -> &'static str {
        "axis aligned"
    }

    fn check(&self, puzzle: &Puzzle) -> Result<(), Violation> {
        for (id, c) in puzzle.connections.iter().enumerate() {
            if c.start == c.end {
                continue;
            }
            let Some(segment) = puzzle.segment(c) else {
                continue;
            };

            if Direction::direction_to(segment.a, segment.b).is_none() {
                return Err(Violation::NotAxisAligned { connection: id });
            }
        }

        Ok(())
    }
}

/// No connection runs through a third island.
pub struct NoIslandOnPath;

impl Validator for NoIslandOnPath {
    fn name(&self) -> &'static str {
        "no island on path"
    }

    fn check(&self, puzzle: &Puzzle) -> Result<(), Violation> {
        for (id, c) in puzzle.connections.iter().enumerate() {
            let Some(segment) = puzzle.segment(c) else {
                continue;
            };

            if let Some(island) = puzzle
                .islands
                .iter()
                .filter(|island| island.id != c.start && island.id != c.end)
                .find(|island| island.location.is_strictly_between(segment.a, segment.b))
            {
                return Err(Violation::IslandOnPath { connection: id, island: island.id });
            }
        }

        Ok(())
    }
}

/// At most one connection per unordered pair of islands.
pub struct UniqueConnections;

impl Validator for UniqueConnections {
    fn name(&self) -> &'static str {
        "unique connections"
    }

    fn check(&self, puzzle: &Puzzle) -> Result<(), Violation> {
        let mut seen: HashMap<UnorderedPair<IslandId>, ConnectionId> =
            HashMap::with_capacity(puzzle.connections.len());
        for (id, c) in puzzle.connections.iter().enumerate() {
            if let Some(first) = seen.insert(c.islands(), id) {
                return Err(Violation::DuplicateConnection { first, second: id });
            }
        }

        Ok(())
    }
}

/// No two built connections cross.
///
/// Not structural: a player may legitimately reach a crossing state. Used to vet generated
/// puzzles.
pub struct NoCrossingBridges;

impl Validator for NoCrossingBridges {
    fn name(&self) -> &'static str {
        "no crossing bridges"
    }

    fn check(&self, puzzle: &Puzzle) -> Result<(), Violation> {
        match puzzle.crossing_pairs().first() {
            None => Ok(()),
            Some((first, second)) => Err(Violation::CrossingBridges {
                first: *first,
                second: *second,
            }),
        }
    }
}

/// A collection of [`Validator`]s run together.
///
/// Whether a puzzle passes does not depend on the order of the validators, only which violation
/// gets reported.
pub struct ValidatorEngine {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidatorEngine {
    /// An engine with no rules; everything passes.
    pub fn empty() -> Self {
        Self { validators: Vec::new() }
    }

    /// The rules every well-formed puzzle obeys, as checked when loading one.
    pub fn structural() -> Self {
        Self::empty()
            .with(FieldSize)
            .with(RequiredBridgeRange)
            .with(OnField)
            .with(UniqueFields)
            .with(MinimumSpacing)
            .with(BridgeEndpoints)
            .with(AxisAligned)
            .with(NoIslandOnPath)
            .with(UniqueConnections)
    }

    /// The structural rules plus [`NoCrossingBridges`], as required of generated puzzles.
    pub fn generation() -> Self {
        Self::structural().with(NoCrossingBridges)
    }

    /// Append `validator`, to run after those already present.
    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether there are no rules at all.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run every rule, returning the first violation found.
    pub fn validate(&self, puzzle: &Puzzle) -> Result<(), Violation> {
        self.validators.iter().try_for_each(|validator| {
            validator.check(puzzle).inspect_err(|violation| {
                trace!("rule '{}' failed: {}", validator.name(), violation);
            })
        })
    }

    /// Names of the rules, in the order they run.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.validators.iter().map(|validator| validator.name())
    }

    /// Whether every rule passes.
    pub fn is_valid(&self, puzzle: &Puzzle) -> bool {
        self.validate(puzzle).is_ok()
    }
}

impl Default for ValidatorEngine {
    fn default() -> Self {
        Self::structural()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Connection;
    use crate::island::Island;

    fn puzzle(
        dims: (Coord, Coord),
        islands: &[(Coord, Coord, u8)],
        connections: &[(IslandId, IslandId, u8)],
    ) -> Puzzle {
        Puzzle::from_parts(
            dims.0,
            dims.1,
            islands
                .iter()
                .enumerate()
                .map(|(id, (x, y, r))| Island::new(id, Location(*x, *y), *r))
                .collect(),
            connections
                .iter()
                .map(|(a, b, n)| Connection::new(*a, *b, *n))
                .collect(),
        )
    }

    fn well_formed() -> Puzzle {
        // 2-2
        // |
        // 1
        puzzle((5, 5), &[(0, 0, 2), (2, 0, 2), (0, 2, 1)], &[(0, 1, 1), (0, 2, 1)])
    }

    #[test]
    fn well_formed_passes_everything() {
        assert_eq!(ValidatorEngine::generation().validate(&well_formed()), Ok(()));
    }

    #[test]
    fn field_size() {
        assert!(FieldSize.check(&puzzle((4, 25), &[], &[])).is_ok());
        assert_eq!(
            FieldSize.check(&puzzle((3, 5), &[], &[])),
            Err(Violation::FieldSize { width: 3, height: 5 })
        );
        assert!(FieldSize.check(&puzzle((5, 26), &[], &[])).is_err());
    }

    #[test]
    fn required_bridge_range() {
        assert_eq!(
            RequiredBridgeRange.check(&puzzle((5, 5), &[(0, 0, 1), (2, 0, 0)], &[])),
            Err(Violation::RequiredBridges { island: 1, required: 0 })
        );
        assert!(RequiredBridgeRange.check(&puzzle((5, 5), &[(0, 0, 9)], &[])).is_err());
        assert!(RequiredBridgeRange.check(&puzzle((5, 5), &[(0, 0, 8), (2, 0, 1)], &[])).is_ok());
    }

    #[test]
    fn on_field() {
        assert_eq!(
            OnField.check(&puzzle((5, 5), &[(0, 0, 1), (5, 0, 1)], &[])),
            Err(Violation::OffField { island: 1, location: Location(5, 0) })
        );
        assert!(OnField.check(&puzzle((5, 5), &[(4, 4, 1)], &[])).is_ok());
    }

    #[test]
    fn unique_fields() {
        assert_eq!(
            UniqueFields.check(&puzzle((5, 5), &[(1, 1, 1), (3, 1, 1), (1, 1, 2)], &[])),
            Err(Violation::SharedField { first: 0, second: 2, location: Location(1, 1) })
        );
    }

    #[test]
    fn minimum_spacing() {
        assert_eq!(
            MinimumSpacing.check(&puzzle((5, 5), &[(1, 1, 1), (1, 2, 1)], &[])),
            Err(Violation::TooClose { first: 0, second: 1 })
        );
        // diagonal neighbours are allowed
        assert!(MinimumSpacing.check(&puzzle((5, 5), &[(1, 1, 1), (2, 2, 1)], &[])).is_ok());
        // shared fields are another rule's business
        assert!(MinimumSpacing.check(&puzzle((5, 5), &[(1, 1, 1), (1, 1, 1)], &[])).is_ok());
    }

    #[test]
    fn bridge_endpoints() {
        assert_eq!(
            BridgeEndpoints.check(&puzzle((5, 5), &[(0, 0, 1), (2, 0, 1)], &[(0, 4, 1)])),
            Err(Violation::MissingEndpoint { connection: 0, island: 4 })
        );
        assert_eq!(
            BridgeEndpoints.check(&puzzle((5, 5), &[(0, 0, 1), (2, 0, 1)], &[(1, 1, 1)])),
            Err(Violation::SelfConnection { connection: 0, island: 1 })
        );
    }

    #[test]
    fn axis_aligned() {
        assert_eq!(
            AxisAligned.check(&puzzle((5, 5), &[(0, 0, 1), (2, 2, 1)], &[(0, 1, 1)])),
            Err(Violation::NotAxisAligned { connection: 0 })
        );
        // dangling connections are left to BridgeEndpoints
        assert!(AxisAligned.check(&puzzle((5, 5), &[(0, 0, 1)], &[(0, 3, 1)])).is_ok());
    }

    #[test]
    fn no_island_on_path() {
        assert_eq!(
            NoIslandOnPath.check(&puzzle((7, 5), &[(0, 0, 1), (2, 0, 1), (4, 0, 1)], &[(0, 2, 1)])),
            Err(Violation::IslandOnPath { connection: 0, island: 1 })
        );
        let beside = puzzle((7, 5), &[(0, 0, 1), (2, 1, 1), (4, 0, 1)], &[(0, 2, 1)]);
        assert!(NoIslandOnPath.check(&beside).is_ok());
    }

    #[test]
    fn unique_connections_ignores_declared_direction() {
        let reversed = puzzle((5, 5), &[(0, 0, 1), (2, 0, 1)], &[(0, 1, 1), (1, 0, 0)]);
        assert_eq!(
            UniqueConnections.check(&reversed),
            Err(Violation::DuplicateConnection { first: 0, second: 1 })
        );
    }

    #[test]
    fn crossing_bridges_only_with_built_connections() {
        let islands = [(0, 2, 1), (4, 2, 1), (2, 0, 1), (2, 4, 1)];
        assert_eq!(
            NoCrossingBridges.check(&puzzle((5, 5), &islands, &[(0, 1, 1), (2, 3, 2)])),
            Err(Violation::CrossingBridges { first: 0, second: 1 })
        );
        let unbuilt = puzzle((5, 5), &islands, &[(0, 1, 1), (2, 3, 0)]);
        assert!(NoCrossingBridges.check(&unbuilt).is_ok());
        // not structural
        let crossing = puzzle((5, 5), &islands, &[(0, 1, 1), (2, 3, 2)]);
        assert!(ValidatorEngine::structural().is_valid(&crossing));
    }

    #[test]
    fn verdict_independent_of_order() {
        let broken = puzzle((3, 5), &[(0, 0, 0), (1, 0, 1)], &[(0, 1, 1)]);
        let forward = ValidatorEngine::structural();
        let backward = ValidatorEngine::empty()
            .with(UniqueConnections)
            .with(NoIslandOnPath)
            .with(AxisAligned)
            .with(BridgeEndpoints)
            .with(MinimumSpacing)
            .with(UniqueFields)
            .with(OnField)
            .with(RequiredBridgeRange)
            .with(FieldSize);

        assert_eq!(forward.len(), backward.len());
        assert!(!forward.is_valid(&broken));
        assert!(!backward.is_valid(&broken));
        assert!(matches!(forward.validate(&broken), Err(Violation::FieldSize { .. })));
        assert!(matches!(backward.validate(&broken), Err(Violation::TooClose { .. })));
    }

    #[test]
    fn rule_names_are_distinct() {
        let engine = ValidatorEngine::generation();
        let names = engine.names().collect::<Vec<_>>();

        assert_eq!(names.len(), engine.len());
        assert!(names.iter().all(|name| !name.is_empty()));
        assert!(names.iter().all_unique());
        assert_eq!(names.first(), Some(&"field size"));
        assert_eq!(names.last(), Some(&"no crossing bridges"));
    }
}
