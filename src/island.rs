use crate::location::Location;

/// Stable identity of an island; its position in the owning puzzle's island list.
pub type IslandId = usize;

/// Fewest bridges an island may require.
pub const MIN_REQUIRED: u8 = 1;
/// Most bridges an island may require: a double bridge in all four directions.
pub const MAX_REQUIRED: u8 = 8;

/// An island on the field that must be reached by exactly `required_bridges` bridges.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Island {
    pub(crate) id: IslandId,
    pub(crate) location: Location,
    pub(crate) required_bridges: u8,
}

impl Island {
    pub(crate) fn new(id: IslandId, location: Location, required_bridges: u8) -> Self {
        Self { id, location, required_bridges }
    }

    /// Its index in [`Puzzle::islands`](crate::Puzzle::islands).
    pub fn id(&self) -> IslandId {
        self.id
    }

    /// Where it stands.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Bridges it needs to be satisfied.
    pub fn required_bridges(&self) -> u8 {
        self.required_bridges
    }
}
