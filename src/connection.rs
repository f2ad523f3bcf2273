use unordered_pair::UnorderedPair;

use crate::island::IslandId;
use crate::location::Location;

/// Position of a connection in the owning puzzle's connection list.
///
/// Stable until the connection set changes shape;
/// [`fill_missing_connections`](crate::Puzzle::fill_missing_connections) re-sorts it.
pub type ConnectionId = usize;

/// Most bridges a single connection may carry.
pub const MAX_BRIDGES: u8 = 2;

/// A potential or actual bridge between two islands sharing a row or column.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Connection {
    pub(crate) start: IslandId,
    pub(crate) end: IslandId,
    pub(crate) bridge_count: u8,
    // false while crossing another built connection; see Puzzle::mark_invalid_connections
    pub(crate) valid: bool,
    // highlighting only
    pub(crate) emphasized: bool,
}

impl Connection {
    pub(crate) fn new(start: IslandId, end: IslandId, bridge_count: u8) -> Self {
        Self {
            start,
            end,
            bridge_count,
            valid: true,
            emphasized: false,
        }
    }

    /// Island the connection was declared from.
    pub fn start(&self) -> IslandId {
        self.start
    }

    /// Island the connection was declared to.
    pub fn end(&self) -> IslandId {
        self.end
    }

    /// Bridges currently built, 0 to [`MAX_BRIDGES`].
    pub fn bridge_count(&self) -> u8 {
        self.bridge_count
    }

    /// Whether at least one bridge is built.
    pub fn is_built(&self) -> bool {
        self.bridge_count > 0
    }

    /// Whether it carries a double bridge.
    pub fn is_double(&self) -> bool {
        self.bridge_count == MAX_BRIDGES
    }

    /// `false` while crossing another built connection, as of the last
    /// [`mark_invalid_connections`](crate::Puzzle::mark_invalid_connections).
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether it is highlighted.
    pub fn is_emphasized(&self) -> bool {
        self.emphasized
    }

    /// The island pair, irrespective of which end was declared first.
    pub fn islands(&self) -> UnorderedPair<IslandId> {
        UnorderedPair(self.start, self.end)
    }

    /// The endpoint across from `island`, if `island` is an endpoint at all.
    pub fn other(&self, island: IslandId) -> Option<IslandId> {
        if island == self.start {
            Some(self.end)
        } else if island == self.end {
            Some(self.start)
        } else {
            None
        }
    }

    /// Sort key `(lower id, higher id)`.
    pub(crate) fn sort_key(&self) -> (IslandId, IslandId) {
        (self.start.min(self.end), self.start.max(self.end))
    }
}

/// The straight line a connection occupies between its two endpoint locations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Segment {
    pub(crate) a: Location,
    pub(crate) b: Location,
}

impl Segment {
    pub(crate) fn new(a: Location, b: Location) -> Self {
        Self { a, b }
    }

    pub(crate) fn is_horizontal(&self) -> bool {
        self.a.shares_row(self.b) && !self.a.shares_column(self.b)
    }

    pub(crate) fn is_vertical(&self) -> bool {
        self.a.shares_column(self.b) && !self.a.shares_row(self.b)
    }

    pub(crate) fn len(&self) -> usize {
        self.a.distance_to(self.b)
    }

    /// One horizontal and one vertical segment intersecting strictly inside both.
    pub(crate) fn crosses(&self, other: &Segment) -> bool {
        let (horizontal, vertical) = if self.is_horizontal() && other.is_vertical() {
            (self, other)
        } else if self.is_vertical() && other.is_horizontal() {
            (other, self)
        } else {
            return false;
        };

        let x = vertical.a.0;
        let y = horizontal.a.1;
        horizontal.a.0.min(horizontal.b.0) < x
            && x < horizontal.a.0.max(horizontal.b.0)
            && vertical.a.1.min(vertical.b.1) < y
            && y < vertical.a.1.max(vertical.b.1)
    }
}
