use strum::VariantArray;

use crate::location::Location;

/// One of the four compass directions a bridge may leave an island in.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Away from row 0.
    Down,
    /// Towards column 0.
    Left,
    /// Away from column 0.
    Right,
}

impl Direction {
    fn offset(&self) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Attempt `distance` steps from `location`, returning [`None`] when it would leave the field's
    /// top or left edge. The bottom and right edges are the caller's business.
    pub fn attempt_many_from(&self, location: Location, distance: usize) -> Option<Location> {
        let (dx, dy) = self.offset();
        let distance = isize::try_from(distance).ok()?;
        location.checked_offset_by((dx * distance, dy * distance))
    }

    /// The opposite direction.
    pub fn invert(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Whether this runs along a row.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Direction from `a` towards `b`, if the two share exactly one of row or column.
    pub fn direction_to(a: Location, b: Location) -> Option<Self> {
        match (a.shares_column(b), a.shares_row(b)) {
            (true, false) => Some(if b.1 < a.1 { Self::Up } else { Self::Down }),
            (false, true) => Some(if b.0 < a.0 { Self::Left } else { Self::Right }),
            _ => None,
        }
    }

    /// Slot of this direction in a per-island adjacency array.
    #[inline]
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}
