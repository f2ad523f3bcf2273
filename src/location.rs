use ndarray::Ix;

/// A column or row on the field, counted from the top left.
pub type Coord = usize;

/// A location `(x, y)` on a puzzle field. The top left corner is `Location(0, 0)`.
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
pub struct Location(pub Coord, pub Coord);

impl Location {
    pub(crate) fn as_index(&self) -> (Ix, Ix) {
        (self.1, self.0)
    }

    /// Offset this location, or [`None`] if the result would leave the non-negative quadrant.
    pub fn checked_offset_by(self, rhs: (isize, isize)) -> Option<Self> {
        Some(Self(self.0.checked_add_signed(rhs.0)?, self.1.checked_add_signed(rhs.1)?))
    }

    /// Manhattan distance; for two locations sharing a row or column this is the segment length.
    pub fn distance_to(&self, other: Location) -> Coord {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1)
    }

    /// Whether both lie on the same row.
    #[inline]
    pub fn shares_row(&self, other: Location) -> bool {
        self.1 == other.1
    }

    /// Whether both lie in the same column.
    #[inline]
    pub fn shares_column(&self, other: Location) -> bool {
        self.0 == other.0
    }

    /// Whether `self` lies strictly between `a` and `b`, all three on one row or column.
    pub fn is_strictly_between(&self, a: Location, b: Location) -> bool {
        if a.shares_row(b) && self.shares_row(a) {
            a.0.min(b.0) < self.0 && self.0 < a.0.max(b.0)
        } else if a.shares_column(b) && self.shares_column(a) {
            a.1.min(b.1) < self.1 && self.1 < a.1.max(b.1)
        } else {
            false
        }
    }
}
