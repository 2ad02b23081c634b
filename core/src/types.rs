/// Single coordinate axis used for the board edge length and for row/column positions.
pub type Coord = u8;

/// Count type used for mine counts, tile counts and reveal counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Integer division rounding half away from zero, matching `Math.round` on positive ratios.
pub(crate) const fn div_round(numerator: u128, denominator: u128) -> u128 {
    (2 * numerator + denominator) / (2 * denominator)
}

/// Row-major iterator over every position of a square board.
#[derive(Debug, Clone)]
pub struct CoordIter {
    size: Coord,
    next: Option<Coord2>,
}

impl CoordIter {
    pub fn new(size: Coord) -> Self {
        Self {
            size,
            next: (size > 0).then_some((0, 0)),
        }
    }
}

impl Iterator for CoordIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let (row, col) = current;
        self.next = if col + 1 < self.size {
            Some((row, col + 1))
        } else if row + 1 < self.size {
            Some((row + 1, 0))
        } else {
            None
        };
        Some(current)
    }
}
