use ndarray::Array2;

/// Single coordinate axis used for board columns, rows, and positions.
pub type Coord = u8;

/// Count type used for mine counts, cell ids, and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(column, row)`.
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

/// NW, N, NE, W, E, SW, S, SE.
const ADJACENT_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// N, S, W, E. Flood-fill expansion uses only these.
const CARDINAL_OFFSETS: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Applies `offset` to `coords`, returning a value only when it remains in bounds.
fn apply_offset(coords: Coord2, offset: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = offset;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add_signed(dx)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add_signed(dy)?;
    if next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

/// Iterates the in-bounds neighbors of a coordinate for a fixed offset set.
#[derive(Debug)]
pub struct OffsetIter {
    center: Coord2,
    bounds: Coord2,
    offsets: &'static [(i8, i8)],
    index: usize,
}

impl OffsetIter {
    fn new(center: Coord2, bounds: Coord2, offsets: &'static [(i8, i8)]) -> Self {
        Self {
            center,
            bounds,
            offsets,
            index: 0,
        }
    }
}

impl Iterator for OffsetIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.index >= self.offsets.len() {
                return None;
            }

            let next_item = apply_offset(self.center, self.offsets[self.index], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

pub trait GridNeighbors {
    fn grid_bounds(&self) -> Coord2;

    /// Up to 8 surrounding coordinates; out-of-bounds offsets are skipped, never wrapped.
    fn iter_neighbors(&self, center: Coord2) -> OffsetIter {
        OffsetIter::new(center, self.grid_bounds(), &ADJACENT_OFFSETS)
    }

    /// Up to 4 cardinal coordinates (N, S, W, E).
    fn iter_cardinal(&self, center: Coord2) -> OffsetIter {
        OffsetIter::new(center, self.grid_bounds(), &CARDINAL_OFFSETS)
    }
}

impl<T> GridNeighbors for Array2<T> {
    fn grid_bounds(&self) -> Coord2 {
        let dim = self.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }
}
