// Solid/empty voxel grid shared by the game, the renderer and the editor.
// The renderer only reads it; the editor mutates it between frames.

use glam::{DVec3, IVec3};
use thiserror::Error;

/// Occupancy of one tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    Solid = 1,
}

impl Cell {
    #[inline(always)]
    pub fn is_solid(self) -> bool {
        self == Cell::Solid
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid dimensions {0}x{1}x{2} must all be non-zero")]
    EmptyDims(usize, usize, usize),

    #[error("grid dimensions {0}x{1}x{2} do not fit in memory")]
    TooLarge(usize, usize, usize),

    #[error("expected {expected} cells, got {got}")]
    CellCount { expected: usize, got: usize },

    #[error("cell ({}, {}, {}) is outside the grid", .0.x, .0.y, .0.z)]
    OutOfBounds(IVec3),
}

/// `width × height × depth` tiles; `y` is up.
///
/// Any coordinate outside the bounds reads as [`Cell::Solid`], so every
/// ray walking off the map stops at its edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    depth: usize,
    /// `[z][y][x]` order, x fastest.
    cells: Vec<Cell>,
}

impl Grid {
    /// All-empty grid.
    pub fn new(width: usize, height: usize, depth: usize) -> Result<Self, GridError> {
        let len = Self::checked_len(width, height, depth)?;
        Ok(Self {
            width,
            height,
            depth,
            cells: vec![Cell::Empty; len],
        })
    }

    /// Wrap an existing `[z][y][x]` cell vector.
    pub fn from_cells(
        width: usize,
        height: usize,
        depth: usize,
        cells: Vec<Cell>,
    ) -> Result<Self, GridError> {
        let expected = Self::checked_len(width, height, depth)?;
        if cells.len() != expected {
            return Err(GridError::CellCount {
                expected,
                got: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            depth,
            cells,
        })
    }

    /// Room whose outer x/z ring is solid on every layer.
    pub fn walled_room(width: usize, height: usize, depth: usize) -> Result<Self, GridError> {
        let mut grid = Self::new(width, height, depth)?;
        for z in 0..depth {
            for y in 0..height {
                for x in 0..width {
                    if x == 0 || z == 0 || x + 1 == width || z + 1 == depth {
                        let i = grid.index(x, y, z);
                        grid.cells[i] = Cell::Solid;
                    }
                }
            }
        }
        Ok(grid)
    }

    fn checked_len(width: usize, height: usize, depth: usize) -> Result<usize, GridError> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(GridError::EmptyDims(width, height, depth));
        }
        // coordinates are i32 on the hot path
        let fits = |n: usize| i32::try_from(n).is_ok();
        if !(fits(width) && fits(height) && fits(depth)) {
            return Err(GridError::TooLarge(width, height, depth));
        }
        width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(depth))
            .ok_or(GridError::TooLarge(width, height, depth))
    }

    /*──────────────────────── queries ───────────────────────*/

    #[inline]
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.height + y) * self.width + x
    }

    #[inline(always)]
    pub fn contains_xz(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && (x as usize) < self.width && (z as usize) < self.depth
    }

    #[inline(always)]
    pub fn contains(&self, c: IVec3) -> bool {
        self.contains_xz(c.x, c.z) && c.y >= 0 && (c.y as usize) < self.height
    }

    /// Cell at `c`; `None` outside the bounds.
    #[inline]
    pub fn get(&self, c: IVec3) -> Option<Cell> {
        self.contains(c)
            .then(|| self.cells[self.index(c.x as usize, c.y as usize, c.z as usize)])
    }

    /// Out of bounds counts as wall.
    #[inline(always)]
    pub fn is_solid(&self, c: IVec3) -> bool {
        self.get(c).is_none_or(Cell::is_solid)
    }

    /// Lowest solid layer of the `(x, z)` column, scanning `y` upwards.
    ///
    /// Columns outside the grid report layer 0.
    pub fn column_solid(&self, x: i32, z: i32) -> Option<i32> {
        if !self.contains_xz(x, z) {
            return Some(0);
        }
        let (x, z) = (x as usize, z as usize);
        (0..self.height)
            .find(|&y| self.cells[self.index(x, y, z)].is_solid())
            .map(|y| y as i32)
    }

    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_solid()).count()
    }

    /// Tile containing the world-space point `p`.
    #[inline]
    pub fn cell_at(p: DVec3, tile_size: f64) -> IVec3 {
        (p / tile_size).floor().as_ivec3()
    }

    /*──────────────────────── mutation ──────────────────────*/

    /// Overwrite one tile. Only the editor calls this, between frames.
    pub fn set(&mut self, c: IVec3, cell: Cell) -> Result<Cell, GridError> {
        if !self.contains(c) {
            return Err(GridError::OutOfBounds(c));
        }
        let i = self.index(c.x as usize, c.y as usize, c.z as usize);
        Ok(std::mem::replace(&mut self.cells[i], cell))
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::ivec3;

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let g = Grid::new(3, 2, 4).unwrap();
        assert!(!g.is_solid(ivec3(1, 1, 1)));
        for c in [
            ivec3(-1, 0, 0),
            ivec3(3, 0, 0),
            ivec3(0, -1, 0),
            ivec3(0, 2, 0),
            ivec3(0, 0, -1),
            ivec3(0, 0, 4),
        ] {
            assert!(g.is_solid(c), "{c} should be solid");
            assert_eq!(g.get(c), None);
        }
        assert_eq!(g.column_solid(-1, 2), Some(0));
    }

    #[test]
    fn walled_room_has_hollow_interior() {
        let g = Grid::walled_room(5, 2, 5).unwrap();
        // ring of 16 tiles on each of the two layers
        assert_eq!(g.solid_count(), 32);
        assert_eq!(g.column_solid(2, 2), None);
        assert_eq!(g.column_solid(0, 2), Some(0));
        assert_eq!(g.column_solid(4, 4), Some(0));
    }

    #[test]
    fn column_reports_lowest_solid_layer() {
        let mut g = Grid::new(2, 4, 2).unwrap();
        g.set(ivec3(1, 2, 1), Cell::Solid).unwrap();
        g.set(ivec3(1, 3, 1), Cell::Solid).unwrap();
        assert_eq!(g.column_solid(1, 1), Some(2));
        assert_eq!(g.column_solid(0, 0), None);
    }

    #[test]
    fn set_returns_previous_and_guards_bounds() {
        let mut g = Grid::new(2, 2, 2).unwrap();
        assert_eq!(g.set(ivec3(0, 0, 0), Cell::Solid), Ok(Cell::Empty));
        assert_eq!(g.set(ivec3(0, 0, 0), Cell::Empty), Ok(Cell::Solid));
        assert_eq!(
            g.set(ivec3(2, 0, 0), Cell::Solid),
            Err(GridError::OutOfBounds(ivec3(2, 0, 0)))
        );
    }

    #[test]
    fn constructor_validation() {
        assert_eq!(Grid::new(0, 1, 1), Err(GridError::EmptyDims(0, 1, 1)));
        assert_eq!(
            Grid::from_cells(2, 1, 2, vec![Cell::Empty; 3]),
            Err(GridError::CellCount {
                expected: 4,
                got: 3
            })
        );
        assert!(Grid::from_cells(2, 1, 2, vec![Cell::Solid; 4]).is_ok());
    }

    #[test]
    fn cell_at_floors_negative_coordinates() {
        assert_eq!(Grid::cell_at(DVec3::new(-0.5, 0.2, 3.9), 1.0), ivec3(-1, 0, 3));
        assert_eq!(Grid::cell_at(DVec3::new(130.0, 0.0, 64.0), 64.0), ivec3(2, 0, 1));
    }
}
