// Two-axis view of the world used by the flat renderer path.

use super::grid::Grid;

/// Anything the column tracer can march over: a map of `(x, z)` columns,
/// each either open or blocked starting at some layer.
pub trait ColumnMap {
    fn in_bounds(&self, x: i32, z: i32) -> bool;

    /// Lowest solid layer in the column, `None` if the column is open.
    fn solid_layer(&self, x: i32, z: i32) -> Option<i32>;
}

impl ColumnMap for Grid {
    #[inline(always)]
    fn in_bounds(&self, x: i32, z: i32) -> bool {
        self.contains_xz(x, z)
    }

    #[inline(always)]
    fn solid_layer(&self, x: i32, z: i32) -> Option<i32> {
        self.column_solid(x, z)
    }
}

/// Grid collapsed onto the map plane: a column is a wall when any layer
/// of it is solid.
#[derive(Clone, Debug, PartialEq)]
pub struct FloorPlan {
    width: usize,
    depth: usize,
    walls: Vec<bool>,
}

impl FloorPlan {
    pub fn from_grid(grid: &Grid) -> Self {
        let (width, _, depth) = grid.dims();
        let mut walls = Vec::with_capacity(width * depth);
        for z in 0..depth as i32 {
            for x in 0..width as i32 {
                walls.push(grid.column_solid(x, z).is_some());
            }
        }
        Self {
            width,
            depth,
            walls,
        }
    }

    #[inline]
    pub fn is_wall(&self, x: i32, z: i32) -> bool {
        !self.in_bounds(x, z) || self.walls[z as usize * self.width + x as usize]
    }
}

impl ColumnMap for FloorPlan {
    #[inline(always)]
    fn in_bounds(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && (x as usize) < self.width && (z as usize) < self.depth
    }

    #[inline(always)]
    fn solid_layer(&self, x: i32, z: i32) -> Option<i32> {
        self.is_wall(x, z).then_some(0)
    }
}
