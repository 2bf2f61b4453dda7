mod camera;
mod grid;
mod plan;

pub use camera::Camera;
pub use grid::{Cell, Grid, GridError};
pub use plan::{ColumnMap, FloorPlan};
