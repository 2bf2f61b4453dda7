pub mod dda;
pub mod frame;
pub mod projection;
pub mod types;

pub use dda::{HitResult, Tracer, VoxelHit};
pub use frame::FrameRenderer;
pub use projection::{MIN_DISTANCE, Projection, Projector};
pub use types::{HitSide, Screen};
