//! Grid raycaster in the DOOM style.
//!
//! * [`world`] – the solid/empty voxel [`world::Grid`] and the player [`world::Camera`].
//! * [`engine`] – DDA tracer, column projector and the per-frame column loop.
//! * [`renderer`] – rasteriser abstraction plus a software back-end.
//! * [`sim`] – input snapshot, player controller, enemies and game mode.
//! * [`editor`] – fly camera, mesh picking and queued grid edits.

pub mod editor;
pub mod engine;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod world;

pub use settings::{Settings, SettingsError};
