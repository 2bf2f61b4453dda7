mod components;
mod enemy;
mod input;
mod mode;
mod player;

pub use components::{Angle, Position, SpriteSize};
pub use enemy::{DIRECTIONS, Enemies, facing_index};
pub use input::{Buttons, InputSnapshot};
pub use mode::{MainMenuItem, Mode, PauseItem};
pub use player::{Player, RUN_FACTOR, is_wall};
