//! Start-up configuration.
//!
//! Everything here is fixed once the window exists; per-frame code only
//! reads a `&Settings`.

use thiserror::Error;

/// Values that depend on the frame-buffer and the world scale, not on the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    pub width: usize,
    pub height: usize,
    pub fps: u32,
    /// World units per grid cell.
    pub tile_size: f64,
    /// Horizontal field of view, radians.
    pub fov: f64,
    /// Screen pixels covered by one ray.
    pub column_width: usize,
    /// DDA step budget per ray.
    pub max_steps: u32,
    pub player_speed: f64,
    pub mouse_sensitivity: f64,
    /// How far ahead of the player the collision probe looks.
    pub collision_margin: f64,
    pub eye_height: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 60,
            tile_size: 1.0,
            // the game has always used 3.14 here; keep the exact FOV
            fov: 60.0 * (3.14 / 180.0),
            column_width: 2,
            max_steps: 800,
            player_speed: 3.0,
            mouse_sensitivity: 0.002,
            collision_margin: 0.1,
            eye_height: 0.5,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error("screen size {0}x{1} is empty")]
    EmptyScreen(usize, usize),

    #[error("field of view {0} rad is outside (0, π)")]
    BadFov(f64),

    #[error("column width must be between 1 and the screen width, got {0}")]
    BadColumnWidth(usize),

    #[error("tile size must be positive and finite, got {0}")]
    BadTileSize(f64),

    #[error("max_steps must be at least 1")]
    NoSteps,
}

impl Settings {
    /// Reject values the renderer cannot work with.
    pub fn validate(self) -> Result<Self, SettingsError> {
        if self.width == 0 || self.height == 0 {
            return Err(SettingsError::EmptyScreen(self.width, self.height));
        }
        if !(self.fov > 0.0 && self.fov < std::f64::consts::PI) {
            return Err(SettingsError::BadFov(self.fov));
        }
        if self.column_width == 0 || self.column_width > self.width {
            return Err(SettingsError::BadColumnWidth(self.column_width));
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(SettingsError::BadTileSize(self.tile_size));
        }
        if self.max_steps == 0 {
            return Err(SettingsError::NoSteps);
        }
        Ok(self)
    }

    /// Number of rays cast per frame.
    #[inline]
    pub fn num_rays(&self) -> usize {
        self.width / self.column_width
    }

    /// Angle between two neighbouring rays.
    #[inline]
    pub fn delta_angle(&self) -> f64 {
        self.fov / self.num_rays() as f64
    }

    /// Numerator of the wall-height formula: `tile_size * screen_height_px`.
    #[inline]
    pub fn projection_coeff(&self) -> f64 {
        self.tile_size * self.height as f64
    }
}
