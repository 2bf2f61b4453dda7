use glam::DVec2;

use crate::{
    engine::types::Screen,
    renderer::SpriteSpan,
    world::Camera,
};

/// Corrected distances are floored to this before dividing.
pub const MIN_DISTANCE: f64 = 1e-4;

/// On-screen size of one wall slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Full slice height in pixels (may exceed the screen).
    pub height: f64,
    /// Pixels per world unit at the hit depth.
    pub scale: f64,
}

/// Turns hit distances into perspective-correct screen heights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projector {
    tile_size: f64,
    screen: Screen,
    /// `tile_size * screen_height_px`
    coeff: f64,
}

impl Projector {
    pub fn new(tile_size: f64, screen: Screen) -> Self {
        Self {
            tile_size,
            screen,
            coeff: tile_size * screen.h as f64,
        }
    }

    #[inline]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Perpendicular distance: the raw Euclidean hit distance projected on
    /// the camera's forward axis. Removes the fisheye bow.
    #[inline(always)]
    pub fn correct(hit_distance: f64, ray_angle: f64, camera_angle: f64) -> f64 {
        hit_distance * (ray_angle - camera_angle).cos()
    }

    /// Height of the wall slice for a ray at `ray_angle` hitting at
    /// `hit_distance` (world units, uncorrected).
    #[inline]
    pub fn project(&self, hit_distance: f64, ray_angle: f64, camera_angle: f64) -> Projection {
        debug_assert!(
            hit_distance.is_finite() && ray_angle.is_finite() && camera_angle.is_finite(),
            "non-finite hit {hit_distance} at {ray_angle}"
        );
        let corrected = Self::correct(hit_distance, ray_angle, camera_angle).max(MIN_DISTANCE);
        let height = self.coeff / corrected;
        Projection {
            height,
            scale: height / self.tile_size,
        }
    }

    /// Rows `top .. bottom` covered by a slice of `height` centred on the
    /// `horizon` row, clipped to the screen.
    #[inline]
    pub fn extent(&self, height: f64, horizon: f64) -> (f64, f64) {
        let h = self.screen.h as f64;
        let top = (horizon - height * 0.5).clamp(0.0, h);
        let bottom = (horizon + height * 0.5).clamp(0.0, h);
        (top, bottom)
    }

    /// Billboard of `size` world units standing at `pos` on the map plane.
    /// `None` when it is behind the near plane.
    pub fn project_sprite(&self, cam: &Camera, pos: DVec2, size: f64) -> Option<SpriteSpan> {
        let local = cam.to_cam(pos);
        let depth = local.y;
        if depth <= cam.near() {
            return None;
        }
        // wall columns step evenly in angle, so sprites are placed by angle too
        let angle = local.x.atan2(depth);
        let center_x = self.screen.half_w + angle / cam.fov() * self.screen.w as f64;
        let height = size * self.screen.h as f64 / depth;
        let half_w = height * 0.5;
        if center_x + half_w < 0.0 || center_x - half_w >= self.screen.w as f64 {
            return None;
        }
        let horizon = cam.horizon(&self.screen);
        Some(SpriteSpan {
            center_x,
            half_w,
            top: horizon - height * 0.5,
            bottom: horizon + height * 0.5,
            depth,
            facing: 0,
        })
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
