use glam::{DMat4, DVec2, DVec3, DVec4};
use std::f64::consts::{FRAC_PI_6, TAU};

use super::pick::Ray;
use crate::{engine::Screen, sim::Buttons, sim::InputSnapshot, world::Camera};

pub const SLOW_SPEED: f64 = 10.0;
pub const FAST_SPEED: f64 = 20.0;
pub const SENSITIVITY: f64 = 0.005;
pub const MAX_PITCH: f64 = 89.0 * std::f64::consts::PI / 180.0;
pub const FOV_Y: f64 = 60.0 * std::f64::consts::PI / 180.0;
pub const NEAR: f64 = 0.1;
pub const FAR: f64 = 1000.0;

/// Free-flying editor viewpoint, y up. Positive pitch looks up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditorCamera {
    pub pos: DVec3,
    pub yaw: f64,
    pub pitch: f64,
    pub speed: f64,
}

impl EditorCamera {
    /// Hovering `height` above the centre of a `w × d` tile floor, tilted
    /// down towards it.
    pub fn over(w: usize, d: usize, tile_size: f64, height: f64) -> Self {
        Self {
            pos: DVec3::new(w as f64 * tile_size * 0.5, height, d as f64 * tile_size * 0.5),
            yaw: 0.0,
            pitch: -FRAC_PI_6,
            speed: SLOW_SPEED,
        }
    }

    #[inline]
    pub fn forward(&self) -> DVec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        DVec3::new(cy * cp, sp, sy * cp)
    }

    /// Horizontal, 90° clockwise of the yaw seen from above.
    #[inline]
    pub fn right(&self) -> DVec3 {
        let (s, c) = self.yaw.sin_cos();
        DVec3::new(-s, 0.0, c)
    }

    pub fn update(&mut self, dt: f64, input: &InputSnapshot) {
        self.speed = if input.held(Buttons::RUN) {
            FAST_SPEED
        } else {
            SLOW_SPEED
        };

        if input.held(Buttons::LOOK) {
            let d = input.mouse_delta * SENSITIVITY;
            self.yaw = (self.yaw + d.x).rem_euclid(TAU);
            self.pitch = (self.pitch - d.y).clamp(-MAX_PITCH, MAX_PITCH);
        }

        let fwd = self.forward();
        let right = self.right();
        let v = self.speed * dt;
        let mut delta = DVec3::ZERO;
        for (b, dir) in [
            (Buttons::FORWARD, fwd),
            (Buttons::BACK, -fwd),
            (Buttons::LEFT, -right),
            (Buttons::RIGHT, right),
            (Buttons::UP, DVec3::Y),
            (Buttons::DOWN, DVec3::NEG_Y),
        ] {
            if input.held(b) {
                delta += dir * v;
            }
        }
        // wheel dollies along the view direction, independent of dt
        delta += fwd * input.wheel * self.speed * 0.5;
        self.pos += delta;
    }

    pub fn view(&self) -> DMat4 {
        DMat4::look_at_rh(self.pos, self.pos + self.forward(), DVec3::Y)
    }

    pub fn projection(&self, screen: &Screen) -> DMat4 {
        let aspect = screen.w as f64 / screen.h.max(1) as f64;
        DMat4::perspective_rh_gl(FOV_Y, aspect, NEAR, FAR)
    }

    /// World-space ray through pixel `mouse` (origin top-left).
    pub fn ray_from_mouse(&self, mouse: DVec2, screen: &Screen) -> Ray {
        let ndc = DVec2::new(
            2.0 * mouse.x / screen.w as f64 - 1.0,
            1.0 - 2.0 * mouse.y / screen.h as f64,
        );
        let eye = self.projection(screen).inverse() * DVec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let eye_dir = DVec4::new(eye.x, eye.y, -1.0, 0.0);
        let world = self.view().inverse() * eye_dir;
        let dir = world.truncate().try_normalize().unwrap_or_else(|| self.forward());
        Ray::new(self.pos, dir)
    }

    /// Map-plane camera for the column renderer.
    pub fn column_camera(&self) -> Camera {
        Camera::new(self.pos, self.yaw, self.pitch, FOV_Y)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Screen {
        Screen::new(1280, 720)
    }

    #[test]
    fn starts_over_the_middle_looking_down() {
        let cam = EditorCamera::over(32, 32, 1.0, 10.0);
        assert_eq!(cam.pos, DVec3::new(16.0, 10.0, 16.0));
        assert!(cam.forward().y < 0.0);
    }

    #[test]
    fn centre_pixel_follows_forward() {
        let mut cam = EditorCamera::over(32, 32, 1.0, 10.0);
        cam.yaw = 1.0;
        let ray = cam.ray_from_mouse(DVec2::new(640.0, 360.0), &screen());
        assert_eq!(ray.origin, cam.pos);
        assert!((ray.dir - cam.forward()).length() < 1e-9);
    }

    #[test]
    fn corner_pixels_spread_by_the_field_of_view() {
        let cam = EditorCamera {
            pos: DVec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            speed: SLOW_SPEED,
        };
        let top = cam.ray_from_mouse(DVec2::new(640.0, 0.0), &screen());
        // half the vertical fov above the view axis
        assert!((top.dir.y.asin() - FOV_Y / 2.0).abs() < 1e-9);
        let right = cam.ray_from_mouse(DVec2::new(1280.0, 360.0), &screen());
        assert!(right.dir.z > 0.0, "screen right is +z when facing +x");
    }

    #[test]
    fn look_requires_the_look_button() {
        let mut cam = EditorCamera::over(8, 8, 1.0, 5.0);
        let before = cam;
        let mut input = InputSnapshot {
            mouse_delta: DVec2::new(100.0, 0.0),
            ..Default::default()
        };
        cam.update(0.0, &input);
        assert_eq!(cam.yaw, before.yaw);

        input.held = Buttons::LOOK;
        input.mouse_delta = DVec2::new(100.0, -1.0e6);
        cam.update(0.0, &input);
        assert!((cam.yaw - 0.5).abs() < 1e-12);
        assert_eq!(cam.pitch, MAX_PITCH);
    }

    #[test]
    fn flies_and_dollies() {
        let mut cam = EditorCamera {
            pos: DVec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            speed: SLOW_SPEED,
        };
        let input = InputSnapshot {
            held: Buttons::FORWARD | Buttons::UP | Buttons::RUN,
            ..Default::default()
        };
        cam.update(0.5, &input);
        assert!((cam.pos - DVec3::new(10.0, 10.0, 0.0)).length() < 1e-12);

        let wheel = InputSnapshot {
            wheel: 2.0,
            ..Default::default()
        };
        cam.update(0.0, &wheel);
        assert!((cam.pos - DVec3::new(20.0, 10.0, 0.0)).length() < 1e-12);
    }
}
