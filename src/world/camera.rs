use glam::{DVec2, DVec3};
use std::f64::consts::{FRAC_PI_2, TAU};

use crate::engine::types::Screen;

/// Player view-point in world space.
///
/// * `pos.x`/`pos.z` are the map plane, `pos.y` is eye height (y is up).
/// * `yaw` 0 looks along +x; positive yaw turns towards +z.
/// * `pitch` only moves the horizon, it never changes wall heights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pos: DVec3,
    yaw: f64,
    pitch: f64,
    fov: f64, // horizontal FoV, radians
}

impl Camera {
    pub fn new(pos: DVec3, yaw: f64, pitch: f64, fov: f64) -> Self {
        debug_assert!(pos.is_finite() && yaw.is_finite() && pitch.is_finite());
        Self {
            pos,
            yaw,
            pitch: pitch.clamp(-FRAC_PI_2, FRAC_PI_2),
            fov,
        }
    }

    #[inline]
    pub fn pos(&self) -> DVec3 {
        self.pos
    }

    /// Position on the map plane `(x, z)`.
    #[inline]
    pub fn plane_pos(&self) -> DVec2 {
        DVec2::new(self.pos.x, self.pos.z)
    }

    #[inline]
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    #[inline]
    pub fn fov(&self) -> f64 {
        self.fov
    }

    pub fn set_pose(&mut self, pos: DVec3, yaw: f64, pitch: f64) {
        debug_assert!(pos.is_finite() && yaw.is_finite() && pitch.is_finite());
        self.pos = pos;
        self.yaw = yaw;
        self.pitch = pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Transform a map-plane point into camera-local coords:
    ///  .x = lateral offset (+ right on screen)
    ///  .y = depth along the forward axis
    #[inline]
    pub fn to_cam(&self, p: DVec2) -> DVec2 {
        let d = p - self.plane_pos();
        DVec2::new(d.dot(self.right()), d.dot(self.forward()))
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks on the map plane.
    #[inline(always)]
    pub fn forward(&self) -> DVec2 {
        let (s, c) = self.yaw.sin_cos();
        DVec2::new(c, s)
    }

    /// Unit vector towards increasing ray angle, i.e. screen right.
    #[inline(always)]
    pub fn right(&self) -> DVec2 {
        self.forward().perp()
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` units and `side` (strafe right), keeping eye height.
    pub fn step(&mut self, forward: f64, side: f64) {
        let d = self.forward() * forward + self.right() * side;
        self.pos.x += d.x;
        self.pos.z += d.y;
    }

    /// Rotate around the vertical axis.
    pub fn turn(&mut self, delta_yaw: f64) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(TAU);
    }

    /// Tilt the view; clamped to straight up / straight down.
    pub fn look(&mut self, delta_pitch: f64) {
        self.pitch = (self.pitch + delta_pitch).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /*───────────────── projection helpers ─────────────────*/

    /// Angle of ray `i` out of `n`, sweeping the FoV left to right.
    #[inline]
    pub fn ray_angle(&self, i: usize, n: usize) -> f64 {
        debug_assert!(n > 0);
        self.yaw - self.fov * 0.5 + i as f64 * (self.fov / n as f64)
    }

    /// Pixel-per-map-unit scale for viewport width `w`.
    ///
    /// ```text
    /// focal = w / (2 * tan(fov/2))
    /// ```
    #[inline]
    pub fn focal(&self, w: usize) -> f64 {
        (w as f64) * 0.5 / (self.fov * 0.5).tan()
    }

    /// Screen row of the horizon; the vertical midpoint when `pitch == 0`.
    #[inline]
    pub fn horizon(&self, screen: &Screen) -> f64 {
        // clamp keeps tan() finite at ±90°
        let p = self.pitch.clamp(-1.5, 1.5);
        screen.half_h - p.tan() * self.focal(screen.w)
    }

    /// Near-plane distance for sprite culling.
    #[inline(always)]
    pub fn near(&self) -> f64 {
        0.05
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3};

    #[test]
    fn forward_and_right_are_orthonormal() {
        let cam = Camera::new(DVec3::ZERO, 0.3, 0.0, 1.57);
        let f = cam.forward();
        let r = cam.right();
        assert!((f.length() - 1.0).abs() < 1e-12);
        assert!((r.length() - 1.0).abs() < 1e-12);
        assert!(f.dot(r).abs() < 1e-12);
    }

    #[test]
    fn focal_at_90_deg() {
        let cam = Camera::new(DVec3::ZERO, 0.0, 0.0, FRAC_PI_2);
        assert!((cam.focal(640) - 320.0).abs() < 1e-9);
    }

    #[test]
    fn to_cam_axes_align() {
        let cam = Camera::new(DVec3::ZERO, 0.0, 0.0, FRAC_PI_2);
        // straight ahead at (10, 0) → (lateral=0, depth=10)
        assert!((cam.to_cam(dvec2(10.0, 0.0)) - dvec2(0.0, 10.0)).length() < 1e-12);
        // +z is towards increasing angle → screen right
        assert!((cam.to_cam(dvec2(0.0, 5.0)) - dvec2(5.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn ray_angles_sweep_fov() {
        let cam = Camera::new(DVec3::ZERO, 1.0, 0.0, FRAC_PI_3);
        assert!((cam.ray_angle(0, 4) - (1.0 - FRAC_PI_3 / 2.0)).abs() < 1e-12);
        assert!((cam.ray_angle(2, 4) - 1.0).abs() < 1e-12);
        assert!((cam.ray_angle(4, 4) - (1.0 + FRAC_PI_3 / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn turn_wraps_and_look_clamps() {
        let mut cam = Camera::new(DVec3::ZERO, 0.0, 0.0, FRAC_PI_2);
        cam.turn(-0.5);
        assert!((cam.yaw() - (TAU - 0.5)).abs() < 1e-12);
        cam.look(10.0);
        assert_eq!(cam.pitch(), FRAC_PI_2);
        cam.look(-20.0);
        assert_eq!(cam.pitch(), -FRAC_PI_2);
    }

    #[test]
    fn horizon_is_midpoint_without_pitch() {
        let screen = Screen::new(320, 200);
        let mut cam = Camera::new(DVec3::ZERO, 0.0, 0.0, FRAC_PI_2);
        assert_eq!(cam.horizon(&screen), 100.0);
        cam.look(0.2);
        assert!(cam.horizon(&screen) < 100.0, "looking up lowers the horizon row");
    }

    #[test]
    fn step_moves_on_plane_only() {
        let mut cam = Camera::new(DVec3::new(1.0, 0.5, 1.0), FRAC_PI_2, 0.0, FRAC_PI_2);
        cam.step(2.0, 0.0);
        assert!((cam.pos() - DVec3::new(1.0, 0.5, 3.0)).length() < 1e-12);
        cam.step(0.0, 1.0);
        assert!((cam.pos() - DVec3::new(0.0, 0.5, 3.0)).length() < 1e-12);
    }
}
