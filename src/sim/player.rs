use glam::{DVec2, DVec3, ivec3};
use std::f64::consts::{FRAC_PI_2, TAU};

use super::input::{Buttons, InputSnapshot};
use crate::{
    Settings,
    world::{Camera, Grid},
};

/// Speed multiplier while RUN is held.
pub const RUN_FACTOR: f64 = 1.5;

/// First-person controller: walks on the ground layer, collides with walls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    /// Map-plane position `(x, z)`, world units.
    pub pos: DVec2,
    pub yaw: f64,
    pub pitch: f64,
    pub eye_height: f64,
}

impl Player {
    /// Standing in the middle of tile (1, 1), facing +x.
    pub fn spawn(settings: &Settings) -> Self {
        Self {
            pos: DVec2::splat(settings.tile_size * 1.5),
            yaw: 0.0,
            pitch: 0.0,
            eye_height: settings.tile_size * settings.eye_height,
        }
    }

    pub fn camera(&self, fov: f64) -> Camera {
        Camera::new(
            DVec3::new(self.pos.x, self.eye_height, self.pos.y),
            self.yaw,
            self.pitch,
            fov,
        )
    }

    pub fn update(&mut self, dt: f64, input: &InputSnapshot, grid: &Grid, settings: &Settings) {
        self.movement(dt, input, grid, settings);
        self.mouse_control(input.mouse_delta, settings.mouse_sensitivity);
    }

    fn movement(&mut self, dt: f64, input: &InputSnapshot, grid: &Grid, settings: &Settings) {
        let mut speed = settings.player_speed * dt;
        if input.held(Buttons::RUN) {
            speed *= RUN_FACTOR;
        }
        let (s, c) = self.yaw.sin_cos();
        let forward = DVec2::new(c, s);
        let right = forward.perp();

        let mut delta = DVec2::ZERO;
        if input.held(Buttons::FORWARD) {
            delta += forward * speed;
        }
        if input.held(Buttons::BACK) {
            delta -= forward * speed;
        }
        if input.held(Buttons::LEFT) {
            delta -= right * speed;
        }
        if input.held(Buttons::RIGHT) {
            delta += right * speed;
        }
        if delta != DVec2::ZERO {
            self.slide(delta, grid, settings);
        }
    }

    /// Axis-separated move: each axis advances only if a probe `margin`
    /// ahead of the new position is open, so walls are slid along.
    fn slide(&mut self, delta: DVec2, grid: &Grid, settings: &Settings) {
        let margin = settings.collision_margin;
        let next = self.pos + delta;

        if !is_wall(grid, next.x + margin.copysign(delta.x), self.pos.y, settings.tile_size) {
            self.pos.x = next.x;
        }
        if !is_wall(grid, self.pos.x, next.y + margin.copysign(delta.y), settings.tile_size) {
            self.pos.y = next.y;
        }
    }

    fn mouse_control(&mut self, mouse_delta: DVec2, sensitivity: f64) {
        self.yaw = (self.yaw + mouse_delta.x * sensitivity).rem_euclid(TAU);
        self.pitch = (self.pitch - mouse_delta.y * sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }
}

/// Ground-layer solidity at a world-space map-plane point; off-map is wall.
pub fn is_wall(grid: &Grid, x: f64, z: f64, tile_size: f64) -> bool {
    let i = (x / tile_size).floor() as i32;
    let k = (z / tile_size).floor() as i32;
    grid.is_solid(ivec3(i, 0, k))
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
