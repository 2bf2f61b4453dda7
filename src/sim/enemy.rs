use glam::DVec2;
use hecs::{Entity, World};
use std::f64::consts::TAU;

use super::components::{Angle, Position, SpriteSize};
use crate::{engine::Projector, renderer::SpriteSpan, world::Camera};

/// Rows in an enemy sprite sheet, one per 45° of viewing angle.
pub const DIRECTIONS: u8 = 8;

/// Owns the ECS world holding every enemy.
pub struct Enemies {
    world: World,
}

impl Default for Enemies {
    fn default() -> Self {
        Self::new()
    }
}

impl Enemies {
    pub fn new() -> Self {
        Self {
            world: World::new(),
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    /// Spawn an enemy standing at `pos` facing `heading`.
    pub fn spawn(&mut self, pos: DVec2, heading: f64, size: f64) -> Entity {
        tracing::debug!(x = pos.x, z = pos.y, "spawn enemy");
        self.world
            .spawn((Position(pos), Angle(heading), SpriteSize(size)))
    }

    /// Billboards in front of the camera, sorted far to near so nearer
    /// ones paint over farther ones.
    pub fn visible_sprites(&self, cam: &Camera, projector: &Projector) -> Vec<SpriteSpan> {
        let viewer = cam.plane_pos();
        let mut out: Vec<SpriteSpan> = self
            .world
            .query::<(&Position, &Angle, &SpriteSize)>()
            .iter()
            .filter_map(|(_, (pos, heading, size))| {
                let mut span = projector.project_sprite(cam, pos.0, size.0)?;
                span.facing = facing_index(viewer, pos.0, heading.0);
                Some(span)
            })
            .collect();
        out.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        out
    }
}

/// Sprite-sheet row for an enemy at `pos` facing `heading`, seen from
/// `viewer`: 0 when it looks straight at the viewer, counting
/// counter-clockwise in 45° steps.
pub fn facing_index(viewer: DVec2, pos: DVec2, heading: f64) -> u8 {
    let to_viewer = viewer - pos;
    let rel = (to_viewer.y.atan2(to_viewer.x) - heading).rem_euclid(TAU);
    let sector = TAU / DIRECTIONS as f64;
    // centre each 45° sector on its direction
    (((rel + sector * 0.5) / sector) as u8) % DIRECTIONS
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::Screen;
    use glam::{DVec3, dvec2};
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn facing_counts_around_the_enemy() {
        let e = DVec2::ZERO;
        assert_eq!(facing_index(dvec2(5.0, 0.0), e, 0.0), 0);
        assert_eq!(facing_index(dvec2(0.0, 5.0), e, 0.0), 2);
        assert_eq!(facing_index(dvec2(-5.0, 0.0), e, 0.0), 4);
        assert_eq!(facing_index(dvec2(0.0, -5.0), e, 0.0), 6);
        // turning the enemy to face the viewer brings it back to 0
        assert_eq!(facing_index(dvec2(-5.0, 0.0), e, PI), 0);
        // just short of the 0/7 border
        assert_eq!(facing_index(dvec2(5.0, -0.1), e, 0.0), 0);
    }

    #[test]
    fn sprites_sorted_far_to_near_and_culled() {
        let mut enemies = Enemies::new();
        enemies.spawn(dvec2(3.0, 0.0), PI, 1.0);
        enemies.spawn(dvec2(8.0, 0.0), FRAC_PI_2, 1.0);
        enemies.spawn(dvec2(-4.0, 0.0), 0.0, 1.0); // behind
        assert_eq!(enemies.len(), 3);

        let cam = Camera::new(DVec3::ZERO, 0.0, 0.0, FRAC_PI_2);
        let projector = Projector::new(1.0, Screen::new(320, 200));
        let sprites = enemies.visible_sprites(&cam, &projector);
        assert_eq!(sprites.len(), 2);
        assert_eq!(sprites[0].depth, 8.0);
        assert_eq!(sprites[1].depth, 3.0);
        assert_eq!(sprites[1].facing, 0);
    }
}
