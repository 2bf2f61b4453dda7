//! Grid ray marching.
//!
//! [`Tracer::trace`] is the per-column DDA on the map plane: it walks the
//! `(x, z)` columns a horizontal ray passes through, in order, and stops at
//! the first blocked one. [`Tracer::trace_voxel`] is the same walk over all
//! three axes, used by the editor to find the block under the cursor.
//!
//! Both keep, per axis, the ray length at which the next grid line on that
//! axis is crossed (`side_dist`), and always advance along the axis whose
//! next crossing is nearest.

use glam::{DVec2, DVec3, IVec2, IVec3};

use crate::engine::types::HitSide;
use crate::world::{ColumnMap, Grid};

/// First blocked column along a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    /// Euclidean length from the origin to the crossing, world units.
    /// For [`HitSide::None`] this is [`Tracer::far_distance`].
    pub distance: f64,
    pub side: HitSide,
    /// Tile that was hit. Columns outside the map report layer 0.
    pub cell: IVec3,
    /// Offset of the crossing along the face, `0.0 .. 1.0`.
    pub hit_fraction: f64,
    /// World-space crossing point on the map plane `(x, z)`.
    pub point: DVec2,
}

impl HitResult {
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.side != HitSide::None
    }
}

/// First solid voxel along a 3-D ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelHit {
    pub cell: IVec3,
    /// Outward normal of the face the ray entered through; zero when the
    /// ray started inside `cell`.
    pub normal: IVec3,
    /// World units from the origin to the entry point.
    pub distance: f64,
}

impl VoxelHit {
    /// Empty neighbour on the entered face, where the editor places blocks.
    #[inline]
    pub fn adjacent(&self) -> IVec3 {
        self.cell + self.normal
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tracer {
    pub tile_size: f64,
    pub max_steps: u32,
}

/// `|1 / d|`, or infinity when the ray never crosses a line on this axis.
#[inline(always)]
fn delta_dist(d: f64) -> f64 {
    if d == 0.0 { f64::INFINITY } else { (1.0 / d).abs() }
}

/// Distance to the first grid line crossed, given the fractional gap in
/// tile units and the per-tile delta.
#[inline(always)]
fn first_crossing(gap: f64, delta: f64) -> f64 {
    if delta.is_infinite() { f64::INFINITY } else { gap * delta }
}

impl Tracer {
    pub fn new(tile_size: f64, max_steps: u32) -> Self {
        debug_assert!(tile_size > 0.0);
        Self {
            tile_size,
            max_steps,
        }
    }

    /// Sentinel distance reported when the step budget runs out.
    #[inline]
    pub fn far_distance(&self) -> f64 {
        self.max_steps as f64 * self.tile_size
    }

    /// March a horizontal ray from `origin` (world units on the map plane)
    /// at `angle` until it enters a blocked column.
    ///
    /// * Leaving the map counts as hitting its boundary wall.
    /// * The tile containing `origin` is never tested; the first tile
    ///   examined is the one past the first grid line crossed.
    /// * Ties between the two axes advance along z.
    pub fn trace<M: ColumnMap + ?Sized>(&self, origin: DVec2, angle: f64, map: &M) -> HitResult {
        debug_assert!(angle.is_finite(), "ray angle must be finite");
        debug_assert!(origin.is_finite(), "ray origin must be finite");

        let o = origin / self.tile_size;
        let mut cell: IVec2 = o.floor().as_ivec2();

        let (sin_a, cos_a) = angle.sin_cos();
        let dir = DVec2::new(cos_a, sin_a);

        let delta_x = delta_dist(cos_a);
        let delta_z = delta_dist(sin_a);

        let step_x = if cos_a >= 0.0 { 1 } else { -1 };
        let step_z = if sin_a >= 0.0 { 1 } else { -1 };

        let gap_x = if step_x > 0 {
            cell.x as f64 + 1.0 - o.x
        } else {
            o.x - cell.x as f64
        };
        let gap_z = if step_z > 0 {
            cell.y as f64 + 1.0 - o.y
        } else {
            o.y - cell.y as f64
        };
        let mut side_x = first_crossing(gap_x, delta_x);
        let mut side_z = first_crossing(gap_z, delta_z);

        for _ in 0..self.max_steps {
            let (dist, side) = if side_x < side_z {
                cell.x += step_x;
                let d = side_x;
                side_x += delta_x;
                (d, HitSide::Vertical)
            } else {
                cell.y += step_z;
                let d = side_z;
                side_z += delta_z;
                (d, HitSide::Horizontal)
            };

            let layer = if map.in_bounds(cell.x, cell.y) {
                map.solid_layer(cell.x, cell.y)
            } else {
                Some(0)
            };

            if let Some(y) = layer {
                let p = o + dir * dist;
                let along = match side {
                    HitSide::Vertical => p.y,
                    _ => p.x,
                };
                return HitResult {
                    distance: dist * self.tile_size,
                    side,
                    cell: IVec3::new(cell.x, y, cell.y),
                    hit_fraction: along - along.floor(),
                    point: p * self.tile_size,
                };
            }
        }

        let far = self.far_distance();
        HitResult {
            distance: far,
            side: HitSide::None,
            cell: IVec3::new(cell.x, 0, cell.y),
            hit_fraction: 0.0,
            point: origin + dir * far,
        }
    }

    /// March a 3-D ray through every tile it touches and return the first
    /// solid one inside the grid.
    ///
    /// Unlike [`Self::trace`], tiles outside the grid are open here: the
    /// ray may start outside and fly in. Returns `None` once the ray is out
    /// of bounds and moving away, or the budget runs out.
    pub fn trace_voxel(&self, origin: DVec3, dir: DVec3, grid: &Grid) -> Option<VoxelHit> {
        debug_assert!(origin.is_finite() && dir.is_finite());
        let dir = dir.try_normalize()?;
        let o = origin / self.tile_size;
        let mut cell = o.floor().as_ivec3();

        if grid.get(cell).is_some_and(|c| c.is_solid()) {
            return Some(VoxelHit {
                cell,
                normal: IVec3::ZERO,
                distance: 0.0,
            });
        }

        let step = IVec3::new(
            dir.x.signum() as i32 * (dir.x != 0.0) as i32,
            dir.y.signum() as i32 * (dir.y != 0.0) as i32,
            dir.z.signum() as i32 * (dir.z != 0.0) as i32,
        );
        let delta = DVec3::new(delta_dist(dir.x), delta_dist(dir.y), delta_dist(dir.z));
        let gap = |c: i32, o: f64, s: i32| {
            if s > 0 { c as f64 + 1.0 - o } else { o - c as f64 }
        };
        let mut side = DVec3::new(
            first_crossing(gap(cell.x, o.x, step.x), delta.x),
            first_crossing(gap(cell.y, o.y, step.y), delta.y),
            first_crossing(gap(cell.z, o.z, step.z), delta.z),
        );

        let dims = {
            let (w, h, d) = grid.dims();
            IVec3::new(w as i32, h as i32, d as i32)
        };

        for _ in 0..self.max_steps {
            let axis = if side.x < side.y {
                if side.x < side.z { 0 } else { 2 }
            } else if side.y < side.z {
                1
            } else {
                2
            };
            if side[axis].is_infinite() {
                return None;
            }

            let dist = side[axis];
            side[axis] += delta[axis];
            cell[axis] += step[axis];
            let mut normal = IVec3::ZERO;
            normal[axis] = -step[axis];

            if grid.get(cell).is_some_and(|c| c.is_solid()) {
                return Some(VoxelHit {
                    cell,
                    normal,
                    distance: dist * self.tile_size,
                });
            }

            let leaving = (0..3).any(|a| {
                (step[a] > 0 && cell[a] >= dims[a])
                    || (step[a] < 0 && cell[a] < 0)
                    || (step[a] == 0 && (cell[a] < 0 || cell[a] >= dims[a]))
            });
            if leaving {
                return None;
            }
        }
        None
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Cell, FloorPlan};
    use glam::{dvec2, dvec3, ivec3};
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    fn room5() -> Grid {
        // 5×1×5, solid ring around a 3×3 hollow
        Grid::walled_room(5, 1, 5).unwrap()
    }

    #[test]
    fn straight_along_x_hits_vertical_face() {
        let t = Tracer::new(1.0, 800);
        let hit = t.trace(dvec2(2.5, 2.5), 0.0, &room5());
        assert_eq!(hit.side, HitSide::Vertical);
        assert_eq!(hit.cell, ivec3(4, 0, 2));
        assert!((hit.distance - 1.5).abs() < 1e-12);
        assert!((hit.hit_fraction - 0.5).abs() < 1e-12);
        assert!((hit.point - dvec2(4.0, 2.5)).length() < 1e-12);
    }

    #[test]
    fn straight_along_z_hits_horizontal_face() {
        let t = Tracer::new(1.0, 800);
        let hit = t.trace(dvec2(2.5, 2.5), FRAC_PI_2, &room5());
        assert_eq!(hit.side, HitSide::Horizontal);
        assert_eq!(hit.cell, ivec3(2, 0, 4));
        assert!(hit.distance.is_finite());
        assert!((hit.distance - 1.5).abs() < 1e-9);
    }

    #[test]
    fn axis_parallel_rays_never_produce_nan() {
        let t = Tracer::new(1.0, 800);
        let g = room5();
        for angle in [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2, -FRAC_PI_2] {
            for origin in [dvec2(2.5, 2.5), dvec2(2.0, 2.0), dvec2(1.0, 3.0)] {
                let hit = t.trace(origin, angle, &g);
                assert!(hit.distance.is_finite(), "angle {angle} origin {origin}");
                assert!(hit.hit_fraction.is_finite());
                assert!(hit.is_hit());
            }
        }
    }

    #[test]
    fn exhausted_budget_reports_far_sentinel() {
        let t = Tracer::new(1.0, 1);
        let hit = t.trace(dvec2(2.5, 2.5), 0.0, &room5());
        assert_eq!(hit.side, HitSide::None);
        assert_eq!(hit.distance, t.far_distance());
        assert_eq!(hit.distance, 1.0);
    }

    #[test]
    fn leaving_the_map_hits_its_boundary() {
        let t = Tracer::new(1.0, 800);
        let open = Grid::new(3, 1, 3).unwrap();
        for k in 0..32 {
            let angle = k as f64 * TAU / 32.0;
            let hit = t.trace(dvec2(1.5, 1.5), angle, &open);
            assert!(hit.is_hit(), "angle {angle} escaped");
            assert!(!open.contains(hit.cell), "angle {angle} stopped inside");
            assert!(hit.distance <= 1.5 * 2f64.sqrt() + 1e-9);
        }
    }

    #[test]
    fn starting_tile_is_not_tested() {
        let t = Tracer::new(1.0, 800);
        let mut g = room5();
        g.set(ivec3(2, 0, 2), Cell::Solid).unwrap();
        let hit = t.trace(dvec2(2.5, 2.5), 0.0, &g);
        assert_eq!(hit.cell, ivec3(4, 0, 2));
    }

    #[test]
    fn distance_grows_as_the_origin_backs_away() {
        let t = Tracer::new(1.0, 800);
        let g = Grid::walled_room(12, 1, 12).unwrap();
        let angle = 0.1;
        let near = t.trace(dvec2(4.5, 5.5), angle, &g);
        let far = t.trace(dvec2(4.5 - angle.cos(), 5.5 - angle.sin()), angle, &g);
        assert_eq!(near.cell, far.cell);
        assert_eq!(near.side, far.side);
        assert!(far.distance > near.distance);
        assert!((far.distance - near.distance - 1.0).abs() < 1e-9);
    }

    #[test]
    fn tile_size_scales_distance_and_point() {
        let t = Tracer::new(64.0, 800);
        let hit = t.trace(dvec2(2.5 * 64.0, 2.5 * 64.0), 0.0, &room5());
        assert!((hit.distance - 1.5 * 64.0).abs() < 1e-9);
        assert!((hit.point - dvec2(256.0, 160.0)).length() < 1e-9);
        assert!((hit.hit_fraction - 0.5).abs() < 1e-12);
    }

    #[test]
    fn reports_lowest_blocking_layer() {
        let t = Tracer::new(1.0, 800);
        let mut g = Grid::new(6, 3, 3).unwrap();
        g.set(ivec3(4, 2, 1), Cell::Solid).unwrap();
        let hit = t.trace(dvec2(0.5, 1.5), 0.0, &g);
        assert_eq!(hit.cell, ivec3(4, 2, 1));
        assert!((hit.distance - 3.5).abs() < 1e-12);

        let flat = t.trace(dvec2(0.5, 1.5), 0.0, &FloorPlan::from_grid(&g));
        assert_eq!(flat.cell, ivec3(4, 0, 1));
        assert_eq!(flat.distance, hit.distance);
    }

    #[test]
    fn voxel_hit_reports_entry_face() {
        let t = Tracer::new(1.0, 100);
        let mut g = Grid::new(4, 4, 4).unwrap();
        g.set(ivec3(2, 0, 1), Cell::Solid).unwrap();

        // looking straight down onto the block
        let hit = t
            .trace_voxel(dvec3(2.5, 3.5, 1.5), dvec3(0.0, -1.0, 0.0), &g)
            .unwrap();
        assert_eq!(hit.cell, ivec3(2, 0, 1));
        assert_eq!(hit.normal, ivec3(0, 1, 0));
        assert_eq!(hit.adjacent(), ivec3(2, 1, 1));
        assert!((hit.distance - 2.5).abs() < 1e-12);

        // from -x side
        let hit = t
            .trace_voxel(dvec3(0.2, 0.5, 1.5), dvec3(1.0, 0.0, 0.0), &g)
            .unwrap();
        assert_eq!(hit.normal, ivec3(-1, 0, 0));
        assert!((hit.distance - 1.8).abs() < 1e-12);
    }

    #[test]
    fn voxel_ray_can_enter_from_outside_and_miss() {
        let t = Tracer::new(1.0, 100);
        let mut g = Grid::new(4, 4, 4).unwrap();
        g.set(ivec3(1, 1, 1), Cell::Solid).unwrap();

        let hit = t.trace_voxel(dvec3(1.5, 10.0, 1.5), dvec3(0.0, -1.0, 0.0), &g);
        assert_eq!(hit.map(|h| h.cell), Some(ivec3(1, 1, 1)));

        // flying away from the grid
        assert_eq!(
            t.trace_voxel(dvec3(1.5, 10.0, 1.5), dvec3(0.0, 1.0, 0.0), &g),
            None
        );
        // through empty space and out the far side
        assert_eq!(
            t.trace_voxel(dvec3(3.5, 2.5, 0.5), dvec3(0.0, 0.0, 1.0), &g),
            None
        );
        // zero direction
        assert_eq!(t.trace_voxel(dvec3(0.5, 0.5, 0.5), DVec3::ZERO, &g), None);
    }
}
