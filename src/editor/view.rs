// Wireframe overlay for the editor viewport: floor grid, placement preview
// and selection highlight, projected through the fly camera.

use glam::{DMat4, DVec3, DVec4};

use super::{camera::EditorCamera, editor::Editor};
use crate::{
    engine::Screen,
    renderer::{DrawCall, Line, Rgba},
    world::Grid,
};

pub const GRID_LINE: Rgba = 0x00_4D_4D_4D;
pub const PREVIEW: Rgba = 0x00_00_FF_00;
pub const HIGHLIGHT: Rgba = 0x00_FF_FF_00;
/// How far the highlight box stands off the unit cube, model units.
pub const HIGHLIGHT_PAD: f64 = 0.05;

/* corner i has x = bit 0, y = bit 1, z = bit 2 */
const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (2, 3),
    (4, 5),
    (6, 7),
    (0, 2),
    (1, 3),
    (4, 6),
    (5, 7),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

fn box_corners(lo: DVec3, hi: DVec3) -> [DVec3; 8] {
    std::array::from_fn(|i| {
        DVec3::new(
            if i & 1 == 0 { lo.x } else { hi.x },
            if i & 2 == 0 { lo.y } else { hi.y },
            if i & 4 == 0 { lo.z } else { hi.z },
        )
    })
}

/// World → pixel mapping for one frame of the editor camera.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    view_proj: DMat4,
    screen: Screen,
}

impl Viewport {
    pub fn new(camera: &EditorCamera, screen: &Screen) -> Self {
        Self {
            view_proj: camera.projection(screen) * camera.view(),
            screen: *screen,
        }
    }

    /// Project `a → b`, cut at the near plane. `None` when all of it is
    /// behind the camera.
    pub fn segment(&self, a: DVec3, b: DVec3, color: Rgba) -> Option<Line> {
        let mut ca = self.view_proj * a.extend(1.0);
        let mut cb = self.view_proj * b.extend(1.0);
        // GL clip space: in front of the near plane when z >= -w
        let (da, db) = (ca.z + ca.w, cb.z + cb.w);
        if da < 0.0 && db < 0.0 {
            return None;
        }
        if da < 0.0 {
            ca = ca.lerp(cb, da / (da - db));
        } else if db < 0.0 {
            cb = cb.lerp(ca, db / (db - da));
        }
        let (x0, y0) = self.to_pixel(ca);
        let (x1, y1) = self.to_pixel(cb);
        Some(Line {
            x0,
            y0,
            x1,
            y1,
            color,
        })
    }

    #[inline]
    fn to_pixel(&self, clip: DVec4) -> (f64, f64) {
        let ndc = clip.truncate() / clip.w;
        (
            (ndc.x + 1.0) * self.screen.half_w,
            (1.0 - ndc.y) * self.screen.half_h,
        )
    }

    fn wire_box(&self, corners: [DVec3; 8], color: Rgba, out: &mut Vec<DrawCall>) {
        out.extend(
            BOX_EDGES
                .iter()
                .filter_map(|&(a, b)| self.segment(corners[a], corners[b], color))
                .map(DrawCall::Line),
        );
    }
}

impl Editor {
    /// Wireframe draw calls for this frame: the floor grid at the current
    /// snap spacing (when shown), the placement tile and the selected block.
    pub fn overlay(&self, grid: &Grid, screen: &Screen, out: &mut Vec<DrawCall>) {
        let vp = Viewport::new(&self.camera, screen);
        let tile = self.tile_size();

        if self.show_grid {
            let (w, _, d) = grid.dims();
            let step = self.grid_size() as usize;
            let (wx, dz) = (w as f64 * tile, d as f64 * tile);
            let xs = (0..=w).step_by(step).map(|x| {
                let x = x as f64 * tile;
                (DVec3::new(x, 0.0, 0.0), DVec3::new(x, 0.0, dz))
            });
            let zs = (0..=d).step_by(step).map(|z| {
                let z = z as f64 * tile;
                (DVec3::new(0.0, 0.0, z), DVec3::new(wx, 0.0, z))
            });
            out.extend(
                xs.chain(zs)
                    .filter_map(|(a, b)| vp.segment(a, b, GRID_LINE))
                    .map(DrawCall::Line),
            );
        }

        if let Some(c) = self.placement() {
            let lo = c.as_dvec3() * tile;
            vp.wire_box(box_corners(lo, lo + DVec3::splat(tile)), PREVIEW, out);
        }

        if let Some(e) = self.selected().and_then(|id| self.get(id)) {
            let model = e.transform.model();
            let r = 0.5 + HIGHLIGHT_PAD;
            let corners =
                box_corners(DVec3::splat(-r), DVec3::splat(r)).map(|p| model.transform_point3(p));
            vp.wire_box(corners, HIGHLIGHT, out);
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
