use super::{ColumnSlice, Line, Panel, Renderer, Rgba, SpriteSpan};
use crate::engine::types::HitSide;

/* flat colours, 0x00RRGGBB */
pub const SKY: Rgba = 0x00_80_B3_FF;
pub const FLOOR: Rgba = 0x00_3A_3A_3A;
pub const WALL_X: Rgba = 0x00_CC_CC_CC; // faces crossed on an x line
pub const WALL_Z: Rgba = 0x00_8F_8F_8F; // faces crossed on a z line
pub const ENEMY: Rgba = 0x00_B0_30_30;

/// CPU rasteriser writing into an owned 0x00RRGGBB buffer.
#[derive(Default)]
pub struct Software {
    pub scratch: Vec<Rgba>,
    /// Perpendicular wall distance per screen column, for sprite clipping.
    pub depth: Vec<f64>,
    pub width: usize,
    pub height: usize,
}

impl Software {
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.scratch[y * self.width + x]
    }

    fn fill_rect(&mut self, x0: usize, x1: usize, y0: usize, y1: usize, col: Rgba) {
        for y in y0..y1 {
            let row = y * self.width;
            self.scratch[row + x0..row + x1].fill(col);
        }
    }

    /// Clip a float row span to whole screen rows.
    #[inline]
    fn rows(&self, top: f64, bottom: f64) -> (usize, usize) {
        let h = self.height as f64;
        let y0 = top.clamp(0.0, h) as usize;
        let y1 = bottom.ceil().clamp(0.0, h) as usize;
        (y0, y1.max(y0))
    }

    /// Liang–Barsky clip of `l` to the pixel grid, rounded to whole pixels.
    fn clip(&self, l: &Line) -> Option<(i32, i32, i32, i32)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        if ![l.x0, l.y0, l.x1, l.y1].iter().all(|v| v.is_finite()) {
            return None;
        }
        let (xmax, ymax) = ((self.width - 1) as f64, (self.height - 1) as f64);
        let (dx, dy) = (l.x1 - l.x0, l.y1 - l.y0);
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in [(-dx, l.x0), (dx, xmax - l.x0), (-dy, l.y0), (dy, ymax - l.y0)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
        let at = |t: f64| ((l.x0 + t * dx).round() as i32, (l.y0 + t * dy).round() as i32);
        let ((x0, y0), (x1, y1)) = (at(t0), at(t1));
        Some((x0, y0, x1, y1))
    }
}

impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
            self.depth.resize(w, f64::INFINITY);
        }
        self.scratch.fill(0);
        self.depth.fill(f64::INFINITY);
    }

    fn draw_backdrop(&mut self, horizon: f64) {
        let split = horizon.clamp(0.0, self.height as f64) as usize;
        self.fill_rect(0, self.width, 0, split, SKY);
        self.fill_rect(0, self.width, split, self.height, FLOOR);
    }

    fn draw_column(&mut self, c: &ColumnSlice) {
        // nothing within reach: leave the backdrop showing
        let col = match c.side {
            HitSide::Vertical => WALL_X,
            HitSide::Horizontal => WALL_Z,
            HitSide::None => return,
        };
        let x0 = c.x.min(self.width);
        let x1 = (c.x + c.width).min(self.width);
        let (y0, y1) = self.rows(c.top, c.bottom);
        self.fill_rect(x0, x1, y0, y1, col);
        for d in &mut self.depth[x0..x1] {
            *d = d.min(c.distance);
        }
    }

    fn draw_sprite(&mut self, s: &SpriteSpan) {
        let w = self.width as f64;
        let x0 = (s.center_x - s.half_w).clamp(0.0, w) as usize;
        let x1 = (s.center_x + s.half_w).ceil().clamp(0.0, w) as usize;
        let (y0, y1) = self.rows(s.top, s.bottom);
        for x in x0..x1 {
            if self.depth[x] < s.depth {
                continue;
            }
            for y in y0..y1 {
                self.scratch[y * self.width + x] = ENEMY;
            }
        }
    }

    fn draw_line(&mut self, l: &Line) {
        let Some((mut x0, mut y0, x1, y1)) = self.clip(l) else {
            return;
        };
        let (w, h) = (self.width as i32, self.height as i32);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if (0..w).contains(&x0) && (0..h).contains(&y0) {
                self.scratch[y0 as usize * self.width + x0 as usize] = l.color;
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn draw_panel(&mut self, p: &Panel) {
        let x0 = p.x.min(self.width);
        let x1 = p.x.saturating_add(p.w).min(self.width);
        let y0 = p.y.min(self.height);
        let y1 = p.y.saturating_add(p.h).min(self.height);
        self.fill_rect(x0, x1, y0, y1, p.color);
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
