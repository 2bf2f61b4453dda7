use tracing::trace;

use crate::{
    Settings,
    engine::{
        dda::Tracer,
        projection::{Projection, Projector},
        types::Screen,
    },
    renderer::{ColumnSlice, DrawCall, SpriteSpan},
    world::{Camera, ColumnMap},
};

/// Per-frame driver: one ray per screen column batch, traced and projected.
///
/// Columns share nothing but the read-only map, so each one is computed
/// independently of the others.
pub struct FrameRenderer {
    pub tracer: Tracer,
    pub projector: Projector,
    num_rays: usize,
    column_width: usize,
    columns: Vec<ColumnSlice>,
    calls: Vec<DrawCall>,
}

impl FrameRenderer {
    pub fn new(settings: &Settings) -> Self {
        let num_rays = settings.num_rays();
        Self {
            tracer: Tracer::new(settings.tile_size, settings.max_steps),
            projector: Projector::new(
                settings.tile_size,
                Screen::new(settings.width, settings.height),
            ),
            num_rays,
            column_width: settings.column_width,
            columns: Vec::with_capacity(num_rays),
            calls: Vec::with_capacity(num_rays + 1),
        }
    }

    #[inline]
    pub fn num_rays(&self) -> usize {
        self.num_rays
    }

    #[inline]
    pub fn screen(&self) -> &Screen {
        self.projector.screen()
    }

    /// Trace and project ray `i`.
    pub fn column<M: ColumnMap + ?Sized>(
        &self,
        cam: &Camera,
        map: &M,
        i: usize,
        horizon: f64,
    ) -> ColumnSlice {
        let ray_angle = cam.ray_angle(i, self.num_rays);
        let hit = self.tracer.trace(cam.plane_pos(), ray_angle, map);
        let Projection { height, .. } = self.projector.project(hit.distance, ray_angle, cam.yaw());
        let (top, bottom) = self.projector.extent(height, horizon);
        trace!(i, ray_angle, distance = hit.distance, side = ?hit.side, "column");

        ColumnSlice {
            x: i * self.column_width,
            width: self.column_width,
            top,
            bottom,
            height,
            distance: Projector::correct(hit.distance, ray_angle, cam.yaw()),
            side: hit.side,
            cell: hit.cell,
            hit_fraction: hit.hit_fraction,
        }
    }

    /// Cast every column for this frame. The slice is valid until the next call.
    pub fn cast<M: ColumnMap + ?Sized>(&mut self, cam: &Camera, map: &M) -> &[ColumnSlice] {
        let _span = tracing::trace_span!("cast", rays = self.num_rays).entered();
        let horizon = cam.horizon(self.projector.screen());
        self.columns.clear();
        for i in 0..self.num_rays {
            let c = self.column(cam, map, i, horizon);
            self.columns.push(c);
        }
        &self.columns
    }

    /// Full draw list: backdrop, every wall column, then `sprites` in the
    /// order given (callers pass them far-to-near).
    pub fn draw_calls<M, I>(&mut self, cam: &Camera, map: &M, sprites: I) -> &[DrawCall]
    where
        M: ColumnMap + ?Sized,
        I: IntoIterator<Item = SpriteSpan>,
    {
        let horizon = cam.horizon(self.projector.screen());
        self.cast(cam, map);
        self.calls.clear();
        self.calls.push(DrawCall::Backdrop { horizon });
        self.calls
            .extend(self.columns.iter().copied().map(DrawCall::Column));
        self.calls.extend(sprites.into_iter().map(DrawCall::Sprite));
        &self.calls
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
