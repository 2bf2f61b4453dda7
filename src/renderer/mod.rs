//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! The frame loop produces a list of [`DrawCall`]s (backdrop first, then
//! wall columns, sprites far-to-near, then editor wireframe lines and
//! overlay panels) and hands them to a type that implements [`Renderer`].
//!
//! * You can plug multiple back-ends without changing game logic.
//! * A helper blanket-impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.

use glam::IVec3;

use crate::engine::types::HitSide;

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// One wall strip, `x .. x + width` on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSlice {
    pub x: usize,
    pub width: usize,
    /* clipped vertical extent */
    pub top: f64,
    pub bottom: f64,
    /// Unclipped slice height in pixels.
    pub height: f64,
    /// Perpendicular (fisheye-corrected) distance, world units.
    pub distance: f64,
    pub side: HitSide,
    pub cell: IVec3,
    pub hit_fraction: f64,
}

/// Camera-facing billboard for an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteSpan {
    pub center_x: f64,
    pub half_w: f64,
    pub top: f64,
    pub bottom: f64,
    /// Depth along the camera's forward axis.
    pub depth: f64,
    /// Which of the 8 sprite-sheet rows faces the viewer.
    pub facing: u8,
}

/// Flat screen-space rectangle for menus and the editor HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Panel {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
    pub color: Rgba,
}

/// Screen-space segment in pixels; endpoints may lie off screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub color: Rgba,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCall {
    /// Sky above `horizon`, floor below.
    Backdrop { horizon: f64 },
    Column(ColumnSlice),
    Sprite(SpriteSpan),
    /// One pixel wide, ignoring depth.
    Line(Line),
    /// Drawn over everything before it, ignoring depth.
    Panel(Panel),
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager;
/// GPU back-ends can ignore the slice because they never allocate it.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    fn draw_backdrop(&mut self, horizon: f64);

    /// Rasterise one wall strip and record its depth for sprite clipping.
    fn draw_column(&mut self, column: &ColumnSlice);

    /// Rasterise one sprite, hidden wherever a nearer wall was drawn.
    fn draw_sprite(&mut self, sprite: &SpriteSpan);

    /// Clip to the screen and plot a one-pixel line.
    fn draw_line(&mut self, line: &Line);

    fn draw_panel(&mut self, panel: &Panel);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(&mut self, width: usize, height: usize, calls: &[DrawCall], submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        for c in calls {
            match c {
                DrawCall::Backdrop { horizon } => self.draw_backdrop(*horizon),
                DrawCall::Column(col) => self.draw_column(col),
                DrawCall::Sprite(s) => self.draw_sprite(s),
                DrawCall::Line(l) => self.draw_line(l),
                DrawCall::Panel(p) => self.draw_panel(p),
            }
        }
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod overlay;
pub mod software;

pub use software::Software;
