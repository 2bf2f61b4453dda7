/// Constants that depend on the *frame-buffer*, not on the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
    pub half_h: f64, // pre-derived for speed
    pub half_w: f64, // pre-derived for speed
}

impl Screen {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            half_h: h as f64 * 0.5,
            half_w: w as f64 * 0.5,
        }
    }
}

/// Which kind of grid line a ray crossed to reach its hit.
///
/// `Vertical` = an x boundary, `Horizontal` = a z boundary. Shading keys
/// off this to tell the two wall orientations apart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HitSide {
    Vertical,
    Horizontal,
    /// Step budget ran out before anything solid was found.
    #[default]
    None,
}
