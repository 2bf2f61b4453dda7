use glam::DVec2;

/// Map-plane position `(x, z)`, world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub DVec2);

/// Heading in radians, same convention as the camera yaw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle(pub f64);

/// Edge length of the square billboard, world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSize(pub f64);
