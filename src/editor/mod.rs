//! 3-D level editor: fly camera, mesh picking, queued grid edits and the
//! wireframe viewport overlay.

mod camera;
mod editor;
mod mesh;
mod pick;
mod tools;
mod view;

pub use camera::EditorCamera;
pub use editor::{
    CAMERA_HEIGHT, EDITOR_DIMS, EditCommand, EditError, Editor, Entity, EntityId, EntityKind,
    GRID_SIZES,
};
pub use mesh::{Mesh, Transform, UNIT_CUBE};
pub use pick::{MIN_T, PARALLEL_EPS, PickHit, Pickable, Ray, intersect, intersect_triangle};
pub use tools::{TOOLS, Tool, ToolInfo};
pub use view::{GRID_LINE, HIGHLIGHT, HIGHLIGHT_PAD, PREVIEW, Viewport};
