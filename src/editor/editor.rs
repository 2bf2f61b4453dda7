// Level editor state: entity registry, active tool, hover/pick and the
// queue of grid edits applied between frames.

use std::collections::HashMap;

use glam::{DMat4, DVec3, IVec3};
use thiserror::Error;

use super::{
    camera::EditorCamera,
    mesh::{Mesh, Transform, UNIT_CUBE},
    pick::{PickHit, Pickable, Ray, intersect},
    tools::Tool,
};
use crate::{
    Settings,
    engine::{Screen, Tracer},
    sim::{Buttons, InputSnapshot},
    world::{Cell, Grid, GridError},
};

/// Snap spacings cycled with the grid key, in tiles.
pub const GRID_SIZES: [i32; 4] = [1, 2, 4, 8];
/// Size of a freshly created editing grid.
pub const EDITOR_DIMS: (usize, usize, usize) = (32, 8, 32);
/// Starting height of the fly camera, tiles.
pub const CAMERA_HEIGHT: f64 = 10.0;

/// Handle into the editor's entity registry. Slots are reused; the
/// generation makes a handle to a despawned entity stop resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

#[derive(Clone, Copy, Debug)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Block,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    /// Grid tile the entity stands for.
    pub cell: IVec3,
    pub transform: Transform,
}

impl Pickable for Entity {
    fn mesh(&self) -> &Mesh {
        match self.kind {
            EntityKind::Block => &UNIT_CUBE,
        }
    }

    fn model(&self) -> DMat4 {
        self.transform.model()
    }
}

/// Grid mutation waiting for [`Editor::apply_pending`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditCommand {
    Place(IVec3),
    Clear(IVec3),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("entity {0:?} not found")]
    EntityNotFound(EntityId),

    #[error(transparent)]
    Grid(#[from] GridError),
}

pub struct Editor {
    pub camera: EditorCamera,
    tool: Tool,
    tile_size: f64,
    tracer: Tracer,

    entities: Vec<Slot>,
    free: Vec<u32>,
    by_cell: HashMap<IVec3, EntityId>,
    selected: Option<EntityId>,
    placement: Option<IVec3>,
    pending: Vec<EditCommand>,

    grid_index: usize,
    pub show_grid: bool,
    pub show_tooltips: bool,
    /// Draw the column view from the editor camera.
    pub raster_view: bool,
}

impl Editor {
    /// Editor over `grid`, with one block entity per solid tile.
    pub fn new(grid: &Grid, settings: &Settings) -> Self {
        let (w, h, d) = grid.dims();
        let mut ed = Self {
            camera: EditorCamera::over(w, d, settings.tile_size, CAMERA_HEIGHT * settings.tile_size),
            tool: Tool::default(),
            tile_size: settings.tile_size,
            tracer: Tracer::new(settings.tile_size, settings.max_steps),
            entities: Vec::new(),
            free: Vec::new(),
            by_cell: HashMap::new(),
            selected: None,
            placement: None,
            pending: Vec::new(),
            grid_index: 0,
            show_grid: true,
            show_tooltips: true,
            raster_view: true,
        };
        for z in 0..d as i32 {
            for y in 0..h as i32 {
                for x in 0..w as i32 {
                    let c = IVec3::new(x, y, z);
                    if grid.is_solid(c) {
                        ed.spawn(c);
                    }
                }
            }
        }
        tracing::debug!(blocks = ed.len(), "editor ready");
        ed
    }

    /*──────────────────────── accessors ──────────────────────*/

    #[inline]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if tool != self.tool {
            tracing::debug!(tool = tool.label(), "tool");
            self.tool = tool;
        }
    }

    #[inline]
    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    /// Empty tile a click with [`Tool::Place`] would fill.
    #[inline]
    pub fn placement(&self) -> Option<IVec3> {
        self.placement
    }

    #[inline]
    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    #[inline]
    pub fn grid_size(&self) -> i32 {
        GRID_SIZES[self.grid_index]
    }

    #[inline]
    pub fn pending(&self) -> &[EditCommand] {
        &self.pending
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let slot = self.entities.get(id.index())?;
        (slot.generation == id.generation)
            .then_some(slot.entity.as_ref())
            .flatten()
    }

    pub fn entity_at(&self, cell: IVec3) -> Option<EntityId> {
        self.by_cell.get(&cell).copied()
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.entities
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                let id = EntityId {
                    index: i as u32,
                    generation: slot.generation,
                };
                Some((id, slot.entity.as_ref()?))
            })
    }

    pub fn len(&self) -> usize {
        self.by_cell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_cell.is_empty()
    }

    /*──────────────────────── registry ──────────────────────*/

    fn spawn(&mut self, cell: IVec3) -> EntityId {
        let centre = (cell.as_dvec3() + DVec3::splat(0.5)) * self.tile_size;
        let transform = Transform {
            translation: centre,
            scale: DVec3::splat(self.tile_size),
            ..Default::default()
        };
        let entity = Some(Entity {
            kind: EntityKind::Block,
            cell,
            transform,
        });
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.entities[index as usize];
                slot.entity = entity;
                EntityId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.entities.push(Slot {
                    generation: 0,
                    entity,
                });
                EntityId {
                    index: (self.entities.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        self.by_cell.insert(cell, id);
        id
    }

    fn despawn(&mut self, id: EntityId) -> Result<Entity, EditError> {
        let slot = self
            .entities
            .get_mut(id.index())
            .filter(|s| s.generation == id.generation)
            .ok_or(EditError::EntityNotFound(id))?;
        let e = slot.entity.take().ok_or(EditError::EntityNotFound(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.by_cell.remove(&e.cell);
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(e)
    }

    /*──────────────────────── per frame ──────────────────────*/

    /// One editor frame: toggles, camera, hover and click.
    pub fn update(&mut self, dt: f64, input: &InputSnapshot, grid: &Grid, screen: &Screen) {
        self.handle_keys(input);
        self.camera.update(dt, input);

        let ray = self.camera.ray_from_mouse(input.mouse_pos, screen);
        self.hover(&ray, grid);
        if input.pressed(Buttons::PRIMARY) {
            self.click(&ray, grid);
        }
    }

    pub fn handle_keys(&mut self, input: &InputSnapshot) {
        if let Some(tool) = input.tool_slot().and_then(Tool::from_slot) {
            self.set_tool(tool);
        }
        if input.pressed(Buttons::SECONDARY) {
            self.selected = None;
        }
        if input.pressed(Buttons::CYCLE_GRID) {
            self.grid_index = (self.grid_index + 1) % GRID_SIZES.len();
            tracing::debug!(size = self.grid_size(), "grid snap");
        }
        if input.pressed(Buttons::TOGGLE_GRID) {
            self.show_grid = !self.show_grid;
        }
        if input.pressed(Buttons::TOGGLE_TOOLTIPS) {
            self.show_tooltips = !self.show_tooltips;
        }
        if input.pressed(Buttons::TOGGLE_RASTER) {
            self.raster_view = !self.raster_view;
        }
    }

    /// Nearest entity under `ray`; selects it, or clears the selection.
    pub fn pick(&mut self, ray: &Ray) -> Option<PickHit<EntityId>> {
        let nearest = intersect(ray, self.entities()).first().copied();
        self.selected = nearest.map(|h| h.object);
        nearest
    }

    /// Recompute [`Self::placement`]: the empty tile against the face of the
    /// block under the ray, else the floor tile under it snapped to the
    /// grid size. Never a solid or out-of-range tile.
    pub fn hover(&mut self, ray: &Ray, grid: &Grid) -> Option<IVec3> {
        let target = match self.tracer.trace_voxel(ray.origin, ray.dir, grid) {
            Some(hit) if hit.normal != IVec3::ZERO => Some(hit.adjacent()),
            Some(_) => None,
            None => self.floor_cell(ray).map(|c| self.snap(c)),
        };
        self.placement = target.filter(|&c| grid.contains(c) && !grid.is_solid(c));
        self.placement
    }

    /// Apply the active tool at `ray`, queueing any grid edit.
    pub fn click(&mut self, ray: &Ray, grid: &Grid) -> Option<EditCommand> {
        let cmd = match self.tool {
            Tool::Place => EditCommand::Place(self.hover(ray, grid)?),
            Tool::Delete => {
                let hit = self.pick(ray)?;
                let cell = self.get(hit.object)?.cell;
                self.selected = None;
                EditCommand::Clear(cell)
            }
            Tool::Translate | Tool::Rotate | Tool::Scale => {
                self.pick(ray);
                return None;
            }
        };
        tracing::debug!(?cmd, "queued");
        self.pending.push(cmd);
        Some(cmd)
    }

    /// Drain the edit queue into `grid`. Returns how many tiles changed.
    pub fn apply_pending(&mut self, grid: &mut Grid) -> Result<usize, EditError> {
        let mut changed = 0;
        for cmd in std::mem::take(&mut self.pending) {
            changed += self.apply(cmd, grid)? as usize;
        }
        if changed > 0 {
            tracing::debug!(changed, solid = grid.solid_count(), "edits applied");
        }
        Ok(changed)
    }

    fn apply(&mut self, cmd: EditCommand, grid: &mut Grid) -> Result<bool, EditError> {
        match cmd {
            EditCommand::Place(c) => {
                if grid.set(c, Cell::Solid)?.is_solid() {
                    return Ok(false);
                }
                self.spawn(c);
                Ok(true)
            }
            EditCommand::Clear(c) => {
                let was = grid.set(c, Cell::Empty)?;
                if let Some(id) = self.entity_at(c) {
                    self.despawn(id)?;
                }
                Ok(was.is_solid())
            }
        }
    }

    /*──────────────────────── helpers ──────────────────────*/

    fn floor_cell(&self, ray: &Ray) -> Option<IVec3> {
        if ray.dir.y >= 0.0 || ray.origin.y <= 0.0 {
            return None;
        }
        let p = ray.at(-ray.origin.y / ray.dir.y);
        let c = Grid::cell_at(p, self.tile_size);
        Some(IVec3::new(c.x, 0, c.z))
    }

    fn snap(&self, c: IVec3) -> IVec3 {
        let s = self.grid_size();
        IVec3::new(c.x - c.x.rem_euclid(s), c.y, c.z - c.z.rem_euclid(s))
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::{dvec3, ivec3};

    fn setup() -> (Grid, Editor) {
        let s = Settings::default();
        let (w, h, d) = EDITOR_DIMS;
        let grid = Grid::new(w, h, d).unwrap();
        let ed = Editor::new(&grid, &s);
        (grid, ed)
    }

    fn down_at(x: f64, z: f64) -> Ray {
        Ray::new(dvec3(x, 20.0, z), DVec3::NEG_Y)
    }

    fn press(b: Buttons) -> InputSnapshot {
        InputSnapshot {
            held: b,
            pressed: b,
            ..Default::default()
        }
    }

    #[test]
    fn entities_mirror_solid_tiles() {
        let grid = Grid::walled_room(4, 2, 4).unwrap();
        let ed = Editor::new(&grid, &Settings::default());
        assert_eq!(ed.len(), grid.solid_count());
        let id = ed.entity_at(ivec3(0, 1, 0)).unwrap();
        assert_eq!(ed.get(id).unwrap().transform.translation, dvec3(0.5, 1.5, 0.5));
    }

    #[test]
    fn place_then_stack_then_delete() {
        let (mut grid, mut ed) = setup();
        assert_eq!(ed.tool(), Tool::Place);

        // nothing solid yet: the floor tile under the ray
        let cmd = ed.click(&down_at(3.3, 4.6), &grid);
        assert_eq!(cmd, Some(EditCommand::Place(ivec3(3, 0, 4))));
        assert!(!grid.is_solid(ivec3(3, 0, 4)), "queued, not applied");
        assert_eq!(ed.apply_pending(&mut grid), Ok(1));
        assert!(grid.is_solid(ivec3(3, 0, 4)));
        assert_eq!(ed.len(), 1);

        // now the ray lands on top of that block
        ed.click(&down_at(3.3, 4.6), &grid);
        ed.apply_pending(&mut grid).unwrap();
        assert!(grid.is_solid(ivec3(3, 1, 4)));

        ed.set_tool(Tool::Delete);
        assert_eq!(
            ed.click(&down_at(3.3, 4.6), &grid),
            Some(EditCommand::Clear(ivec3(3, 1, 4)))
        );
        assert_eq!(ed.apply_pending(&mut grid), Ok(1));
        assert!(!grid.is_solid(ivec3(3, 1, 4)));
        assert_eq!(ed.len(), 1);
        assert!(ed.pending().is_empty());
    }

    #[test]
    fn pick_selects_nearest_or_clears() {
        let (mut grid, mut ed) = setup();
        grid.set(ivec3(5, 0, 5), Cell::Solid).unwrap();
        grid.set(ivec3(5, 2, 5), Cell::Solid).unwrap();
        let mut ed2 = Editor::new(&grid, &Settings::default());

        let hit = ed2.pick(&down_at(5.3, 5.6)).unwrap();
        assert_eq!(ed2.selected(), Some(hit.object));
        assert_eq!(ed2.get(hit.object).unwrap().cell, ivec3(5, 2, 5));
        assert!((hit.distance - 17.0).abs() < 1e-9);

        assert_eq!(ed2.pick(&down_at(10.5, 10.5)), None);
        assert_eq!(ed2.selected(), None);
        assert_eq!(ed.pick(&down_at(5.3, 5.6)), None);
    }

    #[test]
    fn other_tools_only_select() {
        let mut grid = Grid::new(8, 4, 8).unwrap();
        grid.set(ivec3(2, 0, 2), Cell::Solid).unwrap();
        let mut ed = Editor::new(&grid, &Settings::default());
        ed.set_tool(Tool::Translate);
        assert_eq!(ed.click(&down_at(2.3, 2.6), &grid), None);
        assert!(ed.selected().is_some());
        assert!(ed.pending().is_empty());
    }

    #[test]
    fn placement_snaps_and_stays_in_bounds() {
        let (grid, mut ed) = setup();
        ed.handle_keys(&press(Buttons::CYCLE_GRID));
        ed.handle_keys(&press(Buttons::CYCLE_GRID));
        assert_eq!(ed.grid_size(), 4);
        assert_eq!(ed.hover(&down_at(7.5, 9.5), &grid), Some(ivec3(4, 0, 8)));

        // off the edge of the floor
        assert_eq!(ed.hover(&down_at(-3.5, 2.5), &grid), None);
        // looking up at nothing
        assert_eq!(ed.hover(&Ray::new(dvec3(1.0, 1.0, 1.0), DVec3::Y), &grid), None);

        for _ in 0..2 {
            ed.handle_keys(&press(Buttons::CYCLE_GRID));
        }
        assert_eq!(ed.grid_size(), 1);
    }

    #[test]
    fn face_placement_ignores_the_snap() {
        let mut grid = Grid::new(8, 4, 8).unwrap();
        grid.set(ivec3(2, 0, 2), Cell::Solid).unwrap();
        let mut ed = Editor::new(&grid, &Settings::default());
        ed.handle_keys(&press(Buttons::CYCLE_GRID));
        assert_eq!(ed.grid_size(), 2);

        let side = Ray::new(dvec3(5.0, 0.5, 2.5), DVec3::NEG_X);
        assert_eq!(ed.hover(&side, &grid), Some(ivec3(3, 0, 2)));
        assert_eq!(
            ed.click(&side, &grid),
            Some(EditCommand::Place(ivec3(3, 0, 2)))
        );
        assert_eq!(ed.apply_pending(&mut grid), Ok(1));
        assert!(grid.is_solid(ivec3(3, 0, 2)));
    }

    #[test]
    fn snapped_floor_tile_on_a_block_is_rejected() {
        let mut grid = Grid::new(16, 4, 16).unwrap();
        grid.set(ivec3(4, 0, 8), Cell::Solid).unwrap();
        let mut ed = Editor::new(&grid, &Settings::default());
        ed.handle_keys(&press(Buttons::CYCLE_GRID));
        ed.handle_keys(&press(Buttons::CYCLE_GRID));
        assert_eq!(ed.grid_size(), 4);
        assert_eq!(ed.hover(&down_at(7.5, 9.5), &grid), None);
        assert_eq!(ed.click(&down_at(7.5, 9.5), &grid), None);
        assert!(ed.pending().is_empty());
    }

    #[test]
    fn tool_hotkeys_and_deselect_come_from_the_snapshot() {
        let mut grid = Grid::new(8, 4, 8).unwrap();
        grid.set(ivec3(2, 0, 2), Cell::Solid).unwrap();
        let mut ed = Editor::new(&grid, &Settings::default());

        ed.handle_keys(&press(Buttons::TOOL_2));
        assert_eq!(ed.tool(), Tool::Delete);
        ed.handle_keys(&press(Buttons::TOOL_3));
        assert_eq!(ed.tool(), Tool::Translate);

        ed.click(&down_at(2.3, 2.6), &grid);
        assert!(ed.selected().is_some());
        ed.handle_keys(&press(Buttons::SECONDARY));
        assert_eq!(ed.selected(), None);
    }

    #[test]
    fn freed_slots_are_reused_and_stale_ids_go_dead() {
        let (mut grid, mut ed) = setup();
        let cell = ivec3(3, 0, 4);
        let first = ed.spawn(cell);
        grid.set(cell, Cell::Solid).unwrap();
        for _ in 0..100 {
            ed.pending.push(EditCommand::Clear(cell));
            ed.pending.push(EditCommand::Place(cell));
            ed.apply_pending(&mut grid).unwrap();
        }
        assert_eq!(ed.entities.len(), 1);
        assert_eq!(ed.len(), 1);
        let now = ed.entity_at(cell).unwrap();
        assert_eq!(now.index(), first.index());
        assert_ne!(now, first);
        assert_eq!(ed.get(first), None);
        assert_eq!(ed.get(now).unwrap().cell, cell);
        assert_eq!(ed.despawn(first), Err(EditError::EntityNotFound(first)));
    }

    #[test]
    fn toggles_flip() {
        let (_, mut ed) = setup();
        assert!(ed.show_grid && ed.show_tooltips && ed.raster_view);
        ed.handle_keys(&press(
            Buttons::TOGGLE_GRID | Buttons::TOGGLE_TOOLTIPS | Buttons::TOGGLE_RASTER,
        ));
        assert!(!ed.show_grid && !ed.show_tooltips && !ed.raster_view);
    }

    #[test]
    fn clearing_an_out_of_range_cell_is_an_error() {
        let (mut grid, mut ed) = setup();
        ed.pending.push(EditCommand::Clear(ivec3(99, 0, 0)));
        assert_eq!(
            ed.apply_pending(&mut grid),
            Err(EditError::Grid(GridError::OutOfBounds(ivec3(99, 0, 0))))
        );
    }
}
