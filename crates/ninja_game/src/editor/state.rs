//! Level editor state machine, independent of windowing and widgets.
//!
//! The screen feeds pointer events in world coordinates together with a flag
//! saying whether the pointer is over the widget panel. The panel edits
//! [`EditorParams`] and the mode fields directly and calls
//! [`LevelEditor::apply_params`] when a value changed, so widget edits land
//! between frames and never inside a physics step.

use std::path::Path;

use ben_core::ColorRGBA8;
use ben_render::Camera;
use glam::{Vec2, Vec4};

use crate::entities::{BoxDef, Light, PlayerDef};
use crate::level::Level;
use crate::level_io;
use crate::physics::PhysicsWorld;

pub const PLAYER_DRAW_DIMS: Vec2 = Vec2::new(2.0, 2.0);
pub const PLAYER_COLLISION_DIMS: Vec2 = Vec2::new(1.0, 1.8);

const MIN_ZOOM: f32 = 2.0;
const MAX_ZOOM: f32 = 100.0;
const ZOOM_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    Select,
    #[default]
    Place,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectMode {
    #[default]
    Player,
    Platform,
    Light,
    /// Selectable, places nothing.
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhysicsMode {
    #[default]
    Rigid,
    Dynamic,
}

/// At most one entity is selected; indices refer to the level's vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Box(usize),
    Light(usize),
}

/// Values mirrored from the widget panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorParams {
    /// Channels in 0..=255, as the sliders report them.
    pub color: [f32; 4],
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    pub light_size: f32,
}

impl Default for EditorParams {
    fn default() -> Self {
        Self {
            color: [255.0; 4],
            rotation: 0.0,
            width: 1.0,
            height: 1.0,
            light_size: 10.0,
        }
    }
}

impl EditorParams {
    pub fn color(&self) -> ColorRGBA8 {
        let [r, g, b, a] = self.color;
        ColorRGBA8::from_channels(r, g, b, a)
    }

    fn set_color(&mut self, color: ColorRGBA8) {
        self.color = [
            color.r as f32,
            color.g as f32,
            color.b as f32,
            color.a as f32,
        ];
    }

    pub fn dimensions(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// What `preview` would place at the pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Platform(BoxDef),
    Light(Light),
}

/// Right-drag pan and wheel zoom for the editor camera.
#[derive(Debug, Default)]
pub struct ViewControl {
    has_dragged: bool,
}

impl ViewControl {
    pub fn pan(&mut self, camera: &mut Camera, pixel_delta: Vec2) {
        if pixel_delta == Vec2::ZERO {
            return;
        }
        self.has_dragged = true;
        camera.offset_position(Vec2::new(-pixel_delta.x, pixel_delta.y) / camera.scale);
    }

    /// Multiplicative zoom. The first tick only arms the control.
    pub fn zoom(&mut self, camera: &mut Camera, ticks: f32) {
        if ticks == 0.0 {
            return;
        }
        if !self.has_dragged {
            self.has_dragged = true;
            return;
        }
        let scale = camera.scale * (1.0 + ZOOM_STEP * ticks);
        camera.set_scale(scale.clamp(MIN_ZOOM, MAX_ZOOM));
    }
}

pub struct LevelEditor {
    pub world: PhysicsWorld,
    pub level: Level,
    pub params: EditorParams,
    pub selection_mode: SelectionMode,
    pub object_mode: ObjectMode,
    pub physics_mode: PhysicsMode,
    pub debug_render: bool,
    selection: Selection,
    select_offset: Vec2,
    dragging: bool,
    platform_texture: String,
    player_texture: String,
}

impl LevelEditor {
    pub fn new(world: PhysicsWorld, platform_texture: &str, player_texture: &str) -> Self {
        Self {
            world,
            level: Level::new(),
            params: EditorParams::default(),
            selection_mode: SelectionMode::default(),
            object_mode: ObjectMode::default(),
            physics_mode: PhysicsMode::default(),
            debug_render: false,
            selection: Selection::None,
            select_offset: Vec2::ZERO,
            dragging: false,
            platform_texture: platform_texture.to_string(),
            player_texture: player_texture.to_string(),
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.selection_mode = mode;
        if mode == SelectionMode::Place {
            self.clear_selection();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
        self.dragging = false;
    }

    /// Primary button pressed at `world_pos`. Ignored over the panel.
    pub fn pointer_down(&mut self, world_pos: Vec2, over_panel: bool) {
        if over_panel {
            return;
        }
        match self.selection_mode {
            SelectionMode::Place => self.place(world_pos),
            SelectionMode::Select => self.select_at(world_pos),
        }
    }

    /// Pointer moved with the primary button held.
    pub fn pointer_dragged(&mut self, world_pos: Vec2) {
        if !self.dragging {
            return;
        }
        let position = world_pos - self.select_offset;
        match self.selection {
            Selection::Box(index) => self.refresh_box(index, position),
            Selection::Light(index) => {
                if let Some(light) = self.level.lights.get_mut(index) {
                    light.position = position;
                }
            }
            Selection::None => {}
        }
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Remove the selected entity. Returns whether anything was removed.
    pub fn delete_selection(&mut self) -> bool {
        let removed = match self.selection {
            Selection::Box(index) => self.level.remove_box(&mut self.world, index),
            Selection::Light(index) => self.level.remove_light(index),
            Selection::None => false,
        };
        self.clear_selection();
        removed
    }

    /// Push the current widget values onto the selected entity.
    pub fn apply_params(&mut self) {
        match self.selection {
            Selection::Box(index) => {
                if let Some(level_box) = self.level.boxes.get(index) {
                    let position = level_box.position(&self.world);
                    self.refresh_box(index, position);
                }
            }
            Selection::Light(index) => {
                let color = self.params.color();
                let size = self.params.light_size;
                if let Some(light) = self.level.lights.get_mut(index) {
                    light.color = color;
                    light.size = size;
                }
            }
            Selection::None => {}
        }
    }

    /// The entity a click at `world_pos` would place, without placing it.
    pub fn preview(&self, world_pos: Vec2) -> Option<Preview> {
        if self.selection_mode != SelectionMode::Place {
            return None;
        }
        match self.object_mode {
            ObjectMode::Platform => Some(Preview::Platform(self.platform_def(world_pos))),
            ObjectMode::Light => Some(Preview::Light(self.light_def(world_pos))),
            ObjectMode::Player | ObjectMode::Finish => None,
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        let data = self.level.to_data(&self.world).inspect_err(|e| log::warn!("{e}"))?;
        level_io::save_as_text(path, &data)
    }

    /// Replace the level with the file's contents. On error the current
    /// level is kept.
    pub fn load(&mut self, path: &Path) -> Result<(), String> {
        let data = level_io::load_from_text(path)?;
        self.clear_selection();
        self.level.clear(&mut self.world);
        self.level = Level::from_data(&mut self.world, data, &self.player_texture);
        Ok(())
    }

    fn place(&mut self, world_pos: Vec2) {
        match self.object_mode {
            ObjectMode::Player => {
                let def = PlayerDef {
                    position: world_pos,
                    draw_dims: PLAYER_DRAW_DIMS,
                    collision_dims: PLAYER_COLLISION_DIMS,
                    color: self.params.color(),
                };
                self.level
                    .place_player(&mut self.world, def, &self.player_texture);
            }
            ObjectMode::Platform => {
                let def = self.platform_def(world_pos);
                self.level.add_box(&mut self.world, def);
            }
            ObjectMode::Light => {
                let light = self.light_def(world_pos);
                self.level.add_light(light);
            }
            ObjectMode::Finish => {}
        }
    }

    fn select_at(&mut self, world_pos: Vec2) {
        self.clear_selection();

        if let Some(index) = self
            .level
            .lights
            .iter()
            .position(|l| l.in_select_radius(world_pos))
        {
            let light = self.level.lights[index];
            self.selection = Selection::Light(index);
            self.select_offset = world_pos - light.position;
            self.dragging = true;
            self.params.set_color(light.color);
            self.params.light_size = light.size;
            self.object_mode = ObjectMode::Light;
            return;
        }

        if let Some(index) = self
            .level
            .boxes
            .iter()
            .position(|b| b.contains_point(&self.world, world_pos))
        {
            let def = self.level.boxes[index].def(&self.world);
            self.selection = Selection::Box(index);
            self.select_offset = world_pos - def.position;
            self.dragging = true;
            self.params.set_color(def.color);
            self.params.rotation = def.angle;
            self.params.width = def.dimensions.x;
            self.params.height = def.dimensions.y;
            self.object_mode = ObjectMode::Platform;
            self.physics_mode = if def.dynamic {
                PhysicsMode::Dynamic
            } else {
                PhysicsMode::Rigid
            };
        }
    }

    /// Rebuild the box at `position` with the widget values. Texture, uv rect
    /// and the fixed-rotation flag are carried over from the live box.
    fn refresh_box(&mut self, index: usize, position: Vec2) {
        let Some(level_box) = self.level.boxes.get_mut(index) else {
            return;
        };
        let current = level_box.def(&self.world);
        let def = BoxDef {
            position,
            dimensions: self.params.dimensions(),
            color: self.params.color(),
            angle: self.params.rotation,
            dynamic: self.physics_mode == PhysicsMode::Dynamic,
            ..current
        };
        level_box.rebuild(&mut self.world, def);
    }

    fn platform_def(&self, position: Vec2) -> BoxDef {
        let dimensions = self.params.dimensions();
        BoxDef {
            position,
            dimensions,
            color: self.params.color(),
            texture: self.platform_texture.clone(),
            uv_rect: Vec4::new(0.0, 0.0, dimensions.x, dimensions.y),
            angle: self.params.rotation,
            dynamic: self.physics_mode == PhysicsMode::Dynamic,
            fixed_rotation: false,
        }
    }

    fn light_def(&self, position: Vec2) -> Light {
        Light::new(position, self.params.light_size, self.params.color())
    }
}
