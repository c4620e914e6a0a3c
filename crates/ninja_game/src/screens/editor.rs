use std::path::PathBuf;

use ben_core::{ColorRGBA8, Key, MouseBtn, Rect, Screen, ScreenIndex, ScreenState};
use ben_render::{BlendMode, Camera, DebugRenderer, GlyphSortType, SpriteBatch};

use super::SCREEN_INDEX_MAIN_MENU;
use crate::context::GameContext;
use crate::editor::panel::show_panel;
use crate::editor::state::{LevelEditor, Preview, Selection, ViewControl};
use crate::entities::box_entity::draw_box_def;
use crate::physics::PhysicsWorld;

const CLEAR_COLOR: ColorRGBA8 = ColorRGBA8::new(0, 0, 102, 255);
const CAMERA_SCALE: f32 = 32.0;
const OUTLINE_COLOR: ColorRGBA8 = ColorRGBA8::WHITE;
const SELECTED_COLOR: ColorRGBA8 = ColorRGBA8::new(255, 255, 0, 255);
const OUTLINE_WIDTH: f32 = 0.05;
const PREVIEW_ALPHA: u8 = 128;

pub struct EditorScreen {
    state: ScreenState,
    camera: Camera,
    view: ViewControl,
    editor: Option<LevelEditor>,
    panel_rect: Rect,
    file_name: String,
    status: Option<String>,
}

impl EditorScreen {
    pub fn new() -> Self {
        Self {
            state: ScreenState::None,
            camera: Camera::new(1, 1),
            view: ViewControl::default(),
            editor: None,
            panel_rect: Rect::default(),
            file_name: String::new(),
            status: None,
        }
    }

    pub fn editor(&self) -> Option<&LevelEditor> {
        self.editor.as_ref()
    }

    fn handle_panel(&mut self, ctx: &GameContext) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let output = show_panel(
            &ctx.ui,
            editor,
            &mut self.file_name,
            self.status.as_deref(),
            ctx.pixels_per_point,
        );
        self.panel_rect = output.rect;

        if output.actions.save {
            let path = PathBuf::from(&self.file_name);
            self.status = Some(match editor.save(&path) {
                Ok(()) => format!("Saved {}", path.display()),
                Err(err) => err,
            });
        }
        if output.actions.load {
            let path = PathBuf::from(&self.file_name);
            self.status = Some(match editor.load(&path) {
                Ok(()) => format!("Loaded {}", path.display()),
                Err(err) => err,
            });
        }
        if output.actions.back {
            self.state = ScreenState::ChangePrevious;
        }
    }

    fn handle_pointer(&mut self, ctx: &GameContext) {
        let input = &ctx.input;
        if input.is_mouse_held(MouseBtn::Right) {
            self.view.pan(&mut self.camera, input.mouse_delta());
        }
        self.view.zoom(&mut self.camera, input.wheel_delta());

        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let screen_pos = input.mouse_position();
        let world_pos = self.camera.screen_to_world(screen_pos);
        if input.is_mouse_just_pressed(MouseBtn::Left) {
            editor.pointer_down(world_pos, self.panel_rect.contains(screen_pos));
        } else if input.is_mouse_held(MouseBtn::Left) && input.mouse_delta() != glam::Vec2::ZERO {
            editor.pointer_dragged(world_pos);
        }
        if input.is_mouse_just_released(MouseBtn::Left) {
            editor.pointer_up();
        }

        let typing = ctx.ui.wants_keyboard_input();
        if !typing && (input.is_just_pressed(Key::Delete) || input.is_just_pressed(Key::Backspace)) {
            editor.delete_selection();
        }
    }
}

impl Default for EditorScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<GameContext> for EditorScreen {
    fn name(&self) -> &'static str {
        "LevelEditor"
    }

    fn next_screen_index(&self) -> Option<ScreenIndex> {
        None
    }

    fn previous_screen_index(&self) -> Option<ScreenIndex> {
        Some(SCREEN_INDEX_MAIN_MENU)
    }

    fn on_entry(&mut self, ctx: &mut GameContext) {
        self.camera = Camera::new(ctx.viewport.0, ctx.viewport.1);
        self.camera.set_scale(CAMERA_SCALE);
        self.view = ViewControl::default();
        self.editor = Some(LevelEditor::new(
            PhysicsWorld::from_settings(&ctx.config.physics),
            &ctx.config.textures.platform,
            &ctx.config.textures.player,
        ));
        self.panel_rect = Rect::default();
        self.file_name = ctx.config.level_path.clone();
        self.status = None;
    }

    fn on_exit(&mut self, _ctx: &mut GameContext) {
        if let Some(mut editor) = self.editor.take() {
            editor.level.clear(&mut editor.world);
        }
    }

    fn update(&mut self, ctx: &mut GameContext) {
        self.camera.set_viewport(ctx.viewport.0, ctx.viewport.1);
        self.handle_panel(ctx);
        self.handle_pointer(ctx);

        if let Some(editor) = &self.editor {
            ctx.stats.body_count = editor.world.live_body_count();
            ctx.stats.box_count = editor.level.boxes.len();
            ctx.stats.light_count = editor.level.lights.len();
        }
    }

    fn draw(&mut self, ctx: &mut GameContext) {
        ctx.frame.clear_color = CLEAR_COLOR;
        let Some(editor) = self.editor.as_ref() else {
            return;
        };
        let pointer = ctx.input.mouse_position();
        let world_pos = self.camera.screen_to_world(pointer);
        let preview = if self.panel_rect.contains(pointer) {
            None
        } else {
            editor.preview(world_pos)
        };

        let mut batch = SpriteBatch::new();
        batch.begin(GlyphSortType::Texture);
        editor.level.draw(&editor.world, &self.camera, &mut batch);
        if let Some(Preview::Platform(mut def)) = preview.clone() {
            def.color = def.color.with_alpha(PREVIEW_ALPHA);
            draw_box_def(&def, &mut batch);
        }
        batch.end();
        ctx.frame.push(batch, BlendMode::Alpha, &self.camera);

        let mut lights = SpriteBatch::new();
        lights.begin(GlyphSortType::None);
        editor.level.draw_lights(&mut lights);
        if let Some(Preview::Light(light)) = preview {
            light.draw(&mut lights);
        }
        lights.end();
        ctx.frame.push(lights, BlendMode::Additive, &self.camera);

        let mut debug = DebugRenderer::new();
        if editor.debug_render {
            editor
                .level
                .draw_outlines(&editor.world, &mut debug, OUTLINE_COLOR);
        }
        match editor.selection() {
            Selection::Box(index) => {
                if let Some(level_box) = editor.level.boxes.get(index) {
                    level_box.draw_outline(&editor.world, &mut debug, SELECTED_COLOR);
                }
            }
            Selection::Light(index) => {
                if let Some(light) = editor.level.lights.get(index) {
                    debug.draw_circle(
                        light.position,
                        SELECTED_COLOR,
                        crate::entities::light::LIGHT_SELECT_RADIUS,
                    );
                    debug.draw_circle(light.position, SELECTED_COLOR, light.size * 0.5);
                }
            }
            Selection::None => {}
        }
        let mut lines = SpriteBatch::new();
        lines.begin(GlyphSortType::None);
        debug.end(&mut lines, OUTLINE_WIDTH);
        lines.end();
        ctx.frame.push(lines, BlendMode::Alpha, &self.camera);
    }

    fn state(&self) -> ScreenState {
        self.state
    }

    fn set_state(&mut self, state: ScreenState) {
        self.state = state;
    }
}
