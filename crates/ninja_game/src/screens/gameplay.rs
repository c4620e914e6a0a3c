//! The playable level.

use std::path::Path;

use ben_core::{ColorRGBA8, Key, Screen, ScreenIndex, ScreenState};
use ben_render::{
    BlendMode, Camera, DebugRenderer, GlyphSortType, ParticleBatch2D, ParticleEngine2D,
    SpriteBatch, WHITE_TEXTURE,
};
use glam::{Vec2, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::SCREEN_INDEX_MAIN_MENU;
use crate::config::GameConfig;
use crate::context::GameContext;
use crate::entities::{BoxDef, LevelBox, Light, PlayerDef, PlayerIntent};
use crate::level::{Level, LevelData};
use crate::level_io;
use crate::physics::PhysicsWorld;

const CAMERA_SCALE: f32 = 32.0;
const CLEAR_COLOR: ColorRGBA8 = ColorRGBA8::new(0, 0, 0, 255);
const DEBUG_COLOR: ColorRGBA8 = ColorRGBA8::WHITE;
const DEBUG_LINE_WIDTH: f32 = 0.05;

const GROUND_POSITION: Vec2 = Vec2::new(0.0, -26.86);
const GROUND_DIMS: Vec2 = Vec2::new(100.0, 20.0);
const BOX_ALPHA: u8 = 50;

const PLAYER_LIGHT: (ColorRGBA8, f32) = (ColorRGBA8::new(50, 50, 255, 128), 25.0);
const MOUSE_LIGHT: (ColorRGBA8, f32) = (ColorRGBA8::new(255, 0, 255, 80), 45.0);

const DUST_CAPACITY: usize = 256;
const DUST_DECAY: f32 = 2.0;
const DUST_PER_JUMP: usize = 12;

/// Level used when no level file is present.
pub fn generate_level(config: &GameConfig, rng: &mut impl Rng) -> LevelData {
    let boxes = (0..config.gameplay.box_count)
        .map(|_| BoxDef {
            position: Vec2::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..15.0)),
            dimensions: Vec2::new(rng.gen_range(1.0..2.5), rng.gen_range(1.0..2.5)),
            color: ColorRGBA8::new(rng.gen(), rng.gen(), rng.gen(), BOX_ALPHA),
            texture: config.textures.platform.clone(),
            uv_rect: Vec4::new(0.0, 0.0, 1.0, 1.0),
            angle: 0.0,
            dynamic: true,
            fixed_rotation: false,
        })
        .collect();

    LevelData {
        player: PlayerDef {
            position: Vec2::new(0.0, 30.0),
            draw_dims: Vec2::new(2.0, 2.0),
            collision_dims: Vec2::new(1.0, 1.8),
            color: ColorRGBA8::WHITE,
        },
        boxes,
        lights: Vec::new(),
    }
}

/// Everything that only exists while the screen is active.
struct Session {
    world: PhysicsWorld,
    level: Level,
    ground: Option<LevelBox>,
    particles: ParticleEngine2D,
    dust: usize,
    rng: StdRng,
}

pub struct GameplayScreen {
    state: ScreenState,
    camera: Camera,
    session: Option<Session>,
    debug_render: bool,
    render_lights: bool,
}

impl GameplayScreen {
    pub fn new() -> Self {
        Self {
            state: ScreenState::None,
            camera: Camera::new(1, 1),
            session: None,
            debug_render: false,
            render_lights: false,
        }
    }

    pub fn level(&self) -> Option<&Level> {
        self.session.as_ref().map(|s| &s.level)
    }

    pub fn world(&self) -> Option<&PhysicsWorld> {
        self.session.as_ref().map(|s| &s.world)
    }

    fn start_session(config: &GameConfig) -> Session {
        let mut world = PhysicsWorld::from_settings(&config.physics);
        let mut rng = match config.gameplay.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let level_path = Path::new(&config.level_path);
        let loaded = if level_path.exists() {
            level_io::load_from_text(level_path).ok()
        } else {
            None
        };
        let (data, ground) = match loaded {
            Some(data) => (data, None),
            None => {
                log::info!(
                    "No playable level at {}, generating {} boxes",
                    level_path.display(),
                    config.gameplay.box_count
                );
                let ground = LevelBox::new(
                    &mut world,
                    BoxDef {
                        position: GROUND_POSITION,
                        dimensions: GROUND_DIMS,
                        color: ColorRGBA8::WHITE,
                        texture: config.textures.platform.clone(),
                        uv_rect: Vec4::new(0.0, 0.0, GROUND_DIMS.x, GROUND_DIMS.y),
                        angle: 0.0,
                        dynamic: false,
                        fixed_rotation: false,
                    },
                );
                (generate_level(config, &mut rng), Some(ground))
            }
        };

        let level = Level::from_data(&mut world, data, &config.textures.player);
        let mut particles = ParticleEngine2D::new();
        let dust = particles.add_particle_batch(ParticleBatch2D::new(
            DUST_CAPACITY,
            DUST_DECAY,
            WHITE_TEXTURE,
        ));
        Session {
            world,
            level,
            ground,
            particles,
            dust,
            rng,
        }
    }

    fn emit_dust(session: &mut Session, feet: Vec2) {
        let Session {
            particles, dust, rng, ..
        } = session;
        let Some(batch) = particles.batch_mut(*dust) else {
            return;
        };
        for _ in 0..DUST_PER_JUMP {
            let velocity = Vec2::new(rng.gen_range(-3.0..3.0), rng.gen_range(0.0..2.0));
            let shade = rng.gen_range(150..=220);
            batch.add_particle(
                feet,
                velocity,
                ColorRGBA8::new(shade, shade, shade, 180),
                rng.gen_range(0.1..0.3),
            );
        }
    }

    fn handle_keys(&mut self, ctx: &GameContext) {
        if ctx.input.is_just_pressed(Key::LCtrl) {
            self.debug_render = !self.debug_render;
        }
        if ctx.input.is_just_pressed(Key::LShift) {
            self.render_lights = !self.render_lights;
        }
        let wheel = ctx.input.wheel_delta();
        if wheel != 0.0 {
            self.camera.offset_scale(wheel.signum());
        }
    }
}

impl Default for GameplayScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<GameContext> for GameplayScreen {
    fn name(&self) -> &'static str {
        "Gameplay"
    }

    fn next_screen_index(&self) -> Option<ScreenIndex> {
        None
    }

    fn previous_screen_index(&self) -> Option<ScreenIndex> {
        Some(SCREEN_INDEX_MAIN_MENU)
    }

    fn on_entry(&mut self, ctx: &mut GameContext) {
        for key in Key::MOVEMENT {
            ctx.input.release_key(*key);
        }
        self.camera = Camera::new(ctx.viewport.0, ctx.viewport.1);
        self.camera.set_scale(CAMERA_SCALE);
        let session = Self::start_session(&ctx.config);
        if let Some(player) = session.level.player() {
            self.camera.set_position(player.position(&session.world));
        }
        self.session = Some(session);
    }

    fn on_exit(&mut self, _ctx: &mut GameContext) {
        if let Some(mut session) = self.session.take() {
            session.level.clear(&mut session.world);
            if let Some(ground) = session.ground.take() {
                ground.destroy(&mut session.world);
            }
        }
    }

    fn update(&mut self, ctx: &mut GameContext) {
        if ctx.input.is_just_pressed(Key::Escape) {
            self.state = ScreenState::ChangePrevious;
            return;
        }
        self.handle_keys(ctx);
        self.camera.set_viewport(ctx.viewport.0, ctx.viewport.1);

        let Some(session) = self.session.as_mut() else {
            return;
        };
        let intent = PlayerIntent::from_input(&ctx.input);
        let mut jumped_at = None;
        if let Some(player) = session.level.player_mut() {
            if player.update(&mut session.world, intent) {
                jumped_at = Some(player.position(&session.world));
            }
        }
        if let Some(position) = jumped_at {
            Self::emit_dust(session, position - Vec2::new(0.0, 0.9));
        }

        session.world.step();
        session.particles.update(ctx.dt);

        if let Some(player) = session.level.player() {
            self.camera.set_position(player.position(&session.world));
        }

        ctx.stats.body_count = session.world.live_body_count();
        ctx.stats.box_count = session.level.boxes.len();
        ctx.stats.light_count = session.level.lights.len();
    }

    fn draw(&mut self, ctx: &mut GameContext) {
        ctx.frame.clear_color = CLEAR_COLOR;
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let mut batch = SpriteBatch::new();
        batch.begin(GlyphSortType::Texture);
        if let Some(ground) = &session.ground {
            ground.draw(&session.world, &mut batch);
        }
        session.level.draw(&session.world, &self.camera, &mut batch);
        session.particles.draw(&mut batch);
        batch.end();
        ctx.frame.push(batch, BlendMode::Alpha, &self.camera);

        if self.debug_render {
            let mut debug = DebugRenderer::new();
            if let Some(ground) = &session.ground {
                ground.draw_outline(&session.world, &mut debug, DEBUG_COLOR);
            }
            session
                .level
                .draw_outlines(&session.world, &mut debug, DEBUG_COLOR);
            let mut lines = SpriteBatch::new();
            lines.begin(GlyphSortType::None);
            debug.end(&mut lines, DEBUG_LINE_WIDTH);
            lines.end();
            ctx.frame.push(lines, BlendMode::Alpha, &self.camera);
        }

        if self.render_lights {
            let mut lights = SpriteBatch::new();
            lights.begin(GlyphSortType::None);
            session.level.draw_lights(&mut lights);
            if let Some(player) = session.level.player() {
                let (color, size) = PLAYER_LIGHT;
                Light::new(player.position(&session.world), size, color).draw(&mut lights);
            }
            let (color, size) = MOUSE_LIGHT;
            let pointer = self.camera.screen_to_world(ctx.input.mouse_position());
            Light::new(pointer, size, color).draw(&mut lights);
            lights.end();
            ctx.frame.push(lights, BlendMode::Additive, &self.camera);
        }
    }

    fn state(&self) -> ScreenState {
        self.state
    }

    fn set_state(&mut self, state: ScreenState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_context;

    fn seeded_context() -> GameContext {
        let mut ctx = test_context();
        ctx.config.gameplay.seed = Some(7);
        ctx.config.level_path = std::env::temp_dir()
            .join(format!("ninja_gameplay_missing_{}.txt", std::process::id()))
            .to_string_lossy()
            .into_owned();
        ctx.dt = 1.0 / 144.0;
        ctx
    }

    #[test]
    fn generated_level_respects_ranges() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let data = generate_level(&config, &mut rng);
        assert_eq!(data.boxes.len(), 15);
        for b in &data.boxes {
            assert!((-10.0..10.0).contains(&b.position.x));
            assert!((-10.0..15.0).contains(&b.position.y));
            assert!((1.0..2.5).contains(&b.dimensions.x));
            assert!((1.0..2.5).contains(&b.dimensions.y));
            assert_eq!(b.color.a, BOX_ALPHA);
            assert!(b.dynamic);
        }
        assert_eq!(data.player.position, Vec2::new(0.0, 30.0));
    }

    #[test]
    fn entry_releases_movement_keys_and_builds_world() {
        let mut ctx = seeded_context();
        ctx.input.key_down(Key::D);
        let mut screen = GameplayScreen::new();
        screen.on_entry(&mut ctx);
        screen.set_running();
        assert!(!ctx.input.is_held(Key::D));
        // Ground, 15 boxes and the player.
        assert_eq!(screen.world().map(|w| w.live_body_count()), Some(17));
        assert_eq!(screen.camera.scale, CAMERA_SCALE);

        screen.on_exit(&mut ctx);
        assert!(screen.world().is_none());
    }

    #[test]
    fn update_steps_and_publishes_stats() {
        let mut ctx = seeded_context();
        let mut screen = GameplayScreen::new();
        screen.on_entry(&mut ctx);
        screen.set_running();
        let start = screen
            .level()
            .and_then(|l| l.player())
            .map(|p| p.position(screen.world().expect("world")))
            .expect("player");
        for _ in 0..10 {
            screen.update(&mut ctx);
        }
        let now = screen
            .level()
            .and_then(|l| l.player())
            .map(|p| p.position(screen.world().expect("world")))
            .expect("player");
        assert!(now.y < start.y);
        assert_eq!(ctx.stats.box_count, 15);
        assert_eq!(ctx.stats.body_count, 17);
        assert_eq!(screen.camera.position, now);
    }

    #[test]
    fn escape_returns_to_menu() {
        let mut ctx = seeded_context();
        let mut screen = GameplayScreen::new();
        screen.on_entry(&mut ctx);
        screen.set_running();
        ctx.input.key_down(Key::Escape);
        screen.update(&mut ctx);
        assert_eq!(screen.state(), ScreenState::ChangePrevious);
        assert_eq!(screen.previous_screen_index(), Some(SCREEN_INDEX_MAIN_MENU));
        assert_eq!(screen.next_screen_index(), None);
    }

    #[test]
    fn toggles_add_debug_and_light_layers() {
        let mut ctx = seeded_context();
        let mut screen = GameplayScreen::new();
        screen.on_entry(&mut ctx);
        screen.set_running();

        screen.draw(&mut ctx);
        assert_eq!(ctx.frame.layers().len(), 1);
        ctx.frame.clear();

        ctx.input.key_down(Key::LCtrl);
        ctx.input.key_down(Key::LShift);
        screen.update(&mut ctx);
        screen.draw(&mut ctx);
        let layers = ctx.frame.layers();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[2].blend, BlendMode::Additive);
    }

    #[test]
    fn wheel_zooms_by_one() {
        let mut ctx = seeded_context();
        let mut screen = GameplayScreen::new();
        screen.on_entry(&mut ctx);
        ctx.input.wheel_scrolled(-3.0);
        screen.update(&mut ctx);
        assert_eq!(screen.camera.scale, CAMERA_SCALE - 1.0);
    }
}
