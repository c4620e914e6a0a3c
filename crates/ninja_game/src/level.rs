use ben_core::ColorRGBA8;
use ben_render::{Camera, DebugRenderer, SpriteBatch};
use glam::Vec2;

use crate::entities::{BoxDef, LevelBox, Light, Player, PlayerDef};
use crate::physics::PhysicsWorld;

pub const NO_PLAYER_ERROR: &str = "Must create a player before saving";

/// Physics-free description of a level, as read from and written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelData {
    pub player: PlayerDef,
    pub boxes: Vec<BoxDef>,
    pub lights: Vec<Light>,
}

/// The live level: at most one player, plus boxes and lights in placement
/// order. Bodies live in a [`PhysicsWorld`] owned by the screen.
#[derive(Debug, Default)]
pub struct Level {
    player: Option<Player>,
    pub boxes: Vec<LevelBox>,
    pub lights: Vec<Light>,
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(world: &mut PhysicsWorld, data: LevelData, player_texture: &str) -> Self {
        let mut level = Self::new();
        level.place_player(world, data.player, player_texture);
        level.boxes = data
            .boxes
            .into_iter()
            .map(|def| LevelBox::new(world, def))
            .collect();
        level.lights = data.lights;
        level
    }

    pub fn to_data(&self, world: &PhysicsWorld) -> Result<LevelData, String> {
        let player = self
            .player
            .as_ref()
            .ok_or_else(|| NO_PLAYER_ERROR.to_string())?;
        Ok(LevelData {
            player: player.def(world),
            boxes: self.boxes.iter().map(|b| b.def(world)).collect(),
            lights: self.lights.clone(),
        })
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    /// Spawn the player, destroying the body of any previous one first.
    pub fn place_player(&mut self, world: &mut PhysicsWorld, def: PlayerDef, texture: &str) {
        if let Some(previous) = self.player.take() {
            previous.destroy(world);
        }
        self.player = Some(Player::new(world, def, texture));
    }

    pub fn add_box(&mut self, world: &mut PhysicsWorld, def: BoxDef) -> usize {
        self.boxes.push(LevelBox::new(world, def));
        self.boxes.len() - 1
    }

    /// Remove and destroy the box at `index`. Later indices shift down.
    pub fn remove_box(&mut self, world: &mut PhysicsWorld, index: usize) -> bool {
        if index >= self.boxes.len() {
            return false;
        }
        self.boxes.remove(index).destroy(world);
        true
    }

    pub fn add_light(&mut self, light: Light) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    pub fn remove_light(&mut self, index: usize) -> bool {
        if index >= self.lights.len() {
            return false;
        }
        self.lights.remove(index);
        true
    }

    /// Destroy every body and empty the level.
    pub fn clear(&mut self, world: &mut PhysicsWorld) {
        if let Some(player) = self.player.take() {
            player.destroy(world);
        }
        for level_box in self.boxes.drain(..) {
            level_box.destroy(world);
        }
        self.lights.clear();
    }

    /// Draw the boxes overlapping `camera`'s view, then the player.
    pub fn draw(&self, world: &PhysicsWorld, camera: &Camera, batch: &mut SpriteBatch) {
        for level_box in &self.boxes {
            // Diagonal bound so rotated boxes are never culled early.
            let extent = Vec2::splat(level_box.dimensions().length());
            let corner = level_box.position(world) - extent * 0.5;
            if camera.is_box_in_view(corner, extent) {
                level_box.draw(world, batch);
            }
        }
        if let Some(player) = &self.player {
            player.draw(world, batch);
        }
    }

    pub fn draw_lights(&self, batch: &mut SpriteBatch) {
        for light in &self.lights {
            light.draw(batch);
        }
    }

    pub fn draw_outlines(&self, world: &PhysicsWorld, debug: &mut DebugRenderer, color: ColorRGBA8) {
        for level_box in &self.boxes {
            level_box.draw_outline(world, debug, color);
        }
        if let Some(player) = &self.player {
            player.draw_outline(world, debug, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsSettings;
    use glam::{Vec2, Vec4};

    fn player_def(position: Vec2) -> PlayerDef {
        PlayerDef {
            position,
            draw_dims: Vec2::new(2.0, 2.0),
            collision_dims: Vec2::new(1.0, 1.8),
            color: ColorRGBA8::WHITE,
        }
    }

    fn box_def(x: f32) -> BoxDef {
        BoxDef {
            position: Vec2::new(x, 0.0),
            dimensions: Vec2::ONE,
            color: ColorRGBA8::WHITE,
            texture: "Assets/bricks_top.png".to_string(),
            uv_rect: Vec4::new(0.0, 0.0, 1.0, 1.0),
            angle: 0.0,
            dynamic: false,
            fixed_rotation: false,
        }
    }

    #[test]
    fn repeated_player_placement_keeps_one_body() {
        let mut world = PhysicsWorld::from_settings(&PhysicsSettings::default());
        let mut level = Level::new();
        for i in 0..10 {
            level.place_player(&mut world, player_def(Vec2::new(i as f32, 0.0)), "ninja.png");
            assert_eq!(world.live_body_count(), 1);
        }
        let data = level.to_data(&world).expect("player exists");
        assert_eq!(data.player.position, Vec2::new(9.0, 0.0));
    }

    #[test]
    fn to_data_without_player_is_refused() {
        let world = PhysicsWorld::from_settings(&PhysicsSettings::default());
        let err = Level::new().to_data(&world).expect_err("no player");
        assert!(err.contains("player"));
    }

    #[test]
    fn from_data_then_clear_releases_every_body() {
        let mut world = PhysicsWorld::from_settings(&PhysicsSettings::default());
        let data = LevelData {
            player: player_def(Vec2::ZERO),
            boxes: vec![box_def(2.0), box_def(4.0)],
            lights: vec![Light::new(Vec2::ZERO, 10.0, ColorRGBA8::WHITE)],
        };
        let mut level = Level::from_data(&mut world, data.clone(), "ninja.png");
        assert_eq!(world.live_body_count(), 3);
        assert_eq!(level.to_data(&world).expect("player exists"), data);

        level.clear(&mut world);
        assert_eq!(world.live_body_count(), 0);
        assert!(level.player().is_none());
        assert!(level.lights.is_empty());
    }

    #[test]
    fn remove_box_out_of_range_is_ignored() {
        let mut world = PhysicsWorld::from_settings(&PhysicsSettings::default());
        let mut level = Level::new();
        level.add_box(&mut world, box_def(0.0));
        assert!(!level.remove_box(&mut world, 3));
        assert!(level.remove_box(&mut world, 0));
        assert_eq!(world.live_body_count(), 0);
    }

    #[test]
    fn draw_skips_boxes_outside_the_view() {
        let mut world = PhysicsWorld::from_settings(&PhysicsSettings::default());
        let mut level = Level::new();
        level.add_box(&mut world, box_def(0.0));
        level.add_box(&mut world, box_def(500.0));
        // Just past the right edge, but a rotation could swing a corner in.
        level.add_box(&mut world, box_def(20.4));
        let mut camera = Camera::new(1280, 720);
        camera.set_scale(32.0);

        let mut batch = SpriteBatch::new();
        batch.begin(ben_render::GlyphSortType::None);
        level.draw(&world, &camera, &mut batch);
        batch.end();
        assert_eq!(batch.glyph_count(), 2);
    }
}
