use ben_core::ColorRGBA8;
use ben_render::{DebugRenderer, SpriteBatch};
use glam::{Vec2, Vec4};

use crate::physics::{PhysicsBody, PhysicsWorld};

/// Everything needed to (re)create a box. `position` is the centre.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxDef {
    pub position: Vec2,
    pub dimensions: Vec2,
    pub color: ColorRGBA8,
    pub texture: String,
    pub uv_rect: Vec4,
    pub angle: f32,
    pub dynamic: bool,
    pub fixed_rotation: bool,
}

/// A rectangular level object backed by a physics body.
///
/// Not `Clone`: the value owns its body. `destroy` consumes it and `rebuild`
/// swaps the body in one call, so the world never keeps a body nobody draws.
#[derive(Debug)]
pub struct LevelBox {
    body: PhysicsBody,
    dimensions: Vec2,
    color: ColorRGBA8,
    texture: String,
    uv_rect: Vec4,
    dynamic: bool,
    fixed_rotation: bool,
}

impl LevelBox {
    pub fn new(world: &mut PhysicsWorld, def: BoxDef) -> Self {
        let body = create_body(world, &def);
        Self {
            body,
            dimensions: def.dimensions,
            color: def.color,
            texture: def.texture,
            uv_rect: def.uv_rect,
            dynamic: def.dynamic,
            fixed_rotation: def.fixed_rotation,
        }
    }

    pub fn destroy(self, world: &mut PhysicsWorld) {
        world.remove_body(self.body);
    }

    /// Replace the body with one built from `def`.
    pub fn rebuild(&mut self, world: &mut PhysicsWorld, def: BoxDef) {
        let body = create_body(world, &def);
        let old = std::mem::replace(&mut self.body, body);
        world.remove_body(old);
        self.dimensions = def.dimensions;
        self.color = def.color;
        self.texture = def.texture;
        self.uv_rect = def.uv_rect;
        self.dynamic = def.dynamic;
        self.fixed_rotation = def.fixed_rotation;
    }

    /// Snapshot with position and angle read back from the body.
    pub fn def(&self, world: &PhysicsWorld) -> BoxDef {
        BoxDef {
            position: world.position(&self.body),
            dimensions: self.dimensions,
            color: self.color,
            texture: self.texture.clone(),
            uv_rect: self.uv_rect,
            angle: world.angle(&self.body),
            dynamic: self.dynamic,
            fixed_rotation: self.fixed_rotation,
        }
    }

    pub fn position(&self, world: &PhysicsWorld) -> Vec2 {
        world.position(&self.body)
    }

    pub fn dimensions(&self) -> Vec2 {
        self.dimensions
    }

    pub fn color(&self) -> ColorRGBA8 {
        self.color
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn contains_point(&self, world: &PhysicsWorld, point: Vec2) -> bool {
        world.contains_point(&self.body, point)
    }

    fn dest_rect(&self, world: &PhysicsWorld) -> Vec4 {
        let bottom_left = world.position(&self.body) - self.dimensions * 0.5;
        Vec4::new(bottom_left.x, bottom_left.y, self.dimensions.x, self.dimensions.y)
    }

    pub fn draw(&self, world: &PhysicsWorld, batch: &mut SpriteBatch) {
        draw_def_sprite(
            batch,
            self.dest_rect(world),
            self.uv_rect,
            &self.texture,
            self.color,
            world.angle(&self.body),
        );
    }

    pub fn draw_outline(&self, world: &PhysicsWorld, debug: &mut DebugRenderer, color: ColorRGBA8) {
        debug.draw_box(self.dest_rect(world), color, world.angle(&self.body));
    }
}

/// Draw a box that has no body, e.g. a placement preview.
pub fn draw_box_def(def: &BoxDef, batch: &mut SpriteBatch) {
    let bottom_left = def.position - def.dimensions * 0.5;
    let dest = Vec4::new(bottom_left.x, bottom_left.y, def.dimensions.x, def.dimensions.y);
    draw_def_sprite(batch, dest, def.uv_rect, &def.texture, def.color, def.angle);
}

fn draw_def_sprite(
    batch: &mut SpriteBatch,
    dest: Vec4,
    uv: Vec4,
    texture: &str,
    color: ColorRGBA8,
    angle: f32,
) {
    batch.draw_rotated(dest, uv, texture, 0.0, color, angle);
}

fn create_body(world: &mut PhysicsWorld, def: &BoxDef) -> PhysicsBody {
    world.create_box(
        def.position,
        def.dimensions * 0.5,
        def.angle,
        def.dynamic,
        def.fixed_rotation,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsSettings;
    use ben_render::GlyphSortType;

    fn def_at(x: f32, y: f32) -> BoxDef {
        BoxDef {
            position: Vec2::new(x, y),
            dimensions: Vec2::new(1.5, 1.5),
            color: ColorRGBA8::new(200, 100, 50, 255),
            texture: "Assets/bricks_top.png".to_string(),
            uv_rect: Vec4::new(0.0, 0.0, 1.0, 1.0),
            angle: 0.3,
            dynamic: true,
            fixed_rotation: false,
        }
    }

    #[test]
    fn def_reads_back_what_was_built() {
        let mut world = PhysicsWorld::from_settings(&PhysicsSettings::default());
        let level_box = LevelBox::new(&mut world, def_at(5.0, -10.0));
        let def = level_box.def(&world);
        assert_eq!(def.position, Vec2::new(5.0, -10.0));
        assert!((def.angle - 0.3).abs() < 1e-5);
        assert_eq!(def.texture, "Assets/bricks_top.png");
        assert!(def.dynamic);
    }

    #[test]
    fn rebuild_keeps_live_body_count() {
        let mut world = PhysicsWorld::from_settings(&PhysicsSettings::default());
        let mut level_box = LevelBox::new(&mut world, def_at(0.0, 0.0));
        let _other = LevelBox::new(&mut world, def_at(4.0, 0.0));
        assert_eq!(world.live_body_count(), 2);
        for i in 0..5 {
            let mut def = def_at(i as f32, 1.0);
            def.dynamic = i % 2 == 0;
            level_box.rebuild(&mut world, def);
            assert_eq!(world.live_body_count(), 2);
        }
        assert_eq!(level_box.position(&world), Vec2::new(4.0, 1.0));
        assert!(level_box.is_dynamic());
    }

    #[test]
    fn destroy_removes_the_body() {
        let mut world = PhysicsWorld::from_settings(&PhysicsSettings::default());
        let level_box = LevelBox::new(&mut world, def_at(0.0, 0.0));
        level_box.destroy(&mut world);
        assert_eq!(world.live_body_count(), 0);
    }

    #[test]
    fn draw_centres_the_sprite_on_the_body() {
        let mut world = PhysicsWorld::from_settings(&PhysicsSettings::default());
        let mut def = def_at(2.0, 2.0);
        def.angle = 0.0;
        let level_box = LevelBox::new(&mut world, def);
        let mut batch = SpriteBatch::new();
        batch.begin(GlyphSortType::Texture);
        level_box.draw(&world, &mut batch);
        batch.end();
        let glyph = &batch.glyphs()[0];
        // Second corner is bottom-left.
        assert_eq!(glyph.corners[1].position, [1.25, 1.25]);
    }
}
