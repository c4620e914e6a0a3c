use ben_core::geometry::point_in_circle;
use ben_core::ColorRGBA8;
use ben_render::{SpriteBatch, WHITE_TEXTURE};
use glam::{Vec2, Vec4};

/// Pick radius around a light's centre in the editor, in world units.
pub const LIGHT_SELECT_RADIUS: f32 = 0.5;

/// A point light. Drawn through the additive pipeline, which fades the quad
/// radially using uvs that run from -1 to 1 across it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub color: ColorRGBA8,
    pub position: Vec2,
    pub size: f32,
}

impl Light {
    pub fn new(position: Vec2, size: f32, color: ColorRGBA8) -> Self {
        Self {
            color,
            position,
            size,
        }
    }

    pub fn draw(&self, batch: &mut SpriteBatch) {
        let half = self.size * 0.5;
        let dest = Vec4::new(
            self.position.x - half,
            self.position.y - half,
            self.size,
            self.size,
        );
        batch.draw(dest, Vec4::new(-1.0, -1.0, 2.0, 2.0), WHITE_TEXTURE, 0.0, self.color);
    }

    pub fn in_select_radius(&self, point: Vec2) -> bool {
        point_in_circle(point, self.position, LIGHT_SELECT_RADIUS)
    }
}
