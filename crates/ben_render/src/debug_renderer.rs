use ben_core::ColorRGBA8;
use glam::{Vec2, Vec4};

use crate::sprite_batch::{SpriteBatch, WHITE_TEXTURE};

const CIRCLE_SEGMENTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub start: Vec2,
    pub end: Vec2,
    pub color: ColorRGBA8,
}

/// Collects outlines for one frame and emits them as thin quads.
#[derive(Debug, Default)]
pub struct DebugRenderer {
    lines: Vec<DebugLine>,
}

impl DebugRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[DebugLine] {
        &self.lines
    }

    pub fn draw_line(&mut self, start: Vec2, end: Vec2, color: ColorRGBA8) {
        self.lines.push(DebugLine { start, end, color });
    }

    /// Outline of `dest` (bottom-left `x, y`, size `w, h`) rotated by `angle`
    /// about its centre.
    pub fn draw_box(&mut self, dest: Vec4, color: ColorRGBA8, angle: f32) {
        let half = Vec2::new(dest.z, dest.w) * 0.5;
        let center = Vec2::new(dest.x, dest.y) + half;
        let corners = [
            Vec2::new(-half.x, half.y),
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
        ]
        .map(|c| center + ben_core::geometry::rotate(c, angle));

        for i in 0..4 {
            self.draw_line(corners[i], corners[(i + 1) % 4], color);
        }
    }

    pub fn draw_circle(&mut self, center: Vec2, color: ColorRGBA8, radius: f32) {
        let step = std::f32::consts::TAU / CIRCLE_SEGMENTS as f32;
        let point = |i: usize| {
            let a = i as f32 * step;
            center + Vec2::new(a.cos(), a.sin()) * radius
        };
        for i in 0..CIRCLE_SEGMENTS {
            self.draw_line(point(i), point(i + 1), color);
        }
    }

    /// Emit every line as a quad `width` world units thick, then clear.
    pub fn end(&mut self, batch: &mut SpriteBatch, width: f32) {
        for line in self.lines.drain(..) {
            let delta = line.end - line.start;
            let length = delta.length();
            if length <= f32::EPSILON {
                continue;
            }
            let mid = (line.start + line.end) * 0.5;
            let dest = Vec4::new(
                mid.x - length * 0.5,
                mid.y - width * 0.5,
                length,
                width,
            );
            batch.draw_facing(
                dest,
                Vec4::new(0.0, 0.0, 1.0, 1.0),
                WHITE_TEXTURE,
                0.0,
                line.color,
                delta,
            );
        }
    }
}
