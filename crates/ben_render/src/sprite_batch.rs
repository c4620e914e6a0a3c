//! CPU-side sprite batching.
//!
//! Screens queue glyphs between `begin` and `end`. `end` sorts them and
//! builds one indexed quad mesh, collapsing runs of glyphs that share a
//! texture into a single draw call. Nothing here touches the GPU; the
//! renderer streams the finished mesh.

use std::sync::Arc;

use ben_core::ColorRGBA8;
use glam::{Vec2, Vec4};

/// Texture key for the built-in 1x1 white texture.
pub const WHITE_TEXTURE: &str = "__white";

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl SpriteVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x4, // color
        2 => Float32x2, // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }

    fn new(position: Vec2, color: [f32; 4], uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            color,
            uv: uv.to_array(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphSortType {
    None,
    FrontToBack,
    BackToFront,
    #[default]
    Texture,
}

/// One queued quad, already expanded to its four corners
/// (top-left, bottom-left, bottom-right, top-right).
#[derive(Debug, Clone)]
pub struct Glyph {
    pub texture: Arc<str>,
    pub depth: f32,
    pub corners: [SpriteVertex; 4],
}

impl Glyph {
    /// `dest` and `uv` are `(x, y, w, h)` with `x, y` the bottom-left corner.
    /// The quad is rotated by `angle` radians about its centre.
    pub fn new(
        dest: Vec4,
        uv: Vec4,
        texture: Arc<str>,
        depth: f32,
        color: ColorRGBA8,
        angle: f32,
    ) -> Self {
        let color = color.to_f32_array();
        let half = Vec2::new(dest.z, dest.w) * 0.5;
        let center = Vec2::new(dest.x, dest.y) + half;

        let mut local = [
            Vec2::new(-half.x, half.y),
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
        ];
        if angle != 0.0 {
            for corner in &mut local {
                *corner = ben_core::geometry::rotate(*corner, angle);
            }
        }

        let uvs = [
            Vec2::new(uv.x, uv.y + uv.w),
            Vec2::new(uv.x, uv.y),
            Vec2::new(uv.x + uv.z, uv.y),
            Vec2::new(uv.x + uv.z, uv.y + uv.w),
        ];

        Self {
            texture,
            depth,
            corners: std::array::from_fn(|i| SpriteVertex::new(center + local[i], color, uvs[i])),
        }
    }
}

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub texture: Arc<str>,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Debug, Default)]
pub struct SpriteBatch {
    sort_type: GlyphSortType,
    glyphs: Vec<Glyph>,
    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
    draw_calls: Vec<DrawCall>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything queued or built so far and start a new batch.
    pub fn begin(&mut self, sort_type: GlyphSortType) {
        self.sort_type = sort_type;
        self.glyphs.clear();
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
    }

    pub fn draw(&mut self, dest: Vec4, uv: Vec4, texture: &str, depth: f32, color: ColorRGBA8) {
        self.draw_rotated(dest, uv, texture, depth, color, 0.0);
    }

    pub fn draw_rotated(
        &mut self,
        dest: Vec4,
        uv: Vec4,
        texture: &str,
        depth: f32,
        color: ColorRGBA8,
        angle: f32,
    ) {
        self.glyphs
            .push(Glyph::new(dest, uv, Arc::from(texture), depth, color, angle));
    }

    /// Rotate so the quad's x axis points along `direction`.
    pub fn draw_facing(
        &mut self,
        dest: Vec4,
        uv: Vec4,
        texture: &str,
        depth: f32,
        color: ColorRGBA8,
        direction: Vec2,
    ) {
        let angle = direction.y.atan2(direction.x);
        self.draw_rotated(dest, uv, texture, depth, color, angle);
    }

    /// Sort the queued glyphs and build the mesh.
    pub fn end(&mut self) {
        self.sort_glyphs();
        self.build_mesh();
    }

    fn sort_glyphs(&mut self) {
        // Stable sorts keep submission order among equal keys.
        match self.sort_type {
            GlyphSortType::None => {}
            GlyphSortType::FrontToBack => self
                .glyphs
                .sort_by(|a, b| a.depth.total_cmp(&b.depth)),
            GlyphSortType::BackToFront => self
                .glyphs
                .sort_by(|a, b| b.depth.total_cmp(&a.depth)),
            GlyphSortType::Texture => self.glyphs.sort_by(|a, b| a.texture.cmp(&b.texture)),
        }
    }

    fn build_mesh(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
        self.vertices.reserve(self.glyphs.len() * 4);
        self.indices.reserve(self.glyphs.len() * 6);

        for glyph in &self.glyphs {
            let base = self.vertices.len() as u32;
            self.vertices.extend_from_slice(&glyph.corners);
            let index_start = self.indices.len() as u32;
            self.indices
                .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
            push_draw_call(&mut self.draw_calls, glyph.texture.clone(), index_start, 6);
        }
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }
}

/// Append a draw call, merging with the previous one when the texture matches
/// and the index ranges are contiguous.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture: Arc<str>,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if last.texture == texture && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture,
        index_start,
        index_count,
    });
}

/// Number of texture rebinds a sequence of draw calls needs.
pub fn count_texture_binds(draw_calls: &[DrawCall]) -> usize {
    let mut binds = 0usize;
    let mut current: Option<&str> = None;
    for draw in draw_calls {
        let key: &str = &draw.texture;
        if current != Some(key) {
            current = Some(key);
            binds += 1;
        }
    }
    binds
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_UV: Vec4 = Vec4::new(0.0, 0.0, 1.0, 1.0);

    fn quad(batch: &mut SpriteBatch, texture: &str, depth: f32) {
        batch.draw(
            Vec4::new(0.0, 0.0, 1.0, 1.0),
            FULL_UV,
            texture,
            depth,
            ColorRGBA8::WHITE,
        );
    }

    #[test]
    fn consecutive_same_texture_glyphs_share_a_draw_call() {
        let mut batch = SpriteBatch::new();
        batch.begin(GlyphSortType::None);
        quad(&mut batch, "bricks", 0.0);
        quad(&mut batch, "bricks", 0.0);
        quad(&mut batch, "ninja", 0.0);
        quad(&mut batch, "bricks", 0.0);
        batch.end();

        let calls = batch.draw_calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].index_count, 12);
        assert_eq!(&*calls[1].texture, "ninja");
        assert_eq!(calls[2].index_start, 18);
        assert_eq!(batch.vertices().len(), 16);
        assert_eq!(batch.indices().len(), 24);
    }

    #[test]
    fn texture_sort_groups_draw_calls() {
        let mut batch = SpriteBatch::new();
        batch.begin(GlyphSortType::Texture);
        quad(&mut batch, "b", 0.0);
        quad(&mut batch, "a", 0.0);
        quad(&mut batch, "b", 0.0);
        batch.end();
        assert_eq!(batch.draw_calls().len(), 2);
        assert_eq!(count_texture_binds(batch.draw_calls()), 2);
    }

    #[test]
    fn depth_sorts_are_stable_and_directional() {
        let mut batch = SpriteBatch::new();
        batch.begin(GlyphSortType::FrontToBack);
        quad(&mut batch, "far", 2.0);
        quad(&mut batch, "near", 0.0);
        quad(&mut batch, "mid", 1.0);
        batch.end();
        let order: Vec<&str> = batch.glyphs().iter().map(|g| &*g.texture).collect();
        assert_eq!(order, vec!["near", "mid", "far"]);

        batch.begin(GlyphSortType::BackToFront);
        quad(&mut batch, "near", 0.0);
        quad(&mut batch, "far", 2.0);
        batch.end();
        assert_eq!(&*batch.glyphs()[0].texture, "far");
    }

    #[test]
    fn glyph_corners_follow_dest_and_uv_rects() {
        let glyph = Glyph::new(
            Vec4::new(1.0, 2.0, 4.0, 2.0),
            Vec4::new(0.1, 0.0, 0.1, 0.5),
            Arc::from("t"),
            0.0,
            ColorRGBA8::WHITE,
            0.0,
        );
        assert_eq!(glyph.corners[0].position, [1.0, 4.0]);
        assert_eq!(glyph.corners[2].position, [5.0, 2.0]);
        assert_eq!(glyph.corners[0].uv, [0.1, 0.5]);
        assert!((glyph.corners[2].uv[0] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn rotation_is_about_the_centre() {
        let glyph = Glyph::new(
            Vec4::new(-1.0, -0.5, 2.0, 1.0),
            FULL_UV,
            Arc::from("t"),
            0.0,
            ColorRGBA8::WHITE,
            std::f32::consts::FRAC_PI_2,
        );
        // Bottom-right (1, -0.5) turns to (0.5, 1).
        let br = glyph.corners[2].position;
        assert!((br[0] - 0.5).abs() < 1e-6 && (br[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn begin_clears_previous_frame() {
        let mut batch = SpriteBatch::new();
        batch.begin(GlyphSortType::None);
        quad(&mut batch, "x", 0.0);
        batch.end();
        batch.begin(GlyphSortType::None);
        batch.end();
        assert!(batch.is_empty());
        assert!(batch.draw_calls().is_empty());
    }
}
