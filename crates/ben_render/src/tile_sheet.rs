use glam::{UVec2, Vec4};

/// A texture split into a uniform grid of tiles.
///
/// Tile 0 is the bottom-left cell; indices run left to right, then upwards,
/// matching the y-up uv space the sprite shader flips on sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSheet {
    pub texture: String,
    pub dims: UVec2,
}

impl TileSheet {
    pub fn new(texture: impl Into<String>, dims: UVec2) -> Self {
        Self {
            texture: texture.into(),
            dims: dims.max(UVec2::ONE),
        }
    }

    pub fn tile_count(&self) -> u32 {
        self.dims.x * self.dims.y
    }

    /// UV rect `(x, y, w, h)` of tile `index`. Indices past the end wrap.
    pub fn uvs(&self, index: u32) -> Vec4 {
        let index = index % self.tile_count();
        let x_tile = index % self.dims.x;
        let y_tile = index / self.dims.x;
        let w = 1.0 / self.dims.x as f32;
        let h = 1.0 / self.dims.y as f32;
        Vec4::new(x_tile as f32 * w, y_tile as f32 * h, w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uvs_walk_rows_then_columns() {
        let sheet = TileSheet::new("Assets/blue_ninja.png", UVec2::new(10, 2));
        assert_eq!(sheet.uvs(0), Vec4::new(0.0, 0.0, 0.1, 0.5));
        let running = sheet.uvs(13);
        assert!((running.x - 0.3).abs() < 1e-6);
        assert_eq!(running.y, 0.5);
    }

    #[test]
    fn out_of_range_index_wraps() {
        let sheet = TileSheet::new("t", UVec2::new(4, 4));
        assert_eq!(sheet.uvs(17), sheet.uvs(1));
    }

    #[test]
    fn zero_dims_are_clamped() {
        let sheet = TileSheet::new("t", UVec2::new(0, 3));
        assert_eq!(sheet.dims, UVec2::new(1, 3));
        assert_eq!(sheet.tile_count(), 3);
    }
}
