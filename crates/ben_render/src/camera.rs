use glam::{Mat4, Vec2};

/// Smallest scale `offset_scale` will settle on.
pub const MIN_SCALE: f32 = 0.001;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Orthographic 2D camera. `scale` is pixels per world unit; world space is
/// y-up, window pixels are y-down with the origin top-left.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec2,
    pub scale: f32,
    pub viewport: (u32, u32),
}

impl Camera {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            position: Vec2::ZERO,
            scale: 1.0,
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn offset_position(&mut self, offset: Vec2) {
        self.position += offset;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(MIN_SCALE);
    }

    pub fn offset_scale(&mut self, offset: f32) {
        self.set_scale(self.scale + offset);
    }

    fn half_extents(&self) -> Vec2 {
        Vec2::new(self.viewport.0 as f32, self.viewport.1 as f32) / (2.0 * self.scale)
    }

    pub fn view_proj(&self) -> Mat4 {
        let half = self.half_extents();
        Mat4::orthographic_rh(
            self.position.x - half.x,
            self.position.x + half.x,
            self.position.y - half.y,
            self.position.y + half.y,
            -1.0,
            1.0,
        )
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
        }
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let (w, h) = (self.viewport.0 as f32, self.viewport.1 as f32);
        let centered = Vec2::new(screen.x - w * 0.5, (h - screen.y) - h * 0.5);
        centered / self.scale + self.position
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let (w, h) = (self.viewport.0 as f32, self.viewport.1 as f32);
        let centered = (world - self.position) * self.scale;
        Vec2::new(centered.x + w * 0.5, h - (centered.y + h * 0.5))
    }

    /// Whether a box given by its bottom-left corner and size overlaps the view.
    pub fn is_box_in_view(&self, position: Vec2, dimensions: Vec2) -> bool {
        let half_view = self.half_extents();
        let min_distance = dimensions * 0.5 + half_view;
        let center = position + dimensions * 0.5;
        let distance = center - self.position;
        distance.x.abs() < min_distance.x && distance.y.abs() < min_distance.y
    }
}
