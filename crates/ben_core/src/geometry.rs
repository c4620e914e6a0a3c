use glam::{Vec2, Vec4};

/// Axis-aligned rectangle given by its minimum corner and size.
///
/// Used both in window pixels (UI hit tests) and in world units
/// (sprite destination rects, where `x, y` is the bottom-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn centered(center: Vec2, dims: Vec2) -> Self {
        Self::new(center.x - dims.x * 0.5, center.y - dims.y * 0.5, dims.x, dims.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Inclusive on all edges.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn as_vec4(&self) -> Vec4 {
        Vec4::new(self.x, self.y, self.w, self.h)
    }
}

impl From<Vec4> for Rect {
    fn from(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

pub fn point_in_circle(p: Vec2, center: Vec2, radius: f32) -> bool {
    p.distance_squared(center) <= radius * radius
}

/// Rotate `v` counter-clockwise by `angle` radians.
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive() {
        let r = Rect::new(0.0, 0.0, 260.0, 1080.0);
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(260.0, 1080.0)));
        assert!(!r.contains(Vec2::new(260.5, 10.0)));
        assert!(!r.contains(Vec2::new(10.0, -0.5)));
    }

    #[test]
    fn centered_round_trips_center() {
        let r = Rect::centered(Vec2::new(5.0, -10.0), Vec2::new(1.5, 1.5));
        assert_eq!(r.center(), Vec2::new(5.0, -10.0));
        assert_eq!(r.x, 4.25);
    }

    #[test]
    fn point_in_circle_includes_boundary() {
        let c = Vec2::new(3.0, 3.0);
        assert!(point_in_circle(Vec2::new(3.5, 3.0), c, 0.5));
        assert!(!point_in_circle(Vec2::new(3.51, 3.0), c, 0.5));
    }

    #[test]
    fn rotate_quarter_turn() {
        let v = rotate(Vec2::new(1.0, 0.0), std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }
}
