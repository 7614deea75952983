//! Host-side state types shared by the render loop, the stage and the web
//! frontend.
//!
//! These types avoid referencing platform-specific APIs so they can be used
//! both in host tests and inside the wasm frontend.

use crate::constants::*;
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: CAMERA_EYE,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: CAMERA_FOVY_DEGREES.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Compute a world-space ray through a point in normalized device
    /// coordinates (`x` right, `y` up, both in -1..1).
    ///
    /// Returns `(ray_origin, ray_direction)` in world space.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> (Vec3, Vec3) {
        let inv = (self.projection_matrix() * self.view_matrix()).inverse();
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        let ro = self.eye;
        let rd = (p1 - ro).normalize();
        (ro, rd)
    }
}

/// Pixel size of the host viewport.
///
/// A zero-sized viewport is a valid transient state (e.g. during layout)
/// and is carried around rather than rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Build from CSS-pixel measurements; negative or non-finite values clamp to 0.
    pub fn from_css(width: f64, height: f64) -> Self {
        let clamp = |v: f64| if v.is_finite() && v > 0.0 { v as u32 } else { 0 };
        Self::new(clamp(width), clamp(height))
    }

    #[inline]
    pub fn is_renderable(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Map a pixel position inside the viewport to normalized device coordinates.
    #[inline]
    pub fn to_ndc(&self, px: Vec2) -> Vec2 {
        let w = self.width.max(1) as f32;
        let h = self.height.max(1) as f32;
        Vec2::new((2.0 * px.x / w) - 1.0, 1.0 - (2.0 * px.y / h))
    }
}

/// Linear RGB color in the 0..1 range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    pub fn hex(&self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }
}

/// Accumulated host time, advanced once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clock {
    pub elapsed: f64,
    pub delta: f32,
    pub frames: u64,
}

impl Clock {
    pub fn advance(&mut self, delta: f32) {
        self.delta = delta;
        self.elapsed += delta as f64;
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_hex_round_trips_palette() {
        assert_eq!(Color::from_hex(BASE_COLOR_HEX).hex(), BASE_COLOR_HEX);
        assert_eq!(Color::from_hex(HIGHLIGHT_COLOR_HEX), Color::WHITE);
    }

    #[test]
    fn viewport_from_css_clamps_negative() {
        assert_eq!(Viewport::from_css(-4.0, 12.7), Viewport::new(0, 12));
        assert_eq!(Viewport::from_css(f64::NAN, 3.0), Viewport::new(0, 3));
        assert!(!Viewport::from_css(0.0, 10.0).is_renderable());
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = Camera::default();
        let (ro, rd) = cam.ray_from_ndc(Vec2::ZERO);
        assert_eq!(ro, CAMERA_EYE);
        assert!((rd - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-4);
    }
}
