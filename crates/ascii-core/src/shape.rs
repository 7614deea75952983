use crate::constants::*;
use crate::state::Color;
use glam::Vec3;

/// Geometry descriptor handed to the host engine when the shape is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeKind {
    Octahedron { radius: f32, detail: u32 },
    Cube { size: f32 },
    Sphere { radius: f32 },
}

impl Default for ShapeKind {
    fn default() -> Self {
        ShapeKind::Octahedron {
            radius: OCTAHEDRON_RADIUS,
            detail: OCTAHEDRON_DETAIL,
        }
    }
}

impl ShapeKind {
    /// Radius of a sphere enclosing the unscaled geometry; used for picking.
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            ShapeKind::Octahedron { radius, .. } => radius,
            ShapeKind::Sphere { radius } => radius,
            ShapeKind::Cube { size } => size * 0.5 * 3f32.sqrt(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeMaterial {
    pub base_color: Color,
    pub highlight_color: Color,
}

impl Default for ShapeMaterial {
    fn default() -> Self {
        Self {
            base_color: Color::from_hex(BASE_COLOR_HEX),
            highlight_color: Color::from_hex(HIGHLIGHT_COLOR_HEX),
        }
    }
}

/// Pointer events delivered by the host for a single renderable object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Enter,
    Leave,
    Click,
}

/// One renderable object with its transform and interaction state.
///
/// Scale and color are never stored; they are derived from the two
/// interaction flags on every read.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderableShape {
    pub kind: ShapeKind,
    pub material: ShapeMaterial,
    pub position: Vec3,
    rotation: Vec3,
    hovered: bool,
    clicked: bool,
}

impl Default for RenderableShape {
    fn default() -> Self {
        Self::new(ShapeKind::default())
    }
}

impl RenderableShape {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            material: ShapeMaterial::default(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            hovered: false,
            clicked: false,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_material(mut self, material: ShapeMaterial) -> Self {
        self.material = material;
        self
    }

    /// Advance rotation for one host tick.
    ///
    /// X and Y share one accumulator: both axes receive the same increment,
    /// so the shape tumbles diagonally.
    pub fn on_frame(&mut self, delta: f32) {
        let step = delta * ROTATION_RATE;
        self.rotation.x += step;
        self.rotation.y += step;
    }

    pub fn on_pointer_enter(&mut self) {
        self.hovered = true;
    }

    pub fn on_pointer_leave(&mut self) {
        self.hovered = false;
    }

    pub fn on_click(&mut self) {
        self.clicked = !self.clicked;
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Enter => self.on_pointer_enter(),
            PointerEvent::Leave => self.on_pointer_leave(),
            PointerEvent::Click => self.on_click(),
        }
    }

    #[inline]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    #[inline]
    pub fn is_clicked(&self) -> bool {
        self.clicked
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        if self.clicked {
            CLICKED_SCALE
        } else {
            BASE_SCALE
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        if self.hovered {
            self.material.highlight_color
        } else {
            self.material.base_color
        }
    }

    /// World-space bounding sphere radius at the current scale.
    #[inline]
    pub fn pick_radius(&self) -> f32 {
        self.kind.bounding_radius() * self.scale()
    }
}
