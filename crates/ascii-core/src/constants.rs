use glam::Vec3;

// Shared scene/effect tuning constants used by the core and the web frontend.

// Shape motion
pub const ROTATION_RATE: f32 = 0.5; // radians of rotation per second of frame delta, on both axes

// Shape sizing
pub const BASE_SCALE: f32 = 1.0; // idle shape size
pub const CLICKED_SCALE: f32 = 3.0; // size while toggled by a click

// Shape palette
pub const BASE_COLOR_HEX: u32 = 0xffa500; // orange
pub const HIGHLIGHT_COLOR_HEX: u32 = 0xffffff; // white
pub const BACKGROUND_COLOR_HEX: u32 = 0x000000; // black

// Octahedron geometry
pub const OCTAHEDRON_RADIUS: f32 = 1.0;
pub const OCTAHEDRON_DETAIL: u32 = 0;

// Lights
pub const SPOT_LIGHT_POSITION: Vec3 = Vec3::new(10.0, 10.0, 10.0);
pub const SPOT_LIGHT_ANGLE: f32 = 0.15;
pub const SPOT_LIGHT_PENUMBRA: f32 = 1.0;
pub const POINT_LIGHT_POSITION: Vec3 = Vec3::new(-10.0, -10.0, -10.0);
pub const LIGHT_INTENSITY: f32 = 1.0;

// Default camera (matches the host framework's canvas defaults)
pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 0.0, 5.0);
pub const CAMERA_FOVY_DEGREES: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// ASCII effect defaults
pub const DEFAULT_CHARACTERS: &str = " .:-+*=%@#"; // sparse -> dense
pub const DEFAULT_RENDER_ORDER: i32 = 1; // > 0 takes over the host draw
pub const DEFAULT_EFFECT_RESOLUTION: f32 = 0.15;
pub const DEFAULT_EFFECT_SCALE: f32 = 1.0;

// Render-loop priorities for the built-in subscribers
pub const CONTROLS_PRIORITY: i32 = -1; // camera controls settle before anything reads the camera
pub const SHAPE_PRIORITY: i32 = 0;

// Overlay styling
pub const OVERLAY_FOREGROUND: &str = "white";
pub const OVERLAY_BACKGROUND: &str = "black";
