// Browser-side constants.

// Host element ids
pub const CANVAS_ID: &str = "app-canvas";

// `data-*` attributes on the canvas that configure the ASCII effect
pub const CONFIG_ATTRIBUTES: [&str; 9] = [
    "characters",
    "invert",
    "render-order",
    "resolution",
    "scale",
    "color",
    "alpha",
    "block",
    "str-resolution",
];

// Tessellation for sphere shapes (width, height segments)
pub const SPHERE_SEGMENTS: (u32, u32) = (32, 16);
