//! Configuration and host seams for the ASCII post-process effect.
//!
//! The pixel-to-glyph conversion itself is supplied by the host rendering
//! library; this module only describes what the bridge hands to it and what
//! it expects back.

use crate::constants::*;
use crate::error::BridgeError;
use crate::scene::SceneGraph;
use crate::state::{Camera, Viewport};
use std::fmt;
use std::rc::Rc;

/// Ordered glyph sequence used by the effect, sparse to dense.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CharacterRamp(Rc<str>);

impl CharacterRamp {
    pub fn new(glyphs: &str) -> Result<Self, BridgeError> {
        if glyphs.is_empty() {
            return Err(BridgeError::EmptyRamp);
        }
        Ok(Self(Rc::from(glyphs)))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of glyphs (not bytes).
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CharacterRamp {
    fn default() -> Self {
        Self(Rc::from(DEFAULT_CHARACTERS))
    }
}

impl fmt::Debug for CharacterRamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharacterRamp({:?})", &*self.0)
    }
}

/// Glyph sampling density used by the host effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrResolution {
    #[default]
    Low,
    Medium,
    High,
}

impl StrResolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrResolution::Low => "low",
            StrResolution::Medium => "medium",
            StrResolution::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(StrResolution::Low),
            "medium" => Some(StrResolution::Medium),
            "high" => Some(StrResolution::High),
            _ => None,
        }
    }
}

/// Options passed through to the host effect untouched.
///
/// Only `invert` takes part in the rebuild decision (see [`EffectKey`]).
#[derive(Clone, Debug, PartialEq)]
pub struct EffectOptions {
    pub resolution: f32,
    pub scale: f32,
    pub color: bool,
    pub alpha: bool,
    pub block: bool,
    pub invert: bool,
    pub str_resolution: StrResolution,
}

impl Default for EffectOptions {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_EFFECT_RESOLUTION,
            scale: DEFAULT_EFFECT_SCALE,
            color: false,
            alpha: false,
            block: false,
            invert: false,
            str_resolution: StrResolution::Low,
        }
    }
}

/// Memoization key deciding when the effect instance is rebuilt.
///
/// Deliberately narrow: changes to any other [`EffectOptions`] field are
/// recorded but do not produce a new effect.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EffectKey {
    pub characters: CharacterRamp,
    pub invert: bool,
}

/// Composition-time configuration of one effect bridge.
#[derive(Clone, Debug, PartialEq)]
pub struct BridgeConfig {
    pub render_order: i32,
    pub characters: CharacterRamp,
    pub options: EffectOptions,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            render_order: DEFAULT_RENDER_ORDER,
            characters: CharacterRamp::default(),
            options: EffectOptions::default(),
        }
    }
}

impl BridgeConfig {
    pub fn with_characters(mut self, characters: CharacterRamp) -> Self {
        self.characters = characters;
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.options.invert = invert;
        self
    }

    pub fn with_render_order(mut self, render_order: i32) -> Self {
        self.render_order = render_order;
        self
    }

    pub fn key(&self) -> EffectKey {
        EffectKey {
            characters: self.characters.clone(),
            invert: self.options.invert,
        }
    }

    /// Overlay defaults with `(name, value)` attribute pairs, e.g. the
    /// `data-*` attributes of the host canvas with the prefix stripped.
    ///
    /// Unknown names are ignored; unparsable values keep the current value.
    pub fn apply_attributes<I, K, V>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in attrs {
            let (name, value) = (name.as_ref(), value.as_ref());
            let applied = match name {
                "characters" => CharacterRamp::new(value)
                    .map(|ramp| self.characters = ramp)
                    .is_ok(),
                "render-order" => value
                    .trim()
                    .parse()
                    .map(|order| self.render_order = order)
                    .is_ok(),
                "invert" => parse_flag(value).map(|v| self.options.invert = v).is_some(),
                "color" => parse_flag(value).map(|v| self.options.color = v).is_some(),
                "alpha" => parse_flag(value).map(|v| self.options.alpha = v).is_some(),
                "block" => parse_flag(value).map(|v| self.options.block = v).is_some(),
                "resolution" => parse_positive(value)
                    .map(|v| self.options.resolution = v)
                    .is_some(),
                "scale" => parse_positive(value).map(|v| self.options.scale = v).is_some(),
                "str-resolution" => StrResolution::parse(value)
                    .map(|v| self.options.str_resolution = v)
                    .is_some(),
                _ => true,
            };
            if !applied {
                log::warn!("[config] ignoring {}={:?}; keeping default", name, value);
            }
        }
        self
    }
}

// A bare attribute (empty value) counts as set.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_positive(value: &str) -> Option<f32> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Fixed styling of the overlay element: pinned to the top-left corner of
/// the container, white glyphs on black, transparent to pointer input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayStyle {
    pub foreground: &'static str,
    pub background: &'static str,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            foreground: OVERLAY_FOREGROUND,
            background: OVERLAY_BACKGROUND,
        }
    }
}

impl OverlayStyle {
    /// CSS `(property, value)` pairs in application order.
    pub fn properties(&self) -> [(&'static str, &'static str); 6] {
        [
            ("position", "absolute"),
            ("top", "0px"),
            ("left", "0px"),
            ("color", self.foreground),
            ("background-color", self.background),
            ("pointer-events", "none"),
        ]
    }

    pub fn css(&self) -> String {
        self.properties()
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v))
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// The host's ASCII post-process pass.
pub trait AsciiEffect {
    /// Element the effect writes its glyphs into.
    type Overlay;

    fn overlay(&self) -> &Self::Overlay;
    fn apply_overlay_style(&mut self, style: &OverlayStyle);
    fn set_size(&mut self, size: Viewport);
    fn render(&mut self, scene: &SceneGraph, camera: &Camera);
}

/// Builds effect instances from the memoized inputs.
pub trait EffectFactory {
    type Effect: AsciiEffect;

    fn build(&mut self, characters: &CharacterRamp, options: &EffectOptions) -> Self::Effect;
}

/// The element that hosts the overlay next to the native canvas.
pub trait OverlayContainer<E> {
    fn append_child(&mut self, element: &E) -> Result<(), BridgeError>;
    fn remove_child(&mut self, element: &E) -> Result<(), BridgeError>;
    fn contains(&self, element: &E) -> bool;
}
