use crate::host::SharedHost;
use crate::three;
use ascii_core::{
    AsciiEffect, Camera, CharacterRamp, EffectFactory, EffectOptions, OverlayStyle, SceneGraph,
    Viewport,
};
use wasm_bindgen::JsValue;
use web_sys as web;

/// three-stdlib's `AsciiEffect`, rendering the mirrored scene.
pub struct ThreeAsciiEffect {
    inner: three::AsciiEffect,
    overlay: web::HtmlElement,
    host: SharedHost,
}

impl AsciiEffect for ThreeAsciiEffect {
    type Overlay = web::HtmlElement;

    fn overlay(&self) -> &web::HtmlElement {
        &self.overlay
    }

    fn apply_overlay_style(&mut self, style: &OverlayStyle) {
        let css = self.overlay.style();
        for (name, value) in style.properties() {
            if let Err(e) = css.set_property(name, value) {
                log::warn!("[effect] style {}={} rejected: {:?}", name, value, e);
            }
        }
    }

    fn set_size(&mut self, size: Viewport) {
        self.inner.set_size(size.width as f64, size.height as f64);
    }

    fn render(&mut self, scene: &SceneGraph, camera: &Camera) {
        let mut host = self.host.borrow_mut();
        host.sync(scene, camera);
        self.inner.render(&host.scene, &host.camera);
    }
}

/// Builds [`ThreeAsciiEffect`]s bound to the shared three.js renderer.
pub struct ThreeAsciiFactory {
    host: SharedHost,
}

impl ThreeAsciiFactory {
    pub fn new(host: SharedHost) -> Self {
        Self { host }
    }
}

impl EffectFactory for ThreeAsciiFactory {
    type Effect = ThreeAsciiEffect;

    fn build(&mut self, characters: &CharacterRamp, options: &EffectOptions) -> ThreeAsciiEffect {
        let inner = {
            let host = self.host.borrow();
            three::AsciiEffect::new(&host.renderer, characters.as_str(), &options_object(options))
        };
        let overlay = inner.dom_element();
        ThreeAsciiEffect {
            inner,
            overlay,
            host: self.host.clone(),
        }
    }
}

fn options_object(options: &EffectOptions) -> JsValue {
    let obj = js_sys::Object::new();
    let entries: [(&str, JsValue); 7] = [
        ("resolution", (options.resolution as f64).into()),
        ("scale", (options.scale as f64).into()),
        ("color", options.color.into()),
        ("alpha", options.alpha.into()),
        ("block", options.block.into()),
        ("invert", options.invert.into()),
        ("strResolution", options.str_resolution.as_str().into()),
    ];
    for (key, value) in entries.iter() {
        // Setting a plain property on a fresh object cannot throw.
        _ = js_sys::Reflect::set(&obj, &JsValue::from_str(key), value);
    }
    obj.into()
}
