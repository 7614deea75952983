use crate::constants::CONFIG_ATTRIBUTES;
use ascii_core::{BridgeConfig, BridgeError, OverlayContainer, Viewport};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// CSS-pixel size of the canvas as laid out by the page.
pub fn canvas_viewport(canvas: &web::HtmlCanvasElement) -> Viewport {
    let rect = canvas.get_bounding_client_rect();
    Viewport::from_css(rect.width(), rect.height())
}

/// Read `data-*` configuration attributes from `el` on top of `base`.
pub fn read_bridge_config(el: &web::Element, base: BridgeConfig) -> BridgeConfig {
    let attrs = CONFIG_ATTRIBUTES.iter().filter_map(|name| {
        el.get_attribute(&format!("data-{}", name))
            .map(|value| (*name, value))
    });
    base.apply_attributes(attrs)
}

/// The canvas's parent element, hosting the overlay next to the canvas.
pub struct DomContainer {
    parent: web::Element,
}

impl DomContainer {
    /// `None` when the canvas is not in the document yet.
    pub fn for_canvas(canvas: &web::HtmlCanvasElement) -> Option<Self> {
        canvas.parent_element().map(|parent| Self { parent })
    }
}

impl OverlayContainer<web::HtmlElement> for DomContainer {
    fn append_child(&mut self, element: &web::HtmlElement) -> Result<(), BridgeError> {
        self.parent
            .append_child(element)
            .map(|_| ())
            .map_err(|e| BridgeError::Host(format!("{:?}", e)))
    }

    fn remove_child(&mut self, element: &web::HtmlElement) -> Result<(), BridgeError> {
        if !self.contains(element) {
            return Ok(());
        }
        self.parent
            .remove_child(element)
            .map(|_| ())
            .map_err(|e| BridgeError::Host(format!("{:?}", e)))
    }

    fn contains(&self, element: &web::HtmlElement) -> bool {
        element
            .parent_element()
            .map(|p| p == self.parent)
            .unwrap_or(false)
    }
}
