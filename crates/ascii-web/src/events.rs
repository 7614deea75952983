use crate::SharedStage;
use ascii_core::Viewport;
use glam::Vec2;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_pointer_handlers(canvas: &web::HtmlCanvasElement, stage: &SharedStage) {
    wire_pointermove(canvas, stage.clone());
    wire_pointerleave(canvas, stage.clone());
    wire_click(canvas, stage.clone());
}

/// Pointer position in normalized device coordinates of the canvas.
#[inline]
fn pointer_ndc(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    Viewport::from_css(rect.width(), rect.height()).to_ndc(Vec2::new(x_css, y_css))
}

fn wire_pointermove(canvas: &web::HtmlCanvasElement, stage: SharedStage) {
    let canvas_for_ndc = canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let ndc = pointer_ndc(&ev, &canvas_for_ndc);
        let mut stage = stage.borrow_mut();
        let before = stage.hovered();
        let after = stage.pointer_move(ndc);
        if before != after {
            log::debug!("[pointer] hover {:?} -> {:?}", before, after);
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerleave(canvas: &web::HtmlCanvasElement, stage: SharedStage) {
    let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        stage.borrow_mut().pointer_exit();
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("pointerleave", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_click(canvas: &web::HtmlCanvasElement, stage: SharedStage) {
    let canvas_for_ndc = canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let ndc = pointer_ndc(&ev, &canvas_for_ndc);
        let mut stage = stage.borrow_mut();
        if let Some(node) = stage.click(ndc) {
            let scale = stage.scene().shape(node).map(|s| s.scale()).unwrap_or(1.0);
            log::info!("[click] {:?} scale={}", node, scale);
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Keep the stage's viewport in step with the canvas's laid-out size.
pub fn wire_resize(canvas: &web::HtmlCanvasElement, stage: &SharedStage) {
    let canvas_resize = canvas.clone();
    let stage = stage.clone();
    let closure = Closure::wrap(Box::new(move || {
        let viewport = crate::dom::canvas_viewport(&canvas_resize);
        stage.borrow_mut().set_viewport(viewport);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
