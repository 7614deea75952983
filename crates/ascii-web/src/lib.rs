#![cfg(target_arch = "wasm32")]
use ascii_core::{demo_scene_with, BridgeConfig, Camera, Stage, CONTROLS_PRIORITY};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod constants;
mod dom;
mod effect;
mod events;
mod frame;
mod host;
mod three;

use effect::ThreeAsciiFactory;
use host::{HostRenderer, ThreeHost};

pub(crate) type SharedStage = Rc<RefCell<Stage<HostRenderer>>>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ascii-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id(constants::CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", constants::CANVAS_ID))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let config = dom::read_bridge_config(&canvas, BridgeConfig::default().with_invert(true));
    log::info!(
        "[config] characters={:?} invert={} render_order={}",
        config.characters.as_str(),
        config.options.invert,
        config.render_order
    );

    let scene = demo_scene_with(config);
    let viewport = dom::canvas_viewport(&canvas);
    let mut camera = Camera::default();
    if viewport.is_renderable() {
        camera.aspect = viewport.aspect();
    }
    let host = Rc::new(RefCell::new(ThreeHost::new(&canvas, &scene, &camera)?));

    let stage: SharedStage = Rc::new(RefCell::new(Stage::new(
        scene,
        camera,
        viewport,
        HostRenderer(host.clone()),
    )));

    {
        let mut st = stage.borrow_mut();

        // Orbit controls settle the camera before anything reads it.
        let host_controls = host.clone();
        st.on_frame(CONTROLS_PRIORITY, move |state, _delta| {
            host_controls.borrow_mut().update_controls(&mut state.camera);
        });

        let composition = st.compose(|_cfg| {
            (
                ThreeAsciiFactory::new(host.clone()),
                dom::DomContainer::for_canvas(&canvas),
            )
        });
        for (node, e) in &composition.failed {
            log::error!("[init] effect {:?} unavailable: {}", node, e);
        }
        let eye = st.camera().eye;
        log::info!(
            "[init] viewport={}x{} eye=({:.2},{:.2},{:.2}) subscribers={:?}",
            viewport.width,
            viewport.height,
            eye.x,
            eye.y,
            eye.z,
            st.render_loop().priorities()
        );
    }

    events::wire_resize(&canvas, &stage);
    events::wire_pointer_handlers(&canvas, &stage);
    frame::start_loop(stage);
    Ok(())
}
