//! Host composition: owns the frame state and render loop, mounts the
//! scene's components and routes viewport and pointer input to them.

use crate::bridge::{EffectBridge, OverlayOf};
use crate::constants::SHAPE_PRIORITY;
use crate::effect::{BridgeConfig, EffectFactory, OverlayContainer};
use crate::error::BridgeError;
use crate::picking;
use crate::render_loop::{FrameState, FrameSubscriber, RenderLoop, SubscriptionId};
use crate::scene::{NodeId, SceneGraph};
use crate::shape::PointerEvent;
use crate::state::{Camera, Viewport};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

/// The host's default draw, used on ticks where no subscriber took over.
pub trait SceneRenderer {
    fn set_size(&mut self, viewport: Viewport);
    fn render(&mut self, scene: &SceneGraph, camera: &Camera);
}

/// Rotates one shape node every tick.
pub struct ShapeSpin {
    node: NodeId,
}

impl ShapeSpin {
    pub fn new(node: NodeId) -> Self {
        Self { node }
    }
}

impl FrameSubscriber for ShapeSpin {
    fn on_frame(&mut self, state: &mut FrameState, delta: f32) {
        if let Some(shape) = state.scene.shape_mut(self.node) {
            shape.on_frame(delta);
        }
    }
}

pub type SharedBridge<F, C> = Rc<RefCell<EffectBridge<F, C>>>;

pub struct MountedEffect<F: EffectFactory, C> {
    pub node: NodeId,
    pub subscription: SubscriptionId,
    pub bridge: SharedBridge<F, C>,
}

/// What [`Stage::compose`] mounted. Effects that failed to attach are
/// reported here; the rest of the scene keeps running.
pub struct Composition<F: EffectFactory, C> {
    pub spins: Vec<SubscriptionId>,
    pub effects: Vec<MountedEffect<F, C>>,
    pub failed: Vec<(NodeId, BridgeError)>,
}

pub struct Stage<R> {
    state: FrameState,
    render_loop: RenderLoop,
    renderer: R,
    hovered: Option<NodeId>,
    default_draws: u64,
}

impl<R: SceneRenderer> Stage<R> {
    pub fn new(scene: SceneGraph, mut camera: Camera, viewport: Viewport, mut renderer: R) -> Self {
        if viewport.is_renderable() {
            camera.aspect = viewport.aspect();
            renderer.set_size(viewport);
        }
        Self {
            state: FrameState::new(scene, camera, viewport),
            render_loop: RenderLoop::new(),
            renderer,
            hovered: None,
            default_draws: 0,
        }
    }

    pub fn state(&self) -> &FrameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FrameState {
        &mut self.state
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.state.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.state.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.state.viewport
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    /// Ticks on which the host's own renderer drew the scene.
    pub fn default_draws(&self) -> u64 {
        self.default_draws
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Register a subscriber; it immediately receives the current viewport.
    pub fn subscribe(
        &mut self,
        priority: i32,
        mut subscriber: Box<dyn FrameSubscriber>,
    ) -> SubscriptionId {
        subscriber.on_resize(self.state.viewport);
        self.render_loop.subscribe(priority, subscriber)
    }

    pub fn on_frame(
        &mut self,
        priority: i32,
        f: impl FnMut(&mut FrameState, f32) + 'static,
    ) -> SubscriptionId {
        self.render_loop.on_frame(priority, f)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.render_loop.unsubscribe(id)
    }

    /// Mount one effect bridge at its configured render order.
    pub fn mount_effect<F, C>(
        &mut self,
        node: NodeId,
        config: BridgeConfig,
        factory: F,
        container: Option<C>,
    ) -> Result<MountedEffect<F, C>, BridgeError>
    where
        F: EffectFactory + 'static,
        C: OverlayContainer<OverlayOf<F>> + 'static,
    {
        let priority = config.render_order;
        let mut bridge = EffectBridge::new(config, factory, container);
        bridge.mount(self.state.viewport)?;
        let bridge = Rc::new(RefCell::new(bridge));
        let subscription = self.render_loop.subscribe(priority, Box::new(bridge.clone()));
        Ok(MountedEffect {
            node,
            subscription,
            bridge,
        })
    }

    /// Reconfigure a mounted bridge. A changed render order moves its
    /// subscription, so dispatch order and takeover follow the new value.
    pub fn configure_effect<F, C>(
        &mut self,
        mounted: &MountedEffect<F, C>,
        config: BridgeConfig,
    ) -> Result<bool, BridgeError>
    where
        F: EffectFactory + 'static,
        C: OverlayContainer<OverlayOf<F>> + 'static,
    {
        let priority = config.render_order;
        let moved = mounted.bridge.borrow().render_order() != priority;
        let rebuilt = mounted.bridge.borrow_mut().configure(config)?;
        if moved {
            self.render_loop.reprioritize(mounted.subscription, priority);
        }
        Ok(rebuilt)
    }

    /// Mount every component the scene describes: a spin subscriber per
    /// shape and a bridge per effect node, built by `backend`.
    pub fn compose<F, C>(
        &mut self,
        mut backend: impl FnMut(&BridgeConfig) -> (F, Option<C>),
    ) -> Composition<F, C>
    where
        F: EffectFactory + 'static,
        C: OverlayContainer<OverlayOf<F>> + 'static,
    {
        let shapes: Vec<NodeId> = self.state.scene.shapes().map(|(id, _)| id).collect();
        let spins: Vec<SubscriptionId> = shapes
            .into_iter()
            .map(|id| {
                self.render_loop
                    .subscribe(SHAPE_PRIORITY, Box::new(ShapeSpin::new(id)))
            })
            .collect();

        let configs: Vec<(NodeId, BridgeConfig)> = self
            .state
            .scene
            .effects()
            .map(|(id, cfg)| (id, cfg.clone()))
            .collect();
        let mut effects = Vec::new();
        let mut failed = Vec::new();
        for (node, config) in configs {
            let (factory, container) = backend(&config);
            match self.mount_effect(node, config, factory, container) {
                Ok(mounted) => effects.push(mounted),
                Err(e) => {
                    log::error!("[stage] effect {:?} not mounted: {}", node, e);
                    failed.push((node, e));
                }
            }
        }
        log::info!(
            "[stage] composed {} shape(s), {} effect(s), {} failed",
            spins.len(),
            effects.len(),
            failed.len()
        );
        Composition {
            spins,
            effects,
            failed,
        }
    }

    /// Run one host tick: dispatch subscribers, then draw unless a
    /// subscriber took over rendering.
    pub fn advance(&mut self, delta: f32) {
        self.render_loop.tick(&mut self.state, delta);
        if !self.render_loop.takes_over_rendering() {
            self.renderer.render(&self.state.scene, &self.state.camera);
            self.default_draws += 1;
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport == self.state.viewport {
            return;
        }
        self.state.viewport = viewport;
        if viewport.is_renderable() {
            self.state.camera.aspect = viewport.aspect();
            self.renderer.set_size(viewport);
        }
        self.render_loop.notify_resize(viewport);
    }

    /// Deliver a pointer event to a shape node. Returns `false` if the node
    /// is not a shape.
    pub fn dispatch_pointer(&mut self, node: NodeId, event: PointerEvent) -> bool {
        match self.state.scene.shape_mut(node) {
            Some(shape) => {
                shape.handle_pointer(event);
                log::debug!("[pointer] {:?} -> {:?}", event, node);
                true
            }
            None => false,
        }
    }

    /// Update hover from a pointer position in NDC, emitting leave/enter
    /// when the shape under the pointer changes.
    pub fn pointer_move(&mut self, ndc: Vec2) -> Option<NodeId> {
        let hit = picking::pick(&self.state.scene, &self.state.camera, ndc);
        if hit != self.hovered {
            if let Some(prev) = self.hovered {
                self.dispatch_pointer(prev, PointerEvent::Leave);
            }
            if let Some(next) = hit {
                self.dispatch_pointer(next, PointerEvent::Enter);
            }
            self.hovered = hit;
        }
        hit
    }

    pub fn pointer_exit(&mut self) {
        if let Some(prev) = self.hovered.take() {
            self.dispatch_pointer(prev, PointerEvent::Leave);
        }
    }

    pub fn click(&mut self, ndc: Vec2) -> Option<NodeId> {
        let hit = picking::pick(&self.state.scene, &self.state.camera, ndc);
        if let Some(node) = hit {
            self.dispatch_pointer(node, PointerEvent::Click);
        }
        hit
    }

    /// Unmount every subscriber; mounted bridges detach their overlays.
    pub fn teardown(&mut self) {
        self.pointer_exit();
        self.render_loop.clear();
    }
}
