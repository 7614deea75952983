//! Binds a host ASCII effect to the render loop.
//!
//! The bridge owns the effect instance and its overlay element. Lifecycle:
//! attach the overlay to the container, keep the effect sized to the
//! viewport, render the whole scene through it every tick, and detach the
//! overlay on teardown.

use crate::effect::{
    AsciiEffect, BridgeConfig, EffectFactory, EffectKey, OverlayContainer, OverlayStyle,
};
use crate::error::BridgeError;
use crate::render_loop::{FrameState, FrameSubscriber};
use crate::scene::SceneGraph;
use crate::state::{Camera, Viewport};

/// Overlay element type produced by a factory's effects.
pub type OverlayOf<F> = <<F as EffectFactory>::Effect as AsciiEffect>::Overlay;

pub struct EffectBridge<F: EffectFactory, C> {
    config: BridgeConfig,
    factory: F,
    container: Option<C>,
    style: OverlayStyle,
    effect: Option<F::Effect>,
    key: Option<EffectKey>,
    attached: bool,
    size: Option<Viewport>,
    builds: u64,
}

impl<F, C> EffectBridge<F, C>
where
    F: EffectFactory,
    C: OverlayContainer<OverlayOf<F>>,
{
    /// A bridge without a container can still be configured and sized, but
    /// [`attach`](Self::attach) fails with [`BridgeError::MissingContainer`].
    pub fn new(config: BridgeConfig, factory: F, container: Option<C>) -> Self {
        Self {
            config,
            factory,
            container,
            style: OverlayStyle::default(),
            effect: None,
            key: None,
            attached: false,
            size: None,
            builds: 0,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    #[inline]
    pub fn render_order(&self) -> i32 {
        self.config.render_order
    }

    pub fn effect(&self) -> Option<&F::Effect> {
        self.effect.as_ref()
    }

    pub fn container(&self) -> Option<&C> {
        self.container.as_ref()
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Last positive viewport size propagated to the effect.
    #[inline]
    pub fn size(&self) -> Option<Viewport> {
        self.size
    }

    /// Number of effect instances built so far.
    #[inline]
    pub fn builds(&self) -> u64 {
        self.builds
    }

    /// Build (or rebuild) the effect if its memoization key changed.
    /// Returns `true` when a new instance was created. A rebuild is refused
    /// while the previous overlay is still in the container.
    fn ensure_effect(&mut self) -> Result<bool, BridgeError> {
        let key = self.config.key();
        if self.effect.is_some() && self.key.as_ref() == Some(&key) {
            return Ok(false);
        }
        // The old overlay must leave the document before its replacement enters.
        if !self.detach() {
            log::error!("[bridge] rebuild aborted: {}", BridgeError::DetachFailed);
            return Err(BridgeError::DetachFailed);
        }
        let mut effect = self
            .factory
            .build(&self.config.characters, &self.config.options);
        effect.apply_overlay_style(&self.style);
        if let Some(size) = self.size {
            effect.set_size(size);
        }
        self.effect = Some(effect);
        self.key = Some(key);
        self.builds += 1;
        log::info!(
            "[bridge] built effect #{} ramp={:?} invert={}",
            self.builds,
            self.config.characters.as_str(),
            self.config.options.invert
        );
        Ok(true)
    }

    /// Build, attach and size the effect for a first mount.
    pub fn mount(&mut self, viewport: Viewport) -> Result<(), BridgeError> {
        self.ensure_effect()?;
        self.attach()?;
        self.resize(viewport);
        Ok(())
    }

    pub fn unmount(&mut self) {
        if !self.detach() {
            log::error!("[bridge] overlay left behind on unmount");
        }
    }

    /// Insert the overlay into the container. Already attached is a no-op.
    pub fn attach(&mut self) -> Result<(), BridgeError> {
        if self.attached {
            return Ok(());
        }
        self.ensure_effect()?;
        let Some(container) = self.container.as_mut() else {
            log::error!("[bridge] attach aborted: {}", BridgeError::MissingContainer);
            return Err(BridgeError::MissingContainer);
        };
        if let Some(effect) = self.effect.as_ref() {
            container.append_child(effect.overlay()).map_err(|e| {
                log::error!("[bridge] attach aborted: {}", e);
                e
            })?;
            self.attached = true;
            log::debug!("[bridge] overlay attached");
        }
        Ok(())
    }

    /// Propagate a viewport size to the effect. Zero-sized viewports are a
    /// transient host state and leave the current size untouched.
    /// Returns `true` when the size was applied.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if !viewport.is_renderable() {
            log::debug!(
                "[bridge] ignoring {}x{} viewport",
                viewport.width,
                viewport.height
            );
            return false;
        }
        self.size = Some(viewport);
        if let Some(effect) = self.effect.as_mut() {
            effect.set_size(viewport);
        }
        true
    }

    /// Draw the scene through the effect. Skipped while detached, since
    /// nothing would display the result.
    pub fn render(&mut self, scene: &SceneGraph, camera: &Camera) {
        if !self.attached {
            return;
        }
        if let Some(effect) = self.effect.as_mut() {
            effect.render(scene, camera);
        }
    }

    /// Remove the overlay from the container. Safe to call repeatedly and
    /// before any attach. Returns `false` if the overlay is still in the
    /// container afterwards; the bridge then stays attached.
    pub fn detach(&mut self) -> bool {
        if !self.attached {
            return true;
        }
        let (Some(effect), Some(container)) = (self.effect.as_ref(), self.container.as_mut())
        else {
            self.attached = false;
            return true;
        };
        match container.remove_child(effect.overlay()) {
            Ok(()) => {
                self.attached = false;
                log::debug!("[bridge] overlay detached");
            }
            Err(e) if !container.contains(effect.overlay()) => {
                self.attached = false;
                log::warn!("[bridge] detach: {} (overlay already gone)", e);
            }
            Err(e) => log::warn!("[bridge] detach failed, overlay still attached: {}", e),
        }
        !self.attached
    }

    /// Apply a new configuration.
    ///
    /// Only a change of `characters` or `options.invert` rebuilds the effect;
    /// other option changes are stored and reach the host on the next
    /// rebuild. A rebuilt effect is re-attached if the old one was attached.
    /// Returns `true` when a rebuild happened.
    ///
    /// The render order is only stored here; moving a mounted bridge to the
    /// new priority is [`Stage::configure_effect`](crate::Stage::configure_effect)'s job.
    pub fn configure(&mut self, config: BridgeConfig) -> Result<bool, BridgeError> {
        let was_attached = self.attached;
        self.config = config;
        if self.effect.is_none() {
            return Ok(false);
        }
        let rebuilt = self.ensure_effect()?;
        if rebuilt && was_attached {
            self.attach()?;
        }
        Ok(rebuilt)
    }
}

impl<F, C> FrameSubscriber for EffectBridge<F, C>
where
    F: EffectFactory,
    C: OverlayContainer<OverlayOf<F>>,
{
    fn on_frame(&mut self, state: &mut FrameState, _delta: f32) {
        if state.viewport.is_renderable() && self.size != Some(state.viewport) {
            self.resize(state.viewport);
        }
        self.render(&state.scene, &state.camera);
    }

    fn on_resize(&mut self, viewport: Viewport) {
        self.resize(viewport);
    }

    fn on_unmount(&mut self) {
        self.unmount();
    }
}
