// Host-side doubles for the engine seams the core talks to.
#![allow(dead_code)]

use ascii_core::*;
use glam::Vec3;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockOverlay {
    pub id: u64,
}

#[derive(Debug)]
pub struct MockEffect {
    pub id: u64,
    overlay: MockOverlay,
    pub characters: String,
    pub options: EffectOptions,
    pub style: Option<String>,
    pub size: Option<Viewport>,
    pub renders: usize,
    pub last_rotation: Option<Vec3>,
}

impl AsciiEffect for MockEffect {
    type Overlay = MockOverlay;

    fn overlay(&self) -> &MockOverlay {
        &self.overlay
    }

    fn apply_overlay_style(&mut self, style: &OverlayStyle) {
        self.style = Some(style.css());
    }

    fn set_size(&mut self, size: Viewport) {
        self.size = Some(size);
    }

    fn render(&mut self, scene: &SceneGraph, _camera: &Camera) {
        self.renders += 1;
        self.last_rotation = scene.shapes().next().map(|(_, s)| s.rotation());
    }
}

#[derive(Default, Clone)]
pub struct MockFactory {
    next_id: Rc<Cell<u64>>,
}

impl EffectFactory for MockFactory {
    type Effect = MockEffect;

    fn build(&mut self, characters: &CharacterRamp, options: &EffectOptions) -> MockEffect {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        MockEffect {
            id,
            overlay: MockOverlay { id },
            characters: characters.as_str().to_string(),
            options: options.clone(),
            style: None,
            size: None,
            renders: 0,
            last_rotation: None,
        }
    }
}

/// Container whose child list stays observable after the bridge takes it.
#[derive(Default, Clone)]
pub struct MockContainer {
    pub children: Rc<RefCell<Vec<u64>>>,
}

impl MockContainer {
    pub fn ids(&self) -> Vec<u64> {
        self.children.borrow().clone()
    }
}

impl OverlayContainer<MockOverlay> for MockContainer {
    fn append_child(&mut self, element: &MockOverlay) -> Result<(), BridgeError> {
        self.children.borrow_mut().push(element.id);
        Ok(())
    }

    fn remove_child(&mut self, element: &MockOverlay) -> Result<(), BridgeError> {
        let mut children = self.children.borrow_mut();
        match children.iter().position(|id| *id == element.id) {
            Some(i) => {
                children.remove(i);
                Ok(())
            }
            None => Err(BridgeError::Host(format!("{} is not a child", element.id))),
        }
    }

    fn contains(&self, element: &MockOverlay) -> bool {
        self.children.borrow().contains(&element.id)
    }
}

/// Container whose removals can be made to fail while the child stays put.
#[derive(Default, Clone)]
pub struct StickyContainer {
    pub inner: MockContainer,
    pub refuse_removal: Rc<Cell<bool>>,
}

impl OverlayContainer<MockOverlay> for StickyContainer {
    fn append_child(&mut self, element: &MockOverlay) -> Result<(), BridgeError> {
        self.inner.append_child(element)
    }

    fn remove_child(&mut self, element: &MockOverlay) -> Result<(), BridgeError> {
        if self.refuse_removal.get() {
            return Err(BridgeError::Host("removal refused".into()));
        }
        self.inner.remove_child(element)
    }

    fn contains(&self, element: &MockOverlay) -> bool {
        self.inner.contains(element)
    }
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub draws: usize,
    pub size: Option<Viewport>,
}

impl SceneRenderer for RecordingRenderer {
    fn set_size(&mut self, viewport: Viewport) {
        self.size = Some(viewport);
    }

    fn render(&mut self, _scene: &SceneGraph, _camera: &Camera) {
        self.draws += 1;
    }
}

pub type MockBridge = EffectBridge<MockFactory, MockContainer>;

pub fn bridge_with_container(config: BridgeConfig) -> (MockBridge, MockContainer) {
    let container = MockContainer::default();
    let bridge = EffectBridge::new(config, MockFactory::default(), Some(container.clone()));
    (bridge, container)
}

pub fn effect_id(bridge: &MockBridge) -> u64 {
    bridge.effect().map(|e| e.id).unwrap_or(0)
}
