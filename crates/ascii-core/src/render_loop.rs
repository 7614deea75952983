//! Per-frame tick dispatch.
//!
//! Subscribers register with a priority; each tick they run in ascending
//! priority, ties in registration order. A subscriber with a priority above
//! zero takes over drawing, and the host skips its default render pass.

use crate::scene::SceneGraph;
use crate::state::{Camera, Clock, Viewport};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

/// Host-owned state handed to subscribers by `&mut` for the duration of a
/// single call. Subscribers must not keep references to it.
#[derive(Clone, Debug, Default)]
pub struct FrameState {
    pub scene: SceneGraph,
    pub camera: Camera,
    pub viewport: Viewport,
    pub clock: Clock,
}

impl FrameState {
    pub fn new(scene: SceneGraph, camera: Camera, viewport: Viewport) -> Self {
        Self {
            scene,
            camera,
            viewport,
            clock: Clock::default(),
        }
    }
}

pub trait FrameSubscriber {
    fn on_frame(&mut self, state: &mut FrameState, delta: f32);

    fn on_resize(&mut self, _viewport: Viewport) {}

    /// Called once when the subscription is removed.
    fn on_unmount(&mut self) {}
}

// Shared handles let the composition layer keep inspecting a subscriber
// after handing it to the loop.
impl<T: FrameSubscriber + ?Sized> FrameSubscriber for Rc<RefCell<T>> {
    fn on_frame(&mut self, state: &mut FrameState, delta: f32) {
        match self.try_borrow_mut() {
            Ok(mut inner) => inner.on_frame(state, delta),
            Err(_) => log::warn!("[loop] subscriber busy; skipping frame"),
        }
    }

    fn on_resize(&mut self, viewport: Viewport) {
        match self.try_borrow_mut() {
            Ok(mut inner) => inner.on_resize(viewport),
            Err(_) => log::warn!("[loop] subscriber busy; skipping resize"),
        }
    }

    fn on_unmount(&mut self) {
        match self.try_borrow_mut() {
            Ok(mut inner) => inner.on_unmount(),
            Err(_) => log::warn!("[loop] subscriber busy; skipping unmount"),
        }
    }
}

/// Adapter turning a closure into a subscriber.
pub struct FrameFn<F>(pub F);

impl<F: FnMut(&mut FrameState, f32)> FrameSubscriber for FrameFn<F> {
    fn on_frame(&mut self, state: &mut FrameState, delta: f32) {
        (self.0)(state, delta)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    priority: i32,
    subscriber: Box<dyn FrameSubscriber>,
}

#[derive(Default)]
pub struct RenderLoop {
    // Kept sorted by priority; insertion after equal priorities keeps ties
    // in registration order.
    subs: SmallVec<[Subscription; 4]>,
    next_id: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        priority: i32,
        subscriber: Box<dyn FrameSubscriber>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let at = self.subs.partition_point(|s| s.priority <= priority);
        self.subs.insert(
            at,
            Subscription {
                id,
                priority,
                subscriber,
            },
        );
        log::debug!("[loop] subscribed {:?} at priority {}", id, priority);
        id
    }

    pub fn on_frame(
        &mut self,
        priority: i32,
        f: impl FnMut(&mut FrameState, f32) + 'static,
    ) -> SubscriptionId {
        self.subscribe(priority, Box::new(FrameFn(f)))
    }

    /// Remove a subscription and run its unmount hook. Returns `false` for
    /// ids that are not (or no longer) registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.subs.iter().position(|s| s.id == id) {
            Some(i) => {
                let mut sub = self.subs.remove(i);
                sub.subscriber.on_unmount();
                log::debug!("[loop] unsubscribed {:?}", id);
                true
            }
            None => false,
        }
    }

    /// Move a subscription to a new priority without unmounting it. It is
    /// placed after any subscribers already at that priority, as a fresh
    /// registration would be. Returns `false` for unknown ids.
    pub fn reprioritize(&mut self, id: SubscriptionId, priority: i32) -> bool {
        let Some(i) = self.subs.iter().position(|s| s.id == id) else {
            return false;
        };
        let mut sub = self.subs.remove(i);
        let from = sub.priority;
        sub.priority = priority;
        let at = self.subs.partition_point(|s| s.priority <= priority);
        self.subs.insert(at, sub);
        log::debug!("[loop] moved {:?} from priority {} to {}", id, from, priority);
        true
    }

    /// Advance the clock and run every subscriber once.
    pub fn tick(&mut self, state: &mut FrameState, delta: f32) {
        state.clock.advance(delta);
        for sub in self.subs.iter_mut() {
            sub.subscriber.on_frame(state, delta);
        }
    }

    pub fn notify_resize(&mut self, viewport: Viewport) {
        for sub in self.subs.iter_mut() {
            sub.subscriber.on_resize(viewport);
        }
    }

    pub fn takes_over_rendering(&self) -> bool {
        self.subs.iter().any(|s| s.priority > 0)
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Priorities in dispatch order.
    pub fn priorities(&self) -> Vec<i32> {
        self.subs.iter().map(|s| s.priority).collect()
    }

    /// Unsubscribe everything, running unmount hooks in dispatch order.
    pub fn clear(&mut self) {
        for mut sub in self.subs.drain(..) {
            sub.subscriber.on_unmount();
        }
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.clear();
    }
}
