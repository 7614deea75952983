// Render loop dispatch order, takeover and teardown.

use ascii_core::*;
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<&'static str>>>;

fn recorder(log: &Log, name: &'static str) -> impl FnMut(&mut FrameState, f32) + 'static {
    let log = log.clone();
    move |_state, _delta| log.borrow_mut().push(name)
}

struct Unmounts(Log, &'static str);

impl FrameSubscriber for Unmounts {
    fn on_frame(&mut self, _state: &mut FrameState, _delta: f32) {}

    fn on_unmount(&mut self) {
        self.0.borrow_mut().push(self.1);
    }
}

#[test]
fn subscribers_run_in_ascending_priority_with_stable_ties() {
    let log: Log = Rc::default();
    let mut rl = RenderLoop::new();
    rl.on_frame(1, recorder(&log, "effect"));
    rl.on_frame(0, recorder(&log, "spin-a"));
    rl.on_frame(-1, recorder(&log, "controls"));
    rl.on_frame(0, recorder(&log, "spin-b"));
    rl.on_frame(2, recorder(&log, "late"));

    let mut state = FrameState::default();
    rl.tick(&mut state, 0.016);

    assert_eq!(
        *log.borrow(),
        vec!["controls", "spin-a", "spin-b", "effect", "late"]
    );
    assert_eq!(rl.priorities(), vec![-1, 0, 0, 1, 2]);
}

#[test]
fn positive_priority_takes_over_rendering() {
    let mut rl = RenderLoop::new();
    rl.on_frame(0, |_, _| {});
    rl.on_frame(-3, |_, _| {});
    assert!(!rl.takes_over_rendering());

    let id = rl.on_frame(1, |_, _| {});
    assert!(rl.takes_over_rendering());

    assert!(rl.unsubscribe(id));
    assert!(!rl.takes_over_rendering());
}

#[test]
fn unsubscribe_runs_unmount_once() {
    let log: Log = Rc::default();
    let mut rl = RenderLoop::new();
    let id = rl.subscribe(0, Box::new(Unmounts(log.clone(), "gone")));

    assert!(rl.unsubscribe(id));
    assert!(!rl.unsubscribe(id));
    assert_eq!(*log.borrow(), vec!["gone"]);
    assert!(rl.is_empty());
}

#[test]
fn tick_advances_clock() {
    let mut rl = RenderLoop::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_tick = seen.clone();
    rl.on_frame(0, move |state, delta| {
        seen_tick.borrow_mut().push((state.clock.frames, delta));
    });

    let mut state = FrameState::default();
    rl.tick(&mut state, 0.25);
    rl.tick(&mut state, 0.5);

    assert_eq!(*seen.borrow(), vec![(1, 0.25), (2, 0.5)]);
    assert_eq!(state.clock.elapsed, 0.75);
}

#[test]
fn dropping_the_loop_unmounts_everything() {
    let log: Log = Rc::default();
    {
        let mut rl = RenderLoop::new();
        rl.subscribe(1, Box::new(Unmounts(log.clone(), "b")));
        rl.subscribe(0, Box::new(Unmounts(log.clone(), "a")));
    }
    assert_eq!(*log.borrow(), vec!["a", "b"]);
}

#[test]
fn resize_reaches_every_subscriber() {
    struct Sizes(Rc<RefCell<Vec<Viewport>>>);
    impl FrameSubscriber for Sizes {
        fn on_frame(&mut self, _state: &mut FrameState, _delta: f32) {}
        fn on_resize(&mut self, viewport: Viewport) {
            self.0.borrow_mut().push(viewport);
        }
    }

    let sizes = Rc::new(RefCell::new(Vec::new()));
    let mut rl = RenderLoop::new();
    rl.subscribe(0, Box::new(Sizes(sizes.clone())));
    rl.subscribe(5, Box::new(Sizes(sizes.clone())));
    rl.notify_resize(Viewport::new(4, 3));

    assert_eq!(*sizes.borrow(), vec![Viewport::new(4, 3); 2]);
}

#[test]
fn reprioritize_moves_without_unmounting() {
    let log: Log = Rc::default();
    let mut rl = RenderLoop::new();
    let effect = rl.subscribe(1, Box::new(Unmounts(log.clone(), "effect")));
    rl.on_frame(0, recorder(&log, "spin"));
    assert!(rl.takes_over_rendering());

    assert!(rl.reprioritize(effect, -1));
    assert_eq!(rl.priorities(), vec![-1, 0]);
    assert!(!rl.takes_over_rendering());
    assert!(log.borrow().is_empty());

    assert!(rl.unsubscribe(effect));
    assert!(!rl.reprioritize(effect, 3));
    assert_eq!(rl.priorities(), vec![0]);
}
