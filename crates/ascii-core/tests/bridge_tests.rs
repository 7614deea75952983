// Effect bridge lifecycle: attach, resize, memoized rebuild, detach.

mod common;

use ascii_core::*;
use common::*;

#[test]
fn mount_attaches_styled_overlay_at_viewport_size() {
    let (mut bridge, container) = bridge_with_container(BridgeConfig::default());
    bridge.mount(Viewport::new(800, 600)).expect("mount");

    assert!(bridge.is_attached());
    assert_eq!(container.ids(), vec![effect_id(&bridge)]);
    let effect = bridge.effect().expect("effect");
    assert_eq!(effect.size, Some(Viewport::new(800, 600)));
    assert_eq!(effect.style.as_deref(), Some(OverlayStyle::default().css().as_str()));
    assert_eq!(effect.characters, DEFAULT_CHARACTERS);
}

#[test]
fn resize_sequence_skips_zero_viewport() {
    let (mut bridge, _container) = bridge_with_container(BridgeConfig::default());
    bridge.attach().expect("attach");

    let steps = [
        (Viewport::new(100, 50), Viewport::new(100, 50)),
        (Viewport::new(200, 100), Viewport::new(200, 100)),
        (Viewport::new(0, 0), Viewport::new(200, 100)),
        (Viewport::new(300, 150), Viewport::new(300, 150)),
    ];
    for (input, expected) in steps {
        bridge.resize(input);
        assert_eq!(bridge.effect().and_then(|e| e.size), Some(expected));
        assert_eq!(bridge.size(), Some(expected));
    }
}

#[test]
fn unrelated_option_change_keeps_effect_instance() {
    let config = BridgeConfig::default().with_invert(true);
    let (mut bridge, container) = bridge_with_container(config.clone());
    bridge.mount(Viewport::new(640, 480)).expect("mount");
    let first = effect_id(&bridge);

    let mut changed = config;
    changed.options.resolution = 0.3;
    changed.options.color = true;
    changed.options.str_resolution = StrResolution::High;
    let rebuilt = bridge.configure(changed.clone()).expect("configure");

    assert!(!rebuilt);
    assert_eq!(effect_id(&bridge), first);
    assert_eq!(bridge.builds(), 1);
    assert_eq!(bridge.config(), &changed);
    // The live instance still carries the options it was built with.
    assert_eq!(bridge.effect().map(|e| e.options.resolution), Some(DEFAULT_EFFECT_RESOLUTION));
    assert_eq!(container.ids(), vec![first]);
}

#[test]
fn invert_change_rebuilds_and_detaches_old_overlay() {
    let (mut bridge, container) = bridge_with_container(BridgeConfig::default().with_invert(true));
    bridge.mount(Viewport::new(640, 480)).expect("mount");
    let first = effect_id(&bridge);

    let rebuilt = bridge
        .configure(BridgeConfig::default().with_invert(false))
        .expect("configure");
    let second = effect_id(&bridge);

    assert!(rebuilt);
    assert_ne!(first, second);
    assert_eq!(container.ids(), vec![second]);
    assert!(container.contains(bridge.effect().expect("effect").overlay()));
    assert!(bridge.is_attached());
    // New instance inherits the last viewport size.
    assert_eq!(bridge.effect().and_then(|e| e.size), Some(Viewport::new(640, 480)));
}

#[test]
fn character_change_rebuilds_with_new_ramp() {
    let (mut bridge, container) = bridge_with_container(BridgeConfig::default());
    bridge.mount(Viewport::new(10, 10)).expect("mount");

    let ramp = CharacterRamp::new(" #").expect("ramp");
    assert!(bridge
        .configure(BridgeConfig::default().with_characters(ramp))
        .expect("configure"));
    assert_eq!(bridge.builds(), 2);
    assert_eq!(bridge.effect().map(|e| e.characters.as_str()), Some(" #"));
    assert_eq!(container.ids().len(), 1);
}

#[test]
fn configure_before_mount_does_not_build() {
    let (mut bridge, container) = bridge_with_container(BridgeConfig::default());
    assert!(!bridge
        .configure(BridgeConfig::default().with_invert(true))
        .expect("configure"));
    assert!(bridge.effect().is_none());
    assert!(container.ids().is_empty());
}

#[test]
fn detach_twice_leaves_container_empty() {
    let (mut bridge, container) = bridge_with_container(BridgeConfig::default());
    bridge.mount(Viewport::new(320, 200)).expect("mount");

    bridge.detach();
    bridge.detach();

    assert!(!bridge.is_attached());
    assert!(container.ids().is_empty());
}

#[test]
fn detach_before_attach_is_a_no_op() {
    let (mut bridge, container) = bridge_with_container(BridgeConfig::default());
    bridge.detach();
    bridge.unmount();
    assert!(container.ids().is_empty());
    assert!(bridge.effect().is_none());
}

#[test]
fn missing_container_aborts_attach() {
    let mut bridge: MockBridge =
        EffectBridge::new(BridgeConfig::default(), MockFactory::default(), None);
    assert_eq!(
        bridge.mount(Viewport::new(800, 600)),
        Err(BridgeError::MissingContainer)
    );
    assert!(!bridge.is_attached());

    // Rendering an unattached effect does nothing.
    bridge.render(&demo_scene(), &Camera::default());
    assert_eq!(bridge.effect().map(|e| e.renders), Some(0));
    bridge.detach();
}

#[test]
fn frame_subscriber_renders_and_syncs_size() {
    let (mut bridge, _container) = bridge_with_container(BridgeConfig::default());
    bridge.mount(Viewport::new(100, 100)).expect("mount");

    let mut state = FrameState::new(demo_scene(), Camera::default(), Viewport::new(120, 90));
    bridge.on_frame(&mut state, 0.016);
    bridge.on_frame(&mut state, 0.016);

    let effect = bridge.effect().expect("effect");
    assert_eq!(effect.renders, 2);
    assert_eq!(effect.size, Some(Viewport::new(120, 90)));

    bridge.on_unmount();
    assert!(!bridge.is_attached());
}

#[test]
fn failed_removal_keeps_bridge_attached() {
    let container = StickyContainer::default();
    let mut bridge = EffectBridge::new(
        BridgeConfig::default(),
        MockFactory::default(),
        Some(container.clone()),
    );
    bridge.mount(Viewport::new(100, 100)).expect("mount");

    container.refuse_removal.set(true);
    assert!(!bridge.detach());
    assert!(bridge.is_attached());
    assert_eq!(container.inner.ids().len(), 1);

    container.refuse_removal.set(false);
    assert!(bridge.detach());
    assert!(!bridge.is_attached());
    assert!(container.inner.ids().is_empty());
}

#[test]
fn rebuild_waits_until_old_overlay_is_removed() {
    let container = StickyContainer::default();
    let mut bridge = EffectBridge::new(
        BridgeConfig::default(),
        MockFactory::default(),
        Some(container.clone()),
    );
    bridge.mount(Viewport::new(100, 100)).expect("mount");
    let first = bridge.effect().map(|e| e.id).expect("effect");

    container.refuse_removal.set(true);
    let inverted = BridgeConfig::default().with_invert(true);
    assert_eq!(
        bridge.configure(inverted.clone()),
        Err(BridgeError::DetachFailed)
    );
    assert_eq!(container.inner.ids(), vec![first]);
    assert_eq!(bridge.effect().map(|e| e.id), Some(first));
    assert!(bridge.is_attached());
    assert_eq!(bridge.builds(), 1);

    container.refuse_removal.set(false);
    assert_eq!(bridge.configure(inverted), Ok(true));
    let second = bridge.effect().map(|e| e.id).expect("effect");
    assert_ne!(first, second);
    assert_eq!(container.inner.ids(), vec![second]);
}
