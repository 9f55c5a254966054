//! End-to-end tests through the registry, handle and instance thread.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use effects_engine::{MockBehavior, MockEngineFactory, MockLoad, RenderSurface};
use effects_ipc::{CommandError, PlayerEvent, PlayerState};
use effects_player::{PlayerRegistry, SDK_VERSION};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "effects_player=debug,effects_engine=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn registry_with(behavior: MockBehavior) -> (PlayerRegistry, Arc<MockEngineFactory>) {
    init_tracing();
    let factory = Arc::new(MockEngineFactory::with_behavior(behavior));
    let engine_factory: Arc<dyn effects_engine::EngineFactory> = factory.clone();
    (PlayerRegistry::new(engine_factory), factory)
}

fn collect_events(handle: &effects_player::PlayerHandle, count: usize) -> Vec<PlayerEvent> {
    let mut events = Vec::with_capacity(count);
    while events.len() < count {
        match handle.events().recv_timeout(Duration::from_secs(2)) {
            Ok(event) => events.push(event),
            Err(e) => panic!("expected {} events, got {:?} ({})", count, events, e),
        }
    }
    events
}

#[test]
fn test_load_scene_with_auto_play_event_sequence() {
    let (registry, _factory) = registry_with(MockBehavior::default());
    let handle = registry.create_view(1, RenderSurface::new(100));

    handle
        .load_scene("https://cdn.example.com/scenes/intro.json", true)
        .unwrap();

    let events = collect_events(&handle, 4);
    assert_eq!(
        events,
        vec![
            PlayerEvent::StateChanged(PlayerState::Loading),
            PlayerEvent::LoadComplete,
            PlayerEvent::StateChanged(PlayerState::Ready),
            PlayerEvent::StateChanged(PlayerState::Playing),
        ]
    );
    assert_eq!(handle.state(), PlayerState::Playing);
}

#[test]
fn test_state_changed_wire_format_for_hosts() {
    let (registry, _factory) = registry_with(MockBehavior::default());
    let handle = registry.create_view(1, RenderSurface::new(100));

    handle.load_scene("assets/a.json", false).unwrap();

    let events = collect_events(&handle, 3);
    let json = serde_json::to_string(&events[0]).unwrap();
    assert_eq!(json, "{\"StateChanged\":\"loading\"}");
}

#[test]
fn test_full_playback_cycle_over_channels() {
    let (registry, factory) = registry_with(MockBehavior::default());
    let handle = registry.create_view(7, RenderSurface::new(7));

    handle.load_scene("assets/a.json", false).unwrap();
    handle.play().unwrap();
    handle.pause().unwrap();
    assert_eq!(handle.state(), PlayerState::Paused);
    handle.resume().unwrap();
    handle.stop().unwrap();
    assert_eq!(handle.state(), PlayerState::Stopped);

    // Finite playthrough: the engine's end callback stops the player and
    // completes exactly once.
    handle.set_loop(false).unwrap();
    handle.play().unwrap();
    let _ = collect_events(&handle, 8); // drain everything up to the second playing
    factory.last_remote().unwrap().finish_playback();

    let events = collect_events(&handle, 2);
    assert_eq!(
        events,
        vec![
            PlayerEvent::StateChanged(PlayerState::Stopped),
            PlayerEvent::PlayComplete,
        ]
    );
    assert_eq!(handle.state(), PlayerState::Stopped);
}

#[test]
fn test_time_queries() {
    let (registry, _factory) = registry_with(MockBehavior {
        frame_count: Some(300),
        current_time: Some(1.25),
        ..MockBehavior::default()
    });
    let handle = registry.create_view(1, RenderSurface::new(1));

    assert_eq!(handle.duration(), Err(CommandError::NotInitialized));

    handle.load_scene("assets/a.json", false).unwrap();
    assert_eq!(handle.duration(), Ok(10.0));
    assert_eq!(handle.current_time(), Ok(1.25));
}

#[test]
fn test_dispose_is_idempotent() {
    let (registry, _factory) = registry_with(MockBehavior::default());
    let handle = registry.create_view(3, RenderSurface::new(3));

    handle.load_scene("assets/a.json", false).unwrap();
    let _ = collect_events(&handle, 3);

    registry.dispose_view(3);
    assert!(!registry.contains(3));

    // No error and no events from a second dispose.
    registry.dispose_view(3);
    assert!(handle.events().try_recv().is_err());

    // The instance is gone; commands now fail cleanly.
    assert_eq!(handle.play(), Err(CommandError::NotInitialized));
}

#[test]
fn test_create_view_replaces_existing_instance() {
    let (registry, _factory) = registry_with(MockBehavior::default());

    let first = registry.create_view(5, RenderSurface::new(50));
    first.load_scene("assets/a.json", false).unwrap();

    let second = registry.create_view(5, RenderSurface::new(51));
    assert_eq!(registry.len(), 1);

    // The replaced instance was disposed under the hood.
    assert_eq!(first.play(), Err(CommandError::NotInitialized));
    assert_eq!(second.state(), PlayerState::Uninitialized);
}

#[test]
fn test_stale_load_callback_cannot_corrupt_newer_scene() {
    let (registry, factory) = registry_with(MockBehavior {
        load: MockLoad::Hold,
        ..MockBehavior::default()
    });
    let registry = Arc::new(registry);
    let handle = Arc::new(registry.create_view(1, RenderSurface::new(1)));

    // First load blocks its caller until it is superseded.
    let blocked = {
        let handle = Arc::clone(&handle);
        thread::spawn(move || handle.load_scene("assets/a.json", true))
    };

    // Wait for the held load to reach the engine.
    let deadline = Instant::now() + Duration::from_secs(2);
    while factory.created_count() < 1 {
        assert!(Instant::now() < deadline, "first load never started");
        thread::sleep(Duration::from_millis(5));
    }
    let remote_a = factory.last_remote().unwrap();

    // Second load supersedes the first.
    factory.set_behavior(MockBehavior::default());
    handle.load_scene("assets/b.json", false).unwrap();
    assert_eq!(handle.state(), PlayerState::Ready);

    // The superseded command resolved with a failure, exactly once.
    assert_eq!(
        blocked.join().unwrap(),
        Err(CommandError::LoadFailed("superseded by a newer load".into()))
    );

    // A's late callback is stale and must change nothing; in particular
    // its auto_play=true must not start playback of scene B.
    while handle.events().try_recv().is_ok() {}
    remote_a.finish_load(Ok(()));
    thread::sleep(Duration::from_millis(50));
    handle.set_loop(false).unwrap();
    assert_eq!(handle.state(), PlayerState::Ready);
    assert!(handle.events().try_recv().is_err());
}

#[test]
fn test_registry_drop_disposes_all_instances() {
    let (registry, factory) = registry_with(MockBehavior::default());
    let journal = factory.journal();

    let a = registry.create_view(1, RenderSurface::new(1));
    let b = registry.create_view(2, RenderSurface::new(2));
    a.load_scene("assets/a.json", false).unwrap();
    b.load_scene("assets/b.json", false).unwrap();

    drop(registry);

    let destroyed = journal
        .actions()
        .iter()
        .filter(|action| matches!(action, effects_engine::MockAction::Destroyed))
        .count();
    assert_eq!(destroyed, 2);
    assert_eq!(a.play(), Err(CommandError::NotInitialized));
}

#[test]
fn test_sdk_version() {
    assert_eq!(SDK_VERSION, "1.0.0");
}
