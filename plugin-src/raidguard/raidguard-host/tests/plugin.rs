use raidguard_host::{RaidGuardPlugin, deny_message};
use raidguard_types::{RestrictionKind, Vector3};
use std::time::{Duration, Instant};
use uuid::Uuid;

#[test]
fn first_load_writes_default_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut plugin = RaidGuardPlugin::new().expect("runtime");

    plugin.on_load(dir.path()).expect("load");
    assert!(dir.path().join("config.toml").exists());

    let state = plugin.state().expect("state after load");
    assert_eq!(state.config.raid.duration, 300);
    assert_eq!(state.config.raid.merge_radius, Some(25.0));

    plugin.on_unload().expect("unload");
    assert!(plugin.state().is_none());
}

#[test]
fn loading_twice_stops_the_first_driver() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("config.toml"),
        "[scheduler]\ntick_millis = 10\n",
    )
    .expect("write");
    let mut plugin = RaidGuardPlugin::new().expect("runtime");

    plugin.on_load(dir.path()).expect("first load");
    let first = plugin.state().expect("first state").clone();
    plugin.on_load(dir.path()).expect("second load");
    let second = plugin.state().expect("second state").clone();

    let frozen = plugin.block_on(async { first.engine.lock().await.now() });
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(plugin.block_on(async { first.engine.lock().await.now() }), frozen);

    let deadline = Instant::now() + Duration::from_secs(5);
    while plugin.block_on(async { second.engine.lock().await.now() }) == 0 {
        assert!(Instant::now() < deadline, "second driver never ticked");
        std::thread::sleep(Duration::from_millis(10));
    }

    plugin.on_unload().expect("unload");
}

#[test]
fn broken_config_fails_the_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("config.toml"), "[raid\nduration = ").expect("write");
    let mut plugin = RaidGuardPlugin::new().expect("runtime");

    let err = plugin.on_load(dir.path()).expect_err("parse failure");
    assert!(err.starts_with("parse config"), "{err}");
    assert!(plugin.state().is_none());
}

#[test]
fn restrictions_run_out_on_the_driver_clock() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("config.toml"),
        "[raid]\nduration = 20\n[combat]\nduration = 10\n[scheduler]\ntick_millis = 10\n",
    )
    .expect("write");
    let mut plugin = RaidGuardPlugin::new().expect("runtime");
    plugin.on_load(dir.path()).expect("load");
    let state = plugin.state().expect("state").clone();
    let service = plugin.service().expect("service");

    let raider = Uuid::new_v4();
    let victim = Uuid::new_v4();
    plugin.block_on(async {
        state.player_join(raider, "raider", Vector3::default()).await;
        state.player_join(victim, "victim", Vector3::new(5.0, 0.0, 0.0)).await;
        state.structure_damaged(raider, Some(victim), Vector3::default()).await;
        state.player_attack(raider, victim).await;
    });

    // The driver may already have ticked, so only the subsystem is pinned.
    let verdict = plugin.block_on(state.command(&victim, "/home"));
    let message = deny_message(verdict).expect("raid blocks /home");
    assert!(
        message.starts_with("You can't use that command while raid blocked ("),
        "{message}"
    );

    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let status = plugin.block_on(service.status(victim));
        if !status.is_restricted() && plugin.block_on(service.zones()).is_empty() {
            break;
        }
        assert!(Instant::now() < deadline, "restrictions never expired: {status:?}");
        std::thread::sleep(Duration::from_millis(10));
    }

    assert!(plugin.block_on(state.command(&victim, "/home")).is_allowed());
    assert_eq!(state.hud.active_count(), 0);
    assert_eq!(service.layout(&victim).primary.map(|i| i.kind), None::<RestrictionKind>);

    plugin.on_unload().expect("unload");
}
