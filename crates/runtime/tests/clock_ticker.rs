//! Clock ticker behavior under tokio's paused test clock.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use runtime::{ClockPrefs, ClockTicker, Gateway, PrefsStore, ScoringSession, SessionEvent};
use score_core::{Game, Player, Position, SHOT_CLOCK_SECONDS, TeamInfo, TeamSide};

async fn seed(gateway: &Gateway) -> (Game, Player) {
    let game = gateway
        .games
        .create(Game::new(
            TeamInfo::new("Hawks", "#1d4ed8"),
            TeamInfo::new("Tigers", "#b91c1c"),
            480,
        ))
        .await
        .unwrap();
    let player = gateway
        .players
        .create(Player::new(
            game.id.clone(),
            "Jordan Avery",
            23,
            Position::ShootingGuard,
            TeamSide::Home,
        ))
        .await
        .unwrap();
    (game, player)
}

/// Lets the spawned ticker task run between clock manipulations.
async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

async fn advance_secs(seconds: u32) {
    for _ in 0..seconds {
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
    }
}

#[tokio::test(start_paused = true)]
async fn ticks_advance_and_persist_only_while_running() {
    let gateway = Gateway::in_memory();
    let (game, player) = seed(&gateway).await;
    let session = ScoringSession::open(gateway.clone(), &player.id, &game.id)
        .await
        .unwrap();
    let mut notifications = session.subscribe();
    let session = Arc::new(Mutex::new(session));
    let handle = ClockTicker::spawn(session.clone(), None, Duration::from_secs(1));
    settle().await;

    // Paused by default: time passing changes nothing.
    advance_secs(3).await;
    assert_eq!(session.lock().await.clocks().game_seconds, 480);
    assert!(notifications.try_recv().is_err());

    handle.resume().await;
    settle().await;
    advance_secs(5).await;
    {
        let session = session.lock().await;
        assert_eq!(session.clocks().game_seconds, 475);
        assert_eq!(session.clocks().shot_seconds, SHOT_CLOCK_SECONDS - 5);
    }
    let SessionEvent::ClockTick { clock_seconds, .. } = notifications.try_recv().unwrap() else {
        panic!("expected a tick notification");
    };
    assert_eq!(clock_seconds, 479);
    let stored = gateway.games.get(&game.id).await.unwrap();
    assert_eq!(stored.clock_seconds, 475);
    assert_eq!(stored.shot_clock_seconds, SHOT_CLOCK_SECONDS - 5);

    handle.pause().await;
    settle().await;
    advance_secs(3).await;
    assert_eq!(session.lock().await.clocks().game_seconds, 475);

    // Reset works while paused and persists immediately.
    handle.reset_shot_clock().await;
    settle().await;
    assert_eq!(
        session.lock().await.clocks().shot_seconds,
        SHOT_CLOCK_SECONDS
    );
    let stored = gateway.games.get(&game.id).await.unwrap();
    assert_eq!(stored.shot_clock_seconds, SHOT_CLOCK_SECONDS);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn clocks_floor_at_zero_under_the_ticker() {
    let gateway = Gateway::in_memory();
    let game = gateway
        .games
        .create(Game::new(
            TeamInfo::new("Hawks", "#1d4ed8"),
            TeamInfo::new("Tigers", "#b91c1c"),
            2,
        ))
        .await
        .unwrap();
    let player = gateway
        .players
        .create(Player::new(
            game.id.clone(),
            "Jordan Avery",
            23,
            Position::ShootingGuard,
            TeamSide::Home,
        ))
        .await
        .unwrap();
    let session = ScoringSession::open(gateway.clone(), &player.id, &game.id)
        .await
        .unwrap();
    let session = Arc::new(Mutex::new(session));
    let handle = ClockTicker::spawn(session.clone(), None, Duration::from_secs(1));
    settle().await;

    handle.resume().await;
    settle().await;
    advance_secs(10).await;
    {
        let session = session.lock().await;
        assert_eq!(session.clocks().game_seconds, 0);
    }
    let stored = gateway.games.get(&game.id).await.unwrap();
    assert_eq!(stored.clock_seconds, 0);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn running_flag_is_restored_and_saved_through_prefs() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Gateway::in_memory();
    let (game, player) = seed(&gateway).await;

    // A previous visit left the clock running.
    PrefsStore::new(dir.path())
        .save(&game.id, ClockPrefs { running: true })
        .unwrap();

    let session = ScoringSession::open(gateway.clone(), &player.id, &game.id)
        .await
        .unwrap();
    let session = Arc::new(Mutex::new(session));
    let handle = ClockTicker::spawn(
        session.clone(),
        Some(PrefsStore::new(dir.path())),
        Duration::from_secs(1),
    );
    settle().await;

    assert!(session.lock().await.clock_running());
    advance_secs(2).await;
    assert_eq!(session.lock().await.clocks().game_seconds, 478);

    // Pausing through the handle updates the persisted flag.
    handle.pause().await;
    settle().await;
    assert!(!PrefsStore::new(dir.path()).load(&game.id).running);

    handle.shutdown().await;
}
