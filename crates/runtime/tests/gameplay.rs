use std::time::Duration;

use async_trait::async_trait;

use pairs_core::{
    CardId, Difficulty, Entity, FETCH_ERROR_MESSAGE, FlipOutcome, FlipRejection, LOSS_MESSAGE,
    PowerUpPhase, Stats, Status, WIN_MESSAGE,
};
use pairs_runtime::{
    CatalogSource, FetchError, GameObserver, Runtime, RuntimeConfig, RuntimeError, RuntimeHandle,
    StaticCatalog, spawn_observer,
};

fn roster(count: usize) -> Vec<Entity> {
    (0..count)
        .map(|i| Entity::new(format!("creature-{i}"), format!("https://img.test/{i}.png")))
        .collect()
}

async fn runtime_with(catalog: impl CatalogSource + 'static) -> Runtime {
    Runtime::builder()
        .config(RuntimeConfig {
            seed: Some(7),
            ..RuntimeConfig::default()
        })
        .catalog(catalog)
        .build()
        .await
        .expect("Runtime should build")
}

async fn started(difficulty: Difficulty) -> (Runtime, RuntimeHandle) {
    let runtime = runtime_with(StaticCatalog::seeded(roster(24), 11)).await;
    let handle = runtime.handle();
    handle.start(difficulty).await.expect("Start should succeed");
    (runtime, handle)
}

/// Catalog whose draws always fail.
struct BrokenCatalog;

#[async_trait]
impl CatalogSource for BrokenCatalog {
    async fn fetch_random_entities(&self, _count: usize) -> Result<Vec<Entity>, FetchError> {
        Err(FetchError::Status {
            url: "https://catalog.test/pokemon".to_string(),
            status: 503,
        })
    }
}

/// Catalog that answers only after a delay.
struct SlowCatalog {
    inner: StaticCatalog,
    delay: Duration,
}

#[async_trait]
impl CatalogSource for SlowCatalog {
    async fn fetch_random_entities(&self, count: usize) -> Result<Vec<Entity>, FetchError> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_random_entities(count).await
    }
}

#[derive(Default)]
struct Recorder {
    boards: usize,
    last_stats: Option<Stats>,
    last_clock: Option<u32>,
    statuses: Vec<Status>,
    messages: Vec<String>,
    power_ups: Vec<bool>,
    won: bool,
    lost: bool,
}

impl GameObserver for Recorder {
    fn render(&mut self, _cards: &[pairs_core::Card]) {
        self.boards += 1;
    }

    fn on_stats_changed(&mut self, stats: &Stats) {
        self.last_stats = Some(*stats);
    }

    fn on_clock(&mut self, time_left: u32) {
        self.last_clock = Some(time_left);
    }

    fn on_message(&mut self, message: Option<&str>) {
        if let Some(message) = message {
            self.messages.push(message.to_string());
        }
    }

    fn on_status(&mut self, status: Status) {
        self.statuses.push(status);
    }

    fn on_power_up(&mut self, available: bool) {
        self.power_ups.push(available);
    }

    fn on_win(&mut self) {
        self.won = true;
    }

    fn on_lose(&mut self) {
        self.lost = true;
    }
}

/// Plays an easy board to completion by flipping each pair in turn.
#[tokio::test(start_paused = true)]
async fn test_easy_session_is_won_by_matching_every_pair() {
    let (_runtime, handle) = started(Difficulty::Easy).await;

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.status(), Status::Playing);
    assert_eq!(state.cards().len(), 12);
    assert_eq!(state.time_left(), 120);
    assert!(handle.timer_running().await.unwrap());

    for k in 0..6 {
        let first = handle.flip(CardId(k)).await.unwrap();
        assert_eq!(first, FlipOutcome::Flipped(CardId(k)));

        match handle.flip(CardId(k + 6)).await.unwrap() {
            FlipOutcome::Matched { pair, won } => {
                assert_eq!(pair, [CardId(k), CardId(k + 6)]);
                assert_eq!(won, k == 5);
            }
            other => panic!("expected a match, got {other:?}"),
        }
    }

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.status(), Status::Won);
    assert_eq!(state.message(), Some(WIN_MESSAGE));
    assert_eq!(state.stats().clicks, 12);
    assert_eq!(state.stats().matched_pairs, 6);
    assert!(state.cards().iter().all(|card| card.is_matched));
    assert!(!handle.timer_running().await.unwrap());

    // The clock is frozen once the game is won.
    let frozen = state.time_left();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.query_state().await.unwrap().time_left(), frozen);

    assert_eq!(
        handle.flip(CardId(0)).await.unwrap(),
        FlipOutcome::Rejected(FlipRejection::NotPlaying)
    );
}

/// A hard board left alone runs out of time after sixty ticks.
#[tokio::test(start_paused = true)]
async fn test_hard_session_is_lost_when_clock_expires() {
    let (_runtime, handle) = started(Difficulty::Hard).await;

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.cards().len(), 24);
    assert_eq!(state.time_left(), 60);

    tokio::time::sleep(Duration::from_millis(30_500)).await;
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.status(), Status::Playing);
    assert_eq!(state.time_left(), 30);

    tokio::time::sleep(Duration::from_secs(31)).await;
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.status(), Status::Lost);
    assert_eq!(state.time_left(), 0);
    assert_eq!(state.message(), Some(LOSS_MESSAGE));
    assert!(!handle.timer_running().await.unwrap());

    assert_eq!(
        handle.flip(CardId(0)).await.unwrap(),
        FlipOutcome::Rejected(FlipRejection::NotPlaying)
    );
}

/// Two non-matching cards stay visible for one second, then turn back over.
#[tokio::test(start_paused = true)]
async fn test_mismatch_hides_cards_after_delay() {
    let (_runtime, handle) = started(Difficulty::Easy).await;

    handle.flip(CardId(0)).await.unwrap();
    assert_eq!(
        handle.flip(CardId(1)).await.unwrap(),
        FlipOutcome::Mismatched {
            pair: [CardId(0), CardId(1)]
        }
    );

    // Further flips are ignored while the pair is on display.
    assert_eq!(
        handle.flip(CardId(2)).await.unwrap(),
        FlipOutcome::Rejected(FlipRejection::Evaluating)
    );

    let state = handle.query_state().await.unwrap();
    assert!(state.card(CardId(0)).unwrap().is_flipped);
    assert!(state.card(CardId(1)).unwrap().is_flipped);
    assert!(!state.card(CardId(2)).unwrap().is_flipped);
    assert_eq!(state.stats().clicks, 2);

    tokio::time::sleep(Duration::from_millis(1_100)).await;

    let state = handle.query_state().await.unwrap();
    assert!(!state.card(CardId(0)).unwrap().is_flipped);
    assert!(!state.card(CardId(1)).unwrap().is_flipped);
    assert!(state.flipped().is_empty());
    assert!(state.can_flip());

    assert_eq!(
        handle.flip(CardId(2)).await.unwrap(),
        FlipOutcome::Flipped(CardId(2))
    );
}

#[tokio::test(start_paused = true)]
async fn test_flipping_same_card_twice_is_ignored() {
    let (_runtime, handle) = started(Difficulty::Medium).await;

    handle.flip(CardId(3)).await.unwrap();
    assert_eq!(
        handle.flip(CardId(3)).await.unwrap(),
        FlipOutcome::Rejected(FlipRejection::AlreadyFlipped)
    );
    assert_eq!(
        handle.flip(CardId(99)).await.unwrap(),
        FlipOutcome::Rejected(FlipRejection::UnknownCard)
    );

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.stats().clicks, 1);
    assert_eq!(state.flipped(), &[CardId(3)]);
}

/// A failed draw leaves the session idle with the error message shown.
#[tokio::test(start_paused = true)]
async fn test_fetch_failure_returns_to_idle() {
    let runtime = runtime_with(BrokenCatalog).await;
    let handle = runtime.handle();

    let error = handle.start(Difficulty::Easy).await.unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::Fetch(FetchError::Status { status: 503, .. })
    ));

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.status(), Status::Idle);
    assert!(state.cards().is_empty());
    assert_eq!(state.message(), Some(FETCH_ERROR_MESSAGE));
    assert!(!handle.timer_running().await.unwrap());
}

/// Too few entries in the catalog is reported the same way as a network failure.
#[tokio::test(start_paused = true)]
async fn test_short_catalog_fails_start() {
    let runtime = runtime_with(StaticCatalog::seeded(roster(4), 1)).await;
    let handle = runtime.handle();

    let error = handle.start(Difficulty::Easy).await.unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::Fetch(FetchError::NotEnoughEntries {
            requested: 6,
            available: 4
        })
    ));
    assert_eq!(
        handle.query_state().await.unwrap().message(),
        Some(FETCH_ERROR_MESSAGE)
    );
}

#[tokio::test(start_paused = true)]
async fn test_reset_stops_clock_and_clears_board() {
    let (_runtime, handle) = started(Difficulty::Easy).await;

    handle.flip(CardId(0)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert_eq!(handle.query_state().await.unwrap().time_left(), 118);

    handle.reset().await.unwrap();
    assert!(!handle.timer_running().await.unwrap());

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.status(), Status::Idle);
    assert!(state.cards().is_empty());
    assert_eq!(state.stats().clicks, 0);
    assert_eq!(state.time_left(), 0);
    assert_eq!(state.message(), None);

    // No ticks arrive after a reset.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.query_state().await.unwrap().time_left(), 0);
}

/// A mismatch pending from an earlier game does not touch the next board.
#[tokio::test(start_paused = true)]
async fn test_pending_mismatch_from_previous_game_is_ignored() {
    let (_runtime, handle) = started(Difficulty::Easy).await;

    handle.flip(CardId(0)).await.unwrap();
    handle.flip(CardId(1)).await.unwrap();

    handle.reset().await.unwrap();
    handle.start(Difficulty::Easy).await.unwrap();
    assert_eq!(
        handle.flip(CardId(4)).await.unwrap(),
        FlipOutcome::Flipped(CardId(4))
    );

    tokio::time::sleep(Duration::from_millis(1_500)).await;

    let state = handle.query_state().await.unwrap();
    assert!(state.card(CardId(4)).unwrap().is_flipped);
    assert_eq!(state.flipped(), &[CardId(4)]);
}

/// Restarting mid-game starts a fresh clock from the new preset.
#[tokio::test(start_paused = true)]
async fn test_restart_replaces_running_clock() {
    let (_runtime, handle) = started(Difficulty::Easy).await;

    tokio::time::sleep(Duration::from_millis(10_500)).await;
    assert_eq!(handle.query_state().await.unwrap().time_left(), 110);

    handle.start(Difficulty::Hard).await.unwrap();
    assert_eq!(handle.query_state().await.unwrap().time_left(), 60);

    tokio::time::sleep(Duration::from_millis(3_500)).await;
    // Only one clock ticks: the old one would make this 54.
    assert_eq!(handle.query_state().await.unwrap().time_left(), 57);
}

/// A reset while the board is loading cancels that start.
#[tokio::test(start_paused = true)]
async fn test_start_superseded_by_reset() {
    let runtime = runtime_with(SlowCatalog {
        inner: StaticCatalog::seeded(roster(24), 5),
        delay: Duration::from_secs(2),
    })
    .await;
    let handle = runtime.handle();

    let pending = tokio::spawn({
        let handle = handle.clone();
        async move { handle.start(Difficulty::Medium).await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        handle.query_state().await.unwrap().status(),
        Status::Loading
    );
    handle.reset().await.unwrap();

    let result = pending.await.expect("start task should not panic");
    assert!(matches!(result, Err(RuntimeError::Superseded { .. })));

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.status(), Status::Idle);
    assert!(state.cards().is_empty());
    assert!(!handle.timer_running().await.unwrap());
}

/// The power-up shows every card for three seconds, then cools down for thirty.
#[tokio::test(start_paused = true)]
async fn test_power_up_reveal_and_cooldown() {
    let (_runtime, handle) = started(Difficulty::Easy).await;

    handle.flip(CardId(0)).await.unwrap();
    handle.flip(CardId(6)).await.unwrap();

    assert!(handle.activate_power_up().await.unwrap());
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.power_up(), PowerUpPhase::Revealing);
    assert!(state.cards().iter().all(|card| card.is_face_up()));
    assert_eq!(state.stats().clicks, 2);

    // Revealed cards can still be selected.
    assert_eq!(
        handle.flip(CardId(1)).await.unwrap(),
        FlipOutcome::Flipped(CardId(1))
    );
    assert!(!handle.activate_power_up().await.unwrap());

    tokio::time::sleep(Duration::from_millis(3_100)).await;
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.power_up(), PowerUpPhase::CoolingDown);
    assert!(state.card(CardId(0)).unwrap().is_matched);
    assert!(state.card(CardId(1)).unwrap().is_flipped);
    assert!(!state.card(CardId(2)).unwrap().is_face_up());
    assert!(!handle.activate_power_up().await.unwrap());

    tokio::time::sleep(Duration::from_secs(30)).await;
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.power_up(), PowerUpPhase::Ready);
    assert!(handle.activate_power_up().await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_power_up_unavailable_outside_play() {
    let runtime = runtime_with(StaticCatalog::seeded(roster(24), 3)).await;
    let handle = runtime.handle();

    assert!(!handle.activate_power_up().await.unwrap());

    handle.start(Difficulty::Easy).await.unwrap();
    handle.reset().await.unwrap();
    assert!(!handle.activate_power_up().await.unwrap());
}

/// Observers see the whole game through the event bus.
#[tokio::test(start_paused = true)]
async fn test_observer_records_win() {
    let runtime = runtime_with(StaticCatalog::seeded(roster(24), 9)).await;
    let handle = runtime.handle();
    let observer = spawn_observer(handle.event_bus(), Recorder::default());

    handle.start(Difficulty::Easy).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    for k in 0..6 {
        handle.flip(CardId(k)).await.unwrap();
        handle.flip(CardId(k + 6)).await.unwrap();
    }

    drop(handle);
    runtime.shutdown().await.expect("Runtime should shut down");

    let recorder = observer.await.expect("observer task should finish");
    assert!(recorder.won);
    assert!(!recorder.lost);
    assert!(recorder.boards >= 13);
    assert_eq!(recorder.last_clock, Some(119));
    assert_eq!(recorder.statuses.last(), Some(&Status::Won));
    assert!(recorder.statuses.contains(&Status::Playing));
    assert_eq!(recorder.messages.last().map(String::as_str), Some(WIN_MESSAGE));
    // Loading, dealt, won.
    assert_eq!(recorder.power_ups, vec![false, true, false]);

    let stats = recorder.last_stats.expect("stats were published");
    assert_eq!(stats.clicks, 12);
    assert_eq!(stats.matched_pairs, 6);
    assert_eq!(stats.total_pairs, 6);
}

/// Observers learn when the power-up can be used, through a full reveal and cooldown.
#[tokio::test(start_paused = true)]
async fn test_observer_tracks_power_up_availability() {
    let runtime = runtime_with(StaticCatalog::seeded(roster(24), 5)).await;
    let handle = runtime.handle();
    let observer = spawn_observer(handle.event_bus(), Recorder::default());

    handle.start(Difficulty::Easy).await.unwrap();
    let state = handle.query_state().await.unwrap();
    assert!(state.power_up_available());

    assert!(handle.activate_power_up().await.unwrap());
    tokio::time::sleep(Duration::from_millis(3_100)).await;
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(handle.query_state().await.unwrap().power_up_available());

    handle.reset().await.unwrap();

    drop(handle);
    runtime.shutdown().await.expect("Runtime should shut down");

    let recorder = observer.await.expect("observer task should finish");
    // Loading, dealt, revealing, cooling down, ready again, reset.
    assert_eq!(
        recorder.power_ups,
        vec![false, true, false, false, true, false]
    );
}

/// Running out of time also withdraws the power-up.
#[tokio::test(start_paused = true)]
async fn test_observer_sees_power_up_withdrawn_on_loss() {
    let runtime = runtime_with(StaticCatalog::seeded(roster(24), 2)).await;
    let handle = runtime.handle();
    let observer = spawn_observer(handle.event_bus(), Recorder::default());

    handle.start(Difficulty::Hard).await.unwrap();
    tokio::time::sleep(Duration::from_millis(61_500)).await;
    assert_eq!(handle.query_state().await.unwrap().status(), Status::Lost);

    drop(handle);
    runtime.shutdown().await.expect("Runtime should shut down");

    let recorder = observer.await.expect("observer task should finish");
    assert!(recorder.lost);
    assert_eq!(recorder.power_ups, vec![false, true, false]);
}
