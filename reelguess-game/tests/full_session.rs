use reelguess_game::{
    ClueBoard, DateKey, FixtureCatalog, GameMode, GameSession, GameStatus, GuessHistoryEntry,
    GuessOutcome, MAX_ATTEMPTS, MemoryStorage, MovieCatalog, MovieId, MovieRecord,
    ResultSummary, SessionSnapshot, SessionStorage,
};

fn today() -> DateKey {
    "2026-10-16".parse().unwrap()
}

fn catalog() -> FixtureCatalog {
    FixtureCatalog::bundled().unwrap()
}

/// Movies with details that are not the mystery, in bank order.
fn decoys(catalog: &FixtureCatalog, mystery: MovieId) -> Vec<MovieRecord> {
    catalog
        .records()
        .filter(|record| record.id != mystery)
        .cloned()
        .collect()
}

fn stored(storage: &MemoryStorage, key: &str) -> SessionSnapshot {
    SessionSnapshot::from_json(&storage.get(key).unwrap().unwrap()).unwrap()
}

#[test]
fn daily_session_resumes_after_reload() {
    let storage = MemoryStorage::new();
    let mut session = GameSession::open_daily(catalog(), storage.clone(), today()).unwrap();
    let mystery = session.mystery().id;
    for guess in decoys(session.catalog(), mystery).into_iter().take(2) {
        session.submit_guess(guess);
    }
    let before = session.snapshot();
    drop(session);

    let resumed = GameSession::open_daily(catalog(), storage, today()).unwrap();
    assert_eq!(resumed.mystery().id, mystery);
    assert_eq!(resumed.attempts(), 2);
    assert_eq!(resumed.snapshot(), before);
    assert_eq!(resumed.status(), GameStatus::Playing);
}

#[test]
fn finished_daily_session_stays_finished() {
    let storage = MemoryStorage::new();
    let mut session = GameSession::open_daily(catalog(), storage.clone(), today()).unwrap();
    let mystery = session.mystery().clone();
    session.submit_guess(mystery.clone());
    drop(session);

    let mut resumed = GameSession::open_daily(catalog(), storage, today()).unwrap();
    assert_eq!(resumed.status(), GameStatus::Won);
    assert_eq!(
        resumed.submit_guess(mystery),
        GuessOutcome::Ignored(GameStatus::Won)
    );
    assert_eq!(resumed.attempts(), 1);
}

#[test]
fn snapshot_from_another_day_is_discarded() {
    let storage = MemoryStorage::new();
    let yesterday: DateKey = "2026-10-15".parse().unwrap();
    let mut session = GameSession::open_daily(catalog(), storage.clone(), today()).unwrap();
    let mystery = session.mystery().id;
    let guess = decoys(session.catalog(), mystery).remove(0);
    session.submit_guess(guess);
    let mut stale = session.snapshot();
    stale.date = yesterday;
    drop(session);
    storage
        .set("daily-2026-10-16", &stale.to_json().unwrap())
        .unwrap();

    let fresh = GameSession::open_daily(catalog(), storage.clone(), today()).unwrap();
    assert!(fresh.guesses().is_empty());
    assert!(fresh.clues().is_empty());
    let saved = stored(&storage, "daily-2026-10-16");
    assert_eq!(saved.date, today());
    assert!(saved.guesses.is_empty());
}

#[test]
fn corrupt_snapshot_is_replaced() {
    let storage = MemoryStorage::new();
    storage.set("daily-2026-10-16", "{\"date\": 17").unwrap();

    let session = GameSession::open_daily(catalog(), storage.clone(), today()).unwrap();
    assert_eq!(session.status(), GameStatus::Playing);
    assert!(session.guesses().is_empty());
    assert!(stored(&storage, "daily-2026-10-16").guesses.is_empty());
}

#[test]
fn snapshots_breaking_attempt_rules_are_replaced() {
    let cases = [
        (MAX_ATTEMPTS + 1, GameStatus::Lost),
        (3, GameStatus::Lost),
        (MAX_ATTEMPTS, GameStatus::Playing),
    ];
    for (count, state) in cases {
        let storage = MemoryStorage::new();
        let session = GameSession::open_daily(catalog(), storage.clone(), today()).unwrap();
        let mut forged = session.snapshot();
        for guess in decoys(session.catalog(), session.mystery().id)
            .into_iter()
            .take(count)
        {
            forged
                .guesses
                .push(GuessHistoryEntry::new(session.mystery(), guess));
        }
        forged.state = state;
        drop(session);
        storage
            .set("daily-2026-10-16", &forged.to_json().unwrap())
            .unwrap();

        let fresh = GameSession::open_daily(catalog(), storage.clone(), today()).unwrap();
        assert_eq!(fresh.status(), GameStatus::Playing, "{count} guesses {state}");
        assert!(fresh.guesses().is_empty());
        assert!(stored(&storage, "daily-2026-10-16").guesses.is_empty());
    }
}

#[test]
fn snapshot_claiming_a_different_winner_is_replaced() {
    let storage = MemoryStorage::new();
    let mut session = GameSession::open_daily(catalog(), storage.clone(), today()).unwrap();
    let mystery = session.mystery().id;
    let decoy = decoys(session.catalog(), mystery).remove(0);
    session.submit_guess(decoy);
    let mut forged = session.snapshot();
    forged.state = GameStatus::Won;
    drop(session);
    storage
        .set("daily-2026-10-16", &forged.to_json().unwrap())
        .unwrap();

    let fresh = GameSession::open_daily(catalog(), storage, today()).unwrap();
    assert_eq!(fresh.status(), GameStatus::Playing);
    assert!(fresh.guesses().is_empty());
}

#[test]
fn random_session_resumes_with_same_mystery() {
    let storage = MemoryStorage::new();
    let mut session = GameSession::open_random(catalog(), storage.clone(), today(), 0xBEEF).unwrap();
    let mystery = session.mystery().id;
    let guess = decoys(session.catalog(), mystery).remove(0);
    session.submit_guess(guess);
    assert!(storage.contains("random-48879"));
    drop(session);

    // Random sessions are not tied to a calendar day.
    let tomorrow: DateKey = "2026-10-17".parse().unwrap();
    let resumed = GameSession::open_random(catalog(), storage, tomorrow, 0xBEEF).unwrap();
    assert_eq!(resumed.mystery().id, mystery);
    assert_eq!(resumed.attempts(), 1);
    assert_eq!(resumed.mode(), GameMode::Random);
}

#[test]
fn missing_details_degrade_the_mystery() {
    let catalog = FixtureCatalog::from_json(r#"{"bank": [7], "movies": []}"#).unwrap();
    let mut session = GameSession::open_daily(catalog, MemoryStorage::new(), today()).unwrap();
    assert_eq!(session.mystery(), &MovieRecord::degraded(MovieId(7)));

    let heat = FixtureCatalog::bundled()
        .unwrap()
        .find_by_title("Heat")
        .cloned()
        .unwrap();
    session.submit_guess(heat);
    let feedback = &session.guesses()[0].feedback;
    assert!(feedback.cast.iter().all(|member| !member.matched));
    assert!(feedback.genres.iter().all(|genre| !genre.matched));
}

#[test]
fn losing_run_then_new_random_game() {
    let storage = MemoryStorage::new();
    let mut session = GameSession::open_daily(catalog(), storage.clone(), today()).unwrap();
    let mystery = session.mystery().id;
    for guess in decoys(session.catalog(), mystery)
        .into_iter()
        .take(MAX_ATTEMPTS)
    {
        assert!(matches!(
            session.submit_guess(guess),
            GuessOutcome::Recorded { .. }
        ));
    }
    assert_eq!(session.status(), GameStatus::Lost);

    let now = today().date().and_hms_opt(22, 0, 0).unwrap();
    let summary = ResultSummary::from_session(&session, now);
    assert_eq!(summary.status, GameStatus::Lost);
    assert_eq!(summary.attempts, MAX_ATTEMPTS);
    assert_eq!(summary.countdown(), "02:00:00");
    assert!(!ClueBoard::from_session(&session).is_empty());

    session.start_new_session(GameMode::Random).unwrap();
    assert_eq!(session.status(), GameStatus::Playing);
    assert_eq!(session.remaining_attempts(), MAX_ATTEMPTS);
    assert!(
        session
            .catalog()
            .candidate_ids()
            .contains(&session.mystery().id)
    );
    assert_eq!(stored(&storage, "daily-2026-10-16").state, GameStatus::Lost);
}
