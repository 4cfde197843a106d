use std::collections::BTreeSet;
use std::hash::Hasher;

use reelguess_game::{
    DateKey, FixtureCatalog, GameSession, MemoryStorage, MovieCatalog, SessionSnapshot,
    SessionStorage,
};
use serde_json::Value;
use twox_hash::XxHash64;

fn snapshot_hash(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}

fn played_snapshot(date: &str) -> String {
    let storage = MemoryStorage::new();
    let date: DateKey = date.parse().unwrap();
    let catalog = FixtureCatalog::bundled().unwrap();
    let mut session = GameSession::open_daily(catalog, storage.clone(), date).unwrap();
    let mystery = session.mystery().id;
    let guesses: Vec<_> = session
        .catalog()
        .records()
        .filter(|record| record.id != mystery)
        .take(3)
        .cloned()
        .collect();
    for guess in guesses {
        session.submit_guess(guess);
    }
    storage.get(&format!("daily-{date}")).unwrap().unwrap()
}

fn keys(value: &Value) -> BTreeSet<&str> {
    value
        .as_object()
        .map(|map| map.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

#[test]
fn stored_snapshot_is_reproducible() {
    let first = played_snapshot("2026-10-16");
    let second = played_snapshot("2026-10-16");
    assert_eq!(
        snapshot_hash(first.as_bytes()),
        snapshot_hash(second.as_bytes()),
        "snapshot drifted between identical runs\n{first}"
    );
    let parsed = SessionSnapshot::from_json(&first).unwrap();
    assert_eq!(parsed.to_json().unwrap(), first);
}

#[test]
fn stored_snapshot_uses_wire_field_names() {
    let raw = played_snapshot("2026-02-28");
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        keys(&value),
        BTreeSet::from(["date", "globalClues", "guesses", "state"])
    );
    assert_eq!(
        keys(&value["globalClues"]),
        BTreeSet::from([
            "durationRange",
            "foundCast",
            "foundCompanies",
            "foundCountries",
            "foundGenres",
            "foundLanguage",
            "yearRange",
        ])
    );

    let entry = &value["guesses"][0];
    assert_eq!(keys(entry), BTreeSet::from(["feedback", "movie"]));
    assert_eq!(
        keys(&entry["feedback"]),
        BTreeSet::from([
            "cast",
            "director",
            "genres",
            "language",
            "productionCompanies",
            "productionCountries",
            "runtime",
            "year",
        ])
    );
    assert!(entry["feedback"]["year"]["diff"].is_string());
    assert!(entry["feedback"]["genres"][0]["match"].is_boolean());
    assert_eq!(value["state"], "playing");
}
