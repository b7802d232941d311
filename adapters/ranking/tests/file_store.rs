use std::fs;

use snake_arcade_ranking::{
    FileRankingStore, Ranking, RankingEntry, RankingStore, TEXT_HEADER,
};
use tempfile::TempDir;

fn scores(ranking: &Ranking) -> Vec<u32> {
    ranking.entries().iter().map(RankingEntry::score).collect()
}

#[test]
fn records_merge_sort_and_persist() {
    let dir = TempDir::new().expect("temporary directory");
    let mut store = FileRankingStore::in_dir(dir.path());

    for (name, score) in [("Bruno", 50), ("Carla", 200), ("Davi", 10)] {
        let _ = store.record(RankingEntry::new(name, None, score));
    }
    let ranking = store.record(RankingEntry::new("Alice", Some("A-7"), 90));

    assert_eq!(scores(&ranking), vec![200, 90, 50, 10]);
    assert_eq!(ranking.entries()[1].name(), "Alice");
    assert_eq!(ranking.entries()[1].code(), Some("A-7"));

    let reopened = FileRankingStore::in_dir(dir.path());
    assert_eq!(reopened.load(), ranking);

    let text = fs::read_to_string(reopened.text_path()).expect("text export written");
    assert_eq!(
        text,
        format!(
            "{TEXT_HEADER}\n\n1. Carla: 200 points\n2. Alice: 90 points\n3. Bruno: 50 points\n4. Davi: 10 points\n"
        )
    );
}

#[test]
fn missing_files_load_as_empty() {
    let dir = TempDir::new().expect("temporary directory");
    let store = FileRankingStore::in_dir(dir.path().join("not-created-yet"));

    assert!(store.load().is_empty());
}

#[test]
fn corrupt_json_falls_back_to_text_export() {
    let dir = TempDir::new().expect("temporary directory");
    let store = FileRankingStore::in_dir(dir.path());
    fs::write(store.json_path(), "{ not json").expect("write json");
    fs::write(
        store.text_path(),
        format!("{TEXT_HEADER}\n\n1. Eva: 70 points\n2. Rui: 20 points\n"),
    )
    .expect("write text");

    let ranking = store.load();
    assert_eq!(scores(&ranking), vec![70, 20]);
    assert_eq!(ranking.entries()[0].name(), "Eva");
}

#[test]
fn unreadable_everything_starts_empty_and_recovers() {
    let dir = TempDir::new().expect("temporary directory");
    let mut store = FileRankingStore::in_dir(dir.path());
    fs::write(store.json_path(), "[{\"name\": 3}]").expect("write json");
    fs::write(store.text_path(), "garbage").expect("write text");

    assert!(store.load().is_empty());

    let ranking = store.record(RankingEntry::new("", None, 5));
    assert_eq!(ranking.entries()[0].name(), "Player");
    assert_eq!(store.load(), ranking);
}

#[test]
fn record_survives_an_unwritable_directory() {
    let dir = TempDir::new().expect("temporary directory");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "a file where the directory should be").expect("write blocker");
    let mut store = FileRankingStore::in_dir(blocker.join("nested"));

    let ranking = store.record(RankingEntry::new("Zoe", None, 33));

    assert_eq!(scores(&ranking), vec![33]);
    assert!(store.save(&ranking).is_err());
    assert!(store.load().is_empty());
}

#[test]
fn json_keeps_at_most_ten_entries() {
    let dir = TempDir::new().expect("temporary directory");
    let mut store = FileRankingStore::in_dir(dir.path());

    for score in 0..15 {
        let _ = store.record(RankingEntry::new("p", None, score));
    }

    let ranking = store.load();
    assert_eq!(ranking.len(), 10);
    assert_eq!(scores(&ranking), (5..15).rev().collect::<Vec<_>>());
}
