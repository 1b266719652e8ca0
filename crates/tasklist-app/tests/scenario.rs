//! End-to-end store scenarios against the file-backed slot.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::fs;

use tasklist_app::view::{EMPTY_COLLECTION_MESSAGE, render};
use tasklist_app::{Intent, Outcome, TaskStore};
use tasklist_core::Filter;
use tasklist_store_fs::FileStore;
use tempfile::TempDir;

fn setup() -> (TempDir, FileStore) {
    let dir = TempDir::with_prefix("tasklist-scenario-").expect("create temp dir");
    let store = FileStore::open(dir.path()).expect("open file store");
    (dir, store)
}

#[test]
fn buy_milk_lifecycle() {
    let (_dir, slot) = setup();
    let mut store = TaskStore::open(&slot);
    assert!(store.is_empty());

    let task = store.add("Buy milk").expect("add task");
    assert_eq!(store.len(), 1);
    assert_eq!(store.remaining_count(), 1);

    store.toggle(task.id).expect("toggle task");
    assert_eq!(store.remaining_count(), 0);
    store.set_filter(Filter::Completed);
    assert_eq!(store.filtered().len(), 1);

    assert_eq!(store.clear_completed(), 1);
    assert!(store.is_empty());

    let view = render(&store.snapshot());
    assert_eq!(view.summary, "0 tasks remaining");
    assert_eq!(view.empty_state.as_deref(), Some(EMPTY_COLLECTION_MESSAGE));
}

#[test]
fn state_survives_reopen_but_filter_resets() {
    let (dir, slot) = setup();
    {
        let mut store = TaskStore::open(&slot);
        for text in ["one", "two", "three"] {
            store
                .apply(Intent::AddRequested(text.into()))
                .expect("add intent");
        }
        let second = store.tasks()[1].id;
        store.toggle(second).expect("toggle second");
        store.set_filter(Filter::Active);
    }

    let raw = fs::read_to_string(dir.path().join("tasks.json")).expect("read slot file");
    assert!(raw.starts_with('['));
    assert!(raw.contains("\"completedAt\""));

    let reopened = TaskStore::open(&slot);
    assert_eq!(reopened.filter(), Filter::All);
    let texts: Vec<_> = reopened.tasks().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["one", "two", "three"]);
    assert!(reopened.tasks()[1].completed);
    assert!(reopened.tasks()[1].completed_at.is_some());
    assert!(reopened.tasks()[0].completed_at.is_none());
}

#[test]
fn corrupt_slot_file_starts_empty_and_is_replaced_on_next_save() {
    let (dir, slot) = setup();
    fs::write(dir.path().join("tasks.json"), "{\"a\":1}").expect("write corrupt payload");

    let mut store = TaskStore::open(&slot);
    assert!(store.is_empty());

    let outcome = store
        .apply(Intent::AddRequested("fresh start".into()))
        .expect("add after corruption");
    assert!(matches!(outcome, Outcome::Added(_)));

    let reopened = TaskStore::open(&slot);
    assert_eq!(reopened.len(), 1);
}

#[test]
fn quota_failure_keeps_session_running() {
    let (_dir, slot) = setup();
    let slot = slot.with_quota(256);
    let mut store = TaskStore::open(&slot);

    store.add("short").expect("first add fits");
    assert!(store.is_durable());

    store
        .add(&"long text ".repeat(20))
        .expect("second add still succeeds in memory");
    assert!(!store.is_durable());
    assert_eq!(store.len(), 2);

    let reopened = TaskStore::open(&slot);
    assert_eq!(reopened.len(), 1);
}
