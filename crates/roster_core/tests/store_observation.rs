use roster_core::{Employee, EmployeeStore, StoreEvent};
use std::time::Duration;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(100);

#[tokio::test]
async fn list_subscription_emits_current_contents_first() {
    let store = EmployeeStore::open_in_memory().unwrap();
    let mut subscription = store.fetch_all();

    let first = timeout(WAIT, subscription.next()).await.unwrap().unwrap();
    assert!(first.is_empty());
}

#[tokio::test]
async fn list_subscription_emits_after_each_commit() {
    let store = EmployeeStore::open_in_memory().unwrap();
    let mut subscription = store.fetch_all();
    timeout(WAIT, subscription.next()).await.unwrap().unwrap();

    let id = store
        .insert(Employee::new("Ann", "ann@x.com"))
        .await
        .unwrap();
    let snapshot = timeout(WAIT, subscription.next()).await.unwrap().unwrap();
    assert_eq!(snapshot, vec![Employee::with_id(id, "Ann", "ann@x.com")]);

    assert!(store.delete(Employee::key(id)).await.unwrap());
    let snapshot = timeout(WAIT, subscription.next()).await.unwrap().unwrap();
    assert!(snapshot.is_empty());
}

#[tokio::test]
async fn list_subscription_stays_quiet_without_changes() {
    let store = EmployeeStore::open_in_memory().unwrap();
    let mut subscription = store.fetch_all();
    timeout(WAIT, subscription.next()).await.unwrap().unwrap();

    assert!(!store.delete(Employee::key(42)).await.unwrap());
    assert!(timeout(QUIET, subscription.next()).await.is_err());
}

#[tokio::test]
async fn queued_commits_coalesce_into_latest_snapshot() {
    let store = EmployeeStore::open_in_memory().unwrap();
    let mut subscription = store.fetch_all();
    timeout(WAIT, subscription.next()).await.unwrap().unwrap();

    for name in ["A", "B", "C"] {
        store
            .insert(Employee::new(name, format!("{name}@x.com")))
            .await
            .unwrap();
    }

    let snapshot = timeout(WAIT, subscription.next()).await.unwrap().unwrap();
    assert_eq!(snapshot.len(), 3);
}

#[tokio::test]
async fn by_id_subscription_tracks_updates() {
    let store = EmployeeStore::open_in_memory().unwrap();
    let id = store.insert(Employee::new("Old", "old@x.com")).await.unwrap();

    let mut subscription = store.fetch_by_id(id);
    let first = timeout(WAIT, subscription.next()).await.unwrap().unwrap();
    assert_eq!(first.name, "Old");

    assert!(store
        .update(Employee::with_id(id, "New", "new@x.com"))
        .await
        .unwrap());
    let second = timeout(WAIT, subscription.next()).await.unwrap().unwrap();
    assert_eq!(second, Employee::with_id(id, "New", "new@x.com"));
}

#[tokio::test]
async fn by_id_subscription_ignores_other_rows_and_pends_when_absent() {
    let store = EmployeeStore::open_in_memory().unwrap();
    let mut subscription = store.fetch_by_id(999);
    assert_eq!(subscription.id(), 999);

    store.insert(Employee::new("Other", "o@x.com")).await.unwrap();
    assert!(timeout(QUIET, subscription.next()).await.is_err());
}

#[tokio::test]
async fn events_are_published_only_for_matched_mutations() {
    let store = EmployeeStore::open_in_memory().unwrap();
    let mut events = store.subscribe_events();

    let id = store.insert(Employee::new("A", "a@x.com")).await.unwrap();
    assert!(!store
        .update(Employee::with_id(id + 1, "X", "x@x.com"))
        .await
        .unwrap());
    assert!(store
        .update(Employee::with_id(id, "B", "b@x.com"))
        .await
        .unwrap());
    assert!(store.delete(Employee::key(id)).await.unwrap());

    assert_eq!(events.recv().await.unwrap(), StoreEvent::Inserted { id });
    assert_eq!(events.recv().await.unwrap(), StoreEvent::Updated { id });
    assert_eq!(events.recv().await.unwrap(), StoreEvent::Deleted { id });
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn one_shot_loads_match_committed_state() {
    let store = EmployeeStore::open_in_memory().unwrap();
    let id = store.insert(Employee::new("A", "a@x.com")).await.unwrap();

    assert_eq!(store.load_all().await.unwrap().len(), 1);
    assert_eq!(
        store.load_by_id(id).await.unwrap(),
        Some(Employee::with_id(id, "A", "a@x.com"))
    );
    assert_eq!(store.load_by_id(id + 1).await.unwrap(), None);
}

#[tokio::test]
async fn cloned_handles_share_one_table() {
    let dir = tempfile::tempdir().unwrap();
    let store = EmployeeStore::open(dir.path().join("roster_employees.sqlite3")).unwrap();
    let clone = store.clone();

    let id = clone.insert(Employee::new("A", "a@x.com")).await.unwrap();
    assert!(store.load_by_id(id).await.unwrap().is_some());
}

#[tokio::test]
async fn by_id_subscription_skips_updates_to_identical_values() {
    let store = EmployeeStore::open_in_memory().unwrap();
    let id = store.insert(Employee::new("Same", "same@x.com")).await.unwrap();

    let mut subscription = store.fetch_by_id(id);
    timeout(WAIT, subscription.next()).await.unwrap().unwrap();

    assert!(store
        .update(Employee::with_id(id, "Same", "same@x.com"))
        .await
        .unwrap());
    assert!(timeout(QUIET, subscription.next()).await.is_err());

    assert!(store
        .update(Employee::with_id(id, "Changed", "same@x.com"))
        .await
        .unwrap());
    let changed = timeout(WAIT, subscription.next()).await.unwrap().unwrap();
    assert_eq!(changed.name, "Changed");
}
