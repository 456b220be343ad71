use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use serde_json::json;

use common::time::now_epoch_seconds;
use session::error::SessionError;
use session::options::SessionStoreOptions;
use session::store::{DEFAULT_MAX_AGE, SessionStore};

use mock_store::InMemorySessionRepository;

fn store_with(repo: Arc<InMemorySessionRepository>) -> SessionStore {
    SessionStore::new(repo, &SessionStoreOptions::default())
}

#[tokio::test]
async fn operations_before_setup_fail_with_not_ready() {
    let repo = Arc::new(InMemorySessionRepository::default());
    let store = store_with(repo.clone());

    assert!(matches!(
        store.get("sid").await,
        Err(SessionError::NotReady)
    ));
    assert!(matches!(
        store.set("sid", json!({}), None).await,
        Err(SessionError::NotReady)
    ));
    assert!(matches!(
        store.destroy("sid").await,
        Err(SessionError::NotReady)
    ));

    // Nothing reached the repository.
    assert!(repo.rows.lock().await.is_empty());
}

#[tokio::test]
async fn get_unknown_key_returns_none() -> anyhow::Result<()> {
    let store = store_with(Arc::new(InMemorySessionRepository::default()));
    store.setup().await?;

    assert_eq!(store.get("never-set").await?, None);
    Ok(())
}

#[tokio::test]
async fn set_then_get_round_trips() -> anyhow::Result<()> {
    let store = store_with(Arc::new(InMemorySessionRepository::default()));
    store.setup().await?;

    let payload = json!({"user": {"id": 42, "role": 1}, "csrf": "tok"});
    store.set("sid", payload.clone(), None).await?;

    assert_eq!(store.get("sid").await?, Some(payload));
    Ok(())
}

#[tokio::test]
async fn second_set_updates_in_place() -> anyhow::Result<()> {
    let repo = Arc::new(InMemorySessionRepository::default());
    let store = store_with(repo.clone());
    store.setup().await?;

    store.set("sid", json!({"v": 1}), None).await?;
    store.set("sid", json!({"v": 2}), None).await?;

    assert_eq!(store.get("sid").await?, Some(json!({"v": 2})));
    assert_eq!(repo.rows.lock().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn destroy_then_get_returns_none() -> anyhow::Result<()> {
    let store = store_with(Arc::new(InMemorySessionRepository::default()));
    store.setup().await?;

    store.set("sid", json!({"v": 1}), None).await?;
    store.destroy("sid").await?;

    assert_eq!(store.get("sid").await?, None);

    // Destroying an absent key is not an error.
    store.destroy("sid").await?;
    Ok(())
}

#[tokio::test]
async fn default_max_age_is_45_minutes() -> anyhow::Result<()> {
    let repo = Arc::new(InMemorySessionRepository::default());
    let store = store_with(repo.clone());
    store.setup().await?;

    store.set("sid", json!({}), None).await?;

    let expiry = repo.rows.lock().await.get("sid").unwrap().expiry_s;
    let expected = now_epoch_seconds() + DEFAULT_MAX_AGE.as_secs_f64();
    assert!((expiry - expected).abs() < 5.0, "expiry {expiry} != {expected}");
    Ok(())
}

#[tokio::test]
async fn explicit_max_age_overrides_default() -> anyhow::Result<()> {
    let repo = Arc::new(InMemorySessionRepository::default());
    let store = store_with(repo.clone());
    store.setup().await?;

    store
        .set("sid", json!({}), Some(Duration::from_secs(10)))
        .await?;

    let expiry = repo.rows.lock().await.get("sid").unwrap().expiry_s;
    let expected = now_epoch_seconds() + 10.0;
    assert!((expiry - expected).abs() < 5.0);
    Ok(())
}

#[tokio::test]
async fn setup_is_idempotent() -> anyhow::Result<()> {
    let repo = Arc::new(InMemorySessionRepository::default());
    let store = store_with(repo.clone());

    store.setup().await?;
    store.setup().await?;

    assert!(store.ready());
    assert_eq!(repo.create_calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn create_false_skips_schema_creation() -> anyhow::Result<()> {
    let repo = Arc::new(InMemorySessionRepository::default());
    let options = SessionStoreOptions {
        create: false,
        ..Default::default()
    };
    let store = SessionStore::new(repo.clone(), &options);

    store.setup().await?;

    assert!(store.ready());
    assert_eq!(repo.create_calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn ready_watch_flips_on_setup() -> anyhow::Result<()> {
    let store = store_with(Arc::new(InMemorySessionRepository::default()));

    let mut rx = store.subscribe_ready();
    assert!(!*rx.borrow());

    store.setup().await?;

    rx.changed().await?;
    assert!(*rx.borrow());
    Ok(())
}
