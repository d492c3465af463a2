use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use super::Session;
use crate::config::{ConflictPolicy, SlugConfig};
use crate::core::{FieldValue, ParentRef, RecordSnapshot};
use crate::error::SessionError;
use crate::host::{MemoryHost, MemoryStore};
use crate::view::AliasDraft;

const LOCALE: &str = "en-US";

fn record(id: &str, slug: Option<&str>, parent: Option<&str>) -> RecordSnapshot {
    let mut r = RecordSnapshot::new(id);
    if let Some(slug) = slug {
        r.set("slug", LOCALE, FieldValue::text(slug));
    }
    if let Some(parent) = parent {
        r.set("parent", LOCALE, FieldValue::link(parent));
    }
    r
}

/// root("") <- P("products"), root <- Q("shop"), root <- S("site")
fn make_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.insert(record("root", Some(""), None));
    store.insert(record("P", Some("products"), Some("root")));
    store.insert(record("Q", Some("shop"), Some("root")));
    store.insert(record("S", Some("site"), Some("root")));
    Arc::new(store)
}

fn make_host(slug: Option<&str>, parent: Option<&str>) -> Arc<MemoryHost> {
    Arc::new(MemoryHost::new(record("R", slug, parent), Vec::new()))
}

/// Long enough for any resolution and the debounce window to finish.
async fn settle() {
    sleep(Duration::from_secs(5)).await;
}

fn set_slug(host: &MemoryHost, slug: Option<&str>) {
    host.set_slug("slug", LOCALE, slug);
}

fn set_parent(host: &MemoryHost, id: Option<&str>) {
    let parent = match id {
        Some(id) => ParentRef::linked(id, LOCALE),
        None => ParentRef::Cleared,
    };
    host.set_parent("parent", LOCALE, parent);
}

/// Session on widget under products, settled on `/products/widget`.
async fn started(config: SlugConfig) -> (Session, Arc<MemoryHost>, Arc<MemoryStore>) {
    let host = make_host(Some("widget"), Some("P"));
    let store = make_store();
    let session = Session::start(config, Arc::clone(&host), Arc::clone(&store));
    settle().await;
    assert_eq!(host.paths(), ["/products/widget"]);
    (session, host, store)
}

#[tokio::test(start_paused = true)]
async fn test_widget_end_to_end() {
    let (session, host, _store) = started(SlugConfig::default()).await;

    session.add_alias("/legacy/widget-old").await.unwrap();
    assert_eq!(host.paths(), ["/products/widget", "/legacy/widget-old"]);

    set_slug(&host, Some("gadget"));
    settle().await;
    assert_eq!(host.paths(), ["/products/gadget", "/legacy/widget-old"]);

    let view = session.snapshot();
    assert_eq!(view.paths, host.paths());
    assert!(!view.cyclic);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_rapid_slug_edits_write_once() {
    let (session, host, _store) = started(SlugConfig::default()).await;

    for slug in ["g", "ga", "gad"] {
        set_slug(&host, Some(slug));
        sleep(Duration::from_millis(100)).await;
    }
    sleep(Duration::from_millis(690)).await;
    assert_eq!(host.writes().len(), 1, "written inside the quiet period");

    sleep(Duration::from_millis(20)).await;
    assert_eq!(
        host.writes(),
        [vec!["/products/widget".to_string()], vec!["/products/gad".to_string()]]
    );

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_parent_change_applies_without_debounce() {
    let (session, host, _store) = started(SlugConfig::default()).await;
    let mut view = session.view();
    view.borrow_and_update();

    set_parent(&host, Some("Q"));
    sleep(Duration::from_millis(1)).await;
    assert_eq!(host.paths(), ["/shop/widget"]);

    assert!(view.has_changed().unwrap());
    assert_eq!(view.borrow_and_update().primary(), Some("/shop/widget"));

    set_parent(&host, None);
    sleep(Duration::from_millis(1)).await;
    assert_eq!(host.paths(), ["/widget"]);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_cyclic_parent_sets_flag() {
    let host = make_host(Some("widget"), Some("P"));
    let store = make_store();
    store.insert(record("P", Some("products"), Some("R")));

    let session = Session::start(SlugConfig::default(), Arc::clone(&host), Arc::clone(&store));
    settle().await;

    let view = session.snapshot();
    assert!(view.cyclic);
    assert_eq!(view.paths, ["/products/widget"]);

    set_parent(&host, Some("Q"));
    settle().await;
    let view = session.snapshot();
    assert!(!view.cyclic);
    assert_eq!(view.paths, ["/shop/widget"]);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_fetch_failure_keeps_prior_path() {
    let (session, host, store) = started(SlugConfig::default()).await;
    store.fail("Q");

    set_parent(&host, Some("Q"));
    settle().await;
    assert_eq!(host.paths(), ["/products/widget"]);
    assert_eq!(host.writes().len(), 1);

    // Unknown parent behaves the same
    set_parent(&host, Some("missing"));
    settle().await;
    assert_eq!(host.paths(), ["/products/widget"]);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_detaches_subscriptions() {
    let (session, host, _store) = started(SlugConfig::default()).await;
    assert_eq!(host.subscriber_count(), 2);

    session.shutdown().await;
    assert_eq!(host.subscriber_count(), 0);

    set_slug(&host, Some("gadget"));
    settle().await;
    assert_eq!(host.paths(), ["/products/widget"]);
}

#[tokio::test(start_paused = true)]
async fn test_drop_detaches_subscriptions() {
    let (session, host, _store) = started(SlugConfig::default()).await;

    drop(session);
    sleep(Duration::from_millis(1)).await;
    assert_eq!(host.subscriber_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_last_write_wins_race() {
    let (session, host, store) = started(SlugConfig::default()).await;
    store.delay("Q", Duration::from_secs(3));

    // Slow re-point, then a fast one back
    set_parent(&host, Some("Q"));
    sleep(Duration::from_millis(100)).await;
    set_parent(&host, Some("P"));
    sleep(Duration::from_millis(100)).await;
    assert_eq!(host.paths(), ["/products/widget"]);

    // The slow resolution completes last and is applied
    settle().await;
    assert_eq!(host.paths(), ["/shop/widget"]);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_latest_intent_keeps_newest_parent() {
    let config = SlugConfig {
        conflict_policy: ConflictPolicy::LatestIntent,
        ..SlugConfig::default()
    };
    let (session, host, store) = started(config).await;
    store.delay("Q", Duration::from_secs(3));

    set_parent(&host, Some("Q"));
    sleep(Duration::from_millis(100)).await;
    set_parent(&host, Some("P"));

    settle().await;
    assert_eq!(host.paths(), ["/products/widget"]);
    assert_eq!(host.writes().len(), 1);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_parent_change_drops_queued_slug_path() {
    let (session, host, _store) = started(SlugConfig::default()).await;

    set_slug(&host, Some("gadget"));
    sleep(Duration::from_millis(100)).await;
    set_parent(&host, Some("Q"));

    settle().await;
    assert_eq!(host.paths(), ["/shop/gadget"]);
    assert_eq!(
        host.writes(),
        [vec!["/products/widget".to_string()], vec!["/shop/gadget".to_string()]]
    );

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_parent_change_while_slug_empty() {
    let (session, host, _store) = started(SlugConfig::default()).await;

    set_slug(&host, None);
    settle().await;
    set_parent(&host, Some("Q"));
    settle().await;
    assert_eq!(host.paths(), ["/products/widget"]);

    set_slug(&host, Some("gadget"));
    settle().await;
    assert_eq!(host.paths(), ["/shop/gadget"]);

    // Ancestors are known again; later edits reuse them
    set_slug(&host, Some("gizmo"));
    settle().await;
    assert_eq!(host.paths(), ["/shop/gizmo"]);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_latest_intent_discards_superseded_resolution() {
    let config = SlugConfig {
        conflict_policy: ConflictPolicy::LatestIntent,
        ..SlugConfig::default()
    };
    let (session, host, store) = started(config).await;
    store.delay("Q", Duration::from_secs(3));

    set_parent(&host, Some("Q"));
    set_slug(&host, Some("gadget"));

    sleep(Duration::from_secs(1)).await;
    assert_eq!(host.paths(), ["/products/widget"]);

    settle().await;
    assert_eq!(
        host.writes(),
        [vec!["/products/widget".to_string()], vec!["/shop/gadget".to_string()]]
    );

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_slug_without_primary_resolves_parent() {
    let host = make_host(None, Some("P"));
    let store = make_store();
    let session = Session::start(SlugConfig::default(), Arc::clone(&host), Arc::clone(&store));
    settle().await;
    assert!(host.paths().is_empty());

    set_slug(&host, Some("widget"));
    sleep(Duration::from_millis(100)).await;
    assert!(host.writes().is_empty());

    settle().await;
    assert_eq!(host.paths(), ["/products/widget"]);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_slug_without_parent_is_top_level() {
    let host = make_host(None, None);
    let session = Session::start(SlugConfig::default(), Arc::clone(&host), make_store());

    set_slug(&host, Some("about"));
    settle().await;
    assert_eq!(host.paths(), ["/about"]);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_emptied_slug_keeps_path() {
    let (session, host, _store) = started(SlugConfig::default()).await;

    set_slug(&host, Some("gad"));
    sleep(Duration::from_millis(100)).await;
    set_slug(&host, None);
    settle().await;
    assert_eq!(host.paths(), ["/products/widget"]);
    assert_eq!(host.writes().len(), 1);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_base_slug_removed() {
    let config = SlugConfig {
        base_slug_remove: Some("/site".to_string()),
        ..SlugConfig::default()
    };
    let host = make_host(Some("about"), Some("S"));
    let store = make_store();
    let session = Session::start(config, Arc::clone(&host), Arc::clone(&store));
    settle().await;
    assert_eq!(host.paths(), ["/about"]);

    let fetches = store.fetch_count();
    set_slug(&host, Some("contact"));
    settle().await;
    assert_eq!(host.paths(), ["/contact"]);
    assert_eq!(store.fetch_count(), fetches, "slug edit refetched the chain");

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_slug_edit_reuses_stripped_ancestors() {
    let config = SlugConfig {
        base_slug_remove: Some("/site".to_string()),
        ..SlugConfig::default()
    };
    let host = make_host(Some("about"), Some("D"));
    let store = make_store();
    store.insert(record("D", Some("docs"), Some("S")));
    let session = Session::start(config, Arc::clone(&host), Arc::clone(&store));
    settle().await;
    assert_eq!(host.paths(), ["/docs/about"]);

    let fetches = store.fetch_count();
    set_slug(&host, Some("install"));
    settle().await;
    assert_eq!(host.paths(), ["/docs/install"]);
    assert_eq!(store.fetch_count(), fetches);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_alias_draft_submission() {
    let (session, host, _store) = started(SlugConfig::default()).await;
    let mut draft = AliasDraft::new();

    draft.edit("legacy");
    let err = session.submit_draft(&mut draft).await.unwrap_err();
    assert!(matches!(err, SessionError::Validation(_)));
    assert!(draft.is_invalid());
    assert_eq!(draft.text(), "legacy");
    assert_eq!(host.paths(), ["/products/widget"]);

    draft.edit("/legacy");
    assert!(!draft.is_invalid());
    session.submit_draft(&mut draft).await.unwrap();
    assert_eq!(draft.text(), "");
    assert_eq!(host.paths(), ["/products/widget", "/legacy"]);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_primary_path_cannot_be_removed() {
    let (session, host, _store) = started(SlugConfig::default()).await;
    session.add_alias("/old").await.unwrap();

    assert!(!session.remove_alias("/products/widget").await.unwrap());
    assert_eq!(host.paths(), ["/products/widget", "/old"]);

    assert!(session.remove_alias("/old").await.unwrap());
    assert_eq!(host.paths(), ["/products/widget"]);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_write_failure_keeps_list_in_memory() {
    let (session, host, _store) = started(SlugConfig::default()).await;
    host.fail_writes(true);

    session.add_alias("/old").await.unwrap();
    assert_eq!(host.paths(), ["/products/widget"]);
    assert_eq!(session.snapshot().paths, ["/products/widget", "/old"]);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_restart_with_persisted_paths_writes_nothing() {
    let host = Arc::new(MemoryHost::new(
        record("R", Some("widget"), Some("P")),
        vec!["/products/widget".to_string(), "/old".to_string()],
    ));
    let session = Session::start(SlugConfig::default(), Arc::clone(&host), make_store());
    settle().await;

    assert!(host.writes().is_empty());
    assert_eq!(session.snapshot().paths, ["/products/widget", "/old"]);

    session.shutdown().await;
}
