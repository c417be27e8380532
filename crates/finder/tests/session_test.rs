//! End-to-end tests for the search session: debouncing, clearing,
//! load failures, and teardown.
//!
//! Most tests run on a paused clock so the 300ms quiet period is exact.
//! Races between a running recomputation and the session run on a
//! multi-threaded runtime with a real clock.

use std::sync::Arc;
use std::time::Duration;

use directory::Hospital;
use finder::{
    DEFAULT_DEBOUNCE, FileSource, FinderConfig, FinderError, HospitalSource, LoadState,
    SearchResults, SearchSession, StaticSource,
};
use tokio::time::sleep;

struct FailingSource;

impl HospitalSource for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    fn fetch(&self) -> finder::Result<Vec<Hospital>> {
        Err(FinderError::Source("connection refused".to_string()))
    }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn names(hospitals: &[Hospital]) -> Vec<&str> {
    hospitals.iter().map(|h| h.name.as_str()).collect()
}

/// A session over the sample directory, loaded and settled
async fn loaded_session() -> SearchSession {
    let mut session =
        SearchSession::new(FinderConfig::default(), Arc::new(StaticSource::sample())).unwrap();
    assert_eq!(session.load().await.unwrap(), 6);
    sleep(DEFAULT_DEBOUNCE + ms(1)).await;
    assert_eq!(session.results().hospitals.len(), 6);
    session
}

#[test]
fn test_requires_runtime() {
    let result = SearchSession::new(FinderConfig::default(), Arc::new(StaticSource::sample()));
    assert!(matches!(result, Err(FinderError::NoRuntime)));
}

#[tokio::test(start_paused = true)]
async fn test_initial_state() {
    let session =
        SearchSession::new(FinderConfig::default(), Arc::new(StaticSource::sample())).unwrap();
    let results = session.results();
    assert_eq!(results.generation, 0);
    assert_eq!(results.load_state, LoadState::Loading);
    assert!(results.hospitals.is_empty());
    assert_eq!(session.recompute_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_load_publishes_full_list_after_quiet_period() {
    let mut session =
        SearchSession::new(FinderConfig::default(), Arc::new(StaticSource::sample())).unwrap();
    session.load().await.unwrap();
    assert_eq!(session.load_state(), &LoadState::Loaded);
    assert!(session.is_pending());

    sleep(DEFAULT_DEBOUNCE + ms(1)).await;
    let results = session.results();
    assert_eq!(results.load_state, LoadState::Loaded);
    assert_eq!(results.hospitals.as_slice(), session.hospitals());
    assert_eq!(results.total, 6);
    assert_eq!(session.recompute_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_edits_recomputes_once() {
    let mut session = loaded_session().await;
    let before = session.recompute_count();
    let mut rx = session.subscribe();
    rx.borrow_and_update();

    session.set_name_query("a");
    sleep(ms(100)).await;
    session.set_name_query("ap");
    sleep(ms(100)).await;
    session.set_name_query("apo");

    sleep(ms(299)).await;
    assert_eq!(session.recompute_count(), before);
    assert!(!rx.has_changed().unwrap());

    rx.changed().await.unwrap();
    let results = rx.borrow_and_update().clone();
    assert_eq!(session.recompute_count(), before + 1);
    assert_eq!(results.query.name_query(), "apo");
    assert_eq!(names(&results.hospitals), vec!["Apollo Hospitals"]);

    sleep(ms(1000)).await;
    assert_eq!(session.recompute_count(), before + 1);
}

#[tokio::test(start_paused = true)]
async fn test_edits_across_fields_share_one_window() {
    let mut session = loaded_session().await;
    let before = session.recompute_count();

    session.set_location_query("mumbai");
    sleep(ms(250)).await;
    session.set_tag_query("ortho");
    sleep(ms(250)).await;
    session.set_name_query("koki");
    sleep(ms(250)).await;
    assert_eq!(session.recompute_count(), before);

    sleep(ms(51)).await;
    assert_eq!(session.recompute_count(), before + 1);
    assert_eq!(
        names(&session.results().hospitals),
        vec!["Kokilaben Dhirubhai Ambani Hospital"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_clear_filters_is_immediate() {
    let mut session = loaded_session().await;
    session.set_tag_query("derma");
    sleep(DEFAULT_DEBOUNCE + ms(1)).await;
    assert_eq!(session.results().hospitals.len(), 2);

    session.set_name_query("zzz");
    assert!(session.is_pending());
    let before = session.recompute_count();

    session.clear_filters();
    assert!(!session.is_pending());
    assert_eq!(session.recompute_count(), before + 1);

    let results = session.results();
    assert!(results.query.is_empty());
    assert_eq!(results.hospitals.len(), 6);

    // the cancelled "zzz" edit never lands
    sleep(ms(1000)).await;
    assert_eq!(session.recompute_count(), before + 1);
    assert_eq!(session.results().hospitals.len(), 6);
}

#[tokio::test(start_paused = true)]
async fn test_set_records_is_debounced() {
    let mut session = loaded_session().await;
    session.set_location_query("pune");
    sleep(DEFAULT_DEBOUNCE + ms(1)).await;
    assert!(session.results().hospitals.is_empty());

    session.set_records(vec![
        Hospital::new("p1", "Ruby Hall Clinic", "Pune, Maharashtra", &["cardiology"]),
        Hospital::new("m1", "Lilavati Hospital", "Mumbai, Maharashtra", &["oncology"]),
    ]);
    sleep(ms(100)).await;
    assert!(session.results().hospitals.is_empty());

    sleep(DEFAULT_DEBOUNCE).await;
    let results = session.results();
    assert_eq!(names(&results.hospitals), vec!["Ruby Hall Clinic"]);
    assert_eq!(results.total, 2);
}

#[tokio::test(start_paused = true)]
async fn test_set_records_recovers_from_load_failure() {
    let mut session = SearchSession::new(FinderConfig::default(), Arc::new(FailingSource)).unwrap();
    session.load().await.unwrap_err();
    assert!(matches!(session.results().load_state, LoadState::LoadFailed(_)));

    session.set_records(vec![Hospital::new(
        "p1",
        "Ruby Hall Clinic",
        "Pune, Maharashtra",
        &["cardiology"],
    )]);
    assert_eq!(session.load_state(), &LoadState::Loaded);

    sleep(DEFAULT_DEBOUNCE + ms(1)).await;
    let results = session.results();
    assert_eq!(results.load_state, LoadState::Loaded);
    assert_eq!(names(&results.hospitals), vec!["Ruby Hall Clinic"]);
}

#[tokio::test(start_paused = true)]
async fn test_load_failure_is_reported() {
    let mut session = SearchSession::new(FinderConfig::default(), Arc::new(FailingSource)).unwrap();
    session.set_name_query("apollo");

    let err = session.load().await.unwrap_err();
    assert!(matches!(err, FinderError::Source(_)));

    let results = session.results();
    assert!(matches!(
        results.load_state,
        LoadState::LoadFailed(ref msg) if msg.contains("connection refused")
    ));
    assert_eq!(results.total, 0);
    assert!(results.hospitals.is_empty());
    assert!(!session.is_pending());

    // no retry, and the earlier edit was cancelled
    sleep(ms(1000)).await;
    assert_eq!(session.recompute_count(), 0);
    assert!(matches!(session.load_state(), LoadState::LoadFailed(_)));
}

#[tokio::test(start_paused = true)]
async fn test_reload_publishes_loading_then_loaded() {
    let mut session = loaded_session().await;
    session.set_name_query("apo");
    sleep(DEFAULT_DEBOUNCE + ms(1)).await;

    let mut rx = session.subscribe();
    rx.borrow_and_update();

    assert_eq!(session.reload().await.unwrap(), 6);
    let loading = rx.borrow_and_update().clone();
    assert_eq!(loading.load_state, LoadState::Loading);
    assert!(loading.hospitals.is_empty());
    assert_eq!(loading.total, 0);

    rx.changed().await.unwrap();
    let loaded = rx.borrow_and_update().clone();
    assert_eq!(loaded.load_state, LoadState::Loaded);
    assert_eq!(loaded.generation, loading.generation + 1);
    assert_eq!(loaded.total, 6);
    assert_eq!(names(&loaded.hospitals), vec!["Apollo Hospitals"]);
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_pending_recompute() {
    let mut session = loaded_session().await;
    let rx = session.subscribe();
    let generation = rx.borrow().generation;

    session.set_name_query("max");
    assert!(session.is_pending());
    drop(session);

    sleep(ms(1000)).await;
    assert_eq!(rx.borrow().generation, generation);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_pending_recompute() {
    let mut session = loaded_session().await;
    let before = session.recompute_count();

    session.set_tag_query("onco");
    session.shutdown();

    sleep(ms(1000)).await;
    assert_eq!(session.recompute_count(), before);
}

#[tokio::test(start_paused = true)]
async fn test_custom_debounce() {
    let config = FinderConfig::default().with_debounce_ms(50);
    let mut session = SearchSession::new(config, Arc::new(StaticSource::sample())).unwrap();
    session.load().await.unwrap();

    sleep(ms(51)).await;
    assert_eq!(session.recompute_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_reload_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hospitals.json");
    std::fs::write(
        &path,
        r#"[{"_id": "1", "name": "Apollo Hospitals",
             "location": "Chennai", "specialty": ["cardiology"]}]"#,
    )
    .unwrap();

    let mut session =
        SearchSession::new(FinderConfig::default(), Arc::new(FileSource::new(&path))).unwrap();
    assert_eq!(session.load().await.unwrap(), 1);

    std::fs::write(
        &path,
        r#"[
            {"_id": "1", "name": "Apollo Hospitals", "location": "Chennai"},
            {"_id": "2", "name": "Manipal Hospitals", "location": "Bangalore"}
        ]"#,
    )
    .unwrap();
    assert_eq!(session.reload().await.unwrap(), 2);

    sleep(DEFAULT_DEBOUNCE + ms(1)).await;
    assert_eq!(session.results().hospitals.len(), 2);
    assert_eq!(session.recompute_count(), 1);
}

fn many_hospitals(count: usize) -> Vec<Hospital> {
    (0..count)
        .map(|i| {
            Hospital::new(
                format!("h{i}"),
                format!("City Hospital {i}"),
                "Chennai, Tamil Nadu",
                &["cardiology"],
            )
        })
        .collect()
}

/// Wait on the real clock until the published results match `done`
async fn wait_for(
    session: &SearchSession,
    done: impl Fn(&SearchResults) -> bool,
) -> SearchResults {
    let mut rx = session.subscribe();
    tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            let results = rx.borrow_and_update().clone();
            if done(&results) {
                return results;
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_clear_filters_wins_over_running_recompute() {
    const COUNT: usize = 400_000;
    let config = FinderConfig::default().with_debounce_ms(10);
    let source = StaticSource::new(many_hospitals(COUNT));
    let mut session = SearchSession::new(config, Arc::new(source)).unwrap();
    session.load().await.unwrap();
    wait_for(&session, |r| r.load_state == LoadState::Loaded && r.total == COUNT).await;

    let mut rx = session.subscribe();
    rx.borrow_and_update();

    // let the timer fire so the "zzz" pass is filtering when the clear lands
    session.set_name_query("zzz");
    std::thread::sleep(ms(15));
    session.clear_filters();

    let cleared = session.results();
    assert!(cleared.query.is_empty());
    assert_eq!(cleared.hospitals.len(), COUNT);

    tokio::time::sleep(ms(500)).await;
    let last = rx.borrow_and_update().clone();
    assert!(last.query.is_empty());
    assert_eq!(last.hospitals.len(), COUNT);
    assert_eq!(last.generation, cleared.generation);
    assert!(!session.is_pending());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shutdown_discards_running_recompute() {
    const COUNT: usize = 400_000;
    let config = FinderConfig::default().with_debounce_ms(10);
    let source = StaticSource::new(many_hospitals(COUNT));
    let mut session = SearchSession::new(config, Arc::new(source)).unwrap();
    session.load().await.unwrap();
    let settled = wait_for(&session, |r| r.total == COUNT).await;

    let rx = session.subscribe();
    session.set_name_query("zzz");
    std::thread::sleep(ms(15));
    drop(session);

    tokio::time::sleep(ms(500)).await;
    let last = rx.borrow().clone();
    assert_eq!(last.generation, settled.generation);
    assert_eq!(last.hospitals.len(), COUNT);
}
