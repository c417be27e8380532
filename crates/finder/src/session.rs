//! # Search Session
//!
//! Owns everything the hospital finder page holds between keystrokes:
//! 1. the record list, fetched from a `HospitalSource`
//! 2. the current `QueryState` snapshot
//! 3. the load state (loading, loaded, failed)
//! 4. the single pending recomputation timer
//!
//! Every edit replaces the query snapshot and reschedules recomputation
//! through the `Debouncer`. When the timer fires, the snapshot captured at
//! scheduling time is filtered and published on a `watch` channel. "Clear
//! filters", load start, and load failures publish immediately instead.
//!
//! Each scheduled recomputation carries an epoch. Any later edit, clear,
//! load, or shutdown bumps the epoch, and a recomputation only publishes if
//! its epoch is still current. The check and the send happen under the
//! channel's write lock, so a recomputation that was already running when
//! it was superseded can never overwrite newer results.
//!
//! The session has a single owner; all mutators take `&mut self`. Dropping
//! the session (or calling `shutdown`) invalidates any pending or running
//! recomputation so nothing is published after teardown.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use directory::Hospital;
use pipeline::{FilterPipeline, QueryField, QueryState};

use crate::config::FinderConfig;
use crate::debounce::Debouncer;
use crate::error::{FinderError, Result};
use crate::source::HospitalSource;

/// Where the record list stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    /// Shown instead of results; there is no automatic retry
    LoadFailed(String),
}

/// One published result set.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    /// Increments with every publication
    pub generation: u64,
    pub load_state: LoadState,
    /// The query these results were computed for
    pub query: QueryState,
    pub hospitals: Vec<Hospital>,
    /// Size of the record list these results were filtered from
    pub total: usize,
}

impl SearchResults {
    fn initial() -> Self {
        Self {
            generation: 0,
            load_state: LoadState::Loading,
            query: QueryState::new(),
            hospitals: Vec::new(),
            total: 0,
        }
    }
}

/// Immutable inputs for one recomputation
struct Snapshot {
    hospitals: Arc<Vec<Hospital>>,
    query: QueryState,
    load_state: LoadState,
}

/// Filters snapshots and publishes the results.
///
/// Shared between the session and its pending timer task.
#[derive(Clone)]
struct Publisher {
    pipeline: Arc<FilterPipeline>,
    results: Arc<watch::Sender<SearchResults>>,
    /// Bumped whenever in-flight recomputations become stale.
    /// Only modified under the channel's write lock.
    epoch: Arc<AtomicU64>,
    recomputes: Arc<AtomicU64>,
}

impl Publisher {
    /// Make every recomputation scheduled so far stale. Returns the new epoch.
    fn invalidate(&self) -> u64 {
        let mut epoch = 0;
        self.results.send_if_modified(|_| {
            epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            false
        });
        epoch
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == epoch
    }

    /// Filter `snapshot` and publish it if `epoch` is still current.
    fn recompute(&self, snapshot: Snapshot, epoch: u64) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        let start = Instant::now();
        let total = snapshot.hospitals.len();
        let hospitals = self
            .pipeline
            .apply(snapshot.hospitals.as_ref().clone(), &snapshot.query);
        let elapsed = start.elapsed();

        let published = self.publish(epoch, snapshot.load_state, snapshot.query, hospitals, total);
        if published {
            self.recomputes.fetch_add(1, Ordering::SeqCst);
            debug!("Recomputed results from {} hospitals in {:?}", total, elapsed);
        } else {
            debug!("Discarded stale recomputation after {:?}", elapsed);
        }
        published
    }

    fn publish(
        &self,
        epoch: u64,
        load_state: LoadState,
        query: QueryState,
        hospitals: Vec<Hospital>,
        total: usize,
    ) -> bool {
        self.results.send_if_modified(|current| {
            if !self.is_current(epoch) {
                return false;
            }
            *current = SearchResults {
                generation: current.generation + 1,
                load_state,
                query,
                hospitals,
                total,
            };
            true
        })
    }
}

/// Main session that drives the hospital finder
pub struct SearchSession {
    source: Arc<dyn HospitalSource>,
    hospitals: Arc<Vec<Hospital>>,
    query: QueryState,
    load_state: LoadState,
    debouncer: Debouncer,
    publisher: Publisher,
}

impl SearchSession {
    /// Create a session over `source`.
    ///
    /// Must be called from within a tokio runtime; the debounce timer runs
    /// on it. Nothing is fetched until `load`.
    pub fn new(config: FinderConfig, source: Arc<dyn HospitalSource>) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| FinderError::NoRuntime)?;
        let (results, _) = watch::channel(SearchResults::initial());

        Ok(Self {
            source,
            hospitals: Arc::new(Vec::new()),
            query: QueryState::new(),
            load_state: LoadState::Loading,
            debouncer: Debouncer::new(config.debounce, runtime),
            publisher: Publisher {
                pipeline: Arc::new(FilterPipeline::standard()),
                results: Arc::new(results),
                epoch: Arc::new(AtomicU64::new(0)),
                recomputes: Arc::new(AtomicU64::new(0)),
            },
        })
    }

    /// Fetch records from the source.
    ///
    /// `Loading` is published before the fetch starts. On success the
    /// record list is replaced and a recomputation is scheduled like any
    /// other edit. On failure the session moves to `LoadFailed`, which is
    /// published at once, and the error is returned.
    pub async fn load(&mut self) -> Result<usize> {
        self.load_state = LoadState::Loading;
        self.publish_now(Vec::new(), 0);
        info!("Loading hospitals from {} source", self.source.name());

        let source = self.source.clone();
        let fetched = tokio::task::spawn_blocking(move || source.fetch())
            .await
            .map_err(|e| FinderError::TaskFailed(e.to_string()))
            .and_then(|result| result);

        match fetched {
            Ok(hospitals) => {
                let count = hospitals.len();
                info!("Loaded {} hospitals", count);
                self.set_records(hospitals);
                Ok(count)
            }
            Err(err) => {
                warn!("Failed to load hospitals: {}", err);
                self.load_state = LoadState::LoadFailed(err.to_string());
                self.hospitals = Arc::new(Vec::new());
                self.publish_now(Vec::new(), 0);
                Err(err)
            }
        }
    }

    /// Fetch again from the same source
    pub async fn reload(&mut self) -> Result<usize> {
        self.load().await
    }

    /// Replace the record list and schedule a recomputation.
    ///
    /// Records supplied here count as loaded, even after a failed fetch.
    pub fn set_records(&mut self, hospitals: Vec<Hospital>) {
        self.hospitals = Arc::new(hospitals);
        self.load_state = LoadState::Loaded;
        self.schedule_recompute();
    }

    pub fn set_name_query(&mut self, value: impl Into<String>) {
        self.set_field(QueryField::Name, value);
    }

    pub fn set_location_query(&mut self, value: impl Into<String>) {
        self.set_field(QueryField::Location, value);
    }

    pub fn set_tag_query(&mut self, value: impl Into<String>) {
        self.set_field(QueryField::Specialty, value);
    }

    /// Replace one query field and schedule a recomputation.
    pub fn set_field(&mut self, field: QueryField, value: impl Into<String>) {
        self.query = std::mem::take(&mut self.query).with_field(field, value);
        debug!("Query {} changed: {:?}", field, self.query.field(field));
        self.schedule_recompute();
    }

    /// Reset all three fields and recompute immediately.
    pub fn clear_filters(&mut self) {
        if self.debouncer.cancel() {
            debug!("Cancelled pending recomputation for clear");
        }
        self.query = QueryState::new();
        let epoch = self.publisher.invalidate();
        self.publisher.recompute(self.snapshot(), epoch);
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// All loaded records, unfiltered
    pub fn hospitals(&self) -> &[Hospital] {
        &self.hospitals
    }

    /// The latest published results
    pub fn results(&self) -> SearchResults {
        self.publisher.results.borrow().clone()
    }

    /// Receiver that observes every publication
    pub fn subscribe(&self) -> watch::Receiver<SearchResults> {
        self.publisher.results.subscribe()
    }

    /// Number of recomputations published so far
    pub fn recompute_count(&self) -> u64 {
        self.publisher.recomputes.load(Ordering::SeqCst)
    }

    /// Whether a recomputation is waiting for the quiet period to end
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Cancel any pending recomputation and discard any running one.
    /// Called on teardown.
    pub fn shutdown(&mut self) {
        if self.debouncer.cancel() {
            debug!("Cancelled pending recomputation on shutdown");
        }
        self.publisher.invalidate();
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            hospitals: self.hospitals.clone(),
            query: self.query.clone(),
            load_state: self.load_state.clone(),
        }
    }

    /// Publish the current load state with `hospitals`, superseding any
    /// pending or running recomputation.
    fn publish_now(&mut self, hospitals: Vec<Hospital>, total: usize) {
        self.debouncer.cancel();
        let epoch = self.publisher.invalidate();
        self.publisher
            .publish(epoch, self.load_state.clone(), self.query.clone(), hospitals, total);
    }

    fn schedule_recompute(&mut self) {
        let epoch = self.publisher.invalidate();
        let snapshot = self.snapshot();
        let publisher = self.publisher.clone();
        self.debouncer.schedule(move || {
            publisher.recompute(snapshot, epoch);
        });
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
