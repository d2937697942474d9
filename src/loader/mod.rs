//! One-shot background loader for the dashboard.
//!
//! `load` flips the view state to `InProgress` on the calling thread and runs
//! the blocking fetch on a worker thread. The outcome travels back over a
//! channel and is applied by `poll` or `wait` on the owning thread, so the
//! three data sequences and the terminal status always change together.
//!
//! `cancel` clears the shared `active` flag and drops the receiver. A worker
//! that finishes afterwards discards its outcome.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::data::VaccinationSource;
use crate::domain::{VaccinationData, ViewState};
use crate::error::AppError;

type Outcome = Result<VaccinationData, AppError>;

pub struct DataLoader {
    source: Arc<dyn VaccinationSource>,
    started: bool,
    pending: Option<PendingLoad>,
    last_error: Option<AppError>,
}

struct PendingLoad {
    rx: Receiver<Outcome>,
    active: Arc<AtomicBool>,
}

impl DataLoader {
    pub fn new(source: Arc<dyn VaccinationSource>) -> Self {
        Self {
            source,
            started: false,
            pending: None,
            last_error: None,
        }
    }

    /// Start the single fetch this loader is allowed to make.
    ///
    /// Returns `false` (and leaves `state` untouched) if a load was already
    /// started.
    pub fn load(&mut self, state: &mut ViewState) -> bool {
        if self.started {
            tracing::warn!("load requested twice; ignoring");
            return false;
        }
        self.started = true;
        state.begin();

        let (tx, rx) = mpsc::channel();
        let active = Arc::new(AtomicBool::new(true));
        let worker_active = Arc::clone(&active);
        let source = Arc::clone(&self.source);

        let spawned = thread::Builder::new()
            .name("cowin-loader".to_string())
            .spawn(move || {
                let outcome = source.fetch();
                if !worker_active.load(Ordering::Acquire) {
                    tracing::debug!("load finished after cancel; discarding outcome");
                    return;
                }
                if tx.send(outcome).is_err() {
                    tracing::trace!("load outcome dropped (receiver gone)");
                }
            });

        match spawned {
            Ok(_) => {
                tracing::info!("vaccination load started");
                self.pending = Some(PendingLoad { rx, active });
            }
            Err(e) => {
                self.settle(state, Err(AppError::data(format!("Failed to start loader thread: {e}"))));
            }
        }
        true
    }

    /// Apply the outcome if it has arrived. Returns `true` when `state` changed.
    ///
    /// The outcome lands in whichever `state` is passed here, not necessarily
    /// the one given to `load`.
    pub fn poll(&mut self, state: &mut ViewState) -> bool {
        let Some(pending) = &self.pending else {
            return false;
        };

        match pending.rx.try_recv() {
            Ok(outcome) => {
                self.settle(state, outcome);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.settle(state, Err(AppError::data("Loader stopped without a result.")));
                true
            }
        }
    }

    /// Block until the load settles and apply the outcome.
    pub fn wait(&mut self, state: &mut ViewState) {
        let Some(pending) = &self.pending else {
            return;
        };

        let outcome = pending
            .rx
            .recv()
            .unwrap_or_else(|_| Err(AppError::data("Loader stopped without a result.")));
        self.settle(state, outcome);
    }

    /// Detach from an in-flight load. Its outcome will never be applied.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.active.store(false, Ordering::Release);
            tracing::debug!("in-flight load cancelled");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Why the last load failed. Kept for logs and exit messages; the
    /// failure view itself shows no detail.
    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    fn settle(&mut self, state: &mut ViewState, outcome: Outcome) {
        self.pending = None;

        match outcome {
            Ok(data) => {
                tracing::info!(
                    days = data.daily_doses().len(),
                    "vaccination data loaded"
                );
                state.commit(data);
            }
            Err(err) => {
                tracing::warn!(error = %err, "vaccination load failed");
                self.last_error = Some(err);
                state.fail();
            }
        }
    }
}

impl Drop for DataLoader {
    fn drop(&mut self) {
        self.cancel();
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::testing::{GatedSource, sample_data};
    use super::*;
    use crate::domain::LoadStatus;

    #[test]
    fn in_progress_until_settled_then_success() {
        let (source, gate) = GatedSource::new(Ok(sample_data()));
        let mut loader = DataLoader::new(source);
        let mut state = ViewState::new();

        assert!(loader.load(&mut state));
        assert_eq!(state.status(), LoadStatus::InProgress);

        // Nothing arrives while the fetch is blocked.
        assert!(!loader.poll(&mut state));
        assert_eq!(state.status(), LoadStatus::InProgress);
        assert!(state.daily_doses().is_empty());

        gate.open();
        loader.wait(&mut state);
        assert_eq!(state.status(), LoadStatus::Success);
        assert_eq!(state.daily_doses(), sample_data().daily_doses());
        assert_eq!(state.age_buckets(), sample_data().age_buckets());
        assert_eq!(state.gender_counts(), sample_data().gender_counts());
        assert!(!loader.is_pending());
    }

    #[test]
    fn failure_sets_failure_and_records_error() {
        let (source, gate) = GatedSource::new(Err(AppError::data("status 500")));
        let mut loader = DataLoader::new(source);
        let mut state = ViewState::new();

        loader.load(&mut state);
        gate.open();
        loader.wait(&mut state);

        assert_eq!(state.status(), LoadStatus::Failure);
        assert!(state.daily_doses().is_empty());
        assert_eq!(loader.last_error().map(|e| e.message()), Some("status 500"));
    }

    #[test]
    fn second_load_is_refused() {
        let (source, gate) = GatedSource::new(Ok(sample_data()));
        let mut loader = DataLoader::new(source);
        let mut state = ViewState::new();

        assert!(loader.load(&mut state));
        gate.open();
        loader.wait(&mut state);
        assert_eq!(state.status(), LoadStatus::Success);

        assert!(!loader.load(&mut state));
        assert_eq!(state.status(), LoadStatus::Success);
    }

    #[test]
    fn outcome_applies_to_the_state_passed_to_wait() {
        let (source, gate) = GatedSource::new(Ok(sample_data()));
        let mut loader = DataLoader::new(source);
        let mut loading = ViewState::new();
        let mut fresh = ViewState::new();

        loader.load(&mut loading);
        gate.open();
        loader.wait(&mut fresh);

        assert_eq!(loading.status(), LoadStatus::InProgress);
        assert_eq!(fresh.status(), LoadStatus::Success);
        assert_eq!(fresh.daily_doses().len(), 1);
    }

    #[test]
    fn cancelled_load_never_mutates_state() {
        let (source, gate) = GatedSource::new(Ok(sample_data()));
        let mut loader = DataLoader::new(source);
        let mut state = ViewState::new();

        loader.load(&mut state);
        loader.cancel();
        gate.open();

        // Wait until the worker has actually returned from fetch.
        gate.fetched
            .recv_timeout(Duration::from_secs(5))
            .expect("worker should finish fetch");

        assert!(!loader.poll(&mut state));
        loader.wait(&mut state);
        assert_eq!(state.status(), LoadStatus::InProgress);
        assert!(state.daily_doses().is_empty());
    }
}
