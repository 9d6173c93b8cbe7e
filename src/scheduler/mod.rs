//! Generation Scheduler
//!
//! Long-lived component that runs a generation pass immediately on start and
//! then once per interval, plus on-demand passes for callers holding a handle.
//!
//! Every pass holds a shared guard on the pass gate; `stop()` takes it
//! exclusively after the timer task exits, so it returns only once in-flight
//! passes (timer or manual) have finished.

pub mod pass;

pub use pass::{PassReport, PassRunner, PassTrigger, TopicOutcome};

use crate::catalog::CatalogStore;
use crate::error::ApiError;
use crate::generation::{GenerationClient, GenerationPipeline};
use crate::types::TopicId;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, RwLock as AsyncRwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Read-only snapshot of scheduler state
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub running: bool,
    pub next_run_at: Option<DateTime<Utc>>,
    pub interval_secs: u64,
    pub snippets_per_topic: usize,
    pub last_pass: Option<PassReport>,
}

#[derive(Default)]
struct SchedulerState {
    running: bool,
    next_run_at: Option<DateTime<Utc>>,
    last_pass: Option<PassReport>,
    timer: Option<JoinHandle<()>>,
    shutdown: Option<watch::Sender<bool>>,
}

pub struct GenerationScheduler {
    runner: Arc<PassRunner>,
    interval: Duration,
    state: Arc<RwLock<SchedulerState>>,
    pass_gate: Arc<AsyncRwLock<()>>,
}

impl GenerationScheduler {
    pub fn new(runner: PassRunner, interval: Duration) -> Self {
        Self {
            runner: Arc::new(runner),
            interval,
            state: Arc::new(RwLock::new(SchedulerState::default())),
            pass_gate: Arc::new(AsyncRwLock::new(())),
        }
    }

    /// Wire a scheduler from its collaborators.
    pub fn with_client(
        store: Arc<dyn CatalogStore>,
        client: Arc<dyn GenerationClient>,
        snippets_per_topic: usize,
        interval: Duration,
    ) -> Self {
        let pipeline = GenerationPipeline::new(client, snippets_per_topic);
        Self::new(PassRunner::new(store, pipeline), interval)
    }

    /// Start the recurring timer. The first pass fires immediately.
    ///
    /// Calling `start` while already running logs a warning and does nothing.
    pub fn start(&self) -> Result<(), ApiError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            ApiError::ConfigError("Scheduler must be started inside a Tokio runtime".to_string())
        })?;

        let mut state = self.state.write();
        if state.running {
            warn!("Generation scheduler already running; ignoring start");
            return Ok(());
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        state.running = true;
        state.next_run_at = next_fire_time(self.interval);
        state.shutdown = Some(shutdown_tx);
        state.timer = Some(runtime.spawn(Self::timer_loop(
            Arc::clone(&self.runner),
            self.interval,
            Arc::clone(&self.state),
            Arc::clone(&self.pass_gate),
            shutdown_rx,
        )));

        info!(
            interval_secs = self.interval.as_secs(),
            snippets_per_topic = self.runner.pipeline().snippets_per_topic(),
            "Started generation scheduler"
        );
        Ok(())
    }

    /// Cancel the timer and wait for any in-flight pass to finish.
    pub async fn stop(&self) -> Result<(), ApiError> {
        let (timer, shutdown) = {
            let mut state = self.state.write();
            if !state.running {
                return Ok(()); // Already stopped
            }
            state.running = false;
            state.next_run_at = None;
            (state.timer.take(), state.shutdown.take())
        };

        if let Some(shutdown) = shutdown {
            let _ = shutdown.send(true);
        }
        if let Some(timer) = timer {
            if let Err(e) = timer.await {
                warn!(error = %e, "Scheduler timer task ended abnormally");
            }
        }
        // Wait out manual passes still holding the gate
        let _drained = self.pass_gate.write().await;

        info!("Stopped generation scheduler");
        Ok(())
    }

    /// Run one full pass now, without touching the timer schedule.
    pub async fn trigger(&self) -> PassReport {
        let _pass = self.pass_gate.read().await;
        let report = self.runner.run_pass(PassTrigger::Manual).await;
        self.state.write().last_pass = Some(report.clone());
        report
    }

    /// Run the pipeline for one topic (or all when `None`) outside the timer.
    pub async fn generate_for_topic(
        &self,
        topic_id: Option<TopicId>,
    ) -> Result<PassReport, ApiError> {
        let _pass = self.pass_gate.read().await;
        let report = self.runner.generate_for_topic(topic_id).await?;
        self.state.write().last_pass = Some(report.clone());
        Ok(report)
    }

    pub fn status(&self) -> SchedulerStatus {
        let state = self.state.read();
        SchedulerStatus {
            running: state.running,
            next_run_at: state.next_run_at,
            interval_secs: self.interval.as_secs(),
            snippets_per_topic: self.runner.pipeline().snippets_per_topic(),
            last_pass: state.last_pass.clone(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.read().running
    }

    async fn timer_loop(
        runner: Arc<PassRunner>,
        interval: Duration,
        state: Arc<RwLock<SchedulerState>>,
        pass_gate: Arc<AsyncRwLock<()>>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        loop {
            if *shutdown.borrow() {
                break;
            }

            // The next fire time is fixed when a pass begins, so status never
            // reports a time in the past while this pass runs.
            let pass_started = Instant::now();
            let next_run_at = next_fire_time(interval);
            {
                let mut state = state.write();
                if !state.running {
                    break;
                }
                state.next_run_at = next_run_at;
            }
            debug!(next_run_at = ?next_run_at, "Scheduled next generation pass");

            {
                let _pass = pass_gate.read().await;
                let report = runner.run_pass(PassTrigger::Timer).await;
                state.write().last_pass = Some(report);
            }

            if *shutdown.borrow() {
                break;
            }

            // A pass in progress is never interrupted; shutdown is only
            // observed between passes.
            tokio::select! {
                _ = tokio::time::sleep(interval.saturating_sub(pass_started.elapsed())) => {}
                _ = shutdown.changed() => break,
            }
        }
    }
}

fn next_fire_time(interval: Duration) -> Option<DateTime<Utc>> {
    chrono::Duration::from_std(interval)
        .ok()
        .and_then(|d| Utc::now().checked_add_signed(d))
}
