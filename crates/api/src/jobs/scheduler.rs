//! Interval scheduler for background jobs.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How often a job runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobFrequency {
    Seconds(u64),
    Minutes(u64),
}

impl JobFrequency {
    pub fn duration(&self) -> Duration {
        match self {
            JobFrequency::Seconds(secs) => Duration::from_secs(*secs),
            JobFrequency::Minutes(mins) => Duration::from_secs(*mins * 60),
        }
    }
}

/// A unit of periodic background work.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    /// Name used in logs and metric labels.
    fn name(&self) -> &'static str;

    fn frequency(&self) -> JobFrequency;

    /// Whether the first run happens at start-up instead of one period later.
    fn run_on_start(&self) -> bool {
        false
    }

    async fn execute(&self) -> Result<(), String>;
}

/// Runs `job` once, logging and counting the outcome.
async fn run_once(job: &dyn Job) -> bool {
    let name = job.name();
    let start = Instant::now();

    let result = job.execute().await;
    let elapsed_ms = start.elapsed().as_millis() as u64;
    let outcome = if result.is_ok() { "success" } else { "failure" };
    metrics::counter!("background_job_runs_total", "job" => name, "outcome" => outcome)
        .increment(1);

    match result {
        Ok(()) => {
            info!(job = name, elapsed_ms, "Job completed");
            true
        }
        Err(e) => {
            error!(job = name, elapsed_ms, error = %e, "Job failed");
            false
        }
    }
}

/// Spawns one task per registered job and stops them on shutdown.
pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            shutdown_tx,
            handles: Vec::new(),
        }
    }

    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn start(&mut self) {
        info!(jobs = self.jobs.len(), "Starting job scheduler");

        for job in &self.jobs {
            let job = Arc::clone(job);
            let mut shutdown_rx = self.shutdown_tx.subscribe();

            let handle = tokio::spawn(async move {
                let name = job.name();
                let frequency = job.frequency();
                let mut interval = tokio::time::interval(frequency.duration());
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

                // The first tick completes immediately.
                if !job.run_on_start() {
                    interval.tick().await;
                }

                info!(job = name, frequency = ?frequency, "Job scheduled");

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            run_once(job.as_ref()).await;
                        }
                        changed = shutdown_rx.changed() => {
                            if changed.is_err() || *shutdown_rx.borrow() {
                                info!(job = name, "Job shutting down");
                                break;
                            }
                        }
                    }
                }
            });

            self.handles.push(handle);
        }
    }

    /// Signals every job to stop; returns immediately.
    pub fn shutdown(&self) {
        info!("Initiating job scheduler shutdown");
        let _ = self.shutdown_tx.send(true);
    }

    /// Waits for job tasks to finish, giving up after `timeout`.
    pub async fn wait_for_shutdown(self, timeout: Duration) {
        let handles = self.handles;
        let join_all = async {
            for handle in handles {
                if let Err(e) = handle.await {
                    warn!(error = %e, "Job task panicked");
                }
            }
        };

        match tokio::time::timeout(timeout, join_all).await {
            Ok(()) => info!("All jobs stopped"),
            Err(_) => warn!(?timeout, "Job shutdown timed out"),
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}
