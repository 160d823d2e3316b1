//! RunLoopController: owns the background thread and its lifecycle.
//!
//! `Idle → Running → Stopping → Idle`. The loop itself lives in
//! [`EpochRunner`](crate::epoch::EpochRunner) on a dedicated thread hosting
//! a current-thread tokio runtime. A thread that outlives `stop_timeout` is
//! abandoned: it stops writing shared state, and no new run starts until it
//! has exited.

use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use vigil_core::config::VigilConfig;
use vigil_core::errors::{LifecycleError, VigilResult};
use vigil_core::models::Identity;
use vigil_scoring::ScoreTracker;

use crate::cancellation::{CancellationToken, StopHandle};
use crate::collaborators::Collaborators;
use crate::epoch::EpochRunner;
use crate::startup;
use crate::state::{RunState, Shared, StatusReport};

struct Worker {
    handle: JoinHandle<()>,
    done: mpsc::Receiver<()>,
}

/// Cancels the run and signals completion when the worker thread exits,
/// including by panic.
struct ExitGuard {
    token: CancellationToken,
    _done: mpsc::Sender<()>,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

pub struct RunLoopController {
    config: Arc<VigilConfig>,
    identity: Identity,
    collaborators: Collaborators,
    shared: Arc<Shared>,
    state: RunState,
    token: CancellationToken,
    worker: Option<Worker>,
    abandoned: Option<Worker>,
    seed: Option<u64>,
}

impl RunLoopController {
    /// Build an idle controller. Nothing touches the collaborators until
    /// [`start`](Self::start).
    pub fn new(config: VigilConfig, collaborators: Collaborators) -> Self {
        let identity = Identity::new(config.identity.clone());
        let tracker = ScoreTracker::new(Arc::clone(&collaborators.observer));
        Self {
            config: Arc::new(config),
            identity,
            collaborators,
            shared: Arc::new(Shared::new(tracker)),
            state: RunState::Idle,
            token: CancellationToken::new(),
            worker: None,
            abandoned: None,
            seed: None,
        }
    }

    /// Seed peer sampling so runs are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The validated configuration this controller runs with.
    pub fn config(&self) -> &VigilConfig {
        &self.config
    }

    /// Restore state, verify registration, then spawn the loop.
    ///
    /// Blocking; must not be called from inside a tokio runtime. A
    /// registration failure is returned before any thread is spawned.
    /// Refused while a thread abandoned by an earlier `stop` is still alive.
    pub fn start(&mut self) -> VigilResult<()> {
        if self.state != RunState::Idle {
            return Err(LifecycleError::AlreadyRunning {
                state: self.state.to_string(),
            }
            .into());
        }
        self.reap_abandoned()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LifecycleError::SpawnFailed {
                reason: e.to_string(),
            })?;

        let restored = startup::restore_state(
            &self.collaborators,
            &self.shared,
            self.config.storage.fresh_start,
        );
        let snapshot = runtime.block_on(startup::verify_registration(
            &self.collaborators,
            &self.identity,
        ))?;
        self.shared.tracker.write().reconcile(&snapshot);

        let step = {
            let mut progress = self.shared.progress.write();
            if let Some(step) = restored {
                progress.step = step;
            }
            progress.height = snapshot.height();
            progress.step
        };

        self.token = CancellationToken::new();
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let runner = EpochRunner::new(
            Arc::clone(&self.config),
            self.identity.clone(),
            self.collaborators.clone(),
            Arc::clone(&self.shared),
            self.token.clone(),
            rng,
            snapshot,
            step,
        );

        self.worker = Some(self.spawn(runtime, runner)?);
        self.state = RunState::Running;
        info!(identity = %self.identity, step, "run loop started");
        Ok(())
    }

    fn spawn(&self, runtime: Runtime, runner: EpochRunner) -> VigilResult<Worker> {
        let (done_tx, done_rx) = mpsc::channel();
        let guard = ExitGuard {
            token: self.token.clone(),
            _done: done_tx,
        };
        let handle = std::thread::Builder::new()
            .name("vigil-runloop".to_string())
            .spawn(move || {
                let _guard = guard;
                runtime.block_on(runner.run());
            })
            .map_err(|e| LifecycleError::SpawnFailed {
                reason: e.to_string(),
            })?;
        Ok(Worker {
            handle,
            done: done_rx,
        })
    }

    /// Cancel the loop and join its thread, waiting at most `stop_timeout`.
    ///
    /// A thread that does not exit in time is abandoned and `JoinTimedOut` is
    /// returned; the controller is back in `Idle` either way, but `start`
    /// refuses until the abandoned thread has exited.
    pub fn stop(&mut self) -> VigilResult<()> {
        if self.state != RunState::Running {
            return Err(LifecycleError::NotRunning.into());
        }
        self.state = RunState::Stopping;
        self.token.cancel();

        let result = match self.worker.take() {
            Some(worker) => self.join(worker),
            None => Ok(()),
        };
        self.state = RunState::Idle;
        result
    }

    fn join(&mut self, worker: Worker) -> VigilResult<()> {
        let timeout = self.config.runloop.stop_timeout();
        match worker.done.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                finish(worker);
                info!("run loop stopped");
                Ok(())
            }
            Err(RecvTimeoutError::Timeout) => {
                let after_ms = self.config.runloop.stop_timeout_ms;
                warn!(after_ms, "run loop did not stop in time, abandoning thread");
                self.token.abandon();
                self.abandoned = Some(worker);
                Err(LifecycleError::JoinTimedOut { after_ms }.into())
            }
        }
    }

    /// Join an abandoned thread if it has exited since; error if it has not.
    fn reap_abandoned(&mut self) -> VigilResult<()> {
        let Some(worker) = self.abandoned.take() else {
            return Ok(());
        };
        match worker.done.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => {
                finish(worker);
                info!("abandoned run loop thread has exited");
                Ok(())
            }
            Err(TryRecvError::Empty) => {
                self.abandoned = Some(worker);
                Err(LifecycleError::PreviousRunAlive.into())
            }
        }
    }

    /// Handle for requesting a stop from another thread. `None` when idle.
    pub fn stop_handle(&self) -> Option<StopHandle> {
        (self.state == RunState::Running).then(|| StopHandle::new(self.token.clone()))
    }

    /// Start the loop if idle, block until Ctrl-C or a stop request, then
    /// stop the served endpoint and the loop.
    pub fn run_until_interrupted(&mut self) -> VigilResult<()> {
        if self.state == RunState::Idle {
            self.start()?;
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LifecycleError::SpawnFailed {
                reason: e.to_string(),
            })?;
        let token = self.token.clone();
        let poll_interval = self.config.runloop.poll_interval();
        runtime.block_on(async move {
            let interrupted = async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => info!("interrupt received, shutting down"),
                    Err(e) => {
                        warn!(error = %e, "cannot listen for interrupts");
                        std::future::pending::<()>().await;
                    }
                }
            };
            let stopped = async {
                while !token.is_cancelled() {
                    tokio::time::sleep(poll_interval).await;
                }
                info!("stop requested, shutting down");
            };
            tokio::select! {
                _ = interrupted => {}
                _ = stopped => {}
            }
        });

        if let Some(endpoint) = &self.collaborators.endpoint {
            info!(endpoint = %endpoint.describe(), "stopping served endpoint");
            endpoint.stop();
        }
        self.stop()
    }

    /// Snapshot of lifecycle state, progress, scores and counters.
    pub fn status(&self) -> StatusReport {
        let progress = self.shared.progress.read().clone();
        let scores = {
            let tracker = self.shared.tracker.read();
            tracker
                .identities()
                .iter()
                .cloned()
                .zip(tracker.scores().iter().copied())
                .collect()
        };
        StatusReport {
            state: self.state,
            step: progress.step,
            height: progress.height,
            last_epoch_at: progress.last_epoch_at,
            scores,
            metrics: self.shared.metrics.lock().clone(),
        }
    }
}

fn finish(worker: Worker) {
    if worker.handle.join().is_err() {
        warn!("run loop thread panicked");
    }
}

impl Drop for RunLoopController {
    fn drop(&mut self) {
        if self.state == RunState::Running {
            if let Err(e) = self.stop() {
                warn!(error = %e, "run loop did not stop cleanly on drop");
            }
        }
    }
}
