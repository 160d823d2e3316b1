//! The loop hosted by the background thread.
//!
//! One epoch: refresh roster → reconcile → K forward passes → (maybe)
//! submit weights → (maybe) save state → status line. Every failure inside
//! an epoch is logged and the loop moves on to the next one. Once the
//! controller abandons the run, no further shared state is written.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::join_all;
use futures::FutureExt;
use rand::rngs::StdRng;
use tracing::{debug, info, warn, Instrument};

use vigil_core::config::VigilConfig;
use vigil_core::errors::{LedgerError, VigilResult};
use vigil_core::models::{
    Identity, PeerOutcome, PeerRecord, Request, RewardBatch, RosterQuery, RosterSnapshot,
    RunEvent, StatusLine,
};
use vigil_core::traits::{IRewardFunction, IRunObserver};
use vigil_dispatch::{PeerSelector, RequestDispatcher};
use vigil_observability::{epoch_span, forward_span, save_span, submit_span};
use vigil_scoring::WeightEncoder;

use crate::cancellation::CancellationToken;
use crate::collaborators::Collaborators;
use crate::state::Shared;

pub(crate) struct EpochRunner {
    config: Arc<VigilConfig>,
    collaborators: Collaborators,
    shared: Arc<Shared>,
    dispatcher: RequestDispatcher,
    selector: PeerSelector,
    encoder: WeightEncoder,
    token: CancellationToken,
    rng: StdRng,
    snapshot: RosterSnapshot,
    step: u64,
    last_epoch_height: Option<u64>,
}

impl EpochRunner {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Arc<VigilConfig>,
        identity: Identity,
        collaborators: Collaborators,
        shared: Arc<Shared>,
        token: CancellationToken,
        rng: StdRng,
        snapshot: RosterSnapshot,
        step: u64,
    ) -> Self {
        let dispatcher =
            RequestDispatcher::new(Arc::clone(&collaborators.transport), &config.dispatch);
        let selector = PeerSelector::new(&config.dispatch).excluding(identity);
        let encoder = WeightEncoder::new(
            config.scoring.version_key,
            Arc::clone(&collaborators.observer),
        );
        Self {
            config,
            collaborators,
            shared,
            dispatcher,
            selector,
            encoder,
            token,
            rng,
            snapshot,
            step,
            last_epoch_height: None,
        }
    }

    /// Run epochs until the token is cancelled.
    pub async fn run(mut self) {
        self.observe(RunEvent::Started {
            step: self.step,
            height: self.snapshot.height(),
        });

        while let Some(height) = self.wait_for_epoch().await {
            self.last_epoch_height = Some(height);
            let step = self.step;

            let epoch = self.run_epoch(height).instrument(epoch_span!(step, height));
            let success = match AssertUnwindSafe(epoch).catch_unwind().await {
                Ok(Ok(())) => true,
                Ok(Err(e)) => {
                    self.observe(RunEvent::EpochFailed {
                        step,
                        error: e.to_string(),
                    });
                    false
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    self.observe(RunEvent::EpochFailed {
                        step,
                        error: format!("panic: {message}"),
                    });
                    false
                }
            };

            if self.token.is_abandoned() {
                warn!(step, "run abandoned, discarding epoch results");
                break;
            }
            self.step += 1;
            self.shared.metrics.lock().record_epoch(success);
            {
                let mut progress = self.shared.progress.write();
                progress.step = self.step;
                progress.height = height;
                progress.last_epoch_at = Some(chrono::Utc::now());
            }
            self.emit_status(height);
        }

        if self.collaborators.store.is_some() && !self.token.is_abandoned() {
            self.save_state(self.step).await;
        }
        self.observe(RunEvent::Stopped { step: self.step });
    }

    /// Poll the ledger height until it has advanced by `epoch_length` since
    /// the last epoch. The first epoch of a run starts immediately. Returns
    /// `None` once cancelled.
    async fn wait_for_epoch(&mut self) -> Option<u64> {
        let epoch_length = self.config.runloop.epoch_length;
        let poll_interval = self.config.runloop.poll_interval();
        loop {
            if self.token.is_cancelled() {
                return None;
            }
            match self.collaborators.reader.height().await {
                Ok(height) => match self.last_epoch_height {
                    None => return Some(height),
                    Some(last) if height >= last.saturating_add(epoch_length) => {
                        return Some(height)
                    }
                    Some(_) => {}
                },
                Err(e) => warn!(error = %e, "height poll failed"),
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    async fn run_epoch(&mut self, height: u64) -> VigilResult<()> {
        self.refresh_roster().await;
        if self.token.is_abandoned() {
            return Ok(());
        }
        self.shared.tracker.write().reconcile(&self.snapshot);

        let passes = self.config.runloop.num_concurrent_forwards;
        let selections: Vec<Vec<PeerRecord>> = (0..passes)
            .map(|_| self.selector.select(&self.snapshot, &mut self.rng))
            .collect();
        debug!(passes, peers = self.snapshot.len(), "running forward passes");

        let step = self.step;
        let results = join_all(selections.into_iter().enumerate().map(|(pass, peers)| {
            self.forward(step, peers)
                .instrument(forward_span!(step, pass))
        }))
        .await;
        for result in results {
            result?;
        }

        if self.token.is_abandoned() {
            return Ok(());
        }
        if self.should_set_weights() {
            self.submit_weights(height).await;
        }
        if self.should_save() {
            self.save_state(self.step + 1).await;
        }
        Ok(())
    }

    /// On failure the previous snapshot stays in use until the next epoch.
    async fn refresh_roster(&mut self) {
        match self
            .collaborators
            .reader
            .roster(RosterQuery::Latest)
            .await
        {
            Ok(snapshot) => self.snapshot = snapshot,
            Err(e) => {
                self.shared.metrics.lock().record_roster_failure();
                self.observe(RunEvent::RosterRefreshFailed {
                    error: e.to_string(),
                });
            }
        }
    }

    /// Query one sample of peers and fold their rewards into the tracker.
    async fn forward(&self, step: u64, peers: Vec<PeerRecord>) -> VigilResult<()> {
        let request = self.collaborators.reward.make_request(step);
        let outcomes = self.dispatcher.fan_out(&peers, &request).await;
        let batch = reward_batch(
            self.collaborators.reward.as_ref(),
            self.collaborators.observer.as_ref(),
            &request,
            &outcomes,
        );
        if self.token.is_abandoned() {
            return Ok(());
        }
        self.shared.metrics.lock().record_fanout(&outcomes);
        let alpha = self.config.scoring.moving_average_alpha;
        let report = self.shared.tracker.write().update(&batch, alpha)?;
        debug!(
            sampled = outcomes.len(),
            rewarded = batch.len(),
            applied = report.applied,
            skipped = report.skipped,
            "forward pass complete"
        );
        Ok(())
    }

    fn should_set_weights(&self) -> bool {
        let runloop = &self.config.runloop;
        !runloop.disable_set_weights
            && self.step > 0
            && self.step % runloop.weights_every_epochs == 0
    }

    fn should_save(&self) -> bool {
        self.collaborators.store.is_some()
            && (self.step + 1) % self.config.runloop.save_every_epochs == 0
    }

    /// Encode the current scores and hand them to the ledger writer, bounded
    /// by `ledger_write_timeout`. Never fails the epoch.
    async fn submit_weights(&self, height: u64) {
        async {
            let limits = match self.collaborators.reader.weight_limits().await {
                Ok(limits) => limits,
                Err(e) => return self.submission_failed(e.to_string()),
            };

            let scores = self.shared.tracker.read().scores().to_vec();
            let submission = match self.encoder.encode(&scores, &limits, height) {
                Ok(submission) => submission,
                Err(e) => return self.submission_failed(e.to_string()),
            };
            if submission.is_empty() {
                info!(height, "all scores are zero, skipping weight submission");
                return;
            }

            let entries = submission.len();
            let timeout = self.config.runloop.ledger_write_timeout();
            let write = self.collaborators.writer.submit_weights(submission);
            match tokio::time::timeout(timeout, write).await {
                Ok(Ok(outcome)) => {
                    self.shared
                        .metrics
                        .lock()
                        .record_submission(Some(outcome.success));
                    self.observe(RunEvent::WeightsSubmitted {
                        height,
                        entries,
                        success: outcome.success,
                        message: outcome.message,
                    });
                }
                Ok(Err(e)) => self.submission_failed(e.to_string()),
                Err(_) => self.submission_failed(
                    LedgerError::Timeout {
                        operation: "submit_weights".to_string(),
                        after_ms: self.config.runloop.ledger_write_timeout_ms,
                    }
                    .to_string(),
                ),
            }
        }
        .instrument(submit_span!(height))
        .await
    }

    fn submission_failed(&self, error: String) {
        self.shared.metrics.lock().record_submission(None);
        self.observe(RunEvent::WeightsSubmitFailed { error });
    }

    /// Persist the tracker with `step` as the number of completed epochs.
    async fn save_state(&self, step: u64) {
        let Some(store) = self.collaborators.store.clone() else {
            return;
        };
        if self.token.is_abandoned() {
            return;
        }
        let state = self.shared.tracker.read().snapshot(step);

        let saved = tokio::task::spawn_blocking(move || store.save(&state))
            .instrument(save_span!(step))
            .await;
        let result = match saved {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(join) => Err(format!("save task failed: {join}")),
        };

        self.shared.metrics.lock().record_save(result.is_ok());
        match result {
            Ok(()) => self.observe(RunEvent::StateSaved { step }),
            Err(error) => self.observe(RunEvent::StateSaveFailed { error }),
        }
    }

    fn emit_status(&self, height: u64) {
        let tracker = self.shared.tracker.read();
        let line = StatusLine {
            step: self.step,
            height,
            roster_size: tracker.len(),
            top_scores: tracker.summary(self.config.observability.status_top_n),
        };
        drop(tracker);
        self.observe(RunEvent::Status(line));
    }

    fn observe(&self, event: RunEvent) {
        self.collaborators.observer.observe(&event);
    }
}

/// Rewards for one fan-out. A failed peer earns 0; a peer the dispatcher
/// never got to is left out so its score is untouched.
fn reward_batch(
    reward: &dyn IRewardFunction,
    observer: &dyn IRunObserver,
    request: &Request,
    outcomes: &[PeerOutcome],
) -> RewardBatch {
    let mut batch = RewardBatch::new();
    for outcome in outcomes {
        let peer = &outcome.peer;
        let value = match &outcome.result {
            Ok(response) => reward.reward(request, response),
            Err(failure) if !failure.is_peer_fault() => {
                debug!(ordinal = peer.ordinal, error = %failure, "peer not queried this pass");
                continue;
            }
            Err(failure) => {
                observer.observe(&RunEvent::PeerQueryFailed {
                    ordinal: peer.ordinal,
                    identity: peer.identity.clone(),
                    error: failure.to_string(),
                });
                0.0
            }
        };
        batch.push_bound(peer.ordinal, peer.identity.clone(), value);
    }
    batch
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use test_fixtures::{peers_of, EchoReward};
    use vigil_core::models::{QueryFailure, Response};
    use vigil_observability::RecordingObserver;

    use super::*;

    fn outcome(peer: &PeerRecord, result: Result<Response, QueryFailure>) -> PeerOutcome {
        PeerOutcome {
            peer: peer.clone(),
            result,
        }
    }

    #[test]
    fn unqueried_peers_are_left_out_of_the_batch() {
        let peers = peers_of(&["a", "b", "c", "d"]);
        let reward = EchoReward;
        let observer = RecordingObserver::new();
        let request = reward.make_request(4);
        let outcomes = vec![
            outcome(
                &peers[0],
                Ok(Response {
                    payload: serde_json::json!(8),
                    latency: Duration::from_millis(5),
                }),
            ),
            outcome(
                &peers[1],
                Err(QueryFailure::Timeout {
                    after: Duration::from_millis(100),
                }),
            ),
            outcome(&peers[2], Err(QueryFailure::NotDispatched)),
            outcome(
                &peers[3],
                Err(QueryFailure::Abandoned {
                    after: Duration::from_millis(30),
                }),
            ),
        ];

        let batch = reward_batch(&reward, &observer, &request, &outcomes);

        let rewarded: Vec<(Option<Identity>, f64)> = batch
            .entries()
            .iter()
            .map(|e| (e.identity.clone(), e.reward))
            .collect();
        assert_eq!(
            rewarded,
            vec![
                (Some(Identity::from("a")), 1.0),
                (Some(Identity::from("b")), 0.0)
            ]
        );
        assert_eq!(
            observer.count(|e| matches!(e, RunEvent::PeerQueryFailed { .. })),
            1
        );
    }
}
