//! Background progress updates while an analysis request is in flight.
//!
//! A [`PollingTask`] is a spawned interval loop that writes progress into the
//! shared [`Page`]. It is stopped through a single path ([`PollingTask::stop`],
//! also run on `Drop`): the cancellation token is tripped and the task is
//! aborted. Every page write re-checks the token while holding the page lock,
//! so once `stop` has returned and the caller has taken the lock, no further
//! progress update can land.

use std::sync::Arc;
use std::time::Duration;

use marketlens_client::AnalysisApi;
use marketlens_core::SessionId;
use marketlens_core::progress::{LOCAL_STEPS, ProgressMonitor, ProgressState, ProgressUpdate, local_step};
use marketlens_render::Page;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

/// Server polling gives up after this many failed requests in a row.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Where progress comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStrategy {
    /// Poll `/api/get_progress/:session_id`
    Server,
    /// Canned step messages, used when tracking could not be started
    Local,
}

pub struct PollingTask {
    strategy: ProgressStrategy,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl PollingTask {
    /// Polls the server every `period` until it reports completion or
    /// [`MAX_CONSECUTIVE_FAILURES`] requests in a row fail.
    pub fn server(
        api: Arc<dyn AnalysisApi>,
        session_id: SessionId,
        page: Arc<Mutex<Page>>,
        period: Duration,
    ) -> Self {
        let token = CancellationToken::new();
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            let mut monitor = ProgressMonitor::new();
            let mut failures = 0u32;
            tracing::debug!(
                target: "marketlens::polling",
                "[Polling] Server polling started for {} ({:?} interval)",
                session_id,
                period
            );

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let state = match api.get_progress(&session_id).await {
                    Ok(Some(state)) => {
                        failures = 0;
                        state
                    }
                    Ok(None) => {
                        failures = 0;
                        continue;
                    }
                    Err(e) => {
                        failures += 1;
                        if failures >= MAX_CONSECUTIVE_FAILURES {
                            tracing::warn!(
                                target: "marketlens::polling",
                                "[Polling] {} consecutive progress failures, stopping: {}",
                                failures,
                                e
                            );
                            break;
                        }
                        tracing::debug!(
                            target: "marketlens::polling",
                            "[Polling] Progress request failed ({}/{}): {}",
                            failures,
                            MAX_CONSECUTIVE_FAILURES,
                            e
                        );
                        continue;
                    }
                };

                let update = monitor.apply(state.clone());
                if update == ProgressUpdate::Regressed {
                    continue;
                }
                if !publish(&task_token, &page, state).await {
                    break;
                }
                if update == ProgressUpdate::Completed {
                    tracing::debug!(target: "marketlens::polling", "[Polling] Server reported completion");
                    break;
                }
            }
        });

        Self {
            strategy: ProgressStrategy::Server,
            token,
            handle,
        }
    }

    /// Advances through the canned steps every `period`, stopping on the last one.
    pub fn local(page: Arc<Mutex<Page>>, period: Duration) -> Self {
        let token = CancellationToken::new();
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            for index in 0..LOCAL_STEPS.len() {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                if !publish(&task_token, &page, local_step(index)).await {
                    break;
                }
            }
        });

        Self {
            strategy: ProgressStrategy::Local,
            token,
            handle,
        }
    }

    pub fn strategy(&self) -> ProgressStrategy {
        self.strategy
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled() && !self.handle.is_finished()
    }

    /// Cancels and aborts the task. Idempotent.
    pub fn stop(&self) {
        self.token.cancel();
        self.handle.abort();
    }
}

impl Drop for PollingTask {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn publish(token: &CancellationToken, page: &Mutex<Page>, state: ProgressState) -> bool {
    let mut page = page.lock().await;
    if token.is_cancelled() {
        return false;
    }
    page.update_progress(state);
    true
}
