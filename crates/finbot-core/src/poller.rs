//! Restartable polling task behind the price and news widgets.
//!
//! A [`Poller`] fetches once as soon as it is spawned, then again on every
//! interval tick, and publishes a [`PollSnapshot`] after each completed
//! fetch. The returned [`PollerHandle`] can force a fetch ([`retry`]),
//! switch to a new target ([`retarget`]) or stop the task.
//!
//! ```text
//!            spawn / retarget
//!                  │
//!                  ▼
//!             ┌─────────┐   ok    ┌─────────┐
//!             │ Loading │───────▶│ Success │◀─┐ ok
//!             └────┬────┘        └────┬────┘──┘
//!              err │                  │ err
//!                  ▼                  ▼
//!             ┌─────────┐◀───────────┘
//!             │  Error  │──── ok ────▶ Success
//!             └─────────┘◀─┐ err
//!                  └───────┘
//! ```
//!
//! Every fetch is stamped with the generation that was current when it was
//! issued. [`retarget`] bumps the generation, so a response for the previous
//! target that lands late is counted in [`PollSnapshot::discarded`] and
//! otherwise ignored.
//!
//! [`retry`]: PollerHandle::retry
//! [`retarget`]: PollerHandle::retarget

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{FetchError, ValidationError};

pub type FetchFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send + 'a>>;

/// What a poller fetches and how results land in its model.
pub trait PollSource: Send + Sync + 'static {
    /// Parameters the endpoint is built from (symbol, feed mode, ...).
    type Target: Clone + Debug + Send + Sync + 'static;
    /// Decoded result of one successful fetch.
    type Output: Send + 'static;
    /// Data shown by the widget; reset to `Default` on retarget.
    type Model: Clone + Debug + Default + Send + Sync + 'static;

    fn fetch<'a>(&'a self, target: &'a Self::Target) -> FetchFuture<'a, Self::Output>;

    fn apply(&self, model: &mut Self::Model, output: Self::Output);

    /// User-facing text for a failed fetch.
    fn describe_error(&self, error: &FetchError) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PollStatus {
    Loading,
    Success,
    Error { message: String },
}

impl PollStatus {
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// State published after every applied fetch.
#[derive(Debug, Clone, Serialize)]
pub struct PollSnapshot<M> {
    pub status: PollStatus,
    pub model: M,
    pub generation: u64,
    /// Completions applied in the current generation, successful or not.
    pub completed: u64,
    /// Completions dropped because they belonged to an older generation.
    pub discarded: u64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl<M: Default> Default for PollSnapshot<M> {
    fn default() -> Self {
        Self {
            status: PollStatus::Loading,
            model: M::default(),
            generation: 0,
            completed: 0,
            discarded: 0,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    interval: Duration,
}

impl PollerConfig {
    pub const PRICE_REFRESH: Duration = Duration::from_secs(5);
    pub const NEWS_REFRESH: Duration = Duration::from_secs(60);

    pub fn new(interval: Duration) -> Result<Self, ValidationError> {
        if interval.is_zero() {
            return Err(ValidationError::ZeroInterval);
        }
        Ok(Self { interval })
    }

    /// Price ticker default.
    pub const fn price() -> Self {
        Self {
            interval: Self::PRICE_REFRESH,
        }
    }

    /// News feed default.
    pub const fn news() -> Self {
        Self {
            interval: Self::NEWS_REFRESH,
        }
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

#[derive(Debug)]
enum Command<T> {
    Retry,
    Retarget(T),
    Stop,
}

struct Completion<O> {
    generation: u64,
    result: Result<O, FetchError>,
}

pub struct Poller<S: PollSource> {
    source: Arc<S>,
    config: PollerConfig,
}

impl<S: PollSource> Poller<S> {
    pub fn new(source: S, config: PollerConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
        }
    }

    /// Start polling `target` on the current tokio runtime.
    pub fn spawn(self, target: S::Target) -> PollerHandle<S> {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(PollSnapshot::default());

        info!(?target, interval_ms = self.config.interval.as_millis() as u64, "poller started");
        let task = tokio::spawn(run(self.source, self.config, target, commands_rx, state_tx));

        PollerHandle {
            commands: commands_tx,
            state: state_rx,
            task,
        }
    }
}

/// Control and observation side of a running poller. Dropping it stops the
/// task.
pub struct PollerHandle<S: PollSource> {
    commands: mpsc::UnboundedSender<Command<S::Target>>,
    state: watch::Receiver<PollSnapshot<S::Model>>,
    task: JoinHandle<()>,
}

impl<S: PollSource> PollerHandle<S> {
    /// Issue one fetch now, without touching the interval.
    pub fn retry(&self) {
        let _ = self.commands.send(Command::Retry);
    }

    /// Switch to `target`: new generation, fresh model, immediate fetch and a
    /// re-armed interval.
    pub fn retarget(&self, target: S::Target) {
        let _ = self.commands.send(Command::Retarget(target));
    }

    pub fn snapshot(&self) -> PollSnapshot<S::Model> {
        (*self.state.borrow()).clone()
    }

    /// Wait for the next published snapshot; `None` once the poller is gone.
    pub async fn changed(&mut self) -> Option<PollSnapshot<S::Model>> {
        self.state.changed().await.ok()?;
        let snapshot = self.state.borrow_and_update();
        Some((*snapshot).clone())
    }

    /// Wait until a snapshot satisfies `predicate`, checking the current one
    /// first.
    pub async fn wait_for<F>(&mut self, predicate: F) -> Option<PollSnapshot<S::Model>>
    where
        F: FnMut(&PollSnapshot<S::Model>) -> bool,
    {
        self.state
            .wait_for(predicate)
            .await
            .ok()
            .map(|snapshot| (*snapshot).clone())
    }

    /// Ask the task to finish and wait for it.
    pub async fn stop(mut self) {
        let _ = self.commands.send(Command::Stop);
        let _ = (&mut self.task).await;
    }
}

impl<S: PollSource> Drop for PollerHandle<S> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<S: PollSource>(
    source: Arc<S>,
    config: PollerConfig,
    mut target: S::Target,
    mut commands: mpsc::UnboundedReceiver<Command<S::Target>>,
    state: watch::Sender<PollSnapshot<S::Model>>,
) {
    let mut generation = 0_u64;
    let mut in_flight: JoinSet<Completion<S::Output>> = JoinSet::new();
    let mut ticker = ticker(config.interval);

    issue(&source, &target, generation, &mut in_flight);

    loop {
        tokio::select! {
            _ = ticker.tick() => issue(&source, &target, generation, &mut in_flight),
            command = commands.recv() => match command {
                Some(Command::Retry) => {
                    debug!(?target, "manual retry");
                    issue(&source, &target, generation, &mut in_flight);
                }
                Some(Command::Retarget(next)) => {
                    generation += 1;
                    info!(from = ?target, to = ?next, generation, "poller retargeted");
                    target = next;
                    state.send_modify(|snapshot| {
                        snapshot.status = PollStatus::Loading;
                        snapshot.model = S::Model::default();
                        snapshot.generation = generation;
                        snapshot.completed = 0;
                        snapshot.updated_at = None;
                    });
                    ticker = self::ticker(config.interval);
                    issue(&source, &target, generation, &mut in_flight);
                }
                Some(Command::Stop) | None => break,
            },
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                let completion = match joined {
                    Ok(completion) => completion,
                    Err(error) => {
                        warn!(%error, "fetch task did not complete");
                        continue;
                    }
                };

                if completion.generation != generation {
                    debug!(stale = completion.generation, current = generation, "discarding stale response");
                    state.send_modify(|snapshot| snapshot.discarded += 1);
                    continue;
                }

                state.send_modify(|snapshot| {
                    match completion.result {
                        Ok(output) => {
                            source.apply(&mut snapshot.model, output);
                            snapshot.status = PollStatus::Success;
                            snapshot.updated_at = Some(OffsetDateTime::now_utc());
                        }
                        Err(error) => {
                            warn!(?target, %error, "fetch failed");
                            snapshot.status = PollStatus::Error {
                                message: source.describe_error(&error),
                            };
                        }
                    }
                    snapshot.completed += 1;
                });
            }
        }
    }

    info!(?target, "poller stopped");
}

fn ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

fn issue<S: PollSource>(
    source: &Arc<S>,
    target: &S::Target,
    generation: u64,
    in_flight: &mut JoinSet<Completion<S::Output>>,
) {
    let source = Arc::clone(source);
    let target = target.clone();
    in_flight.spawn(async move {
        let result = source.fetch(&target).await;
        Completion { generation, result }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_is_rejected() {
        assert_eq!(
            PollerConfig::new(Duration::ZERO),
            Err(ValidationError::ZeroInterval)
        );
        assert_eq!(
            PollerConfig::new(PollerConfig::PRICE_REFRESH).map(|c| c.interval()),
            Ok(Duration::from_secs(5))
        );
    }

    #[test]
    fn initial_snapshot_is_loading() {
        let snapshot: PollSnapshot<Vec<u8>> = PollSnapshot::default();
        assert_eq!(snapshot.status, PollStatus::Loading);
        assert_eq!(snapshot.completed, 0);
        assert!(snapshot.updated_at.is_none());
    }

    #[test]
    fn status_serializes_with_state_tag() {
        let status = PollStatus::Error {
            message: String::from("down"),
        };
        let json = serde_json::to_value(&status).expect("serializes");
        assert_eq!(json, serde_json::json!({ "state": "error", "message": "down" }));
        assert_eq!(status.error_message(), Some("down"));
    }
}
