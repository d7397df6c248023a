use crate::api::ChannelApi;
use crate::dispatcher::Dispatcher;
use crate::errors::Error;
use crate::structs::{DispatchReport, WatchConfig};

use chrono::{DateTime, Utc};
use humantime::format_duration;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Per session memory of what has already been reacted to.
#[derive(Debug, Default)]
pub struct WatcherState {
    last_seen: Option<String>,
}

impl WatcherState {
    pub fn last_seen(&self) -> Option<&str> {
        self.last_seen.as_deref()
    }

    /// Records `id` as the newest message, returns false if it was already the newest
    fn observe(&mut self, id: &str) -> bool {
        if self.last_seen.as_deref() == Some(id) {
            return false;
        }
        self.last_seen = Some(id.to_string());
        true
    }
}

/// How a single poll of the channel went.
#[derive(Debug)]
pub enum Cycle {
    FetchFailed(Error),
    Empty,
    Unchanged,
    /// A new message showed up, reactions are on their way in the background
    Dispatched {
        message_id: String,
        dispatch: JoinHandle<DispatchReport>,
    },
}

pub struct Watcher {
    config: Arc<WatchConfig>,
    api: Arc<dyn ChannelApi>,
    dispatcher: Dispatcher,
    state: WatcherState,
}

impl Watcher {
    pub fn new(config: WatchConfig, api: Arc<dyn ChannelApi>, dispatcher: Dispatcher) -> Watcher {
        Watcher {
            config: Arc::new(config),
            api,
            dispatcher,
            state: WatcherState::default(),
        }
    }

    pub const fn state(&self) -> &WatcherState {
        &self.state
    }

    /// Polls the channel once. The last seen id is updated before the
    /// dispatch is spawned and the dispatch is never awaited here.
    pub async fn cycle(&mut self) -> Cycle {
        let channel_id = self.config.channel_id();
        let latest = match self
            .api
            .latest_message_id(self.config.credential(), channel_id)
            .await
        {
            Ok(latest) => latest,
            Err(why) => {
                warn!("failed to fetch latest message in {channel_id}: {why}");
                return Cycle::FetchFailed(why);
            }
        };

        let message_id = match latest {
            Some(id) => id,
            None => {
                debug!("channel {channel_id} has no messages yet");
                return Cycle::Empty;
            }
        };

        if !self.state.observe(&message_id) {
            return Cycle::Unchanged;
        }
        info!("new message {message_id} in {channel_id}");

        let dispatcher = self.dispatcher.clone();
        let config = Arc::clone(&self.config);
        let target = message_id.clone();
        let dispatch = tokio::spawn(async move {
            let report = dispatcher
                .dispatch(
                    config.credential(),
                    config.channel_id(),
                    &target,
                    config.emojis(),
                    config.repeat_count(),
                )
                .await;
            if report.failed() > 0 {
                warn!("{report}");
            } else {
                info!("{report}");
            }
            report
        });

        Cycle::Dispatched {
            message_id,
            dispatch,
        }
    }

    /// Spawns the polling loop. The first poll happens one `interval` from now,
    /// a poll still waiting on discord after a whole `interval` is abandoned.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn start(mut self, interval: Duration) -> WatchHandle {
        let cancel = CancellationToken::new();
        let stop = cancel.clone();
        let channel_id = self.config.channel_id().to_string();

        let label = channel_id.clone();

        let task = tokio::spawn(async move {
            info!(
                "watching channel {label} every {}",
                format_duration(interval)
            );
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = stop.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                // dispatches keep running on their own, nothing to do with the handle
                tokio::select! {
                    biased;
                    _ = stop.cancelled() => break,
                    polled = timeout(interval, self.cycle()) => {
                        if polled.is_err() {
                            warn!(
                                "poll of channel {label} took longer than {}, skipped",
                                format_duration(interval)
                            );
                        }
                    }
                }
            }
            info!("stopped watching channel {label}");
        });

        WatchHandle {
            channel_id,
            started_at: Utc::now(),
            cancel,
            task,
        }
    }
}

/// Owner side of a running watch session. Dropping it leaves the session running.
#[derive(Debug)]
pub struct WatchHandle {
    channel_id: String,
    started_at: DateTime<Utc>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl WatchHandle {
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Stops future polls. Reactions already being applied are left alone.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancels and waits for the polling loop to exit
    pub async fn stop(self) {
        self.cancel();
        if let Err(why) = self.task.await {
            warn!("watcher for {} ended badly: {why}", self.channel_id);
        }
    }
}
