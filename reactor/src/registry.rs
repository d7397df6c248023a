use crate::api::ChannelApi;
use crate::dispatcher::Dispatcher;
use crate::structs::WatchConfig;
use crate::watcher::{WatchHandle, Watcher};

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// What can safely be shown about a running session, no credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub channel_id: String,
    pub emojis: Vec<String>,
    pub repeat_count: u32,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Started {
    New,
    /// A session for the same channel was running and has been cancelled
    Replaced,
}

struct Session {
    handle: WatchHandle,
    info: SessionInfo,
}

/// At most one watcher per channel.
pub struct SessionRegistry {
    api: Arc<dyn ChannelApi>,
    dispatcher: Dispatcher,
    interval: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionRegistry {
    pub fn new(
        api: Arc<dyn ChannelApi>,
        dispatcher: Dispatcher,
        interval: Duration,
    ) -> SessionRegistry {
        SessionRegistry {
            api,
            dispatcher,
            interval,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Starts watching `config`'s channel, replacing whatever was watching it before.
    pub fn start(&self, config: WatchConfig) -> Started {
        let channel_id = config.channel_id().to_string();
        let emojis = config.emojis().to_vec();
        let repeat_count = config.repeat_count();

        let watcher = Watcher::new(config, Arc::clone(&self.api), self.dispatcher.clone());
        let handle = watcher.start(self.interval);
        let info = SessionInfo {
            channel_id: channel_id.clone(),
            emojis,
            repeat_count,
            started_at: handle.started_at(),
        };

        let previous = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(channel_id.clone(), Session { handle, info });

        match previous {
            Some(old) => {
                old.handle.cancel();
                info!("replaced existing watch on channel {channel_id}");
                Started::Replaced
            }
            None => Started::New,
        }
    }

    /// Returns false if nothing was watching the channel
    pub fn stop(&self, channel_id: &str) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(channel_id);

        match removed {
            Some(session) => {
                session.handle.cancel();
                info!("stopped watch on channel {channel_id}");
                true
            }
            None => false,
        }
    }

    /// Cancels every session, returns how many there were
    pub fn stop_all(&self) -> usize {
        let drained: Vec<Session> = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .map(|(_, session)| session)
            .collect();

        for session in &drained {
            session.handle.cancel();
        }
        drained.len()
    }

    /// Running sessions, oldest first
    pub fn sessions(&self) -> Vec<SessionInfo> {
        let mut sessions: Vec<SessionInfo> = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|s| s.info.clone())
            .collect();
        sessions.sort_by(|a, b| {
            a.started_at
                .cmp(&b.started_at)
                .then_with(|| a.channel_id.cmp(&b.channel_id))
        });
        sessions
    }

    pub fn is_watching(&self, channel_id: &str) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel_id)
            .map_or(false, |s| !s.handle.is_cancelled() && !s.handle.is_finished())
    }
}
