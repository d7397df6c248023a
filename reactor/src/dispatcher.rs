use crate::api::ChannelApi;
use crate::errors::{Error, Result};
use crate::structs::{DispatchReport, ReactionTask};

use humantime::format_duration;
use log::{debug, error, info, warn};
use secrecy::Secret;
use std::str::FromStr;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::sleep;

/// What to do with a reaction once its rate limit wait is over.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitPolicy {
    /// Give up on the reaction after waiting
    #[default]
    Drop,
    /// Send the reaction one more time after waiting, whatever happens then is final
    RetryOnce,
}

impl RateLimitPolicy {
    const fn attempts(self) -> u32 {
        match self {
            RateLimitPolicy::Drop => 1,
            RateLimitPolicy::RetryOnce => 2,
        }
    }
}

impl FromStr for RateLimitPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(RateLimitPolicy::Drop),
            "retry-once" | "retry_once" => Ok(RateLimitPolicy::RetryOnce),
            _ => Err(Error::Config(
                "rate limit policy must be one of \"drop\" or \"retry-once\"",
            )),
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn ChannelApi>,
    policy: RateLimitPolicy,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn ChannelApi>, policy: RateLimitPolicy) -> Dispatcher {
        Dispatcher { api, policy }
    }

    /// Applies every emoji `repeat_count` times to the message, all at once.
    ///
    /// Never fails: each reaction is retried or dropped on its own and the
    /// returned report says how they all ended. Only returns once every
    /// reaction has finished, including any rate limit waits.
    pub async fn dispatch(
        &self,
        credential: &Secret<String>,
        channel_id: &str,
        message_id: &str,
        emojis: &[String],
        repeat_count: u32,
    ) -> DispatchReport {
        let tasks = ReactionTask::expand(message_id, emojis, repeat_count);
        debug!(
            "dispatching {} reactions to message {message_id} in {channel_id}",
            tasks.len()
        );

        let mut running = JoinSet::new();
        for task in tasks {
            let api = Arc::clone(&self.api);
            let credential = credential.clone();
            let channel_id = channel_id.to_string();
            let policy = self.policy;
            running.spawn(async move {
                apply_reaction(api.as_ref(), &credential, &channel_id, &task, policy).await
            });
        }

        let mut report = DispatchReport::new(message_id);
        while let Some(joined) = running.join_next().await {
            match joined {
                Ok(outcome) => report.record(&outcome),
                Err(why) => {
                    error!("reaction task for {message_id} died: {why}");
                    report.record_lost();
                }
            }
        }
        report
    }
}

async fn apply_reaction(
    api: &dyn ChannelApi,
    credential: &Secret<String>,
    channel_id: &str,
    task: &ReactionTask,
    policy: RateLimitPolicy,
) -> Result<()> {
    let mut attempt = 1;
    loop {
        match api
            .put_reaction(credential, channel_id, &task.message_id, &task.emoji)
            .await
        {
            Ok(()) => {
                info!("reacted {} to {}", task.emoji, task.message_id);
                return Ok(());
            }
            Err(Error::RateLimited(wait)) => {
                warn!(
                    "rate limited reacting {} to {}, waiting {}",
                    task.emoji,
                    task.message_id,
                    format_duration(wait)
                );
                sleep(wait).await;
                if attempt >= policy.attempts() {
                    return Err(Error::RateLimited(wait));
                }
                attempt += 1;
            }
            Err(why) => {
                error!("failed to react {} to {}: {why}", task.emoji, task.message_id);
                return Err(why);
            }
        }
    }
}
