use crate::errors::{Error, Result};

use async_trait::async_trait;
use log::trace;
use reqwest::header::{HeaderMap, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v9";

/// Wait applied when a 429 doesn't say how long to back off for
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Longest wait we will honour from a 429, anything above is clamped to this
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(300);

/// The two calls the watcher and dispatcher make against the chat service.
#[async_trait]
pub trait ChannelApi: Send + Sync {
    /// Id of the newest message in the channel, `None` if the channel is empty
    async fn latest_message_id(
        &self,
        credential: &Secret<String>,
        channel_id: &str,
    ) -> Result<Option<String>>;

    async fn put_reaction(
        &self,
        credential: &Secret<String>,
        channel_id: &str,
        message_id: &str,
        emoji: &str,
    ) -> Result<()>;
}

// Discord sends a lot more than this, we only care about the id
#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

pub struct DiscordApi {
    client: Client,
    base: Url,
}

impl DiscordApi {
    pub fn new(client: Client, base: &str) -> Result<DiscordApi> {
        let base = Url::parse(base)?;
        if base.cannot_be_a_base() {
            return Err(Error::Config("api base url must be an http(s) url"));
        }
        Ok(DiscordApi { client, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config("api base url must be an http(s) url"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Seconds from the `Retry-After` header, falling back to one second when it
/// is missing or garbage and capped at [`MAX_RETRY_AFTER`].
pub fn retry_after(headers: &HeaderMap) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            let value = value.trim();
            value.parse::<u64>().map(Duration::from_secs).ok().or_else(|| {
                value
                    .parse::<f64>()
                    .ok()
                    .filter(|secs| secs.is_finite() && *secs >= 0.0)
                    .map(|secs| {
                        Duration::try_from_secs_f64(secs).unwrap_or(MAX_RETRY_AFTER)
                    })
            })
        })
        .map_or(DEFAULT_RETRY_AFTER, |wait| wait.min(MAX_RETRY_AFTER))
}

fn check_status(resp: &Response) -> Result<()> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        Err(Error::RateLimited(retry_after(resp.headers())))
    } else {
        Err(Error::UnknownRemote(status.as_u16()))
    }
}

#[async_trait]
impl ChannelApi for DiscordApi {
    async fn latest_message_id(
        &self,
        credential: &Secret<String>,
        channel_id: &str,
    ) -> Result<Option<String>> {
        let mut url = self.endpoint(&["channels", channel_id, "messages"])?;
        url.query_pairs_mut().append_pair("limit", "1");
        trace!("GET {url}");

        let resp = self
            .client
            .get(url)
            .header(AUTHORIZATION, credential.expose_secret())
            .send()
            .await?;
        check_status(&resp)?;

        let body = resp.bytes().await?;
        let messages: Vec<MessageRef> = serde_json::from_slice(&body)?;
        Ok(messages.into_iter().next().map(|m| m.id))
    }

    async fn put_reaction(
        &self,
        credential: &Secret<String>,
        channel_id: &str,
        message_id: &str,
        emoji: &str,
    ) -> Result<()> {
        let url = self.endpoint(&[
            "channels",
            channel_id,
            "messages",
            message_id,
            "reactions",
            emoji,
            "@me",
        ])?;
        trace!("PUT {url}");

        let resp = self
            .client
            .put(url)
            .header(AUTHORIZATION, credential.expose_secret())
            .send()
            .await?;
        check_status(&resp)
    }
}
