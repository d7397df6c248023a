use crate::errors::{Error, Result};

use secrecy::{ExposeSecret, Secret};

/// Everything a watch session needs to know. Validated once in [`WatchConfig::new`]
/// and never changed afterwards.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    credential: Secret<String>,
    channel_id: String,
    emojis: Vec<String>,
    repeat_count: u32,
}

impl WatchConfig {
    pub fn new(
        credential: Secret<String>,
        channel_id: impl Into<String>,
        emojis: Vec<String>,
        repeat_count: u32,
    ) -> Result<WatchConfig> {
        let channel_id = channel_id.into();
        if credential.expose_secret().trim().is_empty() {
            return Err(Error::Config("credential must not be empty"));
        }
        if channel_id.trim().is_empty() {
            return Err(Error::Config("channel id must not be empty"));
        }
        if repeat_count < 1 {
            return Err(Error::Config("repeat count must be at least 1"));
        }

        Ok(WatchConfig {
            credential,
            channel_id,
            emojis,
            repeat_count,
        })
    }

    #[inline]
    pub const fn credential(&self) -> &Secret<String> {
        &self.credential
    }

    #[inline]
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Emojis in the order they were requested, duplicates included
    #[inline]
    pub fn emojis(&self) -> &[String] {
        &self.emojis
    }

    #[inline]
    pub const fn repeat_count(&self) -> u32 {
        self.repeat_count
    }
}
