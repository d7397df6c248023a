use reactor::{Result, WatchConfig};

use secrecy::Secret;
use serde::Deserialize;

const fn default_repeat_count() -> u32 {
    1
}

/// Body of a "start watching" call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchRequest {
    pub token: Secret<String>,
    pub channel_id: String,
    #[serde(default)]
    pub emojis: Vec<String>,
    #[serde(default = "default_repeat_count")]
    pub repeat_count: u32,
}

impl WatchRequest {
    pub fn into_config(self) -> Result<WatchConfig> {
        WatchConfig::new(
            self.token,
            self.channel_id.trim(),
            self.emojis,
            self.repeat_count,
        )
    }
}
