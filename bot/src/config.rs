//! Process settings, all read from the environment.

use crate::errors::{Error, Result};

use log::LevelFilter;
use reactor::api::DEFAULT_API_BASE;
use reactor::watcher::DEFAULT_INTERVAL;
use reactor::RateLimitPolicy;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub api_base: String,
    pub watch_interval: Duration,
    /// Per request limit for calls to discord, always shorter than `watch_interval`
    pub http_timeout: Duration,
    pub rate_limit_policy: RateLimitPolicy,
    pub log_level: LevelFilter,
}

impl Settings {
    pub fn from_env() -> Result<Settings> {
        Settings::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup, unset or blank keys get defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|why| Error::Config(format!("BIND_ADDR is not a socket address: {why}")))?;

        let watch_interval = match get("WATCH_INTERVAL") {
            Some(raw) => humantime::parse_duration(raw.trim())
                .map_err(|why| Error::Config(format!("WATCH_INTERVAL is not a duration: {why}")))?,
            None => DEFAULT_INTERVAL,
        };
        if watch_interval.is_zero() {
            return Err(Error::Config("WATCH_INTERVAL must be above zero".to_string()));
        }

        let http_timeout = match get("HTTP_TIMEOUT") {
            Some(raw) => humantime::parse_duration(raw.trim())
                .map_err(|why| Error::Config(format!("HTTP_TIMEOUT is not a duration: {why}")))?,
            None if DEFAULT_HTTP_TIMEOUT < watch_interval => DEFAULT_HTTP_TIMEOUT,
            None => watch_interval / 2,
        };
        if http_timeout.is_zero() || http_timeout >= watch_interval {
            return Err(Error::Config(
                "HTTP_TIMEOUT must be above zero and shorter than WATCH_INTERVAL".to_string(),
            ));
        }

        let rate_limit_policy = match get("RATE_LIMIT_POLICY") {
            Some(raw) => raw.parse::<RateLimitPolicy>()?,
            None => RateLimitPolicy::default(),
        };

        let log_level = match get("LOG_LEVEL") {
            Some(raw) => raw
                .trim()
                .parse::<LevelFilter>()
                .map_err(|_| Error::Config(format!("LOG_LEVEL {raw:?} is not a log level")))?,
            None => LevelFilter::Debug,
        };

        Ok(Settings {
            bind_addr,
            api_base: get("DISCORD_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            watch_interval,
            http_timeout,
            rate_limit_policy,
            log_level,
        })
    }
}
