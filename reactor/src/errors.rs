use humantime::format_duration;
use std::{
    error::Error as StdError,
    fmt::{self, Display},
    result,
    time::Duration,
};

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Invalid watch parameters, only ever returned when a watch is started
    Config(&'static str),
    /// Network fault or a response body we could not make sense of
    Transport(Box<dyn StdError + Send + Sync>),
    /// 429 from discord, carries how long discord asked us to wait
    RateLimited(Duration),
    /// Any other non 2xx status
    UnknownRemote(u16),
    Url(url::ParseError),
}

impl Error {
    pub const fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimited(wait) => Some(*wait),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(inner) => write!(f, "invalid watch config: {inner}"),
            Error::Transport(inner) => write!(f, "transport error: {inner}"),
            Error::RateLimited(wait) => {
                write!(f, "rate limited, retry after {}", format_duration(*wait))
            }
            Error::UnknownRemote(status) => write!(f, "unexpected status {status} from discord"),
            Error::Url(inner) => fmt::Display::fmt(&inner, f),
        }
    }
}

impl StdError for Error {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Transport(Box::new(e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Transport(Box::new(e))
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Error {
        Error::Url(e)
    }
}
