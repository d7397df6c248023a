use std::{
    error::Error as StdError,
    fmt::{self, Display},
    result,
};

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Reactor(reactor::Error),
    Reqwest(reqwest::Error),
    IoError(std::io::Error),
    Logger(log::SetLoggerError),
    Config(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Reactor(inner) => fmt::Display::fmt(&inner, f),
            Error::Reqwest(inner) => fmt::Display::fmt(&inner, f),
            Error::IoError(inner) => fmt::Display::fmt(&inner, f),
            Error::Logger(inner) => fmt::Display::fmt(&inner, f),
            Error::Config(inner) => f.write_str(inner),
        }
    }
}

impl StdError for Error {}

impl From<reactor::Error> for Error {
    fn from(e: reactor::Error) -> Error {
        Error::Reactor(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Reqwest(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::IoError(e)
    }
}

impl From<log::SetLoggerError> for Error {
    fn from(e: log::SetLoggerError) -> Error {
        Error::Logger(e)
    }
}
