pub mod api;
pub mod dispatcher;
mod errors;
pub mod registry;
pub mod structs;
#[cfg(test)]
mod testing;
pub mod watcher;

pub use api::{ChannelApi, DiscordApi};
pub use dispatcher::{Dispatcher, RateLimitPolicy};
pub use errors::{Error, Result};
pub use registry::{SessionInfo, SessionRegistry, Started};
pub use structs::{DispatchReport, ReactionTask, WatchConfig};
pub use watcher::{WatchHandle, Watcher};
