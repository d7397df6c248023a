pub mod reply;
pub mod watch;

pub use reply::Reply;
pub use watch::WatchRequest;
