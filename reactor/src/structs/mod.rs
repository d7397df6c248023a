pub mod config;
pub mod report;
pub mod task;

pub use config::WatchConfig;
pub use report::DispatchReport;
pub use task::ReactionTask;
