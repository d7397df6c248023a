#![warn(
    clippy::cognitive_complexity,
    clippy::missing_const_for_fn,
    clippy::option_if_let_else
)]

mod config;
mod errors;
mod handler;
mod structs;

use log::LevelFilter;
use log::{error, info};
use reactor::{ChannelApi, DiscordApi, Dispatcher, SessionRegistry};
use simple_logger::SimpleLogger;

use std::process;
use std::sync::Arc;

use config::Settings;
use errors::Result;

const USER_AGENT: &str = concat!("DiscordBot (reaction-bot, ", env!("CARGO_PKG_VERSION"), ")");

fn init_logging(level: LevelFilter) -> Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .with_module_level("bot", level)
        .with_module_level("reactor", level)
        .with_utc_timestamps()
        .init()?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(why) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {why}");
    }
    info!("shutting down");
}

async fn run(settings: Settings) -> Result<()> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(settings.http_timeout)
        .build()?;
    let api: Arc<dyn ChannelApi> = Arc::new(DiscordApi::new(client, &settings.api_base)?);
    let dispatcher = Dispatcher::new(Arc::clone(&api), settings.rate_limit_policy);
    let registry = Arc::new(SessionRegistry::new(
        api,
        dispatcher,
        settings.watch_interval,
    ));

    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    info!(
        "listening on {} (api {}, rate limit policy {:?})",
        settings.bind_addr, settings.api_base, settings.rate_limit_policy
    );

    axum::serve(listener, handler::router(Arc::clone(&registry)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let stopped = registry.stop_all();
    if stopped > 0 {
        info!("cancelled {stopped} watch sessions");
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(why) => {
            eprintln!("Invalid configuration, exiting: {why}");
            process::exit(-1);
        }
    };

    if let Err(why) = init_logging(settings.log_level) {
        eprintln!("Failed to set up logging: {why}");
        process::exit(-1);
    }

    if let Err(why) = run(settings).await {
        error!("Server error: {why}");
        process::exit(-1);
    }
}
