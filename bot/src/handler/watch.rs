use super::AppState;
use crate::structs::{Reply, WatchRequest};

use axum::extract::{Path, State};
use axum::Json;
use log::{info, warn};
use reactor::{SessionInfo, Started};

pub(super) async fn start(
    State(registry): State<AppState>,
    Json(req): Json<WatchRequest>,
) -> Reply {
    let config = match req.into_config() {
        Ok(config) => config,
        Err(why) => {
            warn!("rejected watch request: {why}");
            return Reply::bad_request(why.to_string());
        }
    };

    let channel_id = config.channel_id().to_string();
    info!(
        "watch requested for {channel_id}: {:?} x{}",
        config.emojis(),
        config.repeat_count()
    );
    match registry.start(config) {
        Started::New => Reply::ok(format!("Started watching channel {channel_id}")),
        Started::Replaced => Reply::ok(format!("Restarted watching channel {channel_id}")),
    }
}

pub(super) async fn list(State(registry): State<AppState>) -> Json<Vec<SessionInfo>> {
    Json(registry.sessions())
}

pub(super) async fn stop(
    State(registry): State<AppState>,
    Path(channel_id): Path<String>,
) -> Reply {
    if registry.stop(&channel_id) {
        Reply::ok(format!("Stopped watching channel {channel_id}"))
    } else {
        Reply::not_found(format!("Not watching channel {channel_id}"))
    }
}
