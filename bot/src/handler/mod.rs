mod watch;

use crate::structs::Reply;

use axum::routing::{delete, post};
use axum::Router;
use reactor::SessionRegistry;
use std::sync::Arc;

pub type AppState = Arc<SessionRegistry>;

pub fn router(registry: AppState) -> Router {
    Router::new()
        .route("/api/discord/watch", post(watch::start).get(watch::list))
        .route("/api/discord/watch/{channel_id}", delete(watch::stop))
        .fallback(not_found)
        .with_state(registry)
}

async fn not_found() -> Reply {
    Reply::not_found("Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use reactor::{ChannelApi, Dispatcher, RateLimitPolicy};
    use secrecy::Secret;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    /// Channel that never has any messages
    struct QuietChannel;

    #[async_trait]
    impl ChannelApi for QuietChannel {
        async fn latest_message_id(
            &self,
            _credential: &Secret<String>,
            _channel_id: &str,
        ) -> reactor::Result<Option<String>> {
            Ok(None)
        }

        async fn put_reaction(
            &self,
            _credential: &Secret<String>,
            _channel_id: &str,
            _message_id: &str,
            _emoji: &str,
        ) -> reactor::Result<()> {
            Ok(())
        }
    }

    fn registry() -> AppState {
        let api: Arc<dyn ChannelApi> = Arc::new(QuietChannel);
        let dispatcher = Dispatcher::new(Arc::clone(&api), RateLimitPolicy::Drop);
        Arc::new(SessionRegistry::new(api, dispatcher, Duration::from_secs(5)))
    }

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn start_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/discord/watch")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_start_watch() {
        let registry = registry();
        let (status, body) = call(
            router(registry.clone()),
            start_request(json!({
                "token": "tok",
                "channelId": "C1",
                "emojis": ["🔆"],
                "repeatCount": 2
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Started watching channel C1");
        assert!(registry.is_watching("C1"));
        registry.stop_all();
    }

    #[tokio::test]
    async fn test_start_twice_restarts() {
        let registry = registry();
        let body = json!({"token": "tok", "channelId": "C1", "emojis": ["🔆"]});
        call(router(registry.clone()), start_request(body.clone())).await;
        let (status, reply) = call(router(registry.clone()), start_request(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["message"], "Restarted watching channel C1");
        assert_eq!(registry.sessions().len(), 1);
        registry.stop_all();
    }

    #[tokio::test]
    async fn test_start_invalid_config() {
        let registry = registry();
        let (status, body) = call(
            router(registry.clone()),
            start_request(json!({"token": "", "channelId": "C1", "emojis": ["🔆"]})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "invalid watch config: credential must not be empty"
        );
        assert!(registry.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_start_zero_repeat() {
        let (status, _) = call(
            router(registry()),
            start_request(json!({"token": "tok", "channelId": "C1", "repeatCount": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_start_malformed_json() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/discord/watch")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _) = call(router(registry()), req).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_list_and_stop() {
        let registry = registry();
        registry.start(
            reactor::WatchConfig::new(Secret::new("tok".to_string()), "C1", vec!["🔆".into()], 3)
                .unwrap(),
        );

        let list = Request::builder()
            .uri("/api/discord/watch")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(router(registry.clone()), list).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["channelId"], "C1");
        assert_eq!(body[0]["repeatCount"], 3);

        let stop = || {
            Request::builder()
                .method("DELETE")
                .uri("/api/discord/watch/C1")
                .body(Body::empty())
                .unwrap()
        };
        let (status, body) = call(router(registry.clone()), stop()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Stopped watching channel C1");

        let (status, _) = call(router(registry.clone()), stop()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let req = Request::builder()
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(router(registry()), req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Not Found");
    }
}
