use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ReplyBody<'a> {
    message: &'a str,
}

/// Human readable acknowledgement sent back for every control call.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub message: String,
}

impl Reply {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Reply {
        Reply {
            status,
            message: message.into(),
        }
    }

    pub fn ok(message: impl Into<String>) -> Reply {
        Reply::new(StatusCode::OK, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Reply {
        Reply::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Reply {
        Reply::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ReplyBody {
                message: &self.message,
            }),
        )
            .into_response()
    }
}
