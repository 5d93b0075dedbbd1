pub mod admin;
pub mod hooks;
pub mod summary;

use axum::http::StatusCode;
use domain::ThreadId;

pub(crate) fn parse_thread_id(raw: &str) -> Result<ThreadId, (StatusCode, String)> {
    ThreadId::new(raw).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid thread ID format: {}", e),
        )
    })
}
