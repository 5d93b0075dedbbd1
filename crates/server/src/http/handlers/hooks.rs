use crate::signature::SIGNATURE_HEADER;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use domain::PlatformEvent;

/// 平台推送 "comment created" 事件。立即返回 202，处理在后台任务里进行
pub async fn receive_comment_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, (StatusCode, String)> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or((StatusCode::UNAUTHORIZED, "Missing signature header".into()))?;
    if !state.verifier.verify(&body, signature) {
        return Err((StatusCode::FORBIDDEN, "Invalid signature".into()));
    }

    let event: PlatformEvent = serde_json::from_slice(&body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid event payload: {}", e),
        )
    })?;
    event
        .validate_ids()
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid ID in event: {}", e)))?;

    state.workflow.spawn_event(event);
    Ok(StatusCode::ACCEPTED)
}
