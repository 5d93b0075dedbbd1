use super::parse_thread_id;
use crate::state::AppState;
use adapter::CommandEnvelope;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use domain::AppCommand;
use serde_json::{json, Value};
use tokio::sync::oneshot;

fn require_admin(headers: &HeaderMap, admin_token: &str) -> Result<(), (StatusCode, String)> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Missing Authorization header".into(),
        ))?;
    let expected_token = format!("Bearer {}", admin_token);
    if auth_header != expected_token {
        return Err((StatusCode::FORBIDDEN, "Invalid Admin Token".into()));
    }
    Ok(())
}

async fn dispatch(state: &AppState, cmd: AppCommand) -> Result<Json<Value>, (StatusCode, String)> {
    // 等待反馈
    let (tx, rx) = oneshot::channel();
    let envelope = CommandEnvelope { cmd, resp: tx };

    state.sender.send(envelope).await.map_err(|_| {
        (StatusCode::INTERNAL_SERVER_ERROR, "Worker closed".to_string())
    })?;

    match tokio::time::timeout(std::time::Duration::from_secs(5), rx).await {
        Ok(Ok(Ok(notice))) => Ok(Json(json!({ "notice": notice }))),
        Ok(Ok(Err(e))) => Err((StatusCode::BAD_GATEWAY, e.to_string())),
        _ => Err((StatusCode::GATEWAY_TIMEOUT, "Timeout".into())),
    }
}

pub async fn show_solution_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(thread_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_admin(&headers, &state.admin_token)?;
    let thread_id = parse_thread_id(&thread_id)?;
    dispatch(&state, AppCommand::ShowSolutionKey { thread_id }).await
}

pub async fn duplicate_thread(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(thread_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    require_admin(&headers, &state.admin_token)?;
    let thread_id = parse_thread_id(&thread_id)?;
    dispatch(&state, AppCommand::DuplicateThread { thread_id }).await
}
