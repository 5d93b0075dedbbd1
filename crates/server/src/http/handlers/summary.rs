use super::parse_thread_id;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use domain::view::SummaryView;
use futures::stream::Stream;
use serde::Deserialize;
use tokio_stream::StreamExt;

#[derive(Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub expanded: bool,
}

pub async fn get_summary(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<SummaryView>, (StatusCode, String)> {
    let thread_id = parse_thread_id(&thread_id)?;
    let view = state
        .workflow
        .summary()
        .poll_once(&thread_id, query.expanded)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(view))
}

/// 每个连接一个轮询任务，客户端断开后流被丢弃，任务随之取消
pub async fn summary_sse(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, (StatusCode, String)> {
    let thread_id = parse_thread_id(&thread_id)?;
    tracing::info!("SSE Connected: thread={}", thread_id);

    let poller = state
        .workflow
        .summary()
        .spawn_poller(thread_id, state.poll_interval, query.expanded);

    let stream = poller.into_stream().map(|view| {
        Event::default()
            .event("summary")
            .json_data(view)
            .map_err(|e| {
                tracing::error!("SSE serialization error: {}", e);
                e
            })
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(std::time::Duration::from_secs(15))))
}
