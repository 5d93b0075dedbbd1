use crate::error::PlatformResult;
use crate::traits::ContentDirectory;
use domain::{protocol::METADATA_SOLUTION_FIELD, CommentId, ThreadId};
use serde_json::{json, Value};
use storage::SolutionStore;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataSync {
    Merged,
    /// 失败详情已写入 solution_fallback:{thread}
    Fallback(String),
}

/// 把解答 ID 合并进帖子元数据。不重试，不影响解答记录本身
pub(crate) async fn sync_metadata(
    content: &dyn ContentDirectory,
    store: &SolutionStore,
    thread_id: &ThreadId,
    solution_id: &CommentId,
) -> MetadataSync {
    match merge_solution(content, thread_id, solution_id).await {
        Ok(()) => {
            debug!(
                "Set metadata for {} {}={}",
                thread_id, METADATA_SOLUTION_FIELD, solution_id
            );
            MetadataSync::Merged
        }
        Err(e) => {
            let detail = json!({
                "solutionId": solution_id,
                "unsupported": e.is_unsupported(),
                "error": e.to_string(),
            })
            .to_string();
            warn!("Failed to set metadata for {}: {}", thread_id, detail);
            if let Err(store_err) = store.record_sync_failure(thread_id, &detail).await {
                error!(
                    "Failed to set fallback key for {}: {:?}",
                    thread_id, store_err
                );
            }
            MetadataSync::Fallback(detail)
        }
    }
}

async fn merge_solution(
    content: &dyn ContentDirectory,
    thread_id: &ThreadId,
    solution_id: &CommentId,
) -> PlatformResult<()> {
    let mut metadata = content.get_thread_metadata(thread_id).await?;
    metadata.insert(
        METADATA_SOLUTION_FIELD.to_string(),
        Value::String(solution_id.to_string()),
    );
    content.set_thread_metadata(thread_id, &metadata).await
}
