use super::SolutionWorkflow;
use domain::{protocol, ThreadId, ThreadMetadata};
use serde_json::Value;
use storage::SolutionStore;
use tracing::{debug, error, warn};

impl SolutionWorkflow {
    /// 调试用：直接展示存储里的解答键
    pub async fn show_solution_key(&self, thread_id: &ThreadId) -> String {
        let key = SolutionStore::solution_key(thread_id);
        match self.store.raw_solution(thread_id).await {
            Ok(Some(val)) => format!("{} => {}", key, val),
            Ok(None) => format!("{} not set", key),
            Err(e) => {
                error!("Error reading {}: {:?}", key, e);
                format!("Error reading {}", key)
            }
        }
    }

    /// 把帖子复制成一个由本服务发布的新帖子，并在元数据里记下原帖
    pub async fn duplicate_thread(&self, thread_id: &ThreadId) -> anyhow::Result<String> {
        let original = self
            .content
            .get_thread(thread_id)
            .await
            .map_err(|e| anyhow::anyhow!("Original thread not found: {}", e))?;

        let original_url = original
            .permalink
            .as_deref()
            .map(|p| protocol::absolutize_permalink(&self.public_base_url, p));
        let title = protocol::build_duplicate_title(&original);
        let body = protocol::build_duplicate_body(original_url.as_deref(), &original.body);

        let copy = self
            .content
            .submit_thread(&original.community, &title, &body)
            .await
            .map_err(|e| anyhow::anyhow!("Conversion failed: {}", e))?;

        let mut metadata = ThreadMetadata::new();
        metadata.insert(
            protocol::METADATA_ORIGINAL_FIELD.to_string(),
            Value::String(thread_id.to_string()),
        );
        match self.content.set_thread_metadata(&copy.id, &metadata).await {
            Ok(()) => debug!("Set metadata on copy {} -> original {}", copy.id, thread_id),
            Err(e) => warn!("Failed to set metadata on copy {}: {}", copy.id, e),
        }

        Ok(format!("Copy created: {}", copy.id))
    }
}
