use crate::KvStore;
use domain::{CommentId, SolutionRecord, ThreadId};
use std::sync::Arc;
use tracing::warn;

/// 解答状态存储：每个帖子一条记录，解答 ID 与确认回复 ID 分开存放
#[derive(Clone)]
pub struct SolutionStore {
    kv: Arc<dyn KvStore>,
}

impl SolutionStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub fn solution_key(thread_id: &ThreadId) -> String {
        format!("solution:{}", thread_id)
    }

    pub fn reply_key(thread_id: &ThreadId) -> String {
        format!("solution_reply:{}", thread_id)
    }

    pub fn fallback_key(thread_id: &ThreadId) -> String {
        format!("solution_fallback:{}", thread_id)
    }

    pub async fn get(&self, thread_id: &ThreadId) -> anyhow::Result<Option<SolutionRecord>> {
        let solution = self.read_id(&Self::solution_key(thread_id)).await?;
        let reply = self.read_id(&Self::reply_key(thread_id)).await?;

        let record = SolutionRecord {
            solution_comment_id: solution,
            confirmation_reply_id: reply,
        };
        Ok((!record.is_empty()).then_some(record))
    }

    pub async fn set(&self, thread_id: &ThreadId, record: &SolutionRecord) -> anyhow::Result<()> {
        match &record.solution_comment_id {
            Some(id) => self.set_solution(thread_id, id).await?,
            None => self.kv.delete(&Self::solution_key(thread_id)).await?,
        }
        match &record.confirmation_reply_id {
            Some(id) => self.set_reply(thread_id, id).await?,
            None => self.clear_reply(thread_id).await?,
        }
        Ok(())
    }

    pub async fn delete(&self, thread_id: &ThreadId) -> anyhow::Result<()> {
        self.kv.delete(&Self::solution_key(thread_id)).await?;
        self.kv.delete(&Self::reply_key(thread_id)).await?;
        Ok(())
    }

    pub async fn set_solution(
        &self,
        thread_id: &ThreadId,
        comment_id: &CommentId,
    ) -> anyhow::Result<()> {
        self.kv
            .set(&Self::solution_key(thread_id), comment_id.as_str())
            .await
    }

    pub async fn set_reply(&self, thread_id: &ThreadId, reply_id: &CommentId) -> anyhow::Result<()> {
        self.kv
            .set(&Self::reply_key(thread_id), reply_id.as_str())
            .await
    }

    pub async fn clear_reply(&self, thread_id: &ThreadId) -> anyhow::Result<()> {
        self.kv.delete(&Self::reply_key(thread_id)).await
    }

    /// 原始值，供调试操作直接展示
    pub async fn raw_solution(&self, thread_id: &ThreadId) -> anyhow::Result<Option<String>> {
        self.kv.get(&Self::solution_key(thread_id)).await
    }

    pub async fn record_sync_failure(&self, thread_id: &ThreadId, detail: &str) -> anyhow::Result<()> {
        let detail = if detail.is_empty() { "failed" } else { detail };
        self.kv.set(&Self::fallback_key(thread_id), detail).await
    }

    pub async fn sync_failure(&self, thread_id: &ThreadId) -> anyhow::Result<Option<String>> {
        self.kv.get(&Self::fallback_key(thread_id)).await
    }

    async fn read_id(&self, key: &str) -> anyhow::Result<Option<CommentId>> {
        let Some(raw) = self.kv.get(key).await? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        match CommentId::new(raw.clone()) {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                warn!("Ignoring malformed id under {}: {:?} ({})", key, raw, e);
                Ok(None)
            }
        }
    }
}
