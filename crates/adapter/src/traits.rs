use crate::error::{PlatformError, PlatformResult};
use async_trait::async_trait;
use domain::{Comment, CommentId, Thread, ThreadId, ThreadMetadata};

/// 平台内容接口。可选能力默认返回 `Unsupported`
#[async_trait]
pub trait ContentDirectory: Send + Sync {
    async fn get_thread(&self, id: &ThreadId) -> PlatformResult<Thread>;

    async fn get_comment(&self, id: &CommentId) -> PlatformResult<Comment>;

    async fn create_reply(&self, thread_id: &ThreadId, body: &str) -> PlatformResult<Comment>;

    async fn edit_comment(&self, id: &CommentId, body: &str) -> PlatformResult<()>;

    async fn submit_thread(&self, community: &str, title: &str, body: &str)
        -> PlatformResult<Thread>;

    async fn remove_comment(&self, _id: &CommentId) -> PlatformResult<()> {
        Err(PlatformError::Unsupported("remove_comment"))
    }

    async fn distinguish(&self, _id: &CommentId, _sticky: bool) -> PlatformResult<()> {
        Err(PlatformError::Unsupported("distinguish"))
    }

    async fn get_thread_metadata(&self, _id: &ThreadId) -> PlatformResult<ThreadMetadata> {
        Err(PlatformError::Unsupported("get_thread_metadata"))
    }

    async fn set_thread_metadata(
        &self,
        _id: &ThreadId,
        _metadata: &ThreadMetadata,
    ) -> PlatformResult<()> {
        Err(PlatformError::Unsupported("set_thread_metadata"))
    }
}

/// 版主名册。两种查询方式都是可选的
#[async_trait]
pub trait MembershipDirectory: Send + Sync {
    async fn is_moderator(&self, _thread_id: &ThreadId, _user_id: &str) -> PlatformResult<bool> {
        Err(PlatformError::Unsupported("is_moderator"))
    }

    async fn list_moderators(&self, _thread_id: &ThreadId) -> PlatformResult<Vec<String>> {
        Err(PlatformError::Unsupported("list_moderators"))
    }
}
