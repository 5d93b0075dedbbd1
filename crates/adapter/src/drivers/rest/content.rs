use super::client::{Endpoint, RestPlatform};
use crate::error::PlatformResult;
use crate::traits::ContentDirectory;
use async_trait::async_trait;
use domain::{Comment, CommentId, Thread, ThreadId, ThreadMetadata};
use reqwest::Method;
use serde_json::json;

#[async_trait]
impl ContentDirectory for RestPlatform {
    async fn get_thread(&self, id: &ThreadId) -> PlatformResult<Thread> {
        self.get_json(&format!("threads/{}", id), Endpoint::Resource)
            .await
    }

    async fn get_comment(&self, id: &CommentId) -> PlatformResult<Comment> {
        self.get_json(&format!("comments/{}", id), Endpoint::Resource)
            .await
    }

    async fn create_reply(&self, thread_id: &ThreadId, body: &str) -> PlatformResult<Comment> {
        self.send_json(
            Method::POST,
            &format!("threads/{}/replies", thread_id),
            &json!({ "body": body }),
            Endpoint::Resource,
        )
        .await
    }

    async fn edit_comment(&self, id: &CommentId, body: &str) -> PlatformResult<()> {
        self.send_no_content(
            Method::PATCH,
            &format!("comments/{}", id),
            Some(&json!({ "body": body })),
            Endpoint::Capability("edit_comment"),
        )
        .await
    }

    async fn submit_thread(
        &self,
        community: &str,
        title: &str,
        body: &str,
    ) -> PlatformResult<Thread> {
        self.send_json(
            Method::POST,
            "threads",
            &json!({ "community": community, "title": title, "body": body }),
            Endpoint::Resource,
        )
        .await
    }

    async fn remove_comment(&self, id: &CommentId) -> PlatformResult<()> {
        self.send_no_content::<()>(
            Method::DELETE,
            &format!("comments/{}", id),
            None,
            Endpoint::Capability("remove_comment"),
        )
        .await
    }

    async fn distinguish(&self, id: &CommentId, sticky: bool) -> PlatformResult<()> {
        self.send_no_content(
            Method::POST,
            &format!("comments/{}/distinguish", id),
            Some(&json!({ "sticky": sticky })),
            Endpoint::Capability("distinguish"),
        )
        .await
    }

    async fn get_thread_metadata(&self, id: &ThreadId) -> PlatformResult<ThreadMetadata> {
        self.get_json(
            &format!("threads/{}/metadata", id),
            Endpoint::Capability("get_thread_metadata"),
        )
        .await
    }

    async fn set_thread_metadata(
        &self,
        id: &ThreadId,
        metadata: &ThreadMetadata,
    ) -> PlatformResult<()> {
        self.send_no_content(
            Method::PUT,
            &format!("threads/{}/metadata", id),
            Some(metadata),
            Endpoint::Capability("set_thread_metadata"),
        )
        .await
    }
}
