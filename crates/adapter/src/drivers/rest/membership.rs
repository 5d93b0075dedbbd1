use super::client::{path_segment, Endpoint, RestPlatform};
use crate::error::PlatformResult;
use crate::traits::MembershipDirectory;
use async_trait::async_trait;
use domain::ThreadId;
use serde::Deserialize;

#[derive(Deserialize)]
struct ModeratorCheck {
    is_moderator: bool,
}

#[derive(Deserialize)]
struct ModeratorRoster {
    moderators: Vec<String>,
}

#[async_trait]
impl MembershipDirectory for RestPlatform {
    async fn is_moderator(&self, thread_id: &ThreadId, user_id: &str) -> PlatformResult<bool> {
        let check: ModeratorCheck = self
            .get_json(
                &format!("threads/{}/moderators/{}", thread_id, path_segment(user_id)?),
                Endpoint::Capability("is_moderator"),
            )
            .await?;
        Ok(check.is_moderator)
    }

    async fn list_moderators(&self, thread_id: &ThreadId) -> PlatformResult<Vec<String>> {
        let roster: ModeratorRoster = self
            .get_json(
                &format!("threads/{}/moderators", thread_id),
                Endpoint::Capability("list_moderators"),
            )
            .await?;
        Ok(roster.moderators)
    }
}
