mod actions;
mod auth;
mod lifecycle;
mod metadata;
mod summary;

pub use auth::{authorize, Authorization};
pub use lifecycle::{Disposal, Retirement, Transition};
pub use metadata::MetadataSync;
pub use summary::{SummaryPoller, SummarySync};

use crate::error::TransitionError;
use crate::traits::{ContentDirectory, MembershipDirectory};
use domain::{protocol, Comment, ParentRef, PlatformEvent};
use std::sync::Arc;
use storage::SolutionStore;
use tracing::{debug, error, info, warn};

/// 单个事件处理后的结果，主要用于日志和测试断言
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NotACommand,
    /// 命令直接回复了帖子，或目标不是帖子的顶层评论
    Ineligible(String),
    Unauthorized,
    Aborted(String),
    Applied(Transition),
}

/// 标记解答工作流的共享上下文，可廉价 Clone 给每个事件任务
#[derive(Clone)]
pub struct SolutionWorkflow {
    pub(crate) content: Arc<dyn ContentDirectory>,
    pub(crate) membership: Arc<dyn MembershipDirectory>,
    pub(crate) store: SolutionStore,
    pub(crate) public_base_url: Arc<str>,
}

impl SolutionWorkflow {
    pub fn new(
        content: Arc<dyn ContentDirectory>,
        membership: Arc<dyn MembershipDirectory>,
        store: SolutionStore,
        public_base_url: &str,
    ) -> Self {
        Self {
            content,
            membership,
            store,
            public_base_url: Arc::from(public_base_url.trim_end_matches('/')),
        }
    }

    pub fn store(&self) -> &SolutionStore {
        &self.store
    }

    pub fn summary(&self) -> SummarySync {
        SummarySync::new(
            self.content.clone(),
            self.store.clone(),
            self.public_base_url.clone(),
        )
    }

    /// 处理一条平台事件。只有持久化解答失败才会返回 Err
    pub async fn handle_event(&self, event: PlatformEvent) -> anyhow::Result<Outcome> {
        match event {
            PlatformEvent::CommentCreated {
                comment,
                thread_author_id,
            } => {
                self.handle_comment_created(&comment, thread_author_id.as_deref())
                    .await
            }
        }
    }

    async fn handle_comment_created(
        &self,
        comment: &Comment,
        thread_author_hint: Option<&str>,
    ) -> anyhow::Result<Outcome> {
        // 1. 命令识别
        if !protocol::is_solution_command(&comment.body) {
            debug!("Ignored comment {} (no solution command)", comment.id);
            return Ok(Outcome::NotACommand);
        }

        let thread_id = &comment.thread_id;
        let target_id = match &comment.parent {
            ParentRef::Comment(id) => id.clone(),
            ParentRef::Thread(_) => {
                debug!("Ignored command {} posted directly on the thread", comment.id);
                return Ok(Outcome::Ineligible("command has no parent comment".into()));
            }
        };

        // 2. 权限检查，拒绝时不给任何反馈
        let by = match auth::authorize(
            self.content.as_ref(),
            self.membership.as_ref(),
            thread_id,
            &comment.author_id,
            thread_author_hint,
        )
        .await
        {
            Authorization::Granted(by) => by,
            Authorization::Denied => {
                debug!(
                    "Ignored command {} from unauthorized user {}",
                    comment.id, comment.author_id
                );
                return Ok(Outcome::Unauthorized);
            }
            Authorization::Indeterminate(reason) => return Ok(Outcome::Aborted(reason)),
        };

        // 3. 目标必须是帖子的顶层评论
        let target = match self.content.get_comment(&target_id).await {
            Ok(c) => c,
            Err(e) => {
                warn!("Target comment {} lookup failed, aborting: {}", target_id, e);
                return Ok(Outcome::Aborted(e.to_string()));
            }
        };
        if !target.is_top_level_of(thread_id) {
            debug!("Target {} is not a top-level comment of {}", target_id, thread_id);
            return Ok(Outcome::Ineligible("target is not a top-level comment".into()));
        }
        if target.state == domain::CommentState::Removed {
            debug!("Target {} has been removed", target_id);
            return Ok(Outcome::Ineligible("target comment was removed".into()));
        }

        // 4. 状态迁移
        match self.transition(thread_id, &target, by).await {
            Ok(t) => Ok(Outcome::Applied(t)),
            Err(TransitionError::Lookup(reason)) => Ok(Outcome::Aborted(reason)),
            Err(TransitionError::DurableWrite(e)) => {
                error!(
                    "CRITICAL: designation of {} on {} was authorized but not recorded: {:?}",
                    target.id, thread_id, e
                );
                Err(e)
            }
        }
    }

    /// 每个事件在独立任务里处理，不阻塞调用方
    pub fn spawn_event(&self, event: PlatformEvent) -> tokio::task::JoinHandle<()> {
        let workflow = self.clone();
        tokio::spawn(async move {
            let thread_id = event.thread_id().clone();
            match workflow.handle_event(event).await {
                Ok(Outcome::Applied(t)) => info!("Solution workflow on {}: {:?}", thread_id, t),
                Ok(other) => debug!("Solution workflow on {}: {:?}", thread_id, other),
                Err(e) => error!("Solution workflow on {} failed: {:?}", thread_id, e),
            }
        })
    }
}
