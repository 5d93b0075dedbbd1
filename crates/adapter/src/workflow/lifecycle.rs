use super::{metadata, SolutionWorkflow};
use crate::error::TransitionError;
use domain::{
    protocol::{self, DesignatedBy},
    Comment, CommentId, ThreadId,
};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposal {
    Removed,
    Tombstoned,
    /// 删除和改写都没成功，旧回复原样留着
    Left,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retirement {
    pub reply_id: CommentId,
    pub undistinguished: bool,
    pub disposal: Disposal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Designated {
        solution: CommentId,
        previous: Option<CommentId>,
        retired: Option<Retirement>,
        reply: Option<CommentId>,
    },
    /// 重复标记同一条评论：不再发新回复
    Reaffirmed {
        solution: CommentId,
        reply: CommentId,
    },
}

#[derive(Debug, Clone, Copy)]
enum RetireStep {
    Undistinguish,
    Remove,
    Tombstone,
}

const RETIRE_CHAIN: [RetireStep; 3] = [
    RetireStep::Undistinguish,
    RetireStep::Remove,
    RetireStep::Tombstone,
];

impl SolutionWorkflow {
    pub(crate) async fn transition(
        &self,
        thread_id: &ThreadId,
        target: &Comment,
        by: DesignatedBy,
    ) -> Result<Transition, TransitionError> {
        // 1. 读取当前记录，读不到就中止
        let current = self
            .store
            .get(thread_id)
            .await
            .map_err(|e| {
                warn!("Failed to read solution record for {}: {:?}", thread_id, e);
                TransitionError::Lookup(e.to_string())
            })?
            .unwrap_or_default();
        let previous = current.solution_comment_id.clone();

        // 重复标记同一目标：有意不发第二条确认回复，只重新持久化并置顶已有回复
        if previous.as_ref() == Some(&target.id) {
            if let Some(reply) = current.confirmation_reply_id.clone() {
                return self.reaffirm(thread_id, &target.id, reply).await;
            }
        }

        // 2. 换了解答：先撤下旧的确认回复
        let retired = match &current.confirmation_reply_id {
            Some(reply_id) => Some(self.retire(thread_id, reply_id).await),
            None => None,
        };

        // 3. 先持久化解答本身，这是第一个不可逆步骤
        self.persist_solution(thread_id, &target.id).await?;
        info!("Saved solution:{} = {}", thread_id, target.id);

        // 4-6 与元数据同步并行，失败只记日志
        let (reply, _) = tokio::join!(
            self.publish_confirmation(thread_id, target, by),
            metadata::sync_metadata(self.content.as_ref(), &self.store, thread_id, &target.id),
        );

        Ok(Transition::Designated {
            solution: target.id.clone(),
            previous,
            retired,
            reply,
        })
    }

    async fn reaffirm(
        &self,
        thread_id: &ThreadId,
        solution: &CommentId,
        reply: CommentId,
    ) -> Result<Transition, TransitionError> {
        self.persist_solution(thread_id, solution).await?;
        info!("Re-affirmed solution:{} = {}", thread_id, solution);

        let (_, _) = tokio::join!(
            self.try_distinguish(&reply),
            metadata::sync_metadata(self.content.as_ref(), &self.store, thread_id, solution),
        );
        Ok(Transition::Reaffirmed {
            solution: solution.clone(),
            reply,
        })
    }

    async fn persist_solution(
        &self,
        thread_id: &ThreadId,
        solution: &CommentId,
    ) -> Result<(), TransitionError> {
        self.store
            .set_solution(thread_id, solution)
            .await
            .map_err(TransitionError::DurableWrite)
    }

    async fn retire(&self, thread_id: &ThreadId, reply_id: &CommentId) -> Retirement {
        let mut retirement = Retirement {
            reply_id: reply_id.clone(),
            undistinguished: false,
            disposal: Disposal::Left,
        };

        match self.content.get_comment(reply_id).await {
            Ok(_) => {
                debug!("Retiring previous confirmation reply {}", reply_id);
                self.run_retire_chain(reply_id, &mut retirement).await;
            }
            Err(e) => warn!(
                "Previous confirmation reply {} lookup failed, skipping retirement: {}",
                reply_id, e
            ),
        }
        if retirement.disposal == Disposal::Left {
            warn!("Unable to remove or edit previous confirmation reply {}", reply_id);
        }

        if let Err(e) = self.store.clear_reply(thread_id).await {
            warn!("Failed to clear solution_reply:{}: {:?}", thread_id, e);
        }
        retirement
    }

    async fn run_retire_chain(&self, reply_id: &CommentId, retirement: &mut Retirement) {
        for step in RETIRE_CHAIN {
            let result = match step {
                RetireStep::Undistinguish => self.content.distinguish(reply_id, false).await,
                RetireStep::Remove => self.content.remove_comment(reply_id).await,
                RetireStep::Tombstone => {
                    self.content
                        .edit_comment(reply_id, protocol::TOMBSTONE_TEXT)
                        .await
                }
            };
            match (step, result) {
                (RetireStep::Undistinguish, Ok(())) => retirement.undistinguished = true,
                (RetireStep::Remove, Ok(())) => {
                    retirement.disposal = Disposal::Removed;
                    return;
                }
                (RetireStep::Tombstone, Ok(())) => retirement.disposal = Disposal::Tombstoned,
                (step, Err(e)) if e.is_unsupported() => {
                    debug!("Retire step {:?} unavailable for {}", step, reply_id)
                }
                (step, Err(e)) => warn!("Retire step {:?} failed for {}: {}", step, reply_id, e),
            }
        }
    }

    fn resolve_permalink(&self, thread_id: &ThreadId, target: &Comment) -> String {
        match target.permalink.as_deref().filter(|p| !p.is_empty()) {
            Some(p) => protocol::absolutize_permalink(&self.public_base_url, p),
            None => protocol::synthesize_permalink(&self.public_base_url, thread_id, &target.id),
        }
    }

    async fn publish_confirmation(
        &self,
        thread_id: &ThreadId,
        target: &Comment,
        by: DesignatedBy,
    ) -> Option<CommentId> {
        let permalink = self.resolve_permalink(thread_id, target);
        let body = protocol::build_confirmation_body(&permalink, by);

        let reply = match self.content.create_reply(thread_id, &body).await {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to post confirmation reply on {}: {}", thread_id, e);
                return None;
            }
        };
        info!("Posted confirmation reply {} on {}", reply.id, thread_id);

        if let Err(e) = self.store.set_reply(thread_id, &reply.id).await {
            warn!("Failed to persist confirmation reply id {}: {:?}", reply.id, e);
        }
        self.try_distinguish(&reply.id).await;
        Some(reply.id)
    }

    async fn try_distinguish(&self, reply_id: &CommentId) {
        // 没有版主权限时会失败，只记日志
        match self.content.distinguish(reply_id, true).await {
            Ok(()) => debug!("Distinguished and stickied {}", reply_id),
            Err(e) => debug!("Could not distinguish/sticky {}: {}", reply_id, e),
        }
    }
}
