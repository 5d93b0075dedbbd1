use crate::error::PlatformError;
use crate::traits::{ContentDirectory, MembershipDirectory};
use domain::{protocol::DesignatedBy, ThreadId};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Granted(DesignatedBy),
    Denied,
    /// 无法确认作者身份 (帖子查询失败)，按拒绝处理并中止流程
    Indeterminate(String),
}

/// 版主检查的备选顺序：先问成员关系，再扫名册
#[derive(Debug, Clone, Copy)]
enum ModeratorProbe {
    MembershipTest,
    RosterScan,
}

const MODERATOR_PROBES: [ModeratorProbe; 2] =
    [ModeratorProbe::MembershipTest, ModeratorProbe::RosterScan];

pub async fn authorize(
    content: &dyn ContentDirectory,
    membership: &dyn MembershipDirectory,
    thread_id: &ThreadId,
    author_id: &str,
    thread_author_hint: Option<&str>,
) -> Authorization {
    // 1. 楼主检查：优先用事件里带的作者，没有才去查帖子
    let is_op = match thread_author_hint {
        Some(op) => op == author_id,
        None => match content.get_thread(thread_id).await {
            Ok(thread) => thread.author_id == author_id,
            Err(e) => {
                warn!("Thread lookup failed for {}, aborting: {}", thread_id, e);
                return Authorization::Indeterminate(e.to_string());
            }
        },
    };
    if is_op {
        return Authorization::Granted(DesignatedBy::Op);
    }

    // 2. 版主检查，任何失败都视为非版主
    if is_moderator(membership, thread_id, author_id).await {
        Authorization::Granted(DesignatedBy::Moderator)
    } else {
        Authorization::Denied
    }
}

async fn is_moderator(
    membership: &dyn MembershipDirectory,
    thread_id: &ThreadId,
    user_id: &str,
) -> bool {
    for probe in MODERATOR_PROBES {
        let result = match probe {
            ModeratorProbe::MembershipTest => membership.is_moderator(thread_id, user_id).await,
            ModeratorProbe::RosterScan => membership
                .list_moderators(thread_id)
                .await
                .map(|mods| mods.iter().any(|m| m == user_id)),
        };
        match result {
            Ok(v) => return v,
            Err(PlatformError::Unsupported(cap)) => {
                debug!("Moderator probe {:?} unavailable ({})", probe, cap);
            }
            Err(e) => {
                debug!("Moderator check failed via {:?}: {}", probe, e);
                return false;
            }
        }
    }
    debug!("No moderator capability available for {}", thread_id);
    false
}
