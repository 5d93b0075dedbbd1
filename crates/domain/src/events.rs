use crate::models::{Comment, CommentId, IdError, ParentRef, ThreadId};
use serde::{Deserialize, Serialize};

/// 平台推送过来的事件 (Webhook 载荷)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformEvent {
    CommentCreated {
        comment: Comment,
        // 平台可能顺带给出帖子作者，省一次查询
        #[serde(default)]
        thread_author_id: Option<String>,
    },
}

impl PlatformEvent {
    pub fn thread_id(&self) -> &ThreadId {
        match self {
            PlatformEvent::CommentCreated { comment, .. } => &comment.thread_id,
        }
    }

    /// 反序列化不会校验 ID，入口处统一检查一遍
    pub fn validate_ids(&self) -> Result<(), IdError> {
        match self {
            PlatformEvent::CommentCreated { comment, .. } => {
                ThreadId::new(comment.thread_id.as_str())?;
                CommentId::new(comment.id.as_str())?;
                match &comment.parent {
                    ParentRef::Thread(t) => ThreadId::new(t.as_str()).map(|_| ()),
                    ParentRef::Comment(c) => CommentId::new(c.as_str()).map(|_| ()),
                }
            }
        }
    }
}
