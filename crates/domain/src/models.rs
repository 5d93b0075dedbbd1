use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

const MAX_ID_LEN: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("ID cannot be empty.")]
    Empty,
    #[error("ID is too long (max 128 chars).")]
    TooLong,
    #[error("ID contains invalid characters (whitespace, ':' or '/').")]
    InvalidChars,
}

fn validate_id(s: &str) -> Result<(), IdError> {
    if s.is_empty() {
        return Err(IdError::Empty);
    }
    if s.len() > MAX_ID_LEN {
        return Err(IdError::TooLong);
    }
    // ID 会被拼进存储键 (solution:{id})，也会出现在 URL 路径里，不允许冒号、斜杠和空白
    if s.chars().any(|c| c.is_whitespace() || c == ':' || c == '/') {
        return Err(IdError::InvalidChars);
    }
    Ok(())
}

macro_rules! platform_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Result<Self, IdError> {
                let s = s.into();
                validate_id(&s)?;
                Ok(Self(s))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

platform_id!(ThreadId);
platform_id!(CommentId);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    pub author_id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub community: String,
    pub permalink: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentState {
    Live,
    Edited,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ParentRef {
    Thread(ThreadId),
    Comment(CommentId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub thread_id: ThreadId,
    pub author_id: String,
    pub parent: ParentRef,
    pub body: String,
    pub state: CommentState,
    pub permalink: Option<String>,
}

impl Comment {
    /// 只有帖子的直接子评论才能被标记为解答
    pub fn is_top_level_of(&self, thread_id: &ThreadId) -> bool {
        &self.thread_id == thread_id && self.parent == ParentRef::Thread(thread_id.clone())
    }
}

/// 每个帖子在存储里的唯一记录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionRecord {
    pub solution_comment_id: Option<CommentId>,
    pub confirmation_reply_id: Option<CommentId>,
}

impl SolutionRecord {
    pub fn is_empty(&self) -> bool {
        self.solution_comment_id.is_none() && self.confirmation_reply_id.is_none()
    }
}

/// 帖子的结构化元数据 (任意 JSON 对象)
pub type ThreadMetadata = Map<String, Value>;
