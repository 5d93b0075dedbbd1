use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    /// 平台没有提供这项能力，调用方应尝试下一个备选
    #[error("capability not supported: {0}")]
    Unsupported(&'static str),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("platform API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("invalid path segment: {0:?}")]
    InvalidPathSegment(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl PlatformError {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, PlatformError::Unsupported(_))
    }
}

pub type PlatformResult<T> = Result<T, PlatformError>;

/// 状态迁移的失败分类：查询失败只中止本次迁移，持久化失败是唯一的致命错误
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("record lookup failed: {0}")]
    Lookup(String),
    #[error("failed to persist designation: {0}")]
    DurableWrite(anyhow::Error),
}
