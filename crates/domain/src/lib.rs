mod commands;
mod events;
mod models;
pub mod protocol;
pub mod view;

pub use commands::AppCommand;
pub use events::PlatformEvent;
pub use models::{
    Comment, CommentId, CommentState, IdError, ParentRef, SolutionRecord, Thread, ThreadId,
    ThreadMetadata,
};
