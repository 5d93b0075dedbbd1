use crate::models::ThreadId;

/// 管理员手动触发的操作，结果以一句提示文本返回
#[derive(Debug)]
pub enum AppCommand {
    ShowSolutionKey { thread_id: ThreadId },
    DuplicateThread { thread_id: ThreadId },
}
