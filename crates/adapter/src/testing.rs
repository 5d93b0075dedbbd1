//! 测试用的内存平台实现
use crate::error::{PlatformError, PlatformResult};
use crate::traits::{ContentDirectory, MembershipDirectory};
use async_trait::async_trait;
use domain::{
    Comment, CommentId, CommentState, ParentRef, Thread, ThreadId, ThreadMetadata,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const BOT_ID: &str = "u_pinner_bot";

pub enum Roster {
    /// 支持 is_moderator
    Direct(Vec<String>),
    /// 只支持 list_moderators
    ListOnly(Vec<String>),
    /// 两种查询都报错
    Failing,
    Unsupported,
}

#[derive(Default)]
pub struct FakeState {
    pub threads: HashMap<ThreadId, Thread>,
    pub comments: HashMap<CommentId, Comment>,
    pub distinguished: HashSet<CommentId>,
    pub removed: HashSet<CommentId>,
    pub metadata: HashMap<ThreadId, ThreadMetadata>,
    pub next_id: u32,
    pub get_thread_calls: u32,
    pub moderator_calls: u32,
}

pub struct FakePlatform {
    pub state: Mutex<FakeState>,
    pub roster: Roster,
    pub supports_remove: bool,
    pub supports_distinguish: bool,
    pub supports_metadata: bool,
    pub fail_get_thread: bool,
    pub fail_create_reply: bool,
    pub fail_remove: bool,
    pub fail_comment_lookup: HashSet<String>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState::default()),
            roster: Roster::Unsupported,
            supports_remove: true,
            supports_distinguish: true,
            supports_metadata: true,
            fail_get_thread: false,
            fail_create_reply: false,
            fail_remove: false,
            fail_comment_lookup: HashSet::new(),
        }
    }

    pub fn add_thread(&self, id: &str, author: &str) -> ThreadId {
        let thread_id = ThreadId::new(id).unwrap();
        let thread = Thread {
            id: thread_id.clone(),
            author_id: author.to_string(),
            title: format!("Question {}", id),
            body: "How do I fix this?".to_string(),
            community: "rustjerk".to_string(),
            permalink: Some(format!("/r/rustjerk/comments/{}/", id)),
        };
        let mut st = self.state.lock().unwrap();
        st.threads.insert(thread_id.clone(), thread);
        st.metadata.insert(thread_id.clone(), ThreadMetadata::new());
        thread_id
    }

    pub fn add_comment(
        &self,
        id: &str,
        thread: &ThreadId,
        parent: ParentRef,
        author: &str,
        body: &str,
    ) -> Comment {
        let comment = Comment {
            id: CommentId::new(id).unwrap(),
            thread_id: thread.clone(),
            author_id: author.to_string(),
            parent,
            body: body.to_string(),
            state: CommentState::Live,
            permalink: Some(format!("/r/rustjerk/comments/{}/_/{}/", thread, id)),
        };
        self.state
            .lock()
            .unwrap()
            .comments
            .insert(comment.id.clone(), comment.clone());
        comment
    }

    /// 顶层回答
    pub fn add_answer(&self, id: &str, thread: &ThreadId, author: &str, body: &str) -> Comment {
        self.add_comment(id, thread, ParentRef::Thread(thread.clone()), author, body)
    }

    /// 对某条评论的回复 (通常是命令)
    pub fn reply_to(&self, id: &str, parent: &Comment, author: &str, body: &str) -> Comment {
        self.add_comment(
            id,
            &parent.thread_id,
            ParentRef::Comment(parent.id.clone()),
            author,
            body,
        )
    }

    pub fn comment(&self, id: &CommentId) -> Option<Comment> {
        self.state.lock().unwrap().comments.get(id).cloned()
    }

    pub fn bot_replies(&self, thread: &ThreadId) -> Vec<Comment> {
        let st = self.state.lock().unwrap();
        let mut out: Vec<Comment> = st
            .comments
            .values()
            .filter(|c| &c.thread_id == thread && c.author_id == BOT_ID)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        out
    }

    pub fn is_distinguished(&self, id: &CommentId) -> bool {
        self.state.lock().unwrap().distinguished.contains(id)
    }

    pub fn is_removed(&self, id: &CommentId) -> bool {
        self.state.lock().unwrap().removed.contains(id)
    }

    pub fn metadata(&self, thread: &ThreadId) -> ThreadMetadata {
        self.state
            .lock()
            .unwrap()
            .metadata
            .get(thread)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_body(&self, id: &CommentId, body: &str) {
        if let Some(c) = self.state.lock().unwrap().comments.get_mut(id) {
            c.body = body.to_string();
        }
    }

    fn boom(what: &str) -> PlatformError {
        PlatformError::Api {
            status: 500,
            message: format!("{} exploded", what),
        }
    }
}

#[async_trait]
impl ContentDirectory for FakePlatform {
    async fn get_thread(&self, id: &ThreadId) -> PlatformResult<Thread> {
        let mut st = self.state.lock().unwrap();
        st.get_thread_calls += 1;
        if self.fail_get_thread {
            return Err(Self::boom("get_thread"));
        }
        st.threads
            .get(id)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound(id.to_string()))
    }

    async fn get_comment(&self, id: &CommentId) -> PlatformResult<Comment> {
        if self.fail_comment_lookup.contains(id.as_str()) {
            return Err(Self::boom("get_comment"));
        }
        self.comment(id)
            .ok_or_else(|| PlatformError::NotFound(id.to_string()))
    }

    async fn create_reply(&self, thread_id: &ThreadId, body: &str) -> PlatformResult<Comment> {
        if self.fail_create_reply {
            return Err(Self::boom("create_reply"));
        }
        let n = {
            let mut st = self.state.lock().unwrap();
            st.next_id += 1;
            st.next_id
        };
        let mut c = self.add_answer(&format!("t1_bot{:03}", n), thread_id, BOT_ID, body);
        // 模拟平台没有返回 permalink 的情况
        c.permalink = None;
        Ok(c)
    }

    async fn edit_comment(&self, id: &CommentId, body: &str) -> PlatformResult<()> {
        let mut st = self.state.lock().unwrap();
        let c = st
            .comments
            .get_mut(id)
            .ok_or_else(|| PlatformError::NotFound(id.to_string()))?;
        c.body = body.to_string();
        c.state = CommentState::Edited;
        Ok(())
    }

    async fn submit_thread(
        &self,
        community: &str,
        title: &str,
        body: &str,
    ) -> PlatformResult<Thread> {
        let mut st = self.state.lock().unwrap();
        st.next_id += 1;
        let id = ThreadId::new(format!("t3_copy{:03}", st.next_id)).unwrap();
        let thread = Thread {
            id: id.clone(),
            author_id: BOT_ID.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            community: community.to_string(),
            permalink: None,
        };
        st.threads.insert(id.clone(), thread.clone());
        st.metadata.insert(id, ThreadMetadata::new());
        Ok(thread)
    }

    async fn remove_comment(&self, id: &CommentId) -> PlatformResult<()> {
        if !self.supports_remove {
            return Err(PlatformError::Unsupported("remove_comment"));
        }
        if self.fail_remove {
            return Err(Self::boom("remove_comment"));
        }
        let mut st = self.state.lock().unwrap();
        if let Some(c) = st.comments.get_mut(id) {
            c.state = CommentState::Removed;
        }
        st.removed.insert(id.clone());
        Ok(())
    }

    async fn distinguish(&self, id: &CommentId, sticky: bool) -> PlatformResult<()> {
        if !self.supports_distinguish {
            return Err(PlatformError::Unsupported("distinguish"));
        }
        let mut st = self.state.lock().unwrap();
        if sticky {
            st.distinguished.insert(id.clone());
        } else {
            st.distinguished.remove(id);
        }
        Ok(())
    }

    async fn get_thread_metadata(&self, id: &ThreadId) -> PlatformResult<ThreadMetadata> {
        if !self.supports_metadata {
            return Err(PlatformError::Unsupported("get_thread_metadata"));
        }
        self.state
            .lock()
            .unwrap()
            .metadata
            .get(id)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound(id.to_string()))
    }

    async fn set_thread_metadata(
        &self,
        id: &ThreadId,
        metadata: &ThreadMetadata,
    ) -> PlatformResult<()> {
        if !self.supports_metadata {
            return Err(PlatformError::Unsupported("set_thread_metadata"));
        }
        self.state
            .lock()
            .unwrap()
            .metadata
            .insert(id.clone(), metadata.clone());
        Ok(())
    }
}

#[async_trait]
impl MembershipDirectory for FakePlatform {
    async fn is_moderator(&self, _thread_id: &ThreadId, user_id: &str) -> PlatformResult<bool> {
        self.state.lock().unwrap().moderator_calls += 1;
        match &self.roster {
            Roster::Direct(mods) => Ok(mods.iter().any(|m| m == user_id)),
            Roster::Failing => Err(Self::boom("is_moderator")),
            Roster::ListOnly(_) | Roster::Unsupported => {
                Err(PlatformError::Unsupported("is_moderator"))
            }
        }
    }

    async fn list_moderators(&self, _thread_id: &ThreadId) -> PlatformResult<Vec<String>> {
        self.state.lock().unwrap().moderator_calls += 1;
        match &self.roster {
            Roster::Direct(mods) | Roster::ListOnly(mods) => Ok(mods.clone()),
            Roster::Failing => Err(Self::boom("list_moderators")),
            Roster::Unsupported => Err(PlatformError::Unsupported("list_moderators")),
        }
    }
}
