use crate::traits::ContentDirectory;
use domain::{
    protocol,
    view::{render_summary, SolutionSnapshot, SummaryView, UNAVAILABLE_BODY},
    ThreadId,
};
use futures::Stream;
use std::{sync::Arc, time::Duration};
use storage::SolutionStore;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_stream::{wrappers::WatchStream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// 汇总视图的只读路径：存储 + 平台查询
#[derive(Clone)]
pub struct SummarySync {
    content: Arc<dyn ContentDirectory>,
    store: SolutionStore,
    public_base_url: Arc<str>,
}

impl SummarySync {
    pub(crate) fn new(
        content: Arc<dyn ContentDirectory>,
        store: SolutionStore,
        public_base_url: Arc<str>,
    ) -> Self {
        Self {
            content,
            store,
            public_base_url,
        }
    }

    pub async fn snapshot(&self, thread_id: &ThreadId) -> anyhow::Result<Option<SolutionSnapshot>> {
        let Some(solution_id) = self
            .store
            .get(thread_id)
            .await?
            .and_then(|r| r.solution_comment_id)
        else {
            return Ok(None);
        };

        let synthesized =
            || protocol::synthesize_permalink(&self.public_base_url, thread_id, &solution_id);

        // 评论查不到不算错误，显示为不可用
        let (body, permalink) = match self.content.get_comment(&solution_id).await {
            Ok(c) => {
                let permalink = c
                    .permalink
                    .as_deref()
                    .map(|p| protocol::absolutize_permalink(&self.public_base_url, p))
                    .unwrap_or_else(synthesized);
                (c.body, permalink)
            }
            Err(e) => {
                debug!("Solution comment {} unavailable: {}", solution_id, e);
                (UNAVAILABLE_BODY.to_string(), synthesized())
            }
        };

        Ok(Some(SolutionSnapshot {
            solution_id: solution_id.clone(),
            body,
            permalink,
        }))
    }

    pub async fn poll_once(&self, thread_id: &ThreadId, expanded: bool) -> anyhow::Result<SummaryView> {
        let snapshot = self.snapshot(thread_id).await?;
        Ok(render_summary(snapshot.as_ref(), expanded))
    }

    /// 为一个活跃视图启动轮询任务，返回的句柄被丢弃时任务随之停止
    pub fn spawn_poller(&self, thread_id: ThreadId, interval: Duration, expanded: bool) -> SummaryPoller {
        let (tx, rx) = watch::channel(SummaryView::Loading);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let sync = self.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        match sync.poll_once(&thread_id, expanded).await {
                            Ok(view) => {
                                tx.send_if_modified(|current| {
                                    if *current == view {
                                        false
                                    } else {
                                        *current = view;
                                        true
                                    }
                                });
                            }
                            // 保留上一帧，等下一次轮询
                            Err(e) => warn!("Polling error for {}: {:?}", thread_id, e),
                        }
                    }
                }
            }
            debug!("Summary poller for {} stopped", thread_id);
        });

        SummaryPoller { rx, cancel }
    }
}

pub struct SummaryPoller {
    rx: watch::Receiver<SummaryView>,
    cancel: CancellationToken,
}

impl SummaryPoller {
    pub fn subscribe(&self) -> watch::Receiver<SummaryView> {
        self.rx.clone()
    }

    /// 转成视图流；流被丢弃 (例如 SSE 客户端断开) 时轮询任务取消
    pub fn into_stream(self) -> impl Stream<Item = SummaryView> + Send + 'static {
        let rx = self.rx.clone();
        WatchStream::new(rx).map(move |view| {
            let _alive = &self;
            view
        })
    }
}

impl Drop for SummaryPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
