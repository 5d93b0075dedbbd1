use crate::workflow::SolutionWorkflow;
use domain::AppCommand;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

// --- 信封模式 ---
pub struct CommandEnvelope {
    pub cmd: AppCommand,
    // 结果回传通道：API 层等待这句提示
    pub resp: oneshot::Sender<anyhow::Result<String>>,
}

pub async fn run_command_worker(
    workflow: SolutionWorkflow,
    mut rx_cmd: mpsc::Receiver<CommandEnvelope>,
    cancel_token: CancellationToken,
) {
    info!("Command worker started");
    loop {
        tokio::select! {
            cmd_opt = rx_cmd.recv() => {
                let CommandEnvelope { cmd, resp } = match cmd_opt {
                    Some(e) => e,
                    None => break,
                };

                let result = match cmd {
                    AppCommand::ShowSolutionKey { thread_id } => {
                        Ok(workflow.show_solution_key(&thread_id).await)
                    }
                    AppCommand::DuplicateThread { thread_id } => {
                        workflow.duplicate_thread(&thread_id).await
                    }
                };

                if let Err(ref e) = result {
                    error!("Command execution failed: {:?}", e);
                }
                let _ = resp.send(result);
            },
            _ = cancel_token.cancelled() => break,
        }
    }
    info!("Command worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePlatform;
    use domain::ThreadId;
    use std::sync::Arc;
    use storage::{MemoryKv, SolutionStore};

    #[tokio::test]
    async fn test_worker_answers_and_stops() {
        let p = Arc::new(FakePlatform::new());
        let wf = SolutionWorkflow::new(
            p.clone(),
            p,
            SolutionStore::new(Arc::new(MemoryKv::new())),
            "https://www.reddit.com",
        );
        let (tx, rx) = mpsc::channel(4);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_command_worker(wf, rx, cancel.clone()));

        let (resp_tx, resp_rx) = oneshot::channel();
        tx.send(CommandEnvelope {
            cmd: AppCommand::ShowSolutionKey {
                thread_id: ThreadId::new("t3_p1").unwrap(),
            },
            resp: resp_tx,
        })
        .await
        .unwrap();
        assert_eq!(resp_rx.await.unwrap().unwrap(), "solution:t3_p1 not set");

        let (resp_tx, resp_rx) = oneshot::channel();
        tx.send(CommandEnvelope {
            cmd: AppCommand::DuplicateThread {
                thread_id: ThreadId::new("t3_nope").unwrap(),
            },
            resp: resp_tx,
        })
        .await
        .unwrap();
        assert!(resp_rx.await.unwrap().is_err());

        cancel.cancel();
        handle.await.unwrap();
    }
}
