use crate::signature::WebhookVerifier;
use adapter::{CommandEnvelope, SolutionWorkflow};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct AppState {
    pub workflow: SolutionWorkflow,
    // 管理操作通过信封发给命令 Worker
    pub sender: mpsc::Sender<CommandEnvelope>,
    pub verifier: WebhookVerifier,
    pub admin_token: String,
    pub poll_interval: Duration,
}
