mod drivers;
mod error;
mod traits;
mod worker;
mod workflow;

#[cfg(test)]
mod testing;

pub use drivers::rest::{RestConfig, RestPlatform};
pub use error::{PlatformError, PlatformResult, TransitionError};
pub use traits::{ContentDirectory, MembershipDirectory};
pub use worker::{run_command_worker, CommandEnvelope};
pub use workflow::{
    authorize, Authorization, Disposal, MetadataSync, Outcome, Retirement, SolutionWorkflow,
    SummaryPoller, SummarySync, Transition,
};

use std::sync::Arc;
use storage::SolutionStore;
use tracing::info;

/// 用 REST 平台组装工作流：同一个客户端同时充当内容接口和版主名册
pub fn connect(
    config: RestConfig,
    store: SolutionStore,
    public_base_url: &str,
) -> anyhow::Result<SolutionWorkflow> {
    info!("Connecting to platform API at {}", config.api_url);
    let platform = Arc::new(RestPlatform::new(config)?);
    Ok(SolutionWorkflow::new(
        platform.clone(),
        platform,
        store,
        public_base_url,
    ))
}
