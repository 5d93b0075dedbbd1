mod client;
mod content;
mod membership;

pub use client::RestPlatform;

use std::time::Duration;

#[derive(Clone)]
pub struct RestConfig {
    pub api_url: String,
    pub token: String,
    pub request_timeout: Duration,
}
