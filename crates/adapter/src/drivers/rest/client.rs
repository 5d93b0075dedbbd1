use super::RestConfig;
use crate::error::{PlatformError, PlatformResult};
use reqwest::{Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::borrow::Cow;
use tracing::debug;

const MAX_ERROR_BODY: usize = 512;

/// 平台 REST API 的薄封装，所有请求都带 Bearer Token 和超时
pub struct RestPlatform {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

/// 响应状态的解读方式：资源读取 vs 可选能力
#[derive(Clone, Copy)]
pub(super) enum Endpoint {
    Resource,
    Capability(&'static str),
}

impl RestPlatform {
    pub fn new(config: RestConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        endpoint: Endpoint,
    ) -> PlatformResult<Response> {
        debug!("{} {}", method, path);
        let mut req = self
            .http
            .request(method, self.url(path))
            .bearer_auth(&self.token);
        if let Some(b) = body {
            req = req.json(b);
        }
        let resp = req.send().await?;
        check_status(resp, path, endpoint).await
    }

    pub(super) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        endpoint: Endpoint,
    ) -> PlatformResult<T> {
        let resp = self
            .send::<()>(Method::GET, path, None, endpoint)
            .await?;
        Ok(resp.json().await?)
    }

    pub(super) async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        endpoint: Endpoint,
    ) -> PlatformResult<T> {
        let resp = self.send(method, path, Some(body), endpoint).await?;
        Ok(resp.json().await?)
    }

    pub(super) async fn send_no_content<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        endpoint: Endpoint,
    ) -> PlatformResult<()> {
        self.send(method, path, body, endpoint).await?;
        Ok(())
    }
}

/// 把未经校验的外部字符串 (例如用户 ID) 编码成单个路径段
pub(super) fn path_segment(raw: &str) -> PlatformResult<Cow<'_, str>> {
    // "." 和 ".." 编码后仍会被当作相对路径
    if raw.is_empty() || raw == "." || raw == ".." {
        return Err(PlatformError::InvalidPathSegment(raw.to_string()));
    }
    Ok(urlencoding::encode(raw))
}

async fn check_status(resp: Response, path: &str, endpoint: Endpoint) -> PlatformResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if let Some(err) = classify(status, path, endpoint) {
        return Err(err);
    }
    let mut message = resp.text().await.unwrap_or_default();
    if message.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
    }
    Err(PlatformError::Api {
        status: status.as_u16(),
        message,
    })
}

fn classify(status: StatusCode, path: &str, endpoint: Endpoint) -> Option<PlatformError> {
    match (endpoint, status) {
        (Endpoint::Capability(name), StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED) => {
            Some(PlatformError::Unsupported(name))
        }
        (_, StatusCode::NOT_FOUND) => Some(PlatformError::NotFound(path.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        let cap = Endpoint::Capability("remove_comment");
        assert!(matches!(
            classify(StatusCode::NOT_IMPLEMENTED, "comments/x", cap),
            Some(PlatformError::Unsupported("remove_comment"))
        ));
        assert!(matches!(
            classify(StatusCode::METHOD_NOT_ALLOWED, "comments/x", cap),
            Some(PlatformError::Unsupported(_))
        ));
        assert!(matches!(
            classify(StatusCode::NOT_FOUND, "comments/x", cap),
            Some(PlatformError::NotFound(_))
        ));
        // 资源接口上的 501 只是普通错误
        assert!(classify(StatusCode::NOT_IMPLEMENTED, "threads/x", Endpoint::Resource).is_none());
        assert!(classify(StatusCode::INTERNAL_SERVER_ERROR, "threads/x", cap).is_none());
    }

    #[test]
    fn test_path_segment_encoding() {
        assert_eq!(path_segment("u_mod").unwrap(), "u_mod");
        assert_eq!(path_segment("u/../admin").unwrap(), "u%2F..%2Fadmin");
        assert_eq!(path_segment("u?x=1#f").unwrap(), "u%3Fx%3D1%23f");
        assert!(matches!(
            path_segment(".."),
            Err(PlatformError::InvalidPathSegment(_))
        ));
        assert!(path_segment(".").is_err());
        assert!(path_segment("").is_err());
    }

    #[test]
    fn test_url_join() {
        let p = RestPlatform::new(RestConfig {
            api_url: "https://api.example.org/v1/".into(),
            token: "t".into(),
            request_timeout: std::time::Duration::from_secs(5),
        })
        .unwrap();
        assert_eq!(p.url("/threads/t3_p1"), "https://api.example.org/v1/threads/t3_p1");
        assert_eq!(p.url("comments/t1_c1"), "https://api.example.org/v1/comments/t1_c1");
    }
}
