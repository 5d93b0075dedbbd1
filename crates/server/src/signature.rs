use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-pinner-signature";

/// 校验平台推送的 HMAC-SHA256 签名 (十六进制，可带 "sha256=" 前缀)
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Arc<[u8]>,
}

impl WebhookVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Arc::from(secret.as_bytes()),
        }
    }

    fn mac(&self) -> Option<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret).ok()
    }

    #[cfg(test)]
    pub fn sign(&self, body: &[u8]) -> String {
        match self.mac() {
            Some(mut mac) => {
                mac.update(body);
                hex::encode(mac.finalize().into_bytes())
            }
            None => String::new(),
        }
    }

    pub fn verify(&self, body: &[u8], signature: &str) -> bool {
        let sig = signature.trim();
        let sig = sig.strip_prefix("sha256=").unwrap_or(sig);
        let Ok(expected) = hex::decode(sig) else {
            return false;
        };
        let Some(mut mac) = self.mac() else {
            return false;
        };
        mac.update(body);
        // 常量时间比较
        mac.verify_slice(&expected).is_ok()
    }
}
