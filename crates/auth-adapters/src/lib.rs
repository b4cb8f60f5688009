//! # auth-adapters
//!
//! HMAC-SHA256 implementation of `NoticeSigner`.
//! Notices travel in a cookie between a redirect and the next page load; the
//! MAC stops a client from planting arbitrary text on the page.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use domains::NoticeSigner;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("notice signing key must not be empty")]
    EmptyKey,
    #[error("invalid signing key: {0}")]
    InvalidKey(String),
}

pub struct HmacNoticeSigner {
    /// Keyed once at startup and cloned per operation
    mac: HmacSha256,
}

impl HmacNoticeSigner {
    /// Accepts the secret key (e.g., from the `SECRET_KEY` environment variable)
    pub fn new(secret: &[u8]) -> Result<Self, SignerError> {
        if secret.is_empty() {
            return Err(SignerError::EmptyKey);
        }
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Ok(Self { mac })
    }

    fn tag(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

impl NoticeSigner for HmacNoticeSigner {
    /// Token format: `base64url(message).hex(mac)`
    fn sign(&self, message: &str) -> String {
        let payload = URL_SAFE_NO_PAD.encode(message.as_bytes());
        let tag = hex::encode(self.tag(payload.as_bytes()));
        format!("{payload}.{tag}")
    }

    fn verify(&self, token: &str) -> Option<String> {
        let (payload, tag) = token.split_once('.')?;
        let tag = hex::decode(tag).ok()?;

        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        if mac.verify_slice(&tag).is_err() {
            tracing::debug!("discarding notice with bad signature");
            return None;
        }

        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        String::from_utf8(bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> HmacNoticeSigner {
        HmacNoticeSigner::new(b"test-secret").unwrap()
    }

    #[test]
    fn signed_notice_verifies() {
        let signer = signer();
        let token = signer.sign("您没有权限编辑此内容");
        assert!(!token.contains(';') && !token.contains(' '));
        assert_eq!(signer.verify(&token).as_deref(), Some("您没有权限编辑此内容"));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let signer = signer();
        let token = signer.sign("Prompt not found");
        let (_, tag) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", URL_SAFE_NO_PAD.encode("Welcome, admin"), tag);
        assert!(signer.verify(&forged).is_none());
    }

    #[test]
    fn other_key_is_rejected() {
        let token = signer().sign("hello");
        let other = HmacNoticeSigner::new(b"another-secret").unwrap();
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let signer = signer();
        assert!(signer.verify("").is_none());
        assert!(signer.verify("no-dot").is_none());
        assert!(signer.verify("abc.not-hex").is_none());
    }

    #[test]
    fn empty_key_is_refused() {
        assert!(matches!(HmacNoticeSigner::new(b""), Err(SignerError::EmptyKey)));
    }
}
