//! Signed webhook delivery.
//!
//! Each payload is serialized to canonical JSON once; the HMAC-SHA256 of
//! those exact bytes goes into [`SIGNATURE_HEADER`] as lowercase hex and the
//! same bytes are posted as the body.

use std::time::Duration;

use async_trait::async_trait;
use gensprite_spec::WebhookPayload;
use hmac::{Hmac, Mac};
use reqwest::header::CONTENT_TYPE;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

/// Lowercase hex HMAC-SHA256 of `body` keyed by `secret`.
pub fn sign_payload(secret: &[u8], body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret)
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(body);
    mac.finalize()
        .into_bytes()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Failure to deliver one webhook.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("could not serialize webhook payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DeliveryError {
    /// Whether the same request might succeed later: transport errors,
    /// timeouts, 5xx and 429.
    ///
    /// Only used to pick a log message; nothing is retried.
    pub fn is_transient(&self) -> bool {
        match self {
            DeliveryError::Transport(_) => true,
            DeliveryError::Status { status } => *status >= 500 || *status == 429,
            DeliveryError::Serialize(_) => false,
        }
    }
}

/// Where notifications go and how they are signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookTarget {
    pub url: String,
    pub secret: String,
}

impl WebhookTarget {
    /// `None` when either the URL or the secret is empty, which disables
    /// delivery.
    pub fn new(url: impl Into<String>, secret: impl Into<String>) -> Option<Self> {
        let (url, secret) = (url.into(), secret.into());
        if url.trim().is_empty() || secret.is_empty() {
            return None;
        }
        Some(Self { url, secret })
    }
}

/// A serialized payload with its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    pub body: String,
    pub signature: String,
}

impl SignedPayload {
    pub fn new(payload: &WebhookPayload, secret: &str) -> Result<Self, DeliveryError> {
        let body = payload.to_canonical_json()?;
        let signature = sign_payload(secret.as_bytes(), body.as_bytes());
        Ok(Self { body, signature })
    }
}

/// Posts signed payloads.
#[async_trait]
pub trait WebhookSender: Send + Sync {
    async fn send(&self, url: &str, payload: &SignedPayload) -> Result<(), DeliveryError>;
}

/// [`WebhookSender`] over reqwest.
#[derive(Debug, Clone)]
pub struct HttpWebhookSender {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpWebhookSender {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl WebhookSender for HttpWebhookSender {
    async fn send(&self, url: &str, payload: &SignedPayload) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, &payload.signature)
            .timeout(self.timeout)
            .body(payload.body.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gensprite_spec::{JobEvent, JobType, ProgressEvent};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rfc4231_vector() {
        // RFC 4231 test case 2.
        let signature = sign_payload(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            signature,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_signature_is_deterministic() {
        let a = sign_payload(b"secret", br#"{"job_id":"j1"}"#);
        let b = sign_payload(b"secret", br#"{"job_id":"j1"}"#);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_one_byte_changes_signature() {
        let body = br#"{"job_id":"j1","progress":10}"#.to_vec();
        let original = sign_payload(b"secret", &body);
        for i in 0..body.len() {
            let mut tampered = body.clone();
            tampered[i] ^= 0x01;
            assert_ne!(sign_payload(b"secret", &tampered), original, "byte {}", i);
        }
        assert_ne!(sign_payload(b"secreT", &body), original);
    }

    #[test]
    fn test_signed_payload_signs_exact_body() {
        let event = JobEvent::Processing(ProgressEvent::new(10, "Generating sprite..."));
        let payload = WebhookPayload::for_event("j1", JobType::Sprite, &event);
        let signed = SignedPayload::new(&payload, "s3cret").unwrap();

        assert_eq!(
            signed.body,
            r#"{"current_stage":"Generating sprite...","job_id":"j1","job_type":"sprite","progress":10,"status":"processing"}"#
        );
        assert_eq!(signed.signature, sign_payload(b"s3cret", signed.body.as_bytes()));
    }

    #[test]
    fn test_target_requires_url_and_secret() {
        assert!(WebhookTarget::new("", "s").is_none());
        assert!(WebhookTarget::new("https://app/hook", "").is_none());
        assert!(WebhookTarget::new("https://app/hook", "s").is_some());
    }

    #[test]
    fn test_transient_classification() {
        assert!(DeliveryError::Status { status: 503 }.is_transient());
        assert!(DeliveryError::Status { status: 429 }.is_transient());
        assert!(!DeliveryError::Status { status: 401 }.is_transient());
        assert!(!DeliveryError::Status { status: 404 }.is_transient());
    }
}
