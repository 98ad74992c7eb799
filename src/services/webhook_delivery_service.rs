//! Single-endpoint webhook delivery.
//!
//! One POST per call, no retries. Every failure mode ends up in the returned
//! [`DeliveryResult`]; nothing here returns an error to the caller.

use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::dto::webhook_dto::DeliveryResult;
use crate::dto::webhook_payload::WebhookPayload;
use crate::error::Result;
use crate::utils::{crypto, url_safety};

pub const HEADER_EVENT: &str = "X-Webhook-Event";
pub const HEADER_TIMESTAMP: &str = "X-Webhook-Timestamp";
pub const HEADER_SIGNATURE: &str = "X-Webhook-Signature";
pub const TIMEOUT_MESSAGE: &str = "Request timed out";

/// A fully prepared request: validated URL, final headers, serialized body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingWebhook {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl OutgoingWebhook {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,

    #[error("{0}")]
    Network(String),
}

#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn send(
        &self,
        request: OutgoingWebhook,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        // Redirect targets would skip URL validation; a 3xx is reported as-is.
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookTransport for ReqwestTransport {
    async fn send(
        &self,
        request: OutgoingWebhook,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        match builder.body(request.body).send().await {
            Ok(resp) => {
                let status = resp.status();
                Ok(TransportResponse {
                    status: status.as_u16(),
                    status_text: status.canonical_reason().unwrap_or_default().to_string(),
                })
            }
            Err(err) if err.is_timeout() => Err(TransportError::Timeout),
            Err(err) => Err(TransportError::Network(err.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct WebhookDeliveryService {
    transport: Arc<dyn WebhookTransport>,
    timeout: Duration,
}

impl WebhookDeliveryService {
    pub fn new(transport: Arc<dyn WebhookTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    pub fn with_reqwest(timeout: Duration, user_agent: &str) -> Result<Self> {
        let transport = ReqwestTransport::new(timeout, user_agent)?;
        Ok(Self::new(Arc::new(transport), timeout))
    }

    pub async fn deliver(
        &self,
        url: &str,
        secret: Option<&str>,
        payload: &WebhookPayload,
    ) -> DeliveryResult {
        // Stored URLs are re-validated on every send.
        if let Err(reason) = url_safety::validate_webhook_url(url) {
            warn!(url = %url, reason = %reason, "Refusing webhook delivery to unsafe URL");
            return DeliveryResult::failed(reason.to_string());
        }

        let request = match build_request(url, secret, payload) {
            Ok(request) => request,
            Err(e) => return DeliveryResult::failed(e.to_string()),
        };

        let outcome = tokio::time::timeout(self.timeout, self.transport.send(request)).await;
        let result = match outcome {
            Err(_elapsed) => DeliveryResult::failed(TIMEOUT_MESSAGE),
            Ok(Err(err)) => DeliveryResult::failed(err.to_string()),
            Ok(Ok(resp)) if (200..300).contains(&resp.status) => DeliveryResult::delivered(resp.status),
            Ok(Ok(resp)) => DeliveryResult::rejected(resp.status, &resp.status_text),
        };

        debug!(
            url = %url,
            event = %payload.event,
            success = result.success,
            status_code = ?result.status_code,
            "Webhook delivery attempt finished"
        );
        result
    }
}

pub fn build_request(
    url: &str,
    secret: Option<&str>,
    payload: &WebhookPayload,
) -> std::result::Result<OutgoingWebhook, serde_json::Error> {
    let body = serde_json::to_vec(payload)?;

    let mut headers = vec![
        ("Content-Type".to_string(), "application/json".to_string()),
        (HEADER_EVENT.to_string(), payload.event.as_str().to_string()),
        (HEADER_TIMESTAMP.to_string(), payload.timestamp.clone()),
    ];
    if let Some(secret) = secret.filter(|s| !s.is_empty()) {
        headers.push((HEADER_SIGNATURE.to_string(), crypto::sign_payload(&body, secret)));
    }

    Ok(OutgoingWebhook {
        url: url.to_string(),
        headers,
        body,
    })
}
