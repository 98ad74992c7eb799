use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::webhook_payload::{CardSnapshot, PayloadContext};
use crate::models::webhook::{WebhookEndpoint, WebhookEvent};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateWebhookPayload {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
    pub secret: Option<String>,
    #[validate(length(min = 1, message = "at least one event is required"))]
    pub events: Vec<WebhookEvent>,
    pub active: Option<bool>,
}

/// Partial update. An empty `secret` clears the stored secret.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateWebhookPayload {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 2048))]
    pub url: Option<String>,
    pub secret: Option<String>,
    #[validate(length(min = 1, message = "at least one event is required"))]
    pub events: Option<Vec<WebhookEvent>>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub public_id: String,
    pub workspace_id: i64,
    pub name: String,
    pub url: String,
    pub has_secret: bool,
    pub events: Vec<WebhookEvent>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<WebhookEndpoint> for WebhookResponse {
    fn from(endpoint: WebhookEndpoint) -> Self {
        Self {
            public_id: endpoint.public_id,
            workspace_id: endpoint.workspace_id,
            name: endpoint.name,
            url: endpoint.url,
            has_secret: endpoint.secret.is_some(),
            events: endpoint.events,
            active: endpoint.active,
            created_at: endpoint.created_at,
            updated_at: endpoint.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookListResponse {
    pub webhooks: Vec<WebhookResponse>,
}

/// Outcome of one delivery attempt. Returned to the caller of a test send,
/// logged and dropped for automatic dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryResult {
    pub fn delivered(status_code: u16) -> Self {
        Self {
            success: true,
            status_code: Some(status_code),
            error: None,
        }
    }

    pub fn rejected(status_code: u16, status_text: &str) -> Self {
        Self {
            success: false,
            status_code: Some(status_code),
            error: Some(format!("{} {}", status_code, status_text).trim_end().to_string()),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: None,
            error: Some(error.into()),
        }
    }
}

/// Card change reported by the mutation layer.
#[derive(Debug, Clone, Deserialize)]
pub struct CardEventRequest {
    pub event: WebhookEvent,
    pub card: CardSnapshot,
    #[serde(flatten)]
    pub context: PayloadContext,
}
