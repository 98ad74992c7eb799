use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "card.created")]
    CardCreated,
    #[serde(rename = "card.updated")]
    CardUpdated,
    #[serde(rename = "card.moved")]
    CardMoved,
    #[serde(rename = "card.deleted")]
    CardDeleted,
}

impl WebhookEvent {
    pub const ALL: [WebhookEvent; 4] = [
        WebhookEvent::CardCreated,
        WebhookEvent::CardUpdated,
        WebhookEvent::CardMoved,
        WebhookEvent::CardDeleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEvent::CardCreated => "card.created",
            WebhookEvent::CardUpdated => "card.updated",
            WebhookEvent::CardMoved => "card.moved",
            WebhookEvent::CardDeleted => "card.deleted",
        }
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown webhook event: {0}")]
pub struct UnknownWebhookEvent(pub String);

impl FromStr for WebhookEvent {
    type Err = UnknownWebhookEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WebhookEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| UnknownWebhookEvent(s.to_string()))
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct WebhookEndpointRow {
    pub id: i64,
    pub public_id: String,
    pub workspace_id: i64,
    pub name: String,
    pub url: String,
    pub secret: Option<String>,
    pub events: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEndpoint {
    pub id: i64,
    pub public_id: String,
    pub workspace_id: i64,
    pub name: String,
    pub url: String,
    pub secret: Option<String>,
    pub events: Vec<WebhookEvent>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<WebhookEndpointRow> for WebhookEndpoint {
    fn from(row: WebhookEndpointRow) -> Self {
        let events = row
            .events
            .iter()
            .filter_map(|raw| match raw.parse::<WebhookEvent>() {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!(webhook = %row.public_id, error = %e, "Skipping stored webhook event");
                    None
                }
            })
            .collect();

        Self {
            id: row.id,
            public_id: row.public_id,
            workspace_id: row.workspace_id,
            name: row.name,
            url: row.url,
            secret: row.secret.filter(|s| !s.is_empty()),
            events,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
