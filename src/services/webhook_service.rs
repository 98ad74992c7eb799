use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::dto::webhook_dto::{CreateWebhookPayload, UpdateWebhookPayload};
use crate::error::{Error, Result};
use crate::models::webhook::{WebhookEndpoint, WebhookEndpointRow, WebhookEvent};
use crate::services::webhook_dispatcher::WebhookEndpointStore;
use crate::utils::{token::generate_public_id, url_safety::validate_webhook_url};

const ENDPOINT_COLUMNS: &str =
    "id, public_id, workspace_id, name, url, secret, events, active, created_at, updated_at";

#[derive(Clone)]
pub struct WebhookService {
    pool: PgPool,
}

impl WebhookService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        workspace_id: i64,
        payload: CreateWebhookPayload,
    ) -> Result<WebhookEndpoint> {
        let url = payload.url.trim().to_string();
        validate_webhook_url(&url)?;
        let events = event_names(&payload.events);
        let secret = payload.secret.filter(|s| !s.is_empty());

        let row = sqlx::query_as::<_, WebhookEndpointRow>(&format!(
            r#"
            INSERT INTO workspace_webhooks (public_id, workspace_id, name, url, secret, events, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ENDPOINT_COLUMNS}
            "#
        ))
        .bind(generate_public_id())
        .bind(workspace_id)
        .bind(payload.name.trim())
        .bind(&url)
        .bind(secret)
        .bind(&events)
        .bind(payload.active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;

        info!(workspace_id, webhook = %row.public_id, "Webhook created");
        Ok(row.into())
    }

    pub async fn list(&self, workspace_id: i64) -> Result<Vec<WebhookEndpoint>> {
        let rows = sqlx::query_as::<_, WebhookEndpointRow>(&format!(
            r#"SELECT {ENDPOINT_COLUMNS} FROM workspace_webhooks
               WHERE workspace_id = $1
               ORDER BY created_at ASC"#
        ))
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(WebhookEndpoint::from).collect())
    }

    pub async fn get(&self, workspace_id: i64, public_id: &str) -> Result<WebhookEndpoint> {
        let row = sqlx::query_as::<_, WebhookEndpointRow>(&format!(
            r#"SELECT {ENDPOINT_COLUMNS} FROM workspace_webhooks
               WHERE workspace_id = $1 AND public_id = $2"#
        ))
        .bind(workspace_id)
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(WebhookEndpoint::from)
            .ok_or_else(|| Error::NotFound(format!("Webhook {} not found", public_id)))
    }

    pub async fn update(
        &self,
        workspace_id: i64,
        public_id: &str,
        payload: UpdateWebhookPayload,
    ) -> Result<WebhookEndpoint> {
        let url = payload.url.map(|url| url.trim().to_string());
        if let Some(url) = &url {
            validate_webhook_url(url)?;
        }
        let events = payload.events.as_deref().map(event_names);

        let row = sqlx::query_as::<_, WebhookEndpointRow>(&format!(
            r#"
            UPDATE workspace_webhooks
            SET
                name = COALESCE($3, name),
                url = COALESCE($4, url),
                secret = CASE
                    WHEN $5::text IS NULL THEN secret
                    WHEN $5::text = '' THEN NULL
                    ELSE $5::text
                END,
                events = COALESCE($6, events),
                active = COALESCE($7, active),
                updated_at = NOW()
            WHERE workspace_id = $1 AND public_id = $2
            RETURNING {ENDPOINT_COLUMNS}
            "#
        ))
        .bind(workspace_id)
        .bind(public_id)
        .bind(payload.name.as_deref().map(str::trim))
        .bind(url)
        .bind(payload.secret)
        .bind(events)
        .bind(payload.active)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| Error::NotFound(format!("Webhook {} not found", public_id)))?;
        info!(workspace_id, webhook = %row.public_id, "Webhook updated");
        Ok(row.into())
    }

    pub async fn delete(&self, workspace_id: i64, public_id: &str) -> Result<()> {
        let result = sqlx::query(
            r#"DELETE FROM workspace_webhooks WHERE workspace_id = $1 AND public_id = $2"#,
        )
        .bind(workspace_id)
        .bind(public_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Webhook {} not found", public_id)));
        }
        info!(workspace_id, webhook = %public_id, "Webhook deleted");
        Ok(())
    }
}

#[async_trait]
impl WebhookEndpointStore for WebhookService {
    async fn find_active_for_event(
        &self,
        workspace_id: i64,
        event: WebhookEvent,
    ) -> Result<Vec<WebhookEndpoint>> {
        let rows = sqlx::query_as::<_, WebhookEndpointRow>(&format!(
            r#"SELECT {ENDPOINT_COLUMNS} FROM workspace_webhooks
               WHERE workspace_id = $1 AND active = TRUE AND $2 = ANY(events)"#
        ))
        .bind(workspace_id)
        .bind(event.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(WebhookEndpoint::from).collect())
    }
}

fn event_names(events: &[WebhookEvent]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(events.len());
    for event in events {
        if !names.iter().any(|name| name == event.as_str()) {
            names.push(event.as_str().to_string());
        }
    }
    names
}
