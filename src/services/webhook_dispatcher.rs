//! Workspace-wide webhook fan-out.
//!
//! Dispatch never reports failure to its caller: loading errors and per-endpoint
//! delivery failures are logged and dropped, so a card mutation succeeds or fails
//! on its own merits regardless of what the subscribed endpoints do.

use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::dto::webhook_dto::DeliveryResult;
use crate::dto::webhook_payload::WebhookPayload;
use crate::error::Result;
use crate::models::webhook::{WebhookEndpoint, WebhookEvent};
use crate::services::webhook_delivery_service::WebhookDeliveryService;

#[async_trait]
pub trait WebhookEndpointStore: Send + Sync {
    /// Active endpoints of `workspace_id` whose subscriptions include `event`.
    async fn find_active_for_event(
        &self,
        workspace_id: i64,
        event: WebhookEvent,
    ) -> Result<Vec<WebhookEndpoint>>;
}

#[derive(Clone)]
pub struct WebhookDispatcher {
    store: Arc<dyn WebhookEndpointStore>,
    delivery: WebhookDeliveryService,
}

impl WebhookDispatcher {
    pub fn new(store: Arc<dyn WebhookEndpointStore>, delivery: WebhookDeliveryService) -> Self {
        Self { store, delivery }
    }

    /// Delivers `payload` to every matching endpoint concurrently and waits for
    /// all of them. The endpoint list is loaded once up front.
    pub async fn dispatch_for_workspace(&self, workspace_id: i64, payload: &WebhookPayload) {
        let endpoints = match self
            .store
            .find_active_for_event(workspace_id, payload.event)
            .await
        {
            Ok(endpoints) => endpoints,
            Err(e) => {
                error!(
                    workspace_id,
                    event = %payload.event,
                    error = %e,
                    "Failed to load webhook endpoints"
                );
                return;
            }
        };

        if endpoints.is_empty() {
            debug!(workspace_id, event = %payload.event, "No webhooks subscribed to event");
            return;
        }

        let deliveries = endpoints
            .iter()
            .map(|endpoint| self.deliver_to(endpoint, payload));
        let results = join_all(deliveries).await;

        let delivered = results.iter().filter(|result| result.success).count();
        info!(
            workspace_id,
            event = %payload.event,
            delivered,
            failed = results.len() - delivered,
            "Webhook dispatch finished"
        );
    }

    /// Runs [`Self::dispatch_for_workspace`] on a detached tokio task.
    ///
    /// The caller may drop the handle; the dispatch still runs to completion.
    pub fn spawn_dispatch(&self, workspace_id: i64, payload: WebhookPayload) -> JoinHandle<()> {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher
                .dispatch_for_workspace(workspace_id, &payload)
                .await;
        })
    }

    async fn deliver_to(&self, endpoint: &WebhookEndpoint, payload: &WebhookPayload) -> DeliveryResult {
        let result = self
            .delivery
            .deliver(&endpoint.url, endpoint.secret.as_deref(), payload)
            .await;

        if !result.success {
            warn!(
                webhook = %endpoint.public_id,
                url = %endpoint.url,
                event = %payload.event,
                status_code = ?result.status_code,
                error = result.error.as_deref().unwrap_or("unknown error"),
                "Webhook delivery failed"
            );
        }
        result
    }
}
