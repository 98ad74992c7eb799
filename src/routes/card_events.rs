use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::{
    dto::{webhook_dto::CardEventRequest, webhook_payload::WebhookPayload},
    AppState,
};

/// Accepts a card change from the mutation layer and queues webhook delivery.
/// The response never depends on how delivery goes.
#[utoipa::path(
    post,
    path = "/api/workspaces/{workspace_id}/events",
    params(
        ("workspace_id" = i64, Path, description = "Workspace ID")
    ),
    request_body = CardEventRequest,
    responses(
        (status = 202, description = "Dispatch queued")
    )
)]
#[axum::debug_handler]
pub async fn publish_card_event(
    State(state): State<AppState>,
    Path(workspace_id): Path<i64>,
    Json(request): Json<CardEventRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let payload = WebhookPayload::for_card(request.event, request.card, request.context);
    debug!(workspace_id, event = %payload.event, card = %payload.data.card.id, "Queueing webhook dispatch");

    // Detached: the handle is dropped and the dispatch runs to completion on its own.
    drop(state.dispatcher.spawn_dispatch(workspace_id, payload));

    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "queued": true })),
    )
}
