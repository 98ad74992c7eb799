use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::{
        webhook_dto::{
            CreateWebhookPayload, UpdateWebhookPayload, WebhookListResponse, WebhookResponse,
        },
        webhook_payload::WebhookPayload,
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/workspaces/{workspace_id}/webhooks",
    params(
        ("workspace_id" = i64, Path, description = "Workspace ID")
    ),
    responses(
        (status = 200, description = "Webhooks configured for the workspace", body = Json<WebhookListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_webhooks(
    State(state): State<AppState>,
    Path(workspace_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let webhooks = state.webhook_service.list(workspace_id).await?;
    Ok(Json(WebhookListResponse {
        webhooks: webhooks.into_iter().map(WebhookResponse::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/workspaces/{workspace_id}/webhooks",
    params(
        ("workspace_id" = i64, Path, description = "Workspace ID")
    ),
    request_body = CreateWebhookPayload,
    responses(
        (status = 201, description = "Webhook created", body = Json<WebhookResponse>),
        (status = 400, description = "Invalid payload or unsafe URL")
    )
)]
#[axum::debug_handler]
pub async fn create_webhook(
    State(state): State<AppState>,
    Path(workspace_id): Path<i64>,
    Json(payload): Json<CreateWebhookPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let webhook = state.webhook_service.create(workspace_id, payload).await?;
    Ok((StatusCode::CREATED, Json(WebhookResponse::from(webhook))))
}

#[utoipa::path(
    get,
    path = "/api/workspaces/{workspace_id}/webhooks/{webhook_id}",
    params(
        ("workspace_id" = i64, Path, description = "Workspace ID"),
        ("webhook_id" = String, Path, description = "Webhook public ID")
    ),
    responses(
        (status = 200, description = "Webhook", body = Json<WebhookResponse>),
        (status = 404, description = "Webhook not found")
    )
)]
#[axum::debug_handler]
pub async fn get_webhook(
    State(state): State<AppState>,
    Path((workspace_id, webhook_id)): Path<(i64, String)>,
) -> Result<impl IntoResponse> {
    let webhook = state.webhook_service.get(workspace_id, &webhook_id).await?;
    Ok(Json(WebhookResponse::from(webhook)))
}

#[utoipa::path(
    patch,
    path = "/api/workspaces/{workspace_id}/webhooks/{webhook_id}",
    params(
        ("workspace_id" = i64, Path, description = "Workspace ID"),
        ("webhook_id" = String, Path, description = "Webhook public ID")
    ),
    request_body = UpdateWebhookPayload,
    responses(
        (status = 200, description = "Webhook updated", body = Json<WebhookResponse>),
        (status = 400, description = "Invalid payload or unsafe URL"),
        (status = 404, description = "Webhook not found")
    )
)]
#[axum::debug_handler]
pub async fn update_webhook(
    State(state): State<AppState>,
    Path((workspace_id, webhook_id)): Path<(i64, String)>,
    Json(payload): Json<UpdateWebhookPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let webhook = state
        .webhook_service
        .update(workspace_id, &webhook_id, payload)
        .await?;
    Ok(Json(WebhookResponse::from(webhook)))
}

#[utoipa::path(
    delete,
    path = "/api/workspaces/{workspace_id}/webhooks/{webhook_id}",
    params(
        ("workspace_id" = i64, Path, description = "Workspace ID"),
        ("webhook_id" = String, Path, description = "Webhook public ID")
    ),
    responses(
        (status = 204, description = "Webhook deleted"),
        (status = 404, description = "Webhook not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_webhook(
    State(state): State<AppState>,
    Path((workspace_id, webhook_id)): Path<(i64, String)>,
) -> Result<impl IntoResponse> {
    state.webhook_service.delete(workspace_id, &webhook_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Sends the sample payload to one endpoint and reports the outcome as-is.
/// Subscription and the active flag are ignored here.
#[utoipa::path(
    post,
    path = "/api/workspaces/{workspace_id}/webhooks/{webhook_id}/test",
    params(
        ("workspace_id" = i64, Path, description = "Workspace ID"),
        ("webhook_id" = String, Path, description = "Webhook public ID")
    ),
    responses(
        (status = 200, description = "Delivery outcome", body = Json<crate::dto::webhook_dto::DeliveryResult>),
        (status = 404, description = "Webhook not found")
    )
)]
#[axum::debug_handler]
pub async fn test_webhook(
    State(state): State<AppState>,
    Path((workspace_id, webhook_id)): Path<(i64, String)>,
) -> Result<impl IntoResponse> {
    let webhook = state.webhook_service.get(workspace_id, &webhook_id).await?;
    let payload = WebhookPayload::test_event();
    let result = state
        .delivery_service
        .deliver(&webhook.url, webhook.secret.as_deref(), &payload)
        .await;
    Ok(Json(result))
}
