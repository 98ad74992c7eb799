use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::{error::Result, AppState};

#[utoipa::path(
    get,
    path = "/api/cards/{card_id}/activities",
    params(
        ("card_id" = String, Path, description = "Card public ID")
    ),
    responses(
        (status = 200, description = "Card activity feed, oldest first, with bursts merged")
    )
)]
#[axum::debug_handler]
pub async fn list_card_activities(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> Result<impl IntoResponse> {
    let activities = state.activity_service.feed_for_card(&card_id).await?;
    Ok(Json(json!({ "activities": activities })))
}
