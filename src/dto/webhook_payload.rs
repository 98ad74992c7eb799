use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::models::webhook::WebhookEvent;
use crate::utils::time;

/// Body POSTed to every subscribed endpoint.
///
/// Built once per dispatch through [`WebhookPayload::for_card`] and shared by
/// reference across the fan-out, so every endpoint receives the same bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub event: WebhookEvent,
    pub timestamp: String,
    pub data: WebhookPayloadData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayloadData {
    pub card: CardSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<ListContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<BTreeMap<String, FieldChange>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSnapshot {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    pub list_id: String,
    pub board_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardContext {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListContext {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    pub id: String,
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub from: JsonValue,
    pub to: JsonValue,
}

/// Optional context attached to a card payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PayloadContext {
    pub board: Option<BoardContext>,
    pub list: Option<ListContext>,
    pub user: Option<UserContext>,
    pub changes: Option<BTreeMap<String, FieldChange>>,
}

impl WebhookPayload {
    pub fn for_card(event: WebhookEvent, card: CardSnapshot, context: PayloadContext) -> Self {
        let changes = context.changes.filter(|changes| !changes.is_empty());
        Self {
            event,
            timestamp: time::to_iso_millis(time::now()),
            data: WebhookPayloadData {
                card,
                board: context.board,
                list: context.list,
                user: context.user,
                changes,
            },
        }
    }

    /// Fixed sample sent by the "send test webhook" action.
    pub fn test_event() -> Self {
        Self::for_card(
            WebhookEvent::CardCreated,
            CardSnapshot {
                id: "test-card-id".to_string(),
                title: "Test Card".to_string(),
                description: Some("This is a test webhook payload".to_string()),
                due_date: None,
                list_id: "test-list-id".to_string(),
                board_id: "test-board-id".to_string(),
            },
            PayloadContext {
                board: Some(BoardContext {
                    id: "test-board-id".to_string(),
                    name: "Test Board".to_string(),
                }),
                list: Some(ListContext {
                    id: "test-list-id".to_string(),
                    name: "Test List".to_string(),
                }),
                ..PayloadContext::default()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card() -> CardSnapshot {
        CardSnapshot {
            id: "card123".into(),
            title: "Fix login".into(),
            description: None,
            due_date: None,
            list_id: "list456".into(),
            board_id: "board789".into(),
        }
    }

    #[test]
    fn wire_shape_is_camel_case_with_null_due_date() {
        let payload = WebhookPayload::for_card(WebhookEvent::CardCreated, card(), PayloadContext::default());
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["event"], "card.created");
        assert_eq!(json["data"]["card"]["listId"], "list456");
        assert_eq!(json["data"]["card"]["boardId"], "board789");
        assert!(json["data"]["card"]["dueDate"].is_null());
        assert!(json["data"]["card"].get("description").is_none());
        assert!(json["data"].get("board").is_none());
        assert!(json["data"].get("changes").is_none());
    }

    #[test]
    fn timestamp_is_iso_millis() {
        let payload = WebhookPayload::for_card(WebhookEvent::CardMoved, card(), PayloadContext::default());
        assert!(payload.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&payload.timestamp).is_ok());
        assert_eq!(payload.timestamp.len(), "2026-01-01T00:00:00.000Z".len());
    }

    #[test]
    fn changes_are_carried_and_empty_changes_dropped() {
        let mut changes = BTreeMap::new();
        changes.insert(
            "title".to_string(),
            FieldChange { from: json!("Old"), to: json!("New") },
        );
        let payload = WebhookPayload::for_card(
            WebhookEvent::CardUpdated,
            card(),
            PayloadContext { changes: Some(changes), ..PayloadContext::default() },
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["data"]["changes"]["title"], json!({ "from": "Old", "to": "New" }));

        let empty = WebhookPayload::for_card(
            WebhookEvent::CardUpdated,
            card(),
            PayloadContext { changes: Some(BTreeMap::new()), ..PayloadContext::default() },
        );
        assert!(empty.data.changes.is_none());
    }

    #[test]
    fn test_event_is_a_card_created_sample() {
        let payload = WebhookPayload::test_event();
        assert_eq!(payload.event, WebhookEvent::CardCreated);
        assert_eq!(payload.data.card.title, "Test Card");
        assert_eq!(payload.data.board.as_ref().map(|b| b.name.as_str()), Some("Test Board"));
    }
}
