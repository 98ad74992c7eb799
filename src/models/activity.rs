use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// How a burst of same-type activity is folded into one feed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Keep a count and carry the newest value forward.
    ByCount,
    /// Keep a count and collect each entry's label name.
    ByList,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityType {
    CardCreated,
    CardArchived,
    TitleUpdated,
    DescriptionUpdated,
    IndexUpdated,
    ListUpdated,
    LabelAdded,
    LabelRemoved,
    MemberAdded,
    MemberRemoved,
    CommentAdded,
    CommentUpdated,
    CommentDeleted,
    DueDateAdded,
    DueDateUpdated,
    DueDateRemoved,
    ChecklistAdded,
    ChecklistRenamed,
    ChecklistDeleted,
    ChecklistItemAdded,
    ChecklistItemUpdated,
    ChecklistItemCompleted,
    ChecklistItemUncompleted,
    ChecklistItemDeleted,
    AttachmentAdded,
    AttachmentRemoved,
    Other(String),
}

impl ActivityType {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityType::CardCreated => "card.created",
            ActivityType::CardArchived => "card.archived",
            ActivityType::TitleUpdated => "card.updated.title",
            ActivityType::DescriptionUpdated => "card.updated.description",
            ActivityType::IndexUpdated => "card.updated.index",
            ActivityType::ListUpdated => "card.updated.list",
            ActivityType::LabelAdded => "card.updated.label.added",
            ActivityType::LabelRemoved => "card.updated.label.removed",
            ActivityType::MemberAdded => "card.updated.member.added",
            ActivityType::MemberRemoved => "card.updated.member.removed",
            ActivityType::CommentAdded => "card.updated.comment.added",
            ActivityType::CommentUpdated => "card.updated.comment.updated",
            ActivityType::CommentDeleted => "card.updated.comment.deleted",
            ActivityType::DueDateAdded => "card.updated.dueDate.added",
            ActivityType::DueDateUpdated => "card.updated.dueDate.updated",
            ActivityType::DueDateRemoved => "card.updated.dueDate.removed",
            ActivityType::ChecklistAdded => "card.updated.checklist.added",
            ActivityType::ChecklistRenamed => "card.updated.checklist.renamed",
            ActivityType::ChecklistDeleted => "card.updated.checklist.deleted",
            ActivityType::ChecklistItemAdded => "card.updated.checklist.item.added",
            ActivityType::ChecklistItemUpdated => "card.updated.checklist.item.updated",
            ActivityType::ChecklistItemCompleted => "card.updated.checklist.item.completed",
            ActivityType::ChecklistItemUncompleted => "card.updated.checklist.item.uncompleted",
            ActivityType::ChecklistItemDeleted => "card.updated.checklist.item.deleted",
            ActivityType::AttachmentAdded => "card.updated.attachment.added",
            ActivityType::AttachmentRemoved => "card.updated.attachment.removed",
            ActivityType::Other(raw) => raw,
        }
    }

    pub fn merge_strategy(&self) -> Option<MergeStrategy> {
        match self {
            ActivityType::DescriptionUpdated => Some(MergeStrategy::ByCount),
            ActivityType::LabelAdded | ActivityType::LabelRemoved => Some(MergeStrategy::ByList),
            _ => None,
        }
    }
}

impl From<String> for ActivityType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "card.created" => ActivityType::CardCreated,
            "card.archived" => ActivityType::CardArchived,
            "card.updated.title" => ActivityType::TitleUpdated,
            "card.updated.description" => ActivityType::DescriptionUpdated,
            "card.updated.index" => ActivityType::IndexUpdated,
            "card.updated.list" => ActivityType::ListUpdated,
            "card.updated.label.added" => ActivityType::LabelAdded,
            "card.updated.label.removed" => ActivityType::LabelRemoved,
            "card.updated.member.added" => ActivityType::MemberAdded,
            "card.updated.member.removed" => ActivityType::MemberRemoved,
            "card.updated.comment.added" => ActivityType::CommentAdded,
            "card.updated.comment.updated" => ActivityType::CommentUpdated,
            "card.updated.comment.deleted" => ActivityType::CommentDeleted,
            "card.updated.dueDate.added" => ActivityType::DueDateAdded,
            "card.updated.dueDate.updated" => ActivityType::DueDateUpdated,
            "card.updated.dueDate.removed" => ActivityType::DueDateRemoved,
            "card.updated.checklist.added" => ActivityType::ChecklistAdded,
            "card.updated.checklist.renamed" => ActivityType::ChecklistRenamed,
            "card.updated.checklist.deleted" => ActivityType::ChecklistDeleted,
            "card.updated.checklist.item.added" => ActivityType::ChecklistItemAdded,
            "card.updated.checklist.item.updated" => ActivityType::ChecklistItemUpdated,
            "card.updated.checklist.item.completed" => ActivityType::ChecklistItemCompleted,
            "card.updated.checklist.item.uncompleted" => ActivityType::ChecklistItemUncompleted,
            "card.updated.checklist.item.deleted" => ActivityType::ChecklistItemDeleted,
            "card.updated.attachment.added" => ActivityType::AttachmentAdded,
            "card.updated.attachment.removed" => ActivityType::AttachmentRemoved,
            _ => ActivityType::Other(raw),
        }
    }
}

impl From<&str> for ActivityType {
    fn from(raw: &str) -> Self {
        ActivityType::from(raw.to_string())
    }
}

impl From<ActivityType> for String {
    fn from(activity_type: ActivityType) -> Self {
        activity_type.as_str().to_string()
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityActor {
    pub public_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLabel {
    pub public_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityAttachment {
    pub public_id: String,
    pub filename: Option<String>,
}

/// One row of a card's activity feed.
///
/// `merge_count` and `merged_labels` are only set on entries produced by
/// [`crate::services::activity_merge::merge_activities`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub public_id: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub actor: Option<ActivityActor>,
    pub created_at: DateTime<Utc>,
    pub from_title: Option<String>,
    pub to_title: Option<String>,
    pub from_description: Option<String>,
    pub to_description: Option<String>,
    pub label: Option<ActivityLabel>,
    pub attachment: Option<ActivityAttachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_labels: Option<Vec<String>>,
}

impl ActivityEntry {
    pub fn actor_id(&self) -> Option<&str> {
        self.actor.as_ref().map(|actor| actor.public_id.as_str())
    }

    pub fn label_name(&self) -> Option<&str> {
        self.label.as_ref().and_then(|label| label.name.as_deref())
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ActivityRow {
    pub public_id: String,
    pub activity_type: String,
    pub actor_public_id: Option<String>,
    pub actor_name: Option<String>,
    pub actor_email: Option<String>,
    pub from_title: Option<String>,
    pub to_title: Option<String>,
    pub from_description: Option<String>,
    pub to_description: Option<String>,
    pub label_public_id: Option<String>,
    pub label_name: Option<String>,
    pub attachment_public_id: Option<String>,
    pub attachment_filename: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityRow> for ActivityEntry {
    fn from(row: ActivityRow) -> Self {
        let actor = row.actor_public_id.map(|public_id| ActivityActor {
            public_id,
            name: row.actor_name,
            email: row.actor_email,
        });
        let label = match (row.label_public_id, row.label_name) {
            (None, None) => None,
            (public_id, name) => Some(ActivityLabel { public_id, name }),
        };
        let attachment = row.attachment_public_id.map(|public_id| ActivityAttachment {
            public_id,
            filename: row.attachment_filename,
        });

        Self {
            public_id: row.public_id,
            activity_type: ActivityType::from(row.activity_type),
            actor,
            created_at: row.created_at,
            from_title: row.from_title,
            to_title: row.to_title,
            from_description: row.from_description,
            to_description: row.to_description,
            label,
            attachment,
            merge_count: None,
            merged_labels: None,
        }
    }
}
