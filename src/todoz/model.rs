use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discriminator stored in every record's `type` field.
pub const TODO_KIND: &str = "TodoItem";

/// A normalized todo record.
///
/// Serialized field names follow the document format: `type`, `_id`, and
/// camelCase timestamps. `updated_at` is the only field with an absence
/// marker; it serializes as an explicit `null` until the record is updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

/// Partial input for [`TodoItem::build`]; unset fields take defaults.
#[derive(Debug, Clone, Default)]
pub struct TodoDraft {
    pub id: Option<String>,
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
}

impl TodoItem {
    /// Fills every unset draft field with its default. `created_at` defaults
    /// to the current time at the call, so two builds without one may differ.
    /// No validation happens here; an empty id is accepted as-is.
    pub fn build(draft: TodoDraft) -> Self {
        Self {
            kind: TODO_KIND.to_string(),
            id: draft.id.unwrap_or_default(),
            title: draft.title.unwrap_or_default(),
            completed: draft.completed.unwrap_or(false),
            created_at: draft.created_at.unwrap_or_else(Utc::now),
            updated_at: draft.updated_at,
            tags: draft.tags.unwrap_or_default(),
        }
    }
}
