use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    domain::{ItemId, ItemPriority, ItemStatus, ListId},
    error::{ApiRejection, ResultCode},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    pub id: ListId,
    pub title: String,
    /// Server-assigned creation timestamp. Opaque; only used as an ordering key.
    #[serde(default)]
    pub added_date: String,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub todo_list_id: ListId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub priority: ItemPriority,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub added_date: String,
}

impl Item {
    /// Shallow merge: every field present in `patch` overwrites the current value.
    pub fn merge(&mut self, patch: &ItemPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(start_date) = &patch.start_date {
            self.start_date = start_date.clone();
        }
        if let Some(deadline) = &patch.deadline {
            self.deadline = deadline.clone();
        }
    }
}

/// Partial update of the user-editable item fields.
///
/// Nullable fields are doubly optional: `None` leaves the field alone,
/// `Some(None)` clears it. On the wire that is an absent key versus `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_nullable"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<ItemPriority>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_nullable"
    )]
    pub start_date: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_nullable"
    )]
    pub deadline: Option<Option<String>>,
}

// Only called when the key is present, so an explicit `null` becomes `Some(None)`.
fn present_nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self == &ItemPatch::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    pub fn status(mut self, status: ItemStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: ItemPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(Some(start_date.into()));
        self
    }

    pub fn clear_start_date(mut self) -> Self {
        self.start_date = Some(None);
        self
    }

    pub fn deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(Some(deadline.into()));
        self
    }

    pub fn clear_deadline(mut self) -> Self {
        self.deadline = Some(None);
        self
    }
}

/// Complete record expected by the item update endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemModel {
    pub title: String,
    pub description: Option<String>,
    pub status: ItemStatus,
    pub priority: ItemPriority,
    pub start_date: Option<String>,
    pub deadline: Option<String>,
}

impl UpdateItemModel {
    pub fn overlay(item: &Item, patch: &ItemPatch) -> Self {
        let mut merged = item.clone();
        merged.merge(patch);
        Self {
            title: merged.title,
            description: merged.description,
            status: merged.status,
            priority: merged.priority,
            start_date: merged.start_date,
            deadline: merged.deadline,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEnvelope<T> {
    pub item: Option<T>,
}

impl<T> Default for ItemEnvelope<T> {
    fn default() -> Self {
        Self { item: None }
    }
}

/// Standard response wrapper for mutating endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<D = Empty> {
    pub result_code: ResultCode,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub data: D,
}

impl<D> ApiResponse<D> {
    pub fn ok(data: D) -> Self {
        Self {
            result_code: ResultCode::Success,
            messages: Vec::new(),
            data,
        }
    }

    pub fn into_result(self) -> Result<D, ApiRejection> {
        if self.result_code.is_success() {
            Ok(self.data)
        } else {
            Err(ApiRejection::new(self.result_code, self.messages))
        }
    }
}

impl<D: Default> ApiResponse<D> {
    pub fn rejected(code: ResultCode, messages: Vec<String>) -> Self {
        Self {
            result_code: code,
            messages,
            data: D::default(),
        }
    }
}

pub type CreateListResponse = ApiResponse<ItemEnvelope<TodoList>>;
pub type CreateItemResponse = ApiResponse<ItemEnvelope<Item>>;
pub type MutationResponse = ApiResponse<Empty>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetItemsResponse {
    pub items: Vec<Item>,
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub login: Option<String>,
}

pub type WhoAmIResponse = ApiResponse<Identity>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub title: String,
}
