use async_trait::async_trait;
use shared::{
    domain::{ItemId, ListId},
    protocol::{
        CreateItemResponse, CreateListResponse, GetItemsResponse, MutationResponse, TodoList,
        UpdateItemModel, WhoAmIResponse,
    },
};

use crate::error::TransportError;

/// Remote todo-list API. `Err` means the call itself failed; a structured
/// response with a non-zero result code is still `Ok`.
#[async_trait]
pub trait TodoTransport: Send + Sync {
    async fn get_lists(&self) -> Result<Vec<TodoList>, TransportError>;
    async fn create_list(&self, title: &str) -> Result<CreateListResponse, TransportError>;
    async fn update_list_title(
        &self,
        list_id: &ListId,
        title: &str,
    ) -> Result<MutationResponse, TransportError>;
    async fn delete_list(&self, list_id: &ListId) -> Result<MutationResponse, TransportError>;
    async fn get_items(&self, list_id: &ListId) -> Result<GetItemsResponse, TransportError>;
    async fn create_item(
        &self,
        list_id: &ListId,
        title: &str,
    ) -> Result<CreateItemResponse, TransportError>;
    async fn update_item(
        &self,
        list_id: &ListId,
        item_id: &ItemId,
        model: &UpdateItemModel,
    ) -> Result<MutationResponse, TransportError>;
    async fn delete_item(
        &self,
        list_id: &ListId,
        item_id: &ItemId,
    ) -> Result<MutationResponse, TransportError>;
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn who_am_i(&self) -> Result<WhoAmIResponse, TransportError>;
}

pub struct MissingIdentityProvider;

#[async_trait]
impl IdentityProvider for MissingIdentityProvider {
    async fn who_am_i(&self) -> Result<WhoAmIResponse, TransportError> {
        Err(TransportError::Unavailable(
            "identity provider is unavailable".into(),
        ))
    }
}
