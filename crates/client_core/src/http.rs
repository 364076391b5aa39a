use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{ItemId, ListId},
    protocol::{
        CreateItemRequest, CreateItemResponse, CreateListRequest, CreateListResponse,
        GetItemsResponse, MutationResponse, TodoList, UpdateItemModel, WhoAmIResponse,
    },
};
use tracing::debug;
use url::Url;

use crate::{
    error::TransportError,
    transport::{IdentityProvider, TodoTransport},
};

const API_KEY_HEADER: &str = "API-KEY";

/// reqwest-backed client for the REST todo-list API.
pub struct HttpTransport {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            api_key,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, TransportError> {
        let url = self.base_url.join(path)?;
        debug!(%method, %url, "todo api request");
        let mut builder = self.http.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        Ok(builder)
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, TransportError> {
        let body = builder.send().await?.error_for_status()?.text().await?;
        serde_json::from_str(&body).map_err(|err| TransportError::MalformedResponse(err.to_string()))
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, TransportError> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Ok(Url::parse(trimmed)?)
    } else {
        Ok(Url::parse(&format!("{trimmed}/"))?)
    }
}

fn list_path(list_id: &ListId) -> String {
    format!("todo-lists/{list_id}")
}

fn item_path(list_id: &ListId, item_id: &ItemId) -> String {
    format!("todo-lists/{list_id}/tasks/{item_id}")
}

#[async_trait]
impl TodoTransport for HttpTransport {
    async fn get_lists(&self) -> Result<Vec<TodoList>, TransportError> {
        Self::send_json(self.request(Method::GET, "todo-lists")?).await
    }

    async fn create_list(&self, title: &str) -> Result<CreateListResponse, TransportError> {
        let builder = self
            .request(Method::POST, "todo-lists")?
            .json(&CreateListRequest {
                title: title.to_string(),
            });
        Self::send_json(builder).await
    }

    async fn update_list_title(
        &self,
        list_id: &ListId,
        title: &str,
    ) -> Result<MutationResponse, TransportError> {
        let builder = self
            .request(Method::PUT, &list_path(list_id))?
            .json(&CreateListRequest {
                title: title.to_string(),
            });
        Self::send_json(builder).await
    }

    async fn delete_list(&self, list_id: &ListId) -> Result<MutationResponse, TransportError> {
        Self::send_json(self.request(Method::DELETE, &list_path(list_id))?).await
    }

    async fn get_items(&self, list_id: &ListId) -> Result<GetItemsResponse, TransportError> {
        let path = format!("{}/tasks", list_path(list_id));
        Self::send_json(self.request(Method::GET, &path)?).await
    }

    async fn create_item(
        &self,
        list_id: &ListId,
        title: &str,
    ) -> Result<CreateItemResponse, TransportError> {
        let path = format!("{}/tasks", list_path(list_id));
        let builder = self
            .request(Method::POST, &path)?
            .json(&CreateItemRequest {
                title: title.to_string(),
            });
        Self::send_json(builder).await
    }

    async fn update_item(
        &self,
        list_id: &ListId,
        item_id: &ItemId,
        model: &UpdateItemModel,
    ) -> Result<MutationResponse, TransportError> {
        let builder = self
            .request(Method::PUT, &item_path(list_id, item_id))?
            .json(model);
        Self::send_json(builder).await
    }

    async fn delete_item(
        &self,
        list_id: &ListId,
        item_id: &ItemId,
    ) -> Result<MutationResponse, TransportError> {
        Self::send_json(self.request(Method::DELETE, &item_path(list_id, item_id))?).await
    }
}

#[async_trait]
impl IdentityProvider for HttpTransport {
    async fn who_am_i(&self) -> Result<WhoAmIResponse, TransportError> {
        Self::send_json(self.request(Method::GET, "auth/me")?).await
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
