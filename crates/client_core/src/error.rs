use shared::{
    domain::{ItemId, ListId},
    error::ApiRejection,
};
use thiserror::Error;

/// The remote call itself failed: connectivity, timeout, HTTP status, or an undecodable body.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum LocalInconsistency {
    #[error("item {item_id} not found in list {list_id}")]
    ItemNotFound { list_id: ListId, item_id: ItemId },
    #[error("list {list_id} not found")]
    ListNotFound { list_id: ListId },
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    DomainRejection(#[from] ApiRejection),
    #[error(transparent)]
    LocalInconsistency(#[from] LocalInconsistency),
}

impl SyncError {
    pub fn kind(&self) -> SyncErrorKind {
        match self {
            SyncError::Transport(_) => SyncErrorKind::Transport,
            SyncError::DomainRejection(_) => SyncErrorKind::DomainRejection,
            SyncError::LocalInconsistency(_) => SyncErrorKind::LocalInconsistency,
        }
    }

    /// Text recorded as the global error when this error reaches the command boundary.
    pub fn global_message(&self) -> String {
        match self {
            SyncError::DomainRejection(rejection) => rejection.message(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncErrorKind {
    Transport,
    DomainRejection,
    LocalInconsistency,
}
