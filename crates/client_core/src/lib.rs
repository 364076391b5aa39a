//! Client-held mirror of server-owned todo lists and their items.
//!
//! [`SyncClient`] owns the list store, the item store and the global status
//! record, and sequences every remote command through them. Structural list
//! changes reach both stores through [`StructuralEvent`].

pub mod error;
pub mod events;
mod executor;
pub mod http;
pub mod items;
pub mod lists;
pub mod state;
pub mod status;
pub mod transport;

pub use error::{LocalInconsistency, SyncError, SyncErrorKind, TransportError};
pub use events::{StructuralEvent, StructuralSubscriber, SyncEvent};
pub use executor::SyncClient;
pub use http::HttpTransport;
pub use items::ItemStore;
pub use lists::{ListEntity, ListStore};
pub use state::{SyncSnapshot, SyncState};
pub use status::AppStatus;
pub use transport::{IdentityProvider, MissingIdentityProvider, TodoTransport};
