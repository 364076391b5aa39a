use std::sync::Arc;

use shared::{
    domain::{FilterValue, ItemId, ListId, RequestStatus},
    error::{ApiRejection, ResultCode},
    protocol::{ApiResponse, Item, ItemPatch, TodoList, UpdateItemModel},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::{
    error::{LocalInconsistency, SyncError, TransportError},
    events::{StructuralEvent, SyncEvent},
    state::{SyncSnapshot, SyncState},
    transport::{IdentityProvider, MissingIdentityProvider, TodoTransport},
};

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Owns the synchronized state and runs every remote command against it.
///
/// Each command is `submitted -> resolved | rejected`. The state lock is held
/// only while a phase is applied, never across a transport call, so several
/// commands can be in flight while readers always see a completed phase.
pub struct SyncClient {
    transport: Arc<dyn TodoTransport>,
    identity: Arc<dyn IdentityProvider>,
    state: Mutex<SyncState>,
    events: broadcast::Sender<SyncEvent>,
}

impl SyncClient {
    pub fn new(transport: Arc<dyn TodoTransport>) -> Arc<Self> {
        Self::new_with_identity(transport, Arc::new(MissingIdentityProvider))
    }

    pub fn new_with_identity(
        transport: Arc<dyn TodoTransport>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            transport,
            identity,
            state: Mutex::new(SyncState::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SyncSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Runs `read` against the current state under the lock.
    pub async fn read<R>(&self, read: impl FnOnce(&SyncState) -> R) -> R {
        let guard = self.state.lock().await;
        read(&guard)
    }

    /// Checks the session and marks the process initialized, whatever the outcome.
    pub async fn initialize(&self) -> Result<bool, SyncError> {
        self.submit("initialize").await;
        let outcome = self.identity.who_am_i().await;

        let mut state = self.state.lock().await;
        state.status.mark_initialized();
        match outcome {
            Ok(response) => {
                let logged_in = response.result_code.is_success();
                state.status.set_logged_in(logged_in);
                info!(logged_in, "session check finished");
                self.resolve(&mut state, "initialize");
                Ok(logged_in)
            }
            Err(err) => {
                state.status.set_logged_in(false);
                Err(self.reject(&mut state, "initialize", err.into()))
            }
        }
    }

    pub async fn fetch_lists(&self) -> Result<usize, SyncError> {
        self.submit("fetch_lists").await;
        let outcome = self.transport.get_lists().await;

        let mut state = self.state.lock().await;
        match outcome {
            Ok(lists) => {
                let count = lists.len();
                self.apply_structural(&mut state, StructuralEvent::ListsReplaced(lists));
                self.resolve(&mut state, "fetch_lists");
                Ok(count)
            }
            Err(err) => Err(self.reject(&mut state, "fetch_lists", err.into())),
        }
    }

    pub async fn create_list(&self, title: &str) -> Result<TodoList, SyncError> {
        self.submit("create_list").await;
        let outcome = self.transport.create_list(title).await;

        let mut state = self.state.lock().await;
        let created = accept(outcome).and_then(|data| {
            data.item.ok_or_else(|| {
                TransportError::MalformedResponse("create list response has no item".into()).into()
            })
        });
        match created {
            Ok(list) => {
                self.apply_structural(&mut state, StructuralEvent::ListCreated(list.clone()));
                self.resolve(&mut state, "create_list");
                Ok(list)
            }
            Err(err) => Err(self.reject(&mut state, "create_list", err)),
        }
    }

    pub async fn rename_list(&self, list_id: &ListId, title: &str) -> Result<(), SyncError> {
        self.submit_for_list("rename_list", list_id).await?;
        let outcome = self.transport.update_list_title(list_id, title).await;

        let mut state = self.state.lock().await;
        match accept(outcome) {
            Ok(_) => {
                state.lists.rename_title(list_id, title);
                state
                    .lists
                    .set_entity_status(list_id, RequestStatus::Succeeded);
                self.resolve(&mut state, "rename_list");
                Ok(())
            }
            Err(err) => {
                state.lists.set_entity_status(list_id, RequestStatus::Failed);
                Err(self.reject(&mut state, "rename_list", err))
            }
        }
    }

    pub async fn delete_list(&self, list_id: &ListId) -> Result<(), SyncError> {
        self.submit_for_list("delete_list", list_id).await?;
        let outcome = self.transport.delete_list(list_id).await;

        let mut state = self.state.lock().await;
        match accept(outcome) {
            Ok(_) => {
                self.apply_structural(&mut state, StructuralEvent::ListDeleted(list_id.clone()));
                self.resolve(&mut state, "delete_list");
                Ok(())
            }
            Err(err) => {
                state.lists.set_entity_status(list_id, RequestStatus::Failed);
                Err(self.reject(&mut state, "delete_list", err))
            }
        }
    }

    /// Clears the last global error, e.g. once the user has dismissed it.
    pub async fn dismiss_error(&self) {
        self.state.lock().await.status.set_global_error(None);
    }

    /// Client-only; no remote call and no global status change.
    pub async fn change_filter(&self, list_id: &ListId, filter: FilterValue) -> bool {
        self.state.lock().await.lists.set_filter(list_id, filter)
    }

    pub async fn fetch_items(&self, list_id: &ListId) -> Result<usize, SyncError> {
        self.submit("fetch_items").await;
        let outcome = self.transport.get_items(list_id).await;

        let mut state = self.state.lock().await;
        let fetched = outcome.map_err(SyncError::from).and_then(|response| {
            match response.error {
                Some(message) if !message.trim().is_empty() => {
                    Err(ApiRejection::new(ResultCode::Rejected, vec![message]).into())
                }
                _ => Ok(response.items),
            }
        });
        match fetched {
            Ok(items) => {
                let count = items.len();
                state.items.set_items_for_list(list_id, items);
                self.resolve(&mut state, "fetch_items");
                Ok(count)
            }
            Err(err) => Err(self.reject(&mut state, "fetch_items", err)),
        }
    }

    pub async fn create_item(&self, list_id: &ListId, title: &str) -> Result<Item, SyncError> {
        self.submit("create_item").await;
        let outcome = self.transport.create_item(list_id, title).await;

        let mut state = self.state.lock().await;
        let created = accept(outcome).and_then(|data| {
            data.item.ok_or_else(|| {
                TransportError::MalformedResponse("create item response has no item".into()).into()
            })
        });
        match created {
            Ok(item) => {
                state.items.insert_item(item.clone());
                self.resolve(&mut state, "create_item");
                Ok(item)
            }
            Err(err) => Err(self.reject(&mut state, "create_item", err)),
        }
    }

    /// Sends the locally known item overlaid with `patch`; the endpoint wants the full record.
    pub async fn update_item(
        &self,
        list_id: &ListId,
        item_id: &ItemId,
        patch: ItemPatch,
    ) -> Result<(), SyncError> {
        self.submit("update_item").await;

        let model = {
            let mut state = self.state.lock().await;
            let overlaid = state
                .items
                .find(list_id, item_id)
                .map(|current| UpdateItemModel::overlay(current, &patch));
            match overlaid {
                Some(model) => model,
                None => {
                    let err = LocalInconsistency::ItemNotFound {
                        list_id: list_id.clone(),
                        item_id: item_id.clone(),
                    };
                    return Err(self.reject(&mut state, "update_item", err.into()));
                }
            }
        };
        let outcome = self.transport.update_item(list_id, item_id, &model).await;

        let mut state = self.state.lock().await;
        match accept(outcome) {
            Ok(_) => {
                state.items.update_item(list_id, item_id, &patch);
                self.resolve(&mut state, "update_item");
                Ok(())
            }
            Err(err) => Err(self.reject(&mut state, "update_item", err)),
        }
    }

    pub async fn delete_item(&self, list_id: &ListId, item_id: &ItemId) -> Result<(), SyncError> {
        self.submit("delete_item").await;
        let outcome = self.transport.delete_item(list_id, item_id).await;

        let mut state = self.state.lock().await;
        match accept(outcome) {
            Ok(_) => {
                state.items.remove_item(list_id, item_id);
                self.resolve(&mut state, "delete_item");
                Ok(())
            }
            Err(err) => Err(self.reject(&mut state, "delete_item", err)),
        }
    }

    async fn submit(&self, command: &'static str) {
        let mut state = self.state.lock().await;
        debug!(command, "command submitted");
        self.set_status(&mut state, RequestStatus::Loading);
    }

    /// Like `submit`, but a list the store does not know fails the command
    /// before any remote call.
    async fn submit_for_list(
        &self,
        command: &'static str,
        list_id: &ListId,
    ) -> Result<(), SyncError> {
        let mut state = self.state.lock().await;
        debug!(command, %list_id, "command submitted");
        self.set_status(&mut state, RequestStatus::Loading);
        if !state.lists.contains(list_id) {
            let err = LocalInconsistency::ListNotFound {
                list_id: list_id.clone(),
            };
            return Err(self.reject(&mut state, command, err.into()));
        }
        state.lists.set_entity_status(list_id, RequestStatus::Loading);
        Ok(())
    }

    fn resolve(&self, state: &mut SyncState, command: &'static str) {
        debug!(command, "command resolved");
        self.set_status(state, RequestStatus::Succeeded);
    }

    fn reject(&self, state: &mut SyncState, command: &'static str, err: SyncError) -> SyncError {
        match &err {
            SyncError::Transport(source) => error!(command, %source, "transport failure"),
            SyncError::DomainRejection(rejection) => {
                warn!(command, code = ?rejection.code, %rejection, "server rejected command")
            }
            SyncError::LocalInconsistency(source) => {
                warn!(command, %source, "local state inconsistent")
            }
        }
        let message = err.global_message();
        state.status.set_global_error(Some(message.clone()));
        let _ = self.events.send(SyncEvent::Error(message));
        self.set_status(state, RequestStatus::Failed);
        err
    }

    fn set_status(&self, state: &mut SyncState, status: RequestStatus) {
        state.status.set_global_status(status);
        let _ = self.events.send(SyncEvent::StatusChanged(status));
    }

    fn apply_structural(&self, state: &mut SyncState, event: StructuralEvent) {
        state.propagate(&event);
        let _ = self.events.send(SyncEvent::Structural(event));
    }
}

fn accept<D>(outcome: Result<ApiResponse<D>, TransportError>) -> Result<D, SyncError> {
    Ok(outcome?.into_result()?)
}

#[cfg(test)]
#[path = "tests/executor_tests.rs"]
mod tests;
