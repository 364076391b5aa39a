//! Structural signals shared by the list and item stores.

use shared::{
    domain::{ListId, RequestStatus},
    protocol::TodoList,
};

/// Changes to the set of known lists. Every store that indexes by list id
/// consumes these and nothing else from the list side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralEvent {
    ListCreated(TodoList),
    ListDeleted(ListId),
    ListsReplaced(Vec<TodoList>),
}

impl StructuralEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StructuralEvent::ListCreated(_) => "list_created",
            StructuralEvent::ListDeleted(_) => "list_deleted",
            StructuralEvent::ListsReplaced(_) => "lists_replaced",
        }
    }
}

pub trait StructuralSubscriber {
    fn apply_structural(&mut self, event: &StructuralEvent);
}

/// Broadcast to observers outside the state container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Structural(StructuralEvent),
    StatusChanged(RequestStatus),
    Error(String),
}
