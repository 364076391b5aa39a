use serde::Serialize;
use shared::{
    domain::{FilterValue, ListId, RequestStatus},
    protocol::TodoList,
};
use tracing::{debug, warn};

use crate::events::{StructuralEvent, StructuralSubscriber};

/// Server list plus the client-only display state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntity {
    pub id: ListId,
    pub title: String,
    pub added_date: String,
    pub order: i64,
    pub filter: FilterValue,
    pub entity_status: RequestStatus,
}

impl From<TodoList> for ListEntity {
    fn from(list: TodoList) -> Self {
        Self {
            id: list.id,
            title: list.title,
            added_date: list.added_date,
            order: list.order,
            filter: FilterValue::All,
            entity_status: RequestStatus::Idle,
        }
    }
}

/// Lists in display order, most recently created first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListStore {
    lists: Vec<ListEntity>,
}

impl ListStore {
    pub fn lists(&self) -> &[ListEntity] {
        &self.lists
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn get(&self, id: &ListId) -> Option<&ListEntity> {
        self.lists.iter().find(|list| &list.id == id)
    }

    pub fn contains(&self, id: &ListId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ListId> {
        self.lists.iter().map(|list| &list.id)
    }

    /// Adds `list` at the front. A list already known under the same id (a refresh
    /// can land before the create that produced it) is updated in place instead,
    /// keeping its position and client state. Returns whether a new entry was added.
    pub fn insert(&mut self, list: TodoList) -> bool {
        if let Some(existing) = self.lists.iter_mut().find(|known| known.id == list.id) {
            debug!(list_id = %list.id, "insert: list already present, refreshing in place");
            existing.title = list.title;
            existing.added_date = list.added_date;
            existing.order = list.order;
            return false;
        }
        self.lists.insert(0, ListEntity::from(list));
        true
    }

    pub fn remove(&mut self, id: &ListId) -> bool {
        match self.lists.iter().position(|list| &list.id == id) {
            Some(index) => {
                self.lists.remove(index);
                true
            }
            None => {
                warn!(list_id = %id, "remove: list not present");
                false
            }
        }
    }

    pub fn rename_title(&mut self, id: &ListId, title: &str) -> bool {
        self.with_list(id, "rename_title", |list| list.title = title.to_string())
    }

    pub fn set_filter(&mut self, id: &ListId, filter: FilterValue) -> bool {
        self.with_list(id, "set_filter", |list| list.filter = filter)
    }

    pub fn set_entity_status(&mut self, id: &ListId, status: RequestStatus) -> bool {
        self.with_list(id, "set_entity_status", |list| list.entity_status = status)
    }

    /// Discards every list and all client-side state, then rebuilds from `lists`.
    pub fn replace_all(&mut self, lists: Vec<TodoList>) {
        self.lists = lists.into_iter().map(ListEntity::from).collect();
    }

    fn with_list(
        &mut self,
        id: &ListId,
        operation: &'static str,
        apply: impl FnOnce(&mut ListEntity),
    ) -> bool {
        match self.lists.iter_mut().find(|list| &list.id == id) {
            Some(list) => {
                apply(list);
                true
            }
            None => {
                warn!(list_id = %id, operation, "list not present");
                false
            }
        }
    }
}

impl StructuralSubscriber for ListStore {
    fn apply_structural(&mut self, event: &StructuralEvent) {
        match event {
            StructuralEvent::ListCreated(list) => {
                self.insert(list.clone());
            }
            StructuralEvent::ListDeleted(id) => {
                self.remove(id);
            }
            StructuralEvent::ListsReplaced(lists) => self.replace_all(lists.clone()),
        }
    }
}
