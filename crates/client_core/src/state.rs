use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use shared::{domain::ListId, protocol::Item};
use tracing::error;

use crate::{
    events::{StructuralEvent, StructuralSubscriber},
    items::ItemStore,
    lists::{ListEntity, ListStore},
    status::AppStatus,
};

/// Both stores plus the global status record. Owned by a single `SyncClient`.
#[derive(Debug, Clone, Default)]
pub struct SyncState {
    pub(crate) status: AppStatus,
    pub(crate) lists: ListStore,
    pub(crate) items: ItemStore,
}

impl SyncState {
    pub fn status(&self) -> &AppStatus {
        &self.status
    }

    pub fn lists(&self) -> &ListStore {
        &self.lists
    }

    pub fn items(&self) -> &ItemStore {
        &self.items
    }

    /// Applies a structural event to every subscribed store in one step.
    pub(crate) fn propagate(&mut self, event: &StructuralEvent) {
        let subscribers: [&mut dyn StructuralSubscriber; 2] = [&mut self.lists, &mut self.items];
        for subscriber in subscribers {
            subscriber.apply_structural(event);
        }
        if !self.buckets_match_lists() {
            error!(event = event.name(), "item buckets diverged from known lists");
            debug_assert!(false, "item buckets diverged after {}", event.name());
        }
    }

    /// True when the item buckets are keyed by exactly the known list ids.
    pub fn buckets_match_lists(&self) -> bool {
        let list_ids: HashSet<&ListId> = self.lists.ids().collect();
        let bucket_ids: HashSet<&ListId> = self.items.list_ids().collect();
        list_ids == bucket_ids
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        SyncSnapshot {
            status: self.status.clone(),
            lists: self.lists.lists().to_vec(),
            items: self
                .items
                .list_ids()
                .map(|id| {
                    let bucket = self.items.items(id).unwrap_or_default().to_vec();
                    (id.clone(), bucket)
                })
                .collect(),
        }
    }
}

/// Owned copy of the state, safe to hand to readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncSnapshot {
    pub status: AppStatus,
    pub lists: Vec<ListEntity>,
    pub items: BTreeMap<ListId, Vec<Item>>,
}

impl SyncSnapshot {
    pub fn list(&self, id: &ListId) -> Option<&ListEntity> {
        self.lists.iter().find(|list| &list.id == id)
    }

    pub fn items_for(&self, id: &ListId) -> Option<&[Item]> {
        self.items.get(id).map(Vec::as_slice)
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
