use std::collections::HashMap;

use shared::{
    domain::{FilterValue, ItemId, ItemStatus, ListId},
    protocol::{Item, ItemPatch},
};
use tracing::warn;

use crate::events::{StructuralEvent, StructuralSubscriber};

/// Items bucketed by owning list. Buckets are only created and dropped by
/// structural events; item operations never allocate one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemStore {
    buckets: HashMap<ListId, Vec<Item>>,
}

impl ItemStore {
    pub fn items(&self, list_id: &ListId) -> Option<&[Item]> {
        self.buckets.get(list_id).map(Vec::as_slice)
    }

    pub fn find(&self, list_id: &ListId, item_id: &ItemId) -> Option<&Item> {
        self.buckets
            .get(list_id)?
            .iter()
            .find(|item| &item.id == item_id)
    }

    pub fn list_ids(&self) -> impl Iterator<Item = &ListId> {
        self.buckets.keys()
    }

    pub fn visible_items(&self, list_id: &ListId, filter: FilterValue) -> Vec<&Item> {
        let Some(bucket) = self.buckets.get(list_id) else {
            return Vec::new();
        };
        bucket
            .iter()
            .filter(|item| match filter {
                FilterValue::All => true,
                FilterValue::Active => item.status != ItemStatus::Done,
                FilterValue::Completed => item.status == ItemStatus::Done,
            })
            .collect()
    }

    pub fn set_items_for_list(&mut self, list_id: &ListId, items: Vec<Item>) -> bool {
        match self.buckets.get_mut(list_id) {
            Some(bucket) => {
                *bucket = items;
                true
            }
            None => {
                warn!(list_id = %list_id, "set_items_for_list: no bucket for list");
                false
            }
        }
    }

    pub fn insert_item(&mut self, item: Item) -> bool {
        match self.buckets.get_mut(&item.todo_list_id) {
            Some(bucket) => {
                bucket.insert(0, item);
                true
            }
            None => {
                warn!(list_id = %item.todo_list_id, item_id = %item.id, "insert_item: no bucket for list");
                false
            }
        }
    }

    pub fn remove_item(&mut self, list_id: &ListId, item_id: &ItemId) -> bool {
        let Some(bucket) = self.buckets.get_mut(list_id) else {
            warn!(list_id = %list_id, item_id = %item_id, "remove_item: no bucket for list");
            return false;
        };
        match bucket.iter().position(|item| &item.id == item_id) {
            Some(index) => {
                bucket.remove(index);
                true
            }
            None => {
                warn!(list_id = %list_id, item_id = %item_id, "remove_item: item not present");
                false
            }
        }
    }

    pub fn update_item(&mut self, list_id: &ListId, item_id: &ItemId, patch: &ItemPatch) -> bool {
        let found = self
            .buckets
            .get_mut(list_id)
            .and_then(|bucket| bucket.iter_mut().find(|item| &item.id == item_id));
        match found {
            Some(item) => {
                item.merge(patch);
                true
            }
            None => {
                warn!(list_id = %list_id, item_id = %item_id, "update_item: item not present");
                false
            }
        }
    }
}

impl StructuralSubscriber for ItemStore {
    fn apply_structural(&mut self, event: &StructuralEvent) {
        match event {
            StructuralEvent::ListCreated(list) => {
                // A refresh may already have allocated this bucket and filled it.
                self.buckets.entry(list.id.clone()).or_default();
            }
            StructuralEvent::ListDeleted(id) => {
                self.buckets.remove(id);
            }
            StructuralEvent::ListsReplaced(lists) => {
                // Items are reloaded per list on demand.
                self.buckets = lists
                    .iter()
                    .map(|list| (list.id.clone(), Vec::new()))
                    .collect();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use shared::{domain::ItemPriority, protocol::TodoList};

    use super::*;

    fn item(id: &str, list_id: &str, title: &str, status: ItemStatus) -> Item {
        Item {
            id: ItemId::from(id),
            todo_list_id: ListId::from(list_id),
            title: title.into(),
            description: None,
            status,
            priority: ItemPriority::Low,
            start_date: None,
            deadline: None,
            order: 0,
            added_date: String::new(),
        }
    }

    fn store_with_bucket(list_id: &str) -> ItemStore {
        let mut store = ItemStore::default();
        store.apply_structural(&StructuralEvent::ListCreated(TodoList {
            id: ListId::from(list_id),
            title: "list".into(),
            added_date: String::new(),
            order: 0,
        }));
        store
    }

    #[test]
    fn insert_requires_existing_bucket() {
        let mut store = ItemStore::default();
        assert!(!store.insert_item(item("T1", "L1", "Milk", ItemStatus::New)));
        assert!(store.items(&ListId::from("L1")).is_none());
    }

    #[test]
    fn repeated_list_created_keeps_existing_bucket() {
        let mut store = store_with_bucket("L1");
        store.insert_item(item("T1", "L1", "Milk", ItemStatus::New));

        store.apply_structural(&StructuralEvent::ListCreated(TodoList {
            id: ListId::from("L1"),
            title: "list".into(),
            added_date: String::new(),
            order: 0,
        }));

        assert_eq!(store.items(&ListId::from("L1")).map(<[Item]>::len), Some(1));
    }

    #[test]
    fn insert_places_item_first() {
        let mut store = store_with_bucket("L1");
        store.insert_item(item("T1", "L1", "Milk", ItemStatus::New));
        store.insert_item(item("T2", "L1", "Bread", ItemStatus::New));

        let titles: Vec<&str> = store
            .items(&ListId::from("L1"))
            .expect("bucket")
            .iter()
            .map(|i| i.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Bread", "Milk"]);
    }

    #[test]
    fn update_merges_and_missing_item_is_noop() {
        let mut store = store_with_bucket("L1");
        store.insert_item(item("T1", "L1", "Milk", ItemStatus::New));
        let list_id = ListId::from("L1");

        assert!(store.update_item(
            &list_id,
            &ItemId::from("T1"),
            &ItemPatch::default().status(ItemStatus::Done)
        ));
        let updated = store.find(&list_id, &ItemId::from("T1")).expect("item");
        assert_eq!(updated.title, "Milk");
        assert_eq!(updated.status, ItemStatus::Done);

        let before = store.clone();
        assert!(!store.update_item(
            &list_id,
            &ItemId::from("T9"),
            &ItemPatch::default().title("ghost")
        ));
        assert_eq!(store, before);
    }

    #[test]
    fn remove_item_by_id() {
        let mut store = store_with_bucket("L1");
        store.insert_item(item("T1", "L1", "Milk", ItemStatus::New));
        let list_id = ListId::from("L1");

        assert!(store.remove_item(&list_id, &ItemId::from("T1")));
        assert!(!store.remove_item(&list_id, &ItemId::from("T1")));
        assert_eq!(store.items(&list_id).map(<[Item]>::len), Some(0));
    }

    #[test]
    fn visible_items_follow_filter() {
        let mut store = store_with_bucket("L1");
        store.insert_item(item("T1", "L1", "Milk", ItemStatus::Done));
        store.insert_item(item("T2", "L1", "Bread", ItemStatus::InProgress));
        let list_id = ListId::from("L1");

        assert_eq!(store.visible_items(&list_id, FilterValue::All).len(), 2);
        let active = store.visible_items(&list_id, FilterValue::Active);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "Bread");
        let completed = store.visible_items(&list_id, FilterValue::Completed);
        assert_eq!(completed[0].title, "Milk");
    }

    #[test]
    fn set_items_for_unknown_list_does_not_create_bucket() {
        let mut store = ItemStore::default();
        let list_id = ListId::from("L1");
        assert!(!store.set_items_for_list(&list_id, vec![item("T1", "L1", "Milk", ItemStatus::New)]));
        assert!(store.items(&list_id).is_none());
    }
}
