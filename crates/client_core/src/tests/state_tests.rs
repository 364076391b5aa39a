use super::*;
use shared::{
    domain::{FilterValue, ItemId, ItemPriority, ItemStatus, RequestStatus},
    protocol::TodoList,
};

fn list(id: &str) -> TodoList {
    TodoList {
        id: ListId::from(id),
        title: format!("list {id}"),
        added_date: String::new(),
        order: 0,
    }
}

fn item(id: &str, list_id: &str) -> Item {
    Item {
        id: ItemId::from(id),
        todo_list_id: ListId::from(list_id),
        title: format!("item {id}"),
        description: None,
        status: ItemStatus::New,
        priority: ItemPriority::Low,
        start_date: None,
        deadline: None,
        order: 0,
        added_date: String::new(),
    }
}

#[test]
fn list_created_allocates_empty_bucket() {
    let mut state = SyncState::default();
    state.propagate(&StructuralEvent::ListCreated(list("L1")));

    assert!(state.buckets_match_lists());
    assert_eq!(state.items().items(&ListId::from("L1")), Some(&[][..]));
}

#[test]
fn list_deleted_discards_bucket_with_items() {
    let mut state = SyncState::default();
    state.propagate(&StructuralEvent::ListCreated(list("L1")));
    state.propagate(&StructuralEvent::ListCreated(list("L2")));
    state.items.insert_item(item("T1", "L1"));

    state.propagate(&StructuralEvent::ListDeleted(ListId::from("L1")));

    assert!(state.buckets_match_lists());
    assert!(state.lists().get(&ListId::from("L1")).is_none());
    assert!(state.items().items(&ListId::from("L1")).is_none());
    assert!(state.items().items(&ListId::from("L2")).is_some());
}

#[test]
fn lists_replaced_resets_surviving_buckets_and_drops_stale_ones() {
    let mut state = SyncState::default();
    state.propagate(&StructuralEvent::ListCreated(list("L1")));
    state.propagate(&StructuralEvent::ListCreated(list("OLD")));
    state.items.insert_item(item("T1", "L1"));
    state.lists.set_filter(&ListId::from("L1"), FilterValue::Active);

    state.propagate(&StructuralEvent::ListsReplaced(vec![list("L1"), list("L2")]));

    assert!(state.buckets_match_lists());
    assert_eq!(state.items().items(&ListId::from("L1")), Some(&[][..]));
    assert!(state.items().items(&ListId::from("OLD")).is_none());
    let survivor = state.lists().get(&ListId::from("L1")).expect("L1");
    assert_eq!(survivor.filter, FilterValue::All);
    assert_eq!(survivor.entity_status, RequestStatus::Idle);
}

#[test]
fn replacing_twice_equals_replacing_once() {
    let incoming = vec![list("L1"), list("L2"), list("L3")];

    let mut once = SyncState::default();
    once.propagate(&StructuralEvent::ListCreated(list("X")));
    once.propagate(&StructuralEvent::ListsReplaced(incoming.clone()));

    let mut twice = once.clone();
    twice.propagate(&StructuralEvent::ListsReplaced(incoming));

    assert_eq!(once.snapshot(), twice.snapshot());
}

#[test]
fn bucket_parity_holds_across_mixed_sequence() {
    let mut state = SyncState::default();
    let events = vec![
        StructuralEvent::ListsReplaced(vec![list("A"), list("B")]),
        StructuralEvent::ListCreated(list("C")),
        StructuralEvent::ListDeleted(ListId::from("A")),
        StructuralEvent::ListDeleted(ListId::from("missing")),
        StructuralEvent::ListCreated(list("D")),
        StructuralEvent::ListsReplaced(vec![list("D")]),
        StructuralEvent::ListCreated(list("D")),
        StructuralEvent::ListDeleted(ListId::from("D")),
    ];
    for event in &events {
        state.propagate(event);
        assert!(state.buckets_match_lists(), "diverged after {}", event.name());
    }
    assert!(state.lists().is_empty());
}

#[test]
fn snapshot_exposes_lists_and_buckets() {
    let mut state = SyncState::default();
    state.propagate(&StructuralEvent::ListCreated(list("L1")));
    state.items.insert_item(item("T1", "L1"));

    let snapshot = state.snapshot();
    assert_eq!(snapshot.lists.len(), 1);
    let bucket = snapshot.items_for(&ListId::from("L1")).expect("bucket");
    assert_eq!(bucket[0].id, ItemId::from("T1"));
    assert_eq!(snapshot.list(&ListId::from("L1")).map(|l| l.title.as_str()), Some("list L1"));
}
