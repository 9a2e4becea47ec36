use super::{NotificationKind, NotificationRecord, NotificationStore, SledNotificationStore};
use tempfile::tempdir;

fn store() -> (SledNotificationStore, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let store = SledNotificationStore::open(dir.path()).unwrap();
    (store, dir)
}

fn record(message: &str) -> NotificationRecord {
    NotificationRecord::new(NotificationKind::Like, message)
        .from_user("bob")
        .about("post-1")
}

#[test]
fn test_append_preserves_order() {
    let (store, _dir) = store();
    for n in 0..20 {
        store.append("alice", &record(&format!("n{n}"))).unwrap();
    }

    let messages: Vec<String> = store
        .list("alice")
        .unwrap()
        .into_iter()
        .map(|r| r.message)
        .collect();
    let expected: Vec<String> = (0..20).map(|n| format!("n{n}")).collect();
    assert_eq!(messages, expected);
}

#[test]
fn test_lists_are_per_user() {
    let (store, _dir) = store();
    store.append("alice", &record("for alice")).unwrap();
    store.append("bob", &record("for bob")).unwrap();

    assert_eq!(store.list("alice").unwrap().len(), 1);
    assert_eq!(store.list("bob").unwrap()[0].message, "for bob");
    assert!(store.list("carol").unwrap().is_empty());
}

#[test]
fn test_mark_read_selected_and_all() {
    let (store, _dir) = store();
    let first = record("first");
    let second = record("second");
    let third = record("third");
    for r in [&first, &second, &third] {
        store.append("alice", r).unwrap();
    }
    assert_eq!(store.unread_count("alice").unwrap(), 3);

    let changed = store
        .mark_read("alice", Some(&[second.id.clone()]))
        .unwrap();
    assert_eq!(changed, 1);
    assert_eq!(store.unread_count("alice").unwrap(), 2);

    let list = store.list("alice").unwrap();
    assert!(!list[0].read);
    assert!(list[1].read);
    assert_eq!(list[1].message, "second");

    assert_eq!(store.mark_read("alice", None).unwrap(), 2);
    assert_eq!(store.unread_count("alice").unwrap(), 0);
    assert_eq!(store.mark_read("alice", None).unwrap(), 0);
}

#[test]
fn test_delete_selected_and_clear() {
    let (store, _dir) = store();
    let keep = record("keep");
    let gone = record("gone");
    store.append("alice", &keep).unwrap();
    store.append("alice", &gone).unwrap();

    assert_eq!(store.delete("alice", Some(&[gone.id.clone()])).unwrap(), 1);
    let list = store.list("alice").unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, keep.id);

    store.append("alice", &record("later")).unwrap();
    assert_eq!(store.delete("alice", None).unwrap(), 2);
    assert!(store.list("alice").unwrap().is_empty());
}

#[test]
fn test_unknown_ids_change_nothing() {
    let (store, _dir) = store();
    store.append("alice", &record("only")).unwrap();
    let ids = vec!["missing".to_string()];

    assert_eq!(store.mark_read("alice", Some(&ids)).unwrap(), 0);
    assert_eq!(store.delete("alice", Some(&ids)).unwrap(), 0);
    assert_eq!(store.list("alice").unwrap().len(), 1);
}

#[test]
fn test_records_round_trip_optional_fields() {
    let (store, _dir) = store();
    let reply = NotificationRecord::new(NotificationKind::Reply, "bob replied to your comment")
        .from_user("bob")
        .about("post-1")
        .on_comment("comment-9");
    store.append("alice", &reply).unwrap();

    let stored = &store.list("alice").unwrap()[0];
    assert_eq!(stored, &reply);
    assert_eq!(stored.comment_id.as_deref(), Some("comment-9"));
}

#[test]
fn test_record_json_shape() {
    let r = NotificationRecord::new(NotificationKind::AdminBroadcast, "Title: body");
    let value = serde_json::to_value(&r).unwrap();
    assert_eq!(value["kind"], "admin_broadcast");
    assert_eq!(value["read"], false);
    assert!(value.get("sourceUserId").is_none());
}
