use super::*;

#[test]
fn stats_keys_are_scoped_by_user() {
    let id = Uuid::nil();
    assert_eq!(stats_key(id), "liftbook_stats_00000000-0000-0000-0000-000000000000");
    assert_eq!(stats_ts_key(id), "liftbook_stats_00000000-0000-0000-0000-000000000000_ts");
}

#[test]
fn memory_store_set_get_remove() {
    let mut store = MemoryStore::new();
    store.set("k", "v".into()).expect("set");
    assert_eq!(store.get("k").as_deref(), Some("v"));
    store.remove("k").expect("remove");
    assert!(store.get("k").is_none());
    store.remove("k").expect("removing a missing key succeeds");
}

#[test]
fn load_json_treats_corrupt_value_as_absent() {
    let mut store = MemoryStore::new();
    store.set("k", "{not json".into()).expect("set");
    assert_eq!(load_json::<Vec<u32>>(&store, "k"), None);
}

#[test]
fn save_then_load_json() {
    let mut store = MemoryStore::new();
    save_json(&mut store, "nums", &vec![1, 2, 3]).expect("save");
    assert_eq!(load_json::<Vec<u32>>(&store, "nums"), Some(vec![1, 2, 3]));
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("store.json");

    let mut store = FileStore::open(&path).expect("open");
    store.set(THEME_KEY, "dark".into()).expect("set");
    store.set(SESSION_KEY, "{}".into()).expect("set");
    store.remove(SESSION_KEY).expect("remove");

    let reopened = FileStore::open(&path).expect("reopen");
    assert_eq!(reopened.get(THEME_KEY).as_deref(), Some("dark"));
    assert!(reopened.get(SESSION_KEY).is_none());
}

#[test]
fn file_store_recovers_from_corrupt_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    std::fs::write(&path, "garbage").expect("write");

    let mut store = FileStore::open(&path).expect("open");
    assert!(store.get(THEME_KEY).is_none());
    store.set(THEME_KEY, "light".into()).expect("set");
    assert_eq!(FileStore::open(&path).expect("reopen").get(THEME_KEY).as_deref(), Some("light"));
}
