use todo_list::db::{get_item, set_item, TODOS_KEY};
use todo_list::{ensure_schema, Config, LoadOutcome, SqliteRepository, TodoStore};

fn open_store(config: &Config) -> TodoStore<SqliteRepository> {
    let conn = ensure_schema(&config.db_path()).unwrap();
    TodoStore::new(SqliteRepository::new(conn))
}

#[test]
fn todos_survive_a_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = Config::in_dir(dir.path());

    let mut store = open_store(&config);
    assert_eq!(store.load().unwrap(), LoadOutcome::Loaded { count: 0 });
    let milk = store.add("buy milk").unwrap().unwrap();
    store.add("walk dog").unwrap();
    let taxes = store.add("file taxes").unwrap().unwrap();
    store.toggle(milk).unwrap();
    store.delete(taxes).unwrap();
    let expected = store.todos().to_vec();
    drop(store);

    let mut reopened = open_store(&config);
    assert_eq!(reopened.load().unwrap(), LoadOutcome::Loaded { count: 2 });
    assert_eq!(reopened.todos(), expected.as_slice());
    assert!(reopened.get(milk).unwrap().completed);
}

#[test]
fn stored_json_matches_record_shape() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = Config::in_dir(dir.path());

    let mut store = open_store(&config);
    let id = store.add("buy milk").unwrap().unwrap();

    let raw = get_item(store.repository().connection(), TODOS_KEY)
        .unwrap()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{ "id": id.to_string(), "text": "buy milk", "completed": false }])
    );
}

#[test]
fn corrupt_storage_recovers_and_is_overwritten_on_next_change() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = Config::in_dir(dir.path());

    {
        let conn = ensure_schema(&config.db_path()).unwrap();
        set_item(&conn, TODOS_KEY, "[{\"id\": ").unwrap();
    }

    let mut store = open_store(&config);
    assert_eq!(store.load().unwrap(), LoadOutcome::Recovered);
    assert!(store.is_empty());

    store.add("start over").unwrap();
    drop(store);

    let mut reopened = open_store(&config);
    assert_eq!(reopened.load().unwrap(), LoadOutcome::Loaded { count: 1 });
}
