//! The to-do store: an ordered list plus the pending input text, mirrored to a
//! repository after every change.
//!
//! Every effective mutation runs the same three steps in order: change the
//! in-memory list, tell the subscriber (the view) about it, then write the
//! whole list through the repository. Mutations that find nothing to do skip
//! all three, so the subscriber never sees a spurious change and storage is
//! not rewritten.

use tracing::{debug, info, warn};

use crate::db::{StorageError, TodoRepository};
use crate::models::{Todo, TodoId};

/// Callback invoked with the current list after each effective mutation.
pub type Subscriber = Box<dyn FnMut(&[Todo])>;

/// What `TodoStore::load` found in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Storage was readable; `count` records were restored (zero for a slot
    /// that was never written).
    Loaded { count: usize },
    /// Storage held unreadable data. The store starts empty and the next
    /// mutation overwrites the slot.
    Recovered,
}

/// Ordered list of records plus the pending input, written through `R`.
pub struct TodoStore<R: TodoRepository> {
    todos: Vec<Todo>,
    input: String,
    repo: R,
    subscriber: Option<Subscriber>,
}

impl<R: TodoRepository> TodoStore<R> {
    /// Empty store over `repo`. Call `load` to hydrate it.
    pub fn new(repo: R) -> Self {
        Self {
            todos: Vec::new(),
            input: String::new(),
            repo,
            subscriber: None,
        }
    }

    /// Replace the in-memory list with whatever the repository holds.
    ///
    /// Unreadable stored data is not fatal: the list comes back empty and the
    /// caller gets `LoadOutcome::Recovered`. Query failures still propagate.
    pub fn load(&mut self) -> Result<LoadOutcome, StorageError> {
        match self.repo.load() {
            Ok(todos) => {
                let count = todos.len();
                self.todos = todos;
                debug!(count, "store hydrated");
                Ok(LoadOutcome::Loaded { count })
            }
            Err(StorageError::Malformed(err)) => {
                warn!(error = %err, "stored todos are unreadable, starting with an empty list");
                self.todos.clear();
                Ok(LoadOutcome::Recovered)
            }
            Err(err) => Err(err),
        }
    }

    /// Write the full list through the repository.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        self.repo.save(&self.todos)
    }

    /// Register the change observer, replacing any previous one.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&[Todo]) + 'static) {
        self.subscriber = Some(Box::new(subscriber));
    }

    /// Pending text of the entry field.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Edit the pending text in place. Not a list change, so nothing is
    /// notified or persisted.
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    /// Replace the pending text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Append a new open record for `text` and clear the pending input.
    ///
    /// Whitespace-only text is ignored and leaves the pending input alone.
    /// The stored text is kept exactly as given.
    pub fn add(&mut self, text: &str) -> Result<Option<TodoId>, StorageError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let todo = Todo::new(text);
        let id = todo.id;
        self.todos.push(todo);
        self.input.clear();
        info!(%id, "todo added");

        self.commit()?;
        Ok(Some(id))
    }

    /// `add` applied to the pending input, the Enter/button path.
    pub fn submit(&mut self) -> Result<Option<TodoId>, StorageError> {
        let text = self.input.clone();
        self.add(&text)
    }

    /// Flip completion on the record with `id`. Returns whether one matched.
    pub fn toggle(&mut self, id: TodoId) -> Result<bool, StorageError> {
        let Some(todo) = self.todos.iter_mut().find(|todo| todo.id == id) else {
            return Ok(false);
        };
        todo.toggle();
        debug!(%id, completed = todo.completed, "todo toggled");

        self.commit()?;
        Ok(true)
    }

    /// Remove the record with `id`, returning it if it existed.
    pub fn delete(&mut self, id: TodoId) -> Result<Option<Todo>, StorageError> {
        let Some(index) = self.todos.iter().position(|todo| todo.id == id) else {
            return Ok(None);
        };
        let removed = self.todos.remove(index);
        info!(%id, "todo deleted");

        self.commit()?;
        Ok(Some(removed))
    }

    /// Records in display order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Look up a record by id.
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Number of records, completed or not.
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    /// Whether the list has no records.
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Number of records not yet completed.
    pub fn remaining(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.completed).count()
    }

    /// The repository the list is written through.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        if let Some(subscriber) = self.subscriber.as_mut() {
            subscriber(&self.todos);
        }
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use super::*;
    use crate::db::{open_in_memory, MemoryRepository, SqliteRepository};

    /// Loads fine but refuses every write.
    struct ReadOnlyRepository;

    impl TodoRepository for ReadOnlyRepository {
        fn load(&self) -> Result<Vec<Todo>, StorageError> {
            Ok(Vec::new())
        }

        fn save(&mut self, _todos: &[Todo]) -> Result<(), StorageError> {
            Err(StorageError::Sqlite(rusqlite::Error::InvalidQuery))
        }
    }

    fn store() -> TodoStore<MemoryRepository> {
        TodoStore::new(MemoryRepository::default())
    }

    fn texts<R: TodoRepository>(store: &TodoStore<R>) -> Vec<String> {
        store.todos().iter().map(|todo| todo.text.clone()).collect()
    }

    #[test]
    fn add_to_empty_list_yields_single_open_record() {
        let mut store = store();
        let id = store.add("buy milk").unwrap().unwrap();

        assert_eq!(store.len(), 1);
        let todo = &store.todos()[0];
        assert_eq!(todo.id, id);
        assert_eq!(todo.text, "buy milk");
        assert!(!todo.completed);
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut store = store();
        store.set_input("   ");

        assert_eq!(store.add("").unwrap(), None);
        assert_eq!(store.add(" \t\n").unwrap(), None);
        assert_eq!(store.submit().unwrap(), None);

        assert!(store.is_empty());
        assert_eq!(store.input(), "   ");
        assert_eq!(store.repository().raw(), None);
    }

    #[test]
    fn submit_adds_pending_input_and_clears_it() {
        let mut store = store();
        store.set_input("  water plants ");

        assert!(store.submit().unwrap().is_some());

        assert_eq!(texts(&store), vec!["  water plants ".to_string()]);
        assert_eq!(store.input(), "");
    }

    #[test]
    fn toggling_twice_restores_original_state() {
        let mut store = store();
        let id = store.add("walk dog").unwrap().unwrap();

        assert!(store.toggle(id).unwrap());
        assert!(store.get(id).unwrap().completed);
        assert!(store.toggle(id).unwrap());
        assert!(!store.get(id).unwrap().completed);
    }

    #[test]
    fn toggle_unknown_id_is_noop() {
        let mut store = store();
        store.add("walk dog").unwrap();
        let before = store.repository().raw();

        assert!(!store.toggle(TodoId::new()).unwrap());
        assert_eq!(store.repository().raw(), before);
    }

    #[test]
    fn delete_removes_exactly_one_and_keeps_order() {
        let mut store = store();
        store.add("a").unwrap();
        let b = store.add("b").unwrap().unwrap();
        store.add("c").unwrap();

        let removed = store.delete(b).unwrap().unwrap();

        assert_eq!(removed.text, "b");
        assert_eq!(texts(&store), vec!["a".to_string(), "c".to_string()]);
        assert!(store.delete(b).unwrap().is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn reload_reproduces_sequence_after_each_mutation() {
        let repo = MemoryRepository::default();
        let mut store = TodoStore::new(repo.clone());

        let check = |store: &TodoStore<MemoryRepository>| {
            let mut reloaded = TodoStore::new(repo.clone());
            reloaded.load().unwrap();
            assert_eq!(reloaded.todos(), store.todos());
        };

        let first = store.add("buy milk").unwrap().unwrap();
        check(&store);
        store.add("walk dog").unwrap();
        check(&store);
        store.toggle(first).unwrap();
        check(&store);
        store.delete(first).unwrap();
        check(&store);
    }

    #[test]
    fn sequential_adds_get_distinct_ids() {
        let mut store = store();
        let ids: HashSet<TodoId> = (0..50)
            .map(|n| store.add(&format!("item {n}")).unwrap().unwrap())
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn subscriber_sees_effective_mutations_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = store();
        let sink = Rc::clone(&seen);
        store.subscribe(move |todos| sink.borrow_mut().push(todos.len()));

        let id = store.add("buy milk").unwrap().unwrap();
        store.add("  ").unwrap();
        store.toggle(id).unwrap();
        store.toggle(TodoId::new()).unwrap();
        store.delete(id).unwrap();
        store.delete(id).unwrap();

        assert_eq!(*seen.borrow(), vec![1, 1, 0]);
    }

    #[test]
    fn load_absent_slot_starts_empty() {
        let mut store = store();
        assert_eq!(store.load().unwrap(), LoadOutcome::Loaded { count: 0 });
        assert!(store.is_empty());
    }

    #[test]
    fn load_malformed_slot_recovers_with_empty_list() {
        let mut store = TodoStore::new(MemoryRepository::with_raw("not json at all"));

        assert_eq!(store.load().unwrap(), LoadOutcome::Recovered);
        assert!(store.is_empty());

        store.add("fresh start").unwrap();
        let mut reloaded = TodoStore::new(store.repository().clone());
        assert_eq!(reloaded.load().unwrap(), LoadOutcome::Loaded { count: 1 });
    }

    #[test]
    fn failed_writes_return_error_but_keep_changes() {
        let notified = Rc::new(RefCell::new(0));
        let mut store = TodoStore::new(ReadOnlyRepository);
        let sink = Rc::clone(&notified);
        store.subscribe(move |_| *sink.borrow_mut() += 1);
        store.set_input("buy milk");

        assert!(matches!(store.submit(), Err(StorageError::Sqlite(_))));
        assert_eq!(store.len(), 1);
        assert_eq!(store.input(), "");

        let id = store.todos()[0].id;
        assert!(store.toggle(id).is_err());
        assert!(store.get(id).unwrap().completed);

        assert!(store.delete(id).is_err());
        assert!(store.is_empty());
        assert_eq!(*notified.borrow(), 3);
    }

    #[test]
    fn remaining_counts_open_records() {
        let mut store = store();
        let a = store.add("a").unwrap().unwrap();
        store.add("b").unwrap();
        store.toggle(a).unwrap();

        assert_eq!(store.remaining(), 1);
    }

    #[test]
    fn sqlite_backed_store_round_trips() {
        let mut store = TodoStore::new(SqliteRepository::new(open_in_memory().unwrap()));
        let id = store.add("file taxes").unwrap().unwrap();
        store.toggle(id).unwrap();

        let restored = store.repository().load().unwrap();
        assert_eq!(restored, store.todos());
    }
}
