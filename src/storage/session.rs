//! Session-backed store
//!
//! The host owns a [`SessionState`] (usually deserialized from its session
//! mechanism), hands it to [`SessionStore::new`], and takes it back with
//! [`SessionStore::into_state`] to persist it after the request.

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::model::{self, ListId, Todo, TodoId, TodoList};
use crate::{Error, Result};
use super::Store;

/// A list as it is kept in session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRecord {
    pub id: ListId,
    pub name: String,
    #[serde(default)]
    pub todos: Vec<Todo>,
    /// Lowest id the next todo may take
    #[serde(default)]
    pub next_todo_id: TodoId,
}

impl ListRecord {
    fn to_list(&self) -> TodoList {
        TodoList::new(self.id, self.name.clone(), self.todos.clone())
    }
}

/// Serializable state behind a [`SessionStore`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub lists: Vec<ListRecord>,
    /// Lowest id the next list may take
    pub next_list_id: ListId,
}

impl SessionState {
    /// Load state from a JSON file; a missing file is an empty session
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write state to a JSON file, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Next id for a collection and the high-water mark that follows it.
///
/// The id is one past the largest id present, but never below `high_water`
/// so deleted ids are not handed out again.
fn next_id<I>(ids: I, high_water: i64) -> Result<(i64, i64)>
where
    I: IntoIterator<Item = i64>,
{
    let after_max = match ids.into_iter().max() {
        Some(max) => max.checked_add(1).ok_or(Error::IdsExhausted(max))?,
        None => 0,
    };
    let id = after_max.max(high_water);
    let following = id.checked_add(1).ok_or(Error::IdsExhausted(id))?;
    Ok((id, following))
}

fn same_name(a: &str, b: &str) -> bool {
    model::compare_names(a, b).is_eq()
}

/// In-memory store over explicit session state.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: SessionState,
}

impl SessionStore {
    pub fn new(state: SessionState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Give the (possibly mutated) state back to the caller for persisting
    pub fn into_state(self) -> SessionState {
        self.state
    }

    fn record(&self, id: ListId) -> Option<&ListRecord> {
        self.state.lists.iter().find(|l| l.id == id)
    }

    fn record_mut(&mut self, id: ListId) -> Option<&mut ListRecord> {
        self.state.lists.iter_mut().find(|l| l.id == id)
    }
}

impl Store for SessionStore {
    fn find_list(&self, id: ListId) -> Result<Option<TodoList>> {
        Ok(self.record(id).map(ListRecord::to_list))
    }

    fn all_lists(&self) -> Result<Vec<TodoList>> {
        let mut lists: Vec<TodoList> = self.state.lists.iter().map(ListRecord::to_list).collect();
        model::sort_lists(&mut lists);
        Ok(lists)
    }

    fn existing_list(&self, name: &str) -> Result<bool> {
        Ok(self.state.lists.iter().any(|l| same_name(&l.name, name)))
    }

    fn new_list(&mut self, name: &str) -> Result<()> {
        let (id, following) = next_id(self.state.lists.iter().map(|l| l.id), self.state.next_list_id)?;
        self.state.next_list_id = following;
        self.state.lists.push(ListRecord {
            id,
            name: name.to_string(),
            todos: Vec::new(),
            next_todo_id: 0,
        });
        Ok(())
    }

    fn delete_list(&mut self, id: ListId) -> Result<()> {
        self.state.lists.retain(|l| l.id != id);
        Ok(())
    }

    fn update_list_name(&mut self, id: ListId, new_name: &str) -> Result<()> {
        if let Some(list) = self.record_mut(id) {
            list.name = new_name.to_string();
        }
        Ok(())
    }

    fn create_new_todo(&mut self, list_id: ListId, name: &str) -> Result<()> {
        let list = self.record_mut(list_id).ok_or(Error::ListNotFound(list_id))?;
        let (id, following) = next_id(list.todos.iter().map(|t| t.id), list.next_todo_id)?;
        list.next_todo_id = following;
        list.todos.push(Todo::new(id, name));
        Ok(())
    }

    fn existing_todo(&self, list_id: ListId, name: &str) -> Result<bool> {
        Ok(self
            .record(list_id)
            .is_some_and(|l| l.todos.iter().any(|t| same_name(&t.name, name))))
    }

    fn delete_todo(&mut self, list_id: ListId, todo_id: TodoId) -> Result<()> {
        if let Some(list) = self.record_mut(list_id) {
            list.todos.retain(|t| t.id != todo_id);
        }
        Ok(())
    }

    fn update_todo_status(&mut self, list_id: ListId, todo_id: TodoId, completed: bool) -> Result<()> {
        if let Some(todo) = self
            .record_mut(list_id)
            .and_then(|l| l.todos.iter_mut().find(|t| t.id == todo_id))
        {
            todo.completed = completed;
        }
        Ok(())
    }

    fn mark_all_todos_as_completed(&mut self, list_id: ListId) -> Result<()> {
        if let Some(list) = self.record_mut(list_id) {
            list.todos.iter_mut().for_each(|t| t.completed = true);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_ids_start_at_zero() {
        let mut store = SessionStore::default();
        store.new_list("First").unwrap();
        store.create_new_todo(0, "Item").unwrap();

        let state = store.state();
        assert_eq!(state.lists[0].id, 0);
        assert_eq!(state.lists[0].todos[0].id, 0);
    }

    #[test]
    fn test_ids_follow_max_and_are_not_reused() {
        let mut store = SessionStore::default();
        for name in ["a", "b", "c"] {
            store.new_list(name).unwrap();
        }
        store.delete_list(2).unwrap();
        store.new_list("d").unwrap();

        let ids: Vec<ListId> = store.state().lists.iter().map(|l| l.id).collect();
        assert_eq!(ids, [0, 1, 3]);
    }

    #[test]
    fn test_todo_ids_are_per_list() {
        let mut store = SessionStore::default();
        store.new_list("one").unwrap();
        store.new_list("two").unwrap();
        store.create_new_todo(0, "x").unwrap();
        store.create_new_todo(0, "y").unwrap();
        store.create_new_todo(1, "z").unwrap();

        let state = store.into_state();
        assert_eq!(state.lists[0].todos.iter().map(|t| t.id).collect::<Vec<_>>(), [0, 1]);
        assert_eq!(state.lists[1].todos[0].id, 0);
    }

    #[test]
    fn test_next_id_respects_existing_state_without_counter() {
        // State written before counters existed only carries ids
        let json = r#"{"lists":[{"id":4,"name":"Legacy","todos":[{"id":2,"name":"t","completed":true}]}]}"#;
        let state: SessionState = serde_json::from_str(json).unwrap();
        let mut store = SessionStore::new(state);

        store.new_list("Fresh").unwrap();
        store.create_new_todo(4, "u").unwrap();

        let list = store.find_list(5).unwrap().unwrap();
        assert_eq!(list.name, "Fresh");
        assert_eq!(store.find_list(4).unwrap().unwrap().todo(3).unwrap().name, "u");
    }

    #[test]
    fn test_exhausted_ids_are_an_error_not_a_wrap() {
        let json = format!(
            r#"{{"lists":[{{"id":{max},"name":"Edge","todos":[{{"id":{max},"name":"t"}}]}}]}}"#,
            max = i64::MAX
        );
        let state: SessionState = serde_json::from_str(&json).unwrap();
        let mut store = SessionStore::new(state.clone());

        assert!(matches!(store.new_list("Next"), Err(Error::IdsExhausted(i64::MAX))));
        assert!(matches!(store.create_new_todo(i64::MAX, "u"), Err(Error::IdsExhausted(i64::MAX))));
        assert_eq!(store.into_state(), state);
    }

    #[test]
    fn test_high_water_mark_at_limit_is_an_error() {
        let state = SessionState {
            lists: Vec::new(),
            next_list_id: i64::MAX,
        };
        let mut store = SessionStore::new(state);

        assert!(matches!(store.new_list("Last"), Err(Error::IdsExhausted(i64::MAX))));
        assert!(store.state().lists.is_empty());
    }

    #[test]
    fn test_unicode_case_insensitive_names() {
        let mut store = SessionStore::default();
        store.new_list("Ärger").unwrap();
        assert!(store.existing_list("ärger").unwrap());
    }

    #[test]
    fn test_state_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        assert_eq!(SessionState::load(&path).unwrap(), SessionState::default());

        let mut store = SessionStore::default();
        store.new_list("Saved").unwrap();
        store.create_new_todo(0, "Kept").unwrap();
        let state = store.into_state();
        state.save(&path).unwrap();

        assert_eq!(SessionState::load(&path).unwrap(), state);
    }

    #[test]
    fn test_corrupt_state_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(SessionState::load(&path), Err(Error::Session(_))));
    }
}
