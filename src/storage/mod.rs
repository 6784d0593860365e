//! Storage Layer - one list/todo contract, two backends
//!
//! - [`SqliteStore`]: tables `lists(id, name)` and `todos(id, name, completed, list_id)`,
//!   counts aggregated in SQL
//! - [`SessionStore`]: explicit [`SessionState`] passed in and handed back,
//!   counts recomputed by iteration
//!
//! Neither backend checks names for length or uniqueness; callers do that
//! through `existing_list`/`existing_todo` (see [`crate::validation`]).

pub mod schema;
pub mod session;
pub mod sqlite;

pub use session::{SessionState, SessionStore};
pub use sqlite::SqliteStore;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::model::{ListId, TodoId, TodoList};
use crate::{Error, Result};

/// Persistence contract shared by every backend.
///
/// Mutations aimed at a list or todo that does not exist are no-ops, except
/// [`Store::create_new_todo`] which reports [`Error::ListNotFound`].
pub trait Store {
    /// Retrieve one list with its todos and counts; `None` when absent
    fn find_list(&self, id: ListId) -> Result<Option<TodoList>>;

    /// Every list, most outstanding work first, ties broken by name
    fn all_lists(&self) -> Result<Vec<TodoList>>;

    /// Case-insensitive existence check by list name
    fn existing_list(&self, name: &str) -> Result<bool>;

    fn new_list(&mut self, name: &str) -> Result<()>;

    /// Remove a list together with all of its todos
    fn delete_list(&mut self, id: ListId) -> Result<()>;

    fn update_list_name(&mut self, id: ListId, new_name: &str) -> Result<()>;

    /// Append an incomplete todo to a list
    fn create_new_todo(&mut self, list_id: ListId, name: &str) -> Result<()>;

    /// Case-insensitive existence check scoped to one list
    fn existing_todo(&self, list_id: ListId, name: &str) -> Result<bool>;

    fn delete_todo(&mut self, list_id: ListId, todo_id: TodoId) -> Result<()>;

    fn update_todo_status(&mut self, list_id: ListId, todo_id: TodoId, completed: bool) -> Result<()>;

    fn mark_all_todos_as_completed(&mut self, list_id: ListId) -> Result<()>;
}

/// Which backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Sqlite,
    Session,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Sqlite => "sqlite",
            BackendKind::Session => "session",
        }
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sqlite" | "db" | "database" => Ok(BackendKind::Sqlite),
            "session" | "memory" => Ok(BackendKind::Session),
            _ => Err(Error::InvalidBackend(s.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// SQLite database file
    Sqlite(PathBuf),
    /// JSON file holding serialized session state
    Session(PathBuf),
}

impl StoreLocation {
    pub fn kind(&self) -> BackendKind {
        match self {
            StoreLocation::Sqlite(_) => BackendKind::Sqlite,
            StoreLocation::Session(_) => BackendKind::Session,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            StoreLocation::Sqlite(path) | StoreLocation::Session(path) => path,
        }
    }
}

/// Acquire a store for the duration of `f` and release it afterwards.
///
/// The SQLite connection is closed whether or not `f` succeeds. Session
/// state is written back only after `f` succeeds.
pub fn with_store<T, E, F>(location: &StoreLocation, f: F) -> std::result::Result<T, E>
where
    F: FnOnce(&mut dyn Store) -> std::result::Result<T, E>,
    E: From<Error>,
{
    match location {
        StoreLocation::Sqlite(path) => {
            let mut store = SqliteStore::open(path)?;
            tracing::debug!("Opened database {}", path.display());
            let result = f(&mut store);
            let closed = store.disconnect();
            let value = result?;
            closed?;
            Ok(value)
        }
        StoreLocation::Session(path) => {
            let state = SessionState::load(path)?;
            let mut store = SessionStore::new(state);
            let value = f(&mut store)?;
            store.into_state().save(path)?;
            tracing::debug!("Saved session state to {}", path.display());
            Ok(value)
        }
    }
}
