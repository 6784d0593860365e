//! # Todos - named to-do lists with interchangeable storage
//!
//! Todos provides:
//! - A uniform [`Store`] contract for lists and their todo items
//! - A SQLite-backed store that aggregates counts in SQL
//! - A session-backed store over explicit, serializable state
//! - Caller-side validation of list and todo names

pub mod model;
pub mod storage;
pub mod validation;
pub mod config;
pub mod output;
pub mod ui;
pub mod commands;

// Re-exports for convenient access
pub use model::{ListId, Todo, TodoId, TodoList};
pub use storage::{SessionState, SessionStore, SqliteStore, Store, StoreLocation, with_store};
pub use validation::ValidationError;

/// Result type alias for Todos operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Todos operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session state error: {0}")]
    Session(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("The specified list was not found. (id {0})")]
    ListNotFound(ListId),

    #[error("The specified todo was not found. (id {todo_id} in list {list_id})")]
    TodoNotFound { list_id: ListId, todo_id: TodoId },

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("No ids left to assign after {0}")]
    IdsExhausted(i64),

    #[error("Unknown backend: {0}")]
    InvalidBackend(String),
}
