//! Caller-side name checks
//!
//! Stores accept any name. Request handlers normalize user input and run
//! these checks before calling `new_list`, `update_list_name` or
//! `create_new_todo`.

use std::sync::OnceLock;
use regex::Regex;
use crate::model::ListId;
use crate::storage::Store;
use crate::Result;

/// Inclusive bounds for a list name, in characters
pub const LIST_NAME_MIN: usize = 1;
pub const LIST_NAME_MAX: usize = 100;

static REPEATED_SPACES: OnceLock<Regex> = OnceLock::new();

/// A name the caller must refuse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("List name must be between 1 and 100 characters.")]
    ListNameLength,

    #[error("There is an existing '{0}' list. Please provide a unique list name.")]
    DuplicateList(String),

    #[error("Item description must be at least 1 character in length.")]
    EmptyTodo,

    #[error("'{0}' is already on the list.")]
    DuplicateTodo(String),
}

/// Trim surrounding whitespace and squeeze runs of spaces into one
pub fn normalize_name(raw: &str) -> String {
    let re = REPEATED_SPACES.get_or_init(|| Regex::new(" {2,}").expect("static regex"));
    re.replace_all(raw.trim(), " ").into_owned()
}

pub fn validate_list_name(store: &dyn Store, name: &str) -> Result<()> {
    let len = name.chars().count();
    if !(LIST_NAME_MIN..=LIST_NAME_MAX).contains(&len) {
        return Err(ValidationError::ListNameLength.into());
    }
    if store.existing_list(name)? {
        return Err(ValidationError::DuplicateList(name.to_string()).into());
    }
    Ok(())
}

pub fn validate_todo_name(store: &dyn Store, list_id: ListId, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ValidationError::EmptyTodo.into());
    }
    if store.existing_todo(list_id, name)? {
        return Err(ValidationError::DuplicateTodo(name.to_string()).into());
    }
    Ok(())
}
