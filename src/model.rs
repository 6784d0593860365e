//! Domain types - lists and the todo items they own
//!
//! A [`TodoList`] exclusively owns its [`Todo`]s. Aggregate counts are
//! filled in by whichever backend produced the list and are read-only
//! afterwards.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Identifier of a list, assigned by the store
pub type ListId = i64;

/// Identifier of a todo, unique within its parent list
pub type TodoId = i64;

/// A single actionable item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    /// Create an incomplete todo
    pub fn new(id: TodoId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            completed: false,
        }
    }
}

/// A named, ordered collection of todos with derived counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoList {
    pub id: ListId,
    pub name: String,
    pub todos: Vec<Todo>,
    todos_count: usize,
    todos_remaining_count: usize,
}

impl TodoList {
    /// Build a list and count its todos by iteration
    pub fn new(id: ListId, name: impl Into<String>, todos: Vec<Todo>) -> Self {
        let todos_count = todos.len();
        let todos_remaining_count = todos.iter().filter(|t| !t.completed).count();
        Self {
            id,
            name: name.into(),
            todos,
            todos_count,
            todos_remaining_count,
        }
    }

    /// Build a list whose counts were computed by the storage layer
    pub fn with_counts(
        id: ListId,
        name: impl Into<String>,
        todos: Vec<Todo>,
        todos_count: usize,
        todos_remaining_count: usize,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            todos,
            todos_count,
            todos_remaining_count,
        }
    }

    pub fn todos_count(&self) -> usize {
        self.todos_count
    }

    pub fn todos_remaining_count(&self) -> usize {
        self.todos_remaining_count
    }

    /// A list is done when it has todos and none of them are outstanding
    pub fn is_all_done(&self) -> bool {
        self.todos_count > 0 && self.todos_remaining_count == 0
    }

    /// Find a todo by id
    pub fn todo(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }
}

/// Name comparison used for list and todo uniqueness: Unicode case folding.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Ordering used by `all_lists`: more outstanding work first, then by name.
pub fn compare_lists(a: &TodoList, b: &TodoList) -> Ordering {
    b.todos_remaining_count
        .cmp(&a.todos_remaining_count)
        .then_with(|| a.name.cmp(&b.name))
}

/// Sort lists in place with [`compare_lists`]
pub fn sort_lists(lists: &mut [TodoList]) {
    lists.sort_by(compare_lists);
}

/// Incomplete todos first; the relative order inside each group is kept.
pub fn sort_todos(todos: &[Todo]) -> Vec<&Todo> {
    let mut sorted: Vec<&Todo> = todos.iter().collect();
    sorted.sort_by_key(|t| t.completed);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn done(id: TodoId, name: &str) -> Todo {
        Todo {
            id,
            name: name.to_string(),
            completed: true,
        }
    }

    #[test]
    fn test_counts_from_todos() {
        let list = TodoList::new(1, "Groceries", vec![done(0, "Milk"), Todo::new(1, "Eggs")]);
        assert_eq!(list.todos_count(), 2);
        assert_eq!(list.todos_remaining_count(), 1);
        assert!(!list.is_all_done());
    }

    #[test]
    fn test_empty_list_is_not_done() {
        let list = TodoList::new(1, "Empty", Vec::new());
        assert_eq!(list.todos_remaining_count(), 0);
        assert!(!list.is_all_done());
    }

    #[test]
    fn test_all_done() {
        let list = TodoList::new(1, "Chores", vec![done(0, "Dishes"), done(1, "Laundry")]);
        assert!(list.is_all_done());
    }

    #[test]
    fn test_sort_lists_by_remaining_then_name() {
        let mut lists = vec![
            TodoList::with_counts(1, "A", Vec::new(), 2, 0),
            TodoList::with_counts(2, "C", Vec::new(), 3, 3),
            TodoList::with_counts(3, "B", Vec::new(), 3, 3),
        ];
        sort_lists(&mut lists);
        let names: Vec<&str> = lists.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["B", "C", "A"]);
    }

    #[test]
    fn test_compare_names_folds_unicode_case() {
        assert_eq!(compare_names("Ärger", "ärger"), Ordering::Equal);
        assert_eq!(compare_names("ÖL", "öl"), Ordering::Equal);
        assert_ne!(compare_names("Öl", "Ol"), Ordering::Equal);
    }

    #[test]
    fn test_sort_todos_keeps_incomplete_first() {
        let todos = vec![done(0, "a"), Todo::new(1, "b"), done(2, "c"), Todo::new(3, "d")];
        let ids: Vec<TodoId> = sort_todos(&todos).iter().map(|t| t.id).collect();
        assert_eq!(ids, [1, 3, 0, 2]);
    }
}
