//! Request handlers - one per user action, each working on an acquired store

use std::path::Path;
use owo_colors::OwoColorize;
use crate::config::{write_config, TodosConfig};
use crate::model::{sort_todos, ListId, TodoId, TodoList};
use crate::output::{emit_success, is_quiet, OutputMode};
use crate::storage::Store;
use crate::ui::{self, Icons};
use crate::validation::{normalize_name, validate_list_name, validate_todo_name};
use crate::Error;

/// Fetch a list or report that it does not exist
pub fn load_list(store: &dyn Store, id: ListId) -> crate::Result<TodoList> {
    store.find_list(id)?.ok_or(Error::ListNotFound(id))
}

fn announce(mode: OutputMode, command: &str, message: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if mode.is_human() {
        if !is_quiet() {
            ui::success(message);
        }
        Ok(())
    } else {
        emit_success(mode, command, data)
    }
}

pub fn run_lists(store: &dyn Store, mode: OutputMode) -> anyhow::Result<()> {
    let lists = store.all_lists()?;

    if !mode.is_human() {
        return emit_success(mode, "lists", serde_json::to_value(&lists)?);
    }

    if lists.is_empty() {
        println!("{} No lists yet.", Icons::EMPTY);
    } else {
        println!("{}", ui::lists_table(&lists));
    }
    Ok(())
}

pub fn run_show(store: &dyn Store, mode: OutputMode, id: ListId) -> anyhow::Result<()> {
    let list = load_list(store, id)?;

    if !mode.is_human() {
        return emit_success(mode, "show", serde_json::to_value(&list)?);
    }

    let title = format!("{} ({}/{} remaining)", list.name, list.todos_remaining_count(), list.todos_count());
    if list.is_all_done() {
        ui::header(&format!("{}", title.style(ui::theme().success.clone())));
    } else {
        ui::header(&title);
    }

    if list.todos.is_empty() {
        println!("  {}", ui::muted("No todos yet."));
    }
    for todo in sort_todos(&list.todos) {
        ui::todo_line(todo);
    }
    Ok(())
}

pub fn run_new_list(store: &mut dyn Store, mode: OutputMode, raw_name: &str) -> anyhow::Result<()> {
    let name = normalize_name(raw_name);
    validate_list_name(store, &name)?;

    store.new_list(&name)?;
    tracing::debug!("Created list {:?}", name);
    announce(mode, "new-list", "The list has been created.", serde_json::json!({ "name": name }))
}

pub fn run_rename(store: &mut dyn Store, mode: OutputMode, id: ListId, raw_name: &str) -> anyhow::Result<()> {
    load_list(store, id)?;
    let name = normalize_name(raw_name);
    validate_list_name(store, &name)?;

    store.update_list_name(id, &name)?;
    announce(mode, "rename", "The list has been updated.", serde_json::json!({ "id": id, "name": name }))
}

pub fn run_delete_list(store: &mut dyn Store, mode: OutputMode, id: ListId) -> anyhow::Result<()> {
    store.delete_list(id)?;
    announce(mode, "delete-list", "The list has been deleted.", serde_json::json!({ "id": id }))
}

pub fn run_add_todo(store: &mut dyn Store, mode: OutputMode, list_id: ListId, raw_name: &str) -> anyhow::Result<()> {
    load_list(store, list_id)?;
    let name = normalize_name(raw_name);
    validate_todo_name(store, list_id, &name)?;

    store.create_new_todo(list_id, &name)?;
    announce(
        mode,
        "add",
        "The todo item has been added.",
        serde_json::json!({ "list_id": list_id, "name": name }),
    )
}

fn ensure_todo(store: &dyn Store, list_id: ListId, todo_id: TodoId) -> crate::Result<()> {
    let list = load_list(store, list_id)?;
    if list.todo(todo_id).is_none() {
        return Err(Error::TodoNotFound { list_id, todo_id });
    }
    Ok(())
}

pub fn run_delete_todo(store: &mut dyn Store, mode: OutputMode, list_id: ListId, todo_id: TodoId) -> anyhow::Result<()> {
    ensure_todo(store, list_id, todo_id)?;

    store.delete_todo(list_id, todo_id)?;
    announce(
        mode,
        "remove",
        "The item has been deleted.",
        serde_json::json!({ "list_id": list_id, "todo_id": todo_id }),
    )
}

pub fn run_set_status(
    store: &mut dyn Store,
    mode: OutputMode,
    list_id: ListId,
    todo_id: TodoId,
    completed: bool,
) -> anyhow::Result<()> {
    ensure_todo(store, list_id, todo_id)?;

    store.update_todo_status(list_id, todo_id, completed)?;
    announce(
        mode,
        if completed { "check" } else { "uncheck" },
        "The todo has been updated.",
        serde_json::json!({ "list_id": list_id, "todo_id": todo_id, "completed": completed }),
    )
}

pub fn run_complete_all(store: &mut dyn Store, mode: OutputMode, list_id: ListId) -> anyhow::Result<()> {
    load_list(store, list_id)?;

    store.mark_all_todos_as_completed(list_id)?;
    announce(mode, "complete-all", "All done!", serde_json::json!({ "list_id": list_id }))
}

pub fn run_init(mode: OutputMode, path: &Path, config: &TodosConfig, force: bool) -> anyhow::Result<()> {
    write_config(path, config, force)?;
    if mode.is_human() {
        ui::success("Config written.");
        ui::info("Path", &path.display().to_string());
        Ok(())
    } else {
        emit_success(mode, "init", serde_json::json!({ "path": path.display().to_string() }))
    }
}
