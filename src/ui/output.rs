use crate::model::Todo;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::LIST, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted.clone()).to_string()
}

/// One todo; completed items are struck through
pub fn todo_line(todo: &Todo) {
    if todo.completed {
        println!(
            "  {} {} {}",
            Icons::DONE.style(theme().success.clone()),
            dim(&format!("#{}", todo.id)),
            todo.name.style(theme().done.clone())
        );
    } else {
        println!("  {} {} {}", Icons::OPEN, dim(&format!("#{}", todo.id)), todo.name);
    }
}
