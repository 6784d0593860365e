use tabled::{settings::Style, Table, Tabled};
use crate::model::TodoList;

#[derive(Tabled)]
pub struct ListRow {
    #[tabled(rename = "Id")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Remaining")]
    pub remaining: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl From<&TodoList> for ListRow {
    fn from(list: &TodoList) -> Self {
        let status = if list.is_all_done() {
            "complete"
        } else if list.todos_count() == 0 {
            "empty"
        } else {
            "open"
        };
        Self {
            id: list.id,
            name: list.name.clone(),
            remaining: format!("{} / {}", list.todos_remaining_count(), list.todos_count()),
            status: status.to_string(),
        }
    }
}

pub fn lists_table(lists: &[TodoList]) -> String {
    if lists.is_empty() {
        return String::new();
    }

    let rows: Vec<ListRow> = lists.iter().map(ListRow::from).collect();
    Table::new(&rows).with(Style::rounded()).to_string()
}
