//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, OptionalExtension, Row, params_from_iter};
use rusqlite::types::Value;
use crate::{Result, Error};
use crate::model::{self, ListId, Todo, TodoId, TodoList};
use super::{schema, Store};

const LIST_WITH_COUNTS_COLUMNS: &str = r#"
SELECT l.id,
       l.name,
       COUNT(t.id) AS todos_count,
       SUM(CASE WHEN t.id IS NOT NULL AND NOT t.completed THEN 1 ELSE 0 END) AS todos_remaining_count
FROM lists l
LEFT JOIN todos t ON t.list_id = l.id
"#;

/// SQLite-backed list store. One instance corresponds to one connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Close the connection, reporting any error SQLite raises while doing so
    pub fn disconnect(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::Storage(e))
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        self.conn.pragma_update(None, "foreign_keys", true)?;
        self.conn.create_collation(schema::NAME_COLLATION, model::compare_names)?;
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Query Helpers ==========

    fn log_statement(sql: &str, params: &[Value]) {
        tracing::info!("{} : {:?}", sql.trim(), params);
    }

    /// Run a statement that returns no rows; yields the number of changed rows
    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize> {
        Self::log_statement(sql, params);
        Ok(self.conn.execute(sql, params_from_iter(params))?)
    }

    fn query_map<T, F>(&self, sql: &str, params: &[Value], f: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        Self::log_statement(sql, params);
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(params), f)?;
        rows.collect::<rusqlite::Result<Vec<T>>>().map_err(Into::into)
    }

    fn exists(&self, sql: &str, params: &[Value]) -> Result<bool> {
        Self::log_statement(sql, params);
        let mut stmt = self.conn.prepare(sql)?;
        Ok(stmt.exists(params_from_iter(params))?)
    }

    fn find_todos_for_list(&self, list_id: ListId) -> Result<Vec<Todo>> {
        self.query_map(
            "SELECT id, name, completed FROM todos WHERE list_id = ?1 ORDER BY id",
            &[Value::from(list_id)],
            |row| {
                Ok(Todo {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    completed: row.get(2)?,
                })
            },
        )
    }

    /// Helper to convert an aggregate row into a list without its todos
    fn row_to_list(row: &Row<'_>) -> rusqlite::Result<TodoList> {
        let count: i64 = row.get(2)?;
        let remaining: i64 = row.get(3)?;
        Ok(TodoList::with_counts(
            row.get(0)?,
            row.get::<_, String>(1)?,
            Vec::new(),
            count as usize,
            remaining as usize,
        ))
    }

    fn attach_todos(&self, mut list: TodoList) -> Result<TodoList> {
        list.todos = self.find_todos_for_list(list.id)?;
        Ok(list)
    }
}

impl Store for SqliteStore {
    fn find_list(&self, id: ListId) -> Result<Option<TodoList>> {
        let sql = format!("{} WHERE l.id = ?1 GROUP BY l.id, l.name", LIST_WITH_COUNTS_COLUMNS);
        let params = [Value::from(id)];
        Self::log_statement(&sql, &params);

        let list = self
            .conn
            .query_row(&sql, params_from_iter(&params), Self::row_to_list)
            .optional()?;

        list.map(|l| self.attach_todos(l)).transpose()
    }

    fn all_lists(&self) -> Result<Vec<TodoList>> {
        let sql = format!(
            "{} GROUP BY l.id, l.name ORDER BY todos_remaining_count DESC, l.name ASC",
            LIST_WITH_COUNTS_COLUMNS
        );
        let lists = self.query_map(&sql, &[], Self::row_to_list)?;

        lists.into_iter().map(|l| self.attach_todos(l)).collect()
    }

    fn existing_list(&self, name: &str) -> Result<bool> {
        self.exists(
            "SELECT 1 FROM lists WHERE name = ?1 COLLATE UNICODE_NOCASE",
            &[Value::from(name.to_owned())],
        )
    }

    fn new_list(&mut self, name: &str) -> Result<()> {
        self.execute(
            "INSERT INTO lists (name) VALUES (?1)",
            &[Value::from(name.to_owned())],
        )?;
        Ok(())
    }

    fn delete_list(&mut self, id: ListId) -> Result<()> {
        self.execute("DELETE FROM lists WHERE id = ?1", &[Value::from(id)])?;
        Ok(())
    }

    fn update_list_name(&mut self, id: ListId, new_name: &str) -> Result<()> {
        self.execute(
            "UPDATE lists SET name = ?1 WHERE id = ?2",
            &[Value::from(new_name.to_owned()), Value::from(id)],
        )?;
        Ok(())
    }

    fn create_new_todo(&mut self, list_id: ListId, name: &str) -> Result<()> {
        // Inserts nothing when the parent list is gone
        let inserted = self.execute(
            "INSERT INTO todos (name, list_id) SELECT ?1, id FROM lists WHERE id = ?2",
            &[Value::from(name.to_owned()), Value::from(list_id)],
        )?;
        if inserted == 0 {
            return Err(Error::ListNotFound(list_id));
        }
        Ok(())
    }

    fn existing_todo(&self, list_id: ListId, name: &str) -> Result<bool> {
        self.exists(
            "SELECT 1 FROM todos WHERE list_id = ?1 AND name = ?2 COLLATE UNICODE_NOCASE",
            &[Value::from(list_id), Value::from(name.to_owned())],
        )
    }

    fn delete_todo(&mut self, list_id: ListId, todo_id: TodoId) -> Result<()> {
        self.execute(
            "DELETE FROM todos WHERE list_id = ?1 AND id = ?2",
            &[Value::from(list_id), Value::from(todo_id)],
        )?;
        Ok(())
    }

    fn update_todo_status(&mut self, list_id: ListId, todo_id: TodoId, completed: bool) -> Result<()> {
        self.execute(
            "UPDATE todos SET completed = ?1 WHERE list_id = ?2 AND id = ?3",
            &[Value::from(completed), Value::from(list_id), Value::from(todo_id)],
        )?;
        Ok(())
    }

    fn mark_all_todos_as_completed(&mut self, list_id: ListId) -> Result<()> {
        self.execute(
            "UPDATE todos SET completed = 1 WHERE list_id = ?1",
            &[Value::from(list_id)],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Log sink shared between the subscriber and the test
    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLog {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn list_id_by_name(store: &SqliteStore, name: &str) -> ListId {
        store
            .all_lists()
            .unwrap()
            .into_iter()
            .find(|l| l.name == name)
            .unwrap()
            .id
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        store.new_list("First").unwrap();
        store.new_list("Second").unwrap();
        let second = list_id_by_name(&store, "Second");
        store.delete_list(second).unwrap();
        store.new_list("Third").unwrap();

        assert!(list_id_by_name(&store, "Third") > second);
    }

    #[test]
    fn test_delete_list_cascades_to_todos() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.new_list("Trip").unwrap();
        let id = list_id_by_name(&store, "Trip");
        store.create_new_todo(id, "Passport").unwrap();

        store.delete_list(id).unwrap();

        let orphans: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM todos", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_name_match_is_exact_not_pattern() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.new_list("Work").unwrap();

        assert!(store.existing_list("WORK").unwrap());
        assert!(!store.existing_list("W%").unwrap());
        assert!(!store.existing_list("Wor_").unwrap());
    }

    #[test]
    fn test_every_query_logs_statement_and_params() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            store.new_list("Work").unwrap();
            assert!(store.existing_list("Work").unwrap());
            assert!(store.find_list(1).unwrap().is_some());
        });

        let output = log.contents();
        assert!(output.contains("INSERT INTO lists (name) VALUES (?1)"), "{output}");
        assert!(output.contains("SELECT 1 FROM lists WHERE name = ?1"), "{output}");
        assert!(output.contains("Text(\"Work\")"), "{output}");
        assert!(output.contains("WHERE l.id = ?1"), "{output}");
        assert!(output.contains("SELECT id, name, completed FROM todos"), "{output}");
        assert!(output.contains("Integer(1)"), "{output}");
    }

    #[test]
    fn test_unicode_collation_is_registered_on_file_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.db");

        let mut store = SqliteStore::open(&path).unwrap();
        store.new_list("Ärger").unwrap();
        store.disconnect().unwrap();

        let store = SqliteStore::open(&path).unwrap();
        assert!(store.existing_list("ÄRGER").unwrap());
        assert!(store.existing_list("ärger").unwrap());
        assert!(!store.existing_list("arger").unwrap());
    }

    #[test]
    fn test_file_backed_store_survives_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.db");

        let mut store = SqliteStore::open(&path).unwrap();
        store.new_list("Groceries").unwrap();
        let id = list_id_by_name(&store, "Groceries");
        store.create_new_todo(id, "Milk").unwrap();
        store.disconnect().unwrap();

        let store = SqliteStore::open(&path).unwrap();
        let list = store.find_list(id).unwrap().unwrap();
        assert_eq!(list.name, "Groceries");
        assert_eq!(list.todos_count(), 1);
        assert_eq!(list.todos[0].name, "Milk");
    }
}
