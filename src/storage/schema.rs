//! Database schema definitions

/// Collation registered on every connection for case-insensitive name
/// matching; folds the full Unicode range, unlike the built-in NOCASE
pub const NAME_COLLATION: &str = "UNICODE_NOCASE";

/// SQL to create the lists table
pub const CREATE_LISTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS lists (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
)
"#;

/// SQL to create the todos table
/// Rows are removed together with their owning list
pub const CREATE_TODOS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT 0,
    list_id INTEGER NOT NULL REFERENCES lists(id) ON DELETE CASCADE
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_todos_list ON todos(list_id)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_LISTS_TABLE, CREATE_TODOS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
