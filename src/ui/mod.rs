pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dim, error, header, info, muted, success, todo_line};
pub use table::{lists_table, ListRow};
pub use theme::{theme, Theme};
