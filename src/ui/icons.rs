pub struct Icons;

impl Icons {
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const INFO: &str = "ℹ️";
    pub const LIST: &str = "📋";
    pub const DONE: &str = "☑";
    pub const OPEN: &str = "☐";
    pub const EMPTY: &str = "∅";
}
