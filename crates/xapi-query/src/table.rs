use crate::{variant::Variant, variants};
use std::fmt;
use xapi_model::{ApiError, Result};

variants! {
    /// Tables owned by the server itself.
    pub enum SystemTable("system table", SYSTEM_TABLES) {
        Blob => "blob", "Blob";
        BlobFile => "blob_file", "Blob File";
        BlobObject => "blob_object", "Blob Object";
        Database => "database", "Database";
        DatabaseFile => "database_file", "Database File";
        DatabaseObject => "database_object", "Database Object";
        Field => "field", "Field";
        FieldFile => "field_file", "Field File";
        FieldObject => "field_object", "Field Object";
        Group => "group", "Group";
        GroupFile => "group_file", "Group File";
        GroupObject => "group_object", "Group Object";
        Notification => "notification", "Notification";
        Post => "post", "Post";
        PrivDatabase => "priv_database", "Priv Database";
        PrivGroup => "priv_group", "Priv Group";
        RecordLink => "record_link", "Record Link";
        Request => "request", "Request";
        Store => "store", "Store";
        Task => "task", "Task";
        TaskEvent => "task_event", "Task Event";
        TaskFile => "task_file", "Task File";
        TaskThread => "task_thread", "Task Thread";
        Team => "team", "Team";
        TeamFile => "team_file", "Team File";
        TeamObject => "team_object", "Team Object";
        TeamSubscription => "team_subscription", "Team Subscription";
        User => "user", "User";
        UserFile => "user_file", "User File";
        UserObject => "user_object", "User Object";
        UserSubscription => "user_subscription", "User Subscription";
    }
}

variants! {
    /// Tables that exist once per user database.
    pub enum DatabaseTable("database table", DATABASE_TABLES) {
        Record => "record", "Record";
        Trash => "trash", "Trash";
        Log => "log", "Log";
        LogEdit => "log_edit", "Log Edit";
    }
}

/// Either kind of table, as referenced by a column expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    System(SystemTable),
    Database(DatabaseTable),
}

impl Table {
    pub fn parse(value: &str) -> Result<Self> {
        if let Ok(table) = SystemTable::parse(value) {
            return Ok(Table::System(table));
        }
        DatabaseTable::parse(value)
            .map(Table::Database)
            .map_err(|_| ApiError::unknown("table", value))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Table::System(t) => t.name(),
            Table::Database(t) => t.name(),
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Table::System(_))
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::System(t) => write!(f, "{t}"),
            Table::Database(t) => write!(f, "{t}"),
        }
    }
}

impl From<SystemTable> for Table {
    fn from(table: SystemTable) -> Self {
        Table::System(table)
    }
}

impl From<DatabaseTable> for Table {
    fn from(table: DatabaseTable) -> Self {
        Table::Database(table)
    }
}
