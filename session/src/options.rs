use std::time::Duration;

/// Session store configuration.
///
/// `schema` and `table` are consumed by the repository when it renders SQL;
/// `create` and `cleanup_time` drive the store's setup and sweep behavior.
#[derive(Debug, Clone)]
pub struct SessionStoreOptions {
    /// Postgres schema holding the session table.
    pub schema: String,

    /// Session table name.
    pub table: String,

    /// Issue `CREATE SCHEMA / CREATE TABLE IF NOT EXISTS` during setup.
    pub create: bool,

    /// Interval between cleanup sweeps. Re-read before every sweep, so it
    /// can be changed between runs.
    pub cleanup_time: Duration,
}

impl Default for SessionStoreOptions {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
            table: "session".to_string(),
            create: true,
            cleanup_time: Duration::from_secs(45 * 60),
        }
    }
}
