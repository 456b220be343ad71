use crate::model::SessionRecord;

/// Persistence seam for the session store.
///
/// Implementations own their connection handling. Errors pass through
/// unwrapped so the caller sees the driver failure as-is.
#[async_trait::async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create the backing schema and table when they do not exist yet.
    /// Safe to run against an existing table.
    async fn create_schema(&self) -> anyhow::Result<()>;

    /// Fetch the row for `id`, expired or not.
    async fn fetch(&self, id: &str) -> anyhow::Result<Option<SessionRecord>>;

    /// Insert the record, or replace payload and expiry when the id already
    /// exists. Must be a single atomic statement.
    async fn upsert(&self, record: &SessionRecord) -> anyhow::Result<()>;

    /// Delete the row for `id`; an absent row is not an error.
    async fn delete(&self, id: &str) -> anyhow::Result<()>;

    /// Delete every row whose expiry is at or before `cutoff_s` (epoch
    /// seconds). Returns the number of rows removed.
    async fn delete_expired(&self, cutoff_s: f64) -> anyhow::Result<u64>;
}
