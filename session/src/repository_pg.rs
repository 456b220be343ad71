use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::model::SessionRecord;
use crate::options::SessionStoreOptions;
use crate::repository::SessionRepository;

/// Postgres-backed implementation of `SessionRepository`.
/// Responsible only for persistence and row mapping.
///
/// Schema and table names are rendered into statements through
/// [`quote_ident`]; session ids, payloads and expiries are always bound
/// parameters.
pub struct PgSessionRepository {
    pool: PgPool,
    schema: String,
    table: String,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool, options: &SessionStoreOptions) -> Self {
        Self {
            pool,
            schema: options.schema.clone(),
            table: options.table.clone(),
        }
    }

    /// Open a fresh pool against `database_url`.
    pub async fn connect(
        database_url: &str,
        options: &SessionStoreOptions,
    ) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(16)
            .connect(database_url)
            .await?;

        Ok(Self::new(pool, options))
    }

    fn qualified_table(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&self.table))
    }

    fn create_schema_sql(&self) -> String {
        format!("CREATE SCHEMA IF NOT EXISTS {};", quote_ident(&self.schema))
    }

    fn create_table_sql(&self) -> String {
        format!(
            r#"
CREATE TABLE IF NOT EXISTS {} (
  id TEXT NOT NULL PRIMARY KEY,
  expiry timestamptz NOT NULL,
  session JSONB
);
"#,
            self.qualified_table()
        )
    }

    fn fetch_sql(&self) -> String {
        format!(
            "SELECT session, extract(epoch FROM expiry)::float8 AS expiry_s FROM {} WHERE id = $1;",
            self.qualified_table()
        )
    }

    fn upsert_sql(&self) -> String {
        format!(
            r#"
INSERT INTO {} (id, session, expiry)
VALUES ($1, $2, to_timestamp($3))
ON CONFLICT (id) DO UPDATE SET
    session = excluded.session,
    expiry = excluded.expiry;
"#,
            self.qualified_table()
        )
    }

    fn delete_sql(&self) -> String {
        format!("DELETE FROM {} WHERE id = $1;", self.qualified_table())
    }

    fn cleanup_sql(&self) -> String {
        format!(
            "DELETE FROM {} WHERE expiry <= to_timestamp($1);",
            self.qualified_table()
        )
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create_schema(&self) -> anyhow::Result<()> {
        sqlx::query(&self.create_schema_sql())
            .execute(&self.pool)
            .await?;
        sqlx::query(&self.create_table_sql())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn fetch(&self, id: &str) -> anyhow::Result<Option<SessionRecord>> {
        let row = sqlx::query(&self.fetch_sql())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => {
                let payload: Option<Value> = r.try_get("session")?;
                let expiry_s: f64 = r.try_get("expiry_s")?;

                Ok(Some(SessionRecord {
                    id: id.to_string(),
                    expiry_s,
                    payload: payload.unwrap_or(Value::Null),
                }))
            }
            None => Ok(None),
        }
    }

    async fn upsert(&self, record: &SessionRecord) -> anyhow::Result<()> {
        sqlx::query(&self.upsert_sql())
            .bind(&record.id)
            .bind(&record.payload)
            .bind(record.expiry_s)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        sqlx::query(&self.delete_sql())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_expired(&self, cutoff_s: f64) -> anyhow::Result<u64> {
        let result = sqlx::query(&self.cleanup_sql())
            .bind(cutoff_s)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Quote a SQL identifier the way Postgres' `quote_ident` does: wrap in
/// double quotes, doubling any embedded quote.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    // connect_lazy never touches the network, but pool creation wants a
    // runtime, hence #[tokio::test] below.
    fn repo(schema: &str, table: &str) -> PgSessionRepository {
        PgSessionRepository {
            pool: PgPoolOptions::new()
                .connect_lazy("postgres://localhost/unused")
                .unwrap(),
            schema: schema.to_string(),
            table: table.to_string(),
        }
    }

    #[test]
    fn quote_ident_wraps_and_doubles_quotes() {
        assert_eq!(quote_ident("session"), "\"session\"");
        assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
    }

    #[tokio::test]
    async fn statements_use_quoted_identifiers() {
        let r = repo("public", "session");

        assert_eq!(
            r.fetch_sql(),
            "SELECT session, extract(epoch FROM expiry)::float8 AS expiry_s \
             FROM \"public\".\"session\" WHERE id = $1;"
        );
        assert_eq!(
            r.delete_sql(),
            "DELETE FROM \"public\".\"session\" WHERE id = $1;"
        );
        assert_eq!(
            r.cleanup_sql(),
            "DELETE FROM \"public\".\"session\" WHERE expiry <= to_timestamp($1);"
        );
    }

    #[tokio::test]
    async fn hostile_table_name_cannot_break_out() {
        let r = repo("public", "session\"; DROP TABLE users; --");

        let sql = r.delete_sql();
        // The embedded quote is doubled, so it stays inside the identifier.
        assert!(sql.contains("\"session\"\"; DROP TABLE users; --\""));
        assert!(!sql.contains("session\"; DROP"));
    }

    #[tokio::test]
    async fn upsert_is_a_single_statement() {
        let r = repo("public", "session");
        let sql = r.upsert_sql();

        assert!(sql.contains("ON CONFLICT (id) DO UPDATE"));
        assert!(sql.contains("to_timestamp($3)"));
    }

    #[tokio::test]
    async fn create_table_targets_configured_names() {
        let r = repo("auth", "web_session");

        assert_eq!(
            r.create_schema_sql(),
            "CREATE SCHEMA IF NOT EXISTS \"auth\";"
        );
        assert!(r.create_table_sql().contains("\"auth\".\"web_session\""));
        assert!(r.create_table_sql().contains("id TEXT NOT NULL PRIMARY KEY"));
    }
}
