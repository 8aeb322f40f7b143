// Schema Bootstrap (spec section 4.5, section 6)
//
// The schema and table name are configurable, so the checked-in SQL template uses `{{schema}}` /
// `{{table}}` placeholders rather than hardcoding "queue"/"jobs"; `PostgresStoreConfig::validate`
// has already rejected anything that isn't a safe identifier before this runs.

use crate::connection::PostgresStoreConfig;
use queue_core::error::ConfigurationError;
use sqlx::PgPool;
use tracing::info;

const INITIAL_SCHEMA: &str = include_str!("../migrations/001_initial_schema.sql");

/// Idempotent: safe to call on every process start (spec section 4.2 — `initialize()` is
/// idempotent, though not concurrency-safe against itself; callers must sequence it before
/// first use, per spec section 5).
pub async fn run_migrations(
    pool: &PgPool,
    config: &PostgresStoreConfig,
) -> Result<(), ConfigurationError> {
    config.validate()?;
    info!(schema = %config.schema, table = %config.table, "bootstrapping queue schema");

    let sql = INITIAL_SCHEMA
        .replace("{{schema}}", &config.schema)
        .replace("{{table}}", &config.table);

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| ConfigurationError(format!("failed to begin migration transaction: {e}")))?;

    for statement in split_statements(&sql) {
        sqlx::query(&statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| ConfigurationError(format!("migration statement failed: {e}")))?;
    }

    tx.commit()
        .await
        .map_err(|e| ConfigurationError(format!("failed to commit migration: {e}")))?;

    info!("schema bootstrap complete");
    Ok(())
}

/// Split on `;`, stripping `--` comments and blank statements.
fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|statement| {
            statement
                .lines()
                .filter(|line| !line.trim().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .filter(|statement| !statement.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_statements_drops_comments_and_blanks() {
        let sql = "-- comment\nCREATE TABLE a (id int);\n\n-- another\nCREATE INDEX b ON a (id);";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].starts_with("CREATE TABLE"));
        assert!(statements[1].starts_with("CREATE INDEX"));
    }
}
