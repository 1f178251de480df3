// storage/store.rs
// Append-only analysis log

use std::str::FromStr;

use async_trait::async_trait;
use log::error;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::models::{parse_findings, AnalysisLogEntry, NewLogEntry};
use crate::error_handling::DatabaseError;
use crate::models::Network;
use crate::security::MaxSeverity;

const SELECT_COLUMNS: &str = "id, original_url, final_url, timestamp, network, max_severity, \
     findings, title, thumbnail, size_approx";

/// Persistence of analysis log entries.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Appends an entry and returns the stored row.
    async fn append(&self, entry: NewLogEntry) -> Result<AnalysisLogEntry, DatabaseError>;

    /// All entries, newest first (`timestamp DESC, id DESC`).
    async fn list(&self) -> Result<Vec<AnalysisLogEntry>, DatabaseError>;
}

/// `LogStore` backed by the `analysis_logs` SQLite table.
#[derive(Debug, Clone)]
pub struct SqliteLogStore {
    pool: SqlitePool,
}

impl SqliteLogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl LogStore for SqliteLogStore {
    async fn append(&self, entry: NewLogEntry) -> Result<AnalysisLogEntry, DatabaseError> {
        let sql = format!(
            "INSERT INTO analysis_logs (
                original_url, final_url, timestamp, network, max_severity,
                findings, title, thumbnail, size_approx
            ) VALUES (?, ?, COALESCE(?, CAST(strftime('%s', 'now') AS INTEGER)), ?, ?, ?, ?, ?, ?)
            RETURNING {}",
            SELECT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&entry.original_url)
            .bind(&entry.final_url)
            .bind(entry.timestamp)
            .bind(entry.network.to_string())
            .bind(entry.max_severity.to_string())
            .bind(&entry.findings)
            .bind(&entry.title)
            .bind(&entry.thumbnail)
            .bind(entry.size_approx)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to append analysis log for {}: {e}", entry.original_url);
                DatabaseError::SqlError(e)
            })?;
        row_to_entry(&row)
    }

    async fn list(&self) -> Result<Vec<AnalysisLogEntry>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM analysis_logs ORDER BY timestamp DESC, id DESC",
            SELECT_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await.map_err(|e| {
            error!("Failed to list analysis logs: {e}");
            DatabaseError::SqlError(e)
        })?;
        rows.iter().map(row_to_entry).collect()
    }
}

fn row_to_entry(row: &SqliteRow) -> Result<AnalysisLogEntry, DatabaseError> {
    let id: i64 = row.try_get("id")?;
    let network: String = row.try_get("network")?;
    let max_severity: String = row.try_get("max_severity")?;
    let findings: String = row.try_get("findings")?;

    Ok(AnalysisLogEntry {
        id,
        original_url: row.try_get("original_url")?,
        final_url: row.try_get("final_url")?,
        timestamp: row.try_get("timestamp")?,
        network: Network::from_str(&network).map_err(|_| {
            DatabaseError::CorruptRow(format!("row {}: unknown network '{}'", id, network))
        })?,
        max_severity: MaxSeverity::from_str(&max_severity).map_err(|_| {
            DatabaseError::CorruptRow(format!(
                "row {}: unknown max severity '{}'",
                id, max_severity
            ))
        })?,
        findings: parse_findings(&findings),
        title: row.try_get("title")?,
        thumbnail: row.try_get("thumbnail")?,
        size_approx: row.try_get("size_approx")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::run_migrations;

    async fn store() -> SqliteLogStore {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database pool");
        run_migrations(&pool).await.expect("Failed to run migrations");
        SqliteLogStore::new(pool)
    }

    fn entry(url: &str, timestamp: Option<i64>) -> NewLogEntry {
        NewLogEntry {
            original_url: url.to_string(),
            final_url: format!("{}.mp4", url),
            network: Network::X,
            max_severity: MaxSeverity::Low,
            findings: "[]".to_string(),
            title: Some("t".to_string()),
            thumbnail: None,
            size_approx: Some(10),
            timestamp,
        }
    }

    #[tokio::test]
    async fn test_append_returns_stored_row() {
        let store = store().await;
        let stored = store
            .append(entry("https://x.com/a/status/1", Some(1_700_000_000)))
            .await
            .unwrap();
        assert!(stored.id > 0);
        assert_eq!(stored.timestamp, 1_700_000_000);
        assert_eq!(stored.network, Network::X);
        assert_eq!(stored.findings, serde_json::json!([]));
        assert_eq!(stored.size_approx, Some(10));
    }

    #[tokio::test]
    async fn test_default_timestamp_is_now() {
        let store = store().await;
        let before = chrono::Utc::now().timestamp();
        let stored = store.append(entry("https://x.com/a/status/2", None)).await.unwrap();
        assert!(stored.timestamp >= before - 1);
        assert!(stored.timestamp <= chrono::Utc::now().timestamp() + 1);
    }

    #[tokio::test]
    async fn test_list_newest_first_with_id_tiebreak() {
        let store = store().await;
        store.append(entry("old", Some(100))).await.unwrap();
        store.append(entry("new", Some(300))).await.unwrap();
        store.append(entry("mid-a", Some(200))).await.unwrap();
        store.append(entry("mid-b", Some(200))).await.unwrap();

        let urls: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.original_url)
            .collect();
        assert_eq!(urls, vec!["new", "mid-b", "mid-a", "old"]);
    }

    #[tokio::test]
    async fn test_non_json_findings_listed_verbatim() {
        let store = store().await;
        sqlx::query(
            "INSERT INTO analysis_logs (original_url, final_url, network, max_severity, findings)
             VALUES ('u', 'f', 'x', 'None', 'not json')",
        )
        .execute(store.pool())
        .await
        .unwrap();
        let rows = store.list().await.unwrap();
        assert_eq!(rows[0].findings, serde_json::json!("not json"));
        assert_eq!(rows[0].max_severity, MaxSeverity::None);
    }
}
