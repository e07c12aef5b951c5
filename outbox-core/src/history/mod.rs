//! Append-only transfer history store
//!
//! Every upload attempt, successful or not, becomes exactly one immutable
//! row in the `FileTransfers` table. Records are never updated or deleted;
//! the table is the sole source of truth for history queries and may be
//! read directly by external tools.

mod sql;

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

// =============================================================================
// Transfer Status
// =============================================================================

/// Outcome of an upload attempt as persisted in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    /// The remote endpoint accepted the full file
    Success,
    /// The attempt failed at any stage (read, connect, or transfer)
    Failure,
}

impl TransferStatus {
    /// Convert to the string stored in the `Status` column
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failure => "Failure",
        }
    }

    /// Parse from the stored string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Success" => Some(Self::Success),
            "Failure" => Some(Self::Failure),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Records and Filters
// =============================================================================

/// One immutable audit-log entry for a single upload attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    pub id: i64,
    pub file_name: String,
    /// Timestamp formatted "YYYY-MM-DD HH:MM:SS"
    pub transfer_date: String,
    pub status: TransferStatus,
}

/// Row type for history queries
type TransferRow = (i64, String, String, String);

impl From<TransferRow> for TransferRecord {
    fn from(row: TransferRow) -> Self {
        Self {
            id: row.0,
            file_name: row.1,
            transfer_date: row.2,
            // The column only ever holds values written through record()
            status: TransferStatus::parse(&row.3).unwrap_or(TransferStatus::Failure),
        }
    }
}

/// Optional filters for history queries
///
/// All supplied filters are combined with AND semantics; an absent field
/// means no constraint. Dates compare against the stored
/// "YYYY-MM-DD HH:MM:SS" text, which orders chronologically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    /// Inclusive lower bound on `TransferDate`
    pub start_date: Option<String>,

    /// Inclusive upper bound on `TransferDate`
    pub end_date: Option<String>,

    /// Only records with this status
    pub status: Option<TransferStatus>,

    /// Maximum number of records to return
    pub limit: Option<u32>,
}

// =============================================================================
// Store
// =============================================================================

/// Database access for the transfer audit trail
///
/// Constructed once at startup and handed to the dispatcher; there is no
/// process-wide shared handle. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    /// Open (creating if missing) the history database at `path`
    ///
    /// Schema initialization is idempotent; opening an already-initialized
    /// store neither fails nor duplicates the schema.
    pub async fn open(path: &Path) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        Self::init(&pool).await?;
        Ok(Self { pool })
    }

    /// Open an in-memory store
    ///
    /// Used by tests and available to callers that want a non-durable
    /// history (the audit trail then lives only for the session).
    pub async fn open_in_memory() -> Result<Self, sqlx::Error> {
        // A single never-expiring connection: each pooled connection to
        // ":memory:" would otherwise see its own empty database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::init(&pool).await?;
        Ok(Self { pool })
    }

    /// The underlying pool, for tests that need to sabotage the schema
    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the schema when absent
    async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query(sql::SQL_CREATE_FILE_TRANSFERS)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Append a transfer attempt and return the stored record
    ///
    /// The store assigns the next id. Records are immutable once written.
    ///
    /// # Errors
    ///
    /// Fails only on irrecoverable storage errors (disk full, corruption).
    /// Callers in the dispatch path log the error and continue; a failed
    /// record write must never stop the pipeline.
    pub async fn record(
        &self,
        file_name: &str,
        transfer_date: &str,
        status: TransferStatus,
    ) -> Result<TransferRecord, sqlx::Error> {
        let result = sqlx::query(sql::SQL_INSERT_TRANSFER)
            .bind(file_name)
            .bind(transfer_date)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();

        self.get_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// Get a single record by id
    pub async fn get_by_id(&self, id: i64) -> Result<Option<TransferRecord>, sqlx::Error> {
        let row: Option<TransferRow> = sqlx::query_as(sql::SQL_SELECT_TRANSFER_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TransferRecord::from))
    }

    /// Query records matching all supplied filters
    ///
    /// Results are ordered by `TransferDate` descending (newest first, id
    /// breaking ties) and capped at `filter.limit` when given. Returns an
    /// empty vec, never an error, when nothing matches.
    pub async fn query(&self, filter: &HistoryFilter) -> Result<Vec<TransferRecord>, sqlx::Error> {
        let mut query = String::from(sql::SQL_SELECT_TRANSFERS_BASE);

        let mut conditions: Vec<&str> = Vec::new();
        if filter.start_date.is_some() {
            conditions.push("TransferDate >= ?");
        }
        if filter.end_date.is_some() {
            conditions.push("TransferDate <= ?");
        }
        if filter.status.is_some() {
            conditions.push("Status = ?");
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY TransferDate DESC, ID DESC");

        if filter.limit.is_some() {
            query.push_str(" LIMIT ?");
        }

        let mut q = sqlx::query_as::<_, TransferRow>(&query);
        if let Some(start) = &filter.start_date {
            q = q.bind(start);
        }
        if let Some(end) = &filter.end_date {
            q = q.bind(end);
        }
        if let Some(status) = filter.status {
            q = q.bind(status.as_str());
        }
        if let Some(limit) = filter.limit {
            q = q.bind(i64::from(limit));
        }

        let rows = q.fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(TransferRecord::from).collect())
    }
}
