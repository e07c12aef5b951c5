//! SQL query constants for the transfer history store
//!
//! The `FileTransfers` table is the durable audit contract: other tools may
//! read it directly, so column names, the text timestamp format, and the
//! status values are frozen.

/// Create the history table if it does not exist
///
/// **Parameters:** None
///
/// **Note:** Idempotent; invoked on every store open. `ID` is assigned by
/// SQLite and is monotonically increasing for appended rows.
pub const SQL_CREATE_FILE_TRANSFERS: &str = "
    CREATE TABLE IF NOT EXISTS FileTransfers (
        ID INTEGER PRIMARY KEY AUTOINCREMENT,
        FileName TEXT NOT NULL,
        TransferDate TEXT NOT NULL,
        Status TEXT NOT NULL
    )";

/// Append one transfer attempt
///
/// **Parameters:**
/// 1. `file_name: &str` - Name of the transferred file (no directory part)
/// 2. `transfer_date: &str` - Timestamp formatted "YYYY-MM-DD HH:MM:SS"
/// 3. `status: &str` - "Success" or "Failure"
///
/// **Returns:** `last_insert_rowid()` - The new record's ID
pub const SQL_INSERT_TRANSFER: &str = "
    INSERT INTO FileTransfers (FileName, TransferDate, Status)
    VALUES (?, ?, ?)";

/// Select a single record by ID
///
/// **Parameters:**
/// 1. `id: i64` - Record ID
///
/// **Returns:** `(id, file_name, transfer_date, status)`
pub const SQL_SELECT_TRANSFER_BY_ID: &str = "
    SELECT ID, FileName, TransferDate, Status
    FROM FileTransfers
    WHERE ID = ?";

/// Base of the filtered history query
///
/// Filter conditions and the ORDER BY / LIMIT clauses are appended at run
/// time by `HistoryStore::query`; every condition binds its value, never
/// interpolates it.
pub const SQL_SELECT_TRANSFERS_BASE: &str = "
    SELECT ID, FileName, TransferDate, Status
    FROM FileTransfers";
