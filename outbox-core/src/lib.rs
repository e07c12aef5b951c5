//! Outbox Core Library
//!
//! Detection, queued transfer, and persisted outcome for files appearing
//! under a watched directory. The pipeline is:
//!
//! ```text
//! DirectoryWatcher -> TransferDispatcher -> RemoteClient (upload)
//!                            |
//!                            +-> HistoryStore (record) -> TransferOutcome
//! ```
//!
//! The watcher feeds a bounded channel; a single dispatcher task consumes
//! it in FIFO order with at most one upload in flight, records every
//! attempt in the append-only `FileTransfers` table, and broadcasts an
//! outcome notification per attempt. Nothing here owns a UI: callers wire
//! in configuration and subscribe to outcomes.

mod error;
mod event;

pub mod dispatcher;
pub mod history;
pub mod remote;
pub mod time;
pub mod watcher;

pub use dispatcher::{DispatcherHandle, EVENT_QUEUE_CAPACITY, TransferDispatcher};
pub use error::{TransferError, WatchError};
pub use event::{FileReadyEvent, TransferOutcome};
pub use history::{HistoryFilter, HistoryStore, TransferRecord, TransferStatus};
pub use remote::{FtpClient, RemoteClient};
pub use watcher::{DirectoryWatcher, LIVENESS_TICK_INTERVAL};
