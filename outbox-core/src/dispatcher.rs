//! Transfer dispatcher - serializes file events into ordered uploads
//!
//! The dispatcher is the single consumer of the file-ready channel. Events
//! are processed strictly in arrival order with at most one upload in
//! flight, because the remote session cannot service concurrent streams.
//! Every attempt, success or failure, yields exactly one history record and
//! one outcome notification; per-file errors never escape the loop.

use std::io;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc};

use crate::error::TransferError;
use crate::event::{FileReadyEvent, TransferOutcome};
use crate::history::{HistoryStore, TransferStatus};
use crate::remote::RemoteClient;
use crate::time::format_transfer_date;

// =============================================================================
// Constants
// =============================================================================

/// Capacity of the bounded file-ready channel
///
/// Producers (the watcher callback thread) block when the backlog fills,
/// so bursts are absorbed without dropping events.
pub const EVENT_QUEUE_CAPACITY: usize = 256;

/// Capacity of the outcome broadcast channel
///
/// Slow subscribers lag rather than stall the pipeline.
const OUTCOME_CHANNEL_CAPACITY: usize = 64;

// =============================================================================
// Handle
// =============================================================================

/// Cloneable handle for feeding the dispatcher and observing outcomes
#[derive(Clone)]
pub struct DispatcherHandle {
    event_tx: mpsc::Sender<FileReadyEvent>,
    outcome_tx: broadcast::Sender<TransferOutcome>,
}

impl DispatcherHandle {
    /// Enqueue a file for transfer
    ///
    /// Events are uploaded in submission order. A closed channel means the
    /// dispatcher has shut down; the event is dropped since there is no
    /// longer anyone to upload it.
    pub async fn submit(&self, event: FileReadyEvent) {
        let _ = self.event_tx.send(event).await;
    }

    /// Subscribe to per-attempt outcome notifications
    pub fn subscribe(&self) -> broadcast::Receiver<TransferOutcome> {
        self.outcome_tx.subscribe()
    }

    /// The raw event sender, for producers that live off the async runtime
    /// (the watcher's callback thread uses `blocking_send` on it)
    pub fn event_sender(&self) -> mpsc::Sender<FileReadyEvent> {
        self.event_tx.clone()
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Single-consumer dispatch loop over the file-ready channel
///
/// Owns the remote client and the injected history store for its lifetime;
/// nothing else touches either while the loop runs.
pub struct TransferDispatcher {
    events: mpsc::Receiver<FileReadyEvent>,
    client: Box<dyn RemoteClient>,
    store: HistoryStore,
    outcome_tx: broadcast::Sender<TransferOutcome>,
}

impl TransferDispatcher {
    /// Create a dispatcher and its handle
    pub fn new(client: Box<dyn RemoteClient>, store: HistoryStore) -> (Self, DispatcherHandle) {
        let (event_tx, events) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        let (outcome_tx, _) = broadcast::channel(OUTCOME_CHANNEL_CAPACITY);

        let handle = DispatcherHandle {
            event_tx,
            outcome_tx: outcome_tx.clone(),
        };

        let dispatcher = Self {
            events,
            client,
            store,
            outcome_tx,
        };

        (dispatcher, handle)
    }

    /// Run the dispatch loop until every handle has been dropped
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            self.process(event).await;
        }
    }

    /// Handle one event: upload, record, notify
    async fn process(&mut self, event: FileReadyEvent) {
        let file_name = event.file_name();

        let result = self.transfer(&event, &file_name).await;
        let status = match result {
            Ok(()) => TransferStatus::Success,
            Err(_) => TransferStatus::Failure,
        };

        let transfer_date = format_transfer_date(Utc::now());
        if let Err(e) = self.store.record(&file_name, &transfer_date, status).await {
            // The pipeline stays live even when bookkeeping fails
            eprintln!("Failed to record transfer of {}: {}", file_name, e);
        }

        let _ = self.outcome_tx.send(TransferOutcome {
            file_name,
            success: status == TransferStatus::Success,
        });
    }

    /// Read the source file and upload it under its file name
    async fn transfer(
        &mut self,
        event: &FileReadyEvent,
        file_name: &str,
    ) -> Result<(), TransferError> {
        // Fail fast before reading anything when no session exists
        if !self.client.is_connected() {
            return Err(TransferError::NotConnected);
        }

        let contents = tokio::fs::read(&event.path).await.map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                TransferError::SourceUnavailable
            } else {
                TransferError::IoFailure
            }
        })?;

        self.client.upload(file_name, contents).await
    }
}
