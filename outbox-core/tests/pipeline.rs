//! End-to-end pipeline tests
//!
//! These tests run the real watcher against a temp directory, feed the
//! dispatcher through the bounded channel, and verify the history store and
//! outcome notifications with an in-memory remote client standing in for
//! the FTP endpoint.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use outbox_core::{
    DirectoryWatcher, FileReadyEvent, HistoryFilter, HistoryStore, RemoteClient,
    TransferDispatcher, TransferError, TransferOutcome, TransferStatus,
};

const OUTCOME_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Mock Remote Client
// ============================================================================

/// Remote client that keeps uploads in memory, in call order
struct MemoryClient {
    connected: bool,
    uploads: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl MemoryClient {
    fn new(connected: bool) -> (Self, Arc<Mutex<Vec<(String, Vec<u8>)>>>) {
        let uploads = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                connected,
                uploads: uploads.clone(),
            },
            uploads,
        )
    }
}

#[async_trait]
impl RemoteClient for MemoryClient {
    async fn configure(
        &mut self,
        _host: &str,
        _user: &str,
        _password: &str,
    ) -> Result<(), TransferError> {
        self.connected = true;
        Ok(())
    }

    async fn upload(&mut self, name: &str, contents: Vec<u8>) -> Result<(), TransferError> {
        if !self.connected {
            return Err(TransferError::NotConnected);
        }
        self.uploads
            .lock()
            .unwrap()
            .push((name.to_string(), contents));
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

async fn next_outcome(
    outcomes: &mut tokio::sync::broadcast::Receiver<TransferOutcome>,
) -> TransferOutcome {
    timeout(OUTCOME_TIMEOUT, outcomes.recv())
        .await
        .expect("timed out waiting for outcome")
        .expect("outcome channel closed")
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_created_file_is_uploaded_and_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::open_in_memory().await.unwrap();
    let (client, uploads) = MemoryClient::new(true);

    let (dispatcher, handle) = TransferDispatcher::new(Box::new(client), store.clone());
    let mut outcomes = handle.subscribe();
    tokio::spawn(dispatcher.run());

    let mut watcher = DirectoryWatcher::new(handle.event_sender());
    watcher.start_watch(dir.path()).unwrap();

    std::fs::write(dir.path().join("a.txt"), b"payload").unwrap();

    let outcome = next_outcome(&mut outcomes).await;
    assert_eq!(outcome.file_name, "a.txt");
    assert!(outcome.success);

    // Exactly one upload with the file's bytes
    let uploads = uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].0, "a.txt");
    assert_eq!(uploads[0].1, b"payload");

    // Exactly one Success record
    let records = store.query(&HistoryFilter::default()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].file_name, "a.txt");
    assert_eq!(records[0].status, TransferStatus::Success);

    watcher.stop_watch();
}

#[tokio::test]
async fn test_unconfigured_client_records_failure_and_keeps_watching() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::open_in_memory().await.unwrap();
    let (client, uploads) = MemoryClient::new(false);

    let (dispatcher, handle) = TransferDispatcher::new(Box::new(client), store.clone());
    let mut outcomes = handle.subscribe();
    tokio::spawn(dispatcher.run());

    let mut watcher = DirectoryWatcher::new(handle.event_sender());
    watcher.start_watch(dir.path()).unwrap();

    std::fs::write(dir.path().join("b.txt"), b"first").unwrap();

    let outcome = next_outcome(&mut outcomes).await;
    assert_eq!(outcome.file_name, "b.txt");
    assert!(!outcome.success);

    // The watch loop survived the failure and detects further files
    std::fs::write(dir.path().join("c.txt"), b"second").unwrap();

    let outcome = next_outcome(&mut outcomes).await;
    assert_eq!(outcome.file_name, "c.txt");
    assert!(!outcome.success);

    // No bytes ever reached the client
    assert!(uploads.lock().unwrap().is_empty());

    let failures = store
        .query(&HistoryFilter {
            status: Some(TransferStatus::Failure),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(failures.len(), 2);

    watcher.stop_watch();
}

#[tokio::test]
async fn test_sequential_creations_are_all_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::open_in_memory().await.unwrap();
    let (client, uploads) = MemoryClient::new(true);

    let (dispatcher, handle) = TransferDispatcher::new(Box::new(client), store.clone());
    let mut outcomes = handle.subscribe();
    tokio::spawn(dispatcher.run());

    let mut watcher = DirectoryWatcher::new(handle.event_sender());
    watcher.start_watch(dir.path()).unwrap();

    let count = 10;
    for i in 0..count {
        std::fs::write(dir.path().join(format!("file{:02}.txt", i)), b"data").unwrap();
    }

    for _ in 0..count {
        let outcome = next_outcome(&mut outcomes).await;
        assert!(outcome.success);
    }

    assert_eq!(uploads.lock().unwrap().len(), count);

    let records = store.query(&HistoryFilter::default()).await.unwrap();
    assert_eq!(records.len(), count);

    watcher.stop_watch();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_submissions_serialize_in_arrival_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::open_in_memory().await.unwrap();
    let (client, uploads) = MemoryClient::new(true);

    let (dispatcher, handle) = TransferDispatcher::new(Box::new(client), store.clone());
    let mut outcomes = handle.subscribe();
    tokio::spawn(dispatcher.run());

    // Two producers racing into the channel, as the watcher thread and the
    // tick task would
    let count = 20;
    let mut paths = Vec::new();
    for i in 0..count {
        let path = dir.path().join(format!("file{:02}.txt", i));
        std::fs::write(&path, b"data").unwrap();
        paths.push(path);
    }

    let (first_half, second_half) = paths.split_at(count / 2);
    let producer_a = {
        let handle = handle.clone();
        let paths = first_half.to_vec();
        tokio::spawn(async move {
            for path in paths {
                handle.submit(FileReadyEvent::now(path)).await;
            }
        })
    };
    let producer_b = {
        let handle = handle.clone();
        let paths = second_half.to_vec();
        tokio::spawn(async move {
            for path in paths {
                handle.submit(FileReadyEvent::now(path)).await;
            }
        })
    };
    producer_a.await.unwrap();
    producer_b.await.unwrap();

    for _ in 0..count {
        let outcome = next_outcome(&mut outcomes).await;
        assert!(outcome.success);
    }

    // Exactly N records, and the client saw at most one upload at a time in
    // the order events entered the queue
    let records = store.query(&HistoryFilter::default()).await.unwrap();
    assert_eq!(records.len(), count);
    assert_eq!(uploads.lock().unwrap().len(), count);

    // Each producer's own submissions kept their relative order
    let uploaded: Vec<String> = uploads
        .lock()
        .unwrap()
        .iter()
        .map(|(name, _)| name.clone())
        .collect();
    for window in [first_half, second_half] {
        let expected: Vec<String> = window
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        let observed: Vec<String> = uploaded
            .iter()
            .filter(|name| expected.contains(name))
            .cloned()
            .collect();
        assert_eq!(observed, expected);
    }
}
