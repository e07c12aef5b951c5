//! Events flowing through the relay pipeline

use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// A newly detected file, ready for transfer
///
/// Produced by the watcher, consumed exactly once by the dispatcher.
/// Never persisted; only the resulting `TransferRecord` survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReadyEvent {
    /// Absolute path of the created file
    pub path: PathBuf,

    /// When the creation event was observed
    pub detected_at: DateTime<Utc>,
}

impl FileReadyEvent {
    /// Create an event stamped with the current time
    pub fn now(path: PathBuf) -> Self {
        Self {
            path,
            detected_at: Utc::now(),
        }
    }

    /// The file name component, lossily converted
    ///
    /// Falls back to the full path display when the path has no final
    /// component (should not happen for created files).
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Result of one completed upload attempt
///
/// Broadcast to every subscriber after the attempt has been recorded in the
/// history store. Delivery is best-effort; losing a notification never rolls
/// back or repeats the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    /// File name as recorded in the history store
    pub file_name: String,

    /// Whether the upload succeeded
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        let event = FileReadyEvent::now(PathBuf::from("/watched/report.csv"));
        assert_eq!(event.file_name(), "report.csv");
    }

    #[test]
    fn test_file_name_nested() {
        let event = FileReadyEvent::now(PathBuf::from("/watched/sub/dir/a.txt"));
        assert_eq!(event.file_name(), "a.txt");
    }
}
