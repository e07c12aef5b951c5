//! Machine-readable error kinds for the relay pipeline
//!
//! These kinds are stable strings so that callers (and the daemon's log
//! output) can match on them without parsing human-readable messages.

use std::error::Error;
use std::fmt;

// =============================================================================
// Transfer Errors
// =============================================================================

/// Error kinds for a single upload attempt
///
/// Every failed attempt maps to exactly one of these; the dispatcher records
/// the attempt as `Failure` and broadcasts a failed outcome. The kind stays
/// internal to the transfer path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferError {
    /// No authenticated session exists
    ///
    /// Returned without touching the network; `configure` must succeed
    /// before any upload is attempted.
    NotConnected,

    /// The source file vanished between detection and dispatch
    SourceUnavailable,

    /// The local file could not be read
    IoFailure,

    /// The remote endpoint rejected the operation
    ///
    /// Covers expired authentication, quota errors, and disconnects
    /// mid-transfer. Terminal for the attempt; no retry is performed.
    TransferRejected,
}

impl TransferError {
    /// Convert to the stable string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotConnected => "not_connected",
            Self::SourceUnavailable => "source_unavailable",
            Self::IoFailure => "io_failure",
            Self::TransferRejected => "transfer_rejected",
        }
    }

    /// Parse from the stable string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not_connected" => Some(Self::NotConnected),
            "source_unavailable" => Some(Self::SourceUnavailable),
            "io_failure" => Some(Self::IoFailure),
            "transfer_rejected" => Some(Self::TransferRejected),
            _ => None,
        }
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error for TransferError {}

// =============================================================================
// Watch Errors
// =============================================================================

/// Errors surfaced synchronously from watch setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchError {
    /// The path does not exist, is not a directory, or the OS watch
    /// handle could not be registered
    Unavailable,

    /// A watch is already running; call `stop_watch` first
    AlreadyActive,
}

impl WatchError {
    /// Convert to the stable string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unavailable => "watch_unavailable",
            Self::AlreadyActive => "watch_already_active",
        }
    }
}

impl fmt::Display for WatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error for WatchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_error_as_str() {
        assert_eq!(TransferError::NotConnected.as_str(), "not_connected");
        assert_eq!(
            TransferError::SourceUnavailable.as_str(),
            "source_unavailable"
        );
        assert_eq!(TransferError::IoFailure.as_str(), "io_failure");
        assert_eq!(TransferError::TransferRejected.as_str(), "transfer_rejected");
    }

    #[test]
    fn test_transfer_error_roundtrip() {
        for kind in [
            TransferError::NotConnected,
            TransferError::SourceUnavailable,
            TransferError::IoFailure,
            TransferError::TransferRejected,
        ] {
            assert_eq!(TransferError::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(TransferError::parse("unknown"), None);
        assert_eq!(TransferError::parse(""), None);
    }

    #[test]
    fn test_watch_error_display() {
        assert_eq!(format!("{}", WatchError::Unavailable), "watch_unavailable");
        assert_eq!(
            format!("{}", WatchError::AlreadyActive),
            "watch_already_active"
        );
    }
}
