//! Remote transfer client abstraction
//!
//! The dispatcher talks to the remote storage endpoint through this trait
//! only, so tests can substitute an in-memory client and the protocol
//! implementation stays swappable.

mod ftp;

use async_trait::async_trait;

use crate::error::TransferError;

pub use ftp::FtpClient;

/// One logical connection to a remote file-storage endpoint
///
/// Implementations own a single stateful session: it is either fully
/// authenticated and usable, or absent. The session cannot service two
/// uploads at once; the dispatcher serializes all calls.
#[async_trait]
pub trait RemoteClient: Send {
    /// Replace any existing session and authenticate a new one
    ///
    /// On failure no session is retained; subsequent uploads fail fast
    /// with [`TransferError::NotConnected`] rather than reconnecting
    /// implicitly.
    async fn configure(
        &mut self,
        host: &str,
        user: &str,
        password: &str,
    ) -> Result<(), TransferError>;

    /// Send `contents` to the remote endpoint under `name`
    ///
    /// Overwrites any existing remote object of that name. Any failure is
    /// terminal for this attempt; no retry is performed at this layer.
    async fn upload(&mut self, name: &str, contents: Vec<u8>) -> Result<(), TransferError>;

    /// Whether an authenticated session currently exists
    fn is_connected(&self) -> bool;
}
