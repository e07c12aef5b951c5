//! FTP-backed remote client
//!
//! Wraps a blocking `suppaftp::FtpStream` session. The control connection
//! is stateful, so the stream is moved into `spawn_blocking` for each
//! protocol exchange and moved back afterwards; the dispatcher's
//! one-upload-at-a-time discipline means there is never contention for it.

use std::io::Cursor;

use async_trait::async_trait;
use suppaftp::{FtpError, FtpStream};
use tokio::task::spawn_blocking;

use super::RemoteClient;
use crate::error::TransferError;

/// Default FTP control port, used when the host string carries none
const DEFAULT_FTP_PORT: u16 = 21;

/// Append the default port unless the host already names one
fn endpoint_address(host: &str) -> String {
    if host.contains(':') {
        host.to_string()
    } else {
        format!("{}:{}", host, DEFAULT_FTP_PORT)
    }
}

/// FTP client holding at most one authenticated session
///
/// The session is either fully authenticated and usable or absent; a failed
/// `configure` never leaves a half-initialized connection behind.
pub struct FtpClient {
    session: Option<FtpStream>,
}

impl FtpClient {
    /// Create a client with no session
    pub fn new() -> Self {
        Self { session: None }
    }
}

impl Default for FtpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteClient for FtpClient {
    async fn configure(
        &mut self,
        host: &str,
        user: &str,
        password: &str,
    ) -> Result<(), TransferError> {
        // Tear down any prior session before establishing a new one
        if let Some(mut old) = self.session.take() {
            let _ = spawn_blocking(move || old.quit()).await;
        }

        let addr = endpoint_address(host);
        let user = user.to_string();
        let password = password.to_string();

        let connected = spawn_blocking(move || {
            let mut stream = FtpStream::connect(&addr)?;
            if let Err(e) = stream.login(&user, &password) {
                let _ = stream.quit();
                return Err(e);
            }
            Ok(stream)
        })
        .await;

        match connected {
            Ok(Ok(stream)) => {
                self.session = Some(stream);
                Ok(())
            }
            _ => Err(TransferError::NotConnected),
        }
    }

    async fn upload(&mut self, name: &str, contents: Vec<u8>) -> Result<(), TransferError> {
        let mut stream = self.session.take().ok_or(TransferError::NotConnected)?;
        let name = name.to_string();

        let result = spawn_blocking(move || {
            let outcome = stream.put_file(&name, &mut Cursor::new(contents));
            (stream, outcome)
        })
        .await;

        match result {
            Ok((stream, Ok(_))) => {
                self.session = Some(stream);
                Ok(())
            }
            // Control connection is gone; the session cannot be reused
            Ok((_, Err(FtpError::ConnectionError(_)))) => Err(TransferError::TransferRejected),
            // Remote refused the operation but the session survived
            Ok((stream, Err(_))) => {
                self.session = Some(stream);
                Err(TransferError::TransferRejected)
            }
            Err(_) => Err(TransferError::TransferRejected),
        }
    }

    fn is_connected(&self) -> bool {
        self.session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_address_default_port() {
        assert_eq!(endpoint_address("ftp.example.com"), "ftp.example.com:21");
    }

    #[test]
    fn test_endpoint_address_explicit_port() {
        assert_eq!(endpoint_address("ftp.example.com:2121"), "ftp.example.com:2121");
    }

    #[tokio::test]
    async fn test_upload_without_session_fails_fast() {
        let mut client = FtpClient::new();
        assert!(!client.is_connected());

        let result = client.upload("a.txt", b"data".to_vec()).await;
        assert_eq!(result, Err(TransferError::NotConnected));
    }
}
