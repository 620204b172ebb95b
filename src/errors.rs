use std::time::Duration;

/// All error types that can occur when talking to the Amaran controller.
///
/// Most of these never reach callers of [`crate::Session`]: the session logs them and
/// degrades to `false` or an empty [`crate::Response`]. They surface directly from the
/// fallible helpers ([`crate::TokenGenerator::generate_at`]) and the command dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// A socket operation failed while communicating with the controller.
    #[error("socket {action} error: {err:?}")]
    Socket {
        action: String,
        err: tokio_tungstenite::tungstenite::Error,
    },

    /// The controller closed the connection.
    #[error("connection closed by controller")]
    Closed,

    /// No reply arrived within the receive timeout.
    #[error("no reply within {0:?}")]
    Timeout(Duration),

    /// The shared secret is not valid base64.
    #[error("shared secret is not valid base64: {0}")]
    InvalidSecret(base64::DecodeError),

    /// The decoded shared secret is not an AES-256 key.
    #[error("shared secret decodes to {0} bytes, expected 32")]
    InvalidKeyLength(usize),

    /// The AES-GCM cipher rejected the input.
    #[error("token encryption failed")]
    Encryption,

    /// The referenced device is not in the registry.
    #[error("device {0} not found")]
    DeviceNotFound(String),

    /// The referenced quickshot is not in the cached quickshot list.
    #[error("quickshot {0} not found")]
    QuickshotNotFound(String),

    /// The controller answered with something other than a JSON object.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl Error {
    /// Create a new socket error
    pub fn socket(action: &str, err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::Socket {
            action: action.to_string(),
            err,
        }
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
