//! Error types for the bridge engine

use etp_types::UriError;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Main error type for the bridge engine
///
/// Three families: configuration errors are fatal at construction, protocol
/// errors are local to one resource or sample and never tear anything down,
/// transport errors surface to the immediate caller (writes) or through the
/// disconnect callback (connection loss). Nothing here is retried.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Missing or inconsistent construction options
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Entity URI could not be parsed
    #[error("malformed entity URI: {0}")]
    MalformedUri(#[from] UriError),

    /// Resource content type carries no usable `type=` parameter
    #[error("unclassifiable resource content type: {content_type}")]
    UnclassifiableContentType { content_type: String },

    /// A data sample referenced a channel id the registry has never seen
    #[error("data sample references unknown channel id {channel_id}")]
    UnknownChannel { channel_id: i64 },

    /// Operation requires an open connection
    #[error("session is not connected")]
    NotConnected,

    /// Transport failed to establish the connection
    #[error("connect failed: {reason}")]
    ConnectFailed { reason: String },

    /// Transport failed to write a frame
    #[error("write failed: {reason}")]
    WriteFailed { reason: String },

    /// Codec failed to encode or decode a frame
    #[error("codec error: {0}")]
    Codec(String),

    /// Metadata store rejected an upsert
    #[error("metadata store error: {0}")]
    Store(String),

    /// Pub/sub bridge subscribe or publish failed
    #[error("pub/sub bridge error: {0}")]
    Bridge(String),

    /// Explicitly unimplemented operation
    #[error("operation not supported: {0}")]
    NotSupported(String),
}

impl BridgeError {
    /// Protocol errors are dropped per-resource/per-sample, never fatal
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            BridgeError::MalformedUri(_)
                | BridgeError::UnclassifiableContentType { .. }
                | BridgeError::UnknownChannel { .. }
        )
    }
}
