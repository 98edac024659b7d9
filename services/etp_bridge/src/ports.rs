//! # Injected Collaborator Interfaces
//!
//! ## Purpose
//!
//! The engine talks to four external systems, each behind a trait so the
//! session logic can be exercised against in-memory fakes: the websocket
//! transport, the schema-driven binary codec, the pub/sub bridge carrying
//! stream control and row fan-out, and the metadata store holding discovered
//! entities. All four are constructor-injected.

use crate::error::Result;
use async_trait::async_trait;
use etp_protocol::{InboundMessage, OutboundMessage, ETP_WEBSOCKET_SUBPROTOCOL};
use etp_types::{LogRecord, WellRecord, WellboreRecord};
use tokio::sync::mpsc;

/// Connection parameters handed to the transport
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub use_tls: bool,
    /// Websocket subprotocol negotiated with the endpoint
    pub subprotocol: &'static str,
}

impl ConnectConfig {
    pub fn new(url: &str, username: &str, password: &str) -> Self {
        Self {
            use_tls: url.starts_with("wss"),
            url: url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            subprotocol: ETP_WEBSOCKET_SUBPROTOCOL,
        }
    }
}

/// Events delivered by the transport after a successful connect
#[derive(Debug)]
pub enum TransportEvent {
    /// One complete inbound frame (header + body bytes)
    Frame(Vec<u8>),
    /// The connection is gone; no further events follow
    ConnectionLost(String),
}

/// Full-duplex socket transport.
///
/// Inbound frames and the connection-lost notification arrive on the event
/// channel returned by [`Transport::connect`]; the engine drains it on a
/// single task so message handling stays serialized.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn connect(&self, config: ConnectConfig) -> Result<mpsc::Receiver<TransportEvent>>;

    /// Write one outbound frame. Failures surface to the caller; nothing is
    /// retried.
    async fn write(&self, frame: Vec<u8>) -> Result<()>;
}

/// Schema-driven binary codec.
///
/// Encodes an outbound `{header, schema, body}` triple into wire bytes, and
/// decodes an inbound frame by reading the fixed header sub-schema first,
/// resolving the body schema from (protocol, messageType), then decoding the
/// body into its tagged variant.
pub trait EtpCodec: Send + Sync {
    fn encode(&self, message: &OutboundMessage) -> Result<Vec<u8>>;
    fn decode(&self, frame: &[u8]) -> Result<InboundMessage>;
}

/// Publish/subscribe bridge to downstream consumers
#[async_trait]
pub trait PubSubBridge: Send + Sync {
    /// Subscribe to a topic; messages arrive on the returned channel
    async fn subscribe(&self, topic: &str) -> Result<mpsc::Receiver<Vec<u8>>>;

    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()>;
}

/// Durable store for discovered entity metadata.
///
/// One collection per entity kind, upsert keyed by the record's `uri` field.
/// A rig collection is reserved but the engine never writes it.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn upsert_well(&self, record: WellRecord) -> Result<()>;
    async fn upsert_wellbore(&self, record: WellboreRecord) -> Result<()>;
    async fn upsert_log(&self, record: LogRecord) -> Result<()>;
}

/// Callback invoked once when the transport reports connection loss
pub type DisconnectHandler = Box<dyn Fn(&str) + Send + Sync>;
