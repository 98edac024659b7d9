//! # Wellbridge ETP Client Engine
//!
//! ## Purpose
//!
//! Client implementation of the ETP v1.1 subset needed to bridge an
//! energy-industry data store into an internal pub/sub fabric: session
//! handshake, periodic resource discovery, channel streaming with per-log row
//! aggregation, and WITSML log writes back into the store.
//!
//! ## Integration Points
//!
//! - **Transport**: persistent websocket carrying header-framed binary
//!   messages (default adapter over tokio-tungstenite, any [`Transport`]
//!   works)
//! - **Codec**: schema-driven binary encode/decode behind [`EtpCodec`]
//! - **Pub/Sub bridge**: stream-control request/response topics plus per-log
//!   data topics behind [`PubSubBridge`]
//! - **Metadata store**: upsert-by-URI collections behind [`MetadataStore`]
//!
//! ## Scope
//!
//! Exactly one outbound session per engine. Core, Discovery, Store
//! (PutObject), and ChannelStreaming only. Connection loss is reported
//! through the caller's disconnect callback, never retried here.
//!
//! ```no_run
//! use etp_bridge::{BridgeConfig, EtpBridge, WebSocketTransport};
//! use std::sync::Arc;
//!
//! # async fn example(codec: Arc<dyn etp_bridge::EtpCodec>,
//! #                  bridge: Arc<dyn etp_bridge::PubSubBridge>,
//! #                  store: Arc<dyn etp_bridge::MetadataStore>) -> etp_bridge::Result<()> {
//! let engine = EtpBridge::new(
//!     BridgeConfig::default(),
//!     Arc::new(WebSocketTransport::new()),
//!     codec,
//!     bridge,
//!     store,
//! )?;
//! engine
//!     .connect("wss://store.example.com/etp", "user", "secret", |reason| {
//!         eprintln!("connection lost: {reason}");
//!     })
//!     .await?;
//! engine.initialize_discovery(5).await?;
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod ports;
pub mod registry;
pub mod session;
pub mod store;
pub mod transport;

pub use aggregator::{aggregate, index_to_epoch_millis, LogRowBatch, StreamAggregator};
pub use config::{BridgeConfig, DestinationLogSpec};
pub use discovery::DiscoveryResolver;
pub use engine::EtpBridge;
pub use error::{BridgeError, Result};
pub use ports::{
    ConnectConfig, DisconnectHandler, EtpCodec, MetadataStore, PubSubBridge, Transport,
    TransportEvent,
};
pub use registry::{ChannelEntry, ChannelRegistry};
pub use session::{Session, SessionState};
pub use store::LogRow;
pub use transport::WebSocketTransport;
