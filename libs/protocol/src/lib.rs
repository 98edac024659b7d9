//! # ETP v1.1 Protocol Model
//!
//! ## Purpose
//!
//! Typed model of the subset of the Energistics Transfer Protocol this client
//! speaks: the fixed message header, the body records for Core, Discovery,
//! Store, and ChannelStreaming, the Avro schema names each body encodes
//! against, and the message factory that assembles outbound
//! `{header, schema, body}` triples with monotonic message-id assignment.
//!
//! ## Architecture
//!
//! ```text
//! Engine components ──> [MessageFactory] ──> OutboundMessage ──> codec ──> transport
//!                                                                  │
//! Engine dispatcher <── InboundMessage  <──────────────────────────┘
//! ```
//!
//! The binary encoding itself is not here: a codec implementation (injected
//! into the engine) turns these values into wire bytes against the
//! Energistics schema set and back. This crate only fixes WHAT crosses that
//! boundary - field names and shapes match the schemas, which is why every
//! body serializes with camelCase field names.

pub mod constants;
pub mod factory;
pub mod header;
pub mod inbound;
pub mod messages;

pub use constants::{
    body_schema, schemas, ChannelStreamingMessageType, CoreMessageType, DiscoveryMessageType,
    ProtocolId, StoreMessageType, ETP_WEBSOCKET_SUBPROTOCOL,
};
pub use factory::{MessageFactory, OutboundBody, OutboundMessage};
pub use header::MessageHeader;
pub use inbound::{InboundBody, InboundMessage};
