//! # Wellbridge Domain Types
//!
//! ## Purpose
//!
//! Shared vocabulary for the ETP v1.1 client: the hierarchical entity URI
//! scheme used to address wells, wellbores, and logs, the resource
//! content-type classification used by discovery, the metadata records
//! upserted into the external store, and the stream-control request/response
//! payloads carried over the pub/sub bridge.
//!
//! ## Architecture Role
//!
//! ```text
//! Discovery/Streaming ──> [etp-types] <── Store Client
//!         ↑                   ↓
//!    classification      EntityUri / topics
//! ```
//!
//! This crate is a pure leaf: no I/O, no async, no protocol framing. The
//! message bodies that cross the wire live in `etp-protocol`; everything here
//! is derived, immutable data.

pub mod content_type;
pub mod records;
pub mod stream;
pub mod topics;
pub mod uri;

pub use content_type::{type_parameter, witsml_content_type, ResourceKind};
pub use records::{LogRecord, MnemonicSpec, WellRecord, WellboreRecord};
pub use stream::{StreamCommand, StreamRequest};
pub use topics::{StreamDataTopic, STREAM_REQUEST_TOPIC, STREAM_RESPONSE_TOPIC};
pub use uri::{DiscoveryRoot, EntityUri, SegmentKind, UriError};
