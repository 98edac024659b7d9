//! Message header
//!
//! The header is identical for all messages and is always encoded against the
//! fixed header sub-schema before the body. Field names follow the
//! Energistics schema exactly.

use crate::constants::{schemas, ProtocolId};
use serde::{Deserialize, Serialize};

/// ETP v1.1 message header
///
/// `message_id` is assigned by the factory's sequencer and is strictly
/// increasing per session. `correlation_id` and `message_flags` are zero for
/// every message kind this client emits (no multi-part messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageHeader {
    pub protocol: i32,
    pub message_type: i32,
    pub correlation_id: i64,
    pub message_id: i64,
    pub message_flags: i32,
}

impl MessageHeader {
    /// Schema the header encodes against
    pub const SCHEMA: &'static str = schemas::MESSAGE_HEADER;

    pub fn new(protocol: ProtocolId, message_type: i32, message_id: i64) -> Self {
        Self {
            protocol: protocol.into(),
            message_type,
            correlation_id: 0,
            message_id,
            message_flags: 0,
        }
    }
}
