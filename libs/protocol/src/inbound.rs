//! Inbound message model
//!
//! The codec decodes the fixed header sub-schema first, resolves the body
//! schema from the header's (protocol, messageType) pair, and decodes the
//! body into one of these tagged variants. Pairs with no decoder become
//! [`InboundBody::Unhandled`], which the dispatcher logs and drops - an
//! unknown message is never fatal.

use crate::header::MessageHeader;
use crate::messages::{ChannelData, ChannelMetadata, GetResourcesResponse, OpenSession, StoreObject};
use serde::{Deserialize, Serialize};

/// Decoded body of an inbound message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InboundBody {
    OpenSession(OpenSession),
    ChannelMetadata(ChannelMetadata),
    ChannelData(ChannelData),
    GetResourcesResponse(GetResourcesResponse),
    StoreObject(StoreObject),
    /// No decoder for this (protocol, messageType) pair
    Unhandled,
}

/// A decoded inbound frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub header: MessageHeader,
    pub body: InboundBody,
}
