//! # Outbound Message Factory & Sequencer
//!
//! ## Purpose
//!
//! Builds the `{header, schema, body}` triple for every message kind the
//! client emits, assigning each a fresh message id from the session's
//! monotonic counter. Ids start at 1, increment by one per built message, and
//! are never reused. The factory mutates nothing but that counter - encoding
//! and I/O happen elsewhere, which is also why the engine wraps the factory
//! and the transport write in one lock: id allocation and frame write form a
//! single atomic unit.

use crate::constants::{
    schemas, ChannelStreamingMessageType, CoreMessageType, DiscoveryMessageType, ProtocolId,
    StoreMessageType,
};
use crate::header::MessageHeader;
use crate::messages::{
    ChannelDescribe, ChannelStreamingInfo, ChannelStreamingStart, DataObject, GetResources,
    PutObject, RequestSession, Resource, Start, SupportedProtocol, Version,
};
use etp_types::{witsml_content_type, ResourceKind};
use serde::{Deserialize, Serialize};

/// Global streaming cap: maximum messages per second the store may send
pub const MAX_MESSAGE_RATE: i32 = 1000;

/// Global streaming cap: maximum data items per message
pub const MAX_DATA_ITEMS: i32 = 10_000;

/// Body of an outbound message, one variant per emitted kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutboundBody {
    RequestSession(RequestSession),
    Start(Start),
    ChannelDescribe(ChannelDescribe),
    ChannelStreamingStart(ChannelStreamingStart),
    GetResources(GetResources),
    PutObject(PutObject),
}

/// A fully assembled outbound message, ready for the codec
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub header: MessageHeader,
    pub schema: &'static str,
    pub body: OutboundBody,
}

/// Builds outbound messages and owns the session's message-id counter
#[derive(Debug)]
pub struct MessageFactory {
    next_message_id: i64,
    application_name: String,
    application_version: String,
}

impl MessageFactory {
    pub fn new(application_name: impl Into<String>, application_version: impl Into<String>) -> Self {
        Self {
            next_message_id: 1,
            application_name: application_name.into(),
            application_version: application_version.into(),
        }
    }

    /// Allocate the next message id. Strictly increasing, starts at 1.
    fn next_header(&mut self, protocol: ProtocolId, message_type: i32) -> MessageHeader {
        let header = MessageHeader::new(protocol, message_type, self.next_message_id);
        self.next_message_id += 1;
        header
    }

    /// Core.RequestSession carrying the fixed capability set: streaming as
    /// producer, the store-side protocols as store, all at v1.1.
    pub fn request_session(&mut self) -> OutboundMessage {
        let v1_1 = Version::new(1, 1);
        let requested_protocols = vec![
            SupportedProtocol::new(ProtocolId::ChannelStreaming, v1_1, "producer"),
            SupportedProtocol::new(ProtocolId::Discovery, v1_1, "store"),
            SupportedProtocol::new(ProtocolId::Store, v1_1, "store"),
            SupportedProtocol::new(ProtocolId::StoreNotification, v1_1, "store"),
            SupportedProtocol::new(ProtocolId::GrowingObject, v1_1, "store"),
        ];
        OutboundMessage {
            header: self.next_header(ProtocolId::Core, CoreMessageType::RequestSession.into()),
            schema: schemas::REQUEST_SESSION,
            body: OutboundBody::RequestSession(RequestSession {
                application_name: self.application_name.clone(),
                application_version: self.application_version.clone(),
                requested_protocols,
                supported_objects: Vec::new(),
            }),
        }
    }

    /// ChannelStreaming.Start arming idle streaming with the fixed caps
    pub fn channel_streaming_start(&mut self) -> OutboundMessage {
        OutboundMessage {
            header: self.next_header(
                ProtocolId::ChannelStreaming,
                ChannelStreamingMessageType::Start.into(),
            ),
            schema: schemas::CHANNEL_STREAMING_START,
            body: OutboundBody::Start(Start {
                max_data_items: MAX_DATA_ITEMS,
                max_message_rate: MAX_MESSAGE_RATE,
            }),
        }
    }

    /// ChannelStreaming.ChannelDescribe for a single log URI
    pub fn channel_describe(&mut self, uri: &str) -> OutboundMessage {
        OutboundMessage {
            header: self.next_header(
                ProtocolId::ChannelStreaming,
                ChannelStreamingMessageType::ChannelDescribe.into(),
            ),
            schema: schemas::CHANNEL_DESCRIBE,
            body: OutboundBody::ChannelDescribe(ChannelDescribe {
                uris: vec![uri.to_string()],
            }),
        }
    }

    /// ChannelStreaming.ChannelStreamingStart subscribing to explicit channel
    /// ids, change notification enabled for each
    pub fn channel_streaming_start_for(&mut self, channel_ids: &[i64]) -> OutboundMessage {
        let channels = channel_ids
            .iter()
            .map(|&channel_id| ChannelStreamingInfo {
                channel_id,
                receive_change_notification: true,
            })
            .collect();
        OutboundMessage {
            header: self.next_header(
                ProtocolId::ChannelStreaming,
                ChannelStreamingMessageType::ChannelStreamingStart.into(),
            ),
            schema: schemas::CHANNEL_STREAMING_START_CHANNELS,
            body: OutboundBody::ChannelStreamingStart(ChannelStreamingStart { channels }),
        }
    }

    /// Discovery.GetResources for a root or entity URI
    pub fn get_resources(&mut self, uri: &str) -> OutboundMessage {
        OutboundMessage {
            header: self.next_header(
                ProtocolId::Discovery,
                DiscoveryMessageType::GetResources.into(),
            ),
            schema: schemas::GET_RESOURCES,
            body: OutboundBody::GetResources(GetResources {
                uri: uri.to_string(),
            }),
        }
    }

    /// Store.PutObject carrying an opaque serialized document.
    ///
    /// The factory does not know the document format; it only attaches the
    /// addressing resource and content type.
    pub fn put_object(&mut self, uri: &str, kind: ResourceKind, data: Vec<u8>) -> OutboundMessage {
        OutboundMessage {
            header: self.next_header(ProtocolId::Store, StoreMessageType::PutObject.into()),
            schema: schemas::PUT_OBJECT,
            body: OutboundBody::PutObject(PutObject {
                data_object: DataObject {
                    resource: Resource::data_object(uri, witsml_content_type(kind)),
                    content_encoding: String::new(),
                    data,
                },
            }),
        }
    }
}
