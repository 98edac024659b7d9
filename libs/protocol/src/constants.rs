//! Protocol and message-type identifiers
//!
//! Numeric ids as fixed by the ETP v1.1 specification. Inbound routing keys
//! are the (protocol, messageType) pair from the header; [`body_schema`]
//! resolves that pair to the schema the body decodes against.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Websocket subprotocol negotiated when connecting to an ETP endpoint
pub const ETP_WEBSOCKET_SUBPROTOCOL: &str = "energistics-tp";

/// ETP sub-protocol identifiers
///
/// StoreNotification and GrowingObject are advertised in the session
/// capability set but carry no message handlers in this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum ProtocolId {
    Core = 0,
    ChannelStreaming = 1,
    Discovery = 3,
    Store = 4,
    StoreNotification = 5,
    GrowingObject = 6,
}

/// Core protocol message types
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum CoreMessageType {
    RequestSession = 1,
    OpenSession = 2,
}

/// ChannelStreaming protocol message types
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum ChannelStreamingMessageType {
    Start = 0,
    ChannelDescribe = 1,
    ChannelMetadata = 2,
    ChannelData = 3,
    ChannelStreamingStart = 4,
}

/// Discovery protocol message types
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum DiscoveryMessageType {
    GetResources = 1,
    GetResourcesResponse = 2,
}

/// Store protocol message types
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum StoreMessageType {
    GetObject = 1,
    PutObject = 2,
    DeleteObject = 3,
    Object = 4,
}

/// Avro schema names for every value that crosses the codec boundary
pub mod schemas {
    pub const MESSAGE_HEADER: &str = "Energistics.Datatypes.MessageHeader";

    pub const REQUEST_SESSION: &str = "Energistics.Protocol.Core.RequestSession";
    pub const OPEN_SESSION: &str = "Energistics.Protocol.Core.OpenSession";

    pub const CHANNEL_STREAMING_START: &str = "Energistics.Protocol.ChannelStreaming.Start";
    pub const CHANNEL_DESCRIBE: &str = "Energistics.Protocol.ChannelStreaming.ChannelDescribe";
    pub const CHANNEL_METADATA: &str = "Energistics.Protocol.ChannelStreaming.ChannelMetadata";
    pub const CHANNEL_DATA: &str = "Energistics.Protocol.ChannelStreaming.ChannelData";
    pub const CHANNEL_STREAMING_START_CHANNELS: &str =
        "Energistics.Protocol.ChannelStreaming.ChannelStreamingStart";

    pub const GET_RESOURCES: &str = "Energistics.Protocol.Discovery.GetResources";
    pub const GET_RESOURCES_RESPONSE: &str =
        "Energistics.Protocol.Discovery.GetResourcesResponse";

    pub const PUT_OBJECT: &str = "Energistics.Protocol.Store.PutObject";
    pub const STORE_OBJECT: &str = "Energistics.Protocol.Store.Object";
}

/// Resolve the body schema for an inbound (protocol, messageType) pair.
///
/// Only the message kinds this client decodes resolve; outbound-only kinds
/// and unknown pairs yield `None`, which the dispatcher logs and drops.
pub fn body_schema(protocol: i32, message_type: i32) -> Option<&'static str> {
    let protocol = ProtocolId::try_from(protocol).ok()?;
    match protocol {
        ProtocolId::Core => match CoreMessageType::try_from(message_type).ok()? {
            CoreMessageType::OpenSession => Some(schemas::OPEN_SESSION),
            CoreMessageType::RequestSession => None,
        },
        ProtocolId::ChannelStreaming => {
            match ChannelStreamingMessageType::try_from(message_type).ok()? {
                ChannelStreamingMessageType::ChannelMetadata => Some(schemas::CHANNEL_METADATA),
                ChannelStreamingMessageType::ChannelData => Some(schemas::CHANNEL_DATA),
                ChannelStreamingMessageType::Start
                | ChannelStreamingMessageType::ChannelDescribe
                | ChannelStreamingMessageType::ChannelStreamingStart => None,
            }
        }
        ProtocolId::Discovery => match DiscoveryMessageType::try_from(message_type).ok()? {
            DiscoveryMessageType::GetResourcesResponse => Some(schemas::GET_RESOURCES_RESPONSE),
            DiscoveryMessageType::GetResources => None,
        },
        ProtocolId::Store => match StoreMessageType::try_from(message_type).ok()? {
            StoreMessageType::Object => Some(schemas::STORE_OBJECT),
            StoreMessageType::GetObject
            | StoreMessageType::PutObject
            | StoreMessageType::DeleteObject => None,
        },
        ProtocolId::StoreNotification | ProtocolId::GrowingObject => None,
    }
}
