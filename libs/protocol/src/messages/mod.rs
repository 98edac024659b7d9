//! Message body records, one module per sub-protocol.
//!
//! Shapes and field names mirror the Energistics schema set; the injected
//! codec encodes them against those schemas by name.

pub mod channel_streaming;
pub mod core;
pub mod discovery;
pub mod store;

pub use channel_streaming::{
    ChannelData, ChannelDescribe, ChannelMetadata, ChannelMetadataRecord, ChannelStreamingInfo,
    ChannelStreamingStart, DataItem, DataValue, DataValueItem, Start,
};
pub use self::core::{OpenSession, RequestSession, SupportedProtocol, Version};
pub use discovery::{GetResources, GetResourcesResponse, Resource};
pub use store::{DataObject, PutObject, StoreObject};
