//! ChannelStreaming protocol bodies
//!
//! The streaming flow is: `Start` arms the session, `ChannelDescribe` asks
//! the store to enumerate the channels behind a log URI, the store answers
//! with `ChannelMetadata`, `ChannelStreamingStart` subscribes to the
//! enumerated channel ids, and `ChannelData` batches then flow in.

use serde::{Deserialize, Serialize};

/// Arms streaming for the session with global rate/item caps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Start {
    pub max_data_items: i32,
    pub max_message_rate: i32,
}

/// Asks the store to describe the channels behind a set of URIs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDescribe {
    pub uris: Vec<String>,
}

/// One channel descriptor within a metadata response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMetadataRecord {
    pub channel_id: i64,
    pub channel_uri: String,
    pub channel_name: String,
    pub data_type: String,
    pub uom: String,
    #[serde(default)]
    pub description: String,
}

/// Store response enumerating channels for a described URI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMetadata {
    pub channels: Vec<ChannelMetadataRecord>,
}

/// Subscription entry naming one channel id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStreamingInfo {
    pub channel_id: i64,
    pub receive_change_notification: bool,
}

/// Starts streaming for an explicit set of channel ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStreamingStart {
    pub channels: Vec<ChannelStreamingInfo>,
}

/// One sample: channel id, index vector (index 0 is the timestamp), value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataItem {
    pub channel_id: i64,
    pub indexes: Vec<i64>,
    pub value: DataValue,
}

/// A streamed batch of samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelData {
    pub data: Vec<DataItem>,
}

/// Wrapper matching the schema's `DataValue` record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataValue {
    pub item: DataValueItem,
}

/// The wire value union, tagged by schema branch name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataValueItem {
    Double(f64),
    Float(f32),
    Long(i64),
    Int(i32),
    String(String),
    Boolean(bool),
    Bytes(Vec<u8>),
    Null,
}

impl DataValueItem {
    /// Project into a JSON value for downstream row payloads
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Double(v) => serde_json::json!(v),
            Self::Float(v) => serde_json::json!(v),
            Self::Long(v) => serde_json::json!(v),
            Self::Int(v) => serde_json::json!(v),
            Self::String(v) => serde_json::json!(v),
            Self::Boolean(v) => serde_json::json!(v),
            Self::Bytes(v) => serde_json::json!(v),
            Self::Null => serde_json::Value::Null,
        }
    }
}
