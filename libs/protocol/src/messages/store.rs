//! Store protocol bodies

use super::discovery::Resource;
use serde::{Deserialize, Serialize};

/// Opaque data object: resource descriptor plus serialized document bytes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataObject {
    pub resource: Resource,
    pub content_encoding: String,
    pub data: Vec<u8>,
}

/// Unconditional create-or-overwrite of a data object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutObject {
    pub data_object: DataObject,
}

/// Inbound data object (response to a GetObject, or unsolicited)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreObject {
    pub data_object: DataObject,
}
