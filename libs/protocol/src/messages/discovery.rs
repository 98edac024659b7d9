//! Discovery protocol bodies

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Asks the store to enumerate resources under a root or entity URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResources {
    pub uri: String,
}

/// A discoverable entity descriptor
///
/// `last_changed` is in the protocol's native sub-second units; consumers
/// divide by 1000 before treating it as an epoch-millisecond timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub uri: String,
    pub content_type: String,
    pub name: String,
    pub resource_type: String,
    #[serde(default)]
    pub custom_data: HashMap<String, String>,
    #[serde(default)]
    pub last_changed: i64,
    #[serde(default)]
    pub channel_subscribable: bool,
    #[serde(default)]
    pub object_notifiable: bool,
}

impl Resource {
    /// Minimal resource attached to an outbound store object
    pub fn data_object(uri: &str, content_type: String) -> Self {
        Self {
            uri: uri.to_string(),
            content_type,
            name: String::new(),
            resource_type: "DataObject".to_string(),
            custom_data: HashMap::new(),
            last_changed: 0,
            channel_subscribable: false,
            object_notifiable: false,
        }
    }
}

/// One enumerated resource; the store answers a GetResources with a stream
/// of these, one per entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResourcesResponse {
    pub resource: Resource,
}
