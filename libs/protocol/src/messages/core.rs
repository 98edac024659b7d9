//! Core protocol bodies: session negotiation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::channel_streaming::DataValue;

/// Protocol version advertised per capability entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub major: i32,
    pub minor: i32,
    pub revision: i32,
    pub patch: i32,
}

impl Version {
    pub fn new(major: i32, minor: i32) -> Self {
        Self {
            major,
            minor,
            ..Default::default()
        }
    }
}

/// One protocol the client offers to speak, and in which role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedProtocol {
    pub protocol: i32,
    pub protocol_version: Version,
    pub role: String,
    pub protocol_capabilities: HashMap<String, DataValue>,
}

impl SupportedProtocol {
    pub fn new(protocol: impl Into<i32>, version: Version, role: &str) -> Self {
        Self {
            protocol: protocol.into(),
            protocol_version: version,
            role: role.to_string(),
            protocol_capabilities: HashMap::new(),
        }
    }
}

/// Opens the session: first message on the wire after connect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSession {
    pub application_name: String,
    pub application_version: String,
    pub requested_protocols: Vec<SupportedProtocol>,
    pub supported_objects: Vec<String>,
}

/// Server acknowledgement that the session is open
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSession {
    pub application_name: String,
    pub application_version: String,
    pub session_id: String,
    pub supported_protocols: Vec<SupportedProtocol>,
    pub supported_objects: Vec<String>,
}
