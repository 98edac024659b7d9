//! Discovery metadata records
//!
//! Rows upserted into the external metadata store as resources are
//! enumerated. One record shape per entity kind; all three are keyed by `uri`
//! in their collections. `last_changed` carries the store's own modification
//! time (already converted from wire units to a real timestamp by the
//! discovery resolver); `last_updated` is the moment this client saw the
//! resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A discovered well
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellRecord {
    pub uid: String,
    pub uri: String,
    pub name: String,
    pub last_updated: DateTime<Utc>,
    pub custom_data: HashMap<String, String>,
    pub last_changed: DateTime<Utc>,
    pub object_notifiable: bool,
    pub channel_subscribable: bool,
}

/// A discovered wellbore, linked to its containing well
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellboreRecord {
    pub uid: String,
    pub uri: String,
    pub name: String,
    pub last_updated: DateTime<Utc>,
    pub custom_data: HashMap<String, String>,
    pub last_changed: DateTime<Utc>,
    pub object_notifiable: bool,
    pub channel_subscribable: bool,
    pub parent_well_uid: Option<String>,
}

/// A discovered log, linked to its containing well and wellbore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub uid: String,
    pub uri: String,
    pub name: String,
    pub last_updated: DateTime<Utc>,
    pub custom_data: HashMap<String, String>,
    pub last_changed: DateTime<Utc>,
    pub object_notifiable: bool,
    pub channel_subscribable: bool,
    pub parent_well_uid: Option<String>,
    pub parent_wellbore_uid: Option<String>,
}

/// Curve descriptor supplied when auto-creating a destination log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MnemonicSpec {
    pub mnemonic: String,
    pub unit: String,
    pub data_type: String,
}
