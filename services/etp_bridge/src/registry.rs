//! # Channel Registry
//!
//! ## Purpose
//!
//! Maps session-scoped channel ids to their descriptors so the streaming
//! aggregator can resolve every data sample to its owning log, channel name,
//! and unit. Populated exclusively from ChannelMetadata responses; entries
//! are never mutated afterwards and live until the session ends - there is no
//! per-channel unsubscribe in this engine.

use dashmap::DashMap;
use etp_protocol::messages::{ChannelMetadata, ChannelMetadataRecord};
use etp_types::EntityUri;
use std::sync::Arc;
use tracing::{debug, warn};

/// One active streaming channel, augmented with the identifiers parsed from
/// its source URI
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelEntry {
    pub channel_id: i64,
    pub channel_name: String,
    pub uom: String,
    pub data_type: String,
    pub channel_uri: String,
    pub well_uid: String,
    pub wellbore_uid: String,
    pub log_uid: String,
}

impl ChannelEntry {
    fn from_record(record: &ChannelMetadataRecord) -> Option<Self> {
        let uri = match EntityUri::parse(&record.channel_uri) {
            Ok(uri) => uri,
            Err(err) => {
                warn!(
                    channel_id = record.channel_id,
                    channel_uri = %record.channel_uri,
                    %err,
                    "skipping channel with unparseable source URI"
                );
                return None;
            }
        };
        let (Some(well), Some(wellbore), Some(log)) = (uri.well(), uri.wellbore(), uri.log())
        else {
            warn!(
                channel_id = record.channel_id,
                channel_uri = %record.channel_uri,
                "skipping channel whose URI does not address a log"
            );
            return None;
        };
        Some(Self {
            channel_id: record.channel_id,
            channel_name: record.channel_name.clone(),
            uom: record.uom.clone(),
            data_type: record.data_type.clone(),
            channel_uri: record.channel_uri.clone(),
            well_uid: well.to_string(),
            wellbore_uid: wellbore.to_string(),
            log_uid: log.to_string(),
        })
    }
}

/// Channel-id index, owned by the engine with session lifetime
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: DashMap<i64, Arc<ChannelEntry>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every descriptor in a metadata response, returning the ids
    /// just registered in response order. Descriptors whose source URI cannot
    /// be parsed down to a log are skipped.
    pub fn register_from_metadata(&self, metadata: &ChannelMetadata) -> Vec<i64> {
        let mut registered = Vec::with_capacity(metadata.channels.len());
        for record in &metadata.channels {
            let Some(entry) = ChannelEntry::from_record(record) else {
                continue;
            };
            debug!(
                channel_id = entry.channel_id,
                channel_name = %entry.channel_name,
                log_uid = %entry.log_uid,
                "registered streaming channel"
            );
            self.channels.insert(entry.channel_id, Arc::new(entry));
            registered.push(record.channel_id);
        }
        registered
    }

    pub fn get(&self, channel_id: i64) -> Option<Arc<ChannelEntry>> {
        self.channels.get(&channel_id).map(|e| e.value().clone())
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
