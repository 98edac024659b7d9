//! # Streaming Data Aggregator
//!
//! ## Purpose
//!
//! Demultiplexes a raw ChannelData batch - per-channel samples interleaved
//! across logs - into per-log, per-timestamp rows and fans each log's rows
//! out as one message on its derived data topic.
//!
//! ## Algorithm
//!
//! 1. Resolve each sample's channel id through the registry; samples for
//!    unknown ids are dropped and logged (protocol-correctness violation).
//! 2. Group samples by owning log uid, then by the sample's primary index
//!    (`indexes[0]`, the timestamp). Samples sharing a (log, timestamp) land
//!    in one row as `{channelName: {units, value}}` entries.
//! 3. Render each log's rows in insertion order of first-seen timestamp -
//!    NOT sorted by time. Upstream sample order is preserved on purpose:
//!    downstream consumers may depend on the existing order, so reordering
//!    here would be a behavior change, not a fix.
//! 4. Publish one JSON array per log on
//!    `etp/stream/incoming/<well_uid>/<wellbore_uid>/<log_uid>`.
//!
//! Raw index values are in the protocol's native sub-second units; divide by
//! 1000 before interpreting as epoch milliseconds.

use crate::error::Result;
use crate::ports::PubSubBridge;
use crate::registry::ChannelRegistry;
use chrono::{DateTime, SecondsFormat};
use etp_protocol::messages::ChannelData;
use etp_types::StreamDataTopic;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Convert a raw channel index value to an epoch-millisecond timestamp
pub fn index_to_epoch_millis(raw: i64) -> i64 {
    raw / 1000
}

fn index_to_iso8601(raw: i64) -> Option<String> {
    DateTime::from_timestamp_millis(index_to_epoch_millis(raw))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Rows aggregated for one log, ready to publish
#[derive(Debug, Clone, PartialEq)]
pub struct LogRowBatch {
    pub log_uid: String,
    pub topic: String,
    pub rows: Vec<Value>,
}

/// Accumulator state while draining one batch
struct LogAccumulator {
    log_uid: String,
    topic: String,
    /// (timestamp, channelName -> {units, value}) in first-seen order
    rows: Vec<(i64, Map<String, Value>)>,
}

/// Demultiplexes ChannelData batches and publishes per-log row lists
pub struct StreamAggregator {
    registry: Arc<ChannelRegistry>,
    bridge: Arc<dyn PubSubBridge>,
}

impl StreamAggregator {
    pub fn new(registry: Arc<ChannelRegistry>, bridge: Arc<dyn PubSubBridge>) -> Self {
        Self { registry, bridge }
    }

    /// Aggregate one batch and publish at most one message per log present
    pub async fn process(&self, batch: &ChannelData) -> Result<()> {
        for group in aggregate(&self.registry, batch) {
            let payload = serde_json::to_vec(&group.rows)
                .map_err(|e| crate::error::BridgeError::Bridge(e.to_string()))?;
            debug!(
                log_uid = %group.log_uid,
                topic = %group.topic,
                rows = group.rows.len(),
                "publishing aggregated log rows"
            );
            self.bridge.publish(&group.topic, payload).await?;
        }
        Ok(())
    }
}

/// Pure aggregation step: batch in, per-log row lists out
pub fn aggregate(registry: &ChannelRegistry, batch: &ChannelData) -> Vec<LogRowBatch> {
    let mut groups: Vec<LogAccumulator> = Vec::new();

    for item in &batch.data {
        let Some(channel) = registry.get(item.channel_id) else {
            let err = crate::error::BridgeError::UnknownChannel {
                channel_id: item.channel_id,
            };
            warn!(%err, "dropping sample");
            continue;
        };
        let Some(&timestamp) = item.indexes.first() else {
            warn!(
                channel_id = item.channel_id,
                "dropping sample without a primary index"
            );
            continue;
        };

        let group_idx = groups
            .iter()
            .position(|g| g.log_uid == channel.log_uid)
            .unwrap_or_else(|| {
                groups.push(LogAccumulator {
                    log_uid: channel.log_uid.clone(),
                    topic: StreamDataTopic::new(
                        channel.well_uid.as_str(),
                        channel.wellbore_uid.as_str(),
                        channel.log_uid.as_str(),
                    )
                    .to_string(),
                    rows: Vec::new(),
                });
                groups.len() - 1
            });
        let group = &mut groups[group_idx];

        let row_idx = group
            .rows
            .iter()
            .position(|(ts, _)| *ts == timestamp)
            .unwrap_or_else(|| {
                group.rows.push((timestamp, Map::new()));
                group.rows.len() - 1
            });
        group.rows[row_idx].1.insert(
            channel.channel_name.clone(),
            json!({
                "units": channel.uom,
                "value": item.value.item.to_json(),
            }),
        );
    }

    groups
        .into_iter()
        .map(|group| {
            let rows = group
                .rows
                .into_iter()
                .filter_map(|(timestamp, mut row)| match index_to_iso8601(timestamp) {
                    Some(time) => {
                        row.insert("time".to_string(), Value::String(time));
                        Some(Value::Object(row))
                    }
                    None => {
                        warn!(timestamp, "dropping row with out-of-range timestamp");
                        None
                    }
                })
                .collect();
            LogRowBatch {
                log_uid: group.log_uid,
                topic: group.topic,
                rows,
            }
        })
        .collect()
}
