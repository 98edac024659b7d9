//! # Discovery Resolver
//!
//! ## Purpose
//!
//! Turns GetResourcesResponse messages into metadata-store upserts. Each
//! resource is classified by the `type=` parameter of its content type,
//! addressed by parsing its URI, and written into the collection for its
//! kind, keyed by URI. Classification and parse failures drop the resource
//! (with a log line) and never disturb the session.
//!
//! Wire `lastChanged` values are in the protocol's native sub-second units
//! and are divided by 1000 before being interpreted as epoch milliseconds.

use crate::error::{BridgeError, Result};
use crate::ports::MetadataStore;
use chrono::{DateTime, Utc};
use etp_protocol::messages::{GetResourcesResponse, Resource};
use etp_types::{
    type_parameter, EntityUri, LogRecord, ResourceKind, WellRecord, WellboreRecord,
};
use std::sync::Arc;
use tracing::{debug, warn};

fn wire_timestamp(raw: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(raw / 1000).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Classify a resource by the `type=` parameter of its content type
fn classify(resource: &Resource) -> Result<Option<ResourceKind>> {
    let label = type_parameter(&resource.content_type).ok_or_else(|| {
        BridgeError::UnclassifiableContentType {
            content_type: resource.content_type.clone(),
        }
    })?;
    Ok(ResourceKind::from_label(label))
}

/// Upserts discovered resources into the metadata store
pub struct DiscoveryResolver {
    store: Arc<dyn MetadataStore>,
}

impl DiscoveryResolver {
    pub fn new(store: Arc<dyn MetadataStore>) -> Self {
        Self { store }
    }

    /// Classify and upsert one discovered resource
    pub async fn apply(&self, response: &GetResourcesResponse) {
        let resource = &response.resource;

        let kind = match classify(resource) {
            Ok(Some(kind)) => kind,
            Ok(None) => {
                warn!(
                    content_type = %resource.content_type,
                    uri = %resource.uri,
                    "no handler for resource content kind"
                );
                return;
            }
            Err(err) => {
                warn!(uri = %resource.uri, %err, "dropping resource");
                return;
            }
        };

        // An unparseable URI means the resource cannot be addressed; skip it.
        let uri = match EntityUri::parse(&resource.uri) {
            Ok(uri) => uri,
            Err(err) => {
                debug!(uri = %resource.uri, %err, "skipping resource with unparseable URI");
                return;
            }
        };

        let result = match kind {
            ResourceKind::Well => self.upsert_well(resource, &uri).await,
            ResourceKind::Wellbore => self.upsert_wellbore(resource, &uri).await,
            ResourceKind::Log => self.upsert_log(resource, &uri).await,
            ResourceKind::Rig => {
                debug!(uri = %resource.uri, "rig resources are not tracked");
                Ok(())
            }
        };
        if let Err(err) = result {
            warn!(uri = %resource.uri, %err, "failed to upsert discovered resource");
        }
    }

    async fn upsert_well(&self, resource: &Resource, uri: &EntityUri) -> Result<()> {
        let Some(uid) = uri.well() else {
            debug!(uri = %resource.uri, "well resource URI has no well segment");
            return Ok(());
        };
        debug!(uri = %resource.uri, "upserting well");
        self.store
            .upsert_well(WellRecord {
                uid: uid.to_string(),
                uri: resource.uri.clone(),
                name: resource.name.clone(),
                last_updated: Utc::now(),
                custom_data: resource.custom_data.clone(),
                last_changed: wire_timestamp(resource.last_changed),
                object_notifiable: resource.object_notifiable,
                channel_subscribable: resource.channel_subscribable,
            })
            .await
    }

    async fn upsert_wellbore(&self, resource: &Resource, uri: &EntityUri) -> Result<()> {
        let Some(uid) = uri.wellbore() else {
            debug!(uri = %resource.uri, "wellbore resource URI has no wellbore segment");
            return Ok(());
        };
        debug!(uri = %resource.uri, "upserting wellbore");
        self.store
            .upsert_wellbore(WellboreRecord {
                uid: uid.to_string(),
                uri: resource.uri.clone(),
                name: resource.name.clone(),
                last_updated: Utc::now(),
                custom_data: resource.custom_data.clone(),
                last_changed: wire_timestamp(resource.last_changed),
                object_notifiable: resource.object_notifiable,
                channel_subscribable: resource.channel_subscribable,
                parent_well_uid: uri.well().map(str::to_string),
            })
            .await
    }

    async fn upsert_log(&self, resource: &Resource, uri: &EntityUri) -> Result<()> {
        let Some(uid) = uri.log() else {
            debug!(uri = %resource.uri, "log resource URI has no log segment");
            return Ok(());
        };
        debug!(uri = %resource.uri, "upserting log");
        self.store
            .upsert_log(LogRecord {
                uid: uid.to_string(),
                uri: resource.uri.clone(),
                name: resource.name.clone(),
                last_updated: Utc::now(),
                custom_data: resource.custom_data.clone(),
                last_changed: wire_timestamp(resource.last_changed),
                object_notifiable: resource.object_notifiable,
                channel_subscribable: resource.channel_subscribable,
                parent_well_uid: uri.well().map(str::to_string),
                parent_wellbore_uid: uri.wellbore().map(str::to_string),
            })
            .await
    }
}
