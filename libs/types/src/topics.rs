//! Pub/sub topic construction
//!
//! Fixed control topics plus the per-log data topic. Data topics are built
//! from typed identifiers rather than ad hoc string substitution so a
//! malformed identifier cannot silently produce a malformed topic.

use std::fmt;

/// Topic the engine subscribes to for stream-control requests
pub const STREAM_REQUEST_TOPIC: &str = "etp/stream/request";

/// Topic the engine echoes annotated stream-control requests back on
pub const STREAM_RESPONSE_TOPIC: &str = "etp/stream/response";

const STREAM_DATA_PREFIX: &str = "etp/stream/incoming";

/// Per-log data topic `etp/stream/incoming/<well_uid>/<wellbore_uid>/<log_uid>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDataTopic {
    well_uid: String,
    wellbore_uid: String,
    log_uid: String,
}

impl StreamDataTopic {
    pub fn new(
        well_uid: impl Into<String>,
        wellbore_uid: impl Into<String>,
        log_uid: impl Into<String>,
    ) -> Self {
        Self {
            well_uid: well_uid.into(),
            wellbore_uid: wellbore_uid.into(),
            log_uid: log_uid.into(),
        }
    }
}

impl fmt::Display for StreamDataTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{STREAM_DATA_PREFIX}/{}/{}/{}",
            self.well_uid, self.wellbore_uid, self.log_uid
        )
    }
}
