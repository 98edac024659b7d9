//! Stream-control requests
//!
//! Downstream consumers ask for channel streaming to start or stop by
//! publishing a JSON [`StreamRequest`] on the control request topic. The
//! engine processes the request once, annotates it with `error` (and `reason`
//! on failure), and echoes it back on the response topic.

use serde::{Deserialize, Serialize};

/// Command carried by a stream-control request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamCommand {
    Start,
    /// Accepted but unimplemented: no unsubscribe message exists in this
    /// engine, so stop does nothing.
    Stop,
    #[serde(other)]
    Unknown,
}

/// A control request arriving over the pub/sub bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRequest {
    pub command: StreamCommand,
    pub well_uid: String,
    pub wellbore_uid: String,
    pub log_uid: String,
    /// Set by the engine on the echoed response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
    /// Failure detail, present only when `error` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl StreamRequest {
    /// Annotate as successfully handled
    pub fn into_ok(mut self) -> Self {
        self.error = Some(false);
        self.reason = None;
        self
    }

    /// Annotate as failed with a reason
    pub fn into_failed(mut self, reason: impl Into<String>) -> Self {
        self.error = Some(true);
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_start_request() {
        let req: StreamRequest = serde_json::from_str(
            r#"{"command":"start","wellUid":"W1","wellboreUid":"B1","logUid":"L1"}"#,
        )
        .unwrap();
        assert_eq!(req.command, StreamCommand::Start);
        assert_eq!(req.well_uid, "W1");
        assert_eq!(req.error, None);
    }

    #[test]
    fn unrecognized_command_maps_to_unknown() {
        let req: StreamRequest = serde_json::from_str(
            r#"{"command":"pause","wellUid":"W1","wellboreUid":"B1","logUid":"L1"}"#,
        )
        .unwrap();
        assert_eq!(req.command, StreamCommand::Unknown);
    }

    #[test]
    fn echo_annotations() {
        let req: StreamRequest = serde_json::from_str(
            r#"{"command":"start","wellUid":"W1","wellboreUid":"B1","logUid":"L1"}"#,
        )
        .unwrap();
        let ok = req.clone().into_ok();
        assert_eq!(ok.error, Some(false));
        let failed = req.into_failed("no session");
        assert_eq!(failed.error, Some(true));
        assert_eq!(failed.reason.as_deref(), Some("no session"));

        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["error"], serde_json::json!(true));
        assert_eq!(json["wellUid"], serde_json::json!("W1"));
    }
}
