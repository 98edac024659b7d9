//! Engine configuration

use crate::error::{BridgeError, Result};
use etp_types::MnemonicSpec;

/// Application identity and destination-log options, fixed at construction
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Application name advertised in RequestSession
    pub application_name: String,
    /// Application version advertised in RequestSession
    pub application_version: String,
    /// When set, a `start` stream command first creates a destination log in
    /// the store before describing channels
    pub create_destination_log_on_stream_start: bool,
    pub destination_log_name: Option<String>,
    pub destination_log_uid: Option<String>,
    pub destination_mnemonics: Option<Vec<MnemonicSpec>>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            application_name: "wellbridge".to_string(),
            application_version: "1.0.0.0".to_string(),
            create_destination_log_on_stream_start: false,
            destination_log_name: None,
            destination_log_uid: None,
            destination_mnemonics: None,
        }
    }
}

/// Validated destination-log options, immutable for the engine's lifetime
#[derive(Debug, Clone)]
pub struct DestinationLogSpec {
    pub log_name: String,
    pub log_uid: String,
    pub mnemonics: Vec<MnemonicSpec>,
}

impl BridgeConfig {
    /// Validate the destination-log options.
    ///
    /// Fails before any connection is attempted when auto-creation is enabled
    /// but the log name, log uid, or mnemonic list is missing.
    pub fn destination_log_spec(&self) -> Result<Option<DestinationLogSpec>> {
        if !self.create_destination_log_on_stream_start {
            return Ok(None);
        }
        let log_name = match self.destination_log_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                return Err(BridgeError::Configuration(
                    "destination_log_name required when enabling destination log creation on stream start".to_string(),
                ))
            }
        };
        let log_uid = match self.destination_log_uid.as_deref() {
            Some(uid) if !uid.is_empty() => uid.to_string(),
            _ => {
                return Err(BridgeError::Configuration(
                    "destination_log_uid required when enabling destination log creation on stream start".to_string(),
                ))
            }
        };
        let mnemonics = match &self.destination_mnemonics {
            Some(mnemonics) => mnemonics.clone(),
            None => {
                return Err(BridgeError::Configuration(
                    "destination_mnemonics required when enabling destination log creation on stream start".to_string(),
                ))
            }
        };
        Ok(Some(DestinationLogSpec {
            log_name,
            log_uid,
            mnemonics,
        }))
    }
}
