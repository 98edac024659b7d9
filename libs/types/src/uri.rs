//! # Hierarchical Entity URIs
//!
//! ## Purpose
//!
//! Parse and build the `eml://witsml14/...` addressing scheme used by the
//! store for its well ⊃ wellbore ⊃ log containment hierarchy. A full log
//! address looks like:
//!
//! ```text
//! eml://witsml14/well(W-01)/wellbore(B-02)/log(L-03)
//! ```
//!
//! Trailing segments are optional - `eml://witsml14/well(W-01)` is a valid
//! well address. Each segment is a kind label followed by a parenthesized
//! identifier; segment kinds are unique within one URI.
//!
//! Parsing is total over arbitrary input: malformed URIs yield a [`UriError`],
//! never a panic. Callers in the discovery path treat a parse failure as
//! "this resource cannot be addressed, skip it" rather than as fatal.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Fixed namespace prefix for every entity URI this client understands.
pub const NAMESPACE_PREFIX: &str = "eml://witsml14/";

/// Errors produced while parsing an entity URI
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UriError {
    /// URI does not start with the supported namespace prefix
    #[error("URI outside supported namespace (expected {NAMESPACE_PREFIX} prefix): {uri}")]
    UnsupportedNamespace { uri: String },

    /// A segment has no parenthesized identifier, e.g. `well` instead of `well(W-01)`
    #[error("segment has no parenthesized identifier: {segment}")]
    MissingIdentifier { segment: String },

    /// A segment kind label is not one of well/wellbore/log/rig
    #[error("unknown segment kind: {segment}")]
    UnknownSegmentKind { segment: String },

    /// The same segment kind appears twice in one URI
    #[error("duplicate segment kind: {kind}")]
    DuplicateSegmentKind { kind: SegmentKind },

    /// URI carries a namespace prefix but no segments at all
    #[error("URI has no entity segments: {uri}")]
    Empty { uri: String },
}

/// Kind label of one URI segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Well,
    Wellbore,
    Log,
    Rig,
}

impl SegmentKind {
    /// Parse a segment label as it appears on the wire
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "well" => Some(Self::Well),
            "wellbore" => Some(Self::Wellbore),
            "log" => Some(Self::Log),
            "rig" => Some(Self::Rig),
            _ => None,
        }
    }

    /// Wire label for this kind
    pub fn label(&self) -> &'static str {
        match self {
            Self::Well => "well",
            Self::Wellbore => "wellbore",
            Self::Log => "log",
            Self::Rig => "rig",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parsed form of a hierarchical entity URI
///
/// Immutable once built. Segment order is preserved from the input (or from
/// construction), and each kind appears at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityUri {
    segments: Vec<(SegmentKind, String)>,
}

impl EntityUri {
    /// Parse an entity URI string.
    ///
    /// Strips the fixed namespace prefix, splits the remainder on `/`, then
    /// splits each segment on `(` with a trailing `)` to recover its kind and
    /// identifier.
    pub fn parse(uri: &str) -> Result<Self, UriError> {
        let rest = uri
            .strip_prefix(NAMESPACE_PREFIX)
            .ok_or_else(|| UriError::UnsupportedNamespace {
                uri: uri.to_string(),
            })?;

        let mut segments: Vec<(SegmentKind, String)> = Vec::new();
        for raw in rest.split('/').filter(|s| !s.is_empty()) {
            let (label, id) = split_segment(raw)?;
            let kind =
                SegmentKind::from_label(label).ok_or_else(|| UriError::UnknownSegmentKind {
                    segment: raw.to_string(),
                })?;
            if segments.iter().any(|(k, _)| *k == kind) {
                return Err(UriError::DuplicateSegmentKind { kind });
            }
            segments.push((kind, id.to_string()));
        }

        if segments.is_empty() {
            return Err(UriError::Empty {
                uri: uri.to_string(),
            });
        }

        Ok(Self { segments })
    }

    /// Build the canonical log address `well(W)/wellbore(B)/log(L)`.
    ///
    /// This is the form used whenever the engine must address a specific log:
    /// store puts, stream describes, and data-topic naming.
    pub fn for_log(well_uid: &str, wellbore_uid: &str, log_uid: &str) -> Self {
        Self {
            segments: vec![
                (SegmentKind::Well, well_uid.to_string()),
                (SegmentKind::Wellbore, wellbore_uid.to_string()),
                (SegmentKind::Log, log_uid.to_string()),
            ],
        }
    }

    fn get(&self, kind: SegmentKind) -> Option<&str> {
        self.segments
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, id)| id.as_str())
    }

    /// Well identifier, if the URI has a well segment
    pub fn well(&self) -> Option<&str> {
        self.get(SegmentKind::Well)
    }

    /// Wellbore identifier, if present
    pub fn wellbore(&self) -> Option<&str> {
        self.get(SegmentKind::Wellbore)
    }

    /// Log identifier, if present
    pub fn log(&self) -> Option<&str> {
        self.get(SegmentKind::Log)
    }

    /// Rig identifier, if present
    pub fn rig(&self) -> Option<&str> {
        self.get(SegmentKind::Rig)
    }

    /// Segments in input order
    pub fn segments(&self) -> &[(SegmentKind, String)] {
        &self.segments
    }

    /// Render back to the full URI string, prefix included
    pub fn to_uri_string(&self) -> String {
        let mut out = String::from(NAMESPACE_PREFIX);
        for (i, (kind, id)) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('/');
            }
            out.push_str(kind.label());
            out.push('(');
            out.push_str(id);
            out.push(')');
        }
        out
    }
}

impl fmt::Display for EntityUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri_string())
    }
}

/// Split one raw segment `kind(id)` into its label and identifier.
fn split_segment(raw: &str) -> Result<(&str, &str), UriError> {
    let missing = || UriError::MissingIdentifier {
        segment: raw.to_string(),
    };
    let open = raw.find('(').ok_or_else(missing)?;
    let inner = raw[open + 1..].strip_suffix(')').ok_or_else(missing)?;
    if inner.is_empty() {
        return Err(missing());
    }
    Ok((&raw[..open], inner))
}

/// Default root URIs issued by periodic discovery.
///
/// Rig is reserved: the store exposes it but the current engine never
/// enumerates rigs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryRoot {
    Log,
    Well,
    Wellbore,
    Rig,
}

impl DiscoveryRoot {
    /// Root URI string for this entity kind
    pub fn as_uri(&self) -> &'static str {
        match self {
            Self::Log => "eml://witsml14/log",
            Self::Well => "eml://witsml14/well",
            Self::Wellbore => "eml://witsml14/wellbore",
            Self::Rig => "eml://witsml14/rig",
        }
    }

    /// The roots enumerated on every discovery refresh
    pub const REFRESHED: [DiscoveryRoot; 3] =
        [DiscoveryRoot::Log, DiscoveryRoot::Well, DiscoveryRoot::Wellbore];
}
