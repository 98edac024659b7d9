//! Resource content-type classification
//!
//! Discovery responses carry a content-type string of the form
//! `application/x-witsml+xml;version=1.4.1.1;type=well`. The only part the
//! engine cares about is the `type=` parameter, which names the entity kind
//! the resource describes.

use std::fmt;

/// WITSML data-object version advertised in every content type this client
/// reads or writes.
pub const WITSML_VERSION: &str = "1.4.1.1";

/// Extract the `type=` parameter from a `;`-delimited content-type string.
///
/// The key match is case-sensitive and exact; a string with no `type=`
/// parameter yields `None`, which callers log and drop.
pub fn type_parameter(content_type: &str) -> Option<&str> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        (key == "type").then_some(value)
    })
}

/// Build the content-type string attached to an outbound store object.
pub fn witsml_content_type(kind: ResourceKind) -> String {
    format!("application/x-witsml+xml;version={WITSML_VERSION};type={kind}")
}

/// Entity kinds a discovered resource can classify as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Log,
    Well,
    Wellbore,
    Rig,
}

impl ResourceKind {
    /// Classify a `type=` parameter value
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "log" => Some(Self::Log),
            "well" => Some(Self::Well),
            "wellbore" => Some(Self::Wellbore),
            "rig" => Some(Self::Rig),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Log => "log",
            Self::Well => "well",
            Self::Wellbore => "wellbore",
            Self::Rig => "rig",
        })
    }
}
