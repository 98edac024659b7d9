//! # WITSML Document Construction
//!
//! ## Purpose
//!
//! Builds the XML documents carried inside Store.PutObject: the verbose log
//! header written when a destination log is created, and the compact logData
//! document written when rows are appended. The store only cares about the
//! element structure, so documents are assembled with a small escaping
//! writer.

use etp_types::MnemonicSpec;
use std::fmt::Write;

/// One row of log data: mnemonic -> value in caller-supplied column order.
///
/// Column order within the serialized document follows this order exactly;
/// callers needing deterministic columns supply pre-ordered rows.
pub type LogRow = Vec<(String, String)>;

const LOGS_ATTRIBUTES: &str = concat!(
    r#"xmlns:xlink="http://www.w3.org/1999/xlink" "#,
    r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" "#,
    r#"xmlns:dc="http://purl.org/dc/terms/" "#,
    r#"xmlns:gml="http://www.opengis.net/gml/3.2" "#,
    r#"version="1.4.1.1" "#,
    r#"xmlns="http://www.witsml.org/schemas/1series""#,
);

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn open_log_element(out: &mut String, well_uid: &str, wellbore_uid: &str, log_uid: &str) {
    let _ = write!(
        out,
        r#"<logs {LOGS_ATTRIBUTES}><log uidWell="{}" uidWellbore="{}" uid="{}">"#,
        escape_xml(well_uid),
        escape_xml(wellbore_uid),
        escape_xml(log_uid),
    );
}

fn text_element(out: &mut String, name: &str, text: &str) {
    let _ = write!(out, "<{name}>{}</{name}>", escape_xml(text));
}

/// Log header document for an unconditional create-or-overwrite.
///
/// The index is fixed to a date-time `Time` curve, and one curve-info entry
/// is written per mnemonic. `nameWell`/`nameWellbore` carry placeholder text:
/// the store resolves the real names from the uid attributes, but the
/// elements cannot be empty.
pub fn create_log_document(
    well_uid: &str,
    wellbore_uid: &str,
    log_uid: &str,
    log_name: &str,
    mnemonics: &[MnemonicSpec],
) -> String {
    let mut out = String::new();
    open_log_element(&mut out, well_uid, wellbore_uid, log_uid);
    text_element(&mut out, "nameWell", "noop");
    text_element(&mut out, "nameWellbore", "noop");
    text_element(&mut out, "name", log_name);
    text_element(&mut out, "indexType", "date time");
    text_element(&mut out, "indexCurve", "Time");
    for spec in mnemonics {
        let _ = write!(out, r#"<logCurveInfo uid="{}">"#, escape_xml(&spec.mnemonic));
        text_element(&mut out, "mnemonic", &spec.mnemonic);
        text_element(&mut out, "unit", &spec.unit);
        text_element(&mut out, "typeLogData", &spec.data_type);
        out.push_str("</logCurveInfo>");
    }
    out.push_str("</log></logs>");
    out
}

/// Data-append document: one `logData` entry per row.
///
/// Units are not required by the store, but the `unitList` node must match
/// the mnemonic count, so it is rendered as empty units at the same
/// cardinality (n-1 separators, trailing separator trimmed).
pub fn log_data_document(
    well_uid: &str,
    wellbore_uid: &str,
    log_uid: &str,
    rows: &[LogRow],
) -> String {
    let mut out = String::new();
    open_log_element(&mut out, well_uid, wellbore_uid, log_uid);
    for row in rows {
        let mnemonic_list = row
            .iter()
            .map(|(mnemonic, _)| mnemonic.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let unit_list = ",".repeat(row.len().saturating_sub(1));
        let data_list = row
            .iter()
            .map(|(_, value)| value.as_str())
            .collect::<Vec<_>>()
            .join(",");
        out.push_str("<logData>");
        text_element(&mut out, "mnemonicList", &mnemonic_list);
        text_element(&mut out, "unitList", &unit_list);
        text_element(&mut out, "data", &data_list);
        out.push_str("</logData>");
    }
    out.push_str("</log></logs>");
    out
}
