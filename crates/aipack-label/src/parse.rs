//! Namespace-aware extraction of identity fields from a PDS4 label.
//!
//! Elements are matched by (namespace, local name) against the static PDS4
//! common namespace; a label using an unnamed default namespace therefore
//! resolves exactly like one using an explicit prefix. Elements carrying no
//! namespace at all are accepted as PDS elements.

use crate::error::{LabelError, Result};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use std::path::Path;

/// The PDS4 common schema namespace.
pub const PDS_NS: &str = "http://pds.nasa.gov/pds4/pds/v1";

/// Local-name prefix shared by all recognized product root elements.
pub const PRODUCT_PREFIX: &str = "Product_";

/// Fields extracted from one PDS4 label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLabel {
    /// Root element local name (e.g. `Product_Observational`).
    pub product_class: String,
    /// Raw logical identifier text.
    pub lid: String,
    /// Raw version identifier text.
    pub vid: String,
    /// Every `file_name` element text, in document order.
    pub referenced_files: Vec<String>,
}

fn in_pds_namespace(ns: &ResolveResult<'_>) -> bool {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => *uri == PDS_NS.as_bytes(),
        ResolveResult::Unbound => true,
        ResolveResult::Unknown(_) => false,
    }
}

/// Parse a label from a string.
///
/// The LID and VID are taken from the first `logical_identifier` and
/// `version_id` directly under `Identification_Area`; the deeper
/// `Modification_Detail/version_id` entries never match.
pub fn parse_label_str(xml: &str) -> Result<ParsedLabel> {
    let mut reader = NsReader::from_str(xml);

    // (local name, element is in the PDS namespace)
    let mut stack: Vec<(String, bool)> = Vec::new();
    let mut product_class: Option<String> = None;
    let mut lid: Option<String> = None;
    let mut vid: Option<String> = None;
    let mut referenced_files: Vec<String> = Vec::new();

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        match event {
            Event::Start(e) => {
                let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let in_pds = in_pds_namespace(&ns);
                if stack.is_empty() {
                    if !in_pds || !local.starts_with(PRODUCT_PREFIX) {
                        return Err(LabelError::NotAProduct { root: local });
                    }
                    product_class = Some(local.clone());
                }
                stack.push((local, in_pds));
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                if identification_field(&stack, "logical_identifier") && lid.is_none() {
                    lid = Some(text.to_string());
                } else if identification_field(&stack, "version_id") && vid.is_none() {
                    vid = Some(text.to_string());
                } else if matches!(stack.last(), Some((name, true)) if name == "file_name") {
                    referenced_files.push(text.to_string());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let product_class = product_class.ok_or(LabelError::NotAProduct {
        root: String::new(),
    })?;
    let lid = lid.ok_or(LabelError::MissingField {
        field: "logical_identifier",
    })?;
    let vid = vid.ok_or(LabelError::MissingField {
        field: "version_id",
    })?;

    Ok(ParsedLabel {
        product_class,
        lid,
        vid,
        referenced_files,
    })
}

/// True when the cursor sits on `<root>/Identification_Area/<field>`.
fn identification_field(stack: &[(String, bool)], field: &str) -> bool {
    match stack {
        [_, (area, true), (name, true)] => area == "Identification_Area" && name == field,
        _ => false,
    }
}

/// Parse a label file from disk.
pub fn parse_label(path: &Path) -> Result<ParsedLabel> {
    let xml = std::fs::read_to_string(path)?;
    parse_label_str(&xml)
}
