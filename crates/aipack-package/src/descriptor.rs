//! AIP descriptor generation.
//!
//! The descriptor is a PDS4 `Product_AIP` label produced by filling a
//! template document: a copy of the template is streamed event by event and
//! only the text of addressed elements is replaced, so every other byte of
//! the template — attributes, comments, formatting, the XML declaration and
//! its declared encoding — passes through unchanged.
//!
//! The transfer-manifest record geometry written here comes from the same
//! [`TransferFields`] instance the manifest writer returned. The two
//! artifacts can therefore never disagree.

use crate::error::{PackageError, Result};
use crate::manifest::ManifestInfo;
use crate::transfer::TransferFields;
use aipack_common::DeliveryName;
use quick_xml::events::{BytesEnd, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Free-text tag identifying the generating tool.
pub const GENERATOR_TAG: &str = "Generated by aipack";

/// Default descriptor template, bundled with the crate.
const DEFAULT_TEMPLATE: &str = include_str!("../templates/aip_template.xml");

/// Values filled into the descriptor template.
#[derive(Debug)]
pub struct DescriptorSpec<'a> {
    pub delivery: &'a DeliveryName,
    pub mission: &'a str,
    pub bundle: &'a str,
    pub transfer: &'a ManifestInfo,
    pub checksum: &'a ManifestInfo,
    pub fields: TransferFields,
}

impl DescriptorSpec<'_> {
    /// Element text replacements keyed by structural path. `Field_Character`
    /// children are addressed positionally, matching the fixed two-column
    /// record description.
    fn fills(&self) -> HashMap<String, String> {
        const IPC: &str = "Product_AIP/Information_Package_Component";
        let tm = format!("{IPC}/File_Area_Transfer_Manifest/Transfer_Manifest");

        let mut fills = HashMap::new();
        fills.insert(
            "Product_AIP/Identification_Area/logical_identifier".to_string(),
            format!(
                "urn:esa:psa:{}:data_delivery:{}",
                self.mission,
                self.delivery.to_lowercase()
            ),
        );
        fills.insert(
            format!("{IPC}/Internal_Reference/lid_reference"),
            format!("urn:esa:psa:{}:{}", self.mission, self.bundle),
        );
        for (area, info) in [
            ("File_Area_Checksum_Manifest", self.checksum),
            ("File_Area_Transfer_Manifest", self.transfer),
        ] {
            fills.insert(format!("{IPC}/{area}/File/file_name"), info.file_name.clone());
            fills.insert(
                format!("{IPC}/{area}/File/creation_date_time"),
                info.created.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            );
            fills.insert(format!("{IPC}/{area}/File/file_size"), info.bytes.to_string());
            fills.insert(format!("{IPC}/{area}/File/records"), info.records.to_string());
            fills.insert(format!("{IPC}/{area}/File/md5_checksum"), info.md5.clone());
        }
        fills.insert(format!("{tm}/records"), self.transfer.records.to_string());
        fills.insert(
            format!("{tm}/Record_Character/record_length"),
            self.fields.record_length().to_string(),
        );
        fills.insert(
            format!("{tm}/Record_Character/Field_Character[1]/field_length"),
            self.fields.lid_len.to_string(),
        );
        fills.insert(
            format!("{tm}/Record_Character/Field_Character[2]/field_location"),
            self.fields.path_start.to_string(),
        );
        fills.insert(
            format!("{tm}/Record_Character/Field_Character[2]/field_length"),
            self.fields.path_len.to_string(),
        );
        fills.insert(
            "Product_AIP/Archival_Information_Package/description".to_string(),
            GENERATOR_TAG.to_string(),
        );
        fills
    }
}

fn local_name(qname: &[u8]) -> String {
    let local = qname
        .rsplit(|&b| b == b':')
        .next()
        .unwrap_or(qname);
    String::from_utf8_lossy(local).into_owned()
}

/// Fill a descriptor template, returning the rewritten document bytes.
///
/// Every addressed element must exist in the template; a missing element is
/// a [`PackageError::TemplateField`] error, not a silent omission.
pub fn render_descriptor(template_xml: &str, spec: &DescriptorSpec<'_>) -> Result<Vec<u8>> {
    let mut fills = spec.fills();
    let mut reader = Reader::from_str(template_xml);
    let mut writer = Writer::new(Vec::new());

    let mut stack: Vec<String> = Vec::new();
    let mut field_char_index = 0usize;
    // Replacement text for the element currently open, with its depth.
    let mut replacing: Option<(String, usize)> = None;

    loop {
        let event = reader.read_event()?;
        match event {
            Event::Start(ref e) => {
                let local = local_name(e.name().as_ref());
                if local == "Record_Character" {
                    field_char_index = 0;
                }
                let step = if local == "Field_Character" {
                    field_char_index += 1;
                    format!("Field_Character[{field_char_index}]")
                } else {
                    local
                };
                stack.push(step);
                let key = stack.join("/");
                if let Some(value) = fills.remove(&key) {
                    replacing = Some((value, stack.len()));
                }
                writer.write_event(event)?;
            }
            Event::End(_) => {
                if let Some((value, depth)) = replacing.take() {
                    debug_assert_eq!(depth, stack.len());
                    writer.write_event(Event::Text(BytesText::new(&value)))?;
                }
                writer.write_event(event)?;
                stack.pop();
            }
            Event::Empty(ref e) => {
                // An addressed element written as <elem/> is expanded so the
                // replacement text has somewhere to go.
                let qname = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let key = format!("{}/{}", stack.join("/"), local_name(e.name().as_ref()));
                if let Some(value) = fills.remove(&key) {
                    writer.write_event(Event::Start(e.clone().into_owned()))?;
                    writer.write_event(Event::Text(BytesText::new(&value)))?;
                    writer.write_event(Event::End(BytesEnd::new(qname)))?;
                } else {
                    writer.write_event(event)?;
                }
            }
            Event::Text(_) if replacing.is_some() => {
                // Placeholder text of an addressed element is dropped.
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    if let Some(path) = fills.keys().min() {
        return Err(PackageError::TemplateField { path: path.clone() });
    }

    Ok(writer.into_inner())
}

/// Resolve the template, fill it and write the descriptor into the staging
/// directory. Returns the descriptor path.
pub fn write_descriptor(
    staging_dir: &Path,
    template: Option<&Path>,
    spec: &DescriptorSpec<'_>,
) -> Result<PathBuf> {
    let template_xml = match template {
        Some(path) => {
            if !path.is_file() {
                return Err(PackageError::TemplateNotFound {
                    path: path.to_path_buf(),
                });
            }
            std::fs::read_to_string(path)?
        }
        None => DEFAULT_TEMPLATE.to_string(),
    };

    let rendered = render_descriptor(&template_xml, spec)?;
    let out = staging_dir.join(spec.delivery.descriptor_file());
    std::fs::write(&out, rendered)?;
    Ok(out)
}
