//! Delivery package naming.
//!
//! A delivery name encodes sender, recipient, bundle and the run timestamp:
//! `{sendfrom}{sendto}-pds4-PI-01-{bundle}-{YYYYMMDDTHHMMSS}`. Every artifact
//! of a run (staging directory, manifests, descriptor, archive) derives its
//! file name from this single value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default recipient code for deliveries.
pub const DEFAULT_RECIPIENT: &str = "psa";

/// Name of one delivery run, derived once and reused for every artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryName(String);

impl DeliveryName {
    /// Build a delivery name from sender/recipient codes, the bundle
    /// identifier and the run timestamp (UTC, second precision).
    pub fn new(sendfrom: &str, sendto: &str, bundle: &str, stamp: DateTime<Utc>) -> Self {
        DeliveryName(format!(
            "{}{}-pds4-PI-01-{}-{}",
            sendfrom,
            sendto,
            bundle,
            stamp.format("%Y%m%dT%H%M%S")
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the fixed-width transfer manifest.
    pub fn transfer_manifest_file(&self) -> String {
        format!("{}-transfer_manifest.tab", self.0)
    }

    /// File name of the checksum manifest.
    pub fn checksum_manifest_file(&self) -> String {
        format!("{}-checksum_manifest.tab", self.0)
    }

    /// File name of the AIP descriptor label.
    pub fn descriptor_file(&self) -> String {
        format!("{}.xml", self.0)
    }

    /// File name of the final delivery archive.
    pub fn archive_file(&self) -> String {
        format!("{}.tar.gz", self.0)
    }

    /// Lower-cased form used inside the descriptor's logical identifier.
    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for DeliveryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
