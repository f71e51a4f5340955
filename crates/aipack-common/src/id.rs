//! Product identity types.
//!
//! A PDS4 logical identifier (LID) is a colon-separated URN of the form
//! `urn:<agency>:<archive>:<bundle>:<collection>:<product>`. The bundle and
//! collection segments drive the archive layout; the (LID, VID) pair
//! identifies exactly one version of one product.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when parsing identity strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("malformed LID '{lid}': expected at least {expected} colon-separated segments, found {found}")]
    MalformedLid {
        lid: String,
        expected: usize,
        found: usize,
    },

    #[error("empty version identifier")]
    EmptyVid,
}

/// Logical identifier of a product, irrespective of version.
///
/// Parsing requires the bundle and collection segments to be present,
/// i.e. at least `urn:<agency>:<archive>:<bundle>:<collection>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lid(String);

/// Segment index of the bundle within a LID.
const BUNDLE_SEGMENT: usize = 3;

/// Segment index of the collection within a LID.
const COLLECTION_SEGMENT: usize = 4;

impl Lid {
    /// Minimum number of colon-separated segments for an ingestible LID.
    pub const MIN_SEGMENTS: usize = COLLECTION_SEGMENT + 1;

    /// Parse and validate a LID string.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        let found = s.split(':').filter(|seg| !seg.is_empty()).count();
        if found < Self::MIN_SEGMENTS || s.split(':').any(str::is_empty) {
            return Err(IdError::MalformedLid {
                lid: s.to_string(),
                expected: Self::MIN_SEGMENTS,
                found,
            });
        }
        Ok(Lid(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Character length of the identifier, as counted for manifest widths.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The bundle segment of the LID.
    pub fn bundle(&self) -> &str {
        self.segment(BUNDLE_SEGMENT)
    }

    /// The collection segment of the LID.
    pub fn collection(&self) -> &str {
        self.segment(COLLECTION_SEGMENT)
    }

    /// Mission acronym: the bundle segment up to its first underscore.
    pub fn mission(&self) -> &str {
        let bundle = self.bundle();
        bundle.split('_').next().unwrap_or(bundle)
    }

    fn segment(&self, idx: usize) -> &str {
        // Parse guarantees at least MIN_SEGMENTS segments.
        self.0.split(':').nth(idx).unwrap_or_default()
    }
}

impl fmt::Display for Lid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Version identifier tied to a LID (e.g. `1.0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vid(String);

impl Vid {
    /// Parse and validate a VID string.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.trim().is_empty() {
            return Err(IdError::EmptyVid);
        }
        Ok(Vid(s.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One specific version of one product.
///
/// Displays in the PDS4 `lid::vid` notation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LidVid {
    pub lid: Lid,
    pub vid: Vid,
}

impl LidVid {
    pub fn new(lid: Lid, vid: Vid) -> Self {
        LidVid { lid, vid }
    }
}

impl fmt::Display for LidVid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.lid, self.vid)
    }
}
