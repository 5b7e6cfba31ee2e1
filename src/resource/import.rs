//! Import identifiers
//!
//! An existing RAID is adopted with `MACHINE:RAID`, where each half is
//! either the MAAS-assigned id or the human-assigned name.

use crate::error::{MaasError, Result};
use std::fmt;
use std::str::FromStr;

/// Parsed `MACHINE:RAID` identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportId {
    pub machine: String,
    pub raid: String,
}

impl ImportId {
    /// Parse `MACHINE:RAID`. Exactly one colon, both halves non-empty.
    pub fn parse(id: &str) -> Result<Self> {
        let parts: Vec<&str> = id.split(':').collect();
        match parts.as_slice() {
            [machine, raid] if !machine.is_empty() && !raid.is_empty() => Ok(Self {
                machine: machine.to_string(),
                raid: raid.to_string(),
            }),
            _ => Err(MaasError::InvalidImportId(id.to_string())),
        }
    }
}

impl FromStr for ImportId {
    type Err = MaasError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ImportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.machine, self.raid)
    }
}
