//! Schema revisions of the microscopy core plugins.
//!
//! The viewers shipped in four revisions. Revisions 1 and 2 address the
//! experiment through plain openBIS identifiers and pass the legacy
//! `sampleId` key to the export service; revisions 3 and 4 model the
//! experiment as a `MICROSCOPY_EXPERIMENT` sample and pass perm ids.
//! Revision 4 additionally introduced accessory-file datasets.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(try_from = "u8", into = "u8")]
pub enum SchemaRevision {
    #[value(name = "1")]
    R1,
    #[value(name = "2")]
    R2,
    #[value(name = "3")]
    R3,
    #[value(name = "4")]
    R4,
}

impl SchemaRevision {
    pub const LATEST: SchemaRevision = SchemaRevision::R4;

    pub fn number(self) -> u8 {
        match self {
            SchemaRevision::R1 => 1,
            SchemaRevision::R2 => 2,
            SchemaRevision::R3 => 3,
            SchemaRevision::R4 => 4,
        }
    }

    /// Revisions 3+ model the experiment as a MICROSCOPY_EXPERIMENT sample
    /// and identify it to the export service by perm id.
    pub fn uses_experiment_sample(self) -> bool {
        self.number() >= 3
    }

    /// Parameter key naming the sample in an export request.
    pub fn sample_parameter_key(self) -> &'static str {
        if self.uses_experiment_sample() {
            "samplePermId"
        } else {
            "sampleId"
        }
    }

    /// MICROSCOPY_ACCESSORY_FILE datasets exist from revision 4 on.
    pub fn has_accessory_files(self) -> bool {
        self.number() >= 4
    }
}

impl TryFrom<u8> for SchemaRevision {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SchemaRevision::R1),
            2 => Ok(SchemaRevision::R2),
            3 => Ok(SchemaRevision::R3),
            4 => Ok(SchemaRevision::R4),
            other => Err(format!("unknown schema revision {other} (expected 1-4)")),
        }
    }
}

impl From<SchemaRevision> for u8 {
    fn from(value: SchemaRevision) -> u8 {
        value.number()
    }
}

impl fmt::Display for SchemaRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}
