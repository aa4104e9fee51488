//! # Unit Families
//!
//! A quantity is only meaningful relative to the resource it measures.
//! `UnitFamily` names that resource and fixes the base unit every
//! canonical magnitude is expressed in.
//!
//! | Family | Resource key | Base unit | Unsuffixed `1` |
//! |--------|--------------|-----------|----------------|
//! | `Cpu` | `cpu` | millicore | 1000 millicores |
//! | `Memory` | `memory` | byte | 1 byte |

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::UnknownUnitFamily;

/// The resource a quantity measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitFamily {
    /// Compute, in cores. Canonical magnitudes are millicores.
    Cpu,
    /// Memory, in bytes.
    Memory,
}

impl UnitFamily {
    /// Returns both families in declaration order.
    pub fn all() -> &'static [UnitFamily] {
        &[Self::Cpu, Self::Memory]
    }

    /// Returns the resource key used in manifests (`cpu` or `memory`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Memory => "memory",
        }
    }

    /// Name of the base unit canonical magnitudes are expressed in.
    pub fn base_unit(&self) -> &'static str {
        match self {
            Self::Cpu => "millicores",
            Self::Memory => "bytes",
        }
    }

    /// Number of base units in one unsuffixed unit of this family.
    pub(crate) fn base_factor(&self) -> i128 {
        match self {
            Self::Cpu => 1000,
            Self::Memory => 1,
        }
    }
}

impl std::fmt::Display for UnitFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitFamily {
    type Err = UnknownUnitFamily;

    /// Parse a family from its manifest resource key. Case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(Self::Cpu),
            "memory" => Ok(Self::Memory),
            other => Err(UnknownUnitFamily(other.to_string())),
        }
    }
}
