//! Linkage outcome categories (`Situação`)

use serde::{Serialize, Serializer};
use std::fmt;

/// Outcome of linking a DDA payment to its expected document.
///
/// The four known outcomes come from the reconciliation export. Anything else
/// is kept verbatim as [`Status::Other`] so it still shows up in counts and
/// charts (with the fallback color).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Automatic,
    Manual,
    Pending,
    LinkedWithDifference,
    Other(String),
}

impl Status {
    pub const AUTOMATIC: &'static str = "Automático";
    pub const MANUAL: &'static str = "Manual";
    pub const PENDING: &'static str = "Pendente";
    pub const LINKED_WITH_DIFFERENCE: &'static str = "Vinculado - Com diferença";

    pub fn from_label(label: &str) -> Self {
        match label {
            Self::AUTOMATIC => Status::Automatic,
            Self::MANUAL => Status::Manual,
            Self::PENDING => Status::Pending,
            Self::LINKED_WITH_DIFFERENCE => Status::LinkedWithDifference,
            other => Status::Other(other.to_string()),
        }
    }

    /// Label as it appears in the spreadsheet
    pub fn label(&self) -> &str {
        match self {
            Status::Automatic => Self::AUTOMATIC,
            Status::Manual => Self::MANUAL,
            Status::Pending => Self::PENDING,
            Status::LinkedWithDifference => Self::LINKED_WITH_DIFFERENCE,
            Status::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Status::Other(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
