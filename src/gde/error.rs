use std::fmt;
use thiserror::Error;

/// Second-level column key of an element column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FactorKind {
    /// `Fi`, factor intensity
    Intensity,
    /// `Fp`, factor weight
    Weight,
}

impl FactorKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Fi" => Some(FactorKind::Intensity),
            "Fp" => Some(FactorKind::Weight),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FactorKind::Intensity => "Fi",
            FactorKind::Weight => "Fp",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            FactorKind::Intensity => FactorKind::Weight,
            FactorKind::Weight => FactorKind::Intensity,
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The inspection table does not expose the element/factor column structure.
///
/// Fatal for the family whose table produced it; other families are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputFormatError {
    #[error("missing damage column \"Danos\"")]
    MissingDamageColumn,

    #[error("no element columns found (expected two-level <element>/Fi|Fp headers)")]
    NoElementColumns,

    #[error("column {column} has a factor header but no element name")]
    BlankElementName { column: usize },

    #[error("column '{element}' has unknown factor '{factor}' (expected Fi or Fp)")]
    UnknownFactor { element: String, factor: String },

    #[error("element '{element}' has a {present} column but no {missing} column")]
    UnpairedFactor {
        element: String,
        present: FactorKind,
        missing: FactorKind,
    },

    #[error("column '{element}' / '{factor}' appears more than once")]
    DuplicateColumn { element: String, factor: String },
}
