use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::gde::ImportanceVocabulary;

pub const DEFAULT_DELIMITER: char = ',';
pub const DEFAULT_REPORT_TITLE: &str = "Relatório Consolidado GDE";

/// Optional user configuration.
///
/// Example YAML:
/// ```yaml
/// importance_factors:
///   5: "Vigas e pilares principais"
/// sheet:
///   delimiter: ";"
/// report:
///   title: "Relatório Consolidado GDE"
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Overrides for the importance factor descriptions (keys 1..5)
    #[serde(default)]
    pub importance_factors: Option<BTreeMap<u8, String>>,

    #[serde(default)]
    pub sheet: Option<SheetConfig>,

    #[serde(default)]
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SheetConfig {
    /// Single-character field delimiter of the inspection sheets (default ",")
    #[serde(default)]
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Heading used when the request does not carry its own title
    #[serde(default)]
    pub title: Option<String>,
}

impl Config {
    /// Effective sheet delimiter. Assumes the config passed validation.
    pub fn delimiter(&self) -> char {
        self.sheet
            .as_ref()
            .and_then(|s| s.delimiter.as_deref())
            .and_then(|d| d.chars().next())
            .unwrap_or(DEFAULT_DELIMITER)
    }

    pub fn report_title(&self) -> &str {
        self.report
            .as_ref()
            .and_then(|r| r.title.as_deref())
            .unwrap_or(DEFAULT_REPORT_TITLE)
    }

    pub fn vocabulary(&self) -> ImportanceVocabulary {
        match &self.importance_factors {
            Some(overrides) => ImportanceVocabulary::with_overrides(overrides),
            None => ImportanceVocabulary::default(),
        }
    }
}
