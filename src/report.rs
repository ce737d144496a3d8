use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;

use crate::gde::{FamilyResult, RawTable, StructureResult};

/// Consolidated result of one report request, ready for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub title: String,
    pub generated_at: DateTime<Local>,
    /// Successfully evaluated families, in request order
    pub families: Vec<FamilyReport>,
    /// Families that could not be evaluated, in request order
    pub failures: Vec<FamilyFailure>,
    pub structure: StructureResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilyReport {
    /// 1-based position in the request
    pub position: usize,
    pub name: String,
    pub sheet: PathBuf,
    pub importance: u8,
    pub importance_description: String,
    pub result: FamilyResult,
    pub photos: Vec<PathBuf>,
    /// Damage rows that took part in the evaluation
    pub observations: usize,
    /// Non-numeric factor cells read as 0
    pub coerced_cells: usize,
    /// Sheet exactly as read, for the report's original-table section
    #[serde(skip)]
    pub original: RawTable,
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilyFailure {
    pub position: usize,
    pub name: String,
    pub error: String,
}
