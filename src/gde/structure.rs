use serde::Serialize;
use std::fmt;

use super::family::FamilyResult;

/// Severity tier of the structure grade G_d.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum DeteriorationLevel {
    #[serde(rename = "Baixo")]
    Low,
    #[serde(rename = "Médio")]
    Medium,
    #[serde(rename = "Alto")]
    High,
    #[serde(rename = "Sofrível")]
    Critical,
}

impl DeteriorationLevel {
    /// Classify a structure grade. Upper bounds are inclusive: 15, 50, 80.
    pub fn classify(g_d: f64) -> Self {
        if g_d <= 15.0 {
            DeteriorationLevel::Low
        } else if g_d <= 50.0 {
            DeteriorationLevel::Medium
        } else if g_d <= 80.0 {
            DeteriorationLevel::High
        } else {
            DeteriorationLevel::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeteriorationLevel::Low => "Baixo",
            DeteriorationLevel::Medium => "Médio",
            DeteriorationLevel::High => "Alto",
            DeteriorationLevel::Critical => "Sofrível",
        }
    }

    /// Recommended action for the tier.
    pub fn recommendation(&self) -> &'static str {
        match self {
            DeteriorationLevel::Low => "Estado aceitável. Manutenção preventiva.",
            DeteriorationLevel::Medium => {
                "Nova inspeção e plano de intervenção em longo prazo (até 2 anos)."
            }
            DeteriorationLevel::High => {
                "Inspeção detalhada e intervenção em médio prazo (até 18 meses)."
            }
            DeteriorationLevel::Critical => "Inspeção detalhada e intervenção em curto prazo.",
        }
    }
}

impl fmt::Display for DeteriorationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureResult {
    /// Σ(F_r × G_df)
    pub sum_fr_gdf: f64,
    /// Σ F_r
    pub sum_fr: f64,
    /// Structure deterioration grade
    pub g_d: f64,
    pub level: DeteriorationLevel,
    pub recommendation: String,
}

/// Weighted mean of the family indices by their importance factors.
///
/// With no families (or all F_r = 0) the grade is 0, which classifies as
/// `Baixo`.
pub fn evaluate_structure<'a>(families: impl IntoIterator<Item = &'a FamilyResult>) -> StructureResult {
    let (sum_fr_gdf, sum_fr) = families
        .into_iter()
        .fold((0.0, 0.0), |(num, den), family| {
            (num + family.importance * family.g_df, den + family.importance)
        });

    let g_d = if sum_fr != 0.0 { sum_fr_gdf / sum_fr } else { 0.0 };
    let level = DeteriorationLevel::classify(g_d);

    StructureResult {
        sum_fr_gdf,
        sum_fr,
        g_d,
        level,
        recommendation: level.recommendation().to_string(),
    }
}
