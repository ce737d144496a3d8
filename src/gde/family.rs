use serde::Serialize;
use std::collections::BTreeMap;

use super::element::ElementResult;

/// Result of one structural family (one inspection sheet).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyResult {
    /// Importance factor F_r
    #[serde(rename = "f_r")]
    pub importance: f64,
    /// Largest participating G_de
    pub gde_max: f64,
    /// Sum of participating G_de
    pub gde_sum: f64,
    /// Family deficiency index G_df
    pub g_df: f64,
    /// F_r × G_df
    pub fr_gdf: f64,
    /// Every element of the family, including those with G_de = 0
    pub elements: BTreeMap<String, ElementResult>,
}

impl FamilyResult {
    /// Number of elements with G_de > 0, i.e. the ones that shaped G_df.
    pub fn participating(&self) -> usize {
        self.elements.values().filter(|e| e.g_de > 0.0).count()
    }
}

/// Combine element indices into the family deficiency index.
///
/// Only elements with `G_de > 0` take part:
/// `G_df = G_de,max * sqrt(1 + (ΣG_de - G_de,max) / ΣG_de)`.
/// A family with no damaged element yields all zeros.
pub fn evaluate_family(elements: BTreeMap<String, ElementResult>, importance: f64) -> FamilyResult {
    let damaged: Vec<f64> = elements
        .values()
        .map(|e| e.g_de)
        .filter(|g| *g > 0.0)
        .collect();

    let gde_max = damaged.iter().copied().fold(0.0, f64::max);
    let gde_sum: f64 = damaged.iter().sum();
    let g_df = if gde_sum != 0.0 {
        gde_max * (1.0 + (gde_sum - gde_max) / gde_sum).sqrt()
    } else {
        0.0
    };

    FamilyResult {
        importance,
        gde_max,
        gde_sum,
        g_df,
        fr_gdf: importance * g_df,
        elements,
    }
}
