use serde::Serialize;
use std::collections::BTreeMap;

use super::table::{InspectionTable, DAMAGE_COLUMN};

/// Per-element reduction of damage contributions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ElementResult {
    /// Sum of all damage contributions (ΣD)
    pub sum_d: f64,
    /// Largest single contribution (D_max)
    pub d_max: f64,
    /// Element deterioration index (G_de)
    pub g_de: f64,
}

impl ElementResult {
    /// Reduce a sequence of damage contributions.
    ///
    /// `G_de = D_max * (1 + (ΣD - D_max) / ΣD)`, or 0 when ΣD is 0.
    pub fn from_contributions(contributions: impl IntoIterator<Item = f64>) -> Self {
        let mut sum_d = 0.0;
        let mut d_max: Option<f64> = None;
        for d in contributions {
            sum_d += d;
            d_max = Some(d_max.map_or(d, |m| m.max(d)));
        }
        let d_max = d_max.unwrap_or(0.0);

        let g_de = if sum_d != 0.0 {
            d_max * (1.0 + (sum_d - d_max) / sum_d)
        } else {
            0.0
        };

        Self { sum_d, d_max, g_de }
    }
}

/// Damage contribution of one `(Fi, Fp)` observation.
///
/// Intensities strictly between 2 and 3 contribute nothing. The GDE/UnB
/// formula leaves that interval uncovered and it is kept as-is.
pub fn damage(fi: f64, fp: f64) -> f64 {
    if fi <= 2.0 {
        0.8 * fi * fp
    } else if fi >= 3.0 {
        (12.0 * fi - 28.0) * fp
    } else {
        0.0
    }
}

/// Whether a damage label is a real observation rather than a blank row or
/// a repeated header.
pub fn is_observation(label: &str) -> bool {
    let label = label.trim();
    !label.is_empty() && !label.eq_ignore_ascii_case(DAMAGE_COLUMN)
}

/// Evaluate every element of a normalized table.
///
/// Each element is reduced over all observation rows and all of its pooled
/// column pairs. Elements without any valid row get an all-zero result.
pub fn evaluate_elements(table: &InspectionTable) -> BTreeMap<String, ElementResult> {
    table
        .lookup
        .iter()
        .map(|(element, pairs)| {
            let contributions = table.observations().flat_map(|row| {
                pairs.iter().map(move |cols| {
                    let reading = row.reading(cols);
                    damage(reading.fi, reading.fp)
                })
            });
            (element.clone(), ElementResult::from_contributions(contributions))
        })
        .collect()
}
