use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Valid importance factors F_r.
pub const IMPORTANCE_FACTORS: RangeInclusive<u8> = 1..=5;

const DEFAULT_DESCRIPTIONS: [(u8, &str); 5] = [
    (1, "Barreiras, guarda-corpo, guarda rodas, pista de rolamento"),
    (2, "Juntas de dilatação"),
    (3, "Transversinas, cortinas, alas"),
    (4, "Lajes, fundações, vigas secundárias, aparelhos de apoio"),
    (5, "Vigas e pilares principais"),
];

/// Structural role described by each importance factor.
///
/// This is a plain lookup; the scoring core only ever sees the numeric F_r.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceVocabulary {
    descriptions: BTreeMap<u8, String>,
}

impl Default for ImportanceVocabulary {
    fn default() -> Self {
        Self {
            descriptions: DEFAULT_DESCRIPTIONS
                .iter()
                .map(|(k, v)| (*k, v.to_string()))
                .collect(),
        }
    }
}

impl ImportanceVocabulary {
    /// Default vocabulary with some descriptions replaced. Keys outside 1..=5
    /// are ignored; config validation reports them.
    pub fn with_overrides(overrides: &BTreeMap<u8, String>) -> Self {
        let mut vocabulary = Self::default();
        for (factor, description) in overrides {
            if IMPORTANCE_FACTORS.contains(factor) {
                vocabulary
                    .descriptions
                    .insert(*factor, description.trim().to_string());
            }
        }
        vocabulary
    }

    pub fn describe(&self, factor: u8) -> Option<&str> {
        self.descriptions.get(&factor).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &str)> {
        self.descriptions.iter().map(|(k, v)| (*k, v.as_str()))
    }
}
