pub mod element;
pub mod error;
pub mod family;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod importance;
pub mod structure;
pub mod table;

pub use element::{damage, evaluate_elements, is_observation, ElementResult};
pub use error::{FactorKind, InputFormatError};
pub use family::{evaluate_family, FamilyResult};
pub use importance::{ImportanceVocabulary, IMPORTANCE_FACTORS};
pub use structure::{evaluate_structure, DeteriorationLevel, StructureResult};
pub use table::{
    normalize, Cell, ColumnKey, FactorColumns, InspectionRow, InspectionTable, RawTable, Reading,
    DAMAGE_COLUMN,
};
