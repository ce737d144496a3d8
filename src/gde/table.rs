use std::collections::BTreeMap;

use super::element::is_observation;
use super::error::{FactorKind, InputFormatError};

/// First-level header of the damage label column.
pub const DAMAGE_COLUMN: &str = "Danos";

/// A single cell as it comes out of the sheet, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Build a cell from raw sheet text. Whitespace-only text is empty.
    pub fn from_text(s: &str) -> Self {
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    /// Render the cell the way the report shows original tables (missing values as 0).
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => "0".to_string(),
            Cell::Number(n) if n.is_finite() => n.to_string(),
            Cell::Number(_) => "0".to_string(),
            Cell::Text(s) => s.trim().to_string(),
        }
    }
}

/// Two-level column key: `(group, factor)`, e.g. `("Pilar P01", "Fi")` or `("Danos", "")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnKey {
    pub group: String,
    pub factor: String,
}

impl ColumnKey {
    pub fn new(group: impl Into<String>, factor: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            factor: factor.into(),
        }
    }
}

/// Inspection sheet with two-level headers, exactly as read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub columns: Vec<ColumnKey>,
    pub rows: Vec<Vec<Cell>>,
}

static EMPTY_CELL: Cell = Cell::Empty;

impl RawTable {
    /// Cell at `(row, column)`. Ragged rows read as empty past their end.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY_CELL)
    }
}

/// Positions of one element's `Fi` / `Fp` pair within [`InspectionRow::values`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactorColumns {
    pub intensity: usize,
    pub weight: usize,
}

/// One `(fi, fp)` observation after coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub fi: f64,
    pub fp: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InspectionRow {
    /// Trimmed damage label
    pub damage: String,
    /// Coerced factor values, aligned with [`InspectionTable::columns`]
    pub values: Vec<f64>,
}

impl InspectionRow {
    pub fn reading(&self, columns: &FactorColumns) -> Reading {
        Reading {
            fi: self.values.get(columns.intensity).copied().unwrap_or(0.0),
            fp: self.values.get(columns.weight).copied().unwrap_or(0.0),
        }
    }
}

/// Flat, single-level inspection table.
///
/// Factor columns are named `"Fi - <element>"` and `"Fp - <element>"`. The
/// `lookup` maps each trimmed element name to its column pairs; element
/// groups that only differ by surrounding whitespace share one entry and
/// pool their pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectionTable {
    pub columns: Vec<String>,
    pub rows: Vec<InspectionRow>,
    pub lookup: BTreeMap<String, Vec<FactorColumns>>,
    /// Non-numeric factor cells that were read as 0.0
    pub coerced_cells: usize,
}

impl InspectionTable {
    /// Element names, sorted and deduplicated.
    pub fn elements(&self) -> Vec<&str> {
        self.lookup.keys().map(String::as_str).collect()
    }

    /// Flat header line: the damage column followed by every factor column.
    pub fn headers(&self) -> Vec<String> {
        std::iter::once(DAMAGE_COLUMN.to_string())
            .chain(self.columns.iter().cloned())
            .collect()
    }

    /// Rows that are actual damage observations (header artifacts and blanks skipped).
    pub fn observations(&self) -> impl Iterator<Item = &InspectionRow> {
        self.rows.iter().filter(|row| is_observation(&row.damage))
    }
}

#[derive(Debug)]
struct PendingPair {
    group: String,
    intensity: Option<usize>,
    weight: Option<usize>,
}

/// Flatten a two-level inspection table.
///
/// The raw table is left untouched. Factor cells are coerced to `f64` here
/// and nowhere else: empty and non-finite cells read as 0.0, non-numeric
/// text reads as 0.0 and is counted in `coerced_cells`.
pub fn normalize(raw: &RawTable) -> Result<InspectionTable, InputFormatError> {
    let mut damage_column = None;
    let mut pairs: Vec<PendingPair> = Vec::new();

    for (idx, key) in raw.columns.iter().enumerate() {
        let group = key.group.trim();
        if group == DAMAGE_COLUMN {
            if damage_column.replace(idx).is_some() {
                return Err(InputFormatError::DuplicateColumn {
                    element: DAMAGE_COLUMN.to_string(),
                    factor: key.factor.trim().to_string(),
                });
            }
            continue;
        }

        let kind = FactorKind::parse(&key.factor).ok_or_else(|| InputFormatError::UnknownFactor {
            element: group.to_string(),
            factor: key.factor.trim().to_string(),
        })?;
        if group.is_empty() {
            return Err(InputFormatError::BlankElementName { column: idx + 1 });
        }

        let pos = match pairs.iter().position(|p| p.group == key.group) {
            Some(pos) => pos,
            None => {
                pairs.push(PendingPair {
                    group: key.group.clone(),
                    intensity: None,
                    weight: None,
                });
                pairs.len() - 1
            }
        };
        let slot = match kind {
            FactorKind::Intensity => &mut pairs[pos].intensity,
            FactorKind::Weight => &mut pairs[pos].weight,
        };
        if slot.replace(idx).is_some() {
            return Err(InputFormatError::DuplicateColumn {
                element: group.to_string(),
                factor: kind.label().to_string(),
            });
        }
    }

    let damage_column = damage_column.ok_or(InputFormatError::MissingDamageColumn)?;
    if pairs.is_empty() {
        return Err(InputFormatError::NoElementColumns);
    }

    let mut columns = Vec::with_capacity(pairs.len() * 2);
    let mut sources = Vec::with_capacity(pairs.len() * 2);
    let mut lookup: BTreeMap<String, Vec<FactorColumns>> = BTreeMap::new();

    for pair in &pairs {
        let element = pair.group.trim().to_string();
        let (fi, fp) = match (pair.intensity, pair.weight) {
            (Some(fi), Some(fp)) => (fi, fp),
            (Some(_), None) => {
                return Err(InputFormatError::UnpairedFactor {
                    element,
                    present: FactorKind::Intensity,
                    missing: FactorKind::Weight,
                })
            }
            (None, _) => {
                return Err(InputFormatError::UnpairedFactor {
                    element,
                    present: FactorKind::Weight,
                    missing: FactorKind::Intensity,
                })
            }
        };

        let intensity = columns.len();
        columns.push(format!("{} - {}", FactorKind::Intensity, element));
        sources.push(fi);
        let weight = columns.len();
        columns.push(format!("{} - {}", FactorKind::Weight, element));
        sources.push(fp);

        lookup
            .entry(element)
            .or_default()
            .push(FactorColumns { intensity, weight });
    }

    let mut coerced_cells = 0;
    let mut rows = Vec::with_capacity(raw.rows.len());
    for r in 0..raw.rows.len() {
        let damage = damage_label(raw.cell(r, damage_column));
        let counted = is_observation(&damage);
        let mut values = Vec::with_capacity(sources.len());
        for &c in &sources {
            let value = match coerce_factor(raw.cell(r, c)) {
                Some(v) => v,
                None => {
                    if counted {
                        coerced_cells += 1;
                    }
                    0.0
                }
            };
            values.push(value);
        }
        rows.push(InspectionRow { damage, values });
    }

    Ok(InspectionTable {
        columns,
        rows,
        lookup,
        coerced_cells,
    })
}

fn damage_label(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Number(n) => n.to_string(),
        Cell::Text(s) => s.trim().to_string(),
    }
}

/// Read a factor cell as a number. `None` means the cell held text that is
/// not a number; callers treat that as 0.0.
fn coerce_factor(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Empty => 0.0,
        Cell::Number(n) => *n,
        Cell::Text(s) => parse_number(s)?,
    };
    Some(if value.is_finite() { value } else { 0.0 })
}

fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }
    // Decimal comma, e.g. "1,5"
    if s.matches(',').count() == 1 && !s.contains('.') {
        return s.replace(',', ".").parse().ok();
    }
    None
}
