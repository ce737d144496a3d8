//! Shared test fixtures.

use super::table::{Cell, ColumnKey, RawTable};

/// Four piers, each with a single `Fi = 1, Fp = 3` observation.
pub(crate) fn pier_table() -> RawTable {
    let mut columns = vec![ColumnKey::new("Danos", "")];
    for pier in ["Pilar P01", "Pilar P02", "Pilar P03", "Pilar P04"] {
        columns.push(ColumnKey::new(pier, "Fi"));
        columns.push(ColumnKey::new(pier, "Fp"));
    }
    let n = Cell::Number;
    RawTable {
        columns,
        rows: vec![
            vec![
                Cell::Text("Desagregação".to_string()),
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                n(1.0),
                n(3.0),
                n(1.0),
                n(3.0),
            ],
            vec![
                Cell::Text("Falha de Concretagem".to_string()),
                n(1.0),
                n(3.0),
                n(1.0),
                n(3.0),
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
            ],
        ],
    }
}
