use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::gde::{Cell, ColumnKey, RawTable};

/// Extensions accepted as inspection sheets.
pub const SHEET_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

/// Check a configured delimiter: one ASCII character that is not a quote or a
/// line break.
pub fn parse_delimiter(text: &str) -> Result<char, String> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c == '"' || c == '\n' || c == '\r' => {
            Err(format!("'{}' cannot be used as a delimiter", c.escape_default()))
        }
        (Some(c), None) if !c.is_ascii() => {
            Err(format!("'{}' is not an ASCII character", c))
        }
        (Some(c), None) => Ok(c),
        _ => Err(format!("must be a single character, got '{}'", text.escape_default())),
    }
}

/// Delimiter for a sheet: `.tsv` files are always tab-separated, anything
/// else uses `fallback`.
pub fn sheet_delimiter(path: &Path, fallback: char) -> char {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => '\t',
        _ => fallback,
    }
}

/// Read an inspection sheet exported as delimited text.
pub fn read_sheet(path: &Path, delimiter: char) -> Result<RawTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read inspection sheet at {}", path.display()))?;
    parse_sheet(&content, delimiter)
        .with_context(|| format!("Invalid inspection sheet {}", path.display()))
}

/// Parse a two-header-row delimited sheet.
///
/// Row 1 holds element groups (`Danos`, then element names); a blank cell
/// continues the group on its left, which is how merged header cells
/// export. Row 2 holds the factor kinds. Quoted fields may span lines.
/// Blank records are skipped and trailing columns with no header at all
/// are dropped.
pub fn parse_sheet(content: &str, delimiter: char) -> Result<RawTable> {
    if !delimiter.is_ascii() {
        bail!("delimiter '{}' is not an ASCII character", delimiter);
    }
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("malformed record {}", idx + 1))?;
        let fields: Vec<String> = record.iter().map(str::to_string).collect();
        if fields.len() == 1 && fields[0].trim().is_empty() {
            continue;
        }
        records.push(fields);
    }
    let mut records = records.into_iter();

    let (groups, factors) = match (records.next(), records.next()) {
        (Some(groups), Some(factors)) => (groups, factors),
        _ => bail!("expected two header rows (element names, then Fi/Fp)"),
    };

    let mut width = groups.len().max(factors.len());
    while width > 0 {
        let blank = |row: &Vec<String>| row.get(width - 1).map_or(true, |s| s.trim().is_empty());
        if blank(&groups) && blank(&factors) {
            width -= 1;
        } else {
            break;
        }
    }

    let mut columns = Vec::with_capacity(width);
    let mut current_group = String::new();
    for idx in 0..width {
        let group = groups.get(idx).map(String::as_str).unwrap_or("");
        if !group.trim().is_empty() {
            current_group = group.to_string();
        }
        let factor = factors.get(idx).map(String::as_str).unwrap_or("");
        columns.push(ColumnKey::new(current_group.clone(), factor.trim()));
    }

    let rows = records
        .map(|fields| {
            fields
                .iter()
                .take(width)
                .map(|field| Cell::from_text(field))
                .collect()
        })
        .collect();

    Ok(RawTable { columns, rows })
}
