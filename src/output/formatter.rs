use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::gde::{DeteriorationLevel, FamilyResult, ImportanceVocabulary, StructureResult};
use crate::report::{FamilyFailure, FamilyReport, Report};

const VALUE_WIDTH: usize = 12;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Indices are shown with 4 decimals, as in the report.
pub fn format_value(value: f64) -> String {
    format!("{:.4}", value)
}

/// Deterioration level, colored by severity when colors are on.
pub fn format_level(level: DeteriorationLevel, use_colors: bool) -> String {
    let label = level.label();
    if !use_colors {
        return label.to_string();
    }
    match level {
        DeteriorationLevel::Low => label.green().to_string(),
        DeteriorationLevel::Medium => label.yellow().to_string(),
        DeteriorationLevel::High => label.red().to_string(),
        DeteriorationLevel::Critical => label.red().bold().to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Width of the name column: the longest name, limited by the terminal.
fn name_width<'a>(names: impl Iterator<Item = &'a str>, header: &str, other_columns: usize) -> usize {
    let longest = names
        .map(|n| n.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0);
    match get_terminal_width() {
        Some(width) if width > other_columns + 12 => longest.min(width - other_columns),
        Some(_) => longest.min(20),
        None => longest,
    }
}

/// Per-element table of one family followed by its G_df computation.
pub fn format_element_table(family: &FamilyReport, use_colors: bool) -> String {
    let result = &family.result;
    let width = name_width(
        result.elements.keys().map(String::as_str),
        "Elemento",
        VALUE_WIDTH * 3,
    );

    let header = format!(
        "{:<width$}{:>vw$}{:>vw$}{:>vw$}",
        "Elemento",
        "ΣD",
        "D_max",
        "G_de",
        width = width,
        vw = VALUE_WIDTH
    );
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for (name, element) in &result.elements {
        let line = format!(
            "{:<width$}{:>vw$}{:>vw$}{:>vw$}",
            truncate_name(name, width),
            format_value(element.sum_d),
            format_value(element.d_max),
            format_value(element.g_de),
            width = width,
            vw = VALUE_WIDTH
        );
        if use_colors && element.g_de == 0.0 {
            lines.push(line.dimmed().to_string());
        } else {
            lines.push(line);
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "F_r = {} ({})",
        family.importance, family.importance_description
    ));
    lines.push(format_gdf_formula(result));
    let weighted = format!("F_r × G_df = {}", format_value(result.fr_gdf));
    lines.push(if use_colors {
        weighted.bold().to_string()
    } else {
        weighted
    });

    lines.join("\n")
}

/// `G_df = max · sqrt(1 + (sum - max) / sum) = value`, with values filled in.
pub fn format_gdf_formula(result: &FamilyResult) -> String {
    format!(
        "G_df = {} · sqrt(1 + ({} - {}) / {}) = {}",
        format_value(result.gde_max),
        format_value(result.gde_sum),
        format_value(result.gde_max),
        format_value(result.gde_sum),
        format_value(result.g_df)
    )
}

/// One line per family: position, name, F_r and F_r × G_df.
pub fn format_family_summary(families: &[FamilyReport], use_colors: bool) -> String {
    if families.is_empty() {
        return "No families evaluated.".to_string();
    }

    let labels: Vec<String> = families
        .iter()
        .map(|f| format!("Família {} – {}", f.position, f.name))
        .collect();
    let width = name_width(
        labels.iter().map(String::as_str),
        "Família / Arquivo",
        VALUE_WIDTH * 2,
    );

    let header = format!(
        "{:<width$}{:>vw$}{:>vw$}",
        "Família / Arquivo",
        "F_r",
        "F_r × G_df",
        width = width,
        vw = VALUE_WIDTH
    );
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for (label, family) in labels.iter().zip(families) {
        lines.push(format!(
            "{:<width$}{:>vw$}{:>vw$}",
            truncate_name(label, width),
            family.importance,
            format_value(family.result.fr_gdf),
            width = width,
            vw = VALUE_WIDTH
        ));
    }

    lines.join("\n")
}

/// Structure grade block: sums, G_d, level and recommended action.
pub fn format_structure(structure: &StructureResult, use_colors: bool) -> String {
    let g_d = format_value(structure.g_d);
    let rows = [
        ("∑(F_r × G_df)", format_value(structure.sum_fr_gdf)),
        ("∑ F_r", structure.sum_fr.to_string()),
        (
            "G_d",
            if use_colors {
                g_d.bold().to_string()
            } else {
                g_d
            },
        ),
        ("Nível", format_level(structure.level, use_colors)),
        ("Ação recomendada", structure.recommendation.clone()),
    ];

    rows.iter()
        .map(|(label, value)| format!("{:<18}{}", label, value))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_failures(failures: &[FamilyFailure], use_colors: bool) -> String {
    failures
        .iter()
        .map(|f| {
            let head = format!("Família {} – {}:", f.position, f.name);
            if use_colors {
                format!("{} {}", head.red(), f.error)
            } else {
                format!("{} {}", head, f.error)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full terminal rendering of a report: family summary, structure grade and
/// any failed families.
pub fn format_report(report: &Report, use_colors: bool) -> String {
    let heading = |text: &str| {
        if use_colors {
            text.bold().underline().to_string()
        } else {
            text.to_string()
        }
    };

    let mut sections = vec![
        heading(report.title.as_str()),
        String::new(),
        format_family_summary(&report.families, use_colors),
        String::new(),
        heading("Grau de Deterioração da Estrutura"),
        format_structure(&report.structure, use_colors),
    ];

    if !report.failures.is_empty() {
        sections.push(String::new());
        sections.push(heading("Famílias não avaliadas"));
        sections.push(format_failures(&report.failures, use_colors));
    }

    sections.join("\n")
}

/// The importance factor vocabulary, one factor per line.
pub fn format_factors(vocabulary: &ImportanceVocabulary) -> String {
    vocabulary
        .iter()
        .map(|(factor, description)| format!("{}  {}", factor, description))
        .collect::<Vec<_>>()
        .join("\n")
}
