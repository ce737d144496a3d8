use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs;
use std::io::Write;
use std::path::Path;

use super::formatter::format_value;
use crate::gde::{FactorKind, RawTable, DAMAGE_COLUMN};
use crate::report::{FamilyReport, Report};

const STYLE: &str = "\
body { font-family: Arial; margin: 30px; }
table { border-collapse: collapse; width: 100%; margin-bottom: 20px; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: center; }
th { background-color: #f2f2f2; }
.failures li { color: #a00; }
.image-gallery { display: flex; flex-wrap: wrap; gap: 16px; margin-top: 20px; }
.image-box { width: 300px; text-align: center; }
.image-box img { width: 100%; border: 1px solid #ccc; border-radius: 5px; }
";

const MATHJAX: &str = "<script id='MathJax-script' async src='https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js'></script>";

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Read a photo and encode it as a `data:` URI for inline embedding.
pub fn image_data_uri(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read photo at {}", path.display()))?;
    Ok(format!("data:{};base64,{}", image_mime(path), STANDARD.encode(bytes)))
}

/// Render the consolidated report as a standalone HTML document.
///
/// Photos are read from disk and embedded, so the document has no local
/// file references.
pub fn render_report(report: &Report) -> Result<String> {
    let mut html = String::new();
    let title = escape_html(&report.title);

    html.push_str(&format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset='utf-8'><title>{title}</title>\n<style>\n{STYLE}</style>\n{MATHJAX}\n</head>\n<body>\n<h1>{title}</h1>\n<p><small>Gerado em {}</small></p>\n",
        report.generated_at.format("%d/%m/%Y %H:%M")
    ));

    for family in &report.families {
        render_family(&mut html, family)?;
    }

    html.push_str("<hr>\n<h2>Resumo dos Resultados por Família</h2>\n<table>\n<tr><th>Família / Arquivo</th><th>Fator de Importância (F<sub>r</sub>)</th><th>F<sub>r</sub> × G<sub>df</sub></th></tr>\n");
    for family in &report.families {
        html.push_str(&format!(
            "<tr><td>Família {} – {}</td><td>{}</td><td>{}</td></tr>\n",
            family.position,
            escape_html(&family.name),
            family.importance,
            format_value(family.result.fr_gdf)
        ));
    }
    html.push_str("</table>\n");

    let structure = &report.structure;
    html.push_str("<hr>\n<h2>Grau de Deterioração da Estrutura</h2>\n<table>\n<tr><th>Descrição</th><th>Valor</th></tr>\n");
    let rows = [
        ("∑(F<sub>r</sub> × G<sub>df</sub>)", format_value(structure.sum_fr_gdf)),
        ("∑ F<sub>r</sub>", structure.sum_fr.to_string()),
        ("Grau de Deterioração da Estrutura (G<sub>d</sub>)", format_value(structure.g_d)),
        ("Nível de Deterioração", structure.level.label().to_string()),
        ("Ação Recomendada", escape_html(&structure.recommendation)),
    ];
    for (label, value) in rows {
        html.push_str(&format!("<tr><td>{}</td><td>{}</td></tr>\n", label, value));
    }
    html.push_str("</table>\n");

    if !report.failures.is_empty() {
        html.push_str("<hr>\n<h2>Famílias não avaliadas</h2>\n<ul class='failures'>\n");
        for failure in &report.failures {
            html.push_str(&format!(
                "<li>Família {} – {}: {}</li>\n",
                failure.position,
                escape_html(&failure.name),
                escape_html(&failure.error)
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    Ok(html)
}

fn render_family(html: &mut String, family: &FamilyReport) -> Result<()> {
    let result = &family.result;
    let sheet_name = family
        .sheet
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    html.push_str(&format!(
        "<br><hr>\n<h2>Família {} - {} ({})</h2>\n",
        family.position,
        escape_html(&family.name),
        escape_html(&sheet_name)
    ));

    html.push_str("<h3>Tabela original da inspeção</h3>\n");
    render_original_table(html, &family.original);

    html.push_str("<br><hr>\n<h3>Resultados por peça (G<sub>de</sub>)</h3>\n<table>\n<tr><th>Elemento</th><th>\\(\\sum D\\)</th><th>\\(D_{max}\\)</th><th>\\(G_{de}\\)</th></tr>\n");
    for (name, element) in &result.elements {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(name),
            format_value(element.sum_d),
            format_value(element.d_max),
            format_value(element.g_de)
        ));
    }
    html.push_str("</table>\n");

    html.push_str(&format!(
        "<p><strong>Fator de Importância:</strong> \\( F_r = {} \\) – {}</p>\n",
        family.importance,
        escape_html(&family.importance_description)
    ));

    let max = format_value(result.gde_max);
    let sum = format_value(result.gde_sum);
    html.push_str(&format!(
        "<br>\n<h3>Cálculo do G<sub>df</sub> (Grau de Deficiência Familiar):</h3>\n\\[ G_{{df}} = {max} \\cdot \\sqrt{{1 + \\frac{{({sum} - {max})}}{{{sum}}}}} = {} \\]\n<br>\n\\[ F_{{r}} \\cdot G_{{df}} = {} \\cdot {} = \\mathbf{{{}}} \\]\n",
        format_value(result.g_df),
        format_value(result.importance),
        format_value(result.g_df),
        format_value(result.fr_gdf)
    ));

    if !family.photos.is_empty() {
        html.push_str("<hr><h3>Fotos da inspeção:</h3><div class='image-gallery'>\n");
        for photo in &family.photos {
            let name = photo
                .file_name()
                .map(|n| escape_html(&n.to_string_lossy()))
                .unwrap_or_default();
            html.push_str(&format!(
                "<div class='image-box'><img src='{}' alt='{}'><div><small>{}</small></div></div>\n",
                image_data_uri(photo)?,
                name,
                name
            ));
        }
        html.push_str("</div>\n");
    }

    Ok(())
}

/// Original sheet with its two-level header: element names spanning their
/// Fi/Fp pair, missing values shown as 0.
fn render_original_table(html: &mut String, raw: &RawTable) {
    html.push_str("<table>\n<tr>");
    let mut idx = 0;
    while idx < raw.columns.len() {
        let group = raw.columns[idx].group.trim();
        if group == DAMAGE_COLUMN {
            html.push_str(&format!("<th rowspan='2'>{}</th>", escape_html(group)));
            idx += 1;
            continue;
        }
        let span = raw.columns[idx..]
            .iter()
            .take_while(|c| c.group.trim() == group)
            .count();
        html.push_str(&format!("<th colspan='{}'>{}</th>", span, escape_html(group)));
        idx += span;
    }
    html.push_str("</tr>\n<tr>");
    for column in &raw.columns {
        if column.group.trim() == DAMAGE_COLUMN {
            continue;
        }
        let factor = FactorKind::parse(&column.factor)
            .map(|k| k.label().to_string())
            .unwrap_or_else(|| escape_html(&column.factor));
        html.push_str(&format!("<th>{}</th>", factor));
    }
    html.push_str("</tr>\n");

    for r in 0..raw.rows.len() {
        html.push_str("<tr>");
        for c in 0..raw.columns.len() {
            html.push_str(&format!("<td>{}</td>", escape_html(&raw.cell(r, c).display())));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
}

/// Write the rendered report atomically
///
/// Uses atomic-write-file so an existing report is never left half-written.
pub fn save_report(path: &Path, html: &str) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    file.write_all(html.as_bytes())
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    file.commit()
        .with_context(|| format!("Failed to save report to {}", path.display()))?;

    Ok(())
}
