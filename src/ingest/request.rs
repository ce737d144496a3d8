use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A report request: every family to evaluate with its importance factor.
///
/// Example YAML:
/// ```yaml
/// title: Ponte sobre o Córrego Fundo
/// families:
///   - name: Pilares
///     path: pilares/
///     importance: 5
///   - path: guarda_corpo.csv
///     importance: 1
///     delimiter: ";"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReportRequest {
    #[serde(default)]
    pub title: Option<String>,

    pub families: Vec<FamilyRequest>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FamilyRequest {
    /// Display name; defaults to the path's file stem
    #[serde(default)]
    pub name: Option<String>,

    /// Sheet file or family directory, relative to the manifest
    pub path: PathBuf,

    /// Importance factor F_r (1..5)
    pub importance: u8,

    /// Field delimiter of this family's sheet, overriding the config
    #[serde(default)]
    pub delimiter: Option<String>,
}

impl FamilyRequest {
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default(),
        }
    }

    /// Delimiter override as a character. Assumes the request passed validation.
    pub fn delimiter(&self) -> Option<char> {
        self.delimiter.as_deref().and_then(|d| d.chars().next())
    }
}

/// Load a request manifest. Relative family paths are resolved against the
/// manifest's directory, made absolute when possible.
pub fn load_request(path: &Path) -> Result<ReportRequest> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read report request at {}", path.display()))?;

    let mut request: ReportRequest = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse report request: invalid YAML in {}", path.display()))?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let base = parent
        .canonicalize()
        .unwrap_or_else(|_| parent.to_path_buf());
    for family in &mut request.families {
        if family.path.is_relative() {
            family.path = base.join(&family.path);
        }
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request() {
        let yaml = r#"
title: Ponte Teste
families:
  - name: Pilares
    path: pilares/
    importance: 5
  - path: guarda_corpo.csv
    importance: 1
    delimiter: ";"
"#;
        let request: ReportRequest = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(request.title.as_deref(), Some("Ponte Teste"));
        assert_eq!(request.families.len(), 2);
        assert_eq!(request.families[0].display_name(), "Pilares");
        assert_eq!(request.families[1].display_name(), "guarda_corpo");
        assert_eq!(request.families[1].importance, 1);
        assert_eq!(request.families[0].delimiter(), None);
        assert_eq!(request.families[1].delimiter(), Some(';'));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "families:\n  - path: a.csv\n    importance: 5\n    weight: 2\n";
        assert!(serde_saphyr::from_str::<ReportRequest>(yaml).is_err());
    }

    #[test]
    fn test_blank_name_falls_back_to_stem() {
        let family = FamilyRequest {
            name: Some("  ".to_string()),
            path: PathBuf::from("dados/lajes"),
            importance: 4,
            delimiter: None,
        };
        assert_eq!(family.display_name(), "lajes");
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("relatorio.yaml");
        fs::write(
            &manifest,
            "families:\n  - path: pilares.csv\n    importance: 5\n  - path: /abs/vigas.csv\n    importance: 5\n",
        )
        .unwrap();

        let request = load_request(&manifest).unwrap();
        let base = dir.path().canonicalize().unwrap();
        assert_eq!(request.families[0].path, base.join("pilares.csv"));
        assert_eq!(request.families[1].path, PathBuf::from("/abs/vigas.csv"));
    }
}
