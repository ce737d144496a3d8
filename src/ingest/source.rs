use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use super::sheet::SHEET_EXTENSIONS;

/// Subdirectory of a family directory holding inspection photos.
pub const PHOTO_DIR: &str = "fotos";

const PHOTO_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Files making up one family's inspection data.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilySource {
    pub sheet: PathBuf,
    /// Photos sorted by file name
    pub photos: Vec<PathBuf>,
    /// Whether the family came from a directory (and so could carry photos)
    pub is_directory: bool,
}

/// Resolve a family path into its sheet and photos.
///
/// A file is taken as the sheet itself. A directory must contain exactly one
/// sheet at its top level; photos are collected from its `fotos/` folder.
pub fn resolve_source(path: &Path) -> Result<FamilySource> {
    if path.is_file() {
        if !has_extension(path, &SHEET_EXTENSIONS) {
            bail!(
                "{} is not an inspection sheet (expected .{})",
                path.display(),
                SHEET_EXTENSIONS.join(", .")
            );
        }
        return Ok(FamilySource {
            sheet: path.to_path_buf(),
            photos: Vec::new(),
            is_directory: false,
        });
    }

    if !path.is_dir() {
        bail!("Family path not found: {}", path.display());
    }

    let sheets: Vec<PathBuf> = list_files(path)?
        .into_iter()
        .filter(|p| has_extension(p, &SHEET_EXTENSIONS))
        .collect();
    let sheet = match sheets.as_slice() {
        [sheet] => sheet.clone(),
        [] => bail!("No inspection sheet (.csv/.tsv/.txt) found in {}", path.display()),
        _ => bail!(
            "Found {} inspection sheets in {}, expected exactly one",
            sheets.len(),
            path.display()
        ),
    };

    let photo_dir = path.join(PHOTO_DIR);
    let mut photos: Vec<PathBuf> = if photo_dir.is_dir() {
        list_files(&photo_dir)?
            .into_iter()
            .filter(|p| has_extension(p, &PHOTO_EXTENSIONS))
            .collect()
    } else {
        Vec::new()
    };
    photos.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));

    Ok(FamilySource {
        sheet,
        photos,
        is_directory: true,
    })
}

/// Regular files directly inside `dir`.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let entries = glob::glob(&pattern)
        .with_context(|| format!("Invalid directory path {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolve_sheet_file() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = dir.path().join("pilares.csv");
        fs::write(&sheet, "Danos,P01,\n,Fi,Fp\n").unwrap();

        let source = resolve_source(&sheet).unwrap();
        assert_eq!(source.sheet, sheet);
        assert!(source.photos.is_empty());
        assert!(!source.is_directory);
    }

    #[test]
    fn test_resolve_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = dir.path().join("pilares.xlsx");
        fs::write(&sheet, "binary").unwrap();
        assert!(resolve_source(&sheet).is_err());
    }

    #[test]
    fn test_resolve_directory_with_photos() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("planilha_inspecao.csv"), "x").unwrap();
        fs::write(dir.path().join("notas.md"), "x").unwrap();
        let photos = dir.path().join(PHOTO_DIR);
        fs::create_dir(&photos).unwrap();
        fs::write(photos.join("image_2.JPG"), [0xff, 0xd8]).unwrap();
        fs::write(photos.join("image_1.png"), [0x89]).unwrap();
        fs::write(photos.join("leia-me.txt"), "x").unwrap();

        let source = resolve_source(dir.path()).unwrap();
        assert!(source.sheet.ends_with("planilha_inspecao.csv"));
        assert!(source.is_directory);
        let names: Vec<_> = source
            .photos
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["image_1.png", "image_2.JPG"]);
    }

    #[test]
    fn test_directory_without_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_source(dir.path()).unwrap_err();
        assert!(err.to_string().contains("No inspection sheet"));
    }

    #[test]
    fn test_directory_with_two_sheets() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "x").unwrap();
        fs::write(dir.path().join("b.csv"), "x").unwrap();
        let err = resolve_source(dir.path()).unwrap_err();
        assert!(err.to_string().contains("expected exactly one"));
    }

    #[test]
    fn test_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_source(&dir.path().join("nope")).is_err());
    }
}
