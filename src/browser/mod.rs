use anyhow::{Context, Result};
use std::path::Path;

/// Open a generated report in the user's default browser
///
/// # Arguments
/// * `path` - Path of the HTML report on disk
///
/// # Errors
/// Returns error if browser cannot be opened (e.g., no browser available)
pub fn open_report(path: &Path) -> Result<()> {
    let target = path
        .canonicalize()
        .with_context(|| format!("Report not found at {}", path.display()))?;
    webbrowser::open(&target.to_string_lossy())
        .with_context(|| format!("Failed to open browser for report: {}", target.display()))?;
    Ok(())
}
