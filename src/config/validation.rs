use super::schema::Config;
use crate::gde::IMPORTANCE_FACTORS;
use crate::ingest::sheet::parse_delimiter;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref factors) = config.importance_factors {
        for (factor, description) in factors {
            if !IMPORTANCE_FACTORS.contains(factor) {
                errors.push(format!(
                    "importance_factors.{}: factor must be between {} and {}",
                    factor,
                    IMPORTANCE_FACTORS.start(),
                    IMPORTANCE_FACTORS.end()
                ));
            }
            if description.trim().is_empty() {
                errors.push(format!("importance_factors.{}: description is empty", factor));
            }
        }
    }

    if let Some(delimiter) = config.sheet.as_ref().and_then(|s| s.delimiter.as_ref()) {
        if let Err(e) = parse_delimiter(delimiter) {
            errors.push(format!("sheet.delimiter: {}", e));
        }
    }

    if let Some(title) = config.report.as_ref().and_then(|r| r.title.as_ref()) {
        if title.trim().is_empty() {
            errors.push("report.title: must not be empty".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
