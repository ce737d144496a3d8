use std::collections::HashSet;

use super::request::ReportRequest;
use super::sheet::parse_delimiter;
use crate::gde::IMPORTANCE_FACTORS;

/// Validate a report request before any family is read.
/// Returns all validation errors at once (not just the first).
pub fn validate_request(request: &ReportRequest) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if request.families.is_empty() {
        errors.push("families: at least one family is required".to_string());
    }

    let mut seen = HashSet::new();
    for (i, family) in request.families.iter().enumerate() {
        let name = family.display_name();
        if name.is_empty() {
            errors.push(format!("families[{}].name: must not be empty", i));
        } else if !seen.insert(name.clone()) {
            errors.push(format!("families[{}].name: duplicate family '{}'", i, name));
        }

        if !IMPORTANCE_FACTORS.contains(&family.importance) {
            errors.push(format!(
                "families[{}].importance: {} is not between {} and {}",
                i,
                family.importance,
                IMPORTANCE_FACTORS.start(),
                IMPORTANCE_FACTORS.end()
            ));
        }

        if let Some(delimiter) = &family.delimiter {
            if let Err(e) = parse_delimiter(delimiter) {
                errors.push(format!("families[{}].delimiter: {}", i, e));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::FamilyRequest;
    use std::path::PathBuf;

    fn family(name: Option<&str>, path: &str, importance: u8) -> FamilyRequest {
        FamilyRequest {
            name: name.map(str::to_string),
            path: PathBuf::from(path),
            importance,
            delimiter: None,
        }
    }

    #[test]
    fn test_valid_request() {
        let request = ReportRequest {
            title: None,
            families: vec![family(Some("Pilares"), "p.csv", 5), family(None, "v.csv", 4)],
        };
        assert!(validate_request(&request).is_ok());
    }

    #[test]
    fn test_empty_request() {
        let request = ReportRequest {
            title: None,
            families: vec![],
        };
        let errors = validate_request(&request).unwrap_err();
        assert!(errors[0].contains("at least one family"));
    }

    #[test]
    fn test_importance_out_of_range() {
        let request = ReportRequest {
            title: None,
            families: vec![family(None, "p.csv", 0), family(None, "v.csv", 6)],
        };
        let errors = validate_request(&request).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("families[0].importance"));
        assert!(errors[1].contains("families[1].importance"));
    }

    #[test]
    fn test_duplicate_names() {
        let request = ReportRequest {
            title: None,
            families: vec![family(Some("Pilares"), "a.csv", 5), family(None, "x/Pilares.csv", 5)],
        };
        let errors = validate_request(&request).unwrap_err();
        assert!(errors[0].contains("duplicate family 'Pilares'"));
    }

    #[test]
    fn test_bad_delimiter() {
        let mut bad = family(Some("Vigas"), "v.csv", 4);
        bad.delimiter = Some(";;".to_string());
        let mut good = family(Some("Lajes"), "l.csv", 4);
        good.delimiter = Some("|".to_string());
        let request = ReportRequest {
            title: None,
            families: vec![good, bad],
        };
        let errors = validate_request(&request).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("families[1].delimiter"));
    }

    #[test]
    fn test_collects_all_errors() {
        let request = ReportRequest {
            title: None,
            families: vec![family(None, "", 9)],
        };
        let errors = validate_request(&request).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
