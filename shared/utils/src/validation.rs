use crate::error::{EstimatorError, EstimatorResult};
use lumber_models::{BuildingDimensions, DimensionRequest, DEFAULT_WALL_HEIGHT_FEET};
use regex::Regex;
use std::sync::OnceLock;
use validator::{Validate, ValidationErrors};

pub fn validate_model<T: Validate>(model: &T) -> EstimatorResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_messages = format_validation_errors(&errors);
            Err(EstimatorError::validation("model", error_messages))
        }
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = match (&error.message, error.code.as_ref()) {
                (Some(message), _) => format!("{}: {}", field, message),
                (None, "length") => format!("Length validation failed for field '{}'", field),
                (None, "range") => format!("Value out of range for field '{}'", field),
                (None, code) => format!("Validation failed for field '{}': {}", field, code),
            };
            messages.push(message);
        }
    }

    messages.sort();
    messages.join(", ")
}

fn check_positive(name: &str, value: Option<f64>) -> EstimatorResult<f64> {
    match value {
        None => Err(EstimatorError::incomplete_dimensions(format!("{} is required", name))),
        Some(v) if !v.is_finite() => Err(EstimatorError::incomplete_dimensions(format!(
            "{} must be a finite number",
            name
        ))),
        Some(v) if v <= 0.0 => Err(EstimatorError::incomplete_dimensions(format!(
            "{} must be greater than zero, got {}",
            name, v
        ))),
        Some(v) => Ok(v),
    }
}

/// Validated `(length, width, height)` in feet; height defaults to 8ft.
pub fn validate_dimensions(
    length: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
) -> EstimatorResult<(f64, f64, f64)> {
    let length = check_positive("length", length)?;
    let width = check_positive("width", width)?;
    let height = check_positive("height", Some(height.unwrap_or(DEFAULT_WALL_HEIGHT_FEET)))?;
    Ok((length, width, height))
}

pub fn validate_dimension_request(request: &DimensionRequest) -> EstimatorResult<(f64, f64, f64)> {
    validate_model(request)?;
    validate_dimensions(Some(request.length), Some(request.width), request.height)
}

pub fn validate_building_dimensions(dimensions: &BuildingDimensions) -> EstimatorResult<(f64, f64, f64)> {
    validate_dimensions(
        dimensions.length_feet,
        dimensions.width_feet,
        dimensions.height_feet,
    )
}

fn document_hash_regex() -> &'static Regex {
    static HASH: OnceLock<Regex> = OnceLock::new();
    HASH.get_or_init(|| Regex::new(r"^([0-9a-f]{32,128}|mtime-\d+)$").expect("valid hash regex"))
}

/// Accepts hex content digests and modification-time fallback keys.
pub fn validate_document_hash(hash: &str) -> EstimatorResult<()> {
    if !document_hash_regex().is_match(hash) {
        return Err(EstimatorError::validation(
            "document_hash",
            "Expected a lowercase hex digest or an mtime-<seconds> key",
        ));
    }
    Ok(())
}

pub fn validate_file_type(file_name: &str, allowed_types: &[&str]) -> EstimatorResult<()> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if !allowed_types.contains(&extension.to_lowercase().as_str()) {
        return Err(EstimatorError::validation(
            "file_type",
            format!(
                "File type '{}' not allowed. Allowed types: {}",
                extension,
                allowed_types.join(", ")
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_length_is_rejected() {
        let err = validate_dimensions(Some(0.0), Some(30.0), None).unwrap_err();
        assert_eq!(err.error_code(), "INCOMPLETE_DIMENSIONS");
    }

    #[test]
    fn test_negative_width_is_rejected() {
        let err = validate_dimensions(Some(40.0), Some(-5.0), None).unwrap_err();
        assert!(matches!(err, EstimatorError::IncompleteDimensions { .. }));
    }

    #[test]
    fn test_missing_width_is_rejected() {
        assert!(validate_dimensions(Some(40.0), None, Some(8.0)).is_err());
        assert!(validate_dimensions(Some(f64::NAN), Some(30.0), None).is_err());
    }

    #[test]
    fn test_height_defaults_to_eight_feet() {
        assert_eq!(validate_dimensions(Some(40.0), Some(30.0), None).unwrap(), (40.0, 30.0, 8.0));
    }

    #[test]
    fn test_dimension_request_requires_project_name() {
        let request = DimensionRequest::new("", 40.0, 30.0);
        let err = validate_dimension_request(&request).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_document_hash_format() {
        assert!(validate_document_hash(&"a".repeat(64)).is_ok());
        assert!(validate_document_hash("mtime-1700000000").is_ok());
        assert!(validate_document_hash("not a hash").is_err());
    }

    #[test]
    fn test_validate_file_type() {
        assert!(validate_file_type("prices.csv", &["csv", "xlsx"]).is_ok());
        assert!(validate_file_type("prices.XLSX", &["csv", "xlsx"]).is_ok());
        assert!(validate_file_type("prices.txt", &["csv", "xlsx"]).is_err());
    }

    proptest! {
        /// Non-positive length or width never validates.
        #[test]
        fn prop_non_positive_dimensions_rejected(
            bad in -1000.0f64..=0.0,
            good in 0.1f64..1000.0,
        ) {
            prop_assert!(validate_dimensions(Some(bad), Some(good), None).is_err());
            prop_assert!(validate_dimensions(Some(good), Some(bad), None).is_err());
            prop_assert!(validate_dimensions(Some(good), Some(good), None).is_ok());
        }
    }
}
