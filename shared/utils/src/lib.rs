pub mod config;
pub mod error;
pub mod logging;
pub mod price_list;
pub mod validation;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use price_list::*;
pub use validation::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.cache.ttl_hours, 24);
        assert_eq!(config.cache.ttl_seconds(), 86_400);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert!(config.accuracy.enforce_floors);
        assert!(config.accuracy.promote_tiers);
    }

    #[test]
    fn test_logging_config_keys() {
        let value = serde_json::to_value(&AppConfig::default().logging).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["file_path", "format", "level"]);
    }

    #[test]
    fn test_error_codes() {
        let error = EstimatorError::incomplete_dimensions("length is required");
        assert_eq!(error.error_code(), "INCOMPLETE_DIMENSIONS");
        assert!(!error.is_retryable());

        let error = EstimatorError::extraction_service("upstream returned 502");
        assert_eq!(error.error_code(), "EXTRACTION_SERVICE_ERROR");
        assert!(error.is_retryable());
        assert!(error.partial_result().is_none());
    }

    #[test]
    fn test_error_response_conversion() {
        let response = ErrorResponse::from(EstimatorError::validation("length", "must be positive"));
        assert_eq!(response.code, "VALIDATION_ERROR");
        assert!(response.message.contains("length"));
        assert!(response.details.is_none());
    }
}
