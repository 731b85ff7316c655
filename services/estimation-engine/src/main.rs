//! Lumber Estimator
//!
//! Command-line dimension estimate:
//! `lumber-estimator <length> <width> [height] [project name]`

use anyhow::{bail, Context, Result};
use lumber_estimation_engine::EstimationPipeline;
use lumber_models::DimensionRequest;
use lumber_utils::{init_logging, log_error, AppConfig};
use tracing::info;

fn parse_feet(name: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .trim_end_matches('\'')
        .parse()
        .with_context(|| format!("{} must be a number of feet, got '{}'", name, value))
}

fn parse_request(args: &[String]) -> Result<DimensionRequest> {
    if args.len() < 2 {
        bail!("usage: lumber-estimator <length> <width> [height] [project name]");
    }

    let length = parse_feet("length", &args[0])?;
    let width = parse_feet("width", &args[1])?;
    let height = args.get(2).map(|h| parse_feet("height", h)).transpose()?;
    let project_name = match args.get(3..) {
        Some(rest) if !rest.is_empty() => rest.join(" "),
        _ => "Lumber Estimate".to_string(),
    };

    let mut request = DimensionRequest::new(project_name, length, width);
    if let Some(height) = height {
        request = request.with_height(height);
    }
    Ok(request)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Falling back to default configuration: {}", e);
        AppConfig::default()
    });
    init_logging(&config.logging)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let request = parse_request(&args)?;
    info!(project = %request.project_name, "Starting lumber estimate");

    let pipeline = EstimationPipeline::from_config(&config).await?;
    let analysis = match pipeline.estimate_from_dimensions(&request) {
        Ok(analysis) => analysis,
        Err(e) => {
            log_error!(e, "Estimate rejected", code = e.error_code());
            return Err(anyhow::Error::new(e).context("Estimate failed"));
        }
    };

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_request_defaults() {
        let request = parse_request(&args(&["40", "30"])).unwrap();
        assert_eq!(request.length, 40.0);
        assert_eq!(request.width, 30.0);
        assert_eq!(request.height, None);
        assert_eq!(request.project_name, "Lumber Estimate");
    }

    #[test]
    fn test_parse_request_with_height_and_name() {
        let request = parse_request(&args(&["40'", "30", "9", "Barn", "Addition"])).unwrap();
        assert_eq!(request.height, Some(9.0));
        assert_eq!(request.project_name, "Barn Addition");
    }

    #[test]
    fn test_parse_request_rejects_bad_input() {
        assert!(parse_request(&args(&["40"])).is_err());
        assert!(parse_request(&args(&["forty", "30"])).is_err());
    }
}
