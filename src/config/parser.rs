use std::path::Path;
use crate::errors::SweepError;
use super::types::FileConfig;
use tracing::{debug, warn};

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<FileConfig, SweepError> {
    if !path.exists() {
        return Err(SweepError::FileNotFound(path.display().to_string()));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(SweepError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config: FileConfig = serde_yaml::from_str(&content)?;

    validate_rules(&config)?;
    debug!(path = %path.display(), rules = config.classification.len(), "Loaded config file");

    Ok(config)
}

/// Reject classification rules that could never match or would match everything.
fn validate_rules(config: &FileConfig) -> Result<(), SweepError> {
    for rule in &config.classification {
        if rule.pattern.trim().is_empty() {
            return Err(SweepError::Config(
                "Classification rule with an empty pattern would match every failure".into(),
            ));
        }
    }

    if let Some(delay) = config.delay_ms {
        if delay == 0 {
            warn!("delay_ms is 0: attempts will not be throttled");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_parse_missing_file() {
        let err = parse_config(Path::new("/nonexistent/bindsweep.yaml")).await.unwrap_err();
        assert!(matches!(err, SweepError::FileNotFound(_)));
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn test_parse_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server: dc01\ndomain: CORP\nstop_on_success: false").unwrap();
        let config = parse_config(file.path()).await.unwrap();
        assert_eq!(config.server.as_deref(), Some("dc01"));
        assert_eq!(config.stop_on_success, Some(false));
        assert!(config.classification.is_empty());
    }

    #[tokio::test]
    async fn test_parse_rejects_empty_pattern() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "classification:\n  - pattern: \"\"\n    outcome: account_locked").unwrap();
        let err = parse_config(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("empty pattern"));
    }

    #[tokio::test]
    async fn test_parse_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server: [unclosed").unwrap();
        assert!(matches!(parse_config(file.path()).await, Err(SweepError::Yaml(_))));
    }
}
