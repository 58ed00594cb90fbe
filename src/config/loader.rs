use std::path::Path;
use crate::errors::SweepError;
use tracing::{debug, warn};

/// Read a username or password list: one entry per line, trimmed, blank lines dropped.
///
/// Order and duplicates are preserved. Lines that are not valid UTF-8 are
/// skipped with a warning rather than altered.
pub async fn load_identity_list(path: &Path) -> Result<Vec<String>, SweepError> {
    if !path.exists() {
        return Err(SweepError::FileNotFound(path.display().to_string()));
    }

    let bytes = tokio::fs::read(path).await?;
    let entries = parse_lines(&bytes, &path.display().to_string());

    debug!(path = %path.display(), count = entries.len(), "Loaded list");
    Ok(entries)
}

fn parse_lines(content: &[u8], source: &str) -> Vec<String> {
    let mut entries = Vec::new();
    for (idx, raw) in content.split(|b| *b == b'\n').enumerate() {
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line.trim(),
            Err(_) => {
                warn!(path = source, line = idx + 1, "Skipping line that is not valid UTF-8");
                continue;
            }
        };
        if !line.is_empty() {
            entries.push(line.to_string());
        }
    }
    entries
}
