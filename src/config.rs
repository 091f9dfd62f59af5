// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Inference client configuration.

use anyhow::{bail, Context, Result};
use std::path::Path;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Settings for the external vision model.
#[derive(Clone)]
pub struct InferenceConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

impl InferenceConfig {
    /// Build a configuration, reading the api key from `key_file`.
    pub fn from_key_file(key_file: &Path, model: &str, api_base: &str) -> Result<Self> {
        Ok(Self {
            api_key: read_api_key(key_file)?,
            model: model.trim().to_string(),
            api_base: api_base.trim().trim_end_matches('/').to_string(),
        })
    }
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Read the api key from the first line of `path`.
pub fn read_api_key(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read api key file {}", path.display()))?;
    let key = contents.lines().next().unwrap_or_default().trim();
    if key.is_empty() {
        bail!("Api key file {} is empty", path.display());
    }
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_first_line_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");
        std::fs::write(&path, "sk-test-123  \nsecond line\n").unwrap();
        assert_eq!(read_api_key(&path).unwrap(), "sk-test-123");
    }

    #[test]
    fn test_missing_or_empty_key_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");
        assert!(read_api_key(&path).is_err());

        std::fs::write(&path, "").unwrap();
        assert!(read_api_key(&path).is_err());

        std::fs::write(&path, "   \n").unwrap();
        assert!(read_api_key(&path).is_err());
    }

    #[test]
    fn test_api_base_trailing_slash_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");
        std::fs::write(&path, "sk-secret").unwrap();

        let config = InferenceConfig::from_key_file(&path, DEFAULT_MODEL, "http://localhost:8080/v1/").unwrap();
        assert_eq!(config.api_base, "http://localhost:8080/v1");
        assert!(!format!("{:?}", config).contains("secret"));
    }
}
