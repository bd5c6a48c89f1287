use bijux_labeler_model::ConflictPolicy;
use serde::Serialize;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DATA_ROOT: &str = "images";
pub const DEFAULT_CORS_ORIGIN: &str = "http://127.0.0.1:5500";

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub data_root: PathBuf,
    pub cors_allowed_origins: Vec<String>,
    pub max_body_bytes: usize,
    pub max_upload_files: usize,
    pub conflict_policy: ConflictPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            data_root: PathBuf::from(DEFAULT_DATA_ROOT),
            cors_allowed_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            max_body_bytes: 50 * 1024 * 1024,
            max_upload_files: 10,
            conflict_policy: ConflictPolicy::Reject,
        }
    }
}

impl ServerConfig {
    /// Rejects combinations the server cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_upload_files == 0 {
            return Err("max_upload_files must be at least 1".to_string());
        }
        if self.max_body_bytes == 0 {
            return Err("max_body_bytes must be at least 1".to_string());
        }
        if self.cors_allowed_origins.iter().any(|o| o.trim().is_empty()) {
            return Err("cors origins must not be empty".to_string());
        }
        Ok(())
    }
}

/// Splits a comma-separated origin list, dropping blank items.
#[must_use]
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_bundled_client() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.bind_addr, "127.0.0.1:3000");
        assert_eq!(cfg.cors_allowed_origins, vec!["http://127.0.0.1:5500"]);
        assert_eq!(cfg.max_upload_files, 10);
        assert_eq!(cfg.conflict_policy, ConflictPolicy::Reject);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_limits_are_rejected() {
        let cfg = ServerConfig {
            max_upload_files: 0,
            ..ServerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn origin_list_trims_and_skips_blanks() {
        assert_eq!(
            parse_origin_list(" http://a , ,http://b"),
            vec!["http://a", "http://b"]
        );
    }
}
