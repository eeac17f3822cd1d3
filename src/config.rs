//! Runtime configuration sourced from environment variables.

use std::path::PathBuf;

pub const MODEL_PATH_ENV: &str = "HEARTRISK_MODEL_PATH";
pub const MODEL_SHA256_ENV: &str = "HEARTRISK_MODEL_SHA256";
pub const REQUIRE_MODEL_DIGEST_ENV: &str = "HEARTRISK_REQUIRE_MODEL_DIGEST";
pub const LOG_MODE_ENV: &str = "HEARTRISK_LOG_MODE";
pub const LOG_FILE_ENV: &str = "HEARTRISK_LOG_FILE";
pub const SANITIZE_MAX_BYTES_ENV: &str = "HEARTRISK_SANITIZE_MAX_BYTES";

const DEFAULT_MODEL_PATH: &str = "models";
const DEFAULT_LOG_FILE: &str = "data/heartrisk.log";

/// Per-line cap applied by the log sanitizer.
pub const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    File,
    Stdout,
    /// File when stdout is a terminal (the TUI owns it), stdout otherwise.
    Auto,
}

impl LogMode {
    fn parse(s: &str) -> Self {
        match s {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(&self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Model directory or `model.json` path
    pub model_path: PathBuf,
    /// Pinned SHA-256 of the model artifact (hex)
    pub model_sha256: Option<String>,
    /// Refuse to load a model without a configured digest
    pub require_model_digest: bool,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    /// Longest log line the sanitizer keeps, in bytes
    pub sanitize_max_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            model_sha256: None,
            require_model_digest: false,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            sanitize_max_bytes: DEFAULT_SANITIZE_MAX_BYTES,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            model_path: lookup(MODEL_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            model_sha256: lookup(MODEL_SHA256_ENV)
                .map(|v| v.trim().to_ascii_lowercase())
                .filter(|v| !v.is_empty()),
            require_model_digest: lookup(REQUIRE_MODEL_DIGEST_ENV)
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
            log_mode: lookup(LOG_MODE_ENV)
                .map(|v| LogMode::parse(&v))
                .unwrap_or(defaults.log_mode),
            log_file: lookup(LOG_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            sanitize_max_bytes: lookup(SANITIZE_MAX_BYTES_ENV)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|&v| v > 0)
                .unwrap_or(defaults.sanitize_max_bytes),
        }
    }
}

/// Parse a boolean flag (`1`, `true`, `yes`; anything else is false).
#[must_use]
pub fn parse_bool(v: &str) -> bool {
    matches!(v, "1" | "true" | "TRUE" | "yes" | "YES")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings_from(&[]);
        assert_eq!(s.model_path, PathBuf::from("models"));
        assert!(s.model_sha256.is_none());
        assert!(!s.require_model_digest);
        assert_eq!(s.log_mode, LogMode::Auto);
        assert_eq!(s.sanitize_max_bytes, DEFAULT_SANITIZE_MAX_BYTES);
    }

    #[test]
    fn test_overrides() {
        let s = settings_from(&[
            (MODEL_PATH_ENV, "/opt/model.json"),
            (MODEL_SHA256_ENV, " ABCDEF "),
            (REQUIRE_MODEL_DIGEST_ENV, "yes"),
            (LOG_MODE_ENV, "stdout"),
            (LOG_FILE_ENV, "/tmp/x.log"),
            (SANITIZE_MAX_BYTES_ENV, "4096"),
        ]);
        assert_eq!(s.model_path, PathBuf::from("/opt/model.json"));
        assert_eq!(s.model_sha256.as_deref(), Some("abcdef"));
        assert!(s.require_model_digest);
        assert_eq!(s.log_mode, LogMode::Stdout);
        assert_eq!(s.log_file, PathBuf::from("/tmp/x.log"));
        assert_eq!(s.sanitize_max_bytes, 4096);
    }

    #[test]
    fn test_bad_sanitize_limit_uses_default() {
        for bad in ["0", "lots", "-5"] {
            let s = settings_from(&[(SANITIZE_MAX_BYTES_ENV, bad)]);
            assert_eq!(s.sanitize_max_bytes, DEFAULT_SANITIZE_MAX_BYTES);
        }
    }

    #[test]
    fn test_log_mode_resolution() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("1"));
        assert!(parse_bool("TRUE"));
        assert!(!parse_bool("no"));
        assert!(!parse_bool(""));
    }
}
