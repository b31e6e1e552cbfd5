pub mod schema;
pub mod watcher;

pub use schema::{
    AlertConfig, DisplayConfig, DisplayMode, HistoryConfig, RtpmConfig, SourceConfig,
    ThresholdConfig,
};
pub use watcher::ConfigWatcher;

use rtpm_core::{Result, RtpmError};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `source.endpoint`.
pub const ENDPOINT_ENV: &str = "RTPM_METRICS_URL";

/// Load configuration from a TOML file.  Returns `RtpmConfig::default()` if
/// the file doesn't exist so the dashboard always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<RtpmConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(RtpmConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| RtpmError::Config(format!("cannot read '{}': {e}", path.display())))?;

    toml::from_str(&raw).map_err(|e| RtpmError::Config(format!("TOML parse error: {e}")))
}

/// [`load`], then apply the [`ENDPOINT_ENV`] override.
pub fn load_with_env(path: impl AsRef<Path>) -> Result<RtpmConfig> {
    let mut config = load(path)?;
    apply_endpoint_override(&mut config, std::env::var(ENDPOINT_ENV).ok());
    Ok(config)
}

/// Replace the configured endpoint when `value` is non-empty.
pub fn apply_endpoint_override(config: &mut RtpmConfig, value: Option<String>) {
    if let Some(endpoint) = value.filter(|v| !v.trim().is_empty()) {
        tracing::debug!("endpoint overridden from {ENDPOINT_ENV}");
        config.source.endpoint = endpoint.trim().to_string();
    }
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("rtpm").join("rtpm.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("rtpm-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load("/definitely/not/here/rtpm.toml").unwrap();
        assert_eq!(cfg, RtpmConfig::default());
    }

    #[test]
    fn reads_endpoint_from_file() {
        let path = scratch_file("endpoint", "[source]\nendpoint = \"http://127.0.0.1:9/m\"\n");
        let cfg = load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.source.endpoint, "http://127.0.0.1:9/m");
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let path = scratch_file("broken", "[source\nendpoint = ");
        let err = load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, RtpmError::Config(_)));
    }

    #[test]
    fn env_override_only_when_non_empty() {
        let mut cfg = RtpmConfig::default();
        apply_endpoint_override(&mut cfg, Some("  ".into()));
        assert!(cfg.source.is_simulated());
        apply_endpoint_override(&mut cfg, Some(" http://host/metrics ".into()));
        assert_eq!(cfg.source.endpoint, "http://host/metrics");
        apply_endpoint_override(&mut cfg, None);
        assert_eq!(cfg.source.endpoint, "http://host/metrics");
    }

    #[test]
    fn default_path_ends_with_rtpm_toml() {
        assert!(default_path().ends_with("rtpm/rtpm.toml"));
    }
}
