use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

/// Environment variable that overrides `provider.api_key`.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Connection settings for the upstream OpenWeather API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// `metric`, `imperial` or `standard`.
    #[serde(default = "default_units")]
    pub units: String,

    /// Language of the condition descriptions.
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Requested forecast horizon in days (1-16).
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

const fn default_forecast_days() -> u8 {
    7
}

const fn default_timeout() -> u64 {
    30
}

// Manual impl so the API key never ends up in logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("units", &self.units)
            .field("lang", &self.lang)
            .field("forecast_days", &self.forecast_days)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            units: default_units(),
            lang: default_lang(),
            forecast_days: default_forecast_days(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Listening address and CORS policy of the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS. Empty means any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [provider]
/// api_key = "..."
/// lang = "fr"
///
/// [server]
/// port = 8000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Path of the config file: `explicit` if given, otherwise the platform config directory.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::config_file_path(),
        }
    }

    /// Load config from `path`, falling back to defaults if the file doesn't
    /// exist yet. `WEATHER_API_KEY` wins over the file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = Self::from_file(path)?;
        cfg.apply_env_override(std::env::var(API_KEY_ENV).ok());
        Ok(cfg)
    }

    /// Read `path` as-is, without environment overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    fn apply_env_override(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.provider.api_key = Some(key);
        }
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file in the platform config directory.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-api", "weather-api")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns the provider API key, if one is configured.
    pub fn provider_api_key(&self) -> Option<&str> {
        self.provider.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn is_provider_configured(&self) -> bool {
        self.provider_api_key().is_some()
    }

    pub fn set_provider_api_key(&mut self, api_key: String) {
        self.provider.api_key = Some(api_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("weather-core-config-{}-{name}", std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn defaults_point_at_openweather() {
        let cfg = Config::default();

        assert_eq!(cfg.provider.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(cfg.provider.units, "metric");
        assert_eq!(cfg.provider.forecast_days, 7);
        assert_eq!(cfg.provider.timeout_secs, 30);
        assert_eq!(cfg.server.port, 8000);
        assert!(cfg.server.allowed_origins.is_empty());
        assert!(!cfg.is_provider_configured());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [provider]
            api_key = "KEY"
            lang = "fr"
            "#,
        )
        .expect("valid toml");

        assert_eq!(cfg.provider_api_key(), Some("KEY"));
        assert_eq!(cfg.provider.lang, "fr");
        assert_eq!(cfg.provider.units, "metric");
        assert_eq!(cfg.server, ServerConfig::default());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_provider_api_key("   ".into());
        assert!(!cfg.is_provider_configured());
    }

    #[test]
    fn env_override_replaces_file_key() {
        let mut cfg = Config::default();
        cfg.set_provider_api_key("FROM_FILE".into());

        cfg.apply_env_override(Some("FROM_ENV".into()));
        assert_eq!(cfg.provider_api_key(), Some("FROM_ENV"));

        cfg.apply_env_override(Some(String::new()));
        assert_eq!(cfg.provider_api_key(), Some("FROM_ENV"));

        cfg.apply_env_override(None);
        assert_eq!(cfg.provider_api_key(), Some("FROM_ENV"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let mut cfg = Config::default();
        cfg.set_provider_api_key("SECRET_KEY".into());

        let printed = format!("{cfg:?}");
        assert!(!printed.contains("SECRET_KEY"), "{printed}");
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("api.openweathermap.org"));
    }

    #[test]
    fn load_from_reads_key_from_environment() {
        let path = scratch_path("env-override");

        // Only this test touches the variable.
        unsafe { std::env::set_var(API_KEY_ENV, "ENV_KEY") };
        let loaded = Config::load_from(&path);
        unsafe { std::env::remove_var(API_KEY_ENV) };

        let cfg = loaded.expect("defaults plus env key");
        assert_eq!(cfg.provider_api_key(), Some("ENV_KEY"));
        assert_eq!(cfg.provider.base_url, ProviderConfig::default().base_url);
        assert!(!path.exists());
    }

    #[test]
    fn explicit_path_wins() {
        let path = PathBuf::from("/tmp/custom/weather.toml");
        assert_eq!(Config::resolve_path(Some(&path)).unwrap(), path);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = Config::from_file(&scratch_path("missing")).expect("defaults");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_read_back() {
        let path = scratch_path("roundtrip");

        let mut cfg = Config::default();
        cfg.set_provider_api_key("OPEN_KEY".into());
        cfg.server.allowed_origins = vec!["http://localhost:5173".into()];
        cfg.save_to(&path).expect("save");

        let loaded = Config::from_file(&path).expect("load");
        assert_eq!(loaded, cfg);

        let _ = fs::remove_dir_all(path.parent().expect("parent dir"));
    }
}
