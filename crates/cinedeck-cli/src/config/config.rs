//! `AppConfig` struct, TOML loading and validation.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use cinedeck_api::tmdb::{ApiSettings, AuthMode, DEFAULT_BASE_URL, DEFAULT_LANGUAGE};
use cinedeck_tui::carousel::{
    AUTOPLAY_INTERVAL, BREAKPOINT_WIDTH, CarouselSettings, DEFAULT_SLIDES_TO_SHOW,
    NARROW_SLIDES_TO_SHOW, TRANSITION_DURATION,
};
use cinedeck_tui::presenter::DEFAULT_IMAGE_BASE_URL;
use serde::{Deserialize, Serialize};

/// Environment variable overriding `tmdb.api_key`.
const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Environment variable overriding `tmdb.read_access_token`.
const READ_ACCESS_TOKEN_ENV: &str = "TMDB_READ_ACCESS_TOKEN";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default viewport units per terminal column.
const DEFAULT_CELL_WIDTH: u32 = 8;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB access settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Carousel behavior.
    #[serde(default)]
    pub carousel: CarouselConfig,
}

/// TMDB access configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TmdbConfig {
    /// v3 API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// v4 read access token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_access_token: Option<String>,
    /// Which credential to send.
    pub auth: AuthMode,
    /// Response language.
    pub language: String,
    /// API base URL.
    pub base_url: String,
    /// Image base URL.
    pub image_base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            read_access_token: None,
            auth: AuthMode::default(),
            language: String::from(DEFAULT_LANGUAGE),
            base_url: String::from(DEFAULT_BASE_URL),
            image_base_url: String::from(DEFAULT_IMAGE_BASE_URL),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl TmdbConfig {
    /// Applies `TMDB_API_KEY` / `TMDB_READ_ACCESS_TOKEN` from the process
    /// environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies credential overrides from `lookup`. Blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(key) = non_blank(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(token) = non_blank(READ_ACCESS_TOKEN_ENV) {
            self.read_access_token = Some(token);
        }
    }

    /// Settings injected into request building.
    #[must_use]
    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url.clone(),
            auth: self.auth,
            api_key: self.api_key.clone(),
            read_access_token: self.read_access_token.clone(),
        }
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Carousel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CarouselConfig {
    /// Slides shown at or above the breakpoint.
    pub slides_to_show: usize,
    /// Slides shown below the breakpoint.
    pub narrow_slides_to_show: usize,
    /// Breakpoint in viewport units.
    pub breakpoint: u32,
    /// Wrap around at both ends.
    pub infinite: bool,
    /// Start with autoplay on.
    pub autoplay: bool,
    /// Autoplay interval in milliseconds.
    pub autoplay_interval_ms: u64,
    /// Transition duration in milliseconds.
    pub speed_ms: u64,
    /// Viewport units per terminal column.
    pub cell_width: u32,
}

impl Default for CarouselConfig {
    #[allow(clippy::cast_possible_truncation)]
    fn default() -> Self {
        Self {
            slides_to_show: DEFAULT_SLIDES_TO_SHOW,
            narrow_slides_to_show: NARROW_SLIDES_TO_SHOW,
            breakpoint: BREAKPOINT_WIDTH,
            infinite: true,
            autoplay: true,
            autoplay_interval_ms: AUTOPLAY_INTERVAL.as_millis() as u64,
            speed_ms: TRANSITION_DURATION.as_millis() as u64,
            cell_width: DEFAULT_CELL_WIDTH,
        }
    }
}

impl CarouselConfig {
    /// Driver settings.
    #[must_use]
    pub const fn settings(&self) -> CarouselSettings {
        CarouselSettings {
            slides_to_show: self.slides_to_show,
            narrow_slides_to_show: self.narrow_slides_to_show,
            breakpoint: self.breakpoint,
            infinite: self.infinite,
            autoplay: self.autoplay,
            autoplay_interval: Duration::from_millis(self.autoplay_interval_ms),
            speed: Duration::from_millis(self.speed_ms),
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Rejects values that leave the browser unusable.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first zero timeout, interval or cell width.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.tmdb.timeout_secs > 0,
            "tmdb.timeout_secs must be greater than 0"
        );
        ensure!(
            self.carousel.autoplay_interval_ms > 0,
            "carousel.autoplay_interval_ms must be greater than 0"
        );
        ensure!(
            self.carousel.cell_width > 0,
            "carousel.cell_width must be greater than 0"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert!(config.tmdb.api_key.is_none());
        assert_eq!(config.tmdb.language, "ja-JP");
        assert_eq!(config.tmdb.auth, AuthMode::ApiKey);
        assert_eq!(config.carousel.settings(), CarouselSettings::default());
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        // Arrange
        let config = AppConfig {
            tmdb: TmdbConfig {
                read_access_token: Some(String::from("token")),
                auth: AuthMode::Bearer,
                ..TmdbConfig::default()
            },
            carousel: CarouselConfig {
                infinite: false,
                ..CarouselConfig::default()
            },
        };

        // Act
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        // Assert
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[tmdb]\nauth = \"bearer\"\n\n[carousel]\nautoplay_interval_ms = 5000\n",
        )
        .unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.tmdb.auth, AuthMode::Bearer);
        assert_eq!(config.tmdb.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            config.carousel.settings().autoplay_interval,
            Duration::from_millis(5000)
        );
        assert_eq!(config.carousel.slides_to_show, 3);
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tmdb\napi_key = ").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("failed to parse"));
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tmdb]\ntimeout_secs = 0\n").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        let err = result.unwrap_err();
        assert!(err.to_string().contains("invalid config"));
        assert!(format!("{err:#}").contains("tmdb.timeout_secs"));
    }

    #[test]
    fn test_validate_rejects_zero_autoplay_interval() {
        // Arrange
        let config = AppConfig {
            carousel: CarouselConfig {
                autoplay_interval_ms: 0,
                ..CarouselConfig::default()
            },
            ..AppConfig::default()
        };

        // Act
        let result = config.validate();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("carousel.autoplay_interval_ms")
        );
    }

    #[test]
    fn test_validate_accepts_defaults() {
        // Arrange & Act & Assert
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_env_overrides_file_credentials() {
        // Arrange
        let mut tmdb = TmdbConfig {
            api_key: Some(String::from("from-file")),
            read_access_token: Some(String::from("file-token")),
            ..TmdbConfig::default()
        };

        // Act
        tmdb.apply_overrides(|name| match name {
            "TMDB_API_KEY" => Some(String::from("from-env")),
            "TMDB_READ_ACCESS_TOKEN" => Some(String::from("  ")),
            _ => None,
        });

        // Assert
        assert_eq!(tmdb.api_key.as_deref(), Some("from-env"));
        assert_eq!(tmdb.read_access_token.as_deref(), Some("file-token"));
    }

    #[test]
    fn test_api_settings_carry_credentials() {
        // Arrange
        let tmdb = TmdbConfig {
            api_key: Some(String::from("k")),
            auth: AuthMode::ApiKey,
            base_url: String::from("http://localhost:9999/3/"),
            ..TmdbConfig::default()
        };

        // Act
        let settings = tmdb.api_settings();

        // Assert
        assert_eq!(settings.api_key.as_deref(), Some("k"));
        assert_eq!(settings.base_url, "http://localhost:9999/3/");
        assert_eq!(tmdb.timeout(), Duration::from_secs(10));
    }
}
