//! Configuration management for ytdoc

use crate::error::ConfigError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default gateway of the residential proxy service
pub const DEFAULT_RESIDENTIAL_PROXY_URL: &str = "http://gate.decodo.com:10001";

/// Environment names that predate the `YTDOC_` prefix, with the key each one sets.
/// Values are taken verbatim so credentials like `007` keep their text.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("PROXY_USERNAME", "proxy.residential.username"),
    ("PROXY_PASSWORD", "proxy.residential.password"),
    ("PROXY_URL", "proxy.residential.url"),
    ("YTA_WEBSHARE_USERNAME", "proxy.rotating.username"),
    ("YTA_WEBSHARE_PASSWORD", "proxy.rotating.password"),
    ("YTA_WEBSHARE_LOCATIONS", "proxy.rotating.locations"),
    ("YTA_HTTP_PROXY", "proxy.generic.http_url"),
    ("YTA_HTTPS_PROXY", "proxy.generic.https_url"),
    ("HTTP_PROXY", "proxy.generic.system_http_url"),
    ("HTTPS_PROXY", "proxy.generic.system_https_url"),
    ("YOUTUBE_API_KEY", "youtube.api_key"),
];

/// Residential tier enable flag, the one legacy name parsed as a value
const USE_PROXY_ENV: &str = "USE_PROXY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub extract: ExtractConfig,
    pub proxy: ProxySettings,
    pub youtube: YoutubeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (auto-detected if not set)
    pub yt_dlp: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Preferred transcript language (ISO 639-1)
    pub language: String,
    /// Transcript character limit, 0 or less disables truncation
    pub max_transcript_length: i64,
    /// Upper bound on returned comments
    pub max_comments: usize,
    /// Per-request network timeout in seconds
    pub socket_timeout: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxySettings {
    pub residential: ResidentialProxySettings,
    pub rotating: RotatingProxySettings,
    pub generic: GenericProxySettings,
}

/// Tier 1: residential gateway behind an explicit enable flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidentialProxySettings {
    #[serde(deserialize_with = "de::flag")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub password: Option<String>,
    /// Gateway endpoint, with or without scheme
    #[serde(default, deserialize_with = "de::opt_string")]
    pub url: Option<String>,
}

/// Tier 2: rotating residential pool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RotatingProxySettings {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub password: Option<String>,
    /// Comma separated country codes
    #[serde(default, deserialize_with = "de::opt_string")]
    pub locations: Option<String>,
}

/// Tier 3: plain HTTP/HTTPS proxies, ytdoc-specific values first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenericProxySettings {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    /// Process-wide `HTTP_PROXY`
    pub system_http_url: Option<String>,
    /// Process-wide `HTTPS_PROXY`
    pub system_https_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YoutubeConfig {
    /// YouTube Data API key, required for comments
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig { yt_dlp: None },
            extract: ExtractConfig {
                language: "en".to_string(),
                max_transcript_length: 10_000,
                max_comments: 20,
                socket_timeout: 30,
            },
            proxy: ProxySettings::default(),
            youtube: YoutubeConfig::default(),
        }
    }
}

impl Default for ResidentialProxySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            username: None,
            password: None,
            url: None,
        }
    }
}

impl ResidentialProxySettings {
    /// Configured gateway, or the service default when unset or blank
    pub fn endpoint(&self) -> &str {
        non_empty(&self.url).unwrap_or(DEFAULT_RESIDENTIAL_PROXY_URL)
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::figment(config_file)
            .extract()
            .map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// Layered sources, later entries win
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Load from default config directory
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
            }
        }

        // Load from specified config file
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        for (name, key) in LEGACY_ENV {
            if let Ok(value) = std::env::var(name) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }

        figment
            .merge(
                Env::raw()
                    .only(&[USE_PROXY_ENV])
                    .map(|_| "proxy.residential.enabled".into()),
            )
            .merge(Env::prefixed("YTDOC_").split("__"))
    }

    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ytdoc/config.toml"))
    }

    /// Get yt-dlp path, auto-detecting if not configured
    pub fn yt_dlp_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.yt_dlp {
            Ok(path.clone())
        } else {
            which::which("yt-dlp")
                .map_err(|_| ConfigError::InvalidValue("yt-dlp not found in PATH".to_string()))
        }
    }

    pub fn socket_timeout(&self) -> Duration {
        Duration::from_secs(self.extract.socket_timeout)
    }

    /// API key, treating an empty value as unset
    pub fn api_key(&self) -> Option<&str> {
        non_empty(&self.youtube.api_key)
    }

    /// Copy safe to print, secrets replaced by `***`
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        let mask = |value: &mut Option<String>| {
            if value.is_some() {
                *value = Some("***".to_string());
            }
        };
        mask(&mut config.proxy.residential.password);
        mask(&mut config.proxy.rotating.password);
        mask(&mut config.youtube.api_key);
        for url in [
            &mut config.proxy.generic.http_url,
            &mut config.proxy.generic.https_url,
            &mut config.proxy.generic.system_http_url,
            &mut config.proxy.generic.system_https_url,
        ] {
            if let Some(value) = url.as_mut() {
                *value = ytdoc_providers::mask_url(value);
            }
        }
        config
    }
}

/// Trimmed value, `None` when unset or blank
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Lenient readers for values that arrive from the environment
mod de {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Float(f64),
        Str(String),
    }

    /// `true` in any letter case enables the flag
    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => b,
            Raw::Str(s) => s.trim().eq_ignore_ascii_case("true"),
            Raw::Int(_) | Raw::Float(_) => false,
        })
    }

    /// Numeric credentials stay strings
    pub fn opt_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => None,
            Some(Raw::Str(s)) => Some(s),
            Some(Raw::Int(i)) => Some(i.to_string()),
            Some(Raw::Float(f)) => Some(f.to_string()),
            Some(Raw::Bool(b)) => Some(b.to_string()),
        })
    }
}
