//! Proxy resolution from layered settings
//!
//! Tiers are tried in priority order and the first one that is configured
//! and constructs cleanly wins:
//! 1. Residential gateway (explicit enable flag)
//! 2. Rotating residential pool (credentials)
//! 3. Generic HTTP/HTTPS proxy URLs
//! 4. Direct connection
//!
//! A tier that is configured but fails to construct is logged and skipped.

use crate::config::{non_empty, ProxySettings};
use tracing::{debug, error};
use ytdoc_providers::{ProviderError, ProxyConfig};

/// One configuration tier: `None` when not configured
type ProxySource = fn(&ProxySettings) -> Option<Result<ProxyConfig, ProviderError>>;

const TIERS: &[(&str, ProxySource)] = &[
    ("residential", residential_proxy),
    ("rotating", rotating_proxy),
    ("generic", generic_proxy),
];

/// Resolve the effective proxy, never failing
pub fn resolve_proxy(settings: &ProxySettings) -> ProxyConfig {
    for (tier, source) in TIERS {
        match source(settings) {
            Some(Ok(config)) => {
                debug!("Using {} proxy tier: {}", tier, config);
                return config;
            }
            Some(Err(e)) => error!("Failed to build {} proxy config: {}", tier, e),
            None => {}
        }
    }

    debug!("No proxy configuration - using direct connection");
    ProxyConfig::None
}

/// Name of the tier that would be attempted first, for status output
pub fn configured_tier(settings: &ProxySettings) -> Option<&'static str> {
    TIERS
        .iter()
        .find(|(_, source)| source(settings).is_some())
        .map(|(tier, _)| *tier)
}

fn residential_proxy(settings: &ProxySettings) -> Option<Result<ProxyConfig, ProviderError>> {
    let residential = &settings.residential;
    if !residential.enabled {
        return None;
    }

    let endpoint = residential.endpoint().trim();
    let config = match (non_empty(&residential.username), non_empty(&residential.password)) {
        (Some(username), Some(password)) => ProxyConfig::CredentialedProxy {
            username: username.to_string(),
            password: password.to_string(),
            endpoint: strip_scheme(endpoint).to_string(),
        },
        _ => {
            let url = with_scheme(endpoint);
            ProxyConfig::HttpProxy {
                http_url: Some(url.clone()),
                https_url: Some(url),
            }
        }
    };

    Some(config.validate().map(|_| config))
}

fn rotating_proxy(settings: &ProxySettings) -> Option<Result<ProxyConfig, ProviderError>> {
    let rotating = &settings.rotating;
    let username = non_empty(&rotating.username)?;
    let password = non_empty(&rotating.password)?;

    let config = ProxyConfig::LocationFilteredProxy {
        username: username.to_string(),
        password: password.to_string(),
        allowed_locations: parse_locations(rotating.locations.as_deref()),
    };

    Some(config.validate().map(|_| config))
}

fn generic_proxy(settings: &ProxySettings) -> Option<Result<ProxyConfig, ProviderError>> {
    let generic = &settings.generic;
    let http_url = non_empty(&generic.http_url).or_else(|| non_empty(&generic.system_http_url));
    let https_url = non_empty(&generic.https_url).or_else(|| non_empty(&generic.system_https_url));

    if http_url.is_none() && https_url.is_none() {
        return None;
    }

    let config = ProxyConfig::HttpProxy {
        http_url: http_url.map(str::to_string),
        https_url: https_url.map(str::to_string),
    };

    Some(config.validate().map(|_| config))
}

/// Comma separated list, trimmed, blanks dropped
pub fn parse_locations(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|loc| !loc.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .unwrap_or(url)
}

fn with_scheme(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_RESIDENTIAL_PROXY_URL;

    fn residential(settings: &mut ProxySettings) {
        settings.residential.enabled = true;
        settings.residential.username = Some("resi".into());
        settings.residential.password = Some("pw".into());
    }

    fn rotating(settings: &mut ProxySettings) {
        settings.rotating.username = Some("pool".into());
        settings.rotating.password = Some("pw2".into());
    }

    #[test]
    fn test_nothing_configured_is_direct() {
        let settings = ProxySettings::default();
        assert_eq!(resolve_proxy(&settings), ProxyConfig::None);
        assert_eq!(configured_tier(&settings), None);
    }

    #[test]
    fn test_residential_wins_over_rotating() {
        let mut settings = ProxySettings::default();
        residential(&mut settings);
        rotating(&mut settings);

        assert_eq!(
            resolve_proxy(&settings),
            ProxyConfig::CredentialedProxy {
                username: "resi".into(),
                password: "pw".into(),
                endpoint: "gate.decodo.com:10001".into(),
            }
        );
        assert_eq!(configured_tier(&settings), Some("residential"));
    }

    #[test]
    fn test_residential_strips_https_scheme() {
        let mut settings = ProxySettings::default();
        residential(&mut settings);
        settings.residential.url = Some("https://eu.gate.example:7000".into());

        assert_eq!(
            resolve_proxy(&settings).http_url().as_deref(),
            Some("http://resi:pw@eu.gate.example:7000")
        );
    }

    #[test]
    fn test_residential_without_credentials_uses_bare_endpoint() {
        let mut settings = ProxySettings::default();
        settings.residential.enabled = true;
        settings.residential.password = Some("pw".into());

        assert_eq!(
            resolve_proxy(&settings),
            ProxyConfig::HttpProxy {
                http_url: Some(DEFAULT_RESIDENTIAL_PROXY_URL.into()),
                https_url: Some(DEFAULT_RESIDENTIAL_PROXY_URL.into()),
            }
        );
    }

    #[test]
    fn test_blank_residential_url_uses_default_gateway() {
        let mut settings = ProxySettings::default();
        residential(&mut settings);
        settings.residential.url = Some("  ".into());

        assert_eq!(
            resolve_proxy(&settings).http_url().as_deref(),
            Some("http://resi:pw@gate.decodo.com:10001")
        );
    }

    #[test]
    fn test_disabled_residential_is_ignored() {
        let mut settings = ProxySettings::default();
        residential(&mut settings);
        settings.residential.enabled = false;
        rotating(&mut settings);

        assert!(matches!(
            resolve_proxy(&settings),
            ProxyConfig::LocationFilteredProxy { ref allowed_locations, .. } if allowed_locations.is_empty()
        ));
    }

    #[test]
    fn test_rotating_locations() {
        let mut settings = ProxySettings::default();
        rotating(&mut settings);
        settings.rotating.locations = Some(" de, ,us ,".into());

        match resolve_proxy(&settings) {
            ProxyConfig::LocationFilteredProxy {
                allowed_locations, ..
            } => assert_eq!(allowed_locations, vec!["de", "us"]),
            other => panic!("unexpected proxy: {:?}", other),
        }
        assert!(parse_locations(Some("")).is_empty());
        assert!(parse_locations(None).is_empty());
    }

    #[test]
    fn test_rotating_needs_both_credentials() {
        let mut settings = ProxySettings::default();
        settings.rotating.username = Some("pool".into());
        settings.rotating.password = Some("  ".into());
        assert_eq!(resolve_proxy(&settings), ProxyConfig::None);
    }

    #[test]
    fn test_generic_prefers_specific_over_system() {
        let mut settings = ProxySettings::default();
        settings.generic.http_url = Some("http://app:1".into());
        settings.generic.system_http_url = Some("http://sys:1".into());
        settings.generic.system_https_url = Some("http://sys:2".into());

        assert_eq!(
            resolve_proxy(&settings),
            ProxyConfig::HttpProxy {
                http_url: Some("http://app:1".into()),
                https_url: Some("http://sys:2".into()),
            }
        );
    }

    #[test]
    fn test_broken_tier_falls_through() {
        let mut settings = ProxySettings::default();
        residential(&mut settings);
        settings.residential.url = Some("gate.example:99999".into());
        settings.generic.https_url = Some("http://fallback:3128".into());

        assert_eq!(
            resolve_proxy(&settings),
            ProxyConfig::HttpProxy {
                http_url: None,
                https_url: Some("http://fallback:3128".into()),
            }
        );
    }

    #[test]
    fn test_all_tiers_broken_is_direct() {
        let mut settings = ProxySettings::default();
        settings.generic.http_url = Some("definitely not a url".into());
        assert_eq!(resolve_proxy(&settings), ProxyConfig::None);
    }
}
