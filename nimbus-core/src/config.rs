//! Centralized configuration for Nimbus.
//!
//! Defaults match the stock compute API endpoint; every field can be
//! overridden from the environment or the command line.

/// Central configuration for all Nimbus components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NimbusConfig {
    pub server: ServerConfig,
    pub extensions: ExtensionsConfig,
}

/// HTTP listener and URL layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind to
    pub host: String,
    /// Port to bind to (0 picks an ephemeral port)
    pub port: u16,
    /// Version segment every route is mounted under, without slashes
    pub api_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8774,
            api_prefix: "v2".to_string(),
        }
    }
}

impl ServerConfig {
    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Selects which registered extensions are loaded.
///
/// `enabled = None` loads everything not listed in `disabled`. When `enabled`
/// is set, only those aliases load, and `disabled` still wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionsConfig {
    pub enabled: Option<Vec<String>>,
    pub disabled: Vec<String>,
}

impl ExtensionsConfig {
    /// Returns true if the extension with `alias` should be loaded.
    pub fn is_enabled(&self, alias: &str) -> bool {
        if self.disabled.iter().any(|a| a == alias) {
            return false;
        }
        match &self.enabled {
            Some(enabled) => enabled.iter().any(|a| a == alias),
            None => true,
        }
    }

    /// Adds `alias` to the disabled list unless already present.
    pub fn disable(&mut self, alias: impl Into<String>) {
        let alias = alias.into();
        if !self.disabled.contains(&alias) {
            self.disabled.push(alias);
        }
    }
}

fn parse_alias_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|alias| !alias.is_empty())
        .map(str::to_string)
        .collect()
}

impl NimbusConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("NIMBUS_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("NIMBUS_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.server.port = port;
            }
        }

        if let Ok(prefix) = std::env::var("NIMBUS_API_PREFIX") {
            let prefix = prefix.trim_matches('/');
            if !prefix.is_empty() {
                config.server.api_prefix = prefix.to_string();
            }
        }

        if let Ok(enabled) = std::env::var("NIMBUS_ENABLED_EXTENSIONS") {
            config.extensions.enabled = Some(parse_alias_list(&enabled));
        }

        if let Ok(disabled) = std::env::var("NIMBUS_DISABLED_EXTENSIONS") {
            config.extensions.disabled = parse_alias_list(&disabled);
        }

        config
    }

    /// Creates a configuration for tests: loopback, ephemeral port.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig {
                port: 0,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
