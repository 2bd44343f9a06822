//! Config schema for the bridge's `config.yaml`.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub bridge: BridgeSection,
    pub presence: PresenceConfig,
    pub provisioning: ProvisioningConfig,
    pub logging: LoggingConfig,
}

impl BridgeConfig {
    /// URL the homeserver uses to reach the appservice.
    #[must_use]
    pub fn appservice_url(&self) -> String {
        format!("http://{}:{}", self.bridge.bind_address, self.bridge.port)
    }
}

/// Homeserver-facing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeSection {
    /// Address the appservice listens on. Defaults to "localhost".
    pub bind_address: String,
    /// Port the appservice listens on. Defaults to 6000.
    pub port: u16,
    /// Server name of the homeserver, e.g. "example.org".
    pub domain: String,
    /// Client-server API base URL of the homeserver.
    pub homeserver_url: String,
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            bind_address: "localhost".into(),
            port: 6000,
            domain: String::new(),
            homeserver_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    pub enabled: bool,
    /// Presence refresh interval in milliseconds.
    pub interval: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: 500,
        }
    }
}

/// Who may link new puppets.
///
/// Both lists hold MXID glob patterns (`*` wildcard). An empty whitelist
/// allows everyone who is not blacklisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    pub whitelist: Vec<String>,
    pub blacklist: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Console log level (trace, debug, info, warn, error).
    pub console: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console: "info".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.bridge.bind_address, "localhost");
        assert_eq!(cfg.bridge.port, 6000);
        assert!(cfg.presence.enabled);
        assert_eq!(cfg.presence.interval, 500);
        assert!(cfg.provisioning.whitelist.is_empty());
        assert_eq!(cfg.logging.console, "info");
    }

    #[test]
    fn camel_case_keys() {
        let yaml = r#"
bridge:
  bindAddress: 0.0.0.0
  port: 8434
  domain: example.org
  homeserverUrl: https://matrix.example.org
"#;
        let cfg: BridgeConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.bridge.bind_address, "0.0.0.0");
        assert_eq!(cfg.bridge.port, 8434);
        assert_eq!(cfg.bridge.homeserver_url, "https://matrix.example.org");
        // untouched sections keep their defaults
        assert!(cfg.presence.enabled);
    }

    #[test]
    fn appservice_url_uses_bind_address_and_port() {
        let mut cfg = BridgeConfig::default();
        cfg.bridge.bind_address = "127.0.0.1".into();
        cfg.bridge.port = 8434;
        assert_eq!(cfg.appservice_url(), "http://127.0.0.1:8434");
    }
}
