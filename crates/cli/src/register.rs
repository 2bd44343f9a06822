use std::path::Path;

use {
    anyhow::{Context, Result},
    mx_echo_bridge::Registration,
    mx_echo_config::BridgeConfig,
    mx_echo_plugin::{protocol_information, registration_options},
};

/// Write the appservice registration for `config` to `path`.
pub fn write_registration(config: &BridgeConfig, path: &Path) -> Result<()> {
    let opts = registration_options(config.appservice_url());
    Registration::generate(&opts, &protocol_information())
        .write_yaml(path)
        .with_context(|| format!("couldn't write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_echo_registration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("echo-registration.yaml");
        let mut config = BridgeConfig::default();
        config.bridge.port = 8434;

        write_registration(&config, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("id: echo-puppet"));
        assert!(raw.contains("url: http://localhost:8434"));
        assert!(raw.contains("sender_localpart: _echopuppet_bot"));
        assert!(raw.contains("@_echopuppet_.*"));
    }

    #[test]
    fn unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should go.
        let err = write_registration(&BridgeConfig::default(), dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("couldn't write"));
    }
}
