use std::path::Path;

use tracing::debug;

use crate::{Error, Result, env_subst::substitute_env, schema::BridgeConfig};

/// Load config from the given path, picking the format by extension.
///
/// Files without an extension are treated as YAML.
pub fn load_config(path: &Path) -> Result<BridgeConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&substitute_env(&raw), path)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Parse already-substituted config text. `path` only selects the format and
/// labels errors.
pub fn parse_config(raw: &str, path: &Path) -> Result<BridgeConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    match ext {
        "yaml" | "yml" => serde_yaml::from_str(raw).map_err(|e| Error::parse(path, e)),
        "json" => serde_json::from_str(raw).map_err(|e| Error::parse(path, e)),
        "toml" => toml::from_str(raw).map_err(|e| Error::parse(path, e)),
        _ => Err(Error::UnsupportedFormat {
            extension: ext.to_string(),
        }),
    }
}
