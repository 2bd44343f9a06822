//! Appservice registration file the homeserver loads to route events to the
//! bridge.

use std::path::Path;

use {
    rand::{Rng, distr::Alphanumeric},
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
    tracing::info,
};

use crate::{Result, types::ProtocolInformation};

const TOKEN_LEN: usize = 64;

/// Plugin-specific inputs to [`Registration::generate`].
#[derive(Debug, Clone)]
pub struct RegistrationOptions {
    /// Appservice ID, unique on the homeserver.
    pub id: String,
    /// Localpart prefix reserved for ghosts and the bot, e.g. "_echopuppet_".
    pub prefix: String,
    /// URL the homeserver pushes transactions to.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceEntry {
    pub exclusive: bool,
    pub regex: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespaces {
    pub users: Vec<NamespaceEntry>,
    pub aliases: Vec<NamespaceEntry>,
    pub rooms: Vec<NamespaceEntry>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: String,
    #[serde(serialize_with = "serialize_secret")]
    pub hs_token: Secret<String>,
    #[serde(serialize_with = "serialize_secret")]
    pub as_token: Secret<String>,
    pub url: String,
    pub sender_localpart: String,
    pub rate_limited: bool,
    pub namespaces: Namespaces,
    #[serde(default)]
    pub protocols: Vec<String>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("hs_token", &"[REDACTED]")
            .field("as_token", &"[REDACTED]")
            .field("url", &self.url)
            .field("sender_localpart", &self.sender_localpart)
            .finish_non_exhaustive()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn generate_token() -> Secret<String> {
    let token: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect();
    Secret::new(token)
}

impl Registration {
    /// Build a registration with fresh tokens that reserves every user and
    /// alias starting with the plugin's prefix.
    #[must_use]
    pub fn generate(opts: &RegistrationOptions, protocol: &ProtocolInformation) -> Self {
        let exclusive = |regex: String| NamespaceEntry {
            exclusive: true,
            regex,
        };
        Self {
            id: opts.id.clone(),
            hs_token: generate_token(),
            as_token: generate_token(),
            url: opts.url.clone(),
            sender_localpart: format!("{}bot", opts.prefix),
            rate_limited: false,
            namespaces: Namespaces {
                users: vec![exclusive(format!("@{}.*", opts.prefix))],
                aliases: vec![exclusive(format!("#{}.*", opts.prefix))],
                rooms: Vec::new(),
            },
            protocols: vec![protocol.id.clone()],
        }
    }

    /// Write the registration as YAML, creating parent directories if needed.
    pub fn write_yaml(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        info!(path = %path.display(), id = %self.id, "wrote registration file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protocol() -> ProtocolInformation {
        ProtocolInformation {
            id: "echo".into(),
            displayname: "Echo".into(),
            external_url: None,
            features: Default::default(),
        }
    }

    fn options() -> RegistrationOptions {
        RegistrationOptions {
            id: "echo-puppet".into(),
            prefix: "_echopuppet_".into(),
            url: "http://localhost:6000".into(),
        }
    }

    #[test]
    fn generate_reserves_prefix() {
        let reg = Registration::generate(&options(), &protocol());
        assert_eq!(reg.id, "echo-puppet");
        assert_eq!(reg.sender_localpart, "_echopuppet_bot");
        assert!(!reg.rate_limited);
        assert_eq!(reg.namespaces.users[0].regex, "@_echopuppet_.*");
        assert!(reg.namespaces.users[0].exclusive);
        assert_eq!(reg.namespaces.aliases[0].regex, "#_echopuppet_.*");
        assert!(reg.namespaces.rooms.is_empty());
        assert_eq!(reg.protocols, vec!["echo"]);
    }

    #[test]
    fn tokens_are_random_and_distinct() {
        let a = Registration::generate(&options(), &protocol());
        let b = Registration::generate(&options(), &protocol());
        assert_eq!(a.as_token.expose_secret().len(), TOKEN_LEN);
        assert!(
            a.as_token
                .expose_secret()
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
        );
        assert_ne!(a.as_token.expose_secret(), a.hs_token.expose_secret());
        assert_ne!(a.as_token.expose_secret(), b.as_token.expose_secret());
    }

    #[test]
    fn debug_redacts_tokens() {
        let reg = Registration::generate(&options(), &protocol());
        let debug = format!("{reg:?}");
        assert!(!debug.contains(reg.as_token.expose_secret().as_str()));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn write_yaml_creates_parents_and_keeps_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("echo-registration.yaml");
        let reg = Registration::generate(&options(), &protocol());
        reg.write_yaml(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let back: Registration = serde_yaml::from_str(&raw).unwrap();
        assert_eq!(back.url, "http://localhost:6000");
        assert_eq!(back.namespaces, reg.namespaces);
        assert_eq!(back.as_token.expose_secret(), reg.as_token.expose_secret());
        assert_eq!(back.hs_token.expose_secret(), reg.hs_token.expose_secret());
    }
}
