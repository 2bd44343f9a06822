//! Semantic checks on a parsed [`BridgeConfig`].

use crate::schema::BridgeConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "bridge.port"
    pub path: &'static str,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}: {}", self.severity, self.path, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Collapse error diagnostics into a single [`crate::Error::Invalid`].
    pub fn into_result(self) -> crate::Result<Vec<Diagnostic>> {
        if !self.has_errors() {
            return Ok(self.diagnostics);
        }
        let message = self
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(crate::Error::invalid(message))
    }
}

/// Check the settings the appservice needs before it can serve a homeserver.
#[must_use]
pub fn validate(config: &BridgeConfig) -> ValidationResult {
    let mut diagnostics = Vec::new();
    let bridge = &config.bridge;

    if bridge.domain.trim().is_empty() {
        diagnostics.push(Diagnostic {
            severity: Severity::Error,
            path: "bridge.domain",
            message: "homeserver domain is required".into(),
        });
    }

    if !(bridge.homeserver_url.starts_with("http://")
        || bridge.homeserver_url.starts_with("https://"))
    {
        diagnostics.push(Diagnostic {
            severity: Severity::Error,
            path: "bridge.homeserverUrl",
            message: format!(
                "expected an http(s) URL, got {:?}",
                bridge.homeserver_url
            ),
        });
    }

    if bridge.port == 0 {
        diagnostics.push(Diagnostic {
            severity: Severity::Error,
            path: "bridge.port",
            message: "port must be non-zero".into(),
        });
    }

    let is_loopback = matches!(
        bridge.bind_address.as_str(),
        "localhost" | "127.0.0.1" | "::1"
    );
    if !is_loopback {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            path: "bridge.bindAddress",
            message: format!(
                "appservice listens on {}, which is reachable beyond this host",
                bridge.bind_address
            ),
        });
    }

    if !config.presence.enabled {
        diagnostics.push(Diagnostic {
            severity: Severity::Info,
            path: "presence.enabled",
            message: "presence is disabled; puppets will always appear offline".into(),
        });
    }

    ValidationResult { diagnostics }
}
