use mx_echo_bridge::{ProtocolFeatures, ProtocolInformation, RegistrationOptions};

/// Localpart prefix reserved for echo ghosts and the bridge bot.
pub const PREFIX: &str = "_echopuppet_";

/// Appservice ID on the homeserver.
pub const APPSERVICE_ID: &str = "echo-puppet";

/// What the echo protocol supports and how it presents itself.
pub fn protocol_information() -> ProtocolInformation {
    ProtocolInformation {
        id: "echo".into(),
        displayname: "Echo".into(),
        external_url: Some("https://github.com/Sorunome/mx-puppet-echo".into()),
        features: ProtocolFeatures {
            file: true,
            presence: true,
        },
    }
}

/// Registration options for an appservice reachable at `url`.
pub fn registration_options(url: impl Into<String>) -> RegistrationOptions {
    RegistrationOptions {
        id: APPSERVICE_ID.into(),
        prefix: PREFIX.into(),
        url: url.into(),
    }
}
