use serde::{Deserialize, Serialize};

/// Identifier the bridge assigns to each linked puppet.
pub type PuppetId = i64;

/// A room on the remote side, scoped to one puppet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRoom {
    pub room_id: String,
    pub puppet_id: PuppetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_direct: Option<bool>,
}

/// A user on the remote side, scoped to one puppet. Shows up on Matrix as a
/// ghost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    pub user_id: String,
    pub puppet_id: PuppetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Where an outbound message lands and who it appears to come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveParams {
    pub room: RemoteRoom,
    pub user: RemoteUser,
}

/// A text message received from Matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_body: Option<String>,
}

/// A file received from Matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEvent {
    /// HTTP URL the file can be downloaded from.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
}

/// Message content sent to Matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_body: Option<String>,
}

impl From<&MessageEvent> for MessageContent {
    fn from(event: &MessageEvent) -> Self {
        Self {
            body: event.body.clone(),
            formatted_body: event.formatted_body.clone(),
        }
    }
}

/// Outcome of turning a user-supplied link string into puppet data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetData {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Data to associate with the new puppet, only set on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RetData {
    #[must_use]
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            data: None,
        }
    }
}

/// Optional capabilities a protocol plugin declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolFeatures {
    /// Plugin accepts files from Matrix.
    pub file: bool,
    /// Plugin reports remote presence.
    pub presence: bool,
}

/// Static metadata describing a protocol plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolInformation {
    /// Internal protocol ID, all lowercase.
    pub id: String,
    /// Human-readable protocol name.
    pub displayname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(default)]
    pub features: ProtocolFeatures,
}
