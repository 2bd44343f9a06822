use async_trait::async_trait;

use crate::{
    Result,
    types::{
        FileEvent, MessageContent, MessageEvent, ProtocolInformation, PuppetId, ReceiveParams,
        RemoteRoom, RemoteUser, RetData,
    },
};

/// Core protocol plugin trait. Each remote protocol implements this.
///
/// Lifecycle calls take `&mut self`: the bridge awaits every callback before
/// dispatching the next event, so plugins can keep plain owned state.
#[async_trait]
pub trait PuppetPlugin: Send + Sync {
    /// Protocol metadata and declared features.
    fn protocol(&self) -> &ProtocolInformation;

    /// A puppet was created (or re-created on startup) with its stored data.
    async fn new_puppet(&mut self, puppet_id: PuppetId, data: serde_json::Value) -> Result<()>;

    /// A puppet was removed.
    async fn delete_puppet(&mut self, puppet_id: PuppetId) -> Result<()>;

    /// A text message arrived from Matrix and should go to the remote side.
    async fn handle_message(&self, room: &RemoteRoom, event: &MessageEvent) -> Result<()>;

    /// A file arrived from Matrix. Only dispatched when the protocol declares
    /// the `file` feature.
    async fn handle_file(&self, _room: &RemoteRoom, _event: &FileEvent) -> Result<()> {
        Ok(())
    }

    /// Validate a room the bridge wants to create. `None` means the room does
    /// not exist on the remote side.
    async fn create_room(&self, _room: &RemoteRoom) -> Result<Option<RemoteRoom>> {
        Ok(None)
    }

    /// Resolve the DM room for a ghost someone invited on Matrix.
    async fn get_dm_room_id(&self, _user: &RemoteUser) -> Result<Option<String>> {
        Ok(None)
    }

    /// Displayable name for a puppet.
    async fn get_desc(&self, puppet_id: PuppetId, data: &serde_json::Value) -> Result<String>;

    /// Turn a user-supplied link string into puppet data.
    async fn get_data_from_str(&self, _input: &str) -> Result<RetData> {
        Ok(RetData::failure("Linking not supported"))
    }

    /// Default display name of the bridge bot.
    fn bot_header_msg(&self) -> String {
        format!("{} Puppet Bridge", self.protocol().displayname)
    }
}

/// Send content to Matrix on behalf of a ghost.
#[async_trait]
pub trait BridgeOutbound: Send + Sync {
    async fn send_message(&self, params: &ReceiveParams, content: &MessageContent) -> Result<()>;

    /// Send a file by URL, letting the bridge pick the Matrix message type.
    async fn send_file_detect(
        &self,
        params: &ReceiveParams,
        url: &str,
        filename: Option<&str>,
    ) -> Result<()>;
}
