use std::sync::Arc;

use {
    async_trait::async_trait,
    mx_echo_bridge::{
        BridgeOutbound, FileEvent, MessageContent, MessageEvent, ProtocolInformation, PuppetId,
        PuppetPlugin, ReceiveParams, RemoteRoom, RemoteUser, Result, RetData,
    },
    tracing::{debug, info},
};

use crate::{protocol::protocol_information, state::PuppetTable};

const INVALID_NAME: &str = "Invalid name!";

/// Echo protocol plugin.
///
/// Every room is a DM with a ghost, and the ghost's name doubles as both the
/// remote room ID and the remote user ID.
pub struct EchoPlugin {
    protocol: ProtocolInformation,
    puppets: PuppetTable,
    outbound: Arc<dyn BridgeOutbound>,
}

impl EchoPlugin {
    pub fn new(outbound: Arc<dyn BridgeOutbound>) -> Self {
        Self {
            protocol: protocol_information(),
            puppets: PuppetTable::new(),
            outbound,
        }
    }

    pub fn puppets(&self) -> &PuppetTable {
        &self.puppets
    }

    /// Target for content sent as `ghostname` into its DM with the puppet.
    pub fn send_params(&self, puppet_id: PuppetId, ghostname: &str) -> ReceiveParams {
        debug!(puppet_id, ghostname, "creating send params");
        ReceiveParams {
            room: RemoteRoom {
                room_id: ghostname.to_string(),
                puppet_id,
                is_direct: Some(true),
            },
            user: RemoteUser {
                user_id: ghostname.to_string(),
                puppet_id,
                name: Some(ghostname.to_uppercase()),
            },
        }
    }

    fn is_known(&self, puppet_id: PuppetId) -> bool {
        let known = self.puppets.lookup(puppet_id).is_some();
        if !known {
            debug!(puppet_id, "ignoring event for unknown puppet");
        }
        known
    }
}

#[async_trait]
impl PuppetPlugin for EchoPlugin {
    fn protocol(&self) -> &ProtocolInformation {
        &self.protocol
    }

    async fn new_puppet(&mut self, puppet_id: PuppetId, data: serde_json::Value) -> Result<()> {
        info!(puppet_id, "starting echo puppet");
        self.puppets.register(puppet_id, data);
        Ok(())
    }

    async fn delete_puppet(&mut self, puppet_id: PuppetId) -> Result<()> {
        if self.puppets.unregister(puppet_id) {
            info!(puppet_id, "stopped echo puppet");
        }
        Ok(())
    }

    async fn handle_message(&self, room: &RemoteRoom, event: &MessageEvent) -> Result<()> {
        if !self.is_known(room.puppet_id) {
            return Ok(());
        }
        // Rooms are DMs keyed by the ghost's name, so the room ID is the ghost.
        let params = self.send_params(room.puppet_id, &room.room_id);
        self.outbound
            .send_message(&params, &MessageContent::from(event))
            .await
    }

    async fn handle_file(&self, room: &RemoteRoom, event: &FileEvent) -> Result<()> {
        if !self.is_known(room.puppet_id) {
            return Ok(());
        }
        let params = self.send_params(room.puppet_id, &room.room_id);
        self.outbound
            .send_file_detect(&params, &event.url, event.filename.as_deref())
            .await
    }

    async fn create_room(&self, room: &RemoteRoom) -> Result<Option<RemoteRoom>> {
        if !self.is_known(room.puppet_id) {
            return Ok(None);
        }
        Ok(Some(self.send_params(room.puppet_id, &room.room_id).room))
    }

    async fn get_dm_room_id(&self, user: &RemoteUser) -> Result<Option<String>> {
        if !self.is_known(user.puppet_id) {
            return Ok(None);
        }
        Ok(Some(user.user_id.clone()))
    }

    async fn get_desc(&self, _puppet_id: PuppetId, data: &serde_json::Value) -> Result<String> {
        let name = data
            .get("name")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown");
        Ok(format!("Echo puppet {name}"))
    }

    async fn get_data_from_str(&self, input: &str) -> Result<RetData> {
        if input.is_empty() || input == "invalid" {
            return Ok(RetData::failure(INVALID_NAME));
        }
        Ok(RetData::ok(serde_json::json!({ "name": input })))
    }

    fn bot_header_msg(&self) -> String {
        "Echo Puppet Bridge".into()
    }
}
