use std::{future::Future, sync::Arc};

use {
    mx_echo_config::{BridgeConfig, ProvisioningConfig},
    serde::{Deserialize, Serialize},
    tokio::{
        io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite},
        sync::mpsc,
        task::JoinHandle,
    },
    tracing::{debug, error, info, warn},
};

use crate::{
    Error, Result,
    outbound::{self, LineOutbound, OutboundEvent},
    plugin::{BridgeOutbound, PuppetPlugin},
    provisioning,
    types::{FileEvent, MessageEvent, PuppetId, RemoteRoom, RemoteUser, RetData},
};

/// Capacity of the outbound event queue.
const OUTBOUND_QUEUE: usize = 64;

const NOT_WHITELISTED: &str = "You must be whitelisted to use this bridge";

const NO_PUPPET_IDS: &str = "no puppet IDs left";

/// Events the bridge reads from its input stream, one JSON object per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeEvent {
    PuppetNew {
        puppet_id: PuppetId,
        #[serde(default)]
        data: serde_json::Value,
    },
    PuppetDelete {
        puppet_id: PuppetId,
    },
    Message {
        room: RemoteRoom,
        data: MessageEvent,
    },
    File {
        room: RemoteRoom,
        data: FileEvent,
    },
    CreateRoom {
        room: RemoteRoom,
    },
    GetDmRoomId {
        user: RemoteUser,
    },
    GetDesc {
        puppet_id: PuppetId,
        #[serde(default)]
        data: serde_json::Value,
    },
    /// A Matrix user asked to link a new puppet.
    Link {
        mxid: String,
        input: String,
    },
}

/// Drives a [`PuppetPlugin`] from a stream of [`BridgeEvent`]s.
pub struct PuppetBridge {
    config: BridgeConfig,
    outbound: LineOutbound,
    rx: mpsc::Receiver<OutboundEvent>,
}

impl PuppetBridge {
    pub fn new(config: BridgeConfig) -> Self {
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE);
        Self {
            config,
            outbound: LineOutbound::new(tx),
            rx,
        }
    }

    /// Handle the plugin uses to send content to Matrix.
    pub fn outbound(&self) -> Arc<dyn BridgeOutbound> {
        Arc::new(self.outbound.clone())
    }

    /// Feed events from `reader` to `plugin` until EOF or `shutdown`, writing
    /// every outbound event to `writer`.
    ///
    /// Returns once all queued output is written. Outbound handles obtained
    /// from [`Self::outbound`] and kept outside the plugin delay that.
    pub async fn run<R, W, S>(
        self,
        mut plugin: Box<dyn PuppetPlugin>,
        mut reader: R,
        writer: W,
        shutdown: S,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
        S: Future<Output = ()>,
    {
        let Self {
            config,
            outbound: sink,
            rx,
        } = self;
        let writer_task = tokio::spawn(outbound::write_lines(rx, writer));

        let protocol = plugin.protocol().clone();
        info!(
            protocol = %protocol.id,
            file = protocol.features.file,
            presence = protocol.features.presence && config.presence.enabled,
            presence_interval_ms = config.presence.interval,
            "puppet bridge started"
        );
        if let Err(e) = sink
            .emit(OutboundEvent::Ready {
                protocol,
                bot_header: plugin.bot_header_msg(),
            })
            .await
        {
            return Err(writer_failure(writer_task, e).await);
        }

        let mut dispatcher = Dispatcher {
            provisioning: config.provisioning,
            max_puppet_id: 0,
        };
        let mut buf = Vec::new();
        tokio::pin!(shutdown);

        loop {
            buf.clear();
            let read = tokio::select! {
                () = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                },
                read = reader.read_until(b'\n', &mut buf) => read?,
            };
            if read == 0 {
                debug!("input closed");
                break;
            }
            // Undecodable bytes are a malformed event like any other.
            let line = buf.trim_ascii();
            if line.is_empty() {
                continue;
            }

            let reply = match serde_json::from_slice::<BridgeEvent>(line) {
                Ok(event) => match dispatcher.dispatch(plugin.as_mut(), event).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        error!(error = %e, "plugin callback failed");
                        Some(OutboundEvent::Error {
                            message: e.to_string(),
                        })
                    },
                },
                Err(e) => {
                    warn!(error = %e, "malformed bridge event");
                    Some(OutboundEvent::Error {
                        message: format!("malformed event: {e}"),
                    })
                },
            };
            if let Some(reply) = reply
                && let Err(e) = sink.emit(reply).await
            {
                return Err(writer_failure(writer_task, e).await);
            }
        }

        // The writer finishes once every sender, including the plugin's, is gone.
        drop(plugin);
        drop(sink);
        writer_task
            .await
            .map_err(|e| Error::external("outbound writer task", e))?
    }
}

/// The writer's own error explains why the outbound queue closed; prefer it.
async fn writer_failure(writer_task: JoinHandle<Result<()>>, emit_error: Error) -> Error {
    match writer_task.await {
        Ok(Err(e)) => {
            error!(error = %e, "outbound writer failed");
            e
        },
        Ok(Ok(())) => emit_error,
        Err(e) => Error::external("outbound writer task", e),
    }
}

struct Dispatcher {
    provisioning: ProvisioningConfig,
    /// Highest puppet ID seen so far; linked puppets get the next one.
    max_puppet_id: PuppetId,
}

impl Dispatcher {
    async fn dispatch(
        &mut self,
        plugin: &mut dyn PuppetPlugin,
        event: BridgeEvent,
    ) -> Result<Option<OutboundEvent>> {
        match event {
            BridgeEvent::PuppetNew { puppet_id, data } => {
                debug!(puppet_id, "new puppet");
                self.max_puppet_id = self.max_puppet_id.max(puppet_id);
                plugin.new_puppet(puppet_id, data).await?;
                Ok(None)
            },
            BridgeEvent::PuppetDelete { puppet_id } => {
                debug!(puppet_id, "delete puppet");
                plugin.delete_puppet(puppet_id).await?;
                Ok(None)
            },
            BridgeEvent::Message { room, data } => {
                plugin.handle_message(&room, &data).await?;
                Ok(None)
            },
            BridgeEvent::File { room, data } => {
                if plugin.protocol().features.file {
                    plugin.handle_file(&room, &data).await?;
                } else {
                    debug!(
                        puppet_id = room.puppet_id,
                        "protocol does not accept files, dropping"
                    );
                }
                Ok(None)
            },
            BridgeEvent::CreateRoom { room } => Ok(Some(OutboundEvent::Room {
                room: plugin.create_room(&room).await?,
            })),
            BridgeEvent::GetDmRoomId { user } => Ok(Some(OutboundEvent::DmRoom {
                room_id: plugin.get_dm_room_id(&user).await?,
            })),
            BridgeEvent::GetDesc { puppet_id, data } => Ok(Some(OutboundEvent::Desc {
                puppet_id,
                desc: plugin.get_desc(puppet_id, &data).await?,
            })),
            BridgeEvent::Link { mxid, input } => self.link(plugin, &mxid, &input).await.map(Some),
        }
    }

    async fn link(
        &mut self,
        plugin: &mut dyn PuppetPlugin,
        mxid: &str,
        input: &str,
    ) -> Result<OutboundEvent> {
        if !provisioning::is_allowed(
            mxid,
            &self.provisioning.whitelist,
            &self.provisioning.blacklist,
        ) {
            warn!(mxid, "link denied by provisioning rules");
            return Ok(OutboundEvent::LinkResult {
                result: RetData::failure(NOT_WHITELISTED),
                puppet_id: None,
            });
        }

        let Some(puppet_id) = self.max_puppet_id.checked_add(1) else {
            warn!(mxid, max_puppet_id = self.max_puppet_id, "puppet IDs exhausted");
            return Ok(OutboundEvent::LinkResult {
                result: RetData::failure(NO_PUPPET_IDS),
                puppet_id: None,
            });
        };

        let result = plugin.get_data_from_str(input).await?;
        if !result.success {
            debug!(mxid, error = ?result.error, "link rejected by plugin");
            return Ok(OutboundEvent::LinkResult {
                result,
                puppet_id: None,
            });
        }

        plugin
            .new_puppet(puppet_id, result.data.clone().unwrap_or_default())
            .await?;
        self.max_puppet_id = puppet_id;
        info!(mxid, puppet_id, "linked new puppet");
        Ok(OutboundEvent::LinkResult {
            result,
            puppet_id: Some(puppet_id),
        })
    }
}
