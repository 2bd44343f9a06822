use {
    async_trait::async_trait,
    serde::Serialize,
    tokio::{
        io::{AsyncWrite, AsyncWriteExt},
        sync::mpsc,
    },
    tracing::debug,
};

use crate::{
    Error, Result,
    media::FileKind,
    plugin::BridgeOutbound,
    types::{MessageContent, ProtocolInformation, PuppetId, ReceiveParams, RemoteRoom, RetData},
};

/// Everything the bridge writes to its output stream, one JSON object per
/// line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// Emitted once before any other event.
    Ready {
        protocol: ProtocolInformation,
        bot_header: String,
    },
    Message {
        params: ReceiveParams,
        content: MessageContent,
    },
    File {
        params: ReceiveParams,
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
        kind: FileKind,
        msgtype: &'static str,
    },
    /// Answer to a `create_room` request.
    Room { room: Option<RemoteRoom> },
    /// Answer to a `get_dm_room_id` request.
    DmRoom { room_id: Option<String> },
    /// Answer to a `get_desc` request.
    Desc { puppet_id: PuppetId, desc: String },
    /// Answer to a `link` request. `puppet_id` is set when a puppet was created.
    LinkResult {
        #[serde(flatten)]
        result: RetData,
        #[serde(skip_serializing_if = "Option::is_none")]
        puppet_id: Option<PuppetId>,
    },
    Error { message: String },
}

/// [`BridgeOutbound`] that queues [`OutboundEvent`]s on a channel.
#[derive(Debug, Clone)]
pub struct LineOutbound {
    tx: mpsc::Sender<OutboundEvent>,
}

impl LineOutbound {
    pub fn new(tx: mpsc::Sender<OutboundEvent>) -> Self {
        Self { tx }
    }

    pub async fn emit(&self, event: OutboundEvent) -> Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| Error::unavailable("outbound channel closed"))
    }
}

#[async_trait]
impl BridgeOutbound for LineOutbound {
    async fn send_message(&self, params: &ReceiveParams, content: &MessageContent) -> Result<()> {
        debug!(
            puppet_id = params.room.puppet_id,
            room_id = %params.room.room_id,
            "sending message"
        );
        self.emit(OutboundEvent::Message {
            params: params.clone(),
            content: content.clone(),
        })
        .await
    }

    async fn send_file_detect(
        &self,
        params: &ReceiveParams,
        url: &str,
        filename: Option<&str>,
    ) -> Result<()> {
        let kind = FileKind::detect(filename, url);
        debug!(
            puppet_id = params.room.puppet_id,
            room_id = %params.room.room_id,
            ?kind,
            "sending file"
        );
        self.emit(OutboundEvent::File {
            params: params.clone(),
            url: url.to_string(),
            filename: filename.map(str::to_string),
            kind,
            msgtype: kind.msgtype(),
        })
        .await
    }
}

/// Drain `rx` into `writer` as newline-delimited JSON until every sender is
/// dropped.
pub async fn write_lines<W>(mut rx: mpsc::Receiver<OutboundEvent>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(event) = rx.recv().await {
        let mut line = serde_json::to_vec(&event)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ReceiveParams {
        ReceiveParams {
            room: RemoteRoom {
                room_id: "alice".into(),
                puppet_id: 3,
                is_direct: Some(true),
            },
            user: crate::types::RemoteUser {
                user_id: "alice".into(),
                puppet_id: 3,
                name: Some("ALICE".into()),
            },
        }
    }

    #[tokio::test]
    async fn send_file_detect_tags_kind() {
        let (tx, mut rx) = mpsc::channel(4);
        let outbound = LineOutbound::new(tx);
        outbound
            .send_file_detect(&params(), "https://x/dl/abc", Some("cat.gif"))
            .await
            .unwrap();

        match rx.recv().await.unwrap() {
            OutboundEvent::File {
                kind,
                msgtype,
                filename,
                ..
            } => {
                assert_eq!(kind, FileKind::Image);
                assert_eq!(msgtype, "m.image");
                assert_eq!(filename.as_deref(), Some("cat.gif"));
            },
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_after_receiver_dropped_is_unavailable() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let outbound = LineOutbound::new(tx);
        let content = MessageContent {
            body: "hi".into(),
            formatted_body: None,
        };
        let err = outbound.send_message(&params(), &content).await.unwrap_err();
        assert!(matches!(err, Error::Unavailable { .. }));
    }

    #[tokio::test]
    async fn write_lines_emits_one_json_object_per_line() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(OutboundEvent::DmRoom {
            room_id: Some("alice".into()),
        })
        .await
        .unwrap();
        tx.send(OutboundEvent::LinkResult {
            result: RetData::failure("Invalid name!"),
            puppet_id: None,
        })
        .await
        .unwrap();
        drop(tx);

        let mut out = Vec::new();
        write_lines(rx, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(
            lines,
            vec![
                serde_json::json!({"type": "dm_room", "room_id": "alice"}),
                serde_json::json!({"type": "link_result", "success": false, "error": "Invalid name!"}),
            ]
        );
    }
}
