//! Puppet bridge seam.
//!
//! A protocol plugin implements [`PuppetPlugin`] and talks back to Matrix
//! through a [`BridgeOutbound`]. [`PuppetBridge`] owns the plugin and feeds it
//! events; the registration and provisioning modules cover the appservice
//! side the plugin never sees.

pub mod error;
pub mod media;
pub mod outbound;
pub mod plugin;
pub mod provisioning;
pub mod registration;
pub mod runtime;
pub mod types;

pub use {
    error::{Error, Result},
    media::FileKind,
    outbound::{LineOutbound, OutboundEvent},
    plugin::{BridgeOutbound, PuppetPlugin},
    registration::{Registration, RegistrationOptions},
    runtime::{BridgeEvent, PuppetBridge},
    types::{
        FileEvent, MessageContent, MessageEvent, ProtocolFeatures, ProtocolInformation, PuppetId,
        ReceiveParams, RemoteRoom, RemoteUser, RetData,
    },
};
