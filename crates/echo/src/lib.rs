//! Echo protocol plugin.
//!
//! Implements `PuppetPlugin` without any remote side: every message or file
//! sent to a ghost is echoed straight back into the same DM.

pub mod plugin;
pub mod protocol;
pub mod state;

pub use {
    plugin::EchoPlugin,
    protocol::{protocol_information, registration_options},
    state::{EchoPuppet, PuppetTable},
};
