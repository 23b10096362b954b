//! Peer-to-peer message payloads.
//!
//! Only the payloads and their binary codec live here. The envelope around a payload (magic,
//! command name, length and checksum) is written by the transport layer, which is outside of
//! this crate.

pub mod messages;
