//! Bitcoin script engine library for Rust.
//!
//! This library provides a byte-code interpreter for Bitcoin script together with the binary
//! codec for peer-to-peer wire messages. It is intended for use at the infrastructure level.
//! It is not a wallet and it is not a full consensus implementation.

/// Binary serialization traits.
pub mod encoding;

/// The SHA256 hash types used within the Bitcoin infrastructure.
pub mod hash;

/// Peer-to-peer message payloads and their codec.
pub mod p2p;

/// The script type, the stacks, and the interpreter.
pub mod script;

/// Variable-length integers.
pub mod var_int;

mod result;
pub use result::{Error, Result};

// re-export the secp256k1 crate
pub extern crate secp256k1;
