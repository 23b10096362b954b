use crate::{Error, Result};
use bytes::Bytes;
use hex::FromHex;
use std::fmt;

/// Maximum script size in bytes.
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// A script in its encoded form.
///
/// This struct is read-only. Use [crate::script::ScriptBuilder] to build a script and
/// [crate::script::ScriptInterpreter] to execute one.
#[derive(PartialEq, Eq, Hash, Clone)]
pub struct Script {
    pub raw: Bytes,
}

impl Script {
    pub fn new(raw: Bytes) -> Self {
        Self { raw }
    }

    /// The length of the script in bytes.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The byte at offset `i`, failing with [Error::ScriptTooShort] when out of bounds.
    pub fn byte_at(&self, i: usize) -> Result<u8> {
        self.raw.get(i).copied().ok_or(Error::ScriptTooShort)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }
}

impl From<Vec<u8>> for Script {
    fn from(value: Vec<u8>) -> Self {
        Self { raw: Bytes::from(value) }
    }
}

impl From<&[u8]> for Script {
    fn from(value: &[u8]) -> Self {
        Self { raw: Bytes::copy_from_slice(value) }
    }
}

impl FromHex for Script {
    type Error = crate::Error;

    /// Hex encoding is not prefixed by the length.
    fn from_hex<T: AsRef<[u8]>>(hex: T) -> Result<Self> {
        let raw = hex::decode(hex)?;
        Ok(Self { raw: Bytes::from(raw) })
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Script({})", hex::encode(&self.raw))
    }
}
