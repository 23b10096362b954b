use crate::encoding::Encodable;
use crate::hash::Hash;
use crate::p2p::messages::{commands, P2PMessage};
use crate::Result;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// Ping or pong message
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct Ping {
    /// Unique identifier nonce
    pub nonce: u64,
}

impl Ping {
    /// Size of the ping or pong payload in bytes
    pub const SIZE: usize = 8;

    pub fn new(nonce: u64) -> Ping {
        Ping { nonce }
    }
}

impl Encodable for Ping {
    fn decode<R: ReadBytesExt + Send>(reader: &mut R) -> Result<Self>
    where
        Self: Sized,
    {
        let nonce = reader.read_u64::<LittleEndian>()?;
        Ok(Ping { nonce })
    }

    fn encode_into<W: WriteBytesExt + Send>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<LittleEndian>(self.nonce)?;
        Ok(())
    }

    fn size(&self) -> usize {
        Self::SIZE
    }
}

impl P2PMessage for Ping {
    fn command(&self) -> [u8; 12] {
        commands::PING
    }

    fn checksum(&self) -> [u8; 4] {
        let digest = Hash::sha256(&self.nonce.to_le_bytes());
        [digest.raw[0], digest.raw[1], digest.raw[2], digest.raw[3]]
    }
}
