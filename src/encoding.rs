use byteorder::{ReadBytesExt, WriteBytesExt};

/// A value with a defined binary form on the wire.
///
/// Decoding and encoding are exact inverses: reading a serialized value back yields an equal
/// value, and the encoder emits precisely [size](Self::size) bytes. A reader that runs out of
/// input surfaces [Truncated](crate::Error::Truncated).
pub trait Encodable {
    /// Read a value in its wire format from `reader`.
    fn decode<R: ReadBytesExt + Send>(reader: &mut R) -> crate::Result<Self>
    where
        Self: Sized;

    /// Write the value in its wire format to `writer`.
    fn encode_into<W: WriteBytesExt + Send>(&self, writer: &mut W) -> crate::Result<()>;

    /// The exact number of bytes [encode_into](Self::encode_into) will emit.
    // Must be computed from the fields, not by serializing and counting: encode() sizes its
    // buffer with this value before it serializes anything.
    fn size(&self) -> usize;

    /// Serialize the value into a new, exactly sized vector.
    fn encode(&self) -> crate::Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(self.size());
        self.encode_into(&mut buffer)?;
        Ok(buffer)
    }

    /// Deserialize a value from a byte slice.
    fn decode_from_buf(buf: &[u8]) -> crate::Result<Self>
    where
        Self: Sized,
    {
        Self::decode(&mut std::io::Cursor::new(buf))
    }
}
