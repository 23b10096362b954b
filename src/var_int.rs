//! CompactSize variable-length integers, the count and length prefix of the wire format.
//!
//! Values below 0xfd fit in a single byte. Anything larger is a one byte marker followed by
//! the value in 2, 4 or 8 little-endian bytes, whichever is the shortest that holds it.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// Read a variable length integer.
pub fn varint_decode<R: ReadBytesExt + Send>(reader: &mut R) -> crate::Result<u64> {
    match reader.read_u8()? {
        0xfd => Ok(reader.read_u16::<LittleEndian>()? as u64),
        0xfe => Ok(reader.read_u32::<LittleEndian>()? as u64),
        0xff => Ok(reader.read_u64::<LittleEndian>()?),
        small => Ok(small as u64),
    }
}

/// Write a variable length integer in its shortest form.
pub fn varint_encode<W: WriteBytesExt + Send>(writer: &mut W, value: u64) -> crate::Result<()> {
    if value < 0xfd {
        writer.write_u8(value as u8)?;
    } else if value <= 0xffff {
        writer.write_u8(0xfd)?;
        writer.write_u16::<LittleEndian>(value as u16)?;
    } else if value <= 0xffff_ffff {
        writer.write_u8(0xfe)?;
        writer.write_u32::<LittleEndian>(value as u32)?;
    } else {
        writer.write_u8(0xff)?;
        writer.write_u64::<LittleEndian>(value)?;
    }
    Ok(())
}

/// The number of bytes the encoded form of `value` occupies.
pub fn varint_size(value: u64) -> usize {
    if value < 0xfd {
        1
    } else if value <= 0xffff {
        3
    } else if value <= 0xffff_ffff {
        5
    } else {
        9
    }
}
