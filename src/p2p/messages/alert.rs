use crate::encoding::Encodable;
use crate::hash::Hash;
use crate::p2p::messages::{commands, P2PMessage};
use crate::var_int::{varint_decode, varint_encode, varint_size};
use crate::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::warn;

/// Maximum number of entries in the cancel and sub-version sets.
const MAX_SET_ENTRIES: u64 = 1000;

/// Maximum length of a single sub-version string.
const MAX_SUB_VER_LEN: u64 = 256;

/// Maximum length of the comment field.
const MAX_COMMENT_LEN: u64 = 65_536;

/// Maximum length of the status bar and reserved fields.
const MAX_STATUS_BAR_LEN: u64 = 256;

/// Alert payload broadcasting an operator notice to the network.
///
/// An alert applies to nodes whose protocol version lies in `[min_ver, max_ver]` and whose
/// sub-version string is in `set_sub_ver` (an empty set matches every node). It supersedes the
/// alerts whose id is in `set_cancel` or at most `cancel`.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Alert {
    /// Version of the alert format.
    pub version: i32,
    /// Time past which nodes should stop relaying this alert, seconds since the epoch.
    pub relay_until: i64,
    /// Time past which the alert is no longer in effect, seconds since the epoch.
    pub expiration: i64,
    /// Unique identifier of this alert.
    pub id: i32,
    /// All alerts with an id up to this value are cancelled.
    pub cancel: i32,
    /// Specific alert ids that are cancelled.
    pub set_cancel: Vec<i32>,
    /// Lowest protocol version the alert applies to.
    pub min_ver: i32,
    /// Highest protocol version the alert applies to.
    pub max_ver: i32,
    /// Sub-version strings the alert applies to, empty for all.
    pub set_sub_ver: Vec<String>,
    /// Relative priority compared to other active alerts.
    pub priority: i32,
    /// Commentary, not displayed.
    pub comment: String,
    /// Message for the node operator.
    pub status_bar: String,
    /// Unused.
    pub reserved: String,
}

impl Alert {
    /// Checks if the alert message is consistent.
    pub fn validate(&self) -> Result<()> {
        if self.expiration < self.relay_until {
            return Err(Error::BadData(format!(
                "Alert expires at {} before relay ends at {}",
                self.expiration, self.relay_until
            )));
        }
        if self.max_ver < self.min_ver {
            return Err(Error::BadData(format!(
                "Empty version range: {} to {}",
                self.min_ver, self.max_ver
            )));
        }
        if self.id <= self.cancel {
            warn!("alert {} cancels itself", self.id);
        }
        Ok(())
    }

    fn read_string<R: ReadBytesExt + Send>(reader: &mut R, max_len: u64) -> Result<String> {
        let len = varint_decode(reader)?;
        if len > max_len {
            return Err(Error::BadData(format!("String too long: {}", len)));
        }
        let mut buf = vec![0u8; len as usize];
        reader.read_exact(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    fn write_string<W: WriteBytesExt + Send>(writer: &mut W, s: &str) -> Result<()> {
        varint_encode(writer, s.len() as u64)?;
        writer.write_all(s.as_bytes())?;
        Ok(())
    }
}

impl Encodable for Alert {
    fn decode<R: ReadBytesExt + Send>(reader: &mut R) -> Result<Self>
    where
        Self: Sized,
    {
        let version = reader.read_i32::<LittleEndian>()?;
        let relay_until = reader.read_i64::<LittleEndian>()?;
        let expiration = reader.read_i64::<LittleEndian>()?;
        let id = reader.read_i32::<LittleEndian>()?;
        let cancel = reader.read_i32::<LittleEndian>()?;

        let cancel_count = varint_decode(reader)?;
        if cancel_count > MAX_SET_ENTRIES {
            return Err(Error::BadData(format!("Cancel set too large: {}", cancel_count)));
        }
        let mut set_cancel = Vec::with_capacity(cancel_count as usize);
        for _ in 0..cancel_count {
            set_cancel.push(reader.read_i32::<LittleEndian>()?);
        }

        let min_ver = reader.read_i32::<LittleEndian>()?;
        let max_ver = reader.read_i32::<LittleEndian>()?;

        let sub_ver_count = varint_decode(reader)?;
        if sub_ver_count > MAX_SET_ENTRIES {
            return Err(Error::BadData(format!("Sub-version set too large: {}", sub_ver_count)));
        }
        let mut set_sub_ver = Vec::with_capacity(sub_ver_count as usize);
        for _ in 0..sub_ver_count {
            set_sub_ver.push(Self::read_string(reader, MAX_SUB_VER_LEN)?);
        }

        let priority = reader.read_i32::<LittleEndian>()?;
        let comment = Self::read_string(reader, MAX_COMMENT_LEN)?;
        let status_bar = Self::read_string(reader, MAX_STATUS_BAR_LEN)?;
        let reserved = Self::read_string(reader, MAX_STATUS_BAR_LEN)?;

        Ok(Alert {
            version,
            relay_until,
            expiration,
            id,
            cancel,
            set_cancel,
            min_ver,
            max_ver,
            set_sub_ver,
            priority,
            comment,
            status_bar,
            reserved,
        })
    }

    fn encode_into<W: WriteBytesExt + Send>(&self, writer: &mut W) -> Result<()> {
        writer.write_i32::<LittleEndian>(self.version)?;
        writer.write_i64::<LittleEndian>(self.relay_until)?;
        writer.write_i64::<LittleEndian>(self.expiration)?;
        writer.write_i32::<LittleEndian>(self.id)?;
        writer.write_i32::<LittleEndian>(self.cancel)?;
        varint_encode(writer, self.set_cancel.len() as u64)?;
        for &id in &self.set_cancel {
            writer.write_i32::<LittleEndian>(id)?;
        }
        writer.write_i32::<LittleEndian>(self.min_ver)?;
        writer.write_i32::<LittleEndian>(self.max_ver)?;
        varint_encode(writer, self.set_sub_ver.len() as u64)?;
        for sub_ver in &self.set_sub_ver {
            Self::write_string(writer, sub_ver)?;
        }
        writer.write_i32::<LittleEndian>(self.priority)?;
        Self::write_string(writer, &self.comment)?;
        Self::write_string(writer, &self.status_bar)?;
        Self::write_string(writer, &self.reserved)?;
        Ok(())
    }

    fn size(&self) -> usize {
        let mut size = 4 + 8 + 8 + 4 + 4;
        size += varint_size(self.set_cancel.len() as u64) + 4 * self.set_cancel.len();
        size += 4 + 4;
        size += varint_size(self.set_sub_ver.len() as u64);
        for sub_ver in &self.set_sub_ver {
            size += varint_size(sub_ver.len() as u64) + sub_ver.len();
        }
        size += 4;
        size += varint_size(self.comment.len() as u64) + self.comment.len();
        size += varint_size(self.status_bar.len() as u64) + self.status_bar.len();
        size += varint_size(self.reserved.len() as u64) + self.reserved.len();
        size
    }
}

impl P2PMessage for Alert {
    fn command(&self) -> [u8; 12] {
        commands::ALERT
    }

    /// First four bytes of SHA-256 over the field bytes in schedule order.
    ///
    /// The length prefixes are not part of the hash input, only the element bytes are. This is
    /// the historic behavior and it intentionally differs from the envelope checksum over the
    /// serialized payload.
    fn checksum(&self) -> [u8; 4] {
        let mut fields = Vec::with_capacity(self.size());
        fields.extend_from_slice(&self.version.to_le_bytes());
        fields.extend_from_slice(&self.relay_until.to_le_bytes());
        fields.extend_from_slice(&self.expiration.to_le_bytes());
        fields.extend_from_slice(&self.id.to_le_bytes());
        fields.extend_from_slice(&self.cancel.to_le_bytes());
        for &id in &self.set_cancel {
            fields.extend_from_slice(&id.to_le_bytes());
        }
        fields.extend_from_slice(&self.min_ver.to_le_bytes());
        fields.extend_from_slice(&self.max_ver.to_le_bytes());
        for sub_ver in &self.set_sub_ver {
            fields.extend_from_slice(sub_ver.as_bytes());
        }
        fields.extend_from_slice(&self.priority.to_le_bytes());
        fields.extend_from_slice(self.comment.as_bytes());
        fields.extend_from_slice(self.status_bar.as_bytes());
        fields.extend_from_slice(self.reserved.as_bytes());

        let digest = Hash::sha256(&fields);
        [digest.raw[0], digest.raw[1], digest.raw[2], digest.raw[3]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_alert() -> Alert {
        Alert {
            version: 1,
            relay_until: 1_329_620_535,
            expiration: 1_329_792_435,
            id: 1010,
            cancel: 1009,
            set_cancel: vec![1000, 1001],
            min_ver: 10_000,
            max_ver: 70_001,
            set_sub_ver: vec!["/Satoshi:0.6.0/".to_string()],
            priority: 100,
            comment: "internal".to_string(),
            status_bar: "URGENT: upgrade required".to_string(),
            reserved: String::new(),
        }
    }

    /// The all-empty alert serializes to exactly 45 bytes: six i32, two i64 and five
    /// single-byte length prefixes.
    #[test]
    fn empty_alert_size() {
        let alert = Alert::default();
        let v = alert.encode().unwrap();
        assert_eq!(v.len(), 45);
        assert_eq!(v.len(), alert.size());
    }

    #[test]
    fn write_read() {
        let alert = sample_alert();
        let v = alert.encode().unwrap();
        assert_eq!(v.len(), alert.size());
        assert_eq!(Alert::decode_from_buf(v.as_slice()).unwrap(), alert);
    }

    #[test]
    fn write_read_empty() {
        let alert = Alert::default();
        let v = alert.encode().unwrap();
        assert_eq!(Alert::decode_from_buf(v.as_slice()).unwrap(), alert);
    }

    #[test]
    fn truncated_payload() {
        let v = sample_alert().encode().unwrap();
        for end in [0, 3, 20, 44, v.len() - 1] {
            assert!(matches!(
                Alert::decode_from_buf(&v[..end]),
                Err(Error::Truncated)
            ));
        }
    }

    #[test]
    fn oversized_sets_rejected() {
        // header up to the cancel set, then an absurd element count
        let mut v = Vec::new();
        let mut alert = Alert::default();
        alert.encode_into(&mut v).unwrap();
        v[28] = 0xfe; // varint marker for a four byte count
        v.splice(29..29, [0xff, 0xff, 0xff, 0x7f]);
        assert!(matches!(Alert::decode_from_buf(&v), Err(Error::BadData(_))));
    }

    #[test]
    fn checksum_hashes_fields_without_prefixes() {
        let alert = Alert {
            version: 1,
            set_cancel: vec![2],
            set_sub_ver: vec!["/x/".to_string()],
            comment: "ab".to_string(),
            ..Default::default()
        };

        // the expected hash input, assembled by hand: no counts, no length prefixes
        let mut expected = Vec::new();
        expected.extend_from_slice(&1i32.to_le_bytes());
        expected.extend_from_slice(&0i64.to_le_bytes());
        expected.extend_from_slice(&0i64.to_le_bytes());
        expected.extend_from_slice(&0i32.to_le_bytes());
        expected.extend_from_slice(&0i32.to_le_bytes());
        expected.extend_from_slice(&2i32.to_le_bytes());
        expected.extend_from_slice(&0i32.to_le_bytes());
        expected.extend_from_slice(&0i32.to_le_bytes());
        expected.extend_from_slice(b"/x/");
        expected.extend_from_slice(&0i32.to_le_bytes());
        expected.extend_from_slice(b"ab");
        let digest = Hash::sha256(&expected);

        assert_eq!(alert.checksum(), &digest.raw[0..4]);

        // hashing the serialized form instead would give a different result
        let framed = Hash::sha256(&alert.encode().unwrap());
        assert_ne!(alert.checksum(), &framed.raw[0..4]);
    }

    #[test]
    fn command_name() {
        assert_eq!(Alert::default().command(), *b"alert\0\0\0\0\0\0\0");
    }

    #[test]
    fn validate() {
        assert!(sample_alert().validate().is_ok());

        let expired_before_relay = Alert {
            relay_until: 100,
            expiration: 50,
            ..sample_alert()
        };
        assert!(expired_before_relay.validate().is_err());

        let empty_version_range = Alert {
            min_ver: 2,
            max_ver: 1,
            ..sample_alert()
        };
        assert!(empty_version_range.validate().is_err());
    }
}
