use hex::{FromHex, ToHex};
use ring::digest::{digest, SHA256};
use std::fmt;

/// A struct representing a 32 byte hash.
///
/// This is the hash type that is generally used within the Bitcoin infrastructure.
// We're not going to use a Bytes here. https://docs.rs/bytes/latest/bytes/struct.Bytes.html# reports
// that Bytes struct has 4 x usize fields = 32 bytes (on 64-bit architecture, our main goal). This is
// equal in size to the hash, might as well just copy it when needed.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash {
    pub raw: [u8; 32],
}

impl Hash {
    pub const SIZE: usize = 32;
    pub const HEX_SIZE: usize = Hash::SIZE * 2;
    pub const ZERO: Hash = Hash { raw: [0; Self::SIZE] };

    /// SHA256 hash the given data.
    pub fn sha256(data: &[u8]) -> Hash {
        let sha256 = digest(&SHA256, data);
        let mut hash256 = [0; 32];
        hash256.clone_from_slice(sha256.as_ref());
        Hash { raw: hash256 }
    }

    /// Double SHA256 hash the given data.
    pub fn sha256d(data: &[u8]) -> Hash {
        let sha256 = digest(&SHA256, data);
        let sha256d = digest(&SHA256, sha256.as_ref());
        let mut hash256 = [0; 32];
        hash256.clone_from_slice(sha256d.as_ref());
        Hash { raw: hash256 }
    }

    pub fn from_slice(slice: &[u8]) -> Hash {
        let mut hash = [0; 32];
        hash.copy_from_slice(slice);
        Hash { raw: hash }
    }
}

impl FromHex for Hash {
    type Error = crate::Error;

    /// Converts a string of 64 hex characters into a hash.
    ///
    /// In contrast to the block and transaction identifiers, the byte order is not reversed here.
    fn from_hex<T: AsRef<[u8]>>(hex: T) -> Result<Self, Self::Error> {
        let hex = hex.as_ref();
        if hex.len() != Hash::HEX_SIZE {
            let msg = format!("Length of hex encoded hash must be 64. Len is {:}.", hex.len());
            return Err(crate::Error::BadArgument(msg));
        }
        let bytes = hex::decode(hex)?;
        let mut hash_array = [0u8; Hash::SIZE];
        hash_array.copy_from_slice(&bytes);
        Ok(Hash { raw: hash_array })
    }
}

impl ToHex for Hash {
    fn encode_hex<T: FromIterator<char>>(&self) -> T {
        hex::encode(self.raw).chars().collect()
    }

    fn encode_hex_upper<T: FromIterator<char>>(&self) -> T {
        hex::encode_upper(self.raw).chars().collect()
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Hash({})", hex::encode(self.raw))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(self.raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn sha256_known_value() {
        let h = Hash::sha256(b"hello");
        assert_eq!(
            h.raw,
            hex!("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
        );
    }

    #[test]
    fn sha256d_known_value() {
        let h = Hash::sha256d(b"hello");
        assert_eq!(
            h.raw,
            hex!("9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50")
        );
    }

    #[test]
    fn hex_round_trip() {
        let h = Hash::sha256(b"abc");
        let s: String = h.encode_hex();
        assert_eq!(Hash::from_hex(&s).unwrap(), h);
    }

    #[test]
    fn from_hex_rejects_bad_length() {
        assert!(Hash::from_hex("abcd").is_err());
    }
}
