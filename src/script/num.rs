use crate::{Error, Result};
use bytes::Bytes;

/// The numeric view of stack values.
///
/// Script numbers are little-endian with sign-magnitude in the high bit of the most significant
/// byte. The empty sequence is zero and the canonical encoding of -1 is the single byte 0x81.
/// Operands of the arithmetic operations are bounded to 4 bytes, results may be longer.

/// Maximum size in bytes of a numeric operand.
pub const MAX_NUM_SIZE: usize = 4;

/// Convert an integer to bytes in minimal encoding.
pub fn encode_num(val: i64) -> Bytes {
    if val == 0 {
        return Bytes::new();
    }

    let mut bytes = Vec::new();
    let negative = val < 0;
    let mut abs_val = val.unsigned_abs();

    while abs_val > 0 {
        bytes.push((abs_val & 0xff) as u8);
        abs_val >>= 8;
    }

    // Add sign bit if necessary
    if bytes[bytes.len() - 1] & 0x80 != 0 {
        bytes.push(if negative { 0x80 } else { 0 });
    } else if negative {
        let last = bytes.len() - 1;
        bytes[last] |= 0x80;
    }

    Bytes::from(bytes)
}

/// Convert bytes to an integer.
///
/// Fails with [Error::InvalidNumber] if the encoding is longer than `max_size` bytes and with
/// [Error::MinimalEncoding] if `require_minimal` is set and the encoding is not the shortest one.
pub fn decode_num(bytes: &[u8], require_minimal: bool, max_size: usize) -> Result<i64> {
    if bytes.is_empty() {
        return Ok(0);
    }

    if bytes.len() > max_size {
        return Err(Error::InvalidNumber);
    }

    if require_minimal && !is_minimal(bytes) {
        return Err(Error::MinimalEncoding);
    }

    let mut result = 0i64;
    for (i, &byte) in bytes.iter().enumerate() {
        result |= (byte as i64) << (8 * i);
    }

    // Handle sign bit
    if bytes[bytes.len() - 1] & 0x80 != 0 {
        result &= !(0x80_i64 << (8 * (bytes.len() - 1)));
        result = -result;
    }

    Ok(result)
}

/// Is the byte sequence the shortest encoding of its numeric value?
pub fn is_minimal(bytes: &[u8]) -> bool {
    match bytes.last() {
        None => true,
        Some(&last) => {
            // the most significant byte may carry only the sign bit when the byte below it
            // needs its high bit for magnitude
            if last & 0x7f == 0 {
                bytes.len() > 1 && bytes[bytes.len() - 2] & 0x80 != 0
            } else {
                true
            }
        }
    }
}

/// Convert bytes to boolean (empty or all zeros is false).
pub fn bytes_to_bool(bytes: &[u8]) -> bool {
    for (i, &byte) in bytes.iter().enumerate() {
        if byte != 0 {
            // Negative zero is still false
            if i == bytes.len() - 1 && byte == 0x80 {
                return false;
            }
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        for &i in &[
            0i64, 1, -1, 2, -2, 127, -127, 128, -128, 255, -255, 256, -256, 32767, -32767, 32768,
            -32768, 8388607, -8388607, 8388608, -8388608, 2147483647, -2147483647,
        ] {
            let encoded = encode_num(i);
            assert!(encoded.len() <= MAX_NUM_SIZE);
            assert_eq!(decode_num(&encoded, true, MAX_NUM_SIZE).unwrap(), i);
        }
    }

    #[test]
    fn canonical_values() {
        assert_eq!(encode_num(0), Bytes::new());
        assert_eq!(encode_num(1), Bytes::from(vec![0x01]));
        assert_eq!(encode_num(-1), Bytes::from(vec![0x81]));
        assert_eq!(encode_num(127), Bytes::from(vec![0x7f]));
        assert_eq!(encode_num(128), Bytes::from(vec![0x80, 0x00]));
        assert_eq!(encode_num(-128), Bytes::from(vec![0x80, 0x80]));
        assert_eq!(encode_num(256), Bytes::from(vec![0x00, 0x01]));
    }

    #[test]
    fn decode_edge_cases() {
        // empty is zero
        assert_eq!(decode_num(&[], true, MAX_NUM_SIZE).unwrap(), 0);
        // single 0x81 is -1
        assert_eq!(decode_num(&[0x81], true, MAX_NUM_SIZE).unwrap(), -1);
        // more than 4 bytes fails even when the value would fit
        assert!(matches!(
            decode_num(&[0x01, 0x00, 0x00, 0x00, 0x00], false, MAX_NUM_SIZE),
            Err(Error::InvalidNumber)
        ));
        // negative zero decodes to zero when minimality is not required
        assert_eq!(decode_num(&[0x80], false, MAX_NUM_SIZE).unwrap(), 0);
    }

    #[test]
    fn minimality() {
        assert!(is_minimal(&[]));
        assert!(is_minimal(&[0x01]));
        assert!(is_minimal(&[0x81]));
        assert!(is_minimal(&[0x80, 0x00]));
        assert!(is_minimal(&[0xff, 0x00]));
        assert!(!is_minimal(&[0x7f, 0x00]));
        assert!(is_minimal(&[0xff, 0x80]));
        assert!(!is_minimal(&[0x01, 0x00]));
        assert!(!is_minimal(&[0x00]));
        assert!(!is_minimal(&[0x80]));
        // non-minimal is accepted when the flag is off
        assert_eq!(decode_num(&[0x01, 0x00], false, MAX_NUM_SIZE).unwrap(), 1);
        // and rejected when it is on
        assert!(matches!(
            decode_num(&[0x01, 0x00], true, MAX_NUM_SIZE),
            Err(Error::MinimalEncoding)
        ));
    }

    #[test]
    fn boolean_conversion() {
        assert!(!bytes_to_bool(&[]));
        assert!(!bytes_to_bool(&[0]));
        assert!(!bytes_to_bool(&[0, 0]));
        assert!(!bytes_to_bool(&[0x80])); // negative zero
        assert!(!bytes_to_bool(&[0, 0x80])); // negative zero, two bytes
        assert!(bytes_to_bool(&[1]));
        assert!(bytes_to_bool(&[0x81])); // negative one
        assert!(bytes_to_bool(&[0, 1]));
        assert!(bytes_to_bool(&[0x80, 0])); // 0x80 not in the top position
    }
}
