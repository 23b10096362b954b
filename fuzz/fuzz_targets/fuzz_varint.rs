#![no_main]

use btcscript::var_int::{varint_decode, varint_encode, varint_size};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut cursor = std::io::Cursor::new(data);
    if let Ok(value) = varint_decode(&mut cursor) {
        // re-encoding must round trip and match the declared size
        let mut encoded = Vec::new();
        varint_encode(&mut encoded, value).unwrap();
        assert_eq!(encoded.len(), varint_size(value));
        let mut cursor = std::io::Cursor::new(encoded.as_slice());
        assert_eq!(varint_decode(&mut cursor).unwrap(), value);
    }
});
