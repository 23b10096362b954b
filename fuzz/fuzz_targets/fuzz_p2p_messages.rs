#![no_main]

use btcscript::encoding::Encodable;
use btcscript::p2p::messages::{Alert, P2PMessage, Ping};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(alert) = Alert::decode_from_buf(data) {
        // anything that decodes must round trip
        let encoded = alert.encode().unwrap();
        assert_eq!(encoded.len(), alert.size());
        assert_eq!(Alert::decode_from_buf(&encoded).unwrap(), alert);
        let _ = alert.checksum();
        let _ = alert.validate();
    }

    if let Ok(ping) = Ping::decode_from_buf(data) {
        let encoded = ping.encode().unwrap();
        assert_eq!(Ping::decode_from_buf(&encoded).unwrap(), ping);
    }
});
