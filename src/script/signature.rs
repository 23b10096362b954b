use crate::hash::Hash;
use crate::{Error, Result};
use secp256k1::{ecdsa::Signature, Message, Secp256k1};

/// Verifies signatures popped by OP_CHECKSIG against a transaction digest.
///
/// The engine does not know how the digest over the spending transaction is produced; the host
/// supplies an implementation of this trait when it evaluates a script that checks signatures.
pub trait SignatureChecker {
    /// Verify `sig` over the transaction digest against `pubkey`.
    ///
    /// A malformed signature or public key is reported as an unsuccessful check, not an error.
    fn check_sig(&self, sig: &[u8], pubkey: &[u8]) -> Result<bool>;
}

/// A [SignatureChecker] over a fixed, precomputed transaction digest.
pub struct TxDigestChecker {
    pub digest: Hash,
}

impl TxDigestChecker {
    pub fn new(digest: Hash) -> Self {
        Self { digest }
    }
}

impl SignatureChecker for TxDigestChecker {
    fn check_sig(&self, sig: &[u8], pubkey: &[u8]) -> Result<bool> {
        if sig.is_empty() {
            return Ok(false);
        }

        // The last byte is the sighash type, it is not part of the DER encoding.
        let sig_der = &sig[..sig.len() - 1];
        let signature = match Signature::from_der(sig_der) {
            Ok(s) => s,
            Err(_) => return Ok(false),
        };

        let secp_pubkey = match secp256k1::PublicKey::from_slice(pubkey) {
            Ok(k) => k,
            Err(_) => return Ok(false),
        };

        let message = Message::from_digest(self.digest.raw);

        let secp = Secp256k1::verification_only();
        Ok(secp.verify_ecdsa(&message, &signature, &secp_pubkey).is_ok())
    }
}

/// Check that a signature is strictly DER encoded with a trailing sighash byte.
///
/// Applied when the strict encoding flag is set. An empty signature passes the check, it simply
/// fails verification later.
pub fn check_signature_encoding(sig: &[u8]) -> Result<()> {
    if sig.is_empty() {
        return Ok(());
    }

    // smallest: 0x30 [len] 0x02 0x01 [r] 0x02 0x01 [s] [sighash]
    // largest: 72 byte DER signature plus the sighash byte
    if sig.len() < 9 || sig.len() > 73 {
        return Err(Error::MinimalEncoding);
    }
    if sig[0] != 0x30 {
        return Err(Error::MinimalEncoding);
    }
    // the compound length covers everything except the header and the sighash byte
    if sig[1] as usize != sig.len() - 3 {
        return Err(Error::MinimalEncoding);
    }

    let len_r = sig[3] as usize;
    if 5 + len_r >= sig.len() {
        return Err(Error::MinimalEncoding);
    }
    let len_s = sig[5 + len_r] as usize;
    if len_r + len_s + 7 != sig.len() {
        return Err(Error::MinimalEncoding);
    }

    if sig[2] != 0x02 || len_r == 0 {
        return Err(Error::MinimalEncoding);
    }
    if sig[4] & 0x80 != 0 {
        return Err(Error::MinimalEncoding);
    }
    if len_r > 1 && sig[4] == 0x00 && sig[5] & 0x80 == 0 {
        return Err(Error::MinimalEncoding);
    }

    if sig[len_r + 4] != 0x02 || len_s == 0 {
        return Err(Error::MinimalEncoding);
    }
    if sig[len_r + 6] & 0x80 != 0 {
        return Err(Error::MinimalEncoding);
    }
    if len_s > 1 && sig[len_r + 6] == 0x00 && sig[len_r + 7] & 0x80 == 0 {
        return Err(Error::MinimalEncoding);
    }

    Ok(())
}

/// Check that a public key has a standard encoding.
///
/// Applied when the strict encoding flag is set: 33 bytes compressed with an 0x02/0x03 prefix,
/// or 65 bytes uncompressed with an 0x04 prefix.
pub fn check_pubkey_encoding(pubkey: &[u8]) -> Result<()> {
    match pubkey.first() {
        Some(0x02) | Some(0x03) if pubkey.len() == 33 => Ok(()),
        Some(0x04) if pubkey.len() == 65 => Ok(()),
        _ => Err(Error::MinimalEncoding),
    }
}
