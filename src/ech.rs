//! GREASE `encrypted_client_hello`: the outer-hello shape of ECH with meaningless content.

use log::{debug, trace};
use rustls::internal::msgs::codec::{Codec, Reader};

use crate::codec::{
    checked_u16, put_u16_prefixed, read_cipher_suite, read_u16, read_u16_prefixed, read_u8,
};
use crate::error::{EchError, MalformedReason, Result};
use crate::suites::HpkeSymmetricCipherSuite;

/// `encrypted_client_hello` extension type.
pub const ECH_EXTENSION_TYPE: u16 = 0xfe0d;
/// Tag appended by every AEAD usable with ECH.
pub const AEAD_TAG_OVERHEAD: usize = 16;

const HEADER_LEN: usize = 4;
// hello type + kdf + aead + config id + two length prefixes
pub(crate) const FIXED_BODY_LEN: usize = 1 + 2 + 2 + 1 + 2 + 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EchClientHelloType {
    Outer = 0,
    // never emitted by GREASE
    Inner = 1,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreaseEncryptedClientHello {
    hello_type: EchClientHelloType,
    candidate_cipher_suites: Vec<HpkeSymmetricCipherSuite>,
    cipher_suite: HpkeSymmetricCipherSuite,
    config_id: u8,
    encapsulated_key: Vec<u8>,
    candidate_payload_lens: Vec<u16>,
    payload: Vec<u8>,
}

impl GreaseEncryptedClientHello {
    /// Callers guarantee `cipher_suite` is one of the candidates and that both
    /// candidate lists have the same length.
    pub(crate) fn from_parts(
        candidate_cipher_suites: Vec<HpkeSymmetricCipherSuite>,
        cipher_suite: HpkeSymmetricCipherSuite,
        config_id: u8,
        encapsulated_key: Vec<u8>,
        candidate_payload_lens: Vec<u16>,
        payload: Vec<u8>,
    ) -> Self {
        debug_assert_eq!(candidate_cipher_suites.len(), candidate_payload_lens.len());
        Self {
            hello_type: EchClientHelloType::Outer,
            candidate_cipher_suites,
            cipher_suite,
            config_id,
            encapsulated_key,
            candidate_payload_lens,
            payload,
        }
    }

    /// Parses an extension body, i.e. the bytes after the type and length.
    ///
    /// Returns the record together with the number of bytes consumed, which
    /// is always `body.len()`. The record carries exactly one candidate: the
    /// cipher suite and payload length found on the wire.
    pub fn decode_body(body: &[u8]) -> Result<(Self, usize)> {
        Self::read_body(body).map_err(|e| {
            debug!("failed to decode GREASE ECH body of {} bytes: {}", body.len(), e);
            e
        })
    }

    /// Parses a complete extension including its 4-byte header.
    pub fn decode_full(bytes: &[u8]) -> Result<(Self, usize)> {
        let mut r = Reader::init(bytes);
        let ext_type = read_u16(&mut r, "extension type")?;
        if ext_type != ECH_EXTENSION_TYPE {
            debug!("not a GREASE ECH extension: type {:#06x}", ext_type);
            return Err(MalformedReason::ExtensionType(ext_type).into());
        }
        let declared = read_u16(&mut r, "extension length")? as usize;
        if declared > r.left() {
            return Err(EchError::Truncated {
                field: "extension body",
                needed: declared,
                available: r.left(),
            });
        }
        if declared < r.left() {
            return Err(MalformedReason::LengthMismatch {
                declared,
                actual: r.left(),
            }
            .into());
        }
        let (ech, consumed) = Self::decode_body(&bytes[HEADER_LEN..])?;
        Ok((ech, HEADER_LEN + consumed))
    }

    fn read_body(body: &[u8]) -> Result<(Self, usize)> {
        let mut r = Reader::init(body);
        let hello_type = read_u8(&mut r, "hello type")?;
        if hello_type != EchClientHelloType::Outer as u8 {
            return Err(MalformedReason::HelloType(hello_type).into());
        }
        let cipher_suite = read_cipher_suite(&mut r)?;
        let config_id = read_u8(&mut r, "config id")?;
        let encapsulated_key = read_u16_prefixed(&mut r, "encapsulated key")?;
        let payload = read_u16_prefixed(&mut r, "payload")?;
        if r.any_left() {
            return Err(MalformedReason::TrailingBytes(r.left()).into());
        }
        if payload.len() < AEAD_TAG_OVERHEAD {
            return Err(MalformedReason::PayloadTooShort(payload.len()).into());
        }
        let payload_len = (payload.len() - AEAD_TAG_OVERHEAD) as u16;
        trace!(
            "decoded GREASE ECH: suite {:?}, config id {}, enc {} bytes, payload {} bytes",
            cipher_suite,
            config_id,
            encapsulated_key.len(),
            payload.len()
        );
        let ech = Self {
            hello_type: EchClientHelloType::Outer,
            candidate_cipher_suites: vec![cipher_suite],
            cipher_suite,
            config_id,
            encapsulated_key: encapsulated_key.to_vec(),
            candidate_payload_lens: vec![payload_len],
            payload: payload.to_vec(),
        };
        Ok((ech, r.used()))
    }

    pub fn body_len(&self) -> usize {
        FIXED_BODY_LEN + self.encapsulated_key.len() + self.payload.len()
    }

    /// Size of the complete extension, header included.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.body_len()
    }

    /// The extension body without type and length. Fails when the body would
    /// not fit the 16-bit extension length.
    pub fn body_bytes(&self) -> Result<Vec<u8>> {
        checked_u16(self.body_len(), "extension body")?;
        let mut out = Vec::with_capacity(self.body_len());
        (self.hello_type as u8).encode(&mut out);
        self.cipher_suite.encode(&mut out);
        self.config_id.encode(&mut out);
        put_u16_prefixed(&mut out, &self.encapsulated_key, "encapsulated key")?;
        put_u16_prefixed(&mut out, &self.payload, "payload")?;
        Ok(out)
    }

    /// The complete extension, header included.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let body = self.body_bytes()?;
        let mut out = Vec::with_capacity(HEADER_LEN + body.len());
        ECH_EXTENSION_TYPE.encode(&mut out);
        put_u16_prefixed(&mut out, &body, "extension body")?;
        Ok(out)
    }

    /// Writes the complete extension into `dst` in one go.
    ///
    /// `Ok(n)` means all `n` bytes of the extension were delivered and there
    /// is nothing left to write. A `dst` shorter than [`Self::encoded_len`]
    /// is rejected and left untouched.
    pub fn encode_full(&self, dst: &mut [u8]) -> Result<usize> {
        let needed = self.encoded_len();
        if dst.len() < needed {
            debug!(
                "GREASE ECH needs {} bytes, destination has {}",
                needed,
                dst.len()
            );
            return Err(EchError::OversizeRequest {
                needed,
                available: dst.len(),
            });
        }
        let ext = self.to_vec()?;
        dst[..ext.len()].copy_from_slice(&ext);
        Ok(ext.len())
    }

    pub fn hello_type(&self) -> EchClientHelloType {
        self.hello_type
    }

    pub fn candidate_cipher_suites(&self) -> &[HpkeSymmetricCipherSuite] {
        &self.candidate_cipher_suites
    }

    pub fn cipher_suite(&self) -> HpkeSymmetricCipherSuite {
        self.cipher_suite
    }

    pub fn config_id(&self) -> u8 {
        self.config_id
    }

    pub fn encapsulated_key(&self) -> &[u8] {
        &self.encapsulated_key
    }

    pub fn candidate_payload_lens(&self) -> &[u16] {
        &self.candidate_payload_lens
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}
