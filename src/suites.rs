use rustls::internal::msgs::enums::{HpkeAead, HpkeKdf, HpkeKem};
pub use rustls::internal::msgs::handshake::HpkeSymmetricCipherSuite;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SuiteParseError<'a> {
    #[error("expected kdf-aead, got {0:?}")]
    Format(&'a str),
    #[error("unknown KDF {0:?}")]
    Kdf(&'a str),
    #[error("unknown AEAD {0:?}")]
    Aead(&'a str),
}

pub const fn cipher_suite(kdf_id: HpkeKdf, aead_id: HpkeAead) -> HpkeSymmetricCipherSuite {
    HpkeSymmetricCipherSuite { kdf_id, aead_id }
}

/// Parses `kdf-aead`, each side either a decimal id or a symbolic name
/// such as `HKDF_SHA256-AES_128_GCM`.
pub fn parse_cipher_suite(s: &str) -> Result<HpkeSymmetricCipherSuite, SuiteParseError<'_>> {
    let (kdf, aead) = s.trim().split_once('-').ok_or(SuiteParseError::Format(s))?;
    let kdf_id = match kdf.parse::<u16>() {
        Ok(v) => HpkeKdf::from(v),
        Err(_) => kdf_from_name(kdf).ok_or(SuiteParseError::Kdf(kdf))?,
    };
    let aead_id = match aead.parse::<u16>() {
        Ok(v) => HpkeAead::from(v),
        Err(_) => aead_from_name(aead).ok_or(SuiteParseError::Aead(aead))?,
    };
    Ok(cipher_suite(kdf_id, aead_id))
}

pub fn kdf_from_name(name: &str) -> Option<HpkeKdf> {
    match name {
        "HKDF_SHA256" => Some(HpkeKdf::HKDF_SHA256),
        "HKDF_SHA384" => Some(HpkeKdf::HKDF_SHA384),
        "HKDF_SHA512" => Some(HpkeKdf::HKDF_SHA512),
        _ => None,
    }
}

pub fn aead_from_name(name: &str) -> Option<HpkeAead> {
    match name {
        "AES_128_GCM" => Some(HpkeAead::AES_128_GCM),
        "AES_256_GCM" => Some(HpkeAead::AES_256_GCM),
        "CHACHA20_POLY1305" | "CHACHA20_POLY_1305" => Some(HpkeAead::CHACHA20_POLY_1305),
        _ => None,
    }
}

/// The KEM a real client would pair with the suite's KDF.
pub fn paired_kem(suite: &HpkeSymmetricCipherSuite) -> Option<HpkeKem> {
    match suite.kdf_id {
        HpkeKdf::HKDF_SHA256 => Some(HpkeKem::DHKEM_X25519_HKDF_SHA256),
        HpkeKdf::HKDF_SHA384 => Some(HpkeKem::DHKEM_P384_HKDF_SHA384),
        HpkeKdf::HKDF_SHA512 => Some(HpkeKem::DHKEM_P521_HKDF_SHA512),
        _ => None,
    }
}

/// Size of the encapsulated key implied by [`paired_kem`].
pub fn encapsulated_key_len(suite: &HpkeSymmetricCipherSuite) -> Option<usize> {
    paired_kem(suite).and_then(kem_enc_len)
}

/// Length of the serialized public key (`enc`) for a KEM.
pub fn kem_enc_len(kem: HpkeKem) -> Option<usize> {
    match kem {
        HpkeKem::DHKEM_X25519_HKDF_SHA256 => Some(32),
        HpkeKem::DHKEM_X448_HKDF_SHA512 => Some(56),
        HpkeKem::DHKEM_P256_HKDF_SHA256 => Some(65),
        HpkeKem::DHKEM_P384_HKDF_SHA384 => Some(97),
        HpkeKem::DHKEM_P521_HKDF_SHA512 => Some(133),
        _ => None,
    }
}
