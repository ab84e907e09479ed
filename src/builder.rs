use crate::ech::{GreaseEncryptedClientHello, AEAD_TAG_OVERHEAD, FIXED_BODY_LEN};
use crate::suites::{
    cipher_suite, encapsulated_key_len, parse_cipher_suite, HpkeSymmetricCipherSuite,
    SuiteParseError,
};
use log::trace;
use rand::seq::SliceRandom;
use rand::{CryptoRng, Rng};
use rustls::internal::msgs::enums::{HpkeAead, HpkeKdf};
use std::fmt::{Display, Formatter};

/// Inner hello length before the AEAD tag, as sent by mainstream browsers.
pub const DEFAULT_PAYLOAD_LEN: u16 = 128;
pub const DEFAULT_CIPHER_SUITE: HpkeSymmetricCipherSuite =
    cipher_suite(HpkeKdf::HKDF_SHA256, HpkeAead::AES_128_GCM);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailReason<'a> {
    NoCipherSuite,
    CipherSuite(SuiteParseError<'a>),
    UnpairedKdf(HpkeSymmetricCipherSuite),
    PayloadLenCount { suites: usize, lens: usize },
    PayloadLen(u16),
    BodyLen {
        suite: HpkeSymmetricCipherSuite,
        payload_len: u16,
    },
}

impl<'a> Display for FailReason<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Policy the generator draws GREASE ECH values from.
///
/// `cipher_suites[i]` and `payload_lens[i]` describe the same candidate.
#[derive(Debug, Clone)]
pub struct GreaseEchConfig {
    cipher_suites: Vec<HpkeSymmetricCipherSuite>,
    payload_lens: Vec<u16>,
    enc_lens: Vec<usize>,
    config_ids: Vec<u8>,
}

impl Default for GreaseEchConfig {
    fn default() -> Self {
        Self {
            cipher_suites: vec![DEFAULT_CIPHER_SUITE],
            payload_lens: vec![DEFAULT_PAYLOAD_LEN],
            enc_lens: vec![32],
            config_ids: Vec::new(),
        }
    }
}

impl GreaseEchConfig {
    pub fn builder() -> GreaseEchConfigBuilder {
        GreaseEchConfigBuilder::default()
    }

    pub fn cipher_suites(&self) -> &[HpkeSymmetricCipherSuite] {
        &self.cipher_suites
    }

    pub fn payload_lens(&self) -> &[u16] {
        &self.payload_lens
    }

    pub fn config_ids(&self) -> &[u8] {
        &self.config_ids
    }

    /// Fabricates an extension with one candidate picked uniformly from the
    /// policy. Key and payload bytes come straight from `rng`.
    ///
    /// The record keeps every policy candidate, but only the picked one is
    /// written on the wire, so decoding its bytes yields a single candidate.
    pub fn generate<R: Rng + CryptoRng>(&self, rng: &mut R) -> GreaseEncryptedClientHello {
        let idx = rng.gen_range(0..self.cipher_suites.len());
        let cipher_suite = self.cipher_suites[idx];
        let config_id = match self.config_ids.choose(rng) {
            Some(id) => *id,
            None => rng.gen(),
        };
        let mut encapsulated_key = vec![0u8; self.enc_lens[idx]];
        rng.fill_bytes(&mut encapsulated_key);
        let mut payload = vec![0u8; self.payload_lens[idx] as usize + AEAD_TAG_OVERHEAD];
        rng.fill_bytes(&mut payload);
        trace!(
            "generated GREASE ECH: suite {:?}, config id {}, enc {} bytes, payload {} bytes",
            cipher_suite,
            config_id,
            encapsulated_key.len(),
            payload.len()
        );
        GreaseEncryptedClientHello::from_parts(
            self.cipher_suites.clone(),
            cipher_suite,
            config_id,
            encapsulated_key,
            self.payload_lens.clone(),
            payload,
        )
    }

    pub fn generate_default(&self) -> GreaseEncryptedClientHello {
        self.generate(&mut rand::thread_rng())
    }
}

#[derive(Default)]
pub struct GreaseEchConfigBuilder {
    pub cipher_suites: Option<Vec<HpkeSymmetricCipherSuite>>,
    // one per cipher suite, defaults to DEFAULT_PAYLOAD_LEN for each
    pub payload_lens: Option<Vec<u16>>,
    pub config_ids: Vec<u8>,
}

impl GreaseEchConfigBuilder {
    pub fn build<'a>(&self) -> Result<GreaseEchConfig, FailReason<'a>> {
        let cipher_suites = self
            .cipher_suites
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_CIPHER_SUITE]);
        if cipher_suites.is_empty() {
            return Err(FailReason::NoCipherSuite);
        }
        let payload_lens = self
            .payload_lens
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_PAYLOAD_LEN; cipher_suites.len()]);
        if payload_lens.len() != cipher_suites.len() {
            return Err(FailReason::PayloadLenCount {
                suites: cipher_suites.len(),
                lens: payload_lens.len(),
            });
        }
        if let Some(len) = payload_lens
            .iter()
            .find(|len| **len as usize + AEAD_TAG_OVERHEAD > u16::MAX as usize)
        {
            return Err(FailReason::PayloadLen(*len));
        }
        let enc_lens = cipher_suites
            .iter()
            .map(|suite| encapsulated_key_len(suite).ok_or(FailReason::UnpairedKdf(*suite)))
            .collect::<Result<Vec<_>, _>>()?;
        let candidates = cipher_suites.iter().zip(&enc_lens).zip(&payload_lens);
        for ((suite, enc_len), payload_len) in candidates {
            if FIXED_BODY_LEN + enc_len + *payload_len as usize + AEAD_TAG_OVERHEAD
                > u16::MAX as usize
            {
                return Err(FailReason::BodyLen {
                    suite: *suite,
                    payload_len: *payload_len,
                });
            }
        }
        Ok(GreaseEchConfig {
            cipher_suites,
            payload_lens,
            enc_lens,
            config_ids: self.config_ids.clone(),
        })
    }

    pub fn with_cipher_suites(
        &mut self,
        cipher_suites: Vec<HpkeSymmetricCipherSuite>,
    ) -> &mut Self {
        self.cipher_suites = Some(cipher_suites);
        self
    }

    /// Comma separated `kdf-aead` pairs, e.g. `1-1,HKDF_SHA256-CHACHA20_POLY1305`.
    pub fn with_cipher_suites_str<'a>(
        &mut self,
        suites: &'a str,
    ) -> Result<&mut Self, FailReason<'a>> {
        let mut parsed = Vec::new();
        for suite in suites.split(',') {
            parsed.push(parse_cipher_suite(suite).map_err(FailReason::CipherSuite)?);
        }
        self.cipher_suites = Some(parsed);
        Ok(self)
    }

    pub fn with_payload_lens(&mut self, payload_lens: Vec<u16>) -> &mut Self {
        self.payload_lens = Some(payload_lens);
        self
    }

    pub fn with_config_ids(&mut self, config_ids: Vec<u8>) -> &mut Self {
        self.config_ids = config_ids;
        self
    }
}
