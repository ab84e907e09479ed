pub mod builder;
mod codec;
pub mod ech;
pub mod error;
pub mod extensions;
pub mod suites;

pub use builder::{GreaseEchConfig, GreaseEchConfigBuilder};
pub use ech::{
    EchClientHelloType, GreaseEncryptedClientHello, AEAD_TAG_OVERHEAD, ECH_EXTENSION_TYPE,
};
pub use error::{EchError, MalformedReason, Result};
pub use rustls as rustls_vendor;
pub use suites::{HpkeSymmetricCipherSuite, SuiteParseError};
