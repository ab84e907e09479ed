use crate::builder::GreaseEchConfig;
use crate::ech::{GreaseEncryptedClientHello, ECH_EXTENSION_TYPE};
use crate::error::Result;
use rustls::internal::msgs::enums::ExtensionType;
use rustls::internal::msgs::handshake::ClientExtension;

impl GreaseEncryptedClientHello {
    /// Wraps the extension for a rustls ClientHello; rustls writes the header.
    pub fn to_client_extension(&self) -> Result<ClientExtension> {
        Ok(ClientExtension::unknown(
            ExtensionType::Unknown(ECH_EXTENSION_TYPE),
            self.body_bytes()?,
        ))
    }
}

/// GREASE ECH with the default policy, ready to go into a ClientHello.
pub fn grease_ech() -> Result<ClientExtension> {
    GreaseEchConfig::default()
        .generate_default()
        .to_client_extension()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ech::test::reference;
    use crate::error::EchError;
    use crate::suites::cipher_suite;
    use rustls::internal::msgs::enums::{HpkeAead, HpkeKdf};

    #[test]
    fn test_grease_ech_extension_type() {
        let ext = grease_ech().unwrap();
        assert_eq!(u16::from(ext.get_ext_type()), ECH_EXTENSION_TYPE);
        let ext = reference().to_client_extension().unwrap();
        assert_eq!(u16::from(ext.get_ext_type()), ECH_EXTENSION_TYPE);
    }

    #[test]
    fn test_client_extension_body_too_long() {
        let suite = cipher_suite(HpkeKdf::HKDF_SHA512, HpkeAead::AES_128_GCM);
        let ech = GreaseEncryptedClientHello::from_parts(
            vec![suite],
            suite,
            0,
            vec![0; 133],
            vec![u16::MAX - 16],
            vec![0; u16::MAX as usize],
        );
        assert!(matches!(
            ech.to_client_extension(),
            Err(EchError::FieldTooLong {
                field: "extension body",
                ..
            })
        ));
    }
}
