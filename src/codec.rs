use rustls::internal::msgs::codec::{Codec, Reader};

use crate::error::{EchError, Result};
use crate::suites::HpkeSymmetricCipherSuite;

fn truncated(field: &'static str, needed: usize, available: usize) -> EchError {
    EchError::Truncated {
        field,
        needed,
        available,
    }
}

pub(crate) fn read_u8(r: &mut Reader<'_>, field: &'static str) -> Result<u8> {
    let left = r.left();
    u8::read(r).map_err(|_| truncated(field, 1, left))
}

pub(crate) fn read_u16(r: &mut Reader<'_>, field: &'static str) -> Result<u16> {
    let left = r.left();
    u16::read(r).map_err(|_| truncated(field, 2, left))
}

pub(crate) fn read_cipher_suite(r: &mut Reader<'_>) -> Result<HpkeSymmetricCipherSuite> {
    let left = r.left();
    HpkeSymmetricCipherSuite::read(r).map_err(|_| truncated("cipher suite", 4, left))
}

/// Reads a 16-bit length followed by that many bytes.
pub(crate) fn read_u16_prefixed<'a>(r: &mut Reader<'a>, field: &'static str) -> Result<&'a [u8]> {
    let len = read_u16(r, field)? as usize;
    let left = r.left();
    r.take(len).ok_or_else(|| truncated(field, len, left))
}

pub(crate) fn checked_u16(len: usize, field: &'static str) -> Result<u16> {
    u16::try_from(len).map_err(|_| EchError::FieldTooLong { field, len })
}

/// Writes a 16-bit length prefix and the bytes it covers.
pub(crate) fn put_u16_prefixed(
    out: &mut Vec<u8>,
    data: &[u8],
    field: &'static str,
) -> Result<()> {
    checked_u16(data.len(), field)?.encode(out);
    out.extend_from_slice(data);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_read_fields() {
        let mut r = Reader::init(&[0x01, 0x00, 0x01, 0x00, 0x03, 0x00, 0x02, 0xaa, 0xbb]);
        assert_eq!(read_u8(&mut r, "a").unwrap(), 1);
        let suite = read_cipher_suite(&mut r).unwrap();
        assert_eq!(u16::from(suite.kdf_id), 1);
        assert_eq!(u16::from(suite.aead_id), 3);
        assert_eq!(read_u16_prefixed(&mut r, "c").unwrap(), &[0xaa, 0xbb]);
        assert_eq!(r.used(), 9);
        assert!(!r.any_left());
    }

    #[test]
    fn test_read_truncated() {
        let mut r = Reader::init(&[0x00, 0x03, 0xaa]);
        assert_eq!(
            read_u16_prefixed(&mut r, "payload"),
            Err(EchError::Truncated {
                field: "payload",
                needed: 3,
                available: 1
            })
        );
        let mut r = Reader::init(&[0x00]);
        assert_eq!(
            read_u16(&mut r, "length"),
            Err(EchError::Truncated {
                field: "length",
                needed: 2,
                available: 1
            })
        );
    }

    #[test]
    fn test_put_prefixed_too_long() {
        let mut out = Vec::new();
        let data = vec![0u8; 0x10000];
        assert_eq!(
            put_u16_prefixed(&mut out, &data, "payload"),
            Err(EchError::FieldTooLong {
                field: "payload",
                len: 0x10000
            })
        );
        assert!(out.is_empty());
        put_u16_prefixed(&mut out, &[7, 8], "payload").unwrap();
        assert_eq!(out, vec![0, 2, 7, 8]);
    }
}
