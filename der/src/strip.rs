//! Removing the X.509 envelope around an RSA public key.
//!
//! Keystores import RSA public keys in their PKCS#1 form:
//!
//! ```text
//! RSAPublicKey ::= SEQUENCE {
//!     modulus           INTEGER,
//!     publicExponent    INTEGER }
//! ```
//!
//! PEM files labelled `PUBLIC KEY` carry the same key wrapped in a
//! `SubjectPublicKeyInfo`:
//!
//! ```text
//! SubjectPublicKeyInfo ::= SEQUENCE {
//!     algorithm         AlgorithmIdentifier,   -- rsaEncryption, NULL
//!     subjectPublicKey  BIT STRING }           -- DER of RSAPublicKey
//! ```
//!
//! [`strip_key_header`] accepts either and always returns the PKCS#1 bytes.

use crate::error::Error;
use crate::{Tag, Tlv};

/// Size of the smallest possible `RSAPublicKey`:
/// `30 06 02 01 xx 02 01 xx`.
pub const MIN_ENVELOPE_LEN: usize = 8;

/// DER content octets of `rsaEncryption` (1.2.840.113549.1.1.1).
pub const RSA_ENCRYPTION_OID: [u8; 9] = [0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01];

/// Returns the PKCS#1 `RSAPublicKey` bytes contained in `raw`.
///
/// - A SEQUENCE of exactly two INTEGERs is already stripped and is
///   returned unchanged, so the function is idempotent.
/// - A `SubjectPublicKeyInfo` whose algorithm is `rsaEncryption` yields the
///   content of its BIT STRING, which must itself be an `RSAPublicKey`.
///
/// # Errors
///
/// - [`Error::TooShort`] below [`MIN_ENVELOPE_LEN`] bytes
/// - [`Error::UnexpectedTag`] when `raw` does not start with a SEQUENCE
/// - [`Error::Parser`] / [`Error::TrailingData`] for broken DER
/// - [`Error::NestingTooDeep`] past [`MAX_DEPTH`](crate::MAX_DEPTH) levels
/// - [`Error::UnsupportedAlgorithm`] for non-RSA `SubjectPublicKeyInfo`
/// - [`Error::InvalidBitString`] when the BIT STRING has unused bits
/// - [`Error::UnrecognizedEnvelope`] for any other structure
pub fn strip_key_header(raw: &[u8]) -> Result<Vec<u8>, Error> {
    let root = parse_envelope(raw)?;
    let children = root.children().unwrap_or_default();

    if is_rsa_public_key(children) {
        return Ok(raw.to_vec());
    }

    match children {
        [algorithm, key] if algorithm.tag() == Tag::Sequence && key.tag() == Tag::BitString => {
            let oid = algorithm
                .children()
                .and_then(|c| c.first())
                .filter(|t| t.tag() == Tag::ObjectIdentifier)
                .and_then(Tlv::data)
                .ok_or(Error::UnrecognizedEnvelope)?;
            if oid != RSA_ENCRYPTION_OID {
                return Err(Error::UnsupportedAlgorithm(oid.to_vec()));
            }

            let (&unused_bits, payload) = key
                .data()
                .and_then(<[u8]>::split_first)
                .ok_or(Error::UnrecognizedEnvelope)?;
            if unused_bits != 0 {
                return Err(Error::InvalidBitString(unused_bits));
            }

            validate_rsa_public_key(payload)?;
            Ok(payload.to_vec())
        }
        _ => Err(Error::UnrecognizedEnvelope),
    }
}

/// Checks that `bytes` is exactly one PKCS#1 `RSAPublicKey`.
pub fn validate_rsa_public_key(bytes: &[u8]) -> Result<(), Error> {
    let root = parse_envelope(bytes)?;
    if is_rsa_public_key(root.children().unwrap_or_default()) {
        Ok(())
    } else {
        Err(Error::UnrecognizedEnvelope)
    }
}

fn parse_envelope(raw: &[u8]) -> Result<Tlv, Error> {
    if raw.len() < MIN_ENVELOPE_LEN {
        return Err(Error::TooShort {
            len: raw.len(),
            min: MIN_ENVELOPE_LEN,
        });
    }

    let tag = Tag::from(raw[0]);
    if tag != Tag::Sequence {
        return Err(Error::UnexpectedTag {
            expected: Tag::Sequence,
            actual: tag,
        });
    }

    let (rest, root) = Tlv::parse(raw)?;
    if !rest.is_empty() {
        return Err(Error::TrailingData(rest.len()));
    }
    Ok(root)
}

fn is_rsa_public_key(children: &[Tlv]) -> bool {
    children.len() == 2 && children.iter().all(|t| t.tag() == Tag::Integer)
}

#[cfg(test)]
mod tests {
    use kagi::decoder::Decoder;
    use pem::Pem;
    use rstest::rstest;

    use super::{MIN_ENVELOPE_LEN, strip_key_header, validate_rsa_public_key};
    use crate::error::Error;
    use crate::{MAX_DEPTH, Tag};

    const SPKI_RSA: &str = r"-----BEGIN PUBLIC KEY-----
MIGfMA0GCSqGSIb3DQEBAQUAA4GNADCBiQKBgQC/6p3ppxFhdG/vpyPV+3pwDcnt
QPhCfALA+oEnhS+9hb4YjG0mZ18KZSR7N9xhMVb8/Woal+8i33XyRnx5pnf3ZzLt
IZhaBbGA2+xkUb1cpB4msbfQ8lFLYhamApAdIHksWROVLtDA8rGb+XPStL6Hv9W9
MlyZnrviRAyEhPDlUQIDAQAB
-----END PUBLIC KEY-----
";
    const PKCS1_RSA: &str = r"-----BEGIN RSA PUBLIC KEY-----
MIGJAoGBAL/qnemnEWF0b++nI9X7enANye1A+EJ8AsD6gSeFL72FvhiMbSZnXwpl
JHs33GExVvz9ahqX7yLfdfJGfHmmd/dnMu0hmFoFsYDb7GRRvVykHiaxt9DyUUti
FqYCkB0geSxZE5Uu0MDysZv5c9K0voe/1b0yXJmeu+JEDISE8OVRAgMBAAE=
-----END RSA PUBLIC KEY-----
";
    const SPKI_EC: &str = r"-----BEGIN PUBLIC KEY-----
MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEh4cFh27r0dqTKzNuqq4E1Qb7B3x8
SfWNlLMxec/i5t40h/ckMzyZsI2+DQPklmJ99G4mjbu0TnuSQTpUG9C1Jw==
-----END PUBLIC KEY-----
";

    // offset of the BIT STRING unused-bits octet in SPKI_RSA
    const SPKI_UNUSED_BITS_OFFSET: usize = 21;

    fn der_of(text: &str) -> Vec<u8> {
        let pem: Pem = text.parse().unwrap();
        pem.decode().unwrap()
    }

    #[test]
    fn test_strip_spki() {
        let stripped = strip_key_header(&der_of(SPKI_RSA)).unwrap();
        assert_eq!(der_of(PKCS1_RSA), stripped);
        assert_eq!(140, stripped.len());
    }

    #[test]
    fn test_strip_pkcs1_unchanged() {
        let pkcs1 = der_of(PKCS1_RSA);
        assert_eq!(pkcs1, strip_key_header(&pkcs1).unwrap());
    }

    #[test]
    fn test_strip_idempotent() {
        let once = strip_key_header(&der_of(SPKI_RSA)).unwrap();
        let twice = strip_key_header(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[rstest]
    #[case::smallest(vec![0x30, 0x06, 0x02, 0x01, 0x07, 0x02, 0x01, 0x03])]
    #[case::long_form_length(vec![0x30, 0x81, 0x06, 0x02, 0x01, 0x07, 0x02, 0x01, 0x03])]
    fn test_strip_minimal_pkcs1(#[case] input: Vec<u8>) {
        assert_eq!(input, strip_key_header(&input).unwrap());
    }

    #[rstest]
    #[case::empty(vec![])]
    #[case::one_byte(vec![0x30])]
    #[case::seven_bytes(vec![0x30, 0x05, 0x02, 0x01, 0x07, 0x02, 0x00])]
    fn test_strip_too_short(#[case] input: Vec<u8>) {
        assert_eq!(
            Err(Error::TooShort {
                len: input.len(),
                min: MIN_ENVELOPE_LEN
            }),
            strip_key_header(&input)
        );
    }

    #[rstest]
    #[case::integer(vec![0x02, 0x06, 0x02, 0x01, 0x07, 0x02, 0x01, 0x03], Tag::Integer)]
    #[case::set(vec![0x31, 0x06, 0x02, 0x01, 0x07, 0x02, 0x01, 0x03], Tag::Set)]
    #[case::context(vec![0xa0, 0x06, 0x02, 0x01, 0x07, 0x02, 0x01, 0x03], Tag::Other(0xa0))]
    fn test_strip_unexpected_tag(#[case] input: Vec<u8>, #[case] actual: Tag) {
        assert_eq!(
            Err(Error::UnexpectedTag {
                expected: Tag::Sequence,
                actual
            }),
            strip_key_header(&input)
        );
    }

    #[test]
    fn test_strip_trailing_data() {
        let mut input = der_of(PKCS1_RSA);
        input.extend_from_slice(&[0x00, 0x00]);
        assert_eq!(Err(Error::TrailingData(2)), strip_key_header(&input));
    }

    #[test]
    fn test_strip_truncated() {
        let input = der_of(SPKI_RSA);
        assert!(matches!(
            strip_key_header(&input[..100]),
            Err(Error::Parser(_))
        ));
    }

    #[rstest]
    #[case::one_past_limit(MAX_DEPTH + 1)]
    #[case::deep(20_000)]
    fn test_strip_nesting_too_deep(#[case] depth: usize) {
        let mut input = Vec::with_capacity(depth * 6 + 2);
        for level in (0..depth).rev() {
            input.extend_from_slice(&[0x30, 0x84]);
            input.extend_from_slice(&((level * 6 + 2) as u32).to_be_bytes());
        }
        input.extend_from_slice(&[0x05, 0x00]);

        assert_eq!(
            Err(Error::NestingTooDeep(MAX_DEPTH)),
            strip_key_header(&input)
        );
    }

    #[test]
    fn test_strip_ec_key_unsupported() {
        assert_eq!(
            Err(Error::UnsupportedAlgorithm(vec![
                0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01
            ])),
            strip_key_header(&der_of(SPKI_EC))
        );
    }

    #[test]
    fn test_strip_unused_bits() {
        let mut input = der_of(SPKI_RSA);
        assert_eq!(0x00, input[SPKI_UNUSED_BITS_OFFSET]);
        input[SPKI_UNUSED_BITS_OFFSET] = 0x01;
        assert_eq!(Err(Error::InvalidBitString(1)), strip_key_header(&input));
    }

    #[rstest]
    #[case::three_integers(vec![0x30, 0x09, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02, 0x02, 0x01, 0x03])]
    #[case::integer_and_octets(vec![0x30, 0x06, 0x02, 0x01, 0x07, 0x04, 0x01, 0x00])]
    #[case::empty_algorithm(vec![0x30, 0x09, 0x30, 0x00, 0x03, 0x05, 0x00, 0x02, 0x01, 0x07, 0x00])]
    fn test_strip_unrecognized(#[case] input: Vec<u8>) {
        assert_eq!(Err(Error::UnrecognizedEnvelope), strip_key_header(&input));
    }

    #[test]
    fn test_validate_rsa_public_key() {
        assert!(validate_rsa_public_key(&der_of(PKCS1_RSA)).is_ok());
        assert_eq!(
            Err(Error::UnrecognizedEnvelope),
            validate_rsa_public_key(&der_of(SPKI_RSA))
        );
    }
}
