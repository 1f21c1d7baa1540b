use kagi::decoder::{DecodableFrom, Decoder};
use nom::{IResult, Parser};
use pem::Pem;

pub mod error;
mod strip;

use error::Error;

/// Deepest SEQUENCE/SET nesting accepted by the parser. Key envelopes
/// need three levels.
pub const MAX_DEPTH: usize = 8;

pub use strip::{MIN_ENVELOPE_LEN, RSA_ENCRYPTION_OID, strip_key_header, validate_rsa_public_key};

/// A sequence of top level DER elements.
#[derive(Debug, Clone)]
pub struct Der {
    elements: Vec<Tlv>,
}

impl Der {
    pub fn parse(input: &[u8]) -> Result<Der, Error> {
        let mut elements = Vec::new();
        let mut input = input;
        while !input.is_empty() {
            let (rest, tlv) = Tlv::parse(input)?;
            input = rest;
            elements.push(tlv);
        }
        Ok(Der { elements })
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.elements
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        Der::parse(self)
    }
}

impl DecodableFrom<Pem> for Der {}

impl Decoder<Pem, Der> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        let bytes: Vec<u8> = self.decode()?;
        Der::parse(&bytes)
    }
}

// Universal class tags only; anything else is carried as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    Sequence,
    Set,
    Other(u8),
}

impl From<u8> for Tag {
    fn from(value: u8) -> Self {
        match value {
            0x02 => Self::Integer,
            0x03 => Self::BitString,
            0x04 => Self::OctetString,
            0x05 => Self::Null,
            0x06 => Self::ObjectIdentifier,
            0x30 => Self::Sequence,
            0x31 => Self::Set,
            _ => Tag::Other(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    length: u64,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Tlv(Vec<Tlv>),
    Data(Vec<u8>),
}

impl Tlv {
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Nested elements of a SEQUENCE or SET.
    pub fn children(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Tlv(tlvs) => Some(tlvs),
            Value::Data(_) => None,
        }
    }

    /// Content octets of a primitive element.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlv(_) => None,
        }
    }

    pub(crate) fn parse(input: &[u8]) -> Result<(&[u8], Tlv), Error> {
        Self::parse_nested(input, 0)
    }

    fn parse_nested(input: &[u8], depth: usize) -> Result<(&[u8], Tlv), Error> {
        let (input, tag) = parse_tag(input)?;
        let (input, length) = parse_length(input)?;
        let (input, data) =
            nom::bytes::complete::take::<_, _, nom::error::Error<&[u8]>>(length).parse(input)?;

        if tag.eq(&Tag::Sequence) || tag.eq(&Tag::Set) {
            if depth >= MAX_DEPTH {
                return Err(Error::NestingTooDeep(MAX_DEPTH));
            }
            // parse TLV recursively.
            let mut tlvs = Vec::new();
            let mut data = data;
            while !data.is_empty() {
                let (new_input, v) = Self::parse_nested(data, depth + 1)?;
                data = new_input;
                tlvs.push(v);
            }

            return Ok((
                input,
                Tlv {
                    tag,
                    length,
                    value: Value::Tlv(tlvs),
                },
            ));
        }

        Ok((
            input,
            Tlv {
                tag,
                length,
                value: Value::Data(data.to_vec()),
            },
        ))
    }
}

fn parse_tag(input: &[u8]) -> IResult<&[u8], Tag> {
    let (input, n) = nom::number::be_u8().parse(input)?;
    Ok((input, Tag::from(n)))
}

fn parse_length(input: &[u8]) -> IResult<&[u8], u64> {
    let (rest, n) = nom::number::be_u8().parse(input)?;
    if n & 0x80 == 0x80 {
        // long form: the low 7 bits count the length octets that follow.
        // DER has no indefinite form, and more than 8 octets overflows u64.
        let count = n & 0x7f;
        if count == 0 || count > 8 {
            return Err(nom::Err::Failure(nom::error::Error::new(
                input,
                nom::error::ErrorKind::TooLarge,
            )));
        }
        let (rest, bs) = nom::bytes::complete::take(count).parse(rest)?;
        let n = bs.iter().fold(0u64, |n, &b| (n << 8) | b as u64);
        return Ok((rest, n));
    }
    // short form: 0-127
    Ok((rest, n as u64))
}
