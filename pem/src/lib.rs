pub mod error;
mod format;
mod scan;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use base64::{Engine, engine::general_purpose::STANDARD};
use error::Error;
use kagi::decoder::{DecodableFrom, Decoder};
use once_cell::sync::Lazy;
use regex::Regex;

pub use format::{DEFAULT_LINE_WIDTH, LineEnding, PemFormat};
pub use scan::{PemBlock, scan};

const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";
const RSA_PUBLIC_KEY_LABEL: &str = "RSA PUBLIC KEY";

static BOUNDARY: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^-----(BEGIN|END) ([A-Z0-9 ]+)-----\s*$").ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// X.509 SubjectPublicKeyInfo
    PublicKey,
    /// PKCS#1 RSA public key
    RSAPublicKey,
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::PublicKey => write!(f, "{}", PUBLIC_KEY_LABEL),
            Label::RSAPublicKey => write!(f, "{}", RSA_PUBLIC_KEY_LABEL),
        }
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PUBLIC_KEY_LABEL => Ok(Label::PublicKey),
            RSA_PUBLIC_KEY_LABEL => Ok(Label::RSAPublicKey),
            _ => Err(Error::InvalidLabel(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary<'a> {
    Begin(&'a str),
    End(&'a str),
}

impl<'a> Boundary<'a> {
    fn parse(line: &'a str) -> Option<Boundary<'a>> {
        let captured = BOUNDARY.as_ref()?.captures(line)?;
        let name = captured.get(2)?.as_str();
        match captured.get(1)?.as_str() {
            "BEGIN" => Some(Boundary::Begin(name)),
            _ => Some(Boundary::End(name)),
        }
    }
}

/*
ref: https://www.rfc-editor.org/rfc/rfc7468.html#section-3
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pem {
    label: Label,
    base64_data: String, // base64 encoded data
}

impl Pem {
    pub fn new(label: Label, base64_data: String) -> Self {
        Pem { label, base64_data }
    }

    pub fn from_bytes(label: Label, data: &[u8]) -> Self {
        let base64_data = STANDARD.encode(data);
        Pem { label, base64_data }
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn data(&self) -> &str {
        &self.base64_data
    }

    /// Writes the block using the given layout.
    ///
    /// Every line, including the footer, ends with the configured line
    /// ending.
    pub fn format(&self, format: &PemFormat) -> String {
        let eol = format.line_ending().as_str();
        let mut out = format!("-----BEGIN {}-----{}", self.label, eol);
        // base64 output is ASCII, so byte chunks are char boundaries
        for chunk in self.base64_data.as_bytes().chunks(format.line_width()) {
            out.extend(chunk.iter().map(|&b| b as char));
            out.push_str(eol);
        }
        out.push_str(&format!("-----END {}-----{}", self.label, eol));
        out
    }
}

impl Display for Pem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format(&PemFormat::default()))
    }
}

/// Trait for types that can be converted to PEM format
pub trait ToPem {
    /// The error type returned by to_pem
    type Error;

    /// Get the PEM label for this type
    fn pem_label(&self) -> Label;

    /// Convert to PEM format
    fn to_pem(&self) -> Result<Pem, Self::Error>;
}

/// Decodes standard-alphabet base64, ignoring any whitespace in `text`.
///
/// Used for PEM bodies and for keys handed over as bare base64 strings,
/// which often keep their original line breaks.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, Error> {
    let compact: String = text.split_whitespace().collect();
    STANDARD.decode(compact).map_err(Error::Base64Decode)
}

impl DecodableFrom<Pem> for Vec<u8> {}

impl Decoder<Pem, Vec<u8>> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Vec<u8>, Self::Error> {
        // This discards label information from Pem format.
        decode_base64(self.data())
    }
}

impl DecodableFrom<&str> for Pem {}

impl Decoder<&str, Pem> for &str {
    type Error = Error;

    fn decode(&self) -> Result<Pem, Self::Error> {
        Pem::from_str(self)
    }
}

fn is_base64_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=')
}

impl FromStr for Pem {
    type Err = Error;

    /// Parses the first armored block in `s`.
    ///
    /// Explanatory text before the `BEGIN` line is skipped. Base64 lines
    /// may carry trailing whitespace; blank lines inside the block are
    /// rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines();

        let label = loop {
            let line = lines
                .next()
                .ok_or(Error::MissingPreEncapsulationBoundary)?;
            match Boundary::parse(line) {
                Some(Boundary::Begin(name)) => break Label::from_str(name)?,
                Some(Boundary::End(_)) => return Err(Error::MissingPreEncapsulationBoundary),
                // TODO: keep explanatory text (RFC 7468 section 5.2) instead of dropping it
                None => continue,
            }
        };

        let mut base64_data = String::new();
        loop {
            let line = lines
                .next()
                .ok_or(Error::MissingPostEncapsulationBoundary)?;
            match Boundary::parse(line) {
                Some(Boundary::End(name)) => {
                    if Label::from_str(name)? != label {
                        return Err(Error::LabelMissMatch);
                    }
                    break;
                }
                Some(Boundary::Begin(_)) => return Err(Error::MissingPostEncapsulationBoundary),
                None => {}
            }

            let line = line.trim();
            if line.is_empty() {
                if base64_data.is_empty() {
                    return Err(Error::MissingData);
                }
                return Err(Error::InvalidBase64Line);
            }
            if !line.bytes().all(is_base64_char) {
                return Err(Error::InvalidBase64Line);
            }
            base64_data.push_str(line);
        }

        if base64_data.is_empty() {
            return Err(Error::MissingData);
        }

        Ok(Pem { label, base64_data })
    }
}
