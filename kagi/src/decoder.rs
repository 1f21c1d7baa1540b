//! Decoder trait for type-safe conversions.
//!
//! The `Decoder` trait converts a source type `T` into a destination
//! type `D`. kagi uses it for every hop between key representations.
//!
//! # Design Pattern
//!
//! Two traits work together:
//!
//! 1. `Decoder<T, D>` - performs the conversion
//! 2. `DecodableFrom<T>` - marker trait declaring that `D` may be built from `T`
//!
//! # Implementation Guide
//!
//! ```no_run
//! use kagi::decoder::{Decoder, DecodableFrom};
//!
//! struct Armored(String);
//! struct Payload(Vec<u8>);
//!
//! #[derive(Debug)]
//! struct PayloadError;
//!
//! impl DecodableFrom<Armored> for Payload {}
//!
//! impl Decoder<Armored, Payload> for Armored {
//!     type Error = PayloadError;
//!
//!     fn decode(&self) -> Result<Payload, Self::Error> {
//!         Ok(Payload(self.0.as_bytes().to_vec()))
//!     }
//! }
//! ```

/// Decoder trait for converting from type `T` to type `D`.
///
/// Implemented by the source type. The destination type must implement
/// `DecodableFrom<T>`.
///
/// # Examples
///
/// ```ignore
/// use kagi::decoder::Decoder;
/// use der::Der;
///
/// let bytes = vec![0x30, 0x06, 0x02, 0x01, 0x05, 0x02, 0x01, 0x03];
/// let der: Der = bytes.decode()?;
/// ```
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion fails. The conditions depend on
    /// the implementing type.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that type `D` can be decoded from type `T`.
///
/// It has no methods. Implementing it for a pair of types is what makes a
/// matching `Decoder` implementation legal, so a conversion that no crate
/// declared cannot be written by accident.
///
/// ```no_run
/// use kagi::decoder::DecodableFrom;
///
/// struct Text;
/// struct Block;
///
/// impl DecodableFrom<Text> for Block {}
/// ```
pub trait DecodableFrom<T> {}
