//! # kagi
//!
//! Core traits for the kagi RSA public key toolkit.
//!
//! This crate defines the `Decoder` trait that every other kagi crate uses
//! to move key material from one representation to the next.
//!
//! ## Overview
//!
//! A public key travels through these representations:
//! ```text
//! &str → Pem → Vec<u8> → Der
//! ```
//!
//! Each step uses the `Decoder` trait. The `pem` crate turns armored text
//! into `Pem` blocks and base64-decodes them, the `der` crate parses the
//! resulting bytes into a TLV tree.
//!
//! ## Type Safety
//!
//! `Decoder` is constrained by the `DecodableFrom` marker trait, so only
//! conversions that some crate has explicitly declared can be written.
//!
//! ## Example
//!
//! ```ignore
//! use kagi::decoder::Decoder;
//! use der::Der;
//! use pem::Pem;
//!
//! let text = "-----BEGIN PUBLIC KEY-----\n...";
//! let pem: Pem = text.decode()?;
//! let bytes: Vec<u8> = pem.decode()?;
//! let der: Der = bytes.decode()?;
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
