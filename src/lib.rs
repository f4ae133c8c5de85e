//! # pq-keyshare
//!
//! The key establishment and signature algorithm plumbing of a TLS 1.3
//! stack with post-quantum ambitions.
//!
//! Three kinds of key exchange hide behind one interface: elliptic curve
//! Diffie-Hellman over the NIST curves, raw X25519, and KEM-style
//! encapsulation through [liboqs].  Hybrid groups concatenate one
//! classical and one post-quantum exchange so the connection stays secure
//! if *either* side of the pairing holds up.  See the [`kx`] module for
//! the `offer` / `accept` / `finish` contract and [`groups`] for the
//! registry tying wire identifiers, NIDs and names together.
//!
//! Orthogonally, the [`sigalg`] module maps between X.509
//! `AlgorithmIdentifier`s and (digest, key type) pairs on certificate
//! signing and verification, treating Ed25519 and the post-quantum
//! signature schemes uniformly as "digestless".  [`spki`] rounds this out
//! with the RFC 8410 raw key encodings those schemes use.
//!
//! This crate deliberately stops at the byte level: it produces and
//! consumes key shares and algorithm identifiers, and leaves the
//! handshake state machine, certificate chains and record protection to
//! its callers.
//!
//! [liboqs]: https://openquantumsafe.org/

// Require docs on everything.
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![warn(clippy::use_self)]

#[macro_use]
mod macros;

pub mod codec;
mod enums;
pub mod error;
pub mod groups;
pub mod kx;
pub mod nid;
pub mod sigalg;
pub mod spki;
mod x509;

pub use enums::{AlertDescription, NamedGroup};
pub use error::Error;
pub use kx::{KeyShare, SharedSecret};
