//! Key establishment for TLS 1.3: classical, post-quantum, and hybrid.
//!
//! All key exchange shapes are driven through the [`KeyShare`] trait.  A
//! handshake obtains a fresh share from [`create`] with the negotiated
//! group, then:
//!
//! - the initiator calls [`KeyShare::offer`], sends the bytes, and later
//!   calls [`KeyShare::finish`] on the responder's reply;
//! - the responder calls [`KeyShare::accept`] with the initiator's bytes,
//!   which produces both its own reply and the shared secret.
//!
//! For Diffie-Hellman shaped algorithms `accept` is just `offer` followed
//! by `finish`: there is no data dependency between the two public values.
//! Key encapsulation mechanisms are different; the responder's "public
//! value" is a ciphertext computed under the initiator's public key, so
//! KEM-backed shares override `accept` to encapsulate.  This asymmetry is
//! the reason `accept` exists as a distinct operation with a provided
//! default.

use log::debug;
use zeroize::Zeroize;

use crate::codec::Reader;
use crate::enums::NamedGroup;
use crate::error::Error;
use crate::groups::{self, EcCurve, GroupKind};
use crate::x509;

mod ec;
mod hybrid;
mod oqs_kem;
mod x25519;

use ec::EcKeyShare;
use hybrid::{Cecpq2KeyShare, HybridKeyShare};
use oqs_kem::OqsKeyShare;
use x25519::X25519KeyShare;

/// An in-progress key exchange.
///
/// A share starts out *fresh* (no private material).  `offer` and
/// `deserialize` arm it; `finish` consumes it.  Dropping a share in any
/// state zeroizes whatever private material it holds.
pub trait KeyShare: Send + Sync {
    /// The group this share operates in.
    fn group(&self) -> NamedGroup;

    /// Generate private material and emit our public contribution.
    ///
    /// Must be called at most once, before `finish`.
    fn offer(&mut self, out: &mut Vec<u8>) -> Result<(), Error>;

    /// Responder-side combined operation: emit our contribution into
    /// `out_pub` and derive the shared secret from `peer_key`.
    ///
    /// The provided implementation is correct for Diffie-Hellman shaped
    /// algorithms.  KEM shapes must override it: there `peer_key` is the
    /// initiator's public key and `out_pub` receives a ciphertext.
    fn accept(self: Box<Self>, out_pub: &mut Vec<u8>, peer_key: &[u8]) -> Result<SharedSecret, Error> {
        let mut this = self;
        this.offer(out_pub)?;
        this.finish(peer_key)
    }

    /// Initiator-side completion: derive the shared secret from the
    /// responder's reply.  Consumes the share.
    fn finish(self: Box<Self>, peer_key: &[u8]) -> Result<SharedSecret, Error>;

    /// Write the private state of an armed share, for later resumption.
    ///
    /// The encoding is `ASN.1 uint64 group id ‖ OCTET STRING private
    /// material`.  Only Diffie-Hellman shaped shares support this; the
    /// default refuses.
    fn serialize(&self, _out: &mut Vec<u8>) -> Result<(), Error> {
        Err(Error::KeyShareNotSerializable)
    }

    /// Arm a fresh share from serialized private material.
    ///
    /// The caller ([`create_from_serialized`]) has already consumed the
    /// group id; this reads the OCTET STRING that follows.
    fn deserialize(&mut self, _r: &mut Reader<'_>) -> Result<(), Error> {
        Err(Error::KeyShareNotSerializable)
    }
}

/// The result of completing a key exchange.
///
/// The contained secret is zeroized on drop.
pub struct SharedSecret {
    buf: Vec<u8>,
}

impl SharedSecret {
    /// Returns the shared secret as a slice of bytes.
    pub fn secret_bytes(&self) -> &[u8] {
        &self.buf
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.buf.zeroize();
    }
}

impl From<&[u8]> for SharedSecret {
    fn from(source: &[u8]) -> Self {
        Self {
            buf: source.to_vec(),
        }
    }
}

impl From<Vec<u8>> for SharedSecret {
    fn from(buf: Vec<u8>) -> Self {
        Self { buf }
    }
}

/// Instantiate a fresh key share for `group`.
///
/// Returns `None` for groups outside the registry and for groups whose
/// underlying post-quantum algorithm is disabled in the linked liboqs.
/// There is no fallback; a disabled algorithm is simply unavailable.
pub fn create(group: NamedGroup) -> Option<Box<dyn KeyShare>> {
    let info = groups::lookup_by_group(group)?;
    if !info.supported() {
        debug!("key share group {group:?} is not enabled");
        return None;
    }

    Some(match info.kind {
        GroupKind::Ec(EcCurve::P224) => Box::new(EcKeyShare::<p224::NistP224>::new(group)),
        GroupKind::Ec(EcCurve::P256) => Box::new(EcKeyShare::<p256::NistP256>::new(group)),
        GroupKind::Ec(EcCurve::P384) => Box::new(EcKeyShare::<p384::NistP384>::new(group)),
        GroupKind::Ec(EcCurve::P521) => Box::new(EcKeyShare::<p521::NistP521>::new(group)),
        GroupKind::X25519 => Box::new(X25519KeyShare::new()),
        GroupKind::Cecpq2 => Box::new(Cecpq2KeyShare::new()?),
        GroupKind::Oqs(alg) => Box::new(OqsKeyShare::new(group, alg)?),
        GroupKind::Hybrid { classical, kem } => {
            Box::new(HybridKeyShare::new(group, classical, kem)?)
        }
    })
}

/// Reconstruct an armed key share from its serialized form.
///
/// Parses the leading ASN.1 uint64 group id, instantiates the share via
/// [`create`], and hands the remainder to its `deserialize`.
pub fn create_from_serialized(r: &mut Reader<'_>) -> Option<Box<dyn KeyShare>> {
    let group = x509::read_asn1_uint64(r).ok()?;
    if group > u64::from(u16::MAX) {
        return None;
    }

    let mut share = create(NamedGroup::from(group as u16))?;
    share.deserialize(r).ok()?;
    Some(share)
}
