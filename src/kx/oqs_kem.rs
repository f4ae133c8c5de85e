//! Key shares backed by liboqs KEMs.

use oqs::kem::{Algorithm, Kem, SecretKey};

use super::{KeyShare, SharedSecret};
use crate::enums::NamedGroup;
use crate::error::Error;

/// A key share for a pure post-quantum KEM.
///
/// The algorithm handle is read-only after construction; all lengths
/// (public key, ciphertext, shared secret) are fixed by the algorithm and
/// enforced before any primitive call.
pub(super) struct OqsKeyShare {
    group: NamedGroup,
    kem: Kem,
    secret: Option<SecretKey>,
}

impl OqsKeyShare {
    /// Construction is only reachable through the factory, which has
    /// already checked that `alg` is enabled in the linked liboqs.
    pub(super) fn new(group: NamedGroup, alg: Algorithm) -> Option<Self> {
        Some(Self {
            group,
            kem: Kem::new(alg).ok()?,
            secret: None,
        })
    }

    pub(super) fn public_key_len(&self) -> usize {
        self.kem.length_public_key()
    }

    pub(super) fn ciphertext_len(&self) -> usize {
        self.kem.length_ciphertext()
    }
}

impl KeyShare for OqsKeyShare {
    fn group(&self) -> NamedGroup {
        self.group
    }

    // Initiator sends its public key to the responder.
    fn offer(&mut self, out: &mut Vec<u8>) -> Result<(), Error> {
        debug_assert!(self.secret.is_none());
        if self.secret.is_some() {
            return Err(Error::InconsistentKeyShareState);
        }

        let (public, secret) = self
            .kem
            .keypair()
            .map_err(|_| Error::PrivateKeyOperationFailed)?;
        out.extend_from_slice(public.as_ref());
        self.secret = Some(secret);
        Ok(())
    }

    // Responder derives the shared secret under the initiator's public
    // key and sends back the ciphertext.  Note the peer's bytes here are
    // a public key, not a ciphertext.
    fn accept(self: Box<Self>, out_pub: &mut Vec<u8>, peer_key: &[u8]) -> Result<SharedSecret, Error> {
        if peer_key.len() != self.kem.length_public_key() {
            return Err(Error::InvalidPeerKeyShare);
        }

        let peer = self
            .kem
            .public_key_from_bytes(peer_key)
            .ok_or(Error::InvalidPeerKeyShare)?;
        let (ciphertext, shared) = self
            .kem
            .encapsulate(peer)
            .map_err(|_| Error::InvalidPeerKeyShare)?;

        out_pub.extend_from_slice(ciphertext.as_ref());
        Ok(SharedSecret::from(shared.as_ref()))
    }

    // Initiator decapsulates the responder's ciphertext with the retained
    // secret key.
    fn finish(self: Box<Self>, peer_key: &[u8]) -> Result<SharedSecret, Error> {
        debug_assert!(self.secret.is_some());
        if peer_key.len() != self.kem.length_ciphertext() {
            return Err(Error::InvalidPeerKeyShare);
        }

        let secret = self
            .secret
            .as_ref()
            .ok_or(Error::InconsistentKeyShareState)?;
        let ciphertext = self
            .kem
            .ciphertext_from_bytes(peer_key)
            .ok_or(Error::InvalidPeerKeyShare)?;
        let shared = self
            .kem
            .decapsulate(secret, ciphertext)
            .map_err(|_| Error::InvalidPeerKeyShare)?;

        Ok(SharedSecret::from(shared.as_ref()))
    }
}
