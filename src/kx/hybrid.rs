//! Key shares combining a classical group with a post-quantum KEM.
//!
//! The hybrid wire format follows
//! <https://tools.ietf.org/html/draft-stebila-tls-hybrid-design-03#section-3.2>:
//! each direction carries `u16 classical_len ‖ classical ‖ u16 pq_len ‖ pq`,
//! and the shared secret is the concatenation `classical ‖ pq`.  CECPQ2
//! predates that draft and concatenates its two fixed-size parts with no
//! length prefixes.

use oqs::kem::Algorithm;

use super::oqs_kem::OqsKeyShare;
use super::x25519::X25519KeyShare;
use super::{KeyShare, SharedSecret, create};
use crate::codec::{Reader, put_u16_prefixed, read_u16_prefixed};
use crate::enums::NamedGroup;
use crate::error::Error;

pub(super) struct HybridKeyShare {
    group: NamedGroup,
    classical: Box<dyn KeyShare>,
    post_quantum: Box<OqsKeyShare>,
}

impl HybridKeyShare {
    pub(super) fn new(group: NamedGroup, classical: NamedGroup, alg: Algorithm) -> Option<Self> {
        Some(Self {
            group,
            classical: create(classical)?,
            // the sub-share's own group id is never put on the wire
            post_quantum: Box::new(OqsKeyShare::new(NamedGroup::Unknown(0), alg)?),
        })
    }
}

impl KeyShare for HybridKeyShare {
    fn group(&self) -> NamedGroup {
        self.group
    }

    fn offer(&mut self, out: &mut Vec<u8>) -> Result<(), Error> {
        let mut classical_offer = Vec::new();
        self.classical.offer(&mut classical_offer)?;

        let mut pq_offer = Vec::new();
        self.post_quantum.offer(&mut pq_offer)?;

        put_u16_prefixed(out, &classical_offer);
        put_u16_prefixed(out, &pq_offer);
        Ok(())
    }

    fn accept(self: Box<Self>, out_pub: &mut Vec<u8>, peer_key: &[u8]) -> Result<SharedSecret, Error> {
        let Self {
            group: _,
            classical,
            post_quantum,
        } = *self;

        let (classical_peer, pq_peer) = split_shares(peer_key)?;

        let mut classical_pub = Vec::new();
        let classical_secret = classical.accept(&mut classical_pub, classical_peer)?;

        let mut pq_pub = Vec::new();
        let pq_secret = post_quantum.accept(&mut pq_pub, pq_peer)?;

        put_u16_prefixed(out_pub, &classical_pub);
        put_u16_prefixed(out_pub, &pq_pub);
        Ok(concat_secrets(classical_secret, pq_secret))
    }

    fn finish(self: Box<Self>, peer_key: &[u8]) -> Result<SharedSecret, Error> {
        let Self {
            group: _,
            classical,
            post_quantum,
        } = *self;

        let (classical_peer, pq_peer) = split_shares(peer_key)?;
        let classical_secret = classical.finish(classical_peer)?;
        let pq_secret = post_quantum.finish(pq_peer)?;
        Ok(concat_secrets(classical_secret, pq_secret))
    }
}

/// Split a hybrid frame into its classical and post-quantum parts.
///
/// The two length-prefixed segments must exactly span the input.
fn split_shares(peer_key: &[u8]) -> Result<(&[u8], &[u8]), Error> {
    let mut r = Reader::init(peer_key);
    let classical = read_u16_prefixed(&mut r).map_err(|_| Error::InvalidPeerKeyShare)?;
    let post_quantum = read_u16_prefixed(&mut r).map_err(|_| Error::InvalidPeerKeyShare)?;
    if r.any_left() {
        return Err(Error::InvalidPeerKeyShare);
    }
    Ok((classical, post_quantum))
}

fn concat_secrets(classical: SharedSecret, post_quantum: SharedSecret) -> SharedSecret {
    SharedSecret::from(
        [
            classical.secret_bytes(),
            post_quantum.secret_bytes(),
        ]
        .concat(),
    )
}

/// CECPQ2: X25519 and NTRU-HRSS-701 glued back to back.
///
/// The X25519 share always comes first and is always 32 bytes, so no
/// framing is needed: the peer's contribution is `32 ‖ hrss_public` on the
/// accept path and `32 ‖ hrss_ciphertext` on the finish path.
pub(super) struct Cecpq2KeyShare {
    x25519: Box<X25519KeyShare>,
    ntru: Box<OqsKeyShare>,
}

const X25519_SHARE_LEN: usize = 32;

impl Cecpq2KeyShare {
    pub(super) fn new() -> Option<Self> {
        Some(Self {
            x25519: Box::new(X25519KeyShare::new()),
            ntru: Box::new(OqsKeyShare::new(
                NamedGroup::Unknown(0),
                Algorithm::NtruHrss701,
            )?),
        })
    }
}

impl KeyShare for Cecpq2KeyShare {
    fn group(&self) -> NamedGroup {
        NamedGroup::CECPQ2
    }

    fn offer(&mut self, out: &mut Vec<u8>) -> Result<(), Error> {
        self.x25519.offer(out)?;
        self.ntru.offer(out)
    }

    fn accept(self: Box<Self>, out_pub: &mut Vec<u8>, peer_key: &[u8]) -> Result<SharedSecret, Error> {
        let Self { x25519, ntru } = *self;

        if peer_key.len() != X25519_SHARE_LEN + ntru.public_key_len() {
            return Err(Error::InvalidPeerKeyShare);
        }
        let (x25519_peer, ntru_peer) = peer_key.split_at(X25519_SHARE_LEN);

        let x25519_secret = x25519.accept(out_pub, x25519_peer)?;
        let ntru_secret = ntru.accept(out_pub, ntru_peer)?;
        Ok(concat_secrets(x25519_secret, ntru_secret))
    }

    fn finish(self: Box<Self>, peer_key: &[u8]) -> Result<SharedSecret, Error> {
        let Self { x25519, ntru } = *self;

        if peer_key.len() != X25519_SHARE_LEN + ntru.ciphertext_len() {
            return Err(Error::InvalidPeerKeyShare);
        }
        let (x25519_peer, ntru_peer) = peer_key.split_at(X25519_SHARE_LEN);

        let x25519_secret = x25519.finish(x25519_peer)?;
        let ntru_secret = ntru.finish(ntru_peer)?;
        Ok(concat_secrets(x25519_secret, ntru_secret))
    }
}
