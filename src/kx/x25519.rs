//! X25519 key shares (RFC 7748).

use log::warn;
use rand_core::OsRng;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

use super::{KeyShare, SharedSecret};
use crate::codec::Reader;
use crate::enums::NamedGroup;
use crate::error::{Error, InvalidMessage};
use crate::x509;

const KEY_LEN: usize = 32;

pub(super) struct X25519KeyShare {
    secret: Option<StaticSecret>,
}

impl X25519KeyShare {
    pub(super) fn new() -> Self {
        Self { secret: None }
    }
}

impl KeyShare for X25519KeyShare {
    fn group(&self) -> NamedGroup {
        NamedGroup::X25519
    }

    fn offer(&mut self, out: &mut Vec<u8>) -> Result<(), Error> {
        debug_assert!(self.secret.is_none());
        if self.secret.is_some() {
            return Err(Error::InconsistentKeyShareState);
        }

        let secret = StaticSecret::random_from_rng(OsRng);
        out.extend_from_slice(PublicKey::from(&secret).as_bytes());
        self.secret = Some(secret);
        Ok(())
    }

    fn finish(self: Box<Self>, peer_key: &[u8]) -> Result<SharedSecret, Error> {
        debug_assert!(self.secret.is_some());
        let secret = self
            .secret
            .as_ref()
            .ok_or(Error::InconsistentKeyShareState)?;

        let peer: [u8; KEY_LEN] = peer_key
            .try_into()
            .map_err(|_| Error::InvalidPeerKeyShare)?;

        let shared = secret.diffie_hellman(&PublicKey::from(peer));
        // Reject the all-zero output produced by small-order peer points.
        if !shared.was_contributory() {
            warn!("X25519 peer key share was not contributory");
            return Err(Error::InvalidPeerKeyShare);
        }

        Ok(SharedSecret::from(&shared.as_bytes()[..]))
    }

    fn serialize(&self, out: &mut Vec<u8>) -> Result<(), Error> {
        let secret = self
            .secret
            .as_ref()
            .ok_or(Error::InconsistentKeyShareState)?;

        x509::put_asn1_uint64(out, u64::from(u16::from(self.group())));
        x509::put_octet_string(out, secret.as_bytes());
        Ok(())
    }

    fn deserialize(&mut self, r: &mut Reader<'_>) -> Result<(), Error> {
        debug_assert!(self.secret.is_none());
        let body = x509::read_octet_string(r)?;
        let mut key: [u8; KEY_LEN] = body
            .try_into()
            .map_err(|_| InvalidMessage::InvalidDer("X25519 private key"))?;
        self.secret = Some(StaticSecret::from(key));
        key.zeroize();
        Ok(())
    }
}
