//! Elliptic curve key shares over the NIST curves.

use elliptic_curve::ecdh::diffie_hellman;
use elliptic_curve::sec1::{FromEncodedPoint, ModulusSize, ToEncodedPoint};
use elliptic_curve::{CurveArithmetic, FieldBytesSize, PublicKey, SecretKey};
use log::warn;
use rand_core::OsRng;
use zeroize::Zeroize;

use super::{KeyShare, SharedSecret};
use crate::codec::Reader;
use crate::enums::NamedGroup;
use crate::error::{Error, InvalidMessage};
use crate::x509;

/// Leading byte of a SEC1 uncompressed point.
const UNCOMPRESSED: u8 = 0x04;

pub(super) struct EcKeyShare<C: CurveArithmetic> {
    group: NamedGroup,
    secret: Option<SecretKey<C>>,
}

impl<C: CurveArithmetic> EcKeyShare<C> {
    pub(super) fn new(group: NamedGroup) -> Self {
        Self {
            group,
            secret: None,
        }
    }
}

impl<C> KeyShare for EcKeyShare<C>
where
    C: CurveArithmetic,
    C::AffinePoint: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
    SecretKey<C>: Send + Sync,
{
    fn group(&self) -> NamedGroup {
        self.group
    }

    fn offer(&mut self, out: &mut Vec<u8>) -> Result<(), Error> {
        debug_assert!(self.secret.is_none());
        if self.secret.is_some() {
            return Err(Error::InconsistentKeyShareState);
        }

        // Uniform scalar in [1, n).
        let secret = SecretKey::<C>::random(&mut OsRng);
        out.extend_from_slice(
            secret
                .public_key()
                .to_encoded_point(false)
                .as_bytes(),
        );
        self.secret = Some(secret);
        Ok(())
    }

    fn finish(self: Box<Self>, peer_key: &[u8]) -> Result<SharedSecret, Error> {
        debug_assert!(self.secret.is_some());
        let secret = self
            .secret
            .as_ref()
            .ok_or(Error::InconsistentKeyShareState)?;

        // Only uncompressed points are acceptable; this also rejects an
        // empty peer key.
        if peer_key.first() != Some(&UNCOMPRESSED) {
            warn!("peer EC key share is not an uncompressed point");
            return Err(Error::InvalidPeerKeyShare);
        }

        let peer = PublicKey::<C>::from_sec1_bytes(peer_key)
            .map_err(|_| Error::InvalidPeerKeyShare)?;

        // The x coordinate of peer * secret, left-padded with zeros to the
        // byte length of the field.  Fixed length avoids leaking the
        // magnitude of the coordinate.
        let shared = diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
        Ok(SharedSecret::from(
            shared
                .raw_secret_bytes()
                .as_slice(),
        ))
    }

    fn serialize(&self, out: &mut Vec<u8>) -> Result<(), Error> {
        let secret = self
            .secret
            .as_ref()
            .ok_or(Error::InconsistentKeyShareState)?;

        x509::put_asn1_uint64(out, u64::from(u16::from(self.group)));
        // The scalar is padded to the byte length of the group order so
        // the encoding does not leak its length.
        let mut scalar = secret.to_bytes();
        x509::put_octet_string(out, scalar.as_slice());
        scalar.as_mut_slice().zeroize();
        Ok(())
    }

    fn deserialize(&mut self, r: &mut Reader<'_>) -> Result<(), Error> {
        debug_assert!(self.secret.is_none());
        let body = x509::read_octet_string(r)?;
        self.secret = Some(
            SecretKey::from_slice(body)
                .map_err(|_| InvalidMessage::InvalidDer("EC private key"))?,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kx::create;

    #[test]
    fn rejects_compressed_and_garbage_points() {
        for peer in [
            &[][..],
            &[0x02; 33][..], // compressed form
            &[0x04; 65][..], // right shape, not on the curve
        ] {
            let mut share = create(NamedGroup::secp256r1).unwrap();
            let mut out = Vec::new();
            share.offer(&mut out).unwrap();
            assert_eq!(share.finish(peer).unwrap_err(), Error::InvalidPeerKeyShare);
        }
    }

    #[test]
    fn offer_twice_is_refused() {
        let mut share = create(NamedGroup::secp256r1).unwrap();
        let mut out = Vec::new();
        share.offer(&mut out).unwrap();

        // debug_assert fires in debug builds; probe release behavior only
        if cfg!(not(debug_assertions)) {
            assert_eq!(
                share.offer(&mut out),
                Err(Error::InconsistentKeyShareState)
            );
        }
    }

    #[test]
    fn scalar_is_padded_to_order_length() {
        let mut share = create(NamedGroup::secp521r1).unwrap();
        let mut out = Vec::new();
        share.offer(&mut out).unwrap();

        let mut serialized = Vec::new();
        share.serialize(&mut serialized).unwrap();
        // INTEGER group id, then OCTET STRING of exactly 66 bytes
        let mut r = Reader::init(&serialized);
        assert_eq!(x509::read_asn1_uint64(&mut r).unwrap(), 0x0019);
        assert_eq!(x509::read_octet_string(&mut r).unwrap().len(), 66);
        assert!(!r.any_left());
    }
}
