//! Raw public and private key marshalling for digestless schemes.
//!
//! Ed25519 and the post-quantum signature keys use the RFC 8410 shapes: a
//! `SubjectPublicKeyInfo` whose algorithm has no parameters and whose key
//! is the raw bytes in a BIT STRING, and a PKCS#8 `OneAsymmetricKey` whose
//! private key is the raw bytes behind two nested OCTET STRINGs.

use oqs::sig::{Algorithm, Sig};
use zeroize::Zeroize;

use crate::codec::{Codec, Reader};
use crate::error::{Error, InvalidMessage};
use crate::groups;
use crate::sigalg::{self, AlgorithmIdentifier, AlgorithmParameters, SignatureAlgorithm};
use crate::x509;

fn oqs_algorithm(key: SignatureAlgorithm) -> Option<Algorithm> {
    Some(match key {
        SignatureAlgorithm::Dilithium2 => Algorithm::Dilithium2,
        SignatureAlgorithm::Dilithium3 => Algorithm::Dilithium3,
        SignatureAlgorithm::Dilithium5 => Algorithm::Dilithium5,
        SignatureAlgorithm::Falcon512 => Algorithm::Falcon512,
        SignatureAlgorithm::Falcon1024 => Algorithm::Falcon1024,
        SignatureAlgorithm::SphincsSha256128fSimple => Algorithm::SphincsSha256128fSimple,
        _ => return None,
    })
}

/// (public, secret) key lengths for a digestless scheme.
fn key_lengths(key: SignatureAlgorithm) -> Result<(usize, usize), Error> {
    if key == SignatureAlgorithm::Ed25519 {
        return Ok((32, 32));
    }

    let alg = oqs_algorithm(key).ok_or(Error::UnknownSignatureAlgorithm)?;
    groups::liboqs_init();
    let sig = Sig::new(alg).map_err(|_| Error::PrivateKeyOperationFailed)?;
    Ok((sig.length_public_key(), sig.length_secret_key()))
}

fn scheme_algorithm_identifier(key: SignatureAlgorithm) -> Result<AlgorithmIdentifier, Error> {
    if !sigalg::is_digestless(key.nid()) {
        return Err(Error::UnknownSignatureAlgorithm);
    }
    sigalg::sign_algorithm(&sigalg::SigningContext::new(key))
}

/// Encode a digestless public key as a `SubjectPublicKeyInfo`.
pub fn encode_public_key(key: SignatureAlgorithm, public: &[u8]) -> Result<Vec<u8>, Error> {
    let (public_len, _) = key_lengths(key)?;
    if public.len() != public_len {
        return Err(Error::InvalidMessage(InvalidMessage::InvalidDer(
            "public key length",
        )));
    }

    let mut body = scheme_algorithm_identifier(key)?.get_encoding();
    body.extend_from_slice(&x509::wrap_in_bit_string(public));
    Ok(x509::wrap_in_sequence(&body))
}

/// Decode a `SubjectPublicKeyInfo` holding a digestless public key.
pub fn decode_public_key(der: &[u8]) -> Result<(SignatureAlgorithm, Vec<u8>), Error> {
    let mut r = Reader::init(der);
    let body = x509::read_asn1(&mut r, x509::DER_SEQUENCE_TAG)?;
    r.expect_empty("SubjectPublicKeyInfo")?;

    let mut inner = Reader::init(body);
    let algorithm = AlgorithmIdentifier::read(&mut inner)?;
    let bit_string = x509::read_asn1(&mut inner, x509::DER_BIT_STRING_TAG)?;
    inner.expect_empty("SubjectPublicKeyInfo")?;

    let key = sigalg::key_by_oid(&algorithm.oid).ok_or(Error::UnknownSignatureAlgorithm)?;
    if !sigalg::is_digestless(key.nid()) {
        return Err(Error::UnknownSignatureAlgorithm);
    }
    if algorithm.parameters != AlgorithmParameters::Absent {
        return Err(Error::InvalidParameter);
    }

    // leading octet counts unused bits; raw keys always use none
    let (&unused_bits, public) = bit_string
        .split_first()
        .ok_or(InvalidMessage::InvalidDer("public key BIT STRING"))?;
    if unused_bits != 0 {
        return Err(Error::InvalidMessage(InvalidMessage::InvalidDer(
            "public key BIT STRING",
        )));
    }

    let (public_len, _) = key_lengths(key)?;
    if public.len() != public_len {
        return Err(Error::InvalidMessage(InvalidMessage::InvalidDer(
            "public key length",
        )));
    }

    Ok((key, public.to_vec()))
}

/// Encode a digestless private key as a PKCS#8 `OneAsymmetricKey`.
pub fn encode_private_key(key: SignatureAlgorithm, secret: &[u8]) -> Result<Vec<u8>, Error> {
    let (_, secret_len) = key_lengths(key)?;
    if secret.len() != secret_len {
        return Err(Error::InvalidMessage(InvalidMessage::InvalidDer(
            "private key length",
        )));
    }

    let mut body = Vec::new();
    x509::put_asn1_uint64(&mut body, 0); // version
    scheme_algorithm_identifier(key)?.encode(&mut body);
    let mut inner = Vec::new();
    x509::put_octet_string(&mut inner, secret);
    x509::put_octet_string(&mut body, &inner);
    inner.zeroize();

    let encoded = x509::wrap_in_sequence(&body);
    body.zeroize();
    Ok(encoded)
}

/// Decode a PKCS#8 `OneAsymmetricKey` holding a digestless private key.
///
/// The caller owns the returned secret and is responsible for zeroizing
/// it when done.
pub fn decode_private_key(der: &[u8]) -> Result<(SignatureAlgorithm, Vec<u8>), Error> {
    let mut r = Reader::init(der);
    let body = x509::read_asn1(&mut r, x509::DER_SEQUENCE_TAG)?;
    r.expect_empty("OneAsymmetricKey")?;

    let mut inner = Reader::init(body);
    let version = x509::read_asn1_uint64(&mut inner)?;
    if version != 0 {
        return Err(Error::InvalidMessage(InvalidMessage::InvalidDer(
            "OneAsymmetricKey version",
        )));
    }

    let algorithm = AlgorithmIdentifier::read(&mut inner)?;
    let outer = x509::read_octet_string(&mut inner)?;
    inner.expect_empty("OneAsymmetricKey")?;

    let key = sigalg::key_by_oid(&algorithm.oid).ok_or(Error::UnknownSignatureAlgorithm)?;
    if !sigalg::is_digestless(key.nid()) {
        return Err(Error::UnknownSignatureAlgorithm);
    }
    if algorithm.parameters != AlgorithmParameters::Absent {
        return Err(Error::InvalidParameter);
    }

    let mut wrapped = Reader::init(outer);
    let secret = x509::read_octet_string(&mut wrapped)?;
    wrapped.expect_empty("PrivateKey")?;

    let (_, secret_len) = key_lengths(key)?;
    if secret.len() != secret_len {
        return Err(Error::InvalidMessage(InvalidMessage::InvalidDer(
            "private key length",
        )));
    }

    Ok((key, secret.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ed25519_public_key_encoding_is_rfc8410_exact() {
        let public = [0xab; 32];
        let spki = encode_public_key(SignatureAlgorithm::Ed25519, &public).unwrap();
        assert_eq!(
            &spki[..12],
            &[0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00]
        );
        assert_eq!(&spki[12..], &public);

        let (key, decoded) = decode_public_key(&spki).unwrap();
        assert_eq!(key, SignatureAlgorithm::Ed25519);
        assert_eq!(decoded, &public);
    }

    #[test]
    fn ed25519_private_key_round_trips() {
        let secret = [0x42; 32];
        let pkcs8 = encode_private_key(SignatureAlgorithm::Ed25519, &secret).unwrap();
        assert_eq!(
            &pkcs8[..16],
            &[
                0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04,
                0x22, 0x04, 0x20
            ]
        );

        let (key, decoded) = decode_private_key(&pkcs8).unwrap();
        assert_eq!(key, SignatureAlgorithm::Ed25519);
        assert_eq!(decoded, &secret);
    }

    #[test]
    fn wrong_lengths_are_rejected() {
        assert!(encode_public_key(SignatureAlgorithm::Ed25519, &[0; 31]).is_err());
        assert!(encode_private_key(SignatureAlgorithm::Ed25519, &[0; 33]).is_err());
    }

    #[test]
    fn non_digestless_keys_are_refused() {
        assert_eq!(
            encode_public_key(SignatureAlgorithm::Rsa, &[0; 32]).unwrap_err(),
            Error::UnknownSignatureAlgorithm
        );
        assert_eq!(
            encode_public_key(SignatureAlgorithm::Ecdsa, &[0; 32]).unwrap_err(),
            Error::UnknownSignatureAlgorithm
        );
    }

    #[test]
    fn parameters_must_be_absent() {
        let mut body = AlgorithmIdentifier {
            oid: vec![0x2b, 0x65, 0x70],
            parameters: AlgorithmParameters::Null,
        }
        .get_encoding();
        body.extend_from_slice(&x509::wrap_in_bit_string(&[0xab; 32]));
        let spki = x509::wrap_in_sequence(&body);
        assert_eq!(decode_public_key(&spki).unwrap_err(), Error::InvalidParameter);
    }

    #[test]
    fn dilithium2_keys_round_trip() {
        crate::groups::liboqs_init();
        if !Algorithm::Dilithium2.is_enabled() {
            return;
        }

        let sig = Sig::new(Algorithm::Dilithium2).unwrap();
        let (public, secret) = sig.keypair().unwrap();

        let spki = encode_public_key(SignatureAlgorithm::Dilithium2, public.as_ref()).unwrap();
        let (key, decoded) = decode_public_key(&spki).unwrap();
        assert_eq!(key, SignatureAlgorithm::Dilithium2);
        assert_eq!(decoded, public.as_ref());

        let pkcs8 = encode_private_key(SignatureAlgorithm::Dilithium2, secret.as_ref()).unwrap();
        let (key, mut decoded) = decode_private_key(&pkcs8).unwrap();
        assert_eq!(key, SignatureAlgorithm::Dilithium2);
        assert_eq!(decoded, secret.as_ref());
        decoded.zeroize();
    }
}
