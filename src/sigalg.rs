//! X.509 signature algorithm marshalling.
//!
//! Two jobs live here.  On the signing side, [`sign_algorithm`] turns a
//! signing context (key type, digest, RSA padding mode) into the
//! `AlgorithmIdentifier` to embed in a certificate.  On the verification
//! side, [`verify_init`] translates a received `AlgorithmIdentifier` back
//! into a digest and key type and primes a [`VerificationContext`].
//!
//! Three regimes exist and must not be confused:
//!
//! - standard hash-and-sign, where the identifier encodes a (digest, key
//!   type) pair;
//! - RSA-PSS, where the identifier is `rsassaPss` and the digest and salt
//!   ride in the parameters;
//! - digestless schemes (Ed25519 and the post-quantum signatures), where
//!   the identifier alone determines everything and parameters must be
//!   absent.
//!
//! Digestless schemes appear in the table with `digest_nid == pkey_nid`,
//! so both paths route through the same [`is_digestless`] predicate and
//! adding a scheme is a single new row.

use log::warn;

use crate::codec::{Codec, Reader};
use crate::error::{Error, InvalidMessage};
use crate::nid;
use crate::x509;

/// A digest algorithm, identified by NID.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum DigestAlgorithm {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    /// Resolve a digest implementation by NID.
    ///
    /// NIDs may appear in the signature table without a corresponding
    /// implementation here (MD5 does); those verify as `UnknownDigest`.
    pub fn from_nid(nid: i32) -> Option<Self> {
        Some(match nid {
            nid::SHA1 => Self::Sha1,
            nid::SHA224 => Self::Sha224,
            nid::SHA256 => Self::Sha256,
            nid::SHA384 => Self::Sha384,
            nid::SHA512 => Self::Sha512,
            _ => return None,
        })
    }

    /// The digest's NID.
    pub fn nid(&self) -> i32 {
        match self {
            Self::Sha1 => nid::SHA1,
            Self::Sha224 => nid::SHA224,
            Self::Sha256 => nid::SHA256,
            Self::Sha384 => nid::SHA384,
            Self::Sha512 => nid::SHA512,
        }
    }

    /// Output length in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    fn oid(&self) -> &'static [u8] {
        match self {
            Self::Sha1 => OID_SHA1,
            Self::Sha224 => OID_SHA224,
            Self::Sha256 => OID_SHA256,
            Self::Sha384 => OID_SHA384,
            Self::Sha512 => OID_SHA512,
        }
    }

    fn from_oid(oid: &[u8]) -> Option<Self> {
        [
            Self::Sha1,
            Self::Sha224,
            Self::Sha256,
            Self::Sha384,
            Self::Sha512,
        ]
        .into_iter()
        .find(|digest| digest.oid() == oid)
    }
}

/// A public key type, as far as signature algorithm coding cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum SignatureAlgorithm {
    Rsa,
    Ecdsa,
    Ed25519,
    Dilithium2,
    Dilithium3,
    Dilithium5,
    Falcon512,
    Falcon1024,
    SphincsSha256128fSimple,
}

impl SignatureAlgorithm {
    /// The key type's NID.
    pub fn nid(&self) -> i32 {
        match self {
            Self::Rsa => nid::RSA_ENCRYPTION,
            Self::Ecdsa => nid::X9_62_ID_EC_PUBLICKEY,
            Self::Ed25519 => nid::ED25519,
            Self::Dilithium2 => nid::DILITHIUM2,
            Self::Dilithium3 => nid::DILITHIUM3,
            Self::Dilithium5 => nid::DILITHIUM5,
            Self::Falcon512 => nid::FALCON512,
            Self::Falcon1024 => nid::FALCON1024,
            Self::SphincsSha256128fSimple => nid::SPHINCS_SHA256_128F_SIMPLE,
        }
    }

    /// Resolve a key type from its NID.
    pub fn from_nid(nid: i32) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|key| key.nid() == nid)
    }

    /// The full set of key types.
    pub fn all() -> &'static [Self] {
        &[
            Self::Rsa,
            Self::Ecdsa,
            Self::Ed25519,
            Self::Dilithium2,
            Self::Dilithium3,
            Self::Dilithium5,
            Self::Falcon512,
            Self::Falcon1024,
            Self::SphincsSha256128fSimple,
        ]
    }
}

/// X.509 `AlgorithmIdentifier`: an OID and optional parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    /// DER contents of the OBJECT IDENTIFIER (without tag and length).
    pub oid: Vec<u8>,
    /// The parameters following the OID.
    pub parameters: AlgorithmParameters,
}

/// The parameters slot of an `AlgorithmIdentifier`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlgorithmParameters {
    /// No parameters at all.
    Absent,
    /// An explicit ASN.1 NULL.
    Null,
    /// Any other single DER element, kept as raw bytes.
    Explicit(Vec<u8>),
}

impl Codec for AlgorithmIdentifier {
    fn encode(&self, bytes: &mut Vec<u8>) {
        let mut body = x509::wrap_in_tag(x509::DER_OBJECT_IDENTIFIER_TAG, &self.oid);
        match &self.parameters {
            AlgorithmParameters::Absent => {}
            AlgorithmParameters::Null => body.extend_from_slice(&[x509::DER_NULL_TAG, 0x00]),
            AlgorithmParameters::Explicit(der) => body.extend_from_slice(der),
        }
        bytes.extend_from_slice(&x509::wrap_in_sequence(&body));
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        let body = x509::read_asn1(r, x509::DER_SEQUENCE_TAG)?;
        let mut inner = Reader::init(body);
        let oid = x509::read_asn1(&mut inner, x509::DER_OBJECT_IDENTIFIER_TAG)?.to_vec();

        let parameters = if !inner.any_left() {
            AlgorithmParameters::Absent
        } else {
            let rest = inner.rest();
            let mut params = Reader::init(rest);
            let (tag, contents) = x509::read_any_asn1(&mut params)?;
            params.expect_empty("AlgorithmIdentifier")?;
            if tag == x509::DER_NULL_TAG && contents.is_empty() {
                AlgorithmParameters::Null
            } else {
                AlgorithmParameters::Explicit(rest.to_vec())
            }
        };

        Ok(Self { oid, parameters })
    }
}

// PKCS#1
const OID_MD5_WITH_RSA: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x04];
const OID_SHA1_WITH_RSA: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x05];
const OID_MGF1: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x08];
const OID_RSASSA_PSS: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0a];
const OID_SHA256_WITH_RSA: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b];
const OID_SHA384_WITH_RSA: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0c];
const OID_SHA512_WITH_RSA: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0d];
// X9.62
const OID_ECDSA_WITH_SHA224: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x01];
const OID_ECDSA_WITH_SHA256: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x02];
const OID_ECDSA_WITH_SHA384: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x03];
const OID_ECDSA_WITH_SHA512: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x04];
// RFC 8410
const OID_ED25519: &[u8] = &[0x2b, 0x65, 0x70];
// Open Quantum Safe allocations
const OID_DILITHIUM2: &[u8] = &[0x2b, 0x06, 0x01, 0x04, 0x01, 0x02, 0x82, 0x0b, 0x07, 0x04, 0x04];
const OID_DILITHIUM3: &[u8] = &[0x2b, 0x06, 0x01, 0x04, 0x01, 0x02, 0x82, 0x0b, 0x07, 0x06, 0x05];
const OID_DILITHIUM5: &[u8] = &[0x2b, 0x06, 0x01, 0x04, 0x01, 0x02, 0x82, 0x0b, 0x07, 0x08, 0x07];
const OID_FALCON512: &[u8] = &[0x2b, 0xce, 0x0f, 0x03, 0x06];
const OID_FALCON1024: &[u8] = &[0x2b, 0xce, 0x0f, 0x03, 0x09];
const OID_SPHINCS_SHA256_128F_SIMPLE: &[u8] = &[0x2b, 0xce, 0x0f, 0x06, 0x04, 0x04];
// Digests
const OID_SHA1: &[u8] = &[0x2b, 0x0e, 0x03, 0x02, 0x1a];
const OID_SHA224: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x04];
const OID_SHA256: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01];
const OID_SHA384: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x02];
const OID_SHA512: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x03];

struct SignatureOid {
    sign_nid: i32,
    digest_nid: i32,
    pkey_nid: i32,
    oid: &'static [u8],
}

const fn sig(sign_nid: i32, digest_nid: i32, pkey_nid: i32, oid: &'static [u8]) -> SignatureOid {
    SignatureOid {
        sign_nid,
        digest_nid,
        pkey_nid,
        oid,
    }
}

/// Digestless rows carry `digest_nid == pkey_nid == sign_nid`; RSASSA-PSS
/// carries `digest_nid == UNDEF` as the signal for parameter-driven setup.
static SIGNATURE_OIDS: &[SignatureOid] = &[
    sig(nid::MD5_WITH_RSA_ENCRYPTION, nid::MD5, nid::RSA_ENCRYPTION, OID_MD5_WITH_RSA),
    sig(nid::SHA1_WITH_RSA_ENCRYPTION, nid::SHA1, nid::RSA_ENCRYPTION, OID_SHA1_WITH_RSA),
    sig(nid::SHA256_WITH_RSA_ENCRYPTION, nid::SHA256, nid::RSA_ENCRYPTION, OID_SHA256_WITH_RSA),
    sig(nid::SHA384_WITH_RSA_ENCRYPTION, nid::SHA384, nid::RSA_ENCRYPTION, OID_SHA384_WITH_RSA),
    sig(nid::SHA512_WITH_RSA_ENCRYPTION, nid::SHA512, nid::RSA_ENCRYPTION, OID_SHA512_WITH_RSA),
    sig(nid::RSASSA_PSS, nid::UNDEF, nid::RSA_ENCRYPTION, OID_RSASSA_PSS),
    sig(nid::ECDSA_WITH_SHA224, nid::SHA224, nid::X9_62_ID_EC_PUBLICKEY, OID_ECDSA_WITH_SHA224),
    sig(nid::ECDSA_WITH_SHA256, nid::SHA256, nid::X9_62_ID_EC_PUBLICKEY, OID_ECDSA_WITH_SHA256),
    sig(nid::ECDSA_WITH_SHA384, nid::SHA384, nid::X9_62_ID_EC_PUBLICKEY, OID_ECDSA_WITH_SHA384),
    sig(nid::ECDSA_WITH_SHA512, nid::SHA512, nid::X9_62_ID_EC_PUBLICKEY, OID_ECDSA_WITH_SHA512),
    sig(nid::ED25519, nid::ED25519, nid::ED25519, OID_ED25519),
    sig(nid::DILITHIUM2, nid::DILITHIUM2, nid::DILITHIUM2, OID_DILITHIUM2),
    sig(nid::DILITHIUM3, nid::DILITHIUM3, nid::DILITHIUM3, OID_DILITHIUM3),
    sig(nid::DILITHIUM5, nid::DILITHIUM5, nid::DILITHIUM5, OID_DILITHIUM5),
    sig(nid::FALCON512, nid::FALCON512, nid::FALCON512, OID_FALCON512),
    sig(nid::FALCON1024, nid::FALCON1024, nid::FALCON1024, OID_FALCON1024),
    sig(nid::SPHINCS_SHA256_128F_SIMPLE, nid::SPHINCS_SHA256_128F_SIMPLE, nid::SPHINCS_SHA256_128F_SIMPLE, OID_SPHINCS_SHA256_128F_SIMPLE),
];

/// Find the signature algorithm NID for a digest and key type pair.
pub fn find_sigid_by_algs(digest_nid: i32, pkey_nid: i32) -> Option<i32> {
    SIGNATURE_OIDS
        .iter()
        .find(|row| row.digest_nid == digest_nid && row.pkey_nid == pkey_nid)
        .map(|row| row.sign_nid)
}

/// Find the (digest, key type) NID pair for a signature algorithm NID.
pub fn find_sigid_algs(sign_nid: i32) -> Option<(i32, i32)> {
    SIGNATURE_OIDS
        .iter()
        .find(|row| row.sign_nid == sign_nid)
        .map(|row| (row.digest_nid, row.pkey_nid))
}

/// Whether a key type's identifier fully determines its signature scheme,
/// with no separate digest parameter.
///
/// Derived from the table so the two code paths cannot drift apart.
pub fn is_digestless(pkey_nid: i32) -> bool {
    SIGNATURE_OIDS
        .iter()
        .any(|row| row.pkey_nid == pkey_nid && row.digest_nid == pkey_nid)
}

fn row_by_oid(oid: &[u8]) -> Option<&'static SignatureOid> {
    SIGNATURE_OIDS
        .iter()
        .find(|row| row.oid == oid)
}

/// The key type a (digestless) signature OID belongs to.
pub(crate) fn key_by_oid(oid: &[u8]) -> Option<SignatureAlgorithm> {
    row_by_oid(oid).and_then(|row| SignatureAlgorithm::from_nid(row.pkey_nid))
}

fn row_by_sign_nid(sign_nid: i32) -> Option<&'static SignatureOid> {
    SIGNATURE_OIDS
        .iter()
        .find(|row| row.sign_nid == sign_nid)
}

/// RSA padding modes that matter for algorithm identifier coding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RsaPadding {
    /// PKCS#1 v1.5.
    #[default]
    Pkcs1,
    /// RSASSA-PSS.
    Pss,
}

/// What a signing collaborator has configured: a key, usually a digest,
/// and for RSA a padding mode.
#[derive(Clone, Debug)]
pub struct SigningContext {
    key: SignatureAlgorithm,
    digest: Option<DigestAlgorithm>,
    padding: RsaPadding,
}

impl SigningContext {
    /// A context for the given key with no digest configured.
    pub fn new(key: SignatureAlgorithm) -> Self {
        Self {
            key,
            digest: None,
            padding: RsaPadding::default(),
        }
    }

    /// Configure the digest.
    pub fn with_digest(mut self, digest: DigestAlgorithm) -> Self {
        self.digest = Some(digest);
        self
    }

    /// Select RSASSA-PSS padding.
    pub fn with_pss_padding(mut self) -> Self {
        self.padding = RsaPadding::Pss;
        self
    }
}

/// Verification state produced by [`verify_init`].
///
/// `digest` is `None` for digestless schemes; `pss` is populated only for
/// RSASSA-PSS.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerificationContext {
    key: Option<SignatureAlgorithm>,
    digest: Option<DigestAlgorithm>,
    pss: Option<PssParams>,
}

impl VerificationContext {
    /// The key type verification was initialised with.
    pub fn key(&self) -> Option<SignatureAlgorithm> {
        self.key
    }

    /// The digest to hash with, if the scheme uses one.
    pub fn digest(&self) -> Option<DigestAlgorithm> {
        self.digest
    }

    /// RSASSA-PSS parameters, when applicable.
    pub fn pss_params(&self) -> Option<&PssParams> {
        self.pss.as_ref()
    }
}

/// Decoded RSASSA-PSS parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PssParams {
    /// MGF1 and message digest (they are required to agree).
    pub digest: DigestAlgorithm,
    /// Salt length in bytes.
    pub salt_len: u64,
}

/// Compute the `AlgorithmIdentifier` a signature made under `ctx` must be
/// labelled with.
pub fn sign_algorithm(ctx: &SigningContext) -> Result<AlgorithmIdentifier, Error> {
    // RSA-PSS has special signature algorithm logic.
    if ctx.key == SignatureAlgorithm::Rsa && ctx.padding == RsaPadding::Pss {
        return pss_sign_algorithm(ctx);
    }

    // The identifier of a digestless scheme is the whole story; no digest
    // parameter appears.
    if is_digestless(ctx.key.nid()) {
        let row = row_by_sign_nid(ctx.key.nid()).ok_or(Error::UnknownSignatureAlgorithm)?;
        return Ok(AlgorithmIdentifier {
            oid: row.oid.to_vec(),
            parameters: AlgorithmParameters::Absent,
        });
    }

    // Default behavior: look up the OID for the algorithm/hash pair and
    // encode that.
    let digest = ctx
        .digest
        .ok_or(Error::ContextNotInitialised)?;
    let sign_nid = find_sigid_by_algs(digest.nid(), ctx.key.nid())
        .ok_or(Error::UnsupportedDigestAndKeyType)?;
    let row = row_by_sign_nid(sign_nid).ok_or(Error::UnsupportedDigestAndKeyType)?;

    // RSA signature algorithms include an explicit NULL parameter.
    // Others omit it.
    let parameters = match ctx.key {
        SignatureAlgorithm::Rsa => AlgorithmParameters::Null,
        _ => AlgorithmParameters::Absent,
    };

    Ok(AlgorithmIdentifier {
        oid: row.oid.to_vec(),
        parameters,
    })
}

/// Prime `ctx` for verifying a signature labelled `algor`, made by `key`.
pub fn verify_init(
    ctx: &mut VerificationContext,
    algor: &AlgorithmIdentifier,
    key: SignatureAlgorithm,
) -> Result<(), Error> {
    // Convert the signature OID into digest and public key identifiers.
    let row = match row_by_oid(&algor.oid) {
        Some(row) => row,
        None => {
            warn!("unknown signature algorithm OID {:02x?}", algor.oid);
            return Err(Error::UnknownSignatureAlgorithm);
        }
    };

    // Check the implied key type against the key we actually hold.
    if row.pkey_nid != key.nid() {
        return Err(Error::WrongPublicKeyType);
    }

    // UNDEF signals that the parameters carry the configuration.
    if row.digest_nid == nid::UNDEF {
        return match row.sign_nid {
            nid::RSASSA_PSS => pss_verify_init(ctx, algor, key),
            _ => Err(Error::UnknownSignatureAlgorithm),
        };
    }

    // Digestless schemes take no parameters, not even NULL.
    if row.digest_nid == row.pkey_nid {
        if algor.parameters != AlgorithmParameters::Absent {
            return Err(Error::InvalidParameter);
        }
        *ctx = VerificationContext {
            key: Some(key),
            digest: None,
            pss: None,
        };
        return Ok(());
    }

    // Otherwise, initialize with the digest from the OID.
    let digest = DigestAlgorithm::from_nid(row.digest_nid).ok_or(Error::UnknownDigest)?;
    *ctx = VerificationContext {
        key: Some(key),
        digest: Some(digest),
        pss: None,
    };
    Ok(())
}

fn digest_algorithm_identifier(digest: DigestAlgorithm) -> Vec<u8> {
    x509::wrap_in_sequence(&x509::wrap_in_tag(
        x509::DER_OBJECT_IDENTIFIER_TAG,
        digest.oid(),
    ))
}

const CONTEXT_0: u8 = 0xa0;
const CONTEXT_1: u8 = 0xa1;
const CONTEXT_2: u8 = 0xa2;
const CONTEXT_3: u8 = 0xa3;

/// Encode `RSASSA-PSS-params` (RFC 4055) for the context's digest, with
/// MGF1 over the same digest and the salt length equal to the digest
/// length.
fn pss_sign_algorithm(ctx: &SigningContext) -> Result<AlgorithmIdentifier, Error> {
    let digest = ctx
        .digest
        .ok_or(Error::ContextNotInitialised)?;
    if !matches!(
        digest,
        DigestAlgorithm::Sha256 | DigestAlgorithm::Sha384 | DigestAlgorithm::Sha512
    ) {
        return Err(Error::UnsupportedDigestAndKeyType);
    }

    let hash_algorithm = digest_algorithm_identifier(digest);
    let mask_gen = x509::wrap_in_sequence(
        &[
            x509::wrap_in_tag(x509::DER_OBJECT_IDENTIFIER_TAG, OID_MGF1),
            hash_algorithm.clone(),
        ]
        .concat(),
    );
    let mut salt_length = Vec::new();
    x509::put_asn1_uint64(&mut salt_length, digest.output_len() as u64);

    let body = [
        x509::wrap_in_tag(CONTEXT_0, &hash_algorithm),
        x509::wrap_in_tag(CONTEXT_1, &mask_gen),
        x509::wrap_in_tag(CONTEXT_2, &salt_length),
    ]
    .concat();

    Ok(AlgorithmIdentifier {
        oid: OID_RSASSA_PSS.to_vec(),
        parameters: AlgorithmParameters::Explicit(x509::wrap_in_sequence(&body)),
    })
}

fn read_algorithm_identifier(der: &[u8]) -> Result<AlgorithmIdentifier, Error> {
    let mut r = Reader::init(der);
    let algid = AlgorithmIdentifier::read(&mut r).map_err(|_| Error::InvalidParameter)?;
    r.expect_empty("RSASSA-PSS-params")
        .map_err(|_| Error::InvalidParameter)?;
    Ok(algid)
}

fn pss_digest_from_algorithm(algid: &AlgorithmIdentifier) -> Result<DigestAlgorithm, Error> {
    // Hash AlgorithmIdentifiers appear with absent or NULL parameters.
    if matches!(algid.parameters, AlgorithmParameters::Explicit(_)) {
        return Err(Error::InvalidParameter);
    }
    DigestAlgorithm::from_oid(&algid.oid).ok_or(Error::UnknownDigest)
}

/// Decode `RSASSA-PSS-params` and prime `ctx` accordingly.
fn pss_verify_init(
    ctx: &mut VerificationContext,
    algor: &AlgorithmIdentifier,
    key: SignatureAlgorithm,
) -> Result<(), Error> {
    let AlgorithmParameters::Explicit(der) = &algor.parameters else {
        return Err(Error::InvalidParameter);
    };

    let mut r = Reader::init(der);
    let body = x509::read_asn1(&mut r, x509::DER_SEQUENCE_TAG).map_err(|_| Error::InvalidParameter)?;
    r.expect_empty("RSASSA-PSS-params")
        .map_err(|_| Error::InvalidParameter)?;

    // Fields are context-tagged [0]..[3], optional, in ascending order.
    let mut inner = Reader::init(body);
    let mut last_tag = 0x00;
    let mut digest = DigestAlgorithm::Sha1;
    let mut mask_digest = DigestAlgorithm::Sha1;
    let mut salt_len = 20u64;
    while inner.any_left() {
        let (tag, contents) = x509::read_any_asn1(&mut inner).map_err(|_| Error::InvalidParameter)?;
        if tag <= last_tag {
            return Err(Error::InvalidParameter);
        }
        last_tag = tag;

        match tag {
            CONTEXT_0 => {
                digest = pss_digest_from_algorithm(&read_algorithm_identifier(contents)?)?;
            }
            CONTEXT_1 => {
                let mgf = read_algorithm_identifier(contents)?;
                if mgf.oid != OID_MGF1 {
                    return Err(Error::InvalidParameter);
                }
                let AlgorithmParameters::Explicit(hash_der) = &mgf.parameters else {
                    return Err(Error::InvalidParameter);
                };
                mask_digest = pss_digest_from_algorithm(&read_algorithm_identifier(hash_der)?)?;
            }
            CONTEXT_2 => {
                let mut salt = Reader::init(contents);
                salt_len = x509::read_asn1_uint64(&mut salt).map_err(|_| Error::InvalidParameter)?;
                salt.expect_empty("saltLength")
                    .map_err(|_| Error::InvalidParameter)?;
            }
            CONTEXT_3 => {
                // trailerField must be the default, 1
                let mut trailer = Reader::init(contents);
                let field = x509::read_asn1_uint64(&mut trailer).map_err(|_| Error::InvalidParameter)?;
                if field != 1 {
                    return Err(Error::InvalidParameter);
                }
            }
            _ => return Err(Error::InvalidParameter),
        }
    }

    if mask_digest != digest {
        return Err(Error::InvalidParameter);
    }

    *ctx = VerificationContext {
        key: Some(key),
        digest: Some(digest),
        pss: Some(PssParams { digest, salt_len }),
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verify(algor: &AlgorithmIdentifier, key: SignatureAlgorithm) -> Result<VerificationContext, Error> {
        let mut ctx = VerificationContext::default();
        verify_init(&mut ctx, algor, key)?;
        Ok(ctx)
    }

    #[test]
    fn rsa_pkcs1_sha256_has_null_parameters() {
        let ctx = SigningContext::new(SignatureAlgorithm::Rsa).with_digest(DigestAlgorithm::Sha256);
        let algor = sign_algorithm(&ctx).unwrap();
        assert_eq!(algor.parameters, AlgorithmParameters::Null);
        assert_eq!(
            algor.get_encoding(),
            // SEQUENCE { sha256WithRSAEncryption, NULL }
            &[
                0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b,
                0x05, 0x00
            ]
        );

        let verified = verify(&algor, SignatureAlgorithm::Rsa).unwrap();
        assert_eq!(verified.key(), Some(SignatureAlgorithm::Rsa));
        assert_eq!(verified.digest(), Some(DigestAlgorithm::Sha256));
        assert!(verified.pss_params().is_none());
    }

    #[test]
    fn ecdsa_sha384_has_absent_parameters() {
        let ctx = SigningContext::new(SignatureAlgorithm::Ecdsa).with_digest(DigestAlgorithm::Sha384);
        let algor = sign_algorithm(&ctx).unwrap();
        assert_eq!(algor.parameters, AlgorithmParameters::Absent);
        assert_eq!(
            algor.get_encoding(),
            &[0x30, 0x0a, 0x06, 0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x03]
        );

        let verified = verify(&algor, SignatureAlgorithm::Ecdsa).unwrap();
        assert_eq!(verified.digest(), Some(DigestAlgorithm::Sha384));
    }

    #[test]
    fn hash_and_sign_round_trips() {
        for (digest, key) in [
            (DigestAlgorithm::Sha1, SignatureAlgorithm::Rsa),
            (DigestAlgorithm::Sha256, SignatureAlgorithm::Rsa),
            (DigestAlgorithm::Sha384, SignatureAlgorithm::Rsa),
            (DigestAlgorithm::Sha512, SignatureAlgorithm::Rsa),
            (DigestAlgorithm::Sha224, SignatureAlgorithm::Ecdsa),
            (DigestAlgorithm::Sha256, SignatureAlgorithm::Ecdsa),
            (DigestAlgorithm::Sha384, SignatureAlgorithm::Ecdsa),
            (DigestAlgorithm::Sha512, SignatureAlgorithm::Ecdsa),
        ] {
            let ctx = SigningContext::new(key).with_digest(digest);
            let algor = sign_algorithm(&ctx).unwrap();
            let verified = verify(&algor, key).unwrap();
            assert_eq!(verified.key(), Some(key));
            assert_eq!(verified.digest(), Some(digest));
        }
    }

    #[test]
    fn digestless_set_is_consistent() {
        for &key in SignatureAlgorithm::all() {
            if !is_digestless(key.nid()) {
                continue;
            }

            // signing emits the bare OID, whether or not a digest is
            // configured
            let algor = sign_algorithm(&SigningContext::new(key).with_digest(DigestAlgorithm::Sha256))
                .unwrap();
            assert_eq!(algor.parameters, AlgorithmParameters::Absent);

            // verification accepts exactly that and configures no digest
            let verified = verify(&algor, key).unwrap();
            assert_eq!(verified.key(), Some(key));
            assert_eq!(verified.digest(), None);

            // any non-absent parameters are rejected
            for parameters in [
                AlgorithmParameters::Null,
                AlgorithmParameters::Explicit(vec![0x05, 0x00]),
            ] {
                let bad = AlgorithmIdentifier {
                    oid: algor.oid.clone(),
                    parameters,
                };
                assert_eq!(verify(&bad, key).unwrap_err(), Error::InvalidParameter);
            }
        }
    }

    #[test]
    fn every_pq_scheme_is_digestless() {
        for key in [
            SignatureAlgorithm::Ed25519,
            SignatureAlgorithm::Dilithium2,
            SignatureAlgorithm::Dilithium3,
            SignatureAlgorithm::Dilithium5,
            SignatureAlgorithm::Falcon512,
            SignatureAlgorithm::Falcon1024,
            SignatureAlgorithm::SphincsSha256128fSimple,
        ] {
            assert!(is_digestless(key.nid()), "{key:?}");
            // and its table row routes the verify path uniformly
            assert_eq!(find_sigid_algs(key.nid()), Some((key.nid(), key.nid())));
        }
        assert!(!is_digestless(SignatureAlgorithm::Rsa.nid()));
        assert!(!is_digestless(SignatureAlgorithm::Ecdsa.nid()));
    }

    #[test]
    fn unknown_oid_is_rejected() {
        let bogus = AlgorithmIdentifier {
            oid: vec![0x2b, 0x01, 0x02],
            parameters: AlgorithmParameters::Absent,
        };
        assert_eq!(
            verify(&bogus, SignatureAlgorithm::Rsa).unwrap_err(),
            Error::UnknownSignatureAlgorithm
        );
    }

    #[test]
    fn mismatched_key_type_is_rejected() {
        let algor = sign_algorithm(
            &SigningContext::new(SignatureAlgorithm::Rsa).with_digest(DigestAlgorithm::Sha256),
        )
        .unwrap();
        assert_eq!(
            verify(&algor, SignatureAlgorithm::Ecdsa).unwrap_err(),
            Error::WrongPublicKeyType
        );
        assert_eq!(
            verify(&algor, SignatureAlgorithm::Ed25519).unwrap_err(),
            Error::WrongPublicKeyType
        );
    }

    #[test]
    fn md5_verifies_as_unknown_digest() {
        let algor = AlgorithmIdentifier {
            oid: OID_MD5_WITH_RSA.to_vec(),
            parameters: AlgorithmParameters::Null,
        };
        assert_eq!(
            verify(&algor, SignatureAlgorithm::Rsa).unwrap_err(),
            Error::UnknownDigest
        );
    }

    #[test]
    fn unsupported_pairs_fail_signing() {
        // SHA-224 with RSA has no table entry
        let ctx = SigningContext::new(SignatureAlgorithm::Rsa).with_digest(DigestAlgorithm::Sha224);
        assert_eq!(
            sign_algorithm(&ctx).unwrap_err(),
            Error::UnsupportedDigestAndKeyType
        );
    }

    #[test]
    fn missing_digest_fails_signing() {
        assert_eq!(
            sign_algorithm(&SigningContext::new(SignatureAlgorithm::Rsa)).unwrap_err(),
            Error::ContextNotInitialised
        );
        assert_eq!(
            sign_algorithm(&SigningContext::new(SignatureAlgorithm::Rsa).with_pss_padding())
                .unwrap_err(),
            Error::ContextNotInitialised
        );
    }

    #[test]
    fn pss_round_trips() {
        for digest in [
            DigestAlgorithm::Sha256,
            DigestAlgorithm::Sha384,
            DigestAlgorithm::Sha512,
        ] {
            let ctx = SigningContext::new(SignatureAlgorithm::Rsa)
                .with_digest(digest)
                .with_pss_padding();
            let algor = sign_algorithm(&ctx).unwrap();
            assert_eq!(algor.oid, OID_RSASSA_PSS);

            let verified = verify(&algor, SignatureAlgorithm::Rsa).unwrap();
            assert_eq!(verified.digest(), Some(digest));
            assert_eq!(
                verified.pss_params(),
                Some(&PssParams {
                    digest,
                    salt_len: digest.output_len() as u64,
                })
            );
        }
    }

    #[test]
    fn pss_without_parameters_is_rejected() {
        for parameters in [AlgorithmParameters::Absent, AlgorithmParameters::Null] {
            let algor = AlgorithmIdentifier {
                oid: OID_RSASSA_PSS.to_vec(),
                parameters,
            };
            assert_eq!(
                verify(&algor, SignatureAlgorithm::Rsa).unwrap_err(),
                Error::InvalidParameter
            );
        }
    }

    #[test]
    fn pss_empty_parameter_sequence_means_sha1_defaults() {
        let algor = AlgorithmIdentifier {
            oid: OID_RSASSA_PSS.to_vec(),
            parameters: AlgorithmParameters::Explicit(x509::wrap_in_sequence(&[])),
        };
        let verified = verify(&algor, SignatureAlgorithm::Rsa).unwrap();
        assert_eq!(verified.digest(), Some(DigestAlgorithm::Sha1));
        assert_eq!(verified.pss_params().unwrap().salt_len, 20);
    }

    #[test]
    fn pss_mgf_and_hash_must_agree() {
        // build params with [0] sha256 but [1] mgf1-sha384
        let hash = digest_algorithm_identifier(DigestAlgorithm::Sha256);
        let other = digest_algorithm_identifier(DigestAlgorithm::Sha384);
        let mgf = x509::wrap_in_sequence(
            &[
                x509::wrap_in_tag(x509::DER_OBJECT_IDENTIFIER_TAG, OID_MGF1),
                other,
            ]
            .concat(),
        );
        let body = [
            x509::wrap_in_tag(CONTEXT_0, &hash),
            x509::wrap_in_tag(CONTEXT_1, &mgf),
        ]
        .concat();
        let algor = AlgorithmIdentifier {
            oid: OID_RSASSA_PSS.to_vec(),
            parameters: AlgorithmParameters::Explicit(x509::wrap_in_sequence(&body)),
        };
        assert_eq!(
            verify(&algor, SignatureAlgorithm::Rsa).unwrap_err(),
            Error::InvalidParameter
        );
    }

    #[test]
    fn algorithm_identifier_codec_round_trips() {
        for algor in [
            AlgorithmIdentifier {
                oid: OID_ED25519.to_vec(),
                parameters: AlgorithmParameters::Absent,
            },
            AlgorithmIdentifier {
                oid: OID_SHA256_WITH_RSA.to_vec(),
                parameters: AlgorithmParameters::Null,
            },
            AlgorithmIdentifier {
                oid: OID_RSASSA_PSS.to_vec(),
                parameters: AlgorithmParameters::Explicit(x509::wrap_in_sequence(&[])),
            },
        ] {
            let encoded = algor.get_encoding();
            assert_eq!(AlgorithmIdentifier::read_bytes(&encoded), Ok(algor));
        }
    }

    #[test]
    fn algorithm_identifier_rejects_trailing_parameters() {
        // NULL followed by extra junk inside the SEQUENCE
        let body = [
            &x509::wrap_in_tag(x509::DER_OBJECT_IDENTIFIER_TAG, OID_ED25519)[..],
            &[0x05, 0x00, 0x05, 0x00],
        ]
        .concat();
        let encoded = x509::wrap_in_sequence(&body);
        assert!(AlgorithmIdentifier::read_bytes(&encoded).is_err());
    }
}
