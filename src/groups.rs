//! The named group registry.
//!
//! One static table ties together the three identifier spaces a key
//! exchange group lives in: the numeric NID, the 16-bit wire value
//! ([`NamedGroup`]), and the human-readable name/alias pair.  The table is
//! immutable for the lifetime of the process and small enough that every
//! lookup is a linear scan.

use std::sync::Once;

use oqs::kem::Algorithm;

use crate::enums::NamedGroup;
use crate::nid;

/// One registry entry for a named group.
#[derive(Clone, Copy, Debug)]
pub struct NamedGroupInfo {
    /// Numeric identifier of the group's curve or algorithm object.
    pub nid: i32,
    /// The TLS wire identifier.
    pub group: NamedGroup,
    /// Preferred name.
    pub name: &'static str,
    /// Accepted alternative name.
    pub alias: &'static str,
    pub(crate) kind: GroupKind,
}

/// How the factory realizes a group.
#[derive(Clone, Copy, Debug)]
pub(crate) enum GroupKind {
    Ec(EcCurve),
    X25519,
    Cecpq2,
    Oqs(Algorithm),
    Hybrid {
        classical: NamedGroup,
        kem: Algorithm,
    },
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum EcCurve {
    P224,
    P256,
    P384,
    P521,
}

impl NamedGroupInfo {
    /// Whether the group's underlying primitive is available at runtime.
    ///
    /// Elliptic curve and X25519 groups are always available.  Groups that
    /// lean on liboqs are subject to its build-time algorithm selection.
    pub fn supported(&self) -> bool {
        match self.kind {
            GroupKind::Ec(_) | GroupKind::X25519 => true,
            GroupKind::Cecpq2 => {
                liboqs_init();
                Algorithm::NtruHrss701.is_enabled()
            }
            GroupKind::Oqs(alg) | GroupKind::Hybrid { kem: alg, .. } => {
                liboqs_init();
                alg.is_enabled()
            }
        }
    }
}

static LIBOQS_INIT: Once = Once::new();

/// liboqs wants a one-time global initialisation before first use.
pub(crate) fn liboqs_init() {
    LIBOQS_INIT.call_once(|| {
        oqs::init();
    });
}

const fn ec(nid: i32, group: NamedGroup, name: &'static str, alias: &'static str, curve: EcCurve) -> NamedGroupInfo {
    NamedGroupInfo {
        nid,
        group,
        name,
        alias,
        kind: GroupKind::Ec(curve),
    }
}

const fn pq(nid: i32, group: NamedGroup, name: &'static str, alg: Algorithm) -> NamedGroupInfo {
    NamedGroupInfo {
        nid,
        group,
        name,
        alias: name,
        kind: GroupKind::Oqs(alg),
    }
}

const fn hybrid(
    nid: i32,
    group: NamedGroup,
    name: &'static str,
    classical: NamedGroup,
    alg: Algorithm,
) -> NamedGroupInfo {
    NamedGroupInfo {
        nid,
        group,
        name,
        alias: name,
        kind: GroupKind::Hybrid {
            classical,
            kem: alg,
        },
    }
}

static NAMED_GROUPS: &[NamedGroupInfo] = &[
    ec(nid::SECP224R1, NamedGroup::secp224r1, "P-224", "secp224r1", EcCurve::P224),
    ec(nid::X9_62_PRIME256V1, NamedGroup::secp256r1, "P-256", "prime256v1", EcCurve::P256),
    ec(nid::SECP384R1, NamedGroup::secp384r1, "P-384", "secp384r1", EcCurve::P384),
    ec(nid::SECP521R1, NamedGroup::secp521r1, "P-521", "secp521r1", EcCurve::P521),
    NamedGroupInfo {
        nid: nid::X25519,
        group: NamedGroup::X25519,
        name: "X25519",
        alias: "x25519",
        kind: GroupKind::X25519,
    },
    NamedGroupInfo {
        nid: nid::CECPQ2,
        group: NamedGroup::CECPQ2,
        name: "CECPQ2",
        alias: "CECPQ2",
        kind: GroupKind::Cecpq2,
    },
    pq(nid::BIKEL1, NamedGroup::BikeL1, "bikel1", Algorithm::BikeL1),
    hybrid(nid::P256_BIKEL1, NamedGroup::P256BikeL1, "p256_bikel1", NamedGroup::secp256r1, Algorithm::BikeL1),
    pq(nid::BIKEL3, NamedGroup::BikeL3, "bikel3", Algorithm::BikeL3),
    hybrid(nid::P384_BIKEL3, NamedGroup::P384BikeL3, "p384_bikel3", NamedGroup::secp384r1, Algorithm::BikeL3),
    pq(nid::FRODO640AES, NamedGroup::Frodo640Aes, "frodo640aes", Algorithm::FrodoKem640Aes),
    hybrid(nid::P256_FRODO640AES, NamedGroup::P256Frodo640Aes, "p256_frodo640aes", NamedGroup::secp256r1, Algorithm::FrodoKem640Aes),
    pq(nid::FRODO640SHAKE, NamedGroup::Frodo640Shake, "frodo640shake", Algorithm::FrodoKem640Shake),
    hybrid(nid::P256_FRODO640SHAKE, NamedGroup::P256Frodo640Shake, "p256_frodo640shake", NamedGroup::secp256r1, Algorithm::FrodoKem640Shake),
    pq(nid::FRODO976AES, NamedGroup::Frodo976Aes, "frodo976aes", Algorithm::FrodoKem976Aes),
    hybrid(nid::P384_FRODO976AES, NamedGroup::P384Frodo976Aes, "p384_frodo976aes", NamedGroup::secp384r1, Algorithm::FrodoKem976Aes),
    pq(nid::FRODO976SHAKE, NamedGroup::Frodo976Shake, "frodo976shake", Algorithm::FrodoKem976Shake),
    hybrid(nid::P384_FRODO976SHAKE, NamedGroup::P384Frodo976Shake, "p384_frodo976shake", NamedGroup::secp384r1, Algorithm::FrodoKem976Shake),
    pq(nid::FRODO1344AES, NamedGroup::Frodo1344Aes, "frodo1344aes", Algorithm::FrodoKem1344Aes),
    hybrid(nid::P521_FRODO1344AES, NamedGroup::P521Frodo1344Aes, "p521_frodo1344aes", NamedGroup::secp521r1, Algorithm::FrodoKem1344Aes),
    pq(nid::FRODO1344SHAKE, NamedGroup::Frodo1344Shake, "frodo1344shake", Algorithm::FrodoKem1344Shake),
    hybrid(nid::P521_FRODO1344SHAKE, NamedGroup::P521Frodo1344Shake, "p521_frodo1344shake", NamedGroup::secp521r1, Algorithm::FrodoKem1344Shake),
    pq(nid::KYBER512, NamedGroup::Kyber512, "kyber512", Algorithm::Kyber512),
    hybrid(nid::P256_KYBER512, NamedGroup::P256Kyber512, "p256_kyber512", NamedGroup::secp256r1, Algorithm::Kyber512),
    pq(nid::KYBER768, NamedGroup::Kyber768, "kyber768", Algorithm::Kyber768),
    hybrid(nid::P384_KYBER768, NamedGroup::P384Kyber768, "p384_kyber768", NamedGroup::secp384r1, Algorithm::Kyber768),
    pq(nid::KYBER1024, NamedGroup::Kyber1024, "kyber1024", Algorithm::Kyber1024),
    hybrid(nid::P521_KYBER1024, NamedGroup::P521Kyber1024, "p521_kyber1024", NamedGroup::secp521r1, Algorithm::Kyber1024),
    pq(nid::KYBER90S512, NamedGroup::Kyber90s512, "kyber90s512", Algorithm::Kyber512_90s),
    hybrid(nid::P256_KYBER90S512, NamedGroup::P256Kyber90s512, "p256_kyber90s512", NamedGroup::secp256r1, Algorithm::Kyber512_90s),
    pq(nid::KYBER90S768, NamedGroup::Kyber90s768, "kyber90s768", Algorithm::Kyber768_90s),
    hybrid(nid::P384_KYBER90S768, NamedGroup::P384Kyber90s768, "p384_kyber90s768", NamedGroup::secp384r1, Algorithm::Kyber768_90s),
    pq(nid::KYBER90S1024, NamedGroup::Kyber90s1024, "kyber90s1024", Algorithm::Kyber1024_90s),
    hybrid(nid::P521_KYBER90S1024, NamedGroup::P521Kyber90s1024, "p521_kyber90s1024", NamedGroup::secp521r1, Algorithm::Kyber1024_90s),
    pq(nid::NTRU_HPS2048509, NamedGroup::NtruHps2048509, "ntru_hps2048509", Algorithm::NtruHps2048509),
    hybrid(nid::P256_NTRU_HPS2048509, NamedGroup::P256NtruHps2048509, "p256_ntru_hps2048509", NamedGroup::secp256r1, Algorithm::NtruHps2048509),
    pq(nid::NTRU_HPS2048677, NamedGroup::NtruHps2048677, "ntru_hps2048677", Algorithm::NtruHps2048677),
    hybrid(nid::P384_NTRU_HPS2048677, NamedGroup::P384NtruHps2048677, "p384_ntru_hps2048677", NamedGroup::secp384r1, Algorithm::NtruHps2048677),
    pq(nid::NTRU_HPS4096821, NamedGroup::NtruHps4096821, "ntru_hps4096821", Algorithm::NtruHps4096821),
    hybrid(nid::P521_NTRU_HPS4096821, NamedGroup::P521NtruHps4096821, "p521_ntru_hps4096821", NamedGroup::secp521r1, Algorithm::NtruHps4096821),
    pq(nid::NTRU_HRSS701, NamedGroup::NtruHrss701, "ntru_hrss701", Algorithm::NtruHrss701),
    hybrid(nid::P384_NTRU_HRSS701, NamedGroup::P384NtruHrss701, "p384_ntru_hrss701", NamedGroup::secp384r1, Algorithm::NtruHrss701),
    pq(nid::LIGHTSABER, NamedGroup::Lightsaber, "lightsaber", Algorithm::Lightsaber),
    hybrid(nid::P256_LIGHTSABER, NamedGroup::P256Lightsaber, "p256_lightsaber", NamedGroup::secp256r1, Algorithm::Lightsaber),
    pq(nid::SABER, NamedGroup::Saber, "saber", Algorithm::Saber),
    hybrid(nid::P384_SABER, NamedGroup::P384Saber, "p384_saber", NamedGroup::secp384r1, Algorithm::Saber),
    pq(nid::FIRESABER, NamedGroup::Firesaber, "firesaber", Algorithm::Firesaber),
    hybrid(nid::P521_FIRESABER, NamedGroup::P521Firesaber, "p521_firesaber", NamedGroup::secp521r1, Algorithm::Firesaber),
    pq(nid::SIDHP434, NamedGroup::SidhP434, "sidhp434", Algorithm::SidhP434),
    hybrid(nid::P256_SIDHP434, NamedGroup::P256SidhP434, "p256_sidhp434", NamedGroup::secp256r1, Algorithm::SidhP434),
    pq(nid::SIDHP503, NamedGroup::SidhP503, "sidhp503", Algorithm::SidhP503),
    hybrid(nid::P256_SIDHP503, NamedGroup::P256SidhP503, "p256_sidhp503", NamedGroup::secp256r1, Algorithm::SidhP503),
    pq(nid::SIDHP610, NamedGroup::SidhP610, "sidhp610", Algorithm::SidhP610),
    hybrid(nid::P384_SIDHP610, NamedGroup::P384SidhP610, "p384_sidhp610", NamedGroup::secp384r1, Algorithm::SidhP610),
    pq(nid::SIDHP751, NamedGroup::SidhP751, "sidhp751", Algorithm::SidhP751),
    hybrid(nid::P521_SIDHP751, NamedGroup::P521SidhP751, "p521_sidhp751", NamedGroup::secp521r1, Algorithm::SidhP751),
    pq(nid::SIKEP434, NamedGroup::SikeP434, "sikep434", Algorithm::SikeP434),
    hybrid(nid::P256_SIKEP434, NamedGroup::P256SikeP434, "p256_sikep434", NamedGroup::secp256r1, Algorithm::SikeP434),
    pq(nid::SIKEP503, NamedGroup::SikeP503, "sikep503", Algorithm::SikeP503),
    hybrid(nid::P256_SIKEP503, NamedGroup::P256SikeP503, "p256_sikep503", NamedGroup::secp256r1, Algorithm::SikeP503),
    pq(nid::SIKEP610, NamedGroup::SikeP610, "sikep610", Algorithm::SikeP610),
    hybrid(nid::P384_SIKEP610, NamedGroup::P384SikeP610, "p384_sikep610", NamedGroup::secp384r1, Algorithm::SikeP610),
    pq(nid::SIKEP751, NamedGroup::SikeP751, "sikep751", Algorithm::SikeP751),
    hybrid(nid::P521_SIKEP751, NamedGroup::P521SikeP751, "p521_sikep751", NamedGroup::secp521r1, Algorithm::SikeP751),
    pq(nid::HQC128, NamedGroup::Hqc128, "hqc128", Algorithm::Hqc128),
    hybrid(nid::P256_HQC128, NamedGroup::P256Hqc128, "p256_hqc128", NamedGroup::secp256r1, Algorithm::Hqc128),
    pq(nid::HQC192, NamedGroup::Hqc192, "hqc192", Algorithm::Hqc192),
    hybrid(nid::P384_HQC192, NamedGroup::P384Hqc192, "p384_hqc192", NamedGroup::secp384r1, Algorithm::Hqc192),
    pq(nid::HQC256, NamedGroup::Hqc256, "hqc256", Algorithm::Hqc256),
    hybrid(nid::P521_HQC256, NamedGroup::P521Hqc256, "p521_hqc256", NamedGroup::secp521r1, Algorithm::Hqc256),
];

/// All named groups known to this crate, in registry order.
pub fn all_named_groups() -> &'static [NamedGroupInfo] {
    NAMED_GROUPS
}

/// Look up a registry entry by its wire identifier.
pub fn lookup_by_group(group: NamedGroup) -> Option<&'static NamedGroupInfo> {
    NAMED_GROUPS
        .iter()
        .find(|info| info.group == group)
}

/// Translate a NID into a wire identifier.
pub fn nid_to_group_id(nid: i32) -> Option<NamedGroup> {
    NAMED_GROUPS
        .iter()
        .find(|info| info.nid == nid)
        .map(|info| info.group)
}

/// Translate a name or alias into a wire identifier.
///
/// Matching is case-sensitive and the whole string must match; there is no
/// prefix matching.
pub fn name_to_group_id(name: &str) -> Option<NamedGroup> {
    NAMED_GROUPS
        .iter()
        .find(|info| info.name == name || info.alias == name)
        .map(|info| info.group)
}

/// The preferred name of a group, if it is known.
pub fn curve_name_of(group: NamedGroup) -> Option<&'static str> {
    lookup_by_group(group).map(|info| info.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_ids_and_nids_are_distinct() {
        for (i, a) in NAMED_GROUPS.iter().enumerate() {
            for b in &NAMED_GROUPS[i + 1..] {
                assert_ne!(u16::from(a.group), u16::from(b.group), "{} / {}", a.name, b.name);
                assert_ne!(a.nid, b.nid, "{} / {}", a.name, b.name);
            }
        }
    }

    #[test]
    fn registry_bijection() {
        for info in NAMED_GROUPS {
            assert_eq!(nid_to_group_id(info.nid), Some(info.group));
            assert_eq!(name_to_group_id(info.name), Some(info.group));
            assert_eq!(name_to_group_id(info.alias), Some(info.group));
            assert_eq!(
                lookup_by_group(info.group).map(|found| found.nid),
                Some(info.nid)
            );
            assert_eq!(curve_name_of(info.group), Some(info.name));
        }
    }

    #[test]
    fn name_lookup_is_exact() {
        assert_eq!(name_to_group_id("P-256"), Some(NamedGroup::secp256r1));
        assert_eq!(name_to_group_id("prime256v1"), Some(NamedGroup::secp256r1));
        assert_eq!(name_to_group_id("P-25"), None);
        assert_eq!(name_to_group_id("P-2566"), None);
        assert_eq!(name_to_group_id("p-256"), None);
        assert_eq!(name_to_group_id(""), None);
    }

    #[test]
    fn unknown_ids_are_not_errors() {
        assert!(lookup_by_group(NamedGroup::Unknown(0x9999)).is_none());
        assert!(nid_to_group_id(-1).is_none());
        assert!(curve_name_of(NamedGroup::Unknown(0x9999)).is_none());
    }

    #[test]
    fn every_hybrid_base_is_a_registered_classical_group() {
        for info in NAMED_GROUPS {
            if let GroupKind::Hybrid { classical, .. } = info.kind {
                let base = lookup_by_group(classical).expect("hybrid base missing");
                // the factory recurses into the base group exactly once
                assert!(matches!(base.kind, GroupKind::Ec(_) | GroupKind::X25519));
            }
        }
    }

    #[test]
    fn classical_groups_are_always_supported() {
        for name in ["P-224", "P-256", "P-384", "P-521", "X25519"] {
            let group = name_to_group_id(name).unwrap();
            assert!(lookup_by_group(group).unwrap().supported());
        }
    }
}
