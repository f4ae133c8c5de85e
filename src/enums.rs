//! Wire-level enums for named groups and alerts.

#![allow(non_camel_case_types)]

use crate::codec::Codec;

enum_builder! {
    /// The `NamedGroup` TLS protocol enum.  Classical values in this enum
    /// are taken from the various RFCs covering TLS, and are listed by
    /// IANA.  Post-quantum and hybrid values live in private-use numbering:
    /// pure KEM groups count up from 0x0200 and each hybrid group is its
    /// pure partner's value plus 0x2000.  The `Unknown` item is used when
    /// processing unrecognized ordinals.
    #[repr(u16)]
    pub enum NamedGroup {
        secp224r1 => 0x0015,
        secp256r1 => 0x0017,
        secp384r1 => 0x0018,
        secp521r1 => 0x0019,
        X25519 => 0x001d,
        CECPQ2 => 0x4138,

        BikeL1 => 0x0200,
        BikeL3 => 0x0201,
        Frodo640Aes => 0x0202,
        Frodo640Shake => 0x0203,
        Frodo976Aes => 0x0204,
        Frodo976Shake => 0x0205,
        Frodo1344Aes => 0x0206,
        Frodo1344Shake => 0x0207,
        Kyber512 => 0x0208,
        Kyber768 => 0x0209,
        Kyber1024 => 0x020a,
        Kyber90s512 => 0x020b,
        Kyber90s768 => 0x020c,
        Kyber90s1024 => 0x020d,
        NtruHps2048509 => 0x020e,
        NtruHps2048677 => 0x020f,
        NtruHps4096821 => 0x0210,
        NtruHrss701 => 0x0211,
        Lightsaber => 0x0212,
        Saber => 0x0213,
        Firesaber => 0x0214,
        SidhP434 => 0x0215,
        SidhP503 => 0x0216,
        SidhP610 => 0x0217,
        SidhP751 => 0x0218,
        SikeP434 => 0x0219,
        SikeP503 => 0x021a,
        SikeP610 => 0x021b,
        SikeP751 => 0x021c,
        Hqc128 => 0x021d,
        Hqc192 => 0x021e,
        Hqc256 => 0x021f,

        P256BikeL1 => 0x2200,
        P384BikeL3 => 0x2201,
        P256Frodo640Aes => 0x2202,
        P256Frodo640Shake => 0x2203,
        P384Frodo976Aes => 0x2204,
        P384Frodo976Shake => 0x2205,
        P521Frodo1344Aes => 0x2206,
        P521Frodo1344Shake => 0x2207,
        P256Kyber512 => 0x2208,
        P384Kyber768 => 0x2209,
        P521Kyber1024 => 0x220a,
        P256Kyber90s512 => 0x220b,
        P384Kyber90s768 => 0x220c,
        P521Kyber90s1024 => 0x220d,
        P256NtruHps2048509 => 0x220e,
        P384NtruHps2048677 => 0x220f,
        P521NtruHps4096821 => 0x2210,
        P384NtruHrss701 => 0x2211,
        P256Lightsaber => 0x2212,
        P384Saber => 0x2213,
        P521Firesaber => 0x2214,
        P256SidhP434 => 0x2215,
        P256SidhP503 => 0x2216,
        P384SidhP610 => 0x2217,
        P521SidhP751 => 0x2218,
        P256SikeP434 => 0x2219,
        P256SikeP503 => 0x221a,
        P384SikeP610 => 0x221b,
        P521SikeP751 => 0x221c,
        P256Hqc128 => 0x221d,
        P384Hqc192 => 0x221e,
        P521Hqc256 => 0x221f,
    }
}

enum_builder! {
    /// The `AlertDescription` TLS protocol enum.  Values in this enum are
    /// taken from the various RFCs covering TLS, and are listed by IANA.
    /// The `Unknown` item is used when processing unrecognized ordinals.
    #[repr(u8)]
    pub enum AlertDescription {
        CloseNotify => 0x00,
        UnexpectedMessage => 0x0a,
        BadRecordMac => 0x14,
        DecryptionFailed => 0x15,
        RecordOverflow => 0x16,
        DecompressionFailure => 0x1e,
        HandshakeFailure => 0x28,
        NoCertificate => 0x29,
        BadCertificate => 0x2a,
        UnsupportedCertificate => 0x2b,
        CertificateRevoked => 0x2c,
        CertificateExpired => 0x2d,
        CertificateUnknown => 0x2e,
        IllegalParameter => 0x2f,
        UnknownCA => 0x30,
        AccessDenied => 0x31,
        DecodeError => 0x32,
        DecryptError => 0x33,
        ExportRestriction => 0x3c,
        ProtocolVersion => 0x46,
        InsufficientSecurity => 0x47,
        InternalError => 0x50,
        InappropriateFallback => 0x56,
        UserCanceled => 0x5a,
        NoRenegotiation => 0x64,
        MissingExtension => 0x6d,
        UnsupportedExtension => 0x6e,
        CertificateUnobtainable => 0x6f,
        UnrecognisedName => 0x70,
        BadCertificateStatusResponse => 0x71,
        BadCertificateHashValue => 0x72,
        UnknownPSKIdentity => 0x73,
        CertificateRequired => 0x74,
        NoApplicationProtocol => 0x78,
    }
}
