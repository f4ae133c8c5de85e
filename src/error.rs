//! Error types used throughout this crate.

use core::fmt;

use crate::enums::AlertDescription;

/// Errors reported by key-share and signature-algorithm operations.
///
/// Failures are never recovered internally: on any error the operation's
/// outputs are indeterminate and the key share involved must be discarded.
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
    /// The peer sent a key share we could not use: wrong length, a point
    /// not in SEC1 uncompressed form or not on the curve, or a KEM input
    /// that failed to decapsulate.
    InvalidPeerKeyShare,

    /// A signature algorithm identifier was not in the supported set.
    UnknownSignatureAlgorithm,

    /// The signature algorithm implies a different public key type than
    /// the one supplied.
    WrongPublicKeyType,

    /// The signature algorithm names a digest we have no implementation of.
    UnknownDigest,

    /// No signature algorithm identifier exists for this digest and key
    /// type combination.
    UnsupportedDigestAndKeyType,

    /// A signing or verification context was missing its key or digest.
    ContextNotInitialised,

    /// An `AlgorithmIdentifier` carried parameters that are not valid for
    /// its algorithm.
    InvalidParameter,

    /// A wire or DER structure could not be parsed.
    InvalidMessage(InvalidMessage),

    /// We failed to acquire random bytes from the system.
    FailedToGetRandomBytes,

    /// A key generation, encapsulation or decapsulation primitive failed
    /// for a reason not attributable to the peer.
    PrivateKeyOperationFailed,

    /// A key share operation was invoked in the wrong state, for example
    /// `finish` before the share was armed.
    InconsistentKeyShareState,

    /// This key share type does not support serialization.
    KeyShareNotSerializable,
}

impl Error {
    /// The TLS alert a handshake should send for this error, if any.
    ///
    /// Peer-attributable failures map to `decode_error`; local failures map
    /// to `internal_error`.  Certificate-path errors have no alert at this
    /// layer and return `None`.
    pub fn alert(&self) -> Option<AlertDescription> {
        match self {
            Self::InvalidPeerKeyShare | Self::InvalidMessage(_) => {
                Some(AlertDescription::DecodeError)
            }
            Self::FailedToGetRandomBytes
            | Self::PrivateKeyOperationFailed
            | Self::InconsistentKeyShareState => Some(AlertDescription::InternalError),
            _ => None,
        }
    }
}

impl From<InvalidMessage> for Error {
    fn from(e: InvalidMessage) -> Self {
        Self::InvalidMessage(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPeerKeyShare => write!(f, "received malformed or unusable peer key share"),
            Self::UnknownSignatureAlgorithm => write!(f, "unknown signature algorithm"),
            Self::WrongPublicKeyType => {
                write!(f, "signature algorithm does not match public key type")
            }
            Self::UnknownDigest => write!(f, "unknown message digest algorithm"),
            Self::UnsupportedDigestAndKeyType => {
                write!(f, "digest and key type combination is not supported")
            }
            Self::ContextNotInitialised => write!(f, "context not initialised"),
            Self::InvalidParameter => write!(f, "invalid algorithm parameter"),
            Self::InvalidMessage(typ) => write!(f, "invalid message: {typ:?}"),
            Self::FailedToGetRandomBytes => write!(f, "failed to get random bytes"),
            Self::PrivateKeyOperationFailed => write!(f, "private key operation failed"),
            Self::InconsistentKeyShareState => {
                write!(f, "key share operation invoked in the wrong state")
            }
            Self::KeyShareNotSerializable => {
                write!(f, "this key share type cannot be serialized")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A byte structure we received was somehow malformed.
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InvalidMessage {
    /// A structure was shorter than its length prefix promised.
    MessageTooShort,
    /// A field element was absent; the parameter names the field type.
    MissingData(&'static str),
    /// Unconsumed bytes followed a complete structure.
    TrailingData(&'static str),
    /// A DER element had an unexpected tag or a malformed length or body.
    InvalidDer(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_mapping() {
        assert_eq!(
            Error::InvalidPeerKeyShare.alert(),
            Some(AlertDescription::DecodeError)
        );
        assert_eq!(
            Error::InvalidMessage(InvalidMessage::MessageTooShort).alert(),
            Some(AlertDescription::DecodeError)
        );
        assert_eq!(
            Error::FailedToGetRandomBytes.alert(),
            Some(AlertDescription::InternalError)
        );
        assert_eq!(
            Error::PrivateKeyOperationFailed.alert(),
            Some(AlertDescription::InternalError)
        );
        assert_eq!(Error::UnknownSignatureAlgorithm.alert(), None);
        assert_eq!(Error::WrongPublicKeyType.alert(), None);
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(
            format!("{}", Error::UnknownDigest),
            "unknown message digest algorithm"
        );
        assert_eq!(
            format!("{}", Error::from(InvalidMessage::MessageTooShort)),
            "invalid message: MessageTooShort"
        );
    }
}
