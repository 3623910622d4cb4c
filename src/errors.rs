//! Error types.

/// Alias for [`core::result::Result`] with this crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types.
#[derive(Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Invalid padding scheme.
    InvalidPaddingScheme,

    /// Decryption error. Used uniformly for every OAEP/PKCS#1v1.5
    /// unpadding failure so no variant name leaks which check failed.
    Decryption,

    /// Verification error.
    Verification,

    /// Message too long.
    MessageTooLong,

    /// Input must be hashed.
    InputNotHashed,

    /// Number of primes must be 2 or greater.
    NprimesTooSmall,

    /// Too few primes of a given length to generate an RSA key.
    TooFewPrimes,

    /// Invalid prime value.
    InvalidPrime,

    /// Invalid modulus.
    InvalidModulus,

    /// Invalid exponent.
    InvalidExponent,

    /// Invalid coefficient.
    InvalidCoefficient,

    /// Modulus too large.
    ModulusTooLarge,

    /// Public exponent too small.
    PublicExponentTooSmall,

    /// Public exponent too large.
    PublicExponentTooLarge,

    /// Internal error.
    Internal,

    /// Label too long.
    LabelTooLong,

    /// Invalid padding length.
    InvalidPadLen,

    /// Invalid arguments.
    InvalidArguments,

    /// Output buffer too small.
    OutputBufferTooSmall,

    /// ASN.1 DER encode/decode failure, with a short static reason.
    Asn1(&'static str),

    /// Prime search exceeded its bounded retry budget.
    PrimeSearchExhausted,

    /// DSA domain parameters failed to validate (e.g. `q` does not divide `p-1`).
    InvalidDomainParams,

    /// DSA signature component (`r` or `s`) out of `[1, q)`.
    InvalidSignature,
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Error::InvalidPaddingScheme => write!(f, "invalid padding scheme"),
            Error::Decryption => write!(f, "decryption error"),
            Error::Verification => write!(f, "verification error"),
            Error::MessageTooLong => write!(f, "message too long"),
            Error::InputNotHashed => write!(f, "input must be hashed"),
            Error::NprimesTooSmall => write!(f, "number of primes must be 2 or greater"),
            Error::TooFewPrimes => write!(f, "too few primes of given length to generate key"),
            Error::InvalidPrime => write!(f, "invalid prime value"),
            Error::InvalidModulus => write!(f, "invalid modulus"),
            Error::InvalidExponent => write!(f, "invalid exponent"),
            Error::InvalidCoefficient => write!(f, "invalid coefficient"),
            Error::ModulusTooLarge => write!(f, "modulus too large"),
            Error::PublicExponentTooSmall => write!(f, "public exponent too small"),
            Error::PublicExponentTooLarge => write!(f, "public exponent too large"),
            Error::Internal => write!(f, "internal error"),
            Error::LabelTooLong => write!(f, "label too long"),
            Error::InvalidPadLen => write!(f, "invalid padding length"),
            Error::InvalidArguments => write!(f, "invalid arguments"),
            Error::OutputBufferTooSmall => write!(f, "output buffer too small"),
            Error::Asn1(reason) => write!(f, "ASN.1 decode error: {reason}"),
            Error::PrimeSearchExhausted => write!(f, "prime search exceeded retry budget"),
            Error::InvalidDomainParams => write!(f, "invalid DSA domain parameters"),
            Error::InvalidSignature => write!(f, "invalid signature"),
        }
    }
}

#[cfg(feature = "std")]
impl From<Error> for signature::Error {
    fn from(err: Error) -> Self {
        Self::from_source(err)
    }
}

#[cfg(not(feature = "std"))]
impl From<Error> for signature::Error {
    fn from(_err: Error) -> Self {
        Self::new()
    }
}
