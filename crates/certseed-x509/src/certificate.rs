//! Certificate model types.
//!
//! Every structured field is wrapped in [`Field`], which lets a caller swap
//! the typed encoding for an arbitrary raw PDU. That escape hatch, applied
//! recursively, is what turns a well-formed certificate description into a
//! malformed-input generator.

use certseed_asn1::{BitString, GeneralizedTime, Integer, ObjectIdentifier, Pdu, UtcTime};
use certseed_types::ModelError;

use crate::extensions::Extensions;

/// A structured field: typed content, or an arbitrary PDU spliced in its
/// place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Field<T> {
    Typed(T),
    RawPdu(Pdu),
}

impl<T: Default> Default for Field<T> {
    fn default() -> Self {
        Field::Typed(T::default())
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Typed(value)
    }
}

/// The X.509 version number, `INTEGER { v1(0), v2(1), v3(2) }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Version {
    V1,
    V2,
    #[default]
    V3,
}

impl Version {
    /// The wire value: one less than the marketing number.
    pub fn number(self) -> u8 {
        match self {
            Version::V1 => 0,
            Version::V2 => 1,
            Version::V3 => 2,
        }
    }
}

impl TryFrom<u8> for Version {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Version::V1),
            1 => Ok(Version::V2),
            2 => Ok(Version::V3),
            got => Err(ModelError::InvalidVersion { got }),
        }
    }
}

/// A distinguished name, as ordered `(attribute, value)` pairs.
///
/// Attributes are short names ("CN", "C", "O", ...); unknown attributes fall
/// back to the commonName OID. An empty entry list encodes as an empty
/// SEQUENCE.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Name {
    pub entries: Vec<(String, String)>,
}

/// The Time CHOICE of RFC 5280, 4.1.2.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Time {
    Utc(UtcTime),
    Generalized(GeneralizedTime),
}

impl Default for Time {
    fn default() -> Self {
        Time::Utc(UtcTime::default())
    }
}

/// The certificate validity window.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Validity {
    pub not_before: Field<Time>,
    pub not_after: Field<Time>,
}

/// AlgorithmIdentifier parameters: absent, NULL, or anything at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Parameters {
    #[default]
    Absent,
    Null,
    Raw(Pdu),
}

/// AlgorithmIdentifier, RFC 5280, 4.1.1.2.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct AlgorithmIdentifier {
    pub algorithm: Field<ObjectIdentifier>,
    pub parameters: Parameters,
}

/// SubjectPublicKeyInfo, RFC 5280, 4.1.2.7.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct SubjectPublicKeyInfo {
    pub algorithm: Field<AlgorithmIdentifier>,
    pub subject_public_key: Field<BitString>,
}

/// The TBSCertificate body, RFC 5280, 4.1.
///
/// The unique identifiers and extensions are emitted whenever present,
/// independent of the version number: inputs the RFC forbids are exactly
/// the interesting ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct TbsCertificate {
    pub version: Field<Version>,
    pub serial_number: Field<Integer>,
    pub signature_algorithm: Field<AlgorithmIdentifier>,
    pub issuer: Field<Name>,
    pub validity: Field<Validity>,
    pub subject: Field<Name>,
    pub subject_public_key_info: Field<SubjectPublicKeyInfo>,
    pub issuer_unique_id: Option<Field<BitString>>,
    pub subject_unique_id: Option<Field<BitString>>,
    pub extensions: Option<Field<Extensions>>,
}

/// A complete certificate: TBS body, signature algorithm, signature value.
///
/// No signing happens anywhere in this crate; the signature value is
/// whatever octets the caller supplies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct X509Certificate {
    pub tbs_certificate: Field<TbsCertificate>,
    pub signature_algorithm: Field<AlgorithmIdentifier>,
    pub signature_value: Field<BitString>,
}
