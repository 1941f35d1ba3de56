//! X.509 extension types and their DER content encoders.

use certseed_asn1::{
    tags, BitString, Boolean, DerBuffer, DerEncode, Integer, ObjectIdentifier, Pdu, UnusedBits,
};

use crate::certificate::Name;
use crate::oid_mapping;

/// The extension list of a TBSCertificate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Extensions {
    pub list: Vec<Extension>,
}

/// A single extension: `SEQUENCE { extnID, critical, extnValue }`.
///
/// `critical` defaults to FALSE and, per the DER DEFAULT rule, a FALSE value
/// is left out of the encoding entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Extension {
    pub critical: bool,
    pub kind: ExtensionKind,
}

/// The known extension kinds, plus a raw fallback carrying its own OID.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum ExtensionKind {
    AuthorityKeyIdentifier(AuthorityKeyIdentifier),
    SubjectKeyIdentifier(SubjectKeyIdentifier),
    KeyUsage(KeyUsage),
    BasicConstraints(BasicConstraints),
    ExtendedKeyUsage(ExtendedKeyUsage),
    Raw(RawExtension),
}

/// AuthorityKeyIdentifier, RFC 5280, 4.2.1.1.
///
/// Each present field is encoded with its natural universal tag and then
/// rewritten to the context-specific form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Option<Vec<u8>>,
    pub authority_cert_issuer: Option<Name>,
    pub authority_cert_serial_number: Option<Integer>,
}

/// SubjectKeyIdentifier, RFC 5280, 4.2.1.2: an OCTET STRING.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct SubjectKeyIdentifier {
    pub key_identifier: Vec<u8>,
}

/// KeyUsage, RFC 5280, 4.2.1.3.
///
/// BIT STRING bit 0 (digitalSignature) is the most significant bit of the
/// first content octet; bit 8 (decipherOnly) the most significant bit of
/// the second. The encoder always emits both octets with seven unused bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct KeyUsage {
    pub digital_signature: bool,
    pub non_repudiation: bool,
    pub key_encipherment: bool,
    pub data_encipherment: bool,
    pub key_agreement: bool,
    pub key_cert_sign: bool,
    pub crl_sign: bool,
    pub encipher_only: bool,
    pub decipher_only: bool,
}

impl KeyUsage {
    fn mask_octets(self) -> [u8; 2] {
        let mut first = 0u8;
        if self.digital_signature {
            first |= 0x80;
        }
        if self.non_repudiation {
            first |= 0x40;
        }
        if self.key_encipherment {
            first |= 0x20;
        }
        if self.data_encipherment {
            first |= 0x10;
        }
        if self.key_agreement {
            first |= 0x08;
        }
        if self.key_cert_sign {
            first |= 0x04;
        }
        if self.crl_sign {
            first |= 0x02;
        }
        if self.encipher_only {
            first |= 0x01;
        }
        let second = if self.decipher_only { 0x80 } else { 0x00 };
        [first, second]
    }
}

/// BasicConstraints, RFC 5280, 4.2.1.9. `cA` is DEFAULT FALSE and omitted
/// when false.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct BasicConstraints {
    pub ca: bool,
    pub path_len_constraint: Option<Integer>,
}

/// ExtendedKeyUsage, RFC 5280, 4.2.1.12: at least one purpose OID.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct ExtendedKeyUsage {
    pub key_purpose: ObjectIdentifier,
    pub additional: Vec<ObjectIdentifier>,
}

/// An extension of the caller's choosing: own OID, own body.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct RawExtension {
    pub oid: ObjectIdentifier,
    pub body: RawExtensionBody,
}

/// The inner content of a raw extension's extnValue.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum RawExtensionBody {
    Pdu(Pdu),
    OctetString(Vec<u8>),
}

impl DerEncode for Extensions {
    fn encode_der(&self, buf: &mut DerBuffer) {
        let tag_len_pos = buf.len();
        for extension in &self.list {
            extension.encode_der(buf);
        }
        buf.encode_tag_and_length(tags::SEQUENCE, buf.len() - tag_len_pos, tag_len_pos);
    }
}

impl DerEncode for Extension {
    fn encode_der(&self, buf: &mut DerBuffer) {
        let tag_len_pos = buf.len();
        match &self.kind {
            ExtensionKind::Raw(raw) => raw.oid.encode_der(buf),
            kind => kind.extn_id().encode_der(buf),
        }
        if self.critical {
            Boolean { val: true }.encode_der(buf);
        }
        let value_pos = buf.len();
        self.kind.encode_content(buf);
        buf.encode_tag_and_length(tags::OCTET_STRING, buf.len() - value_pos, value_pos);
        buf.encode_tag_and_length(tags::SEQUENCE, buf.len() - tag_len_pos, tag_len_pos);
    }
}

impl ExtensionKind {
    fn extn_id(&self) -> ObjectIdentifier {
        match self {
            ExtensionKind::AuthorityKeyIdentifier(_) => oid_mapping::authority_key_identifier(),
            ExtensionKind::SubjectKeyIdentifier(_) => oid_mapping::subject_key_identifier(),
            ExtensionKind::KeyUsage(_) => oid_mapping::key_usage(),
            ExtensionKind::BasicConstraints(_) => oid_mapping::basic_constraints(),
            ExtensionKind::ExtendedKeyUsage(_) => oid_mapping::ext_key_usage(),
            ExtensionKind::Raw(raw) => raw.oid.clone(),
        }
    }

    /// Write the extnValue contents, before the OCTET STRING wrapper.
    fn encode_content(&self, buf: &mut DerBuffer) {
        match self {
            ExtensionKind::AuthorityKeyIdentifier(aki) => aki.encode_der(buf),
            ExtensionKind::SubjectKeyIdentifier(ski) => {
                let pos = buf.len();
                buf.extend_from_slice(&ski.key_identifier);
                buf.encode_tag_and_length(tags::OCTET_STRING, buf.len() - pos, pos);
            }
            ExtensionKind::KeyUsage(ku) => {
                let pos = buf.len();
                let octets = ku.mask_octets();
                buf.push(7);
                buf.extend_from_slice(&octets);
                buf.encode_tag_and_length(tags::BIT_STRING, buf.len() - pos, pos);
            }
            ExtensionKind::BasicConstraints(bc) => bc.encode_der(buf),
            ExtensionKind::ExtendedKeyUsage(eku) => eku.encode_der(buf),
            ExtensionKind::Raw(raw) => match &raw.body {
                RawExtensionBody::Pdu(pdu) => pdu.encode_der(buf),
                RawExtensionBody::OctetString(bytes) => buf.extend_from_slice(bytes),
            },
        }
    }
}

impl DerEncode for AuthorityKeyIdentifier {
    fn encode_der(&self, buf: &mut DerBuffer) {
        let tag_len_pos = buf.len();
        if let Some(key_id) = &self.key_identifier {
            let pos_of_tag = buf.len();
            buf.extend_from_slice(key_id);
            buf.encode_tag_and_length(tags::OCTET_STRING, buf.len() - pos_of_tag, pos_of_tag);
            buf.replace_tag(tags::CONTEXT_SPECIFIC, pos_of_tag);
        }
        if let Some(issuer) = &self.authority_cert_issuer {
            let pos_of_tag = buf.len();
            issuer.encode_der(buf);
            buf.replace_tag(tags::CONTEXT_SPECIFIC | tags::CONSTRUCTED | 0x01, pos_of_tag);
        }
        if let Some(serial) = &self.authority_cert_serial_number {
            let pos_of_tag = buf.len();
            serial.encode_der(buf);
            buf.replace_tag(tags::CONTEXT_SPECIFIC | 0x02, pos_of_tag);
        }
        buf.encode_tag_and_length(tags::SEQUENCE, buf.len() - tag_len_pos, tag_len_pos);
    }
}

impl DerEncode for BasicConstraints {
    fn encode_der(&self, buf: &mut DerBuffer) {
        let tag_len_pos = buf.len();
        if self.ca {
            Boolean { val: true }.encode_der(buf);
        }
        if let Some(path_len) = &self.path_len_constraint {
            path_len.encode_der(buf);
        }
        buf.encode_tag_and_length(tags::SEQUENCE, buf.len() - tag_len_pos, tag_len_pos);
    }
}

impl DerEncode for ExtendedKeyUsage {
    fn encode_der(&self, buf: &mut DerBuffer) {
        let tag_len_pos = buf.len();
        self.key_purpose.encode_der(buf);
        for oid in &self.additional {
            oid.encode_der(buf);
        }
        buf.encode_tag_and_length(tags::SEQUENCE, buf.len() - tag_len_pos, tag_len_pos);
    }
}

/// The mutated-signature replacement values used by the chain composer.
pub(crate) fn signature_bit_string(valid: bool) -> BitString {
    let content = if valid { b"1".to_vec() } else { b"0".to_vec() };
    BitString::new(UnusedBits::ZERO, content)
}
