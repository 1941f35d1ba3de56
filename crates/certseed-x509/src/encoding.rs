//! DER composition of the certificate model.
//!
//! Everything is assembled bottom-up: inner fields are written first and
//! each wrapper splices its SEQUENCE tag and length in front of the span it
//! covers. Optional TBS fields are emitted with their natural tags and then
//! rewritten in place to the context-specific form.

use certseed_asn1::{tags, DerBuffer, DerEncode, Integer};
use tracing::trace;

use crate::certificate::{
    AlgorithmIdentifier, Field, Name, Parameters, SubjectPublicKeyInfo, TbsCertificate, Time,
    Validity, Version, X509Certificate,
};
use crate::oid_mapping;

impl<T: DerEncode> DerEncode for Field<T> {
    fn encode_der(&self, buf: &mut DerBuffer) {
        match self {
            Field::Typed(value) => value.encode_der(buf),
            Field::RawPdu(pdu) => pdu.encode_der(buf),
        }
    }
}

impl DerEncode for Version {
    fn encode_der(&self, buf: &mut DerBuffer) {
        // version [0] EXPLICIT: a constructed context tag around the INTEGER
        // (RFC 5280, 4.1 & 4.1.2.1).
        let tag_len_pos = buf.len();
        Integer::new(vec![self.number()]).encode_der(buf);
        buf.encode_tag_and_length(
            tags::CONTEXT_SPECIFIC | tags::CONSTRUCTED,
            buf.len() - tag_len_pos,
            tag_len_pos,
        );
    }
}

impl DerEncode for Name {
    fn encode_der(&self, buf: &mut DerBuffer) {
        // RDNSequence: SEQUENCE OF SET OF SEQUENCE { type, value }.
        let tag_len_pos = buf.len();
        for (attr, value) in &self.entries {
            let set_pos = buf.len();
            oid_mapping::dn_attribute(attr).encode_der(buf);
            let str_pos = buf.len();
            buf.extend_from_slice(value.as_bytes());
            // countryName is a PrintableString per RFC 5280, appendix A.
            let string_tag = if attr == "C" {
                tags::PRINTABLE_STRING
            } else {
                tags::UTF8_STRING
            };
            buf.encode_tag_and_length(string_tag, buf.len() - str_pos, str_pos);
            buf.encode_tag_and_length(tags::SEQUENCE, buf.len() - set_pos, set_pos);
            buf.encode_tag_and_length(tags::SET, buf.len() - set_pos, set_pos);
        }
        buf.encode_tag_and_length(tags::SEQUENCE, buf.len() - tag_len_pos, tag_len_pos);
    }
}

impl DerEncode for Time {
    fn encode_der(&self, buf: &mut DerBuffer) {
        match self {
            Time::Utc(utc) => utc.encode_der(buf),
            Time::Generalized(generalized) => generalized.encode_der(buf),
        }
    }
}

impl DerEncode for Validity {
    fn encode_der(&self, buf: &mut DerBuffer) {
        let tag_len_pos = buf.len();
        self.not_before.encode_der(buf);
        self.not_after.encode_der(buf);
        buf.encode_tag_and_length(tags::SEQUENCE, buf.len() - tag_len_pos, tag_len_pos);
    }
}

impl DerEncode for Parameters {
    fn encode_der(&self, buf: &mut DerBuffer) {
        match self {
            Parameters::Absent => {}
            Parameters::Null => buf.extend_from_slice(&[tags::NULL, 0x00]),
            Parameters::Raw(pdu) => pdu.encode_der(buf),
        }
    }
}

impl DerEncode for AlgorithmIdentifier {
    fn encode_der(&self, buf: &mut DerBuffer) {
        let tag_len_pos = buf.len();
        self.algorithm.encode_der(buf);
        self.parameters.encode_der(buf);
        buf.encode_tag_and_length(tags::SEQUENCE, buf.len() - tag_len_pos, tag_len_pos);
    }
}

impl DerEncode for SubjectPublicKeyInfo {
    fn encode_der(&self, buf: &mut DerBuffer) {
        let tag_len_pos = buf.len();
        self.algorithm.encode_der(buf);
        self.subject_public_key.encode_der(buf);
        buf.encode_tag_and_length(tags::SEQUENCE, buf.len() - tag_len_pos, tag_len_pos);
    }
}

impl DerEncode for TbsCertificate {
    fn encode_der(&self, buf: &mut DerBuffer) {
        let tag_len_pos = buf.len();
        self.version.encode_der(buf);
        self.serial_number.encode_der(buf);
        self.signature_algorithm.encode_der(buf);
        self.issuer.encode_der(buf);
        self.validity.encode_der(buf);
        self.subject.encode_der(buf);
        self.subject_public_key_info.encode_der(buf);

        // The unique identifiers and extensions are encoded with their
        // natural tags, then rewritten to [1], [2] and [3]
        // (RFC 5280, 4.1 & 4.1.2.8-4.1.2.9).
        if let Some(issuer_unique_id) = &self.issuer_unique_id {
            let pos_of_tag = buf.len();
            issuer_unique_id.encode_der(buf);
            buf.replace_tag(tags::CONTEXT_SPECIFIC | 0x01, pos_of_tag);
        }
        if let Some(subject_unique_id) = &self.subject_unique_id {
            let pos_of_tag = buf.len();
            subject_unique_id.encode_der(buf);
            buf.replace_tag(tags::CONTEXT_SPECIFIC | 0x02, pos_of_tag);
        }
        if let Some(extensions) = &self.extensions {
            let pos_of_tag = buf.len();
            extensions.encode_der(buf);
            buf.replace_tag(
                tags::CONTEXT_SPECIFIC | tags::CONSTRUCTED | 0x03,
                pos_of_tag,
            );
        }

        buf.encode_tag_and_length(tags::SEQUENCE, buf.len() - tag_len_pos, tag_len_pos);
    }
}

impl DerEncode for X509Certificate {
    fn encode_der(&self, buf: &mut DerBuffer) {
        let tag_len_pos = buf.len();
        self.tbs_certificate.encode_der(buf);
        self.signature_algorithm.encode_der(buf);
        self.signature_value.encode_der(buf);
        buf.encode_tag_and_length(tags::SEQUENCE, buf.len() - tag_len_pos, tag_len_pos);
    }
}

/// Encode one certificate to DER.
pub fn encode_certificate(certificate: &X509Certificate) -> Vec<u8> {
    let mut buf = DerBuffer::new();
    certificate.encode_der(&mut buf);
    trace!(len = buf.len(), "encoded certificate");
    buf.into_bytes()
}
