//! The recursive Tag-Length-Value tree and its encoder.

use tracing::debug;

use crate::writer::DerBuffer;
use crate::{varint, DerEncode};

/// The maximum level of nesting the encoder will follow. Deeper trees yield
/// an empty encoding rather than a partial one.
pub const RECURSION_LIMIT: usize = 200;

/// ASN.1 identifier class bits (X.690 (2015), 8.1.2.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum TagClass {
    #[default]
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl TagClass {
    /// The class bits positioned in bits 8-7 of the identifier octet.
    pub fn bits(self) -> u8 {
        match self {
            TagClass::Universal => 0x00,
            TagClass::Application => 0x40,
            TagClass::ContextSpecific => 0x80,
            TagClass::Private => 0xC0,
        }
    }
}

/// Primitive/constructed flag, bit 6 of the identifier octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum TagEncoding {
    #[default]
    Primitive,
    Constructed,
}

impl TagEncoding {
    pub fn bits(self) -> u8 {
        match self {
            TagEncoding::Primitive => 0x00,
            TagEncoding::Constructed => 0x20,
        }
    }
}

/// An ASN.1 identifier. Tag numbers up to 30 encode in a single octet;
/// larger ones use the high-tag-number continuation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Identifier {
    pub class: TagClass,
    pub encoding: TagEncoding,
    pub tag_num: u32,
}

impl Identifier {
    pub fn new(class: TagClass, encoding: TagEncoding, tag_num: u32) -> Self {
        Self {
            class,
            encoding,
            tag_num,
        }
    }
}

/// How the length octets of a PDU are produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Length {
    /// Compute the true content length and encode it in the shortest
    /// definite form. The only variant valid DER admits.
    #[default]
    Definite,
    /// `80` before the content, EOC `00 00` after it.
    Indefinite,
    /// Splice these octets in place of the length field, verbatim.
    Override(Vec<u8>),
}

/// One element of a PDU's contents: literal octets or a nested PDU.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum ValueElement {
    Raw(Vec<u8>),
    Nested(Pdu),
}

/// The ordered contents of a PDU.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Value {
    pub elements: Vec<ValueElement>,
}

/// One ASN.1 Tag-Length-Value node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Pdu {
    pub id: Identifier,
    pub len: Length,
    pub val: Value,
}

/// Encodes a [`Pdu`] tree to DER bytes.
///
/// The encoder owns its depth counter and overflow flag, so independent
/// encoders never interfere; both are reset on every [`encode`] call and the
/// instance is reusable.
///
/// [`encode`]: PduEncoder::encode
#[derive(Debug, Default)]
pub struct PduEncoder {
    buf: DerBuffer,
    depth: usize,
    depth_exceeded: bool,
}

impl PduEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode one PDU. On recursion overflow the result is empty, never a
    /// partial encoding.
    pub fn encode(&mut self, pdu: &Pdu) -> Vec<u8> {
        self.buf.clear();
        self.depth = 0;
        self.depth_exceeded = false;

        self.encode_pdu(pdu);
        if self.depth_exceeded {
            debug!(limit = RECURSION_LIMIT, "pdu tree exceeded recursion limit");
            return Vec::new();
        }
        std::mem::take(&mut self.buf).into_bytes()
    }

    fn encode_pdu(&mut self, pdu: &Pdu) {
        if self.depth > RECURSION_LIMIT {
            self.depth_exceeded = true;
            return;
        }
        self.depth += 1;
        self.encode_identifier(&pdu.id);
        let len_pos = self.buf.len();
        self.encode_value(&pdu.val);
        self.encode_length(&pdu.len, self.buf.len() - len_pos, len_pos);
        self.depth -= 1;
    }

    fn encode_identifier(&mut self, id: &Identifier) {
        let leading = id.class.bits() | id.encoding.bits();
        if id.tag_num < 31 {
            self.buf.push(leading | id.tag_num as u8);
        } else {
            // High-tag-number form: lower five bits all ones, then the tag
            // number base-128 (X.690 (2015), 8.1.2.4).
            self.buf.push(leading | 0x1F);
            let mut septets = Vec::new();
            varint::push_base128(&mut septets, id.tag_num as u64);
            self.buf.extend_from_slice(&septets);
        }
    }

    fn encode_value(&mut self, val: &Value) {
        for element in &val.elements {
            if self.depth_exceeded {
                // Remaining elements are uninteresting once the tree is
                // doomed to an empty result.
                return;
            }
            match element {
                ValueElement::Raw(bytes) => self.buf.extend_from_slice(bytes),
                ValueElement::Nested(pdu) => self.encode_pdu(pdu),
            }
        }
    }

    fn encode_length(&mut self, len: &Length, actual_len: usize, len_pos: usize) {
        match len {
            Length::Definite => self.buf.encode_definite_length(actual_len, len_pos),
            Length::Indefinite => self.buf.encode_indefinite_length(len_pos),
            Length::Override(raw) => self.buf.encode_override_length(raw, len_pos),
        }
    }
}

/// Encode one PDU with a fresh encoder.
pub fn encode_pdu(pdu: &Pdu) -> Vec<u8> {
    PduEncoder::new().encode(pdu)
}

impl DerEncode for Pdu {
    fn encode_der(&self, buf: &mut DerBuffer) {
        buf.extend_from_slice(&encode_pdu(self));
    }
}
