//! Universal-type content encoders.
//!
//! Each encoder writes its content octets at the tail of the buffer and then
//! splices its universal tag and definite length in front, so a value can be
//! emitted into the middle of a larger encoding in progress.

use certseed_types::{ModelError, Timestamp};

use crate::time::render_iso8601;
use crate::writer::DerBuffer;
use crate::{tags, varint, DerEncode};

/// An INTEGER, held as the caller's raw content octets.
///
/// The bytes are emitted verbatim: callers control sign, padding and
/// minimality. An empty value encodes as the single octet `00` since an
/// INTEGER cannot have empty contents (X.690 (2015), 8.3.1).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Integer {
    pub val: Vec<u8>,
}

impl Integer {
    pub fn new(val: impl Into<Vec<u8>>) -> Self {
        Self { val: val.into() }
    }
}

impl DerEncode for Integer {
    fn encode_der(&self, buf: &mut DerBuffer) {
        let tag_len_pos = buf.len();
        if self.val.is_empty() {
            buf.push(0x00);
        } else {
            buf.extend_from_slice(&self.val);
        }
        buf.encode_tag_and_length(tags::INTEGER, buf.len() - tag_len_pos, tag_len_pos);
    }
}

/// Count of unused bits in the final BIT STRING octet, 0..=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct UnusedBits(u8);

impl UnusedBits {
    pub const ZERO: UnusedBits = UnusedBits(0);

    pub fn new(count: u8) -> Result<Self, ModelError> {
        if count > 7 {
            return Err(ModelError::UnusedBitsOutOfRange { got: count });
        }
        Ok(Self(count))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for UnusedBits {
    type Error = ModelError;

    fn try_from(count: u8) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

impl From<UnusedBits> for u8 {
    fn from(bits: UnusedBits) -> u8 {
        bits.0
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for UnusedBits {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(UnusedBits(u.int_in_range(0..=7)?))
    }
}

/// A BIT STRING: an unused-bits count followed by the caller's octets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct BitString {
    pub unused_bits: UnusedBits,
    pub val: Vec<u8>,
}

impl BitString {
    pub fn new(unused_bits: UnusedBits, val: impl Into<Vec<u8>>) -> Self {
        Self {
            unused_bits,
            val: val.into(),
        }
    }
}

impl DerEncode for BitString {
    fn encode_der(&self, buf: &mut DerBuffer) {
        let tag_len_pos = buf.len();
        if self.val.is_empty() {
            // An empty bitstring has no subsequent octets and an initial
            // octet of zero (X.690 (2015), 8.6.2.3).
            buf.push(0x00);
        } else {
            buf.push(self.unused_bits.get());
            buf.extend_from_slice(&self.val);
        }
        buf.encode_tag_and_length(tags::BIT_STRING, buf.len() - tag_len_pos, tag_len_pos);
    }
}

/// A BOOLEAN; content is a single octet, `FF` for true (X.690 (2015), 8.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Boolean {
    pub val: bool,
}

impl DerEncode for Boolean {
    fn encode_der(&self, buf: &mut DerBuffer) {
        let tag_len_pos = buf.len();
        buf.push(if self.val { 0xFF } else { 0x00 });
        buf.encode_tag_and_length(tags::BOOLEAN, 1, tag_len_pos);
    }
}

/// The three roots of the OID tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum OidRoot {
    #[default]
    Itu,
    Iso,
    JointIsoItu,
}

impl OidRoot {
    fn number(self) -> u8 {
        match self {
            OidRoot::Itu => 0,
            OidRoot::Iso => 1,
            OidRoot::JointIsoItu => 2,
        }
    }
}

/// An OBJECT IDENTIFIER.
///
/// The first subidentifier combines the root and second arc as
/// `40*root + second` (X.690 (2015), 8.19.4). Under `JointIsoItu` the second
/// arc comes from the head of `subarcs` and may exceed 39; under the other
/// roots it comes from `small_identifier`, clamped to the 0..=39 range the
/// tree allows there, and every entry of `subarcs` follows it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct ObjectIdentifier {
    pub root: OidRoot,
    pub small_identifier: u8,
    pub subarcs: Vec<u32>,
}

impl ObjectIdentifier {
    /// Build from a full arc list, e.g. `[2, 5, 29, 19]` for 2.5.29.19.
    ///
    /// Arc lists shorter than two entries produce the degenerate encodings
    /// the field defaults give; a first arc above 2 saturates to
    /// `JointIsoItu`.
    pub fn from_arcs(arcs: &[u32]) -> Self {
        let root = match arcs.first() {
            Some(0) => OidRoot::Itu,
            Some(1) => OidRoot::Iso,
            Some(_) => OidRoot::JointIsoItu,
            None => OidRoot::default(),
        };
        match root {
            OidRoot::JointIsoItu => Self {
                root,
                small_identifier: 0,
                subarcs: arcs.get(1..).unwrap_or_default().to_vec(),
            },
            _ => Self {
                root,
                small_identifier: arcs.get(1).copied().unwrap_or(0).min(39) as u8,
                subarcs: arcs.get(2..).unwrap_or_default().to_vec(),
            },
        }
    }
}

impl DerEncode for ObjectIdentifier {
    fn encode_der(&self, buf: &mut DerBuffer) {
        let tag_len_pos = buf.len();
        let mut content = Vec::new();
        match self.root {
            OidRoot::JointIsoItu => match self.subarcs.split_first() {
                Some((&second, rest)) => {
                    varint::push_base128(&mut content, 80 + second as u64);
                    for &arc in rest {
                        varint::push_base128(&mut content, arc as u64);
                    }
                }
                // No second arc to fold in; fall back to a lone zero octet
                // (malformed, but tolerated as fuzz input).
                None => content.push(0x00),
            },
            root => {
                content.push(40 * root.number() + self.small_identifier.min(39));
                for &arc in &self.subarcs {
                    varint::push_base128(&mut content, arc as u64);
                }
            }
        }
        buf.extend_from_slice(&content);
        buf.encode_tag_and_length(tags::OID, buf.len() - tag_len_pos, tag_len_pos);
    }
}

/// A UTCTime rendered as `YYMMDDHHMMSSZ` (X.690 (2015), 11.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct UtcTime {
    pub timestamp: Timestamp,
}

impl DerEncode for UtcTime {
    fn encode_der(&self, buf: &mut DerBuffer) {
        encode_timestamp(self.timestamp, true, buf);
    }
}

/// A GeneralizedTime rendered as `YYYYMMDDHHMMSSZ` (X.690 (2015), 11.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct GeneralizedTime {
    pub timestamp: Timestamp,
}

impl DerEncode for GeneralizedTime {
    fn encode_der(&self, buf: &mut DerBuffer) {
        encode_timestamp(self.timestamp, false, buf);
    }
}

/// Shared body of the two time encoders.
///
/// When the timestamp cannot be rendered, nothing is emitted at all, tag and
/// length included; the surrounding encoding proceeds without this field.
fn encode_timestamp(timestamp: Timestamp, use_two_digit_year: bool, buf: &mut DerBuffer) {
    let Some(iso) = render_iso8601(timestamp) else {
        return;
    };
    let tag_len_pos = buf.len();
    let (tag, year) = if use_two_digit_year {
        // UTCTime covers 1950-2049, so the tens and ones digits suffice
        // (X.690 (2015), 11.8.3).
        (tags::UTC_TIME, &iso[2..4])
    } else {
        (tags::GENERALIZED_TIME, &iso[0..4])
    };
    buf.extend_from_slice(year.as_bytes());
    buf.extend_from_slice(iso[5..7].as_bytes()); // month
    buf.extend_from_slice(iso[8..10].as_bytes()); // day
    buf.extend_from_slice(iso[11..13].as_bytes()); // hour
    buf.extend_from_slice(iso[14..16].as_bytes()); // minute
    buf.extend_from_slice(iso[17..19].as_bytes()); // seconds
    buf.push(b'Z');
    buf.encode_tag_and_length(tag, buf.len() - tag_len_pos, tag_len_pos);
}
