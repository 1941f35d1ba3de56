#![forbid(unsafe_code)]
#![doc = "ASN.1 DER emission for fuzz seed generation: variable-length \
integer primitives, a splice-in-front output buffer, universal-type \
encoders, and a recursive PDU encoder that can produce deliberately \
malformed streams without ever failing."]

pub mod pdu;
mod time;
pub mod universal;
pub mod varint;
pub mod writer;

pub use pdu::{
    encode_pdu, Identifier, Length, Pdu, PduEncoder, TagClass, TagEncoding, Value, ValueElement,
};
pub use universal::{
    BitString, Boolean, GeneralizedTime, Integer, ObjectIdentifier, OidRoot, UnusedBits, UtcTime,
};
pub use writer::DerBuffer;

/// Universal tag constants as full identifier octets.
pub mod tags {
    pub const BOOLEAN: u8 = 0x01;
    pub const INTEGER: u8 = 0x02;
    pub const BIT_STRING: u8 = 0x03;
    pub const OCTET_STRING: u8 = 0x04;
    pub const NULL: u8 = 0x05;
    pub const OID: u8 = 0x06;
    pub const UTF8_STRING: u8 = 0x0C;
    pub const PRINTABLE_STRING: u8 = 0x13;
    pub const UTC_TIME: u8 = 0x17;
    pub const GENERALIZED_TIME: u8 = 0x18;
    pub const SEQUENCE: u8 = 0x30;
    pub const SET: u8 = 0x31;
    pub const CONTEXT_SPECIFIC: u8 = 0x80;
    pub const CONSTRUCTED: u8 = 0x20;
}

/// Append one value's complete DER encoding to a buffer in progress.
///
/// Implementations write their content octets first and splice the header
/// in front, so they compose when a parent encoder is itself mid-splice.
pub trait DerEncode {
    fn encode_der(&self, buf: &mut DerBuffer);
}
