//! Well-known OIDs used when composing typed certificate fields.

use certseed_asn1::ObjectIdentifier;

pub(crate) fn authority_key_identifier() -> ObjectIdentifier {
    ObjectIdentifier::from_arcs(&[2, 5, 29, 35])
}

pub(crate) fn subject_key_identifier() -> ObjectIdentifier {
    ObjectIdentifier::from_arcs(&[2, 5, 29, 14])
}

pub(crate) fn key_usage() -> ObjectIdentifier {
    ObjectIdentifier::from_arcs(&[2, 5, 29, 15])
}

pub(crate) fn basic_constraints() -> ObjectIdentifier {
    ObjectIdentifier::from_arcs(&[2, 5, 29, 19])
}

pub(crate) fn ext_key_usage() -> ObjectIdentifier {
    ObjectIdentifier::from_arcs(&[2, 5, 29, 37])
}

/// Map a DN attribute short name to its OID.
///
/// Unrecognized attributes fall back to commonName so every entry still
/// encodes.
pub(crate) fn dn_attribute(short_name: &str) -> ObjectIdentifier {
    let arcs: &[u32] = match short_name {
        "CN" => &[2, 5, 4, 3],
        "SN" => &[2, 5, 4, 5],
        "C" => &[2, 5, 4, 6],
        "L" => &[2, 5, 4, 7],
        "ST" => &[2, 5, 4, 8],
        "O" => &[2, 5, 4, 10],
        "OU" => &[2, 5, 4, 11],
        _ => &[2, 5, 4, 3],
    };
    ObjectIdentifier::from_arcs(arcs)
}
