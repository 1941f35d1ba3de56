//! Certificate chain composition and chain-level mutations.

use tracing::debug;

use crate::certificate::{Field, X509Certificate};
use crate::encoding::encode_certificate;
use crate::extensions::signature_bit_string;

/// A chain of certificates plus the mutations and trust flags to apply,
/// all addressed by chain index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct MutatedChain {
    pub chain: Vec<X509Certificate>,
    pub mutations: Vec<Mutation>,
    pub trust_parameters: Vec<TrustParameter>,
}

/// A chain-level rewrite of one certificate, applied before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Mutation {
    /// Overwrite the certificate's signature value with the stand-in
    /// BIT STRING `"1"` (valid) or `"0"` (invalid), clearing any raw-PDU
    /// override on that field first.
    Signature { index: usize, valid: bool },
}

/// Marks one certificate of the chain as trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct TrustParameter {
    pub index: usize,
    pub trusted: bool,
}

/// One encoded certificate paired with its trust flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedCertificate {
    pub der: Vec<u8>,
    pub trusted: bool,
}

/// Encode every certificate and concatenate the results into one buffer.
pub fn encode_chain(chain: &[X509Certificate]) -> Vec<u8> {
    let mut der = Vec::new();
    for certificate in chain {
        der.extend_from_slice(&encode_certificate(certificate));
    }
    der
}

/// Apply the chain's mutations, then encode each certificate independently
/// and attach the trust flags.
///
/// Mutations and trust parameters whose index falls outside the chain are
/// ignored. An empty chain yields a single empty encoding.
pub fn encode_mutated_chain(input: MutatedChain) -> Vec<EncodedCertificate> {
    let MutatedChain {
        mut chain,
        mutations,
        trust_parameters,
    } = input;

    if chain.is_empty() {
        return vec![EncodedCertificate::default()];
    }

    for mutation in &mutations {
        apply_mutation(mutation, &mut chain);
    }

    let mut encoded: Vec<EncodedCertificate> = chain
        .iter()
        .map(|certificate| EncodedCertificate {
            der: encode_certificate(certificate),
            trusted: false,
        })
        .collect();

    for parameter in &trust_parameters {
        match encoded.get_mut(parameter.index) {
            Some(entry) => entry.trusted = parameter.trusted,
            None => debug!(index = parameter.index, "trust index out of range"),
        }
    }

    encoded
}

fn apply_mutation(mutation: &Mutation, chain: &mut [X509Certificate]) {
    match mutation {
        Mutation::Signature { index, valid } => {
            let Some(certificate) = chain.get_mut(*index) else {
                debug!(index = *index, "mutation index out of range");
                return;
            };
            certificate.signature_value = Field::Typed(signature_bit_string(*valid));
        }
    }
}
