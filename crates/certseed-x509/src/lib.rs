#![forbid(unsafe_code)]
#![doc = "X.509 certificate composition for fuzz seed generation: every \
structured field can be swapped for an arbitrary raw PDU, and chains can \
carry index-addressed mutations."]

pub mod certificate;
pub mod chain;
mod encoding;
pub mod extensions;
pub(crate) mod oid_mapping;

pub use certificate::{
    AlgorithmIdentifier, Field, Name, Parameters, SubjectPublicKeyInfo, TbsCertificate, Time,
    Validity, Version, X509Certificate,
};
pub use chain::{
    encode_chain, encode_mutated_chain, EncodedCertificate, MutatedChain, Mutation, TrustParameter,
};
pub use encoding::encode_certificate;
pub use extensions::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, Extension, ExtensionKind,
    Extensions, KeyUsage, RawExtension, RawExtensionBody, SubjectKeyIdentifier,
};
