//! Integration tests for certseed.
//! End-to-end encoding scenarios and cross-crate self-consistency checks.

#[cfg(test)]
mod tests {
    use certseed_asn1::{
        encode_pdu, BitString, Boolean, DerBuffer, DerEncode, Identifier, Integer, Length,
        ObjectIdentifier, Pdu, PduEncoder, TagClass, TagEncoding, UnusedBits, Value, ValueElement,
    };
    use certseed_types::Timestamp;
    use certseed_x509::{
        encode_certificate, encode_mutated_chain, BasicConstraints, Extension, ExtensionKind,
        Extensions, Field, MutatedChain, Mutation, SubjectPublicKeyInfo, TbsCertificate,
        TrustParameter, X509Certificate,
    };

    fn encode(value: &impl DerEncode) -> Vec<u8> {
        let mut buf = DerBuffer::new();
        value.encode_der(&mut buf);
        buf.into_bytes()
    }

    fn universal(tag_num: u32, encoding: TagEncoding) -> Identifier {
        Identifier::new(TagClass::Universal, encoding, tag_num)
    }

    // -------------------------------------------------------
    // Minimal DER reader, test-side only. Definite lengths and
    // single-octet identifiers: all the typed path ever emits.
    // -------------------------------------------------------

    #[derive(Debug, PartialEq)]
    struct Tlv<'a> {
        tag: u8,
        content: &'a [u8],
    }

    struct Reader<'a> {
        data: &'a [u8],
    }

    impl<'a> Reader<'a> {
        fn new(data: &'a [u8]) -> Self {
            Self { data }
        }

        fn is_empty(&self) -> bool {
            self.data.is_empty()
        }

        fn read_tlv(&mut self) -> Tlv<'a> {
            let tag = self.data[0];
            assert_ne!(
                tag & 0x1F,
                0x1F,
                "typed path never emits high-tag-number identifiers"
            );
            let (len, header) = match self.data[1] {
                short @ 0..=0x7F => (short as usize, 2),
                long => {
                    let count = (long & 0x7F) as usize;
                    assert!((1..=8).contains(&count), "unreasonable length-of-length");
                    let mut len = 0usize;
                    for i in 0..count {
                        len = (len << 8) | self.data[2 + i] as usize;
                    }
                    assert!(len > 127, "long form used where short form fits");
                    assert_ne!(
                        len >> ((count - 1) * 8),
                        0,
                        "length octets carry a leading zero"
                    );
                    (len, 2 + count)
                }
            };
            let content = &self.data[header..header + len];
            self.data = &self.data[header + len..];
            Tlv { tag, content }
        }
    }

    /// Walk one TLV that may use the indefinite form, asserting every `80`
    /// opener is closed by exactly one EOC at its own nesting depth.
    /// Returns the number of octets consumed.
    fn consume_with_indefinite(data: &[u8]) -> usize {
        assert_ne!(data[0] & 0x1F, 0x1F);
        match data[1] {
            0x80 => {
                let mut pos = 2;
                while data[pos..pos + 2] != [0x00, 0x00] {
                    pos += consume_with_indefinite(&data[pos..]);
                }
                pos + 2
            }
            short @ 0..=0x7F => 2 + short as usize,
            long => {
                let count = (long & 0x7F) as usize;
                let mut len = 0usize;
                for i in 0..count {
                    len = (len << 8) | data[2 + i] as usize;
                }
                2 + count + len
            }
        }
    }

    // -------------------------------------------------------
    // 1. Universal-type scenarios
    // -------------------------------------------------------

    #[test]
    fn test_scenario_integer_zero() {
        assert_eq!(encode(&Integer::default()), &[0x02, 0x01, 0x00]);
    }

    #[test]
    fn test_scenario_boolean() {
        assert_eq!(encode(&Boolean { val: true }), &[0x01, 0x01, 0xFF]);
        assert_eq!(encode(&Boolean { val: false }), &[0x01, 0x01, 0x00]);
    }

    #[test]
    fn test_scenario_bit_string() {
        let bs = BitString::new(UnusedBits::ZERO, vec![0x0A, 0x3B]);
        assert_eq!(encode(&bs), &[0x03, 0x03, 0x00, 0x0A, 0x3B]);
    }

    #[test]
    fn test_scenario_high_tag_number() {
        let pdu = Pdu {
            id: universal(128, TagEncoding::Primitive),
            len: Length::Definite,
            val: Value::default(),
        };
        assert_eq!(encode_pdu(&pdu), &[0x1F, 0x81, 0x00, 0x00]);
    }

    #[test]
    fn test_scenario_indefinite_sequence() {
        let pdu = Pdu {
            id: universal(16, TagEncoding::Constructed),
            len: Length::Indefinite,
            val: Value {
                elements: vec![ValueElement::Nested(Pdu {
                    id: universal(2, TagEncoding::Primitive),
                    len: Length::Definite,
                    val: Value {
                        elements: vec![ValueElement::Raw(vec![0x01])],
                    },
                })],
            },
        };
        assert_eq!(encode_pdu(&pdu), &[0x30, 0x80, 0x02, 0x01, 0x01, 0x00, 0x00]);
    }

    // -------------------------------------------------------
    // 2. Certificate skeleton, decoded back field by field
    // -------------------------------------------------------

    fn skeleton_certificate() -> X509Certificate {
        X509Certificate {
            tbs_certificate: Field::Typed(TbsCertificate {
                serial_number: Field::Typed(Integer::new(vec![0x01])),
                ..TbsCertificate::default()
            }),
            signature_algorithm: Field::RawPdu(Pdu {
                id: universal(16, TagEncoding::Constructed),
                len: Length::Definite,
                val: Value::default(),
            }),
            signature_value: Field::Typed(BitString::default()),
        }
    }

    #[test]
    fn test_certificate_skeleton_decodes_back() {
        let der = encode_certificate(&skeleton_certificate());

        let mut outer = Reader::new(&der);
        let cert = outer.read_tlv();
        assert_eq!(cert.tag, 0x30);
        assert!(outer.is_empty());

        let mut cert_fields = Reader::new(cert.content);
        let tbs = cert_fields.read_tlv();
        assert_eq!(tbs.tag, 0x30);
        let sig_alg = cert_fields.read_tlv();
        assert_eq!((sig_alg.tag, sig_alg.content.len()), (0x30, 0));
        let sig_val = cert_fields.read_tlv();
        assert_eq!((sig_val.tag, sig_val.content), (0x03, &[0x00][..]));
        assert!(cert_fields.is_empty());

        let mut tbs_fields = Reader::new(tbs.content);
        let version = tbs_fields.read_tlv();
        assert_eq!(version.tag, 0xA0);
        assert_eq!(version.content, &[0x02, 0x01, 0x02]);
        let serial = tbs_fields.read_tlv();
        assert_eq!((serial.tag, serial.content), (0x02, &[0x01][..]));
        let tbs_sig_alg = tbs_fields.read_tlv();
        assert_eq!(tbs_sig_alg.tag, 0x30);
        let issuer = tbs_fields.read_tlv();
        assert_eq!((issuer.tag, issuer.content.len()), (0x30, 0));
        let validity = tbs_fields.read_tlv();
        assert_eq!(validity.tag, 0x30);
        let subject = tbs_fields.read_tlv();
        assert_eq!((subject.tag, subject.content.len()), (0x30, 0));
        let spki = tbs_fields.read_tlv();
        assert_eq!(spki.tag, 0x30);
        assert!(tbs_fields.is_empty());

        let mut times = Reader::new(validity.content);
        let not_before = times.read_tlv();
        assert_eq!(
            (not_before.tag, not_before.content),
            (0x17, &b"700101000000Z"[..])
        );
        let not_after = times.read_tlv();
        assert_eq!(not_after.content, b"700101000000Z");
        assert!(times.is_empty());

        let mut spki_fields = Reader::new(spki.content);
        let algorithm = spki_fields.read_tlv();
        assert_eq!(algorithm.tag, 0x30);
        let public_key = spki_fields.read_tlv();
        assert_eq!((public_key.tag, public_key.content), (0x03, &[0x00][..]));
        assert!(spki_fields.is_empty());
    }

    #[test]
    fn test_large_certificate_long_form_prefix() {
        let cert = X509Certificate {
            tbs_certificate: Field::Typed(TbsCertificate {
                subject_public_key_info: Field::Typed(SubjectPublicKeyInfo {
                    subject_public_key: Field::Typed(BitString::new(
                        UnusedBits::ZERO,
                        vec![0x42; 400],
                    )),
                    ..SubjectPublicKeyInfo::default()
                }),
                ..TbsCertificate::default()
            }),
            ..X509Certificate::default()
        };
        let der = encode_certificate(&cert);
        assert_eq!(&der[..2], &[0x30, 0x82]);

        // Reading it back still yields one well-formed TLV.
        let mut reader = Reader::new(&der);
        let outer = reader.read_tlv();
        assert_eq!(outer.tag, 0x30);
        assert!(reader.is_empty());
    }

    // -------------------------------------------------------
    // 3. DEFAULT omission and context-specific rewrites
    // -------------------------------------------------------

    #[test]
    fn test_default_false_fields_absent_from_encoding() {
        let cert = X509Certificate {
            tbs_certificate: Field::Typed(TbsCertificate {
                extensions: Some(Field::Typed(Extensions {
                    list: vec![Extension {
                        critical: false,
                        kind: ExtensionKind::BasicConstraints(BasicConstraints {
                            ca: false,
                            path_len_constraint: None,
                        }),
                    }],
                })),
                ..TbsCertificate::default()
            }),
            ..X509Certificate::default()
        };
        let der = encode_certificate(&cert);
        // No BOOLEAN TLV anywhere: both critical and cA defaulted to FALSE.
        assert!(!der.windows(2).any(|window| window == [0x01, 0x01]));
    }

    #[test]
    fn test_optional_tbs_fields_rewritten_and_length_preserved() {
        let unique_id = BitString::new(UnusedBits::ZERO, vec![0xAA, 0xBB]);
        let natural = encode(&unique_id);

        let tbs = TbsCertificate {
            issuer_unique_id: Some(Field::Typed(unique_id.clone())),
            subject_unique_id: Some(Field::Typed(unique_id)),
            extensions: Some(Field::Typed(Extensions::default())),
            ..TbsCertificate::default()
        };
        let der = encode(&tbs);

        let mut fields = Reader::new(Reader::new(&der).read_tlv().content);
        let mut tags = Vec::new();
        while !fields.is_empty() {
            let tlv = fields.read_tlv();
            if tlv.tag & 0x80 != 0 && tlv.tag != 0xA0 {
                if tlv.tag != 0xA3 {
                    // A rewritten field keeps its content untouched.
                    assert_eq!(tlv.content, &natural[2..]);
                }
                tags.push(tlv.tag);
            }
        }
        assert_eq!(tags, &[0x81, 0x82, 0xA3]);
    }

    // -------------------------------------------------------
    // 4. Indefinite-form closure
    // -------------------------------------------------------

    #[test]
    fn test_nested_indefinite_lengths_each_closed_once() {
        let inner = Pdu {
            id: universal(2, TagEncoding::Primitive),
            len: Length::Definite,
            val: Value {
                elements: vec![ValueElement::Raw(vec![0x07])],
            },
        };
        let middle = Pdu {
            id: universal(16, TagEncoding::Constructed),
            len: Length::Indefinite,
            val: Value {
                elements: vec![ValueElement::Nested(inner)],
            },
        };
        let outer = Pdu {
            id: universal(16, TagEncoding::Constructed),
            len: Length::Indefinite,
            val: Value {
                elements: vec![ValueElement::Nested(middle)],
            },
        };
        let der = encode_pdu(&outer);
        assert_eq!(
            der,
            &[0x30, 0x80, 0x30, 0x80, 0x02, 0x01, 0x07, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(consume_with_indefinite(&der), der.len());
    }

    // -------------------------------------------------------
    // 5. Bounded recursion across the raw-PDU escape hatch
    // -------------------------------------------------------

    fn deeply_nested_pdu() -> Pdu {
        let mut pdu = Pdu::default();
        for _ in 0..300 {
            pdu = Pdu {
                id: universal(16, TagEncoding::Constructed),
                len: Length::Definite,
                val: Value {
                    elements: vec![ValueElement::Nested(pdu)],
                },
            };
        }
        pdu
    }

    #[test]
    fn test_overdeep_pdu_yields_empty_not_partial() {
        assert!(encode_pdu(&deeply_nested_pdu()).is_empty());
    }

    #[test]
    fn test_overdeep_override_drops_field_but_not_certificate() {
        let with_doomed_field = X509Certificate {
            tbs_certificate: Field::Typed(TbsCertificate {
                issuer_unique_id: Some(Field::RawPdu(deeply_nested_pdu())),
                ..TbsCertificate::default()
            }),
            ..X509Certificate::default()
        };
        let plain = X509Certificate::default();
        // The doomed field encodes to nothing; the rest is unaffected.
        assert_eq!(
            encode_certificate(&with_doomed_field),
            encode_certificate(&plain)
        );
    }

    #[test]
    fn test_encoder_reuse_after_overflow() {
        let mut encoder = PduEncoder::new();
        assert!(encoder.encode(&deeply_nested_pdu()).is_empty());
        let simple = Pdu {
            id: universal(5, TagEncoding::Primitive),
            len: Length::Definite,
            val: Value::default(),
        };
        assert_eq!(encoder.encode(&simple), &[0x05, 0x00]);
    }

    // -------------------------------------------------------
    // 6. Chain encoding
    // -------------------------------------------------------

    #[test]
    fn test_mutated_chain_end_to_end() {
        let input = MutatedChain {
            chain: vec![skeleton_certificate(), skeleton_certificate()],
            mutations: vec![Mutation::Signature {
                index: 1,
                valid: false,
            }],
            trust_parameters: vec![TrustParameter {
                index: 0,
                trusted: true,
            }],
        };
        let out = encode_mutated_chain(input);
        assert_eq!(out.len(), 2);
        assert!(out[0].trusted);
        assert!(!out[1].trusted);

        // Certificate 0 keeps the empty signature; certificate 1 carries
        // the "invalid" stand-in.
        let tail0 = &out[0].der[out[0].der.len() - 3..];
        assert_eq!(tail0, &[0x03, 0x01, 0x00]);
        let tail1 = &out[1].der[out[1].der.len() - 4..];
        assert_eq!(tail1, &[0x03, 0x02, 0x00, 0x30]);
    }

    // -------------------------------------------------------
    // 7. Total-function contract under arbitrary inputs
    // -------------------------------------------------------

    #[test]
    fn test_arbitrary_trees_always_encode() {
        use arbitrary::{Arbitrary, Unstructured};

        let mut seed: Vec<u8> = Vec::with_capacity(4096);
        for i in 0..4096u32 {
            seed.push((i.wrapping_mul(2_654_435_761) >> 24) as u8);
        }

        let mut u = Unstructured::new(&seed);
        if let Ok(pdu) = Pdu::arbitrary(&mut u) {
            // Termination and the no-partial-output rule are the contract;
            // the bytes themselves may be anything.
            let _ = encode_pdu(&pdu);
        }

        let mut u = Unstructured::new(&seed);
        if let Ok(cert) = X509Certificate::arbitrary(&mut u) {
            let _ = encode_certificate(&cert);
        }

        let mut u = Unstructured::new(&seed);
        if let Ok(chain) = MutatedChain::arbitrary(&mut u) {
            let out = encode_mutated_chain(chain);
            assert!(!out.is_empty());
        }
    }

    #[test]
    fn test_generalized_time_and_eku_decode_back() {
        use certseed_x509::{ExtendedKeyUsage, Time, Validity};

        let cert = X509Certificate {
            tbs_certificate: Field::Typed(TbsCertificate {
                validity: Field::Typed(Validity {
                    not_before: Field::Typed(Time::Generalized(certseed_asn1::GeneralizedTime {
                        timestamp: Timestamp::new(2_539_296_000),
                    })),
                    not_after: Field::Typed(Time::Generalized(certseed_asn1::GeneralizedTime {
                        timestamp: Timestamp::new(2_539_296_000),
                    })),
                }),
                extensions: Some(Field::Typed(Extensions {
                    list: vec![Extension {
                        critical: false,
                        kind: ExtensionKind::ExtendedKeyUsage(ExtendedKeyUsage {
                            key_purpose: ObjectIdentifier::from_arcs(&[1, 3, 6, 1, 5, 5, 7, 3, 1]),
                            additional: Vec::new(),
                        }),
                    }],
                })),
                ..TbsCertificate::default()
            }),
            ..X509Certificate::default()
        };
        let der = encode_certificate(&cert);

        let mut cert_fields = Reader::new(Reader::new(&der).read_tlv().content);
        let tbs = cert_fields.read_tlv();
        let mut tbs_fields = Reader::new(tbs.content);
        for _ in 0..4 {
            tbs_fields.read_tlv(); // version, serial, signature alg, issuer
        }
        let validity = tbs_fields.read_tlv();
        let mut times = Reader::new(validity.content);
        let not_before = times.read_tlv();
        assert_eq!(not_before.tag, 0x18);
        assert_eq!(not_before.content, b"20500620000000Z");

        tbs_fields.read_tlv(); // subject
        tbs_fields.read_tlv(); // spki
        let extensions = tbs_fields.read_tlv();
        assert_eq!(extensions.tag, 0xA3);
        let mut ext_reader = Reader::new(extensions.content);
        let ext = ext_reader.read_tlv();
        assert_eq!(ext.tag, 0x30);
        let mut ext_fields = Reader::new(ext.content);
        let extn_id = ext_fields.read_tlv();
        assert_eq!(extn_id.content, &[0x55, 0x1D, 0x25]);
        let extn_value = ext_fields.read_tlv();
        assert_eq!(extn_value.tag, 0x04);
        let mut eku = Reader::new(Reader::new(extn_value.content).read_tlv().content);
        let purpose = eku.read_tlv();
        assert_eq!(
            purpose.content,
            &[0x2B, 0x06, 0x01, 0x05, 0x05, 0x07, 0x03, 0x01]
        );
    }
}
