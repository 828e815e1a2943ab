//! Property-based exercises of the signing invariants and sign/verify
//! round-trips, run against the real OpenSSL signing paths (no in-memory
//! fakery for the crypto itself).

use std::sync::Arc;

use ndn_throughput_server::data::{ContentBlock, Data, SignatureInfo, SignatureType};
use ndn_throughput_server::keymaterial::KeyMaterial;
use ndn_throughput_server::name::Name;
use ndn_throughput_server::signer::Signer;
use openssl::ec::{EcGroup, EcKey};
use openssl::ecdsa::EcdsaSig;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::PKey;
use openssl::rsa::Rsa;
use openssl::sign::Verifier;
use proptest::prelude::*;
use rand::rngs::OsRng;
use sha2::{Digest as Sha2Digest, Sha256};

fn content(size: usize) -> Arc<ContentBlock> {
    let mut rng = OsRng;
    Arc::new(ContentBlock::random(size, &mut rng))
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(/[a-z]{1,8}){0,4}"
}

proptest! {
    /// Every emitted Data carries the configured payload length and
    /// freshness, for arbitrary names and sizes.
    #[test]
    fn digest_data_preserves_length_and_freshness(
        uri in name_strategy(),
        size in 0usize..512,
        freshness in 0u32..100_000,
    ) {
        let signer = Signer::new(KeyMaterial::Digest);
        let payload = content(size);
        let info = Arc::new(SignatureInfo::digest());
        let mut data = Data::new(Name::from_uri(&format!("/throughput/{uri}")), freshness, payload.clone(), info);

        let expected_digest = Sha256::digest(data.encode_unsigned_prefix()).to_vec();
        let sig = signer.sign_into(&mut data).unwrap();
        prop_assert_eq!(&sig, &expected_digest);
        prop_assert_eq!(payload.len(), size);
    }

    /// RSA sign/verify holds for a representative sample of random-shaped
    /// names and payload sizes against one fixed key pair.
    #[test]
    fn rsa_sign_then_verify_round_trips(uri in name_strategy(), size in 0usize..1024) {
        let rsa = Rsa::generate(1024).unwrap();
        let public_der = rsa.public_key_to_der().unwrap();
        let private_key = PKey::from_rsa(rsa).unwrap();
        let cert_name = Name::from_uri("/throughput/KEY/1/self/1");
        let signer = Signer::new(KeyMaterial::Rsa {
            private_key: Arc::new(private_key),
            cert_name: cert_name.clone(),
        });
        let info = Arc::new(SignatureInfo::asymmetric(SignatureType::RsaSha256, &cert_name));
        let mut data = Data::new(Name::from_uri(&format!("/throughput/{uri}")), 0, content(size), info);
        let prefix = data.encode_unsigned_prefix().to_vec();
        let sig = signer.sign_into(&mut data).unwrap();

        let public_key = PKey::public_key_from_der(&public_der).unwrap();
        let mut verifier = Verifier::new(MessageDigest::sha256(), &public_key).unwrap();
        verifier.update(&prefix).unwrap();
        prop_assert!(verifier.verify(&sig).unwrap());
    }

    /// ECDSA sign/verify holds across arbitrary names and sizes, and the
    /// wire signature is always the P1363 fixed width (never DER, which
    /// would fail a strict-length verifier).
    #[test]
    fn ecdsa_sign_then_verify_round_trips(uri in name_strategy(), size in 0usize..1024) {
        let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
        let ec_key = EcKey::generate(&group).unwrap();
        let private_scalar = ec_key.private_key().to_vec();
        let public_key = PKey::from_ec_key(
            EcKey::from_public_key(&group, ec_key.public_key()).unwrap(),
        )
        .unwrap();
        let cert_name = Name::from_uri("/throughput/KEY/1/self/1");
        let signer = Signer::new(KeyMaterial::Ecdsa {
            private_scalar: zeroize::Zeroizing::new(private_scalar),
            curve: Nid::X9_62_PRIME256V1,
            cert_name: cert_name.clone(),
        });
        let info = Arc::new(SignatureInfo::asymmetric(SignatureType::EcdsaSha256, &cert_name));
        let mut data = Data::new(Name::from_uri(&format!("/throughput/{uri}")), 0, content(size), info);
        let prefix = data.encode_unsigned_prefix().to_vec();
        let sig = signer.sign_into(&mut data).unwrap();

        prop_assert_eq!(sig.len(), 64);

        let half = sig.len() / 2;
        let r = openssl::bn::BigNum::from_slice(&sig[..half]).unwrap();
        let s = openssl::bn::BigNum::from_slice(&sig[half..]).unwrap();
        let der = EcdsaSig::from_private_components(r, s).unwrap().to_der().unwrap();

        let mut verifier = Verifier::new(MessageDigest::sha256(), &public_key).unwrap();
        verifier.update(&prefix).unwrap();
        prop_assert!(verifier.verify(&der).unwrap());

        // The raw P1363 bytes themselves must not parse as the DER form: the
        // wire format is fixed-width concatenation, not a DER SEQUENCE.
        prop_assert!(EcdsaSig::from_der(&sig).is_err());
    }
}
