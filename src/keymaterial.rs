//! Key material: generated once at startup, destroyed at shutdown.

use std::sync::Arc;

use openssl::bn::BigNum;
use openssl::ec::{EcGroup, EcKey};
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use zeroize::Zeroizing;

use crate::error::{AppError, Result};
use crate::name::Name;

/// Which curve to use for ECDSA, chosen by key size.
pub fn curve_for_key_bits(key_bits: u32) -> Result<Nid> {
    match key_bits {
        256 => Ok(Nid::X9_62_PRIME256V1),
        384 => Ok(Nid::SECP384R1),
        other => Err(AppError::Config(format!(
            "unsupported ECDSA key size {other}; only 256 and 384 map to named curves"
        ))),
    }
}

/// The key material backing a Signer, one of three regimes.
pub enum KeyMaterial {
    /// No key: signature value is a plain SHA-256 digest.
    Digest,
    /// RSA key material. The private key is safe to share across threads:
    /// it holds no mutable per-call state beyond the key itself.
    Rsa {
        private_key: Arc<PKey<Private>>,
        cert_name: Name,
    },
    /// ECDSA key material. The private scalar is kept as raw bytes and a
    /// fresh `EcKey` is reconstructed per signing call rather than sharing
    /// one mutable signing context across worker threads.
    Ecdsa {
        private_scalar: Zeroizing<Vec<u8>>,
        curve: Nid,
        cert_name: Name,
    },
}

impl KeyMaterial {
    /// Generate fresh RSA key material of `key_bits` bits for `cert_name`.
    pub fn generate_rsa(key_bits: u32, cert_name: Name) -> Result<Self> {
        if key_bits < 1024 {
            return Err(AppError::Config(format!(
                "RSA key size {key_bits} is below the minimum of 1024 bits"
            )));
        }
        let rsa = Rsa::generate(key_bits).map_err(AppError::from)?;
        let private_key = PKey::from_rsa(rsa).map_err(AppError::from)?;
        Ok(KeyMaterial::Rsa {
            private_key: Arc::new(private_key),
            cert_name,
        })
    }

    /// Generate fresh ECDSA key material on the curve selected by `key_bits`.
    pub fn generate_ecdsa(key_bits: u32, cert_name: Name) -> Result<Self> {
        let curve = curve_for_key_bits(key_bits)?;
        let group = EcGroup::from_curve_name(curve).map_err(AppError::from)?;
        let ec_key = EcKey::generate(&group).map_err(AppError::from)?;
        let private_scalar = ec_key.private_key().to_vec();
        Ok(KeyMaterial::Ecdsa {
            private_scalar: Zeroizing::new(private_scalar),
            curve,
            cert_name,
        })
    }

    /// Reconstruct a transient `EcKey` from the stored private scalar. Called
    /// once per signing operation; never shared across threads.
    pub(crate) fn ecdsa_signing_key(&self) -> Result<EcKey<Private>> {
        match self {
            KeyMaterial::Ecdsa {
                private_scalar,
                curve,
                ..
            } => {
                let group = EcGroup::from_curve_name(*curve).map_err(AppError::from)?;
                let scalar = BigNum::from_slice(private_scalar).map_err(AppError::from)?;
                let mut public_point = openssl::ec::EcPoint::new(&group).map_err(AppError::from)?;
                let mut ctx = openssl::bn::BigNumContext::new().map_err(AppError::from)?;
                public_point
                    .mul_generator(&group, &scalar, &mut ctx)
                    .map_err(AppError::from)?;
                EcKey::from_private_components(&group, &scalar, &public_point)
                    .map_err(AppError::from)
            }
            _ => unreachable!("ecdsa_signing_key called on non-ECDSA key material"),
        }
    }

    /// The certificate name this key material is bound to, if any.
    pub fn cert_name(&self) -> Option<&Name> {
        match self {
            KeyMaterial::Digest => None,
            KeyMaterial::Rsa { cert_name, .. } => Some(cert_name),
            KeyMaterial::Ecdsa { cert_name, .. } => Some(cert_name),
        }
    }

    /// DER-encoded SubjectPublicKeyInfo for the asymmetric modes, used by the
    /// in-memory `KeyChain` double to publish a verifiable public key.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        match self {
            KeyMaterial::Digest => Err(AppError::Config(
                "digest-mode key material has no public key".into(),
            )),
            KeyMaterial::Rsa { private_key, .. } => {
                private_key.public_key_to_der().map_err(AppError::from)
            }
            KeyMaterial::Ecdsa { .. } => {
                let ec_key = self.ecdsa_signing_key()?;
                let pkey = PKey::from_ec_key(ec_key).map_err(AppError::from)?;
                pkey.public_key_to_der().map_err(AppError::from)
            }
        }
    }
}
