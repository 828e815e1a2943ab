//! The Signer: turns a built `Data` into a signature value over its unsigned
//! wire prefix, using whichever key material the run was configured with.

use openssl::bn::BigNumContext;
use openssl::ec::EcPointRef;
use openssl::ecdsa::EcdsaSig;
use openssl::hash::MessageDigest;
use openssl::pkey::PKey;
use openssl::sign::Signer as OpenSslSigner;
use sha2::{Digest as Sha2Digest, Sha256};

use crate::data::Data;
use crate::error::{AppError, Result};
use crate::keymaterial::KeyMaterial;

/// Byte width of a P1363 `r` or `s` component for a given curve order size.
fn field_width_for_curve(curve: openssl::nid::Nid) -> usize {
    match curve {
        openssl::nid::Nid::X9_62_PRIME256V1 => 32,
        openssl::nid::Nid::SECP384R1 => 48,
        _ => 32,
    }
}

/// Left-pad `bytes` with zeroes to `width`, as P1363 requires fixed-width
/// components (OpenSSL's DER encoding strips leading zero bytes).
fn left_pad(bytes: &[u8], width: usize) -> Vec<u8> {
    let mut out = vec![0u8; width.saturating_sub(bytes.len())];
    out.extend_from_slice(bytes);
    out
}

/// Convert a DER-encoded ECDSA signature into the fixed-width concatenated
/// r||s representation used on the wire. OpenSSL only speaks DER; NDN wants
/// fixed-width P1363, so every ECDSA signature goes through this conversion
/// before it's embedded in a Data packet.
fn der_to_p1363(der: &[u8], field_width: usize) -> Result<Vec<u8>> {
    let sig = EcdsaSig::from_der(der).map_err(AppError::from)?;
    let r = left_pad(&sig.r().to_vec(), field_width);
    let s = left_pad(&sig.s().to_vec(), field_width);
    let mut out = Vec::with_capacity(field_width * 2);
    out.extend_from_slice(&r);
    out.extend_from_slice(&s);
    Ok(out)
}

/// The inverse of [`der_to_p1363`]: reconstruct a DER-encoded ECDSA
/// signature from the fixed-width r||s pair found on the wire. Needed
/// wherever a P1363 signature has to be handed to a verifier that only
/// speaks DER, such as OpenSSL's `Verifier`.
pub fn p1363_to_der(p1363: &[u8]) -> Result<Vec<u8>> {
    let half = p1363.len() / 2;
    let r = openssl::bn::BigNum::from_slice(&p1363[..half]).map_err(AppError::from)?;
    let s = openssl::bn::BigNum::from_slice(&p1363[half..]).map_err(AppError::from)?;
    EcdsaSig::from_private_components(r, s)
        .map_err(AppError::from)?
        .to_der()
        .map_err(AppError::from)
}

/// Signs a built `Data`'s unsigned wire prefix, producing whichever
/// signature value the configured key material calls for.
pub struct Signer {
    key_material: KeyMaterial,
}

impl Signer {
    /// Build a Signer over the given key material.
    pub fn new(key_material: KeyMaterial) -> Self {
        Signer { key_material }
    }

    /// The certificate name backing this Signer's key material, if any
    /// (`None` in digest mode), used by `ServerCore` to delete the identity
    /// on shutdown.
    pub fn cert_name(&self) -> Option<&crate::name::Name> {
        self.key_material.cert_name()
    }

    /// Sign `data` in place: encode its unsigned prefix, compute the
    /// signature value per the configured mode, and leave `data` ready for
    /// `Data::finish_with_signature`.
    ///
    /// Returns the computed signature value; callers finish the wire
    /// encoding themselves since `Data::finish_with_signature` consumes
    /// `self`.
    pub fn sign_into(&self, data: &mut Data) -> Result<Vec<u8>> {
        let prefix = data.encode_unsigned_prefix();
        match &self.key_material {
            KeyMaterial::Digest => Ok(Sha256::digest(prefix).to_vec()),
            KeyMaterial::Rsa { private_key, .. } => {
                let mut signer = OpenSslSigner::new(MessageDigest::sha256(), private_key)
                    .map_err(AppError::from)?;
                signer.update(prefix).map_err(AppError::from)?;
                signer.sign_to_vec().map_err(AppError::from)
            }
            KeyMaterial::Ecdsa { curve, .. } => {
                // Reconstructed per call: an EcKey signing context isn't Sync.
                let ec_key = self.key_material.ecdsa_signing_key()?;
                let pkey = PKey::from_ec_key(ec_key).map_err(AppError::from)?;
                let mut signer = OpenSslSigner::new(MessageDigest::sha256(), &pkey)
                    .map_err(AppError::from)?;
                signer.update(prefix).map_err(AppError::from)?;
                let der = signer.sign_to_vec().map_err(AppError::from)?;
                der_to_p1363(&der, field_width_for_curve(*curve))
            }
        }
    }
}

/// Re-derive an uncompressed public-key point's bytes, used by the in-memory
/// `KeyChain` test double to hand a verifiable public key to tests without
/// re-deriving it from the private scalar each time.
pub(crate) fn ec_point_bytes(point: &EcPointRef, group: &openssl::ec::EcGroupRef) -> Result<Vec<u8>> {
    let mut ctx = BigNumContext::new().map_err(AppError::from)?;
    point
        .to_bytes(group, openssl::ec::PointConversionForm::UNCOMPRESSED, &mut ctx)
        .map_err(AppError::from)
}
