//! The KeyChain abstraction: identity and certificate lifecycle management.
//!
//! Real NDN keychains persist identities in a TPM or a PKCS#11 module and
//! issue self-signed certificates through a certificate store. That
//! machinery is out of scope here; the trait captures only what the server
//! core needs at startup and shutdown, backed by an in-memory double for
//! tests.

use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::keymaterial::KeyMaterial;
use crate::name::{Name, NameComponent};

/// Creates and destroys the identity a `Signer` signs with.
pub trait KeyChain {
    /// Generate a new RSA identity under `prefix` and return its key
    /// material, including the self-signed certificate name.
    fn generate_rsa_identity(&mut self, prefix: &Name, key_bits: u32) -> Result<KeyMaterial>;

    /// Generate a new ECDSA identity under `prefix` and return its key
    /// material, including the self-signed certificate name.
    fn generate_ecdsa_identity(&mut self, prefix: &Name, key_bits: u32) -> Result<KeyMaterial>;

    /// Remove the identity owning `cert_name`, scrubbing its key material.
    /// Called during shutdown so no key outlives the process.
    fn delete_identity(&mut self, cert_name: &Name) -> Result<()>;
}

/// An in-memory `KeyChain` double: tracks which certificate names are
/// currently "active" so tests can assert shutdown actually deletes the
/// identity it created. Separately retains every public key it ever
/// generated, keyed by certificate name, so tests can still verify a
/// signature produced before shutdown even after the identity has since
/// been deleted.
#[derive(Default)]
pub struct InMemoryKeyChain {
    active: HashSet<Name>,
    generated_public_keys: HashMap<Name, Vec<u8>>,
    next_key_id: u64,
}

impl InMemoryKeyChain {
    /// An empty keychain with no active identities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `cert_name` currently names an active identity.
    pub fn is_active(&self, cert_name: &Name) -> bool {
        self.active.contains(cert_name)
    }

    /// The DER-encoded public key generated for `cert_name`, if this
    /// keychain ever generated one. Unlike `is_active`, this survives
    /// `delete_identity`: it's an append-only audit trail, not a liveness
    /// check.
    pub fn generated_public_key(&self, cert_name: &Name) -> Option<&[u8]> {
        self.generated_public_keys.get(cert_name).map(Vec::as_slice)
    }

    fn next_cert_name(&mut self, prefix: &Name) -> Name {
        self.next_key_id += 1;
        prefix
            .append(NameComponent::from_str("KEY"))
            .append(NameComponent::from_str(&self.next_key_id.to_string()))
            .append(NameComponent::from_str("self"))
            .append(NameComponent::from_str("1"))
    }

    fn remember_public_key(&mut self, key_material: &KeyMaterial, cert_name: &Name) -> Result<()> {
        let public_key_der = key_material.public_key_der()?;
        self.generated_public_keys
            .insert(cert_name.clone(), public_key_der);
        Ok(())
    }
}

impl KeyChain for InMemoryKeyChain {
    fn generate_rsa_identity(&mut self, prefix: &Name, key_bits: u32) -> Result<KeyMaterial> {
        let cert_name = self.next_cert_name(prefix);
        let key_material = KeyMaterial::generate_rsa(key_bits, cert_name.clone())?;
        self.remember_public_key(&key_material, &cert_name)?;
        self.active.insert(cert_name);
        Ok(key_material)
    }

    fn generate_ecdsa_identity(&mut self, prefix: &Name, key_bits: u32) -> Result<KeyMaterial> {
        let cert_name = self.next_cert_name(prefix);
        let key_material = KeyMaterial::generate_ecdsa(key_bits, cert_name.clone())?;
        self.remember_public_key(&key_material, &cert_name)?;
        self.active.insert(cert_name);
        Ok(key_material)
    }

    fn delete_identity(&mut self, cert_name: &Name) -> Result<()> {
        self.active.remove(cert_name);
        Ok(())
    }
}
