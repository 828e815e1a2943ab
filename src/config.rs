//! Runtime configuration, parsed once from the command line.

use crate::name::Name;

/// How Data packets are signed, selected by `-s`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SignatureMode {
    /// SHA-256 digest of the signed range; no key.
    Digest,
    /// RSASSA-PKCS1-v1.5 with SHA-256.
    Rsa,
    /// ECDSA with SHA-256, curve chosen by key size.
    Ecdsa,
}

/// Fully resolved server configuration, built by [`crate::cli::parse`].
#[derive(Clone, Debug)]
pub struct Config {
    /// Name prefix to register and serve Data under (`-p`).
    pub prefix: Name,
    /// Signature scheme (`-s`).
    pub sig_mode: SignatureMode,
    /// Key size in bits, meaning depends on `sig_mode` (`-k`).
    pub key_bits: u32,
    /// Number of worker threads (`-t`).
    pub thread_count: usize,
    /// Content payload size in bytes (`-c`).
    pub payload_size: usize,
    /// FreshnessPeriod in milliseconds, `0` means omit the field (`-f`).
    pub freshness_ms: u32,
}
