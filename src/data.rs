//! The Data packet and the pieces of it that are built once and shared.

use std::sync::Arc;

use crate::name::{Name, NameComponent};
use crate::tlv;

/// The signature scheme used for a Data packet, selected by `-s` (see `Config`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SignatureType {
    /// SHA-256 digest of the signed range; no key.
    DigestSha256,
    /// RSASSA-PKCS1-v1.5 with SHA-256.
    RsaSha256,
    /// ECDSA with SHA-256, curve chosen by key size.
    EcdsaSha256,
}

impl SignatureType {
    /// The NDN SignatureType numeric code.
    fn wire_value(self) -> u64 {
        match self {
            SignatureType::DigestSha256 => 0,
            SignatureType::RsaSha256 => 1,
            SignatureType::EcdsaSha256 => 3,
        }
    }

    /// The inverse of [`Self::wire_value`], used when decoding a Data packet
    /// back off the wire.
    pub fn from_wire_value(value: u64) -> Option<Self> {
        match value {
            0 => Some(SignatureType::DigestSha256),
            1 => Some(SignatureType::RsaSha256),
            3 => Some(SignatureType::EcdsaSha256),
            _ => None,
        }
    }
}

/// A reference to the certificate that validates a signature, carried inside
/// `SignatureInfo` for the two asymmetric modes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyLocator(pub Name);

/// Signature metadata: built once per process and shared read-only by every
/// worker for the rest of the run.
#[derive(Clone, Debug)]
pub struct SignatureInfo {
    /// The signature scheme in effect for this run.
    pub signature_type: SignatureType,
    /// The certificate-locating name, present for the two asymmetric modes.
    pub key_locator: Option<KeyLocator>,
}

impl SignatureInfo {
    /// Build the info for digest-mode signing: no key locator.
    pub fn digest() -> Self {
        SignatureInfo {
            signature_type: SignatureType::DigestSha256,
            key_locator: None,
        }
    }

    /// Build the info for an asymmetric mode, locating the certificate whose
    /// name has had its last component (the version) stripped.
    pub fn asymmetric(signature_type: SignatureType, cert_name: &Name) -> Self {
        SignatureInfo {
            signature_type,
            key_locator: Some(KeyLocator(cert_name.strip_last_component())),
        }
    }

    fn encode(&self) -> Vec<u8> {
        let mut value = Vec::new();
        tlv::encode_block(
            tlv::TLV_SIGNATURE_TYPE,
            &tlv::encode_nonneg_integer(self.signature_type.wire_value()),
            &mut value,
        );
        if let Some(KeyLocator(name)) = &self.key_locator {
            let name_bytes = encode_name(name);
            tlv::encode_block(tlv::TLV_KEY_LOCATOR, &name_bytes, &mut value);
        }
        tlv::block(tlv::TLV_SIGNATURE_INFO, &value)
    }

    fn decode(value: &[u8]) -> Option<Self> {
        let (type_tlv, type_value, rest) = tlv::decode_block(value)?;
        if type_tlv != tlv::TLV_SIGNATURE_TYPE {
            return None;
        }
        let signature_type = SignatureType::from_wire_value(tlv::decode_nonneg_integer(type_value)?)?;

        let key_locator = if rest.is_empty() {
            None
        } else {
            let (locator_tlv, locator_value, rest) = tlv::decode_block(rest)?;
            if locator_tlv != tlv::TLV_KEY_LOCATOR || !rest.is_empty() {
                return None;
            }
            Some(KeyLocator(decode_name(locator_value)?))
        };

        Some(SignatureInfo {
            signature_type,
            key_locator,
        })
    }
}

/// The fixed synthetic payload served for every Interest: built once from a
/// freshly randomised ASCII buffer of the configured size, then shared
/// read-only for the process lifetime.
#[derive(Clone, Debug)]
pub struct ContentBlock {
    bytes: Vec<u8>,
}

impl ContentBlock {
    /// Generate a payload of `size` random printable-ASCII bytes.
    pub fn random(size: usize, rng: &mut impl rand_core::RngCore) -> Self {
        const ALPHABET: &[u8] =
            b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        let bytes = (0..size)
            .map(|_| ALPHABET[(rng.next_u32() as usize) % ALPHABET.len()])
            .collect();
        ContentBlock { bytes }
    }

    /// Wrap pre-existing bytes as a content block, e.g. bytes decoded back
    /// off the wire that need to be fed into a fresh `Data` for comparison.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        ContentBlock { bytes }
    }

    /// The payload length, accumulated into `bytes_sent` in `PerWorkerCounters`.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty (the `-c 0` boundary case).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn encode(&self) -> Vec<u8> {
        tlv::block(tlv::TLV_CONTENT, &self.bytes)
    }
}

fn encode_name(name: &Name) -> Vec<u8> {
    let mut value = Vec::new();
    for component in &name.0 {
        tlv::encode_block(tlv::TLV_NAME_COMPONENT, &component.0, &mut value);
    }
    tlv::block(tlv::TLV_NAME, &value)
}

fn decode_name(mut value: &[u8]) -> Option<Name> {
    let mut components = Vec::new();
    while !value.is_empty() {
        let (tlv_type, component_value, rest) = tlv::decode_block(value)?;
        if tlv_type != tlv::TLV_NAME_COMPONENT {
            return None;
        }
        components.push(NameComponent(component_value.to_vec()));
        value = rest;
    }
    Some(Name(components))
}

fn encode_meta_info(freshness_ms: u32) -> Vec<u8> {
    let mut value = Vec::new();
    if freshness_ms != 0 {
        tlv::encode_block(
            tlv::TLV_FRESHNESS_PERIOD,
            &tlv::encode_nonneg_integer(freshness_ms as u64),
            &mut value,
        );
    }
    tlv::block(tlv::TLV_META_INFO, &value)
}

fn decode_meta_info(value: &[u8]) -> Option<u32> {
    if value.is_empty() {
        return Some(0);
    }
    let (tlv_type, freshness_value, rest) = tlv::decode_block(value)?;
    if tlv_type != tlv::TLV_FRESHNESS_PERIOD || !rest.is_empty() {
        return None;
    }
    Some(tlv::decode_nonneg_integer(freshness_value)? as u32)
}

/// A Data packet under construction. Built fresh per Interest, signed once,
/// then handed to the Face and dropped.
pub struct Data {
    /// The Interest's name, carried over verbatim.
    pub name: Name,
    /// FreshnessPeriod in milliseconds; `0` omits the field.
    pub freshness_ms: u32,
    /// The shared, process-lifetime synthetic payload.
    pub content: Arc<ContentBlock>,
    /// The shared, process-lifetime signature metadata.
    pub signature_info: Arc<SignatureInfo>,
    /// The computed signature value, empty until `finish_with_signature` runs.
    pub signature_value: Vec<u8>,
    unsigned_prefix: Option<Vec<u8>>,
}

/// A Data packet decoded back off the wire, used to check that what was
/// actually emitted matches what was asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedData {
    /// The name carried by the decoded Data.
    pub name: Name,
    /// The decoded FreshnessPeriod, or `0` if the field was omitted.
    pub freshness_ms: u32,
    /// The decoded Content bytes.
    pub content: Vec<u8>,
    /// The decoded signature scheme.
    pub signature_type: SignatureType,
    /// The decoded KeyLocator name, if present.
    pub key_locator: Option<Name>,
    /// The decoded signature value bytes.
    pub signature_value: Vec<u8>,
}

/// Decode a complete Data wire encoding, the inverse of
/// [`Data::finish_with_signature`]. Returns `None` if `wire` isn't a
/// well-formed Data TLV in the shape this crate produces.
pub fn decode(wire: &[u8]) -> Option<DecodedData> {
    let (tlv_type, value, trailing) = tlv::decode_block(wire)?;
    if tlv_type != tlv::TLV_DATA || !trailing.is_empty() {
        return None;
    }

    let (name_type, name_value, rest) = tlv::decode_block(value)?;
    if name_type != tlv::TLV_NAME {
        return None;
    }
    let name = decode_name(name_value)?;

    let (meta_type, meta_value, rest) = tlv::decode_block(rest)?;
    if meta_type != tlv::TLV_META_INFO {
        return None;
    }
    let freshness_ms = decode_meta_info(meta_value)?;

    let (content_type, content_value, rest) = tlv::decode_block(rest)?;
    if content_type != tlv::TLV_CONTENT {
        return None;
    }

    let (info_type, info_value, rest) = tlv::decode_block(rest)?;
    if info_type != tlv::TLV_SIGNATURE_INFO {
        return None;
    }
    let signature_info = SignatureInfo::decode(info_value)?;

    let (sigval_type, sigval_value, rest) = tlv::decode_block(rest)?;
    if sigval_type != tlv::TLV_SIGNATURE_VALUE || !rest.is_empty() {
        return None;
    }

    Some(DecodedData {
        name,
        freshness_ms,
        content: content_value.to_vec(),
        signature_type: signature_info.signature_type,
        key_locator: signature_info.key_locator.map(|KeyLocator(name)| name),
        signature_value: sigval_value.to_vec(),
    })
}

impl Data {
    /// Construct a Data with its name/content/freshness/signature-info set,
    /// ready for `Signer::sign_into`.
    pub fn new(
        name: Name,
        freshness_ms: u32,
        content: Arc<ContentBlock>,
        signature_info: Arc<SignatureInfo>,
    ) -> Self {
        Data {
            name,
            freshness_ms,
            content,
            signature_info,
            signature_value: Vec::new(),
            unsigned_prefix: None,
        }
    }

    /// Phase one of the two-phase encode: emit name + meta-info + content +
    /// signature-info. This is the exact byte range that gets signed.
    /// Caches the result so repeated calls (digest mode reads it, then
    /// `finish_with_signature` reads it again) don't re-encode.
    pub fn encode_unsigned_prefix(&mut self) -> &[u8] {
        if self.unsigned_prefix.is_none() {
            let mut prefix = Vec::new();
            prefix.extend_from_slice(&encode_name(&self.name));
            prefix.extend_from_slice(&encode_meta_info(self.freshness_ms));
            prefix.extend_from_slice(&self.content.encode());
            prefix.extend_from_slice(&self.signature_info.encode());
            self.unsigned_prefix = Some(prefix);
        }
        self.unsigned_prefix.as_ref().unwrap()
    }

    /// Phase two: append the TLV `SignatureValue` block and wrap everything
    /// in the outer Data TLV, completing the wire encoding. Consumes `self`
    /// since nothing is signed or mutated after this point.
    pub fn finish_with_signature(mut self, signature_value: Vec<u8>) -> Vec<u8> {
        let mut value = self.encode_unsigned_prefix().to_vec();
        tlv::encode_block(tlv::TLV_SIGNATURE_VALUE, &signature_value, &mut value);
        self.signature_value = signature_value;
        tlv::block(tlv::TLV_DATA, &value)
    }
}
