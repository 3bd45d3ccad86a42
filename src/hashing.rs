//! Hashing System - SHA-256 for icon manifests
//!
//! Same seed, size and style must always hash the same.

use sha2::{Sha256, Digest};
use serde::Serialize;
use serde_json::to_string;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Canonical JSON: no whitespace, object keys sorted. Going through
/// `Value` sorts struct fields too, since `serde_json::Map` is a `BTreeMap`
/// without the `preserve_order` feature.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    to_string(&serde_json::to_value(value)?)
}

/// Hash of a manifest's canonical form
pub fn compute_manifest_hash<T: Serialize>(manifest: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(manifest)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

/// request_hash = sha256(seed + size + canonical style + engine_version)
pub fn compute_request_hash(
    seed: &str,
    size: u32,
    style: &impl Serialize,
    engine_version: &str,
) -> Result<String, serde_json::Error> {
    let canonical_style = canonical_json(style)?;
    let combined = format!("{}:{}:{}:{}", seed, size, canonical_style, engine_version);
    Ok(sha256_hex(combined.as_bytes()))
}
