// src/cache/key.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cache::policy::CacheKind;

/// Opaque tenant identifier supplied by the authentication layer. Sole
/// partition key for every cache artifact; never derived or validated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub i64);

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derive the storage key for `(kind, tenant)` plus an optional discriminator.
///
/// Layout is `{prefix}:{kind}:{tenant}` with the discriminator appended as a
/// fourth segment. The tenant segment always precedes the discriminator, so a
/// per-kind scan prefix can never match another tenant's keys.
pub fn cache_key(
    prefix: &str,
    kind: CacheKind,
    tenant: TenantId,
    discriminator: Option<&str>,
) -> String {
    match discriminator {
        Some(disc) => format!("{}:{}:{}:{}", prefix, kind.as_str(), tenant, disc),
        None => format!("{}:{}:{}", prefix, kind.as_str(), tenant),
    }
}

/// Stable hash over a filter/pagination parameter set. Pairs are sorted by
/// key before hashing so two semantically equal parameter sets always produce
/// the same discriminator regardless of argument order.
///
/// Each component is length-prefixed before hashing, so a value containing a
/// delimiter character can never collide with a differently split set.
pub fn discriminator(params: &[(&str, &str)]) -> String {
    let mut sorted: Vec<(&str, &str)> = params.to_vec();
    sorted.sort_unstable();

    let mut buf = Vec::new();
    for (key, value) in sorted {
        buf.extend_from_slice(&(key.len() as u64).to_le_bytes());
        buf.extend_from_slice(key.as_bytes());
        buf.extend_from_slice(&(value.len() as u64).to_le_bytes());
        buf.extend_from_slice(value.as_bytes());
    }
    format!("{:016x}", seahash::hash(&buf))
}
