//! Request fingerprints used as response cache keys.
//!
//! The key is `<prefix>:views.cache_page:<METHOD>:<sha256>` where the digest
//! covers the path and the query pairs sorted by name then value, so parameter
//! order does not split the cache.

use axum::http::{Method, Uri};
use sha2::{Digest, Sha256};

pub fn fingerprint(prefix: &str, method: &Method, uri: &Uri) -> String {
    let mut pairs: Vec<(&str, &str)> = uri
        .query()
        .unwrap_or("")
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .collect();
    pairs.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(uri.path().as_bytes());
    for (name, value) in pairs {
        hasher.update(b"\0");
        hasher.update(name.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
    }

    format!(
        "{}:views.cache_page:{}:{:x}",
        prefix,
        method.as_str(),
        hasher.finalize()
    )
}
