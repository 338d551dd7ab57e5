//! Generation request fingerprinting
//!
//! A fingerprint identifies everything that influences a generated image:
//! the prompt text, the optional seed, and the set of reference images.
//! Identical inputs always map to the same pool artifact, which is what lets
//! repeated runs skip the expensive generation call.

use sha2::{Digest, Sha256};

/// Length of the short hex fingerprint
pub const FINGERPRINT_LEN: usize = 5;

/// Compute the fingerprint for a generation request.
///
/// The canonical form is the prompt, followed by `|seed={n}` when a seed is
/// set, followed by `|refs={a,b,c}` with the reference identifiers sorted so
/// input ordering never matters. An empty reference list is the same as no
/// references. SHA-256, hex-encoded, truncated to five characters; collisions
/// are acceptable at the corpus sizes this tool sees (tens of pages).
pub fn fingerprint(prompt: &str, seed: Option<u64>, ref_images: &[String]) -> String {
    let mut content = prompt.to_string();

    if let Some(seed) = seed {
        content.push_str(&format!("|seed={seed}"));
    }

    if !ref_images.is_empty() {
        let mut refs: Vec<&str> = ref_images.iter().map(String::as_str).collect();
        refs.sort_unstable();
        content.push_str(&format!("|refs={}", refs.join(",")));
    }

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();

    let mut hash = hex::encode(digest);
    hash.truncate(FINGERPRINT_LEN);
    hash
}
