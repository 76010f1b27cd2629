use sha2::{Digest, Sha256};

/// Computes the content fingerprint of extracted text
///
/// The fingerprint is the lowercase hex SHA-256 digest of the UTF-8 bytes
/// (64 characters). Equal texts always produce equal fingerprints.
///
/// # Example
///
/// ```
/// use reg_watch::monitor::fingerprint;
///
/// assert_eq!(fingerprint("Hello World"), fingerprint("Hello World"));
/// assert_ne!(fingerprint("Hello World"), fingerprint("Hello World!"));
/// ```
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
