use md5::{Digest, Md5};

/// The lookup key Gravatar uses for an email address.
pub fn gravatar_id(email: &str) -> String {
    // WARNING: This must stay byte-for-byte compatible with Gravatar's own
    // hashing scheme, or every generated URL falls back to the default image.
    let mut hasher = Md5::new();
    hasher.update(email.to_lowercase());
    format!("{:x}", hasher.finalize())
}
