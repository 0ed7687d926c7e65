//! URL-safe base64 as the provider expects it: `-`/`_` alphabet with
//! padding kept.

use base64::{engine::general_purpose::URL_SAFE, Engine as _};

/// Encode a value for interpolation into a slash-delimited command
pub fn urlsafe_base64(data: impl AsRef<[u8]>) -> String {
    URL_SAFE.encode(data)
}

pub fn urlsafe_base64_decode(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE.decode(s)
}

/// Encoded `bucket:key` entry used by batch and saveas commands
pub fn encoded_entry(bucket: &str, key: &str) -> String {
    urlsafe_base64(format!("{}:{}", bucket, key))
}
