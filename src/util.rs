//! Small helpers shared across the crate.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AuctionError, AuctionResult};

/// Serialize a value to CBOR bytes.
pub fn to_cbor<T: Serialize>(value: &T) -> AuctionResult<Vec<u8>> {
    let mut buffer = Vec::new();
    ciborium::into_writer(value, &mut buffer)
        .map_err(|e| AuctionError::Serialization(format!("CBOR serialization failed: {e}")))?;
    Ok(buffer)
}

/// Deserialize CBOR data with a size limit to prevent oversized payloads.
pub fn cbor_from_limited_reader<T: DeserializeOwned>(
    data: &[u8],
    max_bytes: usize,
) -> AuctionResult<T> {
    if data.len() > max_bytes {
        return Err(AuctionError::Serialization(format!(
            "CBOR payload too large: {} bytes (max {})",
            data.len(),
            max_bytes
        )));
    }
    ciborium::from_reader(data)
        .map_err(|e| AuctionError::Serialization(format!("CBOR deserialization failed: {e}")))
}

/// Remove `&x` / `§x` colour codes.
pub fn strip_colour_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if (c == '&' || c == '§')
            && chars
                .peek()
                .is_some_and(|n| n.is_ascii_hexdigit() || "klmnorKLMNOR".contains(*n))
        {
            chars.next();
            continue;
        }
        out.push(c);
    }
    out
}

/// Case-insensitive search for `pattern` inside `text`, ignoring colour codes.
pub fn matches_keyword(pattern: &str, text: &str) -> bool {
    let needle = strip_colour_codes(pattern).to_lowercase();
    strip_colour_codes(text).to_lowercase().contains(&needle)
}

/// Short command flags (`-h`, `-f`) present in `args`.
pub fn command_flags<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    args.iter()
        .map(AsRef::as_ref)
        .filter(|arg| arg.starts_with('-') && arg.chars().count() >= 2)
        .map(|arg| arg.chars().take(2).collect())
        .collect()
}
