//! Reverse of the client's image-at-rest obfuscation.
//!
//! Stored images are XORed with a single repeating key byte. The key is
//! recovered by testing the first two ciphertext bytes against known
//! image signatures, then cached: a given native build uses one key, so
//! only the first decode pays for the search.

use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Input shorter than an image signature")]
    TooShort,

    #[error("No known image signature matches under any key")]
    UnknownFormat,
}

/// Known container signatures: leading two bytes and the extension.
const SIGNATURES: [([u8; 2], &str); 4] = [
    ([0xFF, 0xD8], "jpg"),
    ([0x89, 0x50], "png"),
    ([0x47, 0x49], "gif"),
    ([0x42, 0x4D], "bmp"),
];

static KEY_CACHE: Mutex<Option<u8>> = Mutex::new(None);

/// A decoded image and the container it turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
}

/// Decode an obfuscated image blob.
///
/// Fails if the blob is shorter than a signature or no key maps its
/// header onto a known signature; there is no fallback output.
pub fn decrypt(raw: &[u8]) -> Result<DecodedImage, DecodeError> {
    if raw.len() < 2 {
        return Err(DecodeError::TooShort);
    }

    let (key, extension) = derive_key(raw)?;
    let bytes = raw.iter().map(|b| b ^ key).collect();
    Ok(DecodedImage { bytes, extension })
}

/// Find the XOR key for this blob, preferring the cached one.
///
/// The cached key is validated against the current header before reuse;
/// a mismatch (blob from a build with a different key) falls back to a
/// fresh search.
fn derive_key(raw: &[u8]) -> Result<(u8, &'static str), DecodeError> {
    if let Some(key) = cached_key() {
        if let Some(extension) = matching_signature(raw, key) {
            return Ok((key, extension));
        }
        debug!("Cached image key no longer matches, re-deriving");
    }

    for (signature, extension) in SIGNATURES {
        let key = signature[0] ^ raw[0];
        if signature[1] ^ key == raw[1] {
            store_key(key);
            return Ok((key, extension));
        }
    }
    Err(DecodeError::UnknownFormat)
}

fn matching_signature(raw: &[u8], key: u8) -> Option<&'static str> {
    SIGNATURES
        .iter()
        .find(|(sig, _)| sig[0] == (raw[0] ^ key) && sig[1] == (raw[1] ^ key))
        .map(|(_, ext)| *ext)
}

fn cached_key() -> Option<u8> {
    match KEY_CACHE.lock() {
        Ok(guard) => *guard,
        Err(_) => None,
    }
}

fn store_key(key: u8) {
    if let Ok(mut guard) = KEY_CACHE.lock() {
        *guard = Some(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obfuscate(plain: &[u8], key: u8) -> Vec<u8> {
        plain.iter().map(|b| b ^ key).collect()
    }

    #[test]
    fn test_round_trip_all_keys() {
        for (signature, extension) in SIGNATURES {
            let mut plain = signature.to_vec();
            plain.extend(std::iter::repeat_with(rand::random::<u8>).take(64));

            for key in 0u8..=255 {
                let decoded = decrypt(&obfuscate(&plain, key)).unwrap();
                assert_eq!(decoded.extension, extension);
                assert_eq!(decoded.bytes, plain);
            }
        }
    }

    #[test]
    fn test_known_jpeg_header() {
        // ff d8 ff e0 XORed with 0x9a
        let blob = hex::decode("6542657a").unwrap();
        let decoded = decrypt(&blob).unwrap();
        assert_eq!(decoded.extension, "jpg");
        assert_eq!(&decoded.bytes, &[0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[test]
    fn test_cached_key_revalidated_per_blob() {
        let jpg = obfuscate(&[0xFF, 0xD8, 0x01], 0x10);
        let png = obfuscate(&[0x89, 0x50, 0x02], 0x77);

        assert_eq!(decrypt(&jpg).unwrap().extension, "jpg");
        // different key in the same process, cache must not win
        assert_eq!(decrypt(&png).unwrap().extension, "png");
        assert_eq!(decrypt(&jpg).unwrap().extension, "jpg");
    }

    #[test]
    fn test_too_short() {
        assert_eq!(decrypt(&[]), Err(DecodeError::TooShort));
        assert_eq!(decrypt(&[0x12]), Err(DecodeError::TooShort));
    }

    #[test]
    fn test_unknown_format() {
        // delta between the two header bytes matches no known signature
        assert_eq!(decrypt(&[0x00, 0x00]), Err(DecodeError::UnknownFormat));
    }
}
