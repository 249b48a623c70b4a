//! XOR autokey cipher for the TP-Link Smart Home Protocol.
//!
//! HS1xx devices obfuscate every JSON payload with an XOR autokey cipher
//! whose running key starts at 171 (0xAB). Each keystream byte is the
//! previously produced ciphertext byte, which makes the transform
//! self-synchronizing and trivially reversible. This is obfuscation, not
//! encryption: anyone who captures a frame can decode it with the known
//! algorithm, and there is no integrity protection.
//!
//! TCP frames carry a 4-byte big-endian length header in front of the
//! ciphered payload; [`encrypt_with_header`] produces that wire form.

/// Initial key for the XOR autokey cipher.
pub const INITIAL_KEY: u8 = 0xAB;

/// Size of the big-endian length header on TCP frames.
pub const HEADER_LEN: usize = 4;

/// Encrypts a payload with the XOR autokey cipher.
///
/// The running key starts at [`INITIAL_KEY`]; after each byte the key
/// becomes the ciphertext byte just produced. The output is exactly as
/// long as the input.
///
/// # Example
///
/// ```
/// use hs100_core::crypto::{encrypt, decrypt};
///
/// let command = br#"{"system":{"get_sysinfo":{}}}"#;
/// let ciphered = encrypt(command);
/// assert_eq!(decrypt(&ciphered), command);
/// ```
pub fn encrypt(plaintext: &[u8]) -> Vec<u8> {
    let mut key = INITIAL_KEY;
    let mut result = Vec::with_capacity(plaintext.len());

    for &byte in plaintext {
        let ciphered = key ^ byte;
        key = ciphered;
        result.push(ciphered);
    }

    result
}

/// Decrypts a ciphered payload.
///
/// The running key starts at [`INITIAL_KEY`]; after each byte the key
/// becomes the ciphertext byte just consumed (not the recovered plaintext
/// byte). Expects the raw payload **without** the 4-byte length header.
pub fn decrypt(ciphertext: &[u8]) -> Vec<u8> {
    let mut key = INITIAL_KEY;
    let mut result = Vec::with_capacity(ciphertext.len());

    for &byte in ciphertext {
        result.push(key ^ byte);
        key = byte;
    }

    result
}

/// Encrypts a payload and prepends the 4-byte big-endian length header.
///
/// This is the full TCP frame: `[len(ciphertext) as u32 BE][ciphertext]`.
/// The header counts the ciphered payload only, never itself.
///
/// # Example
///
/// ```
/// use hs100_core::crypto::encrypt_with_header;
///
/// let frame = encrypt_with_header(b"test");
/// assert_eq!(frame.len(), 4 + 4);
/// assert_eq!(u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]), 4);
/// ```
pub fn encrypt_with_header(plaintext: &[u8]) -> Vec<u8> {
    let len = plaintext.len() as u32;

    let mut result = Vec::with_capacity(HEADER_LEN + plaintext.len());
    result.extend_from_slice(&len.to_be_bytes());
    result.extend(encrypt(plaintext));

    result
}
