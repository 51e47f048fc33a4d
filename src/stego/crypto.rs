// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Cryptographic primitives for payload protection.
//!
//! A password-protected package stores one random salt, one random IV and a
//! salted SHA-256 password hash in its header:
//!
//! - **Verification**: SHA-256 over the salted password. Lets the decoder
//!   reject a wrong password before touching the ciphertext.
//! - **Encryption**: AES-256-CBC with PKCS#7 padding. The key comes from
//!   PBKDF2-HMAC-SHA256 (5000 iterations) over the password and the same
//!   salt; the hash above is never used as key material.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::Hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::stego::error::StegoError;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Salt length in bytes (shared by PBKDF2 and the password hash).
pub const SALT_LEN: usize = 32;
/// AES-CBC initialization vector length in bytes.
pub const IV_LEN: usize = 16;
/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;
/// SHA-256 password hash length in bytes.
pub const PASSWORD_HASH_LEN: usize = 32;
/// AES block size; ciphertext is always a non-zero multiple of this.
pub const BLOCK_LEN: usize = 16;
/// PBKDF2 iteration count for v1 packages.
pub const PBKDF2_ITERATIONS: u32 = 5000;

/// Fresh random salt from the operating system CSPRNG.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Fresh random IV from the operating system CSPRNG.
pub fn generate_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Derive the AES-256 key with PBKDF2-HMAC-SHA256 at [`PBKDF2_ITERATIONS`].
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, StegoError> {
    derive_key_with(password, salt, PBKDF2_ITERATIONS)
}

/// Derive an AES-256 key with an explicit iteration count.
pub fn derive_key_with(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>, StegoError> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, iterations, &mut *key)
        .map_err(|_| StegoError::InvalidKey)?;
    Ok(key)
}

/// Encrypt with AES-256-CBC and PKCS#7 padding.
///
/// Output length is the input length rounded up to the next whole block
/// (a full padding block is added when the input is already aligned).
pub fn encrypt(data: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, StegoError> {
    let cipher = Aes256CbcEnc::new_from_slices(key, iv).map_err(|_| StegoError::InvalidKey)?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(data))
}

/// Decrypt AES-256-CBC ciphertext and strip PKCS#7 padding.
///
/// # Errors
/// - [`StegoError::InvalidKey`] if `key` or `iv` has the wrong length.
/// - [`StegoError::BadPadding`] if the ciphertext is not block aligned or the
///   padding is invalid, which is what a wrong key usually produces.
pub fn decrypt(data: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, StegoError> {
    let cipher = Aes256CbcDec::new_from_slices(key, iv).map_err(|_| StegoError::InvalidKey)?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(data)
        .map_err(|_| StegoError::BadPadding)
}

/// Ciphertext length for a plaintext of `len` bytes.
pub fn encrypted_len(len: usize) -> usize {
    (len / BLOCK_LEN + 1) * BLOCK_LEN
}

/// Lay out salt and password in one buffer the way v1 headers were hashed.
///
/// The buffer is `salt.len() + password.len()` bytes. Password bytes take
/// the leading positions, salt bytes fill whatever the password did not
/// cover inside the first `salt.len()` positions, and the tail is zero.
fn salted_password(salt: &[u8], password: &[u8]) -> Zeroizing<Vec<u8>> {
    let mut buf = Zeroizing::new(vec![0u8; salt.len() + password.len()]);
    buf[..salt.len()].copy_from_slice(salt);
    buf[..password.len()].copy_from_slice(password);
    buf
}

/// SHA-256 over the salted password. Used only for verification.
pub fn hash_password(salt: &[u8], password: &[u8]) -> [u8; PASSWORD_HASH_LEN] {
    let salted = salted_password(salt, password);
    Sha256::digest(salted.as_slice()).into()
}

/// True if `password` is usable for a v1 package. Only ASCII passwords
/// derive the same key as existing v1 images.
pub fn is_valid_password(password: &[u8]) -> bool {
    password.is_ascii()
}

/// Check `candidate` against a stored salt and password hash.
///
/// A non-ASCII candidate never matches. The comparison touches every byte
/// regardless of where the first difference is.
///
/// # Errors
/// [`StegoError::InvalidHeader`] if `known_hash` is not a SHA-256 digest.
pub fn verify_password(candidate: &[u8], salt: &[u8], known_hash: &[u8]) -> Result<bool, StegoError> {
    if known_hash.len() != PASSWORD_HASH_LEN {
        return Err(StegoError::InvalidHeader("password hash has the wrong length"));
    }
    if !is_valid_password(candidate) {
        return Ok(false);
    }
    let computed = hash_password(salt, candidate);
    Ok(constant_time_eq(&computed, known_hash))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
