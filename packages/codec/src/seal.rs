//! Password sealing for PEM record bodies
//!
//! Layout of a sealed body: `salt (16) || nonce (12) || ciphertext+tag`.
//! The sealing key is derived from the password with Argon2id over the salt;
//! the PEM label is bound as associated data.

use crate::{CodecError, Result};
use aes_gcm::{
    Aes256Gcm,
    aead::{Aead, KeyInit, Payload, generic_array::GenericArray},
};
use argon2::Argon2;
use rand::RngCore;
use zeroize::Zeroizing;

const SALT_SIZE: usize = 16;
const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;

fn derive_sealing_key(password: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; 32]>> {
    let mut key = Zeroizing::new([0u8; 32]);
    Argon2::default()
        .hash_password_into(password, salt, &mut key[..])
        .map_err(|e| CodecError::KeyDerivation(e.to_string()))?;
    Ok(key)
}

/// Encrypt `plaintext` under `password`, binding `aad`
pub(crate) fn seal(plaintext: &[u8], password: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_SIZE];
    let mut nonce = [0u8; NONCE_SIZE];
    let mut rng = rand::rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut nonce);

    let key = derive_sealing_key(password, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..]).map_err(|_| CodecError::Encrypt)?;
    let ciphertext = cipher
        .encrypt(
            GenericArray::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| CodecError::Encrypt)?;

    let mut sealed = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + ciphertext.len());
    sealed.extend_from_slice(&salt);
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Decrypt a body produced by [`seal`]
pub(crate) fn open(sealed: &[u8], password: &[u8], aad: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if password.is_empty() || sealed.len() < SALT_SIZE + NONCE_SIZE + TAG_SIZE {
        return Err(CodecError::Decrypt);
    }

    let (salt, rest) = sealed.split_at(SALT_SIZE);
    let (nonce, ciphertext) = rest.split_at(NONCE_SIZE);

    let key = derive_sealing_key(password, salt)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..]).map_err(|_| CodecError::Decrypt)?;
    let plaintext = cipher
        .decrypt(
            GenericArray::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| CodecError::Decrypt)?;

    Ok(Zeroizing::new(plaintext))
}
