//! AES-256-GCM sealing for secrets kept in the settings table
//!
//! Sealed values are text: a version prefix followed by base64 of the
//! nonce and ciphertext. The default key is derived from a machine
//! fingerprint via Argon2id, so a copied database is useless elsewhere.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::Argon2;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use gamelayer_core::{Error, Result};
use rand::RngCore;

const SEALED_PREFIX: &str = "v1:";
const NONCE_LEN: usize = 12;
const MACHINE_SALT: &[u8] = b"gamelayer-dash-v1-machine-salt";

/// Encrypts and decrypts short secrets such as API keys
pub struct SecretSealer {
    cipher: Aes256Gcm,
}

impl SecretSealer {
    /// Create a sealer from a 32-byte key
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.len() != 32 {
            return Err(Error::EncryptionError(format!(
                "Key must be 32 bytes, got {}",
                key.len()
            )));
        }

        let cipher =
            Aes256Gcm::new_from_slice(key).map_err(|e| Error::EncryptionError(e.to_string()))?;

        Ok(Self { cipher })
    }

    /// Sealer whose key is bound to this machine
    pub fn machine_bound() -> Result<Self> {
        Self::new(&derive_machine_key()?)
    }

    /// Create a sealer from a passphrase (derives the key via Argon2id)
    pub fn from_password(password: &str) -> Result<Self> {
        Self::new(&derive_key_from_password(password, MACHINE_SALT)?)
    }

    /// Encrypt `plaintext` under a fresh random nonce
    pub fn seal(&self, plaintext: &str) -> Result<String> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|e| Error::EncryptionError(e.to_string()))?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&ciphertext);
        Ok(format!("{}{}", SEALED_PREFIX, STANDARD.encode(payload)))
    }

    /// Decrypt a value produced by [`SecretSealer::seal`]
    pub fn open(&self, sealed: &str) -> Result<String> {
        let encoded = sealed
            .strip_prefix(SEALED_PREFIX)
            .ok_or_else(|| Error::EncryptionError("Unknown sealed value format".to_string()))?;
        let payload = STANDARD
            .decode(encoded)
            .map_err(|e| Error::EncryptionError(e.to_string()))?;
        if payload.len() <= NONCE_LEN {
            return Err(Error::EncryptionError("Sealed value is truncated".to_string()));
        }

        let (nonce, ciphertext) = payload.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| Error::EncryptionError(e.to_string()))?;

        String::from_utf8(plaintext).map_err(|e| Error::EncryptionError(e.to_string()))
    }

    pub fn is_sealed(value: &str) -> bool {
        value.starts_with(SEALED_PREFIX)
    }
}

fn derive_key_from_password(password: &str, salt: &[u8]) -> Result<[u8; 32]> {
    let mut key = [0u8; 32];
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| Error::EncryptionError(format!("Argon2 key derivation failed: {}", e)))?;
    Ok(key)
}

/// Machine id plus host name, used as the key derivation input
pub fn machine_fingerprint() -> String {
    let machine_id = machine_uid::get().unwrap_or_else(|_| "fallback-no-machine-id".to_string());

    let hostname = std::env::var("COMPUTERNAME")
        .or_else(|_| std::env::var("HOSTNAME"))
        .unwrap_or_else(|_| "unknown-host".to_string());

    format!("gamelayer-{}-{}", machine_id, hostname)
}

/// Derive the 32-byte key tied to this machine (stable across calls)
pub fn derive_machine_key() -> Result<[u8; 32]> {
    derive_key_from_password(&machine_fingerprint(), MACHINE_SALT)
}
