//! Local secret vault.
//!
//! A JSON document mapping secret names to field maps:
//!
//! ```json
//! { "emailCredentials": { "username": "bot@corp.com", "password": "..." } }
//! ```
//!
//! When encryption is on, the document is stored as base64 of AES-256-ECB
//! ciphertext under a machine-specific key derived from hostname + username.

use aes::Aes256;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit, generic_array::GenericArray};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reminder_core::error::{ReminderError, Result};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

type Fields = BTreeMap<String, String>;

const BLOCK: usize = 16;

/// AES-256 block cipher keyed to this machine and user.
struct VaultCipher {
    cipher: Aes256,
}

impl VaultCipher {
    fn for_this_machine() -> Self {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "localhost".into());
        let seed = format!("training-reminder::{}@{host}::vault", whoami::username());
        Self::from_seed(seed.as_bytes())
    }

    fn from_seed(seed: &[u8]) -> Self {
        let digest = Sha256::digest(seed);
        Self {
            cipher: Aes256::new(GenericArray::from_slice(&digest)),
        }
    }

    /// PKCS7-pad, encrypt block by block, base64-encode.
    fn seal(&self, plain: &[u8]) -> String {
        let pad = BLOCK - plain.len() % BLOCK;
        let mut buf = plain.to_vec();
        buf.resize(plain.len() + pad, pad as u8);
        for chunk in buf.chunks_exact_mut(BLOCK) {
            self.cipher.encrypt_block(GenericArray::from_mut_slice(chunk));
        }
        BASE64.encode(buf)
    }

    /// Inverse of `seal`. Bad padding means the vault was sealed under another key.
    fn open(&self, sealed: &str) -> Result<Vec<u8>> {
        let mut buf = BASE64
            .decode(sealed.trim())
            .map_err(|e| ReminderError::Secret(format!("vault is not valid base64: {e}")))?;
        if buf.is_empty() || buf.len() % BLOCK != 0 {
            return Err(ReminderError::Secret(format!(
                "vault ciphertext has invalid length {}",
                buf.len()
            )));
        }
        for chunk in buf.chunks_exact_mut(BLOCK) {
            self.cipher.decrypt_block(GenericArray::from_mut_slice(chunk));
        }

        let pad = buf.last().copied().unwrap_or(0) as usize;
        let valid = (1..=BLOCK).contains(&pad)
            && buf[buf.len() - pad..].iter().all(|&b| b as usize == pad);
        if !valid {
            return Err(ReminderError::Secret(
                "vault cannot be decrypted on this machine".into(),
            ));
        }
        buf.truncate(buf.len() - pad);
        Ok(buf)
    }
}

/// Named secrets kept in a file on disk.
pub struct SecretStore {
    entries: HashMap<String, Fields>,
    path: PathBuf,
    cipher: Option<VaultCipher>,
}

impl SecretStore {
    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        Self::at(PathBuf::new(), false)
    }

    fn at(path: PathBuf, encrypt: bool) -> Self {
        Self {
            entries: HashMap::new(),
            path,
            cipher: encrypt.then(VaultCipher::for_this_machine),
        }
    }

    /// Open the vault at `path`. A missing file is an empty vault.
    pub fn load_from(path: &Path, encrypt: bool) -> Result<Self> {
        let mut store = Self::at(path.to_path_buf(), encrypt);
        store.load()?;
        Ok(store)
    }

    /// Re-read the vault file, replacing whatever is in memory.
    fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            tracing::debug!("No vault at {}", self.path.display());
            self.entries.clear();
            return Ok(());
        }

        let raw = std::fs::read_to_string(&self.path)?;
        let json = match &self.cipher {
            Some(cipher) => String::from_utf8(cipher.open(&raw)?)
                .map_err(|e| ReminderError::Secret(format!("vault is not UTF-8: {e}")))?,
            None => raw,
        };
        self.entries = serde_json::from_str(&json).map_err(|e| {
            ReminderError::Secret(format!("vault {} is malformed: {e}", self.path.display()))
        })?;

        tracing::debug!(
            "🔐 {} secret(s) in {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Write the vault back, readable by the owner only.
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let body = match &self.cipher {
            Some(cipher) => cipher.seal(json.as_bytes()),
            None => json,
        };
        write_private(&self.path, body.as_bytes())
    }

    pub fn get(&self, name: &str) -> Option<&Fields> {
        self.entries.get(name)
    }

    /// Set one field of a secret, creating the secret if needed.
    pub fn set(&mut self, name: &str, field: &str, value: &str) {
        self.entries
            .entry(name.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(unix)]
fn write_private(path: &Path, bytes: &[u8]) -> Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?
        .write_all(bytes)?;
    Ok(())
}

#[cfg(not(unix))]
fn write_private(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)?;
    Ok(())
}
