//! Opaque bearer credential and its on-disk store.
//!
//! The core never inspects token structure beyond presence; acquisition is the
//! user's problem (paste from an authenticated browser session).

use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Result;

/// An opaque bearer token. Redacted in debug output, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential(token.into())
    }

    /// The raw token, for the Authorization header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Serialize, Deserialize)]
struct CredentialFile {
    bearer_token: String,
}

/// File-backed credential store with a write-through in-memory cache.
pub struct CredentialStore {
    path: PathBuf,
    cached: RwLock<Option<Credential>>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("path", &self.path)
            .finish()
    }
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        let cached = RwLock::new(read_credential_file(&path));
        CredentialStore { path, cached }
    }

    pub fn get(&self) -> Option<Credential> {
        self.cached.read().expect("credential lock poisoned").clone()
    }

    pub fn set(&self, credential: Credential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(&CredentialFile {
            bearer_token: credential.expose().to_string(),
        })?;
        fs::write(&self.path, body)?;
        *self.cached.write().expect("credential lock poisoned") = Some(credential);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        *self.cached.write().expect("credential lock poisoned") = None;
        Ok(())
    }
}

fn read_credential_file(path: &PathBuf) -> Option<Credential> {
    let body = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<CredentialFile>(&body) {
        Ok(file) => Some(Credential::new(file.bearer_token)),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable credential file");
            None
        }
    }
}
