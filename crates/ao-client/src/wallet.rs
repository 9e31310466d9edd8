//! Wallet credential loaded from an Arweave JWK key file
//!
//! The wallet is read once at startup and held read-only for the life of the
//! process. Only the public half is ever sent over the wire.

use std::path::Path;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::{ClientError, Result};

/// RSA JWK as stored in an Arweave key file. Private fields are accepted in
/// the file but never retained.
#[derive(Debug, Deserialize)]
struct Jwk {
    kty: String,
    n: String,
    #[serde(default)]
    e: Option<String>,
}

/// Signing credential derived from a locally-stored key file
pub struct Wallet {
    owner: String,
    address: String,
}

impl Wallet {
    /// Load a wallet from a JWK key file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let jwk: Jwk = serde_json::from_str(&raw)?;

        if jwk.kty != "RSA" {
            return Err(ClientError::Wallet(format!(
                "unsupported key type '{}', expected RSA",
                jwk.kty
            )));
        }
        if jwk.e.is_none() {
            return Err(ClientError::Wallet("key file missing exponent".into()));
        }

        let modulus = URL_SAFE_NO_PAD
            .decode(jwk.n.as_bytes())
            .map_err(|e| ClientError::Wallet(format!("modulus is not base64url: {}", e)))?;

        // Arweave address: base64url(sha256(modulus bytes))
        let address = URL_SAFE_NO_PAD.encode(Sha256::digest(&modulus));

        Ok(Self {
            owner: jwk.n,
            address,
        })
    }

    /// The wallet address (43-character base64url digest of the modulus).
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The public modulus, sent as the `Owner` of submitted items.
    pub fn owner(&self) -> &str {
        &self.owner
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_keyfile(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_rsa_keyfile() {
        let n = URL_SAFE_NO_PAD.encode([7u8; 512]);
        let file = write_keyfile(&format!(
            r#"{{"kty":"RSA","n":"{}","e":"AQAB"}}"#,
            n
        ));

        let wallet = Wallet::load(file.path()).unwrap();
        assert_eq!(wallet.owner(), n);
        // sha256 digest is 32 bytes, 43 chars unpadded base64url
        assert_eq!(wallet.address().len(), 43);
        assert!(!wallet.address().contains('='));
    }

    #[test]
    fn test_address_is_stable() {
        let n = URL_SAFE_NO_PAD.encode([1u8; 64]);
        let file = write_keyfile(&format!(
            r#"{{"kty":"RSA","n":"{}","e":"AQAB"}}"#,
            n
        ));

        let a = Wallet::load(file.path()).unwrap();
        let b = Wallet::load(file.path()).unwrap();
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn test_reject_non_rsa_key() {
        let file = write_keyfile(r#"{"kty":"EC","n":"AQAB","e":"AQAB"}"#);
        let err = Wallet::load(file.path()).unwrap_err();
        assert!(matches!(err, ClientError::Wallet(_)));
    }

    #[test]
    fn test_reject_bad_modulus() {
        let file = write_keyfile(r#"{"kty":"RSA","n":"not base64!","e":"AQAB"}"#);
        let err = Wallet::load(file.path()).unwrap_err();
        assert!(matches!(err, ClientError::Wallet(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Wallet::load(Path::new("/nonexistent/keyfile.json")).unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }
}
