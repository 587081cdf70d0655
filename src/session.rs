//! Shared-household session signing.
//!
//! There is one identity: the household. Logging in compares the submitted
//! passcode against the server-side secret; the issued cookie value is a
//! payload (`ok:<unix-ts>:<nonce>`) plus an HMAC-SHA256 signature keyed by
//! that same secret. Verification recomputes the tag in constant time, so
//! forged or tampered cookies fail without revealing anything.

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Mints and verifies session cookie values for one household secret.
#[derive(Clone)]
pub struct SessionSigner {
    secret: Vec<u8>,
}

impl SessionSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length")
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        hex(&mac.finalize().into_bytes())
    }

    /// Whether a submitted passcode matches the household secret.
    pub fn passcode_matches(&self, passcode: &str) -> bool {
        let mut mac = self.mac();
        mac.update(passcode.as_bytes());
        let tag = mac.finalize().into_bytes();

        let mut expected = self.mac();
        expected.update(&self.secret);
        // Compare MACs of both values rather than the raw strings so the
        // comparison length does not leak the secret's length.
        expected.verify_slice(&tag).is_ok()
    }

    /// Mint a fresh session cookie value: `ok:<unix-ts>:<nonce>.<signature>`.
    pub fn mint(&self) -> String {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let nonce: [u8; 16] = rand::thread_rng().gen();
        let payload = format!("ok:{}:{}", ts, hex(&nonce));
        let sig = self.sign(&payload);
        format!("{}.{}", payload, sig)
    }

    /// Verify a cookie value minted by [`mint`](Self::mint).
    pub fn verify(&self, value: &str) -> bool {
        let Some((payload, sig)) = value.rsplit_once('.') else {
            return false;
        };
        if !payload.starts_with("ok:") {
            return false;
        }
        let Ok(sig_bytes) = unhex(sig) else {
            return false;
        };
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&sig_bytes).is_ok()
    }
}

fn unhex(s: &str) -> Result<Vec<u8>, ()> {
    if s.len() % 2 != 0 {
        return Err(());
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| ()))
        .collect()
}
