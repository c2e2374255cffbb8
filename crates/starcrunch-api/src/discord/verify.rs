//! Ed25519 request signature verification.
//!
//! Discord signs `timestamp || body` with the application's key and sends
//! the signature in `X-Signature-Ed25519` and the timestamp in
//! `X-Signature-Timestamp`, both as request headers.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use starcrunch_core::{Error, Result};

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Verifies interaction signatures against the application public key.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: VerifyingKey,
}

impl SignatureVerifier {
    /// Parse the hex public key shown in the developer portal.
    pub fn from_hex(public_key: &str) -> Result<Self> {
        let bytes = hex::decode(public_key.trim())
            .map_err(|e| Error::Config(format!("DISCORD_PUBLIC_KEY is not hex: {}", e)))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::Config("DISCORD_PUBLIC_KEY must be 32 bytes".to_string()))?;
        let key = VerifyingKey::from_bytes(&bytes)
            .map_err(|e| Error::Config(format!("DISCORD_PUBLIC_KEY is invalid: {}", e)))?;
        Ok(Self { key })
    }

    pub fn verify(&self, timestamp: &str, body: &[u8], signature_hex: &str) -> Result<()> {
        let bytes = hex::decode(signature_hex.trim())
            .map_err(|_| Error::Unauthorized("Invalid request signature".to_string()))?;
        let bytes: [u8; 64] = bytes
            .try_into()
            .map_err(|_| Error::Unauthorized("Invalid request signature".to_string()))?;
        let signature = Signature::from_bytes(&bytes);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.key
            .verify(&message, &signature)
            .map_err(|_| Error::Unauthorized("Invalid request signature".to_string()))
    }
}
