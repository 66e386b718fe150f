//! Request signing.
//!
//! Every request made on behalf of a session carries an HMAC-SHA512 digest of
//! the request timestamp, path and body, keyed by the session's api key.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::error::{AmatinoError, AmatinoResult};

type HmacSha512 = Hmac<Sha512>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    timestamp: i64,
    encoded: String,
}

impl Signature {
    pub fn sign(
        api_key: &str,
        timestamp: i64,
        path: &str,
        body: Option<&str>,
    ) -> AmatinoResult<Self> {
        let mut mac = HmacSha512::new_from_slice(api_key.as_bytes()).map_err(|e| {
            AmatinoError::InvalidConfig {
                message: format!("Unusable api key: {}", e),
            }
        })?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(path.as_bytes());
        if let Some(body) = body {
            mac.update(body.as_bytes());
        }

        Ok(Self {
            timestamp,
            encoded: STANDARD.encode(mac.finalize().into_bytes()),
        })
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }
}
