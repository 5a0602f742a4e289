//! Instance digests (RFC 3230).
//!
//! Used to build `Digest` request headers for uploads and to check the
//! `Digest` values a server returns for `Want-Digest` requests.

use std::fmt;
use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use sha1::Sha1;

use crate::error::{DomainError, DomainResult};

/// Digest algorithms the suite can compute locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// MD5
    Md5,
    /// SHA-1
    Sha1,
}

impl DigestAlgorithm {
    /// Returns the token used in `Digest` and `Want-Digest` headers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
        }
    }

    /// True if `token` names exactly this algorithm, ignoring case.
    /// `sha` and `sha-1` are not `sha1`.
    #[must_use]
    pub fn is_token(self, token: &str) -> bool {
        token.trim().eq_ignore_ascii_case(self.as_str())
    }

    /// Computes the raw digest of `bytes`.
    #[must_use]
    pub fn compute(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            Self::Md5 => Md5::digest(bytes).to_vec(),
            Self::Sha1 => Sha1::digest(bytes).to_vec(),
        }
    }

    /// Computes the digest of `bytes`, base64 encoded as RFC 3230 prescribes.
    #[must_use]
    pub fn base64(self, bytes: &[u8]) -> String {
        STANDARD.encode(self.compute(bytes))
    }

    /// Computes the digest of `bytes`, lower-case hex encoded.
    #[must_use]
    pub fn hex(self, bytes: &[u8]) -> String {
        hex::encode(self.compute(bytes))
    }

    /// Builds a `Digest` header value (`alg=base64`) for `bytes`.
    #[must_use]
    pub fn header_value(self, bytes: &[u8]) -> String {
        format!("{}={}", self.as_str(), self.base64(bytes))
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let token = s.trim();
        [Self::Md5, Self::Sha1]
            .into_iter()
            .find(|algorithm| algorithm.is_token(token))
            .ok_or_else(|| DomainError::UnsupportedDigestAlgorithm(token.to_ascii_lowercase()))
    }
}

/// One `algorithm=value` entry of a `Digest` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestValue {
    /// Algorithm token, lower-cased.
    pub algorithm: String,
    /// Encoded digest as sent by the server.
    pub value: String,
}

impl DigestValue {
    /// Returns true if this entry is the digest of `bytes`.
    ///
    /// Servers disagree on the encoding, so both base64 and hex are
    /// accepted. Unknown algorithms never match.
    #[must_use]
    pub fn matches(&self, bytes: &[u8]) -> bool {
        let Ok(algorithm) = self.algorithm.parse::<DigestAlgorithm>() else {
            return false;
        };
        self.value == algorithm.base64(bytes) || self.value.eq_ignore_ascii_case(&algorithm.hex(bytes))
    }
}

/// Parses a `Digest` header value into its entries.
///
/// The value is split at the first `=` only, since base64 padding also uses
/// `=`.
#[must_use]
pub fn parse_digest_header(value: &str) -> Vec<DigestValue> {
    value
        .split(',')
        .filter_map(|entry| {
            let (algorithm, digest) = entry.split_once('=')?;
            let algorithm = algorithm.trim().to_ascii_lowercase();
            if algorithm.is_empty() {
                return None;
            }
            Some(DigestValue {
                algorithm,
                value: digest.trim().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_known_vectors() {
        assert_eq!(DigestAlgorithm::Md5.hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(DigestAlgorithm::Md5.base64(b""), "1B2M2Y8AsgTpgAmY7PhCfg==");
        assert_eq!(
            DigestAlgorithm::Sha1.hex(b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_header_value() {
        assert_eq!(
            DigestAlgorithm::Md5.header_value(b""),
            "md5=1B2M2Y8AsgTpgAmY7PhCfg=="
        );
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("MD5".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Md5);
        assert_eq!(" Sha1".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha1);
        assert!("sha".parse::<DigestAlgorithm>().is_err());
        assert!("sha-1".parse::<DigestAlgorithm>().is_err());
        assert!(matches!(
            "md1".parse::<DigestAlgorithm>(),
            Err(DomainError::UnsupportedDigestAlgorithm(a)) if a == "md1"
        ));
    }

    #[test]
    fn test_parse_header_keeps_padding() {
        let values = parse_digest_header("md5=1B2M2Y8AsgTpgAmY7PhCfg==, SHA1=abc");
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].algorithm, "md5");
        assert_eq!(values[0].value, "1B2M2Y8AsgTpgAmY7PhCfg==");
        assert_eq!(values[1].algorithm, "sha1");
    }

    #[test]
    fn test_matches_either_encoding() {
        let payload = b"abc";
        let b64 = DigestValue {
            algorithm: "sha1".to_string(),
            value: DigestAlgorithm::Sha1.base64(payload),
        };
        let hex_upper = DigestValue {
            algorithm: "sha1".to_string(),
            value: DigestAlgorithm::Sha1.hex(payload).to_uppercase(),
        };
        let wrong = DigestValue {
            algorithm: "md5".to_string(),
            value: "deadbeef".to_string(),
        };
        assert!(b64.matches(payload));
        assert!(hex_upper.matches(payload));
        assert!(!wrong.matches(payload));
    }
}
