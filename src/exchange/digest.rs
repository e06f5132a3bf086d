// Content digests: lowercase hex fingerprints under the algorithms the
// backend understands. Pure functions, no I/O.

use crate::exchange::error::ExchangeError;
use serde::{Deserialize, Serialize};
use sha2::Digest;
use std::fmt;
use std::str::FromStr;

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    /// Every supported algorithm, weakest first
    pub const ALL: [HashAlgorithm; 4] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha512,
    ];

    /// Wire name of the algorithm
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        HashAlgorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == wanted)
            .ok_or_else(|| ExchangeError::UnsupportedAlgorithm(s.to_string()))
    }
}

/// Digest of some content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashResult {
    pub hash_function: String,
    pub hash_value: String,
}

/// Hash `content` with `algorithm`
pub fn digest(content: &[u8], algorithm: HashAlgorithm) -> HashResult {
    let hash_value = match algorithm {
        HashAlgorithm::Md5 => hex_digest::<md5::Md5>(content),
        HashAlgorithm::Sha1 => hex_digest::<sha1::Sha1>(content),
        HashAlgorithm::Sha256 => hex_digest::<sha2::Sha256>(content),
        HashAlgorithm::Sha512 => hex_digest::<sha2::Sha512>(content),
    };

    HashResult {
        hash_function: algorithm.name().to_string(),
        hash_value,
    }
}

/// Parse `name` and hash `content` with it
pub fn digest_named(content: &[u8], name: &str) -> Result<HashResult, ExchangeError> {
    let algorithm = name.parse::<HashAlgorithm>()?;
    Ok(digest(content, algorithm))
}

fn hex_digest<D: Digest>(content: &[u8]) -> String {
    hex::encode(D::digest(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_vectors() {
        assert_eq!(
            digest(b"", HashAlgorithm::Md5).hash_value,
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            digest(b"", HashAlgorithm::Sha1).hash_value,
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
        assert_eq!(
            digest(b"", HashAlgorithm::Sha256).hash_value,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            digest(b"", HashAlgorithm::Sha512).hash_value,
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
             47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
        );
    }

    #[test]
    fn test_abc_vectors() {
        assert_eq!(
            digest(b"abc", HashAlgorithm::Md5).hash_value,
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(
            digest(b"abc", HashAlgorithm::Sha1).hash_value,
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            digest(b"abc", HashAlgorithm::Sha256).hash_value,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            digest(b"abc", HashAlgorithm::Sha512).hash_value,
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_hash_function_echoes_algorithm() {
        for algorithm in HashAlgorithm::ALL {
            let result = digest(b"hello", algorithm);
            assert_eq!(result.hash_function, algorithm.name());
            assert!(result
                .hash_value
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("sha256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("MD5".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Md5);
        assert!(matches!(
            "crc32".parse::<HashAlgorithm>(),
            Err(ExchangeError::UnsupportedAlgorithm(name)) if name == "crc32"
        ));
        assert!("".parse::<HashAlgorithm>().is_err());
    }

    #[test]
    fn test_result_json_shape() {
        let result = digest_named(b"", "sha1").unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"hash_function":"sha1","hash_value":"da39a3ee5e6b4b0d3255bfef95601890afd80709"}"#
        );
    }
}
