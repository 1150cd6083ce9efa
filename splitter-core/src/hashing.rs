//! Hashing of record keys and reduction of digests into integers.
use std::{fmt::Display, str::FromStr};

use blake2::{Blake2b512, Blake2s256};
use md5::Md5;
use num_bigint::BigUint;
use num_traits::One;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};
use thiserror::Error;

use crate::config::ConfigError;

/// Hash functions selectable by name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// MD5, 16 byte digest
    #[default]
    Md5,
    /// SHA-1, 20 byte digest
    Sha1,
    /// SHA-224, 28 byte digest
    Sha224,
    /// SHA-256, 32 byte digest
    Sha256,
    /// SHA-384, 48 byte digest
    Sha384,
    /// SHA-512, 64 byte digest
    Sha512,
    /// SHA-512/224, 28 byte digest
    Sha512_224,
    /// SHA-512/256, 32 byte digest
    Sha512_256,
    /// SHA3-224, 28 byte digest
    Sha3_224,
    /// SHA3-256, 32 byte digest
    Sha3_256,
    /// SHA3-384, 48 byte digest
    Sha3_384,
    /// SHA3-512, 64 byte digest
    Sha3_512,
    /// BLAKE2b, 64 byte digest
    Blake2b,
    /// BLAKE2s, 32 byte digest
    Blake2s,
}

impl HashAlgorithm {
    /// Every supported algorithm
    pub const ALL: [HashAlgorithm; 14] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Sha512_224,
        HashAlgorithm::Sha512_256,
        HashAlgorithm::Sha3_224,
        HashAlgorithm::Sha3_256,
        HashAlgorithm::Sha3_384,
        HashAlgorithm::Sha3_512,
        HashAlgorithm::Blake2b,
        HashAlgorithm::Blake2s,
    ];

    /// Canonical lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha224 => "sha224",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Sha512_224 => "sha512_224",
            HashAlgorithm::Sha512_256 => "sha512_256",
            HashAlgorithm::Sha3_224 => "sha3_224",
            HashAlgorithm::Sha3_256 => "sha3_256",
            HashAlgorithm::Sha3_384 => "sha3_384",
            HashAlgorithm::Sha3_512 => "sha3_512",
            HashAlgorithm::Blake2b => "blake2b",
            HashAlgorithm::Blake2s => "blake2s",
        }
    }

    /// Length of the digest in bytes
    pub fn digest_len(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => <Md5 as Digest>::output_size(),
            HashAlgorithm::Sha1 => <Sha1 as Digest>::output_size(),
            HashAlgorithm::Sha224 => <Sha224 as Digest>::output_size(),
            HashAlgorithm::Sha256 => <Sha256 as Digest>::output_size(),
            HashAlgorithm::Sha384 => <Sha384 as Digest>::output_size(),
            HashAlgorithm::Sha512 => <Sha512 as Digest>::output_size(),
            HashAlgorithm::Sha512_224 => <Sha512_224 as Digest>::output_size(),
            HashAlgorithm::Sha512_256 => <Sha512_256 as Digest>::output_size(),
            HashAlgorithm::Sha3_224 => <Sha3_224 as Digest>::output_size(),
            HashAlgorithm::Sha3_256 => <Sha3_256 as Digest>::output_size(),
            HashAlgorithm::Sha3_384 => <Sha3_384 as Digest>::output_size(),
            HashAlgorithm::Sha3_512 => <Sha3_512 as Digest>::output_size(),
            HashAlgorithm::Blake2b => <Blake2b512 as Digest>::output_size(),
            HashAlgorithm::Blake2s => <Blake2s256 as Digest>::output_size(),
        }
    }

    /// Full digest of `key`
    pub fn digest(&self, key: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Md5 => Md5::digest(key).to_vec(),
            HashAlgorithm::Sha1 => Sha1::digest(key).to_vec(),
            HashAlgorithm::Sha224 => Sha224::digest(key).to_vec(),
            HashAlgorithm::Sha256 => Sha256::digest(key).to_vec(),
            HashAlgorithm::Sha384 => Sha384::digest(key).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(key).to_vec(),
            HashAlgorithm::Sha512_224 => Sha512_224::digest(key).to_vec(),
            HashAlgorithm::Sha512_256 => Sha512_256::digest(key).to_vec(),
            HashAlgorithm::Sha3_224 => Sha3_224::digest(key).to_vec(),
            HashAlgorithm::Sha3_256 => Sha3_256::digest(key).to_vec(),
            HashAlgorithm::Sha3_384 => Sha3_384::digest(key).to_vec(),
            HashAlgorithm::Sha3_512 => Sha3_512::digest(key).to_vec(),
            HashAlgorithm::Blake2b => Blake2b512::digest(key).to_vec(),
            HashAlgorithm::Blake2s => Blake2s256::digest(key).to_vec(),
        }
    }
}

/// Looks the algorithm up by name, ignoring case. `-` may stand in for `_`.
impl FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let normalized = match normalized.as_str() {
            // "sha_256" style, but keep "sha512_224" intact
            x if x.starts_with("sha_") => x.replacen("sha_", "sha", 1),
            x => x.to_owned(),
        };
        HashAlgorithm::ALL
            .into_iter()
            .find(|algo| algo.name() == normalized)
            .ok_or_else(|| HashError::UnknownAlgorithm(s.to_owned()))
    }
}

impl Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which end of the digest is consulted and how those bytes are read.
///
/// [ByteOrder::Big] takes the **last** bytes of the digest and reads them
/// big-endian, [ByteOrder::Little] takes the **first** bytes and reads them
/// little-endian. The two orders therefore look at different digest bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ByteOrder {
    /// Trailing bytes, most significant first
    #[default]
    Big,
    /// Leading bytes, least significant first
    Little,
}

impl FromStr for ByteOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "big" => Ok(ByteOrder::Big),
            "little" => Ok(ByteOrder::Little),
            _ => Err(ConfigError::UnknownByteOrder(s.to_owned())),
        }
    }
}

impl Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ByteOrder::Big => f.write_str("big"),
            ByteOrder::Little => f.write_str("little"),
        }
    }
}

/// The integer space hash values live in: `0..=256^byte_count - 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashSpace {
    byte_count: usize,
    byte_order: ByteOrder,
}

impl HashSpace {
    /// Create a hash space consulting `byte_count` bytes of the digest,
    /// `byte_count` must be at least 1
    pub fn new(byte_count: usize, byte_order: ByteOrder) -> Result<Self, HashError> {
        if byte_count == 0 {
            return Err(HashError::ZeroByteCount);
        }
        Ok(Self {
            byte_count,
            byte_order,
        })
    }

    /// Number of digest bytes consulted
    pub fn byte_count(&self) -> usize {
        self.byte_count
    }

    /// Byte order used for slicing and reading the digest
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Largest hash value in this space
    pub fn max_value(&self) -> BigUint {
        (BigUint::one() << (8 * self.byte_count)) - 1u32
    }

    /// Slice `byte_count` bytes off the digest and read them as an integer
    pub fn reduce(&self, digest: &[u8]) -> Result<BigUint, HashError> {
        let n = self.byte_count;
        if n > digest.len() {
            return Err(HashError::Truncation {
                byte_count: n,
                digest_len: digest.len(),
            });
        }
        let value = match self.byte_order {
            ByteOrder::Big => BigUint::from_bytes_be(&digest[digest.len() - n..]),
            ByteOrder::Little => BigUint::from_bytes_le(&digest[..n]),
        };
        Ok(value)
    }
}

/// A hash algorithm paired with the space its digests are reduced into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashDigest {
    algorithm: HashAlgorithm,
    space: HashSpace,
}

impl HashDigest {
    /// Returns [HashError::Truncation] if the digest of `algorithm` is shorter
    /// than `byte_count`
    pub fn new(
        algorithm: HashAlgorithm,
        byte_count: usize,
        byte_order: ByteOrder,
    ) -> Result<Self, HashError> {
        let digest_len = algorithm.digest_len();
        if byte_count > digest_len {
            return Err(HashError::Truncation {
                byte_count,
                digest_len,
            });
        }
        let space = HashSpace::new(byte_count, byte_order)?;
        Ok(Self { algorithm, space })
    }

    /// The selected algorithm
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The space hash values fall into
    pub fn space(&self) -> HashSpace {
        self.space
    }

    /// Hash `key` and reduce the digest to an integer
    pub fn digest_to_int(&self, key: &[u8]) -> Result<BigUint, HashError> {
        self.space.reduce(&self.algorithm.digest(key))
    }
}

/// Errors selecting a hash function or hash space
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HashError {
    /// No hash function with this name
    #[error("Unknown hash function `{0}`")]
    UnknownAlgorithm(String),
    /// More bytes requested than the digest has
    #[error("Cannot take {byte_count} bytes from a digest of {digest_len} bytes")]
    Truncation {
        /// requested number of bytes
        byte_count: usize,
        /// length of the digest
        digest_len: usize,
    },
    /// At least one byte must be consulted
    #[error("Number of hash bytes must be at least 1")]
    ZeroByteCount,
}
