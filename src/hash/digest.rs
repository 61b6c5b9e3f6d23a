//! Digest accumulators and values
//!
//! A [`StreamingDigest`] folds chunks in call order and is consumed by
//! [`StreamingDigest::finalize`], so it cannot be fed again afterwards.
//! Digests are defined over the concatenation of all chunks: the same bytes
//! split at different boundaries produce the same [`Digest`].

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Digest algorithm
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-1 (160-bit)
    #[default]
    #[value(name = "sha1")]
    Sha1,
    /// SHA-256
    #[value(name = "sha256")]
    Sha256,
    /// BLAKE3
    #[value(name = "blake3")]
    Blake3,
}

impl HashAlgorithm {
    /// Get the output size in bytes
    pub fn output_size(&self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Blake3 => 32,
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
            Self::Blake3 => "BLAKE3",
        }
    }
}

/// Finalized digest value
///
/// Two digests are equal only if both the algorithm and every byte match.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    algorithm: HashAlgorithm,
    bytes: Box<[u8]>,
}

impl Digest {
    /// Algorithm that produced this digest
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex rendering
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({}:{})", self.algorithm.name(), self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

enum Hasher {
    Sha1(sha1::Sha1),
    Sha256(sha2::Sha256),
    Blake3(Box<blake3::Hasher>),
}

/// Running hash state fed chunk by chunk
pub struct StreamingDigest {
    hasher: Hasher,
    bytes_processed: u64,
}

impl StreamingDigest {
    /// Create a fresh accumulator
    pub fn new(algorithm: HashAlgorithm) -> Self {
        use sha2::Digest as _;

        let hasher = match algorithm {
            HashAlgorithm::Sha1 => Hasher::Sha1(sha1::Sha1::new()),
            HashAlgorithm::Sha256 => Hasher::Sha256(sha2::Sha256::new()),
            HashAlgorithm::Blake3 => Hasher::Blake3(Box::new(blake3::Hasher::new())),
        };

        Self {
            hasher,
            bytes_processed: 0,
        }
    }

    /// Get the algorithm this accumulator uses
    pub fn algorithm(&self) -> HashAlgorithm {
        match self.hasher {
            Hasher::Sha1(_) => HashAlgorithm::Sha1,
            Hasher::Sha256(_) => HashAlgorithm::Sha256,
            Hasher::Blake3(_) => HashAlgorithm::Blake3,
        }
    }

    /// Fold the next chunk into the running state
    pub fn update(&mut self, data: &[u8]) {
        use sha2::Digest as _;

        match &mut self.hasher {
            Hasher::Sha1(h) => h.update(data),
            Hasher::Sha256(h) => h.update(data),
            Hasher::Blake3(h) => {
                h.update(data);
            }
        }
        self.bytes_processed += data.len() as u64;
    }

    /// Bytes folded so far
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_processed
    }

    /// Consume the accumulator and produce the digest
    pub fn finalize(self) -> Digest {
        use sha2::Digest as _;

        let algorithm = self.algorithm();
        let bytes: Box<[u8]> = match self.hasher {
            Hasher::Sha1(h) => h.finalize().to_vec().into_boxed_slice(),
            Hasher::Sha256(h) => h.finalize().to_vec().into_boxed_slice(),
            Hasher::Blake3(h) => h.finalize().as_bytes().to_vec().into_boxed_slice(),
        };

        Digest { algorithm, bytes }
    }
}

/// Compute the digest of data in memory
pub fn digest_bytes(data: &[u8], algorithm: HashAlgorithm) -> Digest {
    let mut digest = StreamingDigest::new(algorithm);
    digest.update(data);
    digest.finalize()
}
