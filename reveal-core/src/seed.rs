use crate::error::{Result, RevealError};
use crate::event::SettledEvent;
use crate::types::U256;
use alloy_primitives::keccak256;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Salt mixed into every seed unless configured otherwise.
pub const DEFAULT_SALT: u64 = 1;

/// Length of the serialized seed preimage: 8 + 4 * 32 bytes.
pub const SEED_PREIMAGE_LEN: usize = 136;

/// Preimage length without the trailing salt word.
pub const UNSALTED_PREIMAGE_LEN: usize = SEED_PREIMAGE_LEN - 32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Keccak256,
    Sha256,
}

impl HashAlgorithm {
    pub fn digest(&self, parts: &[&[u8]]) -> [u8; 32] {
        match self {
            HashAlgorithm::Keccak256 => keccak256(parts.concat()).0,
            HashAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                for part in parts {
                    hasher.update(part);
                }
                let mut out = [0u8; 32];
                out.copy_from_slice(&hasher.finalize());
                out
            }
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "keccak256" | "keccak" => Ok(Self::Keccak256),
            "sha256" => Ok(Self::Sha256),
            other => Err(RevealError::config(format!("unknown hash algorithm: {other}"))),
        }
    }
}

/// Fields of a settlement that feed the seed, in hashing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInput {
    pub sequence_number: u64,
    pub outcome_index: u8,
    pub stake_wei: U256,
    pub payout_wei: U256,
    pub salt: U256,
}

impl SeedInput {
    pub fn from_event(event: &SettledEvent, salt: U256) -> Self {
        Self {
            sequence_number: event.sequence_number,
            outcome_index: event.outcome_index,
            stake_wei: event.stake_wei,
            payout_wei: event.payout_wei,
            salt,
        }
    }

    /// `seq (8 BE) || outcome (32 BE) || stake (32 BE) || payout (32 BE) || salt (32 BE)`
    pub fn to_bytes(&self) -> [u8; SEED_PREIMAGE_LEN] {
        let mut out = [0u8; SEED_PREIMAGE_LEN];
        out[..8].copy_from_slice(&self.sequence_number.to_be_bytes());
        out[8..40].copy_from_slice(&U256::from(self.outcome_index).to_be_bytes::<32>());
        out[40..72].copy_from_slice(&self.stake_wei.to_be_bytes::<32>());
        out[72..UNSALTED_PREIMAGE_LEN].copy_from_slice(&self.payout_wei.to_be_bytes::<32>());
        out[UNSALTED_PREIMAGE_LEN..].copy_from_slice(&self.salt.to_be_bytes::<32>());
        out
    }
}

/// Opaque 256-bit seed used only to render an outcome.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Seed([u8; 32]);

impl Seed {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({})", self.to_hex())
    }
}

impl FromStr for Seed {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| RevealError::invalid_seed(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| RevealError::invalid_seed("expected 32 bytes"))?;
        Ok(Self(bytes))
    }
}

impl From<Seed> for String {
    fn from(seed: Seed) -> Self {
        seed.to_hex()
    }
}

impl TryFrom<String> for Seed {
    type Error = RevealError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

pub fn derive_seed(input: &SeedInput, hash: HashAlgorithm) -> Seed {
    Seed(hash.digest(&[&input.to_bytes()]))
}

/// Seed over the preimage with the salt word left off entirely.
pub fn derive_unsalted_seed(input: &SeedInput, hash: HashAlgorithm) -> Seed {
    Seed(hash.digest(&[&input.to_bytes()[..UNSALTED_PREIMAGE_LEN]]))
}
