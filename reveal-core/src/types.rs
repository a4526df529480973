//! Wei amounts and accounts.
//!
//! [`U256`] and [`Address`] come from `alloy-primitives`. Amounts travel as
//! decimal strings through the [`amount`] serde adapter so JSON logs stay
//! readable and match the contract's event arguments.

use crate::error::{Result, RevealError};
use alloy_primitives::utils;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use alloy_primitives::{Address, U256};

/// Parse a wei amount written in decimal or `0x` hex.
pub fn parse_wei(s: &str) -> Result<U256> {
    s.trim()
        .parse::<U256>()
        .map_err(|e| RevealError::invalid_amount(format!("{s}: {e}")))
}

/// Parse an ether amount such as `0.013` into wei.
pub fn parse_ether(s: &str) -> Result<U256> {
    utils::parse_ether(s.trim()).map_err(|e| RevealError::invalid_amount(format!("{s}: {e}")))
}

/// Ether with trailing zeros removed, `0.013` rather than `0.013000000000000000`.
pub fn format_ether(amount: U256) -> String {
    let formatted = utils::format_ether(amount);
    match formatted.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                whole.to_string()
            } else {
                format!("{whole}.{frac}")
            }
        }
        None => formatted,
    }
}

/// Nearest `f64`, used only for display ratios.
pub fn approx_f64(amount: U256) -> f64 {
    amount
        .to_be_bytes::<32>()
        .iter()
        .fold(0.0, |acc, b| acc * 256.0 + f64::from(*b))
}

/// Sign and magnitude of `lhs - rhs` for two unsigned amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAmount {
    pub negative: bool,
    #[serde(with = "amount")]
    pub magnitude: U256,
}

impl SignedAmount {
    pub fn difference(lhs: U256, rhs: U256) -> Self {
        if lhs >= rhs {
            Self {
                negative: false,
                magnitude: lhs - rhs,
            }
        } else {
            Self {
                negative: true,
                magnitude: rhs - lhs,
            }
        }
    }

    fn sign(&self) -> &'static str {
        if self.negative && !self.magnitude.is_zero() {
            "-"
        } else {
            ""
        }
    }

    pub fn format_ether(&self) -> String {
        format!("{}{}", self.sign(), format_ether(self.magnitude))
    }
}

impl fmt::Display for SignedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.sign(), self.magnitude)
    }
}

/// Serde adapter: decimal string out, decimal/hex string or integer in.
pub mod amount {
    use super::U256;
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    impl Raw {
        fn into_u256<E: de::Error>(self) -> Result<U256, E> {
            match self {
                Raw::Text(s) => s.trim().parse().map_err(E::custom),
                Raw::Number(n) => Ok(U256::from(n)),
            }
        }
    }

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        Raw::deserialize(deserializer)?.into_u256()
    }

    pub mod option {
        use super::{Raw, U256};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<U256>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.collect_str(v),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<U256>, D::Error> {
            Option::<Raw>::deserialize(deserializer)?
                .map(Raw::into_u256)
                .transpose()
        }
    }
}
