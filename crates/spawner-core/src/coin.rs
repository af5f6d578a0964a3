//! Priced quantities
//!
//! Every fee and stake is a [`Coin`]: an amount tagged with the name of the
//! fungible unit it is denominated in. The spawner only ever charges in its
//! own unit, [`CoinName::spawner`].

use crate::errors::{SpawnError, SpawnResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of the spawner's own coin, zero-padded to 32 bytes on the ledger.
pub const SPAWNER_COIN_LABEL: &str = "SpawnerCoin";

/// 32-byte name of a fungible unit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CoinName(pub [u8; 32]);

impl CoinName {
    /// Build a name from an ASCII label, right-padded with zeros.
    pub fn from_label(label: &str) -> SpawnResult<Self> {
        let bytes = label.as_bytes();
        if bytes.len() > 32 {
            return Err(SpawnError::validation(format!(
                "coin name exceeds 32 bytes (got {})",
                bytes.len()
            )));
        }
        let mut name = [0u8; 32];
        name[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(name))
    }

    /// The spawner's coin name.
    pub fn spawner() -> Self {
        let mut name = [0u8; 32];
        name[..SPAWNER_COIN_LABEL.len()].copy_from_slice(SPAWNER_COIN_LABEL.as_bytes());
        Self(name)
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Label with trailing zero padding stripped
    pub fn label(&self) -> String {
        let end = self.0.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }
}

impl fmt::Debug for CoinName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CoinName({})", self.label())
    }
}

/// An amount of a named fungible unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// Unit the value is denominated in
    pub name: CoinName,
    /// Non-negative amount
    pub value: u64,
}

impl Coin {
    /// Create a coin amount
    pub fn new(name: CoinName, value: u64) -> Self {
        Self { name, value }
    }

    /// Amount in the spawner's own coin
    pub fn spawner(value: u64) -> Self {
        Self::new(CoinName::spawner(), value)
    }

    /// Add a raw amount, failing on overflow.
    pub fn checked_add_value(&self, extra: u64) -> SpawnResult<Self> {
        let value = self.value.checked_add(extra).ok_or_else(|| {
            SpawnError::validation(format!("coin amount overflow: {} + {extra}", self.value))
        })?;
        Ok(Self::new(self.name, value))
    }

    /// Add another coin of the same unit, failing on overflow or unit mismatch.
    pub fn checked_add(&self, other: &Coin) -> SpawnResult<Self> {
        if self.name != other.name {
            return Err(SpawnError::validation(format!(
                "cannot add {} to {}",
                other.name.label(),
                self.name.label()
            )));
        }
        self.checked_add_value(other.value)
    }

    /// Subtract another coin of the same unit, failing on underflow or unit mismatch.
    pub fn checked_sub(&self, other: &Coin) -> SpawnResult<Self> {
        if self.name != other.name {
            return Err(SpawnError::validation(format!(
                "cannot subtract {} from {}",
                other.name.label(),
                self.name.label()
            )));
        }
        let value = self.value.checked_sub(other.value).ok_or_else(|| {
            SpawnError::validation(format!(
                "coin amount underflow: {} - {}",
                self.value, other.value
            ))
        })?;
        Ok(Self::new(self.name, value))
    }

    /// Little-endian amount, the encoding of the `coins` fetch argument.
    pub fn value_bytes(&self) -> [u8; 8] {
        self.value.to_le_bytes()
    }

    /// bincode encoding, used when a whole coin travels as an argument
    pub fn to_bytes(&self) -> SpawnResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a coin argument
    pub fn from_bytes(bytes: &[u8]) -> SpawnResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Decode a little-endian u64 argument value.
pub fn decode_amount(bytes: &[u8]) -> SpawnResult<u64> {
    let array: [u8; 8] = bytes.try_into().map_err(|_| {
        SpawnError::malformed(format!("amount must be 8 bytes, got {}", bytes.len()))
    })?;
    Ok(u64::from_le_bytes(array))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawner_name_is_zero_padded() {
        let name = CoinName::spawner();
        assert_eq!(&name.0[..11], b"SpawnerCoin");
        assert!(name.0[11..].iter().all(|b| *b == 0));
        assert_eq!(name.label(), "SpawnerCoin");
        assert_eq!(CoinName::from_label("SpawnerCoin").ok(), Some(name));
    }

    #[test]
    fn long_label_rejected() {
        assert!(CoinName::from_label(&"x".repeat(33)).is_err());
    }

    #[test]
    fn checked_arithmetic() {
        let a = Coin::spawner(100);
        assert_eq!(a.checked_add(&Coin::spawner(5)).map(|c| c.value), Ok(105));
        assert!(Coin::spawner(u64::MAX).checked_add_value(1).is_err());

        let other = Coin::new(CoinName([9; 32]), 1);
        assert!(a.checked_add(&other).is_err());

        assert_eq!(a.checked_sub(&Coin::spawner(5)).map(|c| c.value), Ok(95));
        assert!(a.checked_sub(&Coin::spawner(101)).is_err());
        assert!(a.checked_sub(&other).is_err());
    }

    #[test]
    fn amount_encoding() {
        let coin = Coin::spawner(0x0102);
        assert_eq!(decode_amount(&coin.value_bytes()), Ok(0x0102));
        assert!(decode_amount(&[1, 2, 3]).is_err());
    }
}
