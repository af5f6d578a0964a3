//! Commit-reveal for two-party wagers
//!
//! The first player publishes `sha256(choice mod 3 || padding)` with a
//! 31-byte random padding. The plaintext stays with the caller until the
//! reveal, so the second player cannot infer the choice from the ledger.
//!
//! Reveal and verification both reduce the choice again, so a raw choice of
//! 4 commits and reveals as paper.

use rand::RngCore;
use spawner_core::hash;
use spawner_core::{SpawnError, SpawnResult};
use std::fmt;

/// Length of the commitment padding
pub const PADDING_LEN: usize = 31;

/// Number of distinct choices
pub const CHOICES: u8 = 3;

/// Reduced rock-paper-scissors choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice {
    /// 0
    Rock,
    /// 1
    Paper,
    /// 2
    Scissors,
}

impl Choice {
    /// Reduce a raw choice modulo [`CHOICES`]
    pub fn from_raw(raw: u8) -> Self {
        match raw % CHOICES {
            0 => Self::Rock,
            1 => Self::Paper,
            _ => Self::Scissors,
        }
    }

    /// Byte committed to
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Rock => 0,
            Self::Paper => 1,
            Self::Scissors => 2,
        }
    }

    /// True when `self` wins against `other`
    pub fn beats(self, other: Choice) -> bool {
        (self.as_byte() + CHOICES - other.as_byte()) % CHOICES == 1
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
        };
        f.write_str(name)
    }
}

/// Check that `padding` is exactly [`PADDING_LEN`] bytes.
pub fn check_padding(padding: &[u8]) -> SpawnResult<[u8; PADDING_LEN]> {
    padding.try_into().map_err(|_| {
        SpawnError::validation(format!(
            "wager padding must be {PADDING_LEN} bytes, got {}",
            padding.len()
        ))
    })
}

/// Fresh random padding
pub fn random_padding<R: RngCore + ?Sized>(rng: &mut R) -> [u8; PADDING_LEN] {
    let mut padding = [0u8; PADDING_LEN];
    rng.fill_bytes(&mut padding);
    padding
}

/// Reduced choice byte followed by the padding
pub fn prehash(choice: u8, padding: &[u8]) -> SpawnResult<Vec<u8>> {
    let padding = check_padding(padding)?;
    let mut bytes = Vec::with_capacity(1 + PADDING_LEN);
    bytes.push(Choice::from_raw(choice).as_byte());
    bytes.extend_from_slice(&padding);
    Ok(bytes)
}

/// `sha256(choice mod 3 || padding)`
pub fn commitment_hash(choice: u8, padding: &[u8]) -> SpawnResult<[u8; 32]> {
    Ok(hash::hash(&prehash(choice, padding)?))
}

/// True when `(choice, padding)` opens `commitment`.
pub fn verify(choice: u8, padding: &[u8], commitment: &[u8; 32]) -> bool {
    commitment_hash(choice, padding).is_ok_and(|digest| digest == *commitment)
}

/// Plaintext of a first player's commitment, kept by the caller only.
#[derive(Clone, PartialEq, Eq)]
pub struct WagerSecret {
    /// Choice as the caller gave it, unreduced
    pub choice: u8,
    /// Commitment padding
    pub padding: [u8; PADDING_LEN],
}

impl WagerSecret {
    /// Validate the padding and keep the plaintext
    pub fn new(choice: u8, padding: &[u8]) -> SpawnResult<Self> {
        Ok(Self {
            choice,
            padding: check_padding(padding)?,
        })
    }

    /// Reduced choice
    pub fn reduced(&self) -> Choice {
        Choice::from_raw(self.choice)
    }

    /// Commitment published at creation
    pub fn commitment(&self) -> [u8; 32] {
        let mut h = hash::hasher();
        h.update([self.reduced().as_byte()]);
        h.update(self.padding);
        h.finalize()
    }

    /// Reveal argument value
    pub fn prehash(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + PADDING_LEN);
        bytes.push(self.reduced().as_byte());
        bytes.extend_from_slice(&self.padding);
        bytes
    }
}

impl fmt::Debug for WagerSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WagerSecret").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn padding_must_be_31_bytes() {
        assert!(commitment_hash(0, &[0; 30]).is_err());
        assert!(commitment_hash(0, &[0; 32]).is_err());
        assert!(commitment_hash(0, &[0; 31]).is_ok());
        assert!(!verify(0, &[0; 30], &[0; 32]));
    }

    #[test]
    fn choice_is_reduced_before_hashing() {
        let padding = [7u8; PADDING_LEN];
        assert_eq!(
            commitment_hash(4, &padding).ok(),
            commitment_hash(1, &padding).ok()
        );
        let commitment = commitment_hash(4, &padding).expect("hash");
        assert!(verify(1, &padding, &commitment));
        assert!(verify(7, &padding, &commitment));
    }

    #[test]
    fn secret_matches_free_functions() {
        let secret = WagerSecret::new(5, &[3; PADDING_LEN]).expect("secret");
        assert_eq!(secret.reduced(), Choice::Scissors);
        assert_eq!(Ok(secret.commitment()), commitment_hash(5, &[3; PADDING_LEN]));
        assert_eq!(Ok(secret.prehash()), prehash(5, &[3; PADDING_LEN]));
        assert_eq!(format!("{secret:?}"), "WagerSecret { .. }");
    }

    #[test]
    fn choice_cycle() {
        assert!(Choice::Paper.beats(Choice::Rock));
        assert!(Choice::Scissors.beats(Choice::Paper));
        assert!(Choice::Rock.beats(Choice::Scissors));
        assert!(!Choice::Rock.beats(Choice::Rock));
        assert!(!Choice::Rock.beats(Choice::Paper));
    }

    proptest! {
        #[test]
        fn commitment_binds_choice(
            choice in 0u8..3,
            other in 0u8..3,
            padding in proptest::array::uniform31(any::<u8>()),
        ) {
            let commitment = commitment_hash(choice, &padding).expect("hash");
            prop_assert!(verify(choice, &padding, &commitment));
            prop_assert_eq!(verify(other, &padding, &commitment), choice == other);
        }

        #[test]
        fn commitment_binds_padding(
            choice in any::<u8>(),
            padding in proptest::array::uniform31(any::<u8>()),
            flip in 0usize..PADDING_LEN,
        ) {
            let commitment = commitment_hash(choice, &padding).expect("hash");
            let mut tampered = padding;
            tampered[flip] ^= 0x01;
            prop_assert!(!verify(choice, &tampered, &commitment));
        }
    }
}
