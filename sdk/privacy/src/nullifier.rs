//! Nullifiers
//!
//! ```text
//! Nullifier = H2(Commitment, salt)
//! ```
//!
//! Once a nullifier is published, the corresponding note cannot be spent again.
//! Spent-state tracking lives with the rollup, not here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::commitment::CommitmentScheme;
use crate::field::Field;
use crate::hash::FieldHasher;
use crate::note::Note;

/// A nullifier - unique tag for a spent note
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nullifier(pub Field);

impl Nullifier {
    pub fn as_field(&self) -> &Field {
        &self.0
    }
}

impl fmt::Display for Nullifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl<H> CommitmentScheme<H>
where
    H: FieldHasher<4> + FieldHasher<2>,
{
    /// Derive the nullifier for a note
    pub fn nullifier(&self, note: &Note) -> Nullifier {
        let commitment = self.commit(note);
        Nullifier(<H as FieldHasher<2>>::hash(
            &self.hasher,
            [commitment.as_field(), note.salt()],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::PrivateKey;

    fn note(salt: u64) -> Note {
        let owner = PrivateKey::from_bytes([1u8; 32]).public_key();
        Note::ether(Field::from_u64(1000), owner, Some(Field::from_u64(salt)))
    }

    #[test]
    fn test_nullifier_deterministic() {
        let n = note(5);
        assert_eq!(n.nullifier(), n.nullifier());
    }

    #[test]
    fn test_nullifier_differs_from_commitment() {
        let n = note(5);
        assert_ne!(n.nullifier().as_field(), n.commitment().as_field());
    }

    #[test]
    fn test_nullifier_unique_per_note() {
        assert_ne!(note(5).nullifier(), note(6).nullifier());
    }
}
