//! Note Commitments
//!
//! Two-stage hash over the note, each stage an arity-4 call:
//!
//! ```text
//! inner      = H4(eth, pub_key.x, pub_key.y, salt)
//! Commitment = H4(inner, token, amount, nft)
//! ```
//!
//! The exit annotation is not committed to; it travels in the public outflow.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::hash::{FieldHasher, PoseidonHasher};
use crate::note::Note;

/// A note commitment (one field element)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commitment(pub Field);

impl Commitment {
    pub fn as_field(&self) -> &Field {
        &self.0
    }

    pub fn into_field(self) -> Field {
        self.0
    }
}

impl From<Field> for Commitment {
    fn from(value: Field) -> Self {
        Self(value)
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

static SHARED: LazyLock<CommitmentScheme> = LazyLock::new(CommitmentScheme::new);

/// Commitment and nullifier derivation over a pluggable hash.
#[derive(Debug, Clone)]
pub struct CommitmentScheme<H = PoseidonHasher> {
    pub(crate) hasher: H,
}

impl CommitmentScheme {
    /// Create a new commitment scheme with the default Poseidon parameters
    pub fn new() -> Self {
        Self {
            hasher: PoseidonHasher::new(),
        }
    }

    /// Process-wide instance. Round constants are generated once.
    pub fn shared() -> &'static CommitmentScheme {
        &SHARED
    }
}

impl Default for CommitmentScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> CommitmentScheme<H>
where
    H: FieldHasher<4> + FieldHasher<2>,
{
    pub fn with_hasher(hasher: H) -> Self {
        Self { hasher }
    }

    /// Commit to a note.
    pub fn commit(&self, note: &Note) -> Commitment {
        let pub_x = note.pub_key().x();
        let pub_y = note.pub_key().y();

        let inner = <H as FieldHasher<4>>::hash(
            &self.hasher,
            [note.eth(), &pub_x, &pub_y, note.salt()],
        );
        let outer = <H as FieldHasher<4>>::hash(
            &self.hasher,
            [&inner, note.token(), note.amount(), note.nft_id()],
        );
        Commitment(outer)
    }
}
