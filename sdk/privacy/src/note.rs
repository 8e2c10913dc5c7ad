//! Shielded Notes
//!
//! A Note (UTXO) represents one private balance unit.
//!
//! ```text
//! Note = {
//!     eth:     Field,   // native asset quantity
//!     pub_key: Point,   // owner's Baby Jubjub public key
//!     salt:    Field,   // 16 bytes of randomness
//!     token:   Field,   // token address (zero = native asset)
//!     amount:  Field,   // ERC20 quantity
//!     nft:     Field,   // NFT id
//!     exit:    ExitAnnotation,
//! }
//! ```
//!
//! At most one of `eth`, `amount`, `nft` is non-zero, and `amount`/`nft`
//! are only set together with a non-zero token. The factories enforce both
//! by construction and [`Note::from_json`] re-checks them.

use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::commitment::{Commitment, CommitmentScheme};
use crate::curve::Point;
use crate::error::NoteError;
use crate::field::Field;
use crate::nullifier::Nullifier;

/// Which asset a note carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    Ether,
    Erc20,
    Nft,
}

impl NoteKind {
    /// Trial-decryption order.
    pub const CANDIDATES: [NoteKind; 3] = [NoteKind::Ether, NoteKind::Erc20, NoteKind::Nft];

    /// Rebuild a note of this kind from recovered plaintext, if the token
    /// address is compatible with the kind.
    pub fn candidate(self, token: &Field, value: &Field, pub_key: Point, salt: &Field) -> Option<Note> {
        let salt = Some(salt.clone());
        match (self, token.is_zero()) {
            (NoteKind::Ether, true) => Some(Note::ether(value.clone(), pub_key, salt)),
            (NoteKind::Erc20, false) => Note::erc20(token.clone(), value.clone(), pub_key, salt).ok(),
            (NoteKind::Nft, false) => Note::nft(token.clone(), value.clone(), pub_key, salt).ok(),
            _ => None,
        }
    }
}

/// Marks a note leaving the pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExitAnnotation {
    /// Ordinary private transfer.
    #[default]
    Transfer,
    /// Withdrawal to an L1 address.
    Withdrawal { to: Field, fee: Field },
    /// Migration to another pool instance.
    Migration { to: Field, fee: Field },
}

impl ExitAnnotation {
    pub fn is_transfer(&self) -> bool {
        matches!(self, ExitAnnotation::Transfer)
    }
}

/// A shielded note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NoteJson", into = "NoteJson")]
pub struct Note {
    eth: Field,
    pub_key: Point,
    salt: Field,
    token: Field,
    amount: Field,
    nft: Field,
    exit: ExitAnnotation,
}

impl Note {
    /// Native asset note. A missing salt is drawn from the OS RNG.
    ///
    /// A zero `eth` gives an empty note with all three quantities zero.
    pub fn ether(eth: Field, pub_key: Point, salt: Option<Field>) -> Self {
        Self::assemble(eth, Field::zero(), Field::zero(), Field::zero(), pub_key, salt)
    }

    /// Fungible token note.
    ///
    /// Fails with [`NoteError::MissingToken`] for the zero (native) token. A
    /// zero `amount` gives an empty note with all three quantities zero.
    pub fn erc20(
        token: Field,
        amount: Field,
        pub_key: Point,
        salt: Option<Field>,
    ) -> Result<Self, NoteError> {
        if token.is_zero() {
            return Err(NoteError::MissingToken);
        }
        Ok(Self::assemble(Field::zero(), token, amount, Field::zero(), pub_key, salt))
    }

    /// Non-fungible token note.
    ///
    /// Fails with [`NoteError::MissingToken`] for the zero (native) token. A
    /// zero `nft` id gives an empty note with all three quantities zero.
    pub fn nft(
        token: Field,
        nft: Field,
        pub_key: Point,
        salt: Option<Field>,
    ) -> Result<Self, NoteError> {
        if token.is_zero() {
            return Err(NoteError::MissingToken);
        }
        Ok(Self::assemble(Field::zero(), token, Field::zero(), nft, pub_key, salt))
    }

    fn assemble(
        eth: Field,
        token: Field,
        amount: Field,
        nft: Field,
        pub_key: Point,
        salt: Option<Field>,
    ) -> Self {
        Self {
            eth,
            pub_key,
            salt: salt.unwrap_or_else(|| Field::random(&mut OsRng)),
            token,
            amount,
            nft,
            exit: ExitAnnotation::Transfer,
        }
    }

    /// Mark this note as a withdrawal.
    pub fn with_withdrawal(mut self, to: Field, fee: Field) -> Self {
        self.exit = ExitAnnotation::Withdrawal { to, fee };
        self
    }

    /// Mark this note as a migration.
    pub fn with_migration(mut self, to: Field, fee: Field) -> Self {
        self.exit = ExitAnnotation::Migration { to, fee };
        self
    }

    pub fn eth(&self) -> &Field {
        &self.eth
    }

    pub fn pub_key(&self) -> &Point {
        &self.pub_key
    }

    pub fn salt(&self) -> &Field {
        &self.salt
    }

    pub fn token(&self) -> &Field {
        &self.token
    }

    pub fn amount(&self) -> &Field {
        &self.amount
    }

    pub fn nft_id(&self) -> &Field {
        &self.nft
    }

    pub fn exit(&self) -> &ExitAnnotation {
        &self.exit
    }

    pub fn kind(&self) -> NoteKind {
        if self.token.is_zero() {
            NoteKind::Ether
        } else if !self.nft.is_zero() {
            NoteKind::Nft
        } else {
            NoteKind::Erc20
        }
    }

    /// The one quantity this note carries (zero for an empty note).
    pub fn value(&self) -> &Field {
        if !self.eth.is_zero() {
            &self.eth
        } else if !self.amount.is_zero() {
            &self.amount
        } else {
            &self.nft
        }
    }

    /// Check the asset rules: at most one non-zero quantity, and token
    /// quantities only under a non-zero token. A note that breaks the second
    /// rule would encrypt to a memo its owner cannot open.
    pub(crate) fn check_assets(&self) -> Result<(), NoteError> {
        let non_zero = [&self.eth, &self.amount, &self.nft]
            .iter()
            .filter(|q| !q.is_zero())
            .count();
        if non_zero > 1 {
            return Err(NoteError::MixedAssets);
        }
        if self.token.is_zero() && !(self.amount.is_zero() && self.nft.is_zero()) {
            return Err(NoteError::MissingToken);
        }
        Ok(())
    }

    /// Compute the commitment for this note
    pub fn commitment(&self) -> Commitment {
        CommitmentScheme::shared().commit(self)
    }

    /// Derive the nullifier revealed when spending this note
    pub fn nullifier(&self) -> Nullifier {
        CommitmentScheme::shared().nullifier(self)
    }

    pub fn to_json(&self) -> Result<String, NoteError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a note, re-validating every field against the modulus, the
    /// public key against the curve, and the single-asset rule.
    pub fn from_json(data: &str) -> Result<Self, NoteError> {
        Ok(serde_json::from_str(data)?)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteJson {
    eth: Field,
    salt: Field,
    token: Field,
    amount: Field,
    nft: Field,
    pub_key: Point,
    #[serde(default, skip_serializing_if = "ExitAnnotation::is_transfer")]
    exit: ExitAnnotation,
}

impl From<Note> for NoteJson {
    fn from(note: Note) -> Self {
        Self {
            eth: note.eth,
            salt: note.salt,
            token: note.token,
            amount: note.amount,
            nft: note.nft,
            pub_key: note.pub_key,
            exit: note.exit,
        }
    }
}

impl TryFrom<NoteJson> for Note {
    type Error = NoteError;

    fn try_from(json: NoteJson) -> Result<Self, Self::Error> {
        let note = Self {
            eth: json.eth,
            pub_key: json.pub_key,
            salt: json.salt,
            token: json.token,
            amount: json.amount,
            nft: json.nft,
            exit: json.exit,
        };
        note.check_assets()?;
        Ok(note)
    }
}
