//! zkor Privacy SDK
//!
//! Shielded note (UTXO) primitives for the zkor rollup.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Note (UTXO)                             │
//! │      eth | token | amount | nft | salt | owner pk | exit        │
//! └─────────────────────────────────────────────────────────────────┘
//!        │                    │                       │
//!        ▼                    ▼                       ▼
//! ┌──────────────┐   ┌─────────────────┐   ┌─────────────────────────┐
//! │  Commitment  │   │    Nullifier    │   │     Encrypted memo      │
//! │ H4(H4(..),..)│   │  H2(cm, salt)   │   │ epk || ChaCha20(secret) │
//! └──────────────┘   └─────────────────┘   └─────────────────────────┘
//!        │                                            │
//!        ▼                                            ▼
//! ┌──────────────┐                         ┌─────────────────────────┐
//! │   Outflow    │                         │  Trial decryption by    │
//! │ (public tx)  │                         │  the owner's key        │
//! └──────────────┘                         └─────────────────────────┘
//! ```

pub mod commitment;
pub mod curve;
pub mod encryption;
pub mod error;
pub mod field;
pub mod hash;
pub mod keys;
pub mod note;
pub mod nullifier;
pub mod outflow;
pub mod tokens;

pub use commitment::{Commitment, CommitmentScheme};
pub use curve::{Point, Scalar};
pub use encryption::{
    EncryptedMemo, MEMO_LEN, decrypt_note, encrypt_note, encrypt_note_with_rng, scan_memos,
};
pub use error::{FieldError, NoteError};
pub use field::Field;
pub use hash::{FieldHasher, PoseidonHasher};
pub use keys::PrivateKey;
pub use note::{ExitAnnotation, Note, NoteKind};
pub use nullifier::Nullifier;
pub use outflow::{Outflow, OutflowType, PublicData};
pub use tokens::{StaticTokenRegistry, TokenRegistry};
