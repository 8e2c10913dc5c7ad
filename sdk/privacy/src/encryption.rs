//! Note Encryption
//!
//! Encrypts the secret part of a note for its owner using Baby Jubjub ECDH
//! and the ChaCha20 stream cipher.
//!
//! ```text
//! Flow:
//! 1. Sender draws a 16-byte ephemeral secret esk
//! 2. Shared key = encode(owner_pk * esk)
//! 3. Plaintext  = salt (16, LE) || token index (1) || value (32, LE)
//! 4. Ciphertext = ChaCha20(shared key, zero nonce, plaintext)
//! 5. Memo       = encode(G * esk) (32) || ciphertext (49)   = 81 bytes
//! ```
//!
//! The plaintext does not say which kind of note it came from, so the
//! receiver rebuilds each candidate kind and keeps the one whose commitment
//! matches the on-chain commitment.

use std::fmt;

use ark_ff::PrimeField;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::{ChaCha20, Key, Nonce};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroizing;

use crate::commitment::{Commitment, CommitmentScheme};
use crate::curve::{POINT_BYTES, Point, Scalar};
use crate::error::NoteError;
use crate::field::{Field, RANDOM_BYTES};
use crate::keys::PrivateKey;
use crate::note::{Note, NoteKind};
use crate::tokens::TokenRegistry;

pub const SALT_LEN: usize = 16;
pub const TOKEN_ID_LEN: usize = 1;
pub const VALUE_LEN: usize = 32;
pub const PLAINTEXT_LEN: usize = SALT_LEN + TOKEN_ID_LEN + VALUE_LEN;
/// 32 bytes ephemeral pub key + 16 bytes salt + 1 byte token id + 32 bytes value
pub const MEMO_LEN: usize = POINT_BYTES + PLAINTEXT_LEN;

/// An encrypted memo (attached to the transaction)
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedMemo([u8; MEMO_LEN]);

impl EncryptedMemo {
    pub fn ephemeral_key(&self) -> &[u8] {
        &self.0[..POINT_BYTES]
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.0[POINT_BYTES..]
    }

    pub fn as_bytes(&self) -> &[u8; MEMO_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, NoteError> {
        let bytes = hex::decode(s.trim_start_matches("0x"))?;
        Self::try_from(bytes.as_slice())
    }
}

impl From<[u8; MEMO_LEN]> for EncryptedMemo {
    fn from(bytes: [u8; MEMO_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for EncryptedMemo {
    type Error = NoteError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let memo: [u8; MEMO_LEN] = bytes.try_into().map_err(|_| NoteError::MalformedMemo {
            expected: MEMO_LEN,
            got: bytes.len(),
        })?;
        Ok(Self(memo))
    }
}

impl fmt::Debug for EncryptedMemo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptedMemo(0x{})", self.to_hex())
    }
}

impl Serialize for EncryptedMemo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", self.to_hex()))
    }
}

impl<'de> Deserialize<'de> for EncryptedMemo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Encrypt a note for its owner, drawing the ephemeral secret from the OS RNG.
pub fn encrypt_note<T: TokenRegistry>(note: &Note, registry: &T) -> Result<EncryptedMemo, NoteError> {
    encrypt_note_with_rng(note, registry, &mut OsRng)
}

/// Encrypt a note for its owner.
///
/// Fails if the note breaks the asset rules, its token is not registered or
/// its salt does not fit in 16 bytes. Every call must use a fresh ephemeral
/// secret. The plaintext, the shared key and the ephemeral secret are wiped
/// on every exit path.
pub fn encrypt_note_with_rng<T, R>(
    note: &Note,
    registry: &T,
    rng: &mut R,
) -> Result<EncryptedMemo, NoteError>
where
    T: TokenRegistry,
    R: RngCore + CryptoRng,
{
    note.check_assets()?;
    let token_id = registry
        .token_id(note.token())
        .ok_or_else(|| NoteError::UnknownToken(note.token().clone()))?;

    let mut buf = Zeroizing::new([0u8; PLAINTEXT_LEN]);
    let salt = Zeroizing::new(note.salt().to_bytes_le(SALT_LEN)?);
    let value = Zeroizing::new(note.value().to_bytes_le(VALUE_LEN)?);
    buf[..SALT_LEN].copy_from_slice(&salt);
    buf[SALT_LEN] = token_id;
    buf[SALT_LEN + TOKEN_ID_LEN..].copy_from_slice(&value);

    let ephemeral_secret = draw_ephemeral_secret(rng);
    let shared_key = Zeroizing::new(note.pub_key().multiply(&ephemeral_secret).encode()?);
    apply_keystream(&shared_key, &mut buf[..]);

    let ephemeral_pk = Point::generator().multiply(&ephemeral_secret).encode()?;

    let mut memo = [0u8; MEMO_LEN];
    memo[..POINT_BYTES].copy_from_slice(&ephemeral_pk);
    memo[POINT_BYTES..].copy_from_slice(&buf[..]);
    Ok(EncryptedMemo(memo))
}

/// Trial-decrypt a memo against an expected commitment.
///
/// Returns `Ok(None)` when the memo is not addressed to `private_key` or does
/// not open `expected`; callers routinely scan many memos and most will miss.
pub fn decrypt_note<T: TokenRegistry>(
    expected: &Commitment,
    memo: &EncryptedMemo,
    private_key: &PrivateKey,
    registry: &T,
) -> Result<Option<Note>, NoteError> {
    decrypt_note_with_scheme(expected, memo, private_key, registry, CommitmentScheme::shared())
}

fn decrypt_note_with_scheme<T: TokenRegistry>(
    expected: &Commitment,
    memo: &EncryptedMemo,
    private_key: &PrivateKey,
    registry: &T,
    scheme: &CommitmentScheme,
) -> Result<Option<Note>, NoteError> {
    let Ok(ephemeral_pk) = Point::decode(memo.ephemeral_key()) else {
        log::trace!("memo ephemeral key is not a curve point, skipping");
        return Ok(None);
    };

    let multiplier = Zeroizing::new(private_key.scalar());
    let shared_key = Zeroizing::new(ephemeral_pk.multiply(&multiplier).encode()?);

    let mut buf = Zeroizing::new([0u8; PLAINTEXT_LEN]);
    buf.copy_from_slice(memo.ciphertext());
    apply_keystream(&shared_key, &mut buf[..]);
    drop(shared_key);
    drop(multiplier);

    let Some(Plaintext { salt, token_id, value }) = Plaintext::parse(&buf) else {
        log::trace!("memo plaintext out of range, skipping");
        return Ok(None);
    };

    let Some(token) = registry.token_address(token_id) else {
        log::trace!("memo token index {token_id} is not registered, skipping");
        return Ok(None);
    };

    let owner = private_key.public_key();
    for kind in NoteKind::CANDIDATES {
        let Some(note) = kind.candidate(&token, &value, owner, &salt) else {
            continue;
        };
        if scheme.commit(&note) == *expected {
            log::debug!("memo opened commitment {expected} as {kind:?} note");
            return Ok(Some(note));
        }
        log::trace!("{kind:?} candidate does not match commitment {expected}");
    }
    Ok(None)
}

/// Trial-decrypt a batch of `(commitment, memo)` pairs, keeping the notes
/// that belong to `private_key`.
pub fn scan_memos<'a, I, T>(
    outputs: I,
    private_key: &PrivateKey,
    registry: &T,
) -> Result<Vec<Note>, NoteError>
where
    I: IntoIterator<Item = (&'a Commitment, &'a EncryptedMemo)>,
    T: TokenRegistry,
{
    let scheme = CommitmentScheme::shared();
    let mut found = Vec::new();
    for (commitment, memo) in outputs {
        if let Some(note) = decrypt_note_with_scheme(commitment, memo, private_key, registry, scheme)? {
            found.push(note);
        }
    }
    log::debug!("memo scan found {} notes", found.len());
    Ok(found)
}

struct Plaintext {
    salt: Field,
    token_id: u8,
    value: Field,
}

impl Plaintext {
    /// `None` if the value is not a field element, which a wrong key
    /// produces with overwhelming probability.
    fn parse(buf: &[u8; PLAINTEXT_LEN]) -> Option<Self> {
        let salt = Field::from_bytes_le(&buf[..SALT_LEN]).ok()?;
        let token_id = buf[SALT_LEN];
        let value = Field::from_bytes_le(&buf[SALT_LEN + TOKEN_ID_LEN..]).ok()?;
        Some(Self { salt, token_id, value })
    }
}

/// 16 random bytes as a scalar, the same width as a note salt.
fn draw_ephemeral_secret<R: RngCore + CryptoRng>(rng: &mut R) -> Zeroizing<Scalar> {
    let mut bytes = Zeroizing::new([0u8; RANDOM_BYTES]);
    rng.fill_bytes(&mut bytes[..]);
    Zeroizing::new(Scalar::from_be_bytes_mod_order(&bytes[..]))
}

fn apply_keystream(key: &[u8; 32], buf: &mut [u8]) {
    let mut cipher = ChaCha20::new(Key::from_slice(key), &Nonce::default());
    cipher.apply_keystream(buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    /// Same seed as `ark_std::test_rng`, but with a concrete `StdRng` type so
    /// the `CryptoRng` bound is visible to the compiler.
    fn test_rng() -> rand::rngs::StdRng {
        use rand::SeedableRng;
        rand::rngs::StdRng::from_seed([
            1, 0, 0, 0, 23, 0, 0, 0, 200, 1, 0, 0, 210, 30, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0,
        ])
    }

    use crate::error::FieldError;
    use crate::tokens::StaticTokenRegistry;

    const DAI: u64 = 0xda1;

    fn registry() -> StaticTokenRegistry {
        StaticTokenRegistry::new([Field::from_u64(DAI)]).unwrap()
    }

    fn keypair(seed: u8) -> (PrivateKey, Point) {
        let key = PrivateKey::from_bytes([seed; 32]);
        let pk = key.public_key();
        (key, pk)
    }

    #[test]
    fn test_memo_layout() {
        let (_, pk) = keypair(1);
        let note = Note::ether(Field::from_u64(1000), pk, None);

        let memo = encrypt_note_with_rng(&note, &registry(), &mut test_rng()).unwrap();

        assert_eq!(memo.as_bytes().len(), 81);
        assert!(Point::decode(memo.ephemeral_key()).is_ok());
        assert_eq!(memo.ciphertext().len(), 49);
    }

    #[test]
    fn test_encrypt_decrypt_ether_note() {
        let (sk, pk) = keypair(1);
        let note = Note::ether(Field::from_u64(1000), pk, Some(Field::from_u64(77)));

        let memo = encrypt_note(&note, &registry()).unwrap();
        let decrypted = decrypt_note(&note.commitment(), &memo, &sk, &registry())
            .unwrap()
            .expect("owner should open the memo");

        assert_eq!(decrypted, note);
    }

    #[test]
    fn test_encrypt_decrypt_token_notes() {
        let (sk, pk) = keypair(2);
        let notes = [
            Note::erc20(Field::from_u64(DAI), Field::from_u64(5000), pk, None).unwrap(),
            Note::nft(Field::from_u64(DAI), Field::from_u64(31337), pk, None).unwrap(),
        ];

        for note in notes {
            let memo = encrypt_note(&note, &registry()).unwrap();
            let decrypted = decrypt_note(&note.commitment(), &memo, &sk, &registry()).unwrap();
            assert_eq!(decrypted, Some(note));
        }
    }

    #[test]
    fn test_wrong_key_is_not_found() {
        let (_, pk) = keypair(1);
        let (wrong_sk, _) = keypair(2);
        let note = Note::ether(Field::from_u64(1000), pk, None);

        let memo = encrypt_note(&note, &registry()).unwrap();
        let result = decrypt_note(&note.commitment(), &memo, &wrong_sk, &registry()).unwrap();

        assert!(result.is_none(), "wrong key should not open the memo");
    }

    #[test]
    fn test_wrong_commitment_is_not_found() {
        let (sk, pk) = keypair(1);
        let note = Note::ether(Field::from_u64(1000), pk, None);
        let other = Note::ether(Field::from_u64(999), pk, None);

        let memo = encrypt_note(&note, &registry()).unwrap();
        let result = decrypt_note(&other.commitment(), &memo, &sk, &registry()).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_garbage_ephemeral_key_is_not_found() {
        let (sk, pk) = keypair(1);
        let note = Note::ether(Field::from_u64(1), pk, None);
        let memo = EncryptedMemo::from([0xffu8; MEMO_LEN]);

        assert!(decrypt_note(&note.commitment(), &memo, &sk, &registry()).unwrap().is_none());
    }

    #[test]
    fn test_unregistered_token_fails_to_encrypt() {
        let (_, pk) = keypair(1);
        let note = Note::erc20(Field::from_u64(0xbad), Field::from_u64(1), pk, None).unwrap();

        let err = encrypt_note(&note, &registry()).unwrap_err();
        assert!(matches!(err, NoteError::UnknownToken(_)));
    }

    #[test]
    fn test_oversized_salt_fails_to_encrypt() {
        let (_, pk) = keypair(1);
        let wide_salt: Field = "0x1000000000000000000000000000000000".parse().unwrap();
        let note = Note::ether(Field::from_u64(1), pk, Some(wide_salt));

        let mut rng = test_rng();
        let err = encrypt_note_with_rng(&note, &registry(), &mut rng).unwrap_err();

        assert!(matches!(err, NoteError::Field(FieldError::Encoding(16))));
        // no ephemeral secret was drawn, so no key material existed
        assert_eq!(rng.next_u64(), test_rng().next_u64());
    }

    #[test]
    fn test_fresh_ephemeral_key_per_encryption() {
        let (_, pk) = keypair(1);
        let note = Note::ether(Field::from_u64(1000), pk, None);

        let m1 = encrypt_note(&note, &registry()).unwrap();
        let m2 = encrypt_note(&note, &registry()).unwrap();

        assert_ne!(m1.ephemeral_key(), m2.ephemeral_key());
        assert_ne!(m1.ciphertext(), m2.ciphertext());
    }

    #[test]
    fn test_memo_length_checked() {
        let err = EncryptedMemo::try_from(&[0u8; 80][..]).unwrap_err();
        assert!(matches!(err, NoteError::MalformedMemo { expected: 81, got: 80 }));
    }

    #[test]
    fn test_memo_hex_serde() {
        let (_, pk) = keypair(1);
        let note = Note::ether(Field::from_u64(3), pk, None);
        let memo = encrypt_note(&note, &registry()).unwrap();

        let json = serde_json::to_string(&memo).unwrap();
        assert!(json.starts_with("\"0x"));
        assert_eq!(serde_json::from_str::<EncryptedMemo>(&json).unwrap(), memo);
    }

    #[test]
    fn test_scan_memos() {
        let (sk, pk) = keypair(1);
        let (_, other_pk) = keypair(2);

        let mine = Note::ether(Field::from_u64(10), pk, None);
        let theirs = Note::erc20(Field::from_u64(DAI), Field::from_u64(20), other_pk, None).unwrap();

        let outputs = [
            (mine.commitment(), encrypt_note(&mine, &registry()).unwrap()),
            (theirs.commitment(), encrypt_note(&theirs, &registry()).unwrap()),
        ];

        let found = scan_memos(outputs.iter().map(|(c, m)| (c, m)), &sk, &registry()).unwrap();
        assert_eq!(found, vec![mine]);
    }
}
