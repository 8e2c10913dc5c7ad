//! Owner keys.
//!
//! The private key doubles as the viewing key: whoever holds it can
//! trial-decrypt memos addressed to the matching public key.

use std::fmt;

use ark_ff::PrimeField;
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::curve::{Point, Scalar};

const SCALAR_DERIVATION_CONTEXT: &str = "zkor-babyjubjub-scalar-v1";

/// 32 secret bytes. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut key = [0u8; 32];
        rng.fill_bytes(&mut key);
        Self(key)
    }

    pub fn from_bytes(key: [u8; 32]) -> Self {
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Curve multiplier for this key.
    ///
    /// 64 bytes of domain-separated blake3 output reduced mod the subgroup
    /// order, so the result is uniform.
    pub fn scalar(&self) -> Scalar {
        let mut hasher = blake3::Hasher::new_derive_key(SCALAR_DERIVATION_CONTEXT);
        hasher.update(&self.0);

        let mut wide = [0u8; 64];
        hasher.finalize_xof().fill(&mut wide);
        let scalar = Scalar::from_le_bytes_mod_order(&wide);
        wide.zeroize();
        scalar
    }

    pub fn public_key(&self) -> Point {
        Point::generator().multiply(&self.scalar())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
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

    #[test]
    fn test_public_key_deterministic() {
        let key = PrivateKey::from_bytes([7u8; 32]);
        let restored = PrivateKey::from_bytes(*key.as_bytes());

        assert_eq!(key.public_key(), restored.public_key());
    }

    #[test]
    fn test_distinct_keys() {
        let mut rng = test_rng();
        let a = PrivateKey::random(&mut rng);
        let b = PrivateKey::random(&mut rng);

        assert_ne!(a.public_key(), b.public_key());
    }

    #[test]
    fn test_debug_redacts() {
        let key = PrivateKey::from_bytes([9u8; 32]);
        assert_eq!(format!("{key:?}"), "PrivateKey(..)");
    }
}
