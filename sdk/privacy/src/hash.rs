//! Fixed-arity field hashing.
//!
//! Commitments and nullifiers only see the [`FieldHasher`] trait. The default
//! permutation is Poseidon over BN254 Fr with 8 full and 57 partial rounds;
//! the same family is instantiated at arity 4 (commitments) and arity 2
//! (nullifiers).

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::{
    CryptographicSponge,
    poseidon::{PoseidonConfig, PoseidonSponge, find_poseidon_ark_and_mds},
};

use crate::field::Field;

/// A hash taking exactly `N` field elements to one.
pub trait FieldHasher<const N: usize> {
    fn hash(&self, inputs: [&Field; N]) -> Field;
}

/// Poseidon instantiated at arity 2 and arity 4.
#[derive(Debug, Clone)]
pub struct PoseidonHasher {
    arity2: PoseidonConfig<Fr>,
    arity4: PoseidonConfig<Fr>,
}

impl PoseidonHasher {
    pub fn new() -> Self {
        Self {
            arity2: poseidon_config(2),
            arity4: poseidon_config(4),
        }
    }
}

impl Default for PoseidonHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn sponge_hash(config: &PoseidonConfig<Fr>, inputs: &[&Field]) -> Field {
    let mut sponge = PoseidonSponge::new(config);
    for input in inputs {
        sponge.absorb(&input.to_fr());
    }
    let result: Fr = sponge.squeeze_field_elements(1)[0];
    Field::from(result)
}

impl FieldHasher<2> for PoseidonHasher {
    fn hash(&self, inputs: [&Field; 2]) -> Field {
        sponge_hash(&self.arity2, &inputs)
    }
}

impl FieldHasher<4> for PoseidonHasher {
    fn hash(&self, inputs: [&Field; 4]) -> Field {
        sponge_hash(&self.arity4, &inputs)
    }
}

/// Poseidon configuration for the note layer
///
/// Field: BN254 Fr (254 bits)
/// Rate: arity, Capacity: 1
/// Rounds: 8 full, 57 partial
fn poseidon_config(rate: usize) -> PoseidonConfig<Fr> {
    let prime_bits: u64 = 254;
    let capacity: usize = 1;
    let full_rounds: u64 = 8;
    let partial_rounds: u64 = 57;
    let alpha: u64 = 5;
    let skip_matrices: u64 = 0;

    let (ark, mds) = find_poseidon_ark_and_mds::<Fr>(
        prime_bits,
        rate,
        full_rounds,
        partial_rounds,
        skip_matrices,
    );

    PoseidonConfig::new(
        full_rounds as usize,
        partial_rounds as usize,
        alpha,
        mds,
        ark,
        rate,
        capacity,
    )
}
