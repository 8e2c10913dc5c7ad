//! SNARK Field Elements
//!
//! A [`Field`] is an integer in `[0, r)` where `r` is the BN254 scalar field
//! modulus. Construction is checked, and so is arithmetic:
//!
//! ```text
//! checked_add: a + b  -> Overflow  if the sum is not < r
//! checked_sub: a - b  -> Underflow if b > a
//! ```
//!
//! Nothing is reduced modulo `r`. The values model balances and identifiers,
//! so a wrap-around is always a bug the caller must see.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use ark_bn254::Fr;
use ark_ff::PrimeField;
use num_bigint::BigUint;
use num_traits::{Num, Zero};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FieldError;

/// Byte width of freshly drawn randomness (salts, ephemeral secrets).
pub const RANDOM_BYTES: usize = 16;

static MODULUS: LazyLock<BigUint> = LazyLock::new(|| Fr::MODULUS.into());

/// The modulus `r` every [`Field`] stays below.
pub fn modulus() -> &'static BigUint {
    &MODULUS
}

/// An element of the SNARK scalar field, kept as a plain unsigned integer.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Field(BigUint);

impl Field {
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Checked constructor. Fails if `value >= r`.
    pub fn new(value: BigUint) -> Result<Self, FieldError> {
        if value >= *MODULUS {
            return Err(FieldError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn from_u64(value: u64) -> Self {
        Self(BigUint::from(value))
    }

    /// Draw [`RANDOM_BYTES`] bytes of randomness. Always below `r`.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; RANDOM_BYTES];
        rng.fill_bytes(&mut bytes);
        Self(BigUint::from_bytes_be(&bytes))
    }

    /// Interpret `bytes` as a big-endian unsigned integer.
    pub fn from_bytes_be(bytes: &[u8]) -> Result<Self, FieldError> {
        Self::new(BigUint::from_bytes_be(bytes))
    }

    /// Interpret `bytes` as a little-endian unsigned integer.
    pub fn from_bytes_le(bytes: &[u8]) -> Result<Self, FieldError> {
        Self::new(BigUint::from_bytes_le(bytes))
    }

    /// Big-endian encoding.
    ///
    /// With `Some(len)` the output is left-padded to exactly `len` bytes and
    /// fails if the value has any bit set at or above `len * 8`. With `None`
    /// the minimal encoding is returned.
    pub fn to_bytes_be(&self, len: Option<usize>) -> Result<Vec<u8>, FieldError> {
        let raw = self.0.to_bytes_be();
        let Some(len) = len else {
            return Ok(raw);
        };
        self.check_width(len)?;

        let mut out = vec![0u8; len];
        if !self.0.is_zero() {
            out[len - raw.len()..].copy_from_slice(&raw);
        }
        Ok(out)
    }

    /// Little-endian encoding, right-padded to exactly `len` bytes.
    pub fn to_bytes_le(&self, len: usize) -> Result<Vec<u8>, FieldError> {
        self.check_width(len)?;

        let mut out = vec![0u8; len];
        if !self.0.is_zero() {
            let raw = self.0.to_bytes_le();
            out[..raw.len()].copy_from_slice(&raw);
        }
        Ok(out)
    }

    fn check_width(&self, len: usize) -> Result<(), FieldError> {
        if self.0.bits() > (len as u64) * 8 {
            return Err(FieldError::Encoding(len));
        }
        Ok(())
    }

    /// `0x`-prefixed minimal lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{:x}", self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Checked addition, no modular reduction.
    pub fn checked_add(&self, rhs: &Field) -> Result<Field, FieldError> {
        let sum = &self.0 + &rhs.0;
        if sum >= *MODULUS {
            return Err(FieldError::Overflow);
        }
        Ok(Self(sum))
    }

    /// Checked subtraction, no modular reduction.
    pub fn checked_sub(&self, rhs: &Field) -> Result<Field, FieldError> {
        if rhs.0 > self.0 {
            return Err(FieldError::Underflow);
        }
        Ok(Self(&self.0 - &rhs.0))
    }

    /// `None` compares as smaller than every value.
    pub fn greater_than(&self, rhs: Option<&Field>) -> bool {
        match rhs {
            Some(rhs) => self.0 > rhs.0,
            None => true,
        }
    }

    pub fn gte(&self, rhs: &Field) -> bool {
        self.0 >= rhs.0
    }

    /// Raw integer right shift. Not a field operation.
    pub fn shr(&self, bits: usize) -> Field {
        Self(&self.0 >> bits)
    }

    /// Exact conversion into the arkworks field type.
    pub fn to_fr(&self) -> Fr {
        Fr::from(self.0.clone())
    }
}

impl From<Fr> for Field {
    fn from(value: Fr) -> Self {
        // canonical representatives are always < r
        Self(value.into())
    }
}

impl From<u64> for Field {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl TryFrom<BigUint> for Field {
    type Error = FieldError;

    fn try_from(value: BigUint) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Accepts `0x`-prefixed hex or plain decimal.
impl FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => BigUint::from_str_radix(hex, 16),
            None => BigUint::from_str_radix(s, 10),
        };
        let value = parsed.map_err(|_| FieldError::Parse(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field({})", self.to_hex())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
