//! Baby Jubjub Points
//!
//! Thin wrapper over the twisted Edwards curve embedded in the BN254 scalar
//! field. Coordinates are therefore [`Field`] elements and can be fed straight
//! into the note commitment.

use std::fmt;

use ark_ec::{AffineRepr, CurveGroup};
use ark_ed_on_bn254::EdwardsAffine;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::NoteError;
use crate::field::Field;

/// Scalar field of the curve (private keys, ephemeral secrets).
pub use ark_ed_on_bn254::Fr as Scalar;

/// Length of a canonical compressed point encoding.
pub const POINT_BYTES: usize = 32;

/// A point in the prime-order subgroup of Baby Jubjub.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Point(EdwardsAffine);

impl Point {
    pub fn generator() -> Self {
        Self(EdwardsAffine::generator())
    }

    /// Build a point from affine coordinates, rejecting anything off the
    /// curve or outside the prime-order subgroup.
    pub fn from_coordinates(x: &Field, y: &Field) -> Result<Self, NoteError> {
        let point = EdwardsAffine::new_unchecked(x.to_fr(), y.to_fr());
        if !point.is_on_curve() {
            return Err(NoteError::InvalidPoint("not on curve".into()));
        }
        if !point.is_in_correct_subgroup_assuming_on_curve() {
            return Err(NoteError::InvalidPoint("not in prime-order subgroup".into()));
        }
        Ok(Self(point))
    }

    pub fn x(&self) -> Field {
        Field::from(self.0.x)
    }

    pub fn y(&self) -> Field {
        Field::from(self.0.y)
    }

    pub fn multiply(&self, scalar: &Scalar) -> Point {
        Self((self.0 * scalar).into_affine())
    }

    /// Canonical 32-byte compressed encoding.
    pub fn encode(&self) -> Result<[u8; POINT_BYTES], NoteError> {
        let mut bytes = [0u8; POINT_BYTES];
        self.0
            .serialize_compressed(&mut bytes[..])
            .map_err(|e| NoteError::InvalidPoint(e.to_string()))?;
        Ok(bytes)
    }

    /// Inverse of [`Point::encode`]; validates curve and subgroup membership.
    pub fn decode(bytes: &[u8]) -> Result<Self, NoteError> {
        EdwardsAffine::deserialize_compressed(bytes)
            .map(Self)
            .map_err(|e| NoteError::InvalidPoint(e.to_string()))
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Point")
            .field("x", &self.x())
            .field("y", &self.y())
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
struct PointJson {
    x: Field,
    y: Field,
}

impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PointJson {
            x: self.x(),
            y: self.y(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let PointJson { x, y } = PointJson::deserialize(deserializer)?;
        Point::from_coordinates(&x, &y).map_err(serde::de::Error::custom)
    }
}
