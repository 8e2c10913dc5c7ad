//! Outflows
//!
//! The public projection of a note placed in a transaction body.
//!
//! ```text
//! Outflow = {
//!     note:        Field,            // commitment
//!     outflowType: 0 | 1 | 2,        // transfer, withdrawal, migration
//!     data?:       PublicData,       // only for exiting notes
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::field::Field;
use crate::note::{ExitAnnotation, Note};

/// Outflow type tag, serialized as its field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Field", try_from = "Field")]
pub enum OutflowType {
    Transfer = 0,
    Withdrawal = 1,
    Migration = 2,
}

impl OutflowType {
    pub fn as_field(&self) -> Field {
        Field::from_u64(*self as u64)
    }
}

impl From<OutflowType> for Field {
    fn from(value: OutflowType) -> Self {
        value.as_field()
    }
}

impl TryFrom<Field> for OutflowType {
    type Error = FieldError;

    fn try_from(value: Field) -> Result<Self, Self::Error> {
        [OutflowType::Transfer, OutflowType::Withdrawal, OutflowType::Migration]
            .into_iter()
            .find(|t| t.as_field() == value)
            .ok_or_else(|| FieldError::Parse(format!("outflow type {}", value.to_hex())))
    }
}

/// Fields revealed for an exiting note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicData {
    pub to: Field,
    pub eth: Field,
    pub token: Field,
    pub amount: Field,
    pub nft: Field,
    pub fee: Field,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outflow {
    pub note: Field,
    pub outflow_type: OutflowType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PublicData>,
}

impl Note {
    pub fn outflow_type(&self) -> OutflowType {
        match self.exit() {
            ExitAnnotation::Transfer => OutflowType::Transfer,
            ExitAnnotation::Withdrawal { .. } => OutflowType::Withdrawal,
            ExitAnnotation::Migration { .. } => OutflowType::Migration,
        }
    }

    pub fn to_outflow(&self) -> Outflow {
        let data = match self.exit() {
            ExitAnnotation::Transfer => None,
            ExitAnnotation::Withdrawal { to, fee } | ExitAnnotation::Migration { to, fee } => {
                Some(PublicData {
                    to: to.clone(),
                    eth: self.eth().clone(),
                    token: self.token().clone(),
                    amount: self.amount().clone(),
                    nft: self.nft_id().clone(),
                    fee: fee.clone(),
                })
            }
        };

        Outflow {
            note: self.commitment().into_field(),
            outflow_type: self.outflow_type(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::PrivateKey;

    fn note() -> Note {
        let owner = PrivateKey::from_bytes([4u8; 32]).public_key();
        Note::erc20(Field::from_u64(0xda1), Field::from_u64(500), owner, None).unwrap()
    }

    #[test]
    fn test_transfer_outflow() {
        let note = note();
        let outflow = note.to_outflow();

        assert_eq!(outflow.note, note.commitment().into_field());
        assert_eq!(outflow.outflow_type, OutflowType::Transfer);
        assert_eq!(outflow.outflow_type.as_field(), Field::zero());
        assert!(outflow.data.is_none());
    }

    #[test]
    fn test_withdrawal_outflow() {
        let note = note().with_withdrawal(Field::from_u64(0xbeef), Field::from_u64(3));
        let outflow = note.to_outflow();

        assert_eq!(outflow.outflow_type.as_field(), Field::from_u64(1));
        assert_eq!(
            outflow.data,
            Some(PublicData {
                to: Field::from_u64(0xbeef),
                eth: Field::zero(),
                token: Field::from_u64(0xda1),
                amount: Field::from_u64(500),
                nft: Field::zero(),
                fee: Field::from_u64(3),
            })
        );
    }

    #[test]
    fn test_migration_outflow() {
        let outflow = note()
            .with_migration(Field::from_u64(0xcafe), Field::from_u64(1))
            .to_outflow();

        assert_eq!(outflow.outflow_type, OutflowType::Migration);
        assert_eq!(outflow.outflow_type.as_field(), Field::from_u64(2));
        assert_eq!(outflow.data.map(|d| d.to), Some(Field::from_u64(0xcafe)));
    }

    #[test]
    fn test_outflow_json() {
        let outflow = note().to_outflow();
        let value = serde_json::to_value(&outflow).unwrap();

        assert_eq!(value["outflowType"], "0x0");
        assert!(value.get("data").is_none());
        assert_eq!(serde_json::from_value::<Outflow>(value).unwrap(), outflow);
    }

    #[test]
    fn test_unknown_outflow_type_rejected() {
        assert!(OutflowType::try_from(Field::from_u64(3)).is_err());
    }
}
