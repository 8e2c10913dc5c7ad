use zkor_privacy::{ExitAnnotation, Field, Note, OutflowType, PrivateKey};

fn owner() -> PrivateKey {
    PrivateKey::from_bytes([21u8; 32])
}

fn token() -> Field {
    "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".parse().unwrap()
}

#[test]
fn every_note_kind_roundtrips_through_json() {
    let pk = owner().public_key();
    let notes = [
        Note::ether(Field::from_u64(10), pk, None),
        Note::erc20(token(), Field::from_u64(20), pk, None).unwrap(),
        Note::nft(token(), Field::from_u64(30), pk, None).unwrap(),
    ];

    for note in notes {
        let json = note.to_json().unwrap();
        let parsed = Note::from_json(&json).unwrap();
        assert_eq!(parsed, note);
        assert_eq!(parsed.commitment(), note.commitment());
    }
}

#[test]
fn exit_annotation_survives_json() {
    let note = Note::ether(Field::from_u64(10), owner().public_key(), None)
        .with_migration(Field::from_u64(0x99), Field::from_u64(1));

    let parsed = Note::from_json(&note.to_json().unwrap()).unwrap();

    assert_eq!(
        parsed.exit(),
        &ExitAnnotation::Migration {
            to: Field::from_u64(0x99),
            fee: Field::from_u64(1),
        }
    );
    assert_eq!(parsed.to_outflow().outflow_type, OutflowType::Migration);
}

#[test]
fn out_of_range_field_is_rejected() {
    let note = Note::ether(Field::from_u64(10), owner().public_key(), None);
    let mut value: serde_json::Value = serde_json::from_str(&note.to_json().unwrap()).unwrap();

    // BN254 scalar field modulus
    value["eth"] =
        "0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001".into();

    assert!(Note::from_json(&value.to_string()).is_err());
}

#[test]
fn malformed_json_is_an_error() {
    assert!(Note::from_json("{\"eth\": \"0x1\"").is_err());
    assert!(Note::from_json("{}").is_err());
}
