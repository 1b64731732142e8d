use coinflipr_core::{FlipRecord, FlipViewState, Outcome, RecordValidationError, ThemeMode};
use uuid::Uuid;

#[test]
fn record_serialization_uses_expected_wire_fields() {
    let record_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let record = FlipRecord::with_id(record_id, Outcome::Tails, 1_700_000_000_000).unwrap();

    let json = serde_json::to_value(record).unwrap();
    assert_eq!(json["uuid"], record_id.to_string());
    assert_eq!(json["result"], "tails");
    assert_eq!(json["flipped_at_ms"], 1_700_000_000_000_i64);

    let decoded: FlipRecord = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn with_id_rejects_nil_uuid_and_negative_timestamp() {
    let nil = FlipRecord::with_id(Uuid::nil(), Outcome::Heads, 0).unwrap_err();
    assert_eq!(nil, RecordValidationError::NilUuid);

    let negative = FlipRecord::with_id(Uuid::new_v4(), Outcome::Heads, -1).unwrap_err();
    assert_eq!(negative, RecordValidationError::NegativeTimestamp(-1));
}

#[test]
fn view_state_serializes_with_snake_case_labels() {
    let state = FlipViewState::default().with_toggled_theme().showing(Outcome::Tails);

    let json = serde_json::to_value(state).unwrap();
    assert_eq!(json["theme"], "dark");
    assert_eq!(json["current_side"], "tails");

    let decoded: FlipViewState = serde_json::from_value(json).unwrap();
    assert_eq!(decoded.theme, ThemeMode::Dark);
    assert_eq!(decoded.current_side, Outcome::Tails);
}
