//! Flip record domain model.
//!
//! # Responsibility
//! - Define the canonical outcome enum and the persisted flip record.
//! - Keep identity semantics explicit: two records with the same result and
//!   timestamp are still distinct records.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another record.
//! - Records are immutable after creation; the only lifecycle transitions are
//!   create and hard delete.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a single flip record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type RecordId = Uuid;

/// The two possible results of one coin flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Heads,
    Tails,
}

impl Outcome {
    /// Stable lowercase label used for storage and wire formats.
    pub fn label(self) -> &'static str {
        match self {
            Self::Heads => "heads",
            Self::Tails => "tails",
        }
    }

    /// Parses a stored label back into an outcome.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "heads" => Some(Self::Heads),
            "tails" => Some(Self::Tails),
            _ => None,
        }
    }

    /// Returns the opposite side of the coin.
    pub fn flipped(self) -> Self {
        match self {
            Self::Heads => Self::Tails,
            Self::Tails => Self::Heads,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation failures for record construction and persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    /// The nil UUID cannot serve as a record identity.
    NilUuid,
    /// Flip timestamps are epoch milliseconds and must not be negative.
    NegativeTimestamp(i64),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "record uuid must not be nil"),
            Self::NegativeTimestamp(value) => {
                write!(f, "flipped_at_ms ({value}) must not be negative")
            }
        }
    }
}

impl Error for RecordValidationError {}

/// One completed coin flip: an immutable `(timestamp, result)` pair with a
/// stable identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipRecord {
    /// Stable global ID used for deletion by identity.
    pub uuid: RecordId,
    /// Which side the coin landed on.
    pub result: Outcome,
    /// Flip completion time in Unix epoch milliseconds.
    pub flipped_at_ms: i64,
}

impl FlipRecord {
    /// Creates a record for a flip that completed now.
    pub fn new(result: Outcome) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            result,
            flipped_at_ms: epoch_now_ms(),
        }
    }

    /// Creates a record with caller-provided identity and timestamp.
    ///
    /// Used by import/test paths where both already exist externally.
    pub fn with_id(
        uuid: RecordId,
        result: Outcome,
        flipped_at_ms: i64,
    ) -> Result<Self, RecordValidationError> {
        let record = Self {
            uuid,
            result,
            flipped_at_ms,
        };
        record.validate()?;
        Ok(record)
    }

    /// Checks structural invariants of this record.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.uuid.is_nil() {
            return Err(RecordValidationError::NilUuid);
        }
        if self.flipped_at_ms < 0 {
            return Err(RecordValidationError::NegativeTimestamp(self.flipped_at_ms));
        }
        Ok(())
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// A clock set before the epoch collapses to 0 rather than producing a
/// negative timestamp.
pub fn epoch_now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{epoch_now_ms, FlipRecord, Outcome, RecordValidationError};
    use uuid::Uuid;

    #[test]
    fn labels_roundtrip() {
        assert_eq!(Outcome::parse(Outcome::Heads.label()), Some(Outcome::Heads));
        assert_eq!(Outcome::parse(Outcome::Tails.label()), Some(Outcome::Tails));
        assert_eq!(Outcome::parse("edge"), None);
    }

    #[test]
    fn flipped_returns_opposite_side() {
        assert_eq!(Outcome::Heads.flipped(), Outcome::Tails);
        assert_eq!(Outcome::Tails.flipped(), Outcome::Heads);
    }

    #[test]
    fn new_record_has_identity_and_recent_timestamp() {
        let before = epoch_now_ms();
        let record = FlipRecord::new(Outcome::Heads);
        let after = epoch_now_ms();

        assert!(!record.uuid.is_nil());
        assert_eq!(record.result, Outcome::Heads);
        assert!(record.flipped_at_ms >= before && record.flipped_at_ms <= after);
        record.validate().unwrap();
    }

    #[test]
    fn records_with_equal_fields_keep_distinct_identity() {
        let a = FlipRecord::new(Outcome::Tails);
        let b = FlipRecord::new(Outcome::Tails);
        assert_ne!(a.uuid, b.uuid);
    }

    #[test]
    fn with_id_rejects_nil_uuid() {
        let err = FlipRecord::with_id(Uuid::nil(), Outcome::Heads, 0).unwrap_err();
        assert_eq!(err, RecordValidationError::NilUuid);
    }

    #[test]
    fn with_id_rejects_negative_timestamp() {
        let err = FlipRecord::with_id(Uuid::new_v4(), Outcome::Tails, -5).unwrap_err();
        assert_eq!(err, RecordValidationError::NegativeTimestamp(-5));
    }
}
