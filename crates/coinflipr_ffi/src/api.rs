//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for the UI: envelopes, not exceptions.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The UI owns the flip animation window; `flip_coin` commits in one shot
//!   and the button stays disabled on the Dart side during the delay.

use coinflipr_core::db::open_db;
use coinflipr_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    FlipRecord, FlipService, FlipViewState, HistoryService, Outcome, SqliteHistoryRepository,
    ThemeMode,
};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const HISTORY_DB_FILE_NAME: &str = "coinflipr.sqlite3";
static HISTORY_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`; reconfiguration attempts
///   return an error message.
/// - Never panics; returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One flip record in wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipItem {
    /// Stable record ID in string form.
    pub record_id: String,
    /// Outcome label (`heads|tails`).
    pub result: String,
    /// Flip completion time in epoch milliseconds.
    pub flipped_at_ms: i64,
}

impl From<FlipRecord> for FlipItem {
    fn from(record: FlipRecord) -> Self {
        Self {
            record_id: record.uuid.to_string(),
            result: record.result.label().to_string(),
            flipped_at_ms: record.flipped_at_ms,
        }
    }
}

/// Response envelope for the flip action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipResponse {
    /// Whether the flip was committed.
    pub ok: bool,
    /// The committed record on success.
    pub item: Option<FlipItem>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Response envelope for history reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryListResponse {
    /// All records, most recent first (empty on failure).
    pub items: Vec<FlipItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Response envelope for history mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryActionResponse {
    /// Whether the operation succeeded (no-op deletes still succeed).
    pub ok: bool,
    /// Number of records actually removed.
    pub removed: u32,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl HistoryActionResponse {
    fn success(removed: usize) -> Self {
        Self {
            ok: true,
            removed: removed as u32,
            message: format!("Removed {removed} record(s)."),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            removed: 0,
            message: message.into(),
        }
    }
}

/// Flips the coin and commits the outcome to history.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the committed record so the UI can settle the shown side.
#[flutter_rust_bridge::frb(sync)]
pub fn flip_coin() -> FlipResponse {
    let committed = with_history(|service| {
        let mut engine = FlipService::new(service);
        match engine.flip(&mut rand::thread_rng()) {
            Some(result) => result,
            // Unreachable for a freshly built engine, but never panic here.
            None => Err(coinflipr_core::RepoError::InvalidData(
                "flip already in flight".to_string(),
            )),
        }
    });

    match committed {
        Ok(record) => FlipResponse {
            ok: true,
            item: Some(record.into()),
            message: format!("Landed on {}.", record.result),
        },
        Err(err) => {
            log::warn!("event=ffi_flip module=ffi status=error error={err}");
            FlipResponse {
                ok: false,
                item: None,
                message: format!("flip_coin failed: {err}"),
            }
        }
    }
}

/// Lists all flips, most recent first.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; failures return an empty list plus a message.
#[flutter_rust_bridge::frb(sync)]
pub fn history_list() -> HistoryListResponse {
    match with_history(|service| service.list()) {
        Ok(records) => {
            let items: Vec<FlipItem> = records.into_iter().map(FlipItem::from).collect();
            let message = if items.is_empty() {
                "No flips yet.".to_string()
            } else {
                format!("{} flip(s).", items.len())
            };
            HistoryListResponse { items, message }
        }
        Err(err) => HistoryListResponse {
            items: Vec::new(),
            message: format!("history_list failed: {err}"),
        },
    }
}

/// Deletes one record by identity (swipe-to-delete).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Deleting an absent record succeeds with `removed = 0`.
#[flutter_rust_bridge::frb(sync)]
pub fn history_delete(record_id: String) -> HistoryActionResponse {
    let id = match Uuid::parse_str(record_id.trim()) {
        Ok(id) => id,
        Err(_) => return HistoryActionResponse::failure(format!("invalid record id: {record_id}")),
    };

    match with_history(|service| service.delete(id)) {
        Ok(removed) => HistoryActionResponse::success(usize::from(removed)),
        Err(err) => HistoryActionResponse::failure(format!("history_delete failed: {err}")),
    }
}

/// Deletes records by position in the current sorted view (edit-mode multi
/// select).
///
/// # FFI contract
/// - Positions are resolved against one snapshot; out-of-range entries are
///   ignored.
#[flutter_rust_bridge::frb(sync)]
pub fn history_delete_at(positions: Vec<u32>) -> HistoryActionResponse {
    let positions: BTreeSet<usize> = positions.into_iter().map(|value| value as usize).collect();

    match with_history(|service| service.delete_at(&positions)) {
        Ok(removed) => HistoryActionResponse::success(removed.len()),
        Err(err) => HistoryActionResponse::failure(format!("history_delete_at failed: {err}")),
    }
}

/// Deletes the entire history.
#[flutter_rust_bridge::frb(sync)]
pub fn history_clear() -> HistoryActionResponse {
    match with_history(|service| service.clear()) {
        Ok(removed) => HistoryActionResponse::success(removed.len()),
        Err(err) => HistoryActionResponse::failure(format!("history_clear failed: {err}")),
    }
}

/// View state passed explicitly between Dart screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Dark theme enabled.
    pub dark_mode: bool,
    /// Side currently shown on the flip screen (`heads|tails`).
    pub current_side: String,
}

impl From<FlipViewState> for ViewState {
    fn from(state: FlipViewState) -> Self {
        Self {
            dark_mode: state.theme == ThemeMode::Dark,
            current_side: state.current_side.label().to_string(),
        }
    }
}

impl ViewState {
    fn to_core(&self) -> FlipViewState {
        FlipViewState {
            theme: if self.dark_mode {
                ThemeMode::Dark
            } else {
                ThemeMode::Light
            },
            // Unknown labels fall back to the default side.
            current_side: Outcome::parse(&self.current_side).unwrap_or(Outcome::Heads),
        }
    }
}

/// Initial view state for a fresh UI session: light theme, heads up.
#[flutter_rust_bridge::frb(sync)]
pub fn default_view_state() -> ViewState {
    FlipViewState::default().into()
}

/// Switches the theme, leaving the shown side untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_theme(state: ViewState) -> ViewState {
    state.to_core().with_toggled_theme().into()
}

fn resolve_history_db_path() -> PathBuf {
    HISTORY_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("COINFLIPR_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(HISTORY_DB_FILE_NAME)
        })
        .clone()
}

fn with_history<T>(
    f: impl FnOnce(
        HistoryService<SqliteHistoryRepository<'_>>,
    ) -> coinflipr_core::RepoResult<T>,
) -> Result<T, String> {
    let db_path = resolve_history_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("history DB open failed: {err}"))?;
    let repo = SqliteHistoryRepository::try_new(&conn)
        .map_err(|err| format!("history repo init failed: {err}"))?;
    f(HistoryService::new(repo)).map_err(|err| err.to_string())
}
