//! Explicit view-state values shared with UI layers.
//!
//! The original app kept theme and current-side as ambient UI globals. Core
//! models them as plain copyable values that callers pass around explicitly;
//! they carry no data-model meaning and never touch persistence.

use crate::model::record::Outcome;
use serde::{Deserialize, Serialize};

/// Presentation theme selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// UI state for the flip screen: theme plus the side currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipViewState {
    pub theme: ThemeMode,
    pub current_side: Outcome,
}

impl Default for FlipViewState {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Light,
            current_side: Outcome::Heads,
        }
    }
}

impl FlipViewState {
    /// Returns the same state with the theme switched.
    pub fn with_toggled_theme(self) -> Self {
        Self {
            theme: self.theme.toggled(),
            ..self
        }
    }

    /// Returns the same state showing the given side.
    pub fn showing(self, side: Outcome) -> Self {
        Self {
            current_side: side,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FlipViewState, ThemeMode};
    use crate::model::record::Outcome;

    #[test]
    fn default_state_is_light_heads() {
        let state = FlipViewState::default();
        assert_eq!(state.theme, ThemeMode::Light);
        assert_eq!(state.current_side, Outcome::Heads);
    }

    #[test]
    fn theme_toggle_is_an_involution() {
        let state = FlipViewState::default();
        let toggled = state.with_toggled_theme();
        assert_eq!(toggled.theme, ThemeMode::Dark);
        assert_eq!(toggled.current_side, state.current_side);
        assert_eq!(toggled.with_toggled_theme(), state);
    }

    #[test]
    fn showing_replaces_only_current_side() {
        let state = FlipViewState::default().with_toggled_theme();
        let shown = state.showing(Outcome::Tails);
        assert_eq!(shown.current_side, Outcome::Tails);
        assert_eq!(shown.theme, ThemeMode::Dark);
    }
}
