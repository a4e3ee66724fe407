// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Nav,
    EditCell,
    Filter,
    ConfirmReset,
}

/// The caller's answer to a reset confirmation prompt. Reset never fires
/// without an explicit `Confirmed`, which keeps the confirmation gate out of
/// the UI layer and testable headlessly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetDecision {
    Confirmed,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    StartEdit,
    OpenFilter,
    RequestReset,
    ResolveReset(ResetDecision),
    ExitToNav,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    ResetResolved(ResetDecision),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::StartEdit => self.switch_mode(AppMode::EditCell),
            AppCommand::OpenFilter => self.switch_mode(AppMode::Filter),
            AppCommand::RequestReset => self.switch_mode(AppMode::ConfirmReset),
            AppCommand::ResolveReset(decision) => {
                if self.mode != AppMode::ConfirmReset {
                    return Vec::new();
                }
                self.mode = AppMode::Nav;
                vec![
                    AppEvent::ResetResolved(decision),
                    AppEvent::ModeChanged(self.mode),
                ]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::SetStatus(message) => {
                self.status_line = Some(message.clone());
                vec![AppEvent::StatusUpdated(message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn switch_mode(&mut self, mode: AppMode) -> Vec<AppEvent> {
        self.mode = mode;
        vec![AppEvent::ModeChanged(self.mode)]
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppMode, AppState, ResetDecision};

    #[test]
    fn mode_transitions() {
        let mut state = AppState::default();

        state.dispatch(AppCommand::StartEdit);
        assert_eq!(state.mode, AppMode::EditCell);

        state.dispatch(AppCommand::ExitToNav);
        assert_eq!(state.mode, AppMode::Nav);

        state.dispatch(AppCommand::OpenFilter);
        assert_eq!(state.mode, AppMode::Filter);
    }

    #[test]
    fn reset_must_be_requested_before_it_can_be_resolved() {
        let mut state = AppState::default();

        let events = state.dispatch(AppCommand::ResolveReset(ResetDecision::Confirmed));
        assert!(events.is_empty());
        assert_eq!(state.mode, AppMode::Nav);

        state.dispatch(AppCommand::RequestReset);
        assert_eq!(state.mode, AppMode::ConfirmReset);

        let events = state.dispatch(AppCommand::ResolveReset(ResetDecision::Declined));
        assert_eq!(
            events,
            vec![
                AppEvent::ResetResolved(ResetDecision::Declined),
                AppEvent::ModeChanged(AppMode::Nav),
            ],
        );
    }

    #[test]
    fn status_updates_and_clears() {
        let mut state = AppState::default();

        let events = state.dispatch(AppCommand::SetStatus("loaded 3 books".to_owned()));
        assert_eq!(state.status_line.as_deref(), Some("loaded 3 books"));
        assert_eq!(
            events,
            vec![AppEvent::StatusUpdated("loaded 3 books".to_owned())],
        );

        let events = state.dispatch(AppCommand::ClearStatus);
        assert!(state.status_line.is_none());
        assert_eq!(events, vec![AppEvent::StatusCleared]);
    }
}
