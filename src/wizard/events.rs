//! Events raised by screens for the application to act on

use crate::models::{Handoff, OrderMetadata};

/// Application events that can be triggered from the screens
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Nothing for the application to do
    None,
    /// Intake form submitted successfully
    IntakeSubmitted(OrderMetadata),
    /// Roster editor asked to go back, carrying its work
    NavigateBack(Handoff),
    /// Session finished; start over with an empty intake form
    SessionFinished,
    /// Blocking alert that must be acknowledged
    Alert(String),
    /// Show status message
    ShowStatus(String),
    /// Show success message
    ShowSuccess(String),
    /// Show error message
    ShowError(String),
}
