//! Screen modules for the wizard TUI

pub mod intake;
pub mod roster;

// Re-export all screens
pub use intake::IntakeScreen;
pub use roster::RosterScreen;
