//! Reusable UI components for the wizard TUI

pub mod form_field;
pub mod review_dialog;
pub mod status_display;

pub use form_field::{FormField, FormFieldType};
pub use status_display::StatusDisplay;
