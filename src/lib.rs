//! Order intake and roster collection wizard
//!
//! Domain modules are free of terminal concerns; `wizard` holds the TUI.

pub mod cli;
pub mod config;
pub mod errors;
pub mod export;
pub mod intake;
pub mod models;
pub mod review;
pub mod roster;
pub mod wizard;
