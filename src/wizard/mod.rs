//! Order intake wizard terminal user interface
//!
//! Two screens, intake and roster editing, with the review dialog drawn
//! as a popup over the roster screen.

pub mod app;
pub mod components;
pub mod events;
pub mod screens;
pub mod ui;

pub use app::App;
