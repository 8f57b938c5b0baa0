//! Wizard error types

use thiserror::Error;

use crate::models::{RowField, RowShape};

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("É necessário preencher pelo menos {required} nomes antes de finalizar o formulário.")]
    NotEnoughFilledRows { filled: usize, required: usize },

    #[error("Você precisa aceitar a declaração antes de prosseguir.")]
    ConsentRequired,

    #[error("Cannot {action} while the review is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("Row {index} does not exist (roster has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    #[error("Field '{}' is not part of {shape:?} rows", .field.label())]
    FieldNotInShape { field: RowField, shape: RowShape },

    #[error("Finalize timer stopped before completing")]
    TimerCancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("PDF generation failed: {0}")]
    Pdf(#[from] lopdf::Error),
}

pub type Result<T> = std::result::Result<T, WizardError>;
