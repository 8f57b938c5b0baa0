//! Intake form validation
//!
//! Fields are validated individually when focus leaves them and all
//! together on submit. A successful submit yields the immutable
//! [`OrderMetadata`] handed to the roster editor.

use std::collections::BTreeMap;
use std::fmt;

use validator::{Validate, ValidationErrors};

use crate::models::{IntakeValues, OrderMetadata};

const ORDER_REQUIRED: &str = "Precisamos do número do pedido";
const LAYOUT_REQUIRED: &str = "Precisamos do número do layout";
const NAME_REQUIRED: &str = "Precisamos do nome de um responsável";
const NOT_NUMERIC: &str = "O número deve conter apenas dígitos";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntakeField {
    OrderNumber,
    LayoutNumber,
    CustomerName,
    CustomerEmail,
    HasNumbering,
}

impl IntakeField {
    pub const ALL: [IntakeField; 5] = [
        IntakeField::OrderNumber,
        IntakeField::LayoutNumber,
        IntakeField::CustomerName,
        IntakeField::CustomerEmail,
        IntakeField::HasNumbering,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IntakeField::OrderNumber => "Número do pedido",
            IntakeField::LayoutNumber => "Número do layout",
            IntakeField::CustomerName => "Cliente responsável",
            IntakeField::CustomerEmail => "E-mail (opcional)",
            IntakeField::HasNumbering => "Numeração",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            IntakeField::OrderNumber => "Ex.: 1092-09",
            IntakeField::LayoutNumber => "Ex.: 09909.987",
            IntakeField::CustomerName => "Ex.: Antônio Miranda",
            IntakeField::CustomerEmail => "Ex.: antonio@exemplo.com",
            IntakeField::HasNumbering => "",
        }
    }
}

#[derive(Debug, Validate)]
struct TextRules {
    #[validate(length(min = 2, message = "Escreva um nome com mais de duas letras."))]
    customer_name: String,
    #[validate(email(message = "Informe um e-mail válido."))]
    customer_email: Option<String>,
}

impl TextRules {
    fn from_values(values: &IntakeValues) -> Self {
        let email = values.customer_email.trim();
        Self {
            customer_name: values.customer_name.trim().to_string(),
            customer_email: (!email.is_empty()).then(|| email.to_string()),
        }
    }
}

/// Validation messages keyed by field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<IntakeField, String>);

impl FieldErrors {
    pub fn get(&self, field: IntakeField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IntakeField, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Validate a single field, as done when focus leaves it
pub fn validate_field(values: &IntakeValues, field: IntakeField) -> Option<String> {
    match field {
        IntakeField::OrderNumber => check_identifier(&values.order_number, ORDER_REQUIRED),
        IntakeField::LayoutNumber => check_identifier(&values.layout_number, LAYOUT_REQUIRED),
        IntakeField::CustomerName => {
            if values.customer_name.trim().is_empty() {
                return Some(NAME_REQUIRED.to_string());
            }
            rule_error(&TextRules::from_values(values).validate(), "customer_name")
        }
        IntakeField::CustomerEmail => {
            rule_error(&TextRules::from_values(values).validate(), "customer_email")
        }
        IntakeField::HasNumbering => None,
    }
}

/// Validate every field and build the order metadata
pub fn validate(values: &IntakeValues) -> Result<OrderMetadata, FieldErrors> {
    let errors: BTreeMap<IntakeField, String> = IntakeField::ALL
        .iter()
        .filter_map(|field| validate_field(values, *field).map(|msg| (*field, msg)))
        .collect();

    if !errors.is_empty() {
        return Err(FieldErrors(errors));
    }

    let email = values.customer_email.trim();
    Ok(OrderMetadata {
        order_number: values.order_number.trim().to_string(),
        layout_number: values.layout_number.trim().to_string(),
        customer_name: values.customer_name.trim().to_string(),
        has_numbering: values.has_numbering,
        customer_email: (!email.is_empty()).then(|| email.to_string()),
    })
}

fn check_identifier(value: &str, required: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        Some(required.to_string())
    } else if !is_numeric_identifier(value) {
        Some(NOT_NUMERIC.to_string())
    } else {
        None
    }
}

/// Digits, optionally grouped with `.` or `-` (e.g. `1092-09`, `09909.987`)
pub fn is_numeric_identifier(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == '-')
}

fn rule_error(result: &Result<(), ValidationErrors>, name: &str) -> Option<String> {
    let errors = result.as_ref().err()?;
    let field_errors = errors.field_errors();
    let first = field_errors.get(name)?.first()?;
    Some(
        first
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| first.code.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> IntakeValues {
        IntakeValues {
            order_number: "1092-09".to_string(),
            layout_number: "09909.987".to_string(),
            customer_name: "Antônio Miranda".to_string(),
            has_numbering: true,
            customer_email: String::new(),
        }
    }

    #[test]
    fn test_valid_values_build_metadata() {
        let metadata = validate(&values()).unwrap();
        assert_eq!(metadata.order_number, "1092-09");
        assert_eq!(metadata.layout_number, "09909.987");
        assert!(metadata.has_numbering);
        assert_eq!(metadata.customer_email, None);
    }

    #[test]
    fn test_required_fields() {
        let errors = validate(&IntakeValues::default()).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(IntakeField::OrderNumber), Some(ORDER_REQUIRED));
        assert_eq!(errors.get(IntakeField::LayoutNumber), Some(LAYOUT_REQUIRED));
        assert_eq!(errors.get(IntakeField::CustomerName), Some(NAME_REQUIRED));
        assert_eq!(errors.get(IntakeField::CustomerEmail), None);
    }

    #[test]
    fn test_identifiers_must_be_numeric() {
        let mut values = values();
        values.order_number = "abc".to_string();
        assert_eq!(
            validate_field(&values, IntakeField::OrderNumber).as_deref(),
            Some(NOT_NUMERIC)
        );
        values.order_number = "--".to_string();
        assert!(validate_field(&values, IntakeField::OrderNumber).is_some());
        values.order_number = " 42 ".to_string();
        assert!(validate_field(&values, IntakeField::OrderNumber).is_none());
    }

    #[test]
    fn test_customer_name_length() {
        let mut values = values();
        values.customer_name = "A".to_string();
        assert_eq!(
            validate_field(&values, IntakeField::CustomerName).as_deref(),
            Some("Escreva um nome com mais de duas letras.")
        );
        values.customer_name = "Jô".to_string();
        assert!(validate_field(&values, IntakeField::CustomerName).is_none());
    }

    #[test]
    fn test_optional_email() {
        let mut values = values();
        values.customer_email = "not-an-email".to_string();
        assert!(validate_field(&values, IntakeField::CustomerEmail).is_some());
        assert!(validate(&values).is_err());

        values.customer_email = " ana@example.com ".to_string();
        let metadata = validate(&values).unwrap();
        assert_eq!(metadata.customer_email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn test_blur_validation_is_per_field() {
        let mut values = values();
        values.layout_number.clear();
        assert!(validate_field(&values, IntakeField::OrderNumber).is_none());
        assert!(validate_field(&values, IntakeField::LayoutNumber).is_some());
    }
}
