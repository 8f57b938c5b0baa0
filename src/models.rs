use serde::{Deserialize, Serialize};

/// Rows synthesized when a roster starts empty or is cleared.
pub const DEFAULT_ROW_COUNT: usize = 10;

/// Filled rows required before the review dialog may open.
pub const MIN_FILLED_ROWS: usize = 5;

/// Order data collected by the intake form. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMetadata {
    pub order_number: String,
    pub layout_number: String,
    pub customer_name: String,
    pub has_numbering: bool,
    pub customer_email: Option<String>,
}

impl OrderMetadata {
    pub fn shape(&self) -> RowShape {
        RowShape::from_numbering(self.has_numbering)
    }

    pub fn email_or_default(&self) -> &str {
        self.customer_email.as_deref().unwrap_or("Sem e-mail")
    }
}

/// Raw intake values as typed, carried through back-navigation so the
/// form can be refilled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeValues {
    pub order_number: String,
    pub layout_number: String,
    pub customer_name: String,
    pub has_numbering: bool,
    pub customer_email: String,
}

impl From<&OrderMetadata> for IntakeValues {
    fn from(metadata: &OrderMetadata) -> Self {
        Self {
            order_number: metadata.order_number.clone(),
            layout_number: metadata.layout_number.clone(),
            customer_name: metadata.customer_name.clone(),
            has_numbering: metadata.has_numbering,
            customer_email: metadata.customer_email.clone().unwrap_or_default(),
        }
    }
}

/// The in-memory navigation state passed between the two screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handoff {
    pub values: IntakeValues,
    pub saved_rows: Option<Vec<RosterRow>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowShape {
    Simple,
    Numbered,
}

impl RowShape {
    pub fn from_numbering(has_numbering: bool) -> Self {
        if has_numbering {
            RowShape::Numbered
        } else {
            RowShape::Simple
        }
    }

    /// Columns in display and export order.
    pub fn fields(&self) -> &'static [RowField] {
        match self {
            RowShape::Simple => &[RowField::Name, RowField::Size],
            RowShape::Numbered => &[
                RowField::Name,
                RowField::Number,
                RowField::Size,
                RowField::Position,
            ],
        }
    }

    pub fn blank_row(&self) -> RosterRow {
        match self {
            RowShape::Simple => RosterRow::Simple(SimpleRow::default()),
            RowShape::Numbered => RosterRow::Numbered(NumberedRow::default()),
        }
    }

    pub fn column_headers(&self) -> Vec<&'static str> {
        self.fields().iter().map(|f| f.label()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowField {
    Name,
    Number,
    Size,
    Position,
}

impl RowField {
    pub fn label(&self) -> &'static str {
        match self {
            RowField::Name => "Nome",
            RowField::Number => "Número",
            RowField::Size => "Tamanho",
            RowField::Position => "Posição",
        }
    }
}

/// Garment sizes offered by the size picker, in picker order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Size {
    #[serde(rename = "5G")]
    XXXXXL,
    #[serde(rename = "4G")]
    XXXXL,
    #[serde(rename = "3G")]
    XXXL,
    #[serde(rename = "GG")]
    XL,
    #[serde(rename = "G")]
    L,
    #[serde(rename = "M")]
    M,
    #[serde(rename = "P")]
    S,
    #[serde(rename = "PP")]
    XS,
    #[serde(rename = "16")]
    Kids16,
    #[serde(rename = "14")]
    Kids14,
    #[serde(rename = "12")]
    Kids12,
    #[serde(rename = "10")]
    Kids10,
    #[serde(rename = "8")]
    Kids8,
    #[serde(rename = "6")]
    Kids6,
    #[serde(rename = "4")]
    Kids4,
    #[serde(rename = "2")]
    Kids2,
}

impl Size {
    pub const ALL: [Size; 16] = [
        Size::XXXXXL,
        Size::XXXXL,
        Size::XXXL,
        Size::XL,
        Size::L,
        Size::M,
        Size::S,
        Size::XS,
        Size::Kids16,
        Size::Kids14,
        Size::Kids12,
        Size::Kids10,
        Size::Kids8,
        Size::Kids6,
        Size::Kids4,
        Size::Kids2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::XXXXXL => "5G",
            Size::XXXXL => "4G",
            Size::XXXL => "3G",
            Size::XL => "GG",
            Size::L => "G",
            Size::M => "M",
            Size::S => "P",
            Size::XS => "PP",
            Size::Kids16 => "16",
            Size::Kids14 => "14",
            Size::Kids12 => "12",
            Size::Kids10 => "10",
            Size::Kids8 => "8",
            Size::Kids6 => "6",
            Size::Kids4 => "4",
            Size::Kids2 => "2",
        }
    }

    pub fn parse(label: &str) -> Option<Size> {
        Size::ALL.iter().copied().find(|s| s.as_str() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Field,
}

impl Position {
    pub const ALL: [Position; 2] = [Position::Goalkeeper, Position::Field];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::Field => "Field",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleRow {
    pub name: String,
    pub size: Option<Size>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedRow {
    pub name: String,
    pub number: String,
    pub size: Option<Size>,
    pub position: Option<Position>,
}

/// A single roster entry. The variant is fixed by the session's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterRow {
    Simple(SimpleRow),
    Numbered(NumberedRow),
}

/// Typed replacement value for one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Name(String),
    Number(String),
    Size(Option<Size>),
    Position(Option<Position>),
}

impl CellValue {
    pub fn field(&self) -> RowField {
        match self {
            CellValue::Name(_) => RowField::Name,
            CellValue::Number(_) => RowField::Number,
            CellValue::Size(_) => RowField::Size,
            CellValue::Position(_) => RowField::Position,
        }
    }
}

impl RosterRow {
    pub fn shape(&self) -> RowShape {
        match self {
            RosterRow::Simple(_) => RowShape::Simple,
            RosterRow::Numbered(_) => RowShape::Numbered,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RosterRow::Simple(row) => &row.name,
            RosterRow::Numbered(row) => &row.name,
        }
    }

    /// Text of one cell, empty when unset or not part of this shape.
    pub fn value(&self, field: RowField) -> &str {
        match (self, field) {
            (RosterRow::Simple(row), RowField::Name) => &row.name,
            (RosterRow::Simple(row), RowField::Size) => row.size.map(|s| s.as_str()).unwrap_or(""),
            (RosterRow::Numbered(row), RowField::Name) => &row.name,
            (RosterRow::Numbered(row), RowField::Number) => &row.number,
            (RosterRow::Numbered(row), RowField::Size) => {
                row.size.map(|s| s.as_str()).unwrap_or("")
            }
            (RosterRow::Numbered(row), RowField::Position) => {
                row.position.map(|p| p.as_str()).unwrap_or("")
            }
            (RosterRow::Simple(_), RowField::Number | RowField::Position) => "",
        }
    }

    /// Cell texts in column order.
    pub fn values(&self) -> Vec<&str> {
        self.shape().fields().iter().map(|f| self.value(*f)).collect()
    }

    /// Non-empty cell texts in column order.
    pub fn present_values(&self) -> Vec<&str> {
        self.values().into_iter().filter(|v| !v.is_empty()).collect()
    }

    /// A row is filled when any of its cells holds a value.
    pub fn is_filled(&self) -> bool {
        match self {
            RosterRow::Simple(row) => !row.name.is_empty() || row.size.is_some(),
            RosterRow::Numbered(row) => {
                !row.name.is_empty()
                    || !row.number.is_empty()
                    || row.size.is_some()
                    || row.position.is_some()
            }
        }
    }

    /// Replace a single cell. Returns false when the field is not part of
    /// this row's shape.
    pub fn set(&mut self, value: CellValue) -> bool {
        match (self, value) {
            (RosterRow::Simple(row), CellValue::Name(v)) => row.name = v,
            (RosterRow::Simple(row), CellValue::Size(v)) => row.size = v,
            (RosterRow::Numbered(row), CellValue::Name(v)) => row.name = v,
            (RosterRow::Numbered(row), CellValue::Number(v)) => row.number = v,
            (RosterRow::Numbered(row), CellValue::Size(v)) => row.size = v,
            (RosterRow::Numbered(row), CellValue::Position(v)) => row.position = v,
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_rows_are_unfilled() {
        assert!(!RowShape::Simple.blank_row().is_filled());
        assert!(!RowShape::Numbered.blank_row().is_filled());
    }

    #[test]
    fn test_any_cell_fills_a_row() {
        let mut row = RowShape::Numbered.blank_row();
        assert!(row.set(CellValue::Position(Some(Position::Goalkeeper))));
        assert!(row.is_filled());

        let mut row = RowShape::Simple.blank_row();
        assert!(row.set(CellValue::Size(Some(Size::M))));
        assert!(row.is_filled());
    }

    #[test]
    fn test_simple_row_rejects_numbered_fields() {
        let mut row = RowShape::Simple.blank_row();
        assert!(!row.set(CellValue::Number("10".to_string())));
        assert!(!row.is_filled());
    }

    #[test]
    fn test_values_follow_column_order() {
        let row = RosterRow::Numbered(NumberedRow {
            name: "Ana".to_string(),
            number: "7".to_string(),
            size: Some(Size::M),
            position: Some(Position::Field),
        });
        assert_eq!(row.values(), vec!["Ana", "7", "M", "Field"]);
        assert_eq!(
            RowShape::Numbered.column_headers(),
            vec!["Nome", "Número", "Tamanho", "Posição"]
        );
    }

    #[test]
    fn test_size_labels() {
        assert_eq!(Size::parse("GG"), Some(Size::XL));
        assert_eq!(Size::parse("XL"), None);
        assert_eq!(serde_json::to_string(&Size::XXXXXL).unwrap(), "\"5G\"");
    }
}
