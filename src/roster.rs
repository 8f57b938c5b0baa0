//! Roster editing state
//!
//! The roster owns the ordered list of entries for one session. Derived
//! values (fill count, filled subset) are always computed from the rows
//! and never stored alongside them.

use tracing::{debug, info, warn};

use crate::errors::{Result, WizardError};
use crate::export::spreadsheet;
use crate::models::{
    CellValue, OrderMetadata, RosterRow, RowShape, DEFAULT_ROW_COUNT, MIN_FILLED_ROWS,
};
use crate::review::ReviewDialog;

#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    shape: RowShape,
    rows: Vec<RosterRow>,
}

impl Roster {
    /// Create a roster of blank rows in the given shape
    pub fn new(shape: RowShape) -> Self {
        Self {
            shape,
            rows: synthesize(shape),
        }
    }

    /// Resume from rows carried back through navigation. Saved rows are
    /// used only when present and all of the requested shape.
    pub fn restore(shape: RowShape, saved: Option<Vec<RosterRow>>) -> Self {
        match saved {
            Some(rows) if !rows.is_empty() && rows.iter().all(|r| r.shape() == shape) => {
                info!("Restoring {} saved roster rows", rows.len());
                Self { shape, rows }
            }
            Some(rows) if !rows.is_empty() => {
                warn!(
                    "Discarding {} saved rows: numbering flag changed to {:?}",
                    rows.len(),
                    shape
                );
                Self::new(shape)
            }
            _ => Self::new(shape),
        }
    }

    pub fn shape(&self) -> RowShape {
        self.shape
    }

    pub fn rows(&self) -> &[RosterRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RosterRow> {
        self.rows.get(index)
    }

    /// Replace one cell of one row. Other rows are untouched.
    pub fn edit_cell(&mut self, index: usize, value: CellValue) -> Result<()> {
        let len = self.rows.len();
        let shape = self.shape;
        let row = self
            .rows
            .get_mut(index)
            .ok_or(WizardError::RowOutOfRange { index, len })?;

        let field = value.field();
        if !row.set(value) {
            return Err(WizardError::FieldNotInShape { field, shape });
        }
        Ok(())
    }

    /// Delete one row; later rows shift up. Does not repopulate.
    pub fn remove_row(&mut self, index: usize) -> Result<RosterRow> {
        if index >= self.rows.len() {
            return Err(WizardError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        debug!("Removing roster row {}", index);
        Ok(self.rows.remove(index))
    }

    /// Append one blank row of the current shape
    pub fn add_row(&mut self) {
        self.rows.push(self.shape.blank_row());
    }

    /// Discard every row and start over with fresh blank rows
    pub fn clear_all(&mut self) {
        info!("Clearing roster ({} rows)", self.rows.len());
        self.rows = synthesize(self.shape);
    }

    pub fn fill_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_filled()).count()
    }

    pub fn filled_rows(&self) -> Vec<RosterRow> {
        self.rows.iter().filter(|r| r.is_filled()).cloned().collect()
    }

    /// Check the minimum fill rule, encode the spreadsheet payload and
    /// open the review dialog.
    pub fn conclude(&self, metadata: &OrderMetadata) -> Result<ReviewDialog> {
        let filled = self.filled_rows();
        if filled.len() < MIN_FILLED_ROWS {
            warn!(
                "Conclude refused: {} of {} required rows filled",
                filled.len(),
                MIN_FILLED_ROWS
            );
            return Err(WizardError::NotEnoughFilledRows {
                filled: filled.len(),
                required: MIN_FILLED_ROWS,
            });
        }

        let csv_payload = spreadsheet::encode(metadata, &filled)?;
        info!(
            "Opening review for order {} with {} filled rows",
            metadata.order_number,
            filled.len()
        );
        Ok(ReviewDialog::new(csv_payload, filled))
    }
}

fn synthesize(shape: RowShape) -> Vec<RosterRow> {
    (0..DEFAULT_ROW_COUNT).map(|_| shape.blank_row()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position, RowField, Size};
    use crate::review::ReviewState;

    fn metadata(has_numbering: bool) -> OrderMetadata {
        OrderMetadata {
            order_number: "1092-09".to_string(),
            layout_number: "09909.987".to_string(),
            customer_name: "Ana Silva".to_string(),
            has_numbering,
            customer_email: None,
        }
    }

    fn fill(roster: &mut Roster, count: usize) {
        for i in 0..count {
            roster
                .edit_cell(i, CellValue::Name(format!("Player {}", i + 1)))
                .unwrap();
        }
    }

    #[test]
    fn test_new_roster_has_default_rows() {
        let roster = Roster::new(RowShape::Numbered);
        assert_eq!(roster.len(), DEFAULT_ROW_COUNT);
        assert!(roster.rows().iter().all(|r| r.shape() == RowShape::Numbered));
        assert_eq!(roster.fill_count(), 0);
    }

    #[test]
    fn test_restore_keeps_saved_rows() {
        let mut roster = Roster::new(RowShape::Simple);
        fill(&mut roster, 3);
        roster.remove_row(9).unwrap();

        let restored = Roster::restore(RowShape::Simple, Some(roster.rows().to_vec()));
        assert_eq!(restored.len(), 9);
        assert_eq!(restored.fill_count(), 3);
    }

    #[test]
    fn test_restore_with_other_shape_resynthesizes() {
        let mut roster = Roster::new(RowShape::Simple);
        fill(&mut roster, 3);

        let restored = Roster::restore(RowShape::Numbered, Some(roster.rows().to_vec()));
        assert_eq!(restored.len(), DEFAULT_ROW_COUNT);
        assert_eq!(restored.fill_count(), 0);
        assert_eq!(restored.shape(), RowShape::Numbered);
    }

    #[test]
    fn test_restore_from_empty_saved_rows() {
        let restored = Roster::restore(RowShape::Simple, Some(Vec::new()));
        assert_eq!(restored.len(), DEFAULT_ROW_COUNT);
    }

    #[test]
    fn test_edit_cell_touches_only_one_row() {
        let mut roster = Roster::new(RowShape::Numbered);
        roster
            .edit_cell(3, CellValue::Position(Some(Position::Goalkeeper)))
            .unwrap();
        roster.edit_cell(3, CellValue::Size(Some(Size::XL))).unwrap();

        assert_eq!(roster.fill_count(), 1);
        let row = roster.get(3).unwrap();
        assert_eq!(row.value(RowField::Position), "Goalkeeper");
        assert_eq!(row.value(RowField::Size), "GG");
        assert!(!roster.get(2).unwrap().is_filled());
        assert!(!roster.get(4).unwrap().is_filled());
    }

    #[test]
    fn test_edit_cell_errors() {
        let mut roster = Roster::new(RowShape::Simple);
        assert!(matches!(
            roster.edit_cell(10, CellValue::Name("x".to_string())),
            Err(WizardError::RowOutOfRange { index: 10, len: 10 })
        ));
        assert!(matches!(
            roster.edit_cell(0, CellValue::Number("9".to_string())),
            Err(WizardError::FieldNotInShape { .. })
        ));
        assert_eq!(roster.fill_count(), 0);
    }

    #[test]
    fn test_remove_row_shifts_later_rows() {
        let mut roster = Roster::new(RowShape::Simple);
        fill(&mut roster, 10);
        let before = roster.rows().to_vec();

        let removed = roster.remove_row(4).unwrap();
        assert_eq!(removed.name(), "Player 5");
        assert_eq!(roster.len(), 9);
        assert_eq!(&roster.rows()[..4], &before[..4]);
        assert_eq!(&roster.rows()[4..], &before[5..]);
    }

    #[test]
    fn test_remove_row_does_not_repopulate() {
        let mut roster = Roster::new(RowShape::Simple);
        for _ in 0..DEFAULT_ROW_COUNT {
            roster.remove_row(0).unwrap();
        }
        assert!(roster.is_empty());
        assert!(roster.remove_row(0).is_err());
    }

    #[test]
    fn test_clear_all_resets_rows_and_count() {
        let mut roster = Roster::new(RowShape::Numbered);
        fill(&mut roster, 7);
        roster.add_row();
        roster.add_row();
        roster.remove_row(0).unwrap();
        assert_eq!(roster.len(), 11);

        roster.clear_all();
        assert_eq!(roster.len(), DEFAULT_ROW_COUNT);
        assert_eq!(roster.fill_count(), 0);
        assert!(roster.rows().iter().all(|r| r.shape() == RowShape::Numbered));
    }

    #[test]
    fn test_conclude_requires_minimum_fill() {
        let mut roster = Roster::new(RowShape::Simple);
        fill(&mut roster, 4);

        let err = roster.conclude(&metadata(false)).unwrap_err();
        assert!(matches!(
            err,
            WizardError::NotEnoughFilledRows {
                filled: 4,
                required: 5
            }
        ));
    }

    #[test]
    fn test_conclude_opens_review() {
        let mut roster = Roster::new(RowShape::Simple);
        fill(&mut roster, 5);

        let dialog = roster.conclude(&metadata(false)).unwrap();
        assert_eq!(dialog.state(), ReviewState::Reviewing);
        assert_eq!(dialog.filled_rows().len(), 5);
        assert!(!dialog.csv_payload().is_empty());
        assert!(dialog.csv_payload().contains("Player 5"));
    }
}
