//! Export encoders and file output
//!
//! Both encoders are pure functions of the order metadata and the rows.
//! Files are named after the order number: `order_<id>.csv` and
//! `order_<id>.pdf`.

pub mod document;
pub mod spreadsheet;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::Result;
use crate::models::{OrderMetadata, RosterRow};

/// Build the export file name for an order, e.g. `order_1092-09.pdf`
pub fn file_name(order_number: &str, extension: &str) -> String {
    let id: String = order_number
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    format!("order_{}.{}", id, extension)
}

/// Write an already encoded spreadsheet payload into `output_dir`
pub fn write_csv(metadata: &OrderMetadata, payload: &str, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(file_name(&metadata.order_number, "csv"));
    std::fs::write(&path, payload)?;
    info!("Wrote spreadsheet to {}", path.display());
    Ok(path)
}

/// Encode the summary document for all rows and write it into `output_dir`
pub fn write_pdf(
    metadata: &OrderMetadata,
    rows: &[RosterRow],
    output_dir: &Path,
) -> Result<PathBuf> {
    let bytes = document::encode(metadata, rows)?;
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(file_name(&metadata.order_number, "pdf"));
    std::fs::write(&path, bytes)?;
    info!("Wrote summary document to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RowShape;
    use tempfile::TempDir;

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("1092-09", "csv"), "order_1092-09.csv");
        assert_eq!(file_name(" 12/34 ", "pdf"), "order_12_34.pdf");
    }

    #[test]
    fn test_write_pdf_creates_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("nested").join("exports");
        let metadata = OrderMetadata {
            order_number: "55".to_string(),
            layout_number: "9".to_string(),
            customer_name: "Jo".to_string(),
            has_numbering: false,
            customer_email: None,
        };
        let rows = vec![RowShape::Simple.blank_row(); 3];

        let path = write_pdf(&metadata, &rows, &output_dir).unwrap();
        assert_eq!(path, output_dir.join("order_55.pdf"));
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }
}
