//! Semicolon-delimited spreadsheet encoder

use std::io;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::errors::Result;
use crate::models::{OrderMetadata, RosterRow};

pub const TITLE: &str = "Planilha de Personalização";
pub const DELIMITER: u8 = b';';

/// Encode the preamble, column headers and the given rows.
///
/// `rows` should already be the filled subset; they are written in the
/// order given, with columns following the metadata's row shape. Lines are
/// separated by CRLF with no terminator after the last one.
pub fn encode(metadata: &OrderMetadata, rows: &[RosterRow]) -> Result<String> {
    let shape = metadata.shape();

    let mut buf = write_records(Vec::new(), [vec![TITLE.to_string()]])?;
    buf.extend_from_slice(CRLF);
    buf = write_records(
        buf,
        [
            format!("Cliente: {}", metadata.customer_name),
            format!("E-mail: {}", metadata.email_or_default()),
            format!("Nº do Pedido: {}", metadata.order_number),
            format!("Nº do Layout: {}", metadata.layout_number),
        ]
        .map(|line| vec![line]),
    )?;
    buf.extend_from_slice(CRLF);

    let header: Vec<String> = shape.column_headers().into_iter().map(String::from).collect();
    let records = std::iter::once(header).chain(rows.iter().map(|row| {
        shape
            .fields()
            .iter()
            .map(|f| row.value(*f).to_string())
            .collect::<Vec<String>>()
    }));
    buf = write_records(buf, records)?;

    if buf.ends_with(CRLF) {
        buf.truncate(buf.len() - CRLF.len());
    }
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

const CRLF: &[u8] = b"\r\n";

// The csv writer renders an empty record as `""`, so blank lines are
// pushed onto the buffer between writer sections.
fn write_records<I>(buf: Vec<u8>, records: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Necessary)
        .flexible(true)
        .from_writer(buf);
    for record in records {
        writer.write_record(&record)?;
    }
    Ok(writer.into_inner().map_err(|e| e.into_error())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NumberedRow, Position, SimpleRow, Size};

    fn metadata(has_numbering: bool) -> OrderMetadata {
        OrderMetadata {
            order_number: "1092-09".to_string(),
            layout_number: "09909.987".to_string(),
            customer_name: "Ana Silva".to_string(),
            has_numbering,
            customer_email: None,
        }
    }

    #[test]
    fn test_numbered_payload() {
        let rows = vec![RosterRow::Numbered(NumberedRow {
            name: "Ana".to_string(),
            number: "7".to_string(),
            size: Some(Size::M),
            position: Some(Position::Field),
        })];

        let payload = encode(&metadata(true), &rows).unwrap();
        let lines: Vec<&str> = payload.split("\r\n").collect();
        assert_eq!(
            lines,
            vec![
                "Planilha de Personalização",
                "",
                "Cliente: Ana Silva",
                "E-mail: Sem e-mail",
                "Nº do Pedido: 1092-09",
                "Nº do Layout: 09909.987",
                "",
                "Nome;Número;Tamanho;Posição",
                "Ana;7;M;Field",
            ]
        );
    }

    #[test]
    fn test_simple_payload_keeps_empty_cells() {
        let mut meta = metadata(false);
        meta.customer_email = Some("ana@example.com".to_string());
        let rows = vec![
            RosterRow::Simple(SimpleRow {
                name: "Bia".to_string(),
                size: Some(Size::Kids12),
            }),
            RosterRow::Simple(SimpleRow {
                name: String::new(),
                size: Some(Size::XS),
            }),
        ];

        let payload = encode(&meta, &rows).unwrap();
        assert!(payload.contains("E-mail: ana@example.com\r\n"));
        assert!(payload.ends_with("Nome;Tamanho\r\nBia;12\r\n;PP"));
    }

    #[test]
    fn test_fields_with_delimiters_are_quoted() {
        let mut meta = metadata(false);
        meta.customer_name = "Silva; Filhos".to_string();
        let rows = vec![RosterRow::Simple(SimpleRow {
            name: "Ana\nMaria \"Bia\"".to_string(),
            size: None,
        })];

        let payload = encode(&meta, &rows).unwrap();
        assert!(payload.contains("\"Cliente: Silva; Filhos\"\r\n"));
        assert!(payload.ends_with("\"Ana\nMaria \"\"Bia\"\"\";"));

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .from_reader(payload.as_bytes());
        let last = reader.records().last().unwrap().unwrap();
        assert_eq!(&last[0], "Ana\nMaria \"Bia\"");
    }

    #[test]
    fn test_header_only_payload_has_no_trailing_terminator() {
        let payload = encode(&metadata(false), &[]).unwrap();
        assert!(payload.starts_with("Planilha de Personalização\r\n\r\nCliente: Ana Silva\r\n"));
        assert!(payload.contains("Nº do Layout: 09909.987\r\n\r\nNome;Tamanho"));
        assert!(payload.ends_with("Nome;Tamanho"));
        assert!(!payload.contains("\"\""));
    }
}
