//! Paginated summary document (PDF)
//!
//! Layout happens in millimetres with a top-down cursor, the way the
//! order summary has always been printed, and is kept separate from
//! rendering so pagination can be checked without parsing PDF.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::errors::Result;
use crate::models::{OrderMetadata, RosterRow};

pub const TITLE: &str = "Resumo do Pedido - Croma";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_LEFT_MM: f32 = 20.0;
const TOP_MARGIN_MM: f32 = 20.0;

const METADATA_START_MM: f32 = 35.0;
const LIST_TITLE_MM: f32 = 68.0;
const LIST_START_MM: f32 = 75.0;
const LINE_STEP_MM: f32 = 7.0;

/// Entries are only placed at or above this line; the rest of the
/// page belongs to the footer.
pub const CONTENT_BOTTOM_MM: f32 = 170.0;

const DECLARATION_START_MM: f32 = 182.0;
const DECLARATION_STEP_MM: f32 = 5.5;
const PAGE_NUMBER_MM: f32 = 287.0;

const DECLARATION: [&str; 5] = [
    "Declaração de conferência e autorização",
    "Confirmo que revisei cuidadosamente todos os nomes, tamanhos e informações",
    "contidas neste formulário. Autorizo o início da produção com base nesses dados e",
    "reconheço que eventuais erros ou omissões após este envio são de minha inteira",
    "responsabilidade.",
];

const ENTRY_SEPARATOR: &str = "  |  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// One line of text at a position measured from the top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
    pub font: Font,
    pub size: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<Vec<PlacedText>>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current_page(&mut self) -> &mut Vec<PlacedText> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn place(&mut self, text: impl Into<String>, y_mm: f32, font: Font, size: f32) {
        self.current_page().push(PlacedText {
            text: text.into(),
            x_mm: MARGIN_LEFT_MM,
            y_mm,
            font,
            size,
        });
    }
}

/// Text of one numbered entry: the row's non-empty values joined
pub fn entry_line(position: usize, row: &RosterRow) -> String {
    format!("{}. {}", position, row.present_values().join(ENTRY_SEPARATOR))
}

/// Lay out the title block, metadata and every row (filled or not).
pub fn layout(metadata: &OrderMetadata, rows: &[RosterRow]) -> DocumentLayout {
    let mut doc = DocumentLayout::default();

    doc.place(TITLE, TOP_MARGIN_MM, Font::Bold, 18.0);
    let metadata_lines = [
        format!("Cliente: {}", metadata.customer_name),
        format!("E-mail: {}", metadata.email_or_default()),
        format!("Pedido: {}", metadata.order_number),
        format!("Layout: {}", metadata.layout_number),
    ];
    let mut y = METADATA_START_MM;
    for line in metadata_lines {
        doc.place(line, y, Font::Regular, 12.0);
        y += LINE_STEP_MM;
    }
    doc.place("Lista de nomes:", LIST_TITLE_MM, Font::Bold, 12.0);

    let mut y = LIST_START_MM;
    for (i, row) in rows.iter().enumerate() {
        if y > CONTENT_BOTTOM_MM {
            doc.pages.push(Vec::new());
            y = TOP_MARGIN_MM;
        }
        doc.place(entry_line(i + 1, row), y, Font::Regular, 12.0);
        y += LINE_STEP_MM;
    }

    let mut y = DECLARATION_START_MM;
    for (i, line) in DECLARATION.iter().enumerate() {
        let font = if i == 0 { Font::Bold } else { Font::Regular };
        doc.place(*line, y, font, 10.0);
        y += DECLARATION_STEP_MM;
    }

    let total = doc.pages.len();
    for (i, page) in doc.pages.iter_mut().enumerate() {
        page.push(PlacedText {
            text: format!("Página {} de {}", i + 1, total),
            x_mm: MARGIN_LEFT_MM,
            y_mm: PAGE_NUMBER_MM,
            font: Font::Regular,
            size: 9.0,
        });
    }

    doc
}

/// Encode the summary document as PDF bytes
pub fn encode(metadata: &OrderMetadata, rows: &[RosterRow]) -> Result<Vec<u8>> {
    let title = format!("{} {}", TITLE, metadata.order_number);
    render(&layout(metadata, rows), &title)
}

/// Render a computed layout to PDF bytes
pub fn render(layout: &DocumentLayout, title: &str) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary("Helvetica"));
    let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource_name() => regular_id,
            Font::Bold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let page_id = add_page(&mut doc, pages_id, page)?;
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            mm_to_pt(PAGE_WIDTH_MM).into(),
            mm_to_pt(PAGE_HEIGHT_MM).into(),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let created = chrono::Local::now().format("D:%Y%m%d%H%M%S").to_string();
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(win_ansi(title)),
        "Producer" => Object::string_literal("roster-wizard"),
        "CreationDate" => Object::string_literal(created),
    });
    doc.trailer.set("Info", info_id);

    doc.compress();
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn add_page(doc: &mut Document, pages_id: ObjectId, texts: &[PlacedText]) -> Result<ObjectId> {
    let mut operations = Vec::with_capacity(texts.len() * 5);
    for text in texts {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![text.font.resource_name().into(), text.size.into()],
        ));
        operations.push(Operation::new(
            "Td",
            vec![
                mm_to_pt(text.x_mm).into(),
                mm_to_pt(PAGE_HEIGHT_MM - text.y_mm).into(),
            ],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(win_ansi(&text.text))],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}

fn font_dictionary(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

/// Encode text for the standard fonts. Latin-1 maps directly onto
/// WinAnsi; anything outside it becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
