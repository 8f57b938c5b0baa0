//! Rendering of the review and finalize popup

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::{
    models::OrderMetadata,
    review::{ReviewDialog, ReviewState},
    wizard::ui::{centered_rect, fit_width, Styles},
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner glyph for an animation frame
pub fn spinner_glyph(frame: usize) -> &'static str {
    SPINNER[frame % SPINNER.len()]
}

/// Draw the dialog centered over `area`
pub fn render(
    f: &mut Frame,
    area: Rect,
    dialog: &ReviewDialog,
    metadata: &OrderMetadata,
    spinner_frame: usize,
) {
    let popup = centered_rect(70, 70, area);
    f.render_widget(Clear, popup);

    let title = match dialog.state() {
        ReviewState::Reviewing => "Revisar pedido",
        ReviewState::Finalizing => "Finalizando",
        ReviewState::Completed => "Pedido concluído",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Styles::active_border());
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    match dialog.state() {
        ReviewState::Reviewing => render_reviewing(f, inner, dialog, metadata),
        ReviewState::Finalizing => render_finalizing(f, inner, spinner_frame),
        ReviewState::Completed => render_completed(f, inner, metadata),
    }
}

fn render_reviewing(f: &mut Frame, area: Rect, dialog: &ReviewDialog, metadata: &OrderMetadata) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(area);

    let summary = vec![
        Line::from(vec![
            Span::styled("Pedido: ", Styles::info()),
            Span::raw(metadata.order_number.clone()),
            Span::styled("   Layout: ", Styles::info()),
            Span::raw(metadata.layout_number.clone()),
        ]),
        Line::from(vec![
            Span::styled("Cliente: ", Styles::info()),
            Span::raw(metadata.customer_name.clone()),
        ]),
        Line::from(vec![
            Span::styled("E-mail: ", Styles::info()),
            Span::raw(metadata.email_or_default().to_string()),
        ]),
        Line::from(""),
        Line::from(format!(
            "{} nomes preenchidos",
            dialog.filled_rows().len()
        )),
    ];
    f.render_widget(Paragraph::new(summary), chunks[0]);

    let names_title = if dialog.show_names() {
        "Lista de nomes (n: recolher)"
    } else {
        "Lista de nomes (n: expandir)"
    };
    let names_block = Block::default()
        .title(names_title)
        .borders(Borders::ALL)
        .border_style(Styles::inactive_border());
    if dialog.show_names() {
        let width = chunks[1].width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = dialog
            .filled_rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let text = format!("{}. {}", i + 1, row.present_values().join(" | "));
                ListItem::new(fit_width(&text, width))
            })
            .collect();
        f.render_widget(List::new(items).block(names_block), chunks[1]);
    } else {
        f.render_widget(names_block, chunks[1]);
    }

    let checkbox = if dialog.consent() { "[x]" } else { "[ ]" };
    let consent = Paragraph::new(format!(
        "{} Confirmo que conferi os nomes, números e tamanhos e autorizo a produção",
        checkbox
    ))
    .style(if dialog.consent() { Styles::success() } else { Styles::warning() })
    .wrap(Wrap { trim: true });
    f.render_widget(consent, chunks[2]);

    let hints = Paragraph::new("Espaço: Confirmar | n: Nomes | Enter: Finalizar | Esc: Voltar")
        .style(Styles::info());
    f.render_widget(hints, chunks[3]);
}

fn render_finalizing(f: &mut Frame, area: Rect, spinner_frame: usize) {
    let glyph = spinner_glyph(spinner_frame);
    let lines = vec![
        Line::from(""),
        Line::from(format!("{} Gerando arquivos CSV e PDF...", glyph)),
        Line::from(""),
        Line::from(format!("{} Enviando para a equipe da Croma...", glyph)),
        Line::from(""),
        Line::from(Span::styled("Aguarde, não feche esta janela", Styles::inactive())),
    ];
    let paragraph = Paragraph::new(lines)
        .style(Styles::info())
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_completed(f: &mut Frame, area: Rect, metadata: &OrderMetadata) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("✓ Lista enviada com sucesso!", Styles::success())),
        Line::from(""),
        Line::from(format!("Pedido {} pronto para produção.", metadata.order_number)),
        Line::from(""),
        Line::from("p: Baixar PDF | c: Baixar CSV | Enter: Concluir"),
    ];
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_wraps() {
        assert_eq!(spinner_glyph(0), spinner_glyph(SPINNER.len()));
        assert_ne!(spinner_glyph(0), spinner_glyph(1));
    }
}
