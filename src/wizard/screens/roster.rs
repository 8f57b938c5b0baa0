//! Roster editor screen
//!
//! A table with one line per entry. Name and number cells are typed in
//! place; size and position open a picker popup. The review dialog, when
//! open, takes every key.

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, TableState},
    Frame,
};
use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    errors::WizardError,
    models::{
        CellValue, Handoff, OrderMetadata, Position, RosterRow, RowField, Size, MIN_FILLED_ROWS,
    },
    review::{CloseOutcome, ReviewDialog, ReviewState},
    roster::Roster,
    wizard::{
        components::review_dialog,
        events::AppEvent,
        ui::{centered_rect, fit_width, SelectableList, Styles},
    },
};

/// Label shown in the picker for "no value"
const UNSET_LABEL: &str = "(nenhum)";

/// Choice popup for the size and position cells
pub struct Picker {
    pub field: RowField,
    pub options: SelectableList<&'static str>,
}

impl Picker {
    fn new(field: RowField, current: &str) -> Self {
        let mut items = vec![UNSET_LABEL];
        match field {
            RowField::Size => items.extend(Size::ALL.iter().map(|s| s.as_str())),
            _ => items.extend(Position::ALL.iter().map(|p| p.as_str())),
        }
        let mut options = SelectableList::new(items);
        if let Some(index) = options.items.iter().position(|label| *label == current) {
            options.select(Some(index));
        }
        Self { field, options }
    }

    /// Typed value for the highlighted option
    fn chosen(&self) -> CellValue {
        let label = self.options.selected().copied().unwrap_or(UNSET_LABEL);
        match self.field {
            RowField::Size => CellValue::Size(Size::parse(label)),
            _ => CellValue::Position(
                Position::ALL.iter().copied().find(|p| p.as_str() == label),
            ),
        }
    }
}

/// Roster editor screen state
pub struct RosterScreen {
    pub metadata: OrderMetadata,
    pub roster: Roster,
    pub selected_row: usize,
    pub selected_col: usize,
    pub table_state: TableState,
    pub picker: Option<Picker>,
    pub dialog: Option<ReviewDialog>,
    pub spinner_frame: usize,
    finalize_delay: Duration,
    output_dir: PathBuf,
}

impl RosterScreen {
    pub fn new(metadata: OrderMetadata, saved_rows: Option<Vec<RosterRow>>, config: &Config) -> Self {
        let roster = Roster::restore(metadata.shape(), saved_rows);
        let mut table_state = TableState::default();
        table_state.select(Some(0));
        Self {
            metadata,
            roster,
            selected_row: 0,
            selected_col: 0,
            table_state,
            picker: None,
            dialog: None,
            spinner_frame: 0,
            finalize_delay: config.finalize_delay(),
            output_dir: config.output_dir.clone(),
        }
    }

    fn fields(&self) -> &'static [RowField] {
        self.roster.shape().fields()
    }

    fn current_field(&self) -> RowField {
        let fields = self.fields();
        fields[self.selected_col.min(fields.len() - 1)]
    }

    /// Snapshot carried back to the intake screen
    pub fn handoff(&self) -> Handoff {
        Handoff {
            values: (&self.metadata).into(),
            saved_rows: Some(self.roster.rows().to_vec()),
        }
    }

    /// Advance the spinner and the finalize timer
    pub fn tick(&mut self) -> AppEvent {
        let Some(dialog) = self.dialog.as_mut() else {
            return AppEvent::None;
        };
        if dialog.state() == ReviewState::Finalizing {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
        if dialog.poll_finalize() {
            return AppEvent::ShowSuccess("Lista enviada para a equipe".to_string());
        }
        AppEvent::None
    }

    /// Handle key events for the roster screen
    pub fn handle_key_event(&mut self, key: KeyEvent) -> AppEvent {
        if self.dialog.is_some() {
            return self.handle_dialog_key(key);
        }
        if self.picker.is_some() {
            return self.handle_picker_key(key);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('d') => self.remove_selected_row(),
                KeyCode::Char('n') => {
                    self.roster.add_row();
                    self.select_row(self.roster.len() - 1);
                    AppEvent::None
                }
                KeyCode::Char('l') => {
                    self.roster.clear_all();
                    self.select_row(0);
                    self.selected_col = 0;
                    AppEvent::ShowStatus("Lista limpa".to_string())
                }
                KeyCode::Char('s') => self.conclude(),
                _ => AppEvent::None,
            };
        }

        match key.code {
            KeyCode::Esc => {
                info!("Returning to intake with {} rows", self.roster.len());
                AppEvent::NavigateBack(self.handoff())
            }
            KeyCode::F(2) => self.conclude(),
            KeyCode::Up => {
                self.select_row(self.selected_row.saturating_sub(1));
                AppEvent::None
            }
            KeyCode::Down => {
                self.select_row(self.selected_row + 1);
                AppEvent::None
            }
            KeyCode::Tab | KeyCode::Right => {
                self.next_cell();
                AppEvent::None
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.previous_cell();
                AppEvent::None
            }
            KeyCode::Enter => {
                match self.current_field() {
                    RowField::Size | RowField::Position => self.open_picker(),
                    RowField::Name | RowField::Number => self.select_row(self.selected_row + 1),
                }
                AppEvent::None
            }
            KeyCode::Char(' ')
                if matches!(self.current_field(), RowField::Size | RowField::Position) =>
            {
                self.open_picker();
                AppEvent::None
            }
            KeyCode::Char(c) => self.type_char(c),
            KeyCode::Backspace => self.erase_char(),
            _ => AppEvent::None,
        }
    }

    fn select_row(&mut self, index: usize) {
        let last = self.roster.len().saturating_sub(1);
        self.selected_row = index.min(last);
        self.table_state.select(Some(self.selected_row));
    }

    fn next_cell(&mut self) {
        if self.selected_col + 1 < self.fields().len() {
            self.selected_col += 1;
        } else if self.selected_row + 1 < self.roster.len() {
            self.selected_col = 0;
            self.select_row(self.selected_row + 1);
        }
    }

    fn previous_cell(&mut self) {
        if self.selected_col > 0 {
            self.selected_col -= 1;
        } else if self.selected_row > 0 {
            self.selected_col = self.fields().len() - 1;
            self.select_row(self.selected_row - 1);
        }
    }

    fn current_text(&self) -> String {
        self.roster
            .get(self.selected_row)
            .map(|row| row.value(self.current_field()).to_string())
            .unwrap_or_default()
    }

    fn type_char(&mut self, c: char) -> AppEvent {
        let field = self.current_field();
        let mut text = self.current_text();
        let value = match field {
            RowField::Name => {
                text.push(c);
                CellValue::Name(text)
            }
            RowField::Number if c.is_ascii_digit() => {
                text.push(c);
                CellValue::Number(text)
            }
            _ => return AppEvent::None,
        };
        self.apply_edit(value)
    }

    fn erase_char(&mut self) -> AppEvent {
        let mut text = self.current_text();
        if text.pop().is_none() {
            return AppEvent::None;
        }
        let value = match self.current_field() {
            RowField::Name => CellValue::Name(text),
            RowField::Number => CellValue::Number(text),
            _ => return AppEvent::None,
        };
        self.apply_edit(value)
    }

    fn apply_edit(&mut self, value: CellValue) -> AppEvent {
        match self.roster.edit_cell(self.selected_row, value) {
            Ok(()) => AppEvent::None,
            Err(e) => AppEvent::ShowError(status_message(&e)),
        }
    }

    fn remove_selected_row(&mut self) -> AppEvent {
        match self.roster.remove_row(self.selected_row) {
            Ok(_) => {
                self.select_row(self.selected_row);
                AppEvent::ShowStatus(format!("Linha removida, {} restantes", self.roster.len()))
            }
            Err(e) => AppEvent::ShowError(status_message(&e)),
        }
    }

    fn open_picker(&mut self) {
        if self.roster.is_empty() {
            return;
        }
        let field = self.current_field();
        self.picker = Some(Picker::new(field, &self.current_text()));
    }

    fn handle_picker_key(&mut self, key: KeyEvent) -> AppEvent {
        let Some(picker) = self.picker.as_mut() else {
            return AppEvent::None;
        };
        match key.code {
            KeyCode::Up => picker.options.previous(),
            KeyCode::Down => picker.options.next(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let value = picker.chosen();
                self.picker = None;
                return self.apply_edit(value);
            }
            KeyCode::Esc => self.picker = None,
            _ => {}
        }
        AppEvent::None
    }

    fn conclude(&mut self) -> AppEvent {
        match self.roster.conclude(&self.metadata) {
            Ok(dialog) => {
                self.dialog = Some(dialog);
                AppEvent::None
            }
            Err(e @ WizardError::NotEnoughFilledRows { .. }) => AppEvent::Alert(e.to_string()),
            Err(e) => {
                error!("Failed to open review: {}", e);
                AppEvent::ShowError(format!("Falha ao preparar a planilha: {}", e))
            }
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) -> AppEvent {
        let Some(dialog) = self.dialog.as_mut() else {
            return AppEvent::None;
        };

        match (dialog.state(), key.code) {
            (ReviewState::Reviewing, KeyCode::Char(' ')) => dialog.toggle_consent(),
            (ReviewState::Reviewing, KeyCode::Char('n')) => dialog.toggle_names_list(),
            (ReviewState::Reviewing, KeyCode::Enter) => {
                if let Err(e) = dialog.request_finalize(self.finalize_delay) {
                    return match e {
                        WizardError::ConsentRequired => AppEvent::Alert(e.to_string()),
                        other => AppEvent::ShowError(status_message(&other)),
                    };
                }
                self.spinner_frame = 0;
            }
            (ReviewState::Completed, KeyCode::Char('p')) => {
                return match dialog.export_pdf(&self.metadata, self.roster.rows(), &self.output_dir) {
                    Ok(path) => AppEvent::ShowSuccess(format!("PDF salvo em {}", path.display())),
                    Err(e) => AppEvent::ShowError(format!("Falha ao gerar o PDF: {}", e)),
                };
            }
            (ReviewState::Completed, KeyCode::Char('c')) => {
                return match dialog.export_csv(&self.metadata, &self.output_dir) {
                    Ok(path) => AppEvent::ShowSuccess(format!("CSV salvo em {}", path.display())),
                    Err(e) => AppEvent::ShowError(format!("Falha ao gerar o CSV: {}", e)),
                };
            }
            (ReviewState::Completed, KeyCode::Enter | KeyCode::Char('f')) => {
                return match dialog.finish() {
                    Ok(_) => AppEvent::SessionFinished,
                    Err(e) => AppEvent::ShowError(status_message(&e)),
                };
            }
            (_, KeyCode::Esc) => match dialog.request_close() {
                Ok(CloseOutcome::BackToEditing) => {
                    debug!("Review dialog dismissed");
                    self.dialog = None;
                }
                Ok(CloseOutcome::SessionFinished) => return AppEvent::SessionFinished,
                Err(_) => {
                    return AppEvent::ShowStatus("Aguarde a finalização do envio".to_string())
                }
            },
            _ => {}
        }
        AppEvent::None
    }

    /// Draw the roster screen
    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(5),
                Constraint::Length(4),
            ])
            .split(area);

        let filled = self.roster.fill_count();
        let counter_style = if filled >= MIN_FILLED_ROWS {
            Styles::success()
        } else {
            Styles::warning()
        };
        let header = vec![
            Line::from(vec![
                Span::styled("Pedido ", Styles::info()),
                Span::raw(self.metadata.order_number.clone()),
                Span::styled("  Layout ", Styles::info()),
                Span::raw(self.metadata.layout_number.clone()),
                Span::styled("  Cliente ", Styles::info()),
                Span::raw(self.metadata.customer_name.clone()),
            ]),
            Line::from(Span::styled(
                format!("{} de {} linhas preenchidas", filled, self.roster.len()),
                counter_style,
            )),
        ];
        let header_widget = Paragraph::new(header).block(
            Block::default()
                .title("Lista de Nomes")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(header_widget, chunks[0]);

        self.draw_table(f, chunks[1]);

        let instructions = vec![
            Line::from("↑/↓: Linhas | Tab/←/→: Colunas | Enter/Espaço: Escolher tamanho/posição"),
            Line::from("Ctrl+N: Nova linha | Ctrl+D: Remover | Ctrl+L: Limpar | F2/Ctrl+S: Concluir | Esc: Voltar"),
        ];
        let instructions_widget = Paragraph::new(instructions).style(Styles::info()).block(
            Block::default()
                .title("Instruções")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(instructions_widget, chunks[2]);

        if let Some(picker) = self.picker.as_mut() {
            let popup = centered_rect(30, 60, area);
            f.render_widget(Clear, popup);
            let items: Vec<ListItem> = picker
                .options
                .items
                .iter()
                .map(|label| ListItem::new(*label))
                .collect();
            let list = List::new(items)
                .block(
                    Block::default()
                        .title(picker.field.label())
                        .borders(Borders::ALL)
                        .border_style(Styles::active_border()),
                )
                .highlight_style(Styles::selected())
                .highlight_symbol("> ");
            f.render_stateful_widget(list, popup, &mut picker.options.state);
        }

        if let Some(dialog) = self.dialog.as_ref() {
            review_dialog::render(f, area, dialog, &self.metadata, self.spinner_frame);
        }
    }

    fn draw_table(&mut self, f: &mut Frame, area: Rect) {
        let fields = self.fields();
        let name_width = (area.width as usize).saturating_sub(6 + 12 * (fields.len() - 1)).max(8);

        let header = Row::new(
            std::iter::once("#")
                .chain(self.roster.shape().column_headers())
                .map(|h| Cell::from(h).style(Styles::title())),
        );

        let rows: Vec<Row> = self
            .roster
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut cells = vec![Cell::from(format!("{}", i + 1)).style(Styles::inactive())];
                for (col, field) in fields.iter().enumerate() {
                    let value = row.value(*field);
                    let (text, style) = if value.is_empty() {
                        ("·".to_string(), Styles::inactive())
                    } else {
                        (fit_width(value, name_width), Styles::default())
                    };
                    let style = if i == self.selected_row && col == self.selected_col {
                        Styles::selected()
                    } else {
                        style
                    };
                    cells.push(Cell::from(text).style(style));
                }
                Row::new(cells)
            })
            .collect();

        let mut widths = vec![Constraint::Length(4), Constraint::Min(8)];
        widths.extend(fields.iter().skip(1).map(|_| Constraint::Length(10)));

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            );
        f.render_stateful_widget(table, area, &mut self.table_state);
    }
}

/// Status bar text for a failed editor or dialog action
fn status_message(e: &WizardError) -> String {
    warn!("Roster action failed: {}", e);
    match e {
        WizardError::RowOutOfRange { .. } => {
            "Nenhuma linha selecionada. Use Ctrl+N para adicionar uma linha".to_string()
        }
        WizardError::FieldNotInShape { field, .. } => {
            format!("O campo {} não existe nesta lista", field.label())
        }
        WizardError::InvalidTransition { .. } => {
            "Ação indisponível nesta etapa da revisão".to_string()
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn metadata(has_numbering: bool) -> OrderMetadata {
        OrderMetadata {
            order_number: "1092-09".to_string(),
            layout_number: "77".to_string(),
            customer_name: "Ana Silva".to_string(),
            has_numbering,
            customer_email: None,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn screen(has_numbering: bool, output_dir: PathBuf) -> RosterScreen {
        let mut config = Config {
            output_dir,
            ..Config::default()
        };
        config.timing.finalize_delay_ms = 10;
        RosterScreen::new(metadata(has_numbering), None, &config)
    }

    fn type_text(screen: &mut RosterScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key_event(key(KeyCode::Char(c)));
        }
    }

    fn fill_names(screen: &mut RosterScreen, count: usize) {
        for i in 0..count {
            screen.selected_col = 0;
            screen.select_row(i);
            type_text(screen, &format!("Jogador {}", i + 1));
        }
    }

    #[test]
    fn test_typing_and_number_filter() {
        let mut screen = screen(true, PathBuf::from("unused"));
        type_text(&mut screen, "Ana");
        screen.handle_key_event(key(KeyCode::Tab));
        type_text(&mut screen, "1a0");
        assert_eq!(screen.roster.rows()[0].value(RowField::Name), "Ana");
        assert_eq!(screen.roster.rows()[0].value(RowField::Number), "10");

        screen.handle_key_event(key(KeyCode::Backspace));
        assert_eq!(screen.roster.rows()[0].value(RowField::Number), "1");
        assert_eq!(screen.roster.fill_count(), 1);
    }

    #[test]
    fn test_picker_sets_size() {
        let mut screen = screen(false, PathBuf::from("unused"));
        screen.handle_key_event(key(KeyCode::Tab));
        screen.handle_key_event(key(KeyCode::Enter));
        assert!(screen.picker.is_some());
        // (nenhum) -> 5G -> 4G
        screen.handle_key_event(key(KeyCode::Down));
        screen.handle_key_event(key(KeyCode::Down));
        screen.handle_key_event(key(KeyCode::Enter));
        assert!(screen.picker.is_none());
        assert_eq!(screen.roster.rows()[0].value(RowField::Size), "4G");
    }

    #[test]
    fn test_row_commands() {
        let mut screen = screen(false, PathBuf::from("unused"));
        screen.handle_key_event(ctrl('n'));
        assert_eq!(screen.roster.len(), 11);
        assert_eq!(screen.selected_row, 10);

        screen.handle_key_event(ctrl('d'));
        assert_eq!(screen.roster.len(), 10);
        assert_eq!(screen.selected_row, 9);

        type_text(&mut screen, "Bia");
        screen.handle_key_event(ctrl('l'));
        assert_eq!(screen.roster.fill_count(), 0);
        assert_eq!(screen.roster.len(), 10);
    }

    #[test]
    fn test_conclude_requires_five_rows() {
        let mut screen = screen(false, PathBuf::from("unused"));
        fill_names(&mut screen, 4);
        match screen.handle_key_event(key(KeyCode::F(2))) {
            AppEvent::Alert(message) => assert!(message.contains("pelo menos 5 nomes")),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(screen.dialog.is_none());

        fill_names(&mut screen, 5);
        screen.handle_key_event(key(KeyCode::F(2)));
        assert!(screen.dialog.is_some());
    }

    #[test]
    fn test_empty_roster_edit_reports_in_portuguese() {
        let mut screen = screen(false, PathBuf::from("unused"));
        for _ in 0..10 {
            screen.handle_key_event(ctrl('d'));
        }
        assert!(screen.roster.is_empty());

        match screen.handle_key_event(key(KeyCode::Char('a'))) {
            AppEvent::ShowError(message) => {
                assert!(message.contains("Ctrl+N"));
                assert!(!message.contains("does not exist"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(matches!(
            screen.handle_key_event(ctrl('d')),
            AppEvent::ShowError(message) if message.starts_with("Nenhuma linha")
        ));
    }

    #[test]
    fn test_back_navigation_carries_rows() {
        let mut screen = screen(true, PathBuf::from("unused"));
        type_text(&mut screen, "Caio");
        match screen.handle_key_event(key(KeyCode::Esc)) {
            AppEvent::NavigateBack(handoff) => {
                assert_eq!(handoff.values.order_number, "1092-09");
                let rows = handoff.saved_rows.unwrap();
                assert_eq!(rows.len(), 10);
                assert_eq!(rows[0].name(), "Caio");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_full_review_flow() {
        let temp_dir = TempDir::new().unwrap();
        let mut screen = screen(false, temp_dir.path().to_path_buf());
        fill_names(&mut screen, 5);
        screen.handle_key_event(key(KeyCode::F(2)));

        assert!(matches!(
            screen.handle_key_event(key(KeyCode::Enter)),
            AppEvent::Alert(_)
        ));
        screen.handle_key_event(key(KeyCode::Char(' ')));
        screen.handle_key_event(key(KeyCode::Enter));
        assert_eq!(
            screen.dialog.as_ref().map(|d| d.state()),
            Some(ReviewState::Finalizing)
        );

        // Closing is refused mid-finalize
        assert!(matches!(
            screen.handle_key_event(key(KeyCode::Esc)),
            AppEvent::ShowStatus(_)
        ));
        assert!(screen.dialog.is_some());

        screen.dialog.as_mut().unwrap().wait_finalized().await.unwrap();
        assert!(matches!(
            screen.handle_key_event(key(KeyCode::Char('c'))),
            AppEvent::ShowSuccess(_)
        ));
        assert!(matches!(
            screen.handle_key_event(key(KeyCode::Char('p'))),
            AppEvent::ShowSuccess(_)
        ));
        assert!(temp_dir.path().join("order_1092-09.csv").exists());
        assert!(temp_dir.path().join("order_1092-09.pdf").exists());

        assert!(matches!(
            screen.handle_key_event(key(KeyCode::Enter)),
            AppEvent::SessionFinished
        ));
    }

    #[tokio::test]
    async fn test_tick_completes_finalize() {
        let mut screen = screen(false, PathBuf::from("unused"));
        fill_names(&mut screen, 5);
        screen.handle_key_event(key(KeyCode::F(2)));
        screen.handle_key_event(key(KeyCode::Char(' ')));
        screen.handle_key_event(key(KeyCode::Enter));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(matches!(screen.tick(), AppEvent::ShowSuccess(_)));
        assert_eq!(
            screen.dialog.as_ref().map(|d| d.state()),
            Some(ReviewState::Completed)
        );
    }
}
