//! Intake screen: order number, layout number, customer and numbering flag

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;

use crate::{
    intake::{self, IntakeField},
    models::{Handoff, IntakeValues, RosterRow},
    wizard::{
        components::{FormField, FormFieldType},
        events::AppEvent,
        ui::Styles,
    },
};

/// Intake screen state
pub struct IntakeScreen {
    pub current_field: usize,
    pub fields: Vec<IntakeField>,
    pub inputs: Vec<FormField>,
    /// Rows carried back from the roster editor, handed over again on submit
    pub saved_rows: Option<Vec<RosterRow>>,
}

impl IntakeScreen {
    pub fn new() -> Self {
        Self::with_values(&IntakeValues::default(), None)
    }

    /// Re-enter the form from a back-navigation handoff
    pub fn from_handoff(handoff: Handoff) -> Self {
        Self::with_values(&handoff.values, handoff.saved_rows)
    }

    fn with_values(values: &IntakeValues, saved_rows: Option<Vec<RosterRow>>) -> Self {
        let fields = IntakeField::ALL.to_vec();
        let inputs = fields
            .iter()
            .map(|field| match field {
                IntakeField::HasNumbering => FormField::new(field.label(), FormFieldType::Checkbox)
                    .with_checked(values.has_numbering),
                IntakeField::OrderNumber => text_input(*field, &values.order_number),
                IntakeField::LayoutNumber => text_input(*field, &values.layout_number),
                IntakeField::CustomerName => text_input(*field, &values.customer_name),
                IntakeField::CustomerEmail => text_input(*field, &values.customer_email),
            })
            .collect();

        let mut screen = Self {
            current_field: 0,
            fields,
            inputs,
            saved_rows,
        };
        screen.update_field_focus();
        screen
    }

    /// Current form values as typed
    pub fn values(&self) -> IntakeValues {
        IntakeValues {
            order_number: self.input(IntakeField::OrderNumber).value.clone(),
            layout_number: self.input(IntakeField::LayoutNumber).value.clone(),
            customer_name: self.input(IntakeField::CustomerName).value.clone(),
            has_numbering: self.input(IntakeField::HasNumbering).checked,
            customer_email: self.input(IntakeField::CustomerEmail).value.clone(),
        }
    }

    fn input(&self, field: IntakeField) -> &FormField {
        let index = self.fields.iter().position(|f| *f == field).unwrap_or(0);
        &self.inputs[index]
    }

    /// Handle key events for the intake screen
    pub fn handle_key_event(&mut self, key: KeyEvent) -> AppEvent {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.blur_current();
                self.current_field = (self.current_field + 1) % self.fields.len();
                self.update_field_focus();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.blur_current();
                self.current_field = if self.current_field == 0 {
                    self.fields.len() - 1
                } else {
                    self.current_field - 1
                };
                self.update_field_focus();
            }
            KeyCode::Enter => return self.submit(),
            KeyCode::Char(c) => self.inputs[self.current_field].insert_char(c),
            KeyCode::Backspace => self.inputs[self.current_field].delete_char(),
            KeyCode::Delete => self.inputs[self.current_field].delete_char_forward(),
            KeyCode::Left => self.inputs[self.current_field].move_cursor_left(),
            KeyCode::Right => self.inputs[self.current_field].move_cursor_right(),
            KeyCode::Home => self.inputs[self.current_field].move_cursor_to_start(),
            KeyCode::End => self.inputs[self.current_field].move_cursor_to_end(),
            _ => {}
        }
        AppEvent::None
    }

    /// Validate the field losing focus
    fn blur_current(&mut self) {
        let field = self.fields[self.current_field];
        let error = intake::validate_field(&self.values(), field);
        debug!("Blur on {:?}: {:?}", field, error);
        self.inputs[self.current_field].validation_error = error;
    }

    /// Validate every field; navigate only when all pass
    pub fn submit(&mut self) -> AppEvent {
        match intake::validate(&self.values()) {
            Ok(metadata) => {
                for input in &mut self.inputs {
                    input.validation_error = None;
                }
                AppEvent::IntakeSubmitted(metadata)
            }
            Err(errors) => {
                for (i, field) in self.fields.iter().enumerate() {
                    self.inputs[i].validation_error = errors.get(*field).map(str::to_string);
                }
                if let Some(first) = self.fields.iter().position(|f| errors.get(*f).is_some()) {
                    self.current_field = first;
                    self.update_field_focus();
                }
                AppEvent::ShowError(format!("Corrija os campos destacados ({})", errors.len()))
            }
        }
    }

    pub fn update_field_focus(&mut self) {
        for (i, input) in self.inputs.iter_mut().enumerate() {
            input.set_focus(i == self.current_field);
        }
    }

    /// Draw the intake screen
    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        let mut constraints = vec![Constraint::Length(3)];
        constraints.extend(self.inputs.iter().map(|_| Constraint::Length(3)));
        constraints.push(Constraint::Min(0));
        constraints.push(Constraint::Length(4));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let subtitle = if self.saved_rows.is_some() {
            "Mini Cadastro - lista de nomes em andamento"
        } else {
            "Mini Cadastro - preencha as informações básicas do pedido"
        };
        let title = Paragraph::new(subtitle)
            .style(Styles::title())
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, chunks[0]);

        for (i, input) in self.inputs.iter().enumerate() {
            input.render(f, chunks[i + 1]);
        }

        let instructions = vec![
            Line::from("Tab/Shift+Tab ou ↑/↓: Campos | Espaço: Marcar numeração"),
            Line::from("Enter: Próximo | Ctrl+C: Sair | F1: Ajuda"),
        ];
        let instructions_widget = Paragraph::new(instructions)
            .style(Styles::info())
            .block(Block::default()
                .title("Instruções")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()));
        f.render_widget(instructions_widget, chunks[chunks.len() - 1]);
    }
}

impl Default for IntakeScreen {
    fn default() -> Self {
        Self::new()
    }
}

fn text_input(field: IntakeField, value: &str) -> FormField {
    FormField::new(field.label(), FormFieldType::Text)
        .with_placeholder(field.placeholder())
        .with_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(screen: &mut IntakeScreen, code: KeyCode) -> AppEvent {
        screen.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(screen: &mut IntakeScreen, text: &str) {
        for c in text.chars() {
            press(screen, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_blur_flags_empty_required_field() {
        let mut screen = IntakeScreen::new();
        press(&mut screen, KeyCode::Tab);
        assert_eq!(
            screen.inputs[0].validation_error.as_deref(),
            Some("Precisamos do número do pedido")
        );
        assert!(screen.inputs[1].validation_error.is_none());
    }

    #[test]
    fn test_submit_blocked_until_valid() {
        let mut screen = IntakeScreen::new();
        assert!(matches!(press(&mut screen, KeyCode::Enter), AppEvent::ShowError(_)));

        screen.current_field = 0;
        type_text(&mut screen, "1092-09");
        press(&mut screen, KeyCode::Tab);
        type_text(&mut screen, "77");
        press(&mut screen, KeyCode::Tab);
        type_text(&mut screen, "Ana Silva");
        press(&mut screen, KeyCode::Tab);
        press(&mut screen, KeyCode::Tab);
        type_text(&mut screen, " ");

        match press(&mut screen, KeyCode::Enter) {
            AppEvent::IntakeSubmitted(metadata) => {
                assert_eq!(metadata.order_number, "1092-09");
                assert_eq!(metadata.customer_name, "Ana Silva");
                assert!(metadata.has_numbering);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_handoff_prefills_form() {
        let handoff = Handoff {
            values: IntakeValues {
                order_number: "5".to_string(),
                layout_number: "6".to_string(),
                customer_name: "Bia".to_string(),
                has_numbering: true,
                customer_email: String::new(),
            },
            saved_rows: Some(Vec::new()),
        };
        let screen = IntakeScreen::from_handoff(handoff.clone());
        assert_eq!(screen.values(), handoff.values);
        assert!(screen.saved_rows.is_some());
    }
}
