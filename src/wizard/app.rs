//! Main TUI application state and logic

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::{debug, info, warn};

use super::components::StatusDisplay;
use super::events::AppEvent;
use super::screens::{IntakeScreen, RosterScreen};
use super::ui::{centered_rect, Styles};
use crate::config::Config;
use crate::models::{Handoff, OrderMetadata};

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Intake,
    Roster,
}

/// Main TUI application state
pub struct App {
    /// Current active screen
    pub current_screen: Screen,
    /// Application configuration
    pub config: Config,

    // Screen states
    pub intake: IntakeScreen,
    /// Present only while an order is being edited
    pub roster: Option<RosterScreen>,

    // Global application state
    pub should_quit: bool,
    pub show_help_popup: bool,
    /// Blocking alert; every key except Enter/Esc is swallowed while set
    pub alert: Option<String>,
    pub status: StatusDisplay,
}

impl App {
    /// Create a new TUI application
    pub fn new(config: Config) -> Self {
        Self {
            current_screen: Screen::Intake,
            config,
            intake: IntakeScreen::new(),
            roster: None,
            should_quit: false,
            show_help_popup: false,
            alert: None,
            status: StatusDisplay::new(),
        }
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.status
            .set_info("Preencha os dados do pedido para começar".to_string());

        loop {
            terminal
                .draw(|f| self.draw(f))
                .context("Failed to draw frame")?;

            if crossterm::event::poll(self.config.tick_rate())? {
                if let Event::Key(key) = crossterm::event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
            self.tick();

            if self.should_quit {
                break;
            }
        }

        if let Some(roster) = self.roster.take() {
            info!(
                "Quitting with order {} still open ({} rows discarded)",
                roster.metadata.order_number,
                roster.roster.len()
            );
        }
        Ok(())
    }

    /// Periodic work between key events
    pub fn tick(&mut self) {
        if self.status.should_auto_clear() {
            self.status.clear();
        }
        if let Some(roster) = self.roster.as_mut() {
            let event = roster.tick();
            self.apply_event(event);
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        // Global shortcuts
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return;
        }

        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return;
        }

        match key.code {
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return;
            }
            KeyCode::Esc if self.show_help_popup => {
                self.show_help_popup = false;
                return;
            }
            _ => {}
        }
        if self.show_help_popup {
            return;
        }

        let event = match self.current_screen {
            Screen::Intake => self.intake.handle_key_event(key),
            Screen::Roster => match self.roster.as_mut() {
                Some(roster) => roster.handle_key_event(key),
                None => AppEvent::None,
            },
        };
        self.apply_event(event);
    }

    /// Act on an event raised by a screen
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::None => {}
            AppEvent::IntakeSubmitted(metadata) => self.open_roster(metadata),
            AppEvent::NavigateBack(handoff) => {
                debug!("Back-navigation handoff: {}", handoff_json(&handoff));
                self.roster = None;
                self.intake = IntakeScreen::from_handoff(handoff);
                self.navigate_to_screen(Screen::Intake);
            }
            AppEvent::SessionFinished => {
                info!("Session finished; starting a new order");
                self.roster = None;
                self.intake = IntakeScreen::new();
                self.navigate_to_screen(Screen::Intake);
                self.status
                    .set_success("Pedido concluído. Pronto para um novo cadastro".to_string());
            }
            AppEvent::Alert(message) => {
                warn!("Alert: {}", message);
                self.alert = Some(message);
            }
            AppEvent::ShowStatus(message) => self.status.set_info(message),
            AppEvent::ShowSuccess(message) => self.status.set_success(message),
            AppEvent::ShowError(message) => self.status.set_error(message),
        }
    }

    fn open_roster(&mut self, metadata: OrderMetadata) {
        let handoff = Handoff {
            values: (&metadata).into(),
            saved_rows: self.intake.saved_rows.take(),
        };
        debug!("Intake handoff: {}", handoff_json(&handoff));
        info!(
            "Opening roster for order {} (layout {}, numbering: {})",
            metadata.order_number, metadata.layout_number, metadata.has_numbering
        );

        self.roster = Some(RosterScreen::new(metadata, handoff.saved_rows, &self.config));
        self.navigate_to_screen(Screen::Roster);
    }

    /// Navigate to a specific screen
    pub fn navigate_to_screen(&mut self, screen: Screen) {
        self.current_screen = screen;
        self.show_help_popup = false;
        self.status.clear();
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        // Main layout: status bar at bottom, content area above
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        match self.current_screen {
            Screen::Intake => self.intake.draw(f, chunks[0]),
            Screen::Roster => {
                if let Some(roster) = self.roster.as_mut() {
                    roster.draw(f, chunks[0]);
                }
            }
        }

        let fallback = match self.current_screen {
            Screen::Intake => "Mini Cadastro | Ctrl+C: Sair | F1: Ajuda",
            Screen::Roster => "Lista de Nomes | Esc: Voltar | Ctrl+C: Sair | F1: Ajuda",
        };
        self.status.render(f, chunks[1], fallback);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
        if let Some(message) = self.alert.as_deref() {
            draw_alert(f, size, message);
        }
    }

    /// Draw help popup with context-sensitive shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 60, area);
        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(self.context_help())
            .block(
                Block::default()
                    .title("Ajuda - Atalhos")
                    .borders(Borders::ALL)
                    .border_style(Styles::warning()),
            )
            .style(Styles::default());
        f.render_widget(help_popup, popup_area);
    }

    fn context_help(&self) -> String {
        let global_help = "Atalhos globais:\n\
            Ctrl+C / Ctrl+Q - Sair\n\
            F1 - Mostrar/ocultar esta ajuda\n\n";

        let screen_help = match self.current_screen {
            Screen::Intake => {
                "Mini Cadastro:\n\
                Tab / ↓ - Próximo campo\n\
                Shift+Tab / ↑ - Campo anterior\n\
                Espaço - Marcar numeração\n\
                Enter - Validar e avançar"
            }
            Screen::Roster => {
                "Lista de Nomes:\n\
                ↑/↓ - Linhas, Tab/←/→ - Colunas\n\
                Enter/Espaço - Escolher tamanho ou posição\n\
                Ctrl+N - Nova linha, Ctrl+D - Remover linha\n\
                Ctrl+L - Limpar lista\n\
                F2 / Ctrl+S - Concluir e revisar\n\
                Esc - Voltar ao cadastro"
            }
        };

        format!("{}{}", global_help, screen_help)
    }
}

fn draw_alert(f: &mut Frame, area: Rect, message: &str) {
    let popup_area = centered_rect(50, 25, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from("Enter: OK"),
    ];
    let alert = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Styles::default())
        .block(
            Block::default()
                .title("Atenção")
                .borders(Borders::ALL)
                .border_style(Styles::error()),
        );
    f.render_widget(alert, popup_area);
}

fn handoff_json(handoff: &Handoff) -> String {
    serde_json::to_string(handoff).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}
