//! Status display component for showing messages and progress

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::wizard::ui::Styles;

/// Types of status messages
#[derive(Debug, Clone, PartialEq)]
pub enum StatusType {
    Info,
    Success,
    Error,
}

/// Status message with type and content
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub status_type: StatusType,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl StatusMessage {
    pub fn new(message: String, status_type: StatusType) -> Self {
        Self {
            message,
            status_type,
            timestamp: chrono::Local::now(),
        }
    }
}

/// Status bar at the bottom of every screen
pub struct StatusDisplay {
    pub current_message: Option<StatusMessage>,
    pub auto_clear_timeout: Option<std::time::Duration>,
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self {
            current_message: None,
            auto_clear_timeout: Some(std::time::Duration::from_secs(8)),
        }
    }
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_clear(mut self, timeout: std::time::Duration) -> Self {
        self.auto_clear_timeout = Some(timeout);
        self
    }

    pub fn set_info(&mut self, message: String) {
        self.current_message = Some(StatusMessage::new(message, StatusType::Info));
    }

    pub fn set_success(&mut self, message: String) {
        self.current_message = Some(StatusMessage::new(message, StatusType::Success));
    }

    pub fn set_error(&mut self, message: String) {
        self.current_message = Some(StatusMessage::new(message, StatusType::Error));
    }

    pub fn clear(&mut self) {
        self.current_message = None;
    }

    /// Check if the current message has outlived the auto-clear timeout
    pub fn should_auto_clear(&self) -> bool {
        if let (Some(timeout), Some(message)) = (self.auto_clear_timeout, &self.current_message) {
            // Errors stay until replaced
            if message.status_type == StatusType::Error {
                return false;
            }
            let elapsed = chrono::Local::now().signed_duration_since(message.timestamp);
            return elapsed.to_std().unwrap_or_default() > timeout;
        }
        false
    }

    /// Render with the given fallback text when no message is set
    pub fn render(&self, f: &mut Frame, area: Rect, fallback: &str) {
        let (content, style) = match &self.current_message {
            Some(message) => {
                let prefix = match message.status_type {
                    StatusType::Info => "ℹ",
                    StatusType::Success => "✓",
                    StatusType::Error => "✗",
                };
                let style = match message.status_type {
                    StatusType::Info => Styles::info(),
                    StatusType::Success => Styles::success(),
                    StatusType::Error => Styles::error(),
                };
                (
                    format!(
                        "{} [{}] {}",
                        prefix,
                        message.timestamp.format("%H:%M:%S"),
                        message.message
                    ),
                    style,
                )
            }
            None => (fallback.to_string(), Styles::inactive()),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        let paragraph = Paragraph::new(content)
            .style(style)
            .block(block);

        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_are_not_auto_cleared() {
        let mut status = StatusDisplay::new().with_auto_clear(std::time::Duration::ZERO);
        status.set_error("boom".to_string());
        assert!(!status.should_auto_clear());

        status.set_info("ok".to_string());
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(status.should_auto_clear());
    }
}
