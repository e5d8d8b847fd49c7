//! Header — single-row top bar: app title, today's date, requester identity.
//!
//! Not focusable; draws to a 1-row area.

use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app_state::AppState;
use crate::theme::{C_ACCENT, C_MUTED, C_PRIMARY, C_SECONDARY};

pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        if area.height == 0 {
            return;
        }
        let date = Local::now().format("%A %Y-%m-%d").to_string();
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled("♪ ", Style::default().fg(C_ACCENT)),
            Span::styled(
                "wakesong",
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {date}"), Style::default().fg(C_SECONDARY)),
            Span::styled(
                format!("  ·  requests by {}", state.requester),
                Style::default().fg(C_MUTED),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}
