//! TodayBoard — the day's scheduled songs, fixed at two slots.
//!
//! Empty slots render explicitly so the pane always shows two rows.
//!
//! Keybindings (when focused):
//!   j/k ↑↓   — move between the two slots
//!   y        — copy the selected slot's video URL
//!   r        — reload both panes

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use wakesong_core::board::TODAY_SLOTS;
use wakesong_core::model::EnrichedSong;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_muted, style_secondary, style_selected_focused, C_BADGE_PENDING, C_NUMBER_HINT, C_PRIMARY},
    widgets::pane_chrome::{pane_chrome, Badge},
};

pub struct TodayBoard {
    selected: usize,
}

impl TodayBoard {
    pub fn new() -> Self {
        Self { selected: 0 }
    }

    fn selected_song<'a>(&self, state: &'a AppState) -> Option<&'a EnrichedSong> {
        state.board.today().get(self.selected)?.as_ref()
    }
}

impl Component for TodayBoard {
    fn id(&self) -> ComponentId {
        ComponentId::TodayBoard
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(TODAY_SLOTS - 1);
            }

            KeyCode::Char('y') => {
                if let Some(url) = self.selected_song(state).and_then(|s| s.request.url.clone()) {
                    return vec![Action::CopyToClipboard(url)];
                }
            }

            KeyCode::Char('r') => return vec![Action::Reload],

            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        if area.height == 0 {
            return;
        }

        let badge = (!state.today_loaded).then_some(Badge {
            text: "LOADING",
            color: C_BADGE_PENDING,
        });
        let block = pane_chrome("today's songs", Some('1'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = Vec::new();
        for (idx, slot) in state.board.today().iter().enumerate() {
            let is_selected = focused && idx == self.selected;
            let marker = Span::styled(format!(" {} ▸ ", idx + 1), Style::default().fg(C_NUMBER_HINT));

            match slot {
                Some(song) => {
                    let title_style = if is_selected {
                        style_selected_focused()
                    } else {
                        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
                    };
                    lines.push(Line::from(vec![
                        marker,
                        Span::styled(song.title.clone(), title_style),
                    ]));

                    let mut detail = vec![
                        Span::raw("     "),
                        Span::styled(song.request.name.clone(), style_secondary()),
                    ];
                    match song.thumbnail.as_deref() {
                        Some(thumb) => {
                            detail.push(Span::raw("  "));
                            detail.push(Span::styled(thumb.to_string(), style_muted()));
                        }
                        None => detail.push(Span::styled("  (no art)", style_muted())),
                    }
                    lines.push(Line::from(detail));
                }
                None => {
                    let style = if is_selected {
                        style_selected_focused()
                    } else {
                        style_muted()
                    };
                    lines.push(Line::from(vec![marker, Span::styled("still empty", style)]));
                    lines.push(Line::from(Span::styled(
                        "     waiting for a request…",
                        style_muted(),
                    )));
                }
            }
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
