//! RequestList — the requester's submitted songs, most-recent-id first.
//!
//! Each row shows:  MM/DD HH:MM  Title
//! While a delete is in flight its optimistic removal is already visible;
//! the spinner toast marks the operation busy and further deletes are held
//! off until the backend settles.
//!
//! Keybindings (when focused):
//!   j/k ↑↓   — navigate
//!   g/G      — first / last
//!   d/Del    — delete the selected request (optimistic, rolls back on failure)
//!   y        — copy the video URL
//!   r        — reload both panes

use chrono::{DateTime, Local, Utc};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use wakesong_core::model::EnrichedSong;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_muted, style_secondary, style_selected_focused, C_BADGE_PENDING, C_PRIMARY},
    widgets::pane_chrome::{pane_chrome, Badge},
};

pub struct RequestList {
    selected: usize,
    scroll_offset: usize,
}

impl RequestList {
    pub fn new() -> Self {
        Self {
            selected: 0,
            scroll_offset: 0,
        }
    }

    fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    fn select_down(&mut self, n: usize, max: usize) {
        self.selected = (self.selected + n).min(max.saturating_sub(1));
    }

    fn selected_song<'a>(&self, state: &'a AppState) -> Option<&'a EnrichedSong> {
        state.board.past().get(self.selected)
    }
}

impl Component for RequestList {
    fn id(&self) -> ComponentId {
        ComponentId::RequestList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        let total = state.board.past().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.select_down(1, total),
            KeyCode::PageUp => self.select_up(10),
            KeyCode::PageDown => self.select_down(10, total),
            KeyCode::Home | KeyCode::Char('g') => {
                self.selected = 0;
                self.scroll_offset = 0;
            }
            KeyCode::End | KeyCode::Char('G') => self.selected = total.saturating_sub(1),

            KeyCode::Char('d') | KeyCode::Delete => {
                // One delete at a time; the rest wait for the backend.
                if state.board.pending_delete().is_none() {
                    if let Some(song) = self.selected_song(state) {
                        return vec![Action::Cancel(song.request.id)];
                    }
                }
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

        let title = format!("requests · {}", state.requester);
        let badge = (!state.past_loaded).then_some(Badge {
            text: "LOADING",
            color: C_BADGE_PENDING,
        });
        let block = pane_chrome(&title, Some('2'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let songs = state.board.past();
        let total = songs.len();
        let height = inner.height as usize;

        if total == 0 {
            let msg = if state.past_loaded {
                "  no requests yet"
            } else {
                "  loading…"
            };
            frame.render_widget(Paragraph::new(Span::styled(msg, style_muted())), inner);
            return;
        }

        if self.selected >= total {
            self.selected = total - 1;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected.saturating_sub(height.saturating_sub(1));
        }

        let lines: Vec<Line> = songs
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(height)
            .map(|(idx, song)| {
                let is_selected = idx == self.selected;
                let row_style = if is_selected && focused {
                    style_selected_focused()
                } else if is_selected {
                    Style::default().fg(C_PRIMARY)
                } else {
                    style_secondary()
                };

                Line::from(vec![
                    Span::styled(format!(" {} ", format_ts(&song.request.date)), style_muted()),
                    Span::styled(song.title.clone(), row_style),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn format_ts(ts: &DateTime<Utc>) -> String {
    let local = ts.with_timezone(&Local);
    if local.date_naive() == Local::now().date_naive() {
        local.format("%H:%M").to_string()
    } else {
        local.format("%m/%d %H:%M").to_string()
    }
}
