//! Component trait — the interface each board pane implements.
//!
//! Panes own their cursor state, read `AppState` for the data they don't
//! own, and emit `Action`s instead of mutating anything shared. The App
//! event loop dispatches those actions.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;

pub trait Component {
    /// Which pane is this?
    fn id(&self) -> ComponentId;

    /// Handle a key event. Only called when this pane has focus.
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action>;

    /// Render the pane into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState);
}
