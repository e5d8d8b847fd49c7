//! AppState — shared read-only data passed to components during render/event.
//!
//! Components read this, but never mutate it. The App event loop is the only
//! writer.

use wakesong_core::board::BoardState;

pub struct AppState {
    /// Board view state: today slots, past list, pending delete.
    pub board: BoardState,
    /// Identity whose requests fill the past list.
    pub requester: String,
    /// True once the first today publish landed.
    pub today_loaded: bool,
    /// True once the first past publish landed.
    pub past_loaded: bool,
}

impl AppState {
    pub fn new(requester: String) -> Self {
        Self {
            board: BoardState::new(),
            requester,
            today_loaded: false,
            past_loaded: false,
        }
    }
}
