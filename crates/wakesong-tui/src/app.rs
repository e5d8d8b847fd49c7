//! App — component-based event loop for the board.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background
//!   tasks: the input reader, the two load tasks, and the delete task.
//! - Components return `Vec<Action>`; the App dispatches each Action.
//! - The two load queries are independent and unordered; they publish into
//!   disjoint state slots, so completion order never matters.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use wakesong_core::backend::Backend;
use wakesong_core::board::DeleteSnapshot;
use wakesong_core::model::{today_range, EnrichedSong};
use wakesong_core::video::{enrich, VideoLookup};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{header::Header, request_list::RequestList, today_board::TodayBoard},
    focus::FocusRing,
    theme,
    widgets::toast::{Severity, ToastManager},
};

const HEADER_HEIGHT: u16 = 1;
// Two 2-line slots inside the pane borders.
const TODAY_PANE_HEIGHT: u16 = 6;

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    /// Today load finished; enriched rows, at most the two slots.
    TodayLoaded(Vec<EnrichedSong>),
    /// Past load finished; enriched rows, most-recent-id first.
    PastLoaded(Vec<EnrichedSong>),
    /// The backend delete settled; `error` carries the failure, if any.
    DeleteSettled { id: i64, error: Option<String> },
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    state: AppState,

    header: Header,
    today_board: TodayBoard,
    request_list: RequestList,
    focus: FocusRing,
    toast: ToastManager,

    backend: Backend,
    lookup: VideoLookup,

    /// Snapshot for the delete currently in flight, if any.
    delete_snapshot: Option<DeleteSnapshot>,

    should_quit: bool,
}

impl App {
    pub fn new(backend: Backend, lookup: VideoLookup, requester: String) -> Self {
        let mut focus = FocusRing::new(vec![ComponentId::TodayBoard, ComponentId::RequestList]);
        focus.set(ComponentId::RequestList);

        Self {
            state: AppState::new(requester),
            header: Header::new(),
            today_board: TodayBoard::new(),
            request_list: RequestList::new(),
            focus,
            toast: ToastManager::new(),
            backend,
            lookup,
            delete_snapshot: None,
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Initial load ──────────────────────────────────────────────────────
        self.spawn_loads(&tx);

        // Toast expiry check + spinner animation.
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg, &tx);
                }
                _ = toast_tick.tick() => {
                    if !self.toast.is_empty() {
                        self.toast.tick();
                        needs_redraw = true;
                    }
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Message handling ──────────────────────────────────────────────────────

    /// Returns true when the screen needs a redraw.
    fn handle_message(&mut self, msg: AppMessage, tx: &mpsc::Sender<AppMessage>) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => self.handle_key(key, tx),
            AppMessage::Event(Event::Resize(_, _)) => true,
            AppMessage::Event(_) => false,

            AppMessage::TodayLoaded(songs) => {
                debug!("[today] published {} row(s)", songs.len());
                self.state.board.publish_today(songs);
                self.state.today_loaded = true;
                true
            }

            AppMessage::PastLoaded(songs) => {
                debug!("[past] published {} request(s)", songs.len());
                self.state.board.publish_past(songs);
                self.state.past_loaded = true;
                true
            }

            AppMessage::DeleteSettled { id, error } => {
                let Some(snapshot) = self.delete_snapshot.take() else {
                    return false;
                };
                match error {
                    None => {
                        debug!("[delete] id {id} confirmed");
                        self.state.board.settle_delete(snapshot, true);
                        self.toast.dismiss_spinner();
                    }
                    Some(e) => {
                        error!("[delete] id {id} failed: {e}");
                        self.state.board.settle_delete(snapshot, false);
                        self.toast.resolve_spinner(
                            Severity::Error,
                            "delete failed: request restored",
                            Duration::from_secs(5),
                        );
                    }
                }
                true
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, tx: &mpsc::Sender<AppMessage>) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }

        // Global keys first.
        let global = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Quit)
            }
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::BackTab => Some(Action::FocusPrev),
            KeyCode::Char('1') => Some(Action::FocusPane(ComponentId::TodayBoard)),
            KeyCode::Char('2') => Some(Action::FocusPane(ComponentId::RequestList)),
            _ => None,
        };
        if let Some(action) = global {
            self.dispatch(action, tx);
            return true;
        }

        let actions = match self.focus.current() {
            Some(ComponentId::TodayBoard) => self.today_board.handle_key(key, &self.state),
            Some(ComponentId::RequestList) => self.request_list.handle_key(key, &self.state),
            None => Vec::new(),
        };
        for action in actions {
            self.dispatch(action, tx);
        }
        true
    }

    fn dispatch(&mut self, action: Action, tx: &mpsc::Sender<AppMessage>) {
        match action {
            Action::FocusNext => {
                self.focus.next();
            }
            Action::FocusPrev => {
                self.focus.prev();
            }
            Action::FocusPane(id) => self.focus.set(id),

            Action::Reload => {
                info!("reloading board");
                self.spawn_loads(tx);
            }

            Action::Cancel(id) => self.start_delete(id, tx),

            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        // Truncate for toast display
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text
                        };
                        self.toast.success(format!("copied: {display}"));
                    }
                    Err(e) => {
                        warn!("clipboard error: {e}");
                        self.toast.error(format!("clipboard error: {e}"));
                    }
                }
            }

            Action::Quit => self.should_quit = true,
        }
    }

    // ── Background work ───────────────────────────────────────────────────────

    /// Fire the two independent queries. Each publishes into its own state
    /// slot; on failure it logs and leaves the previous state untouched — no
    /// user-visible error surface, no retry.
    fn spawn_loads(&self, tx: &mpsc::Sender<AppMessage>) {
        let backend = self.backend.clone();
        let lookup = self.lookup.clone();
        let today_tx = tx.clone();
        tokio::spawn(async move {
            let range = today_range();
            match backend.today_songs(&range).await {
                Ok(rows) => {
                    let songs = enrich(&lookup, rows, true).await;
                    let _ = today_tx.send(AppMessage::TodayLoaded(songs)).await;
                }
                Err(e) => error!("[today] query failed: {e:#}"),
            }
        });

        let backend = self.backend.clone();
        let lookup = self.lookup.clone();
        let requester = self.state.requester.clone();
        let past_tx = tx.clone();
        tokio::spawn(async move {
            match backend.past_songs(&requester).await {
                Ok(rows) => {
                    let songs = enrich(&lookup, rows, false).await;
                    let _ = past_tx.send(AppMessage::PastLoaded(songs)).await;
                }
                Err(e) => error!("[past] query failed: {e:#}"),
            }
        });
    }

    /// Optimistically remove the row, then let the backend confirm or refuse.
    fn start_delete(&mut self, id: i64, tx: &mpsc::Sender<AppMessage>) {
        let Some(snapshot) = self.state.board.begin_delete(id) else {
            return; // a delete is already pending, or the row is gone
        };
        self.delete_snapshot = Some(snapshot);
        self.toast.spinner("deleting request…");

        let backend = self.backend.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let error = backend.delete_song(id).await.err().map(|e| format!("{e:#}"));
            let _ = tx.send(AppMessage::DeleteSettled { id, error }).await;
        });
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(TODAY_PANE_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        self.header.draw(frame, rows[0], &self.state);
        self.today_board.draw(
            frame,
            rows[1],
            self.focus.is_focused(ComponentId::TodayBoard),
            &self.state,
        );
        self.request_list.draw(
            frame,
            rows[2],
            self.focus.is_focused(ComponentId::RequestList),
            &self.state,
        );
        self.draw_hints(frame, rows[3]);

        self.toast.draw(frame, area);
    }

    fn draw_hints(&self, frame: &mut Frame, area: Rect) {
        let hints = " j/k move · d delete · y copy url · r reload · tab pane · q quit";
        frame.render_widget(
            Paragraph::new(Span::styled(hints, theme::style_muted())),
            area,
        );
    }
}
