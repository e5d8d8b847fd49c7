//! Action enum — user-initiated intents dispatched by the App.

/// Unique identifier for a focusable pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    TodayBoard,
    RequestList,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── Board ────────────────────────────────────────────────────────────────
    /// Delete the past request with this row id (optimistic, with rollback).
    Cancel(i64),
    /// Re-run the two load queries.
    Reload,

    // ── System ───────────────────────────────────────────────────────────────
    CopyToClipboard(String),
    Quit,
}
