use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::viewer::ViewerState;

pub const CONTROLS_HELP: &str =
    "m/space=marker  tab=select  d/backspace=delete  esc=unselect  ←/→=jog  shift+←/→=fast  ↑/↓=zoom  q=quit";

pub struct StatusSnapshot {
    pub text: String,
}

pub struct StatusArgs<'a> {
    pub file: &'a str,
    pub state: &'a ViewerState,
}

pub fn status_text(args: StatusArgs<'_>) -> StatusSnapshot {
    let state = args.state;
    let mut text = format!(
        "File: {} | Duration: {:.2}s | Viewing: {:.2}s - {:.2}s ({:.2}s) | Markers: {}",
        args.file,
        state.total_duration,
        state.start,
        state.end,
        state.span(),
        state.markers.len()
    );
    if let Some(time) = state.selected_time() {
        text.push_str(&format!(" | Selected: {:.3}s", time));
    }

    StatusSnapshot { text }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    Quit,
    AddMarker,
    CycleSelection,
    Deselect,
    DeleteSelected,
    Jog(i8),
    JogFast(i8),
    ZoomIn,
    ZoomOut,
}

pub fn action_for(key: KeyEvent) -> Option<ViewerAction> {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Char('q') => Some(ViewerAction::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ViewerAction::Quit)
        }
        KeyCode::Char('m') | KeyCode::Char(' ') => Some(ViewerAction::AddMarker),
        KeyCode::Tab => Some(ViewerAction::CycleSelection),
        KeyCode::Esc => Some(ViewerAction::Deselect),
        KeyCode::Char('d') | KeyCode::Backspace => Some(ViewerAction::DeleteSelected),
        KeyCode::Left if shift => Some(ViewerAction::JogFast(-1)),
        KeyCode::Right if shift => Some(ViewerAction::JogFast(1)),
        KeyCode::Left => Some(ViewerAction::Jog(-1)),
        KeyCode::Right => Some(ViewerAction::Jog(1)),
        KeyCode::Up => Some(ViewerAction::ZoomIn),
        KeyCode::Down => Some(ViewerAction::ZoomOut),
        _ => None,
    }
}

/// Apply `action`; returns false once the viewer should exit.
pub fn apply(state: &mut ViewerState, action: ViewerAction) -> bool {
    match action {
        ViewerAction::Quit => return false,
        ViewerAction::AddMarker => state.add_marker(),
        ViewerAction::CycleSelection => state.cycle_selection(),
        ViewerAction::Deselect => state.deselect(),
        ViewerAction::DeleteSelected => state.delete_selected(),
        ViewerAction::Jog(direction) => state.jog(f64::from(direction)),
        ViewerAction::JogFast(direction) => state.jog_fast(f64::from(direction)),
        ViewerAction::ZoomIn => state.zoom_in(),
        ViewerAction::ZoomOut => state.zoom_out(),
    }
    true
}

pub fn handle_key_event(state: &mut ViewerState) -> bool {
    if event::poll(Duration::from_millis(100)).unwrap_or(false) {
        if let Ok(Event::Key(key)) = event::read() {
            if key.kind != KeyEventKind::Press {
                return true;
            }
            if let Some(action) = action_for(key) {
                return apply(state, action);
            }
        }
    }

    true
}
