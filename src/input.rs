// ABOUTME: Input mapping for the stepdeck application
// ABOUTME: Translates crossterm key and mouse events into viewer actions

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// Everything the viewer can be asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextStep,
    PrevStep,
    ToggleFullscreen,
    ExitFullscreen,
    FirstSlide,
    LastSlide,
    /// Jump to the first slide of chapter N (1-based)
    Chapter(usize),
    OpenOutline,
    CloseOverlay,
    ToggleHelp,
    ToggleControls,
    ScrollUp,
    ScrollDown,
    OutlineUp,
    OutlineDown,
    OutlineFirst,
    OutlineLast,
    OutlineSelect,
    Quit,
}

/// The parts of the viewer state that change what a key means
#[derive(Debug, Clone, Copy, Default)]
pub struct InputContext {
    pub outline_open: bool,
    pub help_open: bool,
    pub fullscreen: bool,
}

/// Map a key press to an action
pub fn map_key(event: KeyEvent, ctx: InputContext) -> Option<Action> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Quit),
            _ => None,
        };
    }

    if ctx.outline_open {
        return match event.code {
            KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => Some(Action::OutlineUp),
            KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => Some(Action::OutlineDown),
            KeyCode::Home => Some(Action::OutlineFirst),
            KeyCode::End => Some(Action::OutlineLast),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::OutlineSelect),
            KeyCode::Esc | KeyCode::Tab | KeyCode::Char('o') => Some(Action::CloseOverlay),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        };
    }

    if ctx.help_open {
        return match event.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') => Some(Action::CloseOverlay),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        };
    }

    match event.code {
        KeyCode::Right | KeyCode::Enter | KeyCode::PageDown | KeyCode::Char(' ') => {
            Some(Action::NextStep)
        }
        KeyCode::Left | KeyCode::Backspace | KeyCode::PageUp => Some(Action::PrevStep),
        KeyCode::Char('f') | KeyCode::Char('F') => Some(Action::ToggleFullscreen),
        KeyCode::Esc if ctx.fullscreen => Some(Action::ExitFullscreen),
        KeyCode::Home => Some(Action::FirstSlide),
        KeyCode::End => Some(Action::LastSlide),
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|n| Action::Chapter(n as usize)),
        KeyCode::Char('o') | KeyCode::Tab => Some(Action::OpenOutline),
        KeyCode::Char('?') | KeyCode::Char('h') => Some(Action::ToggleHelp),
        KeyCode::Char('c') => Some(Action::ToggleControls),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

/// Map a mouse event to an action.
///
/// Presses in the left `split` fraction of the content area go back, the rest
/// go forward. Rows at or below `content_height` belong to the control bar
/// and are ignored.
pub fn map_mouse(
    event: MouseEvent,
    ctx: InputContext,
    width: u16,
    content_height: u16,
    split: f32,
) -> Option<Action> {
    if ctx.outline_open || ctx.help_open {
        return None;
    }
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            click_action(event.column, event.row, width, content_height, split)
        }
        MouseEventKind::ScrollUp => Some(Action::ScrollUp),
        MouseEventKind::ScrollDown => Some(Action::ScrollDown),
        _ => None,
    }
}

fn click_action(column: u16, row: u16, width: u16, content_height: u16, split: f32) -> Option<Action> {
    if row >= content_height || width == 0 {
        return None;
    }
    if (column as f32) < (width as f32) * split {
        Some(Action::PrevStep)
    } else {
        Some(Action::NextStep)
    }
}
