//! # Key Bindings
//!
//! Maps terminal key presses onto controller [`Command`]s. The mapping
//! depends on the state: the history panel, the search box and the editor
//! each capture keys before the global bindings.
//!
//! | Context | Keys |
//! |---------|------|
//! | Anywhere | `Ctrl+S` save, `Esc` back out, `Ctrl+C` quit |
//! | Editor | typing, `Enter`, `Backspace`, `Delete`, arrows, `Home`, `End`, `Ctrl+D` discard, `Tab` leave editor |
//! | History | `j`/`k` move, `Enter` show diff, `q` close |
//! | Search | typing filters, `Enter` done |
//! | Otherwise | `j`/`k` move, `Enter` open, `e`/`v` edit/view, `h` history, `s` save, `d` download, `r` reload, `/` search, `PgUp`/`PgDn` scroll, `q` quit |

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::ui::app::{AppState, Focus, View};
use crate::ui::controller::Command;
use crate::ui::editor::EditOp;

pub fn map_key(state: &AppState, key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('s') if ctrl => return Some(Command::SaveShortcut),
        KeyCode::Char('c') if ctrl => return Some(Command::Quit),
        KeyCode::Esc => return Some(Command::Escape),
        _ => {}
    }

    if state.history_open {
        return history_key(key);
    }
    if state.nav.focus == Focus::Search && matches!(state.view, View::Packages(_)) {
        return search_key(state, key);
    }
    if state.edit_mode && state.nav.focus == Focus::Content {
        return editor_key(key, ctrl);
    }
    if ctrl {
        return None;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(Command::MoveDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Command::MoveUp),
        KeyCode::Enter => Some(Command::Activate),
        KeyCode::Tab => Some(Command::ToggleFocus),
        KeyCode::Char('e') => Some(Command::SetEditMode(true)),
        KeyCode::Char('v') => Some(Command::SetEditMode(false)),
        KeyCode::Char('h') => Some(Command::OpenHistory),
        KeyCode::Char('s') => Some(Command::Save),
        KeyCode::Char('d') => Some(Command::Download),
        KeyCode::Char('r') => Some(Command::Reload),
        KeyCode::Char('/') if matches!(state.view, View::Packages(_)) => {
            Some(Command::Focus(Focus::Search))
        }
        KeyCode::PageUp => Some(Command::ScrollUp),
        KeyCode::PageDown => Some(Command::ScrollDown),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

fn history_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(Command::MoveDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Command::MoveUp),
        KeyCode::Enter => Some(Command::Activate),
        KeyCode::Char('q') => Some(Command::CloseHistory),
        _ => None,
    }
}

fn search_key(state: &AppState, key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char(c) => {
            let mut query = state.package_query.clone();
            query.push(c);
            Some(Command::Search(query))
        }
        KeyCode::Backspace => {
            let mut query = state.package_query.clone();
            query.pop()?;
            Some(Command::Search(query))
        }
        KeyCode::Enter => Some(Command::Focus(Focus::Sidebar)),
        _ => None,
    }
}

fn editor_key(key: KeyEvent, ctrl: bool) -> Option<Command> {
    let op = match key.code {
        KeyCode::Char('d') if ctrl => return Some(Command::Discard),
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Tab => return Some(Command::ToggleFocus),
        KeyCode::Char(c) => EditOp::Insert(c),
        KeyCode::Enter => EditOp::Newline,
        KeyCode::Backspace => EditOp::Backspace,
        KeyCode::Delete => EditOp::Delete,
        KeyCode::Left => EditOp::Left,
        KeyCode::Right => EditOp::Right,
        KeyCode::Up => EditOp::Up,
        KeyCode::Down => EditOp::Down,
        KeyCode::Home => EditOp::Home,
        KeyCode::End => EditOp::End,
        _ => return None,
    };
    Some(Command::Edit(op))
}
