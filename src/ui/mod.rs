//! # UI Module
//!
//! State, control and presentation of the dashboard.
//!
//! ## Components
//!
//! - [`AppState`] - the single state container and its view transitions
//! - [`Controller`] - routes [`Command`]s to state transitions and backend calls
//! - [`Document`] - markup projection of the state with change detection
//! - [`mod@render`] / [`Screen`] - the terminal front-end
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │  dotdash  Dotfiles Dashboard │ .zshrc [EDIT]     │
//! ├────────────────┬────────────────────────────────┤
//! │ .zshrc         │ dotfiles/.zshrc  Zsh · shell    │
//! │ .tmux.conf     ├────────────────────────────────┤
//! │ Formulae (42)  │  1 export PATH=...             │
//! │ Casks (12)     │  2 alias ll="ls -la"           │
//! │ Taps (3)       │                                │
//! ├────────────────┴────────────────────────────────┤
//! │ [Ctrl+S] Save  [Ctrl+D] Discard    Unsaved changes│
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! The history panel and the confirmation modal are drawn over the body.

pub mod app;
pub mod controller;
pub mod document;
pub mod editor;
pub mod format;
pub mod keys;
pub mod render;
pub mod screen;
pub mod settings;
pub mod theme;

pub use app::AppState;
pub use controller::{Command, Controller, FixedAnswer, Prompter};
pub use document::{Document, ElementId};
pub use keys::map_key;
pub use render::render;
pub use screen::{CrosstermEventReader, EventReader, Screen};
pub use settings::Settings;
