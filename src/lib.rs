//! dotdash - a terminal dashboard for dotfiles
//!
//! This library holds the dashboard engine: syntax highlighting and diff
//! coloring, a typed client for the dashboard backend, and the view state
//! machine with its controller and projections.

pub mod api;
pub mod syntax;
pub mod ui;
