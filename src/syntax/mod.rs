//! # Syntax Module
//!
//! Display-only colorizing of config files and commit diffs.
//!
//! | Input | Entry point |
//! |-------|-------------|
//! | Config text + format tag | [`highlighter::highlight`], [`highlighter::lines`] |
//! | Unified diff text | [`diff::render_diff`], [`diff::classify`] |
//!
//! Both produce escaped markup with `<span class="...">` wrappers for web
//! hosts, and expose the underlying classification so the terminal renderer
//! can color the same runs.

pub mod diff;
pub mod highlighter;
pub mod rules;

pub use diff::{classify, classify_line, render_diff, DiffLineKind, NO_CHANGES};
pub use highlighter::{escape_html, gutter, highlight, line_count, lines, segments, Segment};
pub use rules::{rules_for, Token, FALLBACK_FORMAT};
