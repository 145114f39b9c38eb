//! # Highlight Rule Tables
//!
//! Ordered `(pattern, token)` rules per config format tag. Rule order is the
//! overlap policy: a span claimed by an earlier rule can never be re-claimed
//! by a later one, so comments and strings come first.
//!
//! | Tag | Used for |
//! |-----|----------|
//! | `shell`, `bash` | zsh / bash rc files |
//! | `toml` | starship, aerospace |
//! | `lua` | neovim `init.lua` |
//! | `vim` | `.vimrc` |
//! | `conf` | tmux and anything without a dedicated table (fallback) |
//! | `ruby` | `Brewfile` |
//!
//! A pattern may contain a capture group named `tok`; when it participates
//! in a match only that group is highlighted (used where a lookahead would
//! otherwise be needed, e.g. TOML keys before `=`).

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// Format tag whose rule table is used when a tag is unknown.
pub const FALLBACK_FORMAT: &str = "conf";

/// Token classes produced by the highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Comment,
    String,
    Keyword,
    Variable,
    Number,
    Section,
    Boolean,
    Property,
}

impl Token {
    /// CSS class used when the token is wrapped in a `<span>`.
    pub fn css_class(self) -> &'static str {
        match self {
            Token::Comment => "hl-comment",
            Token::String => "hl-string",
            Token::Keyword => "hl-keyword",
            Token::Variable => "hl-variable",
            Token::Number => "hl-number",
            Token::Section => "hl-section",
            Token::Boolean => "hl-boolean",
            Token::Property => "hl-property",
        }
    }
}

/// A compiled highlight rule.
#[derive(Debug)]
pub struct Rule {
    pub pattern: Regex,
    pub token: Token,
}

const STRING: &str = r#""(?:\\.|[^"\\])*"|'(?:\\.|[^'\\])*'"#;

const SHELL: &[(&str, Token)] = &[
    (r"#.*", Token::Comment),
    (STRING, Token::String),
    (
        r"\b(if|then|else|elif|fi|for|do|done|while|case|esac|function|export|alias|source|local|return|in)\b",
        Token::Keyword,
    ),
    (r"\$\{?\w+\}?", Token::Variable),
    (r"\b\d+\b", Token::Number),
];

const TOML: &[(&str, Token)] = &[
    (r"#.*", Token::Comment),
    (r"(?m)^[ \t]*\[\[?[\w.\-]+\]\]?", Token::Section),
    (STRING, Token::String),
    (r"\b(true|false)\b", Token::Boolean),
    (r"\b\d+\.?\d*\b", Token::Number),
    (r"(?m)^(?P<tok>[\w\-]+)[ \t]*=", Token::Property),
];

const LUA: &[(&str, Token)] = &[
    (r"(?s)--\[\[.*?\]\]", Token::Comment),
    (r"--.*", Token::Comment),
    (STRING, Token::String),
    (
        r"\b(local|function|end|if|then|else|elseif|for|while|do|return|nil|and|or|not|require|true|false)\b",
        Token::Keyword,
    ),
    (r"\b\d+\.?\d*\b", Token::Number),
];

const VIM: &[(&str, Token)] = &[
    (r#"".*"#, Token::Comment),
    (r"'[^']*'", Token::String),
    (
        r"\b(set|let|if|else|endif|function|endfunction|call|execute|autocmd|augroup|syntax|highlight|map|nmap|imap|vmap|noremap|nnoremap|inoremap|vnoremap)\b",
        Token::Keyword,
    ),
    (r"\b\d+\b", Token::Number),
];

const CONF: &[(&str, Token)] = &[
    (r"#.*", Token::Comment),
    (STRING, Token::String),
    (r"(?i)\b(set|bind|unbind|on|off|true|false)\b", Token::Keyword),
];

const RUBY: &[(&str, Token)] = &[
    (r"#.*", Token::Comment),
    (STRING, Token::String),
    (r"\b(tap|brew|cask|mas|vscode)\b", Token::Keyword),
];

/// Raw rule data per format tag, in table order.
pub const RULE_SOURCES: &[(&str, &[(&str, Token)])] = &[
    ("shell", SHELL),
    ("bash", SHELL),
    ("toml", TOML),
    ("lua", LUA),
    ("vim", VIM),
    ("conf", CONF),
    ("ruby", RUBY),
];

static RULES: OnceLock<HashMap<&'static str, Vec<Rule>>> = OnceLock::new();

fn compile(sources: &[(&str, Token)]) -> Vec<Rule> {
    sources
        .iter()
        .filter_map(|(pattern, token)| match Regex::new(pattern) {
            Ok(pattern) => Some(Rule {
                pattern,
                token: *token,
            }),
            Err(e) => {
                tracing::warn!(%pattern, error = %e, "skipping invalid highlight pattern");
                None
            }
        })
        .collect()
}

fn table() -> &'static HashMap<&'static str, Vec<Rule>> {
    RULES.get_or_init(|| {
        RULE_SOURCES
            .iter()
            .map(|(format, sources)| (*format, compile(sources)))
            .collect()
    })
}

/// Rules for a format tag, falling back to the generic table for unknown tags.
pub fn rules_for(format: &str) -> &'static [Rule] {
    let table = table();
    table
        .get(format)
        .or_else(|| table.get(FALLBACK_FORMAT))
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Whether a format tag has its own rule table.
pub fn is_known_format(format: &str) -> bool {
    table().contains_key(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pattern_compiles() {
        for (format, sources) in RULE_SOURCES {
            assert_eq!(
                rules_for(format).len(),
                sources.len(),
                "a pattern for {format} failed to compile"
            );
        }
    }

    #[test]
    fn test_unknown_format_uses_fallback() {
        assert!(!is_known_format("yaml"));
        let fallback = rules_for(FALLBACK_FORMAT);
        let unknown = rules_for("yaml");
        assert_eq!(fallback.len(), unknown.len());
        assert!(std::ptr::eq(fallback, unknown));
    }

    #[test]
    fn test_comments_lead_every_table() {
        for (format, _) in RULE_SOURCES {
            assert_eq!(rules_for(format)[0].token, Token::Comment, "{format}");
        }
    }

    #[test]
    fn test_css_classes() {
        assert_eq!(Token::Comment.css_class(), "hl-comment");
        assert_eq!(Token::Property.css_class(), "hl-property");
    }
}
