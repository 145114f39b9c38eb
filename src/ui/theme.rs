//! # Theme System
//!
//! Colors of the terminal dashboard, including the palette used to color
//! highlighted config text and commit diffs.
//!
//! Rendering code never hardcodes a `ratatui::style::Color`; it asks the
//! active [`Theme`], either for a semantic role (`accent`, `error`, ...) or
//! through [`Theme::token_color`] and [`Theme::diff_color`].
//!
//! ## Built-in Themes
//!
//! - **Catppuccin Mocha** (default)
//! - **Catppuccin Macchiato**
//! - **Catppuccin Frappe**
//! - **Dracula**
//! - **Nord**
//! - **Gruvbox Dark**

use ratatui::style::Color;

use crate::syntax::{DiffLineKind, Token};

#[derive(Debug, Clone)]
pub struct Theme {
    /// Name used in settings and on the command line.
    pub name: &'static str,

    pub bg: Color,
    /// Selected rows and the modal background.
    pub surface: Color,

    pub fg: Color,
    /// Hints, separators, gutter and comments.
    pub fg_dim: Color,

    /// Focused borders, titles and section headers.
    pub accent: Color,
    pub success: Color,
    pub error: Color,
    /// Pending states such as unsaved changes.
    pub warning: Color,

    // -- Syntax --
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub variable: Color,
    pub property: Color,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &BUILT_IN_THEMES
    }

    /// Find a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        BUILT_IN_THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn default_theme() -> &'static Theme {
        &BUILT_IN_THEMES[0]
    }

    /// Color of a highlighted token.
    pub fn token_color(&self, token: Token) -> Color {
        match token {
            Token::Comment => self.fg_dim,
            Token::String => self.string,
            Token::Keyword => self.keyword,
            Token::Variable => self.variable,
            Token::Number | Token::Boolean => self.number,
            Token::Section => self.accent,
            Token::Property => self.property,
        }
    }

    /// Color of a diff line; `None` for context lines.
    pub fn diff_color(&self, kind: DiffLineKind) -> Option<Color> {
        match kind {
            DiffLineKind::Addition => Some(self.success),
            DiffLineKind::Deletion => Some(self.error),
            DiffLineKind::HunkRange => Some(self.accent),
            DiffLineKind::FileHeader => Some(self.fg_dim),
            DiffLineKind::Context => None,
        }
    }
}

static BUILT_IN_THEMES: [Theme; 6] = [
    // 0 - Catppuccin Mocha (default)
    Theme {
        name: "Catppuccin Mocha",
        bg: Color::Rgb(30, 30, 46),          // base
        surface: Color::Rgb(69, 71, 90),     // surface1
        fg: Color::Rgb(205, 214, 244),       // text
        fg_dim: Color::Rgb(108, 112, 134),   // overlay0
        accent: Color::Rgb(137, 180, 250),   // blue
        success: Color::Rgb(166, 227, 161),  // green
        error: Color::Rgb(243, 139, 168),    // red
        warning: Color::Rgb(249, 226, 175),  // yellow
        keyword: Color::Rgb(203, 166, 247),  // mauve
        string: Color::Rgb(166, 227, 161),   // green
        number: Color::Rgb(250, 179, 135),   // peach
        variable: Color::Rgb(235, 160, 172), // maroon
        property: Color::Rgb(148, 226, 213), // teal
    },
    // 1 - Catppuccin Macchiato
    Theme {
        name: "Catppuccin Macchiato",
        bg: Color::Rgb(36, 39, 58),
        surface: Color::Rgb(73, 77, 100),
        fg: Color::Rgb(202, 211, 245),
        fg_dim: Color::Rgb(110, 115, 141),
        accent: Color::Rgb(138, 173, 244),
        success: Color::Rgb(166, 218, 149),
        error: Color::Rgb(237, 135, 150),
        warning: Color::Rgb(238, 212, 159),
        keyword: Color::Rgb(198, 160, 246),
        string: Color::Rgb(166, 218, 149),
        number: Color::Rgb(245, 169, 127),
        variable: Color::Rgb(238, 153, 160),
        property: Color::Rgb(139, 213, 202),
    },
    // 2 - Catppuccin Frappe
    Theme {
        name: "Catppuccin Frappe",
        bg: Color::Rgb(48, 52, 70),
        surface: Color::Rgb(81, 87, 109),
        fg: Color::Rgb(198, 208, 245),
        fg_dim: Color::Rgb(115, 121, 148),
        accent: Color::Rgb(140, 170, 238),
        success: Color::Rgb(166, 209, 137),
        error: Color::Rgb(231, 130, 132),
        warning: Color::Rgb(229, 200, 144),
        keyword: Color::Rgb(202, 158, 230),
        string: Color::Rgb(166, 209, 137),
        number: Color::Rgb(239, 159, 118),
        variable: Color::Rgb(234, 153, 156),
        property: Color::Rgb(129, 200, 190),
    },
    // 3 - Dracula
    Theme {
        name: "Dracula",
        bg: Color::Rgb(40, 42, 54),
        surface: Color::Rgb(68, 71, 90),
        fg: Color::Rgb(248, 248, 242),
        fg_dim: Color::Rgb(98, 114, 164),
        accent: Color::Rgb(139, 233, 253),
        success: Color::Rgb(80, 250, 123),
        error: Color::Rgb(255, 85, 85),
        warning: Color::Rgb(241, 250, 140),
        keyword: Color::Rgb(255, 121, 198), // pink
        string: Color::Rgb(241, 250, 140),
        number: Color::Rgb(189, 147, 249), // purple
        variable: Color::Rgb(255, 184, 108),
        property: Color::Rgb(80, 250, 123),
    },
    // 4 - Nord
    Theme {
        name: "Nord",
        bg: Color::Rgb(46, 52, 64),
        surface: Color::Rgb(67, 76, 94),
        fg: Color::Rgb(216, 222, 233),
        fg_dim: Color::Rgb(97, 110, 136),
        accent: Color::Rgb(136, 192, 208),
        success: Color::Rgb(163, 190, 140),
        error: Color::Rgb(191, 97, 106),
        warning: Color::Rgb(235, 203, 139),
        keyword: Color::Rgb(129, 161, 193),
        string: Color::Rgb(163, 190, 140),
        number: Color::Rgb(180, 142, 173),
        variable: Color::Rgb(208, 135, 112),
        property: Color::Rgb(143, 188, 187),
    },
    // 5 - Gruvbox Dark
    Theme {
        name: "Gruvbox Dark",
        bg: Color::Rgb(40, 40, 40),
        surface: Color::Rgb(80, 73, 69),
        fg: Color::Rgb(235, 219, 178),
        fg_dim: Color::Rgb(146, 131, 116),
        accent: Color::Rgb(131, 165, 152),
        success: Color::Rgb(184, 187, 38),
        error: Color::Rgb(251, 73, 52),
        warning: Color::Rgb(250, 189, 47),
        keyword: Color::Rgb(251, 73, 52),
        string: Color::Rgb(184, 187, 38),
        number: Color::Rgb(211, 134, 155),
        variable: Color::Rgb(254, 128, 25),
        property: Color::Rgb(142, 192, 124),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn ctp(color: catppuccin::Color) -> Color {
        Color::Rgb(color.rgb.r, color.rgb.g, color.rgb.b)
    }

    #[test]
    fn test_default_is_mocha() {
        assert_eq!(Theme::default_theme().name, "Catppuccin Mocha");
    }

    #[test]
    fn test_by_name_case_insensitive() {
        assert!(Theme::by_name("catppuccin mocha").is_some());
        assert!(Theme::by_name("GRUVBOX DARK").is_some());
        assert!(Theme::by_name("solarized").is_none());
    }

    #[test]
    fn test_catppuccin_mocha_matches_palette() {
        let mocha = catppuccin::PALETTE.mocha.colors;
        let theme = Theme::default_theme();
        assert_eq!(theme.bg, ctp(mocha.base));
        assert_eq!(theme.surface, ctp(mocha.surface1));
        assert_eq!(theme.fg, ctp(mocha.text));
        assert_eq!(theme.fg_dim, ctp(mocha.overlay0));
        assert_eq!(theme.accent, ctp(mocha.blue));
        assert_eq!(theme.success, ctp(mocha.green));
        assert_eq!(theme.error, ctp(mocha.red));
        assert_eq!(theme.keyword, ctp(mocha.mauve));
        assert_eq!(theme.number, ctp(mocha.peach));
        assert_eq!(theme.variable, ctp(mocha.maroon));
        assert_eq!(theme.property, ctp(mocha.teal));
    }

    #[test]
    fn test_catppuccin_flavors_match_palette() {
        let flavors = [
            ("Catppuccin Macchiato", catppuccin::PALETTE.macchiato.colors),
            ("Catppuccin Frappe", catppuccin::PALETTE.frappe.colors),
        ];
        for (name, colors) in flavors {
            let theme = Theme::by_name(name).expect("theme exists");
            assert_eq!(theme.bg, ctp(colors.base), "{name}");
            assert_eq!(theme.fg, ctp(colors.text), "{name}");
            assert_eq!(theme.accent, ctp(colors.blue), "{name}");
            assert_eq!(theme.keyword, ctp(colors.mauve), "{name}");
        }
    }

    #[test]
    fn test_diff_colors() {
        let theme = Theme::default_theme();
        assert_eq!(theme.diff_color(DiffLineKind::Addition), Some(theme.success));
        assert_eq!(theme.diff_color(DiffLineKind::Deletion), Some(theme.error));
        assert_eq!(theme.diff_color(DiffLineKind::Context), None);
    }

    #[test]
    fn test_comments_use_dim_color() {
        for theme in Theme::all() {
            assert_eq!(theme.token_color(Token::Comment), theme.fg_dim, "{}", theme.name);
        }
    }

    #[test]
    fn test_all_themes_have_distinct_names() {
        let mut names: Vec<&str> = Theme::all().iter().map(|t| t.name).collect();
        let count = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), count, "duplicate theme names found");
    }
}
