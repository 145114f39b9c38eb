//! # Diff Renderer
//!
//! Colorizes a pre-rendered unified diff. No diffing happens here; every line
//! is classified by its prefix and wrapped in a class-tagged `<span>`.

use crate::syntax::highlighter::escape_html;

/// Shown when a commit has no diff text.
pub const NO_CHANGES: &str = "No changes in this commit";

/// Classification of a single diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffLineKind {
    Addition,
    Deletion,
    HunkRange,
    FileHeader,
    Context,
}

impl DiffLineKind {
    /// CSS class of the wrapping span; `None` for context lines.
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            DiffLineKind::Addition => Some("diff-add"),
            DiffLineKind::Deletion => Some("diff-del"),
            DiffLineKind::HunkRange => Some("diff-range"),
            DiffLineKind::FileHeader => Some("diff-header-line"),
            DiffLineKind::Context => None,
        }
    }
}

/// Classify a line by prefix. File headers are checked before additions and
/// deletions so `+++` / `---` never count as content changes.
pub fn classify_line(line: &str) -> DiffLineKind {
    if line.starts_with("@@") {
        DiffLineKind::HunkRange
    } else if line.starts_with("diff ")
        || line.starts_with("index ")
        || line.starts_with("---")
        || line.starts_with("+++")
    {
        DiffLineKind::FileHeader
    } else if line.starts_with('+') {
        DiffLineKind::Addition
    } else if line.starts_with('-') {
        DiffLineKind::Deletion
    } else {
        DiffLineKind::Context
    }
}

/// Lines of `diff` paired with their classification.
pub fn classify(diff: &str) -> Vec<(DiffLineKind, &str)> {
    diff.split('\n')
        .map(|line| (classify_line(line), line))
        .collect()
}

/// Render a diff as markup. `None` or empty input yields [`NO_CHANGES`].
/// Newlines are preserved for preformatted display.
pub fn render_diff(diff: Option<&str>) -> String {
    let Some(diff) = diff.filter(|d| !d.is_empty()) else {
        return NO_CHANGES.to_string();
    };

    classify(diff)
        .into_iter()
        .map(|(kind, line)| {
            let escaped = escape_html(line);
            match kind.css_class() {
                Some(class) => format!("<span class=\"{class}\">{escaped}</span>"),
                None => escaped,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        "diff --git a/.zshrc b/.zshrc\n",
        "index 3b18e51..a7c4f2d 100644\n",
        "--- a/.zshrc\n",
        "+++ b/.zshrc\n",
        "@@ -1,3 +1,3 @@\n",
        " export EDITOR=vim\n",
        "-alias ll='ls -l'\n",
        "+alias ll='ls -la'\n",
    );

    #[test]
    fn test_none_and_empty_render_placeholder() {
        assert_eq!(render_diff(None), NO_CHANGES);
        assert_eq!(render_diff(Some("")), NO_CHANGES);
    }

    #[test]
    fn test_header_lines_are_never_changes() {
        assert_eq!(classify_line("--- a/file"), DiffLineKind::FileHeader);
        assert_eq!(classify_line("+++ b/file"), DiffLineKind::FileHeader);
        assert_eq!(classify_line("---"), DiffLineKind::FileHeader);
        assert_eq!(classify_line("+++"), DiffLineKind::FileHeader);
        assert_eq!(classify_line("diff --git a b"), DiffLineKind::FileHeader);
        assert_eq!(classify_line("index 000..111"), DiffLineKind::FileHeader);
    }

    #[test]
    fn test_change_lines() {
        assert_eq!(classify_line("+added"), DiffLineKind::Addition);
        assert_eq!(classify_line("++x"), DiffLineKind::Addition);
        assert_eq!(classify_line("-removed"), DiffLineKind::Deletion);
        assert_eq!(classify_line("--x"), DiffLineKind::Deletion);
        assert_eq!(classify_line("@@ -1 +1 @@"), DiffLineKind::HunkRange);
    }

    #[test]
    fn test_context_lines() {
        assert_eq!(classify_line(" unchanged"), DiffLineKind::Context);
        assert_eq!(classify_line(""), DiffLineKind::Context);
        assert_eq!(classify_line("(Initial commit)"), DiffLineKind::Context);
        assert_eq!(classify_line("diffuse"), DiffLineKind::Context);
    }

    #[test]
    fn test_classification_is_total() {
        let kinds: Vec<_> = classify(SAMPLE).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                DiffLineKind::FileHeader,
                DiffLineKind::FileHeader,
                DiffLineKind::FileHeader,
                DiffLineKind::FileHeader,
                DiffLineKind::HunkRange,
                DiffLineKind::Context,
                DiffLineKind::Deletion,
                DiffLineKind::Addition,
                DiffLineKind::Context,
            ]
        );
    }

    #[test]
    fn test_render_wraps_and_escapes() {
        let markup = render_diff(Some("+<b>\n-a & b\n plain <i>"));
        assert_eq!(
            markup,
            concat!(
                "<span class=\"diff-add\">+&lt;b&gt;</span>\n",
                "<span class=\"diff-del\">-a &amp; b</span>\n",
                " plain &lt;i&gt;",
            )
        );
    }

    #[test]
    fn test_render_preserves_line_count() {
        let markup = render_diff(Some(SAMPLE));
        assert_eq!(markup.split('\n').count(), SAMPLE.split('\n').count());
        assert!(markup.contains("<span class=\"diff-header-line\">+++ b/.zshrc</span>"));
        assert!(markup.contains("<span class=\"diff-range\">@@ -1,3 +1,3 @@</span>"));
    }
}
