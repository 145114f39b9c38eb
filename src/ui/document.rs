//! # Document Projection
//!
//! A pure projection of [`AppState`] onto the named elements of the
//! dashboard page. The same state always yields the same [`Document`], so a
//! host re-renders exactly the regions reported by
//! [`Document::changed_since`].
//!
//! Config and commit entries carry `data-config-id` and `data-commit`
//! attributes. Hosts dispatch clicks by those keys from one handler on the
//! list container, so re-rendering a list never adds handlers. Category
//! entries are static and addressed by their count element.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::api::Category;
use crate::syntax::{escape_html, gutter, highlight, render_diff};
use crate::ui::app::{AppState, DiffPanel, HistoryStatus, NotificationKind, View};
use crate::ui::format::{format_bytes, format_relative_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    ConfigList,
    Count(Category),
    Stats,
    WelcomeView,
    ConfigView,
    PackagesView,
    ConfigTitle,
    ConfigPath,
    ConfigSoftware,
    ConfigFormat,
    ConfigSize,
    ConfigDocs,
    ConfigRepo,
    CodeViewer,
    CodeContent,
    LineNumbers,
    Editor,
    ViewModeButton,
    EditModeButton,
    SaveButton,
    DiscardButton,
    SaveStatus,
    PackagesTitle,
    PackageSearch,
    PackagesList,
    HistoryPanel,
    HistoryList,
    DiffView,
    DiffCommitInfo,
    DiffContent,
    Toast,
    Confirmation,
}

impl ElementId {
    /// Element id in the page markup.
    pub fn dom_id(self) -> &'static str {
        match self {
            ElementId::ConfigList => "config-list",
            ElementId::Count(Category::Formulae) => "formulae-count",
            ElementId::Count(Category::Casks) => "casks-count",
            ElementId::Count(Category::Taps) => "taps-count",
            ElementId::Stats => "stats",
            ElementId::WelcomeView => "welcome-view",
            ElementId::ConfigView => "config-view",
            ElementId::PackagesView => "packages-view",
            ElementId::ConfigTitle => "config-title",
            ElementId::ConfigPath => "config-path",
            ElementId::ConfigSoftware => "config-software",
            ElementId::ConfigFormat => "config-format",
            ElementId::ConfigSize => "config-size",
            ElementId::ConfigDocs => "config-docs",
            ElementId::ConfigRepo => "config-repo",
            ElementId::CodeViewer => "code-viewer",
            ElementId::CodeContent => "code-content",
            ElementId::LineNumbers => "line-numbers",
            ElementId::Editor => "config-editor",
            ElementId::ViewModeButton => "view-mode-btn",
            ElementId::EditModeButton => "edit-mode-btn",
            ElementId::SaveButton => "save-btn",
            ElementId::DiscardButton => "discard-btn",
            ElementId::SaveStatus => "save-status",
            ElementId::PackagesTitle => "packages-title",
            ElementId::PackageSearch => "package-search",
            ElementId::PackagesList => "packages-list",
            ElementId::HistoryPanel => "history-panel",
            ElementId::HistoryList => "history-list",
            ElementId::DiffView => "diff-view",
            ElementId::DiffCommitInfo => "diff-commit-info",
            ElementId::DiffContent => "diff-content",
            ElementId::Toast => "toast",
            ElementId::Confirmation => "confirmation",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub html: String,
    pub hidden: bool,
    pub active: bool,
    pub disabled: bool,
    pub href: Option<String>,
}

impl Element {
    fn text(text: &str) -> Self {
        Self::html(escape_html(text))
    }

    fn html(html: String) -> Self {
        Self {
            html,
            ..Self::default()
        }
    }

    fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    elements: BTreeMap<ElementId, Element>,
}

impl Document {
    /// Project `state`, formatting commit dates relative to `today`.
    pub fn project(state: &AppState, today: NaiveDate) -> Self {
        let mut doc = Document::default();
        doc.project_sidebar(state);
        doc.project_views(state);
        doc.project_config(state);
        doc.project_packages(state);
        doc.project_history(state, today);
        doc.project_overlays(state);
        doc
    }

    /// Project `state` against the local calendar date.
    pub fn project_now(state: &AppState) -> Self {
        Self::project(state, chrono::Local::now().date_naive())
    }

    fn set(&mut self, id: ElementId, element: Element) {
        self.elements.insert(id, element);
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Markup of `id`, empty when the element is absent.
    pub fn html(&self, id: ElementId) -> &str {
        self.get(id).map_or("", |e| e.html.as_str())
    }

    /// Ids whose projection differs from `previous`.
    pub fn changed_since(&self, previous: &Document) -> Vec<ElementId> {
        let mut changed: Vec<ElementId> = self
            .elements
            .iter()
            .filter(|(id, element)| previous.elements.get(id) != Some(element))
            .map(|(id, _)| *id)
            .collect();
        changed.extend(
            previous
                .elements
                .keys()
                .filter(|id| !self.elements.contains_key(id)),
        );
        changed.sort();
        changed
    }

    fn project_sidebar(&mut self, state: &AppState) {
        let current = match state.view {
            View::Config => state.current_config.as_ref().map(|c| c.id()),
            _ => None,
        };
        let mut list = String::new();
        for config in &state.configs {
            let active = if current == Some(config.id.as_str()) { " active" } else { "" };
            let _ = write!(
                list,
                r#"<button class="nav-item{active}" data-config-id="{}"><span class="nav-item-name">{}</span></button>"#,
                escape_html(&config.id),
                escape_html(&config.display_name),
            );
        }
        self.set(ElementId::ConfigList, Element::html(list));

        for category in Category::ALL {
            let count = state.package_count(category).to_string();
            let active = state.view == View::Packages(category);
            self.set(ElementId::Count(category), Element::text(&count).active(active));
        }

        let mut stats = String::new();
        let cards = [("Config Files", state.configs.len())]
            .into_iter()
            .chain(Category::ALL.map(|c| (c.title(), state.package_count(c))));
        for (label, value) in cards {
            let _ = write!(
                stats,
                r#"<div class="stat-card"><div class="stat-value">{value}</div><div class="stat-label">{label}</div></div>"#,
            );
        }
        self.set(ElementId::Stats, Element::html(stats));
    }

    fn project_views(&mut self, state: &AppState) {
        let views = [
            (ElementId::WelcomeView, state.view == View::Welcome),
            (ElementId::ConfigView, state.view == View::Config),
            (ElementId::PackagesView, matches!(state.view, View::Packages(_))),
        ];
        for (id, active) in views {
            self.set(id, Element::default().hidden(!active).active(active));
        }
    }

    fn project_config(&mut self, state: &AppState) {
        let Some(config) = state.current_config.as_ref() else {
            return;
        };
        let summary = &config.summary;
        self.set(ElementId::ConfigTitle, Element::text(&summary.display_name));
        self.set(
            ElementId::ConfigPath,
            Element::text(&format!("dotfiles/{}", summary.source_path)),
        );
        self.set(ElementId::ConfigSoftware, Element::text(&summary.software));
        self.set(ElementId::ConfigFormat, Element::text(&summary.format));
        self.set(ElementId::ConfigSize, Element::text(&format_bytes(config.size)));
        for (id, href) in [(ElementId::ConfigDocs, &summary.docs), (ElementId::ConfigRepo, &summary.repo)] {
            let mut link = Element::default().hidden(href.is_empty());
            link.href = Some(href.clone());
            self.set(id, link);
        }

        let edit = state.edit_mode;
        self.set(ElementId::CodeViewer, Element::default().hidden(edit));
        self.set(
            ElementId::CodeContent,
            Element::html(highlight(&state.original_content, config.format())),
        );
        self.set(ElementId::LineNumbers, Element::html(gutter(&state.original_content)));
        self.set(ElementId::Editor, Element::text(state.buffer.text()).hidden(!edit));
        self.set(ElementId::ViewModeButton, Element::default().active(!edit));
        self.set(ElementId::EditModeButton, Element::default().active(edit));
        self.set(
            ElementId::SaveButton,
            Element::default().hidden(!edit).disabled(!state.can_save()),
        );
        self.set(
            ElementId::DiscardButton,
            Element::default()
                .hidden(!edit)
                .disabled(!state.has_unsaved_changes()),
        );
        let status = if edit { state.save_status.label() } else { "" };
        self.set(ElementId::SaveStatus, Element::text(status));
    }

    fn project_packages(&mut self, state: &AppState) {
        let View::Packages(category) = state.view else {
            return;
        };
        self.set(
            ElementId::PackagesTitle,
            Element::text(&format!("{} ({})", category.title(), state.package_count(category))),
        );
        self.set(ElementId::PackageSearch, Element::text(&state.package_query));
        let mut list = String::new();
        for package in state.filtered_packages(category) {
            let _ = write!(list, r#"<li class="package-item">{}</li>"#, escape_html(&package.name));
        }
        self.set(ElementId::PackagesList, Element::html(list));
    }

    fn project_history(&mut self, state: &AppState, today: NaiveDate) {
        self.set(
            ElementId::HistoryPanel,
            Element::default().hidden(!state.history_open),
        );
        if !state.history_open {
            return;
        }

        let list = match state.history_status {
            HistoryStatus::Idle => String::new(),
            HistoryStatus::Loading => empty_history("Loading..."),
            HistoryStatus::Failed => empty_history("Failed to load history"),
            HistoryStatus::Loaded if state.history_data.is_empty() => {
                empty_history("No commit history found")
            }
            HistoryStatus::Loaded => {
                let mut list = String::new();
                for commit in &state.history_data {
                    let active = if state.selected_commit.as_deref() == Some(commit.full_hash.as_str()) {
                        " active"
                    } else {
                        ""
                    };
                    let _ = write!(
                        list,
                        concat!(
                            r#"<button class="history-item{}" data-commit="{}">"#,
                            r#"<span class="history-message"><span class="history-hash">{}</span> {}</span>"#,
                            r#"<span class="history-meta">{} by {}</span></button>"#,
                        ),
                        active,
                        escape_html(&commit.full_hash),
                        escape_html(&commit.hash),
                        escape_html(&commit.message),
                        escape_html(&format_relative_date(&commit.date, today)),
                        escape_html(&commit.author),
                    );
                }
                list
            }
        };
        self.set(ElementId::HistoryList, Element::html(list));

        self.set(
            ElementId::DiffView,
            Element::default().hidden(state.diff == DiffPanel::Hidden),
        );
        let info = state
            .selected_commit_info()
            .map(|c| format!("{} - {}", c.hash, c.message))
            .unwrap_or_default();
        self.set(ElementId::DiffCommitInfo, Element::text(&info));
        let content = match &state.diff {
            DiffPanel::Hidden => String::new(),
            DiffPanel::Loading { .. } => "Loading...".to_string(),
            DiffPanel::Loaded { diff, .. } => render_diff(diff.as_deref()),
            DiffPanel::Failed { .. } => "Failed to load diff".to_string(),
        };
        self.set(ElementId::DiffContent, Element::html(content));
    }

    fn project_overlays(&mut self, state: &AppState) {
        let toast = match &state.notification {
            Some(n) => {
                let kind = match n.kind {
                    NotificationKind::Success => "success",
                    NotificationKind::Error => "error",
                };
                Element::html(format!(
                    r#"<span class="toast-{kind}">{}</span>"#,
                    escape_html(&n.message)
                ))
            }
            None => Element::default().hidden(true),
        };
        self.set(ElementId::Toast, toast);

        let confirm = match state.pending_confirmation {
            Some(prompt) => Element::text(prompt.message()),
            None => Element::default().hidden(true),
        };
        self.set(ElementId::Confirmation, confirm);
    }

    /// Serialized page fragment, one `<div>` per element.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for (id, element) in &self.elements {
            let mut classes = Vec::new();
            if element.hidden {
                classes.push("hidden");
            }
            if element.active {
                classes.push("active");
            }
            let _ = write!(out, r#"<div id="{}""#, id.dom_id());
            if !classes.is_empty() {
                let _ = write!(out, r#" class="{}""#, classes.join(" "));
            }
            if element.disabled {
                out.push_str(" disabled");
            }
            if let Some(href) = &element.href {
                let _ = write!(out, r#" data-href="{}""#, escape_html(href));
            }
            let _ = writeln!(out, ">{}</div>", element.html);
        }
        out
    }
}

fn empty_history(message: &str) -> String {
    format!(r#"<div class="history-empty">{message}</div>"#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Commit, Config, ConfigSummary, Package};
    use crate::ui::editor::EditOp;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).expect("date")
    }

    fn shell_config(content: &str) -> Config {
        Config {
            summary: ConfigSummary {
                id: "zshrc".to_string(),
                display_name: ".zshrc".to_string(),
                software: "Zsh".to_string(),
                category: "Shell".to_string(),
                format: "shell".to_string(),
                source_path: ".zshrc".to_string(),
                docs: "https://zsh.sourceforge.io/Doc/".to_string(),
                repo: String::new(),
            },
            content: content.to_string(),
            size: 1536,
            modified: None,
        }
    }

    fn loaded_state(content: &str) -> AppState {
        let mut state = AppState::new();
        state.set_configs(vec![shell_config(content).summary]);
        state.show_config(shell_config(content));
        state
    }

    #[test]
    fn test_plain_shell_text_has_no_tokens_and_two_gutter_lines() {
        let doc = Document::project(&loaded_state("echo hi\n"), today());
        assert_eq!(doc.html(ElementId::CodeContent), "echo hi\n");
        assert!(!doc.html(ElementId::CodeContent).contains("<span"));
        assert_eq!(doc.html(ElementId::LineNumbers), "<span>1</span><span>2</span>");
    }

    #[test]
    fn test_config_metadata() {
        let doc = Document::project(&loaded_state(""), today());
        assert_eq!(doc.html(ElementId::ConfigPath), "dotfiles/.zshrc");
        assert_eq!(doc.html(ElementId::ConfigSize), "1.5 KB");
        let repo = doc.get(ElementId::ConfigRepo).expect("repo");
        assert!(repo.hidden);
        assert!(doc.html(ElementId::ConfigList).contains(r#"class="nav-item active" data-config-id="zshrc""#));
    }

    #[test]
    fn test_edit_mode_buttons() {
        let mut state = loaded_state("x");
        let doc = Document::project(&state, today());
        assert!(doc.get(ElementId::SaveButton).expect("save").hidden);
        assert!(!doc.get(ElementId::CodeViewer).expect("viewer").hidden);

        state.enter_edit_mode();
        let doc = Document::project(&state, today());
        let save = doc.get(ElementId::SaveButton).expect("save");
        assert!(!save.hidden);
        assert!(save.disabled);
        assert!(doc.get(ElementId::CodeViewer).expect("viewer").hidden);

        state.apply_edit(EditOp::Insert('y'));
        let doc = Document::project(&state, today());
        assert!(!doc.get(ElementId::SaveButton).expect("save").disabled);
        assert_eq!(doc.html(ElementId::SaveStatus), "Unsaved changes");
    }

    #[test]
    fn test_only_edited_regions_change() {
        let mut state = loaded_state("x");
        state.enter_edit_mode();
        let before = Document::project(&state, today());
        state.apply_edit(EditOp::Insert('y'));
        let after = Document::project(&state, today());
        assert_eq!(
            after.changed_since(&before),
            vec![
                ElementId::Editor,
                ElementId::SaveButton,
                ElementId::DiscardButton,
                ElementId::SaveStatus,
            ]
        );
        assert!(after.changed_since(&after).is_empty());
    }

    #[test]
    fn test_history_list_marks_selected_commit() {
        let mut state = loaded_state("");
        let ticket = state.begin_history().expect("ticket");
        let doc = Document::project(&state, today());
        assert!(doc.html(ElementId::HistoryList).contains("Loading..."));

        let commit = Commit {
            hash: "abc1234".to_string(),
            full_hash: "abc1234ffff".to_string(),
            message: "tune <prompt>".to_string(),
            author: "dev".to_string(),
            date: "2025-01-09 09:00:00 +0000".to_string(),
        };
        state.finish_history::<()>(&ticket, Ok(vec![commit]));
        let diff = state.begin_diff("abc1234ffff").expect("diff");
        state.finish_diff::<()>(&diff, Ok(None));

        let doc = Document::project(&state, today());
        let list = doc.html(ElementId::HistoryList);
        assert!(list.contains(r#"class="history-item active" data-commit="abc1234ffff""#));
        assert!(list.contains("tune &lt;prompt&gt;"));
        assert!(list.contains("Yesterday by dev"));
        assert_eq!(doc.html(ElementId::DiffCommitInfo), "abc1234 - tune &lt;prompt&gt;");
        assert_eq!(doc.html(ElementId::DiffContent), "No changes in this commit");
    }

    #[test]
    fn test_empty_history_message() {
        let mut state = loaded_state("");
        let ticket = state.begin_history().expect("ticket");
        state.finish_history::<()>(&ticket, Ok(Vec::new()));
        let doc = Document::project(&state, today());
        assert!(doc.html(ElementId::HistoryList).contains("No commit history found"));
        assert!(doc.get(ElementId::DiffView).expect("diff").hidden);
    }

    #[test]
    fn test_package_title_counts_all_packages() {
        let mut state = AppState::new();
        state.show_packages(
            Category::Casks,
            vec![
                Package { name: "wezterm".to_string() },
                Package { name: "raycast".to_string() },
            ],
        );
        state.package_query = "wez".to_string();
        let doc = Document::project(&state, today());
        assert_eq!(doc.html(ElementId::PackagesTitle), "Casks (2)");
        assert_eq!(
            doc.html(ElementId::PackagesList),
            r#"<li class="package-item">wezterm</li>"#
        );
        assert!(doc.get(ElementId::Count(Category::Casks)).expect("count").active);
    }

    #[test]
    fn test_markup_lists_every_element_once() {
        let doc = Document::project(&loaded_state("echo hi"), today());
        let markup = doc.to_markup();
        assert_eq!(markup.matches(r#"<div id="code-content""#).count(), 1);
        assert!(markup.contains(r#"<div id="save-btn" class="hidden" disabled>"#));
    }
}
