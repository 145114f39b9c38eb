//! # Application State
//!
//! [`AppState`] is the single state container of the dashboard. It is owned
//! by [`crate::ui::Controller`] and only read by the projections in
//! [`crate::ui::document`] and [`crate::ui::render`].
//!
//! ## Views
//!
//! | View | Entered by | Requires |
//! |------|------------|----------|
//! | `Welcome` | startup, reload | nothing |
//! | `Config` | [`AppState::show_config`] | a fetched [`Config`] |
//! | `Packages` | [`AppState::show_packages`] | the category's package list |
//!
//! ## Stale responses
//!
//! History and diff fetches are not cancelled when superseded. Each fetch is
//! started with a ticket ([`HistoryTicket`], [`DiffTicket`]) that records the
//! target and a generation number; `finish_*` applies the response only when
//! the ticket still matches the current state.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::api::{Category, Commit, Config, ConfigSummary, Package};
use crate::ui::editor::{EditBuffer, EditOp};

/// How long a notification stays visible.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Welcome,
    Config,
    Packages(Category),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Content,
    Search,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Unsaved,
    Saving,
    Saved,
    Failed,
}

impl SaveStatus {
    pub fn label(self) -> &'static str {
        match self {
            SaveStatus::Idle => "",
            SaveStatus::Unsaved => "Unsaved changes",
            SaveStatus::Saving => "Saving...",
            SaveStatus::Saved => "Saved",
            SaveStatus::Failed => "Save failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
}

/// A question awaiting the user's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    UnsavedChanges,
    DiscardChanges,
    QuitWithUnsaved,
}

impl Prompt {
    pub fn message(self) -> &'static str {
        match self {
            Prompt::UnsavedChanges => "Unsaved changes will be lost. Continue?",
            Prompt::DiscardChanges => "Discard all changes?",
            Prompt::QuitWithUnsaved => "You have unsaved changes. Quit anyway?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStatus {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Diff area of the history panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffPanel {
    Hidden,
    Loading { commit: String },
    Loaded { commit: String, diff: Option<String> },
    Failed { commit: String },
}

impl DiffPanel {
    pub fn commit(&self) -> Option<&str> {
        match self {
            DiffPanel::Hidden => None,
            DiffPanel::Loading { commit }
            | DiffPanel::Loaded { commit, .. }
            | DiffPanel::Failed { commit } => Some(commit),
        }
    }
}

/// Handle for an in-flight history fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTicket {
    pub config_id: String,
    generation: u64,
}

/// Handle for an in-flight diff fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffTicket {
    pub config_id: String,
    pub commit: String,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarItem {
    Config(usize),
    Category(Category),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub sidebar_index: usize,
    pub history_index: usize,
    pub code_scroll: usize,
    pub focus: Focus,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            sidebar_index: 0,
            history_index: 0,
            code_scroll: 0,
            focus: Focus::Sidebar,
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub configs: Vec<ConfigSummary>,
    pub current_config: Option<Config>,
    pub original_content: String,
    pub edit_mode: bool,
    pub buffer: EditBuffer,
    pub packages: HashMap<Category, Vec<Package>>,
    pub package_query: String,
    pub view: View,
    pub history_open: bool,
    pub history_data: Vec<Commit>,
    pub history_status: HistoryStatus,
    pub selected_commit: Option<String>,
    pub diff: DiffPanel,
    pub save_status: SaveStatus,
    pub notification: Option<Notification>,
    pub pending_confirmation: Option<Prompt>,
    pub nav: Navigation,
    pub should_quit: bool,
    history_generation: u64,
    diff_generation: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            configs: Vec::new(),
            current_config: None,
            original_content: String::new(),
            edit_mode: false,
            buffer: EditBuffer::default(),
            packages: HashMap::new(),
            package_query: String::new(),
            view: View::Welcome,
            history_open: false,
            history_data: Vec::new(),
            history_status: HistoryStatus::Idle,
            selected_commit: None,
            diff: DiffPanel::Hidden,
            save_status: SaveStatus::Idle,
            notification: None,
            pending_confirmation: None,
            nav: Navigation::default(),
            should_quit: false,
            history_generation: 0,
            diff_generation: 0,
        }
    }

    /// Replace the config list wholesale.
    pub fn set_configs(&mut self, configs: Vec<ConfigSummary>) {
        self.configs = configs;
        let last = self.sidebar_items().len().saturating_sub(1);
        self.nav.sidebar_index = self.nav.sidebar_index.min(last);
    }

    pub fn show_welcome(&mut self) {
        self.close_history();
        if self.edit_mode {
            self.leave_edit_mode();
        }
        self.view = View::Welcome;
    }

    /// Enter the config view with a freshly fetched config.
    pub fn show_config(&mut self, config: Config) {
        self.close_history();
        self.original_content.clone_from(&config.content);
        self.buffer.reset(&config.content);
        self.edit_mode = false;
        self.save_status = SaveStatus::Idle;
        self.current_config = Some(config);
        self.view = View::Config;
        self.nav.code_scroll = 0;
    }

    /// Enter the packages view for `category` with its loaded list.
    pub fn show_packages(&mut self, category: Category, packages: Vec<Package>) {
        self.close_history();
        if self.edit_mode {
            self.leave_edit_mode();
        }
        self.packages.insert(category, packages);
        self.package_query.clear();
        self.view = View::Packages(category);
        self.nav.code_scroll = 0;
    }

    pub fn package_count(&self, category: Category) -> usize {
        self.packages.get(&category).map_or(0, Vec::len)
    }

    /// Packages of `category` whose name contains the search query,
    /// ignoring case.
    pub fn filtered_packages(&self, category: Category) -> Vec<&Package> {
        let query = self.package_query.to_lowercase();
        self.packages
            .get(&category)
            .map(|packages| {
                packages
                    .iter()
                    .filter(|p| p.name.to_lowercase().contains(&query))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.edit_mode && self.current_config.is_some() && self.buffer.text() != self.original_content
    }

    /// Text the viewer and downloads show: the live buffer in edit mode,
    /// otherwise the last saved content.
    pub fn visible_content(&self) -> &str {
        if self.edit_mode {
            self.buffer.text()
        } else {
            &self.original_content
        }
    }

    /// Switch to edit mode. Returns `false` outside the config view.
    pub fn enter_edit_mode(&mut self) -> bool {
        if self.view != View::Config || self.current_config.is_none() {
            return false;
        }
        if !self.edit_mode {
            self.buffer.reset(&self.original_content);
            self.edit_mode = true;
            self.save_status = SaveStatus::Idle;
        }
        true
    }

    /// Switch back to view mode, dropping the buffer.
    pub fn leave_edit_mode(&mut self) {
        self.edit_mode = false;
        self.buffer.reset(&self.original_content);
        self.save_status = SaveStatus::Idle;
    }

    /// Apply an editing operation to the buffer. Ignored outside edit mode.
    pub fn apply_edit(&mut self, op: EditOp) -> bool {
        if !self.edit_mode {
            return false;
        }
        let changed = self.buffer.apply(op);
        if changed {
            self.refresh_save_status();
        }
        changed
    }

    /// Replace the buffer with text read at the input boundary.
    pub fn set_buffer(&mut self, text: &str) {
        if !self.edit_mode {
            return;
        }
        self.buffer.set_text(text);
        self.refresh_save_status();
    }

    fn refresh_save_status(&mut self) {
        if self.has_unsaved_changes() {
            self.save_status = SaveStatus::Unsaved;
        } else if self.save_status == SaveStatus::Unsaved {
            self.save_status = SaveStatus::Idle;
        }
    }

    pub fn discard_edits(&mut self) {
        self.buffer.set_text(self.original_content.clone());
        self.save_status = SaveStatus::Idle;
    }

    /// Save button enablement.
    pub fn can_save(&self) -> bool {
        self.has_unsaved_changes() && self.save_status != SaveStatus::Saving
    }

    /// Mark a save as started. Returns the config id and the content to send.
    pub fn begin_save(&mut self) -> Option<(String, String)> {
        if !self.edit_mode {
            return None;
        }
        let id = self.current_config.as_ref()?.id().to_string();
        self.save_status = SaveStatus::Saving;
        Some((id, self.buffer.text().to_string()))
    }

    /// Advance the saved content to `saved`.
    pub fn save_succeeded(&mut self, saved: &str) {
        self.original_content = saved.to_string();
        if let Some(config) = self.current_config.as_mut() {
            config.content = saved.to_string();
            config.size = saved.len() as u64;
        }
        self.save_status = SaveStatus::Saved;
        if self.has_unsaved_changes() {
            self.save_status = SaveStatus::Unsaved;
        }
    }

    /// Keep buffer and saved content as they are for a retry.
    pub fn save_failed(&mut self) {
        self.save_status = SaveStatus::Failed;
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.notify_at(message, kind, Instant::now());
    }

    pub fn notify_at(&mut self, message: impl Into<String>, kind: NotificationKind, now: Instant) {
        self.notification = Some(Notification {
            message: message.into(),
            kind,
            shown_at: now,
        });
    }

    /// Drop the notification once it has been visible for [`TOAST_DURATION`].
    pub fn expire_notification(&mut self, now: Instant) -> bool {
        let expired = self
            .notification
            .as_ref()
            .is_some_and(|n| now.saturating_duration_since(n.shown_at) >= TOAST_DURATION);
        if expired {
            self.notification = None;
        }
        expired
    }

    /// Open the history panel and start a fresh fetch for the config on
    /// screen. Other views have no history to show.
    pub fn begin_history(&mut self) -> Option<HistoryTicket> {
        if self.view != View::Config {
            return None;
        }
        let config_id = self.current_config.as_ref()?.id().to_string();
        self.history_generation += 1;
        self.diff_generation += 1;
        self.history_open = true;
        self.history_status = HistoryStatus::Loading;
        self.selected_commit = None;
        self.diff = DiffPanel::Hidden;
        self.nav.history_index = 0;
        self.nav.focus = Focus::History;
        Some(HistoryTicket {
            config_id,
            generation: self.history_generation,
        })
    }

    fn history_ticket_current(&self, ticket: &HistoryTicket) -> bool {
        self.history_open
            && ticket.generation == self.history_generation
            && self.current_config.as_ref().map(Config::id) == Some(ticket.config_id.as_str())
    }

    /// Apply a history response. Returns `false` when the ticket is stale.
    pub fn finish_history<E>(&mut self, ticket: &HistoryTicket, result: Result<Vec<Commit>, E>) -> bool {
        if !self.history_ticket_current(ticket) {
            return false;
        }
        match result {
            Ok(commits) => {
                self.history_data = commits;
                self.history_status = HistoryStatus::Loaded;
            }
            Err(_) => {
                self.history_data.clear();
                self.history_status = HistoryStatus::Failed;
            }
        }
        true
    }

    /// Close the panel. The loaded history is kept until the next open.
    pub fn close_history(&mut self) {
        if self.history_open {
            self.history_generation += 1;
            self.diff_generation += 1;
        }
        self.history_open = false;
        self.selected_commit = None;
        self.diff = DiffPanel::Hidden;
        if self.nav.focus == Focus::History {
            self.nav.focus = Focus::Sidebar;
        }
    }

    /// Select `commit` and start fetching its diff. The commit must be one
    /// of the loaded history entries.
    pub fn begin_diff(&mut self, commit: &str) -> Option<DiffTicket> {
        if !self.history_open {
            return None;
        }
        let config_id = self.current_config.as_ref()?.id().to_string();
        let index = self.history_data.iter().position(|c| c.full_hash == commit)?;
        self.diff_generation += 1;
        self.selected_commit = Some(commit.to_string());
        self.diff = DiffPanel::Loading {
            commit: commit.to_string(),
        };
        self.nav.history_index = index;
        Some(DiffTicket {
            config_id,
            commit: commit.to_string(),
            generation: self.diff_generation,
        })
    }

    fn diff_ticket_current(&self, ticket: &DiffTicket) -> bool {
        ticket.generation == self.diff_generation
            && self.selected_commit.as_deref() == Some(ticket.commit.as_str())
            && self.current_config.as_ref().map(Config::id) == Some(ticket.config_id.as_str())
    }

    /// Apply a diff response. Returns `false` when the ticket is stale.
    pub fn finish_diff<E>(&mut self, ticket: &DiffTicket, result: Result<Option<String>, E>) -> bool {
        if !self.diff_ticket_current(ticket) {
            return false;
        }
        let commit = ticket.commit.clone();
        self.diff = match result {
            Ok(diff) => DiffPanel::Loaded { commit, diff },
            Err(_) => DiffPanel::Failed { commit },
        };
        true
    }

    /// Loaded history entry for the selected commit.
    pub fn selected_commit_info(&self) -> Option<&Commit> {
        let hash = self.selected_commit.as_deref()?;
        self.history_data.iter().find(|c| c.full_hash == hash)
    }

    /// Sidebar entries: every config, then the three package categories.
    pub fn sidebar_items(&self) -> Vec<SidebarItem> {
        (0..self.configs.len())
            .map(SidebarItem::Config)
            .chain(Category::ALL.into_iter().map(SidebarItem::Category))
            .collect()
    }

    pub fn selected_sidebar_item(&self) -> Option<SidebarItem> {
        self.sidebar_items().get(self.nav.sidebar_index).copied()
    }

    pub fn next(&mut self) {
        if self.history_open {
            let count = self.history_data.len();
            if count > 0 {
                self.nav.history_index = (self.nav.history_index + 1) % count;
            }
            return;
        }
        let count = self.sidebar_items().len();
        self.nav.sidebar_index = (self.nav.sidebar_index + 1) % count;
    }

    pub fn previous(&mut self) {
        if self.history_open {
            let count = self.history_data.len();
            if count > 0 {
                self.nav.history_index = (self.nav.history_index + count - 1) % count;
            }
            return;
        }
        let count = self.sidebar_items().len();
        self.nav.sidebar_index = (self.nav.sidebar_index + count - 1) % count;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.nav.code_scroll = self.nav.code_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let max = crate::syntax::line_count(self.visible_content()).saturating_sub(1);
        self.nav.code_scroll = (self.nav.code_scroll + lines).min(max);
    }

    /// Whether the state invariants hold.
    pub fn invariants_hold(&self) -> bool {
        let edit_needs_config =
            !self.edit_mode || (self.current_config.is_some() && self.view == View::Config);
        let commit_is_known = self
            .selected_commit
            .as_ref()
            .is_none_or(|hash| self.history_data.iter().any(|c| &c.full_hash == hash));
        let config_view_has_config = self.view != View::Config || self.current_config.is_some();
        edit_needs_config && commit_is_known && config_view_has_config
    }
}
