//! # Controller
//!
//! Owns the [`AppState`] and the [`ApiClient`] and turns user intents
//! ([`Command`]) into state transitions and backend calls.
//!
//! Destructive transitions go through [`Prompter`], an async confirmation
//! capability provided by the front-end. While a question is open it is
//! visible as [`AppState::pending_confirmation`]; declining aborts the
//! action before any state is touched.
//!
//! Failures never end the session. Network and application errors become a
//! notification; history and diff failures degrade their panel instead.

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::api::{ApiClient, Category, Transport};
use crate::syntax::rules::is_known_format;
use crate::ui::app::{
    AppState, DiffTicket, Focus, HistoryTicket, NotificationKind, Prompt, SidebarItem, View,
};
use crate::ui::editor::EditOp;
use crate::ui::format::download_file_name;

/// Lines moved by one page of scrolling.
pub const PAGE: usize = 10;

/// Asks the user a yes/no question.
pub trait Prompter {
    /// Answer `state.pending_confirmation`.
    fn confirm(&mut self, state: &AppState) -> impl Future<Output = bool>;
}

/// A prompter with a fixed answer, for headless runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Prompter for FixedAnswer {
    async fn confirm(&mut self, _state: &AppState) -> bool {
        self.0
    }
}

/// Every user intent the controller understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SelectConfig(String),
    SelectCategory(Category),
    SetEditMode(bool),
    Edit(EditOp),
    SetBuffer(String),
    Save,
    SaveShortcut,
    Discard,
    Download,
    Reload,
    Search(String),
    OpenHistory,
    CloseHistory,
    SelectCommit(String),
    Escape,
    Quit,
    MoveUp,
    MoveDown,
    Activate,
    Focus(Focus),
    ToggleFocus,
    ScrollUp,
    ScrollDown,
}

pub struct Controller<T, P> {
    pub state: AppState,
    pub client: ApiClient<T>,
    pub prompter: P,
    download_dir: PathBuf,
}

impl<T: Transport, P: Prompter> Controller<T, P> {
    pub fn new(client: ApiClient<T>, prompter: P, download_dir: PathBuf) -> Self {
        Self {
            state: AppState::new(),
            client,
            prompter,
            download_dir,
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    async fn confirm(&mut self, prompt: Prompt) -> bool {
        self.state.pending_confirmation = Some(prompt);
        let answer = self.prompter.confirm(&self.state).await;
        self.state.pending_confirmation = None;
        tracing::debug!(?prompt, answer, "confirmation answered");
        answer
    }

    /// Confirm losing unsaved edits, if there are any.
    async fn confirm_unsaved(&mut self, prompt: Prompt) -> bool {
        !self.state.has_unsaved_changes() || self.confirm(prompt).await
    }

    /// Load the config list and prime the package counts, then show the
    /// welcome view.
    pub async fn init(&mut self) -> bool {
        match self.load_data().await {
            Ok(()) => {
                self.state.show_welcome();
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "initial load failed");
                self.state.notify("Failed to load data", NotificationKind::Error);
                false
            }
        }
    }

    async fn load_data(&mut self) -> crate::api::Result<()> {
        let configs = self.client.list_configs().await?;
        self.state.set_configs(configs);

        let (formulae, casks, taps) = tokio::join!(
            self.client.list_packages(Category::Formulae),
            self.client.list_packages(Category::Casks),
            self.client.list_packages(Category::Taps),
        );
        for (category, packages) in Category::ALL.into_iter().zip([formulae, casks, taps]) {
            self.state.packages.insert(category, packages?);
        }
        tracing::info!(configs = self.state.configs.len(), "dashboard data loaded");
        Ok(())
    }

    pub async fn reload(&mut self) -> bool {
        if !self.confirm_unsaved(Prompt::UnsavedChanges).await {
            return false;
        }
        if self.state.edit_mode {
            self.state.leave_edit_mode();
        }
        let loaded = self.init().await;
        if loaded {
            self.state.notify("Reloaded", NotificationKind::Success);
        }
        loaded
    }

    /// Switch to another config. Returns `true` when the switch happened.
    pub async fn select_config(&mut self, id: &str) -> bool {
        if !self.confirm_unsaved(Prompt::UnsavedChanges).await {
            tracing::debug!(%id, "config switch declined");
            return false;
        }
        match self.client.get_config(id).await {
            Ok(config) => {
                if let Some(index) = self.state.configs.iter().position(|c| c.id == id) {
                    self.state.nav.sidebar_index = index;
                }
                if !is_known_format(config.format()) {
                    tracing::debug!(%id, format = config.format(), "no rule table, using fallback highlighting");
                }
                self.state.show_config(config);
                true
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "failed to load config");
                self.state.notify(e.to_string(), NotificationKind::Error);
                false
            }
        }
    }

    pub async fn select_category(&mut self, category: Category) -> bool {
        if !self.confirm_unsaved(Prompt::UnsavedChanges).await {
            return false;
        }
        match self.client.list_packages(category).await {
            Ok(packages) => {
                let index = self.state.configs.len() + category.index();
                self.state.nav.sidebar_index = index;
                self.state.show_packages(category, packages);
                true
            }
            Err(e) => {
                tracing::warn!(%category, error = %e, "failed to load packages");
                self.state.notify(e.to_string(), NotificationKind::Error);
                false
            }
        }
    }

    /// Toggle between view and edit mode. Leaving edit mode with unsaved
    /// changes asks first.
    pub async fn set_edit_mode(&mut self, enable: bool) -> bool {
        if enable {
            let entered = self.state.enter_edit_mode();
            if entered {
                self.state.nav.focus = Focus::Content;
            }
            return entered;
        }
        if !self.state.edit_mode {
            return true;
        }
        if !self.confirm_unsaved(Prompt::UnsavedChanges).await {
            return false;
        }
        self.state.leave_edit_mode();
        true
    }

    pub fn edit(&mut self, op: EditOp) -> bool {
        self.state.apply_edit(op)
    }

    pub fn set_buffer(&mut self, text: &str) {
        self.state.set_buffer(text);
    }

    /// Send the buffer to the backend. Does nothing while the save button
    /// is disabled.
    pub async fn save(&mut self) -> bool {
        if !self.state.can_save() {
            tracing::debug!("nothing to save");
            return false;
        }
        let Some((id, content)) = self.state.begin_save() else {
            return false;
        };
        match self.client.save_config(&id, &content).await {
            Ok(_) => {
                tracing::info!(%id, bytes = content.len(), "config saved");
                self.state.save_succeeded(&content);
                self.state
                    .notify("File saved successfully", NotificationKind::Success);
                true
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "save failed");
                self.state.save_failed();
                self.state.notify(e.to_string(), NotificationKind::Error);
                false
            }
        }
    }

    /// Keyboard save: only effective in edit mode with unsaved changes.
    pub async fn save_shortcut(&mut self) -> bool {
        if !self.state.edit_mode {
            return false;
        }
        self.save().await
    }

    /// Reset the buffer to the saved content after confirmation. Stays in
    /// edit mode.
    pub async fn discard(&mut self) -> bool {
        if !self.state.has_unsaved_changes() {
            return false;
        }
        if !self.confirm(Prompt::DiscardChanges).await {
            return false;
        }
        self.state.discard_edits();
        self.state
            .notify("Changes discarded", NotificationKind::Success);
        true
    }

    /// Write the visible content to the download directory. Only the
    /// config view has something to download.
    pub fn download(&mut self) -> Result<Option<PathBuf>> {
        let config = match (&self.state.view, self.state.current_config.as_ref()) {
            (View::Config, Some(config)) => config,
            _ => return Ok(None),
        };
        let path = self
            .download_dir
            .join(download_file_name(config.display_name()));
        std::fs::create_dir_all(&self.download_dir).with_context(|| {
            format!("Failed to create download directory {}", self.download_dir.display())
        })?;
        std::fs::write(&path, self.state.visible_content())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "config downloaded");
        self.state
            .notify("Download started", NotificationKind::Success);
        Ok(Some(path))
    }

    /// Filter the visible package list. Never refetches.
    pub fn search_packages(&mut self, query: &str) {
        self.state.package_query = query.to_string();
    }

    /// Open the history panel and load the commit list.
    pub async fn open_history(&mut self) -> bool {
        let Some(ticket) = self.state.begin_history() else {
            return false;
        };
        let result = self.fetch_history(&ticket).await;
        self.apply_history(&ticket, result)
    }

    pub async fn fetch_history(
        &self,
        ticket: &HistoryTicket,
    ) -> crate::api::Result<Vec<crate::api::Commit>> {
        self.client.get_history(&ticket.config_id).await
    }

    pub fn apply_history(
        &mut self,
        ticket: &HistoryTicket,
        result: crate::api::Result<Vec<crate::api::Commit>>,
    ) -> bool {
        if let Err(e) = &result {
            tracing::warn!(config = %ticket.config_id, error = %e, "failed to load history");
        }
        let applied = self.state.finish_history(ticket, result);
        if !applied {
            tracing::debug!(config = %ticket.config_id, "discarding stale history response");
        }
        applied
    }

    pub fn close_history(&mut self) {
        self.state.close_history();
    }

    /// Show the diff of `commit`, replacing any diff on display.
    pub async fn select_commit(&mut self, commit: &str) -> bool {
        let Some(ticket) = self.state.begin_diff(commit) else {
            return false;
        };
        let result = self.fetch_diff(&ticket).await;
        self.apply_diff(&ticket, result)
    }

    pub async fn fetch_diff(&self, ticket: &DiffTicket) -> crate::api::Result<Option<String>> {
        self.client.get_diff(&ticket.config_id, &ticket.commit).await
    }

    pub fn apply_diff(&mut self, ticket: &DiffTicket, result: crate::api::Result<Option<String>>) -> bool {
        if let Err(e) = &result {
            tracing::warn!(commit = %ticket.commit, error = %e, "failed to load diff");
        }
        let applied = self.state.finish_diff(ticket, result);
        if !applied {
            tracing::debug!(commit = %ticket.commit, "discarding stale diff response");
        }
        applied
    }

    /// Close the history panel if open, else leave edit mode, else leave
    /// the search box.
    pub async fn escape(&mut self) {
        if self.state.history_open {
            self.state.close_history();
        } else if self.state.edit_mode {
            self.set_edit_mode(false).await;
        } else if self.state.nav.focus == Focus::Search {
            self.state.nav.focus = Focus::Sidebar;
        }
    }

    /// The warning owed before leaving the session, if any.
    pub fn before_unload(&self) -> Option<Prompt> {
        self.state
            .has_unsaved_changes()
            .then_some(Prompt::QuitWithUnsaved)
    }

    pub async fn request_quit(&mut self) -> bool {
        if let Some(prompt) = self.before_unload() {
            if !self.confirm(prompt).await {
                return false;
            }
        }
        self.state.should_quit = true;
        true
    }

    async fn activate(&mut self) {
        if self.state.history_open {
            let commit = self
                .state
                .history_data
                .get(self.state.nav.history_index)
                .map(|c| c.full_hash.clone());
            if let Some(commit) = commit {
                self.select_commit(&commit).await;
            }
            return;
        }
        match self.state.selected_sidebar_item() {
            Some(SidebarItem::Config(index)) => {
                if let Some(id) = self.state.configs.get(index).map(|c| c.id.clone()) {
                    self.select_config(&id).await;
                }
            }
            Some(SidebarItem::Category(category)) => {
                self.select_category(category).await;
            }
            None => {}
        }
    }

    pub async fn dispatch(&mut self, command: Command) {
        tracing::trace!(?command, "dispatch");
        match command {
            Command::SelectConfig(id) => {
                self.select_config(&id).await;
            }
            Command::SelectCategory(category) => {
                self.select_category(category).await;
            }
            Command::SetEditMode(enable) => {
                self.set_edit_mode(enable).await;
            }
            Command::Edit(op) => {
                self.edit(op);
            }
            Command::SetBuffer(text) => self.set_buffer(&text),
            Command::Save => {
                self.save().await;
            }
            Command::SaveShortcut => {
                self.save_shortcut().await;
            }
            Command::Discard => {
                self.discard().await;
            }
            Command::Download => {
                if let Err(e) = self.download() {
                    tracing::warn!(error = %e, "download failed");
                    self.state
                        .notify(format!("Download failed: {e}"), NotificationKind::Error);
                }
            }
            Command::Reload => {
                self.reload().await;
            }
            Command::Search(query) => self.search_packages(&query),
            Command::OpenHistory => {
                self.open_history().await;
            }
            Command::CloseHistory => self.close_history(),
            Command::SelectCommit(commit) => {
                self.select_commit(&commit).await;
            }
            Command::Escape => self.escape().await,
            Command::Quit => {
                self.request_quit().await;
            }
            Command::MoveUp => self.state.previous(),
            Command::MoveDown => self.state.next(),
            Command::Activate => self.activate().await,
            Command::Focus(focus) => self.state.nav.focus = focus,
            Command::ToggleFocus => {
                self.state.nav.focus = match self.state.nav.focus {
                    Focus::Sidebar => Focus::Content,
                    _ => Focus::Sidebar,
                };
            }
            Command::ScrollUp => self.state.scroll_up(PAGE),
            Command::ScrollDown => self.state.scroll_down(PAGE),
        }
    }
}
