//! Shared fixtures for the integration tests: an in-memory backend and a
//! prompter with scripted answers.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;

use dotdash::api::{ApiClient, RawResponse, Result, Transport};
use dotdash::ui::app::{AppState, Prompt};
use dotdash::ui::{Controller, Prompter};

/// Backend answering from a route table keyed by `"GET /path"` or
/// `"PUT /path"`. Unknown routes answer 404.
#[derive(Default)]
pub struct FakeBackend {
    routes: Mutex<HashMap<String, RawResponse>>,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn route(&self, route: &str, body: &str) {
        self.routes
            .lock()
            .expect("routes")
            .insert(route.to_string(), RawResponse::ok(body));
    }

    pub fn route_status(&self, route: &str, status: u16, status_text: &str) {
        self.routes.lock().expect("routes").insert(
            route.to_string(),
            RawResponse {
                status,
                status_text: status_text.to_string(),
                body: String::new(),
            },
        );
    }

    /// Every request seen so far, as `"GET /path"` or `"PUT /path body"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls").clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    async fn respond(&self, route: String, call: String) -> Result<RawResponse> {
        self.calls.lock().expect("calls").push(call);
        tokio::task::yield_now().await;
        Ok(self
            .routes
            .lock()
            .expect("routes")
            .get(&route)
            .cloned()
            .unwrap_or(RawResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                body: String::new(),
            }))
    }
}

impl Transport for FakeBackend {
    async fn get(&self, path: &str) -> Result<RawResponse> {
        let route = format!("GET {path}");
        self.respond(route.clone(), route).await
    }

    async fn put_json(&self, path: &str, body: String) -> Result<RawResponse> {
        self.respond(format!("PUT {path}"), format!("PUT {path} {body}"))
            .await
    }
}

/// Answers confirmations from a queue and records what was asked.
/// An exhausted queue declines.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<bool>,
    pub asked: Vec<Prompt>,
}

impl ScriptedPrompter {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    async fn confirm(&mut self, state: &AppState) -> bool {
        let prompt = state
            .pending_confirmation
            .expect("confirmation asked without a pending prompt");
        self.asked.push(prompt);
        self.answers.pop_front().unwrap_or(false)
    }
}

pub const CONFIGS: &str = r#"[
  {"id": "zshrc", "displayName": ".zshrc", "software": "Zsh", "category": "shell",
   "format": "shell", "sourcePath": "~/.zshrc"},
  {"id": "gitconfig", "displayName": "git/config", "software": "Git", "category": "vcs",
   "format": "ini", "sourcePath": "~/.config/git/config"}
]"#;

pub const HISTORY: &str = r#"[
  {"hash": "def456", "fullHash": "def456", "message": "Add aliases",
   "author": "dev", "date": "2025-01-09 10:00:00 +0000"},
  {"hash": "abc123", "fullHash": "abc123", "message": "Initial commit",
   "author": "dev", "date": "2024-12-01 09:30:00 +0000"}
]"#;

/// Backend with two configs, package lists and history for `zshrc`.
pub fn backend() -> FakeBackend {
    let backend = FakeBackend::default();
    backend.route("GET /api/configs", CONFIGS);
    backend.route(
        "GET /api/configs/zshrc",
        r#"{"id": "zshrc", "displayName": ".zshrc", "software": "Zsh", "category": "shell",
            "format": "shell", "sourcePath": "~/.zshrc", "content": "echo hi\n", "size": 8,
            "modified": "2025-01-09 10:00:00 +0000"}"#,
    );
    backend.route(
        "GET /api/configs/gitconfig",
        r#"{"id": "gitconfig", "displayName": "git/config", "software": "Git", "category": "vcs",
            "format": "ini", "sourcePath": "~/.config/git/config",
            "content": "[user]\nname = dev\n", "size": 19}"#,
    );
    backend.route(
        "GET /api/brew/formulae",
        r#"[{"name": "ripgrep"}, {"name": "fd"}]"#,
    );
    backend.route(
        "GET /api/brew/casks",
        r#"[{"name": "firefox"}, {"name": "kitty"}]"#,
    );
    backend.route("GET /api/brew/taps", r#"[{"name": "homebrew/core"}]"#);
    backend.route("GET /api/history/zshrc", HISTORY);
    backend.route(
        "GET /api/history/zshrc/def456",
        r#"{"diff": "--- a/.zshrc\n+++ b/.zshrc\n@@ -1 +1,2 @@\n echo hi\n+alias ll='ls -l'"}"#,
    );
    backend.route(
        "GET /api/history/zshrc/abc123",
        r#"{"diff": "+echo hi"}"#,
    );
    backend
}

pub type TestController = Controller<FakeBackend, ScriptedPrompter>;

pub fn controller_with(backend: FakeBackend, answers: &[bool]) -> TestController {
    Controller::new(
        ApiClient::new(backend),
        ScriptedPrompter::answering(answers),
        PathBuf::from("."),
    )
}

pub fn controller(answers: &[bool]) -> TestController {
    controller_with(backend(), answers)
}

/// Initialised controller with `zshrc` open in edit mode.
pub async fn editing(answers: &[bool]) -> TestController {
    let mut controller = controller(answers);
    assert!(controller.init().await);
    assert!(controller.select_config("zshrc").await);
    assert!(controller.set_edit_mode(true).await);
    controller
}
