//! Wire types of the dashboard backend.
//!
//! Field names follow the backend's camelCase JSON.

use serde::{Deserialize, Serialize};

/// A managed config file as listed by `GET /api/configs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub software: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub source_path: String,
    #[serde(default)]
    pub docs: String,
    #[serde(default)]
    pub repo: String,
}

/// A config file with its content, as returned by `GET /api/configs/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(flatten)]
    pub summary: ConfigSummary,
    pub content: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub modified: Option<String>,
}

impl Config {
    pub fn id(&self) -> &str {
        &self.summary.id
    }

    pub fn format(&self) -> &str {
        &self.summary.format
    }

    pub fn display_name(&self) -> &str {
        &self.summary.display_name
    }
}

/// Body of `PUT /api/configs/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct SaveRequest<'a> {
    pub content: &'a str,
}

/// Reply to a save. `success` must be checked even on a 2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub backup: Option<String>,
}

/// Package-manager listing bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Formulae,
    Casks,
    Taps,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Formulae, Category::Casks, Category::Taps];

    /// Path segment used by `GET /api/brew/{category}`.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Formulae => "formulae",
            Category::Casks => "casks",
            Category::Taps => "taps",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Formulae => "Formulae",
            Category::Casks => "Casks",
            Category::Taps => "Taps",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Category::Formulae => 0,
            Category::Casks => 1,
            Category::Taps => 2,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
}

/// One entry of a file's version-control history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub hash: String,
    pub full_hash: String,
    pub message: String,
    pub author: String,
    pub date: String,
}

/// Reply of `GET /api/history/{configId}/{commit}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiffResponse {
    #[serde(default)]
    pub diff: Option<String>,
}
