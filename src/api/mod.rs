//! # API Module
//!
//! Client for the dashboard backend.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/api/configs` | [`ApiClient::list_configs`] |
//! | GET | `/api/configs/{id}` | [`ApiClient::get_config`] |
//! | PUT | `/api/configs/{id}` | [`ApiClient::update_config`] |
//! | GET | `/api/brew/{category}` | [`ApiClient::list_packages`] (cached) |
//! | GET | `/api/history/{configId}` | [`ApiClient::get_history`] |
//! | GET | `/api/history/{configId}/{commit}` | [`ApiClient::get_diff`] |

pub mod client;
pub mod error;
pub mod http;
pub mod model;

pub use client::{ApiClient, RawResponse, Transport, SAVE_FAILED};
pub use error::{ApiError, Result};
pub use http::{HttpTransport, DEFAULT_SERVER};
pub use model::{Category, Commit, Config, ConfigSummary, Package, SaveResponse};
