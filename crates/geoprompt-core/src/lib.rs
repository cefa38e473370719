// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Online half of geoprompt: geocoding, directions, the optional remote
//! classifier and the dispatcher that draws an intent onto a map.

pub mod classifier;
pub mod config;
pub mod directions;
pub mod dispatch;
pub mod geocoder;
pub mod geometry;
pub mod history;
pub mod map;
pub mod pipeline;
pub mod session;

use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub use config::AppConfig;
pub use dispatch::{DispatchError, RenderOutcome, VisualizationDispatcher};
pub use geocoder::Geocoder;
pub use map::{MapHandle, SceneRecorder};
pub use pipeline::QueryProcessor;
pub use session::ConversationContext;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Directory holding config.json, nlp_rules.json and search_history.json.
pub fn get_config_root() -> PathBuf {
    ProjectDirs::from("org", "geoprompt", "geoprompt")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".geoprompt"))
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, CoreError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("geoprompt/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
