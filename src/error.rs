//! Construction-time errors
//!
//! The simulation itself is closed over in-memory state and never fails once a
//! session is built. Everything here is raised while assembling config,
//! rulesets and sprites, or while reading/writing the optional JSON files.

use std::path::PathBuf;

use crate::assets::SpriteKey;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown ship color: {0:?} (expected red, green or blue)")]
    UnknownColor(String),

    #[error("unknown ruleset: {0:?} (expected basic or extended)")]
    UnknownRuleset(String),

    #[error("unknown pickup effect: {0:?}")]
    UnknownEffect(String),

    #[error("sprite sheet has no image for {0:?}")]
    MissingSprite(SpriteKey),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}
