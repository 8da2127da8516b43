//! Error types shared by every subcommand.

// Some variants are only constructed on one platform.
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppdexError {
    #[error("failed to access {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {}", .path.display(), .source)]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse property list at {}: {}", .path.display(), .source)]
    PlistParseFailed {
        path: PathBuf,
        #[source]
        source: plist::Error,
    },

    #[error("not an application bundle: {}", .path.display())]
    NotABundle { path: PathBuf },

    #[error("no icon found for {}", .path.display())]
    NoIcon { path: PathBuf },

    #[error("no usable image in icon file {}", .path.display())]
    NoUsableIcon { path: PathBuf },

    #[error("{operation} is not supported on this platform")]
    UnsupportedPlatform { operation: &'static str },

    #[error("could not determine the frontmost application")]
    NoFrontmostApp,

    #[error("frontmost application has no bundle location")]
    NoBundleLocation,
}

impl AppdexError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppdexError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppdexError>;
