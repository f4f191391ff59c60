//! Error type for the facade.

use std::io;
use std::path::PathBuf;

use tinct_customize::{CustomizeError, ResetError};
use tinct_preview::PreviewError;
use tinct_schema::{SchemaError, StoreError};
use tinct_tokens::TokenError;

/// Every failure the facade can surface, by layer.
#[derive(Debug, thiserror::Error)]
pub enum TinctError {
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error(transparent)]
    Tokens(#[from] TokenError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Customize(#[from] CustomizeError),

    #[error(transparent)]
    Reset(#[from] ResetError),

    #[error(transparent)]
    Preview(#[from] PreviewError),
}

pub type Result<T> = std::result::Result<T, TinctError>;
