// cardcheck/src/document.rs

use serde_json::Value;
use std::{fs, io, path::Path};
use thiserror::Error;
use tracing::debug;

use crate::diagnostic::Issue;

pub const ROOT_KEY: &str = "cardDetails";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {path}")]
    NotFound { path: String },
    #[error("read {path}: {source}")]
    Read { path: String, #[source] source: io::Error },
    #[error("json syntax: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("missing `cardDetails` key")]
    MissingRoot,
    #[error("`cardDetails` is not an array")]
    RootNotArray,
}

impl From<LoadError> for Issue {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::NotFound { path } => Issue::FileNotFound { path },
            LoadError::Read { path, source } => Issue::Unreadable { path, reason: source.to_string() },
            LoadError::Syntax(err) => Issue::Syntax { message: err.to_string() },
            LoadError::MissingRoot => Issue::MissingRoot,
            LoadError::RootNotArray => Issue::RootNotArray,
        }
    }
}

/// The parsed root value of a cards file.
#[derive(Clone, Debug)]
pub struct Document {
    root: Value,
}

impl Document {
    pub fn from_value(root: Value) -> Self { Self { root } }

    pub fn parse(text: &str) -> Result<Self, LoadError> {
        Ok(Self::from_value(serde_json::from_str(text)?))
    }

    /// Reads the whole file before parsing; the handle is closed when `fs::read` returns.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.is_file() {
            return Err(LoadError::NotFound { path: path.display().to_string() });
        }
        let bytes = fs::read(path).map_err(|source| LoadError::Read { path: path.display().to_string(), source })?;
        debug!(path = %path.display(), bytes = bytes.len(), "read cards file");
        Ok(Self::from_value(serde_json::from_slice(&bytes)?))
    }

    /// The `cardDetails` sequence. A root that is not an object has no such key.
    pub fn cards(&self) -> Result<&[Value], LoadError> {
        match self.root.get(ROOT_KEY) {
            None => Err(LoadError::MissingRoot),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(LoadError::RootNotArray),
        }
    }
}
