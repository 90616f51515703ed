// cardcheck/src/diagnostic.rs

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::card::Field;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity { Error, Warning }

impl Severity {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Error => "❌",
            Self::Warning => "⚠️",
        }
    }
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

/// What went wrong. The `Display` text is the tail of the printed diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    #[error("File not found: {path}")]
    FileNotFound { path: String },
    #[error("Could not read {path}: {reason}")]
    Unreadable { path: String, reason: String },
    #[error("JSON Syntax Error: {message}")]
    Syntax { message: String },
    #[error("Missing 'cardDetails' key at root level.")]
    MissingRoot,
    #[error("'cardDetails' must be an array of card objects.")]
    RootNotArray,

    #[error("entry is not a JSON object")]
    NotAnObject,
    #[error("missing required field: {field}")]
    MissingField { field: Field },
    #[error("Duplicate entry (GitHub: {})", .github.as_deref().unwrap_or("None"))]
    DuplicateEntry { github: Option<String> },

    #[error("'email' should start with 'mailto:'")]
    EmailPrefix,
    #[error("Optional field '{field}' has default value. Please remove or update this field.")]
    DefaultLink { field: Field },
    #[error("Duplicate links found in optional fields.")]
    DuplicateLinks,
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Self::EmailPrefix | Self::DefaultLink { .. } | Self::DuplicateLinks => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Fatal issues end the run before any entry is looked at.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. } | Self::Unreadable { .. } | Self::Syntax { .. } | Self::MissingRoot | Self::RootNotArray
        )
    }
}

/// Which entry a diagnostic is about: 1-based position and the name it is shown under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryRef {
    pub index: usize,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub entry: Option<EntryRef>,
    pub issue: Issue,
}

impl Diagnostic {
    pub fn fatal(issue: Issue) -> Self { Self { entry: None, issue } }

    pub fn for_entry(index: usize, name: impl Into<String>, issue: Issue) -> Self {
        Self { entry: Some(EntryRef { index, name: name.into() }), issue }
    }

    pub fn severity(&self) -> Severity { self.issue.severity() }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sev = self.severity();
        match &self.entry {
            None => write!(f, "{} {}", sev.symbol(), self.issue),
            Some(e) => write!(f, "{} {} in Entry {} ('{}') → {}", sev.symbol(), sev.label(), e.index, e.name, self.issue),
        }
    }
}

/// Result of one validation run.
#[derive(Clone, Debug, Default)]
pub struct Report {
    pub diagnostics: Vec<Diagnostic>,
    /// Present only when valid-name tracking is switched on.
    pub valid_names: Option<Vec<String>>,
    pub entries: usize,
    pub skipped_templates: usize,
    /// Whether warnings fail the run (copied from the config that produced this report).
    pub warnings_fail: bool,
}

impl Report {
    pub(crate) fn fatal(issue: Issue, warnings_fail: bool) -> Self {
        Self { diagnostics: vec![Diagnostic::fatal(issue)], warnings_fail, ..Default::default() }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity() == Severity::Warning)
    }

    pub fn is_fatal(&self) -> bool { self.diagnostics.iter().any(|d| d.issue.is_fatal()) }

    pub fn passed(&self) -> bool {
        if self.warnings_fail { self.diagnostics.is_empty() } else { self.errors().next().is_none() }
    }

    pub fn messages(&self) -> Vec<String> { self.diagnostics.iter().map(|d| d.to_string()).collect() }
}
