pub mod card;
pub mod config;
pub mod diagnostic;
pub mod document;
pub mod output;
pub mod validator;

pub use card::{Card, Field};
pub use config::{Checks, ConfigLoader, ConfigPatch, OutputConfig, Profile, Rules, SeverityPolicy, ValidatorConfig};
pub use diagnostic::{Diagnostic, EntryRef, Issue, Report, Severity};
pub use document::{Document, LoadError};
pub use output::OutputMode;
pub use validator::{fingerprint, Fingerprint, Validator};
