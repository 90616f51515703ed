// cardcheck/src/config.rs

use anyhow::{Context, Result};
use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use tracing::debug;

use crate::card::Field;

pub const WORKSPACE_CONFIG_FILE: &str = ".cardcheck.toml";
pub const USER_CONFIG_FILE: &str = "cardcheck.toml";

/// Config is merged: defaults -> user -> workspace -> explicit file -> command line
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidatorConfig {
    pub rules: Rules,
    pub checks: Checks,
    pub severity: SeverityPolicy,
    pub output: OutputConfig,
}

impl ValidatorConfig {
    pub fn for_profile(profile: Profile) -> Self {
        Self { checks: Checks::for_profile(profile), ..Default::default() }
    }
}

/// Placeholder values shipped in the card template. A card equal to these on every field it has is unfilled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateValues {
    pub name: String,
    pub profession: String,
    pub quote: String,
    pub github: String,
}

impl Default for TemplateValues {
    fn default() -> Self {
        Self {
            name: "Your Name".into(),
            profession: "Your Profession".into(),
            quote: "\"Your favourite quote\"</br> - Said By Me".into(),
            github: "https://github.com".into(),
        }
    }
}

impl TemplateValues {
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(&self.name),
            Field::Profession => Some(&self.profession),
            Field::Quote => Some(&self.quote),
            Field::Github => Some(&self.github),
            _ => None,
        }
    }
}

/// Bare site URLs left behind when an optional link was never filled in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionalDefaults {
    pub twitter: String,
    pub dribbble: String,
    pub behance: String,
    pub linkedin: String,
}

impl Default for OptionalDefaults {
    fn default() -> Self {
        Self {
            twitter: "https://twitter.com".into(),
            dribbble: "https://dribbble.com".into(),
            behance: "https://behance.com".into(),
            linkedin: "https://linkedin.com".into(),
        }
    }
}

impl OptionalDefaults {
    pub const FIELDS: [Field; 4] = [Field::Twitter, Field::Dribbble, Field::Behance, Field::Linkedin];

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Twitter => Some(&self.twitter),
            Field::Dribbble => Some(&self.dribbble),
            Field::Behance => Some(&self.behance),
            Field::Linkedin => Some(&self.linkedin),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub templates: TemplateValues,
    pub optional_defaults: OptionalDefaults,
    /// Fields compared against each other for repeated links inside one card.
    pub link_fields: Vec<Field>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            templates: TemplateValues::default(),
            optional_defaults: OptionalDefaults::default(),
            link_fields: vec![Field::Github, Field::Linkedin, Field::Twitter, Field::Dribbble, Field::Behance, Field::Email],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Checks {
    pub email_format: bool,
    pub optional_defaults: bool,
    pub duplicate_links: bool,
    pub track_valid_names: bool,
}

impl Default for Checks {
    fn default() -> Self { Self::for_profile(Profile::Full) }
}

impl Checks {
    pub fn for_profile(profile: Profile) -> Self {
        let full = profile == Profile::Full;
        Self {
            email_format: full,
            optional_defaults: full,
            duplicate_links: full,
            track_valid_names: profile != Profile::Minimal,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityPolicy {
    /// Warnings exclude the entry from the valid list and fail the run, same as errors.
    pub warnings_fail: bool,
}

impl Default for SeverityPolicy {
    fn default() -> Self { Self { warnings_fail: true } }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Print the valid entry names after the pass banner. Implies valid-name tracking.
    pub list_valid: bool,
}

/// Named check sets matching the tool's historical behaviours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Required fields and duplicate entries only.
    Minimal,
    /// Same checks as minimal, with valid-name tracking.
    Standard,
    /// Every check.
    Full,
}

/// One config layer as written in TOML; every key optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigPatch {
    pub profile: Option<Profile>,
    pub checks: ChecksPatch,
    pub severity: SeverityPatch,
    pub output: OutputPatch,
    pub rules: RulesPatch,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChecksPatch {
    pub email_format: Option<bool>,
    pub optional_defaults: Option<bool>,
    pub duplicate_links: Option<bool>,
    pub track_valid_names: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeverityPatch {
    pub warnings_fail: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputPatch {
    pub list_valid: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesPatch {
    pub templates: TemplatesPatch,
    pub optional_defaults: DefaultsPatch,
    pub link_fields: Option<Vec<Field>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesPatch {
    pub name: Option<String>,
    pub profession: Option<String>,
    pub quote: Option<String>,
    pub github: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsPatch {
    pub twitter: Option<String>,
    pub dribbble: Option<String>,
    pub behance: Option<String>,
    pub linkedin: Option<String>,
}

fn set<T>(dst: &mut T, src: Option<T>) { if let Some(v) = src { *dst = v; } }

impl ConfigPatch {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse cardcheck config toml")
    }

    /// Profile first, then explicit keys, so `checks.*` in the same layer win over the profile.
    pub fn apply(self, cfg: &mut ValidatorConfig) {
        if let Some(p) = self.profile { cfg.checks = Checks::for_profile(p); }

        let c = &mut cfg.checks;
        set(&mut c.email_format, self.checks.email_format);
        set(&mut c.optional_defaults, self.checks.optional_defaults);
        set(&mut c.duplicate_links, self.checks.duplicate_links);
        set(&mut c.track_valid_names, self.checks.track_valid_names);

        set(&mut cfg.severity.warnings_fail, self.severity.warnings_fail);
        set(&mut cfg.output.list_valid, self.output.list_valid);

        let t = &mut cfg.rules.templates;
        set(&mut t.name, self.rules.templates.name);
        set(&mut t.profession, self.rules.templates.profession);
        set(&mut t.quote, self.rules.templates.quote);
        set(&mut t.github, self.rules.templates.github);

        let d = &mut cfg.rules.optional_defaults;
        set(&mut d.twitter, self.rules.optional_defaults.twitter);
        set(&mut d.dribbble, self.rules.optional_defaults.dribbble);
        set(&mut d.behance, self.rules.optional_defaults.behance);
        set(&mut d.linkedin, self.rules.optional_defaults.linkedin);

        set(&mut cfg.rules.link_fields, self.rules.link_fields);
    }
}

/// Finds and merges the on-disk config layers.
#[derive(Clone, Debug)]
pub struct ConfigLoader {
    user_path: Option<PathBuf>,
    workspace_path: PathBuf,
}

impl ConfigLoader {
    pub fn new(user_path: Option<PathBuf>, workspace_path: PathBuf) -> Self {
        Self { user_path, workspace_path }
    }

    /// User layer from the platform config dir, workspace layer from the current directory.
    pub fn discover() -> Self {
        let user_path = ProjectDirs::from("org", "cardcheck", "cardcheck")
            .map(|p| p.config_dir().join(USER_CONFIG_FILE));
        Self::new(user_path, PathBuf::from(WORKSPACE_CONFIG_FILE))
    }

    fn read_optional(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.is_file() { return Ok(None); }
        let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let patch = ConfigPatch::parse(&text).with_context(|| format!("in {}", path.display()))?;
        debug!(path = %path.display(), "loaded config layer");
        Ok(Some(patch))
    }

    /// `explicit` must exist; the discovered layers are skipped when absent.
    pub fn load(&self, explicit: Option<&Path>) -> Result<ValidatorConfig> {
        let mut cfg = ValidatorConfig::default();
        if let Some(user) = &self.user_path {
            if let Some(p) = Self::read_optional(user)? { p.apply(&mut cfg); }
        }
        if let Some(p) = Self::read_optional(&self.workspace_path)? { p.apply(&mut cfg); }
        if let Some(path) = explicit {
            let text = fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
            ConfigPatch::parse(&text).with_context(|| format!("in {}", path.display()))?.apply(&mut cfg);
            debug!(path = %path.display(), "loaded explicit config");
        }
        Ok(cfg)
    }
}
