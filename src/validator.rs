// cardcheck/src/validator.rs

use serde_json::Value;
use std::{collections::HashSet, path::Path};
use tracing::{debug, info};

use crate::{
    card::{Card, Field},
    config::{OptionalDefaults, ValidatorConfig},
    diagnostic::{Diagnostic, Issue, Report, Severity},
    document::Document,
};

/// (name, github), each trimmed and lowercased; a missing part is the empty string.
pub type Fingerprint = (String, String);

pub fn fingerprint(card: &Card) -> Fingerprint {
    let norm = |f: Field| card.get(f).unwrap_or("").trim().to_lowercase();
    (norm(Field::Name), norm(Field::Github))
}

pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self { Self { config } }

    pub fn validate_path(&self, path: &Path) -> Report {
        match Document::load(path) {
            Ok(doc) => self.validate_document(&doc),
            Err(e) => Report::fatal(e.into(), self.config.severity.warnings_fail),
        }
    }

    pub fn validate_str(&self, text: &str) -> Report {
        match Document::parse(text) {
            Ok(doc) => self.validate_document(&doc),
            Err(e) => Report::fatal(e.into(), self.config.severity.warnings_fail),
        }
    }

    pub fn validate_value(&self, root: Value) -> Report {
        self.validate_document(&Document::from_value(root))
    }

    pub fn validate_document(&self, doc: &Document) -> Report {
        let warnings_fail = self.config.severity.warnings_fail;
        let entries = match doc.cards() {
            Ok(entries) => entries,
            Err(e) => return Report::fatal(e.into(), warnings_fail),
        };

        let mut report = Report {
            valid_names: (self.config.checks.track_valid_names || self.config.output.list_valid).then(Vec::new),
            entries: entries.len(),
            warnings_fail,
            ..Default::default()
        };
        let mut seen: HashSet<Fingerprint> = HashSet::new();

        for (i, entry) in entries.iter().enumerate() {
            let index = i + 1;
            let Some(card) = Card::from_json(entry) else {
                report.diagnostics.push(Diagnostic::for_entry(index, format!("(unknown at index {index})"), Issue::NotAnObject));
                continue;
            };
            if self.is_template(&card) {
                debug!(index, "skipping unfilled template entry");
                report.skipped_templates += 1;
                continue;
            }

            let name = card.display_name(index);
            let issues = self.check_card(&card, &mut seen);
            let counted = issues.iter().filter(|issue| warnings_fail || issue.severity() == Severity::Error).count();
            if counted == 0 {
                if let Some(valid) = report.valid_names.as_mut() { valid.push(name.clone()); }
            }
            report.diagnostics.extend(issues.into_iter().map(|issue| Diagnostic::for_entry(index, name.clone(), issue)));
        }

        info!(
            entries = report.entries,
            skipped = report.skipped_templates,
            diagnostics = report.diagnostics.len(),
            "validation finished"
        );
        report
    }

    /// Every template field the card has equals its placeholder exactly. Absent keys are not
    /// compared; a `null` key is present and never matches.
    pub fn is_template(&self, card: &Card) -> bool {
        let templates = &self.config.rules.templates;
        Field::REQUIRED.iter()
            .filter(|&&f| card.is_present(f))
            .all(|&f| card.get(f).is_some() && card.get(f) == templates.get(f))
    }

    /// All issues for one non-template card, in reporting order. Records its fingerprint in `seen`.
    pub fn check_card(&self, card: &Card, seen: &mut HashSet<Fingerprint>) -> Vec<Issue> {
        let checks = &self.config.checks;
        let rules = &self.config.rules;
        let mut issues = Vec::new();

        for field in Field::REQUIRED {
            if card.filled(field).is_none() {
                issues.push(Issue::MissingField { field });
            }
        }

        if !seen.insert(fingerprint(card)) {
            issues.push(Issue::DuplicateEntry { github: card.github.clone() });
        }

        if checks.email_format {
            if let Some(email) = card.filled(Field::Email) {
                if !email.starts_with("mailto:") { issues.push(Issue::EmailPrefix); }
            }
        }

        if checks.optional_defaults {
            for field in OptionalDefaults::FIELDS {
                let default = rules.optional_defaults.get(field);
                if card.filled(field).is_some_and(|v| Some(v) == default) {
                    issues.push(Issue::DefaultLink { field });
                }
            }
        }

        if checks.duplicate_links {
            let mut links = HashSet::new();
            let repeated = rules.link_fields.iter()
                .filter_map(|&f| card.filled(f))
                .any(|v| !links.insert(v.to_lowercase()));
            if repeated { issues.push(Issue::DuplicateLinks); }
        }

        issues
    }
}

impl Default for Validator {
    fn default() -> Self { Self::new(ValidatorConfig::default()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Checks, Profile};
    use serde_json::json;

    fn full() -> Validator { Validator::default() }

    fn ada() -> Value {
        json!({"name": "Ada", "profession": "Engineer", "quote": "Q", "github": "https://github.com/ada"})
    }

    fn with(mut card: Value, key: &str, value: Value) -> Value {
        card[key] = value;
        card
    }

    fn doc(cards: Vec<Value>) -> Value { json!({ "cardDetails": cards }) }

    #[test]
    fn minimal_document_passes() {
        let report = full().validate_str(
            r#"{"cardDetails":[{"name":"A","profession":"B","quote":"Q","github":"https://github.com/a"}]}"#,
        );
        assert!(report.diagnostics.is_empty());
        assert!(report.passed());
        assert_eq!(report.valid_names, Some(vec!["A".to_string()]));
    }

    #[test]
    fn empty_object_is_missing_root() {
        let report = full().validate_str("{}");
        assert_eq!(report.messages(), vec!["❌ Missing 'cardDetails' key at root level."]);
        assert!(!report.passed());
        assert!(report.is_fatal());
    }

    #[test]
    fn malformed_json_yields_one_syntax_diagnostic() {
        let report = full().validate_str(r#"{"cardDetails": [1, 2,]}"#);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(matches!(report.diagnostics[0].issue, Issue::Syntax { .. }));
        assert!(report.messages()[0].starts_with("❌ JSON Syntax Error: "));
    }

    #[test]
    fn missing_profession_is_reported_once() {
        let mut card = ada();
        card.as_object_mut().unwrap().remove("profession");
        let report = full().validate_value(doc(vec![card]));
        assert_eq!(report.messages(), vec!["❌ Error in Entry 1 ('Ada') → missing required field: profession"]);
        assert_eq!(report.valid_names, Some(vec![]));
    }

    #[test]
    fn blank_required_field_counts_as_missing() {
        let report = full().validate_value(doc(vec![with(ada(), "quote", json!("   "))]));
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].issue, Issue::MissingField { field: Field::Quote });
    }

    #[test]
    fn missing_name_uses_index_placeholder() {
        let mut card = ada();
        card.as_object_mut().unwrap().remove("name");
        let report = full().validate_value(doc(vec![ada(), card]));
        assert_eq!(report.messages(), vec!["❌ Error in Entry 2 ('(unknown at index 2)') → missing required field: name"]);
    }

    #[test]
    fn duplicates_match_case_insensitively_on_second_occurrence_only() {
        let first = with(ada(), "github", json!("https://github.com/a"));
        let second = with(with(ada(), "github", json!("https://GitHub.com/A ")), "name", json!(" ada"));
        let report = full().validate_value(doc(vec![first, second]));
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].entry.as_ref().unwrap().index, 2);
        assert_eq!(
            report.messages()[0],
            "❌ Error in Entry 2 (' ada') → Duplicate entry (GitHub: https://GitHub.com/A )"
        );
        assert_eq!(report.valid_names, Some(vec!["Ada".to_string()]));
    }

    #[test]
    fn fingerprint_components_must_match_jointly() {
        let same_name = with(ada(), "github", json!("https://github.com/other"));
        let same_github = with(ada(), "name", json!("Grace"));
        let report = full().validate_value(doc(vec![ada(), same_name, same_github]));
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn template_entries_are_skipped() {
        let template = json!({
            "name": "Your Name",
            "profession": "Your Profession",
            "quote": "\"Your favourite quote\"</br> - Said By Me",
            "github": "https://github.com",
            "twitter": "https://twitter.com"
        });
        let partial = json!({"name": "Your Name", "github": "https://github.com"});
        let report = full().validate_value(doc(vec![template, partial, ada()]));
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.skipped_templates, 2);
        assert_eq!(report.valid_names, Some(vec!["Ada".to_string()]));
    }

    #[test]
    fn null_fields_are_present_and_not_a_template() {
        let all_null = json!({"name": null, "profession": null, "quote": null, "github": null});
        let report = full().validate_value(doc(vec![all_null]));
        assert_eq!(report.skipped_templates, 0);
        assert_eq!(report.diagnostics.len(), 4);
        assert!(report.diagnostics.iter().all(|d| matches!(d.issue, Issue::MissingField { .. })));
        assert!(!report.passed());

        let half = json!({"name": "Your Name", "github": null, "quote": null});
        let report = full().validate_value(doc(vec![half]));
        assert_eq!(report.skipped_templates, 0);
        assert_eq!(report.messages(), vec![
            "❌ Error in Entry 1 ('Your Name') → missing required field: profession",
            "❌ Error in Entry 1 ('Your Name') → missing required field: quote",
            "❌ Error in Entry 1 ('Your Name') → missing required field: github",
        ]);
    }

    #[test]
    fn one_changed_field_breaks_the_template_match() {
        let card = json!({"name": "Ada", "profession": "Your Profession", "github": "https://github.com"});
        let report = full().validate_value(doc(vec![card]));
        assert_eq!(report.messages(), vec!["❌ Error in Entry 1 ('Ada') → missing required field: quote"]);
    }

    #[test]
    fn email_must_use_mailto() {
        let bad = full().validate_value(doc(vec![with(ada(), "email", json!("me@x.com"))]));
        assert_eq!(bad.messages(), vec!["⚠️ Warning in Entry 1 ('Ada') → 'email' should start with 'mailto:'"]);
        assert!(!bad.passed());

        let good = full().validate_value(doc(vec![with(ada(), "email", json!("mailto:me@x.com"))]));
        assert!(good.diagnostics.is_empty());

        let blank = full().validate_value(doc(vec![with(ada(), "email", json!("  "))]));
        assert!(blank.diagnostics.is_empty());
    }

    #[test]
    fn default_optional_links_warn_per_field() {
        let card = with(with(ada(), "twitter", json!(" https://twitter.com ")), "linkedin", json!("https://linkedin.com"));
        let report = full().validate_value(doc(vec![card]));
        let fields: Vec<_> = report.diagnostics.iter().map(|d| d.issue.clone()).collect();
        assert_eq!(fields, vec![
            Issue::DefaultLink { field: Field::Twitter },
            Issue::DefaultLink { field: Field::Linkedin },
        ]);

        let filled = with(ada(), "twitter", json!("https://twitter.com/ada"));
        assert!(full().validate_value(doc(vec![filled])).diagnostics.is_empty());
    }

    #[test]
    fn repeated_links_warn_once_per_entry() {
        let card = with(with(with(ada(), "twitter", json!("https://x.io/ada")), "dribbble", json!("HTTPS://X.IO/ADA")), "behance", json!("https://github.com/ada"));
        let report = full().validate_value(doc(vec![card]));
        assert_eq!(report.messages(), vec!["⚠️ Warning in Entry 1 ('Ada') → Duplicate links found in optional fields."]);
    }

    #[test]
    fn listing_valid_names_turns_tracking_on() {
        let mut cfg = ValidatorConfig::for_profile(Profile::Minimal);
        cfg.output.list_valid = true;
        let report = Validator::new(cfg).validate_value(doc(vec![ada()]));
        assert_eq!(report.valid_names, Some(vec!["Ada".to_string()]));
    }

    #[test]
    fn disabled_checks_emit_nothing() {
        let v = Validator::new(ValidatorConfig::for_profile(Profile::Minimal));
        let card = with(with(with(ada(), "email", json!("me@x.com")), "twitter", json!("https://twitter.com")), "linkedin", json!("https://github.com/ada"));
        let report = v.validate_value(doc(vec![card]));
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.valid_names, None);
    }

    #[test]
    fn lenient_warnings_keep_entry_valid_and_pass() {
        let mut cfg = ValidatorConfig::default();
        cfg.severity.warnings_fail = false;
        let report = Validator::new(cfg).validate_value(doc(vec![with(ada(), "email", json!("me@x.com"))]));
        assert_eq!(report.warnings().count(), 1);
        assert!(report.passed());
        assert_eq!(report.valid_names, Some(vec!["Ada".to_string()]));
    }

    #[test]
    fn non_object_entry_is_an_error_and_iteration_continues() {
        let mut second = ada();
        second.as_object_mut().unwrap().remove("github");
        let report = full().validate_value(doc(vec![json!("oops"), second]));
        assert_eq!(report.messages(), vec![
            "❌ Error in Entry 1 ('(unknown at index 1)') → entry is not a JSON object",
            "❌ Error in Entry 2 ('Ada') → missing required field: github",
        ]);
    }

    #[test]
    fn card_details_must_be_an_array() {
        let report = full().validate_value(json!({"cardDetails": {"name": "Ada"}}));
        assert_eq!(report.messages(), vec!["❌ 'cardDetails' must be an array of card objects."]);
    }

    #[test]
    fn alternate_rules_change_template_and_defaults() {
        let mut cfg = ValidatorConfig { checks: Checks::for_profile(Profile::Full), ..Default::default() };
        cfg.rules.templates.name = "Dein Name".into();
        cfg.rules.optional_defaults.twitter = "https://x.com".into();
        let v = Validator::new(cfg);
        let template = json!({"name": "Dein Name"});
        let card = with(ada(), "twitter", json!("https://x.com"));
        let report = v.validate_value(doc(vec![template, card]));
        assert_eq!(report.skipped_templates, 1);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].issue, Issue::DefaultLink { field: Field::Twitter });
    }

    #[test]
    fn missing_file_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let report = full().validate_path(&path);
        assert_eq!(report.messages(), vec![format!("❌ File not found: {}", path.display())]);
    }

    #[test]
    fn fingerprint_normalizes_both_parts() {
        let card = Card { name: Some("  Ada ".into()), github: Some("HTTPS://GITHUB.COM/ADA".into()), ..Default::default() };
        assert_eq!(fingerprint(&card), ("ada".to_string(), "https://github.com/ada".to_string()));
        assert_eq!(fingerprint(&Card::default()), (String::new(), String::new()));
    }
}
