// cardcheck/src/output.rs

use serde::Serialize;

use crate::diagnostic::{Diagnostic, Issue, Report, Severity};

pub const PASSED_BANNER: &str = "✅ JSON Validation Passed!";
pub const VALID_HEADER: &str = "👥 Valid Entries:";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode { Text, Json, Quiet }

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
struct DiagnosticOut<'a> {
    severity: Severity,
    index: Option<usize>,
    name: Option<&'a str>,
    message: String,
    #[serde(flatten)]
    issue: &'a Issue,
}

impl<'a> From<&'a Diagnostic> for DiagnosticOut<'a> {
    fn from(d: &'a Diagnostic) -> Self {
        Self {
            severity: d.severity(),
            index: d.entry.as_ref().map(|e| e.index),
            name: d.entry.as_ref().map(|e| e.name.as_str()),
            message: d.to_string(),
            issue: &d.issue,
        }
    }
}

#[derive(Serialize)]
struct ReportOut<'a> {
    entries: usize,
    skipped_templates: usize,
    errors: usize,
    warnings: usize,
    diagnostics: Vec<DiagnosticOut<'a>>,
    valid_names: Option<&'a [String]>,
}

/// Lines printed for a report in text mode.
pub fn text_lines(report: &Report, list_valid: bool) -> Vec<String> {
    let mut lines = report.messages();
    if !report.passed() { return lines; }
    lines.push(PASSED_BANNER.to_string());
    if list_valid {
        if let Some(names) = &report.valid_names {
            lines.push(VALID_HEADER.to_string());
            lines.extend(names.iter().map(|n| format!("   - {n}")));
        }
    }
    lines
}

pub fn json_text(report: &Report) -> anyhow::Result<String> {
    let data = ReportOut {
        entries: report.entries,
        skipped_templates: report.skipped_templates,
        errors: report.errors().count(),
        warnings: report.warnings().count(),
        diagnostics: report.diagnostics.iter().map(DiagnosticOut::from).collect(),
        valid_names: report.valid_names.as_deref(),
    };
    Ok(serde_json::to_string_pretty(&JsonOut { ok: report.passed(), data })?)
}

pub fn print_report(report: &Report, mode: OutputMode, list_valid: bool) -> anyhow::Result<()> {
    match mode {
        OutputMode::Quiet => {}
        OutputMode::Json => println!("{}", json_text(report)?),
        OutputMode::Text => {
            for line in text_lines(report, list_valid) { println!("{line}"); }
        }
    }
    Ok(())
}
