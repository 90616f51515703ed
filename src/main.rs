// cardcheck/src/main.rs

use anyhow::Result;
use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use tracing::debug;

use cardcheck::{config::Checks, output, ConfigLoader, OutputMode, Profile, Validator, ValidatorConfig};

const USAGE: &str = "❌ Usage: cardcheck <path_to_json_file>";

#[derive(Parser, Debug)]
#[command(name = "cardcheck", version, about = "Validate a contributor cards JSON file")]
struct Args {
    /// Path to the JSON file holding `cardDetails`
    file: Option<PathBuf>,
    /// Extra TOML config layered over the user and workspace files
    #[arg(long)]
    config: Option<PathBuf>,
    /// Check set to start from: minimal | standard | full
    #[arg(long, value_enum)]
    profile: Option<Profile>,
    #[arg(long)]
    no_email_check: bool,
    #[arg(long)]
    no_default_check: bool,
    #[arg(long)]
    no_duplicate_link_check: bool,
    /// Report warnings without failing the run
    #[arg(long)]
    warnings_pass: bool,
    /// Print the names of entries that passed every check
    #[arg(long)]
    list_valid: bool,
    /// Print the report as JSON
    #[arg(long, conflicts_with = "quiet")]
    json: bool,
    /// Print nothing; the exit code is the result
    #[arg(long, short)]
    quiet: bool,
}

impl Args {
    fn apply(&self, cfg: &mut ValidatorConfig) {
        if let Some(p) = self.profile { cfg.checks = Checks::for_profile(p); }
        if self.no_email_check { cfg.checks.email_format = false; }
        if self.no_default_check { cfg.checks.optional_defaults = false; }
        if self.no_duplicate_link_check { cfg.checks.duplicate_links = false; }
        if self.warnings_pass { cfg.severity.warnings_fail = false; }
        if self.list_valid { cfg.output.list_valid = true; }
    }

    fn mode(&self) -> OutputMode {
        if self.quiet { OutputMode::Quiet } else if self.json { OutputMode::Json } else { OutputMode::Text }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("cardcheck: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<bool> {
    let Some(file) = &args.file else {
        println!("{USAGE}");
        return Ok(false);
    };

    let mut cfg = ConfigLoader::discover().load(args.config.as_deref())?;
    args.apply(&mut cfg);
    debug!(checks = ?cfg.checks, severity = ?cfg.severity, "effective config");

    let list_valid = cfg.output.list_valid;
    let report = Validator::new(cfg).validate_path(file);
    output::print_report(&report, args.mode(), list_valid)?;
    Ok(report.passed())
}
