//! Sidenote CLI - resolves inline annotation markers in essay documents

mod io;
mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::error;

use sidenote_core::{
    transform_document, Node, TransformOptions, TransformOutcome, TransformReport,
};

#[derive(Debug, Parser)]
#[command(name = "sidenote", version, about = "Resolve [[mode:key|text]] annotation markers")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Transform documents and write `<stem>.tree.json` for each
    Transform(TransformArgs),
    /// Transform documents without writing output and print a summary
    Check(CommonArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Markdown-style prose
    Prose,
    /// A document tree in JSON node format
    Tree,
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Documents to process
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// JSON config file with transform options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rendering component name
    #[arg(long)]
    component: Option<String>,

    /// Module specifier for the component import
    #[arg(long)]
    import_source: Option<String>,

    /// Sidecar suffix replacing the document extension
    #[arg(long)]
    sidecar_suffix: Option<String>,

    #[arg(long, value_enum, default_value_t = InputFormat::Prose)]
    input_format: InputFormat,

    /// Treat unresolved markers as failures
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Args)]
struct TransformArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Directory for output files (default: next to each input)
    #[arg(long, conflicts_with = "stdout")]
    out_dir: Option<PathBuf>,

    /// Print output to stdout instead of writing files
    #[arg(long)]
    stdout: bool,
}

impl CommonArgs {
    fn options(&self) -> Result<TransformOptions> {
        let mut options = io::load_options(self.config.as_deref())?;
        if let Some(component) = &self.component {
            options.component_name = component.clone();
        }
        if let Some(source) = &self.import_source {
            options.import_source = source.clone();
        }
        if let Some(suffix) = &self.sidecar_suffix {
            options.sidecar_suffix = suffix.clone();
        }
        Ok(options)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _logger = match logging::init_logging(&cli.log_level) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every document passed
fn run(command: Command) -> Result<bool> {
    match command {
        Command::Transform(args) => transform(&args),
        Command::Check(args) => check(&args),
    }
}

fn passed(report: &TransformReport, strict: bool) -> bool {
    !report.is_aborted() && !(strict && report.unresolved > 0)
}

/// Load one input, logging the failure instead of ending the batch
fn load(file: &Path, format: InputFormat) -> Option<(PathBuf, Node)> {
    match io::load_document(file, format) {
        Ok(loaded) => Some(loaded),
        Err(e) => {
            error!("event=document_unreadable path={} error={:#}", file.display(), e);
            None
        }
    }
}

// Diagnostics reach stderr through the core's log events, not printed here.
fn transform(args: &TransformArgs) -> Result<bool> {
    let options = args.common.options()?;
    let mut ok = true;

    for file in &args.common.files {
        let Some((document, mut tree)) = load(file, args.common.input_format) else {
            ok = false;
            continue;
        };
        let report = transform_document(&mut tree, &document, &options);
        ok &= passed(&report, args.common.strict);

        if report.outcome == TransformOutcome::Aborted {
            error!("event=document_skipped document={}", report.document);
            continue;
        }

        if args.stdout {
            let json = sidenote_core::to_json(&tree, &report)
                .context("Failed to serialize document")?;
            println!("{}", json);
            continue;
        }
        match io::export_document(&tree, &report, &document, args.out_dir.as_deref()) {
            Ok(path) => eprintln!("Wrote {}", path.display()),
            Err(e) => {
                error!("event=export_failed document={} error={:#}", report.document, e);
                ok = false;
            }
        }
    }

    Ok(ok)
}

fn check(args: &CommonArgs) -> Result<bool> {
    let options = args.options()?;
    let mut ok = true;

    for file in &args.files {
        let Some((document, mut tree)) = load(file, args.input_format) else {
            ok = false;
            continue;
        };
        let report = transform_document(&mut tree, &document, &options);
        println!(
            "{}: {} (resolved {}, unresolved {})",
            report.document,
            report.outcome.as_str(),
            report.resolved,
            report.unresolved
        );
        ok &= passed(&report, args.strict);
    }

    Ok(ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "sidenote",
            "check",
            "essay.mdx",
            "--component",
            "Gloss",
            "--sidecar-suffix",
            ".notes.json",
        ]);
        let Command::Check(args) = cli.command else {
            panic!("expected check");
        };
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("sidenote.json");
        std::fs::write(&config, r#"{ "componentName": "FromConfig" }"#).unwrap();
        let args = CommonArgs {
            config: Some(config),
            ..args
        };

        let options = args.options().unwrap();
        assert_eq!(options.component_name, "Gloss");
        assert_eq!(options.sidecar_suffix, ".notes.json");
        assert_eq!(options.import_source, TransformOptions::default().import_source);
    }

    fn common_args(files: Vec<PathBuf>) -> CommonArgs {
        CommonArgs {
            files,
            config: None,
            component: None,
            import_source: None,
            sidecar_suffix: None,
            input_format: InputFormat::Prose,
            strict: false,
        }
    }

    #[test]
    fn test_transform_batch_continues_past_bad_documents() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");

        let missing = dir.path().join("missing.mdx");
        let broken = dir.path().join("broken.mdx");
        std::fs::write(&broken, "[[term:alpha|alpha]]").unwrap();
        std::fs::write(dir.path().join("broken.annotations.json"), "{ not json").unwrap();
        let good = dir.path().join("good.mdx");
        std::fs::write(&good, "[[term:alpha|alpha]]").unwrap();
        std::fs::write(
            dir.path().join("good.annotations.json"),
            r#"{ "terms": [{ "key": "alpha", "definition": "First." }] }"#,
        )
        .unwrap();

        let config = dir.path().join("sidenote.json");
        std::fs::write(&config, "{}").unwrap();
        let args = TransformArgs {
            common: CommonArgs {
                config: Some(config),
                ..common_args(vec![missing, broken, good])
            },
            out_dir: Some(out_dir.clone()),
            stdout: false,
        };

        assert!(!transform(&args).unwrap());
        assert!(!out_dir.join("missing.tree.json").exists());
        assert!(!out_dir.join("broken.tree.json").exists());

        let written: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(out_dir.join("good.tree.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(written["resolved"], 1);
    }

    #[test]
    fn test_check_reports_failure_for_unreadable_input() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.mdx");
        std::fs::write(&good, "No markers.").unwrap();
        let config = dir.path().join("sidenote.json");
        std::fs::write(&config, "{}").unwrap();

        let args = CommonArgs {
            config: Some(config.clone()),
            ..common_args(vec![dir.path().join("missing.mdx"), good.clone()])
        };
        assert!(!check(&args).unwrap());

        let args = CommonArgs {
            config: Some(config),
            ..common_args(vec![good])
        };
        assert!(check(&args).unwrap());
    }

    #[test]
    fn test_strict_fails_on_unresolved() {
        let mut report = TransformReport {
            document: "essay.mdx".to_string(),
            sidecar: None,
            outcome: TransformOutcome::Transformed,
            resolved: 1,
            unresolved: 1,
            import_injected: true,
            diagnostics: Vec::new(),
        };
        assert!(passed(&report, false));
        assert!(!passed(&report, true));

        report.outcome = TransformOutcome::Aborted;
        assert!(!passed(&report, false));
    }
}
