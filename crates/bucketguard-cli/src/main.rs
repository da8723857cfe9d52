//! CLI entry point for bucketguard.
//!
//! This module is intentionally thin: it handles argument parsing, logging setup, I/O, and exit
//! codes. All business logic lives in the `bucketguard-app` crate.

use anyhow::Context;
use bucketguard_app::{
    AuditError, AuditInput, ExplainOutput, Notifier, audit_exit_code, build_notifier,
    build_recorder, format_explanation, format_not_found, parse_report_json, render_annotations,
    render_markdown, run_audit, run_evaluate, run_explain, runtime_error_report, to_renderable,
    write_report, write_text,
};
use bucketguard_inventory::InventorySnapshot;
use bucketguard_settings::{BucketguardConfigV1, Overrides, ResolvedConfig};
use bucketguard_types::FailureStage;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(
    name = "bucketguard",
    version,
    about = "Public-exposure audit for cloud storage buckets"
)]
struct Cli {
    /// Path to bucketguard config TOML (a missing file means defaults).
    #[arg(long, default_value = "bucketguard.toml")]
    config: Utf8PathBuf,

    /// Override profile (standard|strict|report).
    #[arg(long)]
    profile: Option<String>,

    /// Override the failure threshold (error|warning|never).
    #[arg(long)]
    fail_on: Option<String>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Audit every bucket of an inventory snapshot and write artifacts.
    Audit {
        /// Inventory snapshot directory (one sub-directory per bucket).
        #[arg(long)]
        inventory: Utf8PathBuf,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/bucketguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/bucketguard/comment.md")]
        markdown_out: Utf8PathBuf,

        /// Override the alert destination (stdout|none|file:<path>).
        #[arg(long)]
        notification_target: Option<String>,

        /// Override the record store path (`none` disables recording).
        #[arg(long)]
        record_store: Option<String>,
    },

    /// Evaluate a single bucket directory and print its verdict as JSON.
    Evaluate {
        /// Bucket directory holding the access documents; its name is the bucket name.
        bucket_dir: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/bucketguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/bucketguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a check_id or code with remediation guidance.
    Explain {
        /// The check_id (e.g., "exposure.acl") or code (e.g., "acl_all_users") to explain.
        identifier: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    match cli.cmd {
        Commands::Audit {
            ref inventory,
            ref report_out,
            write_markdown,
            ref markdown_out,
            ref notification_target,
            ref record_store,
        } => cmd_audit(
            &cli,
            AuditArgs {
                inventory,
                report_out,
                write_markdown,
                markdown_out,
                notification_target: notification_target.clone(),
                record_store: record_store.clone(),
            },
        ),
        Commands::Evaluate { ref bucket_dir } => cmd_evaluate(bucket_dir),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Annotations { report, max } => cmd_annotations(report, max),
        Commands::Explain { identifier } => cmd_explain(&identifier),
    }
}

/// Logs go to stderr; stdout carries alerts and rendered output.
fn init_logging(level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer.json())
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .init();
        }
    }
}

struct AuditArgs<'a> {
    inventory: &'a Utf8Path,
    report_out: &'a Utf8Path,
    write_markdown: bool,
    markdown_out: &'a Utf8Path,
    notification_target: Option<String>,
    record_store: Option<String>,
}

fn cmd_audit(cli: &Cli, args: AuditArgs<'_>) -> anyhow::Result<()> {
    let mut profile = cli.profile.clone();
    let mut notifier: Option<Box<dyn Notifier>> = None;

    let result = (|| -> anyhow::Result<i32> {
        let overrides = Overrides {
            profile: cli.profile.clone(),
            fail_on: cli.fail_on.clone(),
            notification_target: args.notification_target.clone(),
            record_store: args.record_store.clone(),
        };
        let resolved = load_config(&cli.config, overrides)?;
        let effective = resolved.effective;
        profile = Some(effective.profile.clone());
        tracing::debug!(
            profile = %effective.profile,
            inventory = %args.inventory,
            "resolved configuration"
        );

        let snapshot = InventorySnapshot::new(args.inventory.to_path_buf());
        let notifier = notifier.insert(build_notifier(&effective.notification_target));
        let mut recorder = build_recorder(&effective).context("open record store")?;

        let report = run_audit(AuditInput {
            lister: &snapshot,
            fetcher: &snapshot,
            notifier: notifier.as_mut(),
            recorder: recorder.as_mut(),
            config: &effective,
        })?;

        write_report(args.report_out, &report).context("write report json")?;

        if args.write_markdown {
            let md = render_markdown(&to_renderable(&report));
            write_text(args.markdown_out, &md).context("write markdown")?;
        }

        Ok(audit_exit_code(&report.summary))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let stage = match err.downcast_ref::<AuditError>() {
                Some(AuditError::ListingFailed { .. }) => FailureStage::List,
                _ => FailureStage::Runtime,
            };
            let cause = format!("{err:#}");
            // Listing failures were already alerted by the audit itself.
            if stage == FailureStage::Runtime
                && let Some(notifier) = notifier.as_mut()
                && let Err(alert_err) = notifier.send_failure(stage, &cause)
            {
                tracing::warn!(error = %alert_err, "failure alert not delivered");
            }
            let profile = profile.as_deref().unwrap_or("unknown");
            let report = runtime_error_report(stage, profile, &cause);
            if let Err(write_err) = write_report(args.report_out, &report) {
                tracing::error!(error = %format!("{write_err:#}"), "could not write error report");
            }
            eprintln!("bucketguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Load config if present; a missing file is allowed and defaults apply.
fn load_config(path: &Utf8Path, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let cfg = match std::fs::read_to_string(path) {
        Ok(text) if text.trim().is_empty() => BucketguardConfigV1::default(),
        Ok(text) => bucketguard_settings::parse_config_toml(&text)
            .with_context(|| format!("parse config: {path}"))?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(config = %path, "config file not found; using defaults");
            BucketguardConfigV1::default()
        }
        Err(err) => return Err(err).with_context(|| format!("read config: {path}")),
    };
    bucketguard_settings::resolve_config(cfg, overrides).context("resolve config")
}

fn cmd_evaluate(bucket_dir: &Utf8Path) -> anyhow::Result<()> {
    let verdict = run_evaluate(bucket_dir)?;
    let json = serde_json::to_string_pretty(&verdict).context("serialize verdict")?;
    println!("{json}");
    Ok(())
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&to_renderable(&report));

    if let Some(out_path) = output {
        write_text(&out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_annotations(report_path: Utf8PathBuf, max: usize) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let annotations = render_annotations(&to_renderable(&report), max);

    for annotation in annotations {
        println!("{}", annotation);
    }

    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                format_not_found(&identifier, available_check_ids, available_codes)
            );
            std::process::exit(1);
        }
    }
}
