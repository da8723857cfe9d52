//! Developer tasks (schema generation, fixture conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use bucketguard_types::explain;
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| std::env::current_dir())
        .unwrap_or_else(|_| PathBuf::from("."));

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(manifest_dir)
    } else {
        manifest_dir
    }
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(bucketguard_types::AuditReport)
}

fn generate_record_schema() -> schemars::Schema {
    schema_for!(bucketguard_types::AuditRecord)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(bucketguard_settings::BucketguardConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "bucketguard.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "bucketguard.records.v1.json",
            generate: generate_record_schema,
        },
        SchemaSpec {
            filename: "bucketguard.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Run the built binary on every fixture inventory and validate its report");
    eprintln!("  explain-coverage  Validate all check IDs and codes have explanations");
}

/// Codes are lowercase snake tokens; check IDs are dot-separated tokens.
fn is_valid_token(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
                && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        })
}

fn token_errors(fixture: &str, report: &serde_json::Value) -> Vec<String> {
    let mut errors = Vec::new();
    let exposed = report
        .get("exposed")
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();
    for verdict in exposed {
        let bucket = verdict["resource_id"].as_str().unwrap_or("<unknown>");
        let reasons = verdict["reasons"].as_array().map(Vec::as_slice).unwrap_or_default();
        for (i, reason) in reasons.iter().enumerate() {
            let code = reason["code"].as_str().unwrap_or_default();
            if !is_valid_token(code) {
                errors.push(format!(
                    "{fixture}: {bucket}.reasons[{i}].code '{code}' is not a valid token"
                ));
            }
            let fingerprint = reason["fingerprint"].as_str().unwrap_or_default();
            if fingerprint.len() != 64 || !fingerprint.chars().all(|c| c.is_ascii_hexdigit()) {
                errors.push(format!(
                    "{fixture}: {bucket}.reasons[{i}].fingerprint is not a SHA-256 hex digest"
                ));
            }
        }
    }
    errors
}

/// Run the built bucketguard binary on every fixture inventory and check its output.
///
/// For each directory under `tests/fixtures/`:
/// 1. the report validates against the generated report schema
/// 2. codes are valid tokens and fingerprints are SHA-256 hex digests
/// 3. when `expected.report.json` exists, the normalized report matches it
fn conform() -> anyhow::Result<()> {
    let schema_value = serde_json::to_value(generate_report_schema())?;
    let compiled = jsonschema::validator_for(&schema_value)
        .map_err(|e| anyhow::anyhow!("Failed to compile report schema: {}", e))?;
    println!("✓ report schema compiles");

    let mut bin = project_root().join("target").join("debug").join("bucketguard");
    if cfg!(target_os = "windows") {
        bin.set_extension("exe");
    }
    if !bin.exists() {
        bail!(
            "bucketguard binary not found at {}.\nRun `cargo build -p bucketguard-cli` first.",
            bin.display()
        );
    }

    let mut fixture_count = 0;
    let mut errors = Vec::new();

    for entry in fs::read_dir(fixtures_dir()).context("Failed to read tests/fixtures/")? {
        let fixture_dir = entry?.path();
        if !fixture_dir.is_dir() {
            continue;
        }
        let fixture = fixture_dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let report_out = temp_dir.path().join("report.json");

        let output = std::process::Command::new(&bin)
            .current_dir(temp_dir.path())
            .arg("audit")
            .arg("--notification-target")
            .arg("none")
            .arg("--inventory")
            .arg(&fixture_dir)
            .arg("--report-out")
            .arg(&report_out)
            .output()
            .with_context(|| format!("Failed to run bucketguard on fixture '{fixture}'"))?;

        if !matches!(output.status.code(), Some(0) | Some(2)) {
            errors.push(format!(
                "fixture '{}': bucketguard exited with {:?}: {}",
                fixture,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            ));
            continue;
        }

        let content = fs::read_to_string(&report_out)
            .with_context(|| format!("fixture '{fixture}': no report output generated"))?;
        let report: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse report for fixture '{fixture}'"))?;

        for err in compiled.iter_errors(&report) {
            errors.push(format!("fixture '{fixture}': schema validation: {err}"));
        }
        errors.extend(token_errors(&fixture, &report));

        let golden = fixture_dir.join("expected.report.json");
        if golden.exists() {
            let expected: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(&golden)?)
                    .with_context(|| format!("Failed to parse {}", golden.display()))?;
            if bucketguard_test_util::normalize_nondeterministic(report) != expected {
                errors.push(format!("fixture '{fixture}': report differs from expected.report.json"));
            }
        }

        fixture_count += 1;
        println!("  ✓ {fixture}");
    }

    if fixture_count == 0 {
        bail!("No fixture inventories found in {}", fixtures_dir().display());
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {fixture_count} fixtures pass conformance checks!");
    Ok(())
}

/// Validate that all check IDs and codes have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    let check_ids = explain::all_check_ids();
    let codes = explain::all_codes();
    let mut errors = Vec::new();

    for (kind, identifiers) in [("Check ID", check_ids), ("Code", codes)] {
        for identifier in identifiers {
            match explain::lookup_explanation(identifier) {
                Some(exp) => {
                    if exp.title.is_empty() {
                        errors.push(format!("{kind} '{identifier}' has empty title"));
                    }
                    if exp.description.is_empty() {
                        errors.push(format!("{kind} '{identifier}' has empty description"));
                    }
                    if exp.remediation.is_empty() {
                        errors.push(format!("{kind} '{identifier}' has empty remediation"));
                    }
                }
                None => errors.push(format!("{kind} '{identifier}' has no explanation")),
            }
            if !is_valid_token(identifier) {
                errors.push(format!("{kind} '{identifier}' is not a valid token"));
            }
        }
    }

    if errors.is_empty() {
        println!("✓ {} check IDs have explanations", check_ids.len());
        println!("✓ {} codes have explanations", codes.len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!("Explain coverage validation failed with {} errors", errors.len())
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            println!("{}", bucketguard_types::SCHEMA_REPORT_V1);
            println!("{}", bucketguard_types::SCHEMA_RECORDS_V1);
            println!("{}", bucketguard_settings::SCHEMA_CONFIG_V1);
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
