use repogate::core::config::ComplianceConfig;
use repogate::plugins::compliance::{ComplianceChecker, CompliancePolicy};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::{TempDir, tempdir};

const COMPLIANT: &str = "---
title: Gate Overview
document_category: architecture
document_type: guide
version: 1.2
last_updated: 2025-01-10
ai_keywords: [gate, docs, yaml, schema, compliance, metadata, ethics, review]
ethical_score: 95%
---
# Gate Overview
";

fn write_doc(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn run_checker(dir: &TempDir, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_docs-compliance"))
        .current_dir(dir.path())
        .env_remove("REPOGATE_LOG")
        .args(args)
        .output()
        .expect("failed to execute docs-compliance");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

#[test]
fn compliant_tree_exits_zero() {
    let tmp = tempdir().unwrap();
    write_doc(tmp.path(), "docs/a.md", COMPLIANT);
    write_doc(tmp.path(), "docs/nested/b.md", COMPLIANT);

    let (code, stdout, _) = run_checker(&tmp, &[]);
    assert_eq!(code, 0, "stdout: {}", stdout);
    assert!(stdout.contains("ALL DOCUMENTATION COMPLIANT"));
}

#[test]
fn low_ethical_score_is_reported() {
    let tmp = tempdir().unwrap();
    write_doc(tmp.path(), "docs/good.md", COMPLIANT);
    write_doc(
        tmp.path(),
        "docs/low.md",
        &COMPLIANT.replace("ethical_score: 95%", "ethical_score: 90%"),
    );

    let (code, stdout, _) = run_checker(&tmp, &[]);
    assert_eq!(code, 1);
    assert!(stdout.contains("COMPLIANCE VIOLATIONS FOUND (1)"));
    assert!(stdout.contains("docs/low.md: Ethical score 90% below minimum 91% requirement"));
}

#[test]
fn missing_front_matter_and_excluded_names() {
    let tmp = tempdir().unwrap();
    write_doc(tmp.path(), "docs/plain.md", "# No metadata here\n");
    write_doc(tmp.path(), "docs/README.md", "# skipped\n");
    write_doc(
        tmp.path(),
        "docs/deep/biological_consciousness_system_documentation.md",
        "# skipped\n",
    );
    write_doc(tmp.path(), "docs/notes.txt", "not markdown\n");

    let (code, stdout, _) = run_checker(&tmp, &[]);
    assert_eq!(code, 1);
    assert!(stdout.contains("COMPLIANCE VIOLATIONS FOUND (1)"));
    assert!(stdout.contains("docs/plain.md: Missing YAML frontmatter"));
    assert!(!stdout.contains("README.md"));
}

#[test]
fn documents_under_target_are_not_hidden() {
    let tmp = tempdir().unwrap();
    write_doc(tmp.path(), "docs/a.md", COMPLIANT);
    write_doc(tmp.path(), "docs/target/x.md", "# build notes\n");

    let (code, stdout, _) = run_checker(&tmp, &[]);
    assert_eq!(code, 1);
    assert!(stdout.contains("docs/target/x.md: Missing YAML frontmatter"));
}

#[test]
fn verbose_lists_each_document() {
    let tmp = tempdir().unwrap();
    write_doc(tmp.path(), "docs/a.md", COMPLIANT);

    let (code, stdout, _) = run_checker(&tmp, &["-v"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("[INFO] Validating docs/a.md"));
}

#[test]
fn fix_flag_is_refused() {
    let tmp = tempdir().unwrap();
    write_doc(tmp.path(), "docs/plain.md", "# No metadata here\n");

    let (code, stdout, _) = run_checker(&tmp, &["--fix"]);
    assert_eq!(code, 1);
    assert!(stdout.contains("Auto-fix not yet implemented - run without --fix for validation only"));
    assert!(!stdout.contains("Missing YAML frontmatter"));
}

#[test]
fn missing_docs_root_is_fatal() {
    let tmp = tempdir().unwrap();
    let (code, _, stderr) = run_checker(&tmp, &["--docs-root", "nowhere"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Error: "));
    assert!(stderr.contains("nowhere"));
}

#[test]
fn json_format_lists_violations() {
    let tmp = tempdir().unwrap();
    write_doc(tmp.path(), "handbook/a.md", "---\ntitle: Only title\n---\nbody\n");

    let (code, stdout, _) = run_checker(&tmp, &["--docs-root", "handbook", "--format", "json"]);
    assert_eq!(code, 1);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["files_checked"], 1);
    assert_eq!(report["compliant"], false);
    let messages: Vec<&str> = report["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["message"].as_str().unwrap())
        .collect();
    assert!(messages.contains(&"Missing required field 'ai_keywords'"));
    assert!(messages.contains(&"Missing ethical_score field"));
}

#[test]
fn config_file_overrides_thresholds() {
    let tmp = tempdir().unwrap();
    write_doc(
        tmp.path(),
        "docs/a.md",
        &COMPLIANT.replace("ethical_score: 95%", "ethical_score: 80%"),
    );
    fs::write(
        tmp.path().join("repogate.toml"),
        "[compliance]\nmin_ethical_score = 75\n",
    )
    .unwrap();

    let (code, stdout, _) = run_checker(&tmp, &[]);
    assert_eq!(code, 0, "stdout: {}", stdout);
}

#[test]
fn bad_config_is_fatal() {
    let tmp = tempdir().unwrap();
    write_doc(tmp.path(), "docs/a.md", COMPLIANT);
    fs::write(tmp.path().join("repogate.toml"), "[compliance]\nmin_ethical_score = 150\n").unwrap();

    let (code, _, stderr) = run_checker(&tmp, &[]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Config error"));
}

#[test]
fn checker_api_reports_without_printing() {
    let tmp = tempdir().unwrap();
    write_doc(tmp.path(), "a.md", COMPLIANT);
    write_doc(
        tmp.path(),
        "b.md",
        &COMPLIANT.replace(
            "[gate, docs, yaml, schema, compliance, metadata, ethics, review]",
            "gate, docs, yaml",
        ),
    );

    let checker = ComplianceChecker::new(tmp.path(), false);
    let report = checker.check_tree().unwrap();
    assert_eq!(report.files_checked, 2);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(
        report.violations[0].message,
        "Only 3 AI keywords, minimum 8 required"
    );

    let lenient = CompliancePolicy::from(&ComplianceConfig {
        min_keywords: 3,
        ..ComplianceConfig::default()
    });
    let report = ComplianceChecker::new(tmp.path(), false)
        .with_policy(lenient)
        .check_tree()
        .unwrap();
    assert!(report.is_compliant());
}
