use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const DUMP: &str = r#"[
  {
    "page": 1,
    "blocks": [
      [50, 40, 150, 52, "Filing Status", 0, 0],
      [52, 60, 140, 72, "Single", 1, 0],
      [50, 100, 180, 112, "Total tax", 2, 0],
      [400, 101, 460, 113, "$4,120.", 3, 0]
    ]
  }
]"#;

const ANCHORS: &str = r#"{
  "year": 2024,
  "fields": [
    {"key": "filing_status", "label": "Filing Status", "strategy": "below"},
    {"key": "total_tax", "label": "total tax", "strategy": "right"},
    {"key": "refund", "label": "overpaid", "strategy": "nearest_numeric"}
  ]
}"#;

fn taxfx(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("taxfx").unwrap();
    // Keep the user's config file out of the picture.
    cmd.arg("--config").arg(config_dir.join("config.json"));
    cmd
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("anchors")).unwrap();
    fs::write(dir.path().join("anchors/1040_2024.json"), ANCHORS).unwrap();
    fs::write(dir.path().join("anchors/1040_2023.json"), ANCHORS).unwrap();
    fs::write(dir.path().join("form.json"), DUMP).unwrap();

    let config = serde_json::json!({
        "anchors": {"anchors_dir": dir.path().join("anchors"), "file_prefix": "1040"}
    });
    fs::write(dir.path().join("config.json"), config.to_string()).unwrap();
    dir
}

#[test]
fn test_extract_json_to_stdout() {
    let dir = workspace();

    let output = taxfx(dir.path())
        .arg("extract")
        .arg(dir.path().join("form.json"))
        .args(["--year", "2024"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["filing_status"], "Single");
    assert_eq!(json["total_tax"], "$4,120.");
    assert_eq!(json["refund"], serde_json::Value::Null);
    assert_eq!(json["_meta"]["anchors_year"], 2024);
    assert_eq!(json["_evidence"][2]["note"], "not found");
}

#[test]
fn test_extract_numeric_to_file() {
    let dir = workspace();
    let out = dir.path().join("parsed.json");

    taxfx(dir.path())
        .arg("extract")
        .arg(dir.path().join("form.json"))
        .arg("--anchors")
        .arg(dir.path().join("anchors/1040_2024.json"))
        .arg("--numeric")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsed output saved to"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["total_tax"], serde_json::json!(4120));
    assert_eq!(json["filing_status"], "Single");
}

#[test]
fn test_extract_csv() {
    let dir = workspace();

    taxfx(dir.path())
        .arg("extract")
        .arg(dir.path().join("form.json"))
        .args(["--year", "2024", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("key,label,value,page,strategy,note\n"))
        .stdout(predicate::str::contains("total_tax,total tax,\"$4,120.\",1,right,"))
        .stdout(predicate::str::contains("refund,overpaid,,,nearest_numeric,not found"));
}

#[test]
fn test_extract_records_source_pdf_without_running_ocr() {
    let dir = workspace();
    let pdf = dir.path().join("scan.pdf");
    fs::write(&pdf, b"not really a pdf").unwrap();

    let output = taxfx(dir.path())
        .arg("extract")
        .arg(dir.path().join("form.json"))
        .args(["--year", "2024", "--used-ocr"])
        .arg("--pdf")
        .arg(&pdf)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["_meta"]["used_ocr"], true);
    assert!(json["_meta"]["source_pdf"].as_str().unwrap().ends_with("scan.pdf"));
    assert_eq!(json["total_tax"], "$4,120.");

    let output = taxfx(dir.path())
        .arg("extract")
        .arg(dir.path().join("form.json"))
        .args(["--year", "2024"])
        .arg("--pdf")
        .arg(&pdf)
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["_meta"]["used_ocr"], false);
}

#[test]
fn test_extract_used_ocr_requires_pdf() {
    let dir = workspace();

    taxfx(dir.path())
        .arg("extract")
        .arg(dir.path().join("form.json"))
        .args(["--year", "2024", "--used-ocr"])
        .assert()
        .failure();
}

#[test]
fn test_extract_rejects_reserved_key() {
    let dir = workspace();
    let anchors = dir.path().join("reserved.json");
    fs::write(&anchors, r#"{"fields": [{"key": "_meta", "label": "Total tax"}]}"#).unwrap();

    taxfx(dir.path())
        .arg("extract")
        .arg(dir.path().join("form.json"))
        .arg("--anchors")
        .arg(&anchors)
        .assert()
        .failure()
        .stderr(predicate::str::contains("key `_meta` is reserved"));
}

#[test]
fn test_extract_missing_anchors() {
    let dir = workspace();

    taxfx(dir.path())
        .arg("extract")
        .arg(dir.path().join("form.json"))
        .args(["--year", "1999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Anchors file not found"));
}

#[test]
fn test_extract_rejects_bad_configuration() {
    let dir = workspace();
    let anchors = dir.path().join("bad.json");
    fs::write(&anchors, r#"{"fields": [{"key": "a", "label": "A", "strategy": "up"}]}"#).unwrap();

    taxfx(dir.path())
        .arg("extract")
        .arg(dir.path().join("form.json"))
        .arg("--anchors")
        .arg(&anchors)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown strategy `up`"));
}

#[test]
fn test_batch_with_summary() {
    let dir = workspace();
    let inputs = dir.path().join("inputs");
    let outputs = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("a.json"), DUMP).unwrap();
    fs::write(inputs.join("b.json"), DUMP).unwrap();
    fs::write(inputs.join("broken.json"), "not json").unwrap();

    taxfx(dir.path())
        .arg("batch")
        .arg(format!("{}/*.json", inputs.display()))
        .args(["--year", "2024", "--summary", "--continue-on-error", "--jobs", "2"])
        .arg("--output-dir")
        .arg(&outputs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 files to process"));

    assert!(outputs.join("a.json").exists());
    assert!(outputs.join("b.json").exists());
    assert!(!outputs.join("broken.json").exists());

    let summary = fs::read_to_string(outputs.join("summary.csv")).unwrap();
    let rows: Vec<&str> = summary.lines().collect();
    assert_eq!(rows.len(), 4);
    assert!(rows[1].starts_with("a.json,success,1,2,3,"));
    assert!(rows[2].starts_with("b.json,success,1,2,3,"));
    assert!(rows[3].starts_with("broken.json,error,"));
}

#[test]
fn test_batch_stops_on_error() {
    let dir = workspace();
    let inputs = dir.path().join("inputs");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("broken.json"), "not json").unwrap();

    taxfx(dir.path())
        .arg("batch")
        .arg(format!("{}/*.json", inputs.display()))
        .args(["--year", "2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn test_blocks_with_label() {
    let dir = workspace();

    taxfx(dir.path())
        .arg("blocks")
        .arg(dir.path().join("form.json"))
        .args(["--label", "total"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- Page 1 ---"))
        .stdout(predicate::str::contains("* [   50.0,   100.0,   180.0,   112.0] \"Total tax\""))
        .stdout(predicate::str::contains("Single").not());
}

#[test]
fn test_years() {
    let dir = workspace();

    taxfx(dir.path())
        .args(["years", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"years":["2023","2024"]}"#));
}

#[test]
fn test_probe_rejects_non_pdf() {
    let dir = workspace();

    taxfx(dir.path())
        .arg("probe")
        .arg(dir.path().join("form.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse PDF"));
}

#[test]
fn test_config_get_and_set() {
    let dir = workspace();

    taxfx(dir.path())
        .args(["config", "set", "extraction.y_slack", "25"])
        .assert()
        .success();

    taxfx(dir.path())
        .args(["config", "get", "extraction.y_slack"])
        .assert()
        .success()
        .stdout(predicate::str::contains("25.0"));

    taxfx(dir.path())
        .args(["config", "get", "extraction.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = workspace();
    let target = dir.path().join("fresh.json");

    taxfx(dir.path())
        .args(["config", "init", "--output"])
        .arg(&target)
        .assert()
        .success();
    assert!(target.exists());

    taxfx(dir.path())
        .args(["config", "init", "--output"])
        .arg(&target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}
