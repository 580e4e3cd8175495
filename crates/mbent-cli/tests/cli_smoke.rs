use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "mbent-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_mbent<I, S>(dir: &Path, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_mbent");
    Command::new(bin)
        .current_dir(dir)
        .env_remove("MBENT_LOG")
        .args(args)
        .output()
        .expect("mbent command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_exit_code(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "unexpected exit status\nstderr:\n{}",
        String::from_utf8_lossy(&output.stderr),
    );
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected valid JSON stdout, got error: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

const MIXED_DOCUMENT: &str = r#"{
  "drives": [
    { "type": "const", "const_value": 42 },
    { "type": "const", "idx": 1, "const_value": 42 },
    { "type": "ramp", "slope": 1, "initial_time": 0, "final_time": "forever", "initial_value": 0, "index": 2 }
  ]
}"#;

#[test]
fn schema_prints_the_document_to_stdout() {
    let tmp = TempDirGuard::new("schema-stdout");
    let output = run_mbent(tmp.path(), ["schema"]);
    assert_success(&output);
    let schema = parse_json_stdout(&output);
    assert_eq!(schema["required"], serde_json::json!(["drives"]));
    assert!(schema["$defs"]["SineDriveCaller"].is_object());
}

#[test]
fn schema_out_writes_file_and_reports_json() {
    let tmp = TempDirGuard::new("schema-out");
    let output = run_mbent(
        tmp.path(),
        [
            "schema",
            "--out",
            "json/drives.schema.json",
            "--marker",
            "https://example.org/drives.schema.json",
            "--json",
        ],
    );
    assert_success(&output);
    let summary = parse_json_stdout(&output);
    assert_eq!(summary["variant_count"], 6);
    assert_eq!(summary["path"], "json/drives.schema.json");

    let written = fs::read_to_string(tmp.path().join("json/drives.schema.json"))
        .expect("schema file should be written");
    let schema: Value = serde_json::from_str(&written).expect("schema file should be json");
    assert_eq!(schema["$id"], "https://example.org/drives.schema.json");
}

#[test]
fn config_supplies_schema_defaults() {
    let tmp = TempDirGuard::new("schema-config");
    fs::write(
        tmp.path().join("mbent.toml"),
        "[schema]\npath = \"out/schema.json\"\ntitle = \"Plant drives\"\n",
    )
    .expect("config should be written");

    let output = run_mbent(tmp.path(), ["schema"]);
    assert_success(&output);
    assert!(stdout_text(&output).contains("Path: out/schema.json"));

    let written = fs::read_to_string(tmp.path().join("out/schema.json"))
        .expect("schema file should be written");
    let schema: Value = serde_json::from_str(&written).expect("schema file should be json");
    assert_eq!(schema["title"], "Plant drives");
}

#[test]
fn invalid_config_is_rejected() {
    let tmp = TempDirGuard::new("bad-config");
    fs::write(tmp.path().join("custom.toml"), "[render]\nkeep = 1\n")
        .expect("config should be written");
    let output = run_mbent(tmp.path(), ["--config", "custom.toml", "variants"]);
    assert_failure(&output);
    assert!(stderr_text(&output).contains("error: failed to parse custom.toml"));

    let output = run_mbent(tmp.path(), ["--config", "missing.toml", "variants"]);
    assert_failure(&output);
}

#[test]
fn render_prints_grammar_lines() {
    let tmp = TempDirGuard::new("render");
    fs::write(
        tmp.path().join("drives.json"),
        r#"{"drives": [{"type": "const", "const_value": 42}, {"type": "const", "index": 1, "const_value": 42}]}"#,
    )
    .expect("document should be written");
    let output = run_mbent(tmp.path(), ["render", "drives.json"]);
    assert_success(&output);
    assert_eq!(stdout_text(&output), "const, 42\ndriver: 1, const, 42\n");
}

#[test]
fn render_reads_toml_documents() {
    let tmp = TempDirGuard::new("render-toml");
    fs::write(
        tmp.path().join("drives.toml"),
        "[[drives]]\ntype = \"linear\"\nconst_coef = 0.0\nslope_coef = 2\nindex = 4\n",
    )
    .expect("document should be written");
    let output = run_mbent(tmp.path(), ["render", "drives.toml"]);
    assert_success(&output);
    assert_eq!(stdout_text(&output), "driver: 4, linear, 0.0, 2\n");
}

#[test]
fn render_stops_at_the_first_failure() {
    let tmp = TempDirGuard::new("render-fail");
    fs::write(tmp.path().join("drives.json"), MIXED_DOCUMENT).expect("document should be written");
    let output = run_mbent(tmp.path(), ["render", "drives.json"]);
    assert_exit_code(&output, 1);
    assert_eq!(stdout_text(&output), "");
    assert!(stderr_text(&output).contains("drives[1]: invalid ConstDriveCaller: unknown field `idx`"));
}

#[test]
fn render_keep_going_prints_valid_drives() {
    let tmp = TempDirGuard::new("render-keep-going");
    fs::write(tmp.path().join("drives.json"), MIXED_DOCUMENT).expect("document should be written");
    let output = run_mbent(tmp.path(), ["render", "drives.json", "--keep-going"]);
    assert_exit_code(&output, 1);
    assert_eq!(
        stdout_text(&output),
        "const, 42\ndriver: 2, ramp, 1, 0, forever, 0\n"
    );
}

#[test]
fn check_json_lists_issues_by_position() {
    let tmp = TempDirGuard::new("check");
    fs::write(tmp.path().join("drives.json"), MIXED_DOCUMENT).expect("document should be written");
    let output = run_mbent(tmp.path(), ["check", "drives.json", "--json"]);
    assert_exit_code(&output, 1);
    let report = parse_json_stdout(&output);
    assert_eq!(report["ok"], false);
    assert_eq!(report["drive_count"], 3);
    assert_eq!(report["valid_count"], 2);
    assert_eq!(report["issues"][0]["position"], 1);
    assert_eq!(
        report["issues"][0]["error"],
        "invalid ConstDriveCaller: unknown field `idx`"
    );
}

#[test]
fn schema_write_failures_exit_2() {
    let tmp = TempDirGuard::new("schema-write-fail");
    fs::write(tmp.path().join("blocker"), "").expect("file should be written");
    let output = run_mbent(tmp.path(), ["schema", "--out", "blocker/schema.json"]);
    assert_exit_code(&output, 2);
    assert!(stderr_text(&output).contains("error: failed to create blocker"));
}

#[test]
fn check_reports_malformed_documents() {
    let tmp = TempDirGuard::new("check-malformed");
    fs::write(tmp.path().join("drives.json"), r#"{"drive": []}"#)
        .expect("document should be written");
    let output = run_mbent(tmp.path(), ["check", "drives.json", "--json"]);
    assert_failure(&output);
    let report = parse_json_stdout(&output);
    assert_eq!(
        report["document_error"],
        "malformed drive document: unknown root key `drive`"
    );
}

#[test]
fn check_passes_valid_documents() {
    let tmp = TempDirGuard::new("check-ok");
    fs::write(
        tmp.path().join("drives.json"),
        r#"{"$schema": "drives.schema.json", "drives": [{"type": "null"}]}"#,
    )
    .expect("document should be written");
    let output = run_mbent(tmp.path(), ["check", "drives.json"]);
    assert_success(&output);
    assert!(stdout_text(&output).contains("Issues: none"));
}

#[test]
fn variants_json_describes_every_variant() {
    let tmp = TempDirGuard::new("variants");
    let output = run_mbent(tmp.path(), ["variants", "--json"]);
    assert_success(&output);
    let variants = parse_json_stdout(&output);
    let tags: Vec<&str> = variants
        .as_array()
        .expect("variants should be an array")
        .iter()
        .filter_map(|variant| variant["typeTag"].as_str())
        .collect();
    assert_eq!(tags, ["null", "one", "const", "linear", "ramp", "sine"]);
    assert_eq!(variants[2]["fields"][1]["name"], "index");
    assert_eq!(variants[2]["fields"][1]["required"], false);
}
