use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

const PAGE: &str = r#"<html><body><form data-qa="signup"><input id="email"><button>Join</button></form></body></html>"#;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dom-locator"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn test_prints_selector_for_target() {
    let page = write_temp(PAGE);
    let path = page.path().to_str().unwrap();

    let output = run(&["--html", path, "--target", "button"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), r#"//button[text()="Join"]"#);

    let output = run(&["--html", path, "--target", "input", "--dialect", "css"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), r#"input[id="email"]"#);
}

#[test]
fn test_config_file_and_report() {
    let page = write_temp(PAGE);
    let config = write_temp(
        r#"{"identifyingAttributes": ["data-qa"], "preferenceOrder": ["attributes"], "dialect": "css"}"#,
    );

    let output = run(&[
        "--html",
        page.path().to_str().unwrap(),
        "--target",
        "form",
        "--config",
        config.path().to_str().unwrap(),
        "--report",
    ]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["selector"], r#"form[data-qa="signup"]"#);
    assert_eq!(report["dialect"], "css");
    assert_eq!(report["method"]["kind"], "attribute");
    assert_eq!(report["method"]["name"], "data-qa");
    assert_eq!(report["attempts"].as_array().unwrap().len(), 1);
}

#[test]
fn test_missing_target_fails() {
    let page = write_temp(PAGE);
    let output = run(&["--html", page.path().to_str().unwrap(), "--target", "table"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
