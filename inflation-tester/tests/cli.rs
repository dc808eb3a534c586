use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "inflation-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_inflation-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("month-atomicity"));
}

#[test]
fn cli_runs_invariant_scenarios_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_inflation-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--scenarios",
            "smoke,pricing-purity,exact-funds-boundary",
            "--iterations",
            "1",
            "--seeds",
            "1,0x2A",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Inflation Chaos Automated Tester"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let results: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let results = results.as_array().expect("array of results");
    assert_eq!(results.len(), 6);
    assert!(results.iter().all(|r| r["passed"] == true));
}

#[test]
fn cli_writes_playability_csv() {
    let exe = env!("CARGO_BIN_EXE_inflation-tester");
    let output_path = temp_path("csv");
    let status = Command::new(exe)
        .args([
            "--report",
            "csv",
            "--scenarios",
            "smoke",
            "--roles",
            "banker",
            "--strategies",
            "frugal,spender",
            "--iterations",
            "2",
            "--max-months",
            "12",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let mut lines = content.lines();
    assert!(lines.next().expect("header").starts_with("scenario,role,strategy"));
    assert_eq!(lines.count(), 4);
}

#[test]
fn cli_rejects_unknown_role() {
    let exe = env!("CARGO_BIN_EXE_inflation-tester");
    let output = Command::new(exe)
        .args(["--roles", "pirate", "--scenarios", "smoke", "--iterations", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
}
