//! Integration tests reading the fixture files in `tests/data/`, once through the library and once
//! through the actual crate binary watching a directory: Test the full E2E path.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use sales_analyzer::{Error, Report, analyze};

const TIMEOUT: Duration = Duration::from_secs(10);

#[test]
fn sample_file_through_the_library() {
    let file = std::fs::File::open(fixture_path("sample.txt")).expect("failed to open fixture");

    let mut errors: Vec<Error> = Vec::new();
    let report = analyze(BufReader::new(file), |e| errors.push(e)).unwrap();

    assert_eq!(report, expected_report());
    assert_eq!(errors.len(), 2, "unexpected errors: {errors:?}");
}

#[test]
fn sample_file_through_the_binary() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();

    let child = Command::new(env!("CARGO_BIN_EXE_sales-analyzer"))
        .arg("--input-dir")
        .arg(input_dir.path())
        .arg("--output-dir")
        .arg(output_dir.path())
        .env("RUST_LOG", "info")
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to execute binary");
    let mut service = KillOnDrop(child);

    wait_until_watching(&mut service.0);
    drop_into(input_dir.path(), "sample.txt");

    let report_path = output_dir.path().join("sample.txt");
    let content = wait_for_file(&report_path);
    drop(service);

    let report: Report = serde_json::from_str(&content).expect("report is not valid JSON");
    assert_eq!(report, expected_report());
}

/// Returns the absolute path to a test fixture file in `tests/data/`.
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Makes the fixture `name` appear in `dir` at once, complete with its content.
///
/// The fixture is copied next to `dir` first; linking it from there creates the file in a single
/// step, which a plain copy into `dir` would not.
fn drop_into(dir: &Path, name: &str) {
    let staging = tempfile::tempdir_in(dir.parent().expect("input directory has a parent")).unwrap();
    let staged = staging.path().join(name);
    std::fs::copy(fixture_path(name), &staged).expect("failed to stage fixture");
    std::fs::hard_link(&staged, dir.join(name)).expect("failed to link fixture into the input directory");
}

fn expected_report() -> Report {
    let expected = std::fs::read_to_string(fixture_path("sample_expected.json"))
        .expect("failed to read expected output fixture");
    serde_json::from_str(&expected).expect("expected output fixture is not valid JSON")
}

/// Blocks until the service logs that it watches the input directory. Keeps draining its stderr
/// afterwards so logging never blocks the service.
fn wait_until_watching(child: &mut Child) {
    let stderr = child.stderr.take().expect("stderr is piped");
    let (ready_tx, ready_rx) = mpsc::channel();

    std::thread::spawn(move || {
        for line in BufReader::new(stderr).lines().map_while(Result::ok) {
            if line.contains("watching input directory") {
                let _ = ready_tx.send(());
            }
        }
    });

    ready_rx
        .recv_timeout(TIMEOUT)
        .expect("service did not start watching in time");
}

/// Polls for a complete JSON document at `path`.
fn wait_for_file(path: &Path) -> String {
    let deadline = Instant::now() + TIMEOUT;
    loop {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if serde_json::from_str::<serde_json::Value>(&content).is_ok() {
            return content;
        }
        assert!(
            Instant::now() < deadline,
            "no report at {} after {TIMEOUT:?}",
            path.display()
        );
        std::thread::sleep(Duration::from_millis(50));
    }
}

struct KillOnDrop(Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}
