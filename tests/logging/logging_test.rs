//! Logging initialisation.

use leadhunter::logging::LoggingGuard;

#[test]
fn logging_guard_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<LoggingGuard>();
}

#[test]
fn production_logging_writes_json_to_a_leadhunter_log_file() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let logs_dir = tmp.path().join("logs");
    assert!(!logs_dir.exists());

    // Only test in this binary that installs the global subscriber.
    let guard = leadhunter::logging::init_production(&logs_dir, "info")
        .expect("subscriber installs once per test binary");
    tracing::info!(prospect_count = 3, "board replaced");
    drop(guard);

    let files: Vec<std::path::PathBuf> = std::fs::read_dir(&logs_dir)
        .expect("logs dir exists")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .collect();
    assert_eq!(files.len(), 1, "one daily log file: {files:?}");
    let name = files[0]
        .file_name()
        .and_then(|n| n.to_str())
        .expect("utf-8 file name");
    assert!(name.starts_with("leadhunter.log."), "unexpected file {name}");

    let contents = std::fs::read_to_string(&files[0]).expect("log readable");
    let line = contents
        .lines()
        .find(|l| l.contains("board replaced"))
        .expect("event written");
    let entry: serde_json::Value = serde_json::from_str(line).expect("JSON log line");
    assert_eq!(entry["fields"]["prospect_count"], 3);
    assert_eq!(entry["level"], "INFO");
}

#[test]
fn init_production_rejects_a_file_as_logs_dir() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let blocker = tmp.path().join("logs");
    std::fs::write(&blocker, "not a directory").expect("write blocker");

    let err = leadhunter::logging::init_production(&blocker, "info")
        .err()
        .expect("a file cannot hold logs");
    assert!(err.to_string().contains("failed to create logs directory"));
}
