//! Credential loading and permission checks.

use std::collections::BTreeMap;

use leadhunter::credentials::{load_credentials, load_runtime_credentials, Credentials};

#[cfg(unix)]
fn write_private(path: &std::path::Path, contents: &str) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::write(path, contents).expect("write env file");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).expect("chmod 600");
}

#[test]
fn gemini_key_aliases_resolve_in_order() {
    let creds = Credentials::from_map(BTreeMap::from([
        ("API_KEY".to_owned(), "from-api-key".to_owned()),
        ("GOOGLE_API_KEY".to_owned(), "from-google".to_owned()),
        ("GEMINI_API_KEY".to_owned(), "   ".to_owned()),
    ]));
    assert_eq!(creds.gemini_api_key(), Some("from-api-key"));
    assert!(creds.require("GEMINI_API_KEY").is_err());
}

#[test]
fn merged_credentials_prefer_the_overlay() {
    let base = Credentials::from_map(BTreeMap::from([(
        "GEMINI_API_KEY".to_owned(),
        "file".to_owned(),
    )]));
    let overlay = Credentials::from_map(BTreeMap::from([(
        "GEMINI_API_KEY".to_owned(),
        "env".to_owned(),
    )]));
    assert_eq!(base.merged_with(overlay).get("GEMINI_API_KEY"), Some("env"));
}

#[test]
fn debug_output_redacts_values() {
    let creds = Credentials::from_map(BTreeMap::from([(
        "GEMINI_API_KEY".to_owned(),
        "sk-secret".to_owned(),
    )]));
    let rendered = format!("{creds:?}");
    assert!(rendered.contains("GEMINI_API_KEY"));
    assert!(!rendered.contains("sk-secret"));
}

#[cfg(unix)]
#[test]
fn loads_private_env_file() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join(".env");
    write_private(&path, "GEMINI_API_KEY=abc123\nOTHER=x\n");

    let creds = load_credentials(&path).expect("credentials load");
    assert_eq!(creds.require("GEMINI_API_KEY").expect("present"), "abc123");
}

#[cfg(unix)]
#[test]
fn rejects_world_readable_env_file() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join(".env");
    std::fs::write(&path, "GEMINI_API_KEY=abc123\n").expect("write env file");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).expect("chmod");

    let err = load_credentials(&path).expect_err("too permissive");
    assert!(err.to_string().contains("0600"));
}

#[test]
fn missing_env_file_is_an_error_but_runtime_loading_tolerates_it() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    assert!(load_credentials(&tmp.path().join(".env")).is_err());
    assert!(load_runtime_credentials(tmp.path()).is_ok());
}
