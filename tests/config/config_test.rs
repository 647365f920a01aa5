//! Config parsing, defaults and env overrides.

use std::collections::HashMap;

use leadhunter::config::{load_config, load_or_default, Config, ROLE_DISCOVERY, ROLE_OUTREACH};

#[test]
fn empty_file_yields_defaults() {
    let config = Config::from_toml("").expect("empty TOML parses");
    assert_eq!(config.models.default, "gemini/gemini-2.5-flash");
    assert_eq!(config.search.country, "Colombia");
    assert_eq!(config.search.city, "Bogotá");
    assert_eq!(config.search.category, "Salud");
    assert_eq!(config.search.prospect_count, 10);
    assert_eq!(config.persona.agency, "JGroupTech Agency");
    assert!(config.access.passphrase.is_none());
    assert!(config.export.directory.is_none());
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let config = Config::from_toml(
        r#"
[models]
default = "ollama/llama3"

[models.roles]
discovery = "gemini/gemini-2.5-pro"

[search]
country = "México"
city = "Monterrey"

[access]
passphrase = "JGROUP2025"
"#,
    )
    .expect("valid TOML");

    assert_eq!(config.models.default, "ollama/llama3");
    assert_eq!(
        config.models.roles.get(ROLE_DISCOVERY).map(String::as_str),
        Some("gemini/gemini-2.5-pro")
    );
    assert_eq!(config.models.roles.get(ROLE_OUTREACH), None);
    assert_eq!(config.models.request_timeout_secs, 60);
    assert_eq!(config.search.city, "Monterrey");
    assert_eq!(config.search.min_review_count, 10);
    assert_eq!(config.access.passphrase.as_deref(), Some("JGROUP2025"));
}

#[test]
fn malformed_toml_is_an_error() {
    assert!(Config::from_toml("[models\ndefault = 1").is_err());
}

#[test]
fn env_overrides_win_over_file_values() {
    let mut config = Config::default();
    let env = HashMap::from([
        ("LEADHUNTER_DEFAULT_MODEL", "ollama/qwen2"),
        ("LEADHUNTER_OLLAMA_URL", "http://gpu-box:11434"),
        ("LEADHUNTER_TIMEOUT_SECS", "15"),
        ("LEADHUNTER_PASSPHRASE", "open-sesame"),
    ]);
    config.apply_overrides(|key| env.get(key).map(|v| (*v).to_owned()));

    assert_eq!(config.models.default, "ollama/qwen2");
    assert_eq!(config.models.ollama_url, "http://gpu-box:11434");
    assert_eq!(config.models.request_timeout_secs, 15);
    assert_eq!(config.access.passphrase.as_deref(), Some("open-sesame"));
}

#[test]
fn invalid_timeout_override_is_ignored() {
    let mut config = Config::default();
    config.apply_overrides(|key| (key == "LEADHUNTER_TIMEOUT_SECS").then(|| "soon".to_owned()));
    assert_eq!(config.models.request_timeout_secs, 60);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let config = load_or_default(&tmp.path().join("absent.toml")).expect("defaults");
    assert_eq!(config.search.pain_points.len(), 5);
}

#[test]
fn load_config_reads_file_and_reports_bad_contents() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let good = tmp.path().join("config.toml");
    std::fs::write(&good, "[export]\ndirectory = \"/tmp/leads\"\n").expect("write config");
    let config = load_config(&good).expect("parses");
    assert_eq!(
        config.export.directory.as_deref(),
        Some(std::path::Path::new("/tmp/leads"))
    );

    let bad = tmp.path().join("bad.toml");
    std::fs::write(&bad, "search = 3").expect("write config");
    let err = load_config(&bad).expect_err("wrong shape");
    assert!(err.to_string().contains("bad.toml"));
    assert!(load_config(&tmp.path().join("absent.toml")).is_err());
}
