//! Shared-passphrase access gate.

use leadhunter::access::{AccessError, AccessGate};
use leadhunter::config::AccessConfig;

#[test]
fn open_gate_admits_anyone() {
    let gate = AccessGate::from_config(&AccessConfig::default());
    assert!(gate.is_open());
    assert!(gate.unlock("").is_ok());
}

#[test]
fn blank_passphrase_leaves_gate_open() {
    assert!(AccessGate::new(Some("   ".to_owned())).is_open());
}

#[test]
fn passphrase_must_match_exactly() {
    let gate = AccessGate::new(Some("JGROUP2025".to_owned()));
    assert!(!gate.is_open());
    assert_eq!(gate.unlock("jgroup2025"), Err(AccessError::Denied));
    assert_eq!(gate.unlock("JGROUP2025 "), Err(AccessError::Denied));

    let session = gate.unlock("JGROUP2025").expect("correct passphrase");
    assert!(session.opened_at() <= chrono::Utc::now());
}

#[test]
fn debug_output_hides_the_passphrase() {
    let gate = AccessGate::new(Some("JGROUP2025".to_owned()));
    assert!(!format!("{gate:?}").contains("JGROUP2025"));
}
