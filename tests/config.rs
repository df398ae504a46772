// Integration tests for the stock configuration and content invariants.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use heart_notes::{DEFAULT_MESSAGES, HeartSettings, MotionDurations, SlideshowConfig};

#[test]
fn default_messages_are_nonempty_and_unique() {
    assert!(!DEFAULT_MESSAGES.is_empty());
    let mut seen = HashSet::new();
    for m in DEFAULT_MESSAGES {
        assert!(!m.trim().is_empty(), "blank message in DEFAULT_MESSAGES");
        assert!(seen.insert(*m), "duplicate message '{}'", m);
    }
}

#[test]
fn default_config_matches_stock_tunables() {
    let cfg = SlideshowConfig::default();
    assert_eq!(cfg.durations, MotionDurations { intro_in: 2000, intro_out: 2000, message_in: 700, message_out: 500 });
    let hearts = HeartSettings::default();
    assert_eq!(cfg.hearts, hearts);
    assert_eq!(hearts.count, (2, 6));
    assert_eq!(hearts.placement_attempts, 8);
    assert_eq!(cfg.heart_src, "heart.svg");
    assert_eq!(cfg.compact_breakpoint_px, 768);
}

#[cfg(feature = "serde_json")]
#[test]
fn json_config_round_trips_through_defaults() {
    let json = r#"{
        "intro_title": "hai",
        "messages": ["satu", "dua"],
        "hearts": { "count": [3, 3], "color": "red" }
    }"#;
    let cfg = SlideshowConfig::from_json(json).expect("valid config");
    assert_eq!(cfg.intro_title, "hai");
    assert_eq!(cfg.messages.len(), 2);
    assert_eq!(cfg.hearts.count, (3, 3));
    assert_eq!(cfg.hearts.color, "red");
    assert_eq!(cfg.hearts.lifetime_ms, (1200, 2200));
}

#[cfg(feature = "serde_json")]
#[test]
fn json_config_rejects_inverted_ranges() {
    let err = SlideshowConfig::from_json(r#"{"hearts":{"count":[6,2]}}"#).unwrap_err();
    assert_eq!(err.to_string(), "invalid range for hearts.count: min 6 > max 2");
}
