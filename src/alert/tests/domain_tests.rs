//! Domain tests for alert levels and events.

use crate::alert::domain::{AlertEvent, AlertLevel};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(AlertLevel::Info, "info", false)]
#[case(AlertLevel::Warning, "warning", false)]
#[case(AlertLevel::Error, "error", true)]
#[case(AlertLevel::Critical, "critical", true)]
fn level_round_trips_and_suggests_issue(
    #[case] level: AlertLevel,
    #[case] storage: &str,
    #[case] suggests: bool,
) {
    assert_eq!(level.as_str(), storage);
    assert_eq!(AlertLevel::try_from(storage).expect("parse"), level);
    assert_eq!(level.suggests_issue(), suggests);
}

#[test]
fn levels_are_ordered_by_severity() {
    assert!(AlertLevel::Info < AlertLevel::Warning);
    assert!(AlertLevel::Warning < AlertLevel::Error);
    assert!(AlertLevel::Error < AlertLevel::Critical);
}

#[test]
fn event_defaults_follow_the_level_suggestion() {
    let clock = DefaultClock;
    let info = AlertEvent::new(AlertLevel::Info, "scanner", "all good", &clock);
    assert!(!info.create_issue());
    assert!(!info.send_email());

    let critical = AlertEvent::new(AlertLevel::Critical, "scanner", "down", &clock);
    assert!(critical.create_issue());
    assert!(!critical.send_email());
}

#[test]
fn explicit_flags_override_the_level_suggestion() {
    let clock = DefaultClock;
    let event = AlertEvent::new(AlertLevel::Info, "scanner", "notice", &clock)
        .with_issue(true)
        .with_email(true);
    assert!(event.create_issue());
    assert!(event.send_email());

    let muted = AlertEvent::new(AlertLevel::Critical, "scanner", "down", &clock).with_issue(false);
    assert!(!muted.create_issue());
}

#[test]
fn fingerprint_is_stable_for_the_same_problem() {
    let clock = DefaultClock;
    let first = AlertEvent::new(AlertLevel::Error, "scanner", "site down", &clock);
    let second = AlertEvent::new(AlertLevel::Error, "scanner", "site down", &clock)
        .with_extra(json!({"attempt": 2}));

    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.fingerprint().len(), 16);
}

#[test]
fn fingerprint_differs_across_sources_and_messages() {
    let clock = DefaultClock;
    let base = AlertEvent::new(AlertLevel::Error, "scanner", "site down", &clock);
    let other_source = AlertEvent::new(AlertLevel::Error, "cert-watch", "site down", &clock);
    let other_message = AlertEvent::new(AlertLevel::Error, "scanner", "api down", &clock);

    assert_ne!(base.fingerprint(), other_source.fingerprint());
    assert_ne!(base.fingerprint(), other_message.fingerprint());
}
