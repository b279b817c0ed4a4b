//! Merge-semantics tests for status records and documents.

use crate::check::domain::{CheckName, CheckResult, Outcome};
use crate::status::domain::StatusDocument;
use chrono::{DateTime, TimeZone, Utc};

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

fn result(name: &str, outcome: Outcome, finished: DateTime<Utc>) -> CheckResult {
    let check_name = CheckName::new(name).expect("valid name");
    CheckResult::new(check_name, outcome, outcome.as_str(), finished, finished)
}

#[test]
fn first_success_sets_last_success_at() {
    let mut document = StatusDocument::new();
    document.apply(&result("site", Outcome::Success, at(8, 0)), 10);

    let record = document.get("site").expect("record exists");
    assert_eq!(record.last_success_at(), Some(at(8, 0)));
    assert_eq!(record.last_result().outcome, Outcome::Success);
}

#[test]
fn failure_leaves_last_success_untouched() {
    let mut document = StatusDocument::new();
    document.apply(&result("site", Outcome::Success, at(8, 0)), 10);
    document.apply(&result("site", Outcome::Failure, at(9, 0)), 10);

    let record = document.get("site").expect("record exists");
    assert_eq!(record.last_success_at(), Some(at(8, 0)));
    assert_eq!(record.last_result().outcome, Outcome::Failure);
}

#[test]
fn last_success_only_advances_forward() {
    let mut document = StatusDocument::new();
    document.apply(&result("site", Outcome::Success, at(9, 0)), 10);
    // A stale success (clock skew, replayed run) must not move it back.
    document.apply(&result("site", Outcome::Success, at(8, 0)), 10);

    let record = document.get("site").expect("record exists");
    assert_eq!(record.last_success_at(), Some(at(9, 0)));
}

#[test]
fn applying_the_same_result_twice_is_idempotent() {
    let mut once = StatusDocument::new();
    let mut twice = StatusDocument::new();
    let run = result("site", Outcome::Failure, at(8, 0));

    once.apply(&run, 10);
    twice.apply(&run, 10);
    twice.apply(&run, 10);

    assert_eq!(once, twice);
    assert_eq!(twice.get("site").expect("record").history().len(), 1);
}

#[test]
fn history_is_capped_most_recent_last() {
    let mut document = StatusDocument::new();
    for minute in 0..5 {
        document.apply(&result("site", Outcome::Success, at(8, minute)), 3);
    }

    let record = document.get("site").expect("record exists");
    assert_eq!(record.history().len(), 3);
    let newest = record.history().back().expect("newest entry");
    assert_eq!(newest.timestamp, at(8, 4));
    let oldest = record.history().front().expect("oldest entry");
    assert_eq!(oldest.timestamp, at(8, 2));
}

#[test]
fn separate_checks_keep_separate_records() {
    let mut document = StatusDocument::new();
    document.apply(&result("site", Outcome::Success, at(8, 0)), 10);
    document.apply(&result("api", Outcome::Failure, at(8, 0)), 10);

    assert_eq!(document.len(), 2);
    assert!(document.get("site").is_some());
    assert!(document.get("api").is_some());
    assert!(document.get("dns").is_none());
}
