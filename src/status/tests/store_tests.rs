//! Service tests for batched recording and time-since reporting.

use crate::check::domain::{CheckName, CheckResult, Outcome};
use crate::status::adapters::InMemoryStatusRepository;
use crate::status::domain::StatusDocument;
use crate::status::ports::{StatusRepository, StatusRepositoryError, StatusRepositoryResult};
use crate::status::services::{NEVER_SENTINEL, StatusStore};
use chrono::{DateTime, Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;

mockall::mock! {
    Repo {}

    #[async_trait::async_trait]
    impl StatusRepository for Repo {
        async fn load(&self) -> StatusRepositoryResult<StatusDocument>;
        async fn save(&self, document: &StatusDocument) -> StatusRepositoryResult<()>;
    }
}

type TestStore = StatusStore<InMemoryStatusRepository, DefaultClock>;

#[fixture]
fn store() -> TestStore {
    StatusStore::new(
        Arc::new(InMemoryStatusRepository::new()),
        Arc::new(DefaultClock),
    )
}

fn result(name: &str, outcome: Outcome, finished: DateTime<Utc>) -> CheckResult {
    let check_name = CheckName::new(name).expect("valid name");
    CheckResult::new(check_name, outcome, outcome.as_str(), finished, finished)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn record_run_batches_all_results_into_one_document(store: TestStore) {
    let now = Utc::now();
    let batch = vec![
        result("site", Outcome::Success, now),
        result("api", Outcome::Failure, now),
        result("dns", Outcome::Error, now),
    ];

    let document = store.record_run(&batch).await.expect("record");
    assert_eq!(document.len(), 3);

    let snapshot = store.snapshot().await.expect("snapshot");
    assert_eq!(snapshot, document);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recording_twice_is_idempotent(store: TestStore) {
    let run = result("site", Outcome::Failure, Utc::now());

    let first = store.record(&run).await.expect("first record");
    let second = store.record(&run).await.expect("second record");

    assert_eq!(first, second);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn time_since_last_success_returns_never_without_success(store: TestStore) {
    let rendered = store
        .time_since_last_success("site")
        .await
        .expect("time since");
    assert_eq!(rendered, NEVER_SENTINEL);

    store
        .record(&result("site", Outcome::Failure, Utc::now()))
        .await
        .expect("record failure");
    let after_failure = store
        .time_since_last_success("site")
        .await
        .expect("time since");
    assert_eq!(after_failure, NEVER_SENTINEL);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn time_since_last_success_humanizes_elapsed_time(store: TestStore) {
    let two_hours_ago = Utc::now() - Duration::hours(2);
    store
        .record(&result("site", Outcome::Success, two_hours_ago))
        .await
        .expect("record success");

    let rendered = store
        .time_since_last_success("site")
        .await
        .expect("time since");
    assert!(rendered.starts_with("2h"), "got: {rendered}");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_cap_is_configurable(store: TestStore) {
    let capped = store.with_history_cap(2);
    let base = Utc::now();
    for offset in 0..4 {
        capped
            .record(&result("site", Outcome::Success, base + Duration::minutes(offset)))
            .await
            .expect("record");
    }

    let document = capped.snapshot().await.expect("snapshot");
    assert_eq!(document.get("site").expect("record").history().len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_failures_surface_as_store_errors() {
    let mut repository = MockRepo::new();
    repository
        .expect_load()
        .returning(|| Ok(StatusDocument::default()));
    repository.expect_save().returning(|_| {
        Err(StatusRepositoryError::persistence(std::io::Error::other(
            "disk full",
        )))
    });
    let store = StatusStore::new(Arc::new(repository), Arc::new(DefaultClock));

    let err = store
        .record(&result("site", Outcome::Failure, Utc::now()))
        .await
        .expect_err("save failure propagates");
    assert!(err.to_string().contains("disk full"));
}
