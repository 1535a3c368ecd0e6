//! Service orchestration tests against the in-memory adapters.

use std::sync::Arc;

use crate::task::{
    adapters::memory::{InMemoryTaskRepository, InMemoryVisitDirectory},
    domain::{PatientId, Task, TaskData, TaskDomainError, TaskId, TaskStatus, VisitId},
    services::{TaskService, TaskServiceError},
    validation::{DueDateDraft, TaskDraft},
};
use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};
use uuid::Uuid;

type TestService = TaskService<InMemoryTaskRepository, InMemoryVisitDirectory>;

fn instant(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid instant")
}

#[fixture]
fn directory() -> Arc<InMemoryVisitDirectory> {
    Arc::new(InMemoryVisitDirectory::new())
}

#[fixture]
fn service(directory: Arc<InMemoryVisitDirectory>) -> TestService {
    TaskService::new(
        Arc::new(InMemoryTaskRepository::new().with_author("Dr. Reyes")),
        directory,
    )
}

#[fixture]
fn patient() -> PatientId {
    PatientId::from_uuid(Uuid::new_v4())
}

fn dated_draft(name: &str, due: DateTime<Utc>) -> TaskDraft {
    TaskDraft {
        name: name.to_owned(),
        due: Some(DueDateDraft::on_date(due)),
        ..TaskDraft::default()
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_tasks_start_not_started(service: TestService, patient: PatientId) {
    let created = service
        .create(&patient, &dated_draft("Draw labs", instant(2024, 1, 20)))
        .await
        .expect("task creation should succeed");

    assert_eq!(created.name(), "Draw labs");
    assert_eq!(created.status(), TaskStatus::NotStarted);
    assert!(!created.completed());
    assert!(created.id().is_some());
    assert_eq!(created.created_by(), Some("Dr. Reyes"));
    assert!(created.created_date().is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_drafts_never_reach_the_repository(service: TestService, patient: PatientId) {
    let draft = TaskDraft {
        name: "   ".to_owned(),
        person: Some(Uuid::new_v4()),
        role: Some(Uuid::new_v4()),
        ..TaskDraft::default()
    };

    let result = service.create(&patient, &draft).await;
    assert!(matches!(result, Err(TaskServiceError::Validation(_))));
    let listed = service.list(&patient).await.expect("listing should succeed");
    assert!(listed.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_orders_incomplete_first_then_by_due_date(service: TestService, patient: PatientId) {
    let done = service
        .create(&patient, &dated_draft("Reconcile meds", instant(2024, 1, 5)))
        .await
        .expect("task creation should succeed");
    service
        .create(&patient, &dated_draft("Follow-up call", instant(2024, 2, 10)))
        .await
        .expect("task creation should succeed");
    service
        .create(&patient, &TaskDraft::named("Schedule imaging"))
        .await
        .expect("task creation should succeed");
    service
        .create(&patient, &dated_draft("Draw labs", instant(2024, 1, 20)))
        .await
        .expect("task creation should succeed");
    service
        .set_completion(&patient, &done, true)
        .await
        .expect("completion should succeed");

    let listed = service.list(&patient).await.expect("listing should succeed");
    let names: Vec<&str> = listed.iter().map(Task::name).collect();

    // Absent due dates sort as the epoch, so the undated task leads its
    // group; the completed task trails regardless of its earlier date.
    assert_eq!(
        names,
        vec![
            "Schedule imaging",
            "Draw labs",
            "Follow-up call",
            "Reconcile meds"
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_toggle_round_trip(service: TestService, patient: PatientId) {
    let created = service
        .create(&patient, &dated_draft("Draw labs", instant(2024, 1, 20)))
        .await
        .expect("task creation should succeed");

    let mut started = created.clone();
    started.set_status(TaskStatus::InProgress);
    let started = service
        .update(&patient, &started)
        .await
        .expect("update should succeed");

    let completed = service
        .set_completion(&patient, &started, true)
        .await
        .expect("completion should succeed");
    assert_eq!(completed.status(), TaskStatus::Completed);
    assert!(completed.completed());

    let resumed = service
        .set_completion(&patient, &completed, false)
        .await
        .expect("resume should succeed");
    assert_eq!(resumed.status(), TaskStatus::InProgress);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn soft_deleted_tasks_disappear_from_listings(service: TestService, patient: PatientId) {
    let created = service
        .create(&patient, &dated_draft("Draw labs", instant(2024, 1, 20)))
        .await
        .expect("task creation should succeed");

    let cancelled = service
        .soft_delete(&patient, &created)
        .await
        .expect("soft delete should succeed");
    assert_eq!(cancelled.status(), TaskStatus::Cancelled);

    let listed = service.list(&patient).await.expect("listing should succeed");
    assert!(listed.is_empty());

    // The resource still exists; it is excluded, not removed.
    let fetched = service
        .get(cancelled.id().expect("cancelled task keeps its id"))
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched.map(|task| task.status()), Some(TaskStatus::Cancelled));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn get_distinguishes_missing_tasks(service: TestService) {
    let fetched = service
        .get(TaskId::from_uuid(Uuid::new_v4()))
        .await
        .expect("lookup should succeed");
    assert!(fetched.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updates_require_a_backend_identity(service: TestService, patient: PatientId) {
    let unsaved = Task::from_parts(TaskData {
        name: "Draw labs".to_owned(),
        ..TaskData::default()
    });

    let result = service.update(&patient, &unsaved).await;
    assert!(matches!(
        result,
        Err(TaskServiceError::Domain(TaskDomainError::MissingTaskId))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn this_visit_drafts_are_stamped_with_the_active_visit(patient: PatientId) {
    let directory = Arc::new(InMemoryVisitDirectory::new());
    let service: TestService = TaskService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::clone(&directory),
    );
    let visit = VisitId::from_uuid(Uuid::new_v4());
    directory.set_active_visit(patient, visit);

    let draft = TaskDraft {
        name: "Check wound dressing".to_owned(),
        due: Some(DueDateDraft::this_visit()),
        ..TaskDraft::default()
    };
    let created = service
        .create(&patient, &draft)
        .await
        .expect("task creation should succeed");

    let due = created.due_date().expect("due date survives");
    assert_eq!(due.visit(), Some(visit));
    assert_eq!(due.resolved_date(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn this_visit_drafts_survive_without_an_active_visit(
    service: TestService,
    patient: PatientId,
) {
    let draft = TaskDraft {
        name: "Check wound dressing".to_owned(),
        due: Some(DueDateDraft::this_visit()),
        ..TaskDraft::default()
    };
    let created = service
        .create(&patient, &draft)
        .await
        .expect("task creation should succeed");

    let due = created.due_date().expect("due date survives");
    assert_eq!(due.visit(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn snapshots_refresh_on_list_and_clear_on_invalidate(
    service: TestService,
    patient: PatientId,
) {
    assert!(service.cached_list(&patient).is_none());

    service
        .create(&patient, &dated_draft("Draw labs", instant(2024, 1, 20)))
        .await
        .expect("task creation should succeed");
    let listed = service.list(&patient).await.expect("listing should succeed");
    assert_eq!(listed.len(), 1);

    // Mutations do not touch the snapshot; readers see stale data until
    // they re-fetch.
    service
        .create(&patient, &dated_draft("Follow-up call", instant(2024, 2, 10)))
        .await
        .expect("task creation should succeed");
    assert_eq!(service.cached_list(&patient).map(|tasks| tasks.len()), Some(1));

    service.invalidate(&patient);
    assert!(service.cached_list(&patient).is_none());

    let refreshed = service.list(&patient).await.expect("listing should succeed");
    assert_eq!(refreshed.len(), 2);
    assert_eq!(service.cached_list(&patient).map(|tasks| tasks.len()), Some(2));
}
