//! Codec tests: Task ⇄ CarePlan mapping fidelity and decode leniency.

use crate::task::adapters::fhir::{
    codec, ActivityDetail, CarePlan, CarePlanActivity, Extension, Period, Reference,
    DUE_KIND_EXTENSION_URL,
};
use crate::task::domain::{
    Assignee, AssigneeKind, DueKind, PatientId, Task, TaskData, TaskDueDate, TaskId,
    TaskPriority, TaskStatus, VisitId, VisitRelativeDueDate,
};
use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};
use uuid::Uuid;

fn instant(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid instant")
}

#[fixture]
fn patient() -> PatientId {
    PatientId::from_uuid(Uuid::new_v4())
}

/// A task with every optional field populated for the given due date.
fn full_task(due_date: TaskDueDate) -> Task {
    Task::from_parts(TaskData {
        id: Some(TaskId::from_uuid(Uuid::new_v4())),
        name: "Draw labs".to_owned(),
        status: Some(TaskStatus::InProgress),
        due_date: Some(due_date),
        rationale: Some("Potassium trending low".to_owned()),
        assignee: Some(Assignee::person(Uuid::new_v4()).with_display("Dr. Osei")),
        priority: Some(TaskPriority::High),
        created_date: Some(instant(2024, 1, 2)),
        created_by: Some("Dr. Reyes".to_owned()),
    })
}

#[rstest]
fn fully_populated_date_task_round_trips(patient: PatientId) {
    let task = full_task(TaskDueDate::Date(instant(2024, 1, 20)));
    let decoded = codec::decode(&codec::encode(&task, &patient));
    assert_eq!(decoded, Some(task));
}

#[rstest]
fn unresolved_this_visit_task_round_trips(patient: PatientId) {
    let visit = VisitId::from_uuid(Uuid::new_v4());
    let task = full_task(TaskDueDate::ThisVisit(
        VisitRelativeDueDate::unresolved().with_visit(visit),
    ));

    let decoded = codec::decode(&codec::encode(&task, &patient)).expect("decodable care plan");

    let due = decoded.due_date().expect("due date survives");
    assert_eq!(due.kind(), DueKind::ThisVisit);
    assert_eq!(due.visit(), Some(visit));
    assert_eq!(due.resolved_date(), None);
    assert_eq!(decoded, task);
}

#[rstest]
fn resolved_next_visit_task_round_trips(patient: PatientId) {
    let task = full_task(TaskDueDate::NextVisit(VisitRelativeDueDate::from_parts(
        Some(VisitId::from_uuid(Uuid::new_v4())),
        Some(instant(2024, 3, 5)),
    )));
    let decoded = codec::decode(&codec::encode(&task, &patient));
    assert_eq!(decoded, Some(task));
}

#[rstest]
fn encode_emits_at_most_one_performer(patient: PatientId) {
    let task = full_task(TaskDueDate::Date(instant(2024, 1, 20)));
    let encoded = codec::encode(&task, &patient);

    let detail = encoded
        .activity
        .first()
        .and_then(|activity| activity.detail.as_ref())
        .expect("activity detail");
    assert_eq!(detail.performer.len(), 1);
}

#[rstest]
fn encode_references_roles_as_practitioner_roles(patient: PatientId) {
    let role = Uuid::new_v4();
    let mut task = full_task(TaskDueDate::Date(instant(2024, 1, 20)));
    task.set_assignee(Some(Assignee::role(role)));

    let encoded = codec::encode(&task, &patient);
    let detail = encoded
        .activity
        .first()
        .and_then(|activity| activity.detail.as_ref())
        .expect("activity detail");
    assert_eq!(
        detail.performer.first().and_then(|p| p.reference.as_deref()),
        Some(format!("PractitionerRole/{role}").as_str())
    );
}

#[rstest]
fn encode_marks_subject_intent_and_top_level_status(patient: PatientId) {
    let mut task = full_task(TaskDueDate::Date(instant(2024, 1, 20)));
    let encoded = codec::encode(&task, &patient);

    assert_eq!(encoded.resource_type.as_deref(), Some("CarePlan"));
    assert_eq!(encoded.intent.as_deref(), Some("plan"));
    assert_eq!(encoded.status.as_deref(), Some("active"));
    assert_eq!(
        encoded.subject.and_then(|subject| subject.reference),
        Some(format!("Patient/{patient}"))
    );

    task.set_status(TaskStatus::Completed);
    assert_eq!(codec::encode(&task, &patient).status.as_deref(), Some("completed"));
}

#[rstest]
fn cancelled_task_keeps_active_top_level_status(patient: PatientId) {
    let mut task = full_task(TaskDueDate::Date(instant(2024, 1, 20)));
    task.set_status(TaskStatus::Cancelled);

    let encoded = codec::encode(&task, &patient);
    assert_eq!(encoded.status.as_deref(), Some("active"));
    let detail = encoded
        .activity
        .first()
        .and_then(|activity| activity.detail.as_ref())
        .expect("activity detail");
    assert_eq!(detail.status.as_deref(), Some("cancelled"));
}

#[rstest]
fn decode_defaults_to_date_kind_when_extension_is_missing() {
    let care_plan = CarePlan {
        id: Some(Uuid::new_v4().to_string()),
        activity: vec![CarePlanActivity {
            detail: Some(ActivityDetail {
                description: Some("Check wound dressing".to_owned()),
                scheduled_period: Some(Period {
                    start: None,
                    end: Some("2024-01-20T00:00:00+00:00".to_owned()),
                }),
                ..ActivityDetail::default()
            }),
        }],
        ..CarePlan::default()
    };

    let task = codec::decode(&care_plan).expect("decodable care plan");
    let due = task.due_date().expect("due date from fallback");
    assert_eq!(due.kind(), DueKind::Date);
    assert_eq!(due.resolved_date(), Some(instant(2024, 1, 20)));
}

#[rstest]
fn decode_tolerates_a_bare_resource() {
    let care_plan = CarePlan {
        id: Some(Uuid::new_v4().to_string()),
        ..CarePlan::default()
    };

    let task = codec::decode(&care_plan).expect("decodable care plan");
    assert_eq!(task.name(), "");
    assert_eq!(task.status(), TaskStatus::NotStarted);
    assert_eq!(task.due_date(), None);
    assert_eq!(task.assignee(), None);
    assert_eq!(task.priority(), None);
    assert_eq!(task.rationale(), None);
    assert_eq!(task.created_by(), None);
}

#[rstest]
fn decode_discards_resources_without_usable_ids() {
    assert_eq!(codec::decode(&CarePlan::default()), None);

    let non_uuid = CarePlan {
        id: Some("careplan-17".to_owned()),
        ..CarePlan::default()
    };
    assert_eq!(codec::decode(&non_uuid), None);
}

#[rstest]
fn decode_skips_unrecognized_performer_schemes() {
    let person = Uuid::new_v4();
    let care_plan = CarePlan {
        id: Some(Uuid::new_v4().to_string()),
        activity: vec![CarePlanActivity {
            detail: Some(ActivityDetail {
                performer: vec![
                    Reference::to("RelatedPerson/17"),
                    Reference::to(format!("Practitioner/{person}")),
                ],
                ..ActivityDetail::default()
            }),
        }],
        ..CarePlan::default()
    };

    let task = codec::decode(&care_plan).expect("decodable care plan");
    let assignee = task.assignee().expect("recognized performer");
    assert_eq!(assignee.kind(), AssigneeKind::Person);
    assert_eq!(assignee.id(), person);
}

#[rstest]
fn decode_defaults_unknown_status_codes() {
    let care_plan = CarePlan {
        id: Some(Uuid::new_v4().to_string()),
        activity: vec![CarePlanActivity {
            detail: Some(ActivityDetail {
                status: Some("entered-in-error".to_owned()),
                ..ActivityDetail::default()
            }),
        }],
        ..CarePlan::default()
    };

    let task = codec::decode(&care_plan).expect("decodable care plan");
    assert_eq!(task.status(), TaskStatus::NotStarted);
}

#[rstest]
fn decode_ignores_unparseable_dates() {
    let care_plan = CarePlan {
        id: Some(Uuid::new_v4().to_string()),
        activity: vec![CarePlanActivity {
            detail: Some(ActivityDetail {
                scheduled_period: Some(Period {
                    start: None,
                    end: Some("next Tuesday".to_owned()),
                }),
                extension: vec![Extension::code(DUE_KIND_EXTENSION_URL, "date")],
                ..ActivityDetail::default()
            }),
        }],
        ..CarePlan::default()
    };

    let task = codec::decode(&care_plan).expect("decodable care plan");
    assert_eq!(task.due_date(), None);
}

#[rstest]
fn wire_model_deserializes_loose_payloads() {
    let payload = serde_json::json!({
        "resourceType": "CarePlan",
        "id": "7f1c9d52-3f9b-4f3e-8f68-1f2a45ab9e01",
        "status": "active",
        "intent": "plan",
        "meta": { "versionId": "4" },
        "activity": [{
            "detail": {
                "description": "Draw labs",
                "status": "in-progress",
                "extraField": true,
                "extension": [{
                    "url": DUE_KIND_EXTENSION_URL,
                    "valueCode": "this-visit"
                }]
            }
        }]
    });

    let care_plan: CarePlan = serde_json::from_value(payload).expect("lenient deserialization");
    let task = codec::decode(&care_plan).expect("decodable care plan");
    assert_eq!(task.name(), "Draw labs");
    assert_eq!(task.status(), TaskStatus::InProgress);
    assert_eq!(
        task.due_date().map(TaskDueDate::kind),
        Some(DueKind::ThisVisit)
    );
}
