//! Bidirectional mapping between [`Task`] and the CarePlan wire model.
//!
//! Decoding is deliberately permissive: the backend is treated as a
//! producer of loosely-structured data, so malformed or partial
//! resources degrade to absent or default fields instead of failing.
//! The single hard requirement is a usable resource identifier:
//! without one the resource cannot be addressed and is discarded.

use super::models::{
    ActivityDetail, CarePlan, CarePlanActivity, Extension, Period, Reference,
    ASSOCIATED_ENCOUNTER_EXTENSION_URL, DUE_KIND_EXTENSION_URL, PRIORITY_EXTENSION_URL,
};
use crate::task::domain::{
    Assignee, AssigneeKind, DueKind, PatientId, Task, TaskData, TaskDueDate, TaskId, TaskPriority,
    TaskStatus, VisitId, VisitRelativeDueDate,
};
use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

/// Decodes a CarePlan resource into a task.
///
/// Returns `None` only when the resource id is missing or not a UUID;
/// every other irregularity degrades: a plan with no activities, no
/// detail, and no extensions decodes to a task with an empty name and
/// absent optional fields.
#[must_use]
pub fn decode(care_plan: &CarePlan) -> Option<Task> {
    let id = decode_id(care_plan)?;
    let detail = care_plan
        .activity
        .first()
        .and_then(|activity| activity.detail.as_ref());

    let name = detail
        .and_then(|d| d.description.clone())
        .unwrap_or_default();
    let status = detail.and_then(|d| d.status.as_deref()).map(decode_status);
    let extensions = detail.map(|d| d.extension.as_slice()).unwrap_or_default();
    let scheduled_end = detail
        .and_then(|d| d.scheduled_period.as_ref())
        .and_then(|period| period.end.as_deref())
        .and_then(parse_instant);

    Some(Task::from_parts(TaskData {
        id: Some(id),
        name,
        status,
        due_date: decode_due_date(extensions, scheduled_end),
        rationale: care_plan.description.clone(),
        assignee: detail.and_then(|d| decode_assignee(&d.performer)),
        priority: decode_priority(extensions),
        created_date: care_plan.created.as_deref().and_then(parse_instant),
        created_by: care_plan
            .author
            .as_ref()
            .and_then(|author| author.display.clone()),
    }))
}

/// Encodes a task as a full CarePlan resource for the given patient.
///
/// The resource id is carried only when the task has one, so the same
/// function serves create (no id) and full-replace (id present).
/// Backend-assigned provenance (`created`, `author`) is written back
/// when known; under full-replace semantics omitting it would erase it.
#[must_use]
pub fn encode(task: &Task, patient: &PatientId) -> CarePlan {
    CarePlan {
        resource_type: Some("CarePlan".to_owned()),
        id: task.id().map(|id| id.to_string()),
        status: Some(if task.completed() { "completed" } else { "active" }.to_owned()),
        intent: Some("plan".to_owned()),
        description: task.rationale().map(str::to_owned),
        subject: Some(Reference::to(format!("Patient/{patient}"))),
        created: task.created_date().map(|created| created.to_rfc3339()),
        author: task.created_by().map(|author| Reference {
            reference: None,
            display: Some(author.to_owned()),
        }),
        activity: vec![CarePlanActivity {
            detail: Some(encode_detail(task)),
        }],
    }
}

fn encode_detail(task: &Task) -> ActivityDetail {
    let mut extension = Vec::new();
    let mut scheduled_period = None;

    if let Some(due_date) = task.due_date() {
        extension.push(Extension::code(
            DUE_KIND_EXTENSION_URL,
            due_date.kind().as_str(),
        ));
        if let Some(visit) = due_date.visit() {
            extension.push(Extension::reference(
                ASSOCIATED_ENCOUNTER_EXTENSION_URL,
                Reference::to(format!("Encounter/{visit}")),
            ));
        }
        // An empty period is written for unresolved visit-relative due
        // dates; the backend fills `end` once the visit concludes.
        scheduled_period = Some(Period {
            start: None,
            end: due_date.resolved_date().map(|end| end.to_rfc3339()),
        });
    }

    if let Some(priority) = task.priority() {
        extension.push(Extension::code(PRIORITY_EXTENSION_URL, priority.as_str()));
    }

    ActivityDetail {
        description: Some(task.name().to_owned()),
        status: Some(task.status().as_str().to_owned()),
        performer: task.assignee().map(encode_performer).into_iter().collect(),
        scheduled_period,
        extension,
    }
}

fn encode_performer(assignee: &Assignee) -> Reference {
    let resource = match assignee.kind() {
        AssigneeKind::Person => "Practitioner",
        AssigneeKind::Role => "PractitionerRole",
    };
    Reference {
        reference: Some(format!("{resource}/{}", assignee.id())),
        display: assignee.display().map(str::to_owned),
    }
}

fn decode_id(care_plan: &CarePlan) -> Option<TaskId> {
    let raw = care_plan.id.as_deref()?;
    match Uuid::parse_str(raw) {
        Ok(uuid) => Some(TaskId::from_uuid(uuid)),
        Err(_) => {
            warn!(id = raw, "discarding care plan with non-UUID id");
            None
        }
    }
}

fn decode_status(raw: &str) -> TaskStatus {
    TaskStatus::try_from(raw).unwrap_or_else(|err| {
        warn!(%err, "unknown activity status; defaulting to not-started");
        TaskStatus::NotStarted
    })
}

/// Resolves the due-date union from the due-kind extension, falling
/// back to a plain date when only `scheduledPeriod.end` is present
/// (resources written before the extension existed carry no kind).
fn decode_due_date(
    extensions: &[Extension],
    scheduled_end: Option<DateTime<Utc>>,
) -> Option<TaskDueDate> {
    let kind = find_extension(extensions, DUE_KIND_EXTENSION_URL)
        .and_then(|ext| ext.value_code.as_deref())
        .and_then(|code| match DueKind::try_from(code) {
            Ok(kind) => Some(kind),
            Err(err) => {
                warn!(%err, "ignoring unknown due-kind code");
                None
            }
        });
    let visit = decode_visit(extensions);

    match kind {
        Some(DueKind::Date) => scheduled_end.map(TaskDueDate::Date),
        Some(DueKind::ThisVisit) => Some(TaskDueDate::ThisVisit(
            VisitRelativeDueDate::from_parts(visit, scheduled_end),
        )),
        Some(DueKind::NextVisit) => Some(TaskDueDate::NextVisit(
            VisitRelativeDueDate::from_parts(visit, scheduled_end),
        )),
        None => scheduled_end.map(TaskDueDate::Date),
    }
}

fn decode_visit(extensions: &[Extension]) -> Option<VisitId> {
    let reference = find_extension(extensions, ASSOCIATED_ENCOUNTER_EXTENSION_URL)?
        .value_reference
        .as_ref()?
        .reference
        .as_deref()?;
    let Some(raw) = reference.strip_prefix("Encounter/") else {
        warn!(reference, "ignoring associated encounter with foreign reference");
        return None;
    };
    match Uuid::parse_str(raw) {
        Ok(uuid) => Some(VisitId::from_uuid(uuid)),
        Err(_) => {
            warn!(reference, "ignoring associated encounter with non-UUID id");
            None
        }
    }
}

fn decode_priority(extensions: &[Extension]) -> Option<TaskPriority> {
    let code = find_extension(extensions, PRIORITY_EXTENSION_URL)?
        .value_code
        .as_deref()?;
    match TaskPriority::try_from(code) {
        Ok(priority) => Some(priority),
        Err(err) => {
            warn!(%err, "ignoring unknown priority code");
            None
        }
    }
}

/// Picks the assignee from the performer list: the first reference with
/// a recognized scheme wins, unrecognized schemes are skipped.
fn decode_assignee(performers: &[Reference]) -> Option<Assignee> {
    performers.iter().find_map(decode_performer)
}

fn decode_performer(performer: &Reference) -> Option<Assignee> {
    let reference = performer.reference.as_deref()?;
    let assignee = if let Some(raw) = reference.strip_prefix("Practitioner/") {
        Uuid::parse_str(raw).ok().map(Assignee::person)
    } else if let Some(raw) = reference.strip_prefix("PractitionerRole/") {
        Uuid::parse_str(raw).ok().map(Assignee::role)
    } else {
        None
    };
    let Some(assignee) = assignee else {
        warn!(reference, "skipping performer with unrecognized reference");
        return None;
    };
    Some(match performer.display.as_deref() {
        Some(display) => assignee.with_display(display),
        None => assignee,
    })
}

fn find_extension<'a>(extensions: &'a [Extension], url: &str) -> Option<&'a Extension> {
    extensions.iter().find(|ext| ext.url == url)
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(instant) => Some(instant.with_timezone(&Utc)),
        Err(err) => {
            warn!(raw, %err, "ignoring unparseable instant");
            None
        }
    }
}
