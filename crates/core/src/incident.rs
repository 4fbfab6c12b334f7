//! Incident (appointment/treatment) records.
//!
//! An incident is the clinic's transactional entity: one appointment or
//! treatment episode tied to exactly one patient. The status set is a
//! free enumeration — any status may follow any other, there is no
//! enforced transition graph.

use chrono::{DateTime, NaiveDateTime, Utc};
use dcm_files::Attachment;
use dcm_id::{IncidentId, PatientId};
use dcm_types::{Cost, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of an incident.
///
/// Serialized with the exact labels the persisted layout uses
/// (`"In Progress"` with a space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncidentStatus {
    Scheduled,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
    Rescheduled,
}

impl IncidentStatus {
    /// True for the states counted as pending appointments.
    pub fn is_pending(&self) -> bool {
        matches!(self, IncidentStatus::Scheduled | IncidentStatus::InProgress)
    }

    /// The label used in the persisted layout and user-facing output.
    pub fn label(&self) -> &'static str {
        match self {
            IncidentStatus::Scheduled => "Scheduled",
            IncidentStatus::InProgress => "In Progress",
            IncidentStatus::Completed => "Completed",
            IncidentStatus::Cancelled => "Cancelled",
            IncidentStatus::Rescheduled => "Rescheduled",
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IncidentStatus {
    type Err = String;

    /// Parses a status label, tolerating case and `in-progress` spelling
    /// for command-line input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(IncidentStatus::Scheduled),
            "in progress" | "in-progress" => Ok(IncidentStatus::InProgress),
            "completed" => Ok(IncidentStatus::Completed),
            "cancelled" => Ok(IncidentStatus::Cancelled),
            "rescheduled" => Ok(IncidentStatus::Rescheduled),
            other => Err(format!(
                "unknown status '{}' (expected Scheduled, In Progress, Completed, Cancelled or Rescheduled)",
                other
            )),
        }
    }
}

/// An appointment/treatment record as persisted under the `incidents` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Unique identifier, assigned at creation.
    pub id: IncidentId,

    /// The patient this incident belongs to. Checked against a live
    /// patient on creation; patient deletion cascades here.
    pub patient_id: PatientId,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub comments: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Appointment date-time, timezone-less ISO-8601 as persisted.
    pub appointment_date: NaiveDateTime,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_appointment_date: Option<NaiveDateTime>,

    #[serde(default)]
    pub cost: Cost,

    pub status: IncidentStatus,

    /// Ordered attachment sequence; bytes embedded as data URIs.
    #[serde(default)]
    pub files: Vec<Attachment>,

    pub created_at: DateTime<Utc>,

    /// Stamped when the status first becomes `Completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Incident {
    /// Applies a shallow merge, stamping `completed_at` the first time
    /// the status lands on `Completed`.
    pub(crate) fn apply(&mut self, update: IncidentUpdate, now: DateTime<Utc>) {
        if let Some(title) = update.title {
            self.title = title.into_string();
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(comments) = update.comments {
            self.comments = comments;
        }
        if let Some(treatment) = update.treatment {
            self.treatment = Some(treatment);
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
        if let Some(appointment_date) = update.appointment_date {
            self.appointment_date = appointment_date;
        }
        if let Some(next_appointment_date) = update.next_appointment_date {
            self.next_appointment_date = Some(next_appointment_date);
        }
        if let Some(cost) = update.cost {
            self.cost = cost;
        }
        if let Some(status) = update.status {
            self.status = status;
            if status == IncidentStatus::Completed && self.completed_at.is_none() {
                self.completed_at = Some(now);
            }
        }
        if let Some(files) = update.files {
            self.files = files;
        }
    }
}

/// Validated input for creating an incident.
#[derive(Debug, Clone)]
pub struct IncidentDraft {
    pub patient_id: PatientId,
    pub title: NonEmptyText,
    pub description: String,
    pub comments: String,
    pub treatment: Option<String>,
    pub notes: Option<String>,
    pub appointment_date: NaiveDateTime,
    pub next_appointment_date: Option<NaiveDateTime>,
    pub cost: Cost,
    pub status: IncidentStatus,
    pub files: Vec<Attachment>,
}

impl IncidentDraft {
    /// Creates a draft for a `Scheduled`, zero-cost incident; the other
    /// fields can be filled in directly on the struct.
    pub fn new(patient_id: PatientId, title: NonEmptyText, appointment_date: NaiveDateTime) -> Self {
        Self {
            patient_id,
            title,
            description: String::new(),
            comments: String::new(),
            treatment: None,
            notes: None,
            appointment_date,
            next_appointment_date: None,
            cost: Cost::ZERO,
            status: IncidentStatus::Scheduled,
            files: Vec::new(),
        }
    }

    pub(crate) fn into_incident(self, id: IncidentId, created_at: DateTime<Utc>) -> Incident {
        // An incident born Completed gets its completion stamp right away.
        let completed_at =
            (self.status == IncidentStatus::Completed).then_some(created_at);

        Incident {
            id,
            patient_id: self.patient_id,
            title: self.title.into_string(),
            description: self.description,
            comments: self.comments,
            treatment: self.treatment,
            notes: self.notes,
            appointment_date: self.appointment_date,
            next_appointment_date: self.next_appointment_date,
            cost: self.cost,
            status: self.status,
            files: self.files,
            created_at,
            completed_at,
        }
    }
}

/// Partial update for an incident; `None` fields are left untouched.
///
/// Supplying `files` replaces the whole attachment sequence — callers
/// append ingested attachments to the current sequence themselves.
#[derive(Debug, Clone, Default)]
pub struct IncidentUpdate {
    pub title: Option<NonEmptyText>,
    pub description: Option<String>,
    pub comments: Option<String>,
    pub treatment: Option<String>,
    pub notes: Option<String>,
    pub appointment_date: Option<NaiveDateTime>,
    pub next_appointment_date: Option<NaiveDateTime>,
    pub cost: Option<Cost>,
    pub status: Option<IncidentStatus>,
    pub files: Option<Vec<Attachment>>,
}
