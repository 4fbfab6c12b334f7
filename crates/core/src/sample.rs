//! The fixed sample data set.
//!
//! The store seeds these records whenever a collection key is absent or
//! unparsable, and `reset` restores exactly this set: one patient, one
//! incident with two attachments, and the two demo login users. The
//! timestamps are fixed constants so that a reset is deterministic.

use crate::auth::{Role, User};
use crate::incident::{Incident, IncidentStatus};
use crate::patient::Patient;
use chrono::{DateTime, Utc};
use dcm_files::Attachment;
use dcm_id::{IncidentId, PatientId};
use dcm_types::{Cost, EmailAddress, NonEmptyText};

fn seed_timestamp() -> DateTime<Utc> {
    "2025-06-01T09:00:00Z"
        .parse()
        .expect("seed timestamp is valid RFC 3339")
}

pub(crate) fn sample_patients() -> Vec<Patient> {
    vec![Patient {
        id: PatientId::parse("p1").expect("seed id is valid"),
        name: "John Doe".into(),
        dob: "1990-05-10".parse().expect("seed date is valid"),
        contact: "1234567890".into(),
        email: None,
        address: None,
        emergency_contact: None,
        blood_group: None,
        insurance: None,
        health_info: Some("No allergies".into()),
        medical_history: None,
        created_at: seed_timestamp(),
    }]
}

pub(crate) fn sample_incidents() -> Vec<Incident> {
    vec![Incident {
        id: IncidentId::parse("i1").expect("seed id is valid"),
        patient_id: PatientId::parse("p1").expect("seed id is valid"),
        title: "Toothache".into(),
        description: "Upper molar pain".into(),
        comments: "Sensitive to cold".into(),
        treatment: None,
        notes: None,
        appointment_date: "2025-07-01T10:00:00".parse().expect("seed date is valid"),
        next_appointment_date: None,
        cost: Cost::new(80.0),
        status: IncidentStatus::Completed,
        files: vec![
            Attachment {
                name: NonEmptyText::new("invoice.pdf").expect("seed name is non-empty"),
                url: "data:application/pdf;base64,JVBERi0xLjQKJcfs".into(),
                media_type: "application/pdf".into(),
                size: 25600,
                uploaded_at: None,
            },
            Attachment {
                name: NonEmptyText::new("xray.png").expect("seed name is non-empty"),
                url: "data:image/png;base64,iVBORw0KGgoA".into(),
                media_type: "image/png".into(),
                size: 204800,
                uploaded_at: None,
            },
        ],
        created_at: seed_timestamp(),
        completed_at: None,
    }]
}

pub(crate) fn sample_users() -> Vec<User> {
    vec![
        User {
            id: "u1".into(),
            role: Role::Admin,
            email: EmailAddress::parse("admin@entnt.in").expect("seed email is valid"),
            password: "admin123".into(),
            patient_id: None,
        },
        User {
            id: "u2".into(),
            role: Role::Patient,
            email: EmailAddress::parse("john@entnt.in").expect("seed email is valid"),
            password: "patient123".into(),
            patient_id: Some(PatientId::parse("p1").expect("seed id is valid")),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_set_shape() {
        let patients = sample_patients();
        let incidents = sample_incidents();

        assert_eq!(patients.len(), 1);
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].files.len(), 2);
        assert_eq!(incidents[0].patient_id, patients[0].id);
    }

    #[test]
    fn test_sample_set_is_deterministic() {
        assert_eq!(sample_patients(), sample_patients());
        assert_eq!(sample_incidents(), sample_incidents());
        assert_eq!(sample_users(), sample_users());
    }

    #[test]
    fn test_sample_incident_round_trips_through_json() {
        let incidents = sample_incidents();
        let json = serde_json::to_string(&incidents).unwrap();
        let back: Vec<Incident> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, incidents);
    }
}
