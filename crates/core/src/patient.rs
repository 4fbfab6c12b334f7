//! Patient records and their creation/update forms.
//!
//! A [`Patient`] is the parent entity incidents reference. Records are
//! created from a [`PatientDraft`] (validated at the store boundary) and
//! mutated through a [`PatientUpdate`], a shallow merge where only the
//! fields a caller supplies are overwritten.

use chrono::{DateTime, NaiveDate, Utc};
use dcm_id::PatientId;
use dcm_types::{EmailAddress, NonEmptyText};
use serde::{Deserialize, Serialize};

/// A clinic patient profile as persisted under the `patients` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Unique identifier, assigned at creation.
    pub id: PatientId,

    /// Full name.
    pub name: String,

    /// Date of birth.
    pub dob: NaiveDate,

    /// Phone number or equivalent contact detail.
    pub contact: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailAddress>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance: Option<String>,

    /// Free-text health summary, e.g. "No allergies".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_info: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,

    /// Set once at creation; never touched by updates.
    pub created_at: DateTime<Utc>,
}

impl Patient {
    /// Applies a shallow merge: fields present in `update` overwrite the
    /// record, omitted fields are left as they are. `id` and `created_at`
    /// are immutable and not part of the update form.
    pub(crate) fn apply(&mut self, update: PatientUpdate) {
        if let Some(name) = update.name {
            self.name = name.into_string();
        }
        if let Some(dob) = update.dob {
            self.dob = dob;
        }
        if let Some(contact) = update.contact {
            self.contact = contact.into_string();
        }
        if let Some(email) = update.email {
            self.email = Some(email);
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
        if let Some(emergency_contact) = update.emergency_contact {
            self.emergency_contact = Some(emergency_contact);
        }
        if let Some(blood_group) = update.blood_group {
            self.blood_group = Some(blood_group);
        }
        if let Some(insurance) = update.insurance {
            self.insurance = Some(insurance);
        }
        if let Some(health_info) = update.health_info {
            self.health_info = Some(health_info);
        }
        if let Some(medical_history) = update.medical_history {
            self.medical_history = Some(medical_history);
        }
    }
}

/// Validated input for creating a patient.
///
/// The required fields are exactly the ones the seeded sample record
/// carries: name, date of birth and a contact detail. Everything else is
/// optional but validated when present (the email must be well-formed at
/// the type level).
#[derive(Debug, Clone)]
pub struct PatientDraft {
    pub name: NonEmptyText,
    pub dob: NaiveDate,
    pub contact: NonEmptyText,
    pub email: Option<EmailAddress>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub blood_group: Option<String>,
    pub insurance: Option<String>,
    pub health_info: Option<String>,
    pub medical_history: Option<String>,
}

impl PatientDraft {
    /// Creates a draft with the required fields; optional fields start
    /// empty and can be filled in directly on the struct.
    pub fn new(name: NonEmptyText, dob: NaiveDate, contact: NonEmptyText) -> Self {
        Self {
            name,
            dob,
            contact,
            email: None,
            address: None,
            emergency_contact: None,
            blood_group: None,
            insurance: None,
            health_info: None,
            medical_history: None,
        }
    }

    pub(crate) fn into_patient(self, id: PatientId, created_at: DateTime<Utc>) -> Patient {
        Patient {
            id,
            name: self.name.into_string(),
            dob: self.dob,
            contact: self.contact.into_string(),
            email: self.email,
            address: self.address,
            emergency_contact: self.emergency_contact,
            blood_group: self.blood_group,
            insurance: self.insurance,
            health_info: self.health_info,
            medical_history: self.medical_history,
            created_at,
        }
    }
}

/// Partial update for a patient; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PatientUpdate {
    pub name: Option<NonEmptyText>,
    pub dob: Option<NaiveDate>,
    pub contact: Option<NonEmptyText>,
    pub email: Option<EmailAddress>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub blood_group: Option<String>,
    pub insurance: Option<String>,
    pub health_info: Option<String>,
    pub medical_history: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PatientDraft {
        PatientDraft::new(
            NonEmptyText::new("John Doe").unwrap(),
            NaiveDate::from_ymd_opt(1990, 5, 10).unwrap(),
            NonEmptyText::new("1234567890").unwrap(),
        )
    }

    #[test]
    fn test_draft_builds_patient_with_given_identity() {
        let id = PatientId::parse("p1").unwrap();
        let created_at = Utc::now();
        let patient = draft().into_patient(id.clone(), created_at);

        assert_eq!(patient.id, id);
        assert_eq!(patient.name, "John Doe");
        assert_eq!(patient.contact, "1234567890");
        assert_eq!(patient.created_at, created_at);
        assert!(patient.email.is_none());
    }

    #[test]
    fn test_empty_update_changes_nothing() {
        let mut patient = draft().into_patient(PatientId::new(), Utc::now());
        let before = patient.clone();

        patient.apply(PatientUpdate::default());
        assert_eq!(patient, before);
    }

    #[test]
    fn test_update_overwrites_only_supplied_fields() {
        let mut patient = draft().into_patient(PatientId::new(), Utc::now());
        patient.health_info = Some("No allergies".into());

        patient.apply(PatientUpdate {
            contact: Some(NonEmptyText::new("0987654321").unwrap()),
            insurance: Some("DentaCare Plus".into()),
            ..Default::default()
        });

        assert_eq!(patient.contact, "0987654321");
        assert_eq!(patient.insurance.as_deref(), Some("DentaCare Plus"));
        // Untouched fields survive the merge.
        assert_eq!(patient.name, "John Doe");
        assert_eq!(patient.health_info.as_deref(), Some("No allergies"));
    }

    #[test]
    fn test_patient_serializes_with_camel_case_keys() {
        let mut patient = draft().into_patient(PatientId::parse("p1").unwrap(), Utc::now());
        patient.emergency_contact = Some("Jane Doe 555-0101".into());

        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["id"], "p1");
        assert_eq!(json["dob"], "1990-05-10");
        assert_eq!(json["emergencyContact"], "Jane Doe 555-0101");
        assert!(json["createdAt"].is_string());
        // Absent optionals are omitted entirely.
        assert!(json.get("bloodGroup").is_none());
    }

    #[test]
    fn test_patient_deserializes_sample_shape() {
        let json = r#"{
            "id": "p1",
            "name": "John Doe",
            "dob": "1990-05-10",
            "contact": "1234567890",
            "healthInfo": "No allergies",
            "createdAt": "2025-06-01T09:00:00Z"
        }"#;

        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.id.as_str(), "p1");
        assert_eq!(patient.health_info.as_deref(), Some("No allergies"));
        assert!(patient.medical_history.is_none());
    }
}
