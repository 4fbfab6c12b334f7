//! Derived dashboard analytics.
//!
//! Everything here is recomputed from the live collections on every call;
//! there is no cache and no incremental maintenance. The figures match
//! what the admin dashboard renders: revenue, appointment counts and the
//! number of patients with something still on the calendar.

use crate::incident::{Incident, IncidentStatus};
use crate::patient::Patient;
use chrono::NaiveDateTime;
use serde::Serialize;

/// A snapshot of the derived dashboard figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    /// Sum of `cost` over incidents with status `Completed`.
    pub total_revenue: f64,
    /// Incidents currently `Scheduled` or `In Progress`.
    pub pending_appointments: usize,
    /// Incidents with status `Completed`.
    pub completed_treatments: usize,
    pub total_patients: usize,
    /// Patients with at least one future `Scheduled`/`In Progress`
    /// incident.
    pub patients_with_upcoming_appointments: usize,
}

pub(crate) fn compute(
    patients: &[Patient],
    incidents: &[Incident],
    now: NaiveDateTime,
) -> Analytics {
    let total_revenue = incidents
        .iter()
        .filter(|i| i.status == IncidentStatus::Completed)
        .map(|i| i.cost.amount())
        .sum();

    let pending_appointments = incidents.iter().filter(|i| i.status.is_pending()).count();

    let completed_treatments = incidents
        .iter()
        .filter(|i| i.status == IncidentStatus::Completed)
        .count();

    let patients_with_upcoming_appointments = patients
        .iter()
        .filter(|p| {
            incidents
                .iter()
                .any(|i| i.patient_id == p.id && i.appointment_date > now && i.status.is_pending())
        })
        .count();

    Analytics {
        total_revenue,
        pending_appointments,
        completed_treatments,
        total_patients: patients.len(),
        patients_with_upcoming_appointments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::IncidentDraft;
    use crate::patient::PatientDraft;
    use chrono::Utc;
    use dcm_id::{IncidentId, PatientId};
    use dcm_types::{Cost, NonEmptyText};

    fn patient(id: &str) -> Patient {
        PatientDraft::new(
            NonEmptyText::new("Test Patient").unwrap(),
            "1990-05-10".parse().unwrap(),
            NonEmptyText::new("1234567890").unwrap(),
        )
        .into_patient(PatientId::parse(id).unwrap(), Utc::now())
    }

    fn incident(
        patient_id: &str,
        appointment: &str,
        status: IncidentStatus,
        cost: f64,
    ) -> Incident {
        let mut draft = IncidentDraft::new(
            PatientId::parse(patient_id).unwrap(),
            NonEmptyText::new("Checkup").unwrap(),
            appointment.parse().unwrap(),
        );
        draft.status = status;
        draft.cost = Cost::new(cost);
        draft.into_incident(IncidentId::new(), Utc::now())
    }

    fn now() -> NaiveDateTime {
        "2025-07-15T12:00:00".parse().unwrap()
    }

    #[test]
    fn test_revenue_counts_only_completed_incidents() {
        let patients = vec![patient("p1")];
        let incidents = vec![
            incident("p1", "2025-07-01T10:00:00", IncidentStatus::Completed, 80.0),
            incident("p1", "2025-08-01T10:00:00", IncidentStatus::Scheduled, 1500.0),
            incident("p1", "2025-08-02T10:00:00", IncidentStatus::Cancelled, 300.0),
        ];

        let analytics = compute(&patients, &incidents, now());
        assert_eq!(analytics.total_revenue, 80.0);
        assert_eq!(analytics.completed_treatments, 1);
    }

    #[test]
    fn test_pending_counts_scheduled_and_in_progress() {
        let patients = vec![patient("p1")];
        let incidents = vec![
            incident("p1", "2025-08-01T10:00:00", IncidentStatus::Scheduled, 0.0),
            incident("p1", "2025-08-02T10:00:00", IncidentStatus::InProgress, 0.0),
            incident("p1", "2025-08-03T10:00:00", IncidentStatus::Rescheduled, 0.0),
        ];

        let analytics = compute(&patients, &incidents, now());
        assert_eq!(analytics.pending_appointments, 2);
    }

    #[test]
    fn test_upcoming_requires_future_pending_appointment() {
        let patients = vec![patient("p1"), patient("p2"), patient("p3")];
        let incidents = vec![
            // Future and pending: counts.
            incident("p1", "2025-08-01T10:00:00", IncidentStatus::Scheduled, 0.0),
            // Past, even though pending: does not count.
            incident("p2", "2025-07-01T10:00:00", IncidentStatus::Scheduled, 0.0),
            // Future but completed: does not count.
            incident("p3", "2025-08-01T10:00:00", IncidentStatus::Completed, 0.0),
        ];

        let analytics = compute(&patients, &incidents, now());
        assert_eq!(analytics.patients_with_upcoming_appointments, 1);
        assert_eq!(analytics.total_patients, 3);
    }

    #[test]
    fn test_patient_with_several_upcoming_counts_once() {
        let patients = vec![patient("p1")];
        let incidents = vec![
            incident("p1", "2025-08-01T10:00:00", IncidentStatus::Scheduled, 0.0),
            incident("p1", "2025-09-01T10:00:00", IncidentStatus::InProgress, 0.0),
        ];

        let analytics = compute(&patients, &incidents, now());
        assert_eq!(analytics.patients_with_upcoming_appointments, 1);
    }

    #[test]
    fn test_empty_collections_yield_zeroes() {
        let analytics = compute(&[], &[], now());
        assert_eq!(
            analytics,
            Analytics {
                total_revenue: 0.0,
                pending_appointments: 0,
                completed_treatments: 0,
                total_patients: 0,
                patients_with_upcoming_appointments: 0,
            }
        );
    }

    #[test]
    fn test_analytics_serializes_camel_case() {
        let analytics = compute(&[], &[], now());
        let json = serde_json::to_value(&analytics).unwrap();
        assert!(json.get("totalRevenue").is_some());
        assert!(json.get("pendingAppointments").is_some());
        assert!(json.get("patientsWithUpcomingAppointments").is_some());
    }
}
