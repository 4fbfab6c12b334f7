//! The clinic data store.
//!
//! [`ClinicStore`] is the sole authority over the patient and incident
//! collections. It keeps an in-memory mirror of both, synchronously
//! serializes the whole affected collection back to the storage medium
//! after every successful mutation, and notifies subscribers so consumers
//! re-read instead of polling.
//!
//! The store is constructed once at startup with its storage medium
//! injected, then passed by reference to every consumer. Execution is
//! single-threaded: all mutations are synchronous `&mut self`
//! read-modify-write passes over a whole collection, so no torn writes
//! are possible within one process. Two processes sharing a data
//! directory race last-write-wins; nothing here coordinates them.

use crate::analytics::{self, Analytics};
use crate::constants::{AUTH_USER_KEY, INCIDENTS_KEY, PATIENTS_KEY};
use crate::incident::{Incident, IncidentDraft, IncidentStatus, IncidentUpdate};
use crate::patient::{Patient, PatientDraft, PatientUpdate};
use crate::sample::{sample_incidents, sample_patients};
use crate::storage::StorageMedium;
use crate::{StoreError, StoreResult};
use chrono::{NaiveDateTime, Utc};
use dcm_id::{IncidentId, PatientId};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{mpsc, Arc};

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    PatientAdded(PatientId),
    PatientUpdated(PatientId),
    /// Carries the number of incidents removed by the cascade.
    PatientRemoved(PatientId, usize),
    IncidentAdded(IncidentId),
    IncidentUpdated(IncidentId),
    IncidentRemoved(IncidentId),
    /// The collections were restored to the sample set; re-read everything.
    DataReset,
}

/// The client data store: both collections, the storage medium behind
/// them, and the subscriber list.
pub struct ClinicStore {
    patients: Vec<Patient>,
    incidents: Vec<Incident>,
    storage: Arc<dyn StorageMedium>,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl ClinicStore {
    /// Opens the store over the given medium.
    ///
    /// Each collection key is loaded independently; a key that is absent
    /// or does not parse falls back to the fixed sample set (a corrupt
    /// key is indistinguishable from a missing one, and whatever was
    /// stored there is discarded). The resulting state is persisted
    /// immediately, so the medium is never empty after a successful open.
    ///
    /// # Errors
    ///
    /// Returns a storage error only if persisting the initial state
    /// fails; read problems degrade to the sample set.
    pub fn open(storage: Arc<dyn StorageMedium>) -> StoreResult<Self> {
        let patients = load_collection(storage.as_ref(), PATIENTS_KEY, sample_patients);
        let incidents = load_collection(storage.as_ref(), INCIDENTS_KEY, sample_incidents);

        let mut store = Self {
            patients,
            incidents,
            storage,
            subscribers: Vec::new(),
        };
        store.persist_patients()?;
        store.persist_incidents()?;
        Ok(store)
    }

    /// All patients, in insertion order.
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// All incidents, in insertion order.
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Looks up a patient by id.
    pub fn patient(&self, id: &PatientId) -> Option<&Patient> {
        self.patients.iter().find(|p| &p.id == id)
    }

    /// Looks up an incident by id.
    pub fn incident(&self, id: &IncidentId) -> Option<&Incident> {
        self.incidents.iter().find(|i| &i.id == id)
    }

    /// All incidents belonging to one patient, in insertion order.
    pub fn incidents_for_patient(&self, id: &PatientId) -> Vec<&Incident> {
        self.incidents.iter().filter(|i| &i.patient_id == id).collect()
    }

    /// Registers a subscriber. Disconnected receivers are pruned on the
    /// next notification.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Creates a patient from a validated draft and returns its new id.
    pub fn add_patient(&mut self, draft: PatientDraft) -> StoreResult<PatientId> {
        let id = PatientId::new();
        let patient = draft.into_patient(id.clone(), Utc::now());
        self.patients.push(patient);
        self.persist_patients()?;
        self.notify(StoreEvent::PatientAdded(id.clone()));
        Ok(id)
    }

    /// Merges `update` into the patient with the given id.
    ///
    /// An unknown id leaves the collection untouched; the skip is logged
    /// but not an error.
    pub fn update_patient(&mut self, id: &PatientId, update: PatientUpdate) -> StoreResult<()> {
        let Some(patient) = self.patients.iter_mut().find(|p| &p.id == id) else {
            tracing::warn!("update for unknown patient id '{}', skipping", id);
            return Ok(());
        };
        patient.apply(update);
        self.persist_patients()?;
        self.notify(StoreEvent::PatientUpdated(id.clone()));
        Ok(())
    }

    /// Removes a patient and every incident referencing it.
    ///
    /// An unknown id leaves both collections untouched.
    pub fn delete_patient(&mut self, id: &PatientId) -> StoreResult<()> {
        if !self.patients.iter().any(|p| &p.id == id) {
            tracing::warn!("delete for unknown patient id '{}', skipping", id);
            return Ok(());
        }

        self.patients.retain(|p| &p.id != id);
        let before = self.incidents.len();
        self.incidents.retain(|i| &i.patient_id != id);
        let cascaded = before - self.incidents.len();

        self.persist_patients()?;
        self.persist_incidents()?;
        tracing::info!("deleted patient '{}' and {} related incident(s)", id, cascaded);
        self.notify(StoreEvent::PatientRemoved(id.clone(), cascaded));
        Ok(())
    }

    /// Creates an incident from a validated draft and returns its new id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownPatient` if the draft references a
    /// patient id with no live record.
    pub fn add_incident(&mut self, draft: IncidentDraft) -> StoreResult<IncidentId> {
        if !self.patients.iter().any(|p| p.id == draft.patient_id) {
            return Err(StoreError::UnknownPatient(draft.patient_id.to_string()));
        }

        let id = IncidentId::new();
        let incident = draft.into_incident(id.clone(), Utc::now());
        self.incidents.push(incident);
        self.persist_incidents()?;
        self.notify(StoreEvent::IncidentAdded(id.clone()));
        Ok(id)
    }

    /// Merges `update` into the incident with the given id, stamping
    /// `completed_at` on a first transition to `Completed`.
    ///
    /// An unknown id leaves the collection untouched.
    pub fn update_incident(&mut self, id: &IncidentId, update: IncidentUpdate) -> StoreResult<()> {
        let Some(incident) = self.incidents.iter_mut().find(|i| &i.id == id) else {
            tracing::warn!("update for unknown incident id '{}', skipping", id);
            return Ok(());
        };
        incident.apply(update, Utc::now());
        self.persist_incidents()?;
        self.notify(StoreEvent::IncidentUpdated(id.clone()));
        Ok(())
    }

    /// Removes an incident. No cascade; incidents are terminal.
    pub fn delete_incident(&mut self, id: &IncidentId) -> StoreResult<()> {
        if !self.incidents.iter().any(|i| &i.id == id) {
            tracing::warn!("delete for unknown incident id '{}', skipping", id);
            return Ok(());
        }
        self.incidents.retain(|i| &i.id != id);
        self.persist_incidents()?;
        self.notify(StoreEvent::IncidentRemoved(id.clone()));
        Ok(())
    }

    /// Derived dashboard figures as of now.
    pub fn analytics(&self) -> Analytics {
        self.analytics_as_of(Utc::now().naive_utc())
    }

    /// Derived dashboard figures with the clock supplied by the caller.
    pub fn analytics_as_of(&self, now: NaiveDateTime) -> Analytics {
        analytics::compute(&self.patients, &self.incidents, now)
    }

    /// Restores the fixed sample set.
    ///
    /// Clears the collection keys and the authentication session, resets
    /// the in-memory collections to the sample data, persists them, and
    /// emits [`StoreEvent::DataReset`] so every consumer re-reads.
    pub fn reset(&mut self) -> StoreResult<()> {
        self.storage.remove(PATIENTS_KEY)?;
        self.storage.remove(INCIDENTS_KEY)?;
        self.storage.remove(AUTH_USER_KEY)?;

        self.patients = sample_patients();
        self.incidents = sample_incidents();
        self.persist_patients()?;
        self.persist_incidents()?;

        tracing::info!("store reset to the sample data set");
        self.notify(StoreEvent::DataReset);
        Ok(())
    }

    /// Convenience summary of pending work for a patient, used by the
    /// self-service views: (pending, completed) incident counts.
    pub fn patient_incident_counts(&self, id: &PatientId) -> (usize, usize) {
        let mut pending = 0;
        let mut completed = 0;
        for incident in self.incidents.iter().filter(|i| &i.patient_id == id) {
            if incident.status.is_pending() {
                pending += 1;
            } else if incident.status == IncidentStatus::Completed {
                completed += 1;
            }
        }
        (pending, completed)
    }

    fn persist_patients(&self) -> StoreResult<()> {
        let raw = serde_json::to_string(&self.patients).map_err(StoreError::Serialization)?;
        self.storage.write(PATIENTS_KEY, &raw)
    }

    fn persist_incidents(&self) -> StoreResult<()> {
        let raw = serde_json::to_string(&self.incidents).map_err(StoreError::Serialization)?;
        self.storage.write(INCIDENTS_KEY, &raw)
    }

    fn notify(&mut self, event: StoreEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

/// Loads one collection, degrading to the sample fallback when the key
/// is absent, unreadable or unparsable.
fn load_collection<T, F>(storage: &dyn StorageMedium, key: &str, fallback: F) -> Vec<T>
where
    T: serde::de::DeserializeOwned,
    F: FnOnce() -> Vec<T>,
{
    match storage.read(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("unparsable '{}' key, seeding sample data: {}", key, e);
                fallback()
            }
        },
        Ok(None) => fallback(),
        Err(e) => {
            tracing::warn!("failed to read '{}' key, seeding sample data: {}", key, e);
            fallback()
        }
    }
}
