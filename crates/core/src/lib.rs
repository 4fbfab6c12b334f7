//! # DCM Core
//!
//! Core business logic for the DCM clinic management system.
//!
//! This crate contains the client data store and its collaborators:
//! - [`ClinicStore`]: patient/incident collections with CRUD, cascade
//!   delete, derived analytics and a subscribe/notify surface
//! - A key-value [`storage`] medium (JSON files or in-memory) the store
//!   synchronizes every mutation to
//! - The [`auth`] session collaborator sharing the same medium
//!
//! **No presentation concerns**: forms, tables, calendars and dashboards
//! are callers of this crate, not part of it.

pub mod analytics;
pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod incident;
pub mod patient;
mod sample;
pub mod storage;
pub mod store;

pub use analytics::Analytics;
pub use auth::{AuthError, AuthResult, AuthService, Role, User};
pub use config::{resolve_data_dir, CoreConfig};
pub use error::{StoreError, StoreResult};
pub use incident::{Incident, IncidentDraft, IncidentStatus, IncidentUpdate};
pub use patient::{Patient, PatientDraft, PatientUpdate};
pub use storage::{JsonFileStorage, MemoryStorage, StorageMedium};
pub use store::{ClinicStore, StoreEvent};

// Re-export the identifier and value types callers need to drive the
// store surface.
pub use dcm_files::Attachment;
pub use dcm_id::{IncidentId, PatientId};
pub use dcm_types::{Cost, EmailAddress, NonEmptyText, TextError};
