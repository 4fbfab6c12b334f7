//! Record identifiers for the DCM store.
//!
//! Every persisted record carries a string identifier. Freshly generated
//! identifiers use a single-letter entity prefix followed by a canonical
//! UUID (32 lowercase hex characters, no hyphens):
//!
//! - Patients: `p550e8400e29b41d4a716446655440000`
//! - Incidents: `i550e8400e29b41d4a716446655440000`
//!
//! Earlier front-end builds derived identifiers from the wall clock
//! (`p1751123456789`), and the seeded sample records use the short forms
//! `p1` and `i1`. Those records must keep working, so parsing is
//! intentionally permissive: any printable-ASCII token of bounded length
//! is accepted. Only *generation* is strict — new identifiers are always
//! prefix + UUIDv4, which removes the same-millisecond collision window
//! of the clock-derived scheme.

mod record;

// Re-export public types
pub use record::{IncidentId, PatientId};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// Invalid input provided
    #[error("Invalid identifier: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;
