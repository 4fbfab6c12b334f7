//! Storage keys and defaults shared across the core.

/// Storage key holding the JSON array of patient records.
pub const PATIENTS_KEY: &str = "patients";

/// Storage key holding the JSON array of incident records.
pub const INCIDENTS_KEY: &str = "incidents";

/// Storage key holding the JSON array of login users.
pub const USERS_KEY: &str = "users";

/// Storage key holding the logged-in user's session record.
pub const AUTH_USER_KEY: &str = "authUser";

/// Default data directory when no override is configured.
pub const DEFAULT_DATA_DIR: &str = "clinic_data";
