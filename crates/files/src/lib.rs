//! DCM attachment ingestion
//!
//! This crate turns raw files into the attachment records embedded in
//! incident (appointment) documents.
//!
//! ## Design Principles
//!
//! - Attachment bytes travel *inside* the record as a base64 data URI;
//!   there is no external blob store and no cross-record file namespace
//! - Ingestion is a plain `async` function returning a `Result` — no UI
//!   lifecycle, no callback plumbing, errors propagate to the caller
//! - Ingestion never touches the data store itself; callers attach the
//!   resulting [`Attachment`] to an incident's `files` sequence
//! - Because attachments are embedded, total size is bounded by the
//!   storage medium's quota; uploads are capped at
//!   [`MAX_ATTACHMENT_BYTES`] per file
//!
//! ## Example Usage
//!
//! ```no_run
//! use dcm_files::ingest;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let attachment = ingest(Path::new("xray.png")).await?;
//! assert!(attachment.url.starts_with("data:image/png;base64,"));
//! # Ok(())
//! # }
//! ```

mod attachment;
mod constants;

pub use attachment::{encode_bytes, ingest, Attachment};
pub use constants::{
    DEFAULT_MEDIA_TYPE, DOCUMENT_MEDIA_TYPES, IMAGE_MEDIA_TYPES, MAX_ATTACHMENT_BYTES,
};

/// Errors that can occur during attachment ingestion
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// The source path has no usable file name
    #[error("Cannot derive an attachment name from path: {0}")]
    InvalidFileName(String),

    /// The file exceeds the per-attachment size bound
    #[error("File is {size} bytes, exceeding the {limit}-byte attachment limit")]
    TooLarge { size: u64, limit: u64 },

    /// I/O error occurred while reading the source file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
