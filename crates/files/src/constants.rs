//! Attachment ingestion limits and media-type sets.

/// Maximum accepted size for a single attachment, in bytes (5 MiB).
///
/// Attachments are embedded into incident records as data URIs, so every
/// byte counts against the storage medium's quota.
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

/// Media type recorded when detection yields nothing.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Image media types the clinic front ends accept for x-rays and photos.
pub const IMAGE_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

/// Document media types accepted for invoices and referral letters.
pub const DOCUMENT_MEDIA_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];
