//! Attachment records and the ingestion path that produces them.
//!
//! An [`Attachment`] is the unit stored in an incident's `files` sequence.
//! The bytes themselves are carried in the `url` field as a base64 data
//! URI, which keeps the record self-contained at the price of inflating
//! it by roughly a third — hence the hard per-file size bound.

use crate::constants::{
    DEFAULT_MEDIA_TYPE, DOCUMENT_MEDIA_TYPES, IMAGE_MEDIA_TYPES, MAX_ATTACHMENT_BYTES,
};
use crate::FilesError;
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use dcm_types::NonEmptyText;
use std::path::Path;

/// A file attached to an incident record.
///
/// Serializes with the field names the persisted layout uses
/// (`type`, `uploadedAt`). Records written by earlier builds may lack
/// `uploadedAt`, so it is optional on the way in.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Original file name, e.g. `xray.png`
    pub name: NonEmptyText,

    /// The file bytes as a `data:<type>;base64,<payload>` URI
    pub url: String,

    /// Detected media type (MIME type); best-effort, not authoritative
    #[serde(rename = "type")]
    pub media_type: String,

    /// Size of the original file in bytes
    pub size: u64,

    /// UTC timestamp when the file was ingested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl Attachment {
    /// True if the detected media type is one of the accepted image types.
    pub fn is_image(&self) -> bool {
        IMAGE_MEDIA_TYPES.contains(&self.media_type.as_str())
    }

    /// True if the detected media type is one of the accepted document types.
    pub fn is_document(&self) -> bool {
        DOCUMENT_MEDIA_TYPES.contains(&self.media_type.as_str())
    }
}

/// Encodes raw bytes into an [`Attachment`] record.
///
/// Detects the media type from the leading bytes (falling back to
/// [`DEFAULT_MEDIA_TYPE`]), base64-encodes the payload into a data URI,
/// and stamps the ingestion time.
///
/// # Arguments
///
/// * `name` - File name to record, e.g. the source file's base name
/// * `bytes` - The file content
///
/// # Errors
///
/// Returns `FilesError::TooLarge` if the content exceeds
/// [`MAX_ATTACHMENT_BYTES`], or `FilesError::InvalidFileName` if `name`
/// is blank.
pub fn encode_bytes(name: &str, bytes: &[u8]) -> Result<Attachment, FilesError> {
    if bytes.len() as u64 > MAX_ATTACHMENT_BYTES {
        return Err(FilesError::TooLarge {
            size: bytes.len() as u64,
            limit: MAX_ATTACHMENT_BYTES,
        });
    }

    let name =
        NonEmptyText::new(name).map_err(|_| FilesError::InvalidFileName(name.to_owned()))?;

    let media_type = infer::get(bytes)
        .map(|kind| kind.mime_type().to_owned())
        .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_owned());

    let url = format!(
        "data:{};base64,{}",
        media_type,
        general_purpose::STANDARD.encode(bytes)
    );

    Ok(Attachment {
        name,
        url,
        media_type,
        size: bytes.len() as u64,
        uploaded_at: Some(Utc::now()),
    })
}

/// Reads a file and encodes it as an [`Attachment`].
///
/// This is the only asynchronous operation in the ingestion path. It
/// suspends until the file's bytes are fully read; concurrent calls
/// resolve independently in whatever order their reads complete, so
/// callers issuing several ingestions must correlate results by
/// identity, not arrival order. Dropping the returned future abandons
/// the read — there is no separate cancellation handle.
///
/// # Arguments
///
/// * `source_path` - Path of the file to ingest
///
/// # Errors
///
/// Returns `FilesError` if:
/// - The file's metadata or content cannot be read (I/O)
/// - The file exceeds [`MAX_ATTACHMENT_BYTES`]
/// - No file name can be derived from `source_path`
pub async fn ingest(source_path: &Path) -> Result<Attachment, FilesError> {
    let metadata = tokio::fs::metadata(source_path).await?;
    if metadata.len() > MAX_ATTACHMENT_BYTES {
        return Err(FilesError::TooLarge {
            size: metadata.len(),
            limit: MAX_ATTACHMENT_BYTES,
        });
    }

    let name = source_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FilesError::InvalidFileName(source_path.display().to_string()))?;

    let bytes = tokio::fs::read(source_path).await?;
    encode_bytes(name, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[tokio::test]
    async fn test_ingest_file_success() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("xray.png");
        fs::write(&source, PNG_HEADER).unwrap();

        let attachment = ingest(&source).await.unwrap();

        assert_eq!(attachment.name.as_str(), "xray.png");
        assert_eq!(attachment.media_type, "image/png");
        assert_eq!(attachment.size, PNG_HEADER.len() as u64);
        assert!(attachment.url.starts_with("data:image/png;base64,"));
        assert!(attachment.uploaded_at.is_some());
        assert!(attachment.is_image());
        assert!(!attachment.is_document());
    }

    #[tokio::test]
    async fn test_ingest_nonexistent_file() {
        let temp = TempDir::new().unwrap();
        let result = ingest(&temp.path().join("missing.pdf")).await;

        assert!(matches!(result, Err(FilesError::Io(_))));
    }

    #[test]
    fn test_encode_bytes_data_uri_round_trip() {
        let content = b"Plain text content";
        let attachment = encode_bytes("note.txt", content).unwrap();

        let payload = attachment
            .url
            .split_once(";base64,")
            .map(|(_, p)| p)
            .unwrap();
        let decoded = general_purpose::STANDARD.decode(payload).unwrap();
        assert_eq!(decoded, content);
    }

    #[test]
    fn test_encode_bytes_unknown_content_falls_back() {
        let attachment = encode_bytes("blob.bin", b"\x00\x01\x02\x03").unwrap();
        assert_eq!(attachment.media_type, DEFAULT_MEDIA_TYPE);
        assert!(!attachment.is_image());
    }

    #[test]
    fn test_encode_bytes_rejects_blank_name() {
        let result = encode_bytes("   ", b"content");
        assert!(matches!(result, Err(FilesError::InvalidFileName(_))));
    }

    #[test]
    fn test_encode_bytes_rejects_oversized_content() {
        let bytes = vec![0u8; (MAX_ATTACHMENT_BYTES + 1) as usize];
        let result = encode_bytes("big.bin", &bytes);

        match result {
            Err(FilesError::TooLarge { size, limit }) => {
                assert_eq!(size, MAX_ATTACHMENT_BYTES + 1);
                assert_eq!(limit, MAX_ATTACHMENT_BYTES);
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_attachment_serializes_with_persisted_field_names() {
        let attachment = encode_bytes("invoice.pdf", b"%PDF-1.4").unwrap();
        let json = serde_json::to_value(&attachment).unwrap();

        assert_eq!(json["name"], "invoice.pdf");
        assert_eq!(json["type"], "application/pdf");
        assert_eq!(json["size"], 8);
        assert!(json["uploadedAt"].is_string());
        assert!(json["url"]
            .as_str()
            .unwrap()
            .starts_with("data:application/pdf;base64,"));
    }

    #[test]
    fn test_attachment_deserializes_legacy_record_without_upload_time() {
        let json = r#"{
            "name": "invoice.pdf",
            "url": "data:application/pdf;base64,JVBERi0xLjQK",
            "type": "application/pdf",
            "size": 25600
        }"#;

        let attachment: Attachment = serde_json::from_str(json).unwrap();
        assert_eq!(attachment.name.as_str(), "invoice.pdf");
        assert_eq!(attachment.media_type, "application/pdf");
        assert_eq!(attachment.size, 25600);
        assert!(attachment.uploaded_at.is_none());
        assert!(attachment.is_document());
    }
}
