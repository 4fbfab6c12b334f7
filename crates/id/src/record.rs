//! Internal implementation of the record identifier types.

use crate::{IdError, IdResult};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Longest identifier accepted from external input.
///
/// Generated identifiers are 33 bytes (prefix + 32 hex); the bound leaves
/// room for legacy clock-derived values while rejecting pathological input.
const MAX_ID_LEN: usize = 64;

/// Validates an externally supplied identifier token.
///
/// Accepts any non-empty printable-ASCII token without whitespace, up to
/// [`MAX_ID_LEN`] bytes. This is a syntactic check only; it does not imply
/// the identifier refers to a live record.
fn validate_token(input: &str) -> IdResult<()> {
    if input.is_empty() {
        return Err(IdError::InvalidInput("identifier cannot be empty".into()));
    }
    if input.len() > MAX_ID_LEN {
        return Err(IdError::InvalidInput(format!(
            "identifier exceeds maximum length of {} bytes: '{}'",
            MAX_ID_LEN, input
        )));
    }
    if !input.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(IdError::InvalidInput(format!(
            "identifier must be printable ASCII without whitespace, got: '{}'",
            input
        )));
    }
    Ok(())
}

fn generate_with_prefix(prefix: char) -> String {
    format!("{}{}", prefix, Uuid::new_v4().simple())
}

macro_rules! record_id {
    ($name:ident, $prefix:literal, $entity:literal) => {
        #[doc = concat!("Identifier of a ", $entity, " record.")]
        ///
        /// Guaranteed non-empty and printable once constructed. New
        #[doc = concat!(
            "identifiers are generated as `",
            $prefix,
            "<uuid>`; parsed identifiers may be any legacy token."
        )]
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Generates a fresh ", $entity, " identifier.")]
            ///
            /// The UUID portion is random (RFC 4122 version 4), so two
            /// identifiers generated in the same instant do not collide.
            pub fn new() -> Self {
                Self(generate_with_prefix($prefix))
            }

            /// Validates and wraps an externally supplied identifier.
            ///
            /// # Errors
            ///
            /// Returns [`IdError::InvalidInput`] if the token is empty,
            /// over-long, or contains whitespace or non-ASCII bytes.
            pub fn parse(input: &str) -> IdResult<Self> {
                validate_token(input)?;
                Ok(Self(input.to_owned()))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::parse(s)
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $name::parse(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

record_id!(PatientId, 'p', "patient");
record_id!(IncidentId, 'i', "incident");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generates_prefixed_uuid() {
        let id = PatientId::new();
        let token = id.to_string();

        assert_eq!(token.len(), 33);
        assert!(token.starts_with('p'));
        assert!(token[1..]
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
    }

    #[test]
    fn test_incident_ids_use_their_own_prefix() {
        let id = IncidentId::new();
        assert!(id.as_str().starts_with('i'));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = PatientId::new();
        let b = PatientId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_accepts_sample_and_legacy_ids() {
        for legacy in ["p1", "i1", "p1751123456789", "550e8400e29b41d4"] {
            assert!(PatientId::parse(legacy).is_ok(), "{legacy}");
        }
    }

    #[test]
    fn test_parse_rejects_empty() {
        let result = PatientId::parse("");
        assert!(matches!(result, Err(IdError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_rejects_whitespace() {
        assert!(PatientId::parse("p 1").is_err());
        assert!(PatientId::parse("p1\n").is_err());
        assert!(PatientId::parse("\tp1").is_err());
    }

    #[test]
    fn test_parse_rejects_non_ascii() {
        assert!(IncidentId::parse("pé1").is_err());
    }

    #[test]
    fn test_parse_rejects_over_long_input() {
        let long = "p".repeat(MAX_ID_LEN + 1);
        let result = IncidentId::parse(&long);
        assert!(matches!(result, Err(IdError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_accepts_maximum_length() {
        let token = "p".repeat(MAX_ID_LEN);
        assert!(PatientId::parse(&token).is_ok());
    }

    #[test]
    fn test_display_round_trip() {
        let original = IncidentId::new();
        let parsed = IncidentId::parse(&original.to_string()).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_from_str() {
        let id: PatientId = "p1".parse().unwrap();
        assert_eq!(id.as_str(), "p1");

        let bad: Result<PatientId, _> = "".parse();
        assert!(bad.is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let id = PatientId::parse("p1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"p1\"");

        let back: PatientId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_invalid_token() {
        let result: Result<IncidentId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
