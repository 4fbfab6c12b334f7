//! Validated scalar types shared across the DCM crates.
//!
//! Record fields that carry an invariant (non-empty text, a well-formed
//! email address, a coercible money amount) are wrapped here so the
//! invariant is checked once, at construction, instead of at every use
//! site.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input was not a plausible email address
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

/// A string type that guarantees non-empty content.
///
/// Wraps a `String` and ensures it contains at least one non-whitespace
/// character. Input is trimmed of leading and trailing whitespace during
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed; if the trimmed result is empty an error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NonEmptyText::new(s)
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A validated email address.
///
/// The acceptance rule is deliberately shallow: one `@` separating a
/// non-empty local part from a domain that contains a dot, with no
/// whitespace anywhere. Deliverability is not checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses an email address, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` for blank input and
    /// `TextError::InvalidEmail` when the shape check fails.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if !Self::is_plausible(trimmed) {
            return Err(TextError::InvalidEmail(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    fn is_plausible(candidate: &str) -> bool {
        if candidate.chars().any(char::is_whitespace) {
            return false;
        }
        let Some((local, domain)) = candidate.split_once('@') else {
            return false;
        };
        if local.is_empty() || domain.contains('@') {
            return false;
        }
        match domain.rsplit_once('.') {
            Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
            None => false,
        }
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for EmailAddress {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmailAddress::parse(s)
    }
}

impl serde::Serialize for EmailAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for EmailAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EmailAddress::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A treatment cost in the clinic's currency.
///
/// Stored records written by earlier front-end builds carry the cost
/// either as a JSON number or as a numeric string, so deserialization
/// accepts both; a string that does not parse as a number coerces to
/// zero rather than failing the whole record. Serialization always emits
/// a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Cost(f64);

impl Cost {
    /// A zero cost.
    pub const ZERO: Cost = Cost(0.0);

    /// Creates a cost from a raw amount.
    pub fn new(amount: f64) -> Self {
        Self(amount)
    }

    /// Returns the raw amount.
    pub fn amount(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Cost {
    fn from(amount: f64) -> Self {
        Self(amount)
    }
}

impl std::fmt::Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for Cost {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Cost {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct CostVisitor;

        impl serde::de::Visitor<'_> for CostVisitor {
            type Value = Cost;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a number or a numeric string")
            }

            fn visit_f64<E>(self, v: f64) -> Result<Cost, E> {
                Ok(Cost(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Cost, E> {
                Ok(Cost(v as f64))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Cost, E> {
                Ok(Cost(v as f64))
            }

            fn visit_str<E>(self, v: &str) -> Result<Cost, E> {
                // Unparsable strings coerce to zero, matching the lenient
                // handling of legacy records.
                Ok(Cost(v.trim().parse().unwrap_or(0.0)))
            }
        }

        deserializer.deserialize_any(CostVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  John Doe  ").unwrap();
        assert_eq!(text.as_str(), "John Doe");
    }

    #[test]
    fn non_empty_text_rejects_whitespace_only() {
        assert!(matches!(NonEmptyText::new("   "), Err(TextError::Empty)));
        assert!(matches!(NonEmptyText::new(""), Err(TextError::Empty)));
    }

    #[test]
    fn non_empty_text_round_trips_through_json() {
        let text = NonEmptyText::new("Toothache").unwrap();
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, "\"Toothache\"");
        let back: NonEmptyText = serde_json::from_str(&json).unwrap();
        assert_eq!(back, text);
    }

    #[test]
    fn non_empty_text_deserialize_rejects_blank() {
        let result: Result<NonEmptyText, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }

    #[test]
    fn email_accepts_plain_addresses() {
        for candidate in ["john@entnt.in", "a.b@clinic.example.org", "x@y.co"] {
            assert!(EmailAddress::parse(candidate).is_ok(), "{candidate}");
        }
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        for candidate in [
            "not-an-email",
            "@missing-local.com",
            "two@@ats.com",
            "spaces in@local.com",
            "no-tld@domain",
            "trailing-dot@domain.",
        ] {
            assert!(
                matches!(
                    EmailAddress::parse(candidate),
                    Err(TextError::InvalidEmail(_))
                ),
                "{candidate}"
            );
        }
    }

    #[test]
    fn email_trims_whitespace() {
        let email = EmailAddress::parse(" admin@entnt.in ").unwrap();
        assert_eq!(email.as_str(), "admin@entnt.in");
    }

    #[test]
    fn cost_deserializes_from_number() {
        let cost: Cost = serde_json::from_str("80").unwrap();
        assert_eq!(cost.amount(), 80.0);

        let cost: Cost = serde_json::from_str("12.5").unwrap();
        assert_eq!(cost.amount(), 12.5);
    }

    #[test]
    fn cost_deserializes_from_numeric_string() {
        let cost: Cost = serde_json::from_str("\"1500\"").unwrap();
        assert_eq!(cost.amount(), 1500.0);
    }

    #[test]
    fn cost_coerces_unparsable_string_to_zero() {
        let cost: Cost = serde_json::from_str("\"free\"").unwrap();
        assert_eq!(cost.amount(), 0.0);
    }

    #[test]
    fn cost_serializes_as_number() {
        let json = serde_json::to_string(&Cost::new(80.0)).unwrap();
        assert_eq!(json, "80.0");
    }
}
