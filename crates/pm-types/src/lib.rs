//! Validated text types shared across the patient management crates.
//!
//! Patient commands carry free-text fields (name, email, address) that must be
//! rejected at the boundary, before any store interaction. These wrappers make
//! "already validated" part of the type, so the coordinator and the billing
//! client never re-check.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input was not a plausible email address
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

/// A string type that guarantees non-empty content.
///
/// Wraps a `String` and ensures it contains at least one non-whitespace
/// character. Leading and trailing whitespace is trimmed during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, `TextError::Empty` is returned.
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
    pub fn into_inner(self) -> String {
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

/// A syntactically validated email address.
///
/// This is an address-syntax check only: exactly one `@`, a non-empty local
/// part and a dotted, non-empty domain. Deliverability is not verified.
/// Comparison is done on the lowercased form so that uniqueness checks treat
/// `Ada@x.com` and `ada@x.com` as the same address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses and validates an email address.
    ///
    /// The input is trimmed and lowercased. Returns `TextError::Empty` for
    /// blank input and `TextError::InvalidEmail` for anything that does not
    /// look like `local@domain.tld`.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        let lowered = trimmed.to_lowercase();

        let mut parts = lowered.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();

        let domain_ok = domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && domain.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');

        if local.is_empty() || domain.is_empty() || local.contains(char::is_whitespace) || !domain_ok
        {
            return Err(TextError::InvalidEmail(trimmed.to_owned()));
        }

        Ok(Self(lowered))
    }

    /// Returns the normalised address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_accepts() {
        let t = NonEmptyText::new("  Ada Lovelace  ").unwrap();
        assert_eq!(t.as_str(), "Ada Lovelace");
    }

    #[test]
    fn non_empty_text_rejects_blank() {
        assert!(matches!(NonEmptyText::new("   "), Err(TextError::Empty)));
        assert!(matches!(NonEmptyText::new(""), Err(TextError::Empty)));
    }

    #[test]
    fn email_parses_and_normalises() {
        let e = EmailAddress::parse(" Ada@X.com ").unwrap();
        assert_eq!(e.as_str(), "ada@x.com");
    }

    #[test]
    fn email_rejects_bad_syntax() {
        for bad in ["", "   ", "ada", "ada@", "@x.com", "ada@localhost", "a b@x.com", "ada@.com"] {
            assert!(EmailAddress::parse(bad).is_err(), "accepted {bad:?}");
        }
    }
}
