//! Client code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ClientCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum ClientCodeError {
    /// The input string is empty after trimming.
    #[error("client code cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("client code must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A client account code, the login credential of the app.
///
/// Client codes are printed on QR labels handed to customers. Parsing
/// normalizes them the way the backend stores them: surrounding
/// whitespace removed and all characters uppercased, so `" abc123 "`
/// and `"ABC123"` name the same account.
///
/// ## Examples
///
/// ```
/// use etn_core::ClientCode;
///
/// let code = ClientCode::parse("  abc123 ").unwrap();
/// assert_eq!(code.as_str(), "ABC123");
///
/// assert!(ClientCode::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ClientCode(String);

impl ClientCode {
    /// Maximum length of a client code.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `ClientCode` from a string, trimming and uppercasing.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty after trimming or longer
    /// than [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, ClientCodeError> {
        let normalized = s.trim().to_uppercase();

        if normalized.is_empty() {
            return Err(ClientCodeError::Empty);
        }

        if normalized.len() > Self::MAX_LENGTH {
            return Err(ClientCodeError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ClientCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ClientCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl ::sqlx::Type<::sqlx::Postgres> for ClientCode {
    fn type_info() -> ::sqlx::postgres::PgTypeInfo {
        <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
        <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for ClientCode {
    fn decode(
        value: ::sqlx::postgres::PgValueRef<'r>,
    ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
        let code = <String as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
        Ok(Self(code))
    }
}

#[cfg(feature = "postgres")]
impl ::sqlx::Encode<'_, ::sqlx::Postgres> for ClientCode {
    fn encode_by_ref(
        &self,
        buf: &mut ::sqlx::postgres::PgArgumentBuffer,
    ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
        <String as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_uppercases_and_trims() {
        let code = ClientCode::parse("  abc123\n").unwrap();
        assert_eq!(code.as_str(), "ABC123");
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(matches!(ClientCode::parse(""), Err(ClientCodeError::Empty)));
        assert!(matches!(
            ClientCode::parse("   "),
            Err(ClientCodeError::Empty)
        ));
    }

    #[test]
    fn parse_rejects_too_long() {
        let long = "A".repeat(ClientCode::MAX_LENGTH + 1);
        assert!(matches!(
            ClientCode::parse(&long),
            Err(ClientCodeError::TooLong { .. })
        ));
    }

    #[test]
    fn equal_after_normalization() {
        let a = ClientCode::parse("abc123").unwrap();
        let b = ClientCode::parse(" ABC123 ").unwrap();
        assert_eq!(a, b);
    }
}
