//! Phone Value Object

use kernel::error::app_error::{AppError, AppResult};

const PHONE_MAX_LENGTH: usize = 20;
const PHONE_MIN_DIGITS: usize = 3;

/// Contact number as typed, restricted to digits and common separators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone(String);

impl Phone {
    /// `Ok(None)` for blank input, which clears the number
    pub fn parse_optional(raw: Option<&str>) -> AppResult<Option<Self>> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Self::new(value).map(Some),
        }
    }

    pub fn new(raw: &str) -> AppResult<Self> {
        let value = raw.trim();

        if value.chars().count() > PHONE_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Phone number must be at most {} characters",
                PHONE_MAX_LENGTH
            )));
        }

        let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')');
        let digits = value.chars().filter(char::is_ascii_digit).count();
        if !value.chars().all(allowed) || digits < PHONE_MIN_DIGITS || value[1..].contains('+') {
            return Err(AppError::bad_request("Invalid phone number"));
        }

        Ok(Self(value.to_string()))
    }

    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_formats() {
        assert_eq!(Phone::new(" +86 138-0000-0000 ").unwrap().as_str(), "+86 138-0000-0000");
        assert!(Phone::new("(010) 1234").is_ok());
        assert!(Phone::new("12").is_err());
        assert!(Phone::new("call me").is_err());
        assert!(Phone::new("12+34567").is_err());
        assert!(Phone::new(&"1".repeat(21)).is_err());
    }

    #[test]
    fn test_blank_clears() {
        assert_eq!(Phone::parse_optional(None).unwrap(), None);
        assert_eq!(Phone::parse_optional(Some("   ")).unwrap(), None);
        assert!(Phone::parse_optional(Some("555-0100")).unwrap().is_some());
    }
}
