use std::sync::LazyLock;

use regex::Regex;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email shape regex must compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    Required,
    Invalid,
}

/// Trim `email` and check it has a `local@domain.tld` shape.
///
/// # Errors
/// [`ValidationError::Required`] for blank input,
/// [`ValidationError::Invalid`] when the shape does not match.
pub fn validate_email(email: &str) -> Result<&str, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Required);
    }
    if !EMAIL_SHAPE.is_match(email) {
        return Err(ValidationError::Invalid);
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_required() {
        assert_eq!(validate_email(""), Err(ValidationError::Required));
        assert_eq!(validate_email("   "), Err(ValidationError::Required));
    }

    #[test]
    fn malformed_addresses_are_invalid() {
        for email in ["not-an-email", "a@b", "@b.co", "a b@c.de", "a@@b.co"] {
            assert_eq!(validate_email(email), Err(ValidationError::Invalid), "{email}");
        }
    }

    #[test]
    fn valid_address_is_trimmed() {
        assert_eq!(validate_email("  a@b.co "), Ok("a@b.co"));
        assert_eq!(
            validate_email("first.last+tag@mail.example.org"),
            Ok("first.last+tag@mail.example.org")
        );
    }
}
