use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::utils::error::CustomError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("username pattern is valid"));

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Length rule for a trimmed, required text field.
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    pub field: &'static str,
    pub min_chars: usize,
    pub max_chars: usize,
    pub required_message: &'static str,
    pub length_message: &'static str,
}

pub const POST_CONTENT: TextRule = TextRule {
    field: "content",
    min_chars: 1,
    max_chars: 500,
    required_message: "Post content is required",
    length_message: "Post content cannot exceed 500 characters",
};

pub const COMMENT_CONTENT: TextRule = TextRule {
    field: "content",
    min_chars: 1,
    max_chars: 200,
    required_message: "Comment content is required",
    length_message: "Comment cannot exceed 200 characters",
};

pub const USERNAME: TextRule = TextRule {
    field: "username",
    min_chars: 3,
    max_chars: 30,
    required_message: "Username is required",
    length_message: "Username must be between 3 and 30 characters",
};

impl TextRule {
    /// Trims `raw` and checks it against the rule. Lengths count characters, not bytes.
    pub fn check(&self, raw: Option<&str>) -> Result<String, FieldError> {
        let value = raw.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Err(FieldError::new(self.field, self.required_message));
        }

        let len = value.chars().count();
        if len < self.min_chars || len > self.max_chars {
            return Err(FieldError::new(self.field, self.length_message));
        }

        Ok(value.to_string())
    }
}

/// Single-field shortcut for request bodies with one validated field.
pub fn validate_text(rule: &TextRule, raw: Option<&str>) -> Result<String, CustomError> {
    rule.check(raw)
        .map_err(|err| CustomError::ValidationError(vec![err]))
}

/// Collects every field failure of a request so they are reported together.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, rule: &TextRule, raw: Option<&str>) -> String {
        match rule.check(raw) {
            Ok(value) => value,
            Err(err) => {
                self.errors.push(err);
                String::new()
            }
        }
    }

    pub fn username(&mut self, raw: Option<&str>) -> String {
        let username = self.text(&USERNAME, raw);
        if !username.is_empty() && !USERNAME_RE.is_match(&username) {
            self.errors.push(FieldError::new(
                "username",
                "Username can only contain letters, numbers and underscores",
            ));
        }
        username
    }

    pub fn email(&mut self, raw: Option<&str>) -> String {
        let email = raw.map(str::trim).unwrap_or_default().to_lowercase();
        if !EMAIL_RE.is_match(&email) {
            self.errors
                .push(FieldError::new("email", "Please provide a valid email"));
        }
        email
    }

    pub fn password(&mut self, raw: Option<&str>) -> String {
        let password = raw.unwrap_or_default();
        if let Err(err) = validate_password(password) {
            self.errors.push(err);
        }
        password.to_string()
    }

    pub fn reject(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn finish(self) -> Result<(), CustomError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CustomError::ValidationError(self.errors))
        }
    }
}

pub fn validate_password(password: &str) -> Result<(), FieldError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FieldError::new(
            "password",
            "Password must be at least 6 characters long",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_before_checking() {
        assert_eq!(COMMENT_CONTENT.check(Some("  nice  ")).unwrap(), "nice");
    }

    #[test]
    fn blank_content_is_required() {
        let err = COMMENT_CONTENT.check(Some("   ")).unwrap_err();
        assert_eq!(err.message, "Comment content is required");

        let err = POST_CONTENT.check(None).unwrap_err();
        assert_eq!(err.message, "Post content is required");
    }

    #[test]
    fn comment_limit_is_200_characters() {
        assert!(COMMENT_CONTENT.check(Some(&"a".repeat(200))).is_ok());

        let err = COMMENT_CONTENT.check(Some(&"a".repeat(201))).unwrap_err();
        assert_eq!(err.message, "Comment cannot exceed 200 characters");
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        assert!(POST_CONTENT.check(Some(&"é".repeat(500))).is_ok());
        assert!(POST_CONTENT.check(Some(&"é".repeat(501))).is_err());
    }

    #[test]
    fn validator_reports_every_field() {
        let mut validator = Validator::new();
        validator.username(Some("ab"));
        validator.email(Some("not-an-email"));
        validator.password(Some("123"));

        match validator.finish() {
            Err(CustomError::ValidationError(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, ["username", "email", "password"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn username_rejects_symbols() {
        let mut validator = Validator::new();
        validator.username(Some("bad name!"));
        assert!(validator.finish().is_err());
    }
}
