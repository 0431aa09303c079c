//! Form validation for the admin screens.
//!
//! Each form has one explicit validation function returning either `Ok(())`
//! or the full list of field errors. Rules are checked per field in order and
//! stop at the first failure for that field, so a blank email reports
//! `email.required` only. Uniqueness needs a store lookup, so callers resolve
//! it first and pass the answer in.

use serde::Serialize;

use crate::i18n::{self, Locale};

pub const NAME_MAX: usize = 255;
pub const EMAIL_MAX: usize = 255;
pub const SLUG_MAX: usize = 255;
pub const PASSWORD_MIN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    NameRequired,
    NameMax,
    EmailRequired,
    EmailFormat,
    EmailMax,
    EmailUnique,
    PasswordRequired,
    PasswordMin,
    PasswordConfirmed,
    SlugRequired,
    SlugFormat,
    SlugMax,
    SlugUnique,
}

impl Rule {
    /// `field.rule` key, e.g. `email.unique`.
    pub fn key(self) -> &'static str {
        match self {
            Rule::NameRequired => "name.required",
            Rule::NameMax => "name.max",
            Rule::EmailRequired => "email.required",
            Rule::EmailFormat => "email.email",
            Rule::EmailMax => "email.max",
            Rule::EmailUnique => "email.unique",
            Rule::PasswordRequired => "password.required",
            Rule::PasswordMin => "password.min",
            Rule::PasswordConfirmed => "password.confirmed",
            Rule::SlugRequired => "slug.required",
            Rule::SlugFormat => "slug.format",
            Rule::SlugMax => "slug.max",
            Rule::SlugUnique => "slug.unique",
        }
    }

    pub fn field(self) -> &'static str {
        let key = self.key();
        key.split_once('.').map_or(key, |(field, _)| field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub rule: &'static str,
    pub message: String,
}

/// Field-level errors for one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule, locale: Locale) {
        self.0.push(FieldError {
            field: rule.field(),
            rule: rule.key(),
            message: i18n::rule_message(rule, locale).to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the given `field.rule` key failed.
    pub fn has(&self, rule_key: &str) -> bool {
        self.0.iter().any(|e| e.rule == rule_key)
    }

    /// First message recorded for a field, for inline display.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&str> = self.0.iter().map(|e| e.rule).collect();
        write!(f, "{}", keys.join(", "))
    }
}

/// Values of the user modal form, already trimmed where the form trims.
#[derive(Debug, Clone, Copy)]
pub struct UserInput<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub password_confirmation: &'a str,
}

/// Create form: every field required, password confirmed.
pub fn validate_create_user(input: &UserInput<'_>, email_taken: bool, locale: Locale) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_name(input.name, &mut errors, locale);
    check_email(input.email, email_taken, &mut errors, locale);
    if input.password.is_empty() {
        errors.push(Rule::PasswordRequired, locale);
    } else {
        check_password(input.password, input.password_confirmation, &mut errors, locale);
    }
    errors.into_result()
}

/// Update form: password rules only apply when a new password was typed.
/// `email_taken` must already exclude the user being edited.
pub fn validate_update_user(input: &UserInput<'_>, email_taken: bool, locale: Locale) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_name(input.name, &mut errors, locale);
    check_email(input.email, email_taken, &mut errors, locale);
    if !input.password.is_empty() {
        check_password(input.password, input.password_confirmation, &mut errors, locale);
    }
    errors.into_result()
}

/// New permission form: `name` and `slug` required, slug unique and URL-safe.
pub fn validate_new_permission(name: &str, slug: &str, slug_taken: bool, locale: Locale) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_name(name, &mut errors, locale);
    if slug.is_empty() {
        errors.push(Rule::SlugRequired, locale);
    } else if slug.chars().count() > SLUG_MAX {
        errors.push(Rule::SlugMax, locale);
    } else if !is_valid_slug(slug) {
        errors.push(Rule::SlugFormat, locale);
    } else if slug_taken {
        errors.push(Rule::SlugUnique, locale);
    }
    errors.into_result()
}

fn check_name(name: &str, errors: &mut ValidationErrors, locale: Locale) {
    if name.is_empty() {
        errors.push(Rule::NameRequired, locale);
    } else if name.chars().count() > NAME_MAX {
        errors.push(Rule::NameMax, locale);
    }
}

fn check_email(email: &str, taken: bool, errors: &mut ValidationErrors, locale: Locale) {
    if email.is_empty() {
        errors.push(Rule::EmailRequired, locale);
    } else if !is_valid_email(email) {
        errors.push(Rule::EmailFormat, locale);
    } else if email.chars().count() > EMAIL_MAX {
        errors.push(Rule::EmailMax, locale);
    } else if taken {
        errors.push(Rule::EmailUnique, locale);
    }
}

fn check_password(password: &str, confirmation: &str, errors: &mut ValidationErrors, locale: Locale) {
    if password.chars().count() < PASSWORD_MIN {
        errors.push(Rule::PasswordMin, locale);
    } else if password != confirmation {
        errors.push(Rule::PasswordConfirmed, locale);
    }
}

/// Address check: one `@`, non-empty local part and domain, no whitespace,
/// domain labels non-empty.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    })
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(name: &'a str, email: &'a str, password: &'a str, confirmation: &'a str) -> UserInput<'a> {
        UserInput { name, email, password, password_confirmation: confirmation }
    }

    #[test]
    fn valid_create_passes() {
        let form = input("Alice", "alice@example.com", "secret123", "secret123");
        assert!(validate_create_user(&form, false, Locale::En).is_ok());
    }

    #[test]
    fn create_reports_each_failing_field_once() {
        let form = input("", "not-an-email", "short", "short");
        let errors = validate_create_user(&form, false, Locale::En).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.has("name.required"));
        assert!(errors.has("email.email"));
        assert!(errors.has("password.min"));
    }

    #[test]
    fn create_requires_password() {
        let form = input("Alice", "alice@example.com", "", "");
        let errors = validate_create_user(&form, false, Locale::En).unwrap_err();
        assert!(errors.has("password.required"));
        assert_eq!(errors.first("password"), Some("The password field is required."));
    }

    #[test]
    fn confirmation_must_match() {
        let form = input("Alice", "alice@example.com", "secret123", "secret124");
        let errors = validate_create_user(&form, false, Locale::En).unwrap_err();
        assert!(errors.has("password.confirmed"));
    }

    #[test]
    fn taken_email_is_rejected() {
        let form = input("Alice", "alice@example.com", "secret123", "secret123");
        let errors = validate_create_user(&form, true, Locale::PtBr).unwrap_err();
        assert!(errors.has("email.unique"));
        assert_eq!(errors.first("email"), Some("O email informado já está em uso."));
    }

    #[test]
    fn name_length_counts_characters() {
        let long = "é".repeat(NAME_MAX);
        let form = input(&long, "alice@example.com", "secret123", "secret123");
        assert!(validate_create_user(&form, false, Locale::En).is_ok());

        let too_long = "é".repeat(NAME_MAX + 1);
        let form = input(&too_long, "alice@example.com", "secret123", "secret123");
        assert!(validate_create_user(&form, false, Locale::En).unwrap_err().has("name.max"));
    }

    #[test]
    fn update_allows_blank_password() {
        let form = input("Alice", "alice@example.com", "", "");
        assert!(validate_update_user(&form, false, Locale::En).is_ok());
    }

    #[test]
    fn update_checks_new_password() {
        let form = input("Alice", "alice@example.com", "short", "");
        let errors = validate_update_user(&form, false, Locale::En).unwrap_err();
        assert!(errors.has("password.min"));
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(is_valid_email("root@localhost"));
        assert!(!is_valid_email("plain"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("a@@example.com"));
        assert!(!is_valid_email("a@example..com"));
        assert!(!is_valid_email(".a@example.com"));
    }

    #[test]
    fn permission_slug_rules() {
        assert!(validate_new_permission("List users", "users.list", false, Locale::En).is_ok());
        let errors = validate_new_permission("List users", "Users List", false, Locale::En).unwrap_err();
        assert!(errors.has("slug.format"));
        let errors = validate_new_permission("List users", "users.list", true, Locale::En).unwrap_err();
        assert!(errors.has("slug.unique"));
        let errors = validate_new_permission("", "", false, Locale::En).unwrap_err();
        assert!(errors.has("name.required"));
        assert!(errors.has("slug.required"));
    }
}
