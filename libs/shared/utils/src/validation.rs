use std::sync::OnceLock;

use regex::Regex;

use shared_models::error::ValidationErrors;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn required(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("The {} field is required.", field));
    }
}

pub fn email(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        required(errors, field, value);
    } else if !is_valid_email(value) {
        errors.add(field, format!("The {} field is not a valid e-mail address.", field));
    }
}

pub fn min_length(errors: &mut ValidationErrors, field: &str, value: &str, min: usize) {
    if value.chars().count() < min {
        errors.add(
            field,
            format!(
                "The field {} must be a string or array type with a minimum length of '{}'.",
                field, min
            ),
        );
    }
}

pub fn max_length(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!(
                "The field {} must be a string with a maximum length of {}.",
                field, max
            ),
        );
    }
}

pub fn range(errors: &mut ValidationErrors, field: &str, value: i64, min: i64, max: i64) {
    if value < min || value > max {
        errors.add(
            field,
            format!("The field {} must be between {} and {}.", field, min, max),
        );
    }
}
