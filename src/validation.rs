//! Request records accepted at the HTTP boundary and the rules they must satisfy
//! before anything reaches the ledger or the coordinator.

use serde::Deserialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::AppError;

pub const MAX_USER_ID_CHARS: usize = 255;
pub const MAX_EVENT_NAME_CHARS: usize = 255;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReserveRequest {
    #[validate(range(min = 1, message = "Event ID must be a positive integer"))]
    pub event_id: i64,
    #[validate(custom(function = "validate_user_id"))]
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(custom(function = "validate_event_name"))]
    pub name: String,
    #[validate(range(min = 1, message = "Total seats must be a positive integer"))]
    pub total_seats: i32,
}

/// Message for a body `user_id` that breaks the length rule. Lengths count characters.
pub fn user_id_error(user_id: &str) -> Option<&'static str> {
    match user_id.chars().count() {
        0 => Some("User ID is required"),
        n if n > MAX_USER_ID_CHARS => Some("User ID too long"),
        _ => None,
    }
}

/// Blank names count as missing.
pub fn event_name_error(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        Some("Event name is required")
    } else if name.chars().count() > MAX_EVENT_NAME_CHARS {
        Some("Event name too long")
    } else {
        None
    }
}

fn field_rule(message: Option<&'static str>) -> Result<(), ValidationError> {
    match message {
        None => Ok(()),
        Some(message) => {
            let mut error = ValidationError::new("length");
            error.message = Some(Cow::Borrowed(message));
            Err(error)
        }
    }
}

fn validate_user_id(user_id: &str) -> Result<(), ValidationError> {
    field_rule(user_id_error(user_id))
}

fn validate_event_name(name: &str) -> Result<(), ValidationError> {
    field_rule(event_name_error(name))
}

/// `ValidationError` carrying a single field message.
pub fn invalid_input(message: &str) -> AppError {
    AppError::validation(format!("Invalid input: {}", message))
}

/// Flattens field errors into one `Invalid input: ...` message, ordered by field name.
pub fn describe(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();

    format!("Invalid input: {}", messages.join(", "))
}

pub fn validate<T: Validate>(value: &T) -> Result<(), AppError> {
    value
        .validate()
        .map_err(|errors| AppError::validation(describe(&errors)))
}

/// Path ids must be plain positive integers.
pub fn parse_event_id(raw: &str) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::validation("Invalid event ID")),
    }
}

pub fn check_user_id(raw: &str) -> Result<(), AppError> {
    let chars = raw.chars().count();
    if chars == 0 || chars > MAX_USER_ID_CHARS {
        return Err(AppError::validation("Invalid user ID"));
    }
    Ok(())
}
