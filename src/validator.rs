use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::utils::errors::AppError;

/// Flatten `validator` output into one comma-joined message, preferring the
/// per-rule message and falling back to the field name.
fn constraint_message(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = Vec::new();

    for (field, errors) in errors.field_errors() {
        for error in errors.iter() {
            match &error.message {
                Some(msg) => parts.push(msg.to_string()),
                None => parts.push(format!("{field} is invalid")),
            }
        }
    }

    parts.join(", ")
}

fn rejection_message(rejection: &JsonRejection) -> anyhow::Error {
    let body_text = rejection.body_text();

    // serde's message carries the offending field name; surface it so the
    // client sees which field to fix rather than a generic parse failure.
    if let Some(rest) = body_text.split("missing field `").nth(1) {
        let field = rest.split('`').next().unwrap_or("unknown");
        return anyhow!("{field} is required");
    }

    if body_text.contains("invalid type") {
        return anyhow!("Invalid field type in request");
    }

    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return anyhow!("Missing 'Content-Type: application/json' header");
    }

    anyhow!("Invalid request body")
}

/// JSON extractor that runs `validator` constraints after deserialization.
///
/// Malformed bodies and constraint violations both reject with 400 in the
/// standard error envelope, so a client sees one status for every way a
/// request body can be unacceptable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection_message(&rejection)))?;

        value
            .validate()
            .map_err(|errors| AppError::bad_request(anyhow!("{}", constraint_message(&errors))))?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct SampleDto {
        #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
        name: String,
        #[validate(range(min = 0.0, max = 100.0))]
        score: f64,
    }

    #[test]
    fn test_constraint_message_prefers_rule_message() {
        let dto = SampleDto {
            name: "ab".to_string(),
            score: 50.0,
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(
            constraint_message(&errors),
            "Name must be at least 3 characters"
        );
    }

    #[test]
    fn test_constraint_message_falls_back_to_field_name() {
        let dto = SampleDto {
            name: "abc".to_string(),
            score: 150.0,
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(constraint_message(&errors), "score is invalid");
    }
}
