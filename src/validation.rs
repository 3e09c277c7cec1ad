use axum::{
    Json,
    extract::{FromRequest, Request},
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;

pub const MIN_PUBLISH_YEAR: i32 = 1000;

pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/apng",
    "image/avif",
    "image/gif",
    "image/jpeg",
    "image/png",
    "image/webp",
];

/// JSON body that has already passed its `Validate` rules.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + WireNames,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        validate_payload(&value)?;
        Ok(Self(value))
    }
}

/// Maps a struct field to the key clients send for it.
pub trait WireNames {
    fn wire_name(field: &str) -> String {
        field.to_string()
    }
}

/// `publish_year` -> `publishYear`, for bodies declared with `rename_all = "camelCase"`.
pub fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub fn validate_payload<T: Validate + WireNames>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|errors| validation_error(errors, T::wire_name))
}

/// Flattens field errors into one message, e.g. `"title" wajib diisi`.
pub fn validation_error(errors: ValidationErrors, wire_name: fn(&str) -> String) -> AppError {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = wire_name(&field);
            errs.iter()
                .map(move |e| match &e.message {
                    Some(message) => format!("\"{field}\" {message}"),
                    None => format!("\"{field}\" tidak valid ({})", e.code),
                })
                .collect::<Vec<_>>()
        })
        .collect();
    parts.sort();
    if parts.is_empty() {
        parts.push("Payload tidak valid".to_string());
    }
    AppError::BadRequest(parts.join(", "))
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

pub fn validate_publish_year(year: i32) -> Result<(), ValidationError> {
    if (MIN_PUBLISH_YEAR..=current_year()).contains(&year) {
        Ok(())
    } else {
        let mut err = ValidationError::new("publish_year");
        err.message = Some(
            format!(
                "harus berada di antara {} dan {}",
                MIN_PUBLISH_YEAR,
                current_year()
            )
            .into(),
        );
        Err(err)
    }
}

pub fn validate_digits(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit() || c == '+') {
        Ok(())
    } else {
        let mut err = ValidationError::new("digits");
        err.message = Some("hanya boleh berisi angka".into());
        Err(err)
    }
}

/// Letters, digits, `.`, `_` and `-` only, so a username can never look like an email.
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("username");
        err.message = Some("hanya boleh berisi huruf, angka, titik, garis bawah, atau tanda hubung".into());
        Err(err)
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("tidak boleh kosong".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Rejects uploads whose declared content type is not a known image type.
pub fn validate_image_content_type(content_type: Option<&str>) -> Result<(), AppError> {
    match content_type {
        Some(ct) if ALLOWED_IMAGE_TYPES.contains(&ct) => Ok(()),
        _ => Err(AppError::bad_request(
            "\"content-type\" harus salah satu dari image/apng, image/avif, image/gif, image/jpeg, image/png, image/webp",
        )),
    }
}

/// Accepts `"0812..."` as well as `812...` for phone-like fields.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Text(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}
