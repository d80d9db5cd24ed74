//! Custom Axum extractors
//!
//! Every rejection here is an [`ApiError`], so a bad path or body gets the
//! same JSON error shape as a failed query.

use axum::extract::{Form, FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::ApiError;
use crate::models::{
    ArtistForm, ArtistPatch, FormErrors, ShowForm, ValidationError, VenueForm, VenuePatch,
};

/// Numeric record id from the `{id}` path segment.
///
/// Anything that isn't a positive integer can't name a record, so it is
/// answered with 404 rather than a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i32);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = raw_id(parts, state).await?;
        match raw.parse::<i32>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(not_found(parts, raw)),
        }
    }
}

/// Id for a delete: any integer. Ids that match nothing delete nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteId(pub i32);

impl<S> FromRequestParts<S> for DeleteId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = raw_id(parts, state).await?;
        match raw.parse::<i32>() {
            Ok(id) => Ok(Self(id)),
            Err(_) => Err(not_found(parts, raw)),
        }
    }
}

async fn raw_id<S: Send + Sync>(parts: &mut Parts, state: &S) -> Result<String, ApiError> {
    match Path::<String>::from_request_parts(parts, state).await {
        Ok(Path(raw)) => Ok(raw),
        Err(_) => Err(not_found(parts, String::new())),
    }
}

fn not_found(parts: &Parts, id: String) -> ApiError {
    ApiError::NotFound {
        resource: resource_of(parts.uri.path()),
        id,
    }
}

/// Resource named by the first path segment, for 404 messages.
fn resource_of(path: &str) -> &'static str {
    match path.trim_start_matches('/').split('/').next() {
        Some("venues") => "venue",
        Some("artists") => "artist",
        Some("shows") => "show",
        _ => "record",
    }
}

/// A JSON form body that can be sent back with a notification.
pub trait Submission: DeserializeOwned + Send {
    /// Notice shown above the rejected form; `name` may be blank.
    fn rejection_notice(name: &str) -> String;
}

fn notice(kind: &str, name: &str, outcome: &str) -> String {
    if name.is_empty() {
        format!("An error occurred. {} could not be {}.", kind, outcome)
    } else {
        format!("An error occurred. {} {} could not be {}.", kind, name, outcome)
    }
}

impl Submission for VenueForm {
    fn rejection_notice(name: &str) -> String {
        notice("Venue", name, "listed")
    }
}

impl Submission for VenuePatch {
    fn rejection_notice(name: &str) -> String {
        notice("Venue", name, "edited")
    }
}

impl Submission for ArtistForm {
    fn rejection_notice(name: &str) -> String {
        notice("Artist", name, "listed")
    }
}

impl Submission for ArtistPatch {
    fn rejection_notice(name: &str) -> String {
        notice("Artist", name, "edited")
    }
}

impl Submission for ShowForm {
    fn rejection_notice(_name: &str) -> String {
        notice("Show", "", "listed")
    }
}

/// JSON form body.
///
/// Wrong content type or broken JSON is a 415/400. JSON that parses but
/// doesn't fit the form (a `null` name, an id sent as a string) is rejected
/// like any other invalid form: 422 with per-field errors and the
/// submission echoed back.
#[derive(Debug, Clone)]
pub struct Submitted<T>(pub T);

impl<S, T> FromRequest<S> for Submitted<T>
where
    S: Send + Sync,
    T: Submission,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;

        match serde_json::from_value::<T>(value.clone()) {
            Ok(form) => Ok(Self(form)),
            Err(err) => {
                let errors = mistyped_fields::<T>(&value, &err);
                tracing::warn!(%errors, "form body rejected");
                let name = value.get("name").and_then(Value::as_str).unwrap_or("");
                Err(ApiError::rejected(T::rejection_notice(name.trim()), errors, &value))
            }
        }
    }
}

/// Find the fields that can't deserialize.
///
/// Form fields all have defaults, so an object holding a single key
/// deserializes exactly when that key's value has the right type.
fn mistyped_fields<T: DeserializeOwned>(value: &Value, err: &serde_json::Error) -> FormErrors {
    let mut errors = FormErrors::new();

    let Value::Object(fields) = value else {
        errors.push(ValidationError::WrongType {
            field: "form".into(),
            reason: "expected a JSON object".into(),
        });
        return errors;
    };

    for (key, field_value) in fields {
        let single = Value::Object(Map::from_iter([(key.clone(), field_value.clone())]));
        if let Err(field_err) = serde_json::from_value::<T>(single) {
            errors.push(ValidationError::WrongType {
                field: key.clone(),
                reason: field_err.to_string(),
            });
        }
    }

    if errors.is_empty() {
        errors.push(ValidationError::WrongType {
            field: "form".into(),
            reason: err.to_string(),
        });
    }
    errors
}

/// `application/x-www-form-urlencoded` body with JSON rejections.
#[derive(Debug, Clone)]
pub struct UrlEncoded<T>(pub T);

impl<S, T> FromRequest<S> for UrlEncoded<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resource_comes_from_first_segment() {
        assert_eq!(resource_of("/venues/abc"), "venue");
        assert_eq!(resource_of("/artists/0/edit"), "artist");
        assert_eq!(resource_of("/elsewhere/1"), "record");
    }

    #[test]
    fn notices_name_the_submission() {
        assert_eq!(
            VenueForm::rejection_notice("The Dive"),
            "An error occurred. Venue The Dive could not be listed."
        );
        assert_eq!(
            ArtistPatch::rejection_notice(""),
            "An error occurred. Artist could not be edited."
        );
        assert_eq!(
            ShowForm::rejection_notice("ignored"),
            "An error occurred. Show could not be listed."
        );
    }

    fn mistyped<T: DeserializeOwned + std::fmt::Debug>(value: Value) -> Vec<String> {
        let err = serde_json::from_value::<T>(value.clone()).unwrap_err();
        mistyped_fields::<T>(&value, &err)
            .iter()
            .map(|e| e.field().to_string())
            .collect()
    }

    #[test]
    fn null_text_field_is_pinned_to_its_field() {
        let fields = mistyped::<VenueForm>(json!({ "name": null, "city": "SF" }));
        assert_eq!(fields, vec!["name"]);
    }

    #[test]
    fn string_id_is_pinned_to_its_field() {
        let fields = mistyped::<ShowForm>(json!({
            "venue_id": "1",
            "artist_id": 2,
            "start_time": "2035-01-01 20:00"
        }));
        assert_eq!(fields, vec!["venue_id"]);
    }

    #[test]
    fn non_object_body_is_one_form_error() {
        assert_eq!(mistyped::<ArtistForm>(json!([1, 2])), vec!["form"]);
    }
}
