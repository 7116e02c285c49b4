//! # Request Bodies
//!
//! Every compliance endpoint takes a JSON body. [`RequestBody`] names the
//! body in error messages and carries the size limits serde cannot express.
//! [`read_body`] turns an axum rejection or a broken limit into an
//! [`AppError`] that says which request was wrong.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// A JSON request accepted by the compliance routes.
pub trait RequestBody: Sized {
    /// Name used in error messages, e.g. `"batch request"`.
    const NAME: &'static str;

    /// Limits beyond the JSON shape: batch size, candidate count.
    ///
    /// Crop, substance, market and residue are checked by the domain
    /// parsers so the API and the CLI report them identically.
    fn check_limits(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Unwrap a JSON body and enforce its limits.
///
/// Unreadable bodies are 400 `BAD_REQUEST`; broken limits are 422
/// `VALIDATION_ERROR`. Both messages start with [`RequestBody::NAME`].
pub fn read_body<T: RequestBody>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    let Json(req) = body.map_err(|rejection| rejected::<T>(&rejection))?;
    req.check_limits()
        .map_err(|reason| AppError::Validation(format!("{}: {reason}", T::NAME)))?;
    Ok(req)
}

fn rejected<T: RequestBody>(rejection: &JsonRejection) -> AppError {
    let detail = rejection.body_text();
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            format!("{} must be sent as application/json", T::NAME)
        }
        JsonRejection::JsonSyntaxError(_) => format!("{} is not valid JSON: {detail}", T::NAME),
        JsonRejection::JsonDataError(_) => format!("{} has the wrong shape: {detail}", T::NAME),
        _ => format!("{} could not be read: {detail}", T::NAME),
    };
    AppError::BadRequest(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        items: Vec<u32>,
    }

    impl RequestBody for Sample {
        const NAME: &'static str = "sample request";

        fn check_limits(&self) -> Result<(), String> {
            if self.items.is_empty() {
                return Err("items must not be empty".into());
            }
            Ok(())
        }
    }

    async fn extract(content_type: &str, body: &'static str) -> Result<Json<Sample>, JsonRejection> {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap();
        Json::<Sample>::from_request(request, &()).await
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::BadRequest(m) | AppError::Validation(m) => m,
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn accepts_a_body_within_limits() {
        let req = read_body(extract("application/json", r#"{"items":[1,2]}"#).await).unwrap();
        assert_eq!(req.items, vec![1, 2]);
    }

    #[tokio::test]
    async fn syntax_errors_name_the_request() {
        let err = read_body(extract("application/json", "{items").await).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(message(err).starts_with("sample request is not valid JSON"));
    }

    #[tokio::test]
    async fn wrong_field_types_name_the_request() {
        let err = read_body(extract("application/json", r#"{"items":"many"}"#).await).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(message(err).starts_with("sample request has the wrong shape"));
    }

    #[tokio::test]
    async fn missing_content_type_names_the_request() {
        let err = read_body(extract("text/plain", r#"{"items":[1]}"#).await).unwrap_err();
        assert_eq!(message(err), "sample request must be sent as application/json");
    }

    #[tokio::test]
    async fn broken_limits_are_validation_errors() {
        let err = read_body(extract("application/json", r#"{"items":[]}"#).await).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(message(err), "sample request: items must not be empty");
    }
}
