// Error handling for the Shipyard HTTP surface
// Maps `ShipyardError` variants carried in `anyhow` chains onto status codes

use std::fmt::{Display, Formatter};

use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, QueryPayloadError},
};
use shipyard_common::error::{
    ACCESS_DENIED, DATA_ACCESS_ERROR, PARAMETER_VALIDATE_ERROR, RESOURCE_CONFLICT, SERVER_ERROR,
};
use shipyard_common::{FieldViolation, ShipyardError};

use crate::model::response as common;

// Local wrapper for application errors to implement actix-web error handling
// (Cannot impl foreign trait for foreign type due to orphan rules)
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl From<ShipyardError> for AppError {
    fn from(value: ShipyardError) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl AppError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    fn server_error(&self, code: i32) -> HttpResponse {
        tracing::error!(error = ?self.inner, "Request failed");
        common::Result::<()>::http_response(500, code, SERVER_ERROR.message.to_string(), ())
    }
}

impl actix_web::error::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let Some(err) = ShipyardError::find_in(&self.inner) else {
            return self.server_error(SERVER_ERROR.code);
        };

        match err {
            ShipyardError::Authentication(_) => common::Result::<()>::http_response(
                401,
                ACCESS_DENIED.code,
                err.to_string(),
                (),
            ),
            ShipyardError::Validation(violations) => {
                common::Result::<Vec<FieldViolation>>::http_response(
                    422,
                    PARAMETER_VALIDATE_ERROR.code,
                    err.to_string(),
                    violations,
                )
            }
            ShipyardError::Concurrency(message) => {
                tracing::warn!(error = %message, "Write conflicted after retry");
                common::Result::<()>::http_response(
                    409,
                    RESOURCE_CONFLICT.code,
                    RESOURCE_CONFLICT.message.to_string(),
                    (),
                )
            }
            ShipyardError::Database(_) => self.server_error(DATA_ACCESS_ERROR.code),
            ShipyardError::NotFound(_) | ShipyardError::Internal(_) => {
                self.server_error(SERVER_ERROR.code)
            }
        }
    }
}

fn unprocessable(cause: String, violation: FieldViolation) -> actix_web::Error {
    let message = ShipyardError::validation(vec![violation.clone()]).to_string();
    let response = common::Result::<Vec<FieldViolation>>::http_response(
        422,
        PARAMETER_VALIDATE_ERROR.code,
        message,
        vec![violation],
    );
    InternalError::from_response(cause, response).into()
}

/// Reports bodies that are not JSON as validation failures of `body`.
///
/// Field-level type errors are named later, when the decoded value is mapped
/// onto the entry.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match err {
        JsonPayloadError::Deserialize(e) => {
            let message = e.to_string();
            unprocessable(message.clone(), FieldViolation::new("body", message))
        }
        other => other.into(),
    }
}

/// Reports a malformed `since` query parameter as a validation failure.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    unprocessable(message.clone(), FieldViolation::new("since", message))
}
