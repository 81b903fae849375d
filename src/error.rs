use axum::extract::multipart::MultipartError;
use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::Debug;

/// Uniform failure shape surfaced by every operation. `code` is the HTTP
/// status to respond with; anything that is not a valid status renders as
/// a 500.
#[derive(Debug)]
pub struct Error {
    pub code: u16,
    pub message: String,
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!(?err, "geocoding request failed");
        upstream_error()
    }
}

impl From<oso::OsoError> for Error {
    fn from(err: oso::OsoError) -> Self {
        authorization_error(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        storage_error(err)
    }
}

impl From<MultipartError> for Error {
    fn from(_: MultipartError) -> Self {
        invalid_input_error()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = Json(json!({
            "errorMessage": self.message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 422,
        message: "invalid input".into(),
    }
}

pub fn invalid_address_error() -> Error {
    Error {
        code: 422,
        message: "could not find coordinates for the specified address".into(),
    }
}

pub fn upload_error(message: &str) -> Error {
    Error {
        code: 422,
        message: message.into(),
    }
}

pub fn place_not_found_error() -> Error {
    Error {
        code: 404,
        message: "could not find place".into(),
    }
}

pub fn user_not_found_error() -> Error {
    Error {
        code: 404,
        message: "could not find user".into(),
    }
}

pub fn unauthenticated_error() -> Error {
    Error {
        code: 401,
        message: "authentication required".into(),
    }
}

pub fn unauthorized_error() -> Error {
    Error {
        code: 403,
        message: "not allowed to modify this place".into(),
    }
}

pub fn database_error<T: Debug>(err: T) -> Error {
    tracing::error!(?err, "database error");

    Error {
        code: 500,
        message: "database error".into(),
    }
}

pub fn storage_error<T: Debug>(err: T) -> Error {
    tracing::error!(?err, "file storage error");

    Error {
        code: 500,
        message: "file storage error".into(),
    }
}

pub fn authorization_error<T: Debug>(err: T) -> Error {
    tracing::error!(?err, "authorization engine error");

    Error {
        code: 500,
        message: "authorization error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 502,
        message: "geocoding service unavailable".into(),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 500,
        message: "environment variable error".into(),
    }
}
