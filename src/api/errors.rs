use actix_web::error::{InternalError, JsonPayloadError, PathError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};

use crate::domain::action::ActionError;

/// Body shared by every failed request
pub fn error_body(message: &str) -> serde_json::Value {
    serde_json::json!({
        "message": message,
        "error": message,
    })
}

impl ResponseError for ActionError {
    fn status_code(&self) -> StatusCode {
        match self {
            ActionError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(error_body(&self.to_string()))
    }
}

/// Malformed request bodies answer 400 with the usual error body
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = ActionError::InvalidRequest(err.to_string()).to_string();
    let response = HttpResponse::BadRequest().json(error_body(&message));
    InternalError::from_response(err, response).into()
}

/// Non-numeric ids never match a record, so they answer 404
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    let message = format!("Action not found: {}", err);
    let response = HttpResponse::NotFound().json(error_body(&message));
    InternalError::from_response(err, response).into()
}
