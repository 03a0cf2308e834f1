use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, error};
use derive_more::derive::{Display, Error};
use serde::Serialize;

use crate::domain::queue::QueueError;
use crate::domain::repository::RepositoryError;

#[derive(Serialize)]
struct ErrorResponse {
	#[serde(rename = "statusCode")]
	status_code: u16,
	error:       String,
	message:     String,
}

#[derive(Debug, Display, Error)]
pub enum ApiError {
	#[display("Could not connect to the database.")]
	DatabaseConnectionError,
	#[display("Could not enqueue the payment.")]
	QueueError,
	#[display("Request data is invalid.")]
	BadClientDataError,
	#[display("Internal server error.")]
	InternalServerError,
}

impl ApiError {
	pub fn name(&self) -> String {
		match self {
			ApiError::DatabaseConnectionError => "Insufficient Storage".to_string(),
			ApiError::QueueError => "Service Unavailable".to_string(),
			ApiError::BadClientDataError => "Bad request".to_string(),
			ApiError::InternalServerError => "Internal Server Error".to_string(),
		}
	}
}

impl error::ResponseError for ApiError {
	fn error_response(&self) -> HttpResponse {
		HttpResponse::build(self.status_code())
			.content_type(ContentType::json())
			.json(ErrorResponse {
				status_code: self.status_code().as_u16(),
				error:       self.to_string(),
				message:     self.name(),
			})
	}

	fn status_code(&self) -> StatusCode {
		match self {
			ApiError::DatabaseConnectionError => StatusCode::INSUFFICIENT_STORAGE,
			ApiError::QueueError => StatusCode::SERVICE_UNAVAILABLE,
			ApiError::BadClientDataError => StatusCode::BAD_REQUEST,
			ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<QueueError> for ApiError {
	fn from(e: QueueError) -> Self {
		match e {
			QueueError::Malformed(_) => ApiError::BadClientDataError,
			QueueError::Unavailable(_) => ApiError::QueueError,
		}
	}
}

impl From<RepositoryError> for ApiError {
	fn from(_: RepositoryError) -> Self {
		ApiError::DatabaseConnectionError
	}
}
